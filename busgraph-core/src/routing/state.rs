use std::cmp::Ordering;

use crate::{RouteIdx, StopIdx};

/// Search state of the route-aware Dijkstra: a stop plus the route being ridden
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(super) struct SearchKey {
    pub(super) stop: StopIdx,
    pub(super) route: Option<RouteIdx>,
}

/// Heap entry
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) struct State {
    pub(super) cost: u64,
    pub(super) stop: StopIdx,
    /// Route of the edge used to reach `stop`, `None` at the origin or after a walk
    pub(super) route: Option<RouteIdx>,
}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap); ties broken on the
        // remaining fields so the order agrees with Eq
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.stop.cmp(&self.stop))
            .then_with(|| other.route.cmp(&self.route))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
