use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use super::{PathEntry, PathResult};
use crate::{RouteIdx, Seconds, StopIdx, model::GraphState};

#[derive(Copy, Clone, Debug)]
struct Hop {
    from: StopIdx,
    edge_route: Option<RouteIdx>,
    weight: Seconds,
}

/// Path with the fewest edges between two stops, ignoring weights and route changes.
///
/// `total_cost` is the hop count.
pub fn fewest_stops(graph: &GraphState, origin: StopIdx, destination: StopIdx) -> Option<PathResult> {
    let n = graph.stop_count();
    if origin >= n || destination >= n {
        return None;
    }

    let mut seen = FixedBitSet::with_capacity(n);
    let mut predecessors: Vec<Option<Hop>> = vec![None; n];
    let mut queue = VecDeque::new();

    seen.insert(origin);
    queue.push_back(origin);

    let mut found = false;
    while let Some(stop) = queue.pop_front() {
        if stop == destination {
            found = true;
            break;
        }
        for edge in graph.edges_from(stop) {
            if seen.put(edge.to) {
                continue;
            }
            predecessors[edge.to] = Some(Hop {
                from: stop,
                edge_route: edge.route,
                weight: edge.weight,
            });
            queue.push_back(edge.to);
        }
    }
    if !found {
        return None;
    }

    let mut path = Vec::new();
    let mut current = destination;
    while let Some(hop) = predecessors[current] {
        path.push(PathEntry {
            stop: current,
            route: hop.edge_route,
            weight: hop.weight,
        });
        current = hop.from;
    }
    path.push(PathEntry {
        stop: current,
        route: None,
        weight: 0,
    });
    path.reverse();

    let total_cost = (path.len() - 1) as u64;
    Some(PathResult { path, total_cost })
}
