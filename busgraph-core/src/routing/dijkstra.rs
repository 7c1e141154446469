use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet, hash_map::Entry};

use super::state::{SearchKey, State};
use super::{PathEntry, PathResult};
use crate::{RouteIdx, Seconds, StopIdx, TRANSFER_PENALTY, model::GraphState};

/// How a search state was reached
#[derive(Copy, Clone, Debug)]
struct Predecessor {
    key: SearchKey,
    route: Option<RouteIdx>,
    weight: Seconds,
}

/// Minimum travel time between two stops, charging [`TRANSFER_PENALTY`] whenever the
/// path leaves the route it is riding.
///
/// With `transfer_penalty` enabled the search state is `(stop, route being ridden)`,
/// otherwise plain stop. Returns `None` when the destination is unreachable or either
/// index is out of range.
pub fn route_aware_dijkstra(
    graph: &GraphState,
    origin: StopIdx,
    destination: StopIdx,
    transfer_penalty: bool,
) -> Option<PathResult> {
    if origin >= graph.stop_count() || destination >= graph.stop_count() {
        return None;
    }

    let key = |stop: StopIdx, route: Option<RouteIdx>| SearchKey {
        stop,
        route: if transfer_penalty { route } else { None },
    };

    let mut distances: HashMap<SearchKey, u64> = HashMap::new();
    let mut predecessors: HashMap<SearchKey, Predecessor> = HashMap::new();
    let mut settled: HashSet<SearchKey> = HashSet::new();
    let mut heap = BinaryHeap::new();

    distances.insert(key(origin, None), 0);
    heap.push(State {
        cost: 0,
        stop: origin,
        route: None,
    });

    let mut reached = None;
    while let Some(State { cost, stop, route }) = heap.pop() {
        let current = key(stop, route);
        // Stale duplicate of an already settled state
        if !settled.insert(current) {
            continue;
        }
        if stop == destination {
            reached = Some((current, cost));
            break;
        }

        for edge in graph.edges_from(stop) {
            let penalty = if transfer_penalty && route.is_some() && route != edge.route {
                u64::from(TRANSFER_PENALTY)
            } else {
                0
            };
            let next_cost = cost + u64::from(edge.weight) + penalty;
            let next = key(edge.to, edge.route);

            let improved = match distances.entry(next) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    true
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        true
                    } else {
                        false
                    }
                }
            };
            if improved {
                predecessors.insert(
                    next,
                    Predecessor {
                        key: current,
                        route: edge.route,
                        weight: edge.weight,
                    },
                );
                heap.push(State {
                    cost: next_cost,
                    stop: edge.to,
                    route: edge.route,
                });
            }
        }
    }

    let (destination_key, total_cost) = reached?;

    let mut path = Vec::new();
    let mut current = destination_key;
    while let Some(prev) = predecessors.get(&current) {
        path.push(PathEntry {
            stop: current.stop,
            route: prev.route,
            weight: prev.weight,
        });
        current = prev.key;
    }
    path.push(PathEntry {
        stop: current.stop,
        route: None,
        weight: 0,
    });
    path.reverse();

    Some(PathResult { path, total_cost })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanonicalStop, GraphBuilder};

    struct Fixture {
        builder: GraphBuilder,
    }

    impl Fixture {
        fn new(stops: &[&str]) -> Self {
            let mut builder = GraphBuilder::default();
            for id in stops {
                builder.add_stop(CanonicalStop {
                    id: (*id).into(),
                    name: (*id).into(),
                    lat: 0.0,
                    lon: 0.0,
                });
            }
            Self { builder }
        }

        fn ride(mut self, from: &str, to: &str, weight: Seconds, route: &str) -> Self {
            let (f, t) = self.indices(from, to);
            let r = self.builder.intern_route(route);
            self.builder.add_edge(f, t, weight, Some(r));
            self
        }

        fn walk(mut self, from: &str, to: &str, weight: Seconds) -> Self {
            let (f, t) = self.indices(from, to);
            self.builder.add_edge(f, t, weight, None);
            self
        }

        fn indices(&self, from: &str, to: &str) -> (StopIdx, StopIdx) {
            (
                self.builder.stop_index(from).unwrap(),
                self.builder.stop_index(to).unwrap(),
            )
        }

        fn build(self) -> GraphState {
            self.builder.build()
        }
    }

    fn stop_ids(graph: &GraphState, result: &PathResult) -> Vec<String> {
        result
            .path
            .iter()
            .map(|e| graph.stop(e.stop).unwrap().id.clone())
            .collect()
    }

    fn routes(graph: &GraphState, result: &PathResult) -> Vec<Option<String>> {
        result
            .path
            .iter()
            .map(|e| e.route.and_then(|r| graph.route_id(r)).map(str::to_owned))
            .collect()
    }

    fn run(graph: &GraphState, from: &str, to: &str, penalty: bool) -> Option<PathResult> {
        route_aware_dijkstra(
            graph,
            graph.stop_index(from).unwrap(),
            graph.stop_index(to).unwrap(),
            penalty,
        )
    }

    #[test]
    fn stays_on_route_when_detour_is_cheaper_than_penalty() {
        // R1: A -> B -> D (100 + 250), R2 shortcut B -> D (100) needs a change at B
        let graph = Fixture::new(&["A", "B", "D"])
            .ride("A", "B", 100, "R1")
            .ride("B", "D", 250, "R1")
            .ride("B", "D", 100, "R2")
            .build();

        let result = run(&graph, "A", "D", true).unwrap();
        assert_eq!(result.total_cost, 350);
        assert_eq!(routes(&graph, &result), [None, Some("R1".into()), Some("R1".into())]);

        // Without penalties the shortcut wins
        let result = run(&graph, "A", "D", false).unwrap();
        assert_eq!(result.total_cost, 200);
        assert_eq!(routes(&graph, &result)[2].as_deref(), Some("R2"));
    }

    #[test]
    fn switches_route_when_staying_costs_more_than_penalty() {
        let graph = Fixture::new(&["A", "B", "D"])
            .ride("A", "B", 100, "R1")
            .ride("B", "D", 1000, "R1")
            .ride("B", "D", 100, "R2")
            .build();

        let result = run(&graph, "A", "D", true).unwrap();
        assert_eq!(result.total_cost, 100 + 100 + u64::from(TRANSFER_PENALTY));
        assert_eq!(routes(&graph, &result), [None, Some("R1".into()), Some("R2".into())]);
    }

    #[test]
    fn walking_after_a_ride_is_penalized() {
        let graph = Fixture::new(&["A", "B", "C"])
            .ride("A", "B", 100, "R1")
            .walk("B", "C", 300)
            .build();
        let result = run(&graph, "A", "C", true).unwrap();
        assert_eq!(result.total_cost, 100 + 300 + u64::from(TRANSFER_PENALTY));
        assert_eq!(stop_ids(&graph, &result), ["A", "B", "C"]);
        assert_eq!(result.path[2].weight, 300);
    }

    #[test]
    fn boarding_after_a_walk_is_free() {
        let graph = Fixture::new(&["A", "B", "C"])
            .walk("A", "B", 300)
            .ride("B", "C", 100, "R1")
            .build();
        let result = run(&graph, "A", "C", true).unwrap();
        assert_eq!(result.total_cost, 400);
    }

    #[test]
    fn unreachable_destination_returns_none() {
        let graph = Fixture::new(&["A", "B", "C", "D"])
            .ride("A", "B", 10, "R1")
            .ride("C", "D", 10, "R2")
            .build();
        assert!(run(&graph, "A", "D", true).is_none());
        assert!(route_aware_dijkstra(&graph, 0, 42, true).is_none());
    }

    #[test]
    fn origin_equals_destination() {
        let graph = Fixture::new(&["A"]).build();
        let result = run(&graph, "A", "A", true).unwrap();
        assert_eq!(result.total_cost, 0);
        assert_eq!(result.path.len(), 1);
        assert_eq!(result.path[0].route, None);
    }
}
