use itertools::Itertools;
use serde::Serialize;

use super::{PathEntry, PathResult, SearchMode};
use crate::{RouteIdx, model::GraphState};

/// Maximal run of path entries sharing one effective route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// `None` for a walking run
    pub route_id: Option<String>,
    pub from_stop: String,
    pub to_stop: String,
    pub stop_ids: Vec<String>,
    pub stop_count: usize,
}

impl Step {
    pub fn is_walk(&self) -> bool {
        self.route_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub steps: Vec<Step>,
    /// Number of hops on the path
    pub distance: usize,
    /// Seconds for fastest searches, number of hops for fewest-stops searches
    pub time: u64,
    pub transfers: usize,
    pub path_stop_ids: Vec<String>,
}

/// Route an entry is labelled with: its own inbound route, or the route the next
/// entry is reached by when it has none.
fn effective_route(path: &[PathEntry], i: usize) -> Option<RouteIdx> {
    path[i]
        .route
        .or_else(|| path.get(i + 1).and_then(|next| next.route))
}

/// Groups a raw search path into ride and walk steps.
///
/// Returns `None` for an empty path or an empty graph.
pub fn segment_path(graph: &GraphState, result: &PathResult, mode: SearchMode) -> Option<Itinerary> {
    let path = &result.path;
    if path.is_empty() || graph.is_empty() {
        return None;
    }

    let stop_id = |entry: &PathEntry| graph.stop(entry.stop).map(|s| s.id.clone());

    let chunks = path
        .iter()
        .enumerate()
        .chunk_by(|&(i, _)| effective_route(path, i));

    let mut steps = Vec::new();
    for (route, group) in &chunks {
        let stop_ids: Vec<String> = group.filter_map(|(_, entry)| stop_id(entry)).collect();
        let (Some(from_stop), Some(to_stop)) = (stop_ids.first(), stop_ids.last()) else {
            continue;
        };
        steps.push(Step {
            route_id: route.and_then(|r| graph.route_id(r)).map(str::to_owned),
            from_stop: from_stop.clone(),
            to_stop: to_stop.clone(),
            stop_count: stop_ids.len(),
            stop_ids,
        });
    }

    let path_stop_ids: Vec<String> = path.iter().filter_map(stop_id).collect();
    let distance = path.len() - 1;
    let time = match mode {
        SearchMode::Fastest => result.total_cost,
        SearchMode::FewestStops => distance as u64,
    };

    Some(Itinerary {
        transfers: steps.len().saturating_sub(1),
        steps,
        distance,
        time,
        path_stop_ids,
    })
}
