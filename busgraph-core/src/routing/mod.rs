//! Stop-to-stop path search over a [`GraphState`] snapshot

mod bfs;
mod dijkstra;
mod itinerary;
mod state;
mod to_geojson;

use std::{fmt, str::FromStr};

pub use bfs::fewest_stops;
pub use dijkstra::route_aware_dijkstra;
pub use itinerary::{Itinerary, Step, segment_path};

use crate::{Error, RouteIdx, Seconds, StopIdx, model::GraphState};

/// One stop of a search path together with how it was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathEntry {
    pub stop: StopIdx,
    /// Route of the inbound edge; `None` at the origin and after a walk
    pub route: Option<RouteIdx>,
    /// Weight of the inbound edge, 0 at the origin
    pub weight: Seconds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    /// Origin first, destination last
    pub path: Vec<PathEntry>,
    pub total_cost: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Minimum travel time with transfer penalties
    #[default]
    Fastest,
    /// Minimum number of edges
    FewestStops,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Fastest => "fastest",
            SearchMode::FewestStops => "fewest_stops",
        }
    }
}

/// Only `"fastest"` selects the weighted search; any other mode string falls back to
/// fewest stops.
impl From<&str> for SearchMode {
    fn from(mode: &str) -> Self {
        if mode == "fastest" {
            SearchMode::Fastest
        } else {
            SearchMode::FewestStops
        }
    }
}

impl FromStr for SearchMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SearchMode::from(s))
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finds a path between two stop ids and segments it into an itinerary.
///
/// Ids may be canonical or raw (resolved through the merge map).
///
/// # Errors
///
/// [`Error::InvalidQuery`] for a blank id, [`Error::UnknownStop`] when an id does not
/// resolve. An unreachable destination is `Ok(None)`.
pub fn find_path(
    graph: &GraphState,
    origin_id: &str,
    destination_id: &str,
    mode: SearchMode,
) -> Result<Option<Itinerary>, Error> {
    let origin = resolve(graph, origin_id, "origin")?;
    let destination = resolve(graph, destination_id, "destination")?;

    let result = match mode {
        SearchMode::Fastest => route_aware_dijkstra(graph, origin, destination, true),
        SearchMode::FewestStops => fewest_stops(graph, origin, destination),
    };

    Ok(result.and_then(|path| segment_path(graph, &path, mode)))
}

fn resolve(graph: &GraphState, stop_id: &str, role: &str) -> Result<StopIdx, Error> {
    let stop_id = stop_id.trim();
    if stop_id.is_empty() {
        return Err(Error::InvalidQuery(format!("missing {role} stop id")));
    }
    graph
        .resolve_stop(stop_id)
        .ok_or_else(|| Error::UnknownStop(stop_id.to_string()))
}
