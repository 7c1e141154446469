//! Routable graph snapshot and the builder both loading paths share

use hashbrown::HashMap;

use super::query::StopQuery;
use super::stop::CanonicalStop;
use crate::{RouteIdx, Seconds, StopIdx, distance::distance_meters};

/// Directed edge between two canonical stops.
///
/// `route == None` marks a walking transfer, otherwise the edge is a ride segment
/// of the interned route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub to: StopIdx,
    pub weight: Seconds,
    pub route: Option<RouteIdx>,
}

impl Edge {
    pub fn is_walk(&self) -> bool {
        self.route.is_none()
    }
}

/// Immutable routable graph.
///
/// A rebuild produces a new value; nothing mutates a published snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphState {
    /// Canonical stops in insertion order
    stops: Vec<CanonicalStop>,
    /// Canonical stop id -> index into `stops`
    stop_map: HashMap<String, StopIdx>,
    /// Outgoing edges per stop index
    adjacency: Vec<Vec<Edge>>,
    /// Interned route ids
    routes: Vec<String>,
    /// Raw stop id -> canonical stop id
    stop_id_to_merged: HashMap<String, String>,
}

impl GraphState {
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn stops(&self) -> &[CanonicalStop] {
        &self.stops
    }

    pub fn stop(&self, idx: StopIdx) -> Option<&CanonicalStop> {
        self.stops.get(idx)
    }

    pub fn stop_index(&self, stop_id: &str) -> Option<StopIdx> {
        self.stop_map.get(stop_id).copied()
    }

    pub fn stop_by_id(&self, stop_id: &str) -> Option<&CanonicalStop> {
        self.stop_index(stop_id).map(|idx| &self.stops[idx])
    }

    /// Resolves a canonical id, or a raw id through the merge map
    pub fn resolve_stop(&self, stop_id: &str) -> Option<StopIdx> {
        self.stop_index(stop_id).or_else(|| {
            self.stop_id_to_merged
                .get(stop_id)
                .and_then(|merged| self.stop_index(merged))
        })
    }

    /// Canonical id a raw stop id was merged into
    pub fn merged_id(&self, raw_stop_id: &str) -> Option<&str> {
        self.stop_id_to_merged.get(raw_stop_id).map(String::as_str)
    }

    pub fn stop_id_to_merged(&self) -> &HashMap<String, String> {
        &self.stop_id_to_merged
    }

    /// Outgoing edges of a stop; empty for unknown indices
    pub fn edges_from(&self, idx: StopIdx) -> &[Edge] {
        self.adjacency.get(idx).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn route_id(&self, route: RouteIdx) -> Option<&str> {
        self.routes.get(route).map(String::as_str)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn transfer_edge_count(&self) -> usize {
        self.adjacency.iter().flatten().filter(|e| e.is_walk()).count()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Case-insensitive substring search on id and name, then the optional box filter,
    /// truncated to the query limit.
    pub fn lookup_stops(&self, query: &StopQuery) -> Vec<&CanonicalStop> {
        let needle = query.search.trim().to_lowercase();
        let bbox = query.bbox.filter(|b| b.is_valid());

        self.stops
            .iter()
            .filter(|stop| {
                needle.is_empty()
                    || stop.name.to_lowercase().contains(&needle)
                    || stop.id.to_lowercase().contains(&needle)
            })
            .filter(|stop| bbox.is_none_or(|b| b.contains(stop.lat, stop.lon)))
            .take(query.effective_limit())
            .collect()
    }

    /// Closest canonical stop by exact linear scan
    pub fn nearest_stop(&self, lat: f64, lon: f64) -> Option<&CanonicalStop> {
        let mut best = None;
        let mut best_distance = f64::INFINITY;
        for stop in &self.stops {
            let d = distance_meters(lat, lon, stop.lat, stop.lon);
            if d < best_distance {
                best_distance = d;
                best = Some(stop);
            }
        }
        best
    }
}

/// Accumulates stops, routes and edges, then freezes them into a [`GraphState`]
#[derive(Debug, Default)]
pub(crate) struct GraphBuilder {
    state: GraphState,
    route_map: HashMap<String, RouteIdx>,
}

impl GraphBuilder {
    /// Adds a canonical stop; a repeated id keeps the first record
    pub(crate) fn add_stop(&mut self, stop: CanonicalStop) -> StopIdx {
        if let Some(&idx) = self.state.stop_map.get(&stop.id) {
            return idx;
        }
        let idx = self.state.stops.len();
        self.state.stop_map.insert(stop.id.clone(), idx);
        self.state.stops.push(stop);
        self.state.adjacency.push(Vec::new());
        idx
    }

    pub(crate) fn stop_index(&self, stop_id: &str) -> Option<StopIdx> {
        self.state.stop_index(stop_id)
    }

    pub(crate) fn stops(&self) -> &[CanonicalStop] {
        &self.state.stops
    }

    pub(crate) fn map_raw_stop(&mut self, raw_id: impl Into<String>, canonical: impl Into<String>) {
        self.state
            .stop_id_to_merged
            .insert(raw_id.into(), canonical.into());
    }

    /// Canonical index of a raw id; falls back to treating the id as canonical
    pub(crate) fn canonical_index(&self, raw_id: &str) -> Option<StopIdx> {
        let merged = self
            .state
            .stop_id_to_merged
            .get(raw_id)
            .map_or(raw_id, String::as_str);
        self.state.stop_index(merged)
    }

    pub(crate) fn intern_route(&mut self, route_id: &str) -> RouteIdx {
        if let Some(&idx) = self.route_map.get(route_id) {
            return idx;
        }
        let idx = self.state.routes.len();
        self.state.routes.push(route_id.to_string());
        self.route_map.insert(route_id.to_string(), idx);
        idx
    }

    pub(crate) fn add_edge(
        &mut self,
        from: StopIdx,
        to: StopIdx,
        weight: Seconds,
        route: Option<RouteIdx>,
    ) {
        self.state.adjacency[from].push(Edge { to, weight, route });
    }

    pub(crate) fn build(self) -> GraphState {
        self.state
    }
}
