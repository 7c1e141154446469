//! Owner of the published graph snapshot

use std::sync::Arc;

use log::{info, warn};

use crate::{
    Error,
    loading::{self, GraphConfig, RelationalSource},
    model::{CanonicalStop, GraphState, StopQuery},
    routing::{self, Itinerary, SearchMode},
};

/// Holds the current [`GraphState`] and the configuration used to (re)build it.
///
/// Rebuilds replace the snapshot wholesale. Readers holding an `Arc` from
/// [`GraphStore::graph_state`] keep the old snapshot alive until they drop it.
#[derive(Debug, Default)]
pub struct GraphStore {
    config: GraphConfig,
    state: Option<Arc<GraphState>>,
}

impl GraphStore {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    /// Current snapshot without triggering a build
    pub fn snapshot(&self) -> Option<Arc<GraphState>> {
        self.state.clone()
    }

    /// Replaces the current snapshot
    pub fn publish(&mut self, graph: GraphState) -> Arc<GraphState> {
        let graph = Arc::new(graph);
        self.state = Some(Arc::clone(&graph));
        graph
    }

    /// Builds from a relational source. `false` means nothing was published and the
    /// caller should fall back to feed files.
    pub fn load_from_relational_source<S>(&mut self, source: &mut S) -> bool
    where
        S: RelationalSource + ?Sized,
    {
        match loading::load_from_relational_source(source) {
            Some(graph) => {
                self.publish(graph);
                true
            }
            None => false,
        }
    }

    /// Builds from the configured feed directories and publishes the result
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration; the previous snapshot is kept.
    pub fn load_from_feed_files(&mut self) -> Result<Arc<GraphState>, Error> {
        let graph = loading::load_from_feed_files(&self.config)?;
        Ok(self.publish(graph))
    }

    /// Current snapshot, building from feed files on first use.
    ///
    /// A failed build is logged and answered with an empty graph that is not published,
    /// so the next call tries again.
    pub fn graph_state(&mut self) -> Arc<GraphState> {
        if let Some(state) = &self.state {
            return Arc::clone(state);
        }
        info!("No graph loaded yet, building from feed files");
        self.load_from_feed_files().unwrap_or_else(|e| {
            warn!("Graph build failed: {e}");
            Arc::new(GraphState::default())
        })
    }

    pub fn find_path(
        &mut self,
        origin_id: &str,
        destination_id: &str,
        mode: SearchMode,
    ) -> Result<Option<Itinerary>, Error> {
        routing::find_path(&self.graph_state(), origin_id, destination_id, mode)
    }

    pub fn lookup_stops(&mut self, query: &StopQuery) -> Vec<CanonicalStop> {
        self.graph_state()
            .lookup_stops(query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn nearest_stop(&mut self, lat: f64, lon: f64) -> Option<CanonicalStop> {
        self.graph_state().nearest_stop(lat, lon).cloned()
    }
}
