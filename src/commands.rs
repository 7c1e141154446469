//! Operations behind the `busgraph` subcommands, each producing a JSON document

use busgraph_core::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{AppConfig, CliError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub stops: usize,
    pub raw_stops: usize,
    pub routes: usize,
    pub edges: usize,
    pub ride_edges: usize,
    pub transfer_edges: usize,
}

impl GraphStats {
    pub fn of(graph: &GraphState) -> Self {
        let edges = graph.edge_count();
        let transfer_edges = graph.transfer_edge_count();
        Self {
            stops: graph.stop_count(),
            raw_stops: graph.stop_id_to_merged().len(),
            routes: graph.route_count(),
            edges,
            ride_edges: edges - transfer_edges,
            transfer_edges,
        }
    }
}

/// Store for the configured dataset; the relational source is tried first when a
/// database url is configured and the `postgres` feature is enabled.
pub fn open_store(config: &AppConfig) -> GraphStore {
    let mut store = GraphStore::new(config.graph.clone());

    #[cfg(feature = "postgres")]
    if let Some(url) = &config.database_url {
        match postgres::Client::connect(url, postgres::NoTls) {
            Ok(mut client) => {
                if store.load_from_relational_source(&mut client) {
                    return store;
                }
                info!("Falling back to feed files");
            }
            Err(e) => warn!("Could not connect to database, using feed files: {e}"),
        }
    }

    #[cfg(not(feature = "postgres"))]
    if config.database_url.is_some() {
        warn!("database_url is ignored, busgraph was built without the postgres feature");
    }

    info!(
        "Using feed files under {}",
        config.graph.dataset_root.display()
    );
    store
}

/// Parses `minLat,minLon,maxLat,maxLon`
pub fn parse_bbox(text: &str) -> Result<BoundingBox, CliError> {
    let invalid = || {
        CliError::InvalidArgument(format!(
            "bbox must be minLat,minLon,maxLat,maxLon, got {text:?}"
        ))
    };

    let values = text
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    let [min_lat, min_lon, max_lat, max_lon] = values.as_slice() else {
        return Err(invalid());
    };

    let bbox = BoundingBox::new(*min_lat, *min_lon, *max_lat, *max_lon);
    if !bbox.is_valid() || min_lat > max_lat || min_lon > max_lon {
        return Err(invalid());
    }
    Ok(bbox)
}

/// Itinerary (or its `GeoJSON` rendering) between two stops, `null` when unreachable
pub fn route(
    store: &mut GraphStore,
    origin: &str,
    destination: &str,
    mode: SearchMode,
    geojson: bool,
) -> Result<Value, CliError> {
    let graph = store.graph_state();
    let Some(itinerary) = find_path(&graph, origin, destination, mode)? else {
        info!("No {mode} path from {origin} to {destination}");
        return Ok(Value::Null);
    };

    if geojson {
        Ok(serde_json::to_value(itinerary.to_geojson(&graph)?)?)
    } else {
        Ok(serde_json::to_value(&itinerary)?)
    }
}

pub fn stops(store: &mut GraphStore, query: &StopQuery) -> Result<Value, CliError> {
    Ok(serde_json::to_value(store.lookup_stops(query))?)
}

pub fn nearest(store: &mut GraphStore, lat: f64, lon: f64) -> Result<Value, CliError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(CliError::InvalidArgument(format!(
            "coordinates must be finite, got {lat}, {lon}"
        )));
    }
    Ok(serde_json::to_value(store.nearest_stop(lat, lon))?)
}

pub fn stats(store: &mut GraphStore) -> Result<Value, CliError> {
    Ok(serde_json::to_value(GraphStats::of(&store.graph_state()))?)
}
