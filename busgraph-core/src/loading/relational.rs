//! Building the graph from pre-materialized relational tables

use std::fmt::Display;

use log::{debug, info, warn};

use crate::{
    MIN_TRANSFER_TIME, Seconds, TRANSFER_PENALTY,
    model::{CanonicalStop, GraphBuilder, GraphState},
};

/// GTFS `transfer_type` meaning the transfer is not possible
const TRANSFER_NOT_POSSIBLE: i32 = 3;

/// Row of the canonical stop table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedStopRow {
    pub stop_id: String,
    pub stop_name: Option<String>,
    pub stop_lat: f64,
    pub stop_lon: f64,
    /// Road-snapped latitude, preferred over `stop_lat` when present
    pub stop_lat_snapped: Option<f64>,
    /// Road-snapped longitude, preferred over `stop_lon` when present
    pub stop_lon_snapped: Option<f64>,
}

/// Row of the pre-materialized ride edge table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgeRow {
    pub from_stop: String,
    pub to_stop: String,
    pub travel_cost: Option<i64>,
    pub route_id: Option<String>,
}

/// Row of the raw stop -> canonical stop table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeMapRow {
    pub stop_id: String,
    pub merged_stop_id: String,
}

/// Row of the GTFS transfer table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransferRow {
    pub from_stop_id: String,
    pub to_stop_id: String,
    pub transfer_type: Option<i32>,
    pub min_transfer_time: Option<i64>,
}

/// Source of pre-canonicalized stops, edges and transfers
pub trait RelationalSource {
    type Error: Display;

    fn merged_stops(&mut self) -> Result<Vec<MergedStopRow>, Self::Error>;
    fn edges(&mut self) -> Result<Vec<EdgeRow>, Self::Error>;
    fn stop_merge_map(&mut self) -> Result<Vec<MergeMapRow>, Self::Error>;
    fn transfers(&mut self) -> Result<Vec<TransferRow>, Self::Error>;
}

/// Builds a graph from a relational source.
///
/// Returns `None` when the source fails or holds no stops; the failure is logged and
/// the caller is expected to fall back to feed files.
pub fn load_from_relational_source<S>(source: &mut S) -> Option<GraphState>
where
    S: RelationalSource + ?Sized,
{
    match try_load(source) {
        Ok(Some(graph)) => {
            info!(
                "Graph loaded from relational source: {} stops, {} edges (incl. {} transfer)",
                graph.stop_count(),
                graph.edge_count(),
                graph.transfer_edge_count()
            );
            Some(graph)
        }
        Ok(None) => {
            info!("Relational source holds no stops");
            None
        }
        Err(e) => {
            warn!("Relational graph load failed: {e}");
            None
        }
    }
}

fn try_load<S>(source: &mut S) -> Result<Option<GraphState>, S::Error>
where
    S: RelationalSource + ?Sized,
{
    let stop_rows = source.merged_stops()?;
    let edge_rows = source.edges()?;
    let merge_rows = source.stop_merge_map()?;
    let transfer_rows = source.transfers().unwrap_or_else(|e| {
        debug!("Transfer table unavailable, continuing without it: {e}");
        Vec::new()
    });

    if stop_rows.is_empty() {
        return Ok(None);
    }

    let mut builder = GraphBuilder::default();
    for row in stop_rows {
        let lat = row.stop_lat_snapped.unwrap_or(row.stop_lat);
        let lon = row.stop_lon_snapped.unwrap_or(row.stop_lon);
        if !lat.is_finite() || !lon.is_finite() || row.stop_id.is_empty() {
            debug!("Skipping stop row {:?} with invalid fields", row.stop_id);
            continue;
        }
        let name = row
            .stop_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| row.stop_id.clone());
        builder.map_raw_stop(row.stop_id.clone(), row.stop_id.clone());
        builder.add_stop(CanonicalStop {
            id: row.stop_id,
            name,
            lat,
            lon,
        });
    }
    for row in merge_rows {
        builder.map_raw_stop(row.stop_id, row.merged_stop_id);
    }

    let mut unknown = 0usize;
    for row in edge_rows {
        let (Some(from), Some(to)) = (
            builder.stop_index(&row.from_stop),
            builder.stop_index(&row.to_stop),
        ) else {
            unknown += 1;
            continue;
        };
        let weight = clamp_seconds(row.travel_cost.unwrap_or(1).max(1));
        let route = row
            .route_id
            .filter(|r| !r.is_empty())
            .map(|r| builder.intern_route(&r));
        builder.add_edge(from, to, weight, route);
    }
    if unknown > 0 {
        debug!("Skipped {unknown} edge rows with unknown endpoints");
    }

    for row in transfer_rows {
        if row.transfer_type == Some(TRANSFER_NOT_POSSIBLE) {
            continue;
        }
        let (Some(from), Some(to)) = (
            builder.canonical_index(&row.from_stop_id),
            builder.canonical_index(&row.to_stop_id),
        ) else {
            continue;
        };
        if from == to {
            continue;
        }
        builder.add_edge(from, to, transfer_weight(row.min_transfer_time), None);
    }

    Ok(Some(builder.build()))
}

fn transfer_weight(min_transfer_time: Option<i64>) -> Seconds {
    match min_transfer_time {
        Some(t) => clamp_seconds(t.max(i64::from(MIN_TRANSFER_TIME))),
        None => TRANSFER_PENALTY.max(MIN_TRANSFER_TIME),
    }
}

fn clamp_seconds(value: i64) -> Seconds {
    Seconds::try_from(value).unwrap_or(Seconds::MAX)
}
