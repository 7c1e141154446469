use log::info;

use super::config::GraphConfig;
use super::dedup::deduplicate_stops;
use super::gtfs::{add_ride_edges, load_feed_data};
use super::transfers::add_walking_transfers;
use crate::{
    Error,
    model::{GraphBuilder, GraphState},
};

/// Builds the graph from the feed directories named in the configuration
///
/// # Errors
///
/// Returns an error only for an invalid configuration; missing directories, missing
/// files and malformed rows are skipped.
pub fn load_from_feed_files(config: &GraphConfig) -> Result<GraphState, Error> {
    config.validate()?;

    info!(
        "Processing feed files under {}",
        config.dataset_root.display()
    );
    let feed = load_feed_data(&config.feed_dirs());

    let clusters = deduplicate_stops(&feed.stops, config.merge_radius_m);
    let mut builder = GraphBuilder::default();
    for stop in clusters.stops {
        builder.add_stop(stop);
    }
    for (raw_id, merged_id) in clusters.stop_id_to_merged {
        builder.map_raw_stop(raw_id, merged_id);
    }

    let ride_edges = add_ride_edges(&mut builder, feed.trips, &feed.trip_routes);
    let transfer_edges =
        add_walking_transfers(&mut builder, config.transfer_radius_m, config.walking_speed_mps);

    let graph = builder.build();
    info!(
        "Graph loaded: {} stops ({} raw), {} edges ({} ride, {} transfer), {} routes",
        graph.stop_count(),
        feed.stops.len(),
        graph.edge_count(),
        ride_edges,
        transfer_edges,
        graph.route_count()
    );
    Ok(graph)
}
