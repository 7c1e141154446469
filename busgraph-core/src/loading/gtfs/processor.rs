use std::path::PathBuf;

use hashbrown::HashMap;
use log::{debug, info};

use super::{
    parser::read_optional_gtfs_file,
    raw_types::{FeedStop, FeedStopTime, FeedTrip, StopVisit},
};
use crate::{RouteIdx, Seconds, model::GraphBuilder, model::RawStop};

/// Union of every feed directory's stop, trip and stop-time records
#[derive(Debug, Default)]
pub(crate) struct FeedData {
    pub(crate) stops: Vec<RawStop>,
    /// trip id -> route id, first mapping across feeds wins
    pub(crate) trip_routes: HashMap<String, String>,
    /// Visits per trip, trips in order of first appearance
    pub(crate) trips: Vec<(String, Vec<StopVisit>)>,
}

/// Reads `stops.txt`, `trips.txt` and `stop_times.txt` from every feed directory.
///
/// Missing directories or files contribute nothing; rows missing required fields are
/// skipped.
pub(crate) fn load_feed_data(feed_dirs: &[PathBuf]) -> FeedData {
    let mut data = FeedData::default();
    let mut trip_index: HashMap<String, usize> = HashMap::new();

    for dir in feed_dirs {
        if !dir.is_dir() {
            debug!("Feed directory {} not found, skipping", dir.display());
            continue;
        }
        info!("Reading feed {}", dir.display());

        let stop_rows: Vec<FeedStop> = read_optional_gtfs_file(&dir.join("stops.txt"));
        let total = stop_rows.len();
        data.stops
            .extend(stop_rows.into_iter().filter_map(FeedStop::into_raw_stop));
        let kept = data.stops.len();

        let trips: Vec<FeedTrip> = read_optional_gtfs_file(&dir.join("trips.txt"));
        for trip in trips {
            if !trip.trip_id.is_empty() && !trip.route_id.is_empty() {
                data.trip_routes.entry(trip.trip_id).or_insert(trip.route_id);
            }
        }

        let stop_times: Vec<FeedStopTime> = read_optional_gtfs_file(&dir.join("stop_times.txt"));
        let mut skipped_visits = 0usize;
        for (trip_id, visit) in stop_times.into_iter().filter_map(|row| {
            let visit = row.into_visit();
            if visit.is_none() {
                skipped_visits += 1;
            }
            visit
        }) {
            let idx = *trip_index.entry(trip_id.clone()).or_insert_with(|| {
                data.trips.push((trip_id, Vec::new()));
                data.trips.len() - 1
            });
            data.trips[idx].1.push(visit);
        }

        debug!(
            "{}: {total} stop rows ({kept} valid stops so far), {skipped_visits} stop times skipped",
            dir.display()
        );
    }

    data
}

/// Adds one ride edge per consecutive pair of visits in every trip.
///
/// Pairs collapsing onto the same canonical stop are dropped, as are pairs referring to
/// stops that were never declared. Returns the number of edges added.
pub(crate) fn add_ride_edges(
    builder: &mut GraphBuilder,
    trips: Vec<(String, Vec<StopVisit>)>,
    trip_routes: &HashMap<String, String>,
) -> usize {
    let mut added = 0;
    let mut unknown = 0;

    for (trip_id, mut visits) in trips {
        let route_label = trip_routes.get(&trip_id).unwrap_or(&trip_id);
        let mut route: Option<RouteIdx> = None;

        // Stable, so equal sequence numbers keep file order
        visits.sort_by_key(|v| v.sequence);

        for pair in visits.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let (Some(from_idx), Some(to_idx)) = (
                builder.canonical_index(&from.stop_id),
                builder.canonical_index(&to.stop_id),
            ) else {
                unknown += 1;
                continue;
            };
            if from_idx == to_idx {
                continue;
            }

            let route_idx = *route.get_or_insert_with(|| builder.intern_route(route_label));
            builder.add_edge(from_idx, to_idx, ride_weight(from, to), Some(route_idx));
            added += 1;
        }
    }

    if unknown > 0 {
        debug!("Skipped {unknown} stop-time pairs referring to unknown stops");
    }
    added
}

/// Scheduled running time between two visits, at least one second
fn ride_weight(from: &StopVisit, to: &StopVisit) -> Seconds {
    let seconds = i64::from(to.arrival) - i64::from(from.departure);
    Seconds::try_from(seconds.max(1)).unwrap_or(Seconds::MAX)
}
