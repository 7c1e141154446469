use log::info;
use rayon::prelude::*;
use rstar::{RTree, primitives::GeomWithData};

use crate::{
    Seconds, StopIdx, TRANSFER_PENALTY,
    distance::{distance_meters, search_envelope},
    model::{CanonicalStop, GraphBuilder},
};

/// Adds bidirectional walking edges between canonical stops within `radius_m`.
///
/// Walking time is `distance / walking_speed_mps`, rounded and floored at the transfer
/// penalty. Pairs are emitted in (i, j > i) stop order so adjacency lists come out the
/// same on every build. Returns the number of edges added.
pub(crate) fn add_walking_transfers(
    builder: &mut GraphBuilder,
    radius_m: f64,
    walking_speed_mps: f64,
) -> usize {
    let stop_count = builder.stops().len();
    info!("Calculating walking transfers between {stop_count} stops");

    let pairs = find_transfer_pairs(builder.stops(), radius_m);

    let mut added = 0;
    for (source, targets) in pairs {
        for (target, distance) in targets {
            let weight = walking_weight(distance, walking_speed_mps);
            builder.add_edge(source, target, weight, None);
            builder.add_edge(target, source, weight, None);
            added += 2;
        }
    }
    added
}

/// For every stop, the later stops within `radius_m` and their distances, sorted by index
fn find_transfer_pairs(stops: &[CanonicalStop], radius_m: f64) -> Vec<(StopIdx, Vec<(StopIdx, f64)>)> {
    let tree = RTree::bulk_load(
        stops
            .iter()
            .enumerate()
            .filter(|(_, s)| s.lat.is_finite() && s.lon.is_finite())
            .map(|(idx, s)| GeomWithData::new([s.lon, s.lat], idx))
            .collect(),
    );

    (0..stops.len())
        .into_par_iter()
        .filter_map(|source_idx| {
            let source = &stops[source_idx];
            let mut targets: Vec<(StopIdx, f64)> = tree
                .locate_in_envelope(&search_envelope(source.lat, source.lon, radius_m))
                .map(|candidate| candidate.data)
                .filter(|&target_idx| target_idx > source_idx)
                .filter_map(|target_idx| {
                    let target = &stops[target_idx];
                    let distance = distance_meters(source.lat, source.lon, target.lat, target.lon);
                    (distance <= radius_m).then_some((target_idx, distance))
                })
                .collect();

            if targets.is_empty() {
                None
            } else {
                targets.sort_unstable_by_key(|&(idx, _)| idx);
                Some((source_idx, targets))
            }
        })
        .collect()
}

fn walking_weight(distance_m: f64, walking_speed_mps: f64) -> Seconds {
    let seconds = (distance_m / walking_speed_mps).round();
    // Saturating float-to-int cast
    (seconds as Seconds).max(TRANSFER_PENALTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str, lat: f64, lon: f64) -> CanonicalStop {
        CanonicalStop {
            id: id.into(),
            name: id.into(),
            lat,
            lon,
        }
    }

    fn north(meters: f64) -> f64 {
        (meters / crate::distance::EARTH_RADIUS_M).to_degrees()
    }

    #[test]
    fn walking_weight_is_floored_at_penalty() {
        assert_eq!(walking_weight(100.0, 1.2), 300);
        assert_eq!(walking_weight(600.0, 1.2), 500);
        assert_eq!(walking_weight(601.0, 1.2), 501);
    }

    #[test]
    fn only_pairs_within_radius_are_connected() {
        let mut builder = GraphBuilder::default();
        builder.add_stop(stop("A", 0.0, 0.0));
        builder.add_stop(stop("B", north(250.0), 0.0));
        builder.add_stop(stop("C", north(700.0), 0.0));

        assert_eq!(add_walking_transfers(&mut builder, 300.0, 1.2), 2);
        let graph = builder.build();
        let a = graph.edges_from(0);
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].to, 1);
        assert!(a[0].is_walk());
        assert_eq!(a[0].weight, 300);
        assert_eq!(graph.edges_from(1)[0].to, 0);
        assert!(graph.edges_from(2).is_empty());
    }

    #[test]
    fn pairs_come_out_in_stop_order() {
        let stops = vec![
            stop("A", 0.0, 0.0),
            stop("B", north(200.0), 0.0),
            stop("C", north(100.0), 0.0),
            stop("D", north(50.0), 0.0),
        ];
        let pairs = find_transfer_pairs(&stops, 300.0);
        assert_eq!(pairs[0].0, 0);
        let targets: Vec<_> = pairs[0].1.iter().map(|&(idx, _)| idx).collect();
        assert_eq!(targets, [1, 2, 3]);
        assert_eq!(pairs.iter().map(|(idx, _)| *idx).collect::<Vec<_>>(), [0, 1, 2]);
    }
}
