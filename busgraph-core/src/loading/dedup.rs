//! Merging raw stop records that describe the same physical pole

use hashbrown::HashMap;
use log::debug;
use rayon::prelude::*;
use rstar::{RTree, primitives::GeomWithData};

use crate::{
    distance::{distance_meters, search_envelope},
    model::{CanonicalStop, RawStop},
};

/// Output of stop deduplication
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StopClusters {
    /// Canonical stops in order of first appearance of a cluster member
    pub stops: Vec<CanonicalStop>,
    /// Raw stop id -> canonical stop id
    pub stop_id_to_merged: HashMap<String, String>,
}

/// Clusters raw stops lying within `radius_m` of each other.
///
/// Each raw stop maps to the smallest id among the stops within `radius_m` of it
/// (itself included). This is pairwise membership, not a transitive closure: a chain
/// of close stops never pulls a stop further than `radius_m` from its canonical raw
/// stop, and a canonical id may itself map to a smaller neighbour.
///
/// A canonical stop takes the coordinates of the first raw stop assigned to it and the
/// longest name seen in its cluster (ties keep the earlier name).
pub fn deduplicate_stops(raw_stops: &[RawStop], radius_m: f64) -> StopClusters {
    let tree = RTree::bulk_load(
        raw_stops
            .iter()
            .enumerate()
            .filter(|(_, s)| s.lat.is_finite() && s.lon.is_finite())
            .map(|(idx, s)| GeomWithData::new([s.lon, s.lat], idx))
            .collect(),
    );

    let nearest_min: Vec<&str> = raw_stops
        .par_iter()
        .map(|stop| smallest_id_in_radius(stop, raw_stops, &tree, radius_m))
        .collect();

    // Later records with a repeated id overwrite earlier ones
    let mut stop_id_to_merged: HashMap<String, String> = HashMap::with_capacity(raw_stops.len());
    for (stop, min_id) in raw_stops.iter().zip(&nearest_min) {
        stop_id_to_merged.insert(stop.id.clone(), (*min_id).to_string());
    }

    let mut stops: Vec<CanonicalStop> = Vec::new();
    let mut cluster_index: HashMap<&str, usize> = HashMap::new();

    for stop in raw_stops {
        let Some(canonical) = stop_id_to_merged.get(&stop.id) else {
            continue;
        };
        let canonical = canonical.as_str();
        cluster_index.entry(canonical).or_insert_with(|| {
            stops.push(CanonicalStop {
                id: canonical.to_string(),
                name: stop.name.clone(),
                lat: stop.lat,
                lon: stop.lon,
            });
            stops.len() - 1
        });
    }

    for stop in raw_stops {
        let Some(&idx) = stop_id_to_merged
            .get(&stop.id)
            .and_then(|merged| cluster_index.get(merged.as_str()))
        else {
            continue;
        };
        if stop.name.chars().count() > stops[idx].name.chars().count() {
            stops[idx].name.clone_from(&stop.name);
        }
    }

    debug!(
        "Merged {} raw stops into {} canonical stops",
        raw_stops.len(),
        stops.len()
    );
    drop(cluster_index);

    StopClusters {
        stops,
        stop_id_to_merged,
    }
}

fn smallest_id_in_radius<'a>(
    stop: &'a RawStop,
    raw_stops: &'a [RawStop],
    tree: &RTree<GeomWithData<[f64; 2], usize>>,
    radius_m: f64,
) -> &'a str {
    tree.locate_in_envelope(&search_envelope(stop.lat, stop.lon, radius_m))
        .map(|candidate| &raw_stops[candidate.data])
        .filter(|other| distance_meters(stop.lat, stop.lon, other.lat, other.lon) <= radius_m)
        .map(|other| other.id.as_str())
        .fold(stop.id.as_str(), |best, id| if id < best { id } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Offset in degrees of latitude for a distance in meters
    fn north(meters: f64) -> f64 {
        (meters / crate::distance::EARTH_RADIUS_M).to_degrees()
    }

    fn stop(id: &str, name: &str, lat: f64, lon: f64) -> RawStop {
        RawStop::new(id, name, lat, lon)
    }

    #[test]
    fn close_stops_merge_into_smallest_id() {
        let raw = vec![
            stop("S2", "Pole", 0.0001, 0.0),
            stop("S1", "", 0.0, 0.0),
            stop("S3", "Far", 0.01, 0.0),
        ];
        let clusters = deduplicate_stops(&raw, 20.0);
        assert_eq!(clusters.stop_id_to_merged["S1"], "S1");
        assert_eq!(clusters.stop_id_to_merged["S2"], "S1");
        assert_eq!(clusters.stop_id_to_merged["S3"], "S3");
        assert_eq!(clusters.stops.len(), 2);
        // First member encountered provides the coordinates
        assert_eq!(clusters.stops[0].id, "S1");
        assert_eq!(clusters.stops[0].lat, 0.0001);
    }

    #[test]
    fn longest_name_wins_and_ties_keep_first() {
        let raw = vec![
            stop("A", "Ho", 0.0, 0.0),
            stop("B", "Ho Guom", north(5.0), 0.0),
            stop("C", "Ho Tay!", north(10.0), 0.0),
        ];
        let clusters = deduplicate_stops(&raw, 20.0);
        assert_eq!(clusters.stops.len(), 1);
        assert_eq!(clusters.stops[0].name, "Ho Guom");
    }

    #[test]
    fn line_of_three_stops_maps_to_neighbourhood_minimum() {
        let raw = vec![
            stop("S0", "", 0.0, 0.0),
            stop("S1", "", north(15.0), 0.0),
            stop("S2", "", north(30.0), 0.0),
        ];
        let clusters = deduplicate_stops(&raw, 20.0);
        assert_eq!(clusters.stop_id_to_merged["S0"], "S0");
        assert_eq!(clusters.stop_id_to_merged["S1"], "S0");
        // S0 is 30 m away, so S2 only sees S1
        assert_eq!(clusters.stop_id_to_merged["S2"], "S1");
        let ids: Vec<&str> = clusters.stops.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["S0", "S1"]);
    }

    #[test]
    fn long_chain_never_merges_beyond_radius() {
        let raw: Vec<RawStop> = (0u32..10)
            .map(|i| stop(&format!("s{i}"), "", 21.0 + north(15.0 * f64::from(i)), 105.8))
            .collect();
        let clusters = deduplicate_stops(&raw, 20.0);

        assert_eq!(clusters.stop_id_to_merged["s9"], "s8");
        for s in &raw {
            let merged = &clusters.stop_id_to_merged[&s.id];
            let target = raw.iter().find(|o| &o.id == merged).unwrap();
            assert!(distance_meters(s.lat, s.lon, target.lat, target.lon) <= 20.0);
        }
    }

    #[test]
    fn two_stops_beyond_radius_stay_apart() {
        let raw = vec![stop("A", "", 0.0, 0.0), stop("B", "", north(25.0), 0.0)];
        let clusters = deduplicate_stops(&raw, 20.0);
        assert_eq!(clusters.stop_id_to_merged["A"], "A");
        assert_eq!(clusters.stop_id_to_merged["B"], "B");
    }

    #[test]
    fn clustering_is_not_a_transitive_closure() {
        // "B" sees only "C"; "C" sees "A" and "B"; "A" sees "C". B's neighbourhood
        // minimum is itself, so it stays on its own even though C joins A.
        let raw = vec![
            stop("B", "", 0.0, 0.0),
            stop("C", "", north(12.0), 0.0),
            stop("A", "", north(24.0), 0.0),
        ];
        let clusters = deduplicate_stops(&raw, 20.0);
        assert_eq!(clusters.stop_id_to_merged["B"], "B");
        assert_eq!(clusters.stop_id_to_merged["C"], "A");
        assert_eq!(clusters.stop_id_to_merged["A"], "A");
    }

    #[test]
    fn repeated_raw_ids_across_feeds() {
        let raw = vec![stop("S1", "Short", 0.0, 0.0), stop("S1", "Longer name", 0.0, 0.0)];
        let clusters = deduplicate_stops(&raw, 20.0);
        assert_eq!(clusters.stops.len(), 1);
        assert_eq!(clusters.stops[0].name, "Longer name");
    }

    fn naive_minimum(raw: &[RawStop], stop: &RawStop, radius: f64) -> String {
        raw.iter()
            .filter(|o| distance_meters(stop.lat, stop.lon, o.lat, o.lon) <= radius)
            .map(|o| o.id.clone())
            .fold(stop.id.clone(), |best, id| if id < best { id } else { best })
    }

    proptest! {
        #[test]
        fn matches_naive_scan_and_stays_within_radius(
            offsets in prop::collection::vec((0.0f64..0.0008, 0.0f64..0.0008), 1..40)
        ) {
            let raw: Vec<RawStop> = offsets
                .iter()
                .enumerate()
                .map(|(i, (dlat, dlon))| stop(&format!("s{i:02}"), "", 21.0 + dlat, 105.8 + dlon))
                .collect();
            let tree = RTree::bulk_load(
                raw.iter().enumerate().map(|(i, s)| GeomWithData::new([s.lon, s.lat], i)).collect(),
            );
            let clusters = deduplicate_stops(&raw, 20.0);

            for s in &raw {
                let naive = naive_minimum(&raw, s, 20.0);
                prop_assert_eq!(smallest_id_in_radius(s, &raw, &tree, 20.0), naive.as_str());

                let merged = &clusters.stop_id_to_merged[&s.id];
                prop_assert_eq!(merged, &naive);
                let target = raw.iter().find(|o| &o.id == merged).unwrap();
                prop_assert!(distance_meters(s.lat, s.lon, target.lat, target.lon) <= 20.0);
                prop_assert!(clusters.stops.iter().any(|c| &c.id == merged));
            }
        }
    }
}
