//! Great-circle distances and the spatial envelopes used to pre-filter them.

use rstar::AABB;

/// Earth radius used by every distance computation in the engine
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two (lat, lon) pairs given in degrees.
///
/// NaN inputs propagate to a NaN result; validating coordinates is up to the caller.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Lon/lat box guaranteed to contain every point within `radius_m` of (lat, lon).
///
/// Points are stored as `[lon, lat]` in the R-trees. The box is a superset of the
/// haversine disc, so an exact distance check on the candidates gives the same answer
/// as a scan over all points.
pub(crate) fn search_envelope(lat: f64, lon: f64, radius_m: f64) -> AABB<[f64; 2]> {
    const SLACK_DEG: f64 = 1e-9;

    let angular = radius_m / EARTH_RADIUS_M;
    let d_lat = angular.to_degrees() + SLACK_DEG;

    // hav(d) >= cos(lat1) * cos(lat2) * hav(d_lon), both latitudes lie within the band
    let max_abs_lat = (lat.abs() + d_lat).min(90.0);
    let cos_min = max_abs_lat.to_radians().cos();
    let sin_half = (angular / 2.0).sin();

    let (min_lon, max_lon) = if cos_min <= sin_half {
        (f64::MIN, f64::MAX)
    } else {
        let d_lon = (2.0 * (sin_half / cos_min).asin()).to_degrees() + SLACK_DEG;
        if lon - d_lon < -180.0 || lon + d_lon > 180.0 {
            // Window wraps the antimeridian
            (f64::MIN, f64::MAX)
        } else {
            (lon - d_lon, lon + d_lon)
        }
    };

    AABB::from_corners([min_lon, lat - d_lat], [max_lon, lat + d_lat])
}
