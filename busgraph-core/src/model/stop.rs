//! Stop records before and after deduplication

use geo::Point;
use serde::Serialize;

/// One stop row as read from a feed, possibly duplicating another physical pole
#[derive(Debug, Clone, PartialEq)]
pub struct RawStop {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl RawStop {
    /// Creates a raw stop; an empty name falls back to the stop id
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        let id = id.into();
        let mut name = name.into();
        if name.is_empty() {
            name.clone_from(&id);
        }
        Self { id, name, lat, lon }
    }
}

/// Representative stop of a cluster of raw stops
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalStop {
    #[serde(rename = "stopId")]
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl CanonicalStop {
    /// Stop location as a `geo` point (x = lon, y = lat)
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl From<&RawStop> for CanonicalStop {
    fn from(stop: &RawStop) -> Self {
        Self {
            id: stop.id.clone(),
            name: stop.name.clone(),
            lat: stop.lat,
            lon: stop.lon,
        }
    }
}
