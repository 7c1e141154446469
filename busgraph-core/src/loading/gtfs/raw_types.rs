use serde::Deserialize;

use super::parser::{parse_leading_digits, parse_time};
use crate::model::RawStop;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeedStop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: String,
    pub stop_lon: String,
}

impl FeedStop {
    /// Validated stop, `None` when the id is missing or a coordinate is not a finite number
    pub fn into_raw_stop(self) -> Option<RawStop> {
        if self.stop_id.is_empty() {
            return None;
        }
        let lat = self.stop_lat.parse::<f64>().ok().filter(|v| v.is_finite())?;
        let lon = self.stop_lon.parse::<f64>().ok().filter(|v| v.is_finite())?;
        Some(RawStop::new(self.stop_id, self.stop_name, lat, lon))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeedTrip {
    pub route_id: String,
    pub trip_id: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedStopTime {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: String,
}

/// One validated visit of a trip at a stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopVisit {
    pub stop_id: String,
    pub sequence: u32,
    /// Seconds since midnight
    pub arrival: u32,
    /// Seconds since midnight
    pub departure: u32,
}

impl FeedStopTime {
    /// Splits the row into its trip id and visit, `None` when trip or stop is missing
    pub fn into_visit(self) -> Option<(String, StopVisit)> {
        if self.trip_id.is_empty() || self.stop_id.is_empty() {
            return None;
        }
        let visit = StopVisit {
            sequence: parse_leading_digits(&self.stop_sequence),
            arrival: parse_time(&self.arrival_time),
            departure: parse_time(&self.departure_time),
            stop_id: self.stop_id,
        };
        Some((self.trip_id, visit))
    }
}
