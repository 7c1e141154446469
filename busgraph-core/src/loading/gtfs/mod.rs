//! Reading raw GTFS feed files for graph construction

mod parser;
mod processor;
mod raw_types;

pub use parser::{deserialize_gtfs_file, parse_time};
pub(crate) use processor::{add_ride_edges, load_feed_data};
pub use raw_types::{FeedStop, FeedStopTime, FeedTrip, StopVisit};
