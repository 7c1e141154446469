//! This module is responsible for loading stop and trip data from feed files or a
//! relational source and building the routable graph.

mod builder;
mod config;
mod dedup;
pub mod gtfs;
#[cfg(feature = "postgres")]
mod pg;
mod relational;
mod transfers;

pub use builder::load_from_feed_files;
pub use config::{DATASET_PATH_ENV, GraphConfig};
pub use dedup::{StopClusters, deduplicate_stops};
pub use relational::{
    EdgeRow, MergeMapRow, MergedStopRow, RelationalSource, TransferRow,
    load_from_relational_source,
};
