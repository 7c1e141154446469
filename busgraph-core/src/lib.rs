//! Transit graph engine for bus route finding.
//!
//! Builds an in-memory routable graph from GTFS-like feed files (or a
//! pre-materialized relational source), merges physically coincident
//! stops, synthesizes walking transfers and answers fastest and
//! fewest-stops queries between stops.

pub mod distance;
mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod store;

pub use error::Error;

/// Dense index of a canonical stop inside a [`model::GraphState`]
pub type StopIdx = usize;
/// Interned route identifier inside a [`model::GraphState`]
pub type RouteIdx = usize;
/// Duration in seconds
pub type Seconds = u32;

/// Cost added when a path leaves the route it is riding for another route or a walk
pub const TRANSFER_PENALTY: Seconds = 300;
/// Lower bound for transfer edges coming from a relational transfer table
pub const MIN_TRANSFER_TIME: Seconds = 60;
/// Raw stops closer than this are merged into one canonical stop
pub const MERGE_RADIUS_M: f64 = 20.0;
/// Canonical stops closer than this get a walking transfer
pub const TRANSFER_RADIUS_M: f64 = 300.0;
/// Walking speed used for synthesized transfers
pub const WALKING_SPEED_MPS: f64 = 1.2;
