//! Data model for the routable stop graph
//!
//! Contains stop records and the immutable graph snapshot queries run against.

pub mod graph;
pub mod query;
pub mod stop;

pub use graph::{Edge, GraphState};
pub(crate) use graph::GraphBuilder;
pub use query::{BoundingBox, StopQuery};
pub use stop::{CanonicalStop, RawStop};
