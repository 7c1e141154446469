//! Command line frontend for the `busgraph_core` transit graph engine

pub mod commands;
pub mod config;

pub use busgraph_core::prelude;
pub use busgraph_core::{Error, loading, model, routing, store};
