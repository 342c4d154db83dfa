//! Exact quad store holding every ingested summary statement

pub mod quad_store;

pub use quad_store::{QuadStore, StatementPattern};
