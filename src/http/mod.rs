//! HTTP API module for the summary index
//!
//! Provides REST endpoints for:
//! - Triple-pattern fragments, including source selection
//! - Supported query features
//! - Health and index status

pub mod server;

pub use server::{
    create_server, start_server, AppState, ErrorResponse, FeaturesResponse, FragmentParams,
    FragmentResponse, HealthResponse, TripleDto,
};
