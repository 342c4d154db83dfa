//! Error types for summary ingestion, index building and querying

use thiserror::Error;

/// Result type alias for summary index operations
pub type Result<T> = std::result::Result<T, SummaryError>;

/// Main error type for the summary index
#[derive(Error, Debug)]
pub enum SummaryError {
    /// Parse error when reading a summary document
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A summary document could not be retrieved
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// Quad store error
    #[error("Store error: {0}")]
    StoreError(String),

    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// A filter descriptor could not be turned into a membership filter
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Query resolution error
    #[error("Query error: {0}")]
    QueryError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<oxigraph::store::StorageError> for SummaryError {
    fn from(err: oxigraph::store::StorageError) -> Self {
        SummaryError::StoreError(err.to_string())
    }
}

impl From<oxigraph::io::RdfParseError> for SummaryError {
    fn from(err: oxigraph::io::RdfParseError) -> Self {
        SummaryError::ParseError(err.to_string())
    }
}

impl From<oxigraph::model::IriParseError> for SummaryError {
    fn from(err: oxigraph::model::IriParseError) -> Self {
        SummaryError::InvalidIri(err.to_string())
    }
}

impl From<std::io::Error> for SummaryError {
    fn from(err: std::io::Error) -> Self {
        SummaryError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for SummaryError {
    fn from(err: serde_json::Error) -> Self {
        SummaryError::ConfigError(err.to_string())
    }
}

impl From<reqwest::Error> for SummaryError {
    fn from(err: reqwest::Error) -> Self {
        SummaryError::FetchError(err.to_string())
    }
}

impl From<base64::DecodeError> for SummaryError {
    fn from(err: base64::DecodeError) -> Self {
        SummaryError::InvalidFilter(format!("filter is not valid base64: {}", err))
    }
}

impl From<tokio::task::JoinError> for SummaryError {
    fn from(err: tokio::task::JoinError) -> Self {
        SummaryError::Other(format!("background task failed: {}", err))
    }
}
