//! # Summary Index
//!
//! A source-selection datasource for linked-data query federation. It ingests
//! summary documents describing remote RDF sources, keeps their statements in
//! an in-memory quad store, and answers `(subject, dct:isPartOf, ?)` patterns
//! by testing the subject against each summary's Bloom filters.
//!
//! ## Features
//!
//! - Directory watching and remote summary ingestion
//! - Bloom filters compatible with the `bloem` bit layout
//! - Triple-pattern fragments with offset and limit
//!
//! ## Example
//!
//! ```rust
//! use summary_index::query::TriplePatternQuery;
//! use summary_index::vocab::dct;
//!
//! let query = TriplePatternQuery::new()
//!     .with_subject(oxigraph::model::NamedNode::new_unchecked("http://schema.org/Book"))
//!     .with_predicate(dct::IS_PART_OF.into_owned());
//! assert!(query.source_selection_subject().is_some());
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::new_without_default)]
#![allow(clippy::needless_pass_by_value)]

/// Datasource configuration
pub mod config;

/// Datasource capability contract and the summary datasource
pub mod datasource;

pub mod error;

/// Membership filters and the per-source filter index
pub mod filter;

pub mod http;

/// Summary fetching, parsing and directory watching
pub mod ingest;

/// Triple-pattern queries and their evaluation
pub mod query;

/// In-memory quad store
pub mod store;

pub mod vocab;

// Re-export commonly used types
pub use config::SummaryConfig;
pub use datasource::{Datasource, SummaryDatasource};
pub use error::{Result, SummaryError};
