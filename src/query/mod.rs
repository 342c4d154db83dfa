//! Triple-pattern query resolution with source selection

pub mod engine;
pub mod pattern;

pub use engine::{QueryEngine, QueryMetadata, QueryOutcome};
pub use pattern::{parse_iri, parse_term, Feature, TriplePatternQuery};
