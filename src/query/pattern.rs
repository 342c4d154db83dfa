use std::str::FromStr;

use oxigraph::model::{NamedNode, Term};

use crate::error::{Result, SummaryError};
use crate::vocab::dct;

/// Declared query features of the summary datasource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    TriplePattern,
    Limit,
    Offset,
}

/// A triple pattern with paging, as received from the host server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriplePatternQuery {
    pub subject: Option<Term>,
    pub predicate: Option<NamedNode>,
    pub object: Option<Term>,
    pub offset: usize,
    /// `None` means unbounded.
    pub limit: Option<usize>,
    /// Restricts source selection to the filters of one summarized predicate.
    pub source_predicate: Option<NamedNode>,
}

impl TriplePatternQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: impl Into<Term>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_predicate(mut self, predicate: impl Into<NamedNode>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    pub fn with_object(mut self, object: impl Into<Term>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_source_predicate(mut self, predicate: impl Into<NamedNode>) -> Self {
        self.source_predicate = Some(predicate.into());
        self
    }

    /// Features this query relies on.
    pub fn features(&self) -> Vec<Feature> {
        let mut features = vec![Feature::TriplePattern];
        if self.limit.is_some() {
            features.push(Feature::Limit);
        }
        if self.offset > 0 {
            features.push(Feature::Offset);
        }
        features
    }

    /// The subject whose sources are requested, when the pattern is
    /// `(subject, dct:isPartOf, ?)`.
    pub fn source_selection_subject(&self) -> Option<&Term> {
        match (&self.subject, &self.predicate) {
            (Some(subject), Some(predicate)) if predicate.as_ref() == dct::IS_PART_OF => {
                Some(subject)
            }
            _ => None,
        }
    }
}

/// Parses a pattern term. Accepts N-Triples syntax (`<iri>`, `"literal"`,
/// `_:id`) or a bare IRI. Empty input is an unbound position.
pub fn parse_term(value: &str) -> Result<Option<Term>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.starts_with('<') || value.starts_with('"') || value.starts_with("_:") {
        return Term::from_str(value)
            .map(Some)
            .map_err(|e| SummaryError::QueryError(format!("invalid term {}: {}", value, e)));
    }
    Ok(Some(Term::NamedNode(parse_iri(value)?)))
}

/// Parses an IRI given bare or between angle brackets.
pub fn parse_iri(value: &str) -> Result<NamedNode> {
    let value = value.trim();
    let iri = value
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(value);
    NamedNode::new(iri)
        .map_err(|e| SummaryError::QueryError(format!("invalid IRI {}: {}", value, e)))
}
