//! Resolution of triple-pattern queries against the quad store and the filter index.

use std::sync::Arc;

use oxigraph::model::{NamedNode, Term, Triple};
use serde::Serialize;

use crate::error::Result;
use crate::filter::FilterIndex;
use crate::query::pattern::TriplePatternQuery;
use crate::store::{QuadStore, StatementPattern};
use crate::vocab::dct;

/// Count metadata reported with every result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryMetadata {
    pub total_count: usize,
    /// `false` when the count comes from probabilistic source selection.
    pub has_exact_count: bool,
}

/// One page of matching triples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub triples: Vec<Triple>,
    pub metadata: QueryMetadata,
}

/// Read-only query engine. Never mutates the store or the index.
#[derive(Clone)]
pub struct QueryEngine {
    store: QuadStore,
    index: Arc<FilterIndex>,
}

impl QueryEngine {
    pub fn new(store: QuadStore, index: Arc<FilterIndex>) -> Self {
        Self { store, index }
    }

    pub fn execute(&self, query: &TriplePatternQuery) -> Result<QueryOutcome> {
        let (start, end) = page_bounds(query.offset, query.limit);
        match query.source_selection_subject() {
            Some(subject) => Ok(self.select_sources(subject, query, start, end)),
            None => self.match_statements(query, start, end),
        }
    }

    /// `(subject, dct:isPartOf, source)` for every source whose filters may
    /// contain the subject.
    fn select_sources(
        &self,
        subject: &Term,
        query: &TriplePatternQuery,
        start: usize,
        end: usize,
    ) -> QueryOutcome {
        let value = match subject {
            Term::NamedNode(node) => node.as_str(),
            Term::BlankNode(node) => node.as_str(),
            // literals cannot be the subject of a statement
            _ => return paginate(Vec::new(), start, end, false),
        };

        let restriction = query
            .source_predicate
            .as_ref()
            .filter(|predicate| predicate.as_ref() != dct::IS_PART_OF)
            .map(NamedNode::as_str);

        let triples = self
            .index
            .snapshot()
            .find_sources(value, restriction)
            .into_iter()
            .filter(|source| match &query.object {
                Some(object) => matches!(object, Term::NamedNode(node) if node == source),
                None => true,
            })
            .filter_map(|source| part_of(subject, source))
            .collect();

        paginate(triples, start, end, false)
    }

    fn match_statements(
        &self,
        query: &TriplePatternQuery,
        start: usize,
        end: usize,
    ) -> Result<QueryOutcome> {
        let pattern = StatementPattern {
            subject: query.subject.clone(),
            predicate: query.predicate.clone(),
            object: query.object.clone(),
            graph: None,
        };

        let mut total_count = 0;
        let mut triples = Vec::new();
        self.store.for_each_matching(&pattern, |quad| {
            if total_count >= start && total_count < end {
                triples.push(Triple::new(quad.subject, quad.predicate, quad.object));
            }
            total_count += 1;
            true
        })?;

        Ok(QueryOutcome {
            triples,
            metadata: QueryMetadata { total_count, has_exact_count: true },
        })
    }
}

fn part_of(subject: &Term, source: NamedNode) -> Option<Triple> {
    let predicate = dct::IS_PART_OF.into_owned();
    match subject {
        Term::NamedNode(node) => Some(Triple::new(node.clone(), predicate, source)),
        Term::BlankNode(node) => Some(Triple::new(node.clone(), predicate, source)),
        _ => None,
    }
}

/// Half-open range of match positions to emit.
fn page_bounds(offset: usize, limit: Option<usize>) -> (usize, usize) {
    let end = limit.map_or(usize::MAX, |limit| offset.saturating_add(limit));
    (offset, end)
}

fn paginate(
    matches: Vec<Triple>,
    start: usize,
    end: usize,
    has_exact_count: bool,
) -> QueryOutcome {
    let total_count = matches.len();
    let triples = matches
        .into_iter()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect();
    QueryOutcome { triples, metadata: QueryMetadata { total_count, has_exact_count } }
}
