//! Turns the filter descriptors of one summary graph into membership filters.
//!
//! A descriptor is spread over two resources of the summary graph:
//!
//! ```text
//! <#capability> ds:predicate <http://purl.org/dc/terms/title> ;
//!               ds:objFilter <#filter> .
//! <#filter> amf:bits 1024 ; amf:hashes 7 ; amf:filter "base64…" .
//! ```
//!
//! Descriptors missing any field, or carrying values that cannot be decoded,
//! are skipped without aborting the rest of the build.

use log::{debug, info, warn};
use oxigraph::model::{GraphName, NamedNode, NamedNodeRef, Term};

use crate::error::{Result, SummaryError};
use crate::filter::index::FilterIndex;
use crate::filter::membership::MembershipFilter;
use crate::store::{QuadStore, StatementPattern};
use crate::vocab::{amf, ds};

/// Outcome of building the filters of one summary graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// `ds:objFilter` links found in the graph
    pub descriptors: usize,
    /// Filters published to the index
    pub filters: usize,
    /// Index version after publishing
    pub version: u64,
}

/// A membership filter and the predicate it summarizes.
pub type DescribedFilter = (NamedNode, MembershipFilter);

pub struct FilterIndexBuilder<'a> {
    store: &'a QuadStore,
}

impl<'a> FilterIndexBuilder<'a> {
    pub fn new(store: &'a QuadStore) -> Self {
        Self { store }
    }

    /// Collects every fully resolved `(predicate, filter)` pair of `source`.
    pub fn collect(&self, source: &NamedNode) -> Result<(usize, Vec<DescribedFilter>)> {
        let graph = GraphName::NamedNode(source.clone());
        let links = self.store.find_statements(
            &StatementPattern::any()
                .with_predicate(ds::OBJ_FILTER.into_owned())
                .in_graph(graph.clone()),
        )?;
        debug!("Found {} filter descriptors in {}", links.len(), source);

        let mut filters = Vec::with_capacity(links.len());
        for link in &links {
            let capability = Term::from(link.subject.clone());
            match self.resolve(&capability, &link.object, &graph) {
                Ok(Some(entry)) => filters.push(entry),
                Ok(None) => {
                    debug!("Skipping incomplete filter descriptor {} in {}", link.object, source)
                }
                Err(err) => {
                    warn!("Skipping filter descriptor {} in {}: {}", link.object, source, err)
                }
            }
        }
        Ok((links.len(), filters))
    }

    /// Rebuilds the index entries of `source` from its summary graph.
    pub fn build(&self, source: &NamedNode, index: &FilterIndex) -> Result<BuildReport> {
        let (descriptors, filters) = self.collect(source)?;
        let built = filters.len();
        let version = index.replace_source(source, filters);
        info!(
            "Stored {} of {} filters for {} (index version {})",
            built, descriptors, source, version
        );
        Ok(BuildReport { descriptors, filters: built, version })
    }

    fn resolve(
        &self,
        capability: &Term,
        descriptor: &Term,
        graph: &GraphName,
    ) -> Result<Option<DescribedFilter>> {
        let Some(bits) = self.store.first_object(descriptor, amf::BITS, graph)? else {
            return Ok(None);
        };
        let bits: usize = parse_integer(&bits, amf::BITS)?;

        let Some(hashes) = self.store.first_object(descriptor, amf::HASHES, graph)? else {
            return Ok(None);
        };
        let hashes: u32 = parse_integer(&hashes, amf::HASHES)?;

        let Some(encoded) = self.store.first_object(descriptor, amf::FILTER, graph)? else {
            return Ok(None);
        };
        let filter = MembershipFilter::from_base64(bits, hashes, lexical_value(&encoded))?;

        let Some(predicate) = self.store.first_object(capability, ds::PREDICATE, graph)? else {
            return Ok(None);
        };
        match predicate {
            Term::NamedNode(predicate) => Ok(Some((predicate, filter))),
            other => Err(SummaryError::InvalidFilter(format!(
                "summarized predicate must be an IRI, got {}",
                other
            ))),
        }
    }
}

fn lexical_value(term: &Term) -> &str {
    match term {
        Term::Literal(literal) => literal.value(),
        Term::NamedNode(node) => node.as_str(),
        Term::BlankNode(node) => node.as_str(),
        #[allow(unreachable_patterns)]
        _ => "",
    }
}

fn parse_integer<T: std::str::FromStr>(term: &Term, property: NamedNodeRef<'_>) -> Result<T> {
    let value = lexical_value(term).trim();
    value.parse().map_err(|_| {
        SummaryError::InvalidFilter(format!("{} is not a valid integer for {}", value, property))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::Literal;

    #[test]
    fn test_parse_integer_accepts_typed_and_plain_literals() {
        let typed = Term::from(Literal::from(1024));
        let plain = Term::from(Literal::new_simple_literal(" 7 "));
        assert_eq!(parse_integer::<usize>(&typed, amf::BITS).unwrap(), 1024);
        assert_eq!(parse_integer::<u32>(&plain, amf::HASHES).unwrap(), 7);
    }

    #[test]
    fn test_parse_integer_rejects_garbage() {
        let bad = Term::from(Literal::new_simple_literal("many"));
        let err = parse_integer::<usize>(&bad, amf::BITS).unwrap_err();
        assert!(matches!(err, SummaryError::InvalidFilter(_)));
    }
}
