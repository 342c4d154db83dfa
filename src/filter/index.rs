//! Source-selection index: predicate → source graph → membership filter.
//!
//! Readers work on immutable [`FilterSnapshot`]s. Writers replace the entries
//! of one source graph at a time under a write lock and publish a new snapshot,
//! so summaries that finish ingesting concurrently never discard each other's
//! filters.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use oxigraph::model::NamedNode;

use crate::filter::membership::MembershipFilter;

/// The filter one source graph published for one predicate.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    pub source: NamedNode,
    pub filter: MembershipFilter,
}

type SourceFilters = BTreeMap<String, Arc<SourceFilter>>;

#[derive(Debug, Clone, Default)]
pub struct FilterSnapshot {
    version: u64,
    by_predicate: BTreeMap<String, SourceFilters>,
}

impl FilterSnapshot {
    /// Incremented on every published change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of (predicate, source) entries.
    pub fn len(&self) -> usize {
        self.by_predicate.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_predicate.is_empty()
    }

    pub fn predicates(&self) -> impl Iterator<Item = &str> {
        self.by_predicate.keys().map(String::as_str)
    }

    pub fn get(&self, predicate: &str, source: &str) -> Option<&MembershipFilter> {
        self.by_predicate.get(predicate)?.get(source).map(|entry| &entry.filter)
    }

    /// Sources registered for `predicate`, in index order.
    pub fn sources_for(&self, predicate: &str) -> Vec<&NamedNode> {
        self.by_predicate
            .get(predicate)
            .map(|sources| sources.values().map(|entry| &entry.source).collect())
            .unwrap_or_default()
    }

    /// Sources whose filter may contain `value`, each reported once.
    ///
    /// With `predicate` set only that predicate's filters are tested,
    /// otherwise every predicate in the index is.
    pub fn find_sources(&self, value: &str, predicate: Option<&str>) -> Vec<NamedNode> {
        let selected: Vec<&SourceFilters> = match predicate {
            Some(predicate) => self.by_predicate.get(predicate).into_iter().collect(),
            None => self.by_predicate.values().collect(),
        };

        let mut sources: Vec<NamedNode> = Vec::new();
        for entries in selected {
            for entry in entries.values() {
                if entry.filter.may_contain(value.as_bytes())
                    && !sources.iter().any(|known| known == &entry.source)
                {
                    sources.push(entry.source.clone());
                }
            }
        }
        sources
    }

    fn without_source(&self, source: &str) -> BTreeMap<String, SourceFilters> {
        let mut by_predicate = self.by_predicate.clone();
        by_predicate.retain(|_, sources| {
            sources.remove(source);
            !sources.is_empty()
        });
        by_predicate
    }
}

/// Shared, versioned filter index.
#[derive(Debug, Default)]
pub struct FilterIndex {
    current: RwLock<Arc<FilterSnapshot>>,
}

impl FilterIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest published snapshot. Later writes never affect it.
    pub fn snapshot(&self) -> Arc<FilterSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replaces every entry of `source` with `filters` and returns the new version.
    pub fn replace_source(
        &self,
        source: &NamedNode,
        filters: Vec<(NamedNode, MembershipFilter)>,
    ) -> u64 {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut by_predicate = current.without_source(source.as_str());
        for (predicate, filter) in filters {
            by_predicate.entry(predicate.into_string()).or_default().insert(
                source.as_str().to_owned(),
                Arc::new(SourceFilter { source: source.clone(), filter }),
            );
        }
        let version = current.version + 1;
        *current = Arc::new(FilterSnapshot { version, by_predicate });
        version
    }

    /// Drops every entry of `source` and returns the new version.
    pub fn remove_source(&self, source: &NamedNode) -> u64 {
        self.replace_source(source, Vec::new())
    }
}
