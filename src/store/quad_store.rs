use oxigraph::model::{GraphName, NamedNode, NamedNodeRef, Quad, QuadRef, Term, TermRef};
use oxigraph::store::Store;

use crate::error::Result;

/// A quad template. `None` fields act as wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementPattern {
    pub subject: Option<Term>,
    pub predicate: Option<NamedNode>,
    pub object: Option<Term>,
    pub graph: Option<GraphName>,
}

impl StatementPattern {
    /// Pattern matching every statement in every graph.
    pub fn any() -> Self {
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

    pub fn in_graph(mut self, graph: impl Into<GraphName>) -> Self {
        self.graph = Some(graph.into());
        self
    }
}

/// In-memory quad store backed by Oxigraph.
///
/// Cloning is cheap: clones share the same underlying store.
#[derive(Clone)]
pub struct QuadStore {
    store: Store,
}

impl QuadStore {
    pub fn new() -> Result<Self> {
        Ok(Self { store: Store::new()? })
    }

    /// Adds a statement. Returns `false` if it was already present.
    pub fn add_statement<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool> {
        let quad = quad.into();
        if self.store.contains(quad)? {
            return Ok(false);
        }
        self.store.insert(quad)?;
        Ok(true)
    }

    pub fn contains<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool> {
        Ok(self.store.contains(quad)?)
    }

    /// Collects every statement matching `pattern`, in the store's enumeration order.
    pub fn find_statements(&self, pattern: &StatementPattern) -> Result<Vec<Quad>> {
        let mut found = Vec::new();
        self.for_each_matching(pattern, |quad| {
            found.push(quad);
            true
        })?;
        Ok(found)
    }

    /// Visits every statement matching `pattern` until the visitor returns `false`.
    ///
    /// A literal subject can never match and yields no visits.
    pub fn for_each_matching<F>(&self, pattern: &StatementPattern, mut visitor: F) -> Result<()>
    where
        F: FnMut(Quad) -> bool,
    {
        let subject = match pattern.subject.as_ref().map(Term::as_ref) {
            None => None,
            Some(TermRef::NamedNode(node)) => Some(node.into()),
            Some(TermRef::BlankNode(node)) => Some(node.into()),
            Some(_) => return Ok(()),
        };

        let quads = self.store.quads_for_pattern(
            subject,
            pattern.predicate.as_ref().map(NamedNode::as_ref),
            pattern.object.as_ref().map(Term::as_ref),
            pattern.graph.as_ref().map(GraphName::as_ref),
        );

        for quad in quads {
            if !visitor(quad?) {
                break;
            }
        }
        Ok(())
    }

    /// Object of the first `(subject, predicate, ?, graph)` statement, if any.
    pub fn first_object(
        &self,
        subject: &Term,
        predicate: NamedNodeRef<'_>,
        graph: &GraphName,
    ) -> Result<Option<Term>> {
        let pattern = StatementPattern::any()
            .with_subject(subject.clone())
            .with_predicate(predicate.into_owned())
            .in_graph(graph.clone());

        let mut object = None;
        self.for_each_matching(&pattern, |quad| {
            object = Some(quad.object);
            false
        })?;
        Ok(object)
    }

    /// Number of statements across all graphs.
    pub fn len(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.store.is_empty()?)
    }
}
