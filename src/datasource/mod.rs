//! Datasource contract consumed by a hosting query server, and the summary
//! datasource implementing it.

pub mod summary;

pub use summary::SummaryDatasource;

use crate::error::Result;
use crate::query::{Feature, QueryOutcome, TriplePatternQuery};

/// Capability interface a hosting server drives a datasource through.
#[allow(async_fn_in_trait)]
pub trait Datasource {
    /// Query features this datasource can evaluate.
    fn supported_features(&self) -> &'static [Feature];

    /// Whether every feature `query` relies on is supported.
    fn supports(&self, query: &TriplePatternQuery) -> bool {
        let supported = self.supported_features();
        query.features().iter().all(|feature| supported.contains(feature))
    }

    /// Prepares the datasource. Queries issued before it completes see an empty store.
    async fn initialize(&self) -> Result<()>;

    /// Evaluates one triple-pattern query.
    fn execute_query(&self, query: &TriplePatternQuery) -> Result<QueryOutcome>;

    /// Releases background resources once pending work has finished.
    async fn close(&self) -> Result<()>;
}
