use std::sync::Arc;

use log::{info, warn};
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{GraphName, NamedNode, Quad};
use tokio::sync::broadcast;

use crate::error::Result;
use crate::filter::{FilterIndex, FilterIndexBuilder};
use crate::ingest::fetch::{DocumentFetcher, DocumentLocation};
use crate::store::QuadStore;
use crate::vocab::{ds, rdf};

/// Capacity of the summary event channel.
const EVENT_CAPACITY: usize = 256;

/// Signals published for every summary document the pipeline processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryEvent {
    /// The summary is fully loaded and its filters are queryable.
    Added { graph: NamedNode, statements: usize, filters: usize },
    /// The summary could not be fetched or parsed.
    Failed { location: String, error: String },
}

/// Loads summary documents into the quad store and publishes their filters.
///
/// Cloning is cheap; clones share store, index and event channel.
#[derive(Clone)]
pub struct IngestionPipeline {
    store: QuadStore,
    index: Arc<FilterIndex>,
    fetcher: DocumentFetcher,
    events: broadcast::Sender<SummaryEvent>,
}

impl IngestionPipeline {
    pub fn new(store: QuadStore, index: Arc<FilterIndex>, fetcher: DocumentFetcher) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, index, fetcher, events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SummaryEvent> {
        self.events.subscribe()
    }

    /// Ingests one summary document and returns its graph.
    ///
    /// The outcome is also published as a [`SummaryEvent`]. On failure the
    /// completion statement is not written and no filters are published;
    /// statements parsed before the error stay in the store.
    pub async fn ingest(&self, location: &DocumentLocation) -> Result<NamedNode> {
        info!("Adding {} to store", location);
        match self.load(location).await {
            Ok((graph, statements, filters)) => {
                let _ = self.events.send(SummaryEvent::Added {
                    graph: graph.clone(),
                    statements,
                    filters,
                });
                Ok(graph)
            }
            Err(err) => {
                warn!("Failed to ingest {}: {}", location, err);
                let _ = self.events.send(SummaryEvent::Failed {
                    location: location.to_string(),
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn load(&self, location: &DocumentLocation) -> Result<(NamedNode, usize, usize)> {
        let graph = location.graph_name()?;
        let document = self.fetcher.fetch(location).await?;

        let store = self.store.clone();
        let index = Arc::clone(&self.index);
        let target = graph.clone();
        let (statements, filters) = tokio::task::spawn_blocking(move || {
            let statements = parse_into(&store, &target, document.format, &document.body)?;
            store.add_statement(&Quad::new(
                target.clone(),
                rdf::TYPE.into_owned(),
                ds::SUMMARY.into_owned(),
                GraphName::NamedNode(target.clone()),
            ))?;
            info!("Storing filters of {}", target);
            let report = FilterIndexBuilder::new(&store).build(&target, &index)?;
            Ok::<_, crate::error::SummaryError>((statements, report.filters))
        })
        .await??;

        Ok((graph, statements, filters))
    }
}

/// Parses `body` and adds every statement to `graph`. Returns the number of parsed statements.
fn parse_into(
    store: &QuadStore,
    graph: &NamedNode,
    format: RdfFormat,
    body: &[u8],
) -> Result<usize> {
    let parser = RdfParser::from_format(format)
        .with_base_iri(graph.as_str())?
        .rename_blank_nodes();
    let graph_name = GraphName::NamedNode(graph.clone());

    let mut statements = 0;
    for quad in parser.for_reader(body) {
        let quad = quad?;
        store.add_statement(&Quad::new(
            quad.subject,
            quad.predicate,
            quad.object,
            graph_name.clone(),
        ))?;
        statements += 1;
    }
    Ok(statements)
}
