use std::sync::{Arc, Mutex, PoisonError};

use log::{info, warn};
use tokio::sync::broadcast;

use crate::config::SummaryConfig;
use crate::datasource::Datasource;
use crate::error::Result;
use crate::filter::{FilterIndex, FilterSnapshot};
use crate::ingest::{
    DirectoryWatcher, DocumentFetcher, IngestionPipeline, SummaryEvent, WatcherHandle,
};
use crate::query::{Feature, QueryEngine, QueryOutcome, TriplePatternQuery};
use crate::store::QuadStore;

const FEATURES: &[Feature] = &[Feature::TriplePattern, Feature::Limit, Feature::Offset];

/// Answers triple patterns over ingested summaries, and `dct:isPartOf`
/// patterns through the summaries' membership filters.
pub struct SummaryDatasource {
    config: SummaryConfig,
    store: QuadStore,
    index: Arc<FilterIndex>,
    pipeline: IngestionPipeline,
    engine: QueryEngine,
    watcher: Mutex<Option<WatcherHandle>>,
}

impl SummaryDatasource {
    pub fn new(config: SummaryConfig) -> Result<Self> {
        config.validate()?;
        let store = QuadStore::new()?;
        let index = Arc::new(FilterIndex::new());
        let fetcher = DocumentFetcher::new(config.fetch_timeout())?;
        let pipeline = IngestionPipeline::new(store.clone(), Arc::clone(&index), fetcher);
        let engine = QueryEngine::new(store.clone(), Arc::clone(&index));
        Ok(Self { config, store, index, pipeline, engine, watcher: Mutex::new(None) })
    }

    /// Ingestion events. Subscribe before [`Datasource::initialize`] to observe
    /// summaries that are already in the directory.
    pub fn subscribe(&self) -> broadcast::Receiver<SummaryEvent> {
        self.pipeline.subscribe()
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    pub fn store(&self) -> &QuadStore {
        &self.store
    }

    /// Current filter index snapshot.
    pub fn filters(&self) -> Arc<FilterSnapshot> {
        self.index.snapshot()
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

impl Datasource for SummaryDatasource {
    fn supported_features(&self) -> &'static [Feature] {
        FEATURES
    }

    async fn initialize(&self) -> Result<()> {
        let dir = self.config.resolved_dir()?;
        if !tokio::fs::try_exists(&dir).await? {
            info!("Creating summaries directory {}", dir.display());
            tokio::fs::create_dir_all(&dir).await?;
        }

        // Held from the check to the store so concurrent calls start one watcher.
        let mut slot = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            warn!("Summary datasource is already initialized");
            return Ok(());
        }
        let watcher = DirectoryWatcher::new(dir, self.config.poll_interval())?;
        *slot = Some(watcher.spawn(self.pipeline.clone(), self.config.remote_locations()));
        Ok(())
    }

    fn execute_query(&self, query: &TriplePatternQuery) -> Result<QueryOutcome> {
        self.engine.execute(query)
    }

    async fn close(&self) -> Result<()> {
        let handle = self.watcher.lock().unwrap_or_else(PoisonError::into_inner).take();
        match handle {
            Some(handle) => handle.stop().await,
            None => Ok(()),
        }
    }
}
