//! Summary ingestion: fetching, parsing and watching the summaries directory

pub mod fetch;
pub mod pipeline;
pub mod watcher;

pub use fetch::{DocumentFetcher, DocumentLocation, FetchedDocument, ACCEPT};
pub use pipeline::{IngestionPipeline, SummaryEvent};
pub use watcher::{DirectoryWatcher, WatcherHandle};
