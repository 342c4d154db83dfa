//! Polling watcher over the summaries directory.
//!
//! Every poll walks the directory tree and schedules an ingestion task for
//! each file not seen before. Hidden files and directories are ignored.
//! Changed or deleted files are not re-ingested.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, error, info, warn};
use regex::Regex;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use crate::error::{Result, SummaryError};
use crate::ingest::fetch::DocumentLocation;
use crate::ingest::pipeline::IngestionPipeline;

/// Matches any path component starting with a dot.
const HIDDEN: &str = r"(^|[/\\])\.";

pub struct DirectoryWatcher {
    dir: PathBuf,
    interval: Duration,
    hidden: Regex,
}

impl DirectoryWatcher {
    pub fn new(dir: impl Into<PathBuf>, interval: Duration) -> Result<Self> {
        let hidden = Regex::new(HIDDEN).map_err(|e| SummaryError::Other(e.to_string()))?;
        Ok(Self { dir: dir.into(), interval, hidden })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether `path` is hidden relative to the watched directory.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.dir).unwrap_or(path);
        self.hidden.is_match(&relative.to_string_lossy())
    }

    /// Files under the directory not yet in `seen`, in path order. Adds them to `seen`.
    ///
    /// Fails only when the watched directory itself is missing. Unreadable
    /// subdirectories are skipped and retried on the next scan.
    pub async fn scan(&self, seen: &mut HashSet<PathBuf>) -> Result<Vec<PathBuf>> {
        tokio::fs::metadata(&self.dir).await?;
        let found = self.walk(vec![self.dir.clone()], seen).await;
        seen.extend(found.iter().cloned());
        debug!("Scan of {} found {} new summaries", self.dir.display(), found.len());
        Ok(found)
    }

    /// New files below `pending`, sorted.
    async fn walk(&self, mut pending: Vec<PathBuf>, seen: &HashSet<PathBuf>) -> Vec<PathBuf> {
        let mut found = Vec::new();
        while let Some(dir) = pending.pop() {
            if let Err(err) = self.list(&dir, seen, &mut pending, &mut found).await {
                warn!("Skipping unreadable directory {}: {}", dir.display(), err);
            }
        }
        found.sort();
        found
    }

    async fn list(
        &self,
        dir: &Path,
        seen: &HashSet<PathBuf>,
        pending: &mut Vec<PathBuf>,
        found: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if self.is_ignored(&path) {
                continue;
            }
            if entry.file_type().await?.is_dir() {
                pending.push(path);
            } else if !seen.contains(&path) {
                found.push(path);
            }
        }
        Ok(())
    }

    /// Starts watching. `initial` documents are scheduled before the first poll.
    pub fn spawn(
        self,
        pipeline: IngestionPipeline,
        initial: Vec<DocumentLocation>,
    ) -> WatcherHandle {
        let (shutdown, stop) = watch::channel(false);
        let task = tokio::spawn(self.run(pipeline, initial, stop));
        WatcherHandle { shutdown, task }
    }

    async fn run(
        self,
        pipeline: IngestionPipeline,
        initial: Vec<DocumentLocation>,
        mut stop: watch::Receiver<bool>,
    ) {
        info!("Watching {}", self.dir.display());
        let mut tasks = JoinSet::new();
        let mut seen = HashSet::new();
        let mut ticker = tokio::time::interval(self.interval);

        for location in initial {
            schedule(&mut tasks, &pipeline, location);
        }

        loop {
            tokio::select! {
                _ = stop.changed() => break,
                _ = ticker.tick() => match self.scan(&mut seen).await {
                    Ok(paths) => {
                        for path in paths {
                            schedule(&mut tasks, &pipeline, DocumentLocation::File(path));
                        }
                    }
                    Err(err) => warn!("Cannot scan {}: {}", self.dir.display(), err),
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => report(joined),
            }
        }

        // Let scheduled documents finish so no store mutation outlives the watcher.
        while let Some(joined) = tasks.join_next().await {
            report(joined);
        }
        info!("Stopped watching {}", self.dir.display());
    }
}

fn schedule(
    tasks: &mut JoinSet<Result<()>>,
    pipeline: &IngestionPipeline,
    location: DocumentLocation,
) {
    let pipeline = pipeline.clone();
    tasks.spawn(async move { pipeline.ingest(&location).await.map(|_| ()) });
}

fn report(joined: std::result::Result<Result<()>, tokio::task::JoinError>) {
    // Ingestion errors are already logged and published by the pipeline.
    if let Err(err) = joined {
        error!("Ingestion task failed: {}", err);
    }
}

/// Handle to a running watcher.
pub struct WatcherHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    /// Stops scheduling new documents and waits for in-flight ones to finish.
    pub async fn stop(self) -> Result<()> {
        let _ = self.shutdown.send(true);
        self.task.await?;
        Ok(())
    }
}
