//! Datasource configuration, loadable from a JSON file

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SummaryError};
use crate::ingest::DocumentLocation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Directory watched for summary documents. Created when missing.
    pub dir: PathBuf,
    /// Interval between two scans of `dir`
    pub poll_interval_ms: u64,
    /// Summary URLs ingested once at startup
    pub remote_summaries: Vec<String>,
    /// Upper bound on one remote summary request
    pub fetch_timeout_ms: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./summaries"),
            poll_interval_ms: 500,
            remote_summaries: Vec::new(),
            fetch_timeout_ms: 30_000,
        }
    }
}

impl SummaryConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), ..Default::default() }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SummaryError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: SummaryConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(SummaryError::ConfigError("poll_interval_ms must be positive".into()));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(SummaryError::ConfigError("fetch_timeout_ms must be positive".into()));
        }
        for url in &self.remote_summaries {
            if !matches!(DocumentLocation::parse(url), DocumentLocation::Remote(_)) {
                return Err(SummaryError::ConfigError(format!(
                    "remote summary {} is not an http(s) URL",
                    url
                )));
            }
        }
        Ok(())
    }

    /// `dir` made absolute against the current working directory.
    pub fn resolved_dir(&self) -> Result<PathBuf> {
        if self.dir.is_absolute() {
            Ok(self.dir.clone())
        } else {
            Ok(std::env::current_dir()?.join(&self.dir))
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn remote_locations(&self) -> Vec<DocumentLocation> {
        self.remote_summaries.iter().map(|url| DocumentLocation::parse(url)).collect()
    }
}
