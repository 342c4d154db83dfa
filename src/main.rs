//! Summary Index - source selection over linked-data summaries
//!
//! Starts the HTTP API over a watched summaries directory.
//!
//! Usage:
//!   cargo run -- --dir ./summaries --host 0.0.0.0 --port 3000

use clap::Parser;
use log::{error, info};
use std::{path::PathBuf, sync::Arc};
use summary_index::{http::start_server, Datasource, SummaryConfig, SummaryDatasource};

#[derive(Parser, Debug)]
#[command(name = "Summary Index")]
#[command(about = "Bloom-filter source selection over linked-data summaries", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Summaries directory, overrides the configuration file
    #[arg(short, long)]
    dir: Option<PathBuf>,

    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, default_value = "3000")]
    port: u16,

    #[arg(long)]
    poll_interval_ms: Option<u64>,

    #[arg(long)]
    fetch_timeout_ms: Option<u64>,

    /// Remote summary URL, may be repeated
    #[arg(long = "remote")]
    remote_summaries: Vec<String>,
}

impl Args {
    fn into_config(self) -> summary_index::Result<(SummaryConfig, String)> {
        let mut config = match &self.config {
            Some(path) => SummaryConfig::from_file(path)?,
            None => SummaryConfig::default(),
        };
        if let Some(dir) = self.dir {
            config.dir = dir;
        }
        if let Some(interval) = self.poll_interval_ms {
            config.poll_interval_ms = interval;
        }
        if let Some(timeout) = self.fetch_timeout_ms {
            config.fetch_timeout_ms = timeout;
        }
        config.remote_summaries.extend(self.remote_summaries);
        config.validate()?;
        Ok((config, format!("{}:{}", self.host, self.port)))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let (config, addr) = Args::parse().into_config()?;
    info!("Watching summaries in {}", config.dir.display());

    let datasource = Arc::new(SummaryDatasource::new(config)?);
    datasource.initialize().await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for CTRL+C: {}", e);
        }
        info!("Shutdown signal received, stopping server...");
    };

    let served = start_server(&addr, Arc::clone(&datasource), shutdown_signal).await;
    datasource.close().await?;
    served?;

    info!("Server shut down gracefully");
    Ok(())
}
