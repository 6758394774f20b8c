//! `listing-crawler [CONFIG_PATH]`
//!
//! Loads configuration (defaults, optional file, `LISTING_CRAWLER__*` env),
//! crawls, and writes the collection when anything was scraped.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use listing_crawler::infrastructure::{init_logging_with_config, CollectionWriter, ConfigManager, HttpClient};
use listing_crawler::{CrawlScheduler, WorkerOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = ConfigManager::new(config_path)
        .load()
        .context("Failed to load configuration")?;

    init_logging_with_config(&config.logging)?;
    info!(
        "Crawling {} pages with {} workers (min price {})",
        config.crawl.max_page, config.crawl.worker_count, config.crawl.min_price
    );

    let http_client = Arc::new(HttpClient::new(config.http.clone())?);
    let scheduler = CrawlScheduler::from_config(&config, http_client)?;
    let report = scheduler.run().await?;

    for worker in report.workers() {
        if let WorkerOutcome::Failed { reason } = &worker.outcome {
            warn!(
                "Worker {} lost pages {:?}: {}",
                worker.range.worker_index(),
                worker.range.pages(),
                reason
            );
        }
    }
    for (reason, count) in report.skip_summary() {
        info!("Skipped {}: {}", reason, count);
    }

    if report.is_empty() {
        println!("No data was scraped.");
        return Ok(());
    }

    let writer = CollectionWriter::new(&config.output);
    writer.write(report.records()).await?;
    println!("Detailed data saved to '{}'.", writer.path().display());
    println!("Total data scraped: {}", report.records().len());
    Ok(())
}
