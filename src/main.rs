//! # Article Collector
//!
//! Collects articles from a fixed set of supported news/blog sites and
//! renders them into a flat textual export: a table of contents followed by
//! the full bodies.
//!
//! ## Usage
//!
//! ```sh
//! article_collector urls.txt -n "Weekly digest" -o digest.txt
//! ```
//!
//! ## Architecture
//!
//! The pipeline per URL:
//! 1. **Resolution**: map the URL's hostname to a site adapter
//! 2. **Loading**: one HTTP GET, permissive HTML parse, main-content isolation
//! 3. **Extraction**: date, author, headline, normalized body, extra fields
//! 4. **Aggregation**: append the record to the collection in input order
//!
//! URLs are processed concurrently with per-process and per-host limits;
//! failed URLs are logged and skipped, never aborting the batch.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod collection;
mod error;
mod loader;
mod models;
mod normalize;
mod outputs;
mod registry;
mod sites;

use cli::Cli;
use collection::{ArticleCollection, BatchOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    info!(urls = %args.urls, output = %args.output, "article_collector starting up");

    let options = BatchOptions {
        concurrency: args.concurrency,
        deadline: args.deadline_secs.map(Duration::from_secs),
        ..BatchOptions::default()
    };

    let mut collection = ArticleCollection::new(&args.collection_name);
    let added = collection.load_from_urls(&args.urls, &options).await;
    info!(added, total = collection.len(), "Collection loaded");

    match outputs::render(&collection, &args.format) {
        Ok((toc, bodies)) => {
            let export = format!("{}\n\n{}\n{}", collection.name(), toc, bodies);
            if let Err(e) = tokio::fs::write(&args.output, export).await {
                error!(path = %args.output, error = %e, "Failed writing export");
            } else {
                info!(path = %args.output, "Wrote collection export");
            }
        }
        Err(e) => warn!(error = %e, "Export failed; nothing written"),
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");

    Ok(())
}
