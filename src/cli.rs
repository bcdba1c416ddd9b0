//! Command-line interface definitions.
//!
//! All options are defined with `clap` derive. The only required argument is
//! the path to the URL list; everything else has a sensible default.

use clap::Parser;

/// Command-line arguments for the article collector.
///
/// # Examples
///
/// ```sh
/// # Collect everything listed in urls.txt into articles.txt
/// article_collector urls.txt
///
/// # Name the collection and pick the output file
/// article_collector urls.txt -n "Weekly digest" -o digest.txt
///
/// # Fetch more aggressively, but give up after two minutes
/// article_collector urls.txt -j 8 --deadline-secs 120
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a newline-delimited list of article URLs
    pub urls: String,

    /// Output file for the rendered collection
    #[arg(short, long, default_value = "articles.txt")]
    pub output: String,

    /// Display name of the collection
    #[arg(short = 'n', long, default_value = "Articles")]
    pub collection_name: String,

    /// Export format
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Maximum number of URLs fetched at once
    #[arg(short = 'j', long, default_value_t = 4)]
    pub concurrency: usize,

    /// Stop issuing new fetches after this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,
}
