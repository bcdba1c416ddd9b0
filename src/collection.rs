//! The article collection and its bulk loader.
//!
//! An [`ArticleCollection`] is an ordered set of records plus a display name.
//! It only grows through bulk loading: each URL runs the full per-URL
//! pipeline, failures are logged and skipped, and the batch always completes
//! — partial success is the normal case, not an anomaly.
//!
//! Fetching is concurrent but polite: a per-process limit caps how many URLs
//! are in flight at once ([`futures::stream::StreamExt::buffered`], which
//! also keeps append order equal to input order), and a per-host semaphore
//! keeps bursts away from any single site. An optional batch deadline stops
//! issuing new fetches once passed while letting in-flight ones finish.

use crate::error::CollectError;
use crate::loader;
use crate::models::Article;
use crate::registry;
use crate::sites;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::ops::Index;
use std::slice;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument, warn};

/// Tuning knobs for one bulk load.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Per-process cap on URLs in flight at once.
    pub concurrency: usize,
    /// Cap on simultaneous fetches against one host.
    pub per_host: usize,
    /// Overall deadline; once passed, no new fetches are issued.
    pub deadline: Option<Duration>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            concurrency: 4,
            per_host: 2,
            deadline: None,
        }
    }
}

/// An ordered, append-only collection of extracted articles.
#[derive(Debug)]
pub struct ArticleCollection {
    name: String,
    pub(crate) articles: Vec<Article>,
}

impl ArticleCollection {
    pub fn new(name: impl Into<String>) -> Self {
        ArticleCollection {
            name: name.into(),
            articles: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Article> {
        self.articles.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Article> {
        self.articles.iter()
    }

    /// Load articles from a newline-delimited URL list file.
    ///
    /// Lines are trimmed; blank lines are dropped. An unreadable file is a
    /// fatal condition for this call only: it is logged and the collection is
    /// left untouched (zero added), the process keeps running.
    ///
    /// # Returns
    ///
    /// The number of records appended.
    #[instrument(level = "info", skip(self, options), fields(collection = %self.name))]
    pub async fn load_from_urls(&mut self, path: &str, options: &BatchOptions) -> usize {
        let urls = match read_url_list(path).await {
            Ok(urls) => urls,
            Err(e) => {
                error!(error = %e, "URL list unavailable; nothing loaded");
                return 0;
            }
        };
        self.load_from_list(&urls, options).await
    }

    /// Fetch and extract every URL, appending successful records in input
    /// order. Skipped URLs (unsupported host, transport failure, extraction
    /// fault) are logged and contribute nothing; the batch never aborts.
    ///
    /// # Returns
    ///
    /// The number of records appended.
    pub async fn load_from_list(&mut self, urls: &[String], options: &BatchOptions) -> usize {
        if urls.is_empty() {
            info!(collection = %self.name, "Empty URL list; nothing to load");
            return 0;
        }

        let client = loader::client();
        let gates = host_gates(urls, options.per_host.max(1));
        let cutoff = options.deadline.map(|d| Instant::now() + d);

        let results: Vec<Option<Article>> = stream::iter(urls.iter())
            .map(|url| {
                let client = &client;
                let gates = &gates;
                async move {
                    if let Some(cutoff) = cutoff {
                        if Instant::now() >= cutoff {
                            warn!(%url, "Batch deadline passed; not fetching");
                            return None;
                        }
                    }
                    let _permit = match registry::host_of(url).and_then(|h| gates.get(h)) {
                        Some(gate) => gate.acquire().await.ok(),
                        None => None,
                    };
                    match sites::extract_article(client, url).await {
                        Ok(article) => {
                            debug!(%url, headline = %article.headline(), "Extracted article");
                            Some(article)
                        }
                        Err(e) => {
                            warn!(%url, error = %e, "Skipping URL");
                            None
                        }
                    }
                }
            })
            // buffered (not buffer_unordered) keeps append order = input order.
            .buffered(options.concurrency.max(1))
            .collect()
            .await;

        let before = self.articles.len();
        self.articles.extend(results.into_iter().flatten());
        let added = self.articles.len() - before;
        info!(
            collection = %self.name,
            supplied = urls.len(),
            added,
            skipped = urls.len() - added,
            "Batch load complete"
        );
        added
    }
}

impl Index<usize> for ArticleCollection {
    type Output = Article;

    fn index(&self, index: usize) -> &Article {
        &self.articles[index]
    }
}

impl<'a> IntoIterator for &'a ArticleCollection {
    type Item = &'a Article;
    type IntoIter = slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

async fn read_url_list(path: &str) -> Result<Vec<String>, CollectError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CollectError::InputFile {
            path: path.to_string(),
            source: e,
        })?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// One politeness gate per distinct host in the batch.
fn host_gates(urls: &[String], per_host: usize) -> HashMap<String, Arc<Semaphore>> {
    let mut gates = HashMap::new();
    for url in urls {
        if let Some(host) = registry::host_of(url) {
            gates
                .entry(host.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(per_host)));
        }
    }
    gates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Extra, fixtures};
    use std::io::Write;

    #[test]
    fn test_collection_access() {
        let mut collection = ArticleCollection::new("Feed");
        assert!(collection.is_empty());
        collection.articles.push(fixtures::article("one", None, Extra::default()));
        collection.articles.push(fixtures::article("two", None, Extra::default()));

        assert_eq!(collection.len(), 2);
        assert_eq!(collection[0].headline(), "one");
        assert_eq!(collection.get(1).unwrap().headline(), "two");
        assert!(collection.get(2).is_none());
        let headlines: Vec<&str> = collection.iter().map(|a| a.headline()).collect();
        assert_eq!(headlines, ["one", "two"]);
    }

    #[tokio::test]
    async fn test_missing_input_file_adds_nothing() {
        let mut collection = ArticleCollection::new("Feed");
        let added = collection
            .load_from_urls("/definitely/not/there.txt", &BatchOptions::default())
            .await;
        assert_eq!(added, 0);
        assert!(collection.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_urls_are_skipped_not_fatal() {
        let mut collection = ArticleCollection::new("Feed");
        let urls = vec![
            "https://example.com/article".to_string(),
            "complete garbage".to_string(),
        ];
        let added = collection.load_from_list(&urls, &BatchOptions::default()).await;
        assert_eq!(added, 0);
        assert!(collection.is_empty());
    }

    #[tokio::test]
    async fn test_empty_list_loads_nothing() {
        let mut collection = ArticleCollection::new("Feed");
        assert_eq!(
            collection.load_from_list(&[], &BatchOptions::default()).await,
            0
        );
    }

    #[tokio::test]
    async fn test_url_list_lines_trimmed_and_blanks_dropped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  https://example.com/one  ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "https://example.com/two").unwrap();

        let urls = read_url_list(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(
            urls,
            ["https://example.com/one", "https://example.com/two"]
        );
    }

    #[test]
    fn test_host_gates_one_per_distinct_host() {
        let urls = vec![
            "https://habr.com/a".to_string(),
            "https://habr.com/b".to_string(),
            "https://tass.ru/c".to_string(),
            "garbage".to_string(),
        ];
        let gates = host_gates(&urls, 2);
        assert_eq!(gates.len(), 2);
        assert!(gates.contains_key("habr.com"));
        assert!(gates.contains_key("tass.ru"));
    }
}
