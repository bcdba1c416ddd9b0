//! Document loading: HTTP fetch plus main-content isolation.
//!
//! One GET per article with a fixed timeout and a realistic desktop browser
//! `User-Agent` (several of the supported sites reject default client
//! identifiers). Timeouts and non-success statuses map to distinct
//! [`CollectError`] variants so the batch loader can log them precisely; both
//! are fatal for the single article only.
//!
//! The response body is parsed permissively with [`scraper`], and the
//! adapter's [`Locator`] isolates the article's main-content subtree from the
//! page chrome. A locator that matches nothing means the site-specific rules
//! no longer fit the site's current markup — that is a configuration defect
//! and panics loudly rather than being skipped.

use crate::error::CollectError;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Browser-like identity sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Fixed per-request timeout.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// How an adapter locates its article's main-content subtree.
#[derive(Debug, Clone, Copy)]
pub enum Locator {
    /// A tag name with an optional attribute filter, e.g. `article` or `main`.
    Tag {
        name: &'static str,
        attr: Option<(&'static str, &'static str)>,
    },
    /// A structural CSS selector; the first match wins.
    Css(&'static str),
}

impl Locator {
    /// Compile the locator to a selector.
    ///
    /// Locators are static adapter configuration, so an invalid one is a
    /// programming defect and panics.
    pub fn selector(&self) -> Selector {
        let css = match self {
            Locator::Tag { name, attr: None } => (*name).to_string(),
            Locator::Tag {
                name,
                attr: Some((key, value)),
            } => format!("{name}[{key}=\"{value}\"]"),
            Locator::Css(css) => (*css).to_string(),
        };
        Selector::parse(&css)
            .unwrap_or_else(|e| panic!("invalid main-content locator {self:?}: {e}"))
    }
}

/// Build the shared HTTP client with the fixed timeout and browser identity.
pub fn client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .unwrap_or_else(|e| panic!("HTTP client configuration rejected: {e}"))
}

/// Fetch raw HTML for one article URL.
///
/// # Errors
///
/// * [`CollectError::Timeout`] when the request exceeds [`FETCH_TIMEOUT`]
/// * [`CollectError::HttpStatus`] for any non-2xx answer
/// * [`CollectError::Fetch`] for other transport failures
#[instrument(level = "debug", skip(client))]
pub async fn fetch_html(client: &Client, url: &str) -> Result<String, CollectError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_transport(url, e))?;

    let status = response.status();
    if !status.is_success() {
        error!(%url, status = status.as_u16(), "Fetch answered with an error status");
        return Err(CollectError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| classify_transport(url, e))?;
    debug!(%url, bytes = body.len(), "Fetched article HTML");
    Ok(body)
}

fn classify_transport(url: &str, e: reqwest::Error) -> CollectError {
    if e.is_timeout() {
        error!(%url, "Fetch timed out");
        CollectError::Timeout {
            url: url.to_string(),
        }
    } else {
        error!(%url, error = %e, "Fetch failed");
        CollectError::Fetch {
            url: url.to_string(),
            source: e,
        }
    }
}

/// Isolate the main-content subtree of a parsed document.
///
/// # Panics
///
/// When the locator matches nothing. The locator is static configuration:
/// no match means the site changed its markup and the adapter must be fixed,
/// not that this page should be silently skipped.
pub fn main_content<'a>(doc: &'a Html, locator: &Locator) -> ElementRef<'a> {
    let selector = locator.selector();
    doc.select(&selector).next().unwrap_or_else(|| {
        panic!("main-content locator {locator:?} matched nothing; the site layout has changed")
    })
}
