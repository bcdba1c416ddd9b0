//! Error taxonomy for collecting and exporting articles.
//!
//! Every failure mode that can occur while resolving, fetching, extracting or
//! exporting is a [`CollectError`] variant. Transport- and resolution-level
//! failures are caught at the per-URL boundary in the batch loader and turned
//! into a logged skip; they never abort a batch. A main-content locator that
//! matches nothing is a configuration defect and panics instead of producing
//! an error value (see [`crate::loader::main_content`]).

use thiserror::Error;

/// All recoverable failure conditions of the collector.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The URL's hostname is not in the site registry, or no hostname could
    /// be parsed at all.
    #[error("no supported source for {url}")]
    UnsupportedSite { url: String },

    /// The HTTP request exceeded the fetch timeout.
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    /// The server answered with a non-success status code.
    #[error("{url} answered with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    /// Any other transport failure (connect error, broken body, ...).
    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The URL list file could not be read.
    #[error("cannot read URL list {path}")]
    InputFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An export format name nothing is registered for.
    #[error("unknown export format {format:?}")]
    UnknownFormat { format: String },

    /// A node the site's model guarantees was absent on this page.
    #[error("{what} not found on {url}")]
    MissingNode { url: String, what: &'static str },

    /// A date string did not match the site's native format.
    #[error("cannot parse date {raw:?} on {url}")]
    BadDate { url: String, raw: String },
}

impl CollectError {
    /// Returns true if this is a fetch timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CollectError::Timeout { .. })
    }

    /// Returns true if this is a non-success HTTP status.
    pub fn is_http_status(&self) -> bool {
        matches!(self, CollectError::HttpStatus { .. })
    }

    /// Returns true if the URL's host is simply not supported.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CollectError::UnsupportedSite { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let e = CollectError::HttpStatus {
            url: "https://habr.com/x".to_string(),
            status: 404,
        };
        let msg = e.to_string();
        assert!(msg.contains("https://habr.com/x"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn test_kind_helpers() {
        let t = CollectError::Timeout {
            url: "https://tass.ru/a".to_string(),
        };
        assert!(t.is_timeout());
        assert!(!t.is_http_status());
        assert!(!t.is_unsupported());

        let u = CollectError::UnsupportedSite {
            url: "https://example.com/a".to_string(),
        };
        assert!(u.is_unsupported());
    }
}
