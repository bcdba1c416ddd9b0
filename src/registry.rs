//! Hostname-based site resolution.
//!
//! Maps an article URL to the [`SiteKind`] responsible for it. The hostname
//! is pulled out of the URL with a deliberately tolerant pattern: the scheme
//! is optional, one leading `www.` label is stripped, and the rest must be a
//! dot-separated domain ending in a TLD of at least two characters.
//! Registered keys are exact-match hostnames; a subdomain that is not
//! registered as-is resolves to nothing.

use crate::error::CollectError;
use crate::sites::SiteKind;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static HOST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?([\w-]+(?:\.[\w-]+)*\.[A-Za-z]{2,})(?:[/?#]|$)").unwrap()
});

/// Extract the registrable hostname from a URL, if one can be parsed.
///
/// Also used by the batch loader to group URLs for per-host politeness
/// limits, which is why it is exposed separately from [`resolve`].
pub fn host_of(url: &str) -> Option<&str> {
    HOST_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Resolve a URL to the adapter responsible for its host.
///
/// # Errors
///
/// [`CollectError::UnsupportedSite`] when no hostname can be parsed or the
/// hostname is not registered. Callers log and skip; this is never fatal.
pub fn resolve(url: &str) -> Result<SiteKind, CollectError> {
    let unsupported = || CollectError::UnsupportedSite {
        url: url.to_string(),
    };
    let host = host_of(url).ok_or_else(unsupported)?;
    let kind = SiteKind::for_host(host).ok_or_else(unsupported)?;
    debug!(%url, host, site = kind.profile().name, "Resolved URL to site adapter");
    Ok(kind)
}
