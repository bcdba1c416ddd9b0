//! Export renderers for article collections.
//!
//! Formats are dispatched by name through [`render`]; only the plain-text
//! renderer ([`text`]) exists today. An unknown format name is a reported,
//! non-fatal error that yields no output.

pub mod text;

use crate::collection::ArticleCollection;
use crate::error::CollectError;

/// Render a collection in the named format.
///
/// # Errors
///
/// [`CollectError::UnknownFormat`] for any name other than `"text"`/`"txt"`.
pub fn render(
    collection: &ArticleCollection,
    format: &str,
) -> Result<(String, String), CollectError> {
    match format {
        "text" | "txt" => Ok(text::to_text(collection)),
        other => Err(CollectError::UnknownFormat {
            format: other.to_string(),
        }),
    }
}
