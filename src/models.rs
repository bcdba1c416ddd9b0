//! Data model for extracted articles.
//!
//! An [`Article`] is the structured output of one successful extraction run:
//! either every required field is populated, or the extraction failed as a
//! unit and no record exists. Records are immutable once built — the fields
//! are crate-private and only accessor methods are public, so a record can
//! never be partially updated after construction.

use chrono::{DateTime, FixedOffset};

/// Rendering format for published timestamps everywhere they are displayed.
pub const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Site-specific optional fields, present only when the site exposes them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extra {
    pub tags: Option<Vec<String>>,
    pub annotation: Option<String>,
}

/// One fully extracted article.
#[derive(Debug)]
pub struct Article {
    /// Display source, `"{site name} ({hostname})"`.
    pub(crate) source: String,
    /// Publication timestamp in the site's own fixed offset.
    pub(crate) published: DateTime<FixedOffset>,
    /// Author, when the site's model has one.
    pub(crate) author: Option<String>,
    pub(crate) headline: String,
    /// The canonical URL the article was fetched from.
    pub(crate) link: String,
    /// Normalized plain-text body, no HTML.
    pub(crate) body: String,
    /// Outbound links in document order, percent-decoded.
    pub(crate) links: Vec<String>,
    pub(crate) extra: Extra,
}

impl Article {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The publication timestamp rendered as `DD.MM.YYYY HH:MM`.
    pub fn published(&self) -> String {
        self.published.format(DATE_FORMAT).to_string()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.extra.tags.as_deref()
    }

    pub fn annotation(&self) -> Option<&str> {
        self.extra.annotation.as_deref()
    }

    /// The header line shared by the table of contents and the body export:
    /// `"{source}, {date}, [{author}, ]{headline}"`.
    pub fn header_line(&self) -> String {
        match &self.author {
            Some(author) => format!(
                "{}, {}, {}, {}",
                self.source,
                self.published(),
                author,
                self.headline
            ),
            None => format!("{}, {}, {}", self.source, self.published(), self.headline),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_format() {
        let art = fixtures::article("one", None, Extra::default());
        assert_eq!(art.published(), "13.01.2023 10:30");
    }

    #[test]
    fn test_header_line_with_author() {
        let art = fixtures::article("Big news", Some("alice"), Extra::default());
        assert_eq!(
            art.header_line(),
            "Habr (habr.com), 13.01.2023 10:30, alice, Big news"
        );
    }

    #[test]
    fn test_header_line_without_author() {
        let art = fixtures::article("Big news", None, Extra::default());
        assert_eq!(art.header_line(), "Habr (habr.com), 13.01.2023 10:30, Big news");
    }

    #[test]
    fn test_extra_accessors() {
        let art = fixtures::article(
            "tagged",
            None,
            Extra {
                tags: Some(vec!["rust".to_string()]),
                annotation: Some("short".to_string()),
            },
        );
        assert_eq!(art.tags(), Some(&["rust".to_string()][..]));
        assert_eq!(art.annotation(), Some("short"));
    }
}
