//! Plain-text export: table of contents plus full bodies.
//!
//! The export is a pair of strings. The table of contents carries one header
//! line per record; the bodies part repeats the header above each full text,
//! separated by `###` markers. Both open with a fixed section title even for
//! an empty collection, so downstream consumers always find the sections.

use crate::collection::ArticleCollection;
use tracing::info;

const TOC_TITLE: &str = "Table of Contents\n";
const BODIES_TITLE: &str = "Full Texts\n";

/// Render a collection to `(table_of_contents, full_bodies)`.
///
/// Per record the TOC gets `"{source}, {date}, [{author}, ]{headline}"`; the
/// bodies part gets a `###` separator, the same header line, optional
/// `Tags:` and `Annotation:` lines, the article link, the normalized body,
/// and a `Links:` block when any outbound links exist.
pub fn to_text(collection: &ArticleCollection) -> (String, String) {
    if collection.is_empty() {
        info!(collection = collection.name(), "Rendering empty collection");
        return (TOC_TITLE.to_string(), BODIES_TITLE.to_string());
    }

    let mut toc = String::from(TOC_TITLE);
    let mut bodies = String::from(BODIES_TITLE);

    for article in collection {
        let header = article.header_line();
        toc.push_str(&header);
        toc.push('\n');

        bodies.push_str("\n###\n\n");
        bodies.push_str(&header);
        bodies.push('\n');
        if let Some(tags) = article.tags() {
            bodies.push_str("Tags: ");
            bodies.push_str(&tags.join(", "));
            bodies.push('\n');
        }
        if let Some(annotation) = article.annotation() {
            bodies.push_str("Annotation: ");
            bodies.push_str(annotation);
            bodies.push('\n');
        }
        bodies.push_str(article.link());
        bodies.push('\n');
        bodies.push_str(article.body());
        bodies.push('\n');
        if !article.links().is_empty() {
            bodies.push_str("Links:\n");
            bodies.push_str(&article.links().join("\n"));
            bodies.push('\n');
        }
    }

    (toc, bodies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Extra, fixtures};
    use pretty_assertions::assert_eq;

    fn sample_collection() -> ArticleCollection {
        let mut collection = ArticleCollection::new("Weekly digest");
        collection.articles.push(fixtures::article(
            "First story",
            Some("alice"),
            Extra {
                tags: Some(vec!["rust".to_string(), "news".to_string()]),
                annotation: Some("What happened first.".to_string()),
            },
        ));
        collection
            .articles
            .push(fixtures::article("Second story", None, Extra::default()));
        collection
    }

    #[test]
    fn test_empty_collection_yields_titles_only() {
        let collection = ArticleCollection::new("Empty");
        let (toc, bodies) = to_text(&collection);
        assert_eq!(toc, "Table of Contents\n");
        assert_eq!(bodies, "Full Texts\n");
    }

    #[test]
    fn test_toc_round_trips_headers_in_order() {
        let collection = sample_collection();
        let (toc, _bodies) = to_text(&collection);

        let lines: Vec<&str> = toc.lines().skip(1).collect();
        assert_eq!(lines.len(), collection.len());
        for (line, article) in lines.iter().zip(collection.iter()) {
            assert_eq!(*line, article.header_line());
        }
    }

    #[test]
    fn test_body_blocks() {
        let collection = sample_collection();
        let (_toc, bodies) = to_text(&collection);

        assert_eq!(bodies.matches("\n###\n\n").count(), 2);
        assert!(bodies.contains("Tags: rust, news\n"));
        assert!(bodies.contains("Annotation: What happened first.\n"));
        assert!(bodies.contains("https://habr.com/ru/articles/First story/\nBody text.\n"));
        // The second record has no tags, annotation or links.
        let second = bodies.split("\n###\n\n").nth(2).unwrap();
        assert!(!second.contains("Tags:"));
        assert!(!second.contains("Annotation:"));
        assert!(!second.contains("Links:"));
    }

    #[test]
    fn test_links_block_present_when_links_exist() {
        let mut collection = ArticleCollection::new("Feed");
        let mut article = fixtures::article("Linked", None, Extra::default());
        article.links = vec![
            "https://example.org/a".to_string(),
            "https://example.org/b".to_string(),
        ];
        collection.articles.push(article);

        let (_toc, bodies) = to_text(&collection);
        assert!(bodies.contains("Links:\nhttps://example.org/a\nhttps://example.org/b\n"));
    }
}
