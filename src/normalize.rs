//! Shared text normalization for article bodies.
//!
//! Every site encodes the same logical article differently: different
//! containers, markup for code blocks and lists, inline ad blocks,
//! cross-reference widgets. This module is the shared fold that turns the
//! direct children of a site's body root into one uniform plain-text block
//! plus an ordered outbound-link list, so that every adapter's output obeys
//! the same whitespace invariants regardless of source markup.
//!
//! # Algorithm
//!
//! For each child node in document order:
//!
//! 1. Descendant links are rewritten while flattening: the target URL is
//!    percent-decoded, pushed onto the link accumulator, and appended in
//!    parentheses to the link's visible text so it survives the flattening.
//! 2. Explicit `<br>` runs inside running text fold to a single newline; a
//!    `<br>` that *is* the child is dropped outright.
//! 3. The site's classification table maps the child to a [`Rule`] which
//!    decides the framing (preformatted, heading, list, paragraph, or a
//!    site-built custom block).
//!
//! Afterwards the assembled text is trimmed, carriage-return artifacts are
//! normalized and any run of three or more newlines collapses to exactly two.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Node};
use std::borrow::Cow;

/// Rendering rule for one direct child of a body root.
///
/// Returned by the per-site classification closure passed to
/// [`normalize_children`]. `Custom` carries an already-rendered block; its
/// builder is responsible for recording any links it consumed.
#[derive(Debug)]
pub enum Rule {
    /// Emit nothing for this child.
    Skip,
    /// Raw text with internal whitespace preserved, framed `\n` ... `\n\n`.
    Preformatted,
    /// Stripped text framed `\n` ... `\n\n`.
    Heading,
    /// `"* "`-prefixed list items, newline-separated, two trailing newlines.
    List,
    /// Stripped text followed by one newline; textless children emit nothing.
    Paragraph,
    /// A site-specific block, emitted verbatim.
    Custom(String),
}

/// The normalizer's output: uniform plain text plus outbound links in
/// document order (percent-decoded, duplicates permitted).
#[derive(Debug, PartialEq, Eq)]
pub struct NormalizedBody {
    pub text: String,
    pub links: Vec<String>,
}

static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Fold the direct children of `root` into a [`NormalizedBody`].
///
/// `classify` is the site's classification table: it receives each child
/// element (and the link accumulator, for [`Rule::Custom`] builders) and
/// decides how the child is rendered. Bare text nodes at the top level are
/// treated like paragraphs.
pub fn normalize_children<F>(root: ElementRef<'_>, mut classify: F) -> NormalizedBody
where
    F: FnMut(ElementRef<'_>, &mut Vec<String>) -> Rule,
{
    let mut text = String::new();
    let mut links = Vec::new();

    for node in root.children() {
        if let Some(el) = ElementRef::wrap(node) {
            // A break as the child's own node type is dropped outright.
            if el.value().name() == "br" {
                continue;
            }
            match classify(el, &mut links) {
                Rule::Skip => {}
                Rule::Preformatted => {
                    let raw = annotated_text(el, &mut links, false);
                    text.push('\n');
                    text.push_str(&raw);
                    text.push_str("\n\n");
                }
                Rule::Heading => {
                    let t = annotated_text(el, &mut links, true);
                    if !t.is_empty() {
                        text.push('\n');
                        text.push_str(&t);
                        text.push_str("\n\n");
                    }
                }
                Rule::List => {
                    let items = list_items(el, &mut links);
                    if !items.is_empty() {
                        text.push('\n');
                        for item in items {
                            text.push_str("* ");
                            text.push_str(&item);
                            text.push('\n');
                        }
                        text.push('\n');
                    }
                }
                Rule::Paragraph => {
                    let t = annotated_text(el, &mut links, true);
                    if !t.is_empty() {
                        text.push_str(&t);
                        text.push('\n');
                    }
                }
                Rule::Custom(block) => text.push_str(&block),
            }
        } else if let Node::Text(t) = node.value() {
            let t = t.trim();
            if !t.is_empty() {
                text.push_str(t);
                text.push('\n');
            }
        }
    }

    NormalizedBody {
        text: collapse(&text),
        links,
    }
}

/// Flatten an element to text, annotating links and folding `<br>` runs.
///
/// With `strip`, surrounding whitespace is trimmed (headings, paragraphs);
/// without it internal whitespace survives untouched (code blocks).
pub fn annotated_text(el: ElementRef<'_>, links: &mut Vec<String>, strip: bool) -> String {
    let mut out = String::new();
    let mut last_was_break = false;
    emit_into(el, links, &mut out, &mut last_was_break);
    if strip { out.trim().to_string() } else { out }
}

fn emit_into(
    el: ElementRef<'_>,
    links: &mut Vec<String>,
    out: &mut String,
    last_was_break: &mut bool,
) {
    for node in el.children() {
        if let Some(child) = ElementRef::wrap(node) {
            match child.value().name() {
                "br" => {
                    // A break right after another break collapses away.
                    if !*last_was_break {
                        out.push('\n');
                    }
                    *last_was_break = true;
                }
                "a" => {
                    let inner = child.text().collect::<String>();
                    let inner = inner.trim();
                    match child.value().attr("href") {
                        Some(href) => {
                            let decoded = decode_url(href);
                            links.push(decoded.clone());
                            out.push_str(inner);
                            out.push_str(&format!(" ({decoded})"));
                        }
                        None => out.push_str(inner),
                    }
                    *last_was_break = false;
                }
                _ => emit_into(child, links, out, last_was_break),
            }
        } else if let Node::Text(t) = node.value() {
            out.push_str(t);
            if !t.trim().is_empty() {
                *last_was_break = false;
            }
        }
    }
}

/// Render the `<li>` children of a list element, links annotated, each item
/// trimmed. Empty items are dropped.
fn list_items(el: ElementRef<'_>, links: &mut Vec<String>) -> Vec<String> {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(|li| li.value().name() == "li")
        .map(|li| annotated_text(li, links, true))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Percent-decode a URL, falling back to the raw string on invalid UTF-8.
pub fn decode_url(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Stripped, non-empty descendant text segments of an element, in document
/// order. Used for tag lists and short label blocks.
pub fn text_items(el: ElementRef<'_>) -> Vec<String> {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Final whitespace collapse: CR artifacts become plain newlines, the block
/// is trimmed, and any run of three or more newlines shrinks to exactly two.
fn collapse(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    NEWLINE_RUN.replace_all(text.trim(), "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::{Html, Selector};

    fn default_rules(el: ElementRef<'_>, _links: &mut Vec<String>) -> Rule {
        match el.value().name() {
            "pre" | "code" => Rule::Preformatted,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Rule::Heading,
            "ol" | "ul" => Rule::List,
            _ => Rule::Paragraph,
        }
    }

    fn normalize_fixture(body: &str) -> NormalizedBody {
        let html = format!("<html><body><div id=\"root\">{body}</div></body></html>");
        let doc = Html::parse_document(&html);
        let sel = Selector::parse("#root").unwrap();
        let root = doc.select(&sel).next().unwrap();
        normalize_children(root, default_rules)
    }

    #[test]
    fn test_paragraphs_and_heading_framing() {
        let out = normalize_fixture("<p>First.</p><h2>Section</h2><p>Second.</p>");
        assert_eq!(out.text, "First.\n\nSection\n\nSecond.");
        assert!(out.links.is_empty());
    }

    #[test]
    fn test_list_items_prefixed() {
        let out = normalize_fixture("<p>Intro</p><ul><li>one</li><li>two</li></ul>");
        assert_eq!(out.text, "Intro\n\n* one\n* two");
    }

    #[test]
    fn test_preformatted_keeps_inner_whitespace() {
        let out = normalize_fixture("<p>Code:</p><pre>fn main() {\n    run();\n}</pre>");
        assert!(out.text.contains("fn main() {\n    run();\n}"));
        assert!(!out.text.contains("\n\n\n"));
    }

    #[test]
    fn test_link_rewriting_and_decoding() {
        let out = normalize_fixture(
            "<p>See <a href=\"https://habr.com/%D1%81%D1%82%D0%B0%D1%82%D1%8C%D1%8F\">the post</a>.</p>",
        );
        assert_eq!(out.links, vec!["https://habr.com/статья".to_string()]);
        assert!(out.text.contains("the post (https://habr.com/статья)"));
    }

    #[test]
    fn test_link_without_visible_text() {
        let out = normalize_fixture("<p>Source:<a href=\"https://tass.ru/a\"></a></p>");
        assert_eq!(out.links, vec!["https://tass.ru/a".to_string()]);
        assert!(out.text.contains("(https://tass.ru/a)"));
    }

    #[test]
    fn test_break_run_folds_to_single_newline() {
        let out = normalize_fixture("<p>up<br><br><br>down</p>");
        assert_eq!(out.text, "up\ndown");
    }

    #[test]
    fn test_top_level_break_dropped() {
        let out = normalize_fixture("<p>one</p><br><p>two</p>");
        assert_eq!(out.text, "one\ntwo");
    }

    #[test]
    fn test_bare_text_node_is_paragraph_like() {
        let out = normalize_fixture("loose text<p>para</p>");
        assert_eq!(out.text, "loose text\npara");
    }

    #[test]
    fn test_never_three_newlines() {
        let out = normalize_fixture(
            "<h2>A</h2><p></p><p>  </p><h3>B</h3><ul></ul><p>tail</p>",
        );
        assert!(!out.text.contains("\n\n\n"));
        assert!(!out.text.starts_with('\n'));
        assert!(!out.text.ends_with('\n'));
    }

    #[test]
    fn test_deterministic() {
        let fixture = "<p>a <a href=\"https://habr.com/x\">l</a></p><h2>h</h2><ul><li>i</li></ul>";
        let first = normalize_fixture(fixture);
        let second = normalize_fixture(fixture);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_rule_emits_verbatim() {
        let html = "<html><body><div id=\"root\"><div class=\"widget\">x</div></div></body></html>";
        let doc = Html::parse_document(html);
        let sel = Selector::parse("#root").unwrap();
        let root = doc.select(&sel).next().unwrap();
        let out = normalize_children(root, |el, links| {
            if el.value().attr("class") == Some("widget") {
                links.push("https://inosmi.ru/related".to_string());
                Rule::Custom("related block\n".to_string())
            } else {
                Rule::Paragraph
            }
        });
        assert_eq!(out.text, "related block");
        assert_eq!(out.links, vec!["https://inosmi.ru/related".to_string()]);
    }

    #[test]
    fn test_carriage_returns_normalized() {
        let out = normalize_fixture("<pre>a\r\nb\rc</pre>");
        assert_eq!(out.text, "a\nb\nc");
    }
}
