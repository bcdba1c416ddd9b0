//! Naked Science (`naked-science.ru`) extraction rules.
//!
//! The article sits under `.content`, the body under `.body`. Bodies are
//! interleaved with inline ad blocks (`.ads_single`) that must be skipped,
//! and with a related-news box (`.other-news-block`) rendered as one line per
//! entry with annotated links. Every other `<div>` child (image captions,
//! embeds, promo widgets) contributes no body text, though its links are
//! still recorded. The site also exposes an annotation (lead
//! paragraph) and a tag list whose entries carry a `"# "` prefix.

use crate::error::CollectError;
use crate::models::Extra;
use crate::normalize::{self, NormalizedBody, Rule};
use crate::sites::{own_text, required};
use chrono::{DateTime, FixedOffset};
use scraper::{ElementRef, Node, Selector};

const DATE_FRM: &str = "%Y-%m-%dT%H:%M:%S%z";

pub(crate) fn date(
    main: ElementRef<'_>,
    url: &str,
) -> Result<DateTime<FixedOffset>, CollectError> {
    let marker = required(main, ".echo_date", url, "date marker")?;
    let raw = marker
        .value()
        .attr("data-published")
        .ok_or_else(|| CollectError::MissingNode {
            url: url.to_string(),
            what: "data-published attribute",
        })?;
    // %z tolerates both "+03:00" and the colonless "+0300" the site emits.
    DateTime::parse_from_str(raw, DATE_FRM).map_err(|_| CollectError::BadDate {
        url: url.to_string(),
        raw: raw.to_string(),
    })
}

pub(crate) fn author(main: ElementRef<'_>, url: &str) -> Result<Option<String>, CollectError> {
    let block = required(main, "div.meta-item_author", url, "author block")?;
    Ok(Some(own_text(block)))
}

pub(crate) fn body(main: ElementRef<'_>, url: &str) -> Result<NormalizedBody, CollectError> {
    let root = required(main, ".body", url, "body root")?;
    Ok(normalize::normalize_children(root, |el, links| {
        if el.value().classes().any(|c| c == "ads_single") {
            return Rule::Skip;
        }
        match el.value().name() {
            "pre" | "code" => Rule::Preformatted,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Rule::Heading,
            "ol" | "ul" => Rule::List,
            "div" if el.value().classes().any(|c| c == "other-news-block") => {
                Rule::Custom(other_news_block(el, links))
            }
            // Other divs are widgets, embeds and captions: no body text,
            // but any links inside still count as outbound.
            "div" => {
                harvest_links(el, links);
                Rule::Skip
            }
            _ => Rule::Paragraph,
        }
    }))
}

/// Record the decoded targets of every descendant link without emitting text.
fn harvest_links(el: ElementRef<'_>, links: &mut Vec<String>) {
    let sel = Selector::parse("a").unwrap_or_else(|e| panic!("invalid link selector: {e}"));
    for a in el.select(&sel) {
        if let Some(href) = a.value().attr("href") {
            links.push(normalize::decode_url(href));
        }
    }
}

pub(crate) fn extra(main: ElementRef<'_>, url: &str) -> Result<Extra, CollectError> {
    let tag_list = required(main, ".terms-items", url, "tag list")?;
    let lead = required(main, ".post-lead", url, "annotation")?;

    let tags: Vec<String> = normalize::text_items(tag_list)
        .into_iter()
        .map(|t| t.trim_start_matches("# ").trim_start_matches('#').to_string())
        .filter(|t| !t.is_empty())
        .collect();

    Ok(Extra {
        tags: (!tags.is_empty()).then_some(tags),
        annotation: Some(own_text(lead)),
    })
}

/// Render the related-news box: one line per entry, links annotated with
/// their decoded URL and recorded in the outbound-link list.
fn other_news_block(el: ElementRef<'_>, links: &mut Vec<String>) -> String {
    let mut lines = Vec::new();
    collect_lines(el, links, &mut lines);
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn collect_lines(el: ElementRef<'_>, links: &mut Vec<String>, lines: &mut Vec<String>) {
    for node in el.children() {
        if let Some(child) = ElementRef::wrap(node) {
            if child.value().name() == "a" {
                let text = own_text(child);
                match child.value().attr("href") {
                    Some(href) => {
                        let decoded = normalize::decode_url(href);
                        links.push(decoded.clone());
                        lines.push(if text.is_empty() {
                            format!("({decoded})")
                        } else {
                            format!("{text} ({decoded})")
                        });
                    }
                    None if !text.is_empty() => lines.push(text),
                    None => {}
                }
            } else {
                collect_lines(child, links, lines);
            }
        } else if let Node::Text(t) = node.value() {
            let t = t.trim();
            if !t.is_empty() {
                lines.push(t.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::{SiteKind, extract_from_html};
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = r#"<html><body>
        <div class="content">
            <h1>Dark matter mapped</h1>
            <div class="echo_date" data-published="2023-01-13T12:00:00+03:00">13 января</div>
            <div class="meta-item_author">Боб Иванов</div>
            <div class="post-lead">Астрономы построили новую карту.</div>
            <div class="body">
                <p>Первый абзац со <a href="https://naked-science.ru/article/%D0%BA%D0%B0%D1%80%D1%82%D0%B0">ссылкой</a>.</p>
                <div class="ads_single">Реклама, которой тут не место</div>
                <h2>Метод</h2>
                <p>Второй абзац.</p>
                <div class="other-news-block">
                    Читайте также:
                    <a href="https://naked-science.ru/article/other">Другая новость</a>
                </div>
            </div>
            <div class="terms-items"><a># космос</a><a># физика</a></div>
        </div>
    </body></html>"#;

    #[test]
    fn test_full_extraction() {
        let url = "https://naked-science.ru/article/astronomy/dark-matter";
        let art = extract_from_html(SiteKind::NakedScience, url, FIXTURE).unwrap();

        assert_eq!(art.source(), "Naked Science (naked-science.ru)");
        assert_eq!(art.published(), "13.01.2023 12:00");
        assert_eq!(art.author(), Some("Боб Иванов"));
        assert_eq!(art.headline(), "Dark matter mapped");
        assert_eq!(
            art.tags(),
            Some(&["космос".to_string(), "физика".to_string()][..])
        );
        assert_eq!(art.annotation(), Some("Астрономы построили новую карту."));
        assert_eq!(
            art.links(),
            &[
                "https://naked-science.ru/article/карта".to_string(),
                "https://naked-science.ru/article/other".to_string(),
            ][..]
        );
    }

    #[test]
    fn test_ads_skipped_and_related_rendered() {
        let art = extract_from_html(
            SiteKind::NakedScience,
            "https://naked-science.ru/article/a",
            FIXTURE,
        )
        .unwrap();
        let body = art.body();

        assert!(!body.contains("Реклама"));
        assert!(body.contains("Читайте также:"));
        assert!(body.contains("Другая новость (https://naked-science.ru/article/other)"));
        assert!(body.contains("\nМетод\n\n"));
        assert!(!body.contains("\n\n\n"));
    }

    #[test]
    fn test_plain_divs_dropped_but_links_kept() {
        let html = FIXTURE.replace(
            "<h2>Метод</h2>",
            r#"<div class="mediavenus-block">Подпись к виджету <a href="https://naked-science.ru/widget">тут</a></div><h2>Метод</h2>"#,
        );
        let art = extract_from_html(
            SiteKind::NakedScience,
            "https://naked-science.ru/article/a",
            &html,
        )
        .unwrap();

        assert!(!art.body().contains("Подпись к виджету"));
        assert!(art
            .links()
            .contains(&"https://naked-science.ru/widget".to_string()));
    }

    #[test]
    fn test_date_offset_without_colon() {
        let html = FIXTURE.replace("2023-01-13T12:00:00+03:00", "2023-01-13T12:00:00+0300");
        let art = extract_from_html(
            SiteKind::NakedScience,
            "https://naked-science.ru/article/a",
            &html,
        )
        .unwrap();
        assert_eq!(art.published(), "13.01.2023 12:00");
    }

    #[test]
    fn test_missing_author_is_hard_fault() {
        let html = r#"<html><body><div class="content">
            <h1>t</h1>
            <div class="echo_date" data-published="2023-01-13T12:00:00+03:00"></div>
            <div class="body"><p>x</p></div>
        </div></body></html>"#;
        let err = extract_from_html(
            SiteKind::NakedScience,
            "https://naked-science.ru/article/a",
            html,
        )
        .unwrap_err();
        assert!(matches!(err, CollectError::MissingNode { what: "author block", .. }));
    }
}
