//! InoSMI (`inosmi.ru`) extraction rules.
//!
//! The article lives under `#content`, the body under `div.article__body`.
//! Only two kinds of body children carry content: `div[data-type="text"]`
//! paragraphs and `div[data-type="article"]` — inline widgets referencing an
//! earlier related article, rendered as a short block (headline link, source
//! label, byline) terminated by the related item's absolute URL. The widget
//! URL goes into the outbound-link list as well, and the page's link to the
//! translated original is appended by the extra step.

use crate::error::CollectError;
use crate::models::Extra;
use crate::normalize::{self, NormalizedBody, Rule};
use crate::sites::{own_text, required};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use scraper::{ElementRef, Selector};
use tracing::warn;
use url::Url;

const BASE: &str = "https://inosmi.ru";
const MOSCOW_OFFSET_SECS: i32 = 3 * 3600;
const DATE_FRM: &str = "%Y-%m-%dT%H:%M";

pub(crate) fn date(
    main: ElementRef<'_>,
    url: &str,
) -> Result<DateTime<FixedOffset>, CollectError> {
    let marker = required(main, r#"div[itemprop="datePublished"]"#, url, "publication date")?;
    let raw = own_text(marker);
    let bad_date = || CollectError::BadDate {
        url: url.to_string(),
        raw: raw.clone(),
    };
    let naive = NaiveDateTime::parse_from_str(&raw, DATE_FRM).map_err(|_| bad_date())?;
    let offset = FixedOffset::east_opt(MOSCOW_OFFSET_SECS).ok_or_else(bad_date)?;
    naive.and_local_timezone(offset).single().ok_or_else(bad_date)
}

pub(crate) fn author(main: ElementRef<'_>, url: &str) -> Result<Option<String>, CollectError> {
    let block = required(main, "div.article__authors", url, "author block")?;
    Ok(Some(own_text(block)))
}

pub(crate) fn body(main: ElementRef<'_>, url: &str) -> Result<NormalizedBody, CollectError> {
    let root = required(main, "div.article__body", url, "body root")?;
    Ok(normalize::normalize_children(root, |el, links| {
        if el.value().name() != "div" {
            return Rule::Skip;
        }
        match el.value().attr("data-type") {
            Some("text") => Rule::Paragraph,
            Some("article") => match related_article(el, links) {
                Some(block) => Rule::Custom(block),
                None => {
                    warn!(%url, "Related-article widget without a link; skipping it");
                    Rule::Skip
                }
            },
            _ => Rule::Skip,
        }
    }))
}

pub(crate) fn extra(
    main: ElementRef<'_>,
    url: &str,
    links: &mut Vec<String>,
) -> Result<Extra, CollectError> {
    let announce = required(main, "div.article__announce-text", url, "annotation")?;

    let tag_sel = Selector::parse(r#"div[itemprop="articleSection"]"#)
        .unwrap_or_else(|e| panic!("invalid tag selector: {e}"));
    let tags: Vec<String> = main
        .select(&tag_sel)
        .map(own_text)
        .filter(|t| !t.is_empty())
        .collect();

    // The page links the untranslated original; readers expect it among the
    // outbound links.
    let original = required(main, "div.article__info-original a", url, "original-article link")?;
    let href = original
        .value()
        .attr("href")
        .ok_or_else(|| CollectError::MissingNode {
            url: url.to_string(),
            what: "original-article href",
        })?;
    links.push(absolutize(href));

    Ok(Extra {
        tags: (!tags.is_empty()).then_some(tags),
        annotation: Some(own_text(announce)),
    })
}

/// Render a related-article widget: headline link, source label and byline,
/// terminated by the related item's absolute URL. Returns `None` when the
/// widget carries no link (nothing worth rendering).
fn related_article(el: ElementRef<'_>, links: &mut Vec<String>) -> Option<String> {
    let link_sel = Selector::parse("a.article__article-link")
        .unwrap_or_else(|e| panic!("invalid widget selector: {e}"));
    let source_sel = Selector::parse("div.article__article-source")
        .unwrap_or_else(|e| panic!("invalid widget selector: {e}"));
    let info_sel = Selector::parse("div.article__article-info")
        .unwrap_or_else(|e| panic!("invalid widget selector: {e}"));

    let link = el.select(&link_sel).next()?;
    let href = link.value().attr("href")?;
    let absolute = absolutize(href);

    let mut out = String::from("\n");
    out.push_str(&normalize::text_items(link).join("\n"));
    out.push('\n');
    if let Some(source) = el.select(&source_sel).next() {
        out.push_str(&normalize::text_items(source).join(", "));
        out.push_str(", ");
    }
    if let Some(info) = el.select(&info_sel).next() {
        out.push_str(&own_text(info));
    }
    out.push('\n');
    out.push_str(&absolute);
    out.push_str("\n\n");

    links.push(absolute);
    Some(out)
}

/// Resolve a possibly relative widget URL against the site base and
/// percent-decode it.
fn absolutize(href: &str) -> String {
    let joined = Url::parse(BASE)
        .ok()
        .and_then(|base| base.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string());
    normalize::decode_url(&joined)
}
