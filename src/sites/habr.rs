//! Habr (`habr.com`) extraction rules.
//!
//! The article lives in an `<article>` tag. The publication instant comes
//! machine-readable from the `datetime` attribute of a `<time>` node (RFC
//! 3339, UTC). Bodies frequently carry code blocks and explicit `<br>`
//! line breaks inside running text, so the classification table covers
//! pre/code alongside the usual headings and lists.

use crate::error::CollectError;
use crate::models::Extra;
use crate::normalize::{self, NormalizedBody, Rule};
use crate::sites::{own_text, required};
use chrono::{DateTime, FixedOffset};
use scraper::ElementRef;

const BODY_ROOT: &str = "#post-content-body > div:nth-child(1) > div > div";

pub(crate) fn date(
    main: ElementRef<'_>,
    url: &str,
) -> Result<DateTime<FixedOffset>, CollectError> {
    let time = required(main, "time", url, "publication time")?;
    let raw = time
        .value()
        .attr("datetime")
        .ok_or_else(|| CollectError::MissingNode {
            url: url.to_string(),
            what: "datetime attribute",
        })?;
    DateTime::parse_from_rfc3339(raw).map_err(|_| CollectError::BadDate {
        url: url.to_string(),
        raw: raw.to_string(),
    })
}

pub(crate) fn author(main: ElementRef<'_>, url: &str) -> Result<Option<String>, CollectError> {
    let block = required(main, "span.tm-user-info__user", url, "author block")?;
    Ok(Some(own_text(block)))
}

pub(crate) fn body(main: ElementRef<'_>, url: &str) -> Result<NormalizedBody, CollectError> {
    let root = required(main, BODY_ROOT, url, "body root")?;
    Ok(normalize::normalize_children(root, |el, _links| {
        match el.value().name() {
            "pre" | "code" => Rule::Preformatted,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Rule::Heading,
            "ol" | "ul" => Rule::List,
            _ => Rule::Paragraph,
        }
    }))
}

pub(crate) fn extra(main: ElementRef<'_>, url: &str) -> Result<Extra, CollectError> {
    let list = required(main, ".tm-separated-list__list", url, "tag list")?;
    let tags = normalize::text_items(list);
    Ok(Extra {
        tags: (!tags.is_empty()).then_some(tags),
        annotation: None,
    })
}
