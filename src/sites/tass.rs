//! TASS (`tass.ru`) extraction rules.
//!
//! The page's `<main>` holds the article inside an `<article>` tag. TASS
//! publishes no byline. The publication date is free text in Russian
//! ("13 января 2023, 10:30", sometimes without the year and with
//! non-breaking spaces); it is parsed through an explicit month-name lookup
//! table rather than a process-wide locale switch, so date parsing stays
//! safe under concurrent extraction. Times are Moscow time (+03:00).

use crate::error::CollectError;
use crate::models::Extra;
use crate::normalize::{self, NormalizedBody, Rule};
use crate::sites::{own_text, required};
use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveTime};
use scraper::{ElementRef, Selector};

const MOSCOW_OFFSET_SECS: i32 = 3 * 3600;

// The site's design system emits the date into a marker div with these
// generated class names.
const DATE_MARKER: &str = "div.ds_ext_marker-kFsBk.ds_ext_marker--font_weight_medium-wX2ql.ds_ext_marker--color_secondary-z2ssC";

pub(crate) fn date(
    main: ElementRef<'_>,
    url: &str,
) -> Result<DateTime<FixedOffset>, CollectError> {
    let marker = required(main, DATE_MARKER, url, "date marker")?;
    let raw = own_text(marker);
    parse_published(&raw, Local::now().year()).ok_or_else(|| CollectError::BadDate {
        url: url.to_string(),
        raw,
    })
}

pub(crate) fn body(main: ElementRef<'_>, url: &str) -> Result<NormalizedBody, CollectError> {
    let root = required(main, "article", url, "body root")?;
    Ok(normalize::normalize_children(root, |el, _links| {
        match el.value().name() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Rule::Heading,
            "ol" | "ul" => Rule::List,
            _ => Rule::Paragraph,
        }
    }))
}

pub(crate) fn extra(main: ElementRef<'_>, _url: &str) -> Result<Extra, CollectError> {
    let selector = Selector::parse("a.Tags_tag__tRSPs")
        .unwrap_or_else(|e| panic!("invalid tag selector: {e}"));
    let tags: Vec<String> = main
        .select(&selector)
        .map(own_text)
        .filter(|t| !t.is_empty())
        .collect();
    Ok(Extra {
        tags: (!tags.is_empty()).then_some(tags),
        annotation: None,
    })
}

/// Parse the free-text publication date.
///
/// Accepted shapes (non-breaking spaces tolerated, trailing comma after the
/// year tolerated): `"13 января 2023, 10:30"` and `"13 января, 10:30"`. When
/// the year is omitted, `year_hint` (the current year at the call site) is
/// assumed. The result carries the site's fixed +03:00 offset.
fn parse_published(raw: &str, year_hint: i32) -> Option<DateTime<FixedOffset>> {
    let cleaned = raw.replace('\u{a0}', " ");
    let mut tokens = cleaned.split_whitespace().map(|t| t.trim_matches(','));

    let day: u32 = tokens.next()?.parse().ok()?;
    let month = ru_month(tokens.next()?)?;
    let rest: Vec<&str> = tokens.collect();
    let (year, time) = match rest.as_slice() {
        [year, time] => (year.parse().ok()?, *time),
        [time] => (year_hint, *time),
        _ => return None,
    };

    let (hour, minute) = time.split_once(':')?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)?;
    let offset = FixedOffset::east_opt(MOSCOW_OFFSET_SECS)?;
    date.and_time(time).and_local_timezone(offset).single()
}

/// Month number for a Russian month name, matched on its first three
/// characters so both full and abbreviated forms resolve.
fn ru_month(token: &str) -> Option<u32> {
    let prefix: String = token.to_lowercase().chars().take(3).collect();
    Some(match prefix.as_str() {
        "янв" => 1,
        "фев" => 2,
        "мар" => 3,
        "апр" => 4,
        "мая" | "май" => 5,
        "июн" => 6,
        "июл" => 7,
        "авг" => 8,
        "сен" => 9,
        "окт" => 10,
        "ноя" => 11,
        "дек" => 12,
        _ => return None,
    })
}
