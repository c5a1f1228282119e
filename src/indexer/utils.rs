use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::data::ArticleRecord;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Parses an ISO-8601 date or date/time. Offsets are normalized to UTC.
pub(super) fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub(super) fn sort_key(article: &ArticleRecord) -> NaiveDateTime {
    parse_iso(&article.date).unwrap_or(NaiveDateTime::MIN)
}

/// Newest first. Articles with equal keys, including all undated ones, keep their order.
pub(super) fn sort_articles(articles: &mut [ArticleRecord]) {
    articles.sort_by_cached_key(|a| Reverse(sort_key(a)));
}
