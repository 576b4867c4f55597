//! Service-date helpers shared by the loader and the metadata core.
//!
//! Upstream parsing collapses an absent date field to `None` and an
//! unparseable one to a sentinel placeholder (the Unix epoch, which is also
//! what [`NaiveDate::default`] returns). The sentinel must never act as a
//! real boundary, so everything downstream goes through [`real_date`].

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Filters out the sentinel, leaving only dates that were actually supplied.
pub fn real_date(date: Option<NaiveDate>) -> Option<NaiveDate> {
    date.filter(|d| *d != NaiveDate::default())
}

/// Renders a date in the report's human form, e.g. "January 1, 2020".
pub fn format_long(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Renders an optional date as ISO-8601, or `"N/A"` when absent or sentinel.
pub fn display_or_na(date: Option<NaiveDate>) -> String {
    match real_date(date) {
        Some(d) => d.to_string(),
        None => "N/A".to_string(),
    }
}

/// Parses a GTFS `YYYYMMDD` date field.
///
/// An empty field is absent; a malformed one becomes the sentinel so later
/// min/max folds can exclude it without re-parsing.
pub fn parse_service_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    Some(NaiveDate::parse_from_str(raw, "%Y%m%d").unwrap_or_default())
}

/// Serde adapter for [`parse_service_date`], used by the CSV row types.
pub(crate) fn de_service_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_service_date))
}
