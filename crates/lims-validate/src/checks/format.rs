//! Identifier, accession and timestamp formats.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use lims_model::NormalizedSample;
use regex::Regex;

use crate::issue::Issue;

/// Alphanumeric, hyphen and underscore, 4 to 40 characters.
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{4,40}$").expect("Invalid id regex"));

/// Uppercase alphanumeric and hyphen, 8 to 30 characters.
static ACCESSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9-]{8,30}$").expect("Invalid accession regex"));

/// `YYYY-MM-DDTHH:MM[:SS[.fff]]Z`
static TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})T(\d{2}):(\d{2})(?::(\d{2})(?:\.(\d{3}))?)?Z$")
        .expect("Invalid timestamp regex")
});

pub fn check(sample: &NormalizedSample) -> Vec<Issue> {
    let mut issues = Vec::new();
    if !sample.id.is_empty() && !ID_REGEX.is_match(&sample.id) {
        issues.push(Issue::InvalidId {
            value: sample.id.clone(),
        });
    }
    if !sample.accession.is_empty() && !ACCESSION_REGEX.is_match(&sample.accession) {
        issues.push(Issue::InvalidAccession {
            value: sample.accession.clone(),
        });
    }
    if !sample.collected_at.is_empty() && parse_collected_at(&sample.collected_at).is_none() {
        issues.push(Issue::InvalidTimestamp {
            value: sample.collected_at.clone(),
        });
    }
    issues
}

/// Parse a strict ISO-8601 UTC timestamp.
///
/// Returns `None` when the text does not match the pattern or names an
/// instant that does not exist (month 13, February 30, hour 24).
pub fn parse_collected_at(text: &str) -> Option<DateTime<Utc>> {
    let caps = TIMESTAMP_REGEX.captures(text)?;
    let number = |index: usize| -> Option<u32> {
        caps.get(index)
            .map_or(Some(0), |m| m.as_str().parse::<u32>().ok())
    };
    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, number(2)?, number(3)?)?;
    let datetime = date.and_hms_milli_opt(number(4)?, number(5)?, number(6)?, number(7)?)?;
    Some(datetime.and_utc())
}
