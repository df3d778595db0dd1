//! Tolerant timestamp parsing and the canonical `%Y-%m-%d %H:%M:%S` format.
//!
//! Trackers report times in half a dozen shapes: GH-wrapper `...Z` strings
//! with and without seconds, RFC 3339 with offsets on related commits,
//! fractional-second changelog entries, and RFC 2822-like XML dates. All of
//! them collapse into a [`Timestamp`], which may be empty. Empty or
//! unparsable input never fails; it just yields [`Timestamp::EMPTY`].

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::ErrorCode;

/// Output format for every timestamp the engine emits.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%MZ", CANONICAL_FORMAT];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%a, %d %b %Y %H:%M:%S %z"];

/// A second-resolution UTC instant, or nothing.
///
/// Ordering puts the empty timestamp before every real one; the merger
/// anchors empty timestamps to issue creation before sorting, so that
/// ordering only matters for ties between two empty values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(Option<NaiveDateTime>);

impl Timestamp {
    pub const EMPTY: Self = Self(None);

    #[must_use]
    pub const fn from_naive(value: NaiveDateTime) -> Self {
        Self(Some(value))
    }

    /// Parse any supported tracker format. Never fails.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Self::EMPTY;
        }

        for format in NAIVE_FORMATS {
            if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Self::from_naive(truncate_subsec(value));
            }
        }

        if let Ok(value) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::from_naive(truncate_subsec(value.with_timezone(&Utc).naive_utc()));
        }

        for format in OFFSET_FORMATS {
            if let Ok(value) = DateTime::parse_from_str(trimmed, format) {
                return Self::from_naive(truncate_subsec(value.with_timezone(&Utc).naive_utc()));
            }
        }

        tracing::debug!(
            code = %ErrorCode::UnparsableTimestamp,
            raw = trimmed,
            "timestamp not in any known format; using empty timestamp"
        );
        Self::EMPTY
    }

    /// Parse an optional raw value; `None` is the empty timestamp.
    #[must_use]
    pub fn parse_opt(raw: Option<&str>) -> Self {
        raw.map_or(Self::EMPTY, Self::parse)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    #[must_use]
    pub const fn value(&self) -> Option<NaiveDateTime> {
        self.0
    }

    /// Canonical text form, or `""` when empty.
    #[must_use]
    pub fn to_canonical(&self) -> String {
        self.0
            .map(|v| v.format(CANONICAL_FORMAT).to_string())
            .unwrap_or_default()
    }
}

fn truncate_subsec(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_wrapper_formats() {
        assert_eq!(
            Timestamp::parse("2020-01-01T10:11:12Z").to_canonical(),
            "2020-01-01 10:11:12"
        );
        assert_eq!(
            Timestamp::parse("2020-01-01T10:11Z").to_canonical(),
            "2020-01-01 10:11:00"
        );
    }

    #[test]
    fn canonical_input_is_accepted() {
        assert_eq!(
            Timestamp::parse("2019-06-30 23:59:59").to_canonical(),
            "2019-06-30 23:59:59"
        );
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        assert_eq!(
            Timestamp::parse("2018-03-04T12:00:00+02:00").to_canonical(),
            "2018-03-04 10:00:00"
        );
        assert_eq!(
            Timestamp::parse("2018-03-04T12:00:00.123+0000").to_canonical(),
            "2018-03-04 12:00:00"
        );
    }

    #[test]
    fn jira_xml_format() {
        assert_eq!(
            Timestamp::parse("Tue, 7 Jan 2014 08:15:00 +0000").to_canonical(),
            "2014-01-07 08:15:00"
        );
    }

    #[test]
    fn empty_and_none_are_empty() {
        assert!(Timestamp::parse("").is_empty());
        assert!(Timestamp::parse("   ").is_empty());
        assert!(Timestamp::parse("None").is_empty());
        assert!(Timestamp::parse_opt(None).is_empty());
        assert_eq!(Timestamp::EMPTY.to_canonical(), "");
    }

    #[test]
    fn garbage_does_not_fail() {
        assert!(Timestamp::parse("yesterday-ish").is_empty());
    }

    #[test]
    fn empty_orders_before_real() {
        let real = Timestamp::parse("2000-01-01 00:00:00");
        assert!(Timestamp::EMPTY < real);
    }

    #[test]
    fn serializes_as_canonical_string() {
        let ts = Timestamp::parse("2020-01-02T03:04:05Z");
        let json = serde_json::to_string(&ts).expect("serialize");
        assert_eq!(json, "\"2020-01-02 03:04:05\"");
    }
}
