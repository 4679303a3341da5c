//! Message timestamps
//!
//! The transport delivers timestamps as ISO-8601 strings. A [`Timestamp`] keeps
//! the raw string (free-text search matches against it verbatim) next to the
//! parsed UTC instant. Parsing is fixed here rather than left to any ambient
//! locale or time zone:
//!
//! - RFC 3339 with an offset or `Z` is converted to UTC
//! - a date-time without an offset (`2024-05-01T10:00:00`, optional fraction,
//!   `T` or space separator) is read as UTC
//! - a bare date (`2024-05-01`) is midnight UTC
//! - anything else is unparsable and has no instant
//!
//! Unparsable timestamps order before every parsable one.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Raw ISO timestamp plus its parsed UTC instant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    raw: String,
    instant: Option<DateTime<Utc>>,
}

impl Timestamp {
    /// Parse a transport timestamp. Never fails; unparsable input keeps only the raw text.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let instant = parse_instant(raw.trim());
        Self { raw, instant }
    }

    /// Build a timestamp from a known instant, rendered as RFC 3339 with millisecond precision
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self {
            raw: instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            instant: Some(instant),
        }
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// The string exactly as delivered
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed instant, if the raw string was understood
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }

    /// Whether the raw string parsed
    pub fn is_parsable(&self) -> bool {
        self.instant.is_some()
    }

    /// Calendar day of the instant in UTC
    pub fn utc_day(&self) -> Option<NaiveDate> {
        self.instant.map(|dt| dt.date_naive())
    }

    /// Chronological comparison; unparsable sorts first, equal instants compare equal
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(raw))
    }
}
