//! Publish-date parsing for front matter.
//!
//! Accepted forms (all interpreted as UTC unless an offset is given):
//!
//! - `2024-06-15`
//! - `2024-06-15 14:30` / `2024-06-15 14:30:45` (space or `T` separator)
//! - RFC 3339: `2024-06-15T14:30:45Z`, `2024-06-15T14:30:45+08:00`
//!
//! Parsing goes through `chrono`, so impossible calendar dates such as
//! `2023-02-29` are rejected rather than rolled over.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// A validated publish instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PostDate(DateTime<FixedOffset>);

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

impl PostDate {
    /// Parse a front-matter date string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt));
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(Self::from_naive_utc);
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(Self::from_naive_utc)
    }

    fn from_naive_utc(naive: NaiveDateTime) -> Self {
        Self(Utc.from_utc_datetime(&naive).fixed_offset())
    }

    /// The Unix epoch, used as `updated` for feeds without dated posts.
    pub fn epoch() -> Self {
        Self(DateTime::<Utc>::UNIX_EPOCH.fixed_offset())
    }

    pub const fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    /// Format for RSS `pubDate`.
    pub fn to_rfc2822(self) -> String {
        self.0.to_rfc2822()
    }

    /// Format for Atom / JSON Feed.
    pub fn to_rfc3339(self) -> String {
        self.0.to_rfc3339()
    }
}
