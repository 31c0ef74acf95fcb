//! Timestamp value type
//!
//! Timestamps keep the UTC offset they were created with and travel as
//! RFC 3339 text with up to nanosecond precision
//! (`2001-02-03T04:05:06.123456789-08:00`). Equality and ordering compare
//! instants.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;

/// Point in time with its original offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    /// Current time in UTC
    pub fn now() -> Self {
        Timestamp(Utc::now().fixed_offset())
    }

    /// Wrap a chrono datetime
    pub fn from_datetime(dt: DateTime<FixedOffset>) -> Self {
        Timestamp(dt)
    }

    /// Parse RFC 3339 text
    pub fn parse_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s).map(Timestamp)
    }

    /// RFC 3339 text; fractional seconds use the shortest of 0, 3, 6 or 9
    /// digits that is exact
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// The underlying datetime
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse_rfc3339(s)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt.fixed_offset())
    }
}
