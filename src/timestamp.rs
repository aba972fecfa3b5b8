//! Point-in-time values stored by the service.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Seconds since the Unix epoch, negative before it.
///
/// Every `i64` is a valid value. The default is [`TimestampValue::ZERO`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimestampValue(i64);

impl TimestampValue {
    /// 0001-01-01T00:00:00Z, the zero-time sentinel a fresh store reports.
    pub const ZERO: TimestampValue = TimestampValue(-62_135_596_800);

    /// The Unix epoch itself.
    pub const UNIX_EPOCH: TimestampValue = TimestampValue(0);

    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    pub const fn unix_seconds(self) -> i64 {
        self.0
    }

    /// Calendar form, when chrono can represent it (roughly ±262,000 years).
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl Default for TimestampValue {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i64> for TimestampValue {
    fn from(seconds: i64) -> Self {
        Self(seconds)
    }
}

impl From<DateTime<Utc>> for TimestampValue {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at.timestamp())
    }
}

impl fmt::Display for TimestampValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input that is not a decimal signed 64-bit integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid unix timestamp {input:?}: {source}")]
pub struct ParseTimestampError {
    input: String,
    #[source]
    source: ParseIntError,
}

impl ParseTimestampError {
    /// The offending input, after whitespace trimming.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl FromStr for TimestampValue {
    type Err = ParseTimestampError;

    /// Parse decimal seconds, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|source| ParseTimestampError {
                input: trimmed.to_string(),
                source,
            })
    }
}
