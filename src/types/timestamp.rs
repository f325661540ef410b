// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timestamps reported by remote APIs.
//!
//! Cloud APIs are not consistent about how they encode instants. This module
//! accepts all formats seen in practice and stores the result as a UTC
//! instant.
//!
//! # Supported Formats
//!
//! - ISO 8601 with timezone: `"2024-01-15T10:30:00+01:00"`, `"2024-01-15T10:30:00Z"`
//! - ISO 8601 without timezone (read as UTC): `"2024-01-15T10:30:00"`
//! - Unix epoch seconds, as string or number: `1705318200`
//! - Unix epoch milliseconds, as string or number: `1705318200000`
//!
//! # Examples
//!
//! ```
//! use cloudstate_lib::types::Timestamp;
//!
//! let a: Timestamp = "2024-01-15T10:30:00+01:00".parse().unwrap();
//! let b: Timestamp = "2024-01-15T09:30:00".parse().unwrap();
//! assert_eq!(a, b);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;

/// Values above this are read as milliseconds (13 digits) instead of
/// seconds (10 digits, valid until year 2286).
const MAX_EPOCH_SECONDS: i64 = 9_999_999_999;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// An instant reported by a remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wraps a UTC datetime.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Creates a timestamp from a Unix epoch in seconds or milliseconds.
    ///
    /// Returns `None` for negative values.
    #[must_use]
    pub fn from_epoch(value: i64) -> Option<Self> {
        if value < 0 {
            return None;
        }

        let datetime = if value > MAX_EPOCH_SECONDS {
            let secs = value / 1000;
            let nsecs = u32::try_from((value % 1000) * 1_000_000).ok()?;
            Utc.timestamp_opt(secs, nsecs).single()?
        } else {
            Utc.timestamp_opt(value, 0).single()?
        };

        Some(Self(datetime))
    }

    /// Parses a timestamp string, returning `None` on failure.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    fn parse_with_offset(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    fn parse_naive(s: &str) -> Option<Self> {
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| Self(Utc.from_utc_datetime(&naive)))
    }

    /// Returns the UTC datetime.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Returns this instant in the given zone.
    #[must_use]
    pub fn in_zone(&self, zone: FixedOffset) -> DateTime<FixedOffset> {
        self.0.with_timezone(&zone)
    }
}

impl FromStr for Timestamp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let parsed = if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            trimmed.parse().ok().and_then(Self::from_epoch)
        } else {
            Self::parse_with_offset(trimmed).or_else(|| Self::parse_naive(trimmed))
        };

        parsed.ok_or_else(|| ParseError::InvalidTimestamp(s.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimestampVisitor;

        impl Visitor<'_> for TimestampVisitor {
            type Value = Timestamp;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an ISO 8601 datetime or a Unix epoch")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
                Timestamp::from_epoch(v).ok_or_else(|| E::custom(format!("invalid epoch {v}")))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(Timestamp::from_epoch)
                    .ok_or_else(|| E::custom(format!("invalid epoch {v}")))
            }
        }

        deserializer.deserialize_any(TimestampVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn parse_rfc3339_with_offset() {
        let ts: Timestamp = "2019-09-02T08:20:40+02:00".parse().unwrap();
        assert_eq!(ts.as_datetime(), utc("2019-09-02T06:20:40Z"));
    }

    #[test]
    fn parse_offset_without_colon() {
        let ts: Timestamp = "2019-09-02T08:20:40+0000".parse().unwrap();
        assert_eq!(ts.as_datetime(), utc("2019-09-02T08:20:40Z"));
    }

    #[test]
    fn parse_naive_as_utc() {
        let ts: Timestamp = "2024-01-15 10:30:00".parse().unwrap();
        assert_eq!(ts.as_datetime(), utc("2024-01-15T10:30:00Z"));
    }

    #[test]
    fn parse_epoch_seconds_and_millis() {
        let secs: Timestamp = "1705318200".parse().unwrap();
        let millis: Timestamp = "1705318200000".parse().unwrap();
        assert_eq!(secs, millis);
        assert_eq!(secs.as_datetime(), utc("2024-01-15T11:30:00Z"));
    }

    #[test]
    fn reject_garbage() {
        assert!(matches!(
            "yesterday".parse::<Timestamp>(),
            Err(ParseError::InvalidTimestamp(_))
        ));
        assert!("".parse::<Timestamp>().is_err());
        assert!(Timestamp::from_epoch(-5).is_none());
    }

    #[test]
    fn deserialize_string_and_number() {
        let from_str: Timestamp = serde_json::from_str("\"2024-01-15T11:30:00Z\"").unwrap();
        let from_num: Timestamp = serde_json::from_str("1705318200").unwrap();
        assert_eq!(from_str, from_num);
    }

    #[test]
    fn in_zone_keeps_instant() {
        let ts: Timestamp = "2024-01-15T11:30:00Z".parse().unwrap();
        let zone = FixedOffset::east_opt(3600).unwrap();
        let local = ts.in_zone(zone);
        assert_eq!(local.to_rfc3339(), "2024-01-15T12:30:00+01:00");
        assert_eq!(local.with_timezone(&Utc), ts.as_datetime());
    }

    #[test]
    fn serialize_round_trips() {
        let ts: Timestamp = "2024-01-15T11:30:00Z".parse().unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-01-15T11:30:00+00:00\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}
