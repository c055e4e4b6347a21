//! # Temporal Types: Calendar Dates
//!
//! Defines [`ChecklistDate`], the ISO calendar date a submission is
//! associated with. Checklists are per-day records, so the type carries no
//! time-of-day and no offset: `YYYY-MM-DD` in, `YYYY-MM-DD` out.
//!
//! "Today" is evaluated in UTC, matching `new Date().toISOString()` in the
//! web client that produced the persisted records.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// An ISO calendar date (`YYYY-MM-DD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChecklistDate(NaiveDate);

impl ChecklistDate {
    /// The current calendar date in UTC.
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Build from year/month/day components.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, ValidationError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidDate {
                value: format!("{year:04}-{month:02}-{day:02}"),
            })
    }

    /// Parse a strict `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDate`] for anything else, including
    /// full RFC 3339 timestamps.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.len() != 10 {
            return Err(ValidationError::InvalidDate {
                value: s.to_string(),
            });
        }
        NaiveDate::parse_from_str(s, ISO_DATE_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: s.to_string(),
            })
    }

    /// Parse a date leniently: accepts `YYYY-MM-DD`, or an RFC 3339 timestamp
    /// whose date part is taken as-is (the offset is not applied).
    ///
    /// Used when ingesting externally stored records, which sometimes carry a
    /// full timestamp in the `date` slot.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(date) = Self::parse(s) {
            return Some(date);
        }
        s.get(..10).and_then(|prefix| {
            if s.as_bytes().get(10) == Some(&b'T') {
                Self::parse(prefix).ok()
            } else {
                None
            }
        })
    }

    /// Render as `YYYY-MM-DD`.
    pub fn to_iso8601(&self) -> String {
        self.0.format(ISO_DATE_FORMAT).to_string()
    }
}

impl std::fmt::Display for ChecklistDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl std::str::FromStr for ChecklistDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ChecklistDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for ChecklistDate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
