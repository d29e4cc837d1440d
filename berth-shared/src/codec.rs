//! Conversions between calendar dates and the two string forms the booking
//! flow uses: the sortable date key sent over the wire and the display form
//! shown to the visitor.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

const KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("Malformed date: {0:?}")]
    Parse(String),
}

/// Canonical `YYYY-MM-DD` identity of a calendar date.
///
/// Keys order by the date they name. Years past 9999 are written with a
/// leading `+`, so the text alone does not sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateKey {
    date: NaiveDate,
    text: String,
}

impl DateKey {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Ord for DateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}

impl PartialOrd for DateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        to_key(date)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map(to_key).map_err(serde::de::Error::custom)
    }
}

pub fn to_key(date: NaiveDate) -> DateKey {
    DateKey {
        date,
        text: date.format(KEY_FORMAT).to_string(),
    }
}

/// Day.month.year without zero padding, e.g. `1.6.2016`.
pub fn to_display(date: NaiveDate) -> String {
    format!("{}.{}.{}", date.day(), date.month(), date.year())
}

/// Parse an ISO-like date (`2016-06-01` or a full RFC 3339 timestamp).
pub fn parse(input: &str) -> Result<NaiveDate, DateError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, KEY_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map_err(|_| DateError::Parse(input.to_string()))
}

/// Serde adapter for `NaiveDate` fields carried as date keys.
///
/// Deserialization goes through [`parse`], so a malformed date fails the
/// whole document instead of being dropped.
pub mod serde_date {
    use super::{parse, to_key};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(to_key(*date).as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}
