//! Calendar dates for tasks and stage spans
//!
//! Dates are ordered and subtracted by their integer day index, never by
//! their text. On the wire a date is `YYYY-MM-DD`; older documents that hold
//! a bare integer are read as a day index counted from 1970-01-01.

use crate::error::DateError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// `NaiveDate::num_days_from_ce` of 1970-01-01
const EPOCH_DAYS_FROM_CE: i64 = 719_163;

const WIRE_FORMAT: &str = "%Y-%m-%d";

/// Calendar date of a task boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskDate(NaiveDate);

impl TaskDate {
    /// Wrap a calendar date
    #[inline]
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year, month and day
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Build from a day index counted from 1970-01-01
    #[must_use]
    pub fn from_day_index(index: i64) -> Option<Self> {
        let days = i32::try_from(index.checked_add(EPOCH_DAYS_FROM_CE)?).ok()?;
        NaiveDate::from_num_days_from_ce_opt(days).map(Self)
    }

    /// Day index counted from 1970-01-01
    #[inline]
    #[must_use]
    pub fn day_index(&self) -> i64 {
        i64::from(self.0.num_days_from_ce()) - EPOCH_DAYS_FROM_CE
    }

    /// Whole days from `self` to `later` (negative if `later` is earlier)
    #[inline]
    #[must_use]
    pub fn days_until(&self, later: &TaskDate) -> i64 {
        later.day_index() - self.day_index()
    }

    /// Underlying calendar date
    #[inline]
    #[must_use]
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for TaskDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for TaskDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WIRE_FORMAT))
    }
}

impl FromStr for TaskDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if let Ok(index) = text.parse::<i64>() {
            return Self::from_day_index(index).ok_or(DateError::OutOfRange(index));
        }
        NaiveDate::parse_from_str(text, WIRE_FORMAT)
            .map(Self)
            .map_err(|_| DateError::Invalid(text.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Index(i64),
}

impl RawDate {
    fn into_date(self) -> Result<Option<TaskDate>, DateError> {
        match self {
            RawDate::Text(text) if text.trim().is_empty() => Ok(None),
            RawDate::Text(text) => text.parse().map(Some),
            RawDate::Index(index) => TaskDate::from_day_index(index)
                .map(Some)
                .ok_or(DateError::OutOfRange(index)),
        }
    }
}

impl Serialize for TaskDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TaskDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawDate::deserialize(deserializer)?
            .into_date()
            .map_err(serde::de::Error::custom)?
            .ok_or_else(|| serde::de::Error::custom("date is blank"))
    }
}

/// Serde helpers for an optional date written as `""` when absent
pub mod optional {
    use super::{RawDate, TaskDate};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Write `None` as an empty string
    pub fn serialize<S: Serializer>(
        value: &Option<TaskDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => date.serialize(serializer),
            None => serializer.serialize_str(""),
        }
    }

    /// Read `""`, `null` or a missing value as `None`
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<TaskDate>, D::Error> {
        match Option::<RawDate>::deserialize(deserializer)? {
            Some(raw) => raw.into_date().map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
