use crate::domain::program::{Program, Sentiment};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// One audience comment. Generated rows and rows loaded from the per-program
/// CSV files share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    pub program: Program,
    pub text: String,
    pub sentiment: Sentiment,
}

/// A comment row read back from `sentiment_data_<program>.csv`.
pub type PersistedRecord = Comment;

/// Inclusive calendar range. `start > end` is an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of calendar days covered, zero when empty.
    pub fn len_days(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.checked_add_signed(Duration::days(1)))
            .take_while(move |d| *d <= end)
    }
}

/// Parses `YYYY-MM-DD`, dropping any trailing time component
/// (`2025-05-01 00:00:00`, `2025-05-01T12:00:00Z`).
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid calendar date: {raw}")))
}
