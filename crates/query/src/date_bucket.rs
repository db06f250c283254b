//! Named date windows ("today", "this week", ...) relative to a reference instant.
//!
//! All calendar comparisons are done in UTC.

use core::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use stockdesk_core::DomainError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateBucket {
    /// Same calendar day as now.
    Today,
    /// Within the last 7 × 24 hours.
    Week,
    /// Same calendar month and year as now.
    Month,
    /// Same calendar quarter and year as now.
    Quarter,
    /// Same calendar year as now.
    Year,
}

impl DateBucket {
    pub const ALL: [DateBucket; 5] = [
        DateBucket::Today,
        DateBucket::Week,
        DateBucket::Month,
        DateBucket::Quarter,
        DateBucket::Year,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DateBucket::Today => "today",
            DateBucket::Week => "week",
            DateBucket::Month => "month",
            DateBucket::Quarter => "quarter",
            DateBucket::Year => "year",
        }
    }

    /// Whether `date` falls in this window as seen from `now`.
    ///
    /// `Week` has no upper bound: dates after `now` are included.
    pub fn contains(self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            DateBucket::Today => date.date_naive() == now.date_naive(),
            DateBucket::Week => date >= now - Duration::days(7),
            DateBucket::Month => date.year() == now.year() && date.month() == now.month(),
            DateBucket::Quarter => {
                date.year() == now.year() && quarter_of(date.month()) == quarter_of(now.month())
            }
            DateBucket::Year => date.year() == now.year(),
        }
    }

    /// Start of the window that ends at `now` (used for report periods).
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        match self {
            DateBucket::Today => start_of_day(today),
            DateBucket::Week => now - Duration::days(7),
            DateBucket::Month => start_of_day(today.with_day(1).unwrap_or(today)),
            DateBucket::Quarter => {
                let first_month = (quarter_of(today.month()) - 1) * 3 + 1;
                let first = NaiveDate::from_ymd_opt(today.year(), first_month, 1).unwrap_or(today);
                start_of_day(first)
            }
            DateBucket::Year => {
                start_of_day(NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today))
            }
        }
    }
}

impl core::fmt::Display for DateBucket {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateBucket {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateBucket::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown date bucket: {s:?}")))
    }
}

/// Calendar quarter (1..=4) of a month (1..=12).
pub fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Optional bucket check: `None` means "no date filter".
pub fn matches_bucket(bucket: Option<DateBucket>, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    bucket.is_none_or(|b| b.contains(date, now))
}
