//! Named date buckets relative to an anchor day.
//!
//! Weeks start on Sunday. Every bucket is an inclusive range of calendar days:
//!
//! | Bucket         | Range                                                  |
//! |----------------|--------------------------------------------------------|
//! | `today`        | the anchor                                             |
//! | `tomorrow`     | anchor + 1                                             |
//! | `this-week`    | Sunday..=Saturday of the anchor's week                 |
//! | `this-weekend` | the next Saturday on or after the anchor and its Sunday |
//! | `next-week`    | the Sunday..=Saturday after this week                  |
//!
//! A Sunday anchor therefore gets the *following* weekend for `this-weekend`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// A named date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateBucket {
    Today,
    Tomorrow,
    ThisWeek,
    ThisWeekend,
    NextWeek,
}

impl DateBucket {
    /// Every bucket, in the order they are offered to users.
    pub const ALL: [DateBucket; 5] = [
        DateBucket::Today,
        DateBucket::Tomorrow,
        DateBucket::ThisWeek,
        DateBucket::ThisWeekend,
        DateBucket::NextWeek,
    ];

    /// Parses a bucket name, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything that is not one of the five names.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.as_str().eq_ignore_ascii_case(name))
    }

    /// The wire/CLI name of the bucket.
    pub fn as_str(&self) -> &'static str {
        match self {
            DateBucket::Today => "today",
            DateBucket::Tomorrow => "tomorrow",
            DateBucket::ThisWeek => "this-week",
            DateBucket::ThisWeekend => "this-weekend",
            DateBucket::NextWeek => "next-week",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DateBucket::Today => "Today",
            DateBucket::Tomorrow => "Tomorrow",
            DateBucket::ThisWeek => "This Week",
            DateBucket::ThisWeekend => "This Weekend",
            DateBucket::NextWeek => "Next Week",
        }
    }

    /// Returns the inclusive `(first, last)` days of the bucket for `anchor`.
    pub fn span(&self, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
        let offset = i64::from(anchor.weekday().num_days_from_sunday());
        let week_start = shift(anchor, -offset);
        let week_end = shift(week_start, 6);

        match self {
            DateBucket::Today => (anchor, anchor),
            DateBucket::Tomorrow => {
                let tomorrow = shift(anchor, 1);
                (tomorrow, tomorrow)
            }
            DateBucket::ThisWeek => (week_start, week_end),
            DateBucket::ThisWeekend => {
                let saturday = shift(anchor, 6 - offset);
                (saturday, shift(saturday, 1))
            }
            DateBucket::NextWeek => (shift(week_end, 1), shift(week_end, 7)),
        }
    }

    /// Returns true if `candidate` falls inside the bucket for `anchor`.
    pub fn contains(&self, candidate: NaiveDate, anchor: NaiveDate) -> bool {
        let (first, last) = self.span(anchor);
        first <= candidate && candidate <= last
    }
}

impl fmt::Display for DateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown bucket name with [`FromStr`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown date range '{0}' (expected one of: today, tomorrow, this-week, this-weekend, next-week)")]
pub struct UnknownBucket(pub String);

impl FromStr for DateBucket {
    type Err = UnknownBucket;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownBucket(s.to_string()))
    }
}

/// Checks a candidate day against an optional bucket.
///
/// No bucket means no date constraint, so the result is `true`.
pub fn in_range(candidate: NaiveDate, bucket: Option<DateBucket>, anchor: NaiveDate) -> bool {
    bucket.map_or(true, |bucket| bucket.contains(candidate, anchor))
}

/// Same as [`in_range`], with the bucket given by name.
///
/// Empty or unrecognised names act as a wildcard.
pub fn in_range_str(candidate: NaiveDate, bucket: &str, anchor: NaiveDate) -> bool {
    in_range(candidate, DateBucket::parse(bucket), anchor)
}

/// The local calendar day, used as the default anchor.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}
