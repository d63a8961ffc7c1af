//! Predicate evaluation of filter criteria against single events.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use eventhive_api::models::EventRecord;
use serde::{Deserialize, Serialize};

use crate::date_range::DateBucket;

/// User-chosen filter criteria. Blank fields are wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub venue: String,
    /// Date bucket name, see [`DateBucket`].
    #[serde(default)]
    pub when: String,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_type(mut self, value: impl Into<String>) -> Self {
        self.event_type = value.into();
        self
    }

    pub fn venue(mut self, value: impl Into<String>) -> Self {
        self.venue = value.into();
        self
    }

    pub fn when(mut self, value: impl Into<String>) -> Self {
        self.when = value.into();
        self
    }

    /// Returns true when no predicate is active.
    ///
    /// An unrecognised `when` counts as inactive.
    pub fn is_wildcard(&self) -> bool {
        self.event_type.trim().is_empty()
            && self.venue.trim().is_empty()
            && DateBucket::parse(&self.when).is_none()
    }

    /// The date bucket named by `when`, if it is a known one.
    pub fn bucket(&self) -> Option<DateBucket> {
        DateBucket::parse(&self.when)
    }
}

/// How the event-type criterion is compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventTypeMatch {
    /// Case-insensitive equality with the event's type.
    #[default]
    Exact,
    /// Case-insensitive substring of the event's title.
    TitleContains,
}

impl EventTypeMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventTypeMatch::Exact => "exact",
            EventTypeMatch::TitleContains => "title-contains",
        }
    }
}

impl fmt::Display for EventTypeMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventTypeMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(EventTypeMatch::Exact),
            "title-contains" | "title" => Ok(EventTypeMatch::TitleContains),
            other => Err(format!(
                "invalid event type match '{}': expected 'exact' or 'title-contains'",
                other
            )),
        }
    }
}

/// Evaluates one set of criteria against events.
///
/// The criteria are normalized once, so a matcher can be reused across a whole
/// collection.
#[derive(Debug, Clone)]
pub struct EventMatcher {
    event_type: Option<String>,
    venue: Option<String>,
    bucket: Option<DateBucket>,
    anchor: NaiveDate,
    mode: EventTypeMatch,
}

impl EventMatcher {
    /// Creates a matcher for `criteria`, relative to the `anchor` day.
    pub fn new(criteria: &FilterCriteria, anchor: NaiveDate, mode: EventTypeMatch) -> Self {
        Self {
            event_type: normalized(&criteria.event_type),
            venue: normalized(&criteria.venue),
            bucket: criteria.bucket(),
            anchor,
            mode,
        }
    }

    /// Returns true if the event satisfies every active predicate.
    pub fn matches(&self, event: &EventRecord) -> bool {
        self.matches_event_type(event) && self.matches_venue(event) && self.matches_date(event)
    }

    /// Filters a slice of events, preserving order.
    pub fn filter_events<'b>(&self, events: &'b [EventRecord]) -> Vec<&'b EventRecord> {
        events.iter().filter(|event| self.matches(event)).collect()
    }

    fn matches_event_type(&self, event: &EventRecord) -> bool {
        let Some(wanted) = &self.event_type else {
            return true;
        };
        match self.mode {
            EventTypeMatch::Exact => event.event_type.trim().to_lowercase() == *wanted,
            EventTypeMatch::TitleContains => event.title.to_lowercase().contains(wanted.as_str()),
        }
    }

    fn matches_venue(&self, event: &EventRecord) -> bool {
        self.venue
            .as_ref()
            .map_or(true, |wanted| event.venue.trim().to_lowercase() == *wanted)
    }

    fn matches_date(&self, event: &EventRecord) -> bool {
        let Some(bucket) = self.bucket else {
            return true;
        };
        event
            .start_date()
            .is_some_and(|date| bucket.contains(date, self.anchor))
    }
}

/// Checks a single event against `criteria`.
pub fn matches(
    event: &EventRecord,
    criteria: &FilterCriteria,
    anchor: NaiveDate,
    mode: EventTypeMatch,
) -> bool {
    EventMatcher::new(criteria, anchor, mode).matches(event)
}

fn normalized(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_lowercase())
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
