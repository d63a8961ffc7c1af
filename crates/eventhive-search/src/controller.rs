//! Stateful filtering over a fixed event collection.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use eventhive_api::models::EventRecord;
use tracing::debug;

use crate::matcher::{EventMatcher, EventTypeMatch, FilterCriteria};

/// One field of [`FilterCriteria`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriterionField {
    EventType,
    Venue,
    When,
}

impl CriterionField {
    pub const ALL: [CriterionField; 3] = [
        CriterionField::EventType,
        CriterionField::Venue,
        CriterionField::When,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CriterionField::EventType => "Event type",
            CriterionField::Venue => "Venue",
            CriterionField::When => "When",
        }
    }
}

impl fmt::Display for CriterionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CriterionField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "type" | "event-type" | "event_type" => Ok(CriterionField::EventType),
            "venue" | "location" => Ok(CriterionField::Venue),
            "when" | "date" => Ok(CriterionField::When),
            other => Err(format!(
                "unknown filter field '{}': expected type, venue or when",
                other
            )),
        }
    }
}

/// Holds criteria and the currently visible subset of a collection.
///
/// Changing a criterion does not refilter; call [`apply`](Self::apply). The
/// source collection is borrowed and never modified.
///
/// ```
/// use chrono::NaiveDate;
/// use eventhive_api::models::EventRecord;
/// use eventhive_search::{CriterionField, FilterController};
///
/// let events: Vec<EventRecord> = serde_json::from_value(serde_json::json!([
///     {"_id": "1", "title": "Rust Workshop", "event_type": "Workshop"},
///     {"_id": "2", "title": "Jazz Night", "event_type": "Concert"}
/// ])).unwrap();
/// let anchor = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
///
/// let mut controller = FilterController::new(&events, anchor);
/// controller.set_criterion(CriterionField::EventType, "workshop");
/// assert_eq!(controller.apply().len(), 1);
///
/// controller.reset();
/// assert_eq!(controller.visible().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FilterController<'a> {
    source: &'a [EventRecord],
    criteria: FilterCriteria,
    anchor: NaiveDate,
    mode: EventTypeMatch,
    visible: Vec<&'a EventRecord>,
}

impl<'a> FilterController<'a> {
    /// Creates a controller with wildcard criteria; every event is visible.
    pub fn new(source: &'a [EventRecord], anchor: NaiveDate) -> Self {
        Self {
            source,
            criteria: FilterCriteria::default(),
            anchor,
            mode: EventTypeMatch::default(),
            visible: source.iter().collect(),
        }
    }

    /// Sets how the event-type criterion is compared.
    pub fn with_mode(mut self, mode: EventTypeMatch) -> Self {
        self.mode = mode;
        self
    }

    /// Starts from existing criteria. Call [`apply`](Self::apply) to refilter.
    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn mode(&self) -> EventTypeMatch {
        self.mode
    }

    pub fn source(&self) -> &'a [EventRecord] {
        self.source
    }

    /// Replaces one criterion.
    pub fn set_criterion(&mut self, field: CriterionField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CriterionField::EventType => self.criteria.event_type = value,
            CriterionField::Venue => self.criteria.venue = value,
            CriterionField::When => self.criteria.when = value,
        }
    }

    /// Re-runs the criteria over the full collection and returns the visible events.
    pub fn apply(&mut self) -> &[&'a EventRecord] {
        self.visible = apply_filters(self.source, &self.criteria, self.anchor, self.mode);
        debug!(
            total = self.source.len(),
            visible = self.visible.len(),
            criteria = ?self.criteria,
            "filters applied"
        );
        &self.visible
    }

    /// Clears every criterion and shows the whole collection again.
    pub fn reset(&mut self) {
        self.criteria = FilterCriteria::default();
        self.visible = self.source.iter().collect();
    }

    /// Events visible after the last [`apply`](Self::apply) or [`reset`](Self::reset).
    pub fn visible(&self) -> &[&'a EventRecord] {
        &self.visible
    }
}

/// Returns the events matching `criteria`, in their original order.
pub fn apply_filters<'a>(
    events: &'a [EventRecord],
    criteria: &FilterCriteria,
    anchor: NaiveDate,
    mode: EventTypeMatch,
) -> Vec<&'a EventRecord> {
    EventMatcher::new(criteria, anchor, mode).filter_events(events)
}
