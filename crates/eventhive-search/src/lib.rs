//! Local event filtering for Event Hive.
//!
//! Three layers, leaves first:
//!
//! - [`date_range`]: decides whether a day falls in a named bucket
//!   (`today`, `tomorrow`, `this-week`, `this-weekend`, `next-week`).
//! - [`matcher`]: ANDs the event-type, venue and date predicates of a
//!   [`FilterCriteria`] for one event.
//! - [`controller`]: keeps criteria and the visible subset of a collection.
//!
//! Everything here is pure: the anchor day is always passed in, and nothing
//! returns an error. Malformed dates simply never match a date bucket.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use eventhive_api::models::EventRecord;
//! use eventhive_search::{apply_filters, EventTypeMatch, FilterCriteria};
//!
//! let events: Vec<EventRecord> = serde_json::from_value(serde_json::json!([
//!     {"_id": "1", "title": "Rust Workshop", "venue": "Pune", "start_date": "2024-01-10"},
//!     {"_id": "2", "title": "Jazz Night", "venue": "Goa", "start_date": "2024-01-17"}
//! ])).unwrap();
//!
//! let anchor = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! let criteria = FilterCriteria::new().when("next-week");
//! let visible = apply_filters(&events, &criteria, anchor, EventTypeMatch::Exact);
//! assert_eq!(visible[0].title, "Jazz Night");
//! ```

pub mod controller;
pub mod date_range;
pub mod matcher;
pub mod venues;

pub use controller::{apply_filters, CriterionField, FilterController};
pub use date_range::{in_range, in_range_str, local_today, DateBucket, UnknownBucket};
pub use matcher::{matches, EventMatcher, EventTypeMatch, FilterCriteria};
pub use venues::{distinct_venues, suggest_venue};
