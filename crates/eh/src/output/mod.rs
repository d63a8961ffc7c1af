//! Output formatting utilities for the eh CLI.
//!
//! - [`events`] - Event listings, event details and venue lists
//! - [`helpers`] - Common formatting utilities (truncation, dates, costs)

mod events;
pub mod helpers;

pub use events::{
    format_event_details_json, format_event_details_table, format_events_json,
    format_events_table, format_venues_json, format_venues_table, ListingSummary, NO_MATCHES,
};
pub use helpers::DateFormat;
