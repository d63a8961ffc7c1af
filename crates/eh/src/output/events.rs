//! Event output formatting.

use chrono::NaiveDate;
use eventhive_api::models::EventRecord;
use eventhive_search::{EventTypeMatch, FilterCriteria};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{
    format_cost, format_event_date, format_event_time, header, pad, truncate_str, DateFormat,
};

/// Message shown when a search yields nothing.
pub const NO_MATCHES: &str = "No events match your search criteria.";

const ID_WIDTH: usize = 10;
const TYPE_WIDTH: usize = 12;
const VENUE_WIDTH: usize = 20;

/// What was searched, for the JSON envelope.
pub struct ListingSummary<'a> {
    pub total: usize,
    pub rejected: usize,
    pub criteria: &'a FilterCriteria,
    pub mode: EventTypeMatch,
    pub anchor: NaiveDate,
}

/// JSON output structure for the events command.
#[derive(Serialize)]
pub struct EventListOutput<'a> {
    pub events: Vec<EventOutput<'a>>,
    pub total: usize,
    pub visible: usize,
    pub rejected: usize,
    pub criteria: &'a FilterCriteria,
    pub event_type_match: EventTypeMatch,
    pub anchor: String,
}

/// JSON output structure for a single event.
#[derive(Serialize)]
pub struct EventOutput<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub event_type: &'a str,
    pub venue: &'a str,
    pub start_date: &'a str,
    pub start_time: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<&'a str>,
    pub cost: Option<String>,
    pub free: bool,
    pub has_image: bool,
}

impl<'a> From<&'a EventRecord> for EventOutput<'a> {
    fn from(event: &'a EventRecord) -> Self {
        Self {
            id: &event.id,
            title: &event.title,
            event_type: &event.event_type,
            venue: &event.venue,
            start_date: &event.start_date,
            start_time: &event.start_time,
            end_date: event.end_date.as_deref(),
            end_time: event.end_time.as_deref(),
            cost: event.cost.as_ref().map(|c| c.raw()),
            free: event.is_free(),
            has_image: event.has_image(),
        }
    }
}

/// JSON output structure for event details (show command).
#[derive(Serialize)]
pub struct EventDetailsOutput<'a> {
    #[serde(flatten)]
    pub event: EventOutput<'a>,
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_saved_to: Option<String>,
}

/// Formats a filtered listing as JSON.
pub fn format_events_json(
    events: &[&EventRecord],
    summary: &ListingSummary,
) -> Result<String, serde_json::Error> {
    let output = EventListOutput {
        events: events.iter().map(|e| EventOutput::from(*e)).collect(),
        total: summary.total,
        visible: events.len(),
        rejected: summary.rejected,
        criteria: summary.criteria,
        event_type_match: summary.mode,
        anchor: summary.anchor.format("%Y-%m-%d").to_string(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats events as a table.
pub fn format_events_table(
    events: &[&EventRecord],
    date_format: DateFormat,
    today: NaiveDate,
    use_colors: bool,
) -> String {
    if events.is_empty() {
        return format!("{}\n", NO_MATCHES);
    }

    let dates: Vec<String> = events
        .iter()
        .map(|e| format_event_date(&e.start_date, date_format, today))
        .collect();
    let date_width = dates
        .iter()
        .map(|d| d.chars().count())
        .max()
        .unwrap_or(0)
        .max("Date".len());

    let mut output = String::new();
    let header_line = format!(
        "{} {} {:<5} {} {} {:<8} {}",
        pad("ID", ID_WIDTH),
        pad("Date", date_width),
        "Time",
        pad("Type", TYPE_WIDTH),
        pad("Venue", VENUE_WIDTH),
        "Cost",
        "Title"
    );
    output.push_str(&header(&header_line, use_colors));
    output.push('\n');

    for (event, date) in events.iter().zip(&dates) {
        let cost = pad(&event.cost_display(), 8);
        let cost = if use_colors && event.is_free() {
            cost.green().to_string()
        } else {
            cost
        };
        let line = format!(
            "{} {} {:<5} {} {} {} {}",
            pad(&truncate_str(&event.id, ID_WIDTH), ID_WIDTH),
            pad(date, date_width),
            format_event_time(&event.start_time),
            pad(&truncate_str(&event.event_type, TYPE_WIDTH), TYPE_WIDTH),
            pad(&truncate_str(&event.venue, VENUE_WIDTH), VENUE_WIDTH),
            cost,
            event.title
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Formats the details of one event.
pub fn format_event_details_table(
    event: &EventRecord,
    date_format: DateFormat,
    today: NaiveDate,
    use_colors: bool,
) -> String {
    let mut output = String::new();

    let title_label = if use_colors {
        "Event:".bold().to_string()
    } else {
        "Event:".to_string()
    };
    output.push_str(&format!("{} {}\n", title_label, event.title));
    output.push_str(&format!("ID: {}\n", event.id));
    if !event.event_type.is_empty() {
        output.push_str(&format!("Type: {}\n", event.event_type));
    }
    if !event.venue.is_empty() {
        output.push_str(&format!("Venue: {}\n", event.venue));
    }

    let start = format_event_date(&event.start_date, date_format, today);
    if event.start_time.trim().is_empty() {
        output.push_str(&format!("Starts: {}\n", start));
    } else {
        output.push_str(&format!(
            "Starts: {} at {}\n",
            start,
            format_event_time(&event.start_time)
        ));
    }
    if let Some(end_date) = event.end_date.as_deref() {
        let end = format_event_date(end_date, date_format, today);
        match event.end_time.as_deref() {
            Some(time) if !time.trim().is_empty() => {
                output.push_str(&format!("Ends: {} at {}\n", end, format_event_time(time)))
            }
            _ => output.push_str(&format!("Ends: {}\n", end)),
        }
    }

    output.push_str(&format!("Cost: {}\n", format_cost(event, use_colors)));
    if event.has_image() {
        output.push_str("Image: yes (use --save-image to download)\n");
    }

    if let Some(description) = event.description.as_deref().filter(|d| !d.trim().is_empty()) {
        output.push_str("Description:\n");
        for line in description.lines() {
            output.push_str(&format!("  {}\n", line));
        }
    }

    output
}

/// Formats event details as JSON.
pub fn format_event_details_json(
    event: &EventRecord,
    image_saved_to: Option<String>,
) -> Result<String, serde_json::Error> {
    let output = EventDetailsOutput {
        event: EventOutput::from(event),
        description: event.description.as_deref(),
        image_saved_to,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a venue list.
pub fn format_venues_table(venues: &[&str]) -> String {
    if venues.is_empty() {
        return "No venues found.\n".to_string();
    }
    let mut output = String::new();
    for venue in venues {
        output.push_str(venue);
        output.push('\n');
    }
    output
}

/// Formats a venue list as JSON.
pub fn format_venues_json(venues: &[&str]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "venues": venues }))
}
