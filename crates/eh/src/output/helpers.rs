//! Common helper functions for output formatting.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use eventhive_api::models::{parse_event_date, EventRecord};
use eventhive_search::DateBucket;
use owo_colors::OwoColorize;

/// How event dates are displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFormat {
    /// `Wednesday, January 10, 2024`
    #[default]
    Long,
    /// `2024-01-10`
    Iso,
    /// `Jan 10`
    Short,
    /// `Today`, `Tomorrow`, `3 days ago`, otherwise `Jan 10`
    Relative,
}

impl DateFormat {
    pub const VALUES: [&'static str; 4] = ["long", "iso", "short", "relative"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::Long => "long",
            DateFormat::Iso => "iso",
            DateFormat::Short => "short",
            DateFormat::Relative => "relative",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(DateFormat::Long),
            "iso" => Ok(DateFormat::Iso),
            "short" => Ok(DateFormat::Short),
            "relative" => Ok(DateFormat::Relative),
            other => Err(format!(
                "Invalid date_format value '{}'. Valid values: {}",
                other,
                Self::VALUES.join(", ")
            )),
        }
    }
}

/// Truncates a string to at most `max_chars` characters, ending in `...`.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Pads `s` with spaces to `width` characters.
pub fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

/// Formats a calendar day.
pub fn format_day(date: NaiveDate, format: DateFormat, today: NaiveDate) -> String {
    match format {
        DateFormat::Long => date.format("%A, %B %-d, %Y").to_string(),
        DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
        DateFormat::Short => date.format("%b %d").to_string(),
        DateFormat::Relative => {
            let days = (date - today).num_days();
            match days {
                0 => "Today".to_string(),
                1 => "Tomorrow".to_string(),
                -1 => "Yesterday".to_string(),
                d if d < 0 => format!("{} days ago", -d),
                _ => date.format("%b %d").to_string(),
            }
        }
    }
}

/// Formats a raw event date. Values that do not parse are shown as sent.
pub fn format_event_date(raw: &str, format: DateFormat, today: NaiveDate) -> String {
    match parse_event_date(raw) {
        Some(date) => format_day(date, format, today),
        None if raw.trim().is_empty() => "-".to_string(),
        None => raw.trim().to_string(),
    }
}

/// Formats a raw event time as `HH:MM`. Values that do not parse are shown as sent.
pub fn format_event_time(raw: &str) -> String {
    let raw = raw.trim();
    ["%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Formats the ticket price, highlighting free events.
pub fn format_cost(event: &EventRecord, use_colors: bool) -> String {
    let display = event.cost_display();
    if use_colors && event.is_free() {
        display.green().to_string()
    } else {
        display
    }
}

/// Describes the days a bucket covers, e.g. `Jan 07 to Jan 13, 2024`.
pub fn format_span(bucket: DateBucket, anchor: NaiveDate) -> String {
    let (first, last) = bucket.span(anchor);
    if first == last {
        first.format("%a %b %d, %Y").to_string()
    } else {
        format!(
            "{} to {}",
            first.format("%a %b %d"),
            last.format("%a %b %d, %Y")
        )
    }
}

/// Applies the header style.
pub fn header(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}
