//! Outgoing payloads for event creation and AI-assisted descriptions.

use std::path::Path;

use base64::Engine;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 50;

/// Maximum venue length in characters.
pub const MAX_VENUE_CHARS: usize = 150;

/// Maximum image upload size in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Event type used when none is given.
pub const DEFAULT_EVENT_TYPE: &str = "ONLINE";

/// Accepted image file extensions.
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A new event as submitted by an administrator.
///
/// Serializes with the keys the create-event endpoint expects
/// (`startDate`, `eventType`, ..., `image_base64`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub venue: String,
    pub event_type: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub cost: String,
    pub description: String,
    #[serde(rename = "image_base64")]
    pub image_base64: Option<String>,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            venue: String::new(),
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            start_date: String::new(),
            end_date: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            cost: String::new(),
            description: String::new(),
            image_base64: None,
        }
    }
}

impl EventDraft {
    /// Attaches image bytes, base64-encoding them.
    pub fn with_image_bytes(mut self, bytes: &[u8]) -> Self {
        self.image_base64 = Some(base64::engine::general_purpose::STANDARD.encode(bytes));
        self
    }

    /// Validates the draft.
    ///
    /// Checks lengths, required fields, date/time formats, chronological order and
    /// the presence of an image. Errors are reported one at a time, in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length("title", &self.title, MAX_TITLE_CHARS)?;
        check_length("venue", &self.venue, MAX_VENUE_CHARS)?;
        validate_schedule(
            &self.start_date,
            &self.end_date,
            &self.start_time,
            &self.end_time,
        )?;
        require("cost", &self.cost)?;
        if self.image_base64.as_deref().is_none_or_blank() {
            return Err(ValidationError::Missing { field: "image" });
        }
        Ok(())
    }
}

trait BlankExt {
    fn is_none_or_blank(&self) -> bool;
}

impl BlankExt for Option<&str> {
    fn is_none_or_blank(&self) -> bool {
        self.map_or(true, |s| s.trim().is_empty())
    }
}

/// Request for an AI-generated event description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionRequest {
    pub title: String,
    pub venue: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub cost: String,
}

impl DescriptionRequest {
    /// Builds the request from a draft's details.
    pub fn from_draft(draft: &EventDraft) -> Self {
        Self {
            title: draft.title.clone(),
            venue: draft.venue.clone(),
            start_date: draft.start_date.clone(),
            end_date: draft.end_date.clone(),
            start_time: draft.start_time.clone(),
            end_time: draft.end_time.clone(),
            cost: draft.cost.clone(),
        }
    }

    /// All event details must be filled in before a description can be generated.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length("title", &self.title, MAX_TITLE_CHARS)?;
        check_length("venue", &self.venue, MAX_VENUE_CHARS)?;
        validate_schedule(
            &self.start_date,
            &self.end_date,
            &self.start_time,
            &self.end_time,
        )?;
        require("cost", &self.cost)
    }
}

/// Generated description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DescriptionResponse {
    pub description: String,
}

/// Checks an image file name and size against the upload rules.
pub fn validate_image(path: &Path, size: u64) -> Result<(), ValidationError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::UnsupportedImage { extension });
    }
    if size > MAX_IMAGE_BYTES {
        return Err(ValidationError::ImageTooLarge { size });
    }
    Ok(())
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Missing { field })
    } else {
        Ok(())
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    require(field, value)?;
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    require(field, value)?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        }
    })
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ValidationError> {
    require(field, value)?;
    let value_trimmed = value.trim();
    NaiveTime::parse_from_str(value_trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value_trimmed, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTime {
            field,
            value: value.to_string(),
        })
}

fn validate_schedule(
    start_date: &str,
    end_date: &str,
    start_time: &str,
    end_time: &str,
) -> Result<(), ValidationError> {
    let start = NaiveDateTime::new(
        parse_date("start date", start_date)?,
        parse_time("start time", start_time)?,
    );
    let end = NaiveDateTime::new(
        parse_date("end date", end_date)?,
        parse_time("end time", end_time)?,
    );
    if start >= end {
        return Err(ValidationError::StartNotBeforeEnd);
    }
    Ok(())
}
