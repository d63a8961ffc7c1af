//! Event records as returned by the backend.

use base64::Engine;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Ticket price of an event.
///
/// The backend sends the price either as a JSON string or a JSON number. The raw
/// representation is kept so it can be echoed back exactly as received.
///
/// ```
/// use eventhive_api::models::Cost;
///
/// let free: Cost = serde_json::from_str(r#""0""#).unwrap();
/// assert!(free.is_free());
///
/// let paid: Cost = serde_json::from_str("499").unwrap();
/// assert!(!paid.is_free());
/// assert_eq!(paid.display(), "₹499");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cost {
    /// Numeric price.
    Number(f64),
    /// Price as text, e.g. `"250"` or `"0.00"`.
    Text(String),
}

impl Cost {
    /// Returns the numeric amount if the price can be read as a number.
    pub fn amount(&self) -> Option<f64> {
        match self {
            Cost::Number(n) => Some(*n),
            Cost::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Returns true when the event is free: zero in either representation, or blank.
    pub fn is_free(&self) -> bool {
        match self {
            Cost::Text(s) if s.trim().is_empty() => true,
            _ => self.amount() == Some(0.0),
        }
    }

    /// The raw price without currency symbol.
    pub fn raw(&self) -> String {
        match self {
            Cost::Number(n) if n.fract() == 0.0 => format!("{n:.0}"),
            Cost::Number(n) => n.to_string(),
            Cost::Text(s) => s.trim().to_string(),
        }
    }

    /// Price for display: `Free` or `₹<amount>`.
    pub fn display(&self) -> String {
        if self.is_free() {
            "Free".to_string()
        } else {
            format!("₹{}", self.raw())
        }
    }
}

/// An event listing.
///
/// Required fields are `_id` and `title`; everything else defaults when missing
/// or `null`. Use [`EventRecord::from_value`] or [`decode_events`] to get the
/// boundary checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier (`_id` on the wire, `id` also accepted).
    #[serde(rename = "_id", alias = "id", deserialize_with = "string_or_number")]
    pub id: String,

    /// Event title.
    pub title: String,

    /// Venue name, used as a categorical filter key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub venue: String,

    /// Event type (e.g. "ONLINE", "Workshop"), used as a categorical filter key.
    #[serde(default, alias = "eventType", deserialize_with = "null_as_default")]
    pub event_type: String,

    /// Start date as sent by the backend (ISO 8601).
    #[serde(default, alias = "startDate", deserialize_with = "null_as_default")]
    pub start_date: String,

    /// Start time as sent by the backend.
    #[serde(default, alias = "startTime", deserialize_with = "null_as_default")]
    pub start_time: String,

    #[serde(default, alias = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(default, alias = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// Ticket price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Cost>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Base64-encoded image bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
}

fn null_as_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Why a record was rejected at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The record does not have the expected shape.
    #[error("malformed event record: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A required field is present but blank.
    #[error("event record has an empty '{0}'")]
    Blank(&'static str),
}

impl EventRecord {
    /// Decodes and validates a single record.
    pub fn from_value(value: serde_json::Value) -> std::result::Result<Self, RecordError> {
        let record: EventRecord = serde_json::from_value(value)?;
        if record.id.trim().is_empty() {
            return Err(RecordError::Blank("_id"));
        }
        if record.title.trim().is_empty() {
            return Err(RecordError::Blank("title"));
        }
        Ok(record)
    }

    /// Parses the start date.
    ///
    /// Accepts `YYYY-MM-DD` or an RFC 3339 datetime (the date part is used).
    /// Returns `None` for anything else.
    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_event_date(&self.start_date)
    }

    /// Returns true if the event is free. A missing price counts as free.
    pub fn is_free(&self) -> bool {
        self.cost.as_ref().map_or(true, Cost::is_free)
    }

    /// Price for display.
    pub fn cost_display(&self) -> String {
        self.cost
            .as_ref()
            .map(Cost::display)
            .unwrap_or_else(|| "Free".to_string())
    }

    /// Returns true if the record carries an image payload.
    pub fn has_image(&self) -> bool {
        self.image_base64
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    /// Decodes the image payload. A `data:` URL prefix is tolerated.
    pub fn decode_image(&self) -> Option<std::result::Result<Vec<u8>, base64::DecodeError>> {
        let raw = self.image_base64.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        let payload = match raw.split_once(";base64,") {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => raw,
        };
        Some(base64::engine::general_purpose::STANDARD.decode(payload))
    }
}

/// Parses a date the way event records carry it.
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// A record that failed boundary validation.
#[derive(Debug)]
pub struct RejectedRecord {
    /// Position in the payload array.
    pub index: usize,
    /// Reason for rejection.
    pub reason: RecordError,
}

/// Result of decoding an event collection.
#[derive(Debug, Default)]
pub struct DecodedEvents {
    /// Valid records, in payload order.
    pub events: Vec<EventRecord>,
    /// Records dropped at the boundary.
    pub rejected: Vec<RejectedRecord>,
}

/// Decodes an event collection payload.
///
/// The payload must be a JSON array; other shapes are an error. Records that
/// fail validation are dropped and reported in [`DecodedEvents::rejected`], the
/// rest keep their relative order.
pub fn decode_events(payload: serde_json::Value) -> Result<DecodedEvents> {
    let values = match payload {
        serde_json::Value::Array(values) => values,
        other => {
            return Err(Error::InvalidPayload(format!(
                "expected a JSON array of events, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut decoded = DecodedEvents::default();
    for (index, value) in values.into_iter().enumerate() {
        match EventRecord::from_value(value) {
            Ok(record) => decoded.events.push(record),
            Err(reason) => {
                warn!(index, %reason, "dropping event record");
                decoded.rejected.push(RejectedRecord { index, reason });
            }
        }
    }
    Ok(decoded)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
