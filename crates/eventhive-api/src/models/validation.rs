//! Client-side validation errors for outgoing payloads.

use thiserror::Error;

/// A payload failed local validation before being sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is blank.
    #[error("{field} is required")]
    Missing {
        /// Field name as the user sees it.
        field: &'static str,
    },

    /// A field is longer than allowed.
    #[error("{field} cannot exceed {max} characters")]
    TooLong {
        /// Field name as the user sees it.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },

    /// The email address has no `@`.
    #[error("email is not valid")]
    InvalidEmail,

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// A date is not `YYYY-MM-DD`.
    #[error("{field} must be a date in YYYY-MM-DD format (got '{value}')")]
    InvalidDate {
        /// Field name as the user sees it.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A time is not `HH:MM`.
    #[error("{field} must be a time in HH:MM format (got '{value}')")]
    InvalidTime {
        /// Field name as the user sees it.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The event ends before (or when) it starts.
    #[error("start date/time must be before end date/time")]
    StartNotBeforeEnd,

    /// The image is not a JPG/JPEG/PNG file.
    #[error("only JPG, JPEG, or PNG files are allowed (got '{extension}')")]
    UnsupportedImage {
        /// The rejected extension, lowercased.
        extension: String,
    },

    /// The image is larger than the upload limit.
    #[error("image size must be less than 5MB (got {size} bytes)")]
    ImageTooLarge {
        /// Size of the rejected file in bytes.
        size: u64,
    },

    /// An identifier cannot be used in a request path.
    #[error("invalid event id '{0}'")]
    InvalidId(String),
}
