//! Data types exchanged with the Event Hive backend.
//!
//! Incoming event records are decoded leniently at the boundary; outgoing
//! payloads are validated locally before any request is made.

mod auth;
mod draft;
mod event;
mod validation;

pub use auth::*;
pub use draft::*;
pub use event::*;
pub use validation::ValidationError;
