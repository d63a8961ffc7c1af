//! Event Hive API client library
//!
//! # Quick Start
//!
//! For convenient imports, use the prelude:
//!
//! ```
//! use eventhive_api::prelude::*;
//! ```
//!
//! This re-exports the most commonly used types including [`EventHiveClient`],
//! [`Session`], error types and data models.
//!
//! [`EventHiveClient`]: client::EventHiveClient
//! [`Session`]: session::Session

pub mod client;
pub mod error;
pub mod models;
pub mod prelude;
mod retry;
pub mod session;
