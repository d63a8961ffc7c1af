//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```
//! use eventhive_api::prelude::*;
//!
//! // Now you have access to:
//! // - EventHiveClient, EventHiveClientBuilder (API client)
//! // - Session, SessionStore, Role (authentication state)
//! // - Error, ApiError, Result (error handling)
//! // - EventRecord, EventDraft, Cost, etc. (data models)
//! ```

// Client types
pub use crate::client::{EventHiveClient, EventHiveClientBuilder};

// Session types
pub use crate::session::{Role, Session, SessionStore, SessionStoreError};

// Error types
pub use crate::error::{ApiError, Error, Result};

// Data models
pub use crate::models::{
    decode_events, Cost, DecodedEvents, DescriptionRequest, EventDraft, EventRecord,
    HealthResponse, RejectedRecord, SignInRequest, SignUpRequest, ValidationError,
};
