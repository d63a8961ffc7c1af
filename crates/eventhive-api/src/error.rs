//! Error types for the Event Hive API client.

/// A failed exchange with the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Any status without a dedicated variant, mostly 5xx.
    #[error("server returned {status}: {message}")]
    Http { status: u16, message: String },

    /// 401 or 403: bad credentials, or a missing or expired token.
    #[error("not authorized: {message}")]
    Auth { message: String },

    /// 429 after retries ran out.
    #[error(
        "rate limited{}",
        .retry_after.map(|s| format!(", retry after {s}s")).unwrap_or_default()
    )]
    RateLimit { retry_after: Option<u64> },

    #[error("{resource} '{id}' not found")]
    NotFound { resource: String, id: String },

    /// 400 from the backend, or input rejected before sending.
    #[error(
        "rejected: {}{message}",
        .field.as_ref().map(|f| format!("{f}: ")).unwrap_or_default()
    )]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// The backend could not be reached in time.
    #[error("cannot reach backend: {message}")]
    Network { message: String },
}

impl ApiError {
    /// Rate limits and connection failures may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::RateLimit { .. } | ApiError::Network { .. })
    }

    /// Process exit code: 3 network, 4 rate limit, 2 anything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            ApiError::Network { .. } => 3,
            ApiError::RateLimit { .. } => 4,
            _ => 2,
        }
    }
}

/// Top-level error for client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend answered with an error, or the request never reached it.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Transport error from reqwest that is not a connection failure.
    #[error("HTTP client error: {0}")]
    Http(reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response decoded as JSON but has the wrong shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::Api(ApiError::Network {
                message: err.to_string(),
            })
        } else if err.is_decode() {
            Error::InvalidPayload(err.to_string())
        } else {
            Error::Http(err)
        }
    }
}

impl Error {
    /// Returns the API error if this is one.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the appropriate CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Api(e) => e.exit_code(),
            Error::Http(_) => 3,
            Error::Json(_) | Error::InvalidPayload(_) => 2,
        }
    }
}

impl From<crate::models::ValidationError> for Error {
    fn from(err: crate::models::ValidationError) -> Self {
        Error::Api(ApiError::Validation {
            field: None,
            message: err.to_string(),
        })
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
