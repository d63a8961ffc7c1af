//! Sending requests with backoff on rate limits.
//!
//! Only `429 Too Many Requests` is retried. Every other non-2xx answer is
//! turned into an [`ApiError`] straight away.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{ApiError, Error, Result};

pub(crate) const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 1;

/// Upper bound for any single wait, including server-sent `Retry-After`.
pub(crate) const DEFAULT_MAX_BACKOFF_SECS: u64 = 30;

pub(crate) const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Clone, Debug)]
pub(crate) struct RetryConfig {
    /// Retries after the first attempt; 0 disables retrying.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_secs(DEFAULT_INITIAL_BACKOFF_SECS),
            max_backoff: Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
        }
    }
}

impl RetryConfig {
    /// Wait before retry number `attempt` (0-based).
    ///
    /// A `Retry-After` value wins; otherwise `initial_backoff * 2^attempt`.
    /// Both are capped at `max_backoff`.
    pub fn calculate_backoff(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        let wait = match retry_after {
            Some(secs) => Duration::from_secs(secs),
            None => 1u32
                .checked_shl(attempt)
                .and_then(|factor| self.initial_backoff.checked_mul(factor))
                .unwrap_or(self.max_backoff),
        };
        wait.min(self.max_backoff)
    }
}

fn retry_after_header(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Pulls a human readable message out of an error body.
///
/// The backend answers `{"error": "..."}`; Django's default handlers use `detail`.
/// Anything else is returned verbatim.
pub(crate) fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    body.trim().to_string()
}

/// Maps a non-2xx response to an [`Error`].
pub(crate) async fn parse_error_response(response: reqwest::Response) -> Error {
    let status = response.status();
    let retry_after = retry_after_header(&response);
    let message = extract_error_message(&response.text().await.unwrap_or_default());
    let message_or = |fallback: &str| {
        if message.is_empty() {
            fallback.to_string()
        } else {
            message.clone()
        }
    };

    let api_error = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth {
            message: message_or("Authentication failed"),
        },
        StatusCode::NOT_FOUND => ApiError::NotFound {
            resource: "resource".to_string(),
            id: "unknown".to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimit { retry_after },
        StatusCode::BAD_REQUEST => ApiError::Validation {
            field: None,
            message: message_or("Bad request"),
        },
        _ => ApiError::Http {
            status: status.as_u16(),
            message: message_or(status.canonical_reason().unwrap_or("Unknown error")),
        },
    };

    debug!(status = status.as_u16(), error = %api_error, "request failed");
    Error::Api(api_error)
}

/// Sends the request built by `make_request`, retrying while the backend
/// answers 429 and retries remain. Returns the first 2xx response.
async fn send_with_retry<F, Fut>(
    config: &RetryConfig,
    mut make_request: F,
) -> Result<reqwest::Response>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response>>,
{
    let mut attempt = 0;
    loop {
        let response = make_request().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status != StatusCode::TOO_MANY_REQUESTS || attempt >= config.max_retries {
            return Err(parse_error_response(response).await);
        }

        let backoff = config.calculate_backoff(attempt, retry_after_header(&response));
        warn!(attempt, ?backoff, "rate limited, backing off");
        sleep(backoff).await;
        attempt += 1;
    }
}

/// Sends with retry and decodes the JSON body.
pub(crate) async fn execute_with_retry<T, F, Fut>(
    config: &RetryConfig,
    make_request: F,
) -> Result<T>
where
    T: DeserializeOwned,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response>>,
{
    let response = send_with_retry(config, make_request).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Sends with retry and discards the body.
pub(crate) async fn execute_empty_with_retry<F, Fut>(
    config: &RetryConfig,
    make_request: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response>>,
{
    send_with_retry(config, make_request).await.map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_from_error_field() {
        assert_eq!(
            extract_error_message(r#"{"error": "Invalid credentials"}"#),
            "Invalid credentials"
        );
    }

    #[test]
    fn test_extract_error_message_from_detail_field() {
        assert_eq!(
            extract_error_message(r#"{"detail": "Authentication credentials were not provided."}"#),
            "Authentication credentials were not provided."
        );
    }

    #[test]
    fn test_extract_error_message_plain_text() {
        assert_eq!(extract_error_message("  Server exploded \n"), "Server exploded");
        assert_eq!(extract_error_message(""), "");
    }

    #[test]
    fn test_extract_error_message_json_without_known_field() {
        assert_eq!(extract_error_message(r#"{"code": 7}"#), r#"{"code": 7}"#);
    }

    #[test]
    fn test_backoff_sub_second_initial() {
        let config = RetryConfig {
            max_retries: 3,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(50),
        };
        assert_eq!(config.calculate_backoff(0, None), Duration::from_millis(10));
        assert_eq!(config.calculate_backoff(2, None), Duration::from_millis(40));
        assert_eq!(config.calculate_backoff(3, None), Duration::from_millis(50));
        assert_eq!(config.calculate_backoff(40, None), Duration::from_millis(50));
    }
}
