//! HTTP client for the Event Hive backend.

use std::fmt;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::error::{ApiError, Error, Result};
use crate::models::{
    decode_events, DecodedEvents, DescriptionRequest, DescriptionResponse, EventDraft,
    EventRecord, HealthResponse, SignInRequest, SignInResponse, SignUpRequest, ValidationError,
};
use crate::retry::{
    execute_empty_with_retry, execute_with_retry, RetryConfig, DEFAULT_INITIAL_BACKOFF_SECS,
    DEFAULT_MAX_BACKOFF_SECS, DEFAULT_MAX_RETRIES,
};
use crate::session::{Role, Session};

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the Event Hive REST API.
///
/// The client carries no credentials: endpoints that require a bearer token
/// take an explicit [`Session`].
#[derive(Clone)]
pub struct EventHiveClient {
    http_client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl fmt::Debug for EventHiveClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHiveClient")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.retry.max_retries)
            .finish_non_exhaustive()
    }
}

/// Builder for [`EventHiveClient`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use eventhive_api::client::EventHiveClientBuilder;
///
/// let client = EventHiveClientBuilder::new()
///     .base_url("http://localhost:8000")
///     .max_retries(5)
///     .request_timeout(Duration::from_secs(10))
///     .build()?;
/// assert_eq!(client.base_url(), "http://localhost:8000");
/// # Ok::<(), eventhive_api::error::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct EventHiveClientBuilder {
    base_url: String,
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
    request_timeout: Duration,
}

impl Default for EventHiveClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHiveClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_secs(DEFAULT_INITIAL_BACKOFF_SECS),
            max_backoff: Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the backend address. A trailing slash is ignored.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets how many times a rate-limited request is retried.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = backoff;
        self
    }

    /// Sets the per-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the underlying HTTP client cannot be created.
    pub fn build(self) -> Result<EventHiveClient> {
        let http_client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(Error::Http)?;

        Ok(EventHiveClient {
            http_client,
            base_url: self.base_url,
            retry: RetryConfig {
                max_retries: self.max_retries,
                initial_backoff: self.initial_backoff,
                max_backoff: self.max_backoff,
            },
        })
    }
}

impl EventHiveClient {
    /// Creates a client for the default backend address.
    pub fn new() -> Result<Self> {
        EventHiveClientBuilder::new().build()
    }

    /// Creates a client for a custom backend address.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        EventHiveClientBuilder::new().base_url(base_url).build()
    }

    pub fn builder() -> EventHiveClientBuilder {
        EventHiveClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_retries(&self) -> u32 {
        self.retry.max_retries
    }

    pub fn initial_backoff(&self) -> Duration {
        self.retry.initial_backoff
    }

    pub fn max_backoff(&self) -> Duration {
        self.retry.max_backoff
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authorize(
        request: reqwest::RequestBuilder,
        session: Option<&Session>,
    ) -> reqwest::RequestBuilder {
        match session {
            Some(session) => request.bearer_auth(&session.token),
            None => request,
        }
    }

    /// Performs a GET request and decodes the JSON response.
    ///
    /// Rate-limited requests are retried with backoff.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        session: Option<&Session>,
    ) -> Result<T> {
        let url = self.url(endpoint);
        debug!(%url, authenticated = session.is_some(), "GET");

        execute_with_retry(&self.retry, || async {
            let request = Self::authorize(self.http_client.get(&url), session);
            Ok(request.send().await?)
        })
        .await
    }

    /// Performs a POST request with a JSON body and decodes the JSON response.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        session: Option<&Session>,
    ) -> Result<T> {
        let url = self.url(endpoint);
        debug!(%url, authenticated = session.is_some(), "POST");

        execute_with_retry(&self.retry, || async {
            let request = Self::authorize(self.http_client.post(&url), session);
            Ok(request.json(body).send().await?)
        })
        .await
    }

    /// Performs a POST request with a JSON body, ignoring the response body.
    pub async fn post_empty<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        session: Option<&Session>,
    ) -> Result<()> {
        let url = self.url(endpoint);
        debug!(%url, authenticated = session.is_some(), "POST");

        execute_empty_with_retry(&self.retry, || async {
            let request = Self::authorize(self.http_client.post(&url), session);
            Ok(request.json(body).send().await?)
        })
        .await
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// Checks that the backend is reachable.
    pub async fn health(&self) -> Result<HealthResponse> {
        self.get("/api/test/", None).await
    }

    /// Signs in and returns the resulting session.
    ///
    /// `Role::Admin` uses the administrator endpoint.
    pub async fn sign_in(&self, request: &SignInRequest, role: Role) -> Result<Session> {
        let endpoint = match role {
            Role::User => "/api/signin/",
            Role::Admin => "/api/admin/signin/",
        };
        let response: SignInResponse = self.post(endpoint, request, None).await?;
        if response.token.trim().is_empty() {
            return Err(Error::InvalidPayload(
                "sign-in response carried an empty token".to_string(),
            ));
        }
        info!(%role, "signed in");
        Ok(Session::new(response.token, role, Some(request.email.clone())))
    }

    /// Registers a new user account.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<()> {
        self.post_empty("/api/signup/", request, None).await
    }

    /// Lists all public events.
    pub async fn list_events(&self) -> Result<DecodedEvents> {
        let payload: serde_json::Value = self.get("/api/events/", None).await?;
        decode_events(payload)
    }

    /// Lists the events authored by the signed-in administrator.
    pub async fn list_admin_events(&self, session: &Session) -> Result<DecodedEvents> {
        let payload: serde_json::Value =
            self.get("/api/admin/admin_events/", Some(session)).await?;
        decode_events(payload)
    }

    /// Fetches a single event.
    pub async fn get_event(&self, id: &str) -> Result<EventRecord> {
        let id = validate_event_id(id)?;
        let payload: serde_json::Value = self
            .get(&format!("/api/user/events/{}/", id), None)
            .await
            .map_err(|e| match e {
                Error::Api(ApiError::NotFound { .. }) => Error::Api(ApiError::NotFound {
                    resource: "event".to_string(),
                    id: id.to_string(),
                }),
                other => other,
            })?;
        EventRecord::from_value(payload).map_err(|e| Error::InvalidPayload(e.to_string()))
    }

    /// Creates an event. The draft is validated before anything is sent.
    pub async fn create_event(&self, session: &Session, draft: &EventDraft) -> Result<()> {
        draft.validate()?;
        self.post_empty("/api/admin/create_event/", draft, Some(session))
            .await?;
        info!(title = %draft.title, "event created");
        Ok(())
    }

    /// Asks the backend to write a description for an event.
    pub async fn generate_description(
        &self,
        session: &Session,
        request: &DescriptionRequest,
    ) -> Result<String> {
        request.validate()?;
        let response: DescriptionResponse = self
            .post("/api/admin/ai_description/", request, Some(session))
            .await?;
        Ok(response.description)
    }
}

/// Rejects ids that would change the request path.
fn validate_event_id(id: &str) -> std::result::Result<&str, ValidationError> {
    let id = id.trim();
    let ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(id)
    } else {
        Err(ValidationError::InvalidId(id.to_string()))
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
