//! Command implementations for the eh CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod auth;
pub mod browse;
pub mod completions;
pub mod config;
pub mod create;
pub mod events;
pub mod keyring;
pub mod ping;
pub mod prompt;
pub mod show;
pub mod venues;

use std::env;

use chrono::NaiveDate;
use eventhive_api::client::EventHiveClient;
use eventhive_api::models::{DecodedEvents, ValidationError};
use eventhive_api::session::{Session, SessionStoreError};
use eventhive_search::{local_today, EventTypeMatch};
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::output::DateFormat;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// API error.
    #[error("API error: {0}")]
    Api(#[from] eventhive_api::error::Error),

    /// Session file error.
    #[error("session error: {0}")]
    Session(#[from] SessionStoreError),

    /// Local validation of user input failed.
    #[error("invalid input: {0}")]
    Draft(#[from] ValidationError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Interactive prompt failed.
    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// No usable session for a command that needs one.
    #[error("not signed in: {0}")]
    NotAuthenticated(String),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// How dates are displayed.
    pub date_format: DateFormat,
    /// Default comparison for the event type filter.
    pub event_type_match: EventTypeMatch,
    /// Whether the session lives in the OS keyring.
    pub keyring_storage: bool,
}

impl CommandContext {
    /// Creates a command context from CLI arguments and the loaded config.
    ///
    /// Colors are off when `--no-color` is given, when `output.color = false`,
    /// or when `NO_COLOR` is set.
    pub fn from_cli(cli: &Cli, config: &Config) -> Result<Self> {
        let no_color_env = env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Ok(Self {
            json_output: cli.json,
            use_colors: !cli.no_color && !no_color_env && config.output.color != Some(false),
            quiet: cli.quiet,
            verbose: cli.verbose,
            date_format: config.date_format(),
            event_type_match: config.event_type_match()?,
            keyring_storage: config.uses_keyring(),
        })
    }
}

/// Builds the HTTP client.
///
/// The base URL comes from `--url`/`EVENTHIVE_URL`, then the config file, then
/// the built-in default.
pub fn build_client(cli: &Cli, config: &Config) -> Result<EventHiveClient> {
    let mut builder = EventHiveClient::builder();
    if let Some(url) = cli.url.as_deref().or(config.base_url.as_deref()) {
        builder = builder.base_url(url);
    }
    if let Some(timeout) = config.timeout() {
        builder = builder.request_timeout(timeout);
    }
    if let Some(retries) = config.http.max_retries {
        builder = builder.max_retries(retries);
    }
    let client = builder.build()?;
    debug!(base_url = client.base_url(), "client ready");
    Ok(client)
}

/// Fetches either the public collection or the admin's own events.
pub async fn fetch_events(
    ctx: &CommandContext,
    client: &EventHiveClient,
    session: Option<&Session>,
) -> Result<DecodedEvents> {
    let decoded = match session {
        Some(session) => client.list_admin_events(session).await?,
        None => client.list_events().await?,
    };

    if !decoded.rejected.is_empty() {
        warn!(
            rejected = decoded.rejected.len(),
            kept = decoded.events.len(),
            "some event records were malformed and skipped"
        );
        if ctx.verbose && !ctx.json_output {
            for rejected in &decoded.rejected {
                eprintln!("Skipped record #{}: {}", rejected.index, rejected.reason);
            }
        }
    }

    Ok(decoded)
}

/// Anchor day for date ranges: the override if given, otherwise local today.
pub fn anchor_day(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(local_today)
}

/// Fails unless the session belongs to an administrator.
pub fn require_admin(session: &Session) -> Result<()> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(CommandError::NotAuthenticated(
            "this command needs an admin session; run 'eh signin --admin'".to_string(),
        ))
    }
}
