use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod logging;
mod output;

use cli::{Cli, Commands};
use commands::config::{load_config, Config};
use commands::{CommandContext, CommandError};
use dispatch::{
    AuthCommand, AuthDispatch, LocalCommand, LocalDispatch, PublicCommand, PublicDispatch,
};
use eventhive_api::error::ApiError;
use eventhive_api::session::{Role, Session};
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("{error_json}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let is_config_command = matches!(cli.command, Some(Commands::Config { .. }));

    // A broken config file must not lock the user out of `eh config`.
    let config = match load_config() {
        Ok(config) => config,
        Err(e) if is_config_command => {
            warn!(error = %e, "using default configuration");
            Config::default()
        }
        Err(e) => return Err(e),
    };
    let ctx = match CommandContext::from_cli(cli, &config) {
        Ok(ctx) => ctx,
        Err(e) if is_config_command => {
            warn!(error = %e, "using default configuration");
            CommandContext::from_cli(cli, &Config::default())?
        }
        Err(e) => return Err(e),
    };

    if let Some(dispatch) = LocalDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx).await;
    }

    let client = commands::build_client(cli, &config)?;

    if let Some(dispatch) = PublicDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx, &client).await;
    }

    if let Some(dispatch) = AuthDispatch::from_cli(cli) {
        let session = resolve_session(cli, &ctx)?;
        return dispatch.execute(&ctx, &client, &session).await;
    }

    debug!(command = ?cli.command, "no handler");
    Ok(())
}

/// Resolves the session with priority: flag > env > stored session.
///
/// A token given with `--token` or `EVENTHIVE_TOKEN` is treated as an admin
/// token; the backend decides whether it really is one.
fn resolve_session(cli: &Cli, ctx: &CommandContext) -> commands::Result<Session> {
    if let Some(token) = cli.token.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok(Session::from_token(token.trim(), Role::Admin));
    }

    commands::auth::load_session(ctx)?.ok_or_else(|| {
        CommandError::NotAuthenticated(
            "run 'eh signin --admin' or set EVENTHIVE_TOKEN".to_string(),
        )
    })
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Api(api) => match api.as_api_error() {
            Some(ApiError::Network { .. }) => "NETWORK_ERROR",
            Some(ApiError::RateLimit { .. }) => "RATE_LIMITED",
            Some(ApiError::Auth { .. }) => "AUTH_ERROR",
            Some(ApiError::NotFound { .. }) => "NOT_FOUND",
            Some(ApiError::Validation { .. }) => "VALIDATION_ERROR",
            _ => "API_ERROR",
        },
        CommandError::Session(_) => "SESSION_ERROR",
        CommandError::Draft(_) => "VALIDATION_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
        CommandError::Prompt(_) => "PROMPT_ERROR",
        CommandError::NotAuthenticated(_) => "NOT_AUTHENTICATED",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Api(api) => u8::try_from(api.exit_code()).unwrap_or(2),
        CommandError::Session(_) => 5,
        CommandError::Draft(_) => 1,
        CommandError::Config(_) => 5,
        CommandError::Io(_) => 3,
        CommandError::Json(_) => 1,
        CommandError::Prompt(_) => 1,
        CommandError::NotAuthenticated(_) => 5,
    }
}
