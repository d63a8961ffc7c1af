//! Account commands: signup, signin, signout and whoami.
//!
//! A successful sign-in is persisted either in the session file
//! (`~/.cache/eh/session.json`) or in the OS keyring, depending on
//! `token_storage`.

use eventhive_api::client::EventHiveClient;
use eventhive_api::models::{SignInRequest, SignUpRequest};
use eventhive_api::session::{Role, Session, SessionStore};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::debug;

use super::config::mask_token;
use super::{keyring, prompt, CommandContext, Result};

/// Options for the signup command.
#[derive(Debug, Default)]
pub struct SignupOptions {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_stdin: bool,
}

/// Options for the signin command.
#[derive(Debug, Default)]
pub struct SigninOptions {
    pub email: Option<String>,
    pub admin: bool,
    pub password_stdin: bool,
}

/// Loads the stored session, if any.
pub fn load_session(ctx: &CommandContext) -> Result<Option<Session>> {
    if ctx.keyring_storage {
        return keyring::get_session();
    }
    Ok(SessionStore::new()?.load_optional()?)
}

fn save_session(ctx: &CommandContext, session: &Session) -> Result<()> {
    if ctx.keyring_storage {
        return keyring::store_session(session);
    }
    SessionStore::new()?.save(session)?;
    Ok(())
}

/// Executes the signup command.
pub async fn execute_signup(
    ctx: &CommandContext,
    client: &EventHiveClient,
    opts: &SignupOptions,
) -> Result<()> {
    let name = prompt::text_or_prompt(opts.name.as_deref(), "Name", "--name")?;
    let email = prompt::text_or_prompt(opts.email.as_deref(), "Email", "--email")?;
    let (password, confirm) = if opts.password_stdin {
        let password = prompt::password_from_stdin()?;
        (password.clone(), password)
    } else {
        (
            prompt::password("Password")?,
            prompt::password("Confirm password")?,
        )
    };

    let request = SignUpRequest::new(name, email, password, &confirm)?;
    client.sign_up(&request).await?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "created",
            "email": request.email,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Account created for {}. Run 'eh signin' to sign in.", request.email);
    }
    Ok(())
}

/// Executes the signin command.
pub async fn execute_signin(
    ctx: &CommandContext,
    client: &EventHiveClient,
    opts: &SigninOptions,
) -> Result<()> {
    let email = prompt::text_or_prompt(opts.email.as_deref(), "Email", "--email")?;
    let password = if opts.password_stdin {
        prompt::password_from_stdin()?
    } else {
        prompt::password("Password")?
    };
    let role = if opts.admin { Role::Admin } else { Role::User };

    let request = SignInRequest::new(email, password)?;
    let session = client.sign_in(&request, role).await?;
    save_session(ctx, &session)?;
    debug!(role = %role, keyring = ctx.keyring_storage, "session stored");

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&SessionOutput::from(&session))?);
    } else if !ctx.quiet {
        let who = format!("{} ({})", request.email, role);
        if ctx.use_colors {
            println!("Signed in as {}", who.green());
        } else {
            println!("Signed in as {}", who);
        }
    }
    Ok(())
}

/// Executes the signout command. Succeeds when no session is stored.
pub fn execute_signout(ctx: &CommandContext) -> Result<()> {
    let store = SessionStore::new()?;
    let had_file = store.path().exists();
    store.clear()?;
    if ctx.keyring_storage {
        keyring::delete_session()?;
    }

    if ctx.json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "status": "signed_out" }))?
        );
    } else if !ctx.quiet {
        if had_file || ctx.keyring_storage {
            println!("Signed out.");
        } else {
            println!("No stored session.");
        }
    }
    Ok(())
}

/// Executes the whoami command.
pub fn execute_whoami(ctx: &CommandContext, token_override: Option<&str>) -> Result<()> {
    let session = match token_override {
        Some(token) => Some(Session::from_token(token, Role::Admin)),
        None => load_session(ctx)?,
    };

    if ctx.json_output {
        let output = match &session {
            Some(session) => serde_json::to_value(SessionOutput::from(session))?,
            None => serde_json::json!({ "signed_in": false }),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    match session {
        Some(session) => print!("{}", format_session(&session, token_override.is_some())),
        None => println!("Not signed in. Run 'eh signin' to sign in."),
    }
    Ok(())
}

fn format_session(session: &Session, from_env: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Email:  {}\n",
        session.email.as_deref().unwrap_or("(unknown)")
    ));
    out.push_str(&format!("Role:   {}\n", session.role));
    out.push_str(&format!("Token:  {}\n", mask_token(&session.token)));
    if from_env {
        out.push_str("Source: --token / EVENTHIVE_TOKEN\n");
    } else if let Some(created) = session.created_at {
        out.push_str(&format!(
            "Since:  {}\n",
            created.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        ));
    }
    out
}

/// JSON view of a session. The token is masked.
#[derive(Serialize)]
struct SessionOutput<'a> {
    signed_in: bool,
    email: Option<&'a str>,
    role: Role,
    token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
}

impl<'a> From<&'a Session> for SessionOutput<'a> {
    fn from(session: &'a Session) -> Self {
        Self {
            signed_in: true,
            email: session.email.as_deref(),
            role: session.role,
            token: mask_token(&session.token),
            created_at: session.created_at.map(|t| t.to_rfc3339()),
        }
    }
}
