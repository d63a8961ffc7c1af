//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands fall into three groups:
//! - local commands that never touch the network,
//! - public commands that need an HTTP client but no session,
//! - admin commands that need a client and a session.

use eventhive_api::client::EventHiveClient;
use eventhive_api::session::Session;

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::{self, CommandContext, Result};

/// Trait for commands that run without the backend.
#[allow(async_fn_in_trait)]
pub trait LocalCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that call public endpoints.
#[allow(async_fn_in_trait)]
pub trait PublicCommand {
    async fn execute(&self, ctx: &CommandContext, client: &EventHiveClient) -> Result<()>;
}

/// Trait for commands that require a signed-in session.
#[allow(async_fn_in_trait)]
pub trait AuthCommand {
    async fn execute(
        &self,
        ctx: &CommandContext,
        client: &EventHiveClient,
        session: &Session,
    ) -> Result<()>;
}

/// Commands that don't talk to the backend.
pub enum LocalDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Signout,
    Whoami { token: Option<&'a str> },
    Help,
}

impl<'a> LocalDispatch<'a> {
    /// Returns None if the command needs the backend.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            Some(Commands::Signout) => Some(Self::Signout),
            Some(Commands::Whoami) => Some(Self::Whoami {
                token: cli.token.as_deref(),
            }),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl LocalCommand for LocalDispatch<'_> {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command).await,
            Self::Completions(shell) => Ok(commands::completions::execute(shell)?),
            Self::Signout => commands::auth::execute_signout(ctx),
            Self::Whoami { token } => commands::auth::execute_whoami(ctx, *token),
            Self::Help => {
                if !ctx.quiet {
                    println!("eh - Event Hive CLI");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

async fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
        Some(ConfigCommands::Edit) => commands::config::execute_edit(ctx).await,
    }
}

/// Commands that use public endpoints only.
pub enum PublicDispatch<'a> {
    Ping,
    Signup {
        name: &'a Option<String>,
        email: &'a Option<String>,
        password_stdin: bool,
    },
    Signin {
        email: &'a Option<String>,
        admin: bool,
        password_stdin: bool,
    },
    Events(commands::events::EventsOptions),
    Venues,
    Show {
        event_id: &'a str,
        save_image: &'a Option<std::path::PathBuf>,
    },
    Browse {
        today: Option<chrono::NaiveDate>,
    },
}

impl<'a> PublicDispatch<'a> {
    /// Returns None for local commands and for commands that need a session.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Ping) => Some(Self::Ping),
            Some(Commands::Signup {
                name,
                email,
                password_stdin,
            }) => Some(Self::Signup {
                name,
                email,
                password_stdin: *password_stdin,
            }),
            Some(Commands::Signin {
                email,
                admin,
                password_stdin,
            }) => Some(Self::Signin {
                email,
                admin: *admin,
                password_stdin: *password_stdin,
            }),
            Some(Commands::Events { mine: false, .. }) => {
                events_options(&cli.command).map(Self::Events)
            }
            Some(Commands::Venues { mine: false }) => Some(Self::Venues),
            Some(Commands::Show {
                event_id,
                save_image,
            }) => Some(Self::Show {
                event_id,
                save_image,
            }),
            Some(Commands::Browse { mine: false, today }) => Some(Self::Browse { today: *today }),
            _ => None,
        }
    }
}

impl PublicCommand for PublicDispatch<'_> {
    async fn execute(&self, ctx: &CommandContext, client: &EventHiveClient) -> Result<()> {
        match self {
            Self::Ping => commands::ping::execute(ctx, client).await,
            Self::Signup {
                name,
                email,
                password_stdin,
            } => {
                let opts = commands::auth::SignupOptions {
                    name: (*name).clone(),
                    email: (*email).clone(),
                    password_stdin: *password_stdin,
                };
                commands::auth::execute_signup(ctx, client, &opts).await
            }
            Self::Signin {
                email,
                admin,
                password_stdin,
            } => {
                let opts = commands::auth::SigninOptions {
                    email: (*email).clone(),
                    admin: *admin,
                    password_stdin: *password_stdin,
                };
                commands::auth::execute_signin(ctx, client, &opts).await
            }
            Self::Events(opts) => commands::events::execute(ctx, client, None, opts).await,
            Self::Venues => commands::venues::execute(ctx, client, None).await,
            Self::Show {
                event_id,
                save_image,
            } => {
                let opts = commands::show::ShowOptions {
                    event_id: event_id.to_string(),
                    save_image: (*save_image).clone(),
                };
                commands::show::execute(ctx, client, &opts).await
            }
            Self::Browse { today } => commands::browse::execute(ctx, client, None, *today).await,
        }
    }
}

/// Commands that require a session.
pub enum AuthDispatch {
    Events(commands::events::EventsOptions),
    Venues,
    Browse { today: Option<chrono::NaiveDate> },
    Create(commands::create::CreateOptions),
    Describe(commands::create::EventDetails),
}

impl AuthDispatch {
    /// Create an auth dispatch from the CLI command.
    /// Returns None for commands handled by [`LocalDispatch`] or [`PublicDispatch`].
    pub fn from_cli(cli: &Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Events { mine: true, .. }) => {
                events_options(&cli.command).map(Self::Events)
            }
            Some(Commands::Venues { mine: true }) => Some(Self::Venues),
            Some(Commands::Browse { mine: true, today }) => Some(Self::Browse { today: *today }),
            Some(Commands::Create {
                title,
                venue,
                event_type,
                start_date,
                end_date,
                start_time,
                end_time,
                cost,
                description,
                ai_description,
                image,
            }) => Some(Self::Create(commands::create::CreateOptions {
                details: commands::create::EventDetails {
                    title: title.clone(),
                    venue: venue.clone(),
                    start_date: start_date.clone(),
                    end_date: end_date.clone(),
                    start_time: start_time.clone(),
                    end_time: end_time.clone(),
                    cost: cost.clone(),
                },
                event_type: event_type.clone(),
                description: description.clone(),
                ai_description: *ai_description,
                image: image.clone(),
            })),
            Some(Commands::Describe {
                title,
                venue,
                start_date,
                end_date,
                start_time,
                end_time,
                cost,
            }) => Some(Self::Describe(commands::create::EventDetails {
                title: title.clone(),
                venue: venue.clone(),
                start_date: start_date.clone(),
                end_date: end_date.clone(),
                start_time: start_time.clone(),
                end_time: end_time.clone(),
                cost: cost.clone(),
            })),
            _ => None,
        }
    }
}

impl AuthCommand for AuthDispatch {
    async fn execute(
        &self,
        ctx: &CommandContext,
        client: &EventHiveClient,
        session: &Session,
    ) -> Result<()> {
        match self {
            Self::Events(opts) => {
                commands::require_admin(session)?;
                commands::events::execute(ctx, client, Some(session), opts).await
            }
            Self::Venues => {
                commands::require_admin(session)?;
                commands::venues::execute(ctx, client, Some(session)).await
            }
            Self::Browse { today } => {
                commands::require_admin(session)?;
                commands::browse::execute(ctx, client, Some(session), *today).await
            }
            Self::Create(opts) => {
                commands::create::execute_create(ctx, client, session, opts).await
            }
            Self::Describe(details) => {
                commands::create::execute_describe(ctx, client, session, details).await
            }
        }
    }
}

fn events_options(command: &Option<Commands>) -> Option<commands::events::EventsOptions> {
    match command {
        Some(Commands::Events {
            event_type,
            venue,
            when,
            title_match,
            today,
            limit,
            ..
        }) => Some(commands::events::EventsOptions {
            event_type: event_type.clone(),
            venue: venue.clone(),
            when: when.clone(),
            title_match: *title_match,
            today: *today,
            limit: *limit,
        }),
        _ => None,
    }
}
