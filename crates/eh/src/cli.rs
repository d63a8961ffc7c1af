//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the eh CLI.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

/// eh - browse and publish Event Hive listings
#[derive(Parser, Debug)]
#[command(name = "eh")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Backend base URL (default: from config, then http://127.0.0.1:8000)
    #[arg(long, global = true, env = "EVENTHIVE_URL")]
    pub url: Option<String>,

    /// Admin bearer token (default: from the stored session)
    #[arg(long, global = true, env = "EVENTHIVE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the backend is reachable
    Ping,

    /// Create a user account
    Signup {
        /// Display name (prompted when missing)
        #[arg(long)]
        name: Option<String>,

        /// Email address (prompted when missing)
        #[arg(long)]
        email: Option<String>,

        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Sign in and store the session
    #[command(alias = "login")]
    Signin {
        /// Email address (prompted when missing)
        #[arg(long)]
        email: Option<String>,

        /// Sign in as an administrator
        #[arg(long)]
        admin: bool,

        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Forget the stored session
    #[command(alias = "logout")]
    Signout,

    /// Show the current session
    Whoami,

    /// List events, optionally filtered
    #[command(alias = "ls")]
    Events {
        /// List the events of the signed-in administrator
        #[arg(long)]
        mine: bool,

        /// Filter by event type (case-insensitive)
        #[arg(short = 't', long = "type")]
        event_type: Option<String>,

        /// Filter by venue (case-insensitive, whole name)
        #[arg(short = 'l', long)]
        venue: Option<String>,

        /// Filter by date range: today, tomorrow, this-week, this-weekend, next-week
        #[arg(short, long)]
        when: Option<String>,

        /// Match the type filter against event titles instead
        #[arg(long)]
        title_match: bool,

        /// Day to compute date ranges from (default: local today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        today: Option<NaiveDate>,

        /// Show at most this many events
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the distinct venues of the event collection
    Venues {
        /// Use the events of the signed-in administrator
        #[arg(long)]
        mine: bool,
    },

    /// Show event details
    Show {
        /// Event ID
        event_id: String,

        /// Write the event image to this file
        #[arg(long, value_name = "PATH")]
        save_image: Option<PathBuf>,
    },

    /// Publish a new event (admin)
    Create {
        /// Event title (at most 50 characters)
        #[arg(long)]
        title: String,

        /// Venue (at most 150 characters)
        #[arg(long)]
        venue: String,

        /// Event type
        #[arg(long = "type", default_value = eventhive_api::models::DEFAULT_EVENT_TYPE)]
        event_type: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end_date: String,

        /// Start time (HH:MM)
        #[arg(long)]
        start_time: String,

        /// End time (HH:MM)
        #[arg(long)]
        end_time: String,

        /// Ticket price, 0 for free events
        #[arg(long)]
        cost: String,

        /// Event description
        #[arg(long, conflicts_with = "ai_description")]
        description: Option<String>,

        /// Generate the description with the backend's AI endpoint
        #[arg(long)]
        ai_description: bool,

        /// Event image (jpg, jpeg or png, at most 5 MiB)
        #[arg(long, value_name = "PATH")]
        image: PathBuf,
    },

    /// Generate an event description without creating the event (admin)
    Describe {
        #[arg(long)]
        title: String,

        #[arg(long)]
        venue: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end_date: String,

        /// Start time (HH:MM)
        #[arg(long)]
        start_time: String,

        /// End time (HH:MM)
        #[arg(long)]
        end_time: String,

        #[arg(long)]
        cost: String,
    },

    /// Filter events interactively
    Browse {
        /// Browse the events of the signed-in administrator
        #[arg(long)]
        mine: bool,

        /// Day to compute date ranges from (default: local today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        today: Option<NaiveDate>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration (default)
    Show,

    /// Open the config file in $EDITOR
    Edit,

    /// Set a configuration value
    Set {
        /// Key, e.g. base_url or output.color
        key: String,
        /// Value to set
        value: String,
    },

    /// Show the config file path
    Path,
}
