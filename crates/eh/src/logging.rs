//! Diagnostic logging to stderr.

use std::io;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter, fmt};

use crate::cli::Cli;

/// Crates whose events follow the verbosity flags.
const TARGETS: [&str; 3] = ["eh", "eventhive_api", "eventhive_search"];

/// Level for our own crates.
fn level(cli: &Cli) -> Level {
    if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Builds the target filter: our crates at the chosen level, everything else at warn.
fn targets(cli: &Cli) -> filter::Targets {
    let default = if cli.quiet { Level::ERROR } else { Level::WARN };
    TARGETS
        .iter()
        .fold(filter::Targets::new(), |targets, target| {
            targets.with_target(*target, level(cli))
        })
        .with_default(default)
}

/// Installs the global subscriber. Output goes to stderr so stdout stays parseable.
pub fn init(cli: &Cli) {
    tracing_subscriber::registry()
        .with(targets(cli))
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(!cli.no_color)
                .with_target(cli.verbose),
        )
        .init();
}
