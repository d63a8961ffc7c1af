//! Events command implementation.
//!
//! Fetches the collection once, then filters it locally.

use chrono::NaiveDate;
use eventhive_api::client::EventHiveClient;
use eventhive_api::session::Session;
use eventhive_search::{
    suggest_venue, DateBucket, EventTypeMatch, FilterController, FilterCriteria, UnknownBucket,
};
use owo_colors::OwoColorize;
use tracing::debug;

use super::{anchor_day, fetch_events, CommandContext, Result};
use crate::output::{self, helpers::format_span, ListingSummary};

/// Options for the events command.
#[derive(Debug, Default)]
pub struct EventsOptions {
    pub event_type: Option<String>,
    pub venue: Option<String>,
    pub when: Option<String>,
    pub title_match: bool,
    pub today: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl EventsOptions {
    /// Filter criteria from the command-line flags. Missing flags are wildcards.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .event_type(self.event_type.clone().unwrap_or_default())
            .venue(self.venue.clone().unwrap_or_default())
            .when(self.when.clone().unwrap_or_default())
    }

    fn mode(&self, ctx: &CommandContext) -> EventTypeMatch {
        if self.title_match {
            EventTypeMatch::TitleContains
        } else {
            ctx.event_type_match
        }
    }
}

/// Executes the events command.
///
/// `session` selects the admin's own events instead of the public collection.
pub async fn execute(
    ctx: &CommandContext,
    client: &EventHiveClient,
    session: Option<&Session>,
    opts: &EventsOptions,
) -> Result<()> {
    let decoded = fetch_events(ctx, client, session).await?;
    let criteria = opts.criteria();
    warn_unknown_bucket(ctx, &criteria);

    let anchor = anchor_day(opts.today);
    let mode = opts.mode(ctx);
    let mut controller = FilterController::new(&decoded.events, anchor)
        .with_mode(mode)
        .with_criteria(criteria);
    let visible = controller.apply().to_vec();
    let shown = match opts.limit {
        Some(limit) => &visible[..limit.min(visible.len())],
        None => &visible[..],
    };
    debug!(
        total = decoded.events.len(),
        matched = visible.len(),
        shown = shown.len(),
        "events listed"
    );

    if ctx.json_output {
        let summary = ListingSummary {
            total: decoded.events.len(),
            rejected: decoded.rejected.len(),
            criteria: controller.criteria(),
            mode,
            anchor,
        };
        println!("{}", output::format_events_json(shown, &summary)?);
        return Ok(());
    }

    if !ctx.quiet {
        if let Some(bucket) = controller.criteria().bucket() {
            print_range_header(ctx, bucket, anchor);
        }
    }

    print!(
        "{}",
        output::format_events_table(shown, ctx.date_format, anchor, ctx.use_colors)
    );

    if !ctx.quiet {
        if shown.is_empty() {
            if let Some(venue) = opts.venue.as_deref() {
                if let Some(suggestion) = suggest_venue(venue, &decoded.events) {
                    println!("Did you mean '{}'?", suggestion);
                }
            }
        } else if shown.len() < visible.len() {
            println!("({} of {} matching events shown)", shown.len(), visible.len());
        }
    }

    Ok(())
}

/// Unknown date ranges are ignored by the matcher; tell the user.
pub(crate) fn warn_unknown_bucket(ctx: &CommandContext, criteria: &FilterCriteria) {
    let when = criteria.when.trim();
    if when.is_empty() || DateBucket::parse(when).is_some() {
        return;
    }
    debug!(when, "ignoring unknown date range");
    if !ctx.quiet && !ctx.json_output {
        eprintln!(
            "Warning: {}; showing all dates",
            UnknownBucket(when.to_string())
        );
    }
}

fn print_range_header(ctx: &CommandContext, bucket: DateBucket, anchor: NaiveDate) {
    let text = format!("{} events ({})", bucket.label(), format_span(bucket, anchor));
    if ctx.use_colors {
        println!("{}\n", text.bold());
    } else {
        println!("{}\n", text);
    }
}
