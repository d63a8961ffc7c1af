//! Interactive filtering over one fetched collection.
//!
//! The collection is fetched once; every apply re-runs the criteria over the
//! full collection. Reset clears the criteria and shows everything again.

use chrono::NaiveDate;
use dialoguer::{Input, Select};
use eventhive_api::client::EventHiveClient;
use eventhive_api::models::EventRecord;
use eventhive_api::session::Session;
use eventhive_search::{
    distinct_venues, CriterionField, DateBucket, FilterController, FilterCriteria,
};
use owo_colors::OwoColorize;

use super::events::warn_unknown_bucket;
use super::{anchor_day, fetch_events, prompt, CommandContext, Result};
use crate::output;

/// Label used for the wildcard choice.
const ANY: &str = "(any)";

const MENU: [&str; 6] = [
    "Set event type",
    "Set venue",
    "Set date range",
    "Apply filters",
    "Reset filters",
    "Quit",
];

/// One user action in the browse loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    Set(CriterionField, String),
    Apply,
    Reset,
    Quit,
}

/// What the loop should do after an action.
#[derive(Debug, PartialEq)]
pub enum Step<'a> {
    Continue,
    Show(Vec<&'a EventRecord>),
    Quit,
}

/// Applies one action to the controller.
pub fn step<'a>(controller: &mut FilterController<'a>, action: BrowseAction) -> Step<'a> {
    match action {
        BrowseAction::Set(field, value) => {
            controller.set_criterion(field, value);
            Step::Continue
        }
        BrowseAction::Apply => Step::Show(controller.apply().to_vec()),
        BrowseAction::Reset => {
            controller.reset();
            Step::Show(controller.visible().to_vec())
        }
        BrowseAction::Quit => Step::Quit,
    }
}

/// One-line summary of the pending criteria.
pub fn describe_criteria(criteria: &FilterCriteria) -> String {
    let shown = |value: &str| {
        if value.trim().is_empty() {
            ANY.to_string()
        } else {
            value.trim().to_string()
        }
    };
    let when = match criteria.bucket() {
        Some(bucket) => bucket.label().to_string(),
        None => shown(&criteria.when),
    };
    format!(
        "type: {}, venue: {}, when: {}",
        shown(&criteria.event_type),
        shown(&criteria.venue),
        when
    )
}

/// Venue choices: the wildcard first, then the collection's venues.
fn venue_choices(events: &[EventRecord]) -> Vec<String> {
    std::iter::once(ANY.to_string())
        .chain(distinct_venues(events).into_iter().map(str::to_string))
        .collect()
}

/// Date range choices: the wildcard first, then every bucket.
fn when_choices() -> Vec<&'static str> {
    std::iter::once(ANY)
        .chain(DateBucket::ALL.iter().map(|b| b.label()))
        .collect()
}

/// Maps a selected date range index back to the bucket name ("" for any).
fn when_value(index: usize) -> String {
    index
        .checked_sub(1)
        .and_then(|i| DateBucket::ALL.get(i))
        .map(|b| b.as_str().to_string())
        .unwrap_or_default()
}

/// Maps a selected venue index back to the venue ("" for any).
fn venue_value(choices: &[String], index: usize) -> String {
    match index {
        0 => String::new(),
        i => choices.get(i).cloned().unwrap_or_default(),
    }
}

/// Runs the interactive browse loop.
pub async fn execute(
    ctx: &CommandContext,
    client: &EventHiveClient,
    session: Option<&Session>,
    today: Option<NaiveDate>,
) -> Result<()> {
    prompt::require_terminal("filters to 'eh events' instead")?;

    let decoded = fetch_events(ctx, client, session).await?;
    let anchor = anchor_day(today);
    let mut controller =
        FilterController::new(&decoded.events, anchor).with_mode(ctx.event_type_match);
    let venues = venue_choices(&decoded.events);
    let whens = when_choices();

    println!(
        "{} events loaded. Choose criteria, then apply.\n",
        decoded.events.len()
    );

    loop {
        let summary = describe_criteria(controller.criteria());
        if ctx.use_colors {
            println!("{}", summary.dimmed());
        } else {
            println!("{}", summary);
        }

        let choice = Select::new()
            .with_prompt("What next?")
            .items(&MENU[..])
            .default(3)
            .interact()?;

        let action = match choice {
            0 => {
                let value: String = Input::new()
                    .with_prompt("Event type (blank for any)")
                    .with_initial_text(controller.criteria().event_type.clone())
                    .allow_empty(true)
                    .interact_text()?;
                BrowseAction::Set(CriterionField::EventType, value)
            }
            1 => {
                let index = Select::new()
                    .with_prompt("Venue")
                    .items(&venues[..])
                    .default(0)
                    .interact()?;
                BrowseAction::Set(CriterionField::Venue, venue_value(&venues, index))
            }
            2 => {
                let index = Select::new()
                    .with_prompt("Date range")
                    .items(&whens[..])
                    .default(0)
                    .interact()?;
                BrowseAction::Set(CriterionField::When, when_value(index))
            }
            3 => BrowseAction::Apply,
            4 => BrowseAction::Reset,
            _ => BrowseAction::Quit,
        };

        if action == BrowseAction::Apply {
            warn_unknown_bucket(ctx, controller.criteria());
        }

        match step(&mut controller, action) {
            Step::Continue => {}
            Step::Show(visible) => {
                println!();
                let table =
                    output::format_events_table(&visible, ctx.date_format, anchor, ctx.use_colors);
                print!("{}", table);
                println!("{} of {} events\n", visible.len(), decoded.events.len());
            }
            Step::Quit => break,
        }
    }

    Ok(())
}
