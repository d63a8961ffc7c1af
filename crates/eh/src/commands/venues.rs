//! Venues command implementation.

use eventhive_api::client::EventHiveClient;
use eventhive_api::session::Session;
use eventhive_search::distinct_venues;

use super::{fetch_events, CommandContext, Result};
use crate::output;

/// Lists the distinct venues of the public collection, or of the admin's events.
pub async fn execute(
    ctx: &CommandContext,
    client: &EventHiveClient,
    session: Option<&Session>,
) -> Result<()> {
    let decoded = fetch_events(ctx, client, session).await?;
    let venues = distinct_venues(&decoded.events);

    if ctx.json_output {
        println!("{}", output::format_venues_json(&venues)?);
    } else {
        print!("{}", output::format_venues_table(&venues));
    }
    Ok(())
}
