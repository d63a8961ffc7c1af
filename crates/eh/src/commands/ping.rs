//! Ping command implementation.

use std::time::Instant;

use eventhive_api::client::EventHiveClient;

use super::{CommandContext, Result};

/// Calls the backend health endpoint and reports the answer.
pub async fn execute(ctx: &CommandContext, client: &EventHiveClient) -> Result<()> {
    let started = Instant::now();
    let health = client.health().await?;
    let elapsed_ms = started.elapsed().as_millis();

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "ok",
            "url": client.base_url(),
            "message": health.message,
            "elapsed_ms": elapsed_ms,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("{} ({}, {} ms)", health.message, client.base_url(), elapsed_ms);
    }
    Ok(())
}
