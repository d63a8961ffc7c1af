//! Show command implementation.

use std::io;
use std::path::{Path, PathBuf};

use eventhive_api::client::EventHiveClient;
use eventhive_api::models::EventRecord;
use eventhive_search::local_today;
use tracing::debug;

use super::{CommandContext, CommandError, Result};
use crate::output;

/// Options for the show command.
#[derive(Debug)]
pub struct ShowOptions {
    pub event_id: String,
    pub save_image: Option<PathBuf>,
}

/// Fetches one event and prints its details.
pub async fn execute(
    ctx: &CommandContext,
    client: &EventHiveClient,
    opts: &ShowOptions,
) -> Result<()> {
    let event = client.get_event(&opts.event_id).await?;

    let saved = match opts.save_image.as_deref() {
        Some(path) => {
            let written = save_image(&event, path).await?;
            debug!(path = %path.display(), bytes = written, "event image saved");
            Some(path.display().to_string())
        }
        None => None,
    };

    if ctx.json_output {
        println!("{}", output::format_event_details_json(&event, saved)?);
        return Ok(());
    }

    let details =
        output::format_event_details_table(&event, ctx.date_format, local_today(), ctx.use_colors);
    print!("{}", details);
    if let Some(path) = saved {
        if !ctx.quiet {
            println!("Image saved to {}", path);
        }
    }
    Ok(())
}

/// Decodes the event image and writes it to `path`. Returns the byte count.
async fn save_image(event: &EventRecord, path: &Path) -> Result<usize> {
    let bytes = decode_image(event)?;
    tokio::fs::write(path, &bytes).await?;
    Ok(bytes.len())
}

fn decode_image(event: &EventRecord) -> Result<Vec<u8>> {
    match event.decode_image() {
        Some(Ok(bytes)) => Ok(bytes),
        Some(Err(e)) => Err(CommandError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("event '{}' has a malformed image: {}", event.id, e),
        ))),
        None => Err(CommandError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("event '{}' has no image", event.id),
        ))),
    }
}
