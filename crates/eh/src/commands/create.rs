//! Create and describe command implementations (admin).

use std::path::{Path, PathBuf};

use eventhive_api::client::EventHiveClient;
use eventhive_api::models::{validate_image, DescriptionRequest, EventDraft};
use eventhive_api::session::Session;
use owo_colors::OwoColorize;
use tracing::debug;

use super::{require_admin, CommandContext, Result};

/// Event details shared by `create` and `describe`.
#[derive(Debug, Clone, Default)]
pub struct EventDetails {
    pub title: String,
    pub venue: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub cost: String,
}

/// Options for the create command.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub details: EventDetails,
    pub event_type: String,
    pub description: Option<String>,
    pub ai_description: bool,
    pub image: PathBuf,
}

impl CreateOptions {
    /// The draft without its image.
    fn draft(&self) -> EventDraft {
        let details = &self.details;
        EventDraft {
            title: details.title.trim().to_string(),
            venue: details.venue.trim().to_string(),
            event_type: self.event_type.trim().to_string(),
            start_date: details.start_date.trim().to_string(),
            end_date: details.end_date.trim().to_string(),
            start_time: details.start_time.trim().to_string(),
            end_time: details.end_time.trim().to_string(),
            cost: details.cost.trim().to_string(),
            description: self.description.clone().unwrap_or_default(),
            image_base64: None,
        }
    }
}

impl From<&EventDetails> for DescriptionRequest {
    fn from(details: &EventDetails) -> Self {
        Self {
            title: details.title.trim().to_string(),
            venue: details.venue.trim().to_string(),
            start_date: details.start_date.trim().to_string(),
            end_date: details.end_date.trim().to_string(),
            start_time: details.start_time.trim().to_string(),
            end_time: details.end_time.trim().to_string(),
            cost: details.cost.trim().to_string(),
        }
    }
}

/// Reads an image file after checking its extension and size.
async fn read_image(path: &Path) -> Result<Vec<u8>> {
    let metadata = tokio::fs::metadata(path).await?;
    validate_image(path, metadata.len())?;
    Ok(tokio::fs::read(path).await?)
}

/// Executes the create command.
pub async fn execute_create(
    ctx: &CommandContext,
    client: &EventHiveClient,
    session: &Session,
    opts: &CreateOptions,
) -> Result<()> {
    require_admin(session)?;

    let mut draft = opts.draft();
    DescriptionRequest::from_draft(&draft).validate()?;

    let image = read_image(&opts.image).await?;
    debug!(path = %opts.image.display(), bytes = image.len(), "image attached");
    draft = draft.with_image_bytes(&image);

    if opts.ai_description {
        if !ctx.quiet && !ctx.json_output {
            eprintln!("Generating description...");
        }
        draft.description = client
            .generate_description(session, &DescriptionRequest::from_draft(&draft))
            .await?;
    }

    client.create_event(session, &draft).await?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "created",
            "title": draft.title,
            "event_type": draft.event_type,
            "start_date": draft.start_date,
            "description": draft.description,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        if ctx.use_colors {
            println!("Created event: {}", draft.title.green());
        } else {
            println!("Created event: {}", draft.title);
        }
        if opts.ai_description && ctx.verbose {
            println!("\n{}", draft.description);
        }
    }
    Ok(())
}

/// Executes the describe command.
pub async fn execute_describe(
    ctx: &CommandContext,
    client: &EventHiveClient,
    session: &Session,
    details: &EventDetails,
) -> Result<()> {
    require_admin(session)?;

    let request = DescriptionRequest::from(details);
    let description = client.generate_description(session, &request).await?;

    if ctx.json_output {
        let output = serde_json::json!({ "description": description });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", description);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandError;
    use eventhive_api::models::ValidationError;

    fn details() -> EventDetails {
        EventDetails {
            title: " Rust Meetup ".to_string(),
            venue: "Pune".to_string(),
            start_date: "2024-01-10".to_string(),
            end_date: "2024-01-10".to_string(),
            start_time: "10:00".to_string(),
            end_time: "12:00".to_string(),
            cost: "0".to_string(),
        }
    }

    #[test]
    fn test_draft_is_trimmed_and_typed() {
        let opts = CreateOptions {
            details: details(),
            event_type: "Workshop".to_string(),
            description: None,
            ai_description: false,
            image: PathBuf::from("poster.png"),
        };
        let draft = opts.draft();
        assert_eq!(draft.title, "Rust Meetup");
        assert_eq!(draft.event_type, "Workshop");
        assert_eq!(draft.description, "");
        assert!(draft.image_base64.is_none());
        assert!(DescriptionRequest::from_draft(&draft).validate().is_ok());
    }

    #[test]
    fn test_description_request_from_details() {
        let request = DescriptionRequest::from(&details());
        assert_eq!(request.title, "Rust Meetup");
        assert_eq!(request.cost, "0");
    }

    #[tokio::test]
    async fn test_read_image_checks_extension_and_size() {
        let dir = tempfile::tempdir().unwrap();

        let gif = dir.path().join("poster.gif");
        std::fs::write(&gif, b"GIF89a").unwrap();
        assert!(matches!(
            read_image(&gif).await,
            Err(CommandError::Draft(ValidationError::UnsupportedImage { .. }))
        ));

        let png = dir.path().join("poster.PNG");
        std::fs::write(&png, b"\x89PNG").unwrap();
        assert_eq!(read_image(&png).await.unwrap(), b"\x89PNG");

        let missing = dir.path().join("missing.png");
        assert!(matches!(read_image(&missing).await, Err(CommandError::Io(_))));
    }
}
