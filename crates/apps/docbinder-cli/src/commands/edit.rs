//! Edit a document.

use docbinder_types::DocumentId;
use docbinder_valid::DocumentInput;

use crate::cli::EditArgs;
use crate::commands::read_upload;
use crate::config::CliConfig;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, Render, SaveAction, SaveOutput};
use crate::progress::with_spinner;

/// Execute the edit command.
pub async fn edit(
    config: CliConfig,
    format: OutputFormat,
    actor: Option<&str>,
    args: EditArgs,
) -> CliResult<String> {
    let mut ctx = AppContext::open(config)?;
    let actor = ctx.actor(actor)?;
    let id = DocumentId(args.id);

    // Start from the stored values, as an edit form would
    let current = ctx.ops.get_document(&actor, id)?;
    let mut input = DocumentInput::from_document(&current);

    if let Some(title) = args.title {
        input.title = title;
    }
    if let Some(name) = &args.document_type {
        input.document_type = Some(ctx.document_type_id(name)?);
    }
    if let Some(names) = &args.programs {
        input.programs = names
            .iter()
            .map(|name| ctx.program_id(name))
            .collect::<CliResult<Vec<_>>>()?;
    }
    if let Some(usernames) = &args.authors {
        input.authors = usernames
            .iter()
            .map(|username| ctx.user_id(username))
            .collect::<CliResult<Vec<_>>>()?;
    }
    if let Some(path) = &args.file {
        input.upload = Some(read_upload(path)?);
    }
    input.clear_file = args.clear_file;
    if let Some(link) = args.link {
        input.hyperlink = link;
    }
    if let Some(external) = args.external_authors {
        input.external_authors = external;
    }
    if let Some(notes) = args.notes {
        input.notes = notes;
    }
    if let Some(confidential) = args.confidential {
        input.confidential = confidential;
    }
    if let Some(deleted) = args.deleted {
        input.deleted = Some(deleted);
    }

    let document = with_spinner(
        format,
        "Saving...",
        ctx.ops.update_document(&actor, id, input),
    )
    .await?;

    let output = SaveOutput {
        action: SaveAction::Updated,
        document: ctx.describe(&document)?,
    };
    Ok(output.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::UploadArgs;
    use crate::commands::test_support::{json, setup_library, text_file};
    use crate::commands::upload;
    use docbinder_ops::OutboxMailer;
    use tempfile::TempDir;

    async fn upload_link(config: &CliConfig, actor: &str, title: &str) -> i64 {
        let args = UploadArgs {
            link: Some("https://example.org/doc".to_string()),
            title: Some(title.to_string()),
            document_type: "Report".to_string(),
            ..UploadArgs::default()
        };
        let output = upload(config.clone(), OutputFormat::Json, Some(actor), args)
            .await
            .unwrap();
        json(&output)["document"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_edit_replaces_link_with_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_library(&temp_dir);
        let id = upload_link(&config, "john", "Budget").await;
        let path = text_file(&temp_dir, "budget.txt", "line items");

        let args = EditArgs {
            id,
            file: Some(path),
            link: Some(String::new()),
            notes: Some("Now with the spreadsheet export".to_string()),
            ..EditArgs::default()
        };
        let output = edit(config, OutputFormat::Json, Some("john"), args)
            .await
            .unwrap();

        let value = json(&output);
        assert_eq!(value["action"], "updated");
        assert_eq!(value["document"]["title"], "Budget");
        assert_eq!(value["document"]["file"], "documents/budget.txt");
        assert_eq!(value["document"]["hyperlink"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_edit_by_other_user_writes_outbox() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_library(&temp_dir);
        let id = upload_link(&config, "john", "Budget").await;

        let args = EditArgs {
            id,
            title: Some("Budget 2025".to_string()),
            ..EditArgs::default()
        };
        edit(config.clone(), OutputFormat::Json, Some("ringo"), args)
            .await
            .unwrap();

        let outbox = OutboxMailer::new(&config.notifications.outbox).unwrap();
        let sent = outbox.read_all().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "john@example.com");
        assert!(sent[0].subject.contains("Budget 2025"));
    }

    #[tokio::test]
    async fn test_restore_through_deleted_flag() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_library(&temp_dir);
        let id = upload_link(&config, "john", "Budget").await;

        let delete = EditArgs {
            id,
            deleted: Some(true),
            ..EditArgs::default()
        };
        let output = edit(config.clone(), OutputFormat::Json, Some("john"), delete)
            .await
            .unwrap();
        assert_eq!(json(&output)["document"]["deleted"], true);

        let restore = EditArgs {
            id,
            deleted: Some(false),
            ..EditArgs::default()
        };
        let output = edit(config, OutputFormat::Json, Some("john"), restore)
            .await
            .unwrap();
        assert_eq!(json(&output)["document"]["deleted"], false);
    }
}
