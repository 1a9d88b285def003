//! Soft-delete a document.

use docbinder_types::DocumentId;

use crate::config::CliConfig;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{DeletePreviewOutput, OutputFormat, Render, SaveAction, SaveOutput};

/// Execute the delete command.
///
/// Without `yes` this only checks the actor may delete and shows the
/// document, like a confirmation page.
pub async fn delete(
    config: CliConfig,
    format: OutputFormat,
    actor: Option<&str>,
    id: i64,
    yes: bool,
) -> CliResult<String> {
    let mut ctx = AppContext::open(config)?;
    let actor = ctx.actor(actor)?;
    let id = DocumentId(id);

    if !yes {
        let document = ctx.ops.confirm_delete(&actor, id)?;
        let output = DeletePreviewOutput {
            confirm_required: true,
            document: ctx.describe(&document)?,
        };
        return Ok(output.render(format));
    }

    let document = ctx.ops.delete_document(&actor, id).await?;
    let output = SaveOutput {
        action: SaveAction::Deleted,
        document: ctx.describe(&document)?,
    };
    Ok(output.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ListArgs, UploadArgs};
    use crate::commands::test_support::{json, setup_library};
    use crate::commands::{list, upload};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, CliConfig, i64) {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_library(&temp_dir);
        let args = UploadArgs {
            link: Some("https://example.org/minutes".to_string()),
            title: Some("Board Minutes".to_string()),
            document_type: "Report".to_string(),
            ..UploadArgs::default()
        };
        let output = upload(config.clone(), OutputFormat::Json, Some("john"), args)
            .await
            .unwrap();
        let id = json(&output)["document"]["id"].as_i64().unwrap();
        (temp_dir, config, id)
    }

    #[tokio::test]
    async fn test_preview_does_not_delete() {
        let (_temp_dir, config, id) = setup().await;

        let output = delete(config.clone(), OutputFormat::Json, Some("john"), id, false)
            .await
            .unwrap();
        assert_eq!(json(&output)["confirm_required"], true);
        assert_eq!(json(&output)["document"]["deleted"], false);
    }

    #[tokio::test]
    async fn test_uploader_deletes() {
        let (_temp_dir, config, id) = setup().await;

        let output = delete(config.clone(), OutputFormat::Json, Some("john"), id, true)
            .await
            .unwrap();
        assert_eq!(json(&output)["action"], "deleted");

        let listed = list(
            config.clone(),
            OutputFormat::Json,
            Some("john"),
            ListArgs {
                limit: 50,
                ..ListArgs::default()
            },
        )
        .unwrap();
        assert_eq!(json(&listed)["total"], 0);

        let listed = list(
            config,
            OutputFormat::Json,
            Some("john"),
            ListArgs {
                deleted: true,
                limit: 50,
                ..ListArgs::default()
            },
        )
        .unwrap();
        assert_eq!(json(&listed)["documents"][0]["title"], "Board Minutes");
    }

    #[tokio::test]
    async fn test_other_user_denied() {
        let (_temp_dir, config, id) = setup().await;

        let err = delete(config.clone(), OutputFormat::Json, Some("ringo"), id, false)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);

        let err = delete(config, OutputFormat::Json, Some("ringo"), id, true)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_second_delete_is_invalid() {
        let (_temp_dir, config, id) = setup().await;

        delete(config.clone(), OutputFormat::Json, Some("john"), id, true)
            .await
            .unwrap();
        let err = delete(config, OutputFormat::Json, Some("john"), id, true)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
