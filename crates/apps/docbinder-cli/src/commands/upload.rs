//! Upload a document.

use docbinder_valid::DocumentInput;

use crate::cli::UploadArgs;
use crate::commands::read_upload;
use crate::config::CliConfig;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, Render, SaveAction, SaveOutput};
use crate::progress::with_spinner;

/// Execute the upload command.
pub async fn upload(
    config: CliConfig,
    format: OutputFormat,
    actor: Option<&str>,
    args: UploadArgs,
) -> CliResult<String> {
    let mut ctx = AppContext::open(config)?;
    let actor = ctx.actor(actor)?;

    // Resolve names to ids
    let document_type = ctx.document_type_id(&args.document_type)?;
    let programs = args
        .programs
        .iter()
        .map(|name| ctx.program_id(name))
        .collect::<CliResult<Vec<_>>>()?;
    let authors = args
        .authors
        .iter()
        .map(|username| ctx.user_id(username))
        .collect::<CliResult<Vec<_>>>()?;
    let upload = args.file.as_deref().map(read_upload).transpose()?;

    let input = DocumentInput {
        title: args.title.unwrap_or_default(),
        document_type: Some(document_type),
        programs,
        upload,
        hyperlink: args.link.unwrap_or_default(),
        notes: args.notes,
        authors,
        external_authors: args.external_authors,
        confidential: args.confidential,
        ..DocumentInput::default()
    };

    let document = with_spinner(
        format,
        "Extracting text...",
        ctx.ops.create_document(&actor, input),
    )
    .await?;

    let output = SaveOutput {
        action: SaveAction::Uploaded,
        document: ctx.describe(&document)?,
    };
    Ok(output.render(format))
}
