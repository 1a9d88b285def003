//! List documents.

use docbinder_store::DocumentFilter;

use crate::cli::ListArgs;
use crate::config::CliConfig;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{ListOutput, OutputFormat, Render};

/// Execute the list command.
pub fn list(
    config: CliConfig,
    format: OutputFormat,
    actor: Option<&str>,
    args: ListArgs,
) -> CliResult<String> {
    let ctx = AppContext::open(config)?;
    let actor = ctx.actor(actor)?;

    let mut filter = if args.all {
        DocumentFilter::new()
    } else {
        DocumentFilter::new().with_deleted(args.deleted)
    };
    if let Some(name) = &args.document_type {
        filter = filter.with_document_type(ctx.document_type_id(name)?);
    }
    if let Some(name) = &args.program {
        filter = filter.with_program(ctx.program_id(name)?);
    }
    filter = filter.with_limit(args.limit);

    let documents = ctx.ops.list_documents(&actor, filter)?;
    let rows = documents
        .iter()
        .map(|doc| ctx.row(doc))
        .collect::<CliResult<Vec<_>>>()?;

    let output = ListOutput {
        total: rows.len(),
        documents: rows,
    };
    Ok(output.render(format))
}
