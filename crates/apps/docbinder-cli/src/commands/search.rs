//! Full-text search.

use docbinder_index::{DeletedFilter, SearchQuery};

use crate::cli::SearchArgs;
use crate::config::CliConfig;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{HitOutput, OutputFormat, Render, SearchOutput};

/// Execute the search command.
pub fn search(
    config: CliConfig,
    format: OutputFormat,
    actor: Option<&str>,
    args: SearchArgs,
) -> CliResult<String> {
    let ctx = AppContext::open(config)?;
    let actor = ctx.actor(actor)?;

    let deleted = match (args.deleted, args.any) {
        (_, true) => DeletedFilter::Any,
        (true, false) => DeletedFilter::Deleted,
        (false, false) => DeletedFilter::Active,
    };
    let mut query = SearchQuery::new(&args.query)
        .with_deleted(deleted)
        .with_limit(args.limit);
    if let Some(name) = &args.document_type {
        query = query.with_document_type(ctx.document_type_id(name)?);
    }
    if let Some(name) = &args.program {
        query = query.with_program(ctx.program_id(name)?);
    }

    let hits = ctx.ops.search(&actor, query)?;
    let output = SearchOutput {
        query: args.query,
        hits: hits
            .into_iter()
            .map(|hit| HitOutput {
                id: hit.id.get(),
                title: hit.title,
                score: hit.score,
                deleted: hit.deleted,
            })
            .collect(),
    };
    Ok(output.render(format))
}
