//! Rebuild the search index.

use std::time::Instant;

use docbinder_store::DocumentStore;

use crate::config::CliConfig;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, Render, ReindexOutput};
use crate::progress;

/// Execute the reindex command.
pub async fn reindex(config: CliConfig, format: OutputFormat) -> CliResult<String> {
    let ctx = AppContext::open(config)?;
    let started = Instant::now();

    let total = ctx.ops.state.documents.count()?;
    let pb = progress::for_format(format, total, "Indexing documents");
    let indexed = ctx
        .ops
        .reindex_with(|done, _| pb.set_position(done as u64))
        .await;
    pb.finish_and_clear();

    let output = ReindexOutput {
        indexed: indexed?,
        elapsed_ms: started.elapsed().as_millis(),
    };
    Ok(output.render(format))
}
