//! Show one document.

use docbinder_types::DocumentId;

use crate::config::CliConfig;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, Render};

/// Execute the show command.
pub fn show(
    config: CliConfig,
    format: OutputFormat,
    actor: Option<&str>,
    id: i64,
) -> CliResult<String> {
    let ctx = AppContext::open(config)?;
    let actor = ctx.actor(actor)?;

    let document = ctx.ops.get_document(&actor, DocumentId(id))?;
    Ok(ctx.describe(&document)?.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::setup_library;
    use tempfile::TempDir;

    #[test]
    fn test_show_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_library(&temp_dir);

        let err = show(config, OutputFormat::Human, Some("john"), 404).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
