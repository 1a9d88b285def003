//! Initialize the data directory.

use std::path::Path;

use crate::config::CliConfig;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{InitOutput, OutputFormat, Render};

/// Execute the init command.
///
/// Safe to run again: existing data is kept and an existing config file is
/// not overwritten.
pub fn init(config: CliConfig, format: OutputFormat, config_path: &Path) -> CliResult<String> {
    let ctx = AppContext::for_init(config)?;

    if !config_path.exists() {
        ctx.config.save(config_path)?;
    }

    let store_config = ctx.ops.state.config();
    let output = InitOutput {
        base_dir: ctx.config.base_dir().display().to_string(),
        config_path: config_path.display().to_string(),
        database: store_config.database_path().display().to_string(),
        index_dir: store_config.index_dir().display().to_string(),
    };

    Ok(output.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{json, setup_config};
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_layout() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_config(&temp_dir);
        let path = temp_dir.path().join("config.toml");

        let output = init(config.clone(), OutputFormat::Json, &path).unwrap();

        assert!(path.exists());
        assert!(config.is_initialized());
        assert!(config.storage.index_dir.exists());
        assert_eq!(json(&output)["config_path"], path.display().to_string());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_config(&temp_dir);
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[notifications]\nenabled = false\n").unwrap();

        init(config, OutputFormat::Human, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "[notifications]\nenabled = false\n");
    }

    #[test]
    fn test_commands_require_init() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_config(&temp_dir);
        assert!(matches!(
            AppContext::open(config),
            Err(crate::error::CliError::NotInitialized)
        ));
    }
}
