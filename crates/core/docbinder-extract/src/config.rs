//! Extractor configuration.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::{default_commands, CommandExtractor, ConverterCommand, DEFAULT_STDERR_WHITELIST};
use crate::error::ExtractResult;
use crate::tika::TikaExtractor;
use crate::traits::TextExtractor;

/// Default Tika server URL.
pub const DEFAULT_TIKA_URL: &str = "http://localhost:9998";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which extraction strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Remote Apache Tika server.
    #[default]
    Tika,
    /// Local converter commands.
    Command,
}

/// Extraction settings (`[extraction]` in the config file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Strategy
    pub backend: Backend,
    /// Tika server base URL
    pub tika_url: String,
    /// Tika request timeout in seconds
    pub timeout_secs: u64,
    /// Converter table for the command backend, keyed by extension
    pub commands: BTreeMap<String, ConverterCommand>,
    /// Converter stderr output that does not indicate failure
    pub stderr_whitelist: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            tika_url: DEFAULT_TIKA_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            commands: default_commands(),
            stderr_whitelist: DEFAULT_STDERR_WHITELIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ExtractorConfig {
    /// Tika backend at `url`.
    pub fn tika(url: impl Into<String>) -> Self {
        Self {
            backend: Backend::Tika,
            tika_url: url.into(),
            ..Self::default()
        }
    }

    /// Command backend with the default converter table.
    pub fn command() -> Self {
        Self {
            backend: Backend::Command,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Build the configured extractor.
pub fn build_extractor(config: &ExtractorConfig) -> ExtractResult<Arc<dyn TextExtractor>> {
    let extractor: Arc<dyn TextExtractor> = match config.backend {
        Backend::Tika => Arc::new(TikaExtractor::with_timeout(
            &config.tika_url,
            config.timeout(),
        )?),
        Backend::Command => Arc::new(
            CommandExtractor::new(config.commands.clone())
                .with_stderr_whitelist(config.stderr_whitelist.clone()),
        ),
    };
    tracing::debug!(backend = extractor.name(), "Built text extractor");
    Ok(extractor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();
        assert_eq!(config.backend, Backend::Tika);
        assert_eq!(config.tika_url, DEFAULT_TIKA_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.commands.contains_key("doc"));
    }

    #[test]
    fn test_parse_toml_command_backend() {
        let config: ExtractorConfig = toml::from_str(
            r#"
            backend = "command"

            [commands.rtf]
            format = "RTF"
            program = "unrtf"
            args = ["--text", "{path}"]
            "#,
        )
        .unwrap();
        assert_eq!(config.backend, Backend::Command);
        assert_eq!(config.commands.len(), 1);
        assert_eq!(config.commands["rtf"].program, "unrtf");
        assert_eq!(config.stderr_whitelist.len(), 2);
    }

    #[test]
    fn test_build_extractor() {
        let tika = build_extractor(&ExtractorConfig::tika("http://localhost:9998")).unwrap();
        assert_eq!(tika.name(), "tika");
        let command = build_extractor(&ExtractorConfig::command()).unwrap();
        assert_eq!(command.name(), "command");
        assert!(build_extractor(&ExtractorConfig::tika("gopher://x")).is_err());
    }
}
