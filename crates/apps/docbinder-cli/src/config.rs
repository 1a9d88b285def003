//! CLI configuration.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use docbinder_extract::ExtractorConfig;
use docbinder_ops::config::{DEFAULT_BASE_URL, DEFAULT_FROM_ADDRESS, DEFAULT_SITE_NAME};
use docbinder_ops::OpsConfig;
use docbinder_store::{default_data_dir, StoreConfig};

use crate::error::{CliError, CliResult};

/// Expand environment variables in a string.
/// Supports `${VAR_NAME}` syntax.
fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .to_string()
}

/// CLI configuration loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Text extraction configuration.
    pub extraction: ExtractorConfig,
    /// Change notification configuration.
    pub notifications: NotificationsConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::with_base_dir(&default_base_dir())
    }
}

impl CliConfig {
    /// Default configuration rooted at `base_dir`.
    pub fn with_base_dir(base_dir: &Path) -> Self {
        Self {
            storage: StorageConfig::new(base_dir),
            extraction: ExtractorConfig::default(),
            notifications: NotificationsConfig::new(base_dir),
        }
    }

    /// Load configuration from a file.
    /// Environment variables in `${VAR}` format are expanded in service URLs.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;

        config.extraction.tika_url = expand_env_vars(&config.extraction.tika_url);
        config.notifications.base_url = expand_env_vars(&config.notifications.base_url);

        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the base directory for all docbinder data.
    pub fn base_dir(&self) -> &Path {
        &self.storage.base_dir
    }

    /// Store layout derived from the `[storage]` section.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.storage.base_dir)
            .with_database_path(&self.storage.database)
            .with_blob_root(&self.storage.files_dir)
            .with_index_dir(&self.storage.index_dir)
    }

    /// Operation settings derived from the `[notifications]` section.
    pub fn ops_config(&self) -> OpsConfig {
        let n = &self.notifications;
        OpsConfig::default()
            .with_site_name(&n.site_name)
            .with_base_url(&n.base_url)
            .with_from_address(&n.from_address)
            .with_notifications(n.enabled)
    }

    /// Whether `init` has created the database.
    pub fn is_initialized(&self) -> bool {
        self.storage.database.exists()
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root of all docbinder data.
    pub base_dir: PathBuf,
    /// Path to the SQLite database.
    pub database: PathBuf,
    /// Upload root; files land under `documents/` inside it.
    pub files_dir: PathBuf,
    /// Directory of the full-text index.
    pub index_dir: PathBuf,
}

impl StorageConfig {
    fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            database: base_dir.join("docbinder.db"),
            files_dir: base_dir.join("files"),
            index_dir: base_dir.join("index"),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(&default_base_dir())
    }
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Whether uploaders are told about changes by others.
    pub enabled: bool,
    /// Site name used in subjects.
    pub site_name: String,
    /// Base URL for links in message bodies.
    pub base_url: String,
    /// Sender address.
    pub from_address: String,
    /// JSON-lines file messages are appended to.
    pub outbox: PathBuf,
}

impl NotificationsConfig {
    fn new(base_dir: &Path) -> Self {
        Self {
            enabled: true,
            site_name: DEFAULT_SITE_NAME.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            outbox: base_dir.join("outbox.jsonl"),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self::new(&default_base_dir())
    }
}

/// Get the default base directory.
pub fn default_base_dir() -> PathBuf {
    default_data_dir()
}

/// Get the default configuration file path.
pub fn default_config_path() -> PathBuf {
    default_base_dir().join("config.toml")
}
