//! CLI error types.

use docbinder_ops::OpsError;
use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error enum wrapping all crate errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operations error.
    #[error("{0}")]
    Ops(#[from] OpsError),

    /// Extractor could not be built.
    #[error("{0}")]
    Extraction(#[from] docbinder_extract::ExtractionError),

    /// Store error.
    #[error("{0}")]
    Store(#[from] docbinder_store::StoreError),

    /// Index error.
    #[error("{0}")]
    Index(#[from] docbinder_index::IndexError),

    /// Outbox could not be opened.
    #[error("{0}")]
    Mail(#[from] docbinder_ops::MailError),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// User-facing error with actionable message.
    #[error("{0}")]
    User(String),

    /// Named entity not found.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// Data directory not initialized.
    #[error("docbinder is not initialized. Run 'docbinder init' first.")]
    NotInitialized,

    /// No acting user given.
    #[error("No acting user. Pass --as <username> or set DOCBINDER_USER.")]
    NoActor,

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a user-facing error.
    pub fn user(msg: impl Into<String>) -> Self {
        Self::User(msg.into())
    }

    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors: 1
            Self::User(_) | Self::NotInitialized | Self::NoActor => 1,
            // Not found: 2
            Self::NotFound { .. } | Self::FileNotFound(_) => 2,
            Self::Ops(e) if e.is_not_found() => 2,
            // Config errors: 3
            Self::Config(_) | Self::Toml(_) => 3,
            // Access denied: 4
            Self::Ops(OpsError::AccessDenied(_)) => 4,
            // Validation errors: 5
            Self::Ops(OpsError::Validation(_)) | Self::Ops(OpsError::InvalidTransition(_)) => 5,
            // Extraction service errors: 6
            Self::Extraction(_) | Self::Ops(OpsError::ExtractionService(_)) => 6,
            // Store errors: 7
            Self::Store(_) | Self::Ops(OpsError::Store(_)) => 7,
            // Index errors: 8
            Self::Index(_) | Self::Ops(OpsError::Index(_)) => 8,
            // IO errors: 9
            Self::Io(_) | Self::Mail(_) => 9,
            // JSON/format errors: 10
            Self::Json(_) => 10,
            // Anything else the operations layer adds later
            Self::Ops(_) => 11,
        }
    }

    /// Recovery hint, if there is one.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Ops(e) => Some(e.suggestion()),
            Self::Extraction(_) => Some("Check the [extraction] section of the config file."),
            Self::NotFound { kind: "user", .. } => Some("Add the user with 'docbinder user add'."),
            Self::Toml(_) => Some("Fix the syntax of the config file."),
            _ => None,
        }
    }
}
