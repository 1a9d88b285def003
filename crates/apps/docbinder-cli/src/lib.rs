//! Command-line interface for the docbinder document library.
//!
//! This crate provides the `docbinder` binary. It includes commands for:
//!
//! - **Setup**: Initialize the data directory, add users, programs and document types
//! - **Documents**: Upload, edit, soft-delete, show and list documents
//! - **Search**: Full-text search over titles, metadata and extracted file text
//! - **Maintenance**: Rebuild the search index
//!
//! # Quick Start
//!
//! ```bash
//! # Create the database, upload directory and index
//! docbinder init
//!
//! # Set up the directory
//! docbinder type add Report
//! docbinder user add john --name "John Lennon" --email john@example.com --perm view,add,change
//!
//! # Upload and find a document
//! docbinder --as john upload annual_report.pdf --type Report
//! docbinder --as john search "annual turnover"
//! ```
//!
//! # Acting User
//!
//! Document commands run as the user named by `--as` or `DOCBINDER_USER`.
//! Permissions and program scoping are those of that user.
//!
//! # Output Formats
//!
//! All commands support `--format` for output control:
//!
//! - `human` (default): Human-readable with colors
//! - `json`: Machine-readable JSON
//!
//! # Configuration
//!
//! Configuration is loaded from `config.toml` in the data directory
//! (`DOCBINDER_DATA_DIR` overrides its location). Override with `--config`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod output;
pub mod progress;

// Re-export main types
pub use cli::{Cli, Commands, OutputFormatArg};
pub use config::CliConfig;
pub use context::AppContext;
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Render};
