//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use docbinder_types::Permission;

use crate::output::OutputFormat;

/// Docbinder CLI.
#[derive(Parser, Debug)]
#[command(name = "docbinder")]
#[command(author = "Docbinder Contributors")]
#[command(version)]
#[command(about = "Manage the shared document library")]
#[command(
    long_about = "Docbinder keeps an organisation's documents: uploads, hyperlinks, categories, \
                  full-text search and soft deletion.\n\nRun 'docbinder init' to get started."
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (human or json).
    #[arg(short, long, global = true, default_value = "human")]
    pub format: OutputFormatArg,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Username to act as.
    #[arg(long = "as", global = true, env = "DOCBINDER_USER")]
    pub actor: Option<String>,
}

/// Output format argument for clap.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormatArg {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // =========================================================================
    // Setup Commands
    // =========================================================================
    /// Initialize the data directory.
    ///
    /// Creates the database, the upload directory and the search index,
    /// and writes a default configuration file.
    Init,

    /// Manage staff accounts.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage programs.
    Program {
        #[command(subcommand)]
        action: NamedCommands,
    },

    /// Manage document types.
    #[command(name = "type")]
    DocumentType {
        #[command(subcommand)]
        action: NamedCommands,
    },

    // =========================================================================
    // Document Commands
    // =========================================================================
    /// Upload a file or register a hyperlink.
    ///
    /// The file is converted to text for the search index before it is
    /// saved; a file that cannot be converted is rejected.
    Upload(UploadArgs),

    /// Edit a document.
    ///
    /// Fields not given keep their current value.
    Edit(EditArgs),

    /// Soft-delete a document.
    ///
    /// Without --yes, shows what would be deleted.
    Delete {
        /// Document id.
        id: i64,

        /// Skip the confirmation step.
        #[arg(short, long)]
        yes: bool,
    },

    /// Show one document.
    Show {
        /// Document id.
        id: i64,
    },

    /// List documents, newest first.
    List(ListArgs),

    /// Full-text search over titles, metadata and file contents.
    Search(SearchArgs),

    // =========================================================================
    // Maintenance Commands
    // =========================================================================
    /// Rebuild the search index from storage.
    Reindex,
}

/// `user` subcommands.
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Add a staff account.
    Add(UserAddArgs),
}

/// Arguments of `user add`.
#[derive(Args, Debug, Clone)]
pub struct UserAddArgs {
    /// Login name.
    pub username: String,

    /// Full name shown in listings and notifications.
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Email address notifications go to.
    #[arg(short, long, default_value = "")]
    pub email: String,

    /// Grant every permission and skip program scoping.
    #[arg(long)]
    pub superuser: bool,

    /// Document permissions (view, add, change, delete).
    #[arg(short, long = "perm", value_delimiter = ',')]
    pub permissions: Vec<Permission>,

    /// Group memberships, e.g. Guest.
    #[arg(short, long = "group")]
    pub groups: Vec<String>,

    /// Program the user belongs to.
    #[arg(long)]
    pub program: Option<String>,
}

/// `program` and `type` subcommands.
#[derive(Subcommand, Debug)]
pub enum NamedCommands {
    /// Add an entry.
    Add {
        /// Unique name.
        name: String,
    },
}

/// Arguments of `upload`.
#[derive(Args, Debug, Clone, Default)]
pub struct UploadArgs {
    /// File to upload.
    #[arg(conflicts_with = "link")]
    pub file: Option<PathBuf>,

    /// Hyperlink to register instead of a file.
    #[arg(short, long)]
    pub link: Option<String>,

    /// Document type name.
    #[arg(short = 't', long = "type")]
    pub document_type: String,

    /// Title (defaults to the file name without extensions).
    #[arg(long)]
    pub title: Option<String>,

    /// Program names.
    #[arg(short, long = "program")]
    pub programs: Vec<String>,

    /// Author usernames (defaults to you).
    #[arg(short, long = "author")]
    pub authors: Vec<String>,

    /// Authors without an account.
    #[arg(long, default_value = "")]
    pub external_authors: String,

    /// Free-form notes.
    #[arg(short, long, default_value = "")]
    pub notes: String,

    /// Mark as confidential.
    #[arg(long)]
    pub confidential: bool,
}

/// Arguments of `edit`.
#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    /// Document id.
    pub id: i64,

    /// New title.
    #[arg(long)]
    pub title: Option<String>,

    /// New document type name.
    #[arg(short = 't', long = "type")]
    pub document_type: Option<String>,

    /// Replace the program list.
    #[arg(short, long = "program")]
    pub programs: Option<Vec<String>>,

    /// Replace the stored file.
    #[arg(long, conflicts_with = "clear_file")]
    pub file: Option<PathBuf>,

    /// Remove the stored file.
    #[arg(long)]
    pub clear_file: bool,

    /// New hyperlink; an empty value clears it.
    #[arg(short, long)]
    pub link: Option<String>,

    /// Replace the author list.
    #[arg(short, long = "author")]
    pub authors: Option<Vec<String>>,

    /// New external authors.
    #[arg(long)]
    pub external_authors: Option<String>,

    /// New notes.
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Set the confidential flag.
    #[arg(long)]
    pub confidential: Option<bool>,

    /// Set the deleted flag; false restores a deleted document.
    #[arg(long)]
    pub deleted: Option<bool>,
}

/// Arguments of `list`.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only deleted documents.
    #[arg(long, conflicts_with = "all")]
    pub deleted: bool,

    /// Active and deleted documents.
    #[arg(long)]
    pub all: bool,

    /// Filter by document type name.
    #[arg(short = 't', long = "type")]
    pub document_type: Option<String>,

    /// Filter by program name.
    #[arg(short, long)]
    pub program: Option<String>,

    /// Maximum results to show.
    #[arg(short, long, default_value = "50")]
    pub limit: u32,
}

/// Arguments of `search`.
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Query text.
    pub query: String,

    /// Only deleted documents.
    #[arg(long, conflicts_with = "any")]
    pub deleted: bool,

    /// Active and deleted documents.
    #[arg(long)]
    pub any: bool,

    /// Filter by document type name.
    #[arg(short = 't', long = "type")]
    pub document_type: Option<String>,

    /// Filter by program name.
    #[arg(short, long)]
    pub program: Option<String>,

    /// Maximum results to show.
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}
