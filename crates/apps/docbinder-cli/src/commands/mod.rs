//! CLI command implementations.

pub mod delete;
pub mod directory;
pub mod edit;
pub mod init;
pub mod list;
pub mod reindex;
pub mod search;
pub mod show;
pub mod upload;

// Re-export command handlers
pub use delete::delete;
pub use directory::{program_add, type_add, user_add};
pub use edit::edit;
pub use init::init;
pub use list::list;
pub use reindex::reindex;
pub use search::search;
pub use show::show;
pub use upload::upload;

use std::path::Path;

use docbinder_types::FileUpload;

use crate::error::{CliError, CliResult};

/// Read a file from disk as an upload named after its last path component.
pub(crate) fn read_upload(path: &Path) -> CliResult<FileUpload> {
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::user(format!("Not a file name: {}", path.display())))?;
    let content = std::fs::read(path)?;
    Ok(FileUpload::new(name, content))
}
