//! Filesystem storage for uploaded files.
//!
//! Files are written below `<root>/documents/` under their own (sanitized)
//! name. A name that is already taken gets a numeric suffix on its stem:
//! `boink.png`, `boink_1.png`, `boink_2.png`, ...

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use docbinder_types::{StoredFile, DOCUMENTS_PREFIX};

use crate::error::{Result, StoreError};
use crate::traits::BlobStore;

/// Fallback name for uploads whose name sanitizes to nothing.
const FALLBACK_NAME: &str = "upload";

/// Filesystem-based blob store.
pub struct FsBlobStore {
    /// Storage root; files live in `root/documents`.
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a new blob store rooted at `root`, creating `root/documents`.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(DOCUMENTS_PREFIX))?;
        Ok(Self { root })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute filesystem path of a stored file.
    ///
    /// Rejects paths outside the documents prefix or containing `..`.
    pub fn path_of(&self, file: &StoredFile) -> Result<PathBuf> {
        if !file.is_in_documents()
            || file
                .path
                .split('/')
                .any(|part| part.is_empty() || part == "." || part == "..")
        {
            return Err(StoreError::invalid_data(format!(
                "stored file path outside {DOCUMENTS_PREFIX}/: {}",
                file.path
            )));
        }
        Ok(self.root.join(&file.path))
    }
}

/// Reduce an uploaded name to a safe final path component.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Split into stem and extension (extension includes the dot).
///
/// Only the last extension is split off, so `archive.tar.gz` yields
/// `("archive.tar", ".gz")`.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 => name.split_at(i),
        _ => (name, ""),
    }
}

/// Candidate name for the `n`th collision (`n == 0` is the name itself).
fn candidate_name(name: &str, n: u32) -> String {
    if n == 0 {
        return name.to_string();
    }
    let (stem, ext) = split_extension(name);
    format!("{stem}_{n}{ext}")
}

impl BlobStore for FsBlobStore {
    fn save(&mut self, name: &str, content: &[u8]) -> Result<StoredFile> {
        let name = sanitize_file_name(name);
        let dir = self.root.join(DOCUMENTS_PREFIX);
        fs::create_dir_all(&dir)?;

        let mut n = 0u32;
        loop {
            let candidate = candidate_name(&name, n);
            // create_new makes the existence check and the create one step
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(dir.join(&candidate))
            {
                Ok(mut file) => {
                    file.write_all(content)?;
                    file.sync_all()?;
                    let stored = StoredFile::new(format!("{DOCUMENTS_PREFIX}/{candidate}"));
                    tracing::debug!(path = %stored.path, size = content.len(), "Stored upload");
                    return Ok(stored);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    n = n.checked_add(1).ok_or_else(|| {
                        StoreError::conflict(format!("no free name for upload {name}"))
                    })?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn load(&self, file: &StoredFile) -> Result<Option<Vec<u8>>> {
        let path = self.path_of(file)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, file: &StoredFile) -> bool {
        self.path_of(file).map(|p| p.is_file()).unwrap_or(false)
    }

    fn delete(&mut self, file: &StoredFile) -> Result<()> {
        let path = self.path_of(file)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %file.path, "Deleted stored file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
