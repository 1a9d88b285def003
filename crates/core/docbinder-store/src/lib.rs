//! Local storage layer for docbinder.
//!
//! This crate provides persistence for the document library:
//!
//! - **Document records** (SQLite): documents plus author and program links
//! - **Directory** (SQLite): users, programs and document types
//! - **Blob storage** (filesystem): uploaded file bytes under `documents/`
//!
//! # Storage Layout
//!
//! ```text
//! ~/.docbinder/
//! ├── config.toml              # Configuration
//! ├── docbinder.db             # SQLite: documents, users, programs, types
//! ├── files/
//! │   └── documents/
//! │       ├── report.docx
//! │       └── report_1.docx    # Collision-suffixed upload
//! └── index/                   # Search index (docbinder-index)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use docbinder_store::{BlobStore, StoreConfig, StoreState};
//!
//! let config = StoreConfig::new("/tmp/docbinder");
//! let mut state = StoreState::open(config).expect("Failed to open store");
//!
//! let stored = state.blobs.save("boink.png", b"...").expect("Failed to store file");
//! assert_eq!(stored.path, "documents/boink.png");
//! ```

pub mod blob;
pub mod directory;
pub mod documents;
pub mod error;
pub mod schema;
pub mod traits;
pub mod types;

pub use error::{Result, StoreError};

pub use traits::{BlobStore, DirectoryStore, DocumentStore};

pub use types::DocumentFilter;

pub use blob::{sanitize_file_name, FsBlobStore};
pub use directory::SqliteDirectoryStore;
pub use documents::SqliteDocumentStore;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

/// Get the default data directory for docbinder.
///
/// Priority:
/// 1. `DOCBINDER_DATA_DIR` environment variable (if set)
/// 2. Platform-specific data directory (e.g., `~/.local/share/docbinder` on Linux)
/// 3. Fallback to `$HOME/.docbinder`
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DOCBINDER_DATA_DIR") {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("org", "docbinder", "docbinder")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".docbinder")
        })
}

/// Configuration for [`StoreState`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base directory for all data.
    pub base_dir: PathBuf,
    /// Database file path (default: base_dir/docbinder.db).
    pub database_path: Option<PathBuf>,
    /// Blob storage root (default: base_dir/files).
    pub blob_root: Option<PathBuf>,
    /// Search index directory (default: base_dir/index).
    pub index_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Create a new configuration with the given base directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            database_path: None,
            blob_root: None,
            index_dir: None,
        }
    }

    /// Set the database path.
    pub fn with_database_path(mut self, path: impl AsRef<Path>) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the blob storage root.
    pub fn with_blob_root(mut self, path: impl AsRef<Path>) -> Self {
        self.blob_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the search index directory.
    pub fn with_index_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.index_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Get the database path.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| self.base_dir.join("docbinder.db"))
    }

    /// Get the blob storage root.
    pub fn blob_root(&self) -> PathBuf {
        self.blob_root
            .clone()
            .unwrap_or_else(|| self.base_dir.join("files"))
    }

    /// Get the search index directory.
    pub fn index_dir(&self) -> PathBuf {
        self.index_dir
            .clone()
            .unwrap_or_else(|| self.base_dir.join("index"))
    }
}

/// All storage components over one shared database connection.
pub struct StoreState {
    /// Document records (SQLite).
    pub documents: SqliteDocumentStore,
    /// Users, programs, document types (SQLite).
    pub directory: SqliteDirectoryStore,
    /// Uploaded files (filesystem).
    pub blobs: FsBlobStore,
    /// Shared database connection.
    conn: Arc<Mutex<Connection>>,
    /// Configuration used to open this state.
    config: StoreConfig,
}

impl StoreState {
    /// Open storage with the given configuration.
    ///
    /// Creates all necessary directories and initializes the database schema.
    pub fn open(config: StoreConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.base_dir)?;

        let db_path = config.database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::info!(db_path = %db_path.display(), "Opening docbinder database");
        let conn = Connection::open(&db_path)?;
        schema::initialize_schema(&conn)?;

        Self::compose(conn, config)
    }

    /// Open storage over an in-memory database.
    ///
    /// Blobs go to a fresh directory under the system temp dir.
    pub fn open_in_memory() -> Result<Self> {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let temp_dir = std::env::temp_dir().join(format!(
            "docbinder-test-{}-{}-{}",
            std::process::id(),
            nanos,
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&temp_dir)?;

        let conn = Connection::open_in_memory()?;
        schema::initialize_schema(&conn)?;

        Self::compose(conn, StoreConfig::new(temp_dir))
    }

    fn compose(conn: Connection, config: StoreConfig) -> Result<Self> {
        let conn = Arc::new(Mutex::new(conn));
        let documents = SqliteDocumentStore::new(Arc::clone(&conn));
        let directory = SqliteDirectoryStore::new(Arc::clone(&conn));
        let blobs = FsBlobStore::new(config.blob_root())?;

        Ok(Self {
            documents,
            directory,
            blobs,
            conn,
            config,
        })
    }

    /// Get the configuration used to open this state.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Get a reference to the shared database connection.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_paths() {
        let config = StoreConfig::new("/data");
        assert_eq!(config.database_path(), PathBuf::from("/data/docbinder.db"));
        assert_eq!(config.blob_root(), PathBuf::from("/data/files"));
        assert_eq!(config.index_dir(), PathBuf::from("/data/index"));

        let config = config.with_blob_root("/blobs").with_index_dir("/idx");
        assert_eq!(config.blob_root(), PathBuf::from("/blobs"));
        assert_eq!(config.index_dir(), PathBuf::from("/idx"));
    }

    #[test]
    fn test_open_creates_layout() {
        let dir = TempDir::new().unwrap();
        let state = StoreState::open(StoreConfig::new(dir.path())).unwrap();
        assert!(dir.path().join("docbinder.db").exists());
        assert!(dir.path().join("files").join("documents").is_dir());
        assert_eq!(state.config().base_dir, dir.path());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = TempDir::new().unwrap();
        {
            let mut state = StoreState::open(StoreConfig::new(dir.path())).unwrap();
            state.directory.add_program("Youth").unwrap();
        }
        let state = StoreState::open(StoreConfig::new(dir.path())).unwrap();
        assert!(state.directory.find_program("Youth").unwrap().is_some());
    }

    #[test]
    fn test_open_in_memory_isolated() {
        let mut a = StoreState::open_in_memory().unwrap();
        let b = StoreState::open_in_memory().unwrap();
        a.directory.add_program("Youth").unwrap();
        assert!(b.directory.find_program("Youth").unwrap().is_none());
        assert_ne!(a.config().base_dir, b.config().base_dir);
    }
}
