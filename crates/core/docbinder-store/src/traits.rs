//! Trait definitions for storage components.
//!
//! Implementations may vary (e.g., in-memory vs SQLite) but must satisfy
//! these interfaces.

use docbinder_types::{
    Document, DocumentId, DocumentType, DocumentTypeId, Program, ProgramId, StoredFile, User,
    UserId,
};

use crate::error::Result;
use crate::types::DocumentFilter;

// =============================================================================
// Document Records
// =============================================================================

/// Trait for persisting document records.
pub trait DocumentStore {
    /// Insert a new document and return it with its assigned id.
    ///
    /// The `id` of the argument is ignored. A duplicate title is a
    /// [`StoreError::Conflict`](crate::StoreError::Conflict).
    fn insert(&mut self, document: &Document) -> Result<Document>;

    /// Overwrite an existing document, including its author and program links.
    ///
    /// Returns an error if the document doesn't exist.
    fn update(&mut self, document: &Document) -> Result<()>;

    /// Load a document by id.
    ///
    /// Returns `None` if the document doesn't exist.
    fn load(&self, id: DocumentId) -> Result<Option<Document>>;

    /// Look up a document by its exact title.
    fn find_by_title(&self, title: &str) -> Result<Option<Document>>;

    /// List documents matching filter criteria, newest first.
    fn list(&self, filter: &DocumentFilter) -> Result<Vec<Document>>;

    /// Count all stored documents, deleted ones included.
    fn count(&self) -> Result<u64>;
}

// =============================================================================
// Directory (users, programs, document types)
// =============================================================================

/// Trait for the reference data documents point at.
pub trait DirectoryStore {
    /// Insert a user and return it with its assigned id.
    fn add_user(&mut self, user: &User) -> Result<User>;

    /// Overwrite an existing user.
    fn update_user(&mut self, user: &User) -> Result<()>;

    fn load_user(&self, id: UserId) -> Result<Option<User>>;

    fn find_user(&self, username: &str) -> Result<Option<User>>;

    fn list_users(&self) -> Result<Vec<User>>;

    fn add_program(&mut self, name: &str) -> Result<Program>;

    fn load_program(&self, id: ProgramId) -> Result<Option<Program>>;

    fn find_program(&self, name: &str) -> Result<Option<Program>>;

    fn list_programs(&self) -> Result<Vec<Program>>;

    /// Insert a document type. Names are unique.
    fn add_document_type(&mut self, name: &str) -> Result<DocumentType>;

    fn load_document_type(&self, id: DocumentTypeId) -> Result<Option<DocumentType>>;

    fn find_document_type(&self, name: &str) -> Result<Option<DocumentType>>;

    fn list_document_types(&self) -> Result<Vec<DocumentType>>;
}

// =============================================================================
// Blob Storage
// =============================================================================

/// Trait for storing uploaded file bytes.
pub trait BlobStore {
    /// Store `content` under the documents prefix and return where it went.
    ///
    /// The name is reduced to its final path component. If a file with that
    /// name already exists a `_N` suffix is added to the stem.
    fn save(&mut self, name: &str, content: &[u8]) -> Result<StoredFile>;

    /// Load a stored file.
    ///
    /// Returns `None` if the file doesn't exist.
    fn load(&self, file: &StoredFile) -> Result<Option<Vec<u8>>>;

    /// Check if a stored file exists.
    fn exists(&self, file: &StoredFile) -> bool;

    /// Delete a stored file.
    ///
    /// Returns Ok(()) even if the file doesn't exist.
    fn delete(&mut self, file: &StoredFile) -> Result<()>;
}
