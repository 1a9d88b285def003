//! Query types for the storage layer.

use docbinder_types::{DocumentTypeId, ProgramId, UserId};

/// Filter for listing documents.
///
/// All criteria are combined with AND; `programs` matches a document
/// linked to any of the listed programs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    /// Soft-delete flag to match; `None` matches both.
    pub deleted: Option<bool>,
    /// Restrict to this document type.
    pub document_type: Option<DocumentTypeId>,
    /// Restrict to documents linked to any of these programs.
    pub programs: Vec<ProgramId>,
    /// Restrict to this uploader.
    pub uploader: Option<UserId>,
    /// Maximum number of rows.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u32>,
}

impl DocumentFilter {
    /// Create an empty filter (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Only active documents.
    pub fn active() -> Self {
        Self::default().with_deleted(false)
    }

    pub fn with_deleted(mut self, deleted: bool) -> Self {
        self.deleted = Some(deleted);
        self
    }

    pub fn with_document_type(mut self, document_type: DocumentTypeId) -> Self {
        self.document_type = Some(document_type);
        self
    }

    pub fn with_program(mut self, program: ProgramId) -> Self {
        self.programs.push(program);
        self
    }

    pub fn with_uploader(mut self, uploader: UserId) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}
