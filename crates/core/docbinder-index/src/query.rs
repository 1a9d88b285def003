//! Search requests and results.

use serde::{Deserialize, Serialize};

use docbinder_types::{DocumentId, DocumentTypeId, ProgramId, UserId};

/// Default number of hits returned.
pub const DEFAULT_LIMIT: usize = 20;

/// Which side of the soft-delete flag to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletedFilter {
    /// Only documents that are not deleted.
    #[default]
    Active,
    /// Only deleted documents.
    Deleted,
    /// Both.
    Any,
}

impl DeletedFilter {
    /// Flag value to require, if any.
    pub fn required_flag(self) -> Option<bool> {
        match self {
            DeletedFilter::Active => Some(false),
            DeletedFilter::Deleted => Some(true),
            DeletedFilter::Any => None,
        }
    }
}

/// A search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text; empty matches every entry.
    pub text: String,
    pub deleted: DeletedFilter,
    pub document_type: Option<DocumentTypeId>,
    /// Match entries linked to any of these programs.
    pub programs: Vec<ProgramId>,
    /// Match entries by any of these authors.
    pub authors: Vec<UserId>,
    pub limit: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            deleted: DeletedFilter::default(),
            document_type: None,
            programs: Vec::new(),
            authors: Vec::new(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_deleted(mut self, deleted: DeletedFilter) -> Self {
        self.deleted = deleted;
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

    pub fn with_author(mut self, author: UserId) -> Self {
        self.authors.push(author);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: DocumentId,
    pub score: f32,
    pub title: String,
    pub deleted: bool,
}
