//! Index entries and how they are derived from documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docbinder_types::{Document, DocumentId, DocumentTypeId, ProgramId, UserId};

/// Values the index needs that are not on the document row itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryContext {
    /// Full names of the linked authors, in author order.
    pub author_names: Vec<String>,
    /// Display name of the uploader, if there is one.
    pub uploader_name: Option<String>,
}

impl EntryContext {
    pub fn new(author_names: Vec<String>, uploader_name: Option<String>) -> Self {
        Self {
            author_names,
            uploader_name,
        }
    }
}

/// One search index entry per document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: DocumentId,
    /// Extracted text of the attachment; empty for hyperlinks.
    pub text: String,
    pub title: String,
    pub notes: String,
    pub uploader: Option<String>,
    /// Author ids, for filtering.
    pub authors: Vec<UserId>,
    /// Author full names followed by the external authors text.
    pub author_names: Vec<String>,
    pub programs: Vec<ProgramId>,
    pub document_type: DocumentTypeId,
    /// Creation time at second precision.
    pub created: DateTime<Utc>,
    pub deleted: bool,
    pub external_authors: String,
}

impl IndexEntry {
    /// Derive the entry for `document`.
    ///
    /// Pure: the same document, context and text always give an equal entry.
    pub fn build(document: &Document, context: &EntryContext, text: Option<&str>) -> Self {
        let mut author_names = context.author_names.clone();
        let external = document.external_authors.trim();
        if !external.is_empty() {
            author_names.push(external.to_string());
        }

        Self {
            id: document.id,
            text: text.unwrap_or_default().to_string(),
            title: document.title.clone(),
            notes: document.notes.clone(),
            uploader: document
                .uploader
                .and(context.uploader_name.clone()),
            authors: document.authors.clone(),
            author_names,
            programs: document.programs.clone(),
            document_type: document.document_type,
            created: truncate_to_seconds(document.created),
            deleted: document.deleted(),
            external_authors: document.external_authors.clone(),
        }
    }
}

pub(crate) fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts.timestamp(), 0).unwrap_or(ts)
}
