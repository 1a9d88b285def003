//! Document record and its attachment types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DOCUMENTS_PREFIX;
use crate::enums::DocumentState;
use crate::ids::{DocumentId, DocumentTypeId, ProgramId, UserId};

/// A file that has been written to blob storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredFile {
    /// Path relative to the storage root, e.g. `documents/boink.png`.
    pub path: String,
}

impl StoredFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Final path component.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Whether the path lives under the documents prefix.
    pub fn is_in_documents(&self) -> bool {
        self.path
            .strip_prefix(DOCUMENTS_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// An uploaded file held in memory for the duration of one save.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpload {
    /// Declared file name, including extension.
    pub name: String,
    /// Raw bytes.
    pub content: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Lowercased extension of the declared name, if any.
    pub fn extension(&self) -> Option<String> {
        file_extension(&self.name)
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .finish()
    }
}

/// Lowercased extension of a file name (text after the last dot).
///
/// Returns `None` for names without a dot and for dotfiles like `.bashrc`.
pub fn file_extension(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rfind('.') {
        Some(0) | None => None,
        Some(i) if i + 1 < base.len() => Some(base[i + 1..].to_lowercase()),
        Some(_) => None,
    }
}

/// A document: either an attached file or a hyperlink, with metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Row id
    pub id: DocumentId,
    /// Unique title
    pub title: String,
    /// Category
    pub document_type: DocumentTypeId,
    /// Linked programs
    pub programs: Vec<ProgramId>,
    /// Attached file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<StoredFile>,
    /// Link to an external document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,
    /// Description
    pub notes: String,
    /// Linked authors
    pub authors: Vec<UserId>,
    /// Free-text authors who are not users
    pub external_authors: String,
    /// Acting user at creation time; never user-editable
    pub uploader: Option<UserId>,
    /// Set once on creation
    pub created: DateTime<Utc>,
    /// Confidentiality flag
    pub confidential: bool,
    /// Soft-delete state
    pub state: DocumentState,
}

impl Document {
    /// The boolean soft-delete flag.
    pub fn deleted(&self) -> bool {
        self.state.is_deleted()
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// Whether `user` uploaded this document.
    pub fn is_uploaded_by(&self, user: UserId) -> bool {
        self.uploader == Some(user)
    }

    /// Whether the document is linked to `program`.
    pub fn in_program(&self, program: ProgramId) -> bool {
        self.programs.contains(&program)
    }

    /// Join author full names for list display.
    ///
    /// `name_of` resolves an author id to a display name; unknown ids are skipped.
    pub fn authors_display<F>(&self, name_of: F) -> String
    where
        F: Fn(UserId) -> Option<String>,
    {
        self.authors
            .iter()
            .filter_map(|id| name_of(*id))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document {
            id: DocumentId(1),
            title: "Quarterly report".into(),
            document_type: DocumentTypeId(1),
            programs: vec![ProgramId(2)],
            file: Some(StoredFile::new("documents/report.docx")),
            hyperlink: None,
            notes: String::new(),
            authors: vec![UserId(1), UserId(2), UserId(9)],
            external_authors: String::new(),
            uploader: Some(UserId(1)),
            created: Utc::now(),
            confidential: false,
            state: DocumentState::Active,
        }
    }

    #[test]
    fn test_deleted_mirrors_state() {
        let mut doc = sample();
        assert!(!doc.deleted());
        doc.state = DocumentState::Deleted;
        assert!(doc.deleted());
    }

    #[test]
    fn test_authors_display_skips_unknown() {
        let doc = sample();
        let names = doc.authors_display(|id| match id.get() {
            1 => Some("John Lennon".to_string()),
            2 => Some("Ringo Starr".to_string()),
            _ => None,
        });
        assert_eq!(names, "John Lennon, Ringo Starr");
    }

    #[test]
    fn test_stored_file_helpers() {
        let f = StoredFile::new("documents/boink_1.png");
        assert_eq!(f.file_name(), "boink_1.png");
        assert!(f.is_in_documents());
        assert!(!StoredFile::new("documentsx/a.png").is_in_documents());
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("report.DOCX").as_deref(), Some("docx"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension(".bashrc"), None);
        assert_eq!(file_extension("dir.v2/notes"), None);
    }

    #[test]
    fn test_upload_debug_hides_content() {
        let up = FileUpload::new("a.txt", b"secret".to_vec());
        let dbg = format!("{:?}", up);
        assert!(dbg.contains("len: 6"));
        assert!(!dbg.contains("secret"));
    }
}
