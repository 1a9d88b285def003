//! Document form: turns submitted values into a draft.
//!
//! The form is built per request by a [`DocumentFormFactory`] that knows
//! the acting user. Cleaning applies the server-side rules that do not
//! depend on storage: the uploader is never taken from the submission,
//! a missing title is derived from the file name, and an empty author
//! list defaults to the actor.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use docbinder_types::{
    Document, DocumentId, DocumentState, DocumentTypeId, FileUpload, ProgramId, StoredFile,
    Transition, User, UserId,
};

use crate::error::{fields, FormErrors, ValidationResult};

/// Values submitted by the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInput {
    pub title: String,
    pub document_type: Option<DocumentTypeId>,
    pub programs: Vec<ProgramId>,
    /// Newly uploaded file, if any.
    #[serde(skip)]
    pub upload: Option<FileUpload>,
    /// Drop the currently stored file.
    pub clear_file: bool,
    pub hyperlink: String,
    pub notes: String,
    pub authors: Vec<UserId>,
    pub external_authors: String,
    pub confidential: bool,
    /// Soft-delete flag as edited; `None` keeps the current state.
    pub deleted: Option<bool>,
    /// Ignored: the uploader is always decided server-side.
    pub uploader: Option<UserId>,
}

impl DocumentInput {
    /// Start from the current values of `document`, as an edit form would.
    pub fn from_document(document: &Document) -> Self {
        Self {
            title: document.title.clone(),
            document_type: Some(document.document_type),
            programs: document.programs.clone(),
            upload: None,
            clear_file: false,
            hyperlink: document.hyperlink.clone().unwrap_or_default(),
            notes: document.notes.clone(),
            authors: document.authors.clone(),
            external_authors: document.external_authors.clone(),
            confidential: document.confidential,
            deleted: Some(document.deleted()),
            uploader: document.uploader,
        }
    }
}

/// The file side of a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Attachment {
    /// No file.
    #[default]
    None,
    /// Keep the file already in storage.
    Stored(StoredFile),
    /// A new upload that has not been stored yet.
    Upload(FileUpload),
}

impl Attachment {
    pub fn is_present(&self) -> bool {
        !matches!(self, Attachment::None)
    }

    /// The new upload, if this attachment is one.
    pub fn upload(&self) -> Option<&FileUpload> {
        match self {
            Attachment::Upload(upload) => Some(upload),
            _ => None,
        }
    }

    /// File name of the attachment.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Attachment::None => None,
            Attachment::Stored(file) => Some(file.file_name()),
            Attachment::Upload(upload) => Some(upload.name.as_str()),
        }
    }
}

/// A cleaned document, ready for model validation and saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDraft {
    /// `None` when creating.
    pub id: Option<DocumentId>,
    pub title: String,
    pub document_type: Option<DocumentTypeId>,
    pub programs: Vec<ProgramId>,
    pub attachment: Attachment,
    pub hyperlink: Option<String>,
    pub notes: String,
    pub authors: Vec<UserId>,
    pub external_authors: String,
    pub uploader: Option<UserId>,
    /// Creation time of the existing document.
    pub created: Option<DateTime<Utc>>,
    pub confidential: bool,
    /// State after this save.
    pub state: DocumentState,
    /// Transition that leads to `state`.
    pub transition: Transition,
}

impl DocumentDraft {
    /// Draft for re-saving `document` unchanged, as programmatic saves do.
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: Some(document.id),
            title: document.title.clone(),
            document_type: Some(document.document_type),
            programs: document.programs.clone(),
            attachment: document
                .file
                .clone()
                .map(Attachment::Stored)
                .unwrap_or_default(),
            hyperlink: document.hyperlink.clone(),
            notes: document.notes.clone(),
            authors: document.authors.clone(),
            external_authors: document.external_authors.clone(),
            uploader: document.uploader,
            created: Some(document.created),
            confidential: document.confidential,
            state: document.state,
            transition: Transition::Edit,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+?)((?:\.\w+)+)$").expect("valid title pattern"))
}

/// Title for a file name: the final path component with its trailing run
/// of `.ext` segments removed.
///
/// ```
/// use docbinder_valid::derive_title;
///
/// assert_eq!(derive_title("report.docx"), "report");
/// assert_eq!(derive_title("archive.tar.gz"), "archive");
/// assert_eq!(derive_title("README"), "README");
/// ```
pub fn derive_title(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();
    match title_pattern().captures(base) {
        Some(caps) => caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| base.to_string()),
        None => base.to_string(),
    }
}

/// Builds document forms for one acting user.
#[derive(Debug, Clone)]
pub struct DocumentFormFactory {
    actor: User,
}

impl DocumentFormFactory {
    pub fn new(actor: User) -> Self {
        Self { actor }
    }

    pub fn actor(&self) -> &User {
        &self.actor
    }

    /// Bind submitted values to a form.
    pub fn bind(&self, input: DocumentInput) -> DocumentForm {
        DocumentForm {
            actor: self.actor.clone(),
            input,
        }
    }
}

/// A bound document form.
#[derive(Debug, Clone)]
pub struct DocumentForm {
    actor: User,
    input: DocumentInput,
}

impl DocumentForm {
    pub fn input(&self) -> &DocumentInput {
        &self.input
    }

    /// Clean the submission against the document being edited, if any.
    pub fn clean(self, existing: Option<&Document>) -> ValidationResult<DocumentDraft> {
        let DocumentForm { actor, input } = self;
        let mut errors = FormErrors::new();

        if input.upload.is_some() && input.clear_file {
            errors.add_field(
                fields::FILE,
                "Please either submit a file or check the clear checkbox, not both.",
            );
        }

        let attachment = match (input.upload, existing.and_then(|d| d.file.clone())) {
            (Some(upload), _) => Attachment::Upload(upload),
            (None, Some(_)) if input.clear_file => Attachment::None,
            (None, Some(stored)) => Attachment::Stored(stored),
            (None, None) => Attachment::None,
        };

        let mut title = input.title.trim().to_string();
        if title.is_empty() {
            if let Some(name) = attachment.file_name() {
                title = derive_title(name);
            }
        }

        // Stored links are unique; authors keep their order, programs sort by id
        let mut authors = if input.authors.is_empty() {
            vec![actor.id]
        } else {
            input.authors
        };
        let mut seen = BTreeSet::new();
        authors.retain(|author| seen.insert(*author));
        let mut programs = input.programs;
        programs.sort();
        programs.dedup();

        let hyperlink = Some(input.hyperlink.trim().to_string()).filter(|h| !h.is_empty());

        let (uploader, created, state, transition) = match existing {
            Some(doc) => {
                let transition = input
                    .deleted
                    .map(|deleted| doc.state.edit_transition(deleted))
                    .unwrap_or(Transition::Edit);
                // edit_transition only yields transitions valid from doc.state
                let state = doc.state.apply(transition).unwrap_or(doc.state);
                (doc.uploader, Some(doc.created), state, transition)
            }
            None => (Some(actor.id), None, DocumentState::Active, Transition::Edit),
        };

        errors.into_result()?;

        Ok(DocumentDraft {
            id: existing.map(|d| d.id),
            title,
            document_type: input.document_type,
            programs,
            attachment,
            hyperlink,
            notes: input.notes,
            authors,
            external_authors: input.external_authors.trim().to_string(),
            uploader,
            created,
            confidential: input.confidential,
            state,
            transition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, username: &str) -> User {
        User {
            id: UserId(id),
            username: username.into(),
            full_name: String::new(),
            email: String::new(),
            is_superuser: false,
            permissions: BTreeSet::new(),
            groups: BTreeSet::new(),
            program: None,
        }
    }

    fn existing() -> Document {
        Document {
            id: DocumentId(3),
            title: "Budget".into(),
            document_type: DocumentTypeId(1),
            programs: vec![],
            file: Some(StoredFile::new("documents/budget.xls")),
            hyperlink: None,
            notes: String::new(),
            authors: vec![UserId(1)],
            external_authors: String::new(),
            uploader: Some(UserId(1)),
            created: Utc::now(),
            confidential: false,
            state: DocumentState::Active,
        }
    }

    #[test]
    fn test_derive_title() {
        assert_eq!(derive_title("report.docx"), "report");
        assert_eq!(derive_title("archive.tar.gz"), "archive");
        assert_eq!(derive_title("README"), "README");
        assert_eq!(derive_title(".bashrc"), ".bashrc");
        assert_eq!(derive_title("C:\\scans\\minutes 2024.pdf"), "minutes 2024");
        assert_eq!(derive_title("notes."), "notes.");
    }

    #[test]
    fn test_create_forces_uploader_and_derives_title() {
        let factory = DocumentFormFactory::new(user(2, "ringo"));
        let input = DocumentInput {
            document_type: Some(DocumentTypeId(1)),
            upload: Some(FileUpload::new("report.docx", b"x".to_vec())),
            uploader: Some(UserId(1)),
            ..DocumentInput::default()
        };
        let draft = factory.bind(input).clean(None).unwrap();
        assert_eq!(draft.uploader, Some(UserId(2)));
        assert_eq!(draft.title, "report");
        assert_eq!(draft.authors, vec![UserId(2)]);
        assert!(draft.is_new());
        assert_eq!(draft.state, DocumentState::Active);
    }

    #[test]
    fn test_edit_preserves_uploader_and_file() {
        let doc = existing();
        let factory = DocumentFormFactory::new(user(2, "ringo"));
        let mut input = DocumentInput::from_document(&doc);
        input.uploader = Some(UserId(2));
        input.notes = "revised".into();
        let draft = factory.bind(input).clean(Some(&doc)).unwrap();
        assert_eq!(draft.uploader, Some(UserId(1)));
        assert_eq!(draft.attachment, Attachment::Stored(doc.file.clone().unwrap()));
        assert_eq!(draft.created, Some(doc.created));
        assert_eq!(draft.transition, Transition::Edit);
    }

    #[test]
    fn test_edit_clear_file() {
        let doc = existing();
        let mut input = DocumentInput::from_document(&doc);
        input.clear_file = true;
        let draft = DocumentFormFactory::new(user(1, "john"))
            .bind(input)
            .clean(Some(&doc))
            .unwrap();
        assert_eq!(draft.attachment, Attachment::None);
    }

    #[test]
    fn test_upload_and_clear_conflict() {
        let doc = existing();
        let mut input = DocumentInput::from_document(&doc);
        input.clear_file = true;
        input.upload = Some(FileUpload::new("new.xls", b"x".to_vec()));
        let errors = DocumentFormFactory::new(user(1, "john"))
            .bind(input)
            .clean(Some(&doc))
            .unwrap_err();
        assert!(errors.has_field(fields::FILE));
    }

    #[test]
    fn test_deleted_flag_edit_maps_to_transitions() {
        let mut doc = existing();
        let mut input = DocumentInput::from_document(&doc);
        input.deleted = Some(true);
        let draft = DocumentFormFactory::new(user(1, "john"))
            .bind(input)
            .clean(Some(&doc))
            .unwrap();
        assert_eq!(draft.transition, Transition::SoftDelete);
        assert_eq!(draft.state, DocumentState::Deleted);

        doc.state = DocumentState::Deleted;
        let mut input = DocumentInput::from_document(&doc);
        input.deleted = Some(false);
        let draft = DocumentFormFactory::new(user(1, "john"))
            .bind(input)
            .clean(Some(&doc))
            .unwrap();
        assert_eq!(draft.transition, Transition::Restore);
        assert_eq!(draft.state, DocumentState::Active);
    }

    #[test]
    fn test_links_are_deduplicated() {
        let input = DocumentInput {
            title: "Links".into(),
            hyperlink: "http://example.org/".into(),
            programs: vec![ProgramId(2), ProgramId(1), ProgramId(2)],
            authors: vec![UserId(2), UserId(1), UserId(2)],
            ..DocumentInput::default()
        };
        let draft = DocumentFormFactory::new(user(1, "john"))
            .bind(input)
            .clean(None)
            .unwrap();
        assert_eq!(draft.authors, vec![UserId(2), UserId(1)]);
        assert_eq!(draft.programs, vec![ProgramId(1), ProgramId(2)]);
    }

    #[test]
    fn test_hyperlink_blank_is_none() {
        let input = DocumentInput {
            title: "Link".into(),
            hyperlink: "   ".into(),
            ..DocumentInput::default()
        };
        let draft = DocumentFormFactory::new(user(1, "john"))
            .bind(input)
            .clean(None)
            .unwrap();
        assert_eq!(draft.hyperlink, None);
    }
}
