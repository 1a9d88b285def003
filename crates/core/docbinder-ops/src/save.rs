//! The save path: create and edit.
//!
//! Every save, including soft delete and restore, goes through
//! [`DocumentOperations::save_draft`]:
//! 1. Model validation and reference checks
//! 2. Validation hooks (extraction happens here)
//! 3. Store the new upload, if any
//! 4. Persist the row
//! 5. Upsert the index entry
//! 6. Notify the uploader

use docbinder_store::{BlobStore, DirectoryStore, DocumentStore};
use docbinder_types::{Document, DocumentId, Permission, StoredFile, Transition, User};
use docbinder_valid::{
    fields, require, validate_document, Attachment, DocumentDraft, DocumentFormFactory,
    DocumentInput, FormErrors, REQUIRED,
};

use crate::error::{OpsError, OpsResult};
use crate::hooks::{extraction_failure, PendingDocument};
use crate::notify::NotificationKind;
use crate::operations::DocumentOperations;

/// Message for a title already used by another document.
pub const DUPLICATE_TITLE: &str = "Document with this Title already exists.";

fn invalid_choice(value: impl std::fmt::Display) -> String {
    format!("Select a valid choice. {value} is not one of the available choices.")
}

impl DocumentOperations {
    /// Upload a new document.
    ///
    /// The actor needs the add permission. The uploader is always the actor.
    pub async fn create_document(
        &mut self,
        actor: &User,
        input: DocumentInput,
    ) -> OpsResult<Document> {
        // 1. Authorize
        require(actor, None, Permission::Add)?;

        // 2. Clean the form
        let draft = DocumentFormFactory::new(actor.clone())
            .bind(input)
            .clean(None)?;

        // 3. Save
        self.save_draft(actor, draft, None).await
    }

    /// Edit an existing document.
    ///
    /// Setting `deleted` in the input soft-deletes or restores the document
    /// through the transition table.
    pub async fn update_document(
        &mut self,
        actor: &User,
        id: DocumentId,
        input: DocumentInput,
    ) -> OpsResult<Document> {
        // 1. Load and authorize
        let existing = self.load_visible(actor, id)?;
        require(actor, existing.uploader, Permission::Change)?;

        // 2. Clean the form against the stored document
        let draft = DocumentFormFactory::new(actor.clone())
            .bind(input)
            .clean(Some(&existing))?;

        // 3. Save
        self.save_draft(actor, draft, Some(existing)).await
    }

    /// Validate and save a cleaned draft.
    ///
    /// `existing` is the stored document for edits; `None` creates a new one.
    pub async fn save_draft(
        &mut self,
        actor: &User,
        draft: DocumentDraft,
        existing: Option<Document>,
    ) -> OpsResult<Document> {
        // 1. Model validation and references
        let mut errors = validate_document(&draft).err().unwrap_or_default();
        errors.extend(self.check_references(&draft)?);
        errors.into_result()?;

        // 2. Validation hooks
        let content = self.attachment_content(&draft.attachment)?;
        let pending = PendingDocument::new(draft, content);
        self.hooks().run(&pending).await?;
        pending
            .text(self.extractor())
            .await
            .map_err(extraction_failure)?;
        let (draft, _, text) = pending.into_parts();

        let DocumentDraft {
            id,
            title,
            document_type,
            programs,
            attachment,
            hyperlink,
            notes,
            authors,
            external_authors,
            uploader,
            created,
            confidential,
            state,
            transition,
        } = draft;
        let document_type =
            document_type.ok_or_else(|| OpsError::field(fields::DOCUMENT_TYPE, REQUIRED))?;

        // 3. Store the new upload
        let (file, new_blob) = match attachment {
            Attachment::None => (None, None),
            Attachment::Stored(file) => (Some(file), None),
            Attachment::Upload(upload) => {
                let stored = self.state.blobs.save(&upload.name, &upload.content)?;
                (Some(stored.clone()), Some(stored))
            }
        };

        let document = Document {
            id: id.unwrap_or(DocumentId(0)),
            title,
            document_type,
            programs,
            file,
            hyperlink,
            notes,
            authors,
            external_authors,
            uploader,
            created: created.unwrap_or_else(chrono::Utc::now),
            confidential,
            state,
        };

        // 4. Persist
        let persisted = match &existing {
            None => self.state.documents.insert(&document),
            Some(_) => self
                .state
                .documents
                .update(&document)
                .map(|()| document.clone()),
        };
        let saved = match persisted {
            Ok(saved) => saved,
            Err(e) => {
                if let Some(blob) = &new_blob {
                    self.discard_blob(blob);
                }
                if e.is_conflict() {
                    return Err(OpsError::field(fields::TITLE, DUPLICATE_TITLE));
                }
                return Err(e.into());
            }
        };

        // Drop a replaced or cleared file
        if let Some(old) = existing.as_ref().and_then(|d| d.file.as_ref()) {
            if saved.file.as_ref() != Some(old) {
                self.discard_blob(old);
            }
        }

        // 5. Index
        self.index_document(&saved, text.as_deref())?;

        tracing::info!(
            document_id = %saved.id,
            title = %saved.title,
            user = %actor.username,
            transition = ?transition,
            deleted = saved.deleted(),
            "Saved document"
        );

        // 6. Notify
        if existing.is_some() {
            let kind = match transition {
                Transition::SoftDelete => NotificationKind::Deleted,
                Transition::Edit | Transition::Restore => NotificationKind::Modified,
            };
            self.notify_uploader(kind, &saved, actor);
        }

        Ok(saved)
    }

    /// Checks that need the store: unique title and existing references.
    fn check_references(&self, draft: &DocumentDraft) -> OpsResult<FormErrors> {
        let mut errors = FormErrors::new();

        if !draft.title.is_empty() {
            if let Some(other) = self.state.documents.find_by_title(&draft.title)? {
                if Some(other.id) != draft.id {
                    errors.add_field(fields::TITLE, DUPLICATE_TITLE);
                }
            }
        }

        if let Some(document_type) = draft.document_type {
            if self
                .state
                .directory
                .load_document_type(document_type)?
                .is_none()
            {
                errors.add_field(fields::DOCUMENT_TYPE, invalid_choice(document_type));
            }
        }

        for program in &draft.programs {
            if self.state.directory.load_program(*program)?.is_none() {
                errors.add_field(fields::PROGRAMS, invalid_choice(program));
            }
        }

        for author in &draft.authors {
            if self.state.directory.load_user(*author)?.is_none() {
                errors.add_field(fields::AUTHORS, invalid_choice(author));
            }
        }

        Ok(errors)
    }

    fn discard_blob(&mut self, file: &StoredFile) {
        if let Err(e) = self.state.blobs.delete(file) {
            tracing::warn!(path = %file.path, error = %e, "Failed to remove stored file");
        }
    }
}
