//! Main `DocumentOperations` implementation.
//!
//! This module holds the struct, its constructor and the helpers shared by
//! the save, delete and query operations. The operations themselves live
//! in [`crate::save`], [`crate::delete`] and [`crate::query`].

use std::sync::Arc;

use docbinder_extract::TextExtractor;
use docbinder_index::{DocumentIndex, EntryContext, IndexEntry};
use docbinder_store::{BlobStore, DirectoryStore, DocumentStore, StoreState};
use docbinder_types::{Document, DocumentId, FileUpload, User};
use docbinder_valid::{can_see, Attachment};

use crate::config::OpsConfig;
use crate::error::{OpsError, OpsResult};
use crate::hooks::HookChain;
use crate::notify::{Mailer, Notification, NotificationKind};

/// Document operations over explicit collaborators.
///
/// Constructed once at startup and passed to whatever handles requests.
pub struct DocumentOperations {
    /// Storage for documents, directory and blobs.
    pub state: StoreState,
    /// Search index derived from the stored documents.
    pub index: DocumentIndex,
    /// Operations configuration.
    pub config: OpsConfig,
    extractor: Arc<dyn TextExtractor>,
    hooks: HookChain,
    mailer: Arc<dyn Mailer>,
}

impl DocumentOperations {
    /// Create operations from their collaborators.
    pub fn new(
        state: StoreState,
        index: DocumentIndex,
        extractor: Arc<dyn TextExtractor>,
        hooks: HookChain,
        mailer: Arc<dyn Mailer>,
        config: OpsConfig,
    ) -> Self {
        tracing::debug!(
            extractor = extractor.name(),
            hooks = ?hooks.names(),
            "Document operations ready"
        );
        Self {
            state,
            index,
            config,
            extractor,
            hooks,
            mailer,
        }
    }

    /// Create operations with the standard hook chain: [`crate::IndexabilityCheck`] only.
    pub fn with_defaults(
        state: StoreState,
        index: DocumentIndex,
        extractor: Arc<dyn TextExtractor>,
        mailer: Arc<dyn Mailer>,
        config: OpsConfig,
    ) -> Self {
        let hooks = HookChain::with_indexability(Arc::clone(&extractor));
        Self::new(state, index, extractor, hooks, mailer, config)
    }

    pub fn config(&self) -> &OpsConfig {
        &self.config
    }

    pub fn hooks(&self) -> &HookChain {
        &self.hooks
    }

    pub fn extractor(&self) -> &dyn TextExtractor {
        self.extractor.as_ref()
    }

    /// Link to the read-only view of a document.
    pub fn document_url(&self, id: DocumentId) -> String {
        self.config.document_url(id)
    }

    /// Link to the change history of a document.
    pub fn history_url(&self, id: DocumentId) -> String {
        self.config.history_url(id)
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    /// Load a document the actor is allowed to see.
    ///
    /// Documents outside a guest's program are reported as not found.
    pub(crate) fn load_visible(&self, actor: &User, id: DocumentId) -> OpsResult<Document> {
        let document = self
            .state
            .documents
            .load(id)?
            .ok_or(OpsError::NotFound(id))?;
        if !can_see(actor, &document) {
            tracing::debug!(document_id = %id, user = %actor.username, "Document outside actor's program");
            return Err(OpsError::NotFound(id));
        }
        Ok(document)
    }

    /// The bytes to extract for an attachment.
    pub(crate) fn attachment_content(&self, attachment: &Attachment) -> OpsResult<Option<FileUpload>> {
        match attachment {
            Attachment::None => Ok(None),
            Attachment::Upload(upload) => Ok(Some(upload.clone())),
            Attachment::Stored(file) => match self.state.blobs.load(file)? {
                Some(bytes) => Ok(Some(FileUpload::new(file.file_name(), bytes))),
                None => {
                    tracing::warn!(path = %file.path, "Stored file missing; indexing without text");
                    Ok(None)
                }
            },
        }
    }

    /// Names the index entry needs that are not on the document.
    pub(crate) fn entry_context(&self, document: &Document) -> OpsResult<EntryContext> {
        let author_names = self.state.directory.display_names(&document.authors)?;
        let uploader_name = match document.uploader {
            Some(id) => self
                .state
                .directory
                .load_user(id)?
                .map(|user| user.display_name().to_string()),
            None => None,
        };
        Ok(EntryContext::new(author_names, uploader_name))
    }

    /// Write the index entry for `document`.
    pub(crate) fn index_document(&self, document: &Document, text: Option<&str>) -> OpsResult<()> {
        let context = self.entry_context(document)?;
        let entry = IndexEntry::build(document, &context, text);
        self.index.upsert(&entry)?;
        Ok(())
    }

    /// Tell the uploader about a change made by someone else.
    ///
    /// Delivery failures are logged; the change itself has already been saved.
    pub(crate) fn notify_uploader(&self, kind: NotificationKind, document: &Document, actor: &User) {
        if !self.config.notifications_enabled {
            return;
        }
        let Some(uploader_id) = document.uploader else {
            return;
        };
        if uploader_id == actor.id {
            return;
        }

        let uploader = match self.state.directory.load_user(uploader_id) {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(user_id = %uploader_id, "Uploader not found; no notification sent");
                return;
            }
            Err(e) => {
                tracing::warn!(user_id = %uploader_id, error = %e, "Failed to load uploader");
                return;
            }
        };

        let Some(notification) =
            Notification::for_change(kind, document, &uploader, actor, &self.config)
        else {
            return;
        };

        match self.mailer.send(&notification) {
            Ok(()) => tracing::info!(
                document_id = %document.id,
                to = %notification.to,
                kind = ?kind,
                "Notified uploader"
            ),
            Err(e) => tracing::warn!(
                document_id = %document.id,
                error = %e,
                "Failed to send notification"
            ),
        }
    }
}
