//! Soft delete.
//!
//! Deleting never removes the row: the state moves to `Deleted` through
//! the transition table and the document is saved again, hooks and
//! re-indexing included.

use docbinder_store::DocumentStore;
use docbinder_types::{Document, DocumentId, Permission, Transition, User};
use docbinder_valid::{can_see, require, DocumentDraft};

use crate::error::{OpsError, OpsResult};
use crate::operations::DocumentOperations;

impl DocumentOperations {
    /// The delete confirmation page.
    ///
    /// Needs the delete permission, or being the document's uploader.
    /// The permission check runs before guest program scoping.
    pub fn confirm_delete(&self, actor: &User, id: DocumentId) -> OpsResult<Document> {
        let document = self
            .state
            .documents
            .load(id)?
            .ok_or(OpsError::NotFound(id))?;
        require(actor, document.uploader, Permission::Delete)?;
        if !can_see(actor, &document) {
            return Err(OpsError::NotFound(id));
        }
        Ok(document)
    }

    /// Submit the delete confirmation: mark the document deleted and re-save it.
    pub async fn delete_document(&mut self, actor: &User, id: DocumentId) -> OpsResult<Document> {
        let document = self.confirm_delete(actor, id)?;

        let mut draft = DocumentDraft::from_document(&document);
        draft.state = document.state.apply(Transition::SoftDelete)?;
        draft.transition = Transition::SoftDelete;

        self.save_draft(actor, draft, Some(document)).await
    }
}
