//! Read operations: show, list, search and re-index.

use docbinder_extract::extract_document_text;
use docbinder_index::{IndexEntry, SearchHit, SearchQuery};
use docbinder_store::{DocumentFilter, DocumentStore};
use docbinder_types::{Document, DocumentId, Permission, ProgramId, User};
use docbinder_valid::{require, visible_programs, Attachment};

use crate::error::{OpsError, OpsResult};
use crate::operations::DocumentOperations;

/// Narrow a program filter to what the actor may see.
///
/// `None` means the actor can see nothing that matches.
fn scope_programs(actor: &User, requested: Vec<ProgramId>) -> Option<Vec<ProgramId>> {
    match visible_programs(actor) {
        None => Some(requested),
        Some(allowed) => {
            let scoped: Vec<ProgramId> = if requested.is_empty() {
                allowed
            } else {
                requested
                    .into_iter()
                    .filter(|p| allowed.contains(p))
                    .collect()
            };
            if scoped.is_empty() {
                None
            } else {
                Some(scoped)
            }
        }
    }
}

impl DocumentOperations {
    /// Load one document.
    pub fn get_document(&self, actor: &User, id: DocumentId) -> OpsResult<Document> {
        require(actor, None, Permission::View)?;
        self.load_visible(actor, id)
    }

    /// List documents, newest first. Guests only see their program's documents.
    pub fn list_documents(
        &self,
        actor: &User,
        mut filter: DocumentFilter,
    ) -> OpsResult<Vec<Document>> {
        require(actor, None, Permission::View)?;
        let Some(programs) = scope_programs(actor, std::mem::take(&mut filter.programs)) else {
            return Ok(Vec::new());
        };
        filter.programs = programs;
        Ok(self.state.documents.list(&filter)?)
    }

    /// Full-text search. Guests only find their program's documents.
    pub fn search(&self, actor: &User, mut query: SearchQuery) -> OpsResult<Vec<SearchHit>> {
        require(actor, None, Permission::View)?;
        let Some(programs) = scope_programs(actor, std::mem::take(&mut query.programs)) else {
            return Ok(Vec::new());
        };
        query.programs = programs;

        let hits = self.index.search(&query)?;
        tracing::debug!(
            query = %query.text,
            deleted = ?query.deleted,
            hits = hits.len(),
            user = %actor.username,
            "Searched documents"
        );
        Ok(hits)
    }

    /// Rebuild the whole index from the store. Returns the number of entries.
    pub async fn reindex_all(&self) -> OpsResult<usize> {
        self.reindex_with(|_, _| {}).await
    }

    /// Like [`Self::reindex_all`], calling `progress(done, total)` after each document.
    ///
    /// Documents whose file cannot be converted are indexed without text.
    pub async fn reindex_with<F>(&self, mut progress: F) -> OpsResult<usize>
    where
        F: FnMut(usize, usize),
    {
        let documents = self.state.documents.list(&DocumentFilter::new())?;
        let total = documents.len();
        let mut entries = Vec::with_capacity(total);

        for (i, document) in documents.iter().enumerate() {
            let attachment = document
                .file
                .clone()
                .map(Attachment::Stored)
                .unwrap_or_default();
            let content = self.attachment_content(&attachment)?;
            let text = match extract_document_text(self.extractor(), content.as_ref()).await {
                Ok(text) => text,
                Err(e) if e.is_configuration() => return Err(OpsError::ExtractionService(e)),
                Err(e) => {
                    tracing::warn!(
                        document_id = %document.id,
                        error = %e,
                        "Failed to extract text; indexing metadata only"
                    );
                    None
                }
            };
            let context = self.entry_context(document)?;
            entries.push(IndexEntry::build(document, &context, text.as_deref()));
            progress(i + 1, total);
        }

        self.index.rebuild(&entries)?;
        tracing::info!(entries = entries.len(), "Rebuilt search index");
        Ok(entries.len())
    }
}
