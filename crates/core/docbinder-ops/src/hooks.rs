//! Pre-save validation hooks.
//!
//! Every save of a document (create, edit, soft delete, restore) runs the
//! [`HookChain`] after form and model validation and before anything is
//! written. Hooks run in registration order; the first failure aborts the
//! save.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use docbinder_extract::{extract_document_text, ExtractResult, ExtractionError, TextExtractor};
use docbinder_types::FileUpload;
use docbinder_valid::{fields, DocumentDraft};

use crate::error::{OpsError, OpsResult};

/// A document about to be saved.
///
/// Holds the attachment bytes for the duration of the save and caches
/// the extracted text, so validation and indexing extract once.
#[derive(Debug)]
pub struct PendingDocument {
    draft: DocumentDraft,
    content: Option<FileUpload>,
    text: OnceCell<Option<String>>,
}

impl PendingDocument {
    /// `content` is the attachment to extract: a new upload or the bytes
    /// of the stored file. `None` for hyperlink-only documents.
    pub fn new(draft: DocumentDraft, content: Option<FileUpload>) -> Self {
        Self {
            draft,
            content,
            text: OnceCell::new(),
        }
    }

    pub fn draft(&self) -> &DocumentDraft {
        &self.draft
    }

    pub fn content(&self) -> Option<&FileUpload> {
        self.content.as_ref()
    }

    /// Extracted text, running `extractor` on first use.
    pub async fn text(&self, extractor: &dyn TextExtractor) -> ExtractResult<Option<&str>> {
        let text = self
            .text
            .get_or_try_init(|| extract_document_text(extractor, self.content.as_ref()))
            .await?;
        Ok(text.as_deref())
    }

    /// Text from an earlier successful extraction, if any.
    pub fn cached_text(&self) -> Option<&str> {
        self.text.get().and_then(|text| text.as_deref())
    }

    pub fn into_parts(self) -> (DocumentDraft, Option<FileUpload>, Option<String>) {
        let text = self.text.into_inner().flatten();
        (self.draft, self.content, text)
    }
}

/// Map an extraction failure to the save outcome.
///
/// Configuration and transport faults fail the request; anything wrong
/// with the document itself becomes an error on the `file` field.
pub fn extraction_failure(err: ExtractionError) -> OpsError {
    if err.is_configuration() {
        OpsError::ExtractionService(err)
    } else {
        OpsError::field(fields::FILE, err.to_string())
    }
}

// =============================================================================
// Hooks
// =============================================================================

/// A check that runs before every save.
#[async_trait]
pub trait ValidationHook: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    async fn validate(&self, pending: &PendingDocument) -> OpsResult<()>;
}

/// Verifies the attachment can be indexed by extracting its text.
pub struct IndexabilityCheck {
    extractor: Arc<dyn TextExtractor>,
}

impl IndexabilityCheck {
    pub fn new(extractor: Arc<dyn TextExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl ValidationHook for IndexabilityCheck {
    fn name(&self) -> &'static str {
        "indexability"
    }

    async fn validate(&self, pending: &PendingDocument) -> OpsResult<()> {
        match pending.text(self.extractor.as_ref()).await {
            Ok(_) => Ok(()),
            Err(err) => {
                tracing::warn!(
                    title = %pending.draft().title,
                    extractor = self.extractor.name(),
                    error = %err,
                    "Attachment failed indexability check"
                );
                Err(extraction_failure(err))
            }
        }
    }
}

/// Ordered list of validation hooks.
#[derive(Clone, Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn ValidationHook>>,
}

impl HookChain {
    /// An empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain starting with [`IndexabilityCheck`].
    pub fn with_indexability(extractor: Arc<dyn TextExtractor>) -> Self {
        Self::new().with_hook(Arc::new(IndexabilityCheck::new(extractor)))
    }

    /// Append a hook.
    pub fn with_hook(mut self, hook: Arc<dyn ValidationHook>) -> Self {
        self.push(hook);
        self
    }

    pub fn push(&mut self, hook: Arc<dyn ValidationHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Hook names in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|hook| hook.name()).collect()
    }

    /// Run every hook in order, stopping at the first failure.
    pub async fn run(&self, pending: &PendingDocument) -> OpsResult<()> {
        for hook in &self.hooks {
            tracing::debug!(hook = hook.name(), title = %pending.draft().title, "Running validation hook");
            hook.validate(pending).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for HookChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookChain")
            .field("hooks", &self.names())
            .finish()
    }
}
