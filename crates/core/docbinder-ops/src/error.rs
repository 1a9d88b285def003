//! Error types for the operations layer.

use thiserror::Error;

use docbinder_extract::ExtractionError;
use docbinder_index::IndexError;
use docbinder_store::StoreError;
use docbinder_types::{DocumentId, TypesError};
use docbinder_valid::{AccessDenied, FormErrors, ValidationError};

/// Result type for operations.
pub type OpsResult<T> = std::result::Result<T, OpsError>;

/// Errors that can occur during document operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpsError {
    // =========================================================================
    // Data Errors
    // =========================================================================
    /// The submission did not validate; redisplay the form with these errors.
    #[error("validation failed: {0}")]
    Validation(#[from] FormErrors),

    /// Document not found, or not visible to the actor.
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// The requested state change is not in the transition table.
    #[error("invalid state change: {0}")]
    InvalidTransition(#[from] TypesError),

    // =========================================================================
    // Access Errors
    // =========================================================================
    #[error("access denied: {0}")]
    AccessDenied(#[from] AccessDenied),

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    /// The extraction service is misconfigured or unreachable.
    #[error("extraction service error: {0}")]
    ExtractionService(ExtractionError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),
}

impl OpsError {
    /// A single field error.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        OpsError::Validation(ValidationError::field(field, message).into())
    }

    /// Check if this error should be shown on the form rather than as a failure page.
    pub fn is_validation(&self) -> bool {
        matches!(self, OpsError::Validation(_))
    }

    /// The form errors, when this is a validation failure.
    pub fn field_errors(&self) -> Option<&FormErrors> {
        match self {
            OpsError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Check if this is an access-denied outcome.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, OpsError::AccessDenied(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OpsError::NotFound(_))
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Correct the highlighted fields and submit again.",
            Self::NotFound(_) => "Check the document id with `docbinder list`.",
            Self::InvalidTransition(_) => {
                "The document is already in that state. Edit the deleted flag to restore it."
            }
            Self::AccessDenied(_) => "Ask an administrator for the required document permission.",
            Self::ExtractionService(_) => {
                "Check that the extraction service is running and its URL is configured correctly."
            }
            Self::Store(_) => "Check the data directory is readable and writable.",
            Self::Index(_) => "Rebuild the search index with `docbinder reindex`.",
        }
    }
}
