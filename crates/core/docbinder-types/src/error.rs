//! Error type for the types crate.

use thiserror::Error;

use crate::enums::{DocumentState, Transition};

/// Result type alias for type-level operations.
pub type Result<T> = std::result::Result<T, TypesError>;

/// Errors raised by the types crate itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// A transition not present in the transition table.
    #[error("cannot apply {transition:?} to a document in state {from:?}")]
    InvalidTransition {
        /// Current state.
        from: DocumentState,
        /// Requested transition.
        transition: Transition,
    },

    /// Unrecognized permission codename.
    #[error("unknown permission: {0}")]
    UnknownPermission(String),
}
