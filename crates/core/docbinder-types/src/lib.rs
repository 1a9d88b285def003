//! Data structures for the docbinder document library.
//!
//! This crate holds the types shared by every other docbinder crate. It
//! contains no I/O, only type definitions, the soft-delete state machine
//! and a handful of display helpers.
//!
//! # Module Organization
//!
//! - [`ids`] - Row identifiers (`DocumentId`, `UserId`, ...)
//! - [`enums`] - `Permission`, `DocumentState` and its transition table
//! - [`constants`] - Field limits and storage prefixes
//! - [`document`] - `Document`, `StoredFile`, `FileUpload`
//! - [`directory`] - `User`, `Program`, `DocumentType`
//! - [`error`] - `TypesError`
//!
//! # Example
//!
//! ```
//! use docbinder_types::{DocumentState, Transition};
//!
//! let state = DocumentState::Active;
//! let deleted = state.apply(Transition::SoftDelete).unwrap();
//! assert_eq!(deleted, DocumentState::Deleted);
//! assert!(deleted.apply(Transition::SoftDelete).is_err());
//! ```

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod constants;
pub mod directory;
pub mod document;
pub mod enums;
pub mod error;
pub mod ids;

pub use constants::*;
pub use directory::{DocumentType, Program, User};
pub use document::{file_extension, Document, FileUpload, StoredFile};
pub use enums::{DocumentState, Permission, Transition, TRANSITIONS};
pub use error::{Result, TypesError};
pub use ids::{DocumentId, DocumentTypeId, ProgramId, UserId};
