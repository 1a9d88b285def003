//! Document operations for docbinder.
//!
//! This crate is the orchestration layer over the store, extraction,
//! index and validation crates. A [`DocumentOperations`] value is built
//! once from explicit collaborators and handles every request.
//!
//! # Module Organization
//!
//! - [`error`] - Operation error types
//! - [`config`] - Site name, links and notification switches
//! - [`hooks`] - Pre-save validation hooks and the pending document
//! - [`notify`] - Uploader notifications and mailers
//! - [`operations`] - The `DocumentOperations` struct
//! - [`save`] - Create and edit
//! - [`delete`] - Soft delete
//! - [`query`] - Show, list, search and re-index
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use docbinder_extract::TikaExtractor;
//! use docbinder_index::DocumentIndex;
//! use docbinder_ops::{DocumentOperations, NoopMailer, OpsConfig};
//! use docbinder_store::StoreState;
//!
//! let state = StoreState::open_in_memory().expect("Failed to open store");
//! let index = DocumentIndex::in_memory().expect("Failed to open index");
//! let extractor = Arc::new(TikaExtractor::new("http://localhost:9998").expect("valid URL"));
//!
//! let ops = DocumentOperations::with_defaults(
//!     state,
//!     index,
//!     extractor,
//!     Arc::new(NoopMailer),
//!     OpsConfig::default(),
//! );
//! assert_eq!(ops.hooks().names(), vec!["indexability"]);
//! ```
//!
//! # Save path
//!
//! Create, edit, soft delete and restore all end in
//! [`DocumentOperations::save_draft`]. Nothing is written until form
//! cleaning, model validation and every hook have passed, so a file that
//! cannot be converted leaves no record behind.

pub mod config;
pub mod delete;
pub mod error;
pub mod hooks;
pub mod notify;
pub mod operations;
pub mod query;
pub mod save;

pub use config::OpsConfig;
pub use error::{OpsError, OpsResult};
pub use hooks::{extraction_failure, HookChain, IndexabilityCheck, PendingDocument, ValidationHook};
pub use notify::{
    MailError, Mailer, MemoryMailer, NoopMailer, Notification, NotificationKind, OutboxMailer,
};
pub use operations::DocumentOperations;
pub use save::DUPLICATE_TITLE;
