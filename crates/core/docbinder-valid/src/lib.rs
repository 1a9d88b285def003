//! Validation rules for docbinder documents.
//!
//! Three layers run before a document is saved:
//!
//! - **Form cleaning** ([`DocumentFormFactory`]): server-side defaults and
//!   overrides applied to what the editor submitted
//! - **Model validation** ([`validate_document`]): invariants every stored
//!   document satisfies, whichever path saved it
//! - **Access** ([`authorize`], [`require`]): who may do what
//!
//! # Example
//!
//! ```
//! use docbinder_types::{DocumentTypeId, User, UserId};
//! use docbinder_valid::{validate_document, DocumentFormFactory, DocumentInput};
//!
//! let actor = User {
//!     id: UserId(1),
//!     username: "john".into(),
//!     full_name: "John Lennon".into(),
//!     email: "john@example.com".into(),
//!     is_superuser: false,
//!     permissions: Default::default(),
//!     groups: Default::default(),
//!     program: None,
//! };
//!
//! let input = DocumentInput {
//!     title: "Minutes".into(),
//!     document_type: Some(DocumentTypeId(1)),
//!     ..DocumentInput::default()
//! };
//! let draft = DocumentFormFactory::new(actor).bind(input).clean(None).unwrap();
//!
//! // neither a file nor a hyperlink
//! let errors = validate_document(&draft).unwrap_err();
//! assert_eq!(errors.non_field().count(), 1);
//! ```

pub mod access;
pub mod error;
pub mod form;
pub mod model;

pub use access::{authorize, can_see, is_owner, require, visible_programs, AccessDecision};
pub use error::{fields, AccessDenied, FormErrors, ValidationError, ValidationResult, REQUIRED};
pub use form::{
    derive_title, Attachment, DocumentDraft, DocumentForm, DocumentFormFactory, DocumentInput,
};
pub use model::{is_valid_hyperlink, validate_document, BOTH_FILE_AND_LINK, MISSING_FILE_OR_LINK};
