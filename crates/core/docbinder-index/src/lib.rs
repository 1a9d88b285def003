//! Full-text search index for docbinder documents.
//!
//! [`IndexEntry::build`] derives the indexed values of a document;
//! [`DocumentIndex`] stores them in a tantivy index and answers
//! [`SearchQuery`]s. Deleted documents keep their (single) entry with the
//! `deleted` flag set, and are left out of searches unless asked for.
//!
//! # Example
//!
//! ```
//! use docbinder_index::{DeletedFilter, DocumentIndex, SearchQuery};
//!
//! let index = DocumentIndex::in_memory().unwrap();
//! let hits = index
//!     .search(&SearchQuery::new("budget").with_deleted(DeletedFilter::Any))
//!     .unwrap();
//! assert!(hits.is_empty());
//! ```

pub mod entry;
pub mod error;
pub mod index;
pub mod query;

pub use entry::{EntryContext, IndexEntry};
pub use error::{IndexError, IndexResult};
pub use index::DocumentIndex;
pub use query::{DeletedFilter, SearchHit, SearchQuery, DEFAULT_LIMIT};
