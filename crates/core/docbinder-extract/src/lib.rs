//! Text extraction for docbinder.
//!
//! Uploaded office documents are turned into plain text before they are
//! indexed. Two strategies are provided behind the [`TextExtractor`] trait:
//!
//! - [`TikaExtractor`]: `PUT` the raw bytes to an Apache Tika server
//! - [`CommandExtractor`]: run a local converter on a temporary copy
//!
//! Hyperlink-only documents have nothing to extract; use
//! [`extract_document_text`] to get `None` for them without touching the
//! extractor.

pub mod command;
pub mod config;
pub mod error;
pub mod tika;
pub mod traits;

pub use command::{CommandExtractor, ConverterCommand};
pub use config::{build_extractor, Backend, ExtractorConfig};
pub use error::{ExtractResult, ExtractionError};
pub use tika::TikaExtractor;
pub use traits::TextExtractor;

use docbinder_types::FileUpload;

/// Extract text for a document's attachment.
///
/// Returns `Ok(None)` when there is no attachment.
pub async fn extract_document_text(
    extractor: &dyn TextExtractor,
    upload: Option<&FileUpload>,
) -> ExtractResult<Option<String>> {
    match upload {
        None => Ok(None),
        Some(file) => extractor.extract(&file.name, &file.content).await.map(Some),
    }
}
