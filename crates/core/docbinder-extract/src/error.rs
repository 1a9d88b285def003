//! Error types for text extraction.

use thiserror::Error;

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractionError>;

/// Errors that can occur while extracting text from a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The extraction service answered with something other than 200.
    #[error("Unknown response from TIKA server ({server}): {status}: {reason}")]
    UnexpectedStatus {
        /// Configured server URL
        server: String,
        /// HTTP status code
        status: u16,
        /// HTTP reason phrase
        reason: String,
    },

    /// The extractor is misconfigured (bad URL, unknown scheme).
    #[error("{0}")]
    Configuration(String),

    /// The extraction service could not be reached or timed out.
    #[error("Failed to contact TIKA server ({server}): {message}")]
    Transport {
        /// Configured server URL
        server: String,
        /// Underlying transport error
        message: String,
    },

    /// A local converter failed to launch, exited non-zero, or complained on stderr.
    #[error("Failed to convert {format} document: {message}")]
    Conversion {
        /// Human-readable format name
        format: String,
        /// Launch error or converter stderr
        message: String,
    },

    /// No converter is configured for this file type.
    #[error("Unsupported document format: {name}")]
    UnsupportedFormat {
        /// Declared file name
        name: String,
    },
}

impl ExtractionError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a conversion error.
    pub fn conversion(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Returns true for faults in the extractor setup rather than in the document.
    ///
    /// These are fatal to the request. Everything else is reported against
    /// the uploaded file so the user can try another one.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_message() {
        let err = ExtractionError::UnexpectedStatus {
            server: "http://localhost:9998".into(),
            status: 422,
            reason: "Unprocessable Entity".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown response from TIKA server (http://localhost:9998): 422: Unprocessable Entity"
        );
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_conversion_message() {
        let err = ExtractionError::conversion("Word", "bad magic");
        assert_eq!(err.to_string(), "Failed to convert Word document: bad magic");
    }

    #[test]
    fn test_configuration_classification() {
        assert!(ExtractionError::configuration("bad scheme").is_configuration());
        assert!(ExtractionError::Transport {
            server: "http://x".into(),
            message: "connection refused".into()
        }
        .is_configuration());
        assert!(!ExtractionError::UnsupportedFormat { name: "a.xyz".into() }.is_configuration());
    }
}
