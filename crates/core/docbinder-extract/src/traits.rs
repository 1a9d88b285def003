//! The extractor seam.

use async_trait::async_trait;

use crate::error::ExtractResult;

/// Trait for turning an uploaded document into searchable plain text.
///
/// Implementations must be safe to share across requests; any scratch
/// state (temporary files, connections) is scoped to a single call.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from `content`.
    ///
    /// # Arguments
    /// * `name` - Declared file name, used for format selection and diagnostics
    /// * `content` - The raw document bytes
    async fn extract(&self, name: &str, content: &[u8]) -> ExtractResult<String>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_is_object_safe() {
        fn _takes_extractor(_: &dyn TextExtractor) {}
    }
}
