//! Mock implementation of the `TextExtractor` trait for testing.
//!
//! Returns configurable text per file name, can be told to fail, and
//! records every call.

use async_trait::async_trait;
use docbinder_extract::{ExtractResult, ExtractionError, TextExtractor};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

struct MockExtractorInner {
    /// Text returned for a given file name.
    texts: HashMap<String, String>,
    /// Errors returned for a given file name.
    failures: HashMap<String, ExtractionError>,
    /// When set, every call fails with this error.
    fail_all: Option<ExtractionError>,
    /// File names passed to `extract`, in call order.
    calls: Vec<String>,
}

/// A mock [`TextExtractor`].
///
/// Uses `Arc<RwLock<...>>` internally, so it is cheap to clone and all
/// clones share the same state. Unconfigured files extract to their
/// content decoded as UTF-8.
#[derive(Clone)]
pub struct MockExtractor {
    inner: Arc<RwLock<MockExtractorInner>>,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtractor {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockExtractorInner {
                texts: HashMap::new(),
                failures: HashMap::new(),
                fail_all: None,
                calls: Vec::new(),
            })),
        }
    }

    /// Return `text` for files named `name`.
    pub fn with_text(self, name: &str, text: &str) -> Self {
        self.inner
            .write()
            .unwrap()
            .texts
            .insert(name.to_string(), text.to_string());
        self
    }

    /// Fail files named `name` with `error`.
    pub fn with_failure(self, name: &str, error: ExtractionError) -> Self {
        self.inner
            .write()
            .unwrap()
            .failures
            .insert(name.to_string(), error);
        self
    }

    /// Fail every call with `error`, or stop failing with `None`.
    pub fn set_fail_all(&self, error: Option<ExtractionError>) {
        self.inner.write().unwrap().fail_all = error;
    }

    /// File names extracted so far.
    pub fn calls(&self) -> Vec<String> {
        self.inner.read().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.read().unwrap().calls.len()
    }

    pub fn reset_calls(&self) {
        self.inner.write().unwrap().calls.clear();
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    async fn extract(&self, name: &str, content: &[u8]) -> ExtractResult<String> {
        let mut inner = self.inner.write().unwrap();
        inner.calls.push(name.to_string());

        if let Some(error) = &inner.fail_all {
            return Err(error.clone());
        }
        if let Some(error) = inner.failures.get(name) {
            return Err(error.clone());
        }
        Ok(inner
            .texts
            .get(name)
            .cloned()
            .unwrap_or_else(|| String::from_utf8_lossy(content).into_owned()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
