//! Apache Tika server client.
//!
//! The raw document is sent as the body of `PUT <base>/tika`; a 200
//! response carries the extracted text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ExtractResult, ExtractionError};
use crate::traits::TextExtractor;

/// Default HTTP timeout for extraction requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a Tika server.
#[derive(Clone)]
pub struct TikaExtractor {
    /// HTTP client
    client: Client,
    /// Server URL as configured, for error messages
    server: String,
    /// Full endpoint URL (`<base>/tika`)
    endpoint: String,
}

impl TikaExtractor {
    /// Create a client with the default 30 second timeout.
    pub fn new(server: &str) -> ExtractResult<Self> {
        Self::with_timeout(server, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom timeout.
    ///
    /// Only `http` and `https` URLs are accepted.
    pub fn with_timeout(server: &str, timeout: Duration) -> ExtractResult<Self> {
        let url = Url::parse(server).map_err(|e| {
            ExtractionError::configuration(format!("Invalid Apache Tika URL {server}: {e}"))
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ExtractionError::configuration(format!(
                    "Unknown URL scheme '{other}' in Apache Tika URL: {server}"
                )))
            }
        }

        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ExtractionError::configuration(format!("failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            server: server.to_string(),
            endpoint: format!("{}/tika", url.as_str().trim_end_matches('/')),
        })
    }

    /// The endpoint documents are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextExtractor for TikaExtractor {
    async fn extract(&self, name: &str, content: &[u8]) -> ExtractResult<String> {
        debug!(url = %self.endpoint, file = %name, size = content.len(), "Sending document to Tika");

        let response = self
            .client
            .put(&self.endpoint)
            .header(ACCEPT, "text/plain")
            .body(content.to_vec())
            .send()
            .await
            .map_err(|e| ExtractionError::Transport {
                server: self.server.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(url = %self.endpoint, file = %name, status = status.as_u16(), "Tika rejected document");
            return Err(ExtractionError::UnexpectedStatus {
                server: self.server.clone(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ExtractionError::Transport {
                server: self.server.clone(),
                message: e.to_string(),
            })?;

        let text = match String::from_utf8(body.to_vec()) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %name, "Tika returned invalid UTF-8, replacing bad sequences");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        debug!(file = %name, chars = text.len(), "Extracted text");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "tika"
    }
}
