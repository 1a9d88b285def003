//! Configuration for the operations layer.

use docbinder_types::DocumentId;

/// Default site name used in notification subjects.
pub const DEFAULT_SITE_NAME: &str = "Intranet";

/// Default base URL for links in notifications.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default sender address.
pub const DEFAULT_FROM_ADDRESS: &str = "webmaster@localhost";

/// Operations configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpsConfig {
    /// Site name shown in notification subjects.
    pub site_name: String,
    /// Base URL that document links are built from.
    pub base_url: String,
    /// Sender address for notifications.
    pub from_address: String,
    /// Whether notifications are sent at all.
    pub notifications_enabled: bool,
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            notifications_enabled: true,
        }
    }
}

impl OpsConfig {
    pub fn with_site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = name.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_from_address(mut self, address: impl Into<String>) -> Self {
        self.from_address = address.into();
        self
    }

    /// Enable or disable notifications.
    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Read-only view of a document.
    pub fn document_url(&self, id: DocumentId) -> String {
        format!("{}/documents/document/{id}/readonly/", self.base())
    }

    /// Change history of a document.
    pub fn history_url(&self, id: DocumentId) -> String {
        format!("{}/documents/document/{id}/history/", self.base())
    }
}
