//! Notifications to document uploaders.
//!
//! When someone other than the uploader modifies or deletes a document,
//! the uploader gets one message. Rendering and delivery belong to the
//! [`Mailer`]; [`OutboxMailer`] spools messages as JSON lines for the
//! mail collaborator to pick up.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use docbinder_types::{Document, DocumentId, User};

use crate::config::OpsConfig;

/// Errors from delivering a notification.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// What happened to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Modified,
    Deleted,
}

impl NotificationKind {
    fn verb(self) -> &'static str {
        match self {
            NotificationKind::Modified => "modified",
            NotificationKind::Deleted => "deleted",
        }
    }
}

/// One message to an uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Recipient address.
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
    pub document_id: DocumentId,
    /// Username of the acting user.
    pub actor: String,
    /// Link to the document's change history.
    pub history_url: String,
    pub created: DateTime<Utc>,
}

impl Notification {
    /// Build the message for `uploader` about `actor`'s change to `document`.
    ///
    /// Returns `None` when no message is due: the actor is the uploader,
    /// or the uploader has no address.
    pub fn for_change(
        kind: NotificationKind,
        document: &Document,
        uploader: &User,
        actor: &User,
        config: &OpsConfig,
    ) -> Option<Self> {
        if uploader.id == actor.id || uploader.email.trim().is_empty() {
            return None;
        }

        let verb = kind.verb();
        let history_url = config.history_url(document.id);
        let subject = format!(
            "[{}] Document {verb}: {}",
            config.site_name, document.title
        );
        let body = format!(
            "Dear {},\n\n\
             {} has {verb} the document \"{}\" that you uploaded to {}.\n\n\
             You can see the changes here:\n{history_url}\n",
            uploader.display_name(),
            actor.display_name(),
            document.title,
            config.site_name,
        );

        Some(Self {
            kind,
            to: uploader.email.clone(),
            from: config.from_address.clone(),
            subject,
            body,
            document_id: document.id,
            actor: actor.username.clone(),
            history_url,
            created: Utc::now(),
        })
    }
}

// =============================================================================
// Mailers
// =============================================================================

/// Delivers notifications.
pub trait Mailer: Send + Sync {
    fn send(&self, notification: &Notification) -> Result<(), MailError>;
}

/// Appends each message as one JSON line to a spool file.
#[derive(Debug, Clone)]
pub struct OutboxMailer {
    path: PathBuf,
}

impl OutboxMailer {
    /// Create a mailer writing to `path`, creating parent directories.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, MailError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every spooled message.
    pub fn read_all(&self) -> Result<Vec<Notification>, MailError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(MailError::from))
            .collect()
    }
}

impl Mailer for OutboxMailer {
    fn send(&self, notification: &Notification) -> Result<(), MailError> {
        let line = serde_json::to_string(notification)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;

        tracing::debug!(
            outbox = %self.path.display(),
            to = %notification.to,
            document_id = %notification.document_id,
            "Spooled notification"
        );
        Ok(())
    }
}

/// Keeps messages in memory.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<Notification>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Mailer for MemoryMailer {
    fn send(&self, notification: &Notification) -> Result<(), MailError> {
        self.sent
            .lock()
            .map_err(|_| MailError::LockPoisoned("memory mailer lock poisoned".into()))?
            .push(notification.clone());
        Ok(())
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMailer;

impl Mailer for NoopMailer {
    fn send(&self, _notification: &Notification) -> Result<(), MailError> {
        Ok(())
    }
}
