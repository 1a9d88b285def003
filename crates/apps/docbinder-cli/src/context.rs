//! Application context for CLI commands.

use std::sync::Arc;

use docbinder_extract::build_extractor;
use docbinder_index::DocumentIndex;
use docbinder_ops::{DocumentOperations, Mailer, NoopMailer, OutboxMailer};
use docbinder_store::{DirectoryStore, StoreState};
use docbinder_types::{Document, DocumentTypeId, ProgramId, User, UserId};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{DocumentOutput, DocumentRow};

/// Timestamp layout used in all human-facing output.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Everything a command needs, opened from the config file.
pub struct AppContext {
    /// Operations interface.
    pub ops: DocumentOperations,
    /// Configuration.
    pub config: CliConfig,
}

impl AppContext {
    /// Open an initialized data directory.
    pub fn open(config: CliConfig) -> CliResult<Self> {
        if !config.is_initialized() {
            return Err(CliError::NotInitialized);
        }
        Self::create(config)
    }

    /// Open the data directory, creating the database and index if needed.
    ///
    /// Only `init` uses this.
    pub fn for_init(config: CliConfig) -> CliResult<Self> {
        Self::create(config)
    }

    fn create(config: CliConfig) -> CliResult<Self> {
        let store_config = config.store_config();
        let index = DocumentIndex::open(store_config.index_dir())?;
        let state = StoreState::open(store_config)?;

        let extractor = build_extractor(&config.extraction)?;
        let mailer: Arc<dyn Mailer> = if config.notifications.enabled {
            Arc::new(OutboxMailer::new(&config.notifications.outbox)?)
        } else {
            Arc::new(NoopMailer)
        };

        tracing::debug!(
            base_dir = %config.base_dir().display(),
            backend = ?config.extraction.backend,
            notifications = config.notifications.enabled,
            "Opening docbinder"
        );
        let ops = DocumentOperations::with_defaults(
            state,
            index,
            extractor,
            mailer,
            config.ops_config(),
        );
        Ok(Self { ops, config })
    }

    /// Resolve the acting user.
    pub fn actor(&self, username: Option<&str>) -> CliResult<User> {
        let username = username.ok_or(CliError::NoActor)?;
        self.ops
            .state
            .directory
            .find_user(username)?
            .ok_or_else(|| CliError::not_found("user", username))
    }

    pub fn user_id(&self, username: &str) -> CliResult<UserId> {
        self.ops
            .state
            .directory
            .find_user(username)?
            .map(|u| u.id)
            .ok_or_else(|| CliError::not_found("user", username))
    }

    pub fn program_id(&self, name: &str) -> CliResult<ProgramId> {
        self.ops
            .state
            .directory
            .find_program(name)?
            .map(|p| p.id)
            .ok_or_else(|| CliError::not_found("program", name))
    }

    pub fn document_type_id(&self, name: &str) -> CliResult<DocumentTypeId> {
        self.ops
            .state
            .directory
            .find_document_type(name)?
            .map(|t| t.id)
            .ok_or_else(|| CliError::not_found("document type", name))
    }

    fn type_name(&self, id: DocumentTypeId) -> CliResult<String> {
        Ok(self
            .ops
            .state
            .directory
            .load_document_type(id)?
            .map(|t| t.name)
            .unwrap_or_else(|| format!("#{}", id)))
    }

    /// A document with its references resolved for display.
    pub fn describe(&self, document: &Document) -> CliResult<DocumentOutput> {
        let directory = &self.ops.state.directory;

        let mut programs = Vec::with_capacity(document.programs.len());
        for id in &document.programs {
            if let Some(program) = directory.load_program(*id)? {
                programs.push(program.name);
            }
        }
        let uploader = match document.uploader {
            Some(id) => directory.load_user(id)?.map(|u| u.display_name().to_string()),
            None => None,
        };

        Ok(DocumentOutput {
            id: document.id.get(),
            title: document.title.clone(),
            document_type: self.type_name(document.document_type)?,
            programs,
            file: document.file.as_ref().map(|f| f.path.clone()),
            hyperlink: document.hyperlink.clone(),
            notes: document.notes.clone(),
            authors: directory.display_names(&document.authors)?.join(", "),
            uploader,
            created: document.created.format(TIME_FORMAT).to_string(),
            confidential: document.confidential,
            deleted: document.deleted(),
            url: self.ops.document_url(document.id),
        })
    }

    /// A document as one listing row.
    pub fn row(&self, document: &Document) -> CliResult<DocumentRow> {
        Ok(DocumentRow {
            id: document.id.get(),
            title: document.title.clone(),
            document_type: self.type_name(document.document_type)?,
            created: document.created.format(TIME_FORMAT).to_string(),
            has_file: document.has_file(),
            deleted: document.deleted(),
        })
    }
}
