//! Document record storage.
//!
//! Documents live in the `documents` table; their author and program sets
//! live in the `document_authors` and `document_programs` link tables and
//! are rewritten wholesale on every update.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Transaction};
use std::sync::{Arc, Mutex};

use docbinder_types::{
    Document, DocumentId, DocumentState, DocumentTypeId, ProgramId, StoredFile, UserId,
};

use crate::error::{map_unique, Result, StoreError};
use crate::traits::DocumentStore;
use crate::types::DocumentFilter;

const DOCUMENT_COLUMNS: &str = "id, title, document_type_id, file_path, hyperlink, notes, \
     external_authors, uploader_id, created_at, confidential, deleted";

/// SQLite-backed document store.
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    /// Create a new document store with the given database connection.
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::lock_poisoned("database connection lock poisoned"))
    }
}

/// Raw `documents` row before link tables are joined in.
struct DocumentRow {
    id: i64,
    title: String,
    document_type_id: i64,
    file_path: Option<String>,
    hyperlink: Option<String>,
    notes: String,
    external_authors: String,
    uploader_id: Option<i64>,
    created_at: i64,
    confidential: bool,
    deleted: bool,
}

impl DocumentRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            document_type_id: row.get(2)?,
            file_path: row.get(3)?,
            hyperlink: row.get(4)?,
            notes: row.get(5)?,
            external_authors: row.get(6)?,
            uploader_id: row.get(7)?,
            created_at: row.get(8)?,
            confidential: row.get(9)?,
            deleted: row.get(10)?,
        })
    }

    fn into_document(self, conn: &Connection) -> Result<Document> {
        let created = millis_to_datetime(self.created_at)?;
        let (authors, programs) = load_links(conn, self.id)?;
        Ok(Document {
            id: DocumentId(self.id),
            title: self.title,
            document_type: DocumentTypeId(self.document_type_id),
            programs,
            file: self.file_path.map(StoredFile::new),
            hyperlink: self.hyperlink,
            notes: self.notes,
            authors,
            external_authors: self.external_authors,
            uploader: self.uploader_id.map(UserId),
            created,
            confidential: self.confidential,
            state: DocumentState::from_deleted_flag(self.deleted),
        })
    }
}

fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::invalid_data(format!("created_at out of range: {ms}")))
}

/// Truncate to the millisecond precision the database keeps.
fn stored_precision(ts: DateTime<Utc>) -> Result<DateTime<Utc>> {
    millis_to_datetime(ts.timestamp_millis())
}

fn load_links(conn: &Connection, id: i64) -> Result<(Vec<UserId>, Vec<ProgramId>)> {
    let mut stmt = conn.prepare(
        "SELECT user_id FROM document_authors WHERE document_id = ?1 ORDER BY position",
    )?;
    let authors = stmt
        .query_map([id], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?
        .into_iter()
        .map(UserId)
        .collect();

    let mut stmt = conn.prepare(
        "SELECT program_id FROM document_programs WHERE document_id = ?1 ORDER BY program_id",
    )?;
    let programs = stmt
        .query_map([id], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?
        .into_iter()
        .map(ProgramId)
        .collect();

    Ok((authors, programs))
}

fn write_links(tx: &Transaction<'_>, document: &Document, id: i64) -> Result<()> {
    tx.execute("DELETE FROM document_authors WHERE document_id = ?1", [id])?;
    tx.execute("DELETE FROM document_programs WHERE document_id = ?1", [id])?;

    let mut seen = std::collections::HashSet::new();
    for (position, author) in document.authors.iter().enumerate() {
        if !seen.insert(*author) {
            continue;
        }
        tx.execute(
            "INSERT INTO document_authors (document_id, user_id, position) VALUES (?1, ?2, ?3)",
            params![id, author.get(), position as i64],
        )?;
    }
    for program in &document.programs {
        tx.execute(
            "INSERT OR IGNORE INTO document_programs (document_id, program_id) VALUES (?1, ?2)",
            params![id, program.get()],
        )?;
    }
    Ok(())
}

fn duplicate_title(title: &str) -> String {
    format!("Document with this Title already exists: {title}")
}

impl DocumentStore for SqliteDocumentStore {
    fn insert(&mut self, document: &Document) -> Result<Document> {
        let created = stored_precision(document.created)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO documents (title, document_type_id, file_path, hyperlink, notes,
                 external_authors, uploader_id, created_at, confidential, deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                document.title,
                document.document_type.get(),
                document.file.as_ref().map(|f| f.path.as_str()),
                document.hyperlink,
                document.notes,
                document.external_authors,
                document.uploader.map(|u| u.get()),
                created.timestamp_millis(),
                document.confidential,
                document.deleted(),
            ],
        )
        .map_err(|e| map_unique(e, || duplicate_title(&document.title)))?;
        let id = tx.last_insert_rowid();

        write_links(&tx, document, id)?;
        tx.commit()?;

        tracing::debug!(document_id = id, title = %document.title, "Inserted document row");

        let mut stored = document.clone();
        stored.id = DocumentId(id);
        stored.created = created;
        Ok(stored)
    }

    fn update(&mut self, document: &Document) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let changed = tx
            .execute(
                "UPDATE documents SET title = ?2, document_type_id = ?3, file_path = ?4,
                     hyperlink = ?5, notes = ?6, external_authors = ?7, uploader_id = ?8,
                     confidential = ?9, deleted = ?10
                 WHERE id = ?1",
                params![
                    document.id.get(),
                    document.title,
                    document.document_type.get(),
                    document.file.as_ref().map(|f| f.path.as_str()),
                    document.hyperlink,
                    document.notes,
                    document.external_authors,
                    document.uploader.map(|u| u.get()),
                    document.confidential,
                    document.deleted(),
                ],
            )
            .map_err(|e| map_unique(e, || duplicate_title(&document.title)))?;

        if changed == 0 {
            return Err(StoreError::not_found("document", document.id));
        }

        write_links(&tx, document, document.id.get())?;
        tx.commit()?;

        tracing::debug!(document_id = %document.id, deleted = document.deleted(), "Updated document row");
        Ok(())
    }

    fn load(&self, id: DocumentId) -> Result<Option<Document>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"),
                [id.get()],
                DocumentRow::from_row,
            )
            .optional()?;
        row.map(|r| r.into_document(&conn)).transpose()
    }

    fn find_by_title(&self, title: &str) -> Result<Option<Document>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE title = ?1"),
                [title],
                DocumentRow::from_row,
            )
            .optional()?;
        row.map(|r| r.into_document(&conn)).transpose()
    }

    fn list(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        let mut sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE 1=1");
        let mut values: Vec<Value> = Vec::new();

        if let Some(deleted) = filter.deleted {
            sql.push_str(" AND deleted = ?");
            values.push(Value::Integer(deleted as i64));
        }
        if let Some(document_type) = filter.document_type {
            sql.push_str(" AND document_type_id = ?");
            values.push(Value::Integer(document_type.get()));
        }
        if let Some(uploader) = filter.uploader {
            sql.push_str(" AND uploader_id = ?");
            values.push(Value::Integer(uploader.get()));
        }
        if !filter.programs.is_empty() {
            let placeholders = vec!["?"; filter.programs.len()].join(", ");
            sql.push_str(&format!(
                " AND id IN (SELECT document_id FROM document_programs WHERE program_id IN ({placeholders}))"
            ));
            values.extend(filter.programs.iter().map(|p| Value::Integer(p.get())));
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            values.push(Value::Integer(limit as i64));
        } else if filter.offset.is_some() {
            sql.push_str(" LIMIT -1");
        }
        if let Some(offset) = filter.offset {
            sql.push_str(" OFFSET ?");
            values.push(Value::Integer(offset as i64));
        }

        let conn = self.lock()?;
        let rows = {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(values.iter()), DocumentRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };
        rows.into_iter().map(|r| r.into_document(&conn)).collect()
    }

    fn count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
