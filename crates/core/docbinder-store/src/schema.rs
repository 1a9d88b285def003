//! SQL schema initialization.
//!
//! This module defines the database schema for SQLite storage.

use rusqlite::Connection;

use crate::error::Result;

/// Schema version for migration tracking.
pub const SCHEMA_VERSION: u32 = 2;

/// Initialize the database schema.
///
/// Creates all tables and indexes if they don't exist.
/// This function is idempotent - calling it multiple times is safe.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version: Option<u32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    match current_version {
        None => {
            create_tables(conn)?;
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )?;
        }
        Some(version) if version < SCHEMA_VERSION => {
            migrate_schema(conn, version)?;
            create_tables(conn)?;
            conn.execute("UPDATE schema_version SET version = ?1", [SCHEMA_VERSION])?;
        }
        Some(_) => {}
    }

    Ok(())
}

/// Apply schema migrations from the given version to the current version.
fn migrate_schema(conn: &Connection, from_version: u32) -> Result<()> {
    // Version 2 added the confidential flag to documents.
    if from_version < 2 {
        if let Err(e) = conn.execute(
            "ALTER TABLE documents ADD COLUMN confidential INTEGER NOT NULL DEFAULT 0",
            [],
        ) {
            if !e.to_string().contains("duplicate column") {
                tracing::warn!(error = %e, "Failed to add confidential column to documents");
            }
        }
    }

    Ok(())
}

/// Create all database tables.
fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS document_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS programs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            full_name TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT '',
            is_superuser INTEGER NOT NULL DEFAULT 0,
            permissions TEXT NOT NULL DEFAULT '[]',
            groups_json TEXT NOT NULL DEFAULT '[]',
            program_id INTEGER REFERENCES programs(id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL UNIQUE,
            document_type_id INTEGER NOT NULL REFERENCES document_types(id),
            file_path TEXT,
            hyperlink TEXT,
            notes TEXT NOT NULL DEFAULT '',
            external_authors TEXT NOT NULL DEFAULT '',
            uploader_id INTEGER REFERENCES users(id),
            created_at INTEGER NOT NULL,
            confidential INTEGER NOT NULL DEFAULT 0,
            deleted INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_deleted ON documents(deleted)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_type ON documents(document_type_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_uploader ON documents(uploader_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS document_authors (
            document_id INTEGER NOT NULL REFERENCES documents(id),
            user_id INTEGER NOT NULL REFERENCES users(id),
            position INTEGER NOT NULL,
            PRIMARY KEY (document_id, user_id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS document_programs (
            document_id INTEGER NOT NULL REFERENCES documents(id),
            program_id INTEGER NOT NULL REFERENCES programs(id),
            PRIMARY KEY (document_id, program_id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_document_programs_program ON document_programs(program_id)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_schema() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for expected in [
            "document_authors",
            "document_programs",
            "document_types",
            "documents",
            "programs",
            "schema_version",
            "users",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();

        let version: u32 = conn
            .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_migration_from_v1() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (version INTEGER PRIMARY KEY);
             INSERT INTO schema_version (version) VALUES (1);
             CREATE TABLE documents (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 title TEXT NOT NULL UNIQUE,
                 document_type_id INTEGER NOT NULL,
                 file_path TEXT,
                 hyperlink TEXT,
                 notes TEXT NOT NULL DEFAULT '',
                 external_authors TEXT NOT NULL DEFAULT '',
                 uploader_id INTEGER,
                 created_at INTEGER NOT NULL,
                 deleted INTEGER NOT NULL DEFAULT 0
             );",
        )
        .unwrap();

        initialize_schema(&conn).unwrap();

        assert!(conn.prepare("SELECT confidential FROM documents").is_ok());
        assert!(conn.prepare("SELECT program_id FROM document_programs").is_ok());
    }
}
