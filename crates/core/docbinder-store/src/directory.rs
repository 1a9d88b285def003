//! Users, programs and document types.

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use docbinder_types::{
    DocumentType, DocumentTypeId, Permission, Program, ProgramId, User, UserId,
};

use crate::error::{map_unique, Result, StoreError};
use crate::traits::DirectoryStore;

const USER_COLUMNS: &str =
    "id, username, full_name, email, is_superuser, permissions, groups_json, program_id";

/// SQLite-backed directory of users, programs and document types.
pub struct SqliteDirectoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDirectoryStore {
    /// Create a new directory store with the given database connection.
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::lock_poisoned("database connection lock poisoned"))
    }

    /// Resolve author ids to display names, skipping unknown ids.
    pub fn display_names(&self, ids: &[UserId]) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = self.load_user(*id)? {
                names.push(user.display_name().to_string());
            }
        }
        Ok(names)
    }

    fn query_user(&self, clause: &str, key: &dyn rusqlite::ToSql) -> Result<Option<User>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE {clause}"),
                [key],
                UserRow::from_row,
            )
            .optional()?;
        row.map(UserRow::into_user).transpose()
    }

    fn add_named(&mut self, table: &'static str, kind: &str, name: &str) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::invalid_data(format!("{kind} name is empty")));
        }
        let conn = self.lock()?;
        conn.execute(&format!("INSERT INTO {table} (name) VALUES (?1)"), [name])
            .map_err(|e| map_unique(e, || format!("{kind} with this Name already exists: {name}")))?;
        Ok(conn.last_insert_rowid())
    }

    fn query_named(&self, table: &'static str, clause: &str, key: &dyn rusqlite::ToSql) -> Result<Option<(i64, String)>> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                &format!("SELECT id, name FROM {table} WHERE {clause}"),
                [key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?)
    }

    fn list_named(&self, table: &'static str) -> Result<Vec<(i64, String)>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT id, name FROM {table} ORDER BY name"))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

struct UserRow {
    id: i64,
    username: String,
    full_name: String,
    email: String,
    is_superuser: bool,
    permissions: String,
    groups: String,
    program_id: Option<i64>,
}

impl UserRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            full_name: row.get(2)?,
            email: row.get(3)?,
            is_superuser: row.get(4)?,
            permissions: row.get(5)?,
            groups: row.get(6)?,
            program_id: row.get(7)?,
        })
    }

    fn into_user(self) -> Result<User> {
        let permissions: BTreeSet<Permission> = serde_json::from_str(&self.permissions)?;
        let groups: BTreeSet<String> = serde_json::from_str(&self.groups)?;
        Ok(User {
            id: UserId(self.id),
            username: self.username,
            full_name: self.full_name,
            email: self.email,
            is_superuser: self.is_superuser,
            permissions,
            groups,
            program: self.program_id.map(ProgramId),
        })
    }
}

impl DirectoryStore for SqliteDirectoryStore {
    fn add_user(&mut self, user: &User) -> Result<User> {
        let permissions = serde_json::to_string(&user.permissions)?;
        let groups = serde_json::to_string(&user.groups)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO users (username, full_name, email, is_superuser, permissions, groups_json, program_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.username,
                user.full_name,
                user.email,
                user.is_superuser,
                permissions,
                groups,
                user.program.map(|p| p.get()),
            ],
        )
        .map_err(|e| map_unique(e, || format!("A user with that username already exists: {}", user.username)))?;

        let mut stored = user.clone();
        stored.id = UserId(conn.last_insert_rowid());
        tracing::debug!(user_id = %stored.id, username = %stored.username, "Added user");
        Ok(stored)
    }

    fn update_user(&mut self, user: &User) -> Result<()> {
        let permissions = serde_json::to_string(&user.permissions)?;
        let groups = serde_json::to_string(&user.groups)?;
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE users SET username = ?2, full_name = ?3, email = ?4, is_superuser = ?5,
                 permissions = ?6, groups_json = ?7, program_id = ?8
             WHERE id = ?1",
            params![
                user.id.get(),
                user.username,
                user.full_name,
                user.email,
                user.is_superuser,
                permissions,
                groups,
                user.program.map(|p| p.get()),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("user", user.id));
        }
        Ok(())
    }

    fn load_user(&self, id: UserId) -> Result<Option<User>> {
        self.query_user("id = ?1", &id.get())
    }

    fn find_user(&self, username: &str) -> Result<Option<User>> {
        self.query_user("username = ?1", &username)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY username"))?;
        let rows = stmt
            .query_map([], UserRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(UserRow::into_user).collect()
    }

    fn add_program(&mut self, name: &str) -> Result<Program> {
        let id = self.add_named("programs", "Program", name)?;
        Ok(Program {
            id: ProgramId(id),
            name: name.trim().to_string(),
        })
    }

    fn load_program(&self, id: ProgramId) -> Result<Option<Program>> {
        Ok(self
            .query_named("programs", "id = ?1", &id.get())?
            .map(|(id, name)| Program { id: ProgramId(id), name }))
    }

    fn find_program(&self, name: &str) -> Result<Option<Program>> {
        Ok(self
            .query_named("programs", "name = ?1", &name)?
            .map(|(id, name)| Program { id: ProgramId(id), name }))
    }

    fn list_programs(&self) -> Result<Vec<Program>> {
        Ok(self
            .list_named("programs")?
            .into_iter()
            .map(|(id, name)| Program { id: ProgramId(id), name })
            .collect())
    }

    fn add_document_type(&mut self, name: &str) -> Result<DocumentType> {
        let id = self.add_named("document_types", "Document type", name)?;
        Ok(DocumentType {
            id: DocumentTypeId(id),
            name: name.trim().to_string(),
        })
    }

    fn load_document_type(&self, id: DocumentTypeId) -> Result<Option<DocumentType>> {
        Ok(self
            .query_named("document_types", "id = ?1", &id.get())?
            .map(|(id, name)| DocumentType { id: DocumentTypeId(id), name }))
    }

    fn find_document_type(&self, name: &str) -> Result<Option<DocumentType>> {
        Ok(self
            .query_named("document_types", "name = ?1", &name)?
            .map(|(id, name)| DocumentType { id: DocumentTypeId(id), name }))
    }

    fn list_document_types(&self) -> Result<Vec<DocumentType>> {
        Ok(self
            .list_named("document_types")?
            .into_iter()
            .map(|(id, name)| DocumentType { id: DocumentTypeId(id), name })
            .collect())
    }
}
