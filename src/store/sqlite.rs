//! SQLite-backed todo record store.
//!
//! [`TodoStore`] is the explicit, injectable store handle: it is opened at
//! startup, shared behind an `Arc`, and closed at shutdown. Each operation
//! holds the connection lock for one transaction and commits before
//! releasing it.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, params};
use tracing::{debug, info};

use super::schema::prepare_schema;
use super::types::{TodoFields, TodoId, TodoRecord, TodoSnapshot};

/// SQLite-backed todo record store.
///
/// Thread-safe via an internal `Mutex`. The connection slot becomes `None`
/// once [`TodoStore::close`] has run; later calls fail with
/// [`StoreError::Closed`].
pub struct TodoStore {
    path: Option<PathBuf>,
    schema_version: u32,
    conn: Mutex<Option<Connection>>,
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("path", &self.path)
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

impl TodoStore {
    /// Open (or create) the database file at `path` and apply the schema.
    ///
    /// Fails with [`StoreError::SchemaVersion`] when the file was stamped
    /// by a newer schema than this build supports.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let conn = Connection::open(path)?;
        let schema_version = prepare_schema(&conn)?;
        info!(path = %path.display(), schema_version, "todo store opened");
        Ok(Self {
            path: Some(path.to_path_buf()),
            schema_version,
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Open a private in-memory database. Each call yields an isolated store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let schema_version = prepare_schema(&conn)?;
        Ok(Self {
            path: None,
            schema_version,
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Database file path, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Schema version the database was stamped with when opened.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// All records in storage (id) order.
    pub fn list(&self) -> Result<TodoSnapshot, StoreError> {
        let records = self.with_tx(|tx| {
            let mut stmt = tx.prepare(
                "SELECT id, label, name, description, date, importance FROM todo ORDER BY id",
            )?;
            let rows = stmt.query_map([], row_to_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })?;
        Ok(TodoSnapshot { records })
    }

    /// Fetch a single record.
    pub fn get(&self, id: TodoId) -> Result<Option<TodoRecord>, StoreError> {
        self.with_tx(|tx| {
            let mut stmt = tx.prepare(
                "SELECT id, label, name, description, date, importance FROM todo WHERE id = ?1",
            )?;
            let mut rows = stmt.query_map(params![id], row_to_record)?;
            rows.next().transpose()
        })
    }

    /// Insert a new record and return its store-assigned id.
    pub fn insert(&self, fields: &TodoFields) -> Result<TodoId, StoreError> {
        let id = self.with_tx(|tx| {
            tx.execute(
                "INSERT INTO todo (label, name, description, date, importance) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    fields.label,
                    fields.name,
                    fields.description,
                    fields.date,
                    fields.importance
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })?;
        debug!(id, "todo inserted");
        Ok(id)
    }

    /// Replace every mutable field of record `id`.
    ///
    /// Returns the number of rows touched; `0` when `id` matched nothing.
    pub fn update(&self, id: TodoId, fields: &TodoFields) -> Result<usize, StoreError> {
        let rows = self.with_tx(|tx| {
            tx.execute(
                "UPDATE todo SET label = ?1, name = ?2, description = ?3, date = ?4, \
                 importance = ?5 WHERE id = ?6",
                params![
                    fields.label,
                    fields.name,
                    fields.description,
                    fields.date,
                    fields.importance,
                    id
                ],
            )
        })?;
        debug!(id, rows, "todo updated");
        Ok(rows)
    }

    /// Remove record `id`. Returns `0` when `id` matched nothing.
    pub fn delete(&self, id: TodoId) -> Result<usize, StoreError> {
        let rows = self.with_tx(|tx| tx.execute("DELETE FROM todo WHERE id = ?1", params![id]))?;
        debug!(id, rows, "todo deleted");
        Ok(rows)
    }

    /// Close the underlying connection. Idempotent.
    pub fn close(&self) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
            info!("todo store closed");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    /// Run `f` inside a transaction that commits on success and rolls back
    /// (on drop) on error.
    fn with_tx<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
    {
        let mut guard = self.lock()?;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from the record store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("lock poisoned: {0}")]
    Lock(String),

    #[error("store is closed")]
    Closed,

    #[error("database schema version {found} is newer than supported version {supported}")]
    SchemaVersion { found: String, supported: u32 },

    #[error("invalid record id: {0}")]
    InvalidId(String),

    #[error("blocking task failed: {0}")]
    Task(String),
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<TodoRecord> {
    Ok(TodoRecord {
        id: row.get(0)?,
        fields: TodoFields {
            label: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            date: row.get(4)?,
            importance: row.get(5)?,
        },
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::super::schema::CURRENT_SCHEMA_VERSION;
    use super::*;

    fn milk() -> TodoFields {
        TodoFields::new("Buy milk", "2%", "2024-01-01", "3")
    }

    #[test]
    fn insert_then_list_returns_the_record() {
        let store = TodoStore::open_in_memory().unwrap();
        let id = store.insert(&milk()).unwrap();

        let snapshot = store.list().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.records[0].id, id);
        assert_eq!(snapshot.records[0].fields, milk());
    }

    #[test]
    fn list_is_in_insertion_order() {
        let store = TodoStore::open_in_memory().unwrap();
        let a = store.insert(&TodoFields::new("a", "d", "x", "1")).unwrap();
        let b = store.insert(&TodoFields::new("b", "d", "x", "1")).unwrap();
        let ids: Vec<_> = store.list().unwrap().records.iter().map(|r| r.id).collect();
        assert_eq!(ids, [a, b]);
    }

    #[test]
    fn update_replaces_all_fields() {
        let store = TodoStore::open_in_memory().unwrap();
        let id = store.insert(&milk().with_label("errand")).unwrap();

        let replacement = TodoFields::new("Buy oat milk", "barista", "2024-01-02", "5");
        assert_eq!(store.update(id, &replacement).unwrap(), 1);

        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.fields, replacement);
        assert!(record.fields.label.is_none());
    }

    #[test]
    fn update_missing_id_is_silent_noop() {
        let store = TodoStore::open_in_memory().unwrap();
        store.insert(&milk()).unwrap();
        let before = store.list().unwrap();

        assert_eq!(store.update(999, &milk().with_label("x")).unwrap(), 0);
        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn delete_removes_and_missing_id_is_noop() {
        let store = TodoStore::open_in_memory().unwrap();
        let id = store.insert(&milk()).unwrap();

        assert_eq!(store.delete(id).unwrap(), 1);
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.delete(id).unwrap(), 0);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = TodoStore::open_in_memory().unwrap();
        let first = store.insert(&milk()).unwrap();
        store.delete(first).unwrap();
        let second = store.insert(&milk()).unwrap();
        assert!(second > first);
    }

    #[test]
    fn closed_store_rejects_operations() {
        let store = TodoStore::open_in_memory().unwrap();
        store.close().unwrap();
        store.close().unwrap();
        assert!(matches!(store.list(), Err(StoreError::Closed)));
        assert!(matches!(store.insert(&milk()), Err(StoreError::Closed)));
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data").join("todo.db");

        let store = TodoStore::open(&path).unwrap();
        let id = store.insert(&milk()).unwrap();
        store.close().unwrap();

        let reopened = TodoStore::open(&path).unwrap();
        assert_eq!(reopened.path(), Some(path.as_path()));
        assert_eq!(reopened.get(id).unwrap().unwrap().fields, milk());
        assert_eq!(reopened.schema_version(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn file_stamped_by_newer_schema_is_refused() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("todo.db");

        let store = TodoStore::open(&path).unwrap();
        let id = store.insert(&milk()).unwrap();
        store.close().unwrap();

        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "UPDATE schema_meta SET value = ?1 WHERE key = 'schema_version'",
            params![(CURRENT_SCHEMA_VERSION + 1).to_string()],
        )
        .unwrap();
        drop(conn);

        let err = TodoStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::SchemaVersion { .. }));

        let conn = Connection::open(&path).unwrap();
        let name: String = conn
            .query_row("SELECT name FROM todo WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(name, "Buy milk");
    }

    #[test]
    fn concurrent_inserts_preserve_records() {
        let store = std::sync::Arc::new(TodoStore::open_in_memory().unwrap());

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let s = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    s.insert(&TodoFields::new(format!("task {i}"), "d", "x", "1"))
                        .expect("concurrent insert");
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread join");
        }

        assert_eq!(store.list().unwrap().len(), 10);
    }
}
