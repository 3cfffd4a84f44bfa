//! SQLite DDL for the todo record store, plus the version stamp checked on
//! every open.

use rusqlite::{Connection, OptionalExtension, params};

use super::StoreError;

/// Version of the `todo` table layout this build reads and writes.
pub(crate) const CURRENT_SCHEMA_VERSION: u32 = 1;

const VERSION_KEY: &str = "schema_version";

// AUTOINCREMENT keeps deleted ids from being handed out again.
const TODO_DDL: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS todo (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    label       TEXT,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    date        TEXT NOT NULL,
    importance  TEXT NOT NULL
);
";

/// Create the tables if missing and stamp a fresh database with
/// [`CURRENT_SCHEMA_VERSION`].
///
/// A database stamped by a newer build is refused rather than written with
/// a layout it may not match. Returns the stamped version.
pub(crate) fn prepare_schema(conn: &Connection) -> Result<u32, StoreError> {
    conn.execute_batch(TODO_DDL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES (?1, ?2)",
        params![VERSION_KEY, CURRENT_SCHEMA_VERSION.to_string()],
    )?;

    match stamped_version(conn)? {
        Some(found) if found <= CURRENT_SCHEMA_VERSION => Ok(found),
        found => Err(StoreError::SchemaVersion {
            found: found.map_or_else(|| "unreadable".to_owned(), |v| v.to_string()),
            supported: CURRENT_SCHEMA_VERSION,
        }),
    }
}

/// The version recorded in `schema_meta`, or `None` if absent or not a number.
pub(crate) fn stamped_version(conn: &Connection) -> rusqlite::Result<Option<u32>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM schema_meta WHERE key = ?1",
            params![VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;
    Ok(raw.and_then(|v| v.parse().ok()))
}
