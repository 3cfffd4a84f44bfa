//! Todo record store.
//!
//! Sub-modules:
//! - `types`: Record, snapshot, request-parameter types and field validation.
//! - `schema`: SQLite DDL definitions.
//! - `sqlite`: SQLite-backed [`TodoStore`] handle.

pub(crate) mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::{StoreError, TodoStore};
pub use types::{
    MutationParams, REQUIRED_FIELDS, TodoFields, TodoId, TodoRecord, TodoSnapshot,
    ValidationError, parse_id,
};
