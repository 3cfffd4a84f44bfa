//! Todosync: a task-list record store served over HTTP, plus a sync client.
//!
//! # Architecture
//!
//! - **Record Store** (`store`, `server`): a single SQLite `todo` table
//!   behind list/insert/update/delete routes.
//! - **Sync Client** (`client`): fetches the full record set, renders it as
//!   text, and after every user mutation refetches and redisplays.

pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod store;

pub use client::{SyncApp, TodoClient};
pub use config::TodoConfig;
pub use error::{Result, TodoError};
pub use server::TodoServer;
pub use store::{TodoFields, TodoRecord, TodoSnapshot, TodoStore};
