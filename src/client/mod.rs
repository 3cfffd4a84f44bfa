//! Desktop sync client.
//!
//! - `api`: HTTP client for the record store and mutation outcomes.
//! - `render`: snapshot → display text projection.
//! - `view`: the [`TodoView`] seam and its events.
//! - `terminal`: line-oriented [`TodoView`] over stdin/stdout.
//! - `app`: the mutate → refetch → redisplay loop.

pub mod api;
pub mod app;
pub mod render;
pub mod terminal;
pub mod view;

pub use api::{MutationOutcome, TodoClient, classify_response};
pub use app::SyncApp;
pub use render::render_snapshot;
pub use terminal::TerminalView;
pub use view::{FormValues, TodoView, ViewEvent};
