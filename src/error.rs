//! Error types for the todo record store and sync client.

/// Top-level error type for the todosync system.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Record store (SQLite backend) error.
    #[error("store error: {0}")]
    Store(#[from] crate::store::StoreError),

    /// HTTP transport or response decoding error.
    #[error("http error: {0}")]
    Http(String),

    /// HTTP server bind/serve error.
    #[error("server error: {0}")]
    Server(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for TodoError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, TodoError>;
