//! HTTP surface of the todo record store.
//!
//! ## Endpoints
//!
//! - `GET /v1/all`: every record as a JSON object keyed by id
//! - `GET|POST /v1/add`: insert (`name`, `description`, `date`, `importance`, optional `label`)
//! - `GET|POST /v1/update`: replace all fields of `id`
//! - `GET|POST /v1/delete`: remove `id`
//! - `GET|POST /`: HTML page listing the records
//! - `GET /health`: liveness probe

pub mod page;
mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::TodoError;
use crate::store::TodoStore;
use routes::AppState;

pub use routes::{MutationStatus, NOT_FOUND_BODY};

/// Build the router over an injected store handle.
pub fn router(store: Arc<TodoStore>) -> Router {
    Router::new()
        .route("/", get(routes::home).post(routes::home))
        .route("/health", get(routes::health))
        .route("/v1/all", get(routes::list_all))
        .route("/v1/add", get(routes::add_query).post(routes::add_form))
        .route(
            "/v1/update",
            get(routes::update_query).post(routes::update_form),
        )
        .route(
            "/v1/delete",
            get(routes::delete_query).post(routes::delete_form),
        )
        .with_state(AppState { store })
}

async fn bind(config: &ServerConfig) -> crate::error::Result<(TcpListener, SocketAddr)> {
    let bind_addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| TodoError::Server(format!("bind {bind_addr} failed: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| TodoError::Server(format!("failed to get local addr: {e}")))?;
    Ok((listener, addr))
}

/// Record store HTTP server running on a background task.
pub struct TodoServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl TodoServer {
    /// Start serving `store` on `{config.host}:{config.port}` (port `0` for
    /// auto-assign).
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start(store: Arc<TodoStore>, config: &ServerConfig) -> crate::error::Result<Self> {
        let (listener, addr) = bind(config).await?;
        let app = router(store);

        info!("todo server listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("todo server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// `http://host:port`, suitable for [`TodoClient::new`](crate::client::TodoClient::new).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for TodoServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serve in the foreground until `shutdown` resolves, then close the store.
///
/// # Errors
///
/// Returns an error if binding or serving fails, or the store cannot be
/// closed cleanly.
pub async fn serve_until_shutdown<F>(
    store: Arc<TodoStore>,
    config: &ServerConfig,
    shutdown: F,
) -> crate::error::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (listener, addr) = bind(config).await?;
    info!("todo server listening on http://{addr}");

    axum::serve(listener, router(Arc::clone(&store)))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| TodoError::Server(e.to_string()))?;

    info!("todo server stopped");
    store.close()?;
    Ok(())
}
