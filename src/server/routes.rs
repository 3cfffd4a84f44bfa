//! Route handlers for the record store HTTP surface.
//!
//! Mutating routes accept the same parameters either as a GET query string
//! or as a POST form body; both feed one operation with one response
//! contract:
//!
//! - success: `200` JSON [`MutationStatus`]
//! - missing/empty required field: `200` plain text `"<field> is a required argument"`
//! - any backend failure or malformed request: logged, then `404` plain text `not found`

use std::sync::Arc;

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::store::{
    MutationParams, StoreError, TodoFields, TodoId, TodoSnapshot, TodoStore, ValidationError,
    parse_id,
};

/// Body returned for operational failures; the cause is only logged.
pub const NOT_FOUND_BODY: &str = "not found";

/// Shared state for axum handlers.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<TodoStore>,
}

/// Response body of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationStatus {
    /// Always `"ok"`.
    pub status: String,
    /// Rows touched. `0` for an update/delete whose id matched nothing.
    pub affected: usize,
    /// The record the operation targeted (the new id for an insert).
    pub id: TodoId,
}

impl MutationStatus {
    fn ok(affected: usize, id: TodoId) -> Self {
        Self {
            status: "ok".to_owned(),
            affected,
            id,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The two error tiers of the HTTP surface.
#[derive(Debug)]
pub(crate) enum ApiError {
    Validation(ValidationError),
    Store(StoreError),
    /// The query string or form body could not be extracted.
    Request(String),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::Request(e.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(e: FormRejection) -> Self {
        Self::Request(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(e) => (StatusCode::OK, e.to_string()).into_response(),
            Self::Store(e) => {
                error!(error = %e, "todo store operation failed");
                (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
            }
            Self::Request(reason) => {
                error!(%reason, "malformed todo request");
                (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationKind {
    Add,
    Update,
    Delete,
}

/// A validated mutation ready to run against the store.
#[derive(Debug)]
enum Planned {
    Insert(TodoFields),
    Update(TodoId, TodoFields),
    Delete(TodoId),
}

/// Validate `params` for `kind`. Required fields are checked first, in
/// canonical order; the id is parsed only once everything is present.
fn plan(kind: MutationKind, params: &MutationParams) -> Result<Planned, ApiError> {
    Ok(match kind {
        MutationKind::Add => Planned::Insert(params.require_fields()?),
        MutationKind::Update => {
            let raw_id = params.require_id()?;
            let fields = params.require_fields()?;
            Planned::Update(parse_id(raw_id)?, fields)
        }
        MutationKind::Delete => Planned::Delete(parse_id(params.require_id()?)?),
    })
}

/// Run a blocking store call off the async runtime.
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, StoreError>
where
    F: FnOnce(&TodoStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
}

async fn run_mutation(
    state: &AppState,
    kind: MutationKind,
    params: MutationParams,
) -> Result<Json<MutationStatus>, ApiError> {
    debug!(?kind, ?params, "mutation request");
    let status = match plan(kind, &params)? {
        Planned::Insert(fields) => {
            let id = with_store(state, move |s| s.insert(&fields)).await?;
            MutationStatus::ok(1, id)
        }
        Planned::Update(id, fields) => {
            let rows = with_store(state, move |s| s.update(id, &fields)).await?;
            MutationStatus::ok(rows, id)
        }
        Planned::Delete(id) => {
            let rows = with_store(state, move |s| s.delete(id)).await?;
            MutationStatus::ok(rows, id)
        }
    };
    Ok(Json(status))
}

/// `GET /v1/add`
pub(crate) async fn add_query(
    State(state): State<AppState>,
    params: Result<Query<MutationParams>, QueryRejection>,
) -> Result<Json<MutationStatus>, ApiError> {
    let Query(params) = params?;
    run_mutation(&state, MutationKind::Add, params).await
}

/// `POST /v1/add`
pub(crate) async fn add_form(
    State(state): State<AppState>,
    params: Result<Form<MutationParams>, FormRejection>,
) -> Result<Json<MutationStatus>, ApiError> {
    let Form(params) = params?;
    run_mutation(&state, MutationKind::Add, params).await
}

/// `GET /v1/update`
pub(crate) async fn update_query(
    State(state): State<AppState>,
    params: Result<Query<MutationParams>, QueryRejection>,
) -> Result<Json<MutationStatus>, ApiError> {
    let Query(params) = params?;
    run_mutation(&state, MutationKind::Update, params).await
}

/// `POST /v1/update`
pub(crate) async fn update_form(
    State(state): State<AppState>,
    params: Result<Form<MutationParams>, FormRejection>,
) -> Result<Json<MutationStatus>, ApiError> {
    let Form(params) = params?;
    run_mutation(&state, MutationKind::Update, params).await
}

/// `GET /v1/delete`
pub(crate) async fn delete_query(
    State(state): State<AppState>,
    params: Result<Query<MutationParams>, QueryRejection>,
) -> Result<Json<MutationStatus>, ApiError> {
    let Query(params) = params?;
    run_mutation(&state, MutationKind::Delete, params).await
}

/// `POST /v1/delete`
pub(crate) async fn delete_form(
    State(state): State<AppState>,
    params: Result<Form<MutationParams>, FormRejection>,
) -> Result<Json<MutationStatus>, ApiError> {
    let Form(params) = params?;
    run_mutation(&state, MutationKind::Delete, params).await
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

async fn snapshot(state: &AppState) -> Result<TodoSnapshot, ApiError> {
    Ok(with_store(state, |s| s.list()).await?)
}

/// `GET /v1/all`: every record keyed by id.
pub(crate) async fn list_all(State(state): State<AppState>) -> Result<Json<TodoSnapshot>, ApiError> {
    snapshot(&state).await.map(Json)
}

/// `GET|POST /`: browser page listing the records.
pub(crate) async fn home(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let snapshot = snapshot(&state).await?;
    Ok(Html(super::page::render_home(&snapshot)))
}

/// `GET /health`
pub(crate) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}
