//! HTTP client for the record store.

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::TodoError;
use crate::server::MutationStatus;
use crate::store::{TodoFields, TodoSnapshot};

/// Result of a mutating call, as seen from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The store ran the operation. `affected` may be `0` for an update or
    /// delete whose id matched nothing.
    Applied(MutationStatus),
    /// The store rejected the request with a validation message.
    Rejected(String),
    /// Transport failure or non-success HTTP status.
    Failed(String),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Message to surface to the user, or `None` when the call was applied.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Applied(_) => None,
            Self::Rejected(msg) => Some(msg.clone()),
            Self::Failed(reason) => Some(format!("request failed: {reason}")),
        }
    }
}

/// Classify a mutation response by status and body.
///
/// A `200` JSON body is a [`MutationStatus`]; any other `2xx` body is the
/// store's validation message.
pub fn classify_response(status: StatusCode, body: &str) -> MutationOutcome {
    if !status.is_success() {
        return MutationOutcome::Failed(format!("HTTP {}: {}", status.as_u16(), body.trim()));
    }
    match serde_json::from_str::<MutationStatus>(body) {
        Ok(applied) => MutationOutcome::Applied(applied),
        Err(_) => MutationOutcome::Rejected(body.trim().to_owned()),
    }
}

/// Client for the record store HTTP surface.
///
/// No request timeout is configured: a hung store blocks the caller.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    client: reqwest::Client,
}

impl TodoClient {
    /// Create a client for the store at `base_url` (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch the full record set.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Http`] on transport failure, a non-success
    /// status, or an undecodable body.
    pub async fn fetch_all(&self) -> crate::error::Result<TodoSnapshot> {
        let response = self.client.get(self.url("/v1/all")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TodoError::Http(format!(
                "GET /v1/all returned HTTP {}",
                status.as_u16()
            )));
        }
        let snapshot: TodoSnapshot = response.json().await?;
        debug!(records = snapshot.len(), "fetched todo items");
        Ok(snapshot)
    }

    /// Insert a record.
    pub async fn add(&self, fields: &TodoFields) -> MutationOutcome {
        self.mutate("/v1/add", fields.query_pairs()).await
    }

    /// Replace all fields of record `id`.
    pub async fn update(&self, id: &str, fields: &TodoFields) -> MutationOutcome {
        let mut pairs = vec![("id", id)];
        pairs.extend(fields.query_pairs());
        self.mutate("/v1/update", pairs).await
    }

    /// Remove record `id`.
    pub async fn delete(&self, id: &str) -> MutationOutcome {
        self.mutate("/v1/delete", vec![("id", id)]).await
    }

    async fn mutate(&self, path: &str, pairs: Vec<(&str, &str)>) -> MutationOutcome {
        let response = match self.client.get(self.url(path)).query(&pairs).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(path, error = %e, "todo request failed");
                return MutationOutcome::Failed(e.to_string());
            }
        };
        let status = response.status();
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                warn!(path, error = %e, "failed to read todo response body");
                return MutationOutcome::Failed(e.to_string());
            }
        };
        let outcome = classify_response(status, &body);
        debug!(path, ?outcome, "todo mutation finished");
        outcome
    }
}
