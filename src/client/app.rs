//! The sync client's event loop.
//!
//! Strictly sequential: wait for an event, run one mutation, refetch the
//! full record set, redisplay. The refetch happens whatever the mutation's
//! outcome, so the view always shows what the store currently holds.

use tracing::{info, warn};

use super::api::{MutationOutcome, TodoClient};
use super::render::render_snapshot;
use super::view::{TodoView, ViewEvent};

/// Sync client bound to one store and one view.
pub struct SyncApp<V> {
    client: TodoClient,
    view: V,
}

impl<V: TodoView> SyncApp<V> {
    pub fn new(client: TodoClient, view: V) -> Self {
        Self { client, view }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Fetch the record set and flatten it to display text.
    ///
    /// # Errors
    ///
    /// Propagates the fetch failure.
    pub async fn fetch(&self) -> crate::error::Result<String> {
        let snapshot = self.client.fetch_all().await?;
        Ok(render_snapshot(&snapshot))
    }

    /// Show `data` and clear every input.
    ///
    /// # Errors
    ///
    /// Propagates view failures.
    pub async fn refresh(&mut self, data: &str) -> crate::error::Result<()> {
        self.view.show_records(data).await?;
        self.view.clear_inputs().await
    }

    /// Run until the view is closed.
    ///
    /// # Errors
    ///
    /// Returns an error only when the view itself fails; store failures are
    /// shown through [`TodoView::show_error`].
    pub async fn run(&mut self) -> crate::error::Result<()> {
        info!(base_url = self.client.base_url(), "sync client started");
        self.reload().await?;

        loop {
            let outcome = match self.view.read_event().await? {
                ViewEvent::Closed => break,
                ViewEvent::Add(form) => self.client.add(&form.to_fields()).await,
                ViewEvent::Update(form) => self.client.update(&form.id, &form.to_fields()).await,
                ViewEvent::Delete(form) => self.client.delete(&form.id).await,
            };
            self.report(&outcome).await?;
            self.reload().await?;
        }

        self.view.close().await?;
        info!("sync client closed");
        Ok(())
    }

    async fn report(&mut self, outcome: &MutationOutcome) -> crate::error::Result<()> {
        if let Some(message) = outcome.error_message() {
            warn!(%message, "todo mutation not applied");
            self.view.show_error(&message).await?;
        }
        Ok(())
    }

    /// Refetch and redisplay. A failed fetch keeps the current text.
    async fn reload(&mut self) -> crate::error::Result<()> {
        match self.fetch().await {
            Ok(data) => self.refresh(&data).await,
            Err(e) => {
                warn!(error = %e, "failed to refresh todo items");
                self.view
                    .show_error(&format!("could not load todo items: {e}"))
                    .await
            }
        }
    }
}
