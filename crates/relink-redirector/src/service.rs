use std::sync::Arc;

use crate::redirector::Redirector;
use async_trait::async_trait;
use relink_core::{LinkRecord, Repository, ShortCode};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Service for handling redirects.
///
/// Every successful resolution dispatches exactly one click increment as a
/// detached tokio task and returns without waiting for it. The increment is
/// best effort: a failure is logged and dropped, never retried, so a count
/// can fall short after a store outage or crash but never double counts.
#[derive(Debug)]
pub struct RedirectorService<R> {
    repository: Arc<R>,
}

impl<R> Clone for RedirectorService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: Repository> RedirectorService<R> {
    /// Creates a new RedirectorService with the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Spawns the click increment for one resolved redirect.
    fn dispatch_click(&self, code: ShortCode) -> JoinHandle<()> {
        let repository = Arc::clone(&self.repository);
        tokio::spawn(async move {
            match repository.increment_clicks(&code).await {
                Ok(()) => trace!(code = %code, "click recorded"),
                Err(e) => warn!(code = %code, error = %e, "failed to record click"),
            }
        })
    }
}

#[async_trait]
impl<R: Repository> Redirector for RedirectorService<R> {
    async fn resolve(&self, code: &ShortCode) -> crate::Result<Option<LinkRecord>> {
        trace!(code = %code, "resolving short code");

        match self.repository.get(code).await? {
            Some(record) => {
                // detached: dropping the handle does not cancel the task
                drop(self.dispatch_click(code.clone()));
                debug!(code = %code, url = %record.target_url, "resolved short code");
                Ok(Some(record))
            }
            None => {
                trace!(code = %code, "short code not found");
                Ok(None)
            }
        }
    }
}
