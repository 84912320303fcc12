use async_trait::async_trait;
use relink_core::repository::{ReadRepository, Repository, Result};
use relink_core::{LinkRecord, ShortCode, StorageError};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// A repository decorator that bounds every call with a deadline.
///
/// A call that does not finish in time fails with [`StorageError::Timeout`]
/// instead of leaving the caller waiting on a stuck backend. The abandoned
/// call is dropped, so a mutation may or may not have been applied.
#[derive(Debug, Clone)]
pub struct DeadlineRepository<R> {
    inner: R,
    timeout: Duration,
}

impl<R: ReadRepository> DeadlineRepository<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn within<T>(
        &self,
        operation: &'static str,
        code: &ShortCode,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(code = %code, operation, timeout = ?self.timeout, "store call exceeded deadline");
                Err(StorageError::Timeout(format!(
                    "{operation} on {code} exceeded {:?}",
                    self.timeout
                )))
            }
        }
    }
}

#[async_trait]
impl<R: ReadRepository> ReadRepository for DeadlineRepository<R> {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        self.within("get", code, self.inner.get(code)).await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        self.within("exists", code, self.inner.exists(code)).await
    }
}

#[async_trait]
impl<R: Repository> Repository for DeadlineRepository<R> {
    async fn insert_if_absent(&self, code: &ShortCode, target_url: &str) -> Result<LinkRecord> {
        self.within(
            "insert_if_absent",
            code,
            self.inner.insert_if_absent(code, target_url),
        )
        .await
    }

    async fn retarget(&self, code: &ShortCode, target_url: &str) -> Result<LinkRecord> {
        self.within("retarget", code, self.inner.retarget(code, target_url))
            .await
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<()> {
        self.within("increment_clicks", code, self.inner.increment_clicks(code))
            .await
    }
}
