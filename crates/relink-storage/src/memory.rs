use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use relink_core::repository::{ReadRepository, Repository, Result};
use relink_core::{LinkRecord, ShortCode, StorageError};
use std::sync::Arc;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap shards its locks, so operations on different codes rarely contend
/// and every mutation of a single record runs under that record's shard lock.
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<DashMap<String, LinkRecord>>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.contains_key(code.as_str()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert_if_absent(&self, code: &ShortCode, target_url: &str) -> Result<LinkRecord> {
        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                let record = LinkRecord::new(code.clone(), target_url);
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn retarget(&self, code: &ShortCode, target_url: &str) -> Result<LinkRecord> {
        let Some(mut entry) = self.storage.get_mut(code.as_str()) else {
            return Err(StorageError::NotFound(code.to_string()));
        };

        entry.target_url = target_url.to_owned();
        Ok(entry.value().clone())
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<()> {
        let Some(mut entry) = self.storage.get_mut(code.as_str()) else {
            return Err(StorageError::NotFound(code.to_string()));
        };

        entry.clicks += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn insert_and_get() {
        let repo = InMemoryRepository::new();

        let created = repo
            .insert_if_absent(&code("abc123"), "https://example.com")
            .await
            .unwrap();
        assert_eq!(created.clicks, 0);

        let result = repo.get(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(result, created);
        assert_eq!(result.target_url, "https://example.com");
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let repo = InMemoryRepository::new();

        let result = repo.get(&code("nope00")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn insert_conflict_keeps_original() {
        let repo = InMemoryRepository::new();

        repo.insert_if_absent(&code("abc123"), "https://example.com")
            .await
            .unwrap();

        let err = repo
            .insert_if_absent(&code("abc123"), "https://other.com")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        let result = repo.get(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(result.target_url, "https://example.com");
    }

    #[tokio::test]
    async fn exists_checks() {
        let repo = InMemoryRepository::new();

        assert!(!repo.exists(&code("abc123")).await.unwrap());

        repo.insert_if_absent(&code("abc123"), "https://example.com")
            .await
            .unwrap();

        assert!(repo.exists(&code("abc123")).await.unwrap());
    }

    #[tokio::test]
    async fn retarget_keeps_clicks_and_created_at() {
        let repo = InMemoryRepository::new();
        let c = code("abc123");

        let created = repo
            .insert_if_absent(&c, "https://example.com")
            .await
            .unwrap();
        repo.increment_clicks(&c).await.unwrap();

        let updated = repo.retarget(&c, "https://example.org").await.unwrap();
        assert_eq!(updated.target_url, "https://example.org");
        assert_eq!(updated.clicks, 1);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn retarget_nonexistent() {
        let repo = InMemoryRepository::new();

        let err = repo
            .retarget(&code("nope00"), "https://example.org")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn increment_nonexistent() {
        let repo = InMemoryRepository::new();

        let err = repo.increment_clicks(&code("nope00")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let repo = InMemoryRepository::new();
        let other = repo.clone();

        repo.insert_if_absent(&code("abc123"), "https://example.com")
            .await
            .unwrap();

        assert!(other.exists(&code("abc123")).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_increments_and_retargets_do_not_interfere() {
        let repo = InMemoryRepository::new();
        let c = code("abc123");
        repo.insert_if_absent(&c, "https://example.com")
            .await
            .unwrap();

        let mut handles = vec![];
        for i in 0..50u64 {
            let repo = repo.clone();
            let c = c.clone();
            handles.push(tokio::spawn(async move {
                repo.increment_clicks(&c).await.unwrap();
                repo.retarget(&c, &format!("https://example{}.com", i))
                    .await
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let result = repo.get(&c).await.unwrap().unwrap();
        assert_eq!(result.clicks, 50);
        assert!(result.target_url.starts_with("https://example"));
    }

    #[tokio::test]
    async fn concurrent_inserts_of_same_code_admit_one() {
        let repo = InMemoryRepository::new();
        let mut handles = vec![];

        for i in 0..20u64 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.insert_if_absent(&code("race00"), &format!("https://example{}.com", i))
                    .await
                    .is_ok()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(repo.len(), 1);
    }
}
