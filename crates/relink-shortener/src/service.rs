use crate::validate::validate_target_url;
use async_trait::async_trait;
use relink_core::{LinkRecord, Repository, ShortCode, Shortener, ShortenerError, StorageError};
use relink_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

/// Tuning knobs for [`ShortenerService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// How many candidate codes to try before giving up with
    /// [`ShortenerError::AllocationExhausted`].
    #[builder(default = 32)]
    max_attempts: usize,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - Short code allocation with bounded collision retry
/// - Target URL validation
/// - Retargeting and lookups of existing links
///
/// The generator only proposes candidates. A candidate is accepted when the
/// store's insert-if-absent succeeds, so two concurrent allocations that draw
/// the same code can never both win; the loser simply draws again.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: G,
    settings: ShortenerSettings,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with default settings.
    pub fn new(repository: Arc<R>, generator: G) -> Self {
        Self::with_settings(repository, generator, ShortenerSettings::default())
    }

    pub fn with_settings(repository: Arc<R>, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            repository,
            generator,
            settings,
        }
    }

    /// Draws candidates until one is committed or the attempt budget runs out.
    async fn allocate(&self, target_url: &str) -> Result<LinkRecord, ShortenerError> {
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            let code: ShortCode = self.generator.generate().into();
            trace!(code = %code, attempt, "probing candidate short code");

            if self.repository.exists(&code).await? {
                debug!(code = %code, attempt, "candidate short code already taken");
                continue;
            }

            match self.repository.insert_if_absent(&code, target_url).await {
                Ok(record) => return Ok(record),
                Err(StorageError::Conflict(_)) => {
                    debug!(code = %code, attempt, "candidate short code claimed concurrently");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(max_attempts, "short code allocation exhausted");
        Err(ShortenerError::AllocationExhausted(max_attempts))
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, target_url: &str) -> Result<LinkRecord, ShortenerError> {
        let target_url = validate_target_url(target_url)?;

        let record = self.allocate(target_url).await?;
        info!(code = %record.code, target_url = %record.target_url, "created link");
        Ok(record)
    }

    async fn retarget(
        &self,
        code: &ShortCode,
        target_url: &str,
    ) -> Result<LinkRecord, ShortenerError> {
        let target_url = validate_target_url(target_url)?;

        let record = self.repository.retarget(code, target_url).await?;
        info!(code = %code, target_url = %record.target_url, "retargeted link");
        Ok(record)
    }

    async fn info(&self, code: &ShortCode) -> Result<LinkRecord, ShortenerError> {
        self.repository
            .get(code)
            .await?
            .ok_or_else(|| ShortenerError::NotFound(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_core::repository::Result as RepoResult;
    use relink_core::ReadRepository;
    use relink_generator::RandomGenerator;
    use relink_storage::InMemoryRepository;
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;

    /// Hands out a fixed sequence of codes, repeating the last one forever.
    struct ScriptedGenerator {
        codes: Mutex<VecDeque<&'static str>>,
    }

    impl ScriptedGenerator {
        fn new(codes: &[&'static str]) -> Self {
            Self {
                codes: Mutex::new(codes.iter().copied().collect()),
            }
        }
    }

    impl Generator for ScriptedGenerator {
        type Output = ShortCode;

        fn generate(&self) -> ShortCode {
            let mut codes = self.codes.lock().unwrap();
            let next = if codes.len() > 1 {
                codes.pop_front().unwrap()
            } else {
                codes[0]
            };
            ShortCode::new_unchecked(next)
        }
    }

    /// Answers every existence probe with "free", as a concurrent allocator
    /// would see it just before another one commits the same code.
    struct BlindProbeRepository(InMemoryRepository);

    #[async_trait]
    impl ReadRepository for BlindProbeRepository {
        async fn get(&self, code: &ShortCode) -> RepoResult<Option<LinkRecord>> {
            self.0.get(code).await
        }

        async fn exists(&self, _code: &ShortCode) -> RepoResult<bool> {
            Ok(false)
        }
    }

    #[async_trait]
    impl Repository for BlindProbeRepository {
        async fn insert_if_absent(
            &self,
            code: &ShortCode,
            target_url: &str,
        ) -> RepoResult<LinkRecord> {
            self.0.insert_if_absent(code, target_url).await
        }

        async fn retarget(
            &self,
            code: &ShortCode,
            target_url: &str,
        ) -> RepoResult<LinkRecord> {
            self.0.retarget(code, target_url).await
        }

        async fn increment_clicks(&self, code: &ShortCode) -> RepoResult<()> {
            self.0.increment_clicks(code).await
        }
    }

    fn random_service() -> (
        Arc<InMemoryRepository>,
        ShortenerService<InMemoryRepository, RandomGenerator>,
    ) {
        let repo = Arc::new(InMemoryRepository::new());
        let service = ShortenerService::new(Arc::clone(&repo), RandomGenerator::new());
        (repo, service)
    }

    #[tokio::test]
    async fn shorten_creates_fresh_record() {
        let (repo, service) = random_service();

        let record = service.shorten("https://example.com").await.unwrap();
        assert_eq!(record.code.as_str().len(), ShortCode::LENGTH);
        assert_eq!(record.target_url, "https://example.com");
        assert_eq!(record.clicks, 0);

        assert!(repo.exists(&record.code).await.unwrap());
        let stored = repo.get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.target_url, "https://example.com");
        assert_eq!(stored.clicks, 0);
    }

    #[tokio::test]
    async fn shorten_with_invalid_url_fails() {
        let (repo, service) = random_service();

        let err = service.shorten("not-a-valid-url").await.unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidUrl(_)));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn shorten_skips_taken_codes() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.insert_if_absent(&ShortCode::new_unchecked("aaaaaa"), "https://taken.com")
            .await
            .unwrap();
        let service = ShortenerService::new(
            Arc::clone(&repo),
            ScriptedGenerator::new(&["aaaaaa", "bbbbbb"]),
        );

        let record = service.shorten("https://example.com").await.unwrap();
        assert_eq!(record.code.as_str(), "bbbbbb");

        let untouched = repo
            .get(&ShortCode::new_unchecked("aaaaaa"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.target_url, "https://taken.com");
    }

    #[tokio::test]
    async fn insert_conflict_is_retried_not_surfaced() {
        let inner = InMemoryRepository::new();
        inner
            .insert_if_absent(&ShortCode::new_unchecked("aaaaaa"), "https://taken.com")
            .await
            .unwrap();
        let repo = Arc::new(BlindProbeRepository(inner.clone()));
        let service = ShortenerService::new(repo, ScriptedGenerator::new(&["aaaaaa", "cccccc"]));

        let record = service.shorten("https://example.com").await.unwrap();
        assert_eq!(record.code.as_str(), "cccccc");

        let untouched = inner
            .get(&ShortCode::new_unchecked("aaaaaa"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.target_url, "https://taken.com");
    }

    #[tokio::test]
    async fn allocation_gives_up_after_max_attempts() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.insert_if_absent(&ShortCode::new_unchecked("aaaaaa"), "https://taken.com")
            .await
            .unwrap();
        let settings = ShortenerSettings::builder().max_attempts(3).build();
        let service = ShortenerService::with_settings(
            Arc::clone(&repo),
            ScriptedGenerator::new(&["aaaaaa"]),
            settings,
        );

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(err, ShortenerError::AllocationExhausted(3)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_shortens_yield_distinct_codes() {
        let (repo, service) = random_service();
        let service = Arc::new(service);

        let mut handles = vec![];
        for i in 0..64 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .shorten(&format!("https://example.com/{i}"))
                    .await
                    .unwrap()
            }));
        }

        let mut codes = HashSet::new();
        for handle in handles {
            let record = handle.await.unwrap();
            assert!(repo.exists(&record.code).await.unwrap());
            codes.insert(record.code);
        }
        assert_eq!(codes.len(), 64);
        assert_eq!(repo.len(), 64);
    }

    #[tokio::test]
    async fn retarget_replaces_url_and_keeps_clicks() {
        let (repo, service) = random_service();
        let created = service.shorten("https://example.com").await.unwrap();
        repo.increment_clicks(&created.code).await.unwrap();

        let updated = service
            .retarget(&created.code, "https://example.org")
            .await
            .unwrap();
        assert_eq!(updated.target_url, "https://example.org");
        assert_eq!(updated.clicks, 1);
        assert_eq!(updated.created_at, created.created_at);

        let info = service.info(&created.code).await.unwrap();
        assert_eq!(info, updated);
    }

    #[tokio::test]
    async fn retarget_unknown_code_is_not_found() {
        let (_, service) = random_service();

        let err = service
            .retarget(&ShortCode::new_unchecked("nope00"), "https://example.org")
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(_)));
    }

    #[tokio::test]
    async fn retarget_with_invalid_url_fails() {
        let (_, service) = random_service();
        let created = service.shorten("https://example.com").await.unwrap();

        let err = service
            .retarget(&created.code, "javascript:alert(1)")
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidUrl(_)));

        let info = service.info(&created.code).await.unwrap();
        assert_eq!(info.target_url, "https://example.com");
    }

    #[tokio::test]
    async fn info_is_stable_without_mutation() {
        let (_, service) = random_service();
        let created = service.shorten("https://example.com").await.unwrap();

        let first = service.info(&created.code).await.unwrap();
        let second = service.info(&created.code).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn info_unknown_code_is_not_found() {
        let (_, service) = random_service();

        let err = service
            .info(&ShortCode::new_unchecked("nope00"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(_)));
    }
}
