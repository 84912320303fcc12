use crate::error::StorageError;
use crate::record::LinkRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a link store.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the link record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Checks whether a short code is already assigned.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;
}

/// The full link store contract.
///
/// Every mutation is scoped to a single field of a single record, so a
/// retarget and a click increment on the same code never overwrite each other.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Creates a record with zero clicks, stamped with the current time.
    ///
    /// Returns `Err(Conflict)` if the code is already taken. Never overwrites.
    async fn insert_if_absent(&self, code: &ShortCode, target_url: &str) -> Result<LinkRecord>;

    /// Replaces the target URL, leaving `clicks` and `created_at` untouched.
    ///
    /// Returns `Err(NotFound)` if the code does not exist.
    async fn retarget(&self, code: &ShortCode, target_url: &str) -> Result<LinkRecord>;

    /// Atomically adds one to the click counter.
    ///
    /// Returns `Err(NotFound)` if the code does not exist.
    async fn increment_clicks(&self, code: &ShortCode) -> Result<()>;
}
