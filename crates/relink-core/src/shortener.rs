use crate::record::LinkRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Management operations on dynamic links.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Allocates a fresh short code and stores a record pointing at `target_url`.
    async fn shorten(&self, target_url: &str) -> Result<LinkRecord>;

    /// Points an existing short code at a new destination.
    async fn retarget(&self, code: &ShortCode, target_url: &str) -> Result<LinkRecord>;

    /// Returns the current record of a short code.
    async fn info(&self, code: &ShortCode) -> Result<LinkRecord>;
}
