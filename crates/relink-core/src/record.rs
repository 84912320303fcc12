use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored link: the current redirect destination of a short code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The short code naming this record. Assigned once, never reused.
    pub code: ShortCode,
    /// The current redirect destination. Replaced wholesale on retarget.
    pub target_url: String,
    /// When the record was created.
    pub created_at: Timestamp,
    /// Number of resolved redirects. Only ever grows.
    pub clicks: u64,
}

impl LinkRecord {
    /// Creates a fresh record with a zero click count, stamped with the current time.
    pub fn new(code: ShortCode, target_url: impl Into<String>) -> Self {
        Self {
            code,
            target_url: target_url.into(),
            created_at: Timestamp::now(),
            clicks: 0,
        }
    }
}
