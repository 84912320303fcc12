//! Redirect resolution with click accounting.
//!
//! [`RedirectorService`] resolves short codes to their current target and
//! counts every successful resolution. The count is written by a detached
//! task, so a slow store never delays the redirect itself.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use relink_core::{Repository, ShortCode};
//! use relink_redirector::{Redirector, RedirectorService};
//! use relink_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Arc::new(InMemoryRepository::new());
//! let code = ShortCode::new("abc123")?;
//! repo.insert_if_absent(&code, "https://example.com").await?;
//!
//! let service = RedirectorService::new(repo);
//! if let Some(record) = service.resolve(&code).await? {
//!     println!("Redirect to: {}", record.target_url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod redirector;
pub mod service;

pub use error::{RedirectorError, Result};
pub use redirector::Redirector;
pub use service::RedirectorService;
