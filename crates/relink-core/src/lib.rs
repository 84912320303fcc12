//! Core types and traits for the Relink dynamic link service.
//!
//! This crate provides shared types and traits used by the shortener,
//! the redirector, the storage backends and the HTTP gateway.

pub mod error;
pub mod record;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use error::{CoreError, ShortenerError, StorageError};
pub use record::LinkRecord;
pub use repository::{ReadRepository, Repository};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
