//! Link management service.
//!
//! This crate provides [`ShortenerService`], which allocates collision-free
//! short codes and manages link targets. Core types are re-exported from
//! `relink_core`.

pub mod service;
pub mod validate;

pub use relink_core::{Shortener, ShortenerError};
pub use service::{ShortenerService, ShortenerSettings};
