//! Link store backends.
//!
//! [`InMemoryRepository`] keeps records in a sharded map and doubles as the
//! test fake, [`SqliteRepository`] persists them through sqlx, and
//! [`DeadlineRepository`] bounds every call of any backend with a deadline.

pub mod deadline;
pub mod memory;
pub mod sqlite;

pub use deadline::DeadlineRepository;
pub use memory::InMemoryRepository;
pub use relink_core::{ReadRepository, Repository, StorageError};
pub use sqlite::SqliteRepository;
