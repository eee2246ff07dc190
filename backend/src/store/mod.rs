//! # Snapshot Store
//!
//! Durable key/value storage for whole collections. Each logical key holds one
//! complete JSON array; there are no partial updates. The repository reads
//! both keys once at startup and writes a full collection back after every
//! mutation.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::errors::AppError;

/// Key holding the template collection.
pub const TEMPLATES_KEY: &str = "e-signing-templates";

/// Key holding the document collection.
pub const DOCUMENTS_KEY: &str = "e-signing-documents";

/// Database path that selects [`MemoryStore`] instead of SQLite.
pub const IN_MEMORY_PATH: &str = ":memory:";

pub trait SnapshotStore: Send + Sync {
    /// Stored value for `key`, `None` if nothing was ever written.
    fn load(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Replaces the value under `key`.
    fn save(&self, key: &str, value: &str) -> Result<(), AppError>;
}
