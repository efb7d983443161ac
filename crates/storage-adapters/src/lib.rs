//! # storage-adapters
//!
//! Implementations of the `KeyValueStore` port:
//! - `FileStore`: one JSON file per key under a data directory.
//! - `MemoryStore`: process-local map, for tests and throwaway runs.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use domains::DomainError;

/// Folds an adapter-side `anyhow` chain into the domain's storage error.
pub(crate) fn storage_error(err: anyhow::Error) -> DomainError {
    DomainError::Storage(format!("{err:#}"))
}
