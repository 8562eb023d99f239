//! Storage abstraction for project persistence.
//!
//! Backends store [`ProjectRecord`]s keyed by project id. The in-memory
//! [`Project`](crate::project::Project) stays the source of truth: a failed
//! save never rolls back edits.

mod autosave;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use autosave::{AutoSave, AutoSaveConfig, DEFAULT_AUTOSAVE_DELAY_MS, SaveTicket};
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::project::ProjectRecord;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Newest `updatedAt` first.
pub(crate) fn sort_newest_first(records: &mut [ProjectRecord]) {
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// Project storage backend.
///
/// On native platforms implementations must be Send + Sync.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Insert or replace the record with the same id.
    fn save(&self, record: &ProjectRecord) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a project, `None` if no such id is stored.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Option<ProjectRecord>>>;

    /// All stored projects, most recently updated first.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<ProjectRecord>>>;

    /// Delete a project. Deleting a missing id is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
}

/// Project storage backend (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    fn save(&self, record: &ProjectRecord) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Option<ProjectRecord>>>;

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<ProjectRecord>>>;

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
}
