//! Persistence seam consumed by the ledger.
//!
//! The ledger only ever sees [`Entity`] (an id plus its [`Deletion`] state)
//! and talks to storage through [`EntityStore`]. Writes are conditional on
//! the deletion state the caller last read, so two racing requests against
//! the same record cannot both win.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::ledger::Deletion;
use crate::records::Record;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// The ledger's view of a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: String,
    pub deletion: Deletion,
}

/// A conditional change to an entity's deletion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionPatch {
    /// State the write is conditional on.
    pub expected: Deletion,
    /// State to store if `expected` still holds.
    pub next: Deletion,
    /// Instant of the transition, recorded as the record's update time.
    pub at: DateTime<Utc>,
}

/// Result of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// The stored state no longer matched `expected`.
    Conflict,
    /// No record with that id exists.
    Missing,
}

/// Listing options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub include_deleted: bool,
}

impl ListFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    #[must_use]
    pub fn admits(&self, deletion: &Deletion) -> bool {
        self.include_deleted || !deletion.is_deleted()
    }
}

/// Storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Record '{0}' already exists")]
    DuplicateId(String),

    #[error("Record '{0}' kept changing underneath the update")]
    Contention(String),
}

/// Per-record atomic access to deletion state.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_entity(&self, id: &str) -> Result<Option<Entity>, StoreError>;

    /// Apply `patch` iff the stored state still equals `patch.expected`.
    async fn update_entity(&self, id: &str, patch: DeletionPatch)
        -> Result<UpdateOutcome, StoreError>;

    async fn list_entities(&self, filter: ListFilter) -> Result<Vec<Entity>, StoreError>;

    /// Physically remove a record iff its state still equals `expected`.
    async fn remove_entity(&self, id: &str, expected: Deletion)
        -> Result<UpdateOutcome, StoreError>;
}

/// Typed access to full records on top of [`EntityStore`].
#[async_trait]
pub trait RecordStore<T: Record>: EntityStore {
    async fn insert(&self, record: T) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<T>, StoreError>;

    async fn list(&self, filter: ListFilter) -> Result<Vec<T>, StoreError>;
}

/// Check `patch.expected` against a record and apply the patch if it holds.
pub(crate) fn apply_patch<T: Record>(record: &mut T, patch: &DeletionPatch) -> UpdateOutcome {
    if record.deletion() != patch.expected {
        return UpdateOutcome::Conflict;
    }
    record.apply_deletion(patch);
    UpdateOutcome::Applied
}

pub(crate) fn entity_of<T: Record>(record: &T) -> Entity {
    Entity {
        id: record.id().to_string(),
        deletion: record.deletion(),
    }
}
