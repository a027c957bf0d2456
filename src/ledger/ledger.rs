//! Soft delete, restore, and purge over an [`EntityStore`].
use super::types::{Deletion, DeletionStatus, LedgerError, RestoreWindow};
use crate::clock::Clock;
use crate::store::{DeletionPatch, Entity, EntityStore, ListFilter, StoreError, UpdateOutcome};
use std::sync::Arc;

/// How many times a mutation re-reads after losing a conditional write.
pub const MAX_CAS_ATTEMPTS: usize = 3;

/// Owns the deleted/active decision for every entity in one store.
///
/// The ledger holds no state of its own: each call reads the record, decides,
/// and writes back conditionally on what it read. It never logs; callers
/// translate the typed result.
#[derive(Debug)]
pub struct SoftDeleteLedger<S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    window: RestoreWindow,
}

impl<S: ?Sized> Clone for SoftDeleteLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            window: self.window,
        }
    }
}

impl<S: EntityStore + ?Sized> SoftDeleteLedger<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, window: RestoreWindow) -> Self {
        Self {
            store,
            clock,
            window,
        }
    }

    #[must_use]
    pub fn window(&self) -> RestoreWindow {
        self.window
    }

    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    async fn load(&self, id: &str) -> Result<Entity, LedgerError> {
        self.store
            .get_entity(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    /// Mark an active entity deleted. Returns the stored deletion state.
    pub async fn soft_delete(&self, id: &str) -> Result<Deletion, LedgerError> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let entity = self.load(id).await?;
            if entity.deletion.is_deleted() {
                return Err(LedgerError::AlreadyDeleted(id.to_string()));
            }
            let now = self.clock.now();
            let next = Deletion::deleted_at(now, self.window);
            let patch = DeletionPatch {
                expected: entity.deletion,
                next,
                at: now,
            };
            match self.store.update_entity(id, patch).await? {
                UpdateOutcome::Applied => return Ok(next),
                UpdateOutcome::Missing => return Err(LedgerError::NotFound(id.to_string())),
                UpdateOutcome::Conflict => {}
            }
        }
        Err(StoreError::Contention(id.to_string()).into())
    }

    /// Return a deleted entity to active, provided its window is still open.
    pub async fn restore(&self, id: &str) -> Result<(), LedgerError> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let entity = self.load(id).await?;
            let Deletion::Deleted {
                restore_deadline, ..
            } = entity.deletion
            else {
                return Err(LedgerError::NotDeleted(id.to_string()));
            };
            let now = self.clock.now();
            if now >= restore_deadline {
                return Err(LedgerError::WindowExpired {
                    id: id.to_string(),
                    deadline: restore_deadline,
                });
            }
            let patch = DeletionPatch {
                expected: entity.deletion,
                next: Deletion::Active,
                at: now,
            };
            match self.store.update_entity(id, patch).await? {
                UpdateOutcome::Applied => return Ok(()),
                UpdateOutcome::Missing => return Err(LedgerError::NotFound(id.to_string())),
                UpdateOutcome::Conflict => {}
            }
        }
        Err(StoreError::Contention(id.to_string()).into())
    }

    /// `true` iff the entity exists, is deleted, and its window is open.
    ///
    /// Lookup failures read as not restorable.
    pub async fn is_restorable(&self, id: &str) -> bool {
        match self.store.get_entity(id).await {
            Ok(Some(entity)) => entity.deletion.is_restorable_at(self.clock.now()),
            Ok(None) | Err(_) => false,
        }
    }

    pub async fn status(&self, id: &str) -> Result<DeletionStatus, LedgerError> {
        let entity = self.load(id).await?;
        Ok(DeletionStatus::at(entity.deletion, self.clock.now()))
    }

    /// Physically remove every entity whose restore window has closed.
    ///
    /// Each removal is conditional on the state that was judged expired, so
    /// an entity restored in the meantime survives. Returns the purged ids.
    pub async fn purge_expired(&self) -> Result<Vec<String>, LedgerError> {
        let now = self.clock.now();
        let candidates = self
            .store
            .list_entities(ListFilter::new().include_deleted())
            .await?;
        let mut purged = Vec::new();
        for entity in candidates {
            if !entity.deletion.is_expired_at(now) {
                continue;
            }
            if self.store.remove_entity(&entity.id, entity.deletion).await?
                == UpdateOutcome::Applied
            {
                purged.push(entity.id);
            }
        }
        Ok(purged)
    }
}
