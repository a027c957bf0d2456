use super::{
    apply_patch, entity_of, DeletionPatch, Entity, EntityStore, ListFilter, RecordStore,
    StoreError, UpdateOutcome,
};
use crate::ledger::Deletion;
use crate::records::Record;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Records held in process memory.
///
/// Each conditional write happens under the write lock, which gives the
/// per-record atomicity the ledger relies on.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: RwLock<HashMap<String, T>>,
}

impl<T: Record> MemoryStore<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.id().to_string(), r))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> EntityStore for MemoryStore<T> {
    async fn get_entity(&self, id: &str) -> Result<Option<Entity>, StoreError> {
        Ok(self.records.read().await.get(id).map(entity_of))
    }

    async fn update_entity(
        &self,
        id: &str,
        patch: DeletionPatch,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut records = self.records.write().await;
        Ok(match records.get_mut(id) {
            Some(record) => apply_patch(record, &patch),
            None => UpdateOutcome::Missing,
        })
    }

    async fn list_entities(&self, filter: ListFilter) -> Result<Vec<Entity>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|r| filter.admits(&r.deletion()))
            .map(entity_of)
            .collect())
    }

    async fn remove_entity(
        &self,
        id: &str,
        expected: Deletion,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut records = self.records.write().await;
        let outcome = match records.get(id) {
            None => UpdateOutcome::Missing,
            Some(record) if record.deletion() != expected => UpdateOutcome::Conflict,
            Some(_) => UpdateOutcome::Applied,
        };
        if outcome == UpdateOutcome::Applied {
            records.remove(id);
        }
        Ok(outcome)
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryStore<T> {
    async fn insert(&self, record: T) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(record.id()) {
            return Err(StoreError::DuplicateId(record.id().to_string()));
        }
        records.insert(record.id().to_string(), record);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn list(&self, filter: ListFilter) -> Result<Vec<T>, StoreError> {
        let mut list: Vec<T> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| filter.admits(&r.deletion()))
            .cloned()
            .collect();
        list.sort_by(T::listing_cmp);
        Ok(list)
    }
}
