use super::{
    apply_patch, entity_of, DeletionPatch, Entity, EntityStore, ListFilter, RecordStore,
    StoreError, UpdateOutcome,
};
use crate::ledger::Deletion;
use crate::records::Record;
use crate::utils::{atomic_write, lock_exclusive, lock_path_for, FileLock};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Records of one kind kept as a pretty-printed JSON array
/// (`<data_dir>/vendors.json`, `<data_dir>/invoices.json`).
///
/// Every read-modify-write holds an async mutex for this instance and an
/// exclusive OS lock on `<file>.lock`, and ends in an atomic file replace.
/// A conditional update is never interleaved with another writer, whether it
/// runs in this process or in another one. Reads take neither lock; the
/// atomic replace means they always see a complete file.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock_path: PathBuf,
    lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileStore<T> {
    /// Store for `T` inside `data_dir`. Nothing is touched until first use.
    #[must_use]
    pub fn open(data_dir: &Path) -> Self {
        Self::at_path(data_dir.join(T::KIND.file_name()))
    }

    #[must_use]
    pub fn at_path(path: PathBuf) -> Self {
        Self {
            lock_path: lock_path_for(&path),
            path,
            lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Both locks, in-process first, held for one read-decide-write.
    async fn exclusive(&self) -> Result<(MutexGuard<'_, ()>, FileLock), StoreError> {
        let guard = self.lock.lock().await;
        let file_lock = lock_exclusive(&self.lock_path).await?;
        Ok((guard, file_lock))
    }

    /// Read every record. A missing file reads as empty.
    async fn read_all(&self) -> Result<Vec<T>, StoreError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_all(&self, records: &[T]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(records)?;
        atomic_write(&self.path, &content).await?;
        debug!(
            "Wrote {} {} record(s) to {}",
            records.len(),
            T::KIND,
            self.path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl<T: Record> EntityStore for JsonFileStore<T> {
    async fn get_entity(&self, id: &str) -> Result<Option<Entity>, StoreError> {
        let records = self.read_all().await?;
        Ok(records.iter().find(|r| r.id() == id).map(entity_of))
    }

    async fn update_entity(
        &self,
        id: &str,
        patch: DeletionPatch,
    ) -> Result<UpdateOutcome, StoreError> {
        let _locks = self.exclusive().await?;
        let mut records = self.read_all().await?;
        let outcome = match records.iter_mut().find(|r| r.id() == id) {
            Some(record) => apply_patch(record, &patch),
            None => UpdateOutcome::Missing,
        };
        if outcome == UpdateOutcome::Applied {
            self.write_all(&records).await?;
        }
        Ok(outcome)
    }

    async fn list_entities(&self, filter: ListFilter) -> Result<Vec<Entity>, StoreError> {
        let records = self.read_all().await?;
        Ok(records
            .iter()
            .filter(|r| filter.admits(&r.deletion()))
            .map(entity_of)
            .collect())
    }

    async fn remove_entity(
        &self,
        id: &str,
        expected: Deletion,
    ) -> Result<UpdateOutcome, StoreError> {
        let _locks = self.exclusive().await?;
        let mut records = self.read_all().await?;
        let Some(idx) = records.iter().position(|r| r.id() == id) else {
            return Ok(UpdateOutcome::Missing);
        };
        if records.get(idx).map(T::deletion) != Some(expected) {
            return Ok(UpdateOutcome::Conflict);
        }
        records.remove(idx);
        self.write_all(&records).await?;
        Ok(UpdateOutcome::Applied)
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for JsonFileStore<T> {
    async fn insert(&self, record: T) -> Result<(), StoreError> {
        let _locks = self.exclusive().await?;
        let mut records = self.read_all().await?;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::DuplicateId(record.id().to_string()));
        }
        records.push(record);
        records.sort_by(T::listing_cmp);
        self.write_all(&records).await
    }

    async fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        let records = self.read_all().await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    async fn list(&self, filter: ListFilter) -> Result<Vec<T>, StoreError> {
        let mut records: Vec<T> = self
            .read_all()
            .await?
            .into_iter()
            .filter(|r| filter.admits(&r.deletion()))
            .collect();
        records.sort_by(T::listing_cmp);
        Ok(records)
    }
}

#[cfg(test)]
#[path = "json_file_tests.rs"]
mod json_file_tests;
