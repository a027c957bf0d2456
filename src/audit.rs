//! Append-only audit trail of lifecycle transitions (`audit.json`).

use crate::records::EntityKind;
use crate::store::StoreError;
use crate::utils::{atomic_write, lock_exclusive, lock_path_for};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// File name of the audit trail inside the data directory
pub const AUDIT_FILE: &str = "audit.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Deleted,
    Restored,
    Purged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub entity_type: EntityKind,
    pub entity_id: String,
    pub action: AuditAction,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    #[must_use]
    pub fn new(
        entity_type: EntityKind,
        entity_id: impl Into<String>,
        action: AuditAction,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!(
                "audit_{}_{}",
                timestamp.timestamp_millis(),
                uuid::Uuid::new_v4().simple()
            ),
            entity_type,
            entity_id: entity_id.into(),
            action,
            timestamp,
        }
    }
}

/// The audit trail file. Appends hold `audit.json.lock`, so concurrent
/// processes never drop each other's entries.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    lock_path: PathBuf,
    lock: Mutex<()>,
}

impl AuditLog {
    #[must_use]
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(AUDIT_FILE);
        Self {
            lock_path: lock_path_for(&path),
            path,
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<AuditEntry>, StoreError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub async fn append(&self, entry: AuditEntry) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let _file_lock = lock_exclusive(&self.lock_path).await?;
        let mut entries = self.read_all().await?;
        entries.push(entry);
        let content = serde_json::to_string_pretty(&entries)?;
        atomic_write(&self.path, &content).await?;
        Ok(())
    }

    pub async fn entries(&self) -> Result<Vec<AuditEntry>, StoreError> {
        self.read_all().await
    }

    /// Entries concerning one entity, oldest first.
    pub async fn entries_for(
        &self,
        kind: EntityKind,
        entity_id: &str,
    ) -> Result<Vec<AuditEntry>, StoreError> {
        Ok(self
            .entries()
            .await?
            .into_iter()
            .filter(|e| e.entity_type == kind && e.entity_id == entity_id)
            .collect())
    }
}
