//! Record-level operations: the ledger plus logging and the audit trail.
use crate::audit::{AuditAction, AuditEntry, AuditLog};
use crate::clock::Clock;
use crate::ledger::{DeletionStatus, LedgerError, RestoreWindow, SoftDeleteLedger};
use crate::metrics::{generate_request_id, OperationTimer};
use crate::records::{EntityKind, Record};
use crate::store::{ListFilter, RecordStore, StoreError};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a successful purge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeResult {
    pub kind: EntityKind,
    pub purged: Vec<String>,
}

/// Soft delete, restore and purge for one kind of record.
#[derive(Debug)]
pub struct RecordService<T, S: ?Sized> {
    store: Arc<S>,
    ledger: SoftDeleteLedger<S>,
    clock: Arc<dyn Clock>,
    audit: Option<Arc<AuditLog>>,
    _record: PhantomData<fn() -> T>,
}

impl<T, S: ?Sized> Clone for RecordService<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ledger: self.ledger.clone(),
            clock: Arc::clone(&self.clock),
            audit: self.audit.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record, S: RecordStore<T> + ?Sized> RecordService<T, S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, window: RestoreWindow) -> Self {
        let ledger = SoftDeleteLedger::new(Arc::clone(&store), Arc::clone(&clock), window);
        Self {
            store,
            ledger,
            clock,
            audit: None,
            _record: PhantomData,
        }
    }

    /// Record every transition in `audit`.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<AuditLog>) -> Self {
        self.audit = Some(audit);
        self
    }

    #[must_use]
    pub fn ledger(&self) -> &SoftDeleteLedger<S> {
        &self.ledger
    }

    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn get(&self, id: &str) -> Result<T, LedgerError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    pub async fn list(&self, filter: ListFilter) -> Result<Vec<T>, StoreError> {
        self.store.list(filter).await
    }

    /// Soft-delete a record and return it as stored.
    pub async fn soft_delete(&self, id: &str) -> Result<T, LedgerError> {
        let request_id = generate_request_id();
        let _timer = OperationTimer::new("soft_delete", T::KIND, &request_id);

        let deletion = self.ledger.soft_delete(id).await?;
        let deadline = deletion
            .restore_deadline()
            .map(|d| d.to_rfc3339())
            .unwrap_or_default();
        info!(
            request_id = %request_id,
            restore_deadline = %deadline,
            "Soft-deleted {}: {}", T::KIND, id
        );
        self.record_audit(id, AuditAction::Deleted).await;
        self.get(id).await
    }

    /// Restore a soft-deleted record and return it as stored.
    pub async fn restore(&self, id: &str) -> Result<T, LedgerError> {
        let request_id = generate_request_id();
        let _timer = OperationTimer::new("restore", T::KIND, &request_id);

        if let Err(e) = self.ledger.restore(id).await {
            if let LedgerError::WindowExpired { deadline, .. } = &e {
                info!(
                    request_id = %request_id,
                    "Refused to restore {} {}: window closed at {}", T::KIND, id, deadline
                );
            }
            return Err(e);
        }
        info!(request_id = %request_id, "Restored {}: {}", T::KIND, id);
        self.record_audit(id, AuditAction::Restored).await;
        self.get(id).await
    }

    pub async fn status(&self, id: &str) -> Result<DeletionStatus, LedgerError> {
        self.ledger.status(id).await
    }

    pub async fn is_restorable(&self, id: &str) -> bool {
        self.ledger.is_restorable(id).await
    }

    /// Permanently remove every record whose restore window has closed.
    pub async fn purge_expired(&self) -> Result<PurgeResult, LedgerError> {
        let request_id = generate_request_id();
        let _timer = OperationTimer::new("purge_expired", T::KIND, &request_id);

        let purged = self.ledger.purge_expired().await?;
        for id in &purged {
            self.record_audit(id, AuditAction::Purged).await;
        }
        info!(
            request_id = %request_id,
            count = purged.len(),
            "Purged expired {} records", T::KIND
        );
        Ok(PurgeResult {
            kind: T::KIND,
            purged,
        })
    }

    /// The transition has already been persisted, so a failed audit write
    /// is only reported.
    async fn record_audit(&self, id: &str, action: AuditAction) {
        let Some(audit) = &self.audit else {
            return;
        };
        let entry = AuditEntry::new(T::KIND, id, action, self.clock.now());
        if let Err(e) = audit.append(entry).await {
            warn!("Failed to append audit entry for {} {}: {}", T::KIND, id, e);
        }
    }
}

#[cfg(test)]
#[path = "../service_tests.rs"]
mod service_tests;
