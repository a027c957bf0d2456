use super::*;
use crate::clock::ManualClock;
use crate::records::{Invoice, Vendor};
use crate::store::{
    DeletionPatch, Entity, EntityStore, ListFilter, MemoryStore, RecordStore, StoreError,
    UpdateOutcome,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
}

fn setup(ids: &[&str]) -> (SoftDeleteLedger<MemoryStore<Vendor>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(t0()));
    let store = Arc::new(MemoryStore::with_records(
        ids.iter().map(|id| Vendor::new(*id, format!("Vendor {id}"), t0())),
    ));
    let ledger = SoftDeleteLedger::new(store, clock.clone(), RestoreWindow::days(30).unwrap());
    (ledger, clock)
}

#[tokio::test]
async fn test_soft_delete_sets_deadline() {
    let (ledger, _clock) = setup(&["42"]);

    let deletion = ledger.soft_delete("42").await.unwrap();

    assert_eq!(
        deletion,
        Deletion::Deleted {
            deleted_at: t0(),
            restore_deadline: t0() + Duration::days(30),
        }
    );
    let stored = ledger.store().get_entity("42").await.unwrap().unwrap();
    assert_eq!(stored.deletion, deletion);
}

#[tokio::test]
async fn test_soft_delete_twice_fails_and_leaves_state() {
    let (ledger, clock) = setup(&["42"]);
    let first = ledger.soft_delete("42").await.unwrap();

    clock.advance(Duration::days(1));
    let err = ledger.soft_delete("42").await.unwrap_err();

    assert!(matches!(err, LedgerError::AlreadyDeleted(ref id) if id == "42"));
    let stored = ledger.store().get_entity("42").await.unwrap().unwrap();
    assert_eq!(stored.deletion, first);
}

#[tokio::test]
async fn test_soft_delete_unknown_entity() {
    let (ledger, _clock) = setup(&[]);
    let err = ledger.soft_delete("missing").await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn test_restore_never_deleted() {
    let (ledger, _clock) = setup(&["7"]);
    let err = ledger.restore("7").await.unwrap_err();
    assert!(matches!(err, LedgerError::NotDeleted(ref id) if id == "7"));
}

#[tokio::test]
async fn test_restore_unknown_entity() {
    let (ledger, _clock) = setup(&[]);
    let err = ledger.restore("missing").await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn test_restore_within_window() {
    let (ledger, clock) = setup(&["1"]);
    ledger.soft_delete("1").await.unwrap();

    clock.advance(Duration::days(29));
    ledger.restore("1").await.unwrap();

    let stored = ledger.store().get_entity("1").await.unwrap().unwrap();
    assert_eq!(stored.deletion, Deletion::Active);
}

#[tokio::test]
async fn test_restore_at_deadline_is_expired() {
    let (ledger, clock) = setup(&["1"]);
    ledger.soft_delete("1").await.unwrap();

    clock.advance(Duration::days(30));
    let err = ledger.restore("1").await.unwrap_err();

    match err {
        LedgerError::WindowExpired { id, deadline } => {
            assert_eq!(id, "1");
            assert_eq!(deadline, t0() + Duration::days(30));
        }
        other => panic!("expected WindowExpired, got {other:?}"),
    }
    // Still deleted.
    let stored = ledger.store().get_entity("1").await.unwrap().unwrap();
    assert!(stored.deletion.is_deleted());
}

#[tokio::test]
async fn test_restore_one_tick_before_deadline() {
    let (ledger, clock) = setup(&["1"]);
    ledger.soft_delete("1").await.unwrap();

    clock.advance(Duration::days(30) - Duration::nanoseconds(1));
    assert!(ledger.is_restorable("1").await);
    ledger.restore("1").await.unwrap();
}

#[tokio::test]
async fn test_restore_after_deadline_is_expired() {
    let (ledger, clock) = setup(&["1"]);
    ledger.soft_delete("1").await.unwrap();

    clock.advance(Duration::days(45));
    assert!(matches!(
        ledger.restore("1").await,
        Err(LedgerError::WindowExpired { .. })
    ));
}

#[tokio::test]
async fn test_is_restorable_lifecycle() {
    let (ledger, clock) = setup(&["1"]);
    assert!(!ledger.is_restorable("1").await);
    assert!(!ledger.is_restorable("nope").await);

    ledger.soft_delete("1").await.unwrap();
    assert!(ledger.is_restorable("1").await);

    clock.advance(Duration::days(30));
    assert!(!ledger.is_restorable("1").await);
}

#[tokio::test]
async fn test_delete_restore_round_trip_preserves_record() {
    let (ledger, clock) = setup(&["1"]);
    let before = ledger.store().get("1").await.unwrap().unwrap();

    ledger.soft_delete("1").await.unwrap();
    clock.advance(Duration::hours(3));
    ledger.restore("1").await.unwrap();

    let after = ledger.store().get("1").await.unwrap().unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.primary_name, before.primary_name);
    assert_eq!(after.aliases, before.aliases);
    assert_eq!(after.deletion, before.deletion);
}

#[tokio::test]
async fn test_delete_again_after_restore_gets_fresh_deadline() {
    let (ledger, clock) = setup(&["1"]);
    ledger.soft_delete("1").await.unwrap();
    clock.advance(Duration::days(5));
    ledger.restore("1").await.unwrap();
    clock.advance(Duration::days(5));

    let second = ledger.soft_delete("1").await.unwrap();
    assert_eq!(
        second.restore_deadline(),
        Some(t0() + Duration::days(10) + Duration::days(30))
    );
}

#[tokio::test]
async fn test_status_reports_each_phase() {
    let (ledger, clock) = setup(&["1"]);
    assert_eq!(ledger.status("1").await.unwrap(), DeletionStatus::Active);

    ledger.soft_delete("1").await.unwrap();
    clock.advance(Duration::days(10));
    match ledger.status("1").await.unwrap() {
        DeletionStatus::Restorable { remaining, .. } => {
            assert_eq!(remaining, Duration::days(20));
        }
        other => panic!("expected Restorable, got {other:?}"),
    }

    clock.advance(Duration::days(20));
    assert_eq!(ledger.status("1").await.unwrap().label(), "expired");
    assert!(matches!(
        ledger.status("missing").await,
        Err(LedgerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_purge_removes_only_expired() {
    let (ledger, clock) = setup(&["old", "recent", "active"]);
    ledger.soft_delete("old").await.unwrap();
    clock.advance(Duration::days(20));
    ledger.soft_delete("recent").await.unwrap();
    clock.advance(Duration::days(10));

    let purged = ledger.purge_expired().await.unwrap();

    assert_eq!(purged, vec!["old".to_string()]);
    assert!(ledger.store().get_entity("old").await.unwrap().is_none());
    assert!(ledger.is_restorable("recent").await);
    assert!(ledger.store().get_entity("active").await.unwrap().is_some());
}

#[tokio::test]
async fn test_purge_with_nothing_expired() {
    let (ledger, _clock) = setup(&["a"]);
    ledger.soft_delete("a").await.unwrap();
    assert!(ledger.purge_expired().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ledger_works_for_invoices() {
    let clock = Arc::new(ManualClock::new(t0()));
    let store = Arc::new(MemoryStore::with_records([Invoice::new("inv", "a.pdf", t0())]));
    let ledger = SoftDeleteLedger::new(store, clock, RestoreWindow::default());

    ledger.soft_delete("inv").await.unwrap();
    assert!(ledger.is_restorable("inv").await);
    ledger.restore("inv").await.unwrap();
}

/// A store whose first conditional writes report a lost race.
struct RacyStore {
    inner: MemoryStore<Vendor>,
    conflicts_left: AtomicUsize,
}

#[async_trait]
impl EntityStore for RacyStore {
    async fn get_entity(&self, id: &str) -> Result<Option<Entity>, StoreError> {
        self.inner.get_entity(id).await
    }

    async fn update_entity(
        &self,
        id: &str,
        patch: DeletionPatch,
    ) -> Result<UpdateOutcome, StoreError> {
        let left = self.conflicts_left.load(Ordering::SeqCst);
        if left > 0 {
            self.conflicts_left.store(left - 1, Ordering::SeqCst);
            return Ok(UpdateOutcome::Conflict);
        }
        self.inner.update_entity(id, patch).await
    }

    async fn list_entities(&self, filter: ListFilter) -> Result<Vec<Entity>, StoreError> {
        self.inner.list_entities(filter).await
    }

    async fn remove_entity(
        &self,
        id: &str,
        expected: Deletion,
    ) -> Result<UpdateOutcome, StoreError> {
        self.inner.remove_entity(id, expected).await
    }
}

fn racy(conflicts: usize) -> SoftDeleteLedger<RacyStore> {
    let store = Arc::new(RacyStore {
        inner: MemoryStore::with_records([Vendor::new("1", "Acme", t0())]),
        conflicts_left: AtomicUsize::new(conflicts),
    });
    SoftDeleteLedger::new(
        store,
        Arc::new(ManualClock::new(t0())),
        RestoreWindow::default(),
    )
}

#[tokio::test]
async fn test_lost_race_is_reevaluated() {
    let ledger = racy(MAX_CAS_ATTEMPTS - 1);
    ledger.soft_delete("1").await.unwrap();
    assert!(ledger.is_restorable("1").await);
}

#[tokio::test]
async fn test_persistent_contention_surfaces_as_persistence_failure() {
    let ledger = racy(MAX_CAS_ATTEMPTS);
    let err = ledger.soft_delete("1").await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::PersistenceFailure(StoreError::Contention(_))
    ));
}

#[tokio::test]
async fn test_concurrent_restores_have_one_winner() {
    let (ledger, _clock) = setup(&["1"]);
    ledger.soft_delete("1").await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.restore("1").await })
        })
        .collect();

    let mut ok = 0;
    let mut not_deleted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => ok += 1,
            Err(LedgerError::NotDeleted(_)) => not_deleted += 1,
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(not_deleted, 7);
}
