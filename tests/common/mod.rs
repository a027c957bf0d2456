//! Common test utilities

use chrono::{DateTime, TimeZone, Utc};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use vendor_ledger::{
    AuditLog, Invoice, JsonFileStore, ManualClock, RecordService, RecordStore, RestoreWindow,
    Vendor,
};

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// The instant every scenario starts at.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[allow(dead_code)] // Not every test binary touches every field
pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub audit: Arc<AuditLog>,
    pub vendors: RecordService<Vendor, JsonFileStore<Vendor>>,
    pub invoices: RecordService<Invoice, JsonFileStore<Invoice>>,
}

/// Services over JSON files in `data_dir`, seeded with vendors `v1`, `v2`
/// and invoices `inv-1`, `inv-2`.
pub async fn seeded_harness(data_dir: &Path) -> Harness {
    let clock = Arc::new(ManualClock::new(t0()));
    let audit = Arc::new(AuditLog::open(data_dir));

    let vendor_store = Arc::new(JsonFileStore::<Vendor>::open(data_dir));
    for (id, name) in [("v1", "Acme Supply"), ("v2", "Bolt Hardware")] {
        vendor_store
            .insert(Vendor::new(id, name, t0()))
            .await
            .expect("Failed to seed vendor");
    }
    let invoice_store = Arc::new(JsonFileStore::<Invoice>::open(data_dir));
    for (id, file) in [("inv-1", "march.pdf"), ("inv-2", "april.pdf")] {
        invoice_store
            .insert(Invoice::new(id, file, t0()))
            .await
            .expect("Failed to seed invoice");
    }

    let window = RestoreWindow::default();
    Harness {
        vendors: RecordService::new(vendor_store, clock.clone(), window)
            .with_audit(audit.clone()),
        invoices: RecordService::new(invoice_store, clock.clone(), window)
            .with_audit(audit.clone()),
        clock,
        audit,
    }
}
