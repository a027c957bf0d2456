// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod audit;
pub mod clock;
pub mod config;
pub mod error_mapping;
pub mod file_tokens;
pub mod flags;
pub mod ledger;
pub mod logging;
pub mod metrics;
pub mod records;
pub mod service;
pub mod store;
pub mod structured_error;
pub mod utils;

// Re-export commonly used types
pub use audit::{AuditAction, AuditEntry, AuditLog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{load_config, AppConfig, ConfigError};
pub use error_mapping::ToStructuredError;
pub use file_tokens::{FileTokenData, FileTokenStore};
pub use flags::FeatureFlags;
pub use ledger::{Deletion, DeletionStatus, LedgerError, RestoreWindow, SoftDeleteLedger};
pub use records::{EntityKind, Invoice, Record, Vendor};
pub use service::{PurgeResult, RecordService};
pub use store::{
    DeletionPatch, Entity, EntityStore, JsonFileStore, ListFilter, MemoryStore, RecordStore,
    StoreError, UpdateOutcome,
};
pub use structured_error::{to_error_json, StructuredError};
