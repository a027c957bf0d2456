//! Soft-delete / restore lifecycle with a time-bounded recovery window.
//!
//! ```text
//! Active --soft_delete--> Deleted --restore (now < deadline)--> Active
//!                         Deleted --deadline passes--> expired --purge_expired--> gone
//! ```
//!
//! The deadline is fixed at deletion time (`deleted_at + window`) and the
//! boundary instant counts as expired.

#[allow(clippy::module_inception)]
mod ledger;
mod types;

pub use ledger::{SoftDeleteLedger, MAX_CAS_ATTEMPTS};
pub use types::{
    Deletion, DeletionFields, DeletionStatus, LedgerError, RestoreWindow,
    DEFAULT_RESTORE_WINDOW_DAYS,
};

#[cfg(test)]
#[path = "../ledger_tests.rs"]
mod ledger_tests;
