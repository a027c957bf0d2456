//! Vendor and invoice records.
//!
//! The ledger does not care what a record holds; it only needs the
//! capabilities below. Vendors and invoices are both stored as JSON arrays,
//! one file per kind.

mod invoice;
mod vendor;

pub use invoice::Invoice;
pub use vendor::{Vendor, VendorAuditAction, VendorAuditEntry};

use crate::ledger::Deletion;
use crate::store::DeletionPatch;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The kinds of record that support soft deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Vendor,
    Invoice,
}

impl EntityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::Invoice => "invoice",
        }
    }

    /// File holding every record of this kind.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Vendor => "vendors.json",
            Self::Invoice => "invoices.json",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Identifiable {
    fn id(&self) -> &str;
}

pub trait SoftDeletable: Identifiable {
    fn deletion(&self) -> Deletion;

    /// Store `patch.next` on the record. The caller has already checked
    /// `patch.expected`.
    fn apply_deletion(&mut self, patch: &DeletionPatch);
}

/// A persistable record.
pub trait Record:
    SoftDeletable + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: EntityKind;

    /// Order used when listing records.
    fn listing_cmp(&self, other: &Self) -> Ordering;
}
