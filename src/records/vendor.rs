use super::{EntityKind, Identifiable, Record, SoftDeletable};
use crate::ledger::Deletion;
use crate::store::DeletionPatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A vendor the organisation is billed by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub primary_name: String,
    /// "Doing business as" name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dba: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Alternative names seen on invoices
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub account_numbers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub deletion: Deletion,
    /// Delete/restore history kept on the record itself
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audit: Vec<VendorAuditEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorAuditAction {
    Delete,
    Restore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorAuditEntry {
    pub ts: DateTime<Utc>,
    pub action: VendorAuditAction,
}

impl Vendor {
    /// A fresh, active vendor.
    #[must_use]
    pub fn new(id: impl Into<String>, primary_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            primary_name: primary_name.into(),
            dba: None,
            category: None,
            aliases: Vec::new(),
            account_numbers: Vec::new(),
            created_at: now,
            updated_at: now,
            deletion: Deletion::Active,
            audit: Vec::new(),
        }
    }
}

impl Identifiable for Vendor {
    fn id(&self) -> &str {
        &self.id
    }
}

impl SoftDeletable for Vendor {
    fn deletion(&self) -> Deletion {
        self.deletion
    }

    fn apply_deletion(&mut self, patch: &DeletionPatch) {
        let action = if patch.next.is_deleted() {
            VendorAuditAction::Delete
        } else {
            VendorAuditAction::Restore
        };
        self.deletion = patch.next;
        self.updated_at = patch.at;
        self.audit.push(VendorAuditEntry {
            ts: patch.at,
            action,
        });
    }
}

impl Record for Vendor {
    const KIND: EntityKind = EntityKind::Vendor;

    fn listing_cmp(&self, other: &Self) -> Ordering {
        self.primary_name
            .to_lowercase()
            .cmp(&other.primary_name.to_lowercase())
    }
}
