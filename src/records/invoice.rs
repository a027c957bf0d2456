use super::{EntityKind, Identifiable, Record, SoftDeletable};
use crate::ledger::Deletion;
use crate::store::DeletionPatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An uploaded invoice, possibly matched to a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub vendor_id: Option<String>,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    /// Billing period, `YYYY-MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default)]
    pub total: f64,
    /// Difference between billed and contracted amounts
    #[serde(default)]
    pub drift: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_hash: Option<String>,
    /// Invoice number as printed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl Invoice {
    #[must_use]
    pub fn new(id: impl Into<String>, file_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            vendor_id: None,
            file_name: file_name.into(),
            created_at: now,
            period: None,
            total: 0.0,
            drift: 0.0,
            file_hash: None,
            text_hash: None,
            number: None,
            deletion: Deletion::Active,
        }
    }
}

impl Identifiable for Invoice {
    fn id(&self) -> &str {
        &self.id
    }
}

impl SoftDeletable for Invoice {
    fn deletion(&self) -> Deletion {
        self.deletion
    }

    fn apply_deletion(&mut self, patch: &DeletionPatch) {
        self.deletion = patch.next;
    }
}

impl Record for Invoice {
    const KIND: EntityKind = EntityKind::Invoice;

    /// Newest first.
    fn listing_cmp(&self, other: &Self) -> Ordering {
        other.created_at.cmp(&self.created_at)
    }
}
