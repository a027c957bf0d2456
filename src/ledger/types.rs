//! Deletion state, restore window, and ledger error types.

use crate::store::StoreError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default restore window: 30 days.
pub const DEFAULT_RESTORE_WINDOW_DAYS: i64 = 30;

/// How long a soft-deleted entity stays restorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreWindow(Duration);

impl RestoreWindow {
    /// Build a window from a chrono duration. Zero and negative windows are rejected.
    #[must_use]
    pub fn new(duration: Duration) -> Option<Self> {
        (duration > Duration::zero()).then_some(Self(duration))
    }

    /// Build a window from a `std::time::Duration` (as produced by `humantime`).
    #[must_use]
    pub fn from_std(duration: std::time::Duration) -> Option<Self> {
        Duration::from_std(duration).ok().and_then(Self::new)
    }

    #[must_use]
    pub fn days(days: i64) -> Option<Self> {
        Duration::try_days(days).and_then(Self::new)
    }

    #[must_use]
    pub fn duration(self) -> Duration {
        self.0
    }
}

impl Default for RestoreWindow {
    fn default() -> Self {
        Self(Duration::days(DEFAULT_RESTORE_WINDOW_DAYS))
    }
}

/// Deletion state of a single entity.
///
/// `deleted_at` and `restore_deadline` only ever exist together, so they
/// live in one variant. On disk the state is flattened into the optional
/// `deletedAt` / `restoreDeadline` fields of the record; a record carrying
/// only one of them fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "DeletionFields", into = "DeletionFields")]
pub enum Deletion {
    #[default]
    Active,
    Deleted {
        deleted_at: DateTime<Utc>,
        restore_deadline: DateTime<Utc>,
    },
}

impl Deletion {
    /// State of an entity deleted at `at` under `window`.
    #[must_use]
    pub fn deleted_at(at: DateTime<Utc>, window: RestoreWindow) -> Self {
        let restore_deadline = at
            .checked_add_signed(window.duration())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::Deleted {
            deleted_at: at,
            restore_deadline,
        }
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted { .. })
    }

    /// Restorable on the half-open interval `[deleted_at, restore_deadline)`.
    #[must_use]
    pub fn is_restorable_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Active => false,
            Self::Deleted {
                restore_deadline, ..
            } => now < *restore_deadline,
        }
    }

    /// Deleted and past its deadline.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.is_deleted() && !self.is_restorable_at(now)
    }

    #[must_use]
    pub fn deleted_at_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active => None,
            Self::Deleted { deleted_at, .. } => Some(*deleted_at),
        }
    }

    #[must_use]
    pub fn restore_deadline(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active => None,
            Self::Deleted {
                restore_deadline, ..
            } => Some(*restore_deadline),
        }
    }
}

/// Wire shape of [`Deletion`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_deadline: Option<DateTime<Utc>>,
}

impl TryFrom<DeletionFields> for Deletion {
    type Error = String;

    fn try_from(fields: DeletionFields) -> Result<Self, Self::Error> {
        match (fields.deleted_at, fields.restore_deadline) {
            (None, None) => Ok(Self::Active),
            (Some(deleted_at), Some(restore_deadline)) if restore_deadline >= deleted_at => {
                Ok(Self::Deleted {
                    deleted_at,
                    restore_deadline,
                })
            }
            (Some(_), Some(_)) => Err("restoreDeadline precedes deletedAt".to_string()),
            (Some(_), None) => Err("deletedAt is set without restoreDeadline".to_string()),
            (None, Some(_)) => Err("restoreDeadline is set without deletedAt".to_string()),
        }
    }
}

impl From<Deletion> for DeletionFields {
    fn from(deletion: Deletion) -> Self {
        Self {
            deleted_at: deletion.deleted_at_time(),
            restore_deadline: deletion.restore_deadline(),
        }
    }
}

/// Restore eligibility as seen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStatus {
    Active,
    Restorable {
        deleted_at: DateTime<Utc>,
        restore_deadline: DateTime<Utc>,
        remaining: Duration,
    },
    Expired {
        deleted_at: DateTime<Utc>,
        restore_deadline: DateTime<Utc>,
    },
}

impl DeletionStatus {
    #[must_use]
    pub fn at(deletion: Deletion, now: DateTime<Utc>) -> Self {
        match deletion {
            Deletion::Active => Self::Active,
            Deletion::Deleted {
                deleted_at,
                restore_deadline,
            } if now < restore_deadline => Self::Restorable {
                deleted_at,
                restore_deadline,
                remaining: restore_deadline.signed_duration_since(now),
            },
            Deletion::Deleted {
                deleted_at,
                restore_deadline,
            } => Self::Expired {
                deleted_at,
                restore_deadline,
            },
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Restorable { .. } => "restorable",
            Self::Expired { .. } => "expired",
        }
    }
}

/// Ledger errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Entity '{0}' not found")]
    NotFound(String),

    #[error("Entity '{0}' is already soft-deleted")]
    AlreadyDeleted(String),

    #[error("Entity '{0}' is not soft-deleted")]
    NotDeleted(String),

    #[error("Restore window for '{id}' expired at {deadline}")]
    WindowExpired {
        id: String,
        deadline: DateTime<Utc>,
    },

    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[from] StoreError),
}
