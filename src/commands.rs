//! Subcommand handlers. Each returns the JSON document printed on success.
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use vendor_ledger::utils::{compute_file_hash, compute_text_hash};
use vendor_ledger::{
    AuditLog, Clock, DeletionStatus, EntityKind, FeatureFlags, Invoice, JsonFileStore,
    LedgerError, ListFilter, Record, RecordService, RestoreWindow, StoreError, ToStructuredError,
    Vendor,
};

/// What to do with records of one kind.
#[derive(Debug, Clone)]
pub enum RecordAction {
    Delete(String),
    Restore(String),
    Status(String),
    List { include_deleted: bool },
    Purge,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ToStructuredError for CommandError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            Self::Ledger(e) => e.error_code_and_tip(),
            Self::Store(e) => e.error_code_and_tip(),
            Self::Read { .. } => ("IO_ERROR", Some("Check that the file exists and is readable")),
            Self::Encode(_) => ("ENCODE_ERROR", None),
        }
    }

    fn http_status(&self) -> http::StatusCode {
        match self {
            Self::Ledger(e) => e.http_status(),
            Self::Store(e) => e.http_status(),
            Self::Read { .. } => http::StatusCode::BAD_REQUEST,
            Self::Encode(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Everything a record command needs, resolved from flags and config.
#[derive(Debug)]
pub struct Context {
    pub data_dir: PathBuf,
    pub window: RestoreWindow,
    pub clock: Arc<dyn Clock>,
    pub audit: Arc<AuditLog>,
}

impl Context {
    fn service<T: Record>(&self) -> RecordService<T, JsonFileStore<T>> {
        let store = Arc::new(JsonFileStore::open(&self.data_dir));
        RecordService::new(store, Arc::clone(&self.clock), self.window)
            .with_audit(Arc::clone(&self.audit))
    }
}

pub async fn run_record_action(
    ctx: &Context,
    kind: EntityKind,
    action: RecordAction,
) -> Result<Value, CommandError> {
    match kind {
        EntityKind::Vendor => run_for::<Vendor>(ctx, action).await,
        EntityKind::Invoice => run_for::<Invoice>(ctx, action).await,
    }
}

async fn run_for<T: Record>(ctx: &Context, action: RecordAction) -> Result<Value, CommandError> {
    let service = ctx.service::<T>();
    let value = match action {
        RecordAction::Delete(id) => to_value(&service.soft_delete(&id).await?)?,
        RecordAction::Restore(id) => to_value(&service.restore(&id).await?)?,
        RecordAction::Status(id) => status_json(T::KIND, &id, service.status(&id).await?),
        RecordAction::List { include_deleted } => {
            let mut filter = ListFilter::new();
            if include_deleted {
                filter = filter.include_deleted();
            }
            to_value(&service.list(filter).await?)?
        }
        RecordAction::Purge => {
            let result = service.purge_expired().await?;
            json!({ "kind": result.kind, "purged": result.purged })
        }
    };
    Ok(value)
}

fn to_value<S: serde::Serialize>(value: &S) -> Result<Value, CommandError> {
    Ok(serde_json::to_value(value)?)
}

fn status_json(kind: EntityKind, id: &str, status: DeletionStatus) -> Value {
    match status {
        DeletionStatus::Active => json!({ "kind": kind, "id": id, "state": status.label() }),
        DeletionStatus::Restorable {
            deleted_at,
            restore_deadline,
            remaining,
        } => json!({
            "kind": kind,
            "id": id,
            "state": status.label(),
            "deletedAt": deleted_at,
            "restoreDeadline": restore_deadline,
            "remainingSeconds": remaining.num_seconds(),
        }),
        DeletionStatus::Expired {
            deleted_at,
            restore_deadline,
        } => json!({
            "kind": kind,
            "id": id,
            "state": status.label(),
            "deletedAt": deleted_at,
            "restoreDeadline": restore_deadline,
        }),
    }
}

/// SHA-256 of a file's bytes, or of its normalized text with `text`.
pub async fn hash_file(path: &Path, text: bool) -> Result<Value, CommandError> {
    let read_err = |source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    };
    let hash = if text {
        let content = tokio::fs::read_to_string(path).await.map_err(read_err)?;
        compute_text_hash(&content)
    } else {
        compute_file_hash(path).await.map_err(read_err)?
    };
    Ok(json!({
        "file": path.display().to_string(),
        "mode": if text { "text" } else { "bytes" },
        "hash": hash,
    }))
}

#[must_use]
pub fn flags_json(flags: FeatureFlags) -> Value {
    json!({
        "dashPro": flags.dash_pro,
        "uiV2": flags.ui_v2,
        "ui": flags.select_ui("v2", "v1"),
    })
}
