use crate::config::ConfigError;
use crate::ledger::LedgerError;
use crate::store::StoreError;
use http::StatusCode;

/// Trait for mapping domain errors to structured error codes and optional tips.
pub trait ToStructuredError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>);

    /// Transport status a caller should answer with.
    fn http_status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

// ── LedgerError ────────────────────────────────────────────────────────────────
impl ToStructuredError for LedgerError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            Self::NotFound(_) => ("NOT_FOUND", None),
            Self::AlreadyDeleted(_) => ("ALREADY_DELETED", None),
            Self::NotDeleted(_) => ("NOT_DELETED", Some("Only soft-deleted records can be restored")),
            Self::WindowExpired { .. } => (
                "RESTORE_WINDOW_EXPIRED",
                Some("The record can no longer be restored; run 'purge' to remove it"),
            ),
            Self::PersistenceFailure(_) => ("PERSISTENCE_FAILURE", None),
        }
    }

    fn http_status(&self) -> StatusCode {
        self.status_code()
    }
}

impl LedgerError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyDeleted(_) | Self::NotDeleted(_) => StatusCode::BAD_REQUEST,
            Self::WindowExpired { .. } => StatusCode::GONE,
            Self::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ── StoreError ─────────────────────────────────────────────────────────────────
impl ToStructuredError for StoreError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            Self::IoError(_) => ("IO_ERROR", None),
            Self::JsonError(_) => (
                "JSON_ERROR",
                Some("Check the data file for hand edits that broke its format"),
            ),
            Self::DuplicateId(_) => ("ALREADY_EXISTS", None),
            Self::Contention(_) => ("CONTENTION", Some("Retry the operation")),
        }
    }

    fn http_status(&self) -> StatusCode {
        match self {
            Self::DuplicateId(_) | Self::Contention(_) => StatusCode::CONFLICT,
            Self::IoError(_) | Self::JsonError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────────────────
impl ToStructuredError for ConfigError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            Self::Io(_) => ("IO_ERROR", None),
            Self::Toml(_) => ("CONFIG_PARSE_ERROR", Some("Fix the syntax of config.toml")),
            Self::InvalidDuration { .. } => (
                "INVALID_DURATION",
                Some("Use a humantime duration such as \"30days\" or \"1h\""),
            ),
            Self::InvalidWindow(_) => (
                "INVALID_RESTORE_WINDOW",
                Some("The restore window must be longer than zero"),
            ),
        }
    }
}
