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

mod commands;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use commands::{flags_json, hash_file, run_record_action, CommandError, Context, RecordAction};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error};
use vendor_ledger::logging::{init_logging, parse_rotation, LogConfig};
use vendor_ledger::{
    load_config, to_error_json, AppConfig, AuditLog, EntityKind, SystemClock, ToStructuredError,
};

/// Vendor Ledger - soft delete and time-bounded restore for vendor and invoice records
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: ~/.vendor-ledger/config.toml)
    #[arg(long, env = "VENDOR_LEDGER_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory; overrides `[ledger] data_dir`
    #[arg(long, env = "VENDOR_LEDGER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Enable JSON log format (for log aggregation)
    #[arg(long, env = "VENDOR_LEDGER_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "VENDOR_LEDGER_LOG_ROTATION", default_value = "daily")]
    log_rotation: String,

    /// Custom log directory (default: ~/.vendor-ledger/logs)
    #[arg(long, env = "VENDOR_LEDGER_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Soft-delete a record; it stays restorable for the restore window
    Delete { kind: EntityKind, id: String },
    /// Restore a soft-deleted record while its window is open
    Restore { kind: EntityKind, id: String },
    /// Show whether a record is active, restorable, or expired
    Status { kind: EntityKind, id: String },
    /// List records, hiding deleted ones unless asked
    List {
        kind: EntityKind,
        #[arg(long)]
        include_deleted: bool,
    },
    /// Permanently remove records whose restore window has closed
    Purge { kind: EntityKind },
    /// Print the SHA-256 of a file
    Hash {
        file: PathBuf,
        /// Hash the normalized text instead of the raw bytes
        #[arg(long)]
        text: bool,
    },
    /// Print the resolved feature flags
    Flags,
}

/// Print a result: JSON on `out` and success, or a structured error on
/// `err_out` and failure.
fn emit<E: ToStructuredError + std::fmt::Display>(
    result: Result<serde_json::Value, E>,
    out: &mut impl Write,
    err_out: &mut impl Write,
) -> std::io::Result<ExitCode> {
    match result {
        Ok(value) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("{e}");
            writeln!(err_out, "{}", to_error_json(&e))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn emit_to_console<E: ToStructuredError + std::fmt::Display>(
    result: Result<serde_json::Value, E>,
) -> Result<ExitCode> {
    Ok(emit(result, &mut std::io::stdout(), &mut std::io::stderr())?)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut log_config = LogConfig {
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        ..Default::default()
    };
    if let Some(dir) = args.log_dir {
        log_config.log_dir = dir;
    }
    let log_file = log_config.log_file();
    if let Err(e) = init_logging(log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return Err(e);
    }

    // An invalid restore window must not silently fall back to the default.
    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return emit_to_console(Err(e)),
    };
    let flags = config.flags.with_env_overrides(std::env::vars());

    let data_dir = args.data_dir.as_deref();
    let result = match args.command {
        Command::Hash { file, text } => hash_file(&file, text).await,
        Command::Flags => Ok(flags_json(flags)),
        Command::Delete { kind, id } => {
            record_action(data_dir, &config, kind, RecordAction::Delete(id)).await
        }
        Command::Restore { kind, id } => {
            record_action(data_dir, &config, kind, RecordAction::Restore(id)).await
        }
        Command::Status { kind, id } => {
            record_action(data_dir, &config, kind, RecordAction::Status(id)).await
        }
        Command::List {
            kind,
            include_deleted,
        } => record_action(data_dir, &config, kind, RecordAction::List { include_deleted }).await,
        Command::Purge { kind } => {
            record_action(data_dir, &config, kind, RecordAction::Purge).await
        }
    };

    emit_to_console(result)
}

async fn record_action(
    data_dir: Option<&Path>,
    config: &AppConfig,
    kind: EntityKind,
    action: RecordAction,
) -> Result<serde_json::Value, CommandError> {
    // Already validated by `load_config`; an explicit default keeps this total.
    let window = config.ledger.restore_window().unwrap_or_default();
    let data_dir = data_dir.map_or_else(|| config.ledger.data_dir(), Path::to_path_buf);
    debug!("Using data directory {}", data_dir.display());
    let ctx = Context {
        audit: Arc::new(AuditLog::open(&data_dir)),
        data_dir,
        window,
        clock: Arc::new(SystemClock),
    };
    run_record_action(&ctx, kind, action).await
}
