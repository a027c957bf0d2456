mod atomic;
mod hash;
mod lock;

pub use atomic::atomic_write;
pub use hash::{
    compute_bytes_hash, compute_file_hash, compute_hash, compute_text_hash,
    normalize_text_for_hash,
};
pub use lock::{lock_exclusive, lock_path_for, FileLock};

use std::path::{Path, PathBuf};

/// The name of the per-user application folder
pub const APP_FOLDER: &str = ".vendor-ledger";

/// Get the per-user application folder (`~/.vendor-ledger`)
#[must_use]
pub fn app_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_FOLDER)
}

/// Expand a leading `~/` to the home directory.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
#[path = "../utils_tests.rs"]
mod utils_tests;
