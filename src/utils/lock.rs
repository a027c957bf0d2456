//! Exclusive advisory locks shared between processes.
//!
//! Data files are rewritten whole, so every read-decide-write on them must
//! hold the lock on the file's `.lock` sibling. The OS releases the lock when
//! the guard's handle is closed, including when the process dies.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Held exclusive lock; released on drop.
#[derive(Debug)]
pub struct FileLock {
    _file: File,
}

/// Path of the lock file guarding `path` (`vendors.json` -> `vendors.json.lock`).
#[must_use]
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    path.with_file_name(name)
}

/// Block until the exclusive lock on `lock_path` is ours.
///
/// Waiting happens on the blocking pool so a holder on the same runtime can
/// still make progress. Missing parent directories are created.
pub async fn lock_exclusive(lock_path: &Path) -> io::Result<FileLock> {
    let lock_path = lock_path.to_path_buf();
    tokio::task::spawn_blocking(move || -> io::Result<FileLock> {
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock()?;
        Ok(FileLock { _file: file })
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_lock_path_is_a_sibling() {
        let path = Path::new("/data/vendors.json");
        assert_eq!(lock_path_for(path), PathBuf::from("/data/vendors.json.lock"));
    }

    #[tokio::test]
    async fn test_lock_creates_missing_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.json.lock");
        let _guard = lock_exclusive(&path).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_second_handle_waits_for_release() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vendors.json.lock");
        let first = lock_exclusive(&path).await.unwrap();

        let acquired = Arc::new(AtomicBool::new(false));
        let waiter = {
            let path = path.clone();
            let acquired = Arc::clone(&acquired);
            tokio::spawn(async move {
                let _second = lock_exclusive(&path).await.unwrap();
                acquired.store(true, Ordering::SeqCst);
            })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!acquired.load(Ordering::SeqCst));

        drop(first);
        waiter.await.unwrap();
        assert!(acquired.load(Ordering::SeqCst));
    }
}
