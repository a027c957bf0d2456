//! Atomic file writes.
//!
//! The temp file is created next to the target so the final rename stays on
//! one filesystem. It is removed automatically if any step fails.

use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `content` to `path` atomically: readers see either the old file or
/// the complete new one, never a partial write.
///
/// Missing parent directories are created.
pub async fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no parent directory"))?
        .to_path_buf();
    tokio::fs::create_dir_all(&parent).await?;

    let target_path = path.to_path_buf();
    let content_owned = content.to_string();

    tokio::task::spawn_blocking(move || -> io::Result<()> {
        use std::io::Write;

        let mut temp_file = NamedTempFile::new_in(&parent)?;
        temp_file.write_all(content_owned.as_bytes())?;
        temp_file.flush()?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&target_path)?;
        Ok(())
    })
    .await
    .map_err(io::Error::other)?
}
