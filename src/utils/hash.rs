use regex::Regex;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::LazyLock;
use tokio::fs;

/// Anything that is not an ASCII word char, whitespace, `/`, `-` or `.`.
#[expect(
    clippy::expect_used,
    reason = "Regex literal is compile-time constant and cannot fail"
)]
static NON_HASHABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_\s/\-.]").expect("NON_HASHABLE is a valid regex literal")
});

#[expect(
    clippy::expect_used,
    reason = "Regex literal is compile-time constant and cannot fail"
)]
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN is a valid regex literal"));

/// Compute SHA-256 hash of a string
#[must_use]
pub fn compute_hash(content: &str) -> String {
    compute_bytes_hash(content.as_bytes())
}

/// Compute SHA-256 hash of raw bytes
#[must_use]
pub fn compute_bytes_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Compute SHA-256 hash of a file's contents.
///
/// Reads raw bytes, so binary uploads (PDFs) hash the same as their buffer.
pub async fn compute_file_hash(path: &Path) -> Result<String, std::io::Error> {
    let content = fs::read(path).await?;
    Ok(compute_bytes_hash(&content))
}

/// Normalize extracted invoice text so that cosmetic differences do not
/// change its hash: uppercase, punctuation other than `/-.` replaced by
/// spaces, whitespace collapsed, ends trimmed.
#[must_use]
pub fn normalize_text_for_hash(text: &str) -> String {
    let upper = text.to_uppercase();
    let stripped = NON_HASHABLE.replace_all(&upper, " ");
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

/// Hash of the normalized form of `text`.
#[must_use]
pub fn compute_text_hash(text: &str) -> String {
    compute_hash(&normalize_text_for_hash(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_hash() {
        let hash = compute_hash("hello world");
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_compute_hash_empty() {
        let hash = compute_hash("");
        // SHA-256 of empty string
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_bytes_and_text_hash_agree() {
        assert_eq!(compute_bytes_hash(b"hello world"), compute_hash("hello world"));
    }

    #[test]
    fn test_compute_hash_length() {
        let hash = compute_hash("any content");
        assert_eq!(hash.len(), 64); // SHA-256 hex = 64 chars
    }

    #[test]
    fn test_normalize_uppercases_and_collapses() {
        assert_eq!(
            normalize_text_for_hash("  Invoice #123,\n\tdue  03/15/2024 "),
            "INVOICE 123 DUE 03/15/2024"
        );
    }

    #[test]
    fn test_normalize_keeps_slash_dash_dot() {
        assert_eq!(normalize_text_for_hash("a-b/c.d"), "A-B/C.D");
    }

    #[test]
    fn test_normalize_strips_currency_and_parens() {
        assert_eq!(normalize_text_for_hash("Total: ($1,250.00)"), "TOTAL 1 250.00");
    }

    #[test]
    fn test_text_hash_ignores_cosmetic_differences() {
        assert_eq!(
            compute_text_hash("Acme Corp.  total: 10"),
            compute_text_hash("ACME CORP. TOTAL 10")
        );
    }

    #[tokio::test]
    async fn test_compute_file_hash() {
        use tempfile::tempdir;

        let temp_dir = tempdir().expect("Should create temp dir");
        let file_path = temp_dir.path().join("test.txt");
        tokio::fs::write(&file_path, "hello world")
            .await
            .expect("Should write");

        let hash = compute_file_hash(&file_path).await.expect("Should hash");
        assert_eq!(hash, compute_hash("hello world"));
    }

    #[tokio::test]
    async fn test_compute_file_hash_binary() {
        use tempfile::tempdir;

        let temp_dir = tempdir().expect("Should create temp dir");
        let file_path = temp_dir.path().join("scan.pdf");
        let bytes = [0x25_u8, 0x50, 0x44, 0x46, 0xff, 0x00];
        tokio::fs::write(&file_path, bytes).await.expect("Should write");

        let hash = compute_file_hash(&file_path).await.expect("Should hash");
        assert_eq!(hash, compute_bytes_hash(&bytes));
    }

    #[tokio::test]
    async fn test_compute_file_hash_nonexistent() {
        let result = compute_file_hash(Path::new("/nonexistent/file.txt")).await;
        assert!(result.is_err());
    }
}
