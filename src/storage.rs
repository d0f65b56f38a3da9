use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::Rng;

/// Filesystem-backed store for uploaded logos and verification documents.
/// `store` returns an opaque reference that `delete` later accepts; callers
/// persist only the reference.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn store(&self, bytes: &[u8], original_name: &str) -> anyhow::Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .context("Failed to create upload directory")?;
        let suffix: u32 = rand::rng().random();
        let reference = format!(
            "{}-{:08x}-{}",
            chrono::Utc::now().timestamp_millis(),
            suffix,
            sanitize(original_name)
        );
        tokio::fs::write(self.root.join(&reference), bytes)
            .await
            .with_context(|| format!("Failed to write uploaded file {reference}"))?;
        log::debug!("Stored uploaded file {reference}");
        Ok(reference)
    }

    /// Deleting a reference that no longer exists is not an error.
    pub async fn delete(&self, reference: &str) -> anyhow::Result<()> {
        match tokio::fs::remove_file(self.root.join(reference)).await {
            Ok(()) => {
                log::debug!("Deleted stored file {reference}");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("Failed to delete stored file {reference}")),
        }
    }

    pub fn path_of(&self, reference: &str) -> PathBuf {
        self.root.join(reference)
    }
}

/// Keeps only the final path component and characters safe for a filename.
fn sanitize(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_deletes_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let reference = store.store(b"logo-bytes", "logo.png").await.unwrap();
        assert!(store.path_of(&reference).exists());
        assert!(reference.ends_with("logo.png"));

        store.delete(&reference).await.unwrap();
        assert!(!store.path_of(&reference).exists());
        // Double delete is a no-op.
        store.delete(&reference).await.unwrap();
    }

    #[tokio::test]
    async fn sanitizes_path_traversal_in_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let reference = store.store(b"x", "../../etc/passwd").await.unwrap();
        assert!(!reference.contains("/"));
        assert!(store.path_of(&reference).exists());
    }
}
