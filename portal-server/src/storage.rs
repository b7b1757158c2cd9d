//! On-disk document store
//!
//! Holds partner licence documents and admin-uploaded stock files under a
//! single root directory. File names are always server-generated; client
//! names are only kept as metadata in the database.

use std::path::{Path, PathBuf};

use crate::util::random_token;

/// A stored document after a successful write
#[derive(Debug, Clone)]
pub struct StoredDocument {
    /// Server-generated file name (relative to the store root)
    pub file_name: String,
    /// Absolute path on disk
    #[allow(dead_code)]
    pub path: PathBuf,
    /// Size in bytes as verified after the write
    pub size: u64,
}

#[derive(Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Server-side name for an uploaded file: `{owner}-{token}.{ext}`.
    /// The extension is taken from the client name, lowercased.
    pub fn generated_name(owner_id: &str, original_name: &str) -> String {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| "bin".into());
        format!("{owner_id}-{}.{ext}", random_token())
    }

    /// Write `bytes` under `file_name`, then verify the file landed on
    /// disk with the expected size before reporting success.
    pub async fn store(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<StoredDocument> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(file_name);
        tokio::fs::write(&path, bytes).await?;

        let meta = tokio::fs::metadata(&path).await?;
        if meta.len() != bytes.len() as u64 {
            return Err(std::io::Error::other(format!(
                "Short write for {file_name}: expected {} bytes, found {}",
                bytes.len(),
                meta.len()
            )));
        }

        Ok(StoredDocument {
            file_name: file_name.to_string(),
            path,
            size: meta.len(),
        })
    }

    /// Open a stored file for streaming, returning the handle and its size.
    pub async fn open(&self, file_name: &str) -> std::io::Result<(tokio::fs::File, u64)> {
        let path = self.root.join(file_name);
        let file = tokio::fs::File::open(&path).await?;
        let size = file.metadata().await?.len();
        Ok((file, size))
    }

    pub async fn remove(&self, file_name: &str) -> std::io::Result<()> {
        tokio::fs::remove_file(self.root.join(file_name)).await
    }

    #[allow(dead_code)]
    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_name_shape() {
        let name = DocumentStore::generated_name("u-42", "Alvará Municipal.PDF");
        assert!(name.starts_with("u-42-"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_generated_name_without_extension() {
        let name = DocumentStore::generated_name("u-42", "licence");
        assert!(name.ends_with(".bin"));
    }

    #[tokio::test]
    async fn test_store_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        let stored = store.store("a-1.pdf", b"hello").await.unwrap();
        assert_eq!(stored.size, 5);
        assert!(stored.path.exists());

        let (_, size) = store.open("a-1.pdf").await.unwrap();
        assert_eq!(size, 5);

        store.remove("a-1.pdf").await.unwrap();
        assert!(store.open("a-1.pdf").await.is_err());
    }

    #[tokio::test]
    async fn test_store_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("nested/uploads"));
        store.store("b-1.png", &[0u8; 16]).await.unwrap();
        assert!(store.path_of("b-1.png").exists());
    }
}
