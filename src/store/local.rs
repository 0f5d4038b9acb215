//! Local filesystem store
//!
//! Maps namespace paths onto files below a root directory.

use crate::access::names;
use crate::error::StoreError;
use crate::store::{AccessStore, Version, Versioned};
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Access files kept under a local directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a namespace path to a file below the root.
    ///
    /// Path validation rejects `.`/`..` and empty components, so the result
    /// cannot escape the root.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        names::validate_path(path).map_err(|reason| StoreError::InvalidPath {
            path: path.to_string(),
            reason,
        })?;
        Ok(path.split('/').fold(self.root.clone(), |acc, c| acc.join(c)))
    }

    async fn read(&self, path: &str, file: &Path) -> Result<Vec<u8>, StoreError> {
        tokio::fs::read(file).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound {
                path: path.to_string(),
            },
            _ => io_error(path, e),
        })
    }
}

/// Replace `file` with `bytes` through a uniquely named temp file in the same
/// directory, so readers never see a partial file. The temp file is removed
/// if any step fails.
async fn write_atomically(file: PathBuf, bytes: Vec<u8>) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let dir = file.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&file).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(std::io::Error::other)?
}

fn io_error(path: &str, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_string(),
        source,
    }
}

#[async_trait]
impl AccessStore for LocalStore {
    async fn fetch(&self, path: &str) -> Result<Versioned, StoreError> {
        let file = self.resolve(path)?;
        let bytes = self.read(path, &file).await?;
        debug!(path, file = %file.display(), len = bytes.len(), "Fetched");
        Ok(Versioned::new(bytes))
    }

    async fn store_if_unchanged(
        &self,
        path: &str,
        bytes: &[u8],
        expected: Version,
    ) -> Result<Version, StoreError> {
        let file = self.resolve(path)?;

        let current = self.read(path, &file).await?;
        if Version::of(&current) != expected {
            return Err(StoreError::Conflict {
                path: path.to_string(),
            });
        }

        write_atomically(file.clone(), bytes.to_vec())
            .await
            .map_err(|e| io_error(path, e))?;

        debug!(path, file = %file.display(), len = bytes.len(), "Stored");
        Ok(Version::of(bytes))
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PATH: &str = "me@example.com/photos/Access";

    async fn seeded(contents: &[u8]) -> (tempfile::TempDir, LocalStore) {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let file = store.resolve(PATH).unwrap();
        tokio::fs::create_dir_all(file.parent().unwrap()).await.unwrap();
        tokio::fs::write(&file, contents).await.unwrap();
        (dir, store)
    }

    #[test]
    fn test_resolve() {
        let store = LocalStore::new("/srv/upspin");
        assert_eq!(
            store.resolve(PATH).unwrap(),
            PathBuf::from("/srv/upspin/me@example.com/photos/Access")
        );
        assert!(matches!(
            store.resolve("me@example.com/../../etc/passwd"),
            Err(StoreError::InvalidPath { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_and_store() {
        let (_dir, store) = seeded(b"read: ann@example.com\n").await;

        let current = store.fetch(PATH).await.unwrap();
        assert_eq!(current.bytes, b"read: ann@example.com\n");

        let version = store
            .store_if_unchanged(PATH, b"read:\n", current.version)
            .await
            .unwrap();
        let after = store.fetch(PATH).await.unwrap();
        assert_eq!(after.bytes, b"read:\n");
        assert_eq!(after.version, version);
    }

    #[tokio::test]
    async fn test_store_conflict() {
        let (_dir, store) = seeded(b"read: ann@example.com\n").await;

        let stale = store.fetch(PATH).await.unwrap();
        store
            .store_if_unchanged(PATH, b"read: bob@example.com\n", stale.version)
            .await
            .unwrap();

        let result = store
            .store_if_unchanged(PATH, b"read:\n", stale.version)
            .await;
        assert!(matches!(result, Err(StoreError::Conflict { .. })));
    }

    async fn entries(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        let mut read = tokio::fs::read_dir(dir).await.unwrap();
        while let Some(entry) = read.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_store_leaves_no_temp_files() {
        let (dir, store) = seeded(b"read: ann@example.com\n").await;
        let parent = dir.path().join("me@example.com/photos");

        let seen = Version::of(b"read: ann@example.com\n");

        let (a, b) = tokio::join!(
            store.store_if_unchanged(PATH, b"read: bob@example.com\n", seen),
            store.store_if_unchanged(PATH, b"read: carl@example.com\n", seen),
        );
        assert!(a.is_ok() || b.is_ok());
        assert_eq!(entries(&parent).await, vec!["Access"]);
    }

    #[tokio::test]
    async fn test_failed_replace_removes_temp_file() {
        let dir = tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let target = dir.path().join("Access");
        tokio::fs::create_dir_all(target.join("inner")).await.unwrap();

        let result = write_atomically(target, b"read:\n".to_vec()).await;
        assert!(result.is_err());
        assert_eq!(entries(dir.path()).await, vec!["Access"]);
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(matches!(
            store.fetch(PATH).await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
