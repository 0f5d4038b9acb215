//! In-memory store

use crate::error::StoreError;
use crate::store::{AccessStore, Version, Versioned};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Access files held in a map, keyed by namespace path
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a file unconditionally
    pub async fn put(&self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.lock().await.insert(path.into(), bytes.into());
    }

    /// Current contents of a file, if any
    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().await.get(path).cloned()
    }
}

#[async_trait]
impl AccessStore for MemoryStore {
    async fn fetch(&self, path: &str) -> Result<Versioned, StoreError> {
        self.get(path)
            .await
            .map(Versioned::new)
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_string(),
            })
    }

    async fn store_if_unchanged(
        &self,
        path: &str,
        bytes: &[u8],
        expected: Version,
    ) -> Result<Version, StoreError> {
        let mut files = self.files.lock().await;
        let current = files.get(path).ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })?;
        if Version::of(current) != expected {
            return Err(StoreError::Conflict {
                path: path.to_string(),
            });
        }
        files.insert(path.to_string(), bytes.to_vec());
        Ok(Version::of(bytes))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
