//! Access file storage
//!
//! The read-modify-write cycle needs two things from storage: the current
//! bytes of a file together with a version token, and a write that only
//! succeeds if the file still has that version. Versions are content
//! fingerprints, so any concurrent change to the bytes is detected.

mod local;
mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
// async_trait required for dyn-compatibility with &dyn AccessStore
use async_trait::async_trait;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Version token of a stored file, taken at fetch time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version(u64);

impl Version {
    /// Fingerprint the given file contents
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Version(hasher.finish())
    }
}

/// File contents together with the version they were read at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned {
    pub bytes: Vec<u8>,
    pub version: Version,
}

impl Versioned {
    pub fn new(bytes: Vec<u8>) -> Self {
        let version = Version::of(&bytes);
        Self { bytes, version }
    }
}

/// Storage for Access files, addressed by namespace path
#[async_trait]
pub trait AccessStore: Send + Sync {
    /// Fetch the current contents of `path`
    async fn fetch(&self, path: &str) -> Result<Versioned, StoreError>;

    /// Replace the contents of `path` with `bytes` if it is still at
    /// `expected`. Returns the new version, or `StoreError::Conflict` if the
    /// file changed since it was fetched.
    async fn store_if_unchanged(
        &self,
        path: &str,
        bytes: &[u8],
        expected: Version,
    ) -> Result<Version, StoreError>;

    /// Short description of the backend (for logging)
    fn backend(&self) -> &'static str;
}
