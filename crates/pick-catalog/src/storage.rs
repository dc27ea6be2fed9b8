//! Blob stores
//!
//! Object storage for menu photos and logos, keyed by [`StorageKey`].
//! Writes are upserts: an existing object under the same key is replaced.

use crate::config::StorageConfig;
use crate::error::StoreError;
use dashmap::DashMap;
use pick_key::StorageKey;
use std::path::{Path, PathBuf};

/// Content type of re-encoded menu photos
pub const WEBP_CONTENT_TYPE: &str = "image/webp";

/// Content type of SVG logos
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Object storage seam
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` under `key`, replacing any existing object
    async fn put(&self, key: &StorageKey, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StoreError>;

    /// Check whether an object exists under `key`
    async fn contains(&self, key: &StorageKey) -> Result<bool, StoreError>;

    /// Public URL of `key`; does not check existence
    fn public_url(&self, key: &StorageKey) -> String;
}

/// Stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-memory blob store
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    config: StorageConfig,
    objects: DashMap<StorageKey, StoredObject>,
}

impl InMemoryBlobStore {
    /// Create an empty store publishing under `config`
    #[must_use]
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            objects: DashMap::new(),
        }
    }

    /// Copy of the object under `key`
    #[must_use]
    pub fn get(&self, key: &StorageKey) -> Option<StoredObject> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }

    /// Number of stored objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Stored keys, sorted
    #[must_use]
    pub fn keys(&self) -> Vec<StorageKey> {
        let mut keys: Vec<_> = self.objects.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

#[async_trait::async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        check_key(key)?;
        self.objects.insert(
            key.clone(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn contains(&self, key: &StorageKey) -> Result<bool, StoreError> {
        Ok(self.objects.contains_key(key))
    }

    fn public_url(&self, key: &StorageKey) -> String {
        self.config.public_url(key)
    }
}

/// Blob store over a local directory, one file per key
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    config: StorageConfig,
}

impl FsBlobStore {
    /// Store objects under `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: StorageConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Directory holding the objects
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`
    ///
    /// # Errors
    /// Returns error if `key` is not a single path segment
    pub fn object_path(&self, key: &StorageKey) -> Result<PathBuf, StoreError> {
        check_key(key)?;
        Ok(self.root.join(key.as_str()))
    }
}

#[async_trait::async_trait]
impl BlobStore for FsBlobStore {
    async fn put(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StoreError> {
        let path = self.object_path(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::io_error(&self.root, e))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StoreError::io_error(&path, e))?;
        tracing::debug!(key = %key, path = %path.display(), "stored object");
        Ok(())
    }

    async fn contains(&self, key: &StorageKey) -> Result<bool, StoreError> {
        let path = self.object_path(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::io_error(&path, e))
    }

    fn public_url(&self, key: &StorageKey) -> String {
        self.config.public_url(key)
    }
}

/// Keys must be a single, non-hidden path segment
fn check_key(key: &StorageKey) -> Result<(), StoreError> {
    let s = key.as_str();
    if s.is_empty() || s.starts_with('.') || s.contains(['/', '\\']) {
        return Err(StoreError::InvalidKey(s.to_string()));
    }
    Ok(())
}
