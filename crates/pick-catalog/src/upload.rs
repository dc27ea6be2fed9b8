//! Menu photo and logo uploads
//!
//! Each file gets its key from its name alone, so re-uploading the same
//! file name overwrites the same object. Batches run one file at a time and
//! collect per-file failures instead of stopping.

use crate::encode::{ImageEncoder, WebpEncoder};
use crate::error::{EncodeError, UploadError};
use crate::storage::{BlobStore, SVG_CONTENT_TYPE, WEBP_CONTENT_TYPE};
use pick_key::{derive_logo_key, derive_menu_key_for_file, StorageKey};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A file as picked by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original file name, extension included
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Create from name and contents
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Which upload flow a file went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Menu,
    Logo,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Menu => write!(f, "menu"),
            Self::Logo => write!(f, "logo"),
        }
    }
}

/// A file that made it into the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredAsset {
    pub file_name: String,
    pub key: StorageKey,
    pub url: String,
}

/// A file that did not
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadFailure {
    pub kind: AssetKind,
    pub file_name: String,
    pub message: String,
    /// The file could not be converted, as opposed to a store failure
    pub encode_failure: bool,
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.file_name, self.message)
    }
}

/// Outcome of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub stored: Vec<StoredAsset>,
    pub failures: Vec<UploadFailure>,
}

impl BatchReport {
    /// Number of stored files
    #[inline]
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.stored.len()
    }

    /// Number of failed files
    #[inline]
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Check if every file was stored
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: Self) {
        self.stored.extend(other.stored);
        self.failures.extend(other.failures);
    }

    fn record(&mut self, kind: AssetKind, file_name: String, result: Result<StoredAsset, UploadError>) {
        match result {
            Ok(asset) => {
                tracing::info!(%kind, file = %asset.file_name, key = %asset.key, "uploaded");
                self.stored.push(asset);
            }
            Err(e) => {
                let failure = UploadFailure {
                    kind,
                    encode_failure: e.is_encode_failure(),
                    message: e.to_string(),
                    file_name,
                };
                tracing::warn!("{failure}");
                self.failures.push(failure);
            }
        }
    }
}

/// Writes operator files into a [`BlobStore`]
pub struct AssetUploader {
    store: Arc<dyn BlobStore>,
    encoder: Arc<dyn ImageEncoder>,
}

impl fmt::Debug for AssetUploader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetUploader").finish_non_exhaustive()
    }
}

impl AssetUploader {
    /// Uploader re-encoding menu photos to WebP
    #[must_use]
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self::with_encoder(store, Arc::new(WebpEncoder))
    }

    /// Uploader with a custom menu photo encoder
    #[must_use]
    pub fn with_encoder(store: Arc<dyn BlobStore>, encoder: Arc<dyn ImageEncoder>) -> Self {
        Self { store, encoder }
    }

    /// Re-encode one menu photo and store it under its derived key
    ///
    /// # Errors
    /// Returns error if conversion or the store write fails
    pub async fn upload_menu_image(&self, file: UploadFile) -> Result<StoredAsset, UploadError> {
        let key = derive_menu_key_for_file(&file.name);
        let encoder = Arc::clone(&self.encoder);
        let content_type = encoder.content_type();
        let bytes = tokio::task::spawn_blocking(move || encoder.encode(&file.bytes))
            .await
            .map_err(|e| EncodeError::Encode(e.to_string()))??;
        self.store.put(&key, bytes, content_type).await?;
        Ok(StoredAsset {
            url: self.store.public_url(&key),
            file_name: file.name,
            key,
        })
    }

    /// Store one logo as-is under its derived key
    ///
    /// # Errors
    /// Returns error if the file name has no extension or the write fails
    pub async fn upload_logo(&self, file: UploadFile) -> Result<StoredAsset, UploadError> {
        let key = derive_logo_key(&file.name)?;
        let content_type = logo_content_type(key.extension().unwrap_or_default());
        self.store.put(&key, file.bytes, content_type).await?;
        Ok(StoredAsset {
            url: self.store.public_url(&key),
            file_name: file.name,
            key,
        })
    }

    /// Upload menu photos one by one
    pub async fn upload_menu_images(&self, files: Vec<UploadFile>) -> BatchReport {
        let mut report = BatchReport::default();
        for file in files {
            let name = file.name.clone();
            let result = self.upload_menu_image(file).await;
            report.record(AssetKind::Menu, name, result);
        }
        report
    }

    /// Upload logos one by one
    pub async fn upload_logos(&self, files: Vec<UploadFile>) -> BatchReport {
        let mut report = BatchReport::default();
        for file in files {
            let name = file.name.clone();
            let result = self.upload_logo(file).await;
            report.record(AssetKind::Logo, name, result);
        }
        report
    }
}

/// Content type for a (lowercase) logo extension
#[must_use]
pub fn logo_content_type(extension: &str) -> &'static str {
    match extension {
        "svg" => SVG_CONTENT_TYPE,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => WEBP_CONTENT_TYPE,
        _ => "application/octet-stream",
    }
}
