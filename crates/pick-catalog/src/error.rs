//! Error types for the catalog
//!
//! Provides error handling for:
//! - Blob and row store operations
//! - Image re-encoding (kept apart from storage failures)
//! - Per-file upload outcomes
//! - CSV ingestion
//! - Configuration loading

use pick_key::KeyError;
use std::path::PathBuf;

/// Errors from a blob or row store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Object or row not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Key cannot name an object in this store
    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),

    /// IO error against a filesystem-backed store
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Row (de)serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote store refused the request
    #[error("store rejected request: {0}")]
    Rejected(String),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors turning an uploaded file into a WebP image
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Bytes are not a recognizable image
    #[error("not an image file: {0}")]
    NotAnImage(String),

    /// Image could not be decoded (unsupported color model, corrupt data)
    #[error("image decode failed (unsupported color model or corrupt file): {0}")]
    Decode(String),

    /// WebP encoding failed
    #[error("webp encoding failed: {0}")]
    Encode(String),
}

/// Why a single file in a batch upload failed
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// File name cannot produce a key
    #[error("invalid file name: {0}")]
    InvalidFileName(#[from] KeyError),

    /// Image conversion failed
    #[error("image conversion failed: {0}")]
    Encode(#[from] EncodeError),

    /// Blob store write failed
    #[error("upload failed: {0}")]
    Store(#[from] StoreError),
}

impl UploadError {
    /// Check if the file itself was bad, as opposed to the store
    #[inline]
    #[must_use]
    pub fn is_encode_failure(&self) -> bool {
        matches!(self, Self::Encode(_))
    }
}

/// Errors during CSV ingestion
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// No header row
    #[error("csv file is empty")]
    EmptyFile,

    /// Required column absent from the header row
    #[error("missing required column: '{0}'")]
    MissingColumn(&'static str),

    /// Row store upsert failed
    #[error("row store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or type error
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Combined catalog error
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::InvalidKey("../x".to_string());
        assert_eq!(err.to_string(), "invalid storage key: '../x'");
    }

    #[test]
    fn encode_failure_is_distinguishable() {
        let encode: UploadError = EncodeError::Decode("cmyk".to_string()).into();
        let store: UploadError = StoreError::Rejected("quota".to_string()).into();
        assert!(encode.is_encode_failure());
        assert!(!store.is_encode_failure());
        assert!(encode.to_string().contains("image conversion failed"));
    }

    #[test]
    fn ingest_error_display() {
        let err = IngestError::MissingColumn("id");
        assert_eq!(err.to_string(), "missing required column: 'id'");
    }

    #[test]
    fn error_conversions() {
        let err: CatalogError = IngestError::EmptyFile.into();
        assert!(matches!(err, CatalogError::Ingest(_)));
    }
}
