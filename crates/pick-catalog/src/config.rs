//! Catalog configuration
//!
//! [`CatalogConfig`] is built once at start-up and handed to the stores.
//! It loads from TOML and accepts environment overrides.

use crate::error::ConfigError;
use pick_key::StorageKey;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`StorageConfig::base_url`]
pub const ENV_STORAGE_URL: &str = "CHICKENPICK_STORAGE_URL";

/// Environment variable overriding [`StorageConfig::bucket`]
pub const ENV_BUCKET: &str = "CHICKENPICK_BUCKET";

/// Default image bucket
pub const DEFAULT_BUCKET: &str = "chicken-images";

/// Default menu table
pub const DEFAULT_MENU_TABLE: &str = "menus";

/// Object storage location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage service origin, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Public bucket holding menu photos and logos
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

impl StorageConfig {
    /// Public URL of `key`
    ///
    /// Pure string construction; no existence check.
    #[must_use]
    pub fn public_url(&self, key: &StorageKey) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            key
        )
    }
}

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Object storage location
    pub storage: StorageConfig,
    /// Table menu rows are upserted into
    pub menu_table: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            menu_table: DEFAULT_MENU_TABLE.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With storage base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.storage.base_url = base_url.into();
        self
    }

    /// With bucket name
    #[inline]
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.storage.bucket = bucket.into();
        self
    }

    /// Parse from TOML text; missing fields take defaults
    ///
    /// # Errors
    /// Returns error on TOML errors or invalid values
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from a variable lookup
    ///
    /// # Errors
    /// Returns error if an override makes the config invalid
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_STORAGE_URL) {
            self.storage.base_url = url;
        }
        if let Some(bucket) = lookup(ENV_BUCKET) {
            self.storage.bucket = bucket;
        }
        self.validate()?;
        Ok(self)
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    /// Returns error if an override makes the config invalid
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns error for an empty base URL or a bucket name that is empty or
    /// contains `/`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.base_url is empty".to_string()));
        }
        if self.storage.bucket.is_empty() || self.storage.bucket.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "storage.bucket '{}' must be a single path segment",
                self.storage.bucket
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_layout() {
        let storage = StorageConfig {
            base_url: "https://demo.supabase.co/".to_string(),
            bucket: "chicken-images".to_string(),
        };
        let key = StorageKey::from_raw("brand_bbq.svg");
        assert_eq!(
            storage.public_url(&key),
            "https://demo.supabase.co/storage/v1/object/public/chicken-images/brand_bbq.svg"
        );
    }

    #[test]
    fn toml_defaults_fill_missing_fields() {
        let config = CatalogConfig::from_toml_str("[storage]\nbase_url = \"https://x.co\"\n").unwrap();
        assert_eq!(config.storage.bucket, DEFAULT_BUCKET);
        assert_eq!(config.menu_table, DEFAULT_MENU_TABLE);
    }

    #[test]
    fn overrides_apply() {
        let config = CatalogConfig::new()
            .with_overrides(|name| match name {
                ENV_BUCKET => Some("logos".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.storage.bucket, "logos");
    }

    #[test]
    fn invalid_bucket_rejected() {
        let err = CatalogConfig::new().with_bucket("a/b").validate();
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn invalid_toml_rejected() {
        assert!(matches!(
            CatalogConfig::from_toml_str("storage = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
