//! Menu row stores
//!
//! Rows are keyed by menu id. [`RowStore::upsert_menus`] replaces whole rows
//! in one call so a batch either lands or reports one error.

use crate::error::StoreError;
use crate::menu::MenuRecord;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Menu table seam
#[async_trait::async_trait]
pub trait RowStore: Send + Sync {
    /// Insert or replace rows by id
    async fn upsert_menus(&self, records: Vec<MenuRecord>) -> Result<usize, StoreError>;

    /// Rows for `brand`, or every row when `None`, ordered by id
    async fn select_menus(&self, brand: Option<&str>) -> Result<Vec<MenuRecord>, StoreError>;

    /// Set the stored image URL of one row
    async fn update_image_url(&self, id: &str, url: &str) -> Result<(), StoreError>;
}

/// In-memory row store
#[derive(Debug, Default)]
pub struct InMemoryRowStore {
    rows: RwLock<BTreeMap<String, MenuRecord>>,
}

impl InMemoryRowStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of one row
    #[must_use]
    pub fn get(&self, id: &str) -> Option<MenuRecord> {
        self.rows.read().get(id).cloned()
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait::async_trait]
impl RowStore for InMemoryRowStore {
    async fn upsert_menus(&self, records: Vec<MenuRecord>) -> Result<usize, StoreError> {
        let mut rows = self.rows.write();
        let count = records.len();
        for record in records {
            rows.insert(record.id.clone(), record);
        }
        Ok(count)
    }

    async fn select_menus(&self, brand: Option<&str>) -> Result<Vec<MenuRecord>, StoreError> {
        Ok(select(&self.rows.read(), brand))
    }

    async fn update_image_url(&self, id: &str, url: &str) -> Result<(), StoreError> {
        let mut rows = self.rows.write();
        let row = rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        row.image_url = Some(url.to_string());
        Ok(())
    }
}

/// Row store persisted as one JSON array file
///
/// The whole table is read and rewritten per call; meant for local
/// catalogs and admin dry runs.
#[derive(Debug)]
pub struct JsonRowStore {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl JsonRowStore {
    /// Use the table file at `path`; a missing file is an empty table
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Table file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, MenuRecord>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::io_error(&self.path, e)),
        };
        let records: Vec<MenuRecord> = serde_json::from_slice(&bytes)?;
        Ok(records.into_iter().map(|r| (r.id.clone(), r)).collect())
    }

    async fn save(&self, rows: &BTreeMap<String, MenuRecord>) -> Result<(), StoreError> {
        let records: Vec<&MenuRecord> = rows.values().collect();
        let json = serde_json::to_vec_pretty(&records)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io_error(parent, e))?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::io_error(&self.path, e))
    }
}

#[async_trait::async_trait]
impl RowStore for JsonRowStore {
    async fn upsert_menus(&self, records: Vec<MenuRecord>) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let mut rows = self.load().await?;
        let count = records.len();
        for record in records {
            rows.insert(record.id.clone(), record);
        }
        self.save(&rows).await?;
        tracing::debug!(path = %self.path.display(), count, "upserted menu rows");
        Ok(count)
    }

    async fn select_menus(&self, brand: Option<&str>) -> Result<Vec<MenuRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(select(&self.load().await?, brand))
    }

    async fn update_image_url(&self, id: &str, url: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut rows = self.load().await?;
        let row = rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        row.image_url = Some(url.to_string());
        self.save(&rows).await
    }
}

fn select(rows: &BTreeMap<String, MenuRecord>, brand: Option<&str>) -> Vec<MenuRecord> {
    rows.values()
        .filter(|r| brand.map_or(true, |b| r.brand.eq_ignore_ascii_case(b)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let store = InMemoryRowStore::new();
        let mut first = MenuRecord::new("양념치킨", "bbq");
        first.price = 18000;
        store.upsert_menus(vec![first.clone()]).await.unwrap();
        first.price = 19000;
        store.upsert_menus(vec![first]).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("양념치킨").unwrap().price, 19000);
    }

    #[tokio::test]
    async fn select_filters_brand() {
        let store = InMemoryRowStore::new();
        store
            .upsert_menus(vec![MenuRecord::new("a", "bbq"), MenuRecord::new("b", "bhc")])
            .await
            .unwrap();
        let bbq = store.select_menus(Some("BBQ")).await.unwrap();
        assert_eq!(bbq.len(), 1);
        assert_eq!(bbq[0].id, "a");
        assert_eq!(store.select_menus(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let store = InMemoryRowStore::new();
        let err = store.update_image_url("nope", "u").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
