//! ChickenPick catalog
//!
//! The I/O side around [`pick_key`]: blob and row stores, menu photo and logo
//! uploads, CSV ingestion, and display-time image resolution.
//!
//! # Architecture
//!
//! ```text
//! upload-images ──► derive_menu_key ──► WebpEncoder ──► BlobStore::put
//! upload-logos  ──► derive_logo_key ─────────────────► BlobStore::put
//! ingest        ──► CsvTable ──► MenuRecord ─────────► RowStore::upsert_menus
//! render        ──► candidates ──► KeyResolver ──► ImageProbe ──► DisplayImage
//! ```
//!
//! # Example
//!
//! ```rust
//! use pick_catalog::{CatalogConfig, InMemoryBlobStore, InMemoryRowStore, MenuIngest};
//! use std::sync::Arc;
//!
//! # tokio_test_block(async {
//! let config = CatalogConfig::new();
//! let blobs = Arc::new(InMemoryBlobStore::new(config.storage.clone()));
//! let rows = Arc::new(InMemoryRowStore::new());
//! let ingest = MenuIngest::new(blobs, rows.clone());
//!
//! let report = ingest.ingest_csv("id,brand_id\n양념치킨,bbq\n").await.unwrap();
//! assert_eq!(report.upserted, 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod brand;
pub mod config;
pub mod csv;
pub mod display;
pub mod encode;
pub mod error;
pub mod ingest;
pub mod menu;
pub mod rows;
pub mod storage;
pub mod upload;

pub use brand::{find_brand, menu_brands, BrandRecord, Placeholder, ALL_BRANDS_ID, BRANDS};
pub use config::{CatalogConfig, StorageConfig, ENV_BUCKET, ENV_STORAGE_URL};
pub use display::{
    brand_logo_candidates, menu_image_candidates, resolve_brand_logo, resolve_image,
    resolve_menu_image, BucketProbe, DisplayImage, ImageCandidate, ImageProbe,
};
pub use encode::{ImageEncoder, WebpEncoder};
pub use error::{
    CatalogError, CatalogResult, ConfigError, EncodeError, IngestError, StoreError, UploadError,
};
pub use ingest::{parse_menu_csv, IngestReport, MenuIngest};
pub use menu::{group_base_name, korean_part_name, ImageSource, MenuRecord, Metrics};
pub use rows::{InMemoryRowStore, JsonRowStore, RowStore};
pub use storage::{BlobStore, FsBlobStore, InMemoryBlobStore, StoredObject};
pub use upload::{AssetKind, AssetUploader, BatchReport, StoredAsset, UploadFailure, UploadFile};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
