//! Testing utilities for the ChickenPick workspace
//!
//! Scripted probes, failing stores, and fixtures.

#![allow(missing_docs)]

use parking_lot::Mutex;
use pick_catalog::{
    BlobStore, ImageCandidate, ImageProbe, MenuRecord, StorageConfig, StoreError,
};
use pick_key::{LoadOutcome, StorageKey};
use std::collections::HashSet;
use std::io::Cursor;

/// Menu CSV in the shape operators export
pub const SAMPLE_MENU_CSV: &str = "\u{feff}id,brand_id,name_kr,name_en,price,spicy,crunch,sweet,garlic,tags,desc_text,desc_en\r\n\
황금올리브치킨,bbq,황금올리브치킨,Golden Olive,\"23,000\",★,★★★★,★,0,\"Whole, Boneless\",\"바삭한 \"\"올리브\"\" 치킨\",Crispy olive chicken\r\n\
양념치킨,bbq,양념치킨,Seasoned,\"21,500\",★★★,★★,★★★★,,Whole,,\r\n\
교촌 허니콤보,kyochon,허니콤보,Honey Combo,23000,1,3,5,2,Combo,\"달콤, 짭짤\",\r\n\
,bbq,빈 행,Blank,0,,,,,,,\r\n";

/// Probe that loads only scripted URLs and records every attempt
#[derive(Debug, Default)]
pub struct ScriptedProbe {
    available: HashSet<String>,
    attempts: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    /// Probe where only `urls` load
    pub fn loading<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available: urls.into_iter().map(Into::into).collect(),
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Probe where nothing loads
    pub fn failing() -> Self {
        Self::default()
    }

    /// URLs attempted so far, in order
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().clone()
    }
}

#[async_trait::async_trait]
impl ImageProbe for ScriptedProbe {
    async fn load(&self, candidate: &ImageCandidate) -> LoadOutcome {
        self.attempts.lock().push(candidate.url.clone());
        if self.available.contains(&candidate.url) {
            LoadOutcome::Loaded
        } else {
            LoadOutcome::Failed
        }
    }
}

/// Blob store that rejects every write whose key is in a deny list
#[derive(Debug, Default)]
pub struct FailingBlobStore {
    config: StorageConfig,
    deny: HashSet<StorageKey>,
    deny_all: bool,
}

impl FailingBlobStore {
    /// Reject every write
    pub fn always() -> Self {
        Self {
            deny_all: true,
            ..Self::default()
        }
    }

    /// Reject writes to `keys`
    pub fn denying<I: IntoIterator<Item = StorageKey>>(keys: I) -> Self {
        Self {
            deny: keys.into_iter().collect(),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for FailingBlobStore {
    async fn put(
        &self,
        key: &StorageKey,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StoreError> {
        if self.deny_all || self.deny.contains(key) {
            return Err(StoreError::Rejected(format!("write to {key} refused")));
        }
        Ok(())
    }

    async fn contains(&self, _key: &StorageKey) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn public_url(&self, key: &StorageKey) -> String {
        self.config.public_url(key)
    }
}

/// Small RGB gradient encoded as PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png fixture");
    out.into_inner()
}

/// Minimal SVG logo
pub fn svg_logo(label: &str) -> Vec<u8> {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"64\" height=\"64\"><text x=\"8\" y=\"40\">{label}</text></svg>"
    )
    .into_bytes()
}

/// Menu row without an image URL
pub fn sample_record(id: &str, brand: &str) -> MenuRecord {
    let mut record = MenuRecord::new(id, brand);
    record.name_kr = id.to_string();
    record.price = 20000;
    record
}
