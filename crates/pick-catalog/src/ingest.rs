//! CSV menu ingestion
//!
//! Turns a spreadsheet export into [`MenuRecord`]s, points each row's
//! `image_url` at the bucket key its photo is uploaded under, and upserts the
//! whole file in one row store call.

use crate::csv::{parse_level, parse_price, parse_tags, CsvRow, CsvTable};
use crate::error::IngestError;
use crate::menu::{Metrics, MenuRecord, MAX_LEVEL};
use crate::rows::RowStore;
use crate::storage::BlobStore;
use pick_key::derive_menu_key;
use serde::Serialize;
use std::sync::Arc;

const DESCRIPTION_COLUMNS: [&str; 3] = ["desc", "desc_text", "description"];
const BRAND_COLUMNS: [&str; 2] = ["brand_id", "brand"];

/// Outcome of one CSV file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Rows written
    pub upserted: usize,
    /// Rows skipped as blank or id-less
    pub skipped: usize,
}

/// Parse a CSV file into menu records
///
/// Rows with fewer than two cells or an empty `id` are skipped. `image_url`
/// is the public URL of the row's derived menu key in `store`.
///
/// # Errors
/// Returns error if the file has no header row or no `id` column
pub fn parse_menu_csv(
    text: &str,
    store: &dyn BlobStore,
) -> Result<(Vec<MenuRecord>, usize), IngestError> {
    let table = CsvTable::parse(text).ok_or(IngestError::EmptyFile)?;
    if !table.has_column("id") {
        return Err(IngestError::MissingColumn("id"));
    }

    let mut records = Vec::with_capacity(table.len());
    let mut skipped = 0;
    for row in table.rows() {
        match record_from_row(&row, store) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    Ok((records, skipped))
}

fn record_from_row(row: &CsvRow<'_>, store: &dyn BlobStore) -> Option<MenuRecord> {
    if row.width() < 2 {
        return None;
    }
    let id = row.first_of(&["id"])?;
    let brand = row.first_of(&BRAND_COLUMNS).unwrap_or_default();

    let mut record = MenuRecord::new(id, brand);
    record.name_kr = row.first_of(&["name_kr"]).unwrap_or_default().to_string();
    record.name_en = row.first_of(&["name_en"]).unwrap_or_default().to_string();
    if let Some(kind) = row.first_of(&["type"]) {
        record.kind = kind.to_string();
    }
    record.price = parse_price(row.get("price"));
    record.description = row.first_of(&DESCRIPTION_COLUMNS).map(str::to_string);
    record.allergens = row.first_of(&["allergens"]).map(str::to_string);
    record.tags = parse_tags(row.get("tags"));
    record.metrics = Metrics {
        spicy: parse_level(row.get("spicy"), MAX_LEVEL),
        crunch: parse_level(row.get("crunch"), MAX_LEVEL),
        sweet: parse_level(row.get("sweet"), MAX_LEVEL),
        garlic: parse_level(row.get("garlic"), MAX_LEVEL),
    };

    for (header, value) in row.entries() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if let Some(lang) = translation_lang(header, "desc_") {
            record.description_i18n.insert(lang.to_string(), value.to_string());
        } else if let Some(lang) = translation_lang(header, "allergens_") {
            record.allergens_i18n.insert(lang.to_string(), value.to_string());
        }
    }

    record.image_url = Some(store.public_url(&derive_menu_key(id)));
    Some(record)
}

// `desc_text` is the base description column, not a language.
fn translation_lang<'a>(header: &'a str, prefix: &str) -> Option<&'a str> {
    header
        .strip_prefix(prefix)
        .filter(|lang| !lang.is_empty() && *lang != "text")
}

/// Loads CSV exports into a [`RowStore`]
pub struct MenuIngest {
    blobs: Arc<dyn BlobStore>,
    rows: Arc<dyn RowStore>,
}

impl std::fmt::Debug for MenuIngest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuIngest").finish_non_exhaustive()
    }
}

impl MenuIngest {
    /// Ingest into `rows`, pointing images at `blobs`
    #[must_use]
    pub fn new(blobs: Arc<dyn BlobStore>, rows: Arc<dyn RowStore>) -> Self {
        Self { blobs, rows }
    }

    /// Parse `text` and upsert every record in one call
    ///
    /// # Errors
    /// Returns error if the CSV is unusable or the upsert fails
    pub async fn ingest_csv(&self, text: &str) -> Result<IngestReport, IngestError> {
        let (records, skipped) = parse_menu_csv(text, self.blobs.as_ref())?;
        if records.is_empty() {
            tracing::info!(skipped, "csv had no usable rows");
            return Ok(IngestReport {
                upserted: 0,
                skipped,
            });
        }
        let upserted = self.rows.upsert_menus(records).await?;
        tracing::info!(upserted, skipped, "ingested menu csv");
        Ok(IngestReport { upserted, skipped })
    }
}
