//! Menu records
//!
//! The row shape stored in the `menus` table, and the helpers the catalog
//! views need around it.

use pick_key::{candidate_keys, CandidateKeys, NormalizedIdentifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest taste level
pub const MAX_LEVEL: u8 = 5;

/// Taste levels, each `0..=5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    pub spicy: u8,
    pub crunch: u8,
    pub sweet: u8,
    pub garlic: u8,
}

/// One menu row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuRecord {
    /// Human identifier, also what images are uploaded under
    pub id: String,
    /// Brand slug
    pub brand: String,
    pub name_kr: String,
    pub name_en: String,
    /// Item kind (`chicken`, `burger`, ...)
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// Price in won
    #[serde(default)]
    pub price: u32,
    #[serde(rename = "desc_text", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub allergens: Option<String>,
    /// Translated descriptions keyed by language code
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub description_i18n: BTreeMap<String, String>,
    /// Translated allergen notes keyed by language code
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub allergens_i18n: BTreeMap<String, String>,
    /// Precomputed absolute image URL; authoritative when present
    #[serde(default)]
    pub image_url: Option<String>,
    /// Part / style tags (`Whole`, `Boneless`, ...)
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
}

fn default_kind() -> String {
    "chicken".to_string()
}

/// Where a menu photo comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Absolute URL stored with the row; no candidate search
    Direct(String),
    /// Derived candidates to try in order
    Candidates(CandidateKeys),
}

impl MenuRecord {
    /// Minimal record; other fields take their defaults
    #[must_use]
    pub fn new(id: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            name_kr: String::new(),
            name_en: String::new(),
            kind: default_kind(),
            price: 0,
            description: None,
            allergens: None,
            description_i18n: BTreeMap::new(),
            allergens_i18n: BTreeMap::new(),
            image_url: None,
            tags: Vec::new(),
            metrics: Metrics::default(),
            avg_rating: None,
            review_count: 0,
        }
    }

    /// Pick the image source for this row
    #[must_use]
    pub fn image_source(&self) -> ImageSource {
        match self.image_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => ImageSource::Direct(url.to_string()),
            _ => ImageSource::Candidates(candidate_keys(&self.id, &self.brand)),
        }
    }

    /// Name variants of one dish share this (e.g. `후라이드 순살`, `후라이드 콤보`)
    #[must_use]
    pub fn group_base_name(&self) -> String {
        let name = [&self.name_kr, &self.name_en, &self.id]
            .into_iter()
            .find(|s| !s.is_empty())
            .map_or("", String::as_str);
        group_base_name(name)
    }

    /// Average rating rounded to one decimal; `0.0` when unknown
    #[must_use]
    pub fn display_rating(&self) -> f64 {
        match self.avg_rating {
            Some(r) if r.is_finite() => (r * 10.0).round() / 10.0,
            _ => 0.0,
        }
    }

    /// Tags, or the given default when the row has none
    #[must_use]
    pub fn parts_or<'a>(&'a self, default: &'a str) -> Vec<&'a str> {
        if self.tags.is_empty() {
            vec![default]
        } else {
            self.tags.iter().map(String::as_str).collect()
        }
    }
}

const VARIANT_WORDS: [&str; 5] = ["콤보", "순살", "윙", "스틱", "다리"];

/// Normalize `name` and cut it at the first ` 콤보|순살|윙|스틱|다리` suffix
#[must_use]
pub fn group_base_name(name: &str) -> String {
    let mut base = NormalizedIdentifier::new(name).into_string();
    let cut = base.match_indices(' ').map(|(i, _)| i).find(|&i| {
        let rest = &base[i + 1..];
        VARIANT_WORDS.iter().any(|w| rest.starts_with(w))
    });
    if let Some(i) = cut {
        base.truncate(i);
    }
    base
}

const PART_TO_KR: [(&str, &str); 12] = [
    ("Whole", "한마리"),
    ("Whole chicken", "한마리"),
    ("Boneless", "순살"),
    ("Drumsticks", "닭다리"),
    ("Leg", "다리"),
    ("Wings", "날개"),
    ("Wing", "날개"),
    ("Combo", "콤보"),
    ("Wings & drumettes", "윙&봉"),
    ("Wing combo", "윙콤보"),
    ("Stick", "스틱"),
    ("Single Menu", "기본"),
];

/// Korean label for an English part tag
///
/// Exact match first, then the first table entry contained in the tag,
/// otherwise the trimmed tag itself.
#[must_use]
pub fn korean_part_name(part: &str) -> String {
    let part = part.trim();
    PART_TO_KR
        .iter()
        .find(|(en, _)| *en == part)
        .or_else(|| PART_TO_KR.iter().find(|(en, _)| part.contains(en)))
        .map_or_else(|| part.to_string(), |(_, kr)| (*kr).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_url_is_authoritative() {
        let mut record = MenuRecord::new("황금올리브치킨", "bbq");
        record.image_url = Some("https://cdn.example/x.webp".to_string());
        assert_eq!(
            record.image_source(),
            ImageSource::Direct("https://cdn.example/x.webp".to_string())
        );
    }

    #[test]
    fn blank_url_falls_back_to_candidates() {
        let mut record = MenuRecord::new("황금올리브치킨", "bbq");
        record.image_url = Some("  ".to_string());
        match record.image_source() {
            ImageSource::Candidates(keys) => assert_eq!(keys, candidate_keys("황금올리브치킨", "bbq")),
            ImageSource::Direct(_) => panic!("expected candidates"),
        }
    }

    #[test]
    fn group_base_name_cuts_variant_suffix() {
        assert_eq!(group_base_name("후라이드 순살"), "후라이드");
        assert_eq!(group_base_name("양념치킨 콤보 세트, "), "양념치킨");
        assert_eq!(group_base_name("허니콤보"), "허니콤보");
    }

    #[test]
    fn group_base_name_prefers_korean_name() {
        let mut record = MenuRecord::new("bbq_1", "bbq");
        assert_eq!(record.group_base_name(), "bbq_1");
        record.name_en = "Golden Olive".to_string();
        assert_eq!(record.group_base_name(), "Golden Olive");
        record.name_kr = "황금올리브 윙".to_string();
        assert_eq!(record.group_base_name(), "황금올리브");
    }

    #[test]
    fn korean_part_names() {
        assert_eq!(korean_part_name("Whole"), "한마리");
        assert_eq!(korean_part_name(" Wing combo "), "윙콤보");
        assert_eq!(korean_part_name("Spicy Wings"), "날개");
        assert_eq!(korean_part_name("Gizzard"), "Gizzard");
    }

    #[test]
    fn display_rating_rounds() {
        let mut record = MenuRecord::new("a", "bbq");
        assert_eq!(record.display_rating(), 0.0);
        record.avg_rating = Some(4.26);
        assert_eq!(record.display_rating(), 4.3);
        record.avg_rating = Some(f64::NAN);
        assert_eq!(record.display_rating(), 0.0);
    }

    #[test]
    fn parts_default_when_untagged() {
        let mut record = MenuRecord::new("a", "bbq");
        assert_eq!(record.parts_or("Single Menu"), vec!["Single Menu"]);
        record.tags = vec!["Boneless".to_string()];
        assert_eq!(record.parts_or("Single Menu"), vec!["Boneless"]);
    }

    #[test]
    fn serde_uses_table_column_names() {
        let record: MenuRecord = serde_json::from_str(
            r#"{"id":"a","brand":"bbq","name_kr":"가","name_en":"A","desc_text":"d","metrics":{"spicy":2}}"#,
        )
        .unwrap();
        assert_eq!(record.kind, "chicken");
        assert_eq!(record.description.as_deref(), Some("d"));
        assert_eq!(record.metrics.spicy, 2);
        assert!(record.image_url.is_none());
    }
}
