//! Brand registry
//!
//! Static reference data for the chicken chains the catalog covers, and the
//! placeholder shown when a brand's logo or a menu photo cannot be found.

use pick_key::{brand_candidate_keys, StorageKey};
use serde::Serialize;

/// Id of the pseudo-brand selecting every brand
pub const ALL_BRANDS_ID: &str = "all";

/// Color used for brands missing from the registry
pub const NEUTRAL_COLOR: &str = "#111827";

/// One chicken chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrandRecord {
    /// Short Latin slug, also the logo file stem
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Korean display name
    pub korean_name: &'static str,
    /// Accent color (`#rrggbb`)
    pub color: &'static str,
}

impl BrandRecord {
    /// Logo keys to try, English slug first
    #[must_use]
    pub fn logo_candidates(&self) -> Vec<StorageKey> {
        brand_candidate_keys(self.id, self.korean_name)
    }

    /// Placeholder for this brand
    #[must_use]
    pub fn placeholder(&self) -> Placeholder {
        let label = if self.id == ALL_BRANDS_ID {
            "ALL".to_string()
        } else {
            initials(self.name)
        };
        Placeholder {
            label,
            color: self.color.to_string(),
        }
    }
}

/// Every known brand, `all` first
pub static BRANDS: [BrandRecord; 12] = [
    brand(ALL_BRANDS_ID, "All", "전체", NEUTRAL_COLOR),
    brand("bbq", "BBQ", "비비큐", "#A50034"),
    brand("bhc", "BHC", "BHC", "#F58220"),
    brand("kyochon", "Kyochon", "교촌", "#C0985D"),
    brand("goobne", "Goobne", "굽네", "#D12732"),
    brand("nene", "Nene", "네네", "#F6C60D"),
    brand("norangtongdak", "Norang", "노랑통닭", "#FFD200"),
    brand("mexicana", "Mexicana", "멕시카나", "#CE1F2C"),
    brand("gcova", "Zicoba", "지코바", "#C8161D"),
    brand("cheogajip", "Cheogajip", "처갓집", "#E30412"),
    brand("pelicana", "Pelicana", "페리카나", "#D60018"),
    brand("puradakchicken", "Puradak", "푸라닭", "#000000"),
];

const fn brand(
    id: &'static str,
    name: &'static str,
    korean_name: &'static str,
    color: &'static str,
) -> BrandRecord {
    BrandRecord {
        id,
        name,
        korean_name,
        color,
    }
}

/// Look up a brand by slug (ASCII case-insensitive)
#[must_use]
pub fn find_brand(id: &str) -> Option<&'static BrandRecord> {
    let id = id.trim();
    BRANDS.iter().find(|b| b.id.eq_ignore_ascii_case(id))
}

/// Brands that sell menu items (everything but `all`)
pub fn menu_brands() -> impl Iterator<Item = &'static BrandRecord> {
    BRANDS.iter().filter(|b| b.id != ALL_BRANDS_ID)
}

/// Colored block with a short label, shown instead of a missing image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    /// Up to two uppercase characters, or `ALL`
    pub label: String,
    /// Background color
    pub color: String,
}

impl Placeholder {
    /// Placeholder for any brand id, known or not
    #[must_use]
    pub fn for_brand(brand_id: &str) -> Self {
        match find_brand(brand_id) {
            Some(brand) => brand.placeholder(),
            None => Self {
                label: initials(brand_id),
                color: NEUTRAL_COLOR.to_string(),
            },
        }
    }
}

fn initials(name: &str) -> String {
    name.trim().chars().take(2).collect::<String>().to_uppercase()
}
