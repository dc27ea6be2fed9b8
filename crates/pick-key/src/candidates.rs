//! Candidate key lists
//!
//! A catalog row may spell its identifier slightly differently from the file
//! name the image was uploaded under: extra spaces, trailing punctuation, a
//! `bbq_` brand prefix, or the word 치킨. [`candidate_keys`] expands one
//! identifier into an ordered list of digests, most likely first, so a
//! display surface can try them in turn.

use crate::digest::KeyDigest;
use crate::key::{StorageKey, LOGO_EXTENSION};
use crate::normalize::{trim_nfc, NormalizedIdentifier};
use indexmap::IndexMap;

/// Korean for "chicken", often present on one side only
pub const CHICKEN_SUFFIX: &str = "치킨";

/// One candidate: the variant text and the digest it hashes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Variant text the digest was computed from (before normalization)
    pub variant: String,
    /// Resulting digest
    pub digest: KeyDigest,
}

/// Ordered, digest-deduplicated candidate list
///
/// # Invariants
/// - No digest appears twice
/// - Order is the order variants were generated in (first seen wins)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateKeys {
    entries: IndexMap<KeyDigest, String>,
}

impl CandidateKeys {
    /// Empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `variant` and append it unless its digest is already present
    ///
    /// Returns `true` if a new candidate was added.
    pub fn push_variant(&mut self, variant: &str) -> bool {
        let digest = KeyDigest::of(&NormalizedIdentifier::new(variant));
        if self.entries.contains_key(&digest) {
            return false;
        }
        self.entries.insert(digest, variant.to_string());
        true
    }

    /// Number of distinct candidates
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no candidates
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Digest at `index`
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<KeyDigest> {
        self.entries.get_index(index).map(|(digest, _)| *digest)
    }

    /// Most likely candidate
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<KeyDigest> {
        self.get(0)
    }

    /// Iterate digests in priority order
    pub fn digests(&self) -> impl Iterator<Item = KeyDigest> + '_ {
        self.entries.keys().copied()
    }

    /// Iterate candidates with their source variants
    pub fn iter(&self) -> impl Iterator<Item = Candidate> + '_ {
        self.entries.iter().map(|(digest, variant)| Candidate {
            variant: variant.clone(),
            digest: *digest,
        })
    }

    /// Hex stems, without extension
    #[must_use]
    pub fn stems(&self) -> Vec<String> {
        self.digests().map(|d| d.to_string()).collect()
    }

    /// Full storage keys with `extension` appended
    #[must_use]
    pub fn keys(&self, extension: &str) -> Vec<StorageKey> {
        self.digests()
            .map(|d| StorageKey::with_extension(d, extension))
            .collect()
    }
}

/// Build the candidate list for a menu identifier
///
/// Variants, in priority order:
/// 1. trimmed, NFC identifier
/// 2. with whitespace removed
/// 3. with everything but ASCII alphanumerics and Hangul syllables removed
/// 4. if it contains 치킨: that removed (trimmed), then also without `_`
/// 5. if it starts with `brand_id` (ASCII case-insensitive) followed by
///    nothing or `_`: the prefix removed, then also without 치킨
///
/// Every variant is hashed through the full key normalization. Variants
/// after the first that normalize to nothing are skipped.
#[must_use]
pub fn candidate_keys(identifier: &str, brand_id: &str) -> CandidateKeys {
    let clean = trim_nfc(identifier);
    let mut keys = CandidateKeys::new();

    keys.push_variant(&clean);
    let mut push = |variant: &str| {
        if !NormalizedIdentifier::new(variant).is_empty() {
            keys.push_variant(variant);
        }
    };

    push(&remove_whitespace(&clean));
    push(&keep_key_chars(&clean));

    if clean.contains(CHICKEN_SUFFIX) {
        let no_chicken = remove_first(&clean, CHICKEN_SUFFIX);
        let no_chicken = no_chicken.trim();
        push(no_chicken);
        push(&no_chicken.replace('_', ""));
    }

    if let Some(no_brand) = strip_brand_prefix(&clean, brand_id) {
        push(no_brand);
        push(&remove_first(no_brand, CHICKEN_SUFFIX));
    }

    tracing::trace!(identifier, brand_id, count = keys.len(), "built candidate keys");
    keys
}

/// Build the two-entry logo candidate list for a brand
///
/// The English slug comes first so operators can upload `bbq.svg` directly;
/// the hashed Korean name covers logos uploaded as `교촌.svg`.
#[must_use]
pub fn brand_candidate_keys(brand_slug: &str, korean_name: &str) -> Vec<StorageKey> {
    let mut keys = vec![StorageKey::logo(brand_slug, LOGO_EXTENSION)];
    let korean = NormalizedIdentifier::new(korean_name);
    if !korean.is_empty() {
        let hashed = StorageKey::logo(KeyDigest::of(&korean), LOGO_EXTENSION);
        if !keys.contains(&hashed) {
            keys.push(hashed);
        }
    }
    keys
}

/// Strip a leading `brand_id` (plus one `_`) from `identifier`
///
/// Fires only at a word boundary: `bbq_treat` -> `treat`, `bbq` -> ``, while
/// `bbqtreat` is left alone. `brand_id` is compared literally.
#[must_use]
pub fn strip_brand_prefix<'a>(identifier: &'a str, brand_id: &str) -> Option<&'a str> {
    if brand_id.is_empty() || !identifier.is_char_boundary(brand_id.len()) {
        return None;
    }
    let (head, rest) = identifier.split_at(brand_id.len());
    if !head.eq_ignore_ascii_case(brand_id) {
        return None;
    }
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('_')
    }
}

fn remove_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn keep_key_chars(s: &str) -> String {
    s.chars().filter(|&c| is_key_char(c)).collect()
}

// ASCII alphanumerics plus the precomposed Hangul syllable block (가..힣).
fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{ac00}'..='\u{d7a3}').contains(&c)
}

fn remove_first(s: &str, needle: &str) -> String {
    s.replacen(needle, "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hex(raw: &str) -> String {
        KeyDigest::of_raw(raw).to_string()
    }

    #[test]
    fn golden_olive_without_brand() {
        let keys = candidate_keys("황금올리브치킨", "");
        assert_eq!(keys.stems(), vec![hex("황금올리브치킨"), hex("황금올리브")]);
    }

    #[test]
    fn whitespace_and_punctuation_variants() {
        let keys = candidate_keys(" 허니 콤보! ", "");
        assert_eq!(
            keys.stems(),
            vec![hex("허니 콤보!"), hex("허니콤보!"), hex("허니콤보")]
        );
    }

    #[test]
    fn trailing_comma_matches_upload_key_first() {
        let keys = candidate_keys("양념치킨,", "");
        assert_eq!(keys.first(), Some(KeyDigest::of_raw("양념치킨")));
    }

    #[test]
    fn brand_prefix_with_underscore_fires() {
        let keys = candidate_keys("bbq_treat", "bbq");
        assert!(keys.stems().contains(&hex("treat")));
    }

    #[test]
    fn brand_prefix_without_boundary_does_not_fire() {
        let keys = candidate_keys("bbqtreat", "bbq");
        assert!(!keys.stems().contains(&hex("treat")));
        assert_eq!(keys.stems(), vec![hex("bbqtreat")]);
    }

    #[test]
    fn brand_prefix_is_case_insensitive() {
        let keys = candidate_keys("BBQ_황금올리브치킨", "bbq");
        let stems = keys.stems();
        assert_eq!(stems[0], hex("BBQ_황금올리브치킨"));
        assert!(stems.contains(&hex("황금올리브치킨")));
        assert!(stems.contains(&hex("황금올리브")));
        // 치킨 removed but prefix kept, then underscores dropped
        assert!(stems.contains(&hex("BBQ_황금올리브")));
        assert!(stems.contains(&hex("BBQ황금올리브")));
    }

    #[test]
    fn empty_brand_never_strips() {
        assert_eq!(strip_brand_prefix("_x", ""), None);
        assert_eq!(strip_brand_prefix("bbq", "bbq"), Some(""));
        assert_eq!(strip_brand_prefix("bb", "bbq"), None);
    }

    #[test]
    fn brand_prefix_respects_char_boundaries() {
        // brand id length lands inside a multi-byte character
        assert_eq!(strip_brand_prefix("교촌", "ab"), None);
    }

    #[test]
    fn identifier_equal_to_brand_adds_no_empty_variant() {
        let keys = candidate_keys("bbq", "bbq");
        assert_eq!(keys.stems(), vec![hex("bbq")]);
    }

    #[test]
    fn empty_identifier_yields_pinned_digest() {
        let keys = candidate_keys("", "bbq");
        assert_eq!(keys.stems(), vec!["811c9dc5050c5d1f".to_string()]);
    }

    #[test]
    fn stable_and_deduplicated() {
        let a = candidate_keys("BBQ 황금올리브치킨,", "bbq");
        let b = candidate_keys("BBQ 황금올리브치킨,", "bbq");
        assert_eq!(a, b);
        let stems = a.stems();
        let mut sorted = stems.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), stems.len());
    }

    #[test]
    fn keys_append_extension() {
        let keys = candidate_keys("황금올리브치킨", "");
        let full = keys.keys("webp");
        assert_eq!(full[0].as_str(), format!("{}.webp", hex("황금올리브치킨")));
    }

    #[test]
    fn candidates_keep_source_variant() {
        let keys = candidate_keys("황금올리브치킨", "");
        let variants: Vec<_> = keys.iter().map(|c| c.variant).collect();
        assert_eq!(variants, vec!["황금올리브치킨".to_string(), "황금올리브".to_string()]);
    }

    #[test]
    fn brand_candidates_slug_then_hash() {
        let keys = brand_candidate_keys("kyochon", "교촌");
        let names: Vec<_> = keys.iter().map(StorageKey::as_str).collect();
        assert_eq!(names, vec!["brand_kyochon.svg", "brand_bb42f2dca6645054.svg"]);
    }

    #[test]
    fn brand_candidates_without_korean_name() {
        let keys = brand_candidate_keys("bbq", "  ");
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].as_str(), "brand_bbq.svg");
    }
}
