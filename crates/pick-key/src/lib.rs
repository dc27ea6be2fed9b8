//! ChickenPick image keys
//!
//! Deterministic, content-addressed object names for menu photos and brand
//! logos, plus the read-side candidate expansion and fallback walk.
//!
//! # Core Concepts
//!
//! - [`NormalizedIdentifier`]: trimmed, trailing-comma-free, NFC text
//! - [`KeyDigest`]: two FNV-1a 32-bit sub-hashes rendered as 16 hex chars
//! - [`StorageKey`]: `{digest}.webp` or `brand_{slug-or-digest}.{ext}`
//! - [`CandidateKeys`]: ordered, deduplicated guesses for one identifier
//! - [`KeyResolver`]: `Idle -> Trying(i) -> Loaded | Exhausted`
//!
//! # Example
//!
//! ```rust
//! use pick_key::{candidate_keys, derive_menu_key};
//!
//! // Upload side
//! let key = derive_menu_key("양념치킨, ");
//! assert_eq!(key.as_str(), "2722952cc770d444.webp");
//!
//! // Render side: the catalog row spells it with a trailing comma
//! let candidates = candidate_keys("양념치킨,", "");
//! assert_eq!(candidates.keys("webp")[0], key);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod candidates;
mod digest;
mod key;
mod normalize;
mod resolution;

pub use candidates::{
    brand_candidate_keys, candidate_keys, strip_brand_prefix, Candidate, CandidateKeys,
    CHICKEN_SUFFIX,
};
pub use digest::{
    fnv1a32, fnv1a32_update, DigestError, KeyDigest, DIGEST_HEX_LEN, FNV_OFFSET_BASIS, FNV_PRIME,
};
pub use key::{
    derive_logo_key, derive_menu_key, derive_menu_key_for_file, is_plain_logo_stem,
    split_file_name, KeyError, StorageKey, LOGO_EXTENSION, LOGO_PREFIX, MENU_EXTENSION,
};
pub use normalize::{trim_nfc, NormalizedIdentifier};
pub use resolution::{
    allowed_transitions, validate_transition, KeyResolver, LoadOutcome, Reported,
    ResolutionError, ResolutionState, ResolutionToken,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
