//! Storage keys
//!
//! A [`StorageKey`] is the only name ever used for an object in the image
//! bucket. Menu photos are `{digest}.webp`; brand logos are
//! `brand_{slug-or-digest}.{ext}`.

use crate::digest::KeyDigest;
use crate::normalize::NormalizedIdentifier;
use std::fmt::{self, Display, Formatter};

/// Extension for re-encoded menu photos
pub const MENU_EXTENSION: &str = "webp";

/// Extension brand logos are looked up with
pub const LOGO_EXTENSION: &str = "svg";

/// Prefix shared by every brand logo key
pub const LOGO_PREFIX: &str = "brand_";

/// Object name inside the image bucket
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Menu photo key for an already-computed digest
    #[inline]
    #[must_use]
    pub fn menu(digest: KeyDigest) -> Self {
        Self(format!("{digest}.{MENU_EXTENSION}"))
    }

    /// Key for `digest` with an arbitrary extension (no leading dot)
    #[inline]
    #[must_use]
    pub fn with_extension(digest: KeyDigest, extension: &str) -> Self {
        Self(format!("{digest}.{extension}"))
    }

    /// Brand logo key from a slug or digest stem
    #[inline]
    #[must_use]
    pub fn logo(stem: impl Display, extension: &str) -> Self {
        Self(format!("{LOGO_PREFIX}{stem}.{extension}"))
    }

    /// Wrap a key that was produced elsewhere (e.g. listed from the bucket)
    #[inline]
    #[must_use]
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the object name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Object name without its extension
    #[must_use]
    pub fn stem(&self) -> &str {
        split_file_name(&self.0).0
    }

    /// Extension without the dot, if any
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        split_file_name(&self.0).1
    }

    /// Check if this names a brand logo
    #[inline]
    #[must_use]
    pub fn is_logo(&self) -> bool {
        self.0.starts_with(LOGO_PREFIX)
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split a file name at its last `.`
///
/// Returns the whole name as the stem when there is no dot.
#[must_use]
pub fn split_file_name(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rfind('.') {
        Some(idx) => (&file_name[..idx], Some(&file_name[idx + 1..])),
        None => (file_name, None),
    }
}

/// Derive the canonical menu photo key for a raw identifier
///
/// Total over every string: the empty string yields `811c9dc5050c5d1f.webp`.
#[must_use]
pub fn derive_menu_key(raw: &str) -> StorageKey {
    StorageKey::menu(KeyDigest::of(&NormalizedIdentifier::new(raw)))
}

/// Derive the menu photo key for an uploaded file
///
/// The file extension is dropped; the photo is always stored as WebP.
#[must_use]
pub fn derive_menu_key_for_file(file_name: &str) -> StorageKey {
    derive_menu_key(split_file_name(file_name).0)
}

/// Check if a logo stem can be stored verbatim
///
/// ASCII letters, digits, `_`, `.` and `-` only, non-empty.
#[must_use]
pub fn is_plain_logo_stem(stem: &str) -> bool {
    !stem.is_empty()
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Derive the storage key for an uploaded brand logo file
///
/// `bbq.svg` is stored as `brand_bbq.svg`; `교촌.SVG` as
/// `brand_{digest("교촌")}.svg`. The extension is lowercased.
///
/// # Errors
/// Returns error if the file name has no extension or an empty one
pub fn derive_logo_key(file_name: &str) -> Result<StorageKey, KeyError> {
    let (stem, extension) = split_file_name(file_name);
    let extension = match extension {
        Some(ext) if !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => return Err(KeyError::MissingExtension(file_name.to_string())),
    };

    if is_plain_logo_stem(stem) {
        Ok(StorageKey::logo(stem, &extension))
    } else {
        Ok(StorageKey::logo(KeyDigest::of_raw(stem), &extension))
    }
}

/// Errors deriving keys from uploaded file names
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// Logo keys keep the original extension, so one is required
    #[error("file name has no extension: '{0}'")]
    MissingExtension(String),
}
