//! Identifier normalization
//!
//! Provides [`NormalizedIdentifier`], the canonical text form every storage
//! key is derived from.

use std::fmt::{self, Display, Formatter};
use unicode_normalization::UnicodeNormalization;

/// Identifier in canonical form
///
/// Leading/trailing whitespace and a trailing run of commas/whitespace are
/// removed, then the text is composed to Unicode NFC so that precomposed and
/// decomposed Hangul (or accented Latin) compare byte-equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NormalizedIdentifier(String);

impl NormalizedIdentifier {
    /// Normalize a raw, human-entered identifier
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let trimmed = raw
            .trim_matches(is_trim_char)
            .trim_end_matches(|c: char| c == ',' || is_trim_char(c));
        Self(trimmed.nfc().collect())
    }

    /// Borrow the normalized text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// UTF-8 bytes fed to the digest
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Check if nothing is left after normalization
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the owned string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Trim and compose to NFC without touching trailing commas.
///
/// This is the form candidate variants are built from before each variant
/// goes through [`NormalizedIdentifier::new`] on its own.
#[must_use]
pub fn trim_nfc(raw: &str) -> String {
    raw.trim_matches(is_trim_char).nfc().collect()
}

// Whitespace plus the byte-order mark, which spreadsheet exports like to prepend.
fn is_trim_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

impl Display for NormalizedIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NormalizedIdentifier {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
