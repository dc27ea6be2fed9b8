//! Key digest primitives
//!
//! Provides [`KeyDigest`], the 64-bit identifier digest used to name stored
//! images. It is two FNV-1a 32-bit hashes of the same bytes, the second one
//! run over the input with a trailing NUL byte appended.

use crate::normalize::NormalizedIdentifier;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// FNV-1a 32-bit offset basis
pub const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;

/// FNV-1a 32-bit prime
pub const FNV_PRIME: u32 = 0x0100_0193;

/// Length of a digest rendered as hex
pub const DIGEST_HEX_LEN: usize = 16;

/// FNV-1a over `bytes`, continuing from `state`
#[inline]
#[must_use]
pub const fn fnv1a32_update(mut state: u32, bytes: &[u8]) -> u32 {
    let mut i = 0;
    while i < bytes.len() {
        state ^= bytes[i] as u32;
        state = state.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    state
}

/// FNV-1a 32-bit hash of `bytes`
#[inline]
#[must_use]
pub const fn fnv1a32(bytes: &[u8]) -> u32 {
    fnv1a32_update(FNV_OFFSET_BASIS, bytes)
}

/// A 64-bit identifier digest (two FNV-1a 32-bit sub-hashes)
///
/// Not a security primitive. It only spreads catalog identifiers uniformly
/// over object names. Immutable and `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyDigest {
    primary: u32,
    secondary: u32,
}

impl KeyDigest {
    /// Create a digest from its two sub-hashes
    #[inline]
    #[must_use]
    pub const fn new(primary: u32, secondary: u32) -> Self {
        Self { primary, secondary }
    }

    /// Digest raw bytes
    ///
    /// The secondary sub-hash reuses the primary state and folds in one
    /// extra `0x00` byte, which equals hashing `bytes ++ [0]` from scratch.
    #[inline]
    #[must_use]
    pub const fn compute(bytes: &[u8]) -> Self {
        let primary = fnv1a32(bytes);
        let secondary = fnv1a32_update(primary, &[0]);
        Self::new(primary, secondary)
    }

    /// Digest a normalized identifier
    #[inline]
    #[must_use]
    pub fn of(identifier: &NormalizedIdentifier) -> Self {
        Self::compute(identifier.as_bytes())
    }

    /// Normalize `raw` and digest it
    #[inline]
    #[must_use]
    pub fn of_raw(raw: &str) -> Self {
        Self::of(&NormalizedIdentifier::new(raw))
    }

    /// First sub-hash (plain input)
    #[inline]
    #[must_use]
    pub const fn primary(&self) -> u32 {
        self.primary
    }

    /// Second sub-hash (input plus NUL)
    #[inline]
    #[must_use]
    pub const fn secondary(&self) -> u32 {
        self.secondary
    }

    /// Big-endian byte form, matching the hex rendering
    #[inline]
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.primary.to_be_bytes());
        out[4..].copy_from_slice(&self.secondary.to_be_bytes());
        out
    }

    /// Rebuild from big-endian bytes
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 8 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DigestError> {
        if bytes.len() != 8 {
            return Err(DigestError::InvalidLength {
                expected: 8,
                actual: bytes.len(),
            });
        }
        let mut primary = [0u8; 4];
        let mut secondary = [0u8; 4];
        primary.copy_from_slice(&bytes[..4]);
        secondary.copy_from_slice(&bytes[4..]);
        Ok(Self::new(
            u32::from_be_bytes(primary),
            u32::from_be_bytes(secondary),
        ))
    }

    /// Lowercase, zero-padded 16-char hex
    #[inline]
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl Display for KeyDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}{:08x}", self.primary, self.secondary)
    }
}

impl FromStr for KeyDigest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(DigestError::InvalidLength {
                expected: DIGEST_HEX_LEN,
                actual: s.len(),
            });
        }
        if s.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(DigestError::NotLowercase(s.to_string()));
        }
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl serde::Serialize for KeyDigest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> serde::Deserialize<'de> for KeyDigest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct KeyDigestVisitor;

        impl<'de> serde::de::Visitor<'de> for KeyDigestVisitor {
            type Value = KeyDigest;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a 16-char lowercase hex digest or 8 bytes")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                KeyDigest::from_slice(value).map_err(serde::de::Error::custom)
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(KeyDigestVisitor)
        } else {
            deserializer.deserialize_bytes(KeyDigestVisitor)
        }
    }
}

/// Errors that can occur when parsing a digest back from text or bytes
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// Wrong number of hex characters or bytes
    #[error("invalid digest length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Stored keys are always lowercase
    #[error("digest must be lowercase hex: {0}")]
    NotLowercase(String),

    /// Hex decoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
