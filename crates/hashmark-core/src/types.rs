//! Strong type definitions for Hashmark digests.
//!
//! Both digests are newtypes so a primary hash can never be passed where an
//! audit hash is expected, and vice versa.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Length of a hex-encoded 32-byte digest.
pub const HASH_HEX_LEN: usize = 64;

/// Number of hex characters of the primary hash embedded in a row key.
pub const ROW_KEY_PREFIX_LEN: usize = 8;

/// A 32-byte SHA-256 digest, the canonical lookup key for verification.
///
/// Serialized as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PrimaryHash([u8; 32]);

impl PrimaryHash {
    /// Create from raw digest bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The first eight hex characters, used in row keys.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..ROW_KEY_PREFIX_LEN / 2])
    }

    /// Parse a caller-supplied fingerprint.
    ///
    /// The string must be exactly [`HASH_HEX_LEN`] characters long and consist
    /// only of ASCII hex digits. Upper-case digits are accepted and normalized.
    /// Length is counted in characters, so the reported length matches what a
    /// caller sees in their own string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let actual = s.chars().count();
        if actual != HASH_HEX_LEN {
            return Err(CoreError::InvalidHashLength {
                expected: HASH_HEX_LEN,
                actual,
            });
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| CoreError::InvalidHashEncoding(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for PrimaryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for PrimaryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for PrimaryHash {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<PrimaryHash> for String {
    fn from(hash: PrimaryHash) -> Self {
        hash.to_hex()
    }
}

impl TryFrom<String> for PrimaryHash {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl AsRef<[u8]> for PrimaryHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A 32-byte SHA3-256 digest.
///
/// Recorded alongside the primary hash so a record can be audited against a
/// second hash family. Never used for lookup.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SecondaryHash([u8; 32]);

impl SecondaryHash {
    /// Create from raw digest bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        if s.len() != HASH_HEX_LEN {
            return Err(CoreError::InvalidHashLength {
                expected: HASH_HEX_LEN,
                actual: s.chars().count(),
            });
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| CoreError::InvalidHashEncoding(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for SecondaryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha3({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for SecondaryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<SecondaryHash> for String {
    fn from(hash: SecondaryHash) -> Self {
        hash.to_hex()
    }
}

impl TryFrom<String> for SecondaryHash {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}
