//! Content fingerprinting for cache identity.

use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Number of hex characters used when a fingerprint names a cache directory.
pub const SHORT_LEN: usize = 16;

/// A SHA-256 digest of the exact bytes of a source unit.
///
/// Two sources with the same `Fingerprint` are assumed to be byte-identical.
/// The digest is unsalted, so it is stable across runs and platforms. The full
/// digest is kept; [`short`](Self::short) gives the truncated form used for
/// directory names.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Computes the fingerprint of a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Returns the full 64-character lowercase hex digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the first [`SHORT_LEN`] hex characters of the digest.
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(SHORT_LEN);
        hex
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short())
    }
}

/// Error returned when parsing a fingerprint from its hex form fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fingerprint '{input}': expected 64 hex characters")]
pub struct ParseFingerprintError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFingerprintError {
            input: s.to_string(),
        };
        let bytes = hex::decode(s.trim()).map_err(|_| err())?;
        let digest: [u8; 32] = bytes.try_into().map_err(|_| err())?;
        Ok(Self(digest))
    }
}
