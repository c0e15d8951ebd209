use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Opaque identifier of a commit in the versioned catalog.
///
/// A `CommitHash` is 32 bytes rendered as lowercase hex. Callers treat it as
/// opaque: the only meaningful operation on two hashes is equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommitHash([u8; 32]);

impl CommitHash {
    /// Derive a commit hash from its parent and an encoded commit payload.
    ///
    /// The derivation is domain-separated and deterministic: the same parent
    /// and payload always produce the same hash.
    pub fn derive(parent: Option<&CommitHash>, payload: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"vcat-commit-v1:");
        match parent {
            Some(p) => {
                hasher.update(b"parent:");
                hasher.update(&p.0);
            }
            None => {
                hasher.update(b"root:");
            }
        }
        hasher.update(payload);
        Self(*hasher.finalize().as_bytes())
    }

    /// Create a `CommitHash` from a pre-computed hash.
    pub fn from_raw(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The hash of the empty root commit every fresh catalog starts from.
    pub fn no_ancestor() -> Self {
        Self::derive(None, b"")
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string (64 hex characters).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitHash({})", self.short_hex())
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for CommitHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let root = CommitHash::no_ancestor();
        let a = CommitHash::derive(Some(&root), b"payload");
        let b = CommitHash::derive(Some(&root), b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn parent_changes_the_hash() {
        let root = CommitHash::no_ancestor();
        let child = CommitHash::derive(Some(&root), b"x");
        let orphan = CommitHash::derive(None, b"x");
        assert_ne!(child, orphan);
    }

    #[test]
    fn hex_parses_back() {
        let h = CommitHash::derive(None, b"test");
        let parsed: CommitHash = h.to_hex().parse().unwrap();
        assert_eq!(h, parsed);
    }

    #[test]
    fn reject_short_hex() {
        let err = CommitHash::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn reject_non_hex() {
        assert!(matches!(
            CommitHash::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn display_is_full_hex() {
        let h = CommitHash::no_ancestor();
        let display = format!("{h}");
        assert_eq!(display.len(), 64);
        assert_eq!(h.short_hex().len(), 8);
        assert!(display.starts_with(&h.short_hex()));
    }
}
