use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Raw digest width in bytes (160 bits).
pub const KEY_BYTES: usize = 20;

/// Length of the rendered key: padded base64 of [`KEY_BYTES`] bytes.
pub const KEY_LEN: usize = 28;

/// Content address of a blob.
///
/// A `BlobKey` is the 160-bit digest of a blob's bytes. Its only textual form
/// is padded URL-safe base64, so keys can be used verbatim as URL path
/// segments and file names. Identical content always yields the same key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobKey([u8; KEY_BYTES]);

impl BlobKey {
    /// Wrap a pre-computed digest.
    pub const fn from_digest(digest: [u8; KEY_BYTES]) -> Self {
        Self(digest)
    }

    /// Parse the canonical textual form.
    ///
    /// Only strings produced by [`BlobKey::to_string`] are accepted: exactly
    /// [`KEY_LEN`] characters of the URL-safe alphabet with canonical padding.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let invalid = |reason: String| TypeError::InvalidKey {
            key: s.to_string(),
            reason,
        };
        if s.len() != KEY_LEN {
            return Err(invalid(format!(
                "expected {KEY_LEN} characters, got {}",
                s.len()
            )));
        }
        let bytes = URL_SAFE.decode(s).map_err(|e| invalid(e.to_string()))?;
        let digest: [u8; KEY_BYTES] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| invalid(format!("expected {KEY_BYTES} bytes, got {}", b.len())))?;
        Ok(Self(digest))
    }

    /// First eight characters of the key, for log lines.
    pub fn short(&self) -> String {
        let mut s = self.to_string();
        s.truncate(8);
        s
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&URL_SAFE.encode(self.0))
    }
}

impl fmt::Debug for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobKey({})", self.short())
    }
}

impl FromStr for BlobKey {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for BlobKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlobKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
