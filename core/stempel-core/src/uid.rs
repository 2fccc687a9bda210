//! Canonical token identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identifier of a physical token: the raw UID bytes rendered as
/// two-digit lowercase hex, joined by `:` (e.g. `74:8a:71:16`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenUid(String);

impl TokenUid {
    /// Normalizes a raw reader UID into its canonical form. Pure; identical
    /// byte sequences always yield the identical string.
    ///
    /// An empty slice yields an empty identifier. A "no token present" poll
    /// must be treated as absence by the caller, never passed through here.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut canonical = String::with_capacity(bytes.len() * 3);
        for (i, byte) in bytes.iter().enumerate() {
            if i > 0 {
                canonical.push(':');
            }
            canonical.push_str(&format!("{byte:02x}"));
        }
        TokenUid(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenUid {
    fn from(value: &str) -> Self {
        TokenUid(value.to_string())
    }
}
