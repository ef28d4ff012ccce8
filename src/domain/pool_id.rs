//! Pool identifier.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque pool identifier as it appears in the snapshot (a Balancer pool id
/// is the pool address followed by a specialization and nonce).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(String);

impl PoolId {
    /// Creates a new identifier; ids are compared case-insensitively, so
    /// they are stored lowercase.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_ascii_lowercase())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PoolId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercased() {
        assert_eq!(PoolId::new("0xABcd"), PoolId::from("0xabcd"));
        assert_eq!(PoolId::new(" 0x01 ").as_str(), "0x01");
    }
}
