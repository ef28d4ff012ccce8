//! EVM token address.

use core::fmt;
use core::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// The 20-byte address identifying a token (and, for pool-share tokens,
/// the pool itself).
///
/// Parsing is case-insensitive; display is lowercase hex so that addresses
/// coming from different sources compare and hash identically.
///
/// # Examples
///
/// ```
/// use hydra_sor::domain::TokenAddress;
///
/// let weth: TokenAddress = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse().expect("hex");
/// assert_eq!(weth.to_string(), "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAddress(Address);

impl TokenAddress {
    /// Creates a `TokenAddress` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(Address::new(bytes))
    }

    /// Returns the underlying alloy [`Address`].
    #[must_use]
    pub const fn address(&self) -> Address {
        self.0
    }

    /// Returns the all-zero address.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Address::ZERO)
    }
}

impl From<Address> for TokenAddress {
    fn from(value: Address) -> Self {
        Self(value)
    }
}

impl FromStr for TokenAddress {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_str(s.trim())
            .map(Self)
            .map_err(|_| AmmError::InvalidToken("malformed token address"))
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
