//! Token identity type.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::{Amount, Decimals, TokenAddress};
use crate::error::AmmError;

/// The canonical identity of a token on a given chain.
///
/// Combines a [`TokenAddress`] with its [`Decimals`].  The decimals
/// determine the scaling factor that lifts raw amounts into the kernel's
/// 18-decimal fixed-point base.
///
/// # Examples
///
/// ```
/// use hydra_sor::domain::{Amount, Decimals, Token, TokenAddress};
///
/// let weth = Token::new(TokenAddress::from_bytes([2u8; 20]), Decimals::new(18).expect("valid"));
/// let amount = weth.parse_amount("0.1").expect("valid");
/// assert_eq!(amount, Amount::from_u128(100_000_000_000_000_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    address: TokenAddress,
    decimals: Decimals,
}

impl Token {
    /// Creates a new `Token`.
    ///
    /// Construction is infallible because both components are already
    /// validated at their own construction site.
    #[must_use]
    pub const fn new(address: TokenAddress, decimals: Decimals) -> Self {
        Self { address, decimals }
    }

    /// Returns the token address.
    #[must_use]
    pub const fn address(&self) -> TokenAddress {
        self.address
    }

    /// Returns the token decimals.
    #[must_use]
    pub const fn decimals(&self) -> Decimals {
        self.decimals
    }

    /// Returns `10^(18 - decimals)`.
    #[must_use]
    pub fn scaling_factor(&self) -> U256 {
        self.decimals.scaling_factor()
    }

    /// Converts a human-readable decimal string into a raw [`Amount`].
    ///
    /// # Errors
    ///
    /// Propagates [`Decimals::parse_units`] errors.
    pub fn parse_amount(&self, human: &str) -> Result<Amount, AmmError> {
        self.decimals.parse_units(human).map(Amount::new)
    }
}
