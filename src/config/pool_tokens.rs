//! Token list shared by every pool configuration.

use alloy_primitives::U256;

use crate::domain::{Amount, Token, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point::ONE;

/// The ordered tokens of a pool together with their raw balances and price
/// rates.
///
/// The price rate is the `1e18`-scaled value of one token in units of its
/// underlying (wrapped and yield-bearing assets); plain tokens carry `ONE`.
///
/// # Validation
///
/// - `tokens`, `balances` and `rates` have equal length.
/// - At least 2 tokens, no duplicate addresses.
/// - Every rate is non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolTokens {
    tokens: Vec<Token>,
    balances: Vec<Amount>,
    rates: Vec<U256>,
}

impl PoolTokens {
    /// Creates a token list with explicit price rates.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] on length mismatch, fewer than
    ///   two tokens, or duplicate addresses.
    /// - [`AmmError::InvalidPrice`] if a rate is zero.
    pub fn new(tokens: Vec<Token>, balances: Vec<Amount>, rates: Vec<U256>) -> Result<Self, AmmError> {
        let list = Self {
            tokens,
            balances,
            rates,
        };
        list.validate()?;
        Ok(list)
    }

    /// Creates a token list whose rates are all one.
    ///
    /// # Errors
    ///
    /// Same as [`PoolTokens::new`].
    pub fn with_unit_rates(tokens: Vec<Token>, balances: Vec<Amount>) -> Result<Self, AmmError> {
        let rates = vec![ONE; tokens.len()];
        Self::new(tokens, balances, rates)
    }

    /// Validates all invariants.
    ///
    /// # Errors
    ///
    /// See [`PoolTokens::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.tokens.len() != self.balances.len() || self.tokens.len() != self.rates.len() {
            return Err(AmmError::InvalidConfiguration(
                "tokens, balances and rates must have equal length",
            ));
        }
        if self.tokens.len() < 2 {
            return Err(AmmError::InvalidConfiguration("at least 2 tokens are required"));
        }

        // O(n²), fine for at most a handful of tokens.
        let mut iter = self.tokens.iter();
        while let Some(token) = iter.next() {
            if iter.clone().any(|other| other.address() == token.address()) {
                return Err(AmmError::InvalidConfiguration(
                    "duplicate token addresses are not allowed",
                ));
            }
        }

        if self.rates.iter().any(U256::is_zero) {
            return Err(AmmError::InvalidPrice("price rate must be non-zero"));
        }
        Ok(())
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always `false` for a validated list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns the raw balances.
    #[must_use]
    pub fn balances(&self) -> &[Amount] {
        &self.balances
    }

    /// Returns the price rates.
    #[must_use]
    pub fn rates(&self) -> &[U256] {
        &self.rates
    }

    /// Position of `address` in the list.
    #[must_use]
    pub fn index_of(&self, address: TokenAddress) -> Option<usize> {
        self.tokens.iter().position(|t| t.address() == address)
    }

    /// Returns `true` if any balance is zero.
    #[must_use]
    pub fn has_zero_balance(&self) -> bool {
        self.balances.iter().any(Amount::is_zero)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::test_support::token;

    #[test]
    fn valid_list() {
        let Ok(list) = PoolTokens::with_unit_rates(
            vec![token(1, 18), token(2, 6)],
            vec![Amount::from_u128(1), Amount::from_u128(2)],
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(list.len(), 2);
        assert_eq!(list.index_of(TokenAddress::from_bytes([2; 20])), Some(1));
        assert_eq!(list.index_of(TokenAddress::from_bytes([3; 20])), None);
        assert_eq!(list.rates(), &[ONE, ONE]);
    }

    #[test]
    fn duplicate_rejected() {
        let result = PoolTokens::with_unit_rates(
            vec![token(1, 18), token(1, 18)],
            vec![Amount::from_u128(1), Amount::from_u128(2)],
        );
        assert!(matches!(result, Err(AmmError::InvalidConfiguration(_))));
    }

    #[test]
    fn length_mismatch_rejected() {
        let result =
            PoolTokens::with_unit_rates(vec![token(1, 18), token(2, 18)], vec![Amount::from_u128(1)]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_rate_rejected() {
        let result = PoolTokens::new(
            vec![token(1, 18), token(2, 18)],
            vec![Amount::from_u128(1), Amount::from_u128(1)],
            vec![ONE, U256::ZERO],
        );
        assert!(matches!(result, Err(AmmError::InvalidPrice(_))));
    }

    #[test]
    fn single_token_rejected() {
        assert!(PoolTokens::with_unit_rates(vec![token(1, 18)], vec![Amount::ZERO]).is_err());
    }
}
