//! Configuration for Linear pools.

use alloy_primitives::U256;

use super::PoolTokens;
use crate::domain::{Amount, PoolId, SwapFee, TokenAddress};
use crate::error::AmmError;

/// Configuration for a linear pool: a main token, its wrapped
/// (yield-bearing) counterpart, and the pool's own BPT.
///
/// Trades are fee-free while the main balance stays inside
/// `[lower_target, upper_target]`; outside that band the swap fee applies
/// to the part of the trade beyond the target.  The wrapped token's price
/// rate (see [`PoolTokens::rates`]) converts wrapped balances to main-token
/// value.
///
/// Targets are `1e18`-scaled main-token amounts.
///
/// # Validation
///
/// - Exactly three tokens: main, wrapped, BPT at distinct indices.
/// - `lower_target <= upper_target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConfig {
    id: PoolId,
    tokens: PoolTokens,
    main_index: usize,
    wrapped_index: usize,
    bpt_index: usize,
    lower_target: U256,
    upper_target: U256,
    swap_fee: SwapFee,
    virtual_supply: Amount,
}

impl LinearConfig {
    /// Creates a new `LinearConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] for bad indices, a token
    /// count other than three, or inverted targets.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: PoolId,
        tokens: PoolTokens,
        main_index: usize,
        wrapped_index: usize,
        lower_target: U256,
        upper_target: U256,
        swap_fee: SwapFee,
        virtual_supply: Amount,
    ) -> Result<Self, AmmError> {
        // The BPT sits at the remaining index.
        let bpt_index = 3usize.saturating_sub(main_index + wrapped_index);
        let config = Self {
            id,
            tokens,
            main_index,
            wrapped_index,
            bpt_index,
            lower_target,
            upper_target,
            swap_fee,
            virtual_supply,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`LinearConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        self.tokens.validate()?;
        if self.tokens.len() != 3 {
            return Err(AmmError::InvalidConfiguration(
                "linear pools hold main, wrapped and BPT tokens",
            ));
        }
        let mut indices = [self.main_index, self.wrapped_index, self.bpt_index];
        indices.sort_unstable();
        if indices != [0, 1, 2] {
            return Err(AmmError::InvalidConfiguration(
                "main, wrapped and BPT indices must be distinct",
            ));
        }
        if self.lower_target > self.upper_target {
            return Err(AmmError::InvalidConfiguration(
                "lower target must not exceed upper target",
            ));
        }
        Ok(())
    }

    /// Returns the pool id.
    #[must_use]
    pub const fn id(&self) -> &PoolId {
        &self.id
    }

    /// Returns the token list.
    #[must_use]
    pub const fn tokens(&self) -> &PoolTokens {
        &self.tokens
    }

    /// Index of the main token.
    #[must_use]
    pub const fn main_index(&self) -> usize {
        self.main_index
    }

    /// Index of the wrapped token.
    #[must_use]
    pub const fn wrapped_index(&self) -> usize {
        self.wrapped_index
    }

    /// Index of the BPT.
    #[must_use]
    pub const fn bpt_index(&self) -> usize {
        self.bpt_index
    }

    /// Address of the BPT.
    #[must_use]
    pub fn bpt_address(&self) -> Option<TokenAddress> {
        self.tokens.tokens().get(self.bpt_index).map(|t| t.address())
    }

    /// Lower edge of the fee-free band.
    #[must_use]
    pub const fn lower_target(&self) -> U256 {
        self.lower_target
    }

    /// Upper edge of the fee-free band.
    #[must_use]
    pub const fn upper_target(&self) -> U256 {
        self.upper_target
    }

    /// Returns the swap fee.
    #[must_use]
    pub const fn swap_fee(&self) -> SwapFee {
        self.swap_fee
    }

    /// BPT supply outside the pool (18 decimals, raw).
    #[must_use]
    pub const fn virtual_supply(&self) -> Amount {
        self.virtual_supply
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::math::fixed_point::ONE;
    use crate::test_support::token;

    fn tokens() -> PoolTokens {
        let Ok(t) = PoolTokens::with_unit_rates(
            vec![token(1, 6), token(2, 18), token(3, 18)],
            vec![Amount::from_u128(1), Amount::from_u128(1), Amount::from_u128(1)],
        ) else {
            panic!("valid tokens");
        };
        t
    }

    #[test]
    fn bpt_index_is_derived() {
        let Ok(cfg) = LinearConfig::new(
            PoolId::new("0x3"),
            tokens(),
            0,
            2,
            ONE,
            ONE * U256::from(2u64),
            SwapFee::ZERO,
            Amount::from_u128(10),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(cfg.bpt_index(), 1);
        assert_eq!(cfg.bpt_address(), Some(TokenAddress::from_bytes([2; 20])));
    }

    #[test]
    fn inverted_targets_rejected() {
        let result = LinearConfig::new(
            PoolId::new("0x3"),
            tokens(),
            0,
            1,
            ONE * U256::from(2u64),
            ONE,
            SwapFee::ZERO,
            Amount::from_u128(10),
        );
        assert!(result.is_err());
    }

    #[test]
    fn clashing_indices_rejected() {
        let result = LinearConfig::new(
            PoolId::new("0x3"),
            tokens(),
            1,
            1,
            U256::ZERO,
            ONE,
            SwapFee::ZERO,
            Amount::from_u128(10),
        );
        assert!(matches!(result, Err(AmmError::InvalidConfiguration(_))));
    }
}
