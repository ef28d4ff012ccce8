//! Configuration for FX pools (Xave curve).

use alloy_primitives::U256;

use super::PoolTokens;
use crate::domain::PoolId;
use crate::error::AmmError;
use crate::math::fixed_point::ONE;

/// Curve parameters of an FX pool, all `1e18`-scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FxParams {
    /// Halt threshold: trades may not push a token's weight further than
    /// `alpha` away from 50%.
    pub alpha: U256,
    /// Width of the fee-free band around 50%.
    pub beta: U256,
    /// Penalty slope applied outside the `beta` band.
    pub delta: U256,
    /// Base fee charged on every trade.
    pub epsilon: U256,
    /// Share of the penalty rebated to trades that restore balance.
    pub lambda: U256,
}

/// Configuration for a two-token FX pool.
///
/// Balances are valued in a common numeraire (USD) using the oracle rate
/// recorded for each token in the snapshot; the pool never fetches rates
/// itself.  The base fee is `epsilon`, so there is no separate swap fee.
///
/// # Validation
///
/// - Exactly 2 tokens with non-zero oracle rates.
/// - `0 < alpha < 1`, `beta < alpha`, `epsilon < 1`, `lambda <= 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FxConfig {
    id: PoolId,
    tokens: PoolTokens,
    params: FxParams,
    oracle_rates: [U256; 2],
}

impl FxConfig {
    /// Creates a new `FxConfig`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] for a token count other than 2.
    /// - [`AmmError::InvalidPrice`] for a zero oracle rate.
    /// - [`AmmError::DegenerateParameters`] for out-of-range curve parameters.
    pub fn new(
        id: PoolId,
        tokens: PoolTokens,
        params: FxParams,
        oracle_rates: [U256; 2],
    ) -> Result<Self, AmmError> {
        let config = Self {
            id,
            tokens,
            params,
            oracle_rates,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`FxConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        self.tokens.validate()?;
        if self.tokens.len() != 2 {
            return Err(AmmError::InvalidConfiguration("FX pools hold exactly 2 tokens"));
        }
        if self.oracle_rates.iter().any(U256::is_zero) {
            return Err(AmmError::InvalidPrice("oracle rate must be non-zero"));
        }
        let p = &self.params;
        if p.alpha.is_zero() || p.alpha >= ONE {
            return Err(AmmError::DegenerateParameters("alpha must lie in (0, 1)"));
        }
        if p.beta >= p.alpha {
            return Err(AmmError::DegenerateParameters("beta must be below alpha"));
        }
        if p.epsilon >= ONE {
            return Err(AmmError::DegenerateParameters("epsilon must be below one"));
        }
        if p.lambda > ONE {
            return Err(AmmError::DegenerateParameters("lambda must not exceed one"));
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

    /// Returns the curve parameters.
    #[must_use]
    pub const fn params(&self) -> &FxParams {
        &self.params
    }

    /// Oracle rates (`1e18`-scaled USD per token), in token order.
    #[must_use]
    pub const fn oracle_rates(&self) -> [U256; 2] {
        self.oracle_rates
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Amount;
    use crate::test_support::token;

    fn tokens() -> PoolTokens {
        let Ok(t) = PoolTokens::with_unit_rates(
            vec![token(1, 6), token(2, 6)],
            vec![Amount::from_u128(1_000_000), Amount::from_u128(1_000_000)],
        ) else {
            panic!("valid tokens");
        };
        t
    }

    fn e18(milli: u64) -> U256 {
        U256::from(milli) * U256::from(1_000_000_000_000_000u64)
    }

    fn params() -> FxParams {
        FxParams {
            alpha: e18(800),
            beta: e18(400),
            delta: e18(300),
            epsilon: U256::from(1_500_000_000_000_000u64),
            lambda: ONE,
        }
    }

    #[test]
    fn valid_config() {
        let result = FxConfig::new(PoolId::new("0xf"), tokens(), params(), [ONE, e18(1_100)]);
        assert!(result.is_ok());
    }

    #[test]
    fn zero_oracle_rate_rejected() {
        let result = FxConfig::new(PoolId::new("0xf"), tokens(), params(), [ONE, U256::ZERO]);
        assert!(matches!(result, Err(AmmError::InvalidPrice(_))));
    }

    #[test]
    fn beta_must_be_inside_alpha() {
        let bad = FxParams { beta: e18(900), ..params() };
        let result = FxConfig::new(PoolId::new("0xf"), tokens(), bad, [ONE, ONE]);
        assert!(matches!(result, Err(AmmError::DegenerateParameters(_))));
    }
}
