//! Configuration for Weighted pools (Balancer style).

use alloy_primitives::U256;

use super::PoolTokens;
use crate::domain::{PoolId, SwapFee};
use crate::error::AmmError;
use crate::math::fixed_point::ONE;

/// Maximum number of tokens in a weighted pool.
pub const MAX_WEIGHTED_TOKENS: usize = 8;

// 1%, the vault's minimum normalized weight.
const MIN_WEIGHT: U256 = U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]);

/// Configuration for a Weighted pool supporting up to eight tokens with
/// custom weight distributions.
///
/// # Invariant
///
/// ```text
/// ∏(Bᵢ ^ Wᵢ) = k
/// ```
///
/// where `Bᵢ` is the balance of token `i` and `Wᵢ` its normalized weight
/// (`1e18`-scaled, e.g. `0.5e18` for 50%).
///
/// # Validation
///
/// - 2 to 8 tokens.
/// - One weight per token, each at least 1%.
/// - Weights sum to exactly `1e18`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedConfig {
    id: PoolId,
    tokens: PoolTokens,
    weights: Vec<U256>,
    swap_fee: SwapFee,
}

impl WeightedConfig {
    /// Creates a new `WeightedConfig`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] for a bad token count.
    /// - [`AmmError::InvalidWeight`] if a weight is below 1% or the weights
    ///   do not sum to one.
    pub fn new(
        id: PoolId,
        tokens: PoolTokens,
        weights: Vec<U256>,
        swap_fee: SwapFee,
    ) -> Result<Self, AmmError> {
        let config = Self {
            id,
            tokens,
            weights,
            swap_fee,
        };
        config.validate()?;
        Ok(config)
    }

    /// Normalizes arbitrary positive weights (`"40"`, `"60"` or `"0.4"`,
    /// `"0.6"`) so they sum to exactly one; the last weight absorbs the
    /// rounding remainder.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidWeight`] if the weights sum to zero.
    pub fn normalize_weights(raw: &[U256]) -> Result<Vec<U256>, AmmError> {
        let total = raw.iter().try_fold(U256::ZERO, |acc, w| acc.checked_add(*w));
        let Some(total) = total.filter(|t| !t.is_zero()) else {
            return Err(AmmError::InvalidWeight("weights must sum to a positive value"));
        };
        let mut normalized = Vec::with_capacity(raw.len());
        let mut assigned = U256::ZERO;
        for (i, w) in raw.iter().enumerate() {
            let value = if i + 1 == raw.len() {
                ONE.checked_sub(assigned)
                    .ok_or(AmmError::InvalidWeight("weights overflow one"))?
            } else {
                crate::math::fixed_point::mul_div(*w, ONE, total, crate::domain::Rounding::Down)?
            };
            assigned += value;
            normalized.push(value);
        }
        Ok(normalized)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`WeightedConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        self.tokens.validate()?;
        if self.tokens.len() > MAX_WEIGHTED_TOKENS {
            return Err(AmmError::InvalidConfiguration(
                "weighted pools hold at most 8 tokens",
            ));
        }
        if self.weights.len() != self.tokens.len() {
            return Err(AmmError::InvalidConfiguration(
                "one weight per token is required",
            ));
        }
        if self.weights.iter().any(|w| *w < MIN_WEIGHT) {
            return Err(AmmError::InvalidWeight("every weight must be at least 1%"));
        }
        let sum = self
            .weights
            .iter()
            .try_fold(U256::ZERO, |acc, w| acc.checked_add(*w));
        if sum != Some(ONE) {
            return Err(AmmError::InvalidWeight("weights must sum to exactly one"));
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

    /// Returns the normalized weights.
    #[must_use]
    pub fn weights(&self) -> &[U256] {
        &self.weights
    }

    /// Returns the swap fee.
    #[must_use]
    pub const fn swap_fee(&self) -> SwapFee {
        self.swap_fee
    }
}
