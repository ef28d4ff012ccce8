//! Configuration for Stable and MetaStable pools.

use alloy_primitives::U256;

use super::PoolTokens;
use crate::domain::{PoolId, SwapFee};
use crate::error::AmmError;

/// Precision of the stored amplification parameter.
pub const AMP_PRECISION: u64 = 1_000;

/// Smallest accepted amplification coefficient (before precision).
pub const MIN_AMP: u64 = 1;

/// Largest accepted amplification coefficient (before precision).
pub const MAX_AMP: u64 = 5_000;

/// Maximum number of tokens in a stable pool (excluding a pool-share token).
pub const MAX_STABLE_TOKENS: usize = 5;

/// Configuration for a stable-swap pool.
///
/// # Amplification Parameter
///
/// The amplification coefficient `A` controls the curve shape:
///
/// - `A = 1`: close to a constant product curve.
/// - `A → ∞`: approaches constant sum (1:1 swaps).
/// - Typical range for stablecoin pools: 50 to 2000.
///
/// It is stored multiplied by [`AMP_PRECISION`], matching the value the
/// pool contract reports.
///
/// # Invariant
///
/// ```text
/// A·nⁿ·Σxᵢ + D = A·D·nⁿ + Dⁿ⁺¹ / (nⁿ·Πxᵢ)
/// ```
///
/// # MetaStable
///
/// A MetaStable pool is the same curve evaluated on balances multiplied by
/// each token's price rate (see [`PoolTokens::rates`]).  `meta` selects
/// that behaviour; plain stable pools ignore the rates.
///
/// # Validation
///
/// - 2 to 5 tokens.
/// - `A` within `[1, 5000]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StableConfig {
    id: PoolId,
    tokens: PoolTokens,
    amplification: U256,
    swap_fee: SwapFee,
    meta: bool,
}

impl StableConfig {
    /// Creates a new `StableConfig`.
    ///
    /// `amplification` is the precision-scaled value (`A * 1000`).
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] for a bad token count or an
    ///   amplification outside `[1, 5000]`.
    pub fn new(
        id: PoolId,
        tokens: PoolTokens,
        amplification: U256,
        swap_fee: SwapFee,
        meta: bool,
    ) -> Result<Self, AmmError> {
        let config = Self {
            id,
            tokens,
            amplification,
            swap_fee,
            meta,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`StableConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        self.tokens.validate()?;
        if self.tokens.len() > MAX_STABLE_TOKENS {
            return Err(AmmError::InvalidConfiguration(
                "stable pools hold at most 5 tokens",
            ));
        }
        validate_amplification(self.amplification)
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

    /// Returns the precision-scaled amplification (`A * 1000`).
    #[must_use]
    pub const fn amplification(&self) -> U256 {
        self.amplification
    }

    /// Returns the swap fee.
    #[must_use]
    pub const fn swap_fee(&self) -> SwapFee {
        self.swap_fee
    }

    /// Returns `true` for a MetaStable pool.
    #[must_use]
    pub const fn is_meta(&self) -> bool {
        self.meta
    }
}

pub(crate) fn validate_amplification(amplification: U256) -> Result<(), AmmError> {
    let min = U256::from(MIN_AMP * AMP_PRECISION);
    let max = U256::from(MAX_AMP * AMP_PRECISION);
    if amplification < min || amplification > max {
        return Err(AmmError::InvalidConfiguration(
            "amplification must be within [1, 5000]",
        ));
    }
    Ok(())
}
