//! Configuration for pools that hold their own pool-share token
//! (PhantomStable and ComposableStable).

use alloy_primitives::U256;

use super::stable::{validate_amplification, MAX_STABLE_TOKENS};
use super::PoolTokens;
use crate::domain::{Amount, PoolId, PoolType, SwapFee, TokenAddress};
use crate::error::AmmError;

/// Configuration for a composable stable pool.
///
/// The pool's BPT (its share token, at `bpt_address`) is one of the listed
/// tokens.  Swaps between two underlying tokens follow the stable curve on
/// rate-scaled balances; swaps to or from the BPT are single-token joins
/// and exits priced against `virtual_supply`, the BPT in circulation
/// outside the pool.
///
/// # Validation
///
/// - The BPT is listed exactly once, alongside 2 to 5 other tokens.
/// - Amplification within `[1, 5000]`.
/// - Non-zero virtual supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposableStableConfig {
    id: PoolId,
    bpt_address: TokenAddress,
    tokens: PoolTokens,
    amplification: U256,
    swap_fee: SwapFee,
    virtual_supply: Amount,
    phantom: bool,
}

impl ComposableStableConfig {
    /// Creates a new `ComposableStableConfig`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if the BPT is missing, the token
    ///   count is out of range, or the amplification is out of range.
    /// - [`AmmError::ZeroReserve`] for a zero virtual supply.
    pub fn new(
        id: PoolId,
        bpt_address: TokenAddress,
        tokens: PoolTokens,
        amplification: U256,
        swap_fee: SwapFee,
        virtual_supply: Amount,
    ) -> Result<Self, AmmError> {
        let config = Self {
            id,
            bpt_address,
            tokens,
            amplification,
            swap_fee,
            virtual_supply,
            phantom: false,
        };
        config.validate()?;
        Ok(config)
    }

    /// Marks the pool as a PhantomStable pool, the earlier deployment of
    /// the same curve.
    #[must_use]
    pub const fn phantom(mut self) -> Self {
        self.phantom = true;
        self
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`ComposableStableConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        self.tokens.validate()?;
        if self.tokens.index_of(self.bpt_address).is_none() {
            return Err(AmmError::InvalidConfiguration(
                "composable pool must list its own BPT",
            ));
        }
        let underlying = self.tokens.len() - 1;
        if !(2..=MAX_STABLE_TOKENS).contains(&underlying) {
            return Err(AmmError::InvalidConfiguration(
                "composable pools hold 2 to 5 tokens besides the BPT",
            ));
        }
        validate_amplification(self.amplification)?;
        if self.virtual_supply.is_zero() {
            return Err(AmmError::ZeroReserve);
        }
        Ok(())
    }

    /// Returns the pool id.
    #[must_use]
    pub const fn id(&self) -> &PoolId {
        &self.id
    }

    /// Returns the BPT address.
    #[must_use]
    pub const fn bpt_address(&self) -> TokenAddress {
        self.bpt_address
    }

    /// Returns the token list, BPT included.
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

    /// Returns the BPT supply outside the pool (18 decimals, raw).
    #[must_use]
    pub const fn virtual_supply(&self) -> Amount {
        self.virtual_supply
    }

    /// Returns the pool family this configuration describes.
    #[must_use]
    pub const fn pool_type(&self) -> PoolType {
        if self.phantom {
            PoolType::PhantomStable
        } else {
            PoolType::ComposableStable
        }
    }
}
