//! Uniform capability set of every pool family.
//!
//! [`SwapPool`] is the only surface the route proposer and the optimizer
//! see.  It covers four concerns:
//!
//! 1. **Identity**: [`SwapPool::id`], [`SwapPool::pool_type`],
//!    [`SwapPool::tokens`], [`SwapPool::swap_fee`].
//! 2. **Quotes**: [`SwapPool::out_given_exact_in`] and
//!    [`SwapPool::in_given_exact_out`], on raw token amounts.
//! 3. **Marginal prices**: [`SwapPool::spot_price_after_swap`] and its
//!    derivative, which drive the optimizer's price equalization.
//! 4. **Capacity**: [`SwapPool::limit_amount`] and
//!    [`SwapPool::normalized_liquidity`], used to rank and bound paths.
//!
//! # Units
//!
//! Amounts in and out are raw token units ([`Amount`]).  Prices are
//! `1e18`-scaled "units of `token_in` per unit of `token_out`" in
//! decimal-normalised terms, fee included, so a price never decreases as
//! the trade grows.  Derivatives are `1e18`-scaled per whole token of the
//! request's fixed side (input for exact-in, output for exact-out).
//!
//! # Fee Convention
//!
//! Exact-in quotes remove the fee from the input before the invariant is
//! evaluated; exact-out quotes gross the required input up by the fee
//! afterwards.
//!
//! # Dispatch Model
//!
//! Pools are dispatched via the `PoolBox` enum (not `dyn` trait objects);
//! see the `pools` module.

use alloy_primitives::U256;

use crate::domain::{Amount, PoolId, PoolType, SwapFee, SwapType, Token, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point::{self, ONE};

/// Core trait for all liquidity pools.
///
/// Every failure is an [`AmmError`]; callers treat any recoverable error
/// (see [`AmmError::is_fatal`]) as "pool unusable for this trade".
///
/// # Errors
///
/// Common error variants include:
///
/// - [`AmmError::InvalidToken`]: a token is not part of the pool, or both
///   tokens are the same
/// - [`AmmError::InsufficientLiquidity`]: the amount exceeds the pool's
///   safe capacity
/// - [`AmmError::NewtonRaphsonNonConvergence`]: an iterative solver hit its
///   cap
/// - [`AmmError::AssetBoundsExceeded`]: a Gyro or FX curve boundary was
///   crossed
/// - [`AmmError::Unsupported`]: the family has no closed-form derivative
pub trait SwapPool {
    /// Returns the pool identifier.
    #[must_use]
    fn id(&self) -> &PoolId;

    /// Returns the pool family.
    #[must_use]
    fn pool_type(&self) -> PoolType;

    /// Returns the pool's tokens in pool order.
    #[must_use]
    fn tokens(&self) -> &[Token];

    /// Returns the swap fee.
    #[must_use]
    fn swap_fee(&self) -> SwapFee;

    /// Returns `true` if the pool can trade `token`.
    #[must_use]
    fn contains(&self, token: TokenAddress) -> bool {
        self.tokens().iter().any(|t| t.address() == token)
    }

    /// Amount of `token_out` received for exactly `amount_in` of
    /// `token_in`, rounded down.
    ///
    /// # Errors
    ///
    /// See the trait-level documentation.
    fn out_given_exact_in(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_in: Amount,
    ) -> Result<Amount, AmmError>;

    /// Amount of `token_in` required to receive exactly `amount_out` of
    /// `token_out`, rounded up.
    ///
    /// # Errors
    ///
    /// See the trait-level documentation.
    fn in_given_exact_out(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_out: Amount,
    ) -> Result<Amount, AmmError>;

    /// Quotes `amount` in the direction given by `swap_type`: the output
    /// for exact-in, the required input for exact-out.
    ///
    /// # Errors
    ///
    /// See the trait-level documentation.
    fn quote(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<Amount, AmmError> {
        match swap_type {
            SwapType::ExactIn => self.out_given_exact_in(token_in, token_out, amount),
            SwapType::ExactOut => self.in_given_exact_out(token_in, token_out, amount),
        }
    }

    /// Current marginal price, identical to the price after a zero-amount
    /// swap.
    ///
    /// # Errors
    ///
    /// See the trait-level documentation.
    fn spot_price(&self, token_in: TokenAddress, token_out: TokenAddress) -> Result<U256, AmmError> {
        self.spot_price_after_swap(token_in, token_out, Amount::ZERO, SwapType::ExactIn)
    }

    /// Marginal price at the balances left by a swap of `amount` (input for
    /// exact-in, output for exact-out).
    ///
    /// # Errors
    ///
    /// See the trait-level documentation.
    fn spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError>;

    /// Derivative of [`SwapPool::spot_price_after_swap`] with respect to the
    /// swapped amount.
    ///
    /// # Errors
    ///
    /// [`AmmError::Unsupported`] for families without a closed form, plus
    /// the errors listed on the trait.
    fn derivative_spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError>;

    /// Largest raw amount the pool accepts for a trade of `swap_type` (an
    /// input amount for exact-in, an output amount for exact-out).
    ///
    /// # Errors
    ///
    /// See the trait-level documentation.
    fn limit_amount(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        swap_type: SwapType,
    ) -> Result<Amount, AmmError>;

    /// Liquidity proxy used to rank pools for a pair: the reciprocal of the
    /// exact-out price derivative at zero, in `1e18`-scaled whole tokens.
    ///
    /// # Errors
    ///
    /// Propagates derivative errors; a zero derivative (a flat curve)
    /// reports the largest representable liquidity.
    fn normalized_liquidity(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
    ) -> Result<U256, AmmError> {
        let derivative =
            self.derivative_spot_price_after_swap(token_in, token_out, Amount::ZERO, SwapType::ExactOut)?;
        if derivative.is_zero() {
            return Ok(U256::MAX);
        }
        fixed_point::div_down(ONE, derivative)
    }
}
