//! Weighted pool implementation (Balancer style).
//!
//! # Invariant
//!
//! ```text
//! ∏ Bᵢ^wᵢ = k
//! ```
//!
//! Closed-form swaps, marginal prices and price derivatives.  Trades may
//! not move more than 30% of the balance on the fixed side
//! (`MAX_IN_RATIO` / `MAX_OUT_RATIO`).

use alloy_primitives::{uint, U256};

use super::common::ScaledBalances;
use crate::config::{SolverConfig, WeightedConfig};
use crate::domain::{Amount, PoolId, PoolType, Rounding, SwapFee, SwapType, Token, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point::{self, ONE};
use crate::traits::{FromConfig, SwapPool};

/// 30% of a balance.
const MAX_RATIO: U256 = uint!(300_000_000_000_000_000_U256);

// ---------------------------------------------------------------------------
// Weighted math (scaled domain, fee already removed)
// ---------------------------------------------------------------------------

/// `Bo · (1 - (Bi / (Bi + Ai))^(wi/wo))`, rounded down.
fn calc_out_given_in(
    balance_in: U256,
    weight_in: U256,
    balance_out: U256,
    weight_out: U256,
    amount_in: U256,
) -> Result<U256, AmmError> {
    if amount_in > fixed_point::mul_down(balance_in, MAX_RATIO)? {
        return Err(AmmError::InsufficientLiquidity);
    }
    let denominator = fixed_point::add(balance_in, amount_in)?;
    let base = fixed_point::div_up(balance_in, denominator)?;
    let exponent = fixed_point::div_down(weight_in, weight_out)?;
    let power = fixed_point::pow_up(base, exponent)?;
    fixed_point::mul_down(balance_out, fixed_point::complement(power))
}

/// `Bi · ((Bo / (Bo - Ao))^(wo/wi) - 1)`, rounded up.
fn calc_in_given_out(
    balance_in: U256,
    weight_in: U256,
    balance_out: U256,
    weight_out: U256,
    amount_out: U256,
) -> Result<U256, AmmError> {
    if amount_out > fixed_point::mul_down(balance_out, MAX_RATIO)? {
        return Err(AmmError::InsufficientLiquidity);
    }
    let base = fixed_point::div_up(balance_out, fixed_point::sub(balance_out, amount_out)?)?;
    let exponent = fixed_point::div_up(weight_out, weight_in)?;
    let power = fixed_point::pow_up(base, exponent)?;
    let ratio = fixed_point::sub(power, ONE)?;
    fixed_point::mul_up(balance_in, ratio)
}

/// Balances on both sides after a swap of `amount` (gross of fee).
fn balances_after(
    bi: U256,
    wi: U256,
    bo: U256,
    wo: U256,
    fee: SwapFee,
    amount: U256,
    swap_type: SwapType,
) -> Result<(U256, U256), AmmError> {
    if amount.is_zero() {
        return Ok((bi, bo));
    }
    match swap_type {
        SwapType::ExactIn => {
            let net = fee.subtract_from(amount)?;
            let new_in = fixed_point::add(bi, net)?;
            let ratio = fixed_point::div_down(bi, new_in)?;
            let shrink = fixed_point::pow_down(ratio, fixed_point::div_down(wi, wo)?)?;
            Ok((new_in, fixed_point::mul_down(bo, shrink)?))
        }
        SwapType::ExactOut => {
            let new_out = fixed_point::sub(bo, amount)?;
            if new_out.is_zero() {
                return Err(AmmError::InsufficientLiquidity);
            }
            let ratio = fixed_point::div_down(bo, new_out)?;
            let grow = fixed_point::pow_down(ratio, fixed_point::div_down(wo, wi)?)?;
            Ok((fixed_point::mul_down(bi, grow)?, new_out))
        }
    }
}

/// Marginal price `(Bi'/wi) / (Bo'/wo) / (1 - f)`.
fn spot_price(bi: U256, wi: U256, bo: U256, wo: U256, fee: SwapFee) -> Result<U256, AmmError> {
    let numerator = fixed_point::div_down(bi, wi)?;
    let denominator = fixed_point::mul_down(fixed_point::div_down(bo, wo)?, fee.complement())?;
    fixed_point::div_down(numerator, denominator)
}

// ---------------------------------------------------------------------------
// WeightedPool
// ---------------------------------------------------------------------------

/// A Balancer weighted pool with up to eight tokens.
///
/// Created from a [`WeightedConfig`] via [`FromConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedPool {
    id: PoolId,
    scaled: ScaledBalances,
    weights: Vec<U256>,
    swap_fee: SwapFee,
}

impl WeightedPool {
    /// Returns the normalized weights.
    #[must_use]
    pub fn weights(&self) -> &[U256] {
        &self.weights
    }

    fn weight(&self, index: usize) -> U256 {
        self.weights.get(index).copied().unwrap_or_default()
    }

    fn pair(&self, token_in: TokenAddress, token_out: TokenAddress) -> Result<Pair, AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        Ok(Pair {
            i,
            o,
            bi: self.scaled.balance(i),
            wi: self.weight(i),
            bo: self.scaled.balance(o),
            wo: self.weight(o),
        })
    }
}

struct Pair {
    i: usize,
    o: usize,
    bi: U256,
    wi: U256,
    bo: U256,
    wo: U256,
}

impl FromConfig<WeightedConfig> for WeightedPool {
    /// Creates a new pool from the given configuration.
    ///
    /// # Errors
    ///
    /// - Propagates any error from [`WeightedConfig::validate`].
    /// - Returns [`AmmError::ZeroReserve`] if any balance is zero.
    fn from_config(config: &WeightedConfig, _solver: &SolverConfig) -> Result<Self, AmmError> {
        config.validate()?;
        let scaled = ScaledBalances::new(config.tokens(), false)?;
        if scaled.has_zero_balance() {
            return Err(AmmError::ZeroReserve);
        }
        Ok(Self {
            id: config.id().clone(),
            scaled,
            weights: config.weights().to_vec(),
            swap_fee: config.swap_fee(),
        })
    }
}

impl SwapPool for WeightedPool {
    fn id(&self) -> &PoolId {
        &self.id
    }

    fn pool_type(&self) -> PoolType {
        PoolType::Weighted
    }

    fn tokens(&self) -> &[Token] {
        self.scaled.tokens()
    }

    fn swap_fee(&self) -> SwapFee {
        self.swap_fee
    }

    fn out_given_exact_in(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_in: Amount,
    ) -> Result<Amount, AmmError> {
        let p = self.pair(token_in, token_out)?;
        let net = self.swap_fee.subtract_from(amount_in.get())?;
        let scaled_in = self.scaled.upscale(p.i, Amount::new(net))?;
        let out = calc_out_given_in(p.bi, p.wi, p.bo, p.wo, scaled_in)?;
        self.scaled.downscale(p.o, out, Rounding::Down)
    }

    fn in_given_exact_out(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_out: Amount,
    ) -> Result<Amount, AmmError> {
        let p = self.pair(token_in, token_out)?;
        let scaled_out = self.scaled.upscale(p.o, amount_out)?;
        let scaled_in = calc_in_given_out(p.bi, p.wi, p.bo, p.wo, scaled_out)?;
        let raw_in = self.scaled.downscale(p.i, scaled_in, Rounding::Up)?;
        self.swap_fee.add_to(raw_in.get()).map(Amount::new)
    }

    fn spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let p = self.pair(token_in, token_out)?;
        let fixed_index = if swap_type.is_exact_in() { p.i } else { p.o };
        let scaled = self.scaled.upscale(fixed_index, amount)?;
        let (bi, bo) = balances_after(p.bi, p.wi, p.bo, p.wo, self.swap_fee, scaled, swap_type)?;
        let price = spot_price(bi, p.wi, bo, p.wo, self.swap_fee)?;
        self.scaled.price_to_human(price, p.i, p.o)
    }

    /// Exact-in: `(wi + wo) / (wi · Bo')`.  Exact-out:
    /// `SP · (wi + wo) / (wi · Bo')`.
    fn derivative_spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let p = self.pair(token_in, token_out)?;
        let fixed_index = if swap_type.is_exact_in() { p.i } else { p.o };
        let scaled = self.scaled.upscale(fixed_index, amount)?;
        let (bi, bo) = balances_after(p.bi, p.wi, p.bo, p.wo, self.swap_fee, scaled, swap_type)?;
        let weight_sum = fixed_point::add(p.wi, p.wo)?;
        let slope = fixed_point::div_down(weight_sum, fixed_point::mul_down(p.wi, bo)?)?;
        let derivative = match swap_type {
            SwapType::ExactIn => slope,
            SwapType::ExactOut => {
                fixed_point::mul_down(spot_price(bi, p.wi, bo, p.wo, self.swap_fee)?, slope)?
            }
        };
        self.scaled.derivative_to_human(derivative, p.i, p.o, swap_type)
    }

    fn limit_amount(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        swap_type: SwapType,
    ) -> Result<Amount, AmmError> {
        let p = self.pair(token_in, token_out)?;
        let balance = match swap_type {
            SwapType::ExactIn => self.scaled.raw_balance(p.i),
            SwapType::ExactOut => self.scaled.raw_balance(p.o),
        };
        fixed_point::mul_down(balance.get(), MAX_RATIO).map(Amount::new)
    }

    /// `Bo · wi / (wi + wo)`, in whole tokens.
    fn normalized_liquidity(&self, token_in: TokenAddress, token_out: TokenAddress) -> Result<U256, AmmError> {
        let p = self.pair(token_in, token_out)?;
        let share = fixed_point::div_down(p.wi, fixed_point::add(p.wi, p.wo)?)?;
        fixed_point::mul_down(p.bo, share)
    }
}
