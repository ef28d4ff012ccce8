//! FX pool: two stable-ish currencies priced through oracle rates.
//!
//! Raw amounts are converted to `1e18` token units, then to numeraire
//! with each token's oracle rate.  The curve itself lives in
//! [`super::fx_math`]; this module adds the `epsilon` base fee (taken from
//! the output on exact-in and added to the input on exact-out) and the
//! conversion back to raw units.

use alloy_primitives::U256;

use super::common::{ScaledBalances, MAX_OUT_RATIO};
use super::fx_math::{FxCurve, FxState};
use crate::config::{FxConfig, SolverConfig};
use crate::domain::{Amount, PoolId, PoolType, Rounding, SwapFee, SwapType, Token, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point::{self, ONE};
use crate::traits::{FromConfig, SwapPool};

/// Divisor of the fixed-side balance used as the finite-difference step.
const DERIVATIVE_STEP_DIVISOR: u64 = 1_000_000;

/// Attempts at shrinking the par halt room to a tradeable limit.
const LIMIT_HALVINGS: usize = 8;

/// A Xave FX curve pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FxPool {
    id: PoolId,
    scaled: ScaledBalances,
    oracle_rates: [U256; 2],
    curve: FxCurve,
    state: FxState,
    epsilon: U256,
}

impl FxPool {
    fn oracle_rate(&self, index: usize) -> U256 {
        self.oracle_rates.get(index).copied().unwrap_or(ONE)
    }

    /// Scaled token units into numeraire.
    fn to_numeraire(&self, index: usize, amount: U256, rounding: Rounding) -> Result<U256, AmmError> {
        fixed_point::mul(amount, self.oracle_rate(index), rounding)
    }

    fn from_numeraire(&self, index: usize, amount: U256, rounding: Rounding) -> Result<U256, AmmError> {
        fixed_point::div(amount, self.oracle_rate(index), rounding)
    }

    /// Marginal price (`1e18` token_in per token_out) after a trade of
    /// `amount` raw units on the fixed side of `swap_type`.
    fn price_at(&self, i: usize, o: usize, amount: Amount, swap_type: SwapType) -> Result<U256, AmmError> {
        let fixed = if swap_type.is_exact_in() { i } else { o };
        let numeraire = self.to_numeraire(fixed, self.scaled.upscale(fixed, amount)?, Rounding::Down)?;
        let (_, after) = self.curve.trade(&self.state, i, o, numeraire, swap_type)?;
        let rate = self.curve.marginal_rate(&self.state, &after, i, o)?;

        let rate_in = self.oracle_rate(i);
        let rate_out = self.oracle_rate(o);
        let price = match swap_type {
            SwapType::ExactIn => {
                let net = fixed_point::mul_down(rate_in, fixed_point::sub(ONE, self.epsilon)?)?;
                fixed_point::div_up(rate_out, fixed_point::mul_down(net, rate)?)?
            }
            SwapType::ExactOut => {
                let gross = fixed_point::mul_up(rate_out, fixed_point::add(ONE, self.epsilon)?)?;
                fixed_point::div_up(gross, fixed_point::mul_down(rate_in, rate)?)?
            }
        };
        self.scaled.price_to_human(price, i, o)
    }

    fn accepts(&self, i: usize, o: usize, amount: Amount, swap_type: SwapType) -> bool {
        let fixed = if swap_type.is_exact_in() { i } else { o };
        self.scaled
            .upscale(fixed, amount)
            .and_then(|scaled| self.to_numeraire(fixed, scaled, Rounding::Down))
            .and_then(|numeraire| self.curve.trade(&self.state, i, o, numeraire, swap_type))
            .is_ok()
    }
}

impl FromConfig<FxConfig> for FxPool {
    /// # Errors
    ///
    /// - Propagates [`FxConfig::validate`] and [`SolverConfig::validate`]
    ///   errors.
    /// - [`AmmError::ZeroReserve`] if a balance is zero.
    fn from_config(config: &FxConfig, solver: &SolverConfig) -> Result<Self, AmmError> {
        config.validate()?;
        solver.validate()?;
        let scaled = ScaledBalances::new(config.tokens(), false)?;
        if scaled.has_zero_balance() {
            return Err(AmmError::ZeroReserve);
        }
        let rates = config.oracle_rates();
        let mut numeraire = [U256::ZERO; 2];
        for (slot, (balance, rate)) in numeraire.iter_mut().zip(scaled.balances().iter().zip(rates)) {
            *slot = fixed_point::mul_down(*balance, rate)?;
        }
        Ok(Self {
            id: config.id().clone(),
            curve: FxCurve::new(config.params(), solver.fx_max_iterations)?,
            state: FxState::new(numeraire)?,
            epsilon: config.params().epsilon,
            oracle_rates: rates,
            scaled,
        })
    }
}

impl SwapPool for FxPool {
    fn id(&self) -> &PoolId {
        &self.id
    }

    fn pool_type(&self) -> PoolType {
        PoolType::Fx
    }

    fn tokens(&self) -> &[Token] {
        self.scaled.tokens()
    }

    fn swap_fee(&self) -> SwapFee {
        SwapFee::new(self.epsilon).unwrap_or(SwapFee::ZERO)
    }

    fn out_given_exact_in(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_in: Amount,
    ) -> Result<Amount, AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        if amount_in.is_zero() {
            return Ok(Amount::ZERO);
        }
        let input = self.to_numeraire(i, self.scaled.upscale(i, amount_in)?, Rounding::Down)?;
        let (output, _) = self.curve.trade(&self.state, i, o, input, SwapType::ExactIn)?;
        let output = fixed_point::mul_down(output, fixed_point::sub(ONE, self.epsilon)?)?;
        let scaled = self.from_numeraire(o, output, Rounding::Down)?;
        self.scaled.downscale(o, scaled, Rounding::Down)
    }

    fn in_given_exact_out(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_out: Amount,
    ) -> Result<Amount, AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        if amount_out.is_zero() {
            return Ok(Amount::ZERO);
        }
        let output = self.to_numeraire(o, self.scaled.upscale(o, amount_out)?, Rounding::Up)?;
        let (input, _) = self.curve.trade(&self.state, i, o, output, SwapType::ExactOut)?;
        let input = fixed_point::mul_up(input, fixed_point::add(ONE, self.epsilon)?)?;
        let scaled = self.from_numeraire(i, input, Rounding::Up)?;
        self.scaled.downscale(i, scaled, Rounding::Up)
    }

    fn spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        self.price_at(i, o, amount, swap_type)
    }

    /// Secant of the marginal price over a step of one millionth of the
    /// fixed-side balance.
    fn derivative_spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        let fixed = if swap_type.is_exact_in() { i } else { o };
        let step = (self.scaled.raw_balance(fixed).get() / U256::from(DERIVATIVE_STEP_DIVISOR)).max(U256::from(1u64));
        let here = self.price_at(i, o, amount, swap_type)?;
        let there = self.price_at(i, o, Amount::new(fixed_point::add(amount.get(), step)?), swap_type)?;
        let step_scaled = self.scaled.upscale(fixed, Amount::new(step))?;
        fixed_point::div_down(there.saturating_sub(here), step_scaled)
    }

    fn limit_amount(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        swap_type: SwapType,
    ) -> Result<Amount, AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        let capacity = fixed_point::mul_down(self.curve.halt_capacity(&self.state, i, o)?, MAX_OUT_RATIO)?;
        let fixed = if swap_type.is_exact_in() { i } else { o };
        let scaled = self.from_numeraire(fixed, capacity, Rounding::Down)?;
        let mut limit = self.scaled.downscale(fixed, scaled, Rounding::Down)?.get();
        if !swap_type.is_exact_in() {
            limit = limit.min(fixed_point::mul_down(self.scaled.raw_balance(o).get(), MAX_OUT_RATIO)?);
        }
        // The halt room is measured at par; shrink it until the curve
        // accepts the trade.
        for _ in 0..LIMIT_HALVINGS {
            if limit.is_zero() || self.accepts(i, o, Amount::new(limit), swap_type) {
                return Ok(Amount::new(limit));
            }
            limit /= U256::from(2u64);
        }
        Ok(Amount::ZERO)
    }

    /// Output balance in whole tokens; the curve is flat inside its band.
    fn normalized_liquidity(&self, token_in: TokenAddress, token_out: TokenAddress) -> Result<U256, AmmError> {
        let (_, o) = self.scaled.indices(token_in, token_out)?;
        Ok(self.scaled.balance(o))
    }
}
