//! FX curve math (Xave "curve" pools).
//!
//! Both balances are valued in a common numeraire and the pool aims at a
//! 50/50 split.  Inside the `beta` band around the ideal balance trades
//! are at par; outside it a quadratic penalty `ψ` applies, capped at 25%
//! of the excess.  A trade's counter amount solves
//!
//! ```text
//! out = in + k · (ω - ψ(new balances))     k = 1 if ω < ψ else λ
//! ```
//!
//! by fixed-point iteration, where `ω` is the penalty before the trade.
//! Trades that push a balance past the `alpha` halt are rejected.
//!
//! All values are signed `1e18` numeraire amounts.

use alloy_primitives::{uint, I256, U256};
use tracing::trace;

use crate::config::FxParams;
use crate::domain::SwapType;
use crate::error::AmmError;
use crate::math::signed_fixed_point::{self as sfp, ONE};

/// Penalty rate cap.
const MAX_FEE: I256 = I256::from_raw(uint!(250_000_000_000_000_000_U256));

/// Convergence granularity of the trade iteration (`1e-7` numeraire).
const CONVERGENCE_UNIT: I256 = I256::from_raw(uint!(100_000_000_000_U256));

/// Tolerated drop in `G - ψ` across a trade.
const MAX_UTILITY_DROP: I256 = I256::from_raw(uint!(1_000_000_000_000_U256));

fn half() -> I256 {
    I256::from_raw(uint!(500_000_000_000_000_000_U256))
}

/// Signed views of the curve parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FxCurve {
    alpha: I256,
    beta: I256,
    delta: I256,
    lambda: I256,
    max_iterations: u32,
}

/// Pool state in numeraire: both balances and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FxState {
    pub(crate) balances: [I256; 2],
    pub(crate) liquidity: I256,
}

impl FxState {
    pub(crate) fn new(balances: [U256; 2]) -> Result<Self, AmmError> {
        let balances = [sfp::to_signed(balances[0])?, sfp::to_signed(balances[1])?];
        Ok(Self {
            liquidity: sfp::add(balances[0], balances[1])?,
            balances,
        })
    }

    fn balance(&self, index: usize) -> I256 {
        self.balances.get(index).copied().unwrap_or_default()
    }

    fn shifted(&self, index: usize, delta: I256) -> Result<Self, AmmError> {
        let mut next = *self;
        if let Some(slot) = next.balances.get_mut(index) {
            *slot = sfp::add(*slot, delta)?;
        }
        next.liquidity = sfp::add(next.liquidity, delta)?;
        Ok(next)
    }
}

impl FxCurve {
    pub(crate) fn new(params: &FxParams, max_iterations: u32) -> Result<Self, AmmError> {
        Ok(Self {
            alpha: sfp::to_signed(params.alpha)?,
            beta: sfp::to_signed(params.beta)?,
            delta: sfp::to_signed(params.delta)?,
            lambda: sfp::to_signed(params.lambda)?,
            max_iterations,
        })
    }

    /// Penalty distance from the band edge and whether the rate is capped.
    fn margin(&self, balance: I256, ideal: I256) -> Result<Option<(I256, bool)>, AmmError> {
        let margin = if balance < ideal {
            let threshold = sfp::mul_down_mag(ideal, sfp::sub(ONE, self.beta)?)?;
            sfp::sub(threshold, balance)?
        } else {
            let threshold = sfp::mul_down_mag(ideal, sfp::add(ONE, self.beta)?)?;
            sfp::sub(balance, threshold)?
        };
        if !margin.is_positive() {
            return Ok(None);
        }
        let rate = sfp::mul_down_mag(sfp::div_down_mag(margin, ideal)?, self.delta)?;
        Ok(Some((margin, rate > MAX_FEE)))
    }

    fn micro_fee(&self, balance: I256, ideal: I256) -> Result<I256, AmmError> {
        let Some((margin, capped)) = self.margin(balance, ideal)? else {
            return Ok(I256::ZERO);
        };
        let rate = if capped {
            MAX_FEE
        } else {
            sfp::mul_down_mag(sfp::div_down_mag(margin, ideal)?, self.delta)?
        };
        sfp::mul_down_mag(rate, margin)
    }

    /// Total penalty `ψ` of a state.
    pub(crate) fn fee(&self, state: &FxState) -> Result<I256, AmmError> {
        let ideal = sfp::mul_down_mag(state.liquidity, half())?;
        if !ideal.is_positive() {
            return Err(AmmError::AssetBoundsExceeded);
        }
        let mut total = I256::ZERO;
        for balance in state.balances {
            total = sfp::add(total, self.micro_fee(balance, ideal)?)?;
        }
        Ok(total)
    }

    /// Directional derivative of one token's penalty when its balance moves
    /// by `d_balance` and its ideal by `d_ideal`.
    fn micro_fee_slope(&self, balance: I256, ideal: I256, d_balance: I256, d_ideal: I256) -> Result<I256, AmmError> {
        let above = balance >= ideal;
        let Some((margin, capped)) = self.margin(balance, ideal)? else {
            return Ok(I256::ZERO);
        };
        let d_margin = if above {
            sfp::sub(d_balance, sfp::mul_down_mag(sfp::add(ONE, self.beta)?, d_ideal)?)?
        } else {
            sfp::sub(sfp::mul_down_mag(sfp::sub(ONE, self.beta)?, d_ideal)?, d_balance)?
        };
        if capped {
            return sfp::mul_down_mag(MAX_FEE, d_margin);
        }
        // fee = δ m² / ideal
        let ratio = sfp::div_down_mag(margin, ideal)?;
        let first = sfp::mul_down_mag(sfp::add(ratio, ratio)?, d_margin)?;
        let second = sfp::mul_down_mag(sfp::mul_down_mag(ratio, ratio)?, d_ideal)?;
        sfp::mul_down_mag(self.delta, sfp::sub(first, second)?)
    }

    /// Derivative of `ψ` along a move of `(d_0, d_1)` in the balances.
    fn fee_slope(&self, state: &FxState, moves: [I256; 2]) -> Result<I256, AmmError> {
        let ideal = sfp::mul_down_mag(state.liquidity, half())?;
        let d_ideal = sfp::mul_down_mag(sfp::add(moves[0], moves[1])?, half())?;
        let mut total = I256::ZERO;
        for (balance, d_balance) in state.balances.into_iter().zip(moves) {
            total = sfp::add(total, self.micro_fee_slope(balance, ideal, d_balance, d_ideal)?)?;
        }
        Ok(total)
    }

    fn penalty_weight(&self, omega: I256, psi: I256) -> I256 {
        if omega < psi {
            ONE
        } else {
            self.lambda
        }
    }

    /// Rejects states that cross the `alpha` halt in the wrong direction.
    fn enforce_halts(&self, before: &FxState, after: &FxState) -> Result<(), AmmError> {
        let o_ideal = sfp::mul_down_mag(before.liquidity, half())?;
        let n_ideal = sfp::mul_down_mag(after.liquidity, half())?;
        for (o_bal, n_bal) in before.balances.into_iter().zip(after.balances) {
            if n_bal > n_ideal {
                let upper = sfp::add(ONE, self.alpha)?;
                let n_halt = sfp::mul_down_mag(n_ideal, upper)?;
                if n_bal > n_halt {
                    let o_halt = sfp::mul_down_mag(o_ideal, upper)?;
                    if o_bal < o_halt || sfp::sub(n_bal, n_halt)? > sfp::sub(o_bal, o_halt)? {
                        return Err(AmmError::AssetBoundsExceeded);
                    }
                }
            } else {
                let lower = sfp::sub(ONE, self.alpha)?;
                let n_halt = sfp::mul_down_mag(n_ideal, lower)?;
                if n_bal < n_halt {
                    let o_halt = sfp::mul_down_mag(o_ideal, lower)?;
                    if o_bal > o_halt || sfp::sub(n_halt, n_bal)? > sfp::sub(o_halt, o_bal)? {
                        return Err(AmmError::AssetBoundsExceeded);
                    }
                }
            }
        }
        Ok(())
    }

    /// Iterates the trade equation.  `input` is signed (positive for an
    /// amount entering the pool, negative for one leaving it) and `state`
    /// already includes it together with a par counter amount; the result
    /// carries the opposite sign and settles on `counter_index`.
    fn calculate_trade(
        &self,
        before: &FxState,
        mut state: FxState,
        input: I256,
        counter_index: usize,
    ) -> Result<(I256, FxState), AmmError> {
        let omega = self.fee(before)?;
        let mut output = -input;
        for round in 0..self.max_iterations {
            let psi = self.fee(&state)?;
            let previous = output;
            let k = self.penalty_weight(omega, psi);
            output = -sfp::add(input, sfp::mul_down_mag(k, sfp::sub(omega, psi)?)?)?;

            state.liquidity = sfp::add(sfp::add(before.liquidity, input)?, output)?;
            if let Some(slot) = state.balances.get_mut(counter_index) {
                *slot = sfp::add(before.balance(counter_index), output)?;
            }
            if state.balances.iter().any(|b| !b.is_positive()) {
                return Err(AmmError::AssetBoundsExceeded);
            }

            if output / CONVERGENCE_UNIT == previous / CONVERGENCE_UNIT {
                trace!(round, %output, "fx trade converged");
                self.enforce_halts(before, &state)?;
                let utility_before = sfp::sub(before.liquidity, omega)?;
                let utility_after = sfp::sub(state.liquidity, self.fee(&state)?)?;
                if sfp::sub(utility_after, utility_before)? < -MAX_UTILITY_DROP {
                    return Err(AmmError::InsufficientLiquidity);
                }
                return Ok((output, state));
            }
        }
        Err(AmmError::NewtonRaphsonNonConvergence("fx trade"))
    }

    /// Counter amount (numeraire, non-negative) of a trade of `amount` and
    /// the state after it.
    ///
    /// Exact-in: `amount` enters at `i`, the result leaves at `o`.
    /// Exact-out: `amount` leaves at `o`, the result enters at `i`.
    pub(crate) fn trade(
        &self,
        before: &FxState,
        i: usize,
        o: usize,
        amount: U256,
        swap_type: SwapType,
    ) -> Result<(U256, FxState), AmmError> {
        if amount.is_zero() {
            return Ok((U256::ZERO, *before));
        }
        let amount = sfp::to_signed(amount)?;
        // The iteration starts from a trade at par.
        let at_par = before.shifted(i, amount)?.shifted(o, -amount)?;
        let (output, state) = match swap_type {
            SwapType::ExactIn => self.calculate_trade(before, at_par, amount, o)?,
            SwapType::ExactOut => self.calculate_trade(before, at_par, -amount, i)?,
        };
        Ok((sfp::to_unsigned(output.abs())?, state))
    }

    /// Marginal output per unit input, `dy/dx = (1 - kψₓ) / (1 + kψᵧ)`,
    /// at `state` for a pool taking token `i` and paying token `o`.
    pub(crate) fn marginal_rate(&self, before: &FxState, state: &FxState, i: usize, o: usize) -> Result<U256, AmmError> {
        let omega = self.fee(before)?;
        let psi = self.fee(state)?;
        let k = self.penalty_weight(omega, psi);

        let mut move_in = [I256::ZERO; 2];
        let mut move_out = [I256::ZERO; 2];
        if let Some(slot) = move_in.get_mut(i) {
            *slot = ONE;
        }
        if let Some(slot) = move_out.get_mut(o) {
            *slot = -ONE;
        }
        let psi_x = self.fee_slope(state, move_in)?;
        let psi_y = self.fee_slope(state, move_out)?;

        let numerator = sfp::sub(ONE, sfp::mul_down_mag(k, psi_x)?)?;
        let denominator = sfp::add(ONE, sfp::mul_down_mag(k, psi_y)?)?;
        if !numerator.is_positive() || !denominator.is_positive() {
            return Err(AmmError::AssetBoundsExceeded);
        }
        sfp::to_unsigned(sfp::div_down_mag(numerator, denominator)?)
    }

    /// Numeraire amount a near-par trade from `i` to `o` may move before
    /// either balance reaches its halt.
    pub(crate) fn halt_capacity(&self, before: &FxState, i: usize, o: usize) -> Result<U256, AmmError> {
        let ideal = sfp::mul_down_mag(before.liquidity, half())?;
        let ceiling = sfp::mul_down_mag(ideal, sfp::add(ONE, self.alpha)?)?;
        let floor = sfp::mul_down_mag(ideal, sfp::sub(ONE, self.alpha)?)?;
        let room_in = sfp::sub(ceiling, before.balance(i))?;
        let room_out = sfp::sub(before.balance(o), floor)?;
        sfp::to_unsigned(room_in.min(room_out).max(I256::ZERO))
    }
}
