//! Linear pool math.
//!
//! A linear pool trades its main token, its wrapped (yield-bearing) token
//! and its own BPT at par, except that main-token balances outside the
//! `[lower_target, upper_target]` band are charged (or rewarded) the swap
//! fee.  This is expressed through a *nominal* main balance:
//!
//! ```text
//! real < lower:   nominal = real - fee · (lower - real)
//! lower..=upper:  nominal = real
//! real > upper:   nominal = real - fee · (real - upper)
//! ```
//!
//! The invariant is `nominal_main + wrapped`.  All values are upscaled
//! `1e18` quantities; the wrapped token's rate is already applied.

use alloy_primitives::U256;

use crate::domain::Rounding;
use crate::error::AmmError;
use crate::math::div_round;
use crate::math::fixed_point::{self, ONE};

/// Fee and target band of a linear pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LinearParams {
    pub(crate) fee: U256,
    pub(crate) lower: U256,
    pub(crate) upper: U256,
}

/// Balances a trade works against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LinearBalances {
    pub(crate) main: U256,
    pub(crate) wrapped: U256,
    pub(crate) supply: U256,
}

fn mul(a: U256, b: U256) -> Result<U256, AmmError> {
    a.checked_mul(b).ok_or(AmmError::Overflow("linear math mul"))
}

pub(crate) fn to_nominal(real: U256, params: &LinearParams) -> Result<U256, AmmError> {
    if real < params.lower {
        let fees = fixed_point::mul_down(params.lower - real, params.fee)?;
        fixed_point::sub(real, fees)
    } else if real <= params.upper {
        Ok(real)
    } else {
        let fees = fixed_point::mul_down(real - params.upper, params.fee)?;
        fixed_point::sub(real, fees)
    }
}

pub(crate) fn from_nominal(nominal: U256, params: &LinearParams) -> Result<U256, AmmError> {
    if nominal < params.lower {
        let shifted = fixed_point::add(nominal, fixed_point::mul_down(params.fee, params.lower)?)?;
        fixed_point::div_down(shifted, fixed_point::add(ONE, params.fee)?)
    } else if nominal <= params.upper {
        Ok(nominal)
    } else {
        let shifted = fixed_point::sub(nominal, fixed_point::mul_down(params.fee, params.upper)?)?;
        fixed_point::div_down(shifted, fixed_point::complement(params.fee))
    }
}

/// `d nominal / d real` at a main balance: `1 + fee`, `1` or `1 - fee`.
pub(crate) fn nominal_slope(real: U256, params: &LinearParams) -> Result<U256, AmmError> {
    if real < params.lower {
        fixed_point::add(ONE, params.fee)
    } else if real <= params.upper {
        Ok(ONE)
    } else {
        Ok(fixed_point::complement(params.fee))
    }
}

fn invariant(nominal_main: U256, wrapped: U256) -> Result<U256, AmmError> {
    fixed_point::add(nominal_main, wrapped)
}

// -- main <-> wrapped ---------------------------------------------------------

pub(crate) fn wrapped_out_per_main_in(main_in: U256, main: U256, params: &LinearParams) -> Result<U256, AmmError> {
    let before = to_nominal(main, params)?;
    let after = to_nominal(fixed_point::add(main, main_in)?, params)?;
    fixed_point::sub(after, before)
}

pub(crate) fn wrapped_in_per_main_out(main_out: U256, main: U256, params: &LinearParams) -> Result<U256, AmmError> {
    let remaining = main.checked_sub(main_out).ok_or(AmmError::InsufficientLiquidity)?;
    let before = to_nominal(main, params)?;
    let after = to_nominal(remaining, params)?;
    fixed_point::sub(before, after)
}

pub(crate) fn main_out_per_wrapped_in(wrapped_in: U256, main: U256, params: &LinearParams) -> Result<U256, AmmError> {
    let before = to_nominal(main, params)?;
    let after = before.checked_sub(wrapped_in).ok_or(AmmError::InsufficientLiquidity)?;
    let new_main = from_nominal(after, params)?;
    fixed_point::sub(main, new_main)
}

pub(crate) fn main_in_per_wrapped_out(wrapped_out: U256, main: U256, params: &LinearParams) -> Result<U256, AmmError> {
    let before = to_nominal(main, params)?;
    let new_main = from_nominal(fixed_point::add(before, wrapped_out)?, params)?;
    fixed_point::sub(new_main, main)
}

// -- main <-> BPT -------------------------------------------------------------

pub(crate) fn bpt_out_per_main_in(main_in: U256, b: &LinearBalances, params: &LinearParams) -> Result<U256, AmmError> {
    if b.supply.is_zero() {
        return to_nominal(main_in, params);
    }
    let before = to_nominal(b.main, params)?;
    let after = to_nominal(fixed_point::add(b.main, main_in)?, params)?;
    let delta = fixed_point::sub(after, before)?;
    div_round(mul(b.supply, delta)?, invariant(before, b.wrapped)?, Rounding::Down)
}

pub(crate) fn bpt_in_per_main_out(main_out: U256, b: &LinearBalances, params: &LinearParams) -> Result<U256, AmmError> {
    let remaining = b.main.checked_sub(main_out).ok_or(AmmError::InsufficientLiquidity)?;
    let before = to_nominal(b.main, params)?;
    let after = to_nominal(remaining, params)?;
    let delta = fixed_point::sub(before, after)?;
    div_round(mul(b.supply, delta)?, invariant(before, b.wrapped)?, Rounding::Up)
}

pub(crate) fn main_in_per_bpt_out(bpt_out: U256, b: &LinearBalances, params: &LinearParams) -> Result<U256, AmmError> {
    if b.supply.is_zero() {
        return from_nominal(bpt_out, params);
    }
    let before = to_nominal(b.main, params)?;
    let delta = div_round(mul(invariant(before, b.wrapped)?, bpt_out)?, b.supply, Rounding::Up)?;
    let new_main = from_nominal(fixed_point::add(before, delta)?, params)?;
    fixed_point::sub(new_main, b.main)
}

pub(crate) fn main_out_per_bpt_in(bpt_in: U256, b: &LinearBalances, params: &LinearParams) -> Result<U256, AmmError> {
    let before = to_nominal(b.main, params)?;
    let delta = div_round(mul(invariant(before, b.wrapped)?, bpt_in)?, b.supply, Rounding::Down)?;
    let after = before.checked_sub(delta).ok_or(AmmError::InsufficientLiquidity)?;
    let new_main = from_nominal(after, params)?;
    fixed_point::sub(b.main, new_main)
}

// -- wrapped <-> BPT ----------------------------------------------------------

pub(crate) fn bpt_out_per_wrapped_in(wrapped_in: U256, b: &LinearBalances, params: &LinearParams) -> Result<U256, AmmError> {
    if b.supply.is_zero() {
        return Ok(wrapped_in);
    }
    let nominal_main = to_nominal(b.main, params)?;
    let before = invariant(nominal_main, b.wrapped)?;
    let after = invariant(nominal_main, fixed_point::add(b.wrapped, wrapped_in)?)?;
    let new_supply = div_round(mul(b.supply, after)?, before, Rounding::Down)?;
    fixed_point::sub(new_supply, b.supply)
}

pub(crate) fn bpt_in_per_wrapped_out(wrapped_out: U256, b: &LinearBalances, params: &LinearParams) -> Result<U256, AmmError> {
    let remaining = b.wrapped.checked_sub(wrapped_out).ok_or(AmmError::InsufficientLiquidity)?;
    let nominal_main = to_nominal(b.main, params)?;
    let before = invariant(nominal_main, b.wrapped)?;
    let after = invariant(nominal_main, remaining)?;
    let new_supply = div_round(mul(b.supply, after)?, before, Rounding::Down)?;
    fixed_point::sub(b.supply, new_supply)
}

pub(crate) fn wrapped_in_per_bpt_out(bpt_out: U256, b: &LinearBalances, params: &LinearParams) -> Result<U256, AmmError> {
    if b.supply.is_zero() {
        return Ok(bpt_out);
    }
    let nominal_main = to_nominal(b.main, params)?;
    let before = invariant(nominal_main, b.wrapped)?;
    let new_supply = fixed_point::add(b.supply, bpt_out)?;
    let new_wrapped = fixed_point::sub(div_round(mul(new_supply, before)?, b.supply, Rounding::Up)?, nominal_main)?;
    fixed_point::sub(new_wrapped, b.wrapped)
}

pub(crate) fn wrapped_out_per_bpt_in(bpt_in: U256, b: &LinearBalances, params: &LinearParams) -> Result<U256, AmmError> {
    let nominal_main = to_nominal(b.main, params)?;
    let before = invariant(nominal_main, b.wrapped)?;
    let new_supply = b.supply.checked_sub(bpt_in).ok_or(AmmError::InsufficientLiquidity)?;
    let new_wrapped = fixed_point::sub(div_round(mul(new_supply, before)?, b.supply, Rounding::Up)?, nominal_main)?;
    fixed_point::sub(b.wrapped, new_wrapped)
}

/// `(nominal_main + wrapped) / supply`, the value of one BPT.
pub(crate) fn bpt_rate(b: &LinearBalances, params: &LinearParams) -> Result<U256, AmmError> {
    let nominal_main = to_nominal(b.main, params)?;
    fixed_point::div_down(invariant(nominal_main, b.wrapped)?, b.supply)
}
