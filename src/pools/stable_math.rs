//! Stable-swap invariant math shared by the Stable, MetaStable,
//! PhantomStable and ComposableStable pools.
//!
//! # Invariant (n tokens)
//!
//! ```text
//! Ann · Σxᵢ + D = Ann · D + Dⁿ⁺¹ / (nⁿ · Πxᵢ)        Ann = amp · n / AMP_PRECISION
//! ```
//!
//! All balances are upscaled `1e18` values.  `D` and the balance solved
//! for a given `D` are found by Newton-Raphson, capped and converged per
//! [`SolverConfig`].  Rounding follows the vault's integer math: plain
//! `div_round` for integer quotients, fixed-point helpers for ratios.

#![allow(clippy::too_many_arguments)]

use alloy_primitives::{I256, U256};
use tracing::trace;

use crate::config::{SolverConfig, AMP_PRECISION};
use crate::domain::{Rounding, SwapType};
use crate::error::AmmError;
use crate::math::fixed_point::{self, ONE};
use crate::math::{div_round, signed_fixed_point as sfp};

fn mul(a: U256, b: U256) -> Result<U256, AmmError> {
    a.checked_mul(b).ok_or(AmmError::Overflow("stable math mul"))
}

fn amp_precision() -> U256 {
    U256::from(AMP_PRECISION)
}

fn count(balances: &[U256]) -> U256 {
    U256::from(balances.len())
}

fn tolerance(solver: &SolverConfig) -> U256 {
    U256::from(solver.convergence_tolerance)
}

/// Computes the invariant `D` of `balances`.
///
/// # Errors
///
/// - [`AmmError::NewtonRaphsonNonConvergence`] after `max_iterations`.
/// - [`AmmError::DivisionByZero`] if a balance is zero.
pub(crate) fn calculate_invariant(
    amp: U256,
    balances: &[U256],
    solver: &SolverConfig,
) -> Result<U256, AmmError> {
    let sum = balances
        .iter()
        .try_fold(U256::ZERO, |acc, b| fixed_point::add(acc, *b))?;
    if sum.is_zero() {
        return Ok(U256::ZERO);
    }
    let n = count(balances);
    let amp_total = mul(amp, n)?;
    let mut invariant = sum;

    for round in 0..solver.max_iterations {
        let mut d_p = invariant;
        for balance in balances {
            d_p = div_round(mul(d_p, invariant)?, mul(*balance, n)?, Rounding::Down)?;
        }
        let previous = invariant;

        let numerator = mul(
            fixed_point::add(
                div_round(mul(amp_total, sum)?, amp_precision(), Rounding::Down)?,
                mul(d_p, n)?,
            )?,
            invariant,
        )?;
        let denominator = fixed_point::add(
            div_round(
                mul(fixed_point::sub(amp_total, amp_precision())?, invariant)?,
                amp_precision(),
                Rounding::Down,
            )?,
            mul(n + U256::from(1u64), d_p)?,
        )?;
        invariant = div_round(numerator, denominator, Rounding::Down)?;

        if invariant.abs_diff(previous) <= tolerance(solver) {
            trace!(round, %invariant, "stable invariant converged");
            return Ok(invariant);
        }
    }
    Err(AmmError::NewtonRaphsonNonConvergence("stable invariant"))
}

/// Solves for the balance of token `index` that keeps `invariant` given
/// every other balance.
///
/// # Errors
///
/// - [`AmmError::NewtonRaphsonNonConvergence`] after `max_iterations`.
/// - [`AmmError::DivisionByZero`] on a zero balance or invariant.
pub(crate) fn balance_given_invariant(
    amp: U256,
    balances: &[U256],
    invariant: U256,
    index: usize,
    solver: &SolverConfig,
) -> Result<U256, AmmError> {
    let n = count(balances);
    let amp_total = mul(amp, n)?;
    let first = balances
        .first()
        .copied()
        .ok_or(AmmError::InvalidConfiguration("empty balance list"))?;
    let target = balances
        .get(index)
        .copied()
        .ok_or(AmmError::InvalidToken("token index out of range"))?;

    let mut sum = first;
    let mut p_d = mul(first, n)?;
    for balance in balances.iter().skip(1) {
        p_d = div_round(mul(mul(p_d, *balance)?, n)?, invariant, Rounding::Down)?;
        sum = fixed_point::add(sum, *balance)?;
    }
    sum = fixed_point::sub(sum, target)?;

    let inv2 = mul(invariant, invariant)?;
    let c = mul(
        mul(div_round(inv2, mul(amp_total, p_d)?, Rounding::Up)?, amp_precision())?,
        target,
    )?;
    let b = fixed_point::add(
        sum,
        mul(div_round(invariant, amp_total, Rounding::Down)?, amp_precision())?,
    )?;

    let mut balance = div_round(fixed_point::add(inv2, c)?, fixed_point::add(invariant, b)?, Rounding::Up)?;
    for round in 0..solver.max_iterations {
        let previous = balance;
        let numerator = fixed_point::add(mul(balance, balance)?, c)?;
        let denominator = fixed_point::sub(fixed_point::add(mul(balance, U256::from(2u64))?, b)?, invariant)?;
        balance = div_round(numerator, denominator, Rounding::Up)?;

        if balance.abs_diff(previous) <= tolerance(solver) {
            trace!(round, %balance, "stable balance converged");
            return Ok(balance);
        }
    }
    Err(AmmError::NewtonRaphsonNonConvergence("stable balance"))
}

/// Output for `amount_in` (fee already removed); one wei is kept by the
/// pool.
pub(crate) fn out_given_in(
    amp: U256,
    balances: &[U256],
    i: usize,
    o: usize,
    amount_in: U256,
    invariant: U256,
    solver: &SolverConfig,
) -> Result<U256, AmmError> {
    let mut updated = balances.to_vec();
    let slot = updated.get_mut(i).ok_or(AmmError::InvalidToken("token index out of range"))?;
    *slot = fixed_point::add(*slot, amount_in)?;
    let final_out = balance_given_invariant(amp, &updated, invariant, o, solver)?;
    let balance_out = balances.get(o).copied().unwrap_or_default();
    balance_out
        .checked_sub(final_out)
        .and_then(|d| d.checked_sub(U256::from(1u64)))
        .ok_or(AmmError::InsufficientLiquidity)
}

/// Input (before fee) for `amount_out`; one wei is added for the pool.
pub(crate) fn in_given_out(
    amp: U256,
    balances: &[U256],
    i: usize,
    o: usize,
    amount_out: U256,
    invariant: U256,
    solver: &SolverConfig,
) -> Result<U256, AmmError> {
    let mut updated = balances.to_vec();
    let slot = updated.get_mut(o).ok_or(AmmError::InvalidToken("token index out of range"))?;
    *slot = slot
        .checked_sub(amount_out)
        .filter(|b| !b.is_zero())
        .ok_or(AmmError::InsufficientLiquidity)?;
    let final_in = balance_given_invariant(amp, &updated, invariant, i, solver)?;
    let balance_in = balances.get(i).copied().unwrap_or_default();
    fixed_point::add(fixed_point::sub(final_in, balance_in)?, U256::from(1u64))
}

/// Balances after a swap of `amount` (net of fee for exact-in) at a
/// constant invariant.
pub(crate) fn balances_after_swap(
    amp: U256,
    balances: &[U256],
    i: usize,
    o: usize,
    amount: U256,
    swap_type: SwapType,
    invariant: U256,
    solver: &SolverConfig,
) -> Result<Vec<U256>, AmmError> {
    let mut updated = balances.to_vec();
    if amount.is_zero() {
        return Ok(updated);
    }
    match swap_type {
        SwapType::ExactIn => {
            let slot = updated.get_mut(i).ok_or(AmmError::InvalidToken("token index out of range"))?;
            *slot = fixed_point::add(*slot, amount)?;
            let solved = balance_given_invariant(amp, &updated, invariant, o, solver)?;
            let slot = updated.get_mut(o).ok_or(AmmError::InvalidToken("token index out of range"))?;
            *slot = solved;
        }
        SwapType::ExactOut => {
            let slot = updated.get_mut(o).ok_or(AmmError::InvalidToken("token index out of range"))?;
            *slot = slot
                .checked_sub(amount)
                .filter(|b| !b.is_zero())
                .ok_or(AmmError::InsufficientLiquidity)?;
            let solved = balance_given_invariant(amp, &updated, invariant, i, solver)?;
            let slot = updated.get_mut(i).ok_or(AmmError::InvalidToken("token index out of range"))?;
            *slot = solved;
        }
    }
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Marginal prices
// ---------------------------------------------------------------------------

/// Partial derivatives of the invariant: `Ann` and `Dⁿ⁺¹ / (nⁿ Πx)`.
struct Gradient {
    ann: U256,
    d_p: U256,
}

fn gradient(amp: U256, balances: &[U256], invariant: U256) -> Result<Gradient, AmmError> {
    let n = count(balances);
    let ann = fixed_point::mul_div(mul(amp, n)?, ONE, amp_precision(), Rounding::Down)?;
    let mut d_p = invariant;
    for balance in balances {
        d_p = fixed_point::mul_div(d_p, invariant, mul(*balance, n)?, Rounding::Down)?;
    }
    Ok(Gradient { ann, d_p })
}

/// Price of token `o` in token `i` (no fee): `(Ann + D_P/x_o) / (Ann + D_P/x_i)`.
pub(crate) fn spot_price(
    amp: U256,
    balances: &[U256],
    invariant: U256,
    i: usize,
    o: usize,
) -> Result<U256, AmmError> {
    let g = gradient(amp, balances, invariant)?;
    let x_i = balances.get(i).copied().unwrap_or_default();
    let x_o = balances.get(o).copied().unwrap_or_default();
    let g_in = fixed_point::add(g.ann, fixed_point::div_down(g.d_p, x_i)?)?;
    let g_out = fixed_point::add(g.ann, fixed_point::div_down(g.d_p, x_o)?)?;
    fixed_point::div_down(g_out, g_in)
}

/// Derivative of [`spot_price`] along the curve with respect to the
/// balance of token `i`; negative rounding noise is clamped to zero.
pub(crate) fn spot_price_derivative(
    amp: U256,
    balances: &[U256],
    invariant: U256,
    i: usize,
    o: usize,
) -> Result<U256, AmmError> {
    let g = gradient(amp, balances, invariant)?;
    let u = sfp::to_signed(balances.get(i).copied().unwrap_or_default())?;
    let v = sfp::to_signed(balances.get(o).copied().unwrap_or_default())?;
    let ann = sfp::to_signed(g.ann)?;
    let d_p = sfp::to_signed(g.d_p)?;

    let g_u = sfp::add(ann, sfp::div_down_mag(d_p, u)?)?;
    let g_v = sfp::add(ann, sfp::div_down_mag(d_p, v)?)?;
    let p = sfp::div_down_mag(g_v, g_u)?;

    let uv = sfp::mul_down_mag(u, v)?;
    let twice_d_p = sfp::add(d_p, d_p)?;

    // d g_v / du = -D_P/(uv) + 2 D_P/(v² p)
    let dg_v = sfp::add(
        -sfp::div_down_mag(d_p, uv)?,
        sfp::div_down_mag(twice_d_p, sfp::mul_down_mag(sfp::mul_down_mag(v, v)?, p)?)?,
    )?;
    // d g_u / du = -2 D_P/u² + D_P/(uvp)
    let dg_u = sfp::add(
        -sfp::div_down_mag(twice_d_p, sfp::mul_down_mag(u, u)?)?,
        sfp::div_down_mag(d_p, sfp::mul_down_mag(uv, p)?)?,
    )?;

    let numerator = sfp::sub(sfp::mul_down_mag(dg_v, g_u)?, sfp::mul_down_mag(g_v, dg_u)?)?;
    let derivative = sfp::div_down_mag(numerator, sfp::mul_down_mag(g_u, g_u)?)?;
    if derivative.is_negative() {
        return Ok(U256::ZERO);
    }
    sfp::to_unsigned(derivative)
}

// ---------------------------------------------------------------------------
// Single-token joins and exits against the pool-share supply
// ---------------------------------------------------------------------------

fn sum_of(balances: &[U256]) -> Result<U256, AmmError> {
    balances
        .iter()
        .try_fold(U256::ZERO, |acc, b| fixed_point::add(acc, *b))
}

fn replaced(balances: &[U256], index: usize, value: U256) -> Result<Vec<U256>, AmmError> {
    let mut updated = balances.to_vec();
    let slot = updated
        .get_mut(index)
        .ok_or(AmmError::InvalidToken("token index out of range"))?;
    *slot = value;
    Ok(updated)
}

/// Pool shares minted for depositing `amount_in` of token `index`.
///
/// The part of the deposit beyond the pool's proportional mix pays the
/// swap fee.
pub(crate) fn bpt_out_given_exact_token_in(
    amp: U256,
    balances: &[U256],
    index: usize,
    amount_in: U256,
    supply: U256,
    invariant: U256,
    fee: U256,
    solver: &SolverConfig,
) -> Result<U256, AmmError> {
    let sum = sum_of(balances)?;
    let mut ratio_with_fee = U256::ZERO;
    let mut ratios = Vec::with_capacity(balances.len());
    for (j, balance) in balances.iter().enumerate() {
        let added = if j == index { amount_in } else { U256::ZERO };
        let ratio = fixed_point::div_down(fixed_point::add(*balance, added)?, *balance)?;
        let weight = fixed_point::div_down(*balance, sum)?;
        ratio_with_fee = fixed_point::add(ratio_with_fee, fixed_point::mul_down(ratio, weight)?)?;
        ratios.push(ratio);
    }

    let balance = balances.get(index).copied().unwrap_or_default();
    let ratio = ratios.get(index).copied().unwrap_or_default();
    let amount_without_fee = if ratio > ratio_with_fee {
        let non_taxable = fixed_point::mul_down(balance, fixed_point::sub(ratio_with_fee, ONE)?)?;
        let taxable = fixed_point::sub(amount_in, non_taxable)?;
        fixed_point::add(non_taxable, fixed_point::mul_down(taxable, fixed_point::complement(fee))?)?
    } else {
        amount_in
    };

    let updated = replaced(balances, index, fixed_point::add(balance, amount_without_fee)?)?;
    let new_invariant = calculate_invariant(amp, &updated, solver)?;
    let invariant_ratio = fixed_point::div_down(new_invariant, invariant)?;
    if invariant_ratio > ONE {
        fixed_point::mul_down(supply, invariant_ratio - ONE)
    } else {
        Ok(U256::ZERO)
    }
}

/// Token `index` required to mint exactly `bpt_out` pool shares.
pub(crate) fn token_in_given_exact_bpt_out(
    amp: U256,
    balances: &[U256],
    index: usize,
    bpt_out: U256,
    supply: U256,
    invariant: U256,
    fee: U256,
    solver: &SolverConfig,
) -> Result<U256, AmmError> {
    let growth = fixed_point::div_up(fixed_point::add(supply, bpt_out)?, supply)?;
    let new_invariant = fixed_point::mul_up(growth, invariant)?;
    let new_balance = balance_given_invariant(amp, balances, new_invariant, index, solver)?;
    let balance = balances.get(index).copied().unwrap_or_default();
    let amount_without_fee = fixed_point::sub(new_balance, balance)?;

    let weight = fixed_point::div_down(balance, sum_of(balances)?)?;
    let taxable = fixed_point::mul_up(amount_without_fee, fixed_point::complement(weight))?;
    let non_taxable = fixed_point::sub(amount_without_fee, taxable)?;
    fixed_point::add(non_taxable, fixed_point::div_up(taxable, fixed_point::complement(fee))?)
}

/// Pool shares burned to withdraw exactly `amount_out` of token `index`.
pub(crate) fn bpt_in_given_exact_token_out(
    amp: U256,
    balances: &[U256],
    index: usize,
    amount_out: U256,
    supply: U256,
    invariant: U256,
    fee: U256,
    solver: &SolverConfig,
) -> Result<U256, AmmError> {
    let sum = sum_of(balances)?;
    let mut ratio_without_fee = U256::ZERO;
    let mut ratios = Vec::with_capacity(balances.len());
    for (j, balance) in balances.iter().enumerate() {
        let removed = if j == index { amount_out } else { U256::ZERO };
        let remaining = balance.checked_sub(removed).ok_or(AmmError::InsufficientLiquidity)?;
        let ratio = fixed_point::div_up(remaining, *balance)?;
        let weight = fixed_point::div_down(*balance, sum)?;
        ratio_without_fee = fixed_point::add(ratio_without_fee, fixed_point::mul_up(ratio, weight)?)?;
        ratios.push(ratio);
    }

    let balance = balances.get(index).copied().unwrap_or_default();
    let ratio = ratios.get(index).copied().unwrap_or_default();
    let amount_with_fee = if ratio_without_fee > ratio {
        let non_taxable = fixed_point::mul_down(balance, fixed_point::complement(ratio_without_fee))?;
        let taxable = fixed_point::sub(amount_out, non_taxable)?;
        fixed_point::add(non_taxable, fixed_point::div_up(taxable, fixed_point::complement(fee))?)?
    } else {
        amount_out
    };

    let remaining = balance
        .checked_sub(amount_with_fee)
        .filter(|b| !b.is_zero())
        .ok_or(AmmError::InsufficientLiquidity)?;
    let updated = replaced(balances, index, remaining)?;
    let new_invariant = calculate_invariant(amp, &updated, solver)?;
    let invariant_ratio = fixed_point::div_down(new_invariant, invariant)?;
    fixed_point::mul_up(supply, fixed_point::complement(invariant_ratio))
}

/// Token `index` received for burning exactly `bpt_in` pool shares.
pub(crate) fn token_out_given_exact_bpt_in(
    amp: U256,
    balances: &[U256],
    index: usize,
    bpt_in: U256,
    supply: U256,
    invariant: U256,
    fee: U256,
    solver: &SolverConfig,
) -> Result<U256, AmmError> {
    let remaining_supply = supply.checked_sub(bpt_in).ok_or(AmmError::InsufficientLiquidity)?;
    let shrink = fixed_point::div_up(remaining_supply, supply)?;
    let new_invariant = fixed_point::mul_up(shrink, invariant)?;
    let new_balance = balance_given_invariant(amp, balances, new_invariant, index, solver)?;
    let balance = balances.get(index).copied().unwrap_or_default();
    let amount_without_fee = fixed_point::sub(balance, new_balance)?;

    let weight = fixed_point::div_down(balance, sum_of(balances)?)?;
    let taxable = fixed_point::mul_up(amount_without_fee, fixed_point::complement(weight))?;
    let non_taxable = fixed_point::sub(amount_without_fee, taxable)?;
    fixed_point::add(non_taxable, fixed_point::mul_down(taxable, fixed_point::complement(fee))?)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn e18(units: u64) -> U256 {
        U256::from(units) * ONE
    }

    fn amp(a: u64) -> U256 {
        U256::from(a * AMP_PRECISION)
    }

    fn solver() -> SolverConfig {
        SolverConfig::default()
    }

    // -- invariant -------------------------------------------------------------

    #[test]
    fn balanced_invariant_is_sum() {
        let balances = [e18(1_000), e18(1_000), e18(1_000)];
        let Ok(d) = calculate_invariant(amp(100), &balances, &solver()) else {
            panic!("expected Ok");
        };
        assert!(d.abs_diff(e18(3_000)) <= U256::from(3u64));
    }

    #[test]
    fn imbalanced_invariant_below_sum() {
        let balances = [e18(100), e18(1_900)];
        let Ok(d) = calculate_invariant(amp(10), &balances, &solver()) else {
            panic!("expected Ok");
        };
        assert!(d < e18(2_000));
        assert!(d > e18(1_000));
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let balances = [e18(1), e18(1_000_000)];
        let tight = SolverConfig {
            max_iterations: 1,
            ..SolverConfig::default()
        };
        assert!(matches!(
            calculate_invariant(amp(100), &balances, &tight),
            Err(AmmError::NewtonRaphsonNonConvergence(_))
        ));
    }

    // -- swaps -----------------------------------------------------------------

    #[test]
    fn swap_near_peg_is_close_to_one_to_one() {
        let balances = [e18(1_000), e18(1_000)];
        let Ok(d) = calculate_invariant(amp(200), &balances, &solver()) else {
            panic!("expected Ok");
        };
        let Ok(out) = out_given_in(amp(200), &balances, 0, 1, e18(10), d, &solver()) else {
            panic!("expected Ok");
        };
        assert!(out < e18(10));
        assert!(out > e18(10) - e18(1) / U256::from(100u64));
    }

    #[test]
    fn invariant_preserved_after_swap() {
        let balances = [e18(1_000), e18(800), e18(1_200)];
        let Ok(d) = calculate_invariant(amp(50), &balances, &solver()) else {
            panic!("expected Ok");
        };
        let Ok(after) =
            balances_after_swap(amp(50), &balances, 0, 2, e18(25), SwapType::ExactIn, d, &solver())
        else {
            panic!("expected Ok");
        };
        let Ok(d_after) = calculate_invariant(amp(50), &after, &solver()) else {
            panic!("expected Ok");
        };
        // The invariant solver drops precision in its `c` term, so D is
        // only preserved to a relative 1e-12.
        assert!(d_after.abs_diff(d) * U256::from(1_000_000_000_000u64) <= d, "{d} -> {d_after}");
    }

    #[test]
    fn in_given_out_round_trip() {
        let balances = [e18(500), e18(1_500)];
        let Ok(d) = calculate_invariant(amp(100), &balances, &solver()) else {
            panic!("expected Ok");
        };
        let Ok(needed) = in_given_out(amp(100), &balances, 0, 1, e18(40), d, &solver()) else {
            panic!("expected Ok");
        };
        let Ok(out) = out_given_in(amp(100), &balances, 0, 1, needed, d, &solver()) else {
            panic!("expected Ok");
        };
        assert!(out >= e18(40) - U256::from(2u64));
    }

    // -- prices ----------------------------------------------------------------

    #[test]
    fn balanced_price_is_one() {
        let balances = [e18(1_000), e18(1_000)];
        let Ok(d) = calculate_invariant(amp(100), &balances, &solver()) else {
            panic!("expected Ok");
        };
        let Ok(p) = spot_price(amp(100), &balances, d, 0, 1) else {
            panic!("expected Ok");
        };
        assert!(p.abs_diff(ONE) < U256::from(1_000u64));
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let balances = [e18(1_000), e18(1_000)];
        let Ok(d) = calculate_invariant(amp(20), &balances, &solver()) else {
            panic!("expected Ok");
        };
        let step = e18(1);
        let Ok(after) = balances_after_swap(amp(20), &balances, 0, 1, e18(100), SwapType::ExactIn, d, &solver())
        else {
            panic!("expected Ok");
        };
        let Ok(further) =
            balances_after_swap(amp(20), &balances, 0, 1, e18(100) + step, SwapType::ExactIn, d, &solver())
        else {
            panic!("expected Ok");
        };
        let (Ok(p1), Ok(p2)) = (spot_price(amp(20), &after, d, 0, 1), spot_price(amp(20), &further, d, 0, 1))
        else {
            panic!("expected Ok");
        };
        let Ok(derivative) = spot_price_derivative(amp(20), &after, d, 0, 1) else {
            panic!("expected Ok");
        };
        let fd = p2 - p1;
        assert!(fd.abs_diff(derivative) * U256::from(20u64) < derivative);
    }

    // -- joins and exits -------------------------------------------------------

    #[test]
    fn join_then_exit_loses_only_fee() {
        let balances = [e18(1_000), e18(1_000), e18(1_000)];
        let supply = e18(3_000);
        let fee = ONE / U256::from(1_000u64);
        let Ok(d) = calculate_invariant(amp(100), &balances, &solver()) else {
            panic!("expected Ok");
        };
        let Ok(bpt) = bpt_out_given_exact_token_in(amp(100), &balances, 0, e18(30), supply, d, fee, &solver())
        else {
            panic!("expected Ok");
        };
        assert!(bpt > e18(29) && bpt < e18(30));

        let Ok(token_in) =
            token_in_given_exact_bpt_out(amp(100), &balances, 0, bpt, supply, d, fee, &solver())
        else {
            panic!("expected Ok");
        };
        assert!(token_in.abs_diff(e18(30)) < e18(1) / U256::from(1_000u64));

        let Ok(bpt_in) =
            bpt_in_given_exact_token_out(amp(100), &balances, 1, e18(30), supply, d, fee, &solver())
        else {
            panic!("expected Ok");
        };
        assert!(bpt_in > e18(30));

        let Ok(out) = token_out_given_exact_bpt_in(amp(100), &balances, 1, bpt_in, supply, d, fee, &solver())
        else {
            panic!("expected Ok");
        };
        assert!(out.abs_diff(e18(30)) < e18(1) / U256::from(1_000u64));
    }
}
