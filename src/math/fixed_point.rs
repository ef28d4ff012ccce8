//! 18-decimal fixed-point kernel.
//!
//! Every real quantity in pool math is a `U256` scaled by [`ONE`] (`1e18`).
//! The functions here reproduce the vault's `FixedPoint` library bit for
//! bit: `*_down` truncates, `*_up` rounds towards positive infinity, and
//! every failure is an explicit [`AmmError`].  Pool code never rounds on its
//! own; it picks the direction by choosing the function.
//!
//! # Examples
//!
//! ```
//! use alloy_primitives::U256;
//! use hydra_sor::math::fixed_point::{self, ONE};
//!
//! let third = fixed_point::div_down(ONE, U256::from(3u64) * ONE).expect("ok");
//! let third_up = fixed_point::div_up(ONE, U256::from(3u64) * ONE).expect("ok");
//! assert_eq!(third_up - third, U256::from(1u64));
//! ```

use alloy_primitives::{uint, U256, U512};

use super::log_exp;
use crate::domain::Rounding;
use crate::error::AmmError;

/// `1.0` at 18 decimals.
pub const ONE: U256 = uint!(1_000_000_000_000_000_000_U256);

/// `2.0` at 18 decimals.
pub const TWO: U256 = uint!(2_000_000_000_000_000_000_U256);

/// `4.0` at 18 decimals.
pub const FOUR: U256 = uint!(4_000_000_000_000_000_000_U256);

/// Relative error bound of [`log_exp::pow`], in `1e18` units (`1e-14`).
pub const MAX_POW_RELATIVE_ERROR: U256 = uint!(10_000_U256);

/// Checked addition.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] on overflow.
#[inline]
pub fn add(a: U256, b: U256) -> Result<U256, AmmError> {
    a.checked_add(b).ok_or(AmmError::Overflow("fixed point add"))
}

/// Checked subtraction.
///
/// # Errors
///
/// Returns [`AmmError::Underflow`] if `b > a`.
#[inline]
pub fn sub(a: U256, b: U256) -> Result<U256, AmmError> {
    a.checked_sub(b).ok_or(AmmError::Underflow("fixed point sub"))
}

/// `a * b / ONE`, truncated.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if `a * b` overflows.
#[inline]
pub fn mul_down(a: U256, b: U256) -> Result<U256, AmmError> {
    let product = a.checked_mul(b).ok_or(AmmError::Overflow("mul_down"))?;
    Ok(product / ONE)
}

/// `a * b / ONE`, rounded up.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if `a * b` overflows.
#[inline]
pub fn mul_up(a: U256, b: U256) -> Result<U256, AmmError> {
    let product = a.checked_mul(b).ok_or(AmmError::Overflow("mul_up"))?;
    if product.is_zero() {
        return Ok(U256::ZERO);
    }
    Ok((product - U256::from(1u64)) / ONE + U256::from(1u64))
}

/// `a * ONE / b`, truncated.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `b` is zero.
/// - [`AmmError::Overflow`] if `a * ONE` overflows.
#[inline]
pub fn div_down(a: U256, b: U256) -> Result<U256, AmmError> {
    if b.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    if a.is_zero() {
        return Ok(U256::ZERO);
    }
    let inflated = a.checked_mul(ONE).ok_or(AmmError::Overflow("div_down"))?;
    Ok(inflated / b)
}

/// `a * ONE / b`, rounded up.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `b` is zero.
/// - [`AmmError::Overflow`] if `a * ONE` overflows.
#[inline]
pub fn div_up(a: U256, b: U256) -> Result<U256, AmmError> {
    if b.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    if a.is_zero() {
        return Ok(U256::ZERO);
    }
    let inflated = a.checked_mul(ONE).ok_or(AmmError::Overflow("div_up"))?;
    Ok((inflated - U256::from(1u64)) / b + U256::from(1u64))
}

/// Multiplies or divides in the requested direction.
///
/// # Errors
///
/// Same as [`mul_down`] / [`mul_up`].
#[inline]
pub fn mul(a: U256, b: U256, rounding: Rounding) -> Result<U256, AmmError> {
    match rounding {
        Rounding::Down => mul_down(a, b),
        Rounding::Up => mul_up(a, b),
    }
}

/// Divides in the requested direction.
///
/// # Errors
///
/// Same as [`div_down`] / [`div_up`].
#[inline]
pub fn div(a: U256, b: U256, rounding: Rounding) -> Result<U256, AmmError> {
    match rounding {
        Rounding::Down => div_down(a, b),
        Rounding::Up => div_up(a, b),
    }
}

/// `1 - x`, clamped at zero.
#[inline]
#[must_use]
pub fn complement(x: U256) -> U256 {
    if x < ONE {
        ONE - x
    } else {
        U256::ZERO
    }
}

/// `x^y` rounded down by the pow error bound.
///
/// Exponents `1`, `2` and `4` are computed exactly with `mul_down`.
///
/// # Errors
///
/// Propagates [`log_exp::pow`] range errors and kernel overflow.
pub fn pow_down(x: U256, y: U256) -> Result<U256, AmmError> {
    if y == ONE {
        return Ok(x);
    }
    if y == TWO {
        return mul_down(x, x);
    }
    if y == FOUR {
        let square = mul_down(x, x)?;
        return mul_down(square, square);
    }
    let raw = log_exp::pow(x, y)?;
    let max_error = add(mul_up(raw, MAX_POW_RELATIVE_ERROR)?, U256::from(1u64))?;
    Ok(raw.saturating_sub(max_error))
}

/// `x^y` rounded up by the pow error bound.
///
/// # Errors
///
/// Propagates [`log_exp::pow`] range errors and kernel overflow.
pub fn pow_up(x: U256, y: U256) -> Result<U256, AmmError> {
    if y == ONE {
        return Ok(x);
    }
    if y == TWO {
        return mul_up(x, x);
    }
    if y == FOUR {
        let square = mul_up(x, x)?;
        return mul_up(square, square);
    }
    let raw = log_exp::pow(x, y)?;
    let max_error = add(mul_up(raw, MAX_POW_RELATIVE_ERROR)?, U256::from(1u64))?;
    add(raw, max_error)
}

/// Integer square root (floor) of a plain integer.
#[must_use]
pub fn isqrt(n: U256) -> U256 {
    if n < U256::from(2u64) {
        return n;
    }
    // 2^ceil(bits/2) is an upper bound, so Newton descends monotonically.
    let mut x = U256::from(1u64) << n.bit_len().div_ceil(2);
    loop {
        let y = (x + n / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Fixed-point square root, truncated: `floor(sqrt(x * ONE))`.
///
/// Values too large to pre-multiply by `ONE` lose the last nine digits.
#[must_use]
pub fn sqrt(x: U256) -> U256 {
    match x.checked_mul(ONE) {
        Some(scaled) => isqrt(scaled),
        None => isqrt(x) * uint!(1_000_000_000_U256),
    }
}

/// `a * b / denominator` with a 512-bit intermediate product.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denominator` is zero.
/// - [`AmmError::Overflow`] if the quotient does not fit in 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> Result<U256, AmmError> {
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let product = widen(a) * widen(b);
    let d = widen(denominator);
    let mut quotient = product / d;
    if rounding.is_up() && !(product % d).is_zero() {
        quotient += U512::from(1u64);
    }
    narrow(quotient).ok_or(AmmError::Overflow("mul_div"))
}

pub(crate) fn widen(x: U256) -> U512 {
    let l = x.as_limbs();
    U512::from_limbs([l[0], l[1], l[2], l[3], 0, 0, 0, 0])
}

pub(crate) fn narrow(x: U512) -> Option<U256> {
    let l = x.as_limbs();
    if l[4..].iter().any(|limb| *limb != 0) {
        return None;
    }
    Some(U256::from_limbs([l[0], l[1], l[2], l[3]]))
}
