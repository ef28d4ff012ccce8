//! Signed fixed-point helpers for the elliptic curve pools.
//!
//! Values are `I256` at one of two scales: "normal" precision (`1e18`, the
//! same base as [`fixed_point`](super::fixed_point)) and "extended"
//! precision (`1e38`) for the derived curve parameters, whose rounding
//! errors would otherwise be amplified by large balances.
//!
//! Rounding is by magnitude: `*_down_mag` truncates towards zero and
//! `*_up_mag` rounds away from zero, so that a caller can bound a negative
//! quantity the same way as a positive one.  Every product goes through a
//! 512-bit intermediate; only a result outside the `I256` range overflows.

use alloy_primitives::{uint, I256, U256, U512};

use super::fixed_point::{self, narrow, widen};
use crate::domain::Rounding;
use crate::error::AmmError;

/// `1.0` at 18 decimals.
pub const ONE: I256 = I256::from_raw(fixed_point::ONE);

/// `1.0` at 38 decimals.
pub const ONE_XP: I256 = I256::from_raw(ONE_XP_RAW);

const ONE_XP_RAW: U256 = uint!(100_000_000_000_000_000_000_000_000_000_000_000_000_U256);

// 1e20, the factor between the two scales.
const NP_TO_XP: U256 = uint!(100_000_000_000_000_000_000_U256);

fn with_sign(magnitude: U256, negative: bool) -> Result<I256, AmmError> {
    if magnitude > I256::MAX.into_raw() {
        return Err(AmmError::Overflow("signed fixed point range"));
    }
    let value = I256::from_raw(magnitude);
    Ok(if negative { -value } else { value })
}

/// `a * b / d` on signed values, rounding the magnitude.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `d` is zero.
/// - [`AmmError::Overflow`] if the result leaves the `I256` range.
pub fn mul_div(a: I256, b: I256, d: I256, rounding: Rounding) -> Result<I256, AmmError> {
    let negative = a.is_negative() ^ b.is_negative() ^ d.is_negative();
    let magnitude = fixed_point::mul_div(a.unsigned_abs(), b.unsigned_abs(), d.unsigned_abs(), rounding)?;
    if magnitude.is_zero() {
        return Ok(I256::ZERO);
    }
    with_sign(magnitude, negative)
}

/// Checked signed addition.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] on overflow.
#[inline]
pub fn add(a: I256, b: I256) -> Result<I256, AmmError> {
    a.checked_add(b).ok_or(AmmError::Overflow("signed add"))
}

/// Checked signed subtraction.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] on overflow.
#[inline]
pub fn sub(a: I256, b: I256) -> Result<I256, AmmError> {
    a.checked_sub(b).ok_or(AmmError::Overflow("signed sub"))
}

/// `a * b` at 18 decimals, magnitude truncated.
///
/// # Errors
///
/// See [`mul_div`].
#[inline]
pub fn mul_down_mag(a: I256, b: I256) -> Result<I256, AmmError> {
    mul_div(a, b, ONE, Rounding::Down)
}

/// `a * b` at 18 decimals, magnitude rounded up.
///
/// # Errors
///
/// See [`mul_div`].
#[inline]
pub fn mul_up_mag(a: I256, b: I256) -> Result<I256, AmmError> {
    mul_div(a, b, ONE, Rounding::Up)
}

/// `a / b` at 18 decimals, magnitude truncated.
///
/// # Errors
///
/// See [`mul_div`].
#[inline]
pub fn div_down_mag(a: I256, b: I256) -> Result<I256, AmmError> {
    mul_div(a, ONE, b, Rounding::Down)
}

/// `a / b` at 18 decimals, magnitude rounded up.
///
/// # Errors
///
/// See [`mul_div`].
#[inline]
pub fn div_up_mag(a: I256, b: I256) -> Result<I256, AmmError> {
    mul_div(a, ONE, b, Rounding::Up)
}

/// `a * b` with both operands and the result at 38 decimals.
///
/// # Errors
///
/// See [`mul_div`].
#[inline]
pub fn mul_xp(a: I256, b: I256) -> Result<I256, AmmError> {
    mul_div(a, b, ONE_XP, Rounding::Down)
}

/// `a / b` with both operands and the result at 38 decimals.
///
/// # Errors
///
/// See [`mul_div`].
#[inline]
pub fn div_xp(a: I256, b: I256) -> Result<I256, AmmError> {
    mul_div(a, ONE_XP, b, Rounding::Down)
}

/// Multiplies an 18-decimal value by a 38-decimal one, returning 18
/// decimals.
///
/// # Errors
///
/// See [`mul_div`].
#[inline]
pub fn mul_xp_to_np(np: I256, xp: I256, rounding: Rounding) -> Result<I256, AmmError> {
    mul_div(np, xp, ONE_XP, rounding)
}

/// Divides an 18-decimal value by a 38-decimal one, returning 18 decimals.
///
/// # Errors
///
/// See [`mul_div`].
#[inline]
pub fn div_np_by_xp(np: I256, xp: I256, rounding: Rounding) -> Result<I256, AmmError> {
    mul_div(np, ONE_XP, xp, rounding)
}

/// Lifts an 18-decimal value to 38 decimals (exact).
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the scaled value does not fit.
#[inline]
pub fn np_to_xp(x: I256) -> Result<I256, AmmError> {
    x.checked_mul(I256::from_raw(NP_TO_XP))
        .ok_or(AmmError::Overflow("np to xp"))
}

/// Lowers a 38-decimal value to 18 decimals, magnitude truncated.
#[inline]
#[must_use]
pub fn xp_to_np(x: I256) -> I256 {
    x / I256::from_raw(NP_TO_XP)
}

/// Square root of a non-negative value at the given scale (`ONE` or
/// `ONE_XP`), truncated.
///
/// # Errors
///
/// Returns [`AmmError::InvalidQuantity`] for a negative operand.
pub fn sqrt(x: I256, scale: I256) -> Result<I256, AmmError> {
    if x.is_negative() {
        return Err(AmmError::InvalidQuantity("square root of a negative value"));
    }
    let scaled = widen(x.into_raw()) * widen(scale.unsigned_abs());
    let root = narrow(isqrt_wide(scaled)).ok_or(AmmError::Overflow("sqrt"))?;
    with_sign(root, false)
}

fn isqrt_wide(n: U512) -> U512 {
    if n < U512::from(2u64) {
        return n;
    }
    let mut x = U512::from(1u64) << n.bit_len().div_ceil(2);
    loop {
        let y = (x + n / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Converts an unsigned fixed-point value to signed.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] for values `>= 2^255`.
#[inline]
pub fn to_signed(x: U256) -> Result<I256, AmmError> {
    with_sign(x, false)
}

/// Converts a signed value back to unsigned.
///
/// # Errors
///
/// Returns [`AmmError::Underflow`] for a negative value.
#[inline]
pub fn to_unsigned(x: I256) -> Result<U256, AmmError> {
    if x.is_negative() {
        return Err(AmmError::Underflow("negative value where unsigned expected"));
    }
    Ok(x.into_raw())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn np(units: i64) -> I256 {
        let mag = U256::from(units.unsigned_abs()) * fixed_point::ONE;
        let Ok(v) = with_sign(mag, units < 0) else {
            panic!("out of range");
        };
        v
    }

    #[test]
    fn magnitude_rounding_is_symmetric() {
        let third = ONE / I256::from_raw(U256::from(3u64));
        let half = ONE / I256::from_raw(U256::from(2u64));
        let Ok(down) = mul_down_mag(-third, half) else {
            panic!("expected Ok");
        };
        let Ok(up) = mul_up_mag(-third, half) else {
            panic!("expected Ok");
        };
        assert!(down.is_negative());
        assert_eq!(down - up, I256::from_raw(U256::from(1u64)));
    }

    #[test]
    fn division_signs() {
        let Ok(q) = div_down_mag(np(-6), np(3)) else {
            panic!("expected Ok");
        };
        assert_eq!(q, np(-2));
        let Ok(q) = div_down_mag(np(-6), np(-3)) else {
            panic!("expected Ok");
        };
        assert_eq!(q, np(2));
        assert_eq!(div_up_mag(np(1), I256::ZERO), Err(AmmError::DivisionByZero));
    }

    #[test]
    fn extended_precision_roundtrip() {
        let Ok(x) = np_to_xp(np(-5)) else {
            panic!("expected Ok");
        };
        assert_eq!(xp_to_np(x), np(-5));
        let Ok(half_xp) = div_xp(ONE_XP, np_to_xp(np(2)).unwrap_or(ONE_XP)) else {
            panic!("expected Ok");
        };
        let Ok(three_halves) = mul_xp_to_np(np(3), half_xp, Rounding::Down) else {
            panic!("expected Ok");
        };
        assert_eq!(three_halves, ONE + ONE / I256::from_raw(U256::from(2u64)));
    }

    #[test]
    fn sqrt_at_both_scales() {
        assert_eq!(sqrt(np(9), ONE), Ok(np(3)));
        let Ok(nine_xp) = np_to_xp(np(9)) else {
            panic!("expected Ok");
        };
        let Ok(three_xp) = np_to_xp(np(3)) else {
            panic!("expected Ok");
        };
        assert_eq!(sqrt(nine_xp, ONE_XP), Ok(three_xp));
        assert!(sqrt(np(-1), ONE).is_err());
    }

    #[test]
    fn conversions() {
        assert_eq!(to_unsigned(np(2)), Ok(U256::from(2u64) * fixed_point::ONE));
        assert!(to_unsigned(np(-2)).is_err());
        assert!(to_signed(U256::MAX).is_err());
    }
}
