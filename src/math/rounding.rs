//! Rounding helpers for integer division.
//!
//! This module provides [`div_round`], a free function that performs `U256`
//! division with an explicit [`Rounding`] direction (the on-chain
//! `Math.divDown` / `Math.divUp`).  It is the low-level building block used
//! by [`Amount`](crate::domain::Amount) and by pool math that divides plain
//! integers rather than fixed-point values.
//!
//! # Convention
//!
//! **Always round against the user** (protocol-favorable):
//!
//! | Quantity | Direction | Rationale |
//! |----------|-----------|-----------|
//! | Output amount | [`Rounding::Down`] | User receives less |
//! | Input amount | [`Rounding::Up`] | User pays more |
//! | Fee amount | [`Rounding::Up`] | Protocol takes more |
//!
//! # Examples
//!
//! ```
//! use alloy_primitives::U256;
//! use hydra_sor::domain::Rounding;
//! use hydra_sor::math::div_round;
//!
//! let ten = U256::from(10u64);
//! let three = U256::from(3u64);
//! assert_eq!(div_round(ten, three, Rounding::Down), Ok(U256::from(3u64)));
//! assert_eq!(div_round(ten, three, Rounding::Up), Ok(U256::from(4u64)));
//! assert!(div_round(ten, U256::ZERO, Rounding::Down).is_err());
//! ```

use alloy_primitives::U256;

use crate::domain::Rounding;
use crate::error::AmmError;

/// Integer division of `U256` values with explicit rounding direction.
///
/// - [`Rounding::Down`]: floor division.
/// - [`Rounding::Up`]: ceiling division, the smallest integer not below the
///   exact quotient.  Computed as `floor + (remainder != 0)` so it cannot
///   overflow.
///
/// # Errors
///
/// Returns [`AmmError::DivisionByZero`] if `denominator` is zero.
pub fn div_round(numerator: U256, denominator: U256, rounding: Rounding) -> Result<U256, AmmError> {
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let q = numerator / denominator;
    match rounding {
        Rounding::Down => Ok(q),
        Rounding::Up => {
            if (numerator % denominator).is_zero() {
                Ok(q)
            } else {
                // q < numerator here, so q + 1 fits
                Ok(q + U256::from(1u64))
            }
        }
    }
}
