//! Raw token amount with checked arithmetic.

use core::fmt;
use core::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Rounding;
use crate::error::AmmError;

/// A raw token amount in the smallest unit (wei or equivalent).
///
/// `Amount` never interprets decimals; that responsibility lies with
/// [`Token`](super::Token).  The value is an unsigned 256-bit integer so
/// that any ERC-20 balance is representable.
///
/// Arithmetic methods are checked: they return `None` on overflow,
/// underflow, or division by zero instead of panicking.
///
/// # Examples
///
/// ```
/// use hydra_sor::domain::Amount;
///
/// let a = Amount::from_u128(100);
/// let b = Amount::from_u128(200);
/// assert_eq!(a.checked_add(&b), Some(Amount::from_u128(300)));
/// assert_eq!(b.checked_sub(&a), Some(Amount::from_u128(100)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct Amount(U256);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Maximum representable amount.
    pub const MAX: Self = Self(U256::MAX);

    /// Creates a new `Amount` from a raw `U256` value.
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// Creates a new `Amount` from a `u128`.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u128(value: u128) -> Self {
        Self(U256::from_limbs([value as u64, (value >> 64) as u64, 0, 0]))
    }

    /// Returns the underlying `U256` value.
    #[must_use]
    pub const fn get(&self) -> U256 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Checked multiplication. Returns `None` on overflow.
    #[must_use]
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        self.0.checked_mul(other.0).map(Self)
    }

    /// Checked division with explicit rounding direction.
    ///
    /// Returns `None` if `divisor` is zero.
    #[must_use]
    pub fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        crate::math::div_round(self.0, divisor.0, rounding)
            .ok()
            .map(Self)
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmmError;

    /// Parses a decimal (or `0x`-prefixed hexadecimal) integer string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_str(s.trim())
            .map(Self)
            .map_err(|_| AmmError::InvalidQuantity("amount is not an unsigned integer"))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    // -- Construction & accessors -------------------------------------------

    #[test]
    fn from_u128_and_get() {
        let a = Amount::from_u128(42);
        assert_eq!(a.get(), U256::from(42u64));
    }

    #[test]
    fn from_u128_high_bits() {
        let big = u128::MAX;
        assert_eq!(Amount::from_u128(big).get(), U256::from(big));
    }

    #[test]
    fn constants() {
        assert!(Amount::ZERO.is_zero());
        assert_eq!(Amount::MAX.get(), U256::MAX);
        assert_eq!(Amount::default(), Amount::ZERO);
    }

    // -- Arithmetic -----------------------------------------------------------

    #[test]
    fn add_overflow() {
        assert_eq!(Amount::MAX.checked_add(&Amount::from_u128(1)), None);
    }

    #[test]
    fn sub_underflow() {
        assert_eq!(Amount::ZERO.checked_sub(&Amount::from_u128(1)), None);
    }

    #[test]
    fn div_rounding() {
        let ten = Amount::from_u128(10);
        let three = Amount::from_u128(3);
        assert_eq!(ten.checked_div(&three, Rounding::Down), Some(Amount::from_u128(3)));
        assert_eq!(ten.checked_div(&three, Rounding::Up), Some(Amount::from_u128(4)));
        assert_eq!(ten.checked_div(&Amount::ZERO, Rounding::Up), None);
    }

    // -- Parsing & serde ------------------------------------------------------

    #[test]
    fn parse_decimal_string() {
        let Ok(a) = "100000000000000000".parse::<Amount>() else {
            panic!("expected Ok");
        };
        assert_eq!(a, Amount::from_u128(100_000_000_000_000_000));
    }

    #[test]
    fn parse_rejects_negative() {
        assert!("-5".parse::<Amount>().is_err());
    }

    #[test]
    fn serde_as_decimal_string() {
        let a = Amount::from_u128(1_234);
        let Ok(json) = serde_json::to_string(&a) else {
            panic!("serialize");
        };
        assert_eq!(json, "\"1234\"");
        let Ok(back) = serde_json::from_str::<Amount>(&json) else {
            panic!("deserialize");
        };
        assert_eq!(back, a);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Amount::from_u128(1_000_000)), "1000000");
    }
}
