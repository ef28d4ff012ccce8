//! Pool swap fee as an 18-decimal fixed-point fraction.

use core::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmmError;
use crate::math::fixed_point::{self, ONE};

/// A swap fee in `[0, 1)` expressed at the kernel's `1e18` base.
///
/// `0.003e18` is a 0.3% fee.  Values at or above one are rejected: a pool
/// that keeps the whole input has no price.
///
/// # Examples
///
/// ```
/// use hydra_sor::domain::SwapFee;
///
/// let fee = SwapFee::from_percent_str("0.3").expect("valid");
/// assert_eq!(fee.to_string(), "0.003");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SwapFee(U256);

impl SwapFee {
    /// A zero fee.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Creates a fee from its `1e18`-scaled value.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if `value >= 1e18`.
    pub fn new(value: U256) -> Result<Self, AmmError> {
        if value >= ONE {
            return Err(AmmError::InvalidFee("swap fee must be below 1"));
        }
        Ok(Self(value))
    }

    /// Parses a decimal fraction string (`"0.003"`), the format pool
    /// snapshots carry.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] for a malformed or out-of-range fee.
    pub fn from_decimal_str(s: &str) -> Result<Self, AmmError> {
        let value = super::Decimals::MAX
            .parse_units(s)
            .map_err(|_| AmmError::InvalidFee("malformed swap fee"))?;
        Self::new(value)
    }

    /// Parses a percentage string (`"0.3"` is 0.3%).
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] for a malformed or out-of-range fee.
    pub fn from_percent_str(s: &str) -> Result<Self, AmmError> {
        let value = super::Decimals::MAX
            .parse_units(s)
            .map_err(|_| AmmError::InvalidFee("malformed swap fee"))?;
        Self::new(value / U256::from(100u64))
    }

    /// Returns the `1e18`-scaled value.
    #[must_use]
    pub const fn get(&self) -> U256 {
        self.0
    }

    /// Returns `true` for a zero fee.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `1 - fee`, which is strictly positive.
    #[must_use]
    pub fn complement(&self) -> U256 {
        fixed_point::complement(self.0)
    }

    /// Removes the fee from an exact input: `amount - mul_up(amount, fee)`.
    ///
    /// # Errors
    ///
    /// Propagates kernel overflow.
    pub fn subtract_from(&self, amount: U256) -> Result<U256, AmmError> {
        let fee_amount = fixed_point::mul_up(amount, self.0)?;
        fixed_point::sub(amount, fee_amount)
    }

    /// Grosses up an amount that must reach the pool after fees:
    /// `div_up(amount, 1 - fee)`.
    ///
    /// # Errors
    ///
    /// Propagates kernel overflow.
    pub fn add_to(&self, amount: U256) -> Result<U256, AmmError> {
        fixed_point::div_up(amount, self.complement())
    }
}

impl fmt::Display for SwapFee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / ONE;
        let frac = self.0 % ONE;
        if frac.is_zero() {
            return write!(f, "{int}");
        }
        let frac = format!("{:0>18}", frac.to_string());
        write!(f, "{int}.{}", frac.trim_end_matches('0'))
    }
}

impl Serialize for SwapFee {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SwapFee {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_decimal_str(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn fee(s: &str) -> SwapFee {
        let Ok(f) = SwapFee::from_decimal_str(s) else {
            panic!("invalid fee in test: {s}");
        };
        f
    }

    #[test]
    fn one_is_rejected() {
        assert!(SwapFee::new(ONE).is_err());
        assert!(SwapFee::from_decimal_str("1").is_err());
        assert!(SwapFee::from_decimal_str("abc").is_err());
    }

    #[test]
    fn percent_and_decimal_agree() {
        let Ok(p) = SwapFee::from_percent_str("0.3") else {
            panic!("expected Ok");
        };
        assert_eq!(p, fee("0.003"));
    }

    #[test]
    fn complement_of_zero_is_one() {
        assert_eq!(SwapFee::ZERO.complement(), ONE);
        assert_eq!(fee("0.25").complement(), U256::from(750_000_000_000_000_000u64));
    }

    #[test]
    fn subtract_rounds_fee_up() {
        // 0.3% of 1001 wei is 3.003, charged as 4
        let Ok(net) = fee("0.003").subtract_from(U256::from(1001u64)) else {
            panic!("expected Ok");
        };
        assert_eq!(net, U256::from(997u64));
    }

    #[test]
    fn add_to_is_inverse_direction() {
        let f = fee("0.01");
        let Ok(gross) = f.add_to(U256::from(990_000u64)) else {
            panic!("expected Ok");
        };
        assert_eq!(gross, U256::from(1_000_000u64));
    }

    #[test]
    fn display_trims_zeros() {
        assert_eq!(fee("0.0004").to_string(), "0.0004");
        assert_eq!(SwapFee::ZERO.to_string(), "0");
    }

    #[test]
    fn serde_roundtrip_as_string() {
        let Ok(f) = serde_json::from_str::<SwapFee>("\"0.003\"") else {
            panic!("deserialize");
        };
        let Ok(json) = serde_json::to_string(&f) else {
            panic!("serialize");
        };
        assert_eq!(json, "\"0.003\"");
    }
}
