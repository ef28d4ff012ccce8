//! Token decimal places.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// Maximum allowed decimal places (EVM standard and the kernel's base).
const MAX_DECIMALS: u8 = 18;

/// Represents the number of decimal places for a token amount.
///
/// Valid range is `0..=18`: the fixed-point kernel works at 18 decimals
/// and every token is upscaled into that base.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use hydra_sor::domain::Decimals;
///
/// let d = Decimals::new(6).expect("6 is valid");
/// assert_eq!(d.scaling_factor(), U256::from(1_000_000_000_000u64));
/// assert_eq!(d.parse_units("1.5").expect("valid"), U256::from(1_500_000u64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Decimals(u8);

impl Default for Decimals {
    fn default() -> Self {
        Self::MAX
    }
}

impl Decimals {
    /// Zero decimal places.
    pub const ZERO: Self = Self(0);

    /// Maximum decimal places (18), the kernel's own precision.
    pub const MAX: Self = Self(MAX_DECIMALS);

    /// Creates a new `Decimals` value after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPrecision`] if `value` exceeds 18.
    pub const fn new(value: u8) -> Result<Self, AmmError> {
        if value > MAX_DECIMALS {
            return Err(AmmError::InvalidPrecision("decimals must be 0..=18"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns `10^decimals`.
    #[must_use]
    pub fn unit(&self) -> U256 {
        U256::from(10u64).pow(U256::from(self.0))
    }

    /// Returns `10^(18 - decimals)`, the factor that lifts a raw amount into
    /// the 18-decimal fixed-point base.
    #[must_use]
    pub fn scaling_factor(&self) -> U256 {
        U256::from(10u64).pow(U256::from(MAX_DECIMALS - self.0))
    }

    /// Parses a non-negative human-readable decimal string (`"1000.25"`)
    /// into raw units at this precision.
    ///
    /// Digits beyond the supported precision are truncated.
    ///
    /// # Errors
    ///
    /// - [`AmmError::CorruptSnapshot`] for a negative value.
    /// - [`AmmError::InvalidQuantity`] for a malformed string.
    /// - [`AmmError::Overflow`] if the value does not fit in 256 bits.
    pub fn parse_units(&self, human: &str) -> Result<U256, AmmError> {
        let s = human.trim();
        if s.starts_with('-') {
            return Err(AmmError::CorruptSnapshot("negative amount in snapshot"));
        }
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmmError::InvalidQuantity("empty decimal string"));
        }
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(AmmError::InvalidQuantity("malformed decimal string"));
        }

        let places = usize::from(self.0);
        let mut digits = String::with_capacity(int_part.len() + places);
        digits.push_str(int_part);
        for i in 0..places {
            digits.push(char::from(frac_part.as_bytes().get(i).copied().unwrap_or(b'0')));
        }
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(U256::ZERO);
        }
        U256::from_str_radix(digits, 10).map_err(|_| AmmError::Overflow("decimal string too large"))
    }
}

impl TryFrom<u8> for Decimals {
    type Error = AmmError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Decimals> for u8 {
    fn from(value: Decimals) -> Self {
        value.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn dec(v: u8) -> Decimals {
        let Ok(d) = Decimals::new(v) else {
            panic!("invalid decimals in test: {v}");
        };
        d
    }

    #[test]
    fn valid_range() {
        assert_eq!(dec(0).get(), 0);
        assert_eq!(dec(6).get(), 6);
        assert_eq!(dec(18).get(), 18);
    }

    #[test]
    fn nineteen_rejected() {
        assert!(Decimals::new(19).is_err());
    }

    #[test]
    fn scaling_factors() {
        assert_eq!(dec(18).scaling_factor(), U256::from(1u64));
        assert_eq!(dec(6).scaling_factor(), U256::from(1_000_000_000_000u64));
        assert_eq!(dec(0).unit(), U256::from(1u64));
        assert_eq!(dec(8).unit(), U256::from(100_000_000u64));
    }

    // -- parse_units ----------------------------------------------------------

    #[test]
    fn parse_integer() {
        assert_eq!(dec(6).parse_units("1000"), Ok(U256::from(1_000_000_000u64)));
    }

    #[test]
    fn parse_fraction() {
        assert_eq!(
            dec(18).parse_units("0.1"),
            Ok(U256::from(100_000_000_000_000_000u64))
        );
        assert_eq!(dec(2).parse_units(".5"), Ok(U256::from(50u64)));
    }

    #[test]
    fn parse_truncates_extra_digits() {
        assert_eq!(dec(2).parse_units("1.239"), Ok(U256::from(123u64)));
    }

    #[test]
    fn parse_zero() {
        assert_eq!(dec(18).parse_units("0.000"), Ok(U256::ZERO));
    }

    #[test]
    fn parse_negative_is_corrupt() {
        assert!(matches!(
            dec(18).parse_units("-1"),
            Err(AmmError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn parse_malformed() {
        assert!(dec(18).parse_units("1e18").is_err());
        assert!(dec(18).parse_units("").is_err());
        assert!(dec(18).parse_units("1.2.3").is_err());
    }

    #[test]
    fn serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Decimals>("19").is_err());
        let Ok(d) = serde_json::from_str::<Decimals>("6") else {
            panic!("expected Ok");
        };
        assert_eq!(d.get(), 6);
    }
}
