//! Configuration for the Gyroscope concentrated-liquidity pools
//! (2-CLP, 3-CLP and E-CLP).

use alloy_primitives::U256;

use super::PoolTokens;
use crate::domain::{PoolId, SwapFee};
use crate::error::AmmError;
use crate::math::fixed_point::ONE;

/// Configuration for a two-token Gyro pool trading inside the price range
/// `[alpha, beta]`, given by the square roots of its bounds.
///
/// # Validation
///
/// - Exactly 2 tokens.
/// - `0 < sqrt_alpha < sqrt_beta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gyro2Config {
    id: PoolId,
    tokens: PoolTokens,
    sqrt_alpha: U256,
    sqrt_beta: U256,
    swap_fee: SwapFee,
}

impl Gyro2Config {
    /// Creates a new `Gyro2Config`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] for a token count other than 2.
    /// - [`AmmError::DegenerateParameters`] if the price range is empty.
    pub fn new(
        id: PoolId,
        tokens: PoolTokens,
        sqrt_alpha: U256,
        sqrt_beta: U256,
        swap_fee: SwapFee,
    ) -> Result<Self, AmmError> {
        let config = Self {
            id,
            tokens,
            sqrt_alpha,
            sqrt_beta,
            swap_fee,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`Gyro2Config::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        self.tokens.validate()?;
        if self.tokens.len() != 2 {
            return Err(AmmError::InvalidConfiguration("2-CLP pools hold exactly 2 tokens"));
        }
        if self.sqrt_alpha.is_zero() || self.sqrt_alpha >= self.sqrt_beta {
            return Err(AmmError::DegenerateParameters(
                "sqrt_alpha must be positive and below sqrt_beta",
            ));
        }
        Ok(())
    }

    /// Returns the pool id.
    #[must_use]
    pub const fn id(&self) -> &PoolId {
        &self.id
    }

    /// Returns the token list.
    #[must_use]
    pub const fn tokens(&self) -> &PoolTokens {
        &self.tokens
    }

    /// Square root of the lower price bound.
    #[must_use]
    pub const fn sqrt_alpha(&self) -> U256 {
        self.sqrt_alpha
    }

    /// Square root of the upper price bound.
    #[must_use]
    pub const fn sqrt_beta(&self) -> U256 {
        self.sqrt_beta
    }

    /// Returns the swap fee.
    #[must_use]
    pub const fn swap_fee(&self) -> SwapFee {
        self.swap_fee
    }
}

/// Configuration for a three-token Gyro pool whose prices all lie in
/// `[alpha, 1/alpha]`, parameterised by the cube root of `alpha`.
///
/// # Validation
///
/// - Exactly 3 tokens.
/// - `0 < root3_alpha < 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gyro3Config {
    id: PoolId,
    tokens: PoolTokens,
    root3_alpha: U256,
    swap_fee: SwapFee,
}

impl Gyro3Config {
    /// Creates a new `Gyro3Config`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] for a token count other than 3.
    /// - [`AmmError::DegenerateParameters`] if `root3_alpha` is outside `(0, 1)`.
    pub fn new(
        id: PoolId,
        tokens: PoolTokens,
        root3_alpha: U256,
        swap_fee: SwapFee,
    ) -> Result<Self, AmmError> {
        let config = Self {
            id,
            tokens,
            root3_alpha,
            swap_fee,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`Gyro3Config::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        self.tokens.validate()?;
        if self.tokens.len() != 3 {
            return Err(AmmError::InvalidConfiguration("3-CLP pools hold exactly 3 tokens"));
        }
        if self.root3_alpha.is_zero() || self.root3_alpha >= ONE {
            return Err(AmmError::DegenerateParameters("root3_alpha must lie in (0, 1)"));
        }
        Ok(())
    }

    /// Returns the pool id.
    #[must_use]
    pub const fn id(&self) -> &PoolId {
        &self.id
    }

    /// Returns the token list.
    #[must_use]
    pub const fn tokens(&self) -> &PoolTokens {
        &self.tokens
    }

    /// Cube root of the lower price bound.
    #[must_use]
    pub const fn root3_alpha(&self) -> U256 {
        self.root3_alpha
    }

    /// Returns the swap fee.
    #[must_use]
    pub const fn swap_fee(&self) -> SwapFee {
        self.swap_fee
    }
}

/// Raw E-CLP curve parameters, all `1e18`-scaled.
///
/// The curve is an ellipse stretched by `lambda` and rotated by the angle
/// whose cosine and sine are `c` and `s`; it trades at prices within
/// `[alpha, beta]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GyroEParams {
    /// Lower price bound.
    pub alpha: U256,
    /// Upper price bound.
    pub beta: U256,
    /// Cosine of the rotation angle.
    pub c: U256,
    /// Sine of the rotation angle.
    pub s: U256,
    /// Stretching factor, at least one.
    pub lambda: U256,
}

// Largest accepted stretching factor (1e8).
fn max_lambda() -> U256 {
    U256::from(100_000_000_000_000_000_000_000_000u128)
}

/// Configuration for an elliptic-curve Gyro pool.
///
/// Structural checks happen here; the derived quantities (`tau` vectors,
/// virtual offsets) are computed when the pool is built and may still
/// reject a numerically degenerate parameter set.
///
/// # Validation
///
/// - Exactly 2 tokens.
/// - `0 < alpha < beta`.
/// - `c² + s²` within `1e-8` of one.
/// - `1 <= lambda <= 1e8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GyroEConfig {
    id: PoolId,
    tokens: PoolTokens,
    params: GyroEParams,
    swap_fee: SwapFee,
}

impl GyroEConfig {
    /// Creates a new `GyroEConfig`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] for a token count other than 2.
    /// - [`AmmError::DegenerateParameters`] for any out-of-range parameter.
    pub fn new(
        id: PoolId,
        tokens: PoolTokens,
        params: GyroEParams,
        swap_fee: SwapFee,
    ) -> Result<Self, AmmError> {
        let config = Self {
            id,
            tokens,
            params,
            swap_fee,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`GyroEConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        self.tokens.validate()?;
        if self.tokens.len() != 2 {
            return Err(AmmError::InvalidConfiguration("E-CLP pools hold exactly 2 tokens"));
        }
        let p = &self.params;
        if p.alpha.is_zero() || p.alpha >= p.beta {
            return Err(AmmError::DegenerateParameters("alpha must be positive and below beta"));
        }
        if p.c > ONE || p.s > ONE {
            return Err(AmmError::DegenerateParameters("c and s must not exceed one"));
        }
        // c and s are at most one, so the squares cannot overflow.
        let norm = (p.c * p.c + p.s * p.s) / ONE;
        let tolerance = U256::from(10_000_000_000u64);
        if norm.abs_diff(ONE) > tolerance {
            return Err(AmmError::DegenerateParameters("c² + s² must equal one"));
        }
        if p.lambda < ONE || p.lambda > max_lambda() {
            return Err(AmmError::DegenerateParameters("lambda must lie in [1, 1e8]"));
        }
        Ok(())
    }

    /// Returns the pool id.
    #[must_use]
    pub const fn id(&self) -> &PoolId {
        &self.id
    }

    /// Returns the token list.
    #[must_use]
    pub const fn tokens(&self) -> &PoolTokens {
        &self.tokens
    }

    /// Returns the curve parameters.
    #[must_use]
    pub const fn params(&self) -> &GyroEParams {
        &self.params
    }

    /// Returns the swap fee.
    #[must_use]
    pub const fn swap_fee(&self) -> SwapFee {
        self.swap_fee
    }
}
