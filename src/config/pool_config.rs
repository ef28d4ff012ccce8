//! Top-level pool configuration enum.
//!
//! [`PoolConfig`] is the typed blueprint for every pool in a snapshot.
//! The factory matches on it to dispatch construction:
//!
//! ```text
//! match config {
//!     PoolConfig::Weighted(cfg) => WeightedPool::from_config(&cfg, solver),
//!     PoolConfig::Stable(cfg)   => StablePool::from_config(&cfg, solver),
//!     ...
//! }
//! ```

use super::{
    ComposableStableConfig, FxConfig, Gyro2Config, Gyro3Config, GyroEConfig, LinearConfig,
    PoolTokens, StableConfig, WeightedConfig,
};
use crate::domain::{PoolId, PoolType};
use crate::error::AmmError;

/// Typed configuration for one pool of any supported family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolConfig {
    /// Constant weighted product.
    Weighted(WeightedConfig),
    /// Stable or MetaStable.
    Stable(StableConfig),
    /// PhantomStable or ComposableStable.
    ComposableStable(ComposableStableConfig),
    /// Main/wrapped linear pool.
    Linear(LinearConfig),
    /// Two-asset Gyro pool.
    Gyro2(Gyro2Config),
    /// Three-asset Gyro pool.
    Gyro3(Gyro3Config),
    /// Elliptic Gyro pool.
    GyroE(GyroEConfig),
    /// Oracle-rate FX pool.
    Fx(FxConfig),
}

impl PoolConfig {
    /// Validates the inner configuration by delegating to the
    /// variant-specific `validate()` method.
    ///
    /// # Errors
    ///
    /// Returns the same [`AmmError`] that the inner config's
    /// `validate()` would return.
    pub fn validate(&self) -> Result<(), AmmError> {
        match self {
            Self::Weighted(cfg) => cfg.validate(),
            Self::Stable(cfg) => cfg.validate(),
            Self::ComposableStable(cfg) => cfg.validate(),
            Self::Linear(cfg) => cfg.validate(),
            Self::Gyro2(cfg) => cfg.validate(),
            Self::Gyro3(cfg) => cfg.validate(),
            Self::GyroE(cfg) => cfg.validate(),
            Self::Fx(cfg) => cfg.validate(),
        }
    }

    /// Returns the pool id.
    #[must_use]
    pub const fn id(&self) -> &PoolId {
        match self {
            Self::Weighted(cfg) => cfg.id(),
            Self::Stable(cfg) => cfg.id(),
            Self::ComposableStable(cfg) => cfg.id(),
            Self::Linear(cfg) => cfg.id(),
            Self::Gyro2(cfg) => cfg.id(),
            Self::Gyro3(cfg) => cfg.id(),
            Self::GyroE(cfg) => cfg.id(),
            Self::Fx(cfg) => cfg.id(),
        }
    }

    /// Returns the token list.
    #[must_use]
    pub const fn tokens(&self) -> &PoolTokens {
        match self {
            Self::Weighted(cfg) => cfg.tokens(),
            Self::Stable(cfg) => cfg.tokens(),
            Self::ComposableStable(cfg) => cfg.tokens(),
            Self::Linear(cfg) => cfg.tokens(),
            Self::Gyro2(cfg) => cfg.tokens(),
            Self::Gyro3(cfg) => cfg.tokens(),
            Self::GyroE(cfg) => cfg.tokens(),
            Self::Fx(cfg) => cfg.tokens(),
        }
    }

    /// Returns the pool family.
    #[must_use]
    pub const fn pool_type(&self) -> PoolType {
        match self {
            Self::Weighted(_) => PoolType::Weighted,
            Self::Stable(cfg) if cfg.is_meta() => PoolType::MetaStable,
            Self::Stable(_) => PoolType::Stable,
            Self::ComposableStable(cfg) => cfg.pool_type(),
            Self::Linear(_) => PoolType::Linear,
            Self::Gyro2(_) => PoolType::Gyro2,
            Self::Gyro3(_) => PoolType::Gyro3,
            Self::GyroE(_) => PoolType::GyroE,
            Self::Fx(_) => PoolType::Fx,
        }
    }
}

impl core::fmt::Display for PoolConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}({})", self.pool_type(), self.id())
    }
}
