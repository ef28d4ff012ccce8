//! Pool family tag.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The family a pool belongs to, as tagged in the snapshot.
///
/// Serialised with the subgraph's `poolType` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    /// Constant weighted product.
    #[serde(alias = "LiquidityBootstrapping", alias = "Investment")]
    Weighted,
    /// Stable-swap invariant.
    Stable,
    /// Stable-swap with per-token price rates.
    MetaStable,
    /// Stable pool whose BPT is one of its own tokens.
    #[serde(alias = "StablePhantom")]
    PhantomStable,
    /// Composable stable pool (rate providers, pre-minted BPT).
    ComposableStable,
    /// Main/wrapped linear pool.
    #[serde(alias = "AaveLinear", alias = "ERC4626Linear", alias = "EulerLinear")]
    Linear,
    /// Two-asset concentrated liquidity pool.
    Gyro2,
    /// Three-asset concentrated liquidity pool.
    Gyro3,
    /// Elliptic concentrated liquidity pool.
    GyroE,
    /// Oracle-rate FX pool.
    #[serde(rename = "FX")]
    Fx,
}

impl PoolType {
    /// Returns `true` when the pool's own share token is tradable inside it.
    #[must_use]
    pub const fn has_bpt_token(&self) -> bool {
        matches!(self, Self::PhantomStable | Self::ComposableStable | Self::Linear)
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Weighted => "Weighted",
            Self::Stable => "Stable",
            Self::MetaStable => "MetaStable",
            Self::PhantomStable => "PhantomStable",
            Self::ComposableStable => "ComposableStable",
            Self::Linear => "Linear",
            Self::Gyro2 => "Gyro2",
            Self::Gyro3 => "Gyro3",
            Self::GyroE => "GyroE",
            Self::Fx => "FX",
        };
        f.write_str(name)
    }
}
