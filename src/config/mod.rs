//! Pool and router configuration.
//!
//! This module contains the [`PoolConfig`] enum (the typed blueprint for
//! every pool family) with one configuration struct per family, the
//! [`PoolRecord`] wire format snapshots arrive in, and the solver and
//! router settings.

mod composable_stable;
mod fx;
mod gyro;
mod linear;
mod pool_config;
mod pool_record;
mod pool_tokens;
mod router;
mod solver;
pub(crate) mod stable;
mod weighted;

pub use composable_stable::ComposableStableConfig;
pub use fx::{FxConfig, FxParams};
pub use gyro::{Gyro2Config, Gyro3Config, GyroEConfig, GyroEParams};
pub use linear::LinearConfig;
pub use pool_config::PoolConfig;
pub use pool_record::{PoolRecord, TokenInfoRecord, TokenRecord};
pub use pool_tokens::PoolTokens;
pub use router::{CostPolicy, OptimizerConfig, RouterConfig};
pub use solver::SolverConfig;
pub use stable::{StableConfig, AMP_PRECISION};
pub use weighted::WeightedConfig;
