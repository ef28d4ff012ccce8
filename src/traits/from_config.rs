//! Generic construction trait for pool instantiation from configuration.
//!
//! [`FromConfig`] provides a uniform interface for creating pool instances
//! from their respective configuration structs.  Each pool type implements
//! `FromConfig<C>` for its own config variant, enabling the factory to
//! dispatch construction without `dyn` trait objects.
//!
//! # Validation Contract
//!
//! Implementations **must** validate all configuration invariants during
//! construction.  A successfully constructed pool is guaranteed to be in
//! a state where its invariant is finite and positive.  Pools that derive
//! state from their parameters (Gyro E-CLP tau vectors, stable
//! invariants) compute it here, so degenerate parameter sets fail at
//! construction rather than deep inside a quote.
//!
//! # Factory Integration
//!
//! The [`DefaultPoolFactory`](crate::factory) uses `FromConfig` to
//! construct pools from [`PoolConfig`](crate::config::PoolConfig) variants:
//!
//! ```text
//! PoolConfig::Weighted(cfg) => WeightedPool::from_config(&cfg, solver)
//! PoolConfig::GyroE(cfg)    => GyroEPool::from_config(&cfg, solver)
//! ```
//!
//! There is no blanket implementation: every pool-config pairing is
//! explicit.

use crate::config::SolverConfig;
use crate::error::AmmError;

/// Generic construction trait for building a pool from a configuration.
///
/// # Type Parameters
///
/// - `C`: the configuration type that fully describes the pool's
///   parameters and balances.
///
/// # Implementors
///
/// - `impl FromConfig<WeightedConfig> for WeightedPool`
/// - `impl FromConfig<StableConfig> for StablePool`
/// - `impl FromConfig<ComposableStableConfig> for ComposableStablePool`
/// - `impl FromConfig<LinearConfig> for LinearPool`
/// - `impl FromConfig<Gyro2Config> for Gyro2Pool`
/// - `impl FromConfig<Gyro3Config> for Gyro3Pool`
/// - `impl FromConfig<GyroEConfig> for GyroEPool`
/// - `impl FromConfig<FxConfig> for FxPool`
pub trait FromConfig<C> {
    /// Creates a new pool instance from the given configuration.
    ///
    /// `solver` supplies the iteration caps and tolerances of the family's
    /// numeric solvers; pools keep a copy.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if any pool parameter is
    ///   out of range or inconsistent.
    /// - [`AmmError::DegenerateParameters`] if derived curve state cannot
    ///   be computed.
    fn from_config(config: &C, solver: &SolverConfig) -> Result<Self, AmmError>
    where
        Self: Sized;
}
