//! Default pool factory implementation.

use crate::config::{PoolConfig, SolverConfig};
use crate::error::AmmError;
use crate::pools::PoolBox;

#[cfg(any(
    feature = "weighted",
    feature = "stable",
    feature = "linear",
    feature = "gyro",
    feature = "fx",
))]
use crate::traits::FromConfig;

/// Stateless factory for creating pool instances from configuration.
///
/// `DefaultPoolFactory` is the single entry point for constructing any
/// pool.  It matches on the [`PoolConfig`] variant, validates the
/// configuration, delegates to the pool's [`FromConfig`] implementation,
/// and wraps the result in a [`PoolBox`].
///
/// # Thread Safety
///
/// [`create`](Self::create) is a pure function with no shared mutable
/// state, so it is `Send + Sync`.
///
/// # Example
///
/// ```rust
/// use hydra_sor::config::{PoolConfig, PoolTokens, SolverConfig, WeightedConfig};
/// use hydra_sor::domain::{Amount, Decimals, PoolId, SwapFee, Token, TokenAddress};
/// use hydra_sor::factory::DefaultPoolFactory;
/// use hydra_sor::math::fixed_point::ONE;
/// use hydra_sor::traits::SwapPool;
/// use alloy_primitives::U256;
///
/// let d18 = Decimals::new(18).expect("valid");
/// let a = Token::new(TokenAddress::from_bytes([1u8; 20]), d18);
/// let b = Token::new(TokenAddress::from_bytes([2u8; 20]), d18);
/// let tokens = PoolTokens::with_unit_rates(vec![a, b], vec![Amount::new(ONE); 2]).expect("valid");
/// let half = ONE / U256::from(2u64);
/// let fee = SwapFee::from_decimal_str("0.003").expect("valid");
/// let cfg = WeightedConfig::new(PoolId::new("0xpool"), tokens, vec![half, half], fee).expect("valid");
///
/// let pool = DefaultPoolFactory::create(&PoolConfig::Weighted(cfg), &SolverConfig::default())
///     .expect("pool created");
/// assert_eq!(pool.swap_fee(), fee);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefaultPoolFactory;

impl DefaultPoolFactory {
    /// Creates a new pool instance from the given configuration.
    ///
    /// # Flow
    ///
    /// 1. Validate the configuration via [`PoolConfig::validate`] and the
    ///    solver settings via [`SolverConfig::validate`].
    /// 2. Match on the config variant.
    /// 3. Delegate to the pool's [`FromConfig`] implementation.
    /// 4. Wrap the constructed pool in the corresponding [`PoolBox`]
    ///    variant.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if the configuration is
    ///   invalid or if the requested family's feature is not enabled.
    /// - Any error propagated from the pool's `from_config` method, e.g.
    ///   [`AmmError::ZeroReserve`] or [`AmmError::DegenerateParameters`].
    pub fn create(config: &PoolConfig, solver: &SolverConfig) -> Result<PoolBox, AmmError> {
        config.validate()?;
        solver.validate()?;

        match config {
            #[cfg(feature = "weighted")]
            PoolConfig::Weighted(cfg) => {
                let pool = crate::pools::weighted::WeightedPool::from_config(cfg, solver)?;
                Ok(PoolBox::Weighted(Box::new(pool)))
            }

            #[cfg(feature = "stable")]
            PoolConfig::Stable(cfg) => {
                let pool = crate::pools::stable::StablePool::from_config(cfg, solver)?;
                Ok(PoolBox::Stable(Box::new(pool)))
            }

            #[cfg(feature = "stable")]
            PoolConfig::ComposableStable(cfg) => {
                let pool = crate::pools::composable_stable::ComposableStablePool::from_config(cfg, solver)?;
                Ok(PoolBox::ComposableStable(Box::new(pool)))
            }

            #[cfg(feature = "linear")]
            PoolConfig::Linear(cfg) => {
                let pool = crate::pools::linear::LinearPool::from_config(cfg, solver)?;
                Ok(PoolBox::Linear(Box::new(pool)))
            }

            #[cfg(feature = "gyro")]
            PoolConfig::Gyro2(cfg) => {
                let pool = crate::pools::gyro2::Gyro2Pool::from_config(cfg, solver)?;
                Ok(PoolBox::Gyro2(Box::new(pool)))
            }

            #[cfg(feature = "gyro")]
            PoolConfig::Gyro3(cfg) => {
                let pool = crate::pools::gyro3::Gyro3Pool::from_config(cfg, solver)?;
                Ok(PoolBox::Gyro3(Box::new(pool)))
            }

            #[cfg(feature = "gyro")]
            PoolConfig::GyroE(cfg) => {
                let pool = crate::pools::gyro_e::GyroEPool::from_config(cfg, solver)?;
                Ok(PoolBox::GyroE(Box::new(pool)))
            }

            #[cfg(feature = "fx")]
            PoolConfig::Fx(cfg) => {
                let pool = crate::pools::fx::FxPool::from_config(cfg, solver)?;
                Ok(PoolBox::Fx(Box::new(pool)))
            }

            // Config variants whose pool feature is disabled.
            #[allow(unreachable_patterns)]
            _ => Err(AmmError::InvalidConfiguration(
                "requested pool type is not enabled (missing feature flag)",
            )),
        }
    }
}
