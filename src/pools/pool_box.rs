//! Enum dispatch wrapper for all pool families.
//!
//! [`PoolBox`] wraps every concrete pool implementation behind a single
//! enum so a snapshot can hold a heterogeneous `Vec` without trait
//! objects.  Each variant is feature-gated to match its pool module.

use alloy_primitives::U256;

#[cfg(feature = "stable")]
use super::composable_stable::ComposableStablePool;
#[cfg(feature = "fx")]
use super::fx::FxPool;
#[cfg(feature = "gyro")]
use super::gyro2::Gyro2Pool;
#[cfg(feature = "gyro")]
use super::gyro3::Gyro3Pool;
#[cfg(feature = "gyro")]
use super::gyro_e::GyroEPool;
#[cfg(feature = "linear")]
use super::linear::LinearPool;
#[cfg(feature = "stable")]
use super::stable::StablePool;
#[cfg(feature = "weighted")]
use super::weighted::WeightedPool;

use crate::domain::{Amount, PoolId, PoolType, SwapFee, SwapType, Token, TokenAddress};
use crate::error::AmmError;
use crate::traits::SwapPool;

/// Static dispatch enum over every enabled pool family.
///
/// The enum implements [`SwapPool`] by delegating each call to the inner
/// pool through `match`, so the router never sees the concrete types.
/// Variants are boxed to keep the enum small; the larger pools carry
/// several `Vec`s and derived curve parameters.
///
/// # Example
///
/// ```text
/// let pool = PoolBox::Weighted(Box::new(weighted_pool));
/// let out = pool.out_given_exact_in(weth, dai, amount)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolBox {
    /// Constant weighted product.
    #[cfg(feature = "weighted")]
    Weighted(Box<WeightedPool>),

    /// Stable or MetaStable.
    #[cfg(feature = "stable")]
    Stable(Box<StablePool>),

    /// PhantomStable or ComposableStable.
    #[cfg(feature = "stable")]
    ComposableStable(Box<ComposableStablePool>),

    /// Main/wrapped linear pool.
    #[cfg(feature = "linear")]
    Linear(Box<LinearPool>),

    /// Gyroscope 2-CLP.
    #[cfg(feature = "gyro")]
    Gyro2(Box<Gyro2Pool>),

    /// Gyroscope 3-CLP.
    #[cfg(feature = "gyro")]
    Gyro3(Box<Gyro3Pool>),

    /// Gyroscope E-CLP.
    #[cfg(feature = "gyro")]
    GyroE(Box<GyroEPool>),

    /// Xave FX curve.
    #[cfg(feature = "fx")]
    Fx(Box<FxPool>),
}

/// Delegates a method call to every `PoolBox` variant.
macro_rules! delegate {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {
        match $self {
            #[cfg(feature = "weighted")]
            PoolBox::Weighted(p) => p.$method($($arg),*),
            #[cfg(feature = "stable")]
            PoolBox::Stable(p) => p.$method($($arg),*),
            #[cfg(feature = "stable")]
            PoolBox::ComposableStable(p) => p.$method($($arg),*),
            #[cfg(feature = "linear")]
            PoolBox::Linear(p) => p.$method($($arg),*),
            #[cfg(feature = "gyro")]
            PoolBox::Gyro2(p) => p.$method($($arg),*),
            #[cfg(feature = "gyro")]
            PoolBox::Gyro3(p) => p.$method($($arg),*),
            #[cfg(feature = "gyro")]
            PoolBox::GyroE(p) => p.$method($($arg),*),
            #[cfg(feature = "fx")]
            PoolBox::Fx(p) => p.$method($($arg),*),
        }
    };
}

impl SwapPool for PoolBox {
    fn id(&self) -> &PoolId {
        delegate!(self, id())
    }

    fn pool_type(&self) -> PoolType {
        delegate!(self, pool_type())
    }

    fn tokens(&self) -> &[Token] {
        delegate!(self, tokens())
    }

    fn swap_fee(&self) -> SwapFee {
        delegate!(self, swap_fee())
    }

    fn contains(&self, token: TokenAddress) -> bool {
        delegate!(self, contains(token))
    }

    fn out_given_exact_in(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_in: Amount,
    ) -> Result<Amount, AmmError> {
        delegate!(self, out_given_exact_in(token_in, token_out, amount_in))
    }

    fn in_given_exact_out(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_out: Amount,
    ) -> Result<Amount, AmmError> {
        delegate!(self, in_given_exact_out(token_in, token_out, amount_out))
    }

    fn spot_price(&self, token_in: TokenAddress, token_out: TokenAddress) -> Result<U256, AmmError> {
        delegate!(self, spot_price(token_in, token_out))
    }

    fn spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        delegate!(self, spot_price_after_swap(token_in, token_out, amount, swap_type))
    }

    fn derivative_spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        delegate!(self, derivative_spot_price_after_swap(token_in, token_out, amount, swap_type))
    }

    fn limit_amount(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        swap_type: SwapType,
    ) -> Result<Amount, AmmError> {
        delegate!(self, limit_amount(token_in, token_out, swap_type))
    }

    fn normalized_liquidity(&self, token_in: TokenAddress, token_out: TokenAddress) -> Result<U256, AmmError> {
        delegate!(self, normalized_liquidity(token_in, token_out))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::{PoolTokens, SolverConfig};
    use crate::math::fixed_point::ONE;
    use crate::test_support::{addr, token};
    use crate::traits::FromConfig;

    fn e18(units: u64) -> U256 {
        U256::from(units) * ONE
    }

    fn two_tokens(balance: u64) -> PoolTokens {
        let Ok(t) = PoolTokens::with_unit_rates(vec![token(1, 18), token(2, 18)], vec![Amount::new(e18(balance)); 2])
        else {
            panic!("valid tokens");
        };
        t
    }

    // -- Weighted via PoolBox -------------------------------------------------

    #[cfg(feature = "weighted")]
    mod weighted_tests {
        use super::*;
        use crate::config::WeightedConfig;

        fn boxed() -> (WeightedPool, PoolBox) {
            let Ok(fee) = SwapFee::from_decimal_str("0.003") else {
                panic!("valid fee");
            };
            let Ok(cfg) =
                WeightedConfig::new(PoolId::new("0xweighted"), two_tokens(1_000), vec![e18(1) / U256::from(2u64); 2], fee)
            else {
                panic!("valid config");
            };
            let Ok(pool) = WeightedPool::from_config(&cfg, &SolverConfig::default()) else {
                panic!("valid pool");
            };
            (pool.clone(), PoolBox::Weighted(Box::new(pool)))
        }

        #[test]
        fn identity_delegation() {
            let (_, pb) = boxed();
            assert_eq!(pb.id(), &PoolId::new("0xweighted"));
            assert_eq!(pb.pool_type(), PoolType::Weighted);
            assert_eq!(pb.tokens().len(), 2);
            assert!(pb.contains(addr(1)));
            assert!(!pb.contains(addr(7)));
        }

        #[test]
        fn quote_delegation_matches_inner() {
            let (inner, pb) = boxed();
            let amount = Amount::new(e18(10));
            assert_eq!(
                pb.out_given_exact_in(addr(1), addr(2), amount),
                inner.out_given_exact_in(addr(1), addr(2), amount)
            );
            assert_eq!(
                pb.derivative_spot_price_after_swap(addr(1), addr(2), amount, SwapType::ExactOut),
                inner.derivative_spot_price_after_swap(addr(1), addr(2), amount, SwapType::ExactOut)
            );
        }

        #[test]
        fn debug_format_contains_variant() {
            let (_, pb) = boxed();
            assert!(format!("{pb:?}").contains("Weighted"));
        }
    }

    // -- Stable via PoolBox ---------------------------------------------------

    #[cfg(feature = "stable")]
    mod stable_tests {
        use super::*;
        use crate::config::{StableConfig, AMP_PRECISION};

        #[test]
        fn limit_delegation_matches_inner() {
            let Ok(fee) = SwapFee::from_decimal_str("0.0004") else {
                panic!("valid fee");
            };
            let Ok(cfg) = StableConfig::new(
                PoolId::new("0xstable"),
                two_tokens(1_000_000),
                U256::from(200 * AMP_PRECISION),
                fee,
                false,
            ) else {
                panic!("valid config");
            };
            let Ok(pool) = StablePool::from_config(&cfg, &SolverConfig::default()) else {
                panic!("valid pool");
            };
            let pb = PoolBox::Stable(Box::new(pool.clone()));
            assert_eq!(pb.pool_type(), PoolType::Stable);
            assert_eq!(
                pb.limit_amount(addr(1), addr(2), SwapType::ExactOut),
                pool.limit_amount(addr(1), addr(2), SwapType::ExactOut)
            );
        }
    }

    // -- Gyro via PoolBox -----------------------------------------------------

    #[cfg(feature = "gyro")]
    mod gyro_tests {
        use super::*;
        use crate::config::Gyro2Config;

        #[test]
        fn normalized_liquidity_delegation() {
            let Ok(fee) = SwapFee::from_decimal_str("0.001") else {
                panic!("valid fee");
            };
            let Ok(cfg) = Gyro2Config::new(
                PoolId::new("0xgyro2"),
                two_tokens(1_000),
                U256::from(950_000_000_000_000_000u128),
                U256::from(1_052_631_578_947_368_421u128),
                fee,
            ) else {
                panic!("valid config");
            };
            let Ok(pool) = Gyro2Pool::from_config(&cfg, &SolverConfig::default()) else {
                panic!("valid pool");
            };
            let pb = PoolBox::Gyro2(Box::new(pool.clone()));
            assert_eq!(pb.normalized_liquidity(addr(1), addr(2)), pool.normalized_liquidity(addr(1), addr(2)));
            assert_eq!(pb.swap_fee(), fee);
        }
    }
}
