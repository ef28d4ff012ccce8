//! Linear pool: main token, wrapped token and BPT at par, with the fee
//! applied only outside the target band (see [`linear_math`](super::linear_math)).
//!
//! Marginal prices are piecewise constant in the main balance, so every
//! price derivative is zero.

use alloy_primitives::U256;

use super::common::{ScaledBalances, MAX_OUT_RATIO};
use super::linear_math::{self as math, LinearBalances, LinearParams};
use crate::config::{LinearConfig, SolverConfig};
use crate::domain::{Amount, PoolId, PoolType, Rounding, SwapFee, SwapType, Token, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point::{self, ONE};
use crate::traits::{FromConfig, SwapPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    MainToWrapped,
    WrappedToMain,
    MainToBpt,
    BptToMain,
    WrappedToBpt,
    BptToWrapped,
}

/// A Balancer linear pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearPool {
    id: PoolId,
    scaled: ScaledBalances,
    main: usize,
    wrapped: usize,
    bpt: usize,
    params: LinearParams,
    supply: U256,
    swap_fee: SwapFee,
}

impl LinearPool {
    fn balances(&self) -> LinearBalances {
        LinearBalances {
            main: self.scaled.balance(self.main),
            wrapped: self.scaled.balance(self.wrapped),
            supply: self.supply,
        }
    }

    fn leg(&self, token_in: TokenAddress, token_out: TokenAddress) -> Result<(usize, usize, Leg), AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        let leg = match (i, o) {
            (i, o) if i == self.main && o == self.wrapped => Leg::MainToWrapped,
            (i, o) if i == self.wrapped && o == self.main => Leg::WrappedToMain,
            (i, o) if i == self.main && o == self.bpt => Leg::MainToBpt,
            (i, o) if i == self.bpt && o == self.main => Leg::BptToMain,
            (i, o) if i == self.wrapped && o == self.bpt => Leg::WrappedToBpt,
            _ => Leg::BptToWrapped,
        };
        Ok((i, o, leg))
    }

    fn scaled_out(&self, leg: Leg, amount_in: U256) -> Result<U256, AmmError> {
        let b = self.balances();
        let p = &self.params;
        match leg {
            Leg::MainToWrapped => math::wrapped_out_per_main_in(amount_in, b.main, p),
            Leg::WrappedToMain => math::main_out_per_wrapped_in(amount_in, b.main, p),
            Leg::MainToBpt => math::bpt_out_per_main_in(amount_in, &b, p),
            Leg::BptToMain => math::main_out_per_bpt_in(amount_in, &b, p),
            Leg::WrappedToBpt => math::bpt_out_per_wrapped_in(amount_in, &b, p),
            Leg::BptToWrapped => math::wrapped_out_per_bpt_in(amount_in, &b, p),
        }
    }

    fn scaled_in(&self, leg: Leg, amount_out: U256) -> Result<U256, AmmError> {
        let b = self.balances();
        let p = &self.params;
        match leg {
            Leg::MainToWrapped => math::main_in_per_wrapped_out(amount_out, b.main, p),
            Leg::WrappedToMain => math::wrapped_in_per_main_out(amount_out, b.main, p),
            Leg::MainToBpt => math::main_in_per_bpt_out(amount_out, &b, p),
            Leg::BptToMain => math::bpt_in_per_main_out(amount_out, &b, p),
            Leg::WrappedToBpt => math::wrapped_in_per_bpt_out(amount_out, &b, p),
            Leg::BptToWrapped => math::bpt_in_per_wrapped_out(amount_out, &b, p),
        }
    }

    /// Main balance after the trade, for the legs that move it.
    fn main_after(&self, leg: Leg, scaled_in: U256, scaled_out: U256) -> Result<U256, AmmError> {
        let main = self.scaled.balance(self.main);
        match leg {
            Leg::MainToWrapped | Leg::MainToBpt => fixed_point::add(main, scaled_in),
            Leg::WrappedToMain | Leg::BptToMain => {
                main.checked_sub(scaled_out).ok_or(AmmError::InsufficientLiquidity)
            }
            Leg::WrappedToBpt | Leg::BptToWrapped => Ok(main),
        }
    }
}

impl FromConfig<LinearConfig> for LinearPool {
    /// Zero balances are allowed: a fresh linear pool often holds no
    /// wrapped token.
    ///
    /// # Errors
    ///
    /// Propagates [`LinearConfig::validate`] errors.
    fn from_config(config: &LinearConfig, _solver: &SolverConfig) -> Result<Self, AmmError> {
        config.validate()?;
        let scaled = ScaledBalances::new(config.tokens(), true)?;
        let supply = scaled.upscale(config.bpt_index(), config.virtual_supply())?;
        Ok(Self {
            id: config.id().clone(),
            main: config.main_index(),
            wrapped: config.wrapped_index(),
            bpt: config.bpt_index(),
            params: LinearParams {
                fee: config.swap_fee().get(),
                lower: config.lower_target(),
                upper: config.upper_target(),
            },
            supply,
            swap_fee: config.swap_fee(),
            scaled,
        })
    }
}

impl SwapPool for LinearPool {
    fn id(&self) -> &PoolId {
        &self.id
    }

    fn pool_type(&self) -> PoolType {
        PoolType::Linear
    }

    fn tokens(&self) -> &[Token] {
        self.scaled.tokens()
    }

    fn swap_fee(&self) -> SwapFee {
        self.swap_fee
    }

    fn out_given_exact_in(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_in: Amount,
    ) -> Result<Amount, AmmError> {
        let (i, o, leg) = self.leg(token_in, token_out)?;
        if amount_in.is_zero() {
            return Ok(Amount::ZERO);
        }
        let out = self.scaled_out(leg, self.scaled.upscale(i, amount_in)?)?;
        self.scaled.downscale(o, out, Rounding::Down)
    }

    fn in_given_exact_out(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_out: Amount,
    ) -> Result<Amount, AmmError> {
        let (i, o, leg) = self.leg(token_in, token_out)?;
        if amount_out.is_zero() {
            return Ok(Amount::ZERO);
        }
        let needed = self.scaled_in(leg, self.scaled.upscale(o, amount_out)?)?;
        self.scaled.downscale(i, needed, Rounding::Up)
    }

    /// Price at the main balance reached by the trade:
    ///
    /// | leg | price |
    /// |-----|-------|
    /// | main → wrapped | `1 / s` |
    /// | wrapped → main | `s` |
    /// | main → BPT | `rate / s` |
    /// | BPT → main | `s / rate` |
    /// | wrapped → BPT | `rate` |
    /// | BPT → wrapped | `1 / rate` |
    ///
    /// where `s` is the nominal slope and `rate` the value of one BPT.
    fn spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let (i, o, leg) = self.leg(token_in, token_out)?;
        let (scaled_in, scaled_out) = match swap_type {
            SwapType::ExactIn => {
                let a = self.scaled.upscale(i, amount)?;
                (a, if a.is_zero() { U256::ZERO } else { self.scaled_out(leg, a)? })
            }
            SwapType::ExactOut => {
                let b = self.scaled.upscale(o, amount)?;
                (if b.is_zero() { U256::ZERO } else { self.scaled_in(leg, b)? }, b)
            }
        };
        let slope = math::nominal_slope(self.main_after(leg, scaled_in, scaled_out)?, &self.params)?;
        let rate = || math::bpt_rate(&self.balances(), &self.params);
        let price = match leg {
            Leg::MainToWrapped => fixed_point::div_up(ONE, slope)?,
            Leg::WrappedToMain => slope,
            Leg::MainToBpt => fixed_point::div_up(rate()?, slope)?,
            Leg::BptToMain => fixed_point::div_up(slope, rate()?)?,
            Leg::WrappedToBpt => rate()?,
            Leg::BptToWrapped => fixed_point::div_up(ONE, rate()?)?,
        };
        self.scaled.price_to_human(price, i, o)
    }

    fn derivative_spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        _amount: Amount,
        _swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        self.leg(token_in, token_out)?;
        Ok(U256::ZERO)
    }

    fn limit_amount(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        swap_type: SwapType,
    ) -> Result<Amount, AmmError> {
        let (_, o, _) = self.leg(token_in, token_out)?;
        let available = if o == self.bpt {
            self.scaled.downscale(o, self.supply, Rounding::Down)?
        } else {
            self.scaled.raw_balance(o)
        };
        let max_out = Amount::new(fixed_point::mul_down(available.get(), MAX_OUT_RATIO)?);
        match swap_type {
            SwapType::ExactOut => Ok(max_out),
            SwapType::ExactIn if max_out.is_zero() => Ok(Amount::ZERO),
            SwapType::ExactIn => self.in_given_exact_out(token_in, token_out, max_out),
        }
    }

    /// The curve is flat, so the output-side balance stands in.
    fn normalized_liquidity(&self, token_in: TokenAddress, token_out: TokenAddress) -> Result<U256, AmmError> {
        let (_, o, _) = self.leg(token_in, token_out)?;
        Ok(if o == self.bpt { self.supply } else { self.scaled.balance(o) })
    }
}
