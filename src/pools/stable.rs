//! Stable and MetaStable pools.
//!
//! Both use the stable-swap invariant of [`stable_math`](super::stable_math);
//! a MetaStable pool additionally folds each token's price rate into its
//! scaling factor.  Trades may not drain more than 99% of the output
//! balance.

use alloy_primitives::U256;

use super::common::{ScaledBalances, MAX_OUT_RATIO};
use super::stable_math;
use crate::config::{SolverConfig, StableConfig};
use crate::domain::{Amount, PoolId, PoolType, Rounding, SwapFee, SwapType, Token, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point;
use crate::traits::{FromConfig, SwapPool};

/// A stable-swap pool of two to five tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StablePool {
    id: PoolId,
    meta: bool,
    scaled: ScaledBalances,
    amplification: U256,
    invariant: U256,
    swap_fee: SwapFee,
    solver: SolverConfig,
}

impl StablePool {
    /// Amplification parameter, `A * AMP_PRECISION`.
    #[must_use]
    pub const fn amplification(&self) -> U256 {
        self.amplification
    }

    /// Invariant `D` of the current balances.
    #[must_use]
    pub const fn invariant(&self) -> U256 {
        self.invariant
    }

    fn after_swap(&self, i: usize, o: usize, amount: Amount, swap_type: SwapType) -> Result<Vec<U256>, AmmError> {
        let scaled = match swap_type {
            SwapType::ExactIn => {
                let net = self.swap_fee.subtract_from(amount.get())?;
                self.scaled.upscale(i, Amount::new(net))?
            }
            SwapType::ExactOut => self.scaled.upscale(o, amount)?,
        };
        stable_math::balances_after_swap(
            self.amplification,
            self.scaled.balances(),
            i,
            o,
            scaled,
            swap_type,
            self.invariant,
            &self.solver,
        )
    }
}

impl FromConfig<StableConfig> for StablePool {
    /// # Errors
    ///
    /// - Propagates [`StableConfig::validate`] errors.
    /// - [`AmmError::ZeroReserve`] if any balance is zero.
    /// - [`AmmError::NewtonRaphsonNonConvergence`] if the invariant does not
    ///   converge.
    fn from_config(config: &StableConfig, solver: &SolverConfig) -> Result<Self, AmmError> {
        config.validate()?;
        solver.validate()?;
        let scaled = ScaledBalances::new(config.tokens(), config.is_meta())?;
        if scaled.has_zero_balance() {
            return Err(AmmError::ZeroReserve);
        }
        let invariant = stable_math::calculate_invariant(config.amplification(), scaled.balances(), solver)?;
        Ok(Self {
            id: config.id().clone(),
            meta: config.is_meta(),
            scaled,
            amplification: config.amplification(),
            invariant,
            swap_fee: config.swap_fee(),
            solver: *solver,
        })
    }
}

impl SwapPool for StablePool {
    fn id(&self) -> &PoolId {
        &self.id
    }

    fn pool_type(&self) -> PoolType {
        if self.meta {
            PoolType::MetaStable
        } else {
            PoolType::Stable
        }
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
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        if amount_in.is_zero() {
            return Ok(Amount::ZERO);
        }
        let net = self.swap_fee.subtract_from(amount_in.get())?;
        let scaled_in = self.scaled.upscale(i, Amount::new(net))?;
        let out = stable_math::out_given_in(
            self.amplification,
            self.scaled.balances(),
            i,
            o,
            scaled_in,
            self.invariant,
            &self.solver,
        )?;
        self.scaled.downscale(o, out, Rounding::Down)
    }

    fn in_given_exact_out(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_out: Amount,
    ) -> Result<Amount, AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        if amount_out.is_zero() {
            return Ok(Amount::ZERO);
        }
        let scaled_out = self.scaled.upscale(o, amount_out)?;
        let scaled_in = stable_math::in_given_out(
            self.amplification,
            self.scaled.balances(),
            i,
            o,
            scaled_out,
            self.invariant,
            &self.solver,
        )?;
        let raw_in = self.scaled.downscale(i, scaled_in, Rounding::Up)?;
        self.swap_fee.add_to(raw_in.get()).map(Amount::new)
    }

    fn spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        let balances = self.after_swap(i, o, amount, swap_type)?;
        let price = stable_math::spot_price(self.amplification, &balances, self.invariant, i, o)?;
        let with_fee = fixed_point::div_down(price, self.swap_fee.complement())?;
        self.scaled.price_to_human(with_fee, i, o)
    }

    /// Exact-in: `dp/du`.  Exact-out: `p · dp/du / (1 - f)`, where `u` is
    /// the input balance moving along the curve.
    fn derivative_spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        let balances = self.after_swap(i, o, amount, swap_type)?;
        let slope = stable_math::spot_price_derivative(self.amplification, &balances, self.invariant, i, o)?;
        let derivative = match swap_type {
            SwapType::ExactIn => slope,
            SwapType::ExactOut => {
                let price = stable_math::spot_price(self.amplification, &balances, self.invariant, i, o)?;
                fixed_point::div_down(fixed_point::mul_down(price, slope)?, self.swap_fee.complement())?
            }
        };
        self.scaled.derivative_to_human(derivative, i, o, swap_type)
    }

    /// Exact-out: 99% of the output balance.  Exact-in: the input that
    /// buys that much.
    fn limit_amount(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        swap_type: SwapType,
    ) -> Result<Amount, AmmError> {
        let (_, o) = self.scaled.indices(token_in, token_out)?;
        let max_out = Amount::new(fixed_point::mul_down(self.scaled.raw_balance(o).get(), MAX_OUT_RATIO)?);
        match swap_type {
            SwapType::ExactOut => Ok(max_out),
            SwapType::ExactIn => self.in_given_exact_out(token_in, token_out, max_out),
        }
    }
}
