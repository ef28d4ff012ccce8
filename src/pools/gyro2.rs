//! Gyroscope 2-CLP: a constant-product curve on virtual reserves that
//! concentrates liquidity in the price range `[alpha, beta]`.
//!
//! ```text
//! (x + L/√β) · (y + L·√α) = L²
//! ```
//!
//! `L` is the positive root of
//! `(1 - √α/√β) L² - (x/√β + y·√α) L - x·y = 0`.

use alloy_primitives::U256;
use tracing::trace;

use super::common::{ScaledBalances, MAX_OUT_RATIO};
use super::gyro_math::VirtualPair;
use crate::config::{Gyro2Config, SolverConfig};
use crate::domain::{Amount, PoolId, PoolType, Rounding, SwapFee, SwapType, Token, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point::{self, FOUR, ONE, TWO};
use crate::traits::{FromConfig, SwapPool};

/// Invariant `L` of balances `x`, `y`.
pub(crate) fn calculate_invariant(x: U256, y: U256, sqrt_alpha: U256, sqrt_beta: U256) -> Result<U256, AmmError> {
    let a = fixed_point::sub(ONE, fixed_point::div_up(sqrt_alpha, sqrt_beta)?)?;
    if a.is_zero() {
        return Err(AmmError::DegenerateParameters("price range too narrow"));
    }
    let b = fixed_point::add(fixed_point::div_down(x, sqrt_beta)?, fixed_point::mul_down(y, sqrt_alpha)?)?;
    let four_ac = fixed_point::mul_down(fixed_point::mul_down(FOUR, a)?, fixed_point::mul_down(x, y)?)?;
    let discriminant = fixed_point::add(fixed_point::mul_down(b, b)?, four_ac)?;
    let root = fixed_point::sqrt(discriminant);
    fixed_point::div_down(fixed_point::add(b, root)?, fixed_point::mul_down(TWO, a)?)
}

/// A Gyroscope two-token concentrated liquidity pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gyro2Pool {
    id: PoolId,
    scaled: ScaledBalances,
    sqrt_alpha: U256,
    sqrt_beta: U256,
    invariant: U256,
    swap_fee: SwapFee,
}

impl Gyro2Pool {
    /// Invariant `L`.
    #[must_use]
    pub const fn invariant(&self) -> U256 {
        self.invariant
    }

    fn offset(&self, index: usize) -> Result<U256, AmmError> {
        if index == 0 {
            fixed_point::div_down(self.invariant, self.sqrt_beta)
        } else {
            fixed_point::mul_down(self.invariant, self.sqrt_alpha)
        }
    }

    fn pair(&self, token_in: TokenAddress, token_out: TokenAddress) -> Result<(usize, usize, VirtualPair), AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        let pair = VirtualPair {
            balance_in: self.scaled.balance(i),
            balance_out: self.scaled.balance(o),
            offset_in: self.offset(i)?,
            offset_out: self.offset(o)?,
        };
        Ok((i, o, pair))
    }
}

impl FromConfig<Gyro2Config> for Gyro2Pool {
    /// # Errors
    ///
    /// - Propagates [`Gyro2Config::validate`] errors.
    /// - [`AmmError::ZeroReserve`] if a balance is zero.
    fn from_config(config: &Gyro2Config, _solver: &SolverConfig) -> Result<Self, AmmError> {
        config.validate()?;
        let scaled = ScaledBalances::new(config.tokens(), false)?;
        if scaled.has_zero_balance() {
            return Err(AmmError::ZeroReserve);
        }
        let invariant = calculate_invariant(
            scaled.balance(0),
            scaled.balance(1),
            config.sqrt_alpha(),
            config.sqrt_beta(),
        )?;
        trace!(pool = %config.id(), %invariant, "2-CLP invariant");
        Ok(Self {
            id: config.id().clone(),
            scaled,
            sqrt_alpha: config.sqrt_alpha(),
            sqrt_beta: config.sqrt_beta(),
            invariant,
            swap_fee: config.swap_fee(),
        })
    }
}

impl SwapPool for Gyro2Pool {
    fn id(&self) -> &PoolId {
        &self.id
    }

    fn pool_type(&self) -> PoolType {
        PoolType::Gyro2
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
        let (i, o, pair) = self.pair(token_in, token_out)?;
        let net = self.swap_fee.subtract_from(amount_in.get())?;
        let out = pair.out_given_in(self.scaled.upscale(i, Amount::new(net))?)?;
        self.scaled.downscale(o, out, Rounding::Down)
    }

    fn in_given_exact_out(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_out: Amount,
    ) -> Result<Amount, AmmError> {
        let (i, o, pair) = self.pair(token_in, token_out)?;
        let needed = pair.in_given_out(self.scaled.upscale(o, amount_out)?)?;
        let raw = self.scaled.downscale(i, needed, Rounding::Up)?;
        self.swap_fee.add_to(raw.get()).map(Amount::new)
    }

    fn spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let (i, o, pair) = self.pair(token_in, token_out)?;
        let fixed = if swap_type.is_exact_in() { i } else { o };
        let price = pair.price_after(self.swap_fee, self.scaled.upscale(fixed, amount)?, swap_type)?;
        self.scaled.price_to_human(price, i, o)
    }

    fn derivative_spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let (i, o, pair) = self.pair(token_in, token_out)?;
        let fixed = if swap_type.is_exact_in() { i } else { o };
        let derivative = pair.derivative_after(self.swap_fee, self.scaled.upscale(fixed, amount)?, swap_type)?;
        self.scaled.derivative_to_human(derivative, i, o, swap_type)
    }

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
