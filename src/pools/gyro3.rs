//! Gyroscope 3-CLP: three tokens on a symmetric concentrated curve.
//!
//! ```text
//! (x + a)(y + a)(z + a) = L³        a = L · ∛α
//! ```
//!
//! `L` is the single positive root of the cubic
//! `(1 - α) L³ - S·∛α² L² - P·∛α L - x·y·z = 0` with `S = x + y + z` and
//! `P = xy + yz + zx`, found by a safeguarded Newton iteration.  Any pair
//! then trades on the virtual constant product of
//! [`gyro_math`](super::gyro_math) with the third balance held fixed.

use alloy_primitives::{I256, U256};
use tracing::trace;

use super::common::{ScaledBalances, MAX_OUT_RATIO};
use super::gyro_math::VirtualPair;
use crate::config::{Gyro3Config, SolverConfig};
use crate::domain::{Amount, PoolId, PoolType, Rounding, SwapFee, SwapType, Token, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point::{self, ONE};
use crate::math::signed_fixed_point as sfp;
use crate::traits::{FromConfig, SwapPool};

struct Cubic {
    a: I256,
    b: I256,
    c: I256,
    d: I256,
}

impl Cubic {
    fn new(balances: [U256; 3], root3_alpha: U256) -> Result<Self, AmmError> {
        let [x, y, z] = balances;
        let (x, y, z) = (sfp::to_signed(x)?, sfp::to_signed(y)?, sfp::to_signed(z)?);
        let r = sfp::to_signed(root3_alpha)?;
        let r2 = sfp::mul_down_mag(r, r)?;
        let alpha = sfp::mul_down_mag(r2, r)?;
        let sum = sfp::add(sfp::add(x, y)?, z)?;
        let pairs = sfp::add(
            sfp::add(sfp::mul_down_mag(x, y)?, sfp::mul_down_mag(y, z)?)?,
            sfp::mul_down_mag(z, x)?,
        )?;
        let product = sfp::mul_down_mag(sfp::mul_down_mag(x, y)?, z)?;
        Ok(Self {
            a: sfp::sub(sfp::ONE, alpha)?,
            b: -sfp::mul_down_mag(sum, r2)?,
            c: -sfp::mul_down_mag(pairs, r)?,
            d: -product,
        })
    }

    /// `((aL + b)L + c)L + d`
    fn value(&self, l: I256) -> Result<I256, AmmError> {
        let v = sfp::add(sfp::mul_down_mag(self.a, l)?, self.b)?;
        let v = sfp::add(sfp::mul_down_mag(v, l)?, self.c)?;
        sfp::add(sfp::mul_down_mag(v, l)?, self.d)
    }

    /// `(3aL + 2b)L + c`
    fn slope(&self, l: I256) -> Result<I256, AmmError> {
        let three_a = sfp::add(sfp::add(self.a, self.a)?, self.a)?;
        let v = sfp::add(sfp::mul_down_mag(three_a, l)?, sfp::add(self.b, self.b)?)?;
        sfp::add(sfp::mul_down_mag(v, l)?, self.c)
    }
}

/// Invariant `L` of three balances.
///
/// The root is bracketed in `[0, S / (3 (1 - ∛α))]` (AM-GM on the
/// curve); a Newton step that leaves the bracket is replaced by bisection.
///
/// # Errors
///
/// [`AmmError::NewtonRaphsonNonConvergence`] after `max_iterations`.
pub(crate) fn calculate_invariant(
    balances: [U256; 3],
    root3_alpha: U256,
    solver: &SolverConfig,
) -> Result<U256, AmmError> {
    let cubic = Cubic::new(balances, root3_alpha)?;
    let sum = balances
        .iter()
        .try_fold(U256::ZERO, |acc, v| fixed_point::add(acc, *v))?;
    let gap = fixed_point::mul_down(U256::from(3u64) * ONE, fixed_point::complement(root3_alpha))?;
    let upper = fixed_point::div_up(sum, gap)?;
    let mut lo = I256::ZERO;
    let mut hi = sfp::to_signed(upper)?;
    let mut l = hi;
    let tolerance = I256::from_raw(U256::from(solver.convergence_tolerance));

    for round in 0..solver.max_iterations {
        let f = cubic.value(l)?;
        if f.is_zero() {
            return sfp::to_unsigned(l);
        }
        if f.is_positive() {
            hi = l;
        } else {
            lo = l;
        }
        let slope = cubic.slope(l)?;
        let newton = if slope.is_positive() {
            sfp::sub(l, sfp::div_down_mag(f, slope)?)?
        } else {
            hi
        };
        let next = if newton > lo && newton < hi {
            newton
        } else {
            (lo + hi) / I256::from_raw(U256::from(2u64))
        };
        if (next - l).abs() <= tolerance || hi - lo <= tolerance {
            trace!(round, invariant = %next, "3-CLP invariant converged");
            return sfp::to_unsigned(next);
        }
        l = next;
    }
    Err(AmmError::NewtonRaphsonNonConvergence("3-CLP invariant"))
}

/// A Gyroscope three-token concentrated liquidity pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gyro3Pool {
    id: PoolId,
    scaled: ScaledBalances,
    root3_alpha: U256,
    invariant: U256,
    swap_fee: SwapFee,
}

impl Gyro3Pool {
    /// Invariant `L`.
    #[must_use]
    pub const fn invariant(&self) -> U256 {
        self.invariant
    }

    fn pair(&self, token_in: TokenAddress, token_out: TokenAddress) -> Result<(usize, usize, VirtualPair), AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        let offset = fixed_point::mul_down(self.invariant, self.root3_alpha)?;
        let pair = VirtualPair {
            balance_in: self.scaled.balance(i),
            balance_out: self.scaled.balance(o),
            offset_in: offset,
            offset_out: offset,
        };
        Ok((i, o, pair))
    }
}

impl FromConfig<Gyro3Config> for Gyro3Pool {
    /// # Errors
    ///
    /// - Propagates [`Gyro3Config::validate`] errors.
    /// - [`AmmError::ZeroReserve`] if a balance is zero.
    /// - [`AmmError::NewtonRaphsonNonConvergence`] from the invariant.
    fn from_config(config: &Gyro3Config, solver: &SolverConfig) -> Result<Self, AmmError> {
        config.validate()?;
        solver.validate()?;
        let scaled = ScaledBalances::new(config.tokens(), false)?;
        if scaled.has_zero_balance() {
            return Err(AmmError::ZeroReserve);
        }
        let balances = [scaled.balance(0), scaled.balance(1), scaled.balance(2)];
        let invariant = calculate_invariant(balances, config.root3_alpha(), solver)?;
        Ok(Self {
            id: config.id().clone(),
            scaled,
            root3_alpha: config.root3_alpha(),
            invariant,
            swap_fee: config.swap_fee(),
        })
    }
}

impl SwapPool for Gyro3Pool {
    fn id(&self) -> &PoolId {
        &self.id
    }

    fn pool_type(&self) -> PoolType {
        PoolType::Gyro3
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
