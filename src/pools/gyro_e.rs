//! Gyroscope E-CLP pool: two tokens on an elliptic concentrated curve
//! (see [`gyro_e_math`](super::gyro_e_math)).
//!
//! Balances carry token rates.  A trade that would push a balance past the
//! end of the trading arc fails with [`AmmError::AssetBoundsExceeded`].

use alloy_primitives::{I256, U256};
use tracing::trace;

use super::common::{ScaledBalances, MAX_OUT_RATIO};
use super::gyro_e_math::DerivedParams;
use crate::config::{GyroEConfig, GyroEParams, SolverConfig};
use crate::domain::{Amount, PoolId, PoolType, Rounding, SwapFee, SwapType, Token, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point;
use crate::math::signed_fixed_point as sfp;
use crate::traits::{FromConfig, SwapPool};

/// A Gyroscope elliptic concentrated liquidity pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GyroEPool {
    id: PoolId,
    scaled: ScaledBalances,
    params: GyroEParams,
    derived: DerivedParams,
    invariant: I256,
    max_balances: [I256; 2],
    swap_fee: SwapFee,
}

/// Balances before and after a trade, indexed like the pool tokens.
struct Move {
    before: [I256; 2],
    after: [I256; 2],
}

impl GyroEPool {
    /// Curve parameters.
    #[must_use]
    pub const fn params(&self) -> &GyroEParams {
        &self.params
    }

    /// Invariant `r`.
    #[must_use]
    pub fn invariant(&self) -> U256 {
        self.invariant.into_raw()
    }

    fn signed_balance(&self, index: usize) -> Result<I256, AmmError> {
        sfp::to_signed(self.scaled.balance(index))
    }

    fn max_balance(&self, index: usize) -> I256 {
        self.max_balances.get(index).copied().unwrap_or_default()
    }

    fn solve_for(&self, index: usize, other: I256) -> Result<I256, AmmError> {
        let value = if index == 0 {
            self.derived.x_given_y(other, self.invariant)?
        } else {
            self.derived.y_given_x(other, self.invariant)?
        };
        Ok(value.max(I256::ZERO))
    }

    /// Moves along the curve by `amount` (scaled; net of fee for exact-in).
    fn trade(&self, i: usize, o: usize, amount: U256, swap_type: SwapType) -> Result<Move, AmmError> {
        let before = [self.signed_balance(0)?, self.signed_balance(1)?];
        let mut after = before;
        if amount.is_zero() {
            return Ok(Move { before, after });
        }
        let amount = sfp::to_signed(amount)?;
        let balance_in = before.get(i).copied().unwrap_or_default();
        let balance_out = before.get(o).copied().unwrap_or_default();
        let (new_in, new_out) = match swap_type {
            SwapType::ExactIn => {
                let new_in = sfp::add(balance_in, amount)?;
                if new_in > self.max_balance(i) {
                    return Err(AmmError::AssetBoundsExceeded);
                }
                (new_in, self.solve_for(o, new_in)?)
            }
            SwapType::ExactOut => {
                if amount >= balance_out {
                    return Err(AmmError::AssetBoundsExceeded);
                }
                let new_out = sfp::sub(balance_out, amount)?;
                (self.solve_for(i, new_out)?, new_out)
            }
        };
        if let Some(slot) = after.get_mut(i) {
            *slot = new_in;
        }
        if let Some(slot) = after.get_mut(o) {
            *slot = new_out;
        }
        Ok(Move { before, after })
    }

    fn scaled_amount(&self, i: usize, o: usize, amount: Amount, swap_type: SwapType) -> Result<U256, AmmError> {
        match swap_type {
            SwapType::ExactIn => {
                let net = self.swap_fee.subtract_from(amount.get())?;
                self.scaled.upscale(i, Amount::new(net))
            }
            SwapType::ExactOut => self.scaled.upscale(o, amount),
        }
    }

    /// Price of the output token in input units (no fee) at `point`, and
    /// its derivative with respect to the input balance.
    fn marginal(&self, i: usize, point: [I256; 2]) -> Result<(U256, U256), AmmError> {
        let (price_x, slope) = self.derived.price_and_slope(point, self.invariant)?;
        if i == 0 {
            // In x, out y: pin = 1/p, d pin/dx = |dp/dx| / p².
            let pin = fixed_point::div_down(fixed_point::ONE, price_x)?;
            let d = fixed_point::div_down(slope, fixed_point::mul_down(price_x, price_x)?)?;
            Ok((pin, d))
        } else {
            // In y, out x: pin = p, d pin/dy = |dp/dx| / p.
            Ok((price_x, fixed_point::div_down(slope, price_x)?))
        }
    }
}

impl FromConfig<GyroEConfig> for GyroEPool {
    /// # Errors
    ///
    /// - Propagates [`GyroEConfig::validate`] errors.
    /// - [`AmmError::ZeroReserve`] if a balance is zero.
    /// - [`AmmError::DegenerateParameters`] if the derived curve is empty.
    fn from_config(config: &GyroEConfig, _solver: &SolverConfig) -> Result<Self, AmmError> {
        config.validate()?;
        let scaled = ScaledBalances::new(config.tokens(), true)?;
        if scaled.has_zero_balance() {
            return Err(AmmError::ZeroReserve);
        }
        let derived = DerivedParams::new(config.params())?;
        let invariant = derived.invariant(scaled.balance(0), scaled.balance(1))?;
        if !invariant.is_positive() {
            return Err(AmmError::DegenerateParameters("E-CLP invariant is not positive"));
        }
        let max_balances = derived.max_balances(invariant)?;
        trace!(pool = %config.id(), invariant = %invariant, "E-CLP invariant");
        Ok(Self {
            id: config.id().clone(),
            scaled,
            params: *config.params(),
            derived,
            invariant,
            max_balances,
            swap_fee: config.swap_fee(),
        })
    }
}

impl SwapPool for GyroEPool {
    fn id(&self) -> &PoolId {
        &self.id
    }

    fn pool_type(&self) -> PoolType {
        PoolType::GyroE
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
        let scaled = self.scaled_amount(i, o, amount_in, SwapType::ExactIn)?;
        let m = self.trade(i, o, scaled, SwapType::ExactIn)?;
        let out = sfp::sub(
            m.before.get(o).copied().unwrap_or_default(),
            m.after.get(o).copied().unwrap_or_default(),
        )?;
        // One wei stays with the pool against solver rounding.
        let out = sfp::to_unsigned(out.max(I256::ZERO))?.saturating_sub(U256::from(1u64));
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
        let scaled = self.scaled_amount(i, o, amount_out, SwapType::ExactOut)?;
        let m = self.trade(i, o, scaled, SwapType::ExactOut)?;
        let needed = sfp::sub(
            m.after.get(i).copied().unwrap_or_default(),
            m.before.get(i).copied().unwrap_or_default(),
        )?;
        let needed = fixed_point::add(sfp::to_unsigned(needed.max(I256::ZERO))?, U256::from(1u64))?;
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
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        let scaled = self.scaled_amount(i, o, amount, swap_type)?;
        let m = self.trade(i, o, scaled, swap_type)?;
        let (pin, _) = self.marginal(i, m.after)?;
        let with_fee = fixed_point::div_down(pin, self.swap_fee.complement())?;
        self.scaled.price_to_human(with_fee, i, o)
    }

    /// Exact-in: `d pin / d b_in`.  Exact-out: that slope times
    /// `pin / (1 - f)`, the input moved per unit of output.
    fn derivative_spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        let scaled = self.scaled_amount(i, o, amount, swap_type)?;
        let m = self.trade(i, o, scaled, swap_type)?;
        let (pin, slope) = self.marginal(i, m.after)?;
        let derivative = match swap_type {
            SwapType::ExactIn => slope,
            SwapType::ExactOut => {
                fixed_point::div_down(fixed_point::mul_down(slope, pin)?, self.swap_fee.complement())?
            }
        };
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

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::PoolTokens;
    use crate::math::fixed_point::ONE;
    use crate::test_support::{addr, token};

    fn e18(units: u64) -> U256 {
        U256::from(units) * ONE
    }

    // Stablecoin peg: 45° rotation, λ = 100, range [0.98, 1/0.98].
    fn params() -> GyroEParams {
        GyroEParams {
            alpha: U256::from(980_000_000_000_000_000u128),
            beta: U256::from(1_020_408_163_265_306_122u128),
            c: U256::from(707_106_781_186_547_524u128),
            s: U256::from(707_106_781_186_547_524u128),
            lambda: e18(100),
        }
    }

    fn pool() -> GyroEPool {
        let Ok(tokens) =
            PoolTokens::with_unit_rates(vec![token(1, 18), token(2, 18)], vec![Amount::new(e18(1_000)); 2])
        else {
            panic!("valid tokens");
        };
        let Ok(fee) = SwapFee::from_decimal_str("0.0002") else {
            panic!("valid fee");
        };
        let Ok(cfg) = GyroEConfig::new(PoolId::new("0xgyroe"), tokens, params(), fee) else {
            panic!("valid config");
        };
        let Ok(pool) = GyroEPool::from_config(&cfg, &SolverConfig::default()) else {
            panic!("valid pool");
        };
        pool
    }

    // -- quotes ----------------------------------------------------------------

    #[test]
    fn near_peg_trade_has_little_slippage() {
        let p = pool();
        let Ok(out) = p.out_given_exact_in(addr(1), addr(2), Amount::new(e18(10))) else {
            panic!("expected Ok");
        };
        assert!(out.get() > e18(9) + e18(9) / U256::from(10u64));
        assert!(out.get() < e18(10));
    }

    #[test]
    fn exact_out_covers_request() {
        let p = pool();
        let want = Amount::new(e18(50));
        let Ok(needed) = p.in_given_exact_out(addr(2), addr(1), want) else {
            panic!("expected Ok");
        };
        let Ok(got) = p.out_given_exact_in(addr(2), addr(1), needed) else {
            panic!("expected Ok");
        };
        // Both directions solve against the invariant's error interval,
        // so the round trip may land a few wei either side of the request.
        assert!(got.get().abs_diff(want.get()) <= U256::from(1_000u64), "got {got} for {want}");
    }

    #[test]
    fn arc_end_is_out_of_bounds() {
        let p = pool();
        assert_eq!(
            p.in_given_exact_out(addr(1), addr(2), Amount::new(e18(1_000))),
            Err(AmmError::AssetBoundsExceeded)
        );
        assert_eq!(
            p.out_given_exact_in(addr(1), addr(2), Amount::new(e18(1_000_000))),
            Err(AmmError::AssetBoundsExceeded)
        );
    }

    // -- prices ----------------------------------------------------------------

    #[test]
    fn balanced_price_is_peg_plus_fee() {
        let p = pool();
        let Ok(sp) = p.spot_price(addr(1), addr(2)) else {
            panic!("expected Ok");
        };
        let expected = U256::from(1_000_200_040_008_001_600u128);
        assert!(sp.abs_diff(expected) < e18(1) / U256::from(1_000_000u64));
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let p = pool();
        let a = Amount::new(e18(100));
        let b = Amount::new(e18(100) + ONE / U256::from(100u64));
        let (Ok(pa), Ok(pb)) = (
            p.spot_price_after_swap(addr(1), addr(2), a, SwapType::ExactIn),
            p.spot_price_after_swap(addr(1), addr(2), b, SwapType::ExactIn),
        ) else {
            panic!("expected Ok");
        };
        let Ok(d) = p.derivative_spot_price_after_swap(addr(1), addr(2), a, SwapType::ExactIn) else {
            panic!("expected Ok");
        };
        let fd = (pb - pa) * U256::from(100u64);
        assert!(fd.abs_diff(d) * U256::from(20u64) < d);
    }
}
