//! Elliptic concentrated liquidity (E-CLP) curve math.
//!
//! The curve is an ellipse obtained from a circle of radius `r` by the
//! linear map `A⁻¹`, shifted by the virtual offsets `(a, b)`:
//!
//! ```text
//! ‖A · (t - (a, b))‖ = r          A = [[c/λ, -s/λ], [s, c]]
//! ```
//!
//! `(c, s)` is the rotation (the peg direction) and `λ ≥ 1` the
//! stretching.  The trading arc is the part of the ellipse where the
//! price of token 0 in token 1 lies in `[α, β]`.  `τ(p)` is the unit
//! circle point whose image has price `p`, and the offsets are
//! `a = r · (A⁻¹τ(β))ₓ`, `b = r · (A⁻¹τ(α))ᵧ`.
//!
//! Derived parameters (`τ`, `χ`, `AᵀA`) are kept at 38 decimals; balances,
//! the invariant and prices are 18-decimal values.

use alloy_primitives::{I256, U256};

use crate::config::GyroEParams;
use crate::domain::Rounding;
use crate::error::AmmError;
use crate::math::signed_fixed_point::{self as sfp, ONE, ONE_XP};

type Vector = [I256; 2];

fn xp(value: U256) -> Result<I256, AmmError> {
    sfp::np_to_xp(sfp::to_signed(value)?)
}

fn np_times_xp(np: I256, xp: I256) -> Result<I256, AmmError> {
    sfp::mul_xp_to_np(np, xp, Rounding::Down)
}

fn np_over_xp(np: I256, xp: I256) -> Result<I256, AmmError> {
    sfp::div_np_by_xp(np, xp, Rounding::Down)
}

/// Curve constants derived once per pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DerivedParams {
    c: I256,
    s: I256,
    lambda: I256,
    tau_alpha: Vector,
    tau_beta: Vector,
    /// `((A⁻¹τ(β))ₓ, (A⁻¹τ(α))ᵧ)`
    chi: Vector,
    /// `‖Aχ‖² - 1`
    q: I256,
    h_xx: I256,
    h_xy: I256,
    h_yy: I256,
}

impl DerivedParams {
    /// Derives the 38-decimal constants.
    ///
    /// # Errors
    ///
    /// [`AmmError::DegenerateParameters`] when the parameters do not span
    /// a trading arc (`‖Aχ‖ ≤ 1`).
    pub(crate) fn new(params: &GyroEParams) -> Result<Self, AmmError> {
        let c = xp(params.c)?;
        let s = xp(params.s)?;
        let lambda = xp(params.lambda)?;
        let mut derived = Self {
            c,
            s,
            lambda,
            tau_alpha: [I256::ZERO; 2],
            tau_beta: [I256::ZERO; 2],
            chi: [I256::ZERO; 2],
            q: I256::ZERO,
            h_xx: I256::ZERO,
            h_xy: I256::ZERO,
            h_yy: I256::ZERO,
        };
        derived.tau_alpha = derived.tau(xp(params.alpha)?)?;
        derived.tau_beta = derived.tau(xp(params.beta)?)?;
        let [chi_x, _] = derived.a_inverse(derived.tau_beta)?;
        let [_, chi_y] = derived.a_inverse(derived.tau_alpha)?;
        derived.chi = [chi_x, chi_y];

        let [u, v] = derived.a_times(derived.chi)?;
        derived.q = sfp::sub(sfp::add(sfp::mul_xp(u, u)?, sfp::mul_xp(v, v)?)?, ONE_XP)?;
        if !derived.q.is_positive() {
            return Err(AmmError::DegenerateParameters("E-CLP parameters span no trading arc"));
        }

        let lambda_sq = sfp::mul_xp(lambda, lambda)?;
        let c2 = sfp::mul_xp(c, c)?;
        let s2 = sfp::mul_xp(s, s)?;
        let cs = sfp::mul_xp(c, s)?;
        derived.h_xx = sfp::add(sfp::div_xp(c2, lambda_sq)?, s2)?;
        derived.h_yy = sfp::add(sfp::div_xp(s2, lambda_sq)?, c2)?;
        derived.h_xy = sfp::mul_xp(cs, sfp::sub(ONE_XP, sfp::div_xp(ONE_XP, lambda_sq)?)?)?;
        Ok(derived)
    }

    /// `A · v`
    fn a_times(&self, [x, y]: Vector) -> Result<Vector, AmmError> {
        let first = sfp::sub(sfp::mul_xp(self.c, x)?, sfp::mul_xp(self.s, y)?)?;
        Ok([
            sfp::div_xp(first, self.lambda)?,
            sfp::add(sfp::mul_xp(self.s, x)?, sfp::mul_xp(self.c, y)?)?,
        ])
    }

    /// `A⁻¹ · v = [[λc, s], [-λs, c]] · v`
    fn a_inverse(&self, [x, y]: Vector) -> Result<Vector, AmmError> {
        let lc = sfp::mul_xp(self.lambda, self.c)?;
        let ls = sfp::mul_xp(self.lambda, self.s)?;
        Ok([
            sfp::add(sfp::mul_xp(lc, x)?, sfp::mul_xp(self.s, y)?)?,
            sfp::add(-sfp::mul_xp(ls, x)?, sfp::mul_xp(self.c, y)?)?,
        ])
    }

    /// Unit vector along `A⁻ᵀ (p, 1) = (λ(cp - s), sp + c)`.
    fn tau(&self, price: I256) -> Result<Vector, AmmError> {
        let x = sfp::mul_xp(self.lambda, sfp::sub(sfp::mul_xp(self.c, price)?, self.s)?)?;
        let y = sfp::add(sfp::mul_xp(self.s, price)?, self.c)?;
        let norm_sq = sfp::add(sfp::mul_xp(x, x)?, sfp::mul_xp(y, y)?)?;
        let norm = sfp::sqrt(norm_sq, ONE_XP)?;
        Ok([sfp::div_xp(x, norm)?, sfp::div_xp(y, norm)?])
    }

    /// Invariant `r` of balances `(x, y)`:
    /// `r = (⟨At, Aχ⟩ + √(⟨At, Aχ⟩² - q‖At‖²)) / q`.
    pub(crate) fn invariant(&self, x: U256, y: U256) -> Result<I256, AmmError> {
        let x = sfp::to_signed(x)?;
        let y = sfp::to_signed(y)?;
        let at = [
            np_over_xp(sfp::sub(np_times_xp(x, self.c)?, np_times_xp(y, self.s)?)?, self.lambda)?,
            sfp::add(np_times_xp(x, self.s)?, np_times_xp(y, self.c)?)?,
        ];
        let [u, v] = self.a_times(self.chi)?;
        let projection = sfp::add(np_times_xp(at[0], u)?, np_times_xp(at[1], v)?)?;
        let norm_sq = sfp::add(sfp::mul_down_mag(at[0], at[0])?, sfp::mul_down_mag(at[1], at[1])?)?;
        let discriminant = sfp::sub(sfp::mul_down_mag(projection, projection)?, np_times_xp(norm_sq, self.q)?)?;
        let root = sfp::sqrt(discriminant.max(I256::ZERO), ONE)?;
        np_over_xp(sfp::add(projection, root)?, self.q)
    }

    /// Virtual offsets `(a, b)` for invariant `r`.
    pub(crate) fn offsets(&self, r: I256) -> Result<Vector, AmmError> {
        Ok([np_times_xp(r, self.chi[0])?, np_times_xp(r, self.chi[1])?])
    }

    /// Largest balances on the arc: `x` at price α and `y` at price β.
    pub(crate) fn max_balances(&self, r: I256) -> Result<Vector, AmmError> {
        let [alpha_x, _] = self.a_inverse(self.tau_alpha)?;
        let [_, beta_y] = self.a_inverse(self.tau_beta)?;
        Ok([
            np_times_xp(r, sfp::sub(self.chi[0], alpha_x)?)?,
            np_times_xp(r, sfp::sub(self.chi[1], beta_y)?)?,
        ])
    }

    /// Solves the quadratic for one coordinate given the other, picking
    /// the root on the trading arc.
    fn solve(&self, other_delta: I256, r: I256, own: I256, cross: I256, other: I256) -> Result<I256, AmmError> {
        let half_b = np_times_xp(other_delta, cross)?;
        let c_term = sfp::sub(
            np_times_xp(sfp::mul_down_mag(other_delta, other_delta)?, other)?,
            sfp::mul_down_mag(r, r)?,
        )?;
        let discriminant = sfp::sub(sfp::mul_down_mag(half_b, half_b)?, np_times_xp(c_term, own)?)?;
        if discriminant.is_negative() {
            return Err(AmmError::AssetBoundsExceeded);
        }
        let root = sfp::sqrt(discriminant, ONE)?;
        np_over_xp(sfp::sub(-half_b, root)?, own)
    }

    /// Balance of token 1 on the curve for a token-0 balance `x`.
    pub(crate) fn y_given_x(&self, x: I256, r: I256) -> Result<I256, AmmError> {
        let [a, b] = self.offsets(r)?;
        let dy = self.solve(sfp::sub(x, a)?, r, self.h_yy, self.h_xy, self.h_xx)?;
        sfp::add(b, dy)
    }

    /// Balance of token 0 on the curve for a token-1 balance `y`.
    pub(crate) fn x_given_y(&self, y: I256, r: I256) -> Result<I256, AmmError> {
        let [a, b] = self.offsets(r)?;
        let dx = self.solve(sfp::sub(y, b)?, r, self.h_xx, self.h_xy, self.h_yy)?;
        sfp::add(a, dx)
    }

    /// Curve gradient direction `AᵀA (t - (a, b))`; both components are
    /// negative on the trading arc.
    fn gradient(&self, t: Vector, r: I256) -> Result<Vector, AmmError> {
        let [a, b] = self.offsets(r)?;
        let dx = sfp::sub(t[0], a)?;
        let dy = sfp::sub(t[1], b)?;
        Ok([
            sfp::add(np_times_xp(dx, self.h_xx)?, np_times_xp(dy, self.h_xy)?)?,
            sfp::add(np_times_xp(dx, self.h_xy)?, np_times_xp(dy, self.h_yy)?)?,
        ])
    }

    /// Price of token 0 in token 1 at `t`, and the magnitude of its
    /// derivative with respect to the token-0 balance.
    ///
    /// With `g` the gradient, `p = gₓ / gᵧ` and
    /// `|dp/dx| = (Hₓₓ gᵧ² - 2Hₓᵧ gₓ gᵧ + Hᵧᵧ gₓ²) / |gᵧ|³`.
    pub(crate) fn price_and_slope(&self, t: Vector, r: I256) -> Result<(U256, U256), AmmError> {
        let [gx, gy] = self.gradient(t, r)?;
        if gy.is_zero() {
            return Err(AmmError::AssetBoundsExceeded);
        }
        let price = sfp::div_down_mag(gx, gy)?;
        let gy_sq = sfp::mul_down_mag(gy, gy)?;
        let gx_sq = sfp::mul_down_mag(gx, gx)?;
        let cross = sfp::mul_down_mag(gx, gy)?;
        let quadratic = sfp::add(
            sfp::sub(np_times_xp(gy_sq, self.h_xx)?, np_times_xp(sfp::add(cross, cross)?, self.h_xy)?)?,
            np_times_xp(gx_sq, self.h_yy)?,
        )?;
        let gy_cube = sfp::mul_down_mag(gy_sq, gy)?.abs();
        let slope = sfp::div_down_mag(quadratic, gy_cube)?;
        Ok((sfp::to_unsigned(price.max(I256::ZERO))?, sfp::to_unsigned(slope.max(I256::ZERO))?))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::math::fixed_point;

    fn units(n: u64) -> U256 {
        U256::from(n) * fixed_point::ONE
    }

    // Circle (λ = 1, no rotation) on [0.9, 1/0.9].
    fn circle() -> GyroEParams {
        GyroEParams {
            alpha: U256::from(900_000_000_000_000_000u128),
            beta: U256::from(1_111_111_111_111_111_111u128),
            c: fixed_point::ONE,
            s: U256::ZERO,
            lambda: fixed_point::ONE,
        }
    }

    #[test]
    fn symmetric_circle_prices_at_one() {
        let Ok(d) = DerivedParams::new(&circle()) else {
            panic!("expected Ok");
        };
        let Ok(r) = d.invariant(units(1_000), units(1_000)) else {
            panic!("expected Ok");
        };
        let t = [sfp::to_signed(units(1_000)).unwrap_or_default(); 2];
        let Ok((price, slope)) = d.price_and_slope(t, r) else {
            panic!("expected Ok");
        };
        assert!(price.abs_diff(fixed_point::ONE) < U256::from(1_000_000u64));
        assert!(!slope.is_zero());
    }

    #[test]
    fn balances_lie_on_curve() {
        let Ok(d) = DerivedParams::new(&circle()) else {
            panic!("expected Ok");
        };
        let Ok(r) = d.invariant(units(700), units(1_300)) else {
            panic!("expected Ok");
        };
        let x = sfp::to_signed(units(700)).unwrap_or_default();
        let Ok(y) = d.y_given_x(x, r) else {
            panic!("expected Ok");
        };
        let expected = sfp::to_signed(units(1_300)).unwrap_or_default();
        assert!((y - expected).abs() < I256::from_raw(units(1) / U256::from(1_000_000u64)));
    }

    #[test]
    fn inverted_range_is_degenerate() {
        let mut params = circle();
        std::mem::swap(&mut params.alpha, &mut params.beta);
        assert!(matches!(
            DerivedParams::new(&params),
            Err(AmmError::DegenerateParameters(_))
        ));
    }
}
