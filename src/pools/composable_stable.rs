//! ComposableStable and PhantomStable pools.
//!
//! A stable-swap pool that lists its own pool share (BPT) among its tokens.
//! Token-to-token legs trade on the stable invariant; legs that buy or sell
//! the BPT are single-token joins and exits against the virtual supply,
//! with the swap fee charged on the non-proportional part.
//!
//! BPT legs report marginal prices as a secant over a small step and have
//! no derivative ([`AmmError::Unsupported`]).

use alloy_primitives::U256;

use super::common::{ScaledBalances, MAX_OUT_RATIO};
use super::stable_math;
use crate::config::{ComposableStableConfig, SolverConfig};
use crate::domain::{Amount, PoolId, PoolType, Rounding, SwapFee, SwapType, Token, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point;
use crate::traits::{FromConfig, SwapPool};

/// Secant step as a fraction of the reference balance.
const SECANT_DIVISOR: u64 = 1_000_000;

/// Shape of a trade through the pool.  Indices point into the reduced
/// (BPT-free) balance vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Swap { ri: usize, ro: usize },
    Join { ri: usize },
    Exit { ro: usize },
}

/// A stable pool whose token list includes its own BPT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposableStablePool {
    id: PoolId,
    pool_type: PoolType,
    scaled: ScaledBalances,
    bpt_index: usize,
    // Full-list index of each reduced slot.
    members: Vec<usize>,
    reduced: Vec<U256>,
    amplification: U256,
    invariant: U256,
    supply: U256,
    swap_fee: SwapFee,
    solver: SolverConfig,
}

impl ComposableStablePool {
    /// Invariant of the non-BPT balances.
    #[must_use]
    pub const fn invariant(&self) -> U256 {
        self.invariant
    }

    /// Upscaled virtual supply of the pool share.
    #[must_use]
    pub const fn virtual_supply(&self) -> U256 {
        self.supply
    }

    fn reduced_index(&self, full: usize) -> Option<usize> {
        self.members.iter().position(|m| *m == full)
    }

    fn leg(&self, token_in: TokenAddress, token_out: TokenAddress) -> Result<(usize, usize, Leg), AmmError> {
        let (i, o) = self.scaled.indices(token_in, token_out)?;
        let leg = if i == self.bpt_index {
            Leg::Exit {
                ro: self.reduced_index(o).ok_or(AmmError::InvalidToken("token_out"))?,
            }
        } else if o == self.bpt_index {
            Leg::Join {
                ri: self.reduced_index(i).ok_or(AmmError::InvalidToken("token_in"))?,
            }
        } else {
            Leg::Swap {
                ri: self.reduced_index(i).ok_or(AmmError::InvalidToken("token_in"))?,
                ro: self.reduced_index(o).ok_or(AmmError::InvalidToken("token_out"))?,
            }
        };
        Ok((i, o, leg))
    }

    /// Scaled output for a scaled input; the swap fee is removed inside.
    fn scaled_out(&self, leg: Leg, amount_in: U256) -> Result<U256, AmmError> {
        if amount_in.is_zero() {
            return Ok(U256::ZERO);
        }
        let fee = self.swap_fee.get();
        match leg {
            Leg::Swap { ri, ro } => {
                let net = self.swap_fee.subtract_from(amount_in)?;
                stable_math::out_given_in(
                    self.amplification,
                    &self.reduced,
                    ri,
                    ro,
                    net,
                    self.invariant,
                    &self.solver,
                )
            }
            Leg::Join { ri } => stable_math::bpt_out_given_exact_token_in(
                self.amplification,
                &self.reduced,
                ri,
                amount_in,
                self.supply,
                self.invariant,
                fee,
                &self.solver,
            ),
            Leg::Exit { ro } => stable_math::token_out_given_exact_bpt_in(
                self.amplification,
                &self.reduced,
                ro,
                amount_in,
                self.supply,
                self.invariant,
                fee,
                &self.solver,
            ),
        }
    }

    /// Scaled input (fee included) for a scaled output.
    fn scaled_in(&self, leg: Leg, amount_out: U256) -> Result<U256, AmmError> {
        if amount_out.is_zero() {
            return Ok(U256::ZERO);
        }
        let fee = self.swap_fee.get();
        match leg {
            Leg::Swap { ri, ro } => {
                let net = stable_math::in_given_out(
                    self.amplification,
                    &self.reduced,
                    ri,
                    ro,
                    amount_out,
                    self.invariant,
                    &self.solver,
                )?;
                self.swap_fee.add_to(net)
            }
            Leg::Join { ri } => stable_math::token_in_given_exact_bpt_out(
                self.amplification,
                &self.reduced,
                ri,
                amount_out,
                self.supply,
                self.invariant,
                fee,
                &self.solver,
            ),
            Leg::Exit { ro } => stable_math::bpt_in_given_exact_token_out(
                self.amplification,
                &self.reduced,
                ro,
                amount_out,
                self.supply,
                self.invariant,
                fee,
                &self.solver,
            ),
        }
    }

    fn reference_balance(&self, full: usize) -> U256 {
        if full == self.bpt_index {
            self.supply
        } else {
            self.scaled.balance(full)
        }
    }

    /// Marginal price of a BPT leg as `Δin / Δout` over a small step.
    fn secant_price(&self, i: usize, o: usize, leg: Leg, amount: Amount, swap_type: SwapType) -> Result<U256, AmmError> {
        let fixed = if swap_type.is_exact_in() { i } else { o };
        let step = (self.reference_balance(fixed) / U256::from(SECANT_DIVISOR)).max(U256::from(1u64));
        let start = self.scaled.upscale(fixed, amount)?;
        let end = fixed_point::add(start, step)?;
        let price = match swap_type {
            SwapType::ExactIn => {
                let gained = fixed_point::sub(self.scaled_out(leg, end)?, self.scaled_out(leg, start)?)?;
                fixed_point::div_up(step, gained)?
            }
            SwapType::ExactOut => {
                let paid = fixed_point::sub(self.scaled_in(leg, end)?, self.scaled_in(leg, start)?)?;
                fixed_point::div_up(paid, step)?
            }
        };
        self.scaled.price_to_human(price, i, o)
    }

    fn balances_after(&self, ri: usize, ro: usize, i: usize, o: usize, amount: Amount, swap_type: SwapType) -> Result<Vec<U256>, AmmError> {
        let scaled = match swap_type {
            SwapType::ExactIn => {
                let net = self.swap_fee.subtract_from(amount.get())?;
                self.scaled.upscale(i, Amount::new(net))?
            }
            SwapType::ExactOut => self.scaled.upscale(o, amount)?,
        };
        stable_math::balances_after_swap(
            self.amplification,
            &self.reduced,
            ri,
            ro,
            scaled,
            swap_type,
            self.invariant,
            &self.solver,
        )
    }
}

impl FromConfig<ComposableStableConfig> for ComposableStablePool {
    /// # Errors
    ///
    /// - Propagates [`ComposableStableConfig::validate`] errors.
    /// - [`AmmError::ZeroReserve`] if a non-BPT balance is zero.
    /// - [`AmmError::NewtonRaphsonNonConvergence`] from the invariant.
    fn from_config(config: &ComposableStableConfig, solver: &SolverConfig) -> Result<Self, AmmError> {
        config.validate()?;
        solver.validate()?;
        let scaled = ScaledBalances::new(config.tokens(), true)?;
        let bpt_index = scaled
            .index_of(config.bpt_address())
            .ok_or(AmmError::InvalidConfiguration("pool share is not among the tokens"))?;
        let members: Vec<usize> = (0..scaled.len()).filter(|j| *j != bpt_index).collect();
        let reduced: Vec<U256> = members.iter().map(|j| scaled.balance(*j)).collect();
        if reduced.iter().any(U256::is_zero) {
            return Err(AmmError::ZeroReserve);
        }
        let invariant = stable_math::calculate_invariant(config.amplification(), &reduced, solver)?;
        let supply = scaled.upscale(bpt_index, config.virtual_supply())?;
        Ok(Self {
            id: config.id().clone(),
            pool_type: config.pool_type(),
            scaled,
            bpt_index,
            members,
            reduced,
            amplification: config.amplification(),
            invariant,
            supply,
            swap_fee: config.swap_fee(),
            solver: *solver,
        })
    }
}

impl SwapPool for ComposableStablePool {
    fn id(&self) -> &PoolId {
        &self.id
    }

    fn pool_type(&self) -> PoolType {
        self.pool_type
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
        let needed = self.scaled_in(leg, self.scaled.upscale(o, amount_out)?)?;
        self.scaled.downscale(i, needed, Rounding::Up)
    }

    fn spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let (i, o, leg) = self.leg(token_in, token_out)?;
        let Leg::Swap { ri, ro } = leg else {
            return self.secant_price(i, o, leg, amount, swap_type);
        };
        let balances = self.balances_after(ri, ro, i, o, amount, swap_type)?;
        let price = stable_math::spot_price(self.amplification, &balances, self.invariant, ri, ro)?;
        let with_fee = fixed_point::div_down(price, self.swap_fee.complement())?;
        self.scaled.price_to_human(with_fee, i, o)
    }

    fn derivative_spot_price_after_swap(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let (i, o, leg) = self.leg(token_in, token_out)?;
        let Leg::Swap { ri, ro } = leg else {
            return Err(AmmError::Unsupported("price derivative of a pool-share leg"));
        };
        let balances = self.balances_after(ri, ro, i, o, amount, swap_type)?;
        let slope = stable_math::spot_price_derivative(self.amplification, &balances, self.invariant, ri, ro)?;
        let derivative = match swap_type {
            SwapType::ExactIn => slope,
            SwapType::ExactOut => {
                let price = stable_math::spot_price(self.amplification, &balances, self.invariant, ri, ro)?;
                fixed_point::div_down(fixed_point::mul_down(price, slope)?, self.swap_fee.complement())?
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
        let (_, o, _) = self.leg(token_in, token_out)?;
        let available = if o == self.bpt_index {
            self.scaled.downscale(o, self.supply, Rounding::Down)?
        } else {
            self.scaled.raw_balance(o)
        };
        let max_out = Amount::new(fixed_point::mul_down(available.get(), MAX_OUT_RATIO)?);
        match swap_type {
            SwapType::ExactOut => Ok(max_out),
            SwapType::ExactIn => self.in_given_exact_out(token_in, token_out, max_out),
        }
    }

    /// Pool-share legs fall back to the output-side balance.
    fn normalized_liquidity(&self, token_in: TokenAddress, token_out: TokenAddress) -> Result<U256, AmmError> {
        let (_, o, leg) = self.leg(token_in, token_out)?;
        match leg {
            Leg::Swap { .. } => {
                let derivative =
                    self.derivative_spot_price_after_swap(token_in, token_out, Amount::ZERO, SwapType::ExactOut)?;
                if derivative.is_zero() {
                    return Ok(U256::MAX);
                }
                fixed_point::div_down(fixed_point::ONE, derivative)
            }
            Leg::Join { .. } | Leg::Exit { .. } => Ok(self.reference_balance(o)),
        }
    }
}
