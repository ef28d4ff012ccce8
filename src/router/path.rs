//! Candidate paths and the math of trading along them.

use alloy_primitives::U256;

use crate::domain::{Amount, HopAmount, PoolId, SwapType, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point::{self, ONE};
use crate::pools::{PoolBox, PoolSnapshot};
use crate::traits::SwapPool;

/// One pool traversal of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hop {
    /// Snapshot index of the pool.
    pub pool: usize,
    pub pool_id: PoolId,
    pub token_in: TokenAddress,
    pub token_out: TokenAddress,
}

/// An ordered sequence of hops from the request's input token to its
/// output token, with its capacity in the request's fixed unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    id: String,
    hops: Vec<Hop>,
    limit: Amount,
}

impl Path {
    /// Creates a path with an unset (zero) limit.
    #[must_use]
    pub fn new(hops: Vec<Hop>) -> Self {
        let id = hops.iter().map(|h| h.pool_id.as_str()).collect::<Vec<_>>().join("/");
        Self {
            id,
            hops,
            limit: Amount::ZERO,
        }
    }

    #[must_use]
    pub(crate) fn with_limit(mut self, limit: Amount) -> Self {
        self.limit = limit;
        self
    }

    /// Pool ids joined by `/`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    #[must_use]
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    /// Largest amount the path accepts (input for exact-in, output for
    /// exact-out).
    #[must_use]
    pub const fn limit(&self) -> Amount {
        self.limit
    }

    #[must_use]
    pub fn token_in(&self) -> Option<TokenAddress> {
        self.hops.first().map(|h| h.token_in)
    }

    #[must_use]
    pub fn token_out(&self) -> Option<TokenAddress> {
        self.hops.last().map(|h| h.token_out)
    }

    /// Snapshot indices of the pools traversed, in hop order.
    #[must_use]
    pub fn pool_sequence(&self) -> Vec<usize> {
        self.hops.iter().map(|h| h.pool).collect()
    }

    /// Whether any pool of `other` is also traversed by this path.
    #[must_use]
    pub fn shares_pool_with(&self, other: &Self) -> bool {
        self.hops.iter().any(|h| other.hops.iter().any(|o| o.pool == h.pool))
    }

    /// Whether two hops of the path use the same pool.
    #[must_use]
    pub fn repeats_pool(&self) -> bool {
        self.hops
            .iter()
            .enumerate()
            .any(|(i, h)| self.hops.iter().skip(i + 1).any(|o| o.pool == h.pool))
    }

    /// Amounts through every hop when `amount` is traded.  Exact-in chains
    /// forward from the first hop; exact-out chains backward from the
    /// last.
    ///
    /// # Errors
    ///
    /// Propagates the first hop error.
    pub fn hop_amounts(
        &self,
        snapshot: &PoolSnapshot,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<Vec<HopAmount>, AmmError> {
        let mut amounts: Vec<HopAmount> = self
            .hops
            .iter()
            .map(|h| HopAmount {
                pool_id: h.pool_id.clone(),
                token_in: h.token_in,
                token_out: h.token_out,
                amount_in: Amount::ZERO,
                amount_out: Amount::ZERO,
            })
            .collect();
        if amount.is_zero() {
            return Ok(amounts);
        }
        match swap_type {
            SwapType::ExactIn => {
                let mut carried = amount;
                for (hop, slot) in self.hops.iter().zip(amounts.iter_mut()) {
                    let out = pool_of(snapshot, hop)?.out_given_exact_in(hop.token_in, hop.token_out, carried)?;
                    slot.amount_in = carried;
                    slot.amount_out = out;
                    carried = out;
                }
            }
            SwapType::ExactOut => {
                let mut carried = amount;
                for (hop, slot) in self.hops.iter().zip(amounts.iter_mut()).rev() {
                    let needed = pool_of(snapshot, hop)?.in_given_exact_out(hop.token_in, hop.token_out, carried)?;
                    slot.amount_out = carried;
                    slot.amount_in = needed;
                    carried = needed;
                }
            }
        }
        Ok(amounts)
    }

    /// Output (exact-in) or required input (exact-out) for `amount`.
    ///
    /// # Errors
    ///
    /// Propagates the first hop error.
    pub fn return_amount(&self, snapshot: &PoolSnapshot, amount: Amount, swap_type: SwapType) -> Result<Amount, AmmError> {
        let amounts = self.hop_amounts(snapshot, amount, swap_type)?;
        let edge = match swap_type {
            SwapType::ExactIn => amounts.last().map(|h| h.amount_out),
            SwapType::ExactOut => amounts.first().map(|h| h.amount_in),
        };
        Ok(edge.unwrap_or(Amount::ZERO))
    }

    /// Per-hop marginal prices after trading `amount` along the path.
    fn hop_prices(
        &self,
        snapshot: &PoolSnapshot,
        amounts: &[HopAmount],
        swap_type: SwapType,
    ) -> Result<Vec<U256>, AmmError> {
        self.hops
            .iter()
            .zip(amounts)
            .map(|(hop, at)| {
                let fixed = if swap_type.is_exact_in() { at.amount_in } else { at.amount_out };
                pool_of(snapshot, hop)?.spot_price_after_swap(hop.token_in, hop.token_out, fixed, swap_type)
            })
            .collect()
    }

    /// Marginal price of the whole path after trading `amount`: the product
    /// of the hop prices, each taken at the amount that hop sees.
    ///
    /// # Errors
    ///
    /// Propagates hop errors.
    pub fn spot_price_after_swap(
        &self,
        snapshot: &PoolSnapshot,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let amounts = self.hop_amounts(snapshot, amount, swap_type)?;
        let prices = self.hop_prices(snapshot, &amounts, swap_type)?;
        prices.into_iter().try_fold(ONE, fixed_point::mul_down)
    }

    /// Derivative of [`Path::spot_price_after_swap`] per whole token of the
    /// fixed side, by the chain rule over the hops.
    ///
    /// For exact-in, hop `k` contributes `d_k · Π_{j>k} p_j`; for exact-out
    /// it contributes `d_k · Π_{j<k} p_j · (Π_{j>k} p_j)²`.
    ///
    /// # Errors
    ///
    /// Propagates hop errors, including [`AmmError::Unsupported`] from a
    /// hop without a derivative.
    pub fn derivative_spot_price_after_swap(
        &self,
        snapshot: &PoolSnapshot,
        amount: Amount,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let amounts = self.hop_amounts(snapshot, amount, swap_type)?;
        let prices = self.hop_prices(snapshot, &amounts, swap_type)?;
        let mut total = U256::ZERO;
        for (k, (hop, at)) in self.hops.iter().zip(&amounts).enumerate() {
            let fixed = if swap_type.is_exact_in() { at.amount_in } else { at.amount_out };
            let mut term = pool_of(snapshot, hop)?.derivative_spot_price_after_swap(
                hop.token_in,
                hop.token_out,
                fixed,
                swap_type,
            )?;
            for later in prices.iter().skip(k + 1) {
                term = fixed_point::mul_down(term, *later)?;
                if !swap_type.is_exact_in() {
                    term = fixed_point::mul_down(term, *later)?;
                }
            }
            if !swap_type.is_exact_in() {
                for earlier in prices.iter().take(k) {
                    term = fixed_point::mul_down(term, *earlier)?;
                }
            }
            total = fixed_point::add(total, term)?;
        }
        Ok(total)
    }

    /// Capacity of the path: every hop's own limit carried to the path's
    /// fixed side, and the smallest of those.
    ///
    /// # Errors
    ///
    /// Propagates hop errors; a path with a failing hop is unusable.
    pub fn compute_limit(&self, snapshot: &PoolSnapshot, swap_type: SwapType) -> Result<Amount, AmmError> {
        let mut limit: Option<Amount> = None;
        for (k, hop) in self.hops.iter().enumerate() {
            let pool = pool_of(snapshot, hop)?;
            let mut carried = pool.limit_amount(hop.token_in, hop.token_out, swap_type)?;
            match swap_type {
                SwapType::ExactIn => {
                    for earlier in self.hops.iter().take(k).rev() {
                        let p = pool_of(snapshot, earlier)?;
                        let max_out = p.limit_amount(earlier.token_in, earlier.token_out, SwapType::ExactOut)?;
                        carried = p.in_given_exact_out(earlier.token_in, earlier.token_out, carried.min(max_out))?;
                    }
                }
                SwapType::ExactOut => {
                    for later in self.hops.iter().skip(k + 1) {
                        let p = pool_of(snapshot, later)?;
                        let max_in = p.limit_amount(later.token_in, later.token_out, SwapType::ExactIn)?;
                        carried = p.out_given_exact_in(later.token_in, later.token_out, carried.min(max_in))?;
                    }
                }
            }
            limit = Some(limit.map_or(carried, |l| l.min(carried)));
        }
        Ok(limit.unwrap_or(Amount::ZERO))
    }
}

fn pool_of<'a>(snapshot: &'a PoolSnapshot, hop: &Hop) -> Result<&'a PoolBox, AmmError> {
    snapshot
        .pool(hop.pool)
        .ok_or(AmmError::InvalidConfiguration("path references a pool outside the snapshot"))
}
