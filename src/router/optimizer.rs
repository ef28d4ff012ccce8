//! Splitting a trade across candidate paths.
//!
//! For a set of `k` paths the optimizer searches the shared marginal price
//! `p` at which the amounts each path can absorb (without its price after
//! swap rising above `p`) add up to the requested total.  At that price no
//! unit of the trade can be moved to another path and do better, which is
//! the optimality condition for a split across concave return curves.
//!
//! The outer search bisects on `p`; the inner one finds each path's amount
//! for a given `p` by Newton steps kept inside a bisection bracket.  Paths
//! whose price has no derivative (BPT legs, oracle-rate pools) simply take
//! the bisection steps.

use std::cmp::Ordering;

use alloy_primitives::U256;
use tracing::{debug, trace};

use super::path::Path;
use super::SwapRequest;
use crate::config::{CostPolicy, OptimizerConfig};
use crate::domain::{Amount, HopAmount, PlanStatus, RouteAllocation, SwapPlan, SwapType};
use crate::math::fixed_point::{self, ONE};
use crate::pools::PoolSnapshot;

/// A path's share of one candidate split.
#[derive(Debug, Clone)]
struct Allocation {
    path: usize,
    amount: Amount,
    hops: Vec<HopAmount>,
    return_amount: Amount,
}

/// One evaluated split.
#[derive(Debug, Clone)]
struct Candidate {
    allocations: Vec<Allocation>,
    total_return: Amount,
    pools: usize,
}

impl Candidate {
    fn cost(&self, cost_per_pool: Amount) -> U256 {
        cost_per_pool.get().saturating_mul(U256::from(self.pools))
    }

    /// Path index of the largest allocation.
    fn anchor(&self) -> Option<usize> {
        self.allocations.iter().max_by_key(|a| a.amount).map(|a| a.path)
    }
}

/// Per-path state during price equalization.
struct Leg<'a> {
    path: &'a Path,
    limit: U256,
    spot: U256,
    scale: U256,
}

/// Allocates a request across ranked candidate paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapOptimizer {
    config: OptimizerConfig,
}

impl SwapOptimizer {
    #[must_use]
    pub const fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Chooses the best split of `request` over `paths`, which must be in
    /// the proposer's rank order.
    ///
    /// Split sizes from one up to `max_pools` are tried.  A single path is
    /// chosen as the best of all paths taken alone; a split of `k` paths
    /// is that path plus the next `k - 1` ranked paths that share no pool
    /// with any path already in the split, since every path is priced
    /// against pre-trade balances.  Split sizes with too few such paths
    /// are skipped.  Candidates are
    /// compared under the configured [`CostPolicy`], with remaining ties
    /// going to the split with fewer paths.
    ///
    /// A zero amount yields [`PlanStatus::ZeroAmount`], no paths yield
    /// [`PlanStatus::NoRoute`], and no split able to carry the amount
    /// yields [`PlanStatus::Infeasible`].
    #[must_use]
    pub fn optimize(&self, snapshot: &PoolSnapshot, paths: &[Path], request: &SwapRequest) -> SwapPlan {
        let empty = |status| {
            SwapPlan::empty(
                request.swap_type,
                request.token_in,
                request.token_out,
                request.amount,
                status,
            )
        };
        if request.amount.is_zero() {
            return empty(PlanStatus::ZeroAmount);
        }
        if paths.is_empty() {
            return empty(PlanStatus::NoRoute);
        }

        let mut best: Option<(usize, Candidate)> = None;
        let mut anchor = 0;
        for (index, _) in paths.iter().enumerate() {
            if let Some(candidate) = self.evaluate(snapshot, paths, &[index], request) {
                if best.as_ref().is_none_or(|(_, b)| self.is_better(&candidate, b, request)) {
                    anchor = index;
                    best = Some((1, candidate));
                }
            }
        }

        let disjoint = disjoint_ranking(paths, anchor);
        let max_k = self.config.max_pools.min(disjoint.len());
        for k in 2..=max_k {
            let set = &disjoint[..k];
            let Some(candidate) = self.evaluate(snapshot, paths, set, request) else {
                trace!(k, "split infeasible");
                continue;
            };
            if best.as_ref().is_none_or(|(_, b)| self.is_better(&candidate, b, request)) {
                best = Some((k, candidate));
            }
        }

        let Some((k, candidate)) = best else {
            debug!(paths = paths.len(), amount = %request.amount, "no split carries the amount");
            return empty(PlanStatus::Infeasible);
        };
        debug!(k, routes = candidate.allocations.len(), pools = candidate.pools, "split chosen");
        Self::build_plan(snapshot, paths, request, candidate)
    }

    fn build_plan(snapshot: &PoolSnapshot, paths: &[Path], request: &SwapRequest, candidate: Candidate) -> SwapPlan {
        let cost = candidate.cost(request.cost_per_pool);
        let considering_fees = match request.swap_type {
            SwapType::ExactIn => candidate.total_return.get().saturating_sub(cost),
            SwapType::ExactOut => candidate.total_return.get().saturating_add(cost),
        };
        let market_sp = candidate
            .anchor()
            .and_then(|i| paths.get(i))
            .and_then(|p| p.spot_price_after_swap(snapshot, Amount::ZERO, request.swap_type).ok())
            .unwrap_or(U256::ZERO);
        SwapPlan {
            swap_type: request.swap_type,
            token_in: request.token_in,
            token_out: request.token_out,
            swap_amount: request.amount,
            return_amount: candidate.total_return,
            return_amount_considering_fees: Amount::new(considering_fees),
            market_sp,
            routes: candidate
                .allocations
                .into_iter()
                .map(|a| RouteAllocation {
                    hops: a.hops,
                    amount: a.amount,
                    return_amount: a.return_amount,
                })
                .collect(),
            status: PlanStatus::Routed,
        }
    }

    /// Whether `a` beats `b` under the cost policy.
    fn is_better(&self, a: &Candidate, b: &Candidate, request: &SwapRequest) -> bool {
        let (ra, rb) = (a.total_return.get(), b.total_return.get());
        let (ca, cb) = (a.cost(request.cost_per_pool), b.cost(request.cost_per_pool));
        let exact_in = request.swap_type.is_exact_in();
        // Net values compared by cross-adding costs so nothing underflows.
        let ordering = match (self.config.cost_policy, exact_in) {
            (CostPolicy::GasAdjusted, true) => ra.saturating_add(cb).cmp(&rb.saturating_add(ca)),
            (CostPolicy::GasAdjusted, false) => rb.saturating_add(cb).cmp(&ra.saturating_add(ca)),
            (CostPolicy::TieBreakOnly, true) => ra.cmp(&rb).then(cb.cmp(&ca)),
            (CostPolicy::TieBreakOnly, false) => rb.cmp(&ra).then(cb.cmp(&ca)),
        };
        ordering.then(b.allocations.len().cmp(&a.allocations.len())) == Ordering::Greater
    }

    /// Allocates the request over `set` and prices every route.
    fn evaluate(&self, snapshot: &PoolSnapshot, paths: &[Path], set: &[usize], request: &SwapRequest) -> Option<Candidate> {
        let amounts = self.allocate(snapshot, paths, set, request)?;
        let mut allocations = Vec::with_capacity(amounts.len());
        let mut total_return = U256::ZERO;
        let mut pools = 0;
        for (index, amount) in amounts {
            if amount.is_zero() {
                continue;
            }
            let path = paths.get(index)?;
            let hops = match path.hop_amounts(snapshot, amount, request.swap_type) {
                Ok(hops) => hops,
                Err(err) => {
                    trace!(path = path.id(), %err, "allocation failed");
                    return None;
                }
            };
            let return_amount = match request.swap_type {
                SwapType::ExactIn => hops.last().map(|h| h.amount_out),
                SwapType::ExactOut => hops.first().map(|h| h.amount_in),
            }
            .unwrap_or(Amount::ZERO);
            total_return = total_return.checked_add(return_amount.get())?;
            pools += hops.len();
            allocations.push(Allocation {
                path: index,
                amount,
                hops,
                return_amount,
            });
        }
        Some(Candidate {
            allocations,
            total_return: Amount::new(total_return),
            pools,
        })
    }

    /// Amounts per path, summing exactly to the request amount, or `None`
    /// when the paths cannot carry it.
    fn allocate(
        &self,
        snapshot: &PoolSnapshot,
        paths: &[Path],
        set: &[usize],
        request: &SwapRequest,
    ) -> Option<Vec<(usize, Amount)>> {
        let total = request.amount.get();
        let capacity = set
            .iter()
            .filter_map(|&i| paths.get(i))
            .fold(U256::ZERO, |acc, p| acc.saturating_add(p.limit().get()));
        if capacity < total {
            trace!(paths = set.len(), %capacity, %total, "insufficient capacity");
            return None;
        }
        if let [only] = set {
            return Some(vec![(*only, request.amount)]);
        }

        let fixed_token = if request.swap_type.is_exact_in() {
            request.token_in
        } else {
            request.token_out
        };
        let scale = snapshot
            .token(fixed_token)
            .map_or(U256::from(1u64), |t| t.scaling_factor());
        let legs: Vec<Leg<'_>> = set
            .iter()
            .filter_map(|&i| paths.get(i))
            .map(|path| Leg {
                path,
                limit: path.limit().get(),
                spot: price_at(snapshot, path, U256::ZERO, request.swap_type),
                scale,
            })
            .collect();

        let amounts = self.equalize(snapshot, &legs, total, request.swap_type);
        let mut allocated: Vec<U256> = amounts;

        // Hand the rounding residual to paths with spare capacity, best
        // ranked first.
        let placed = allocated.iter().fold(U256::ZERO, |acc, a| acc.saturating_add(*a));
        let mut residual = total.checked_sub(placed)?;
        for (amount, leg) in allocated.iter_mut().zip(&legs) {
            if residual.is_zero() {
                break;
            }
            let extra = leg.limit.saturating_sub(*amount).min(residual);
            *amount += extra;
            residual -= extra;
        }
        if !residual.is_zero() {
            return None;
        }
        Some(
            set.iter()
                .zip(allocated)
                .map(|(&i, a)| (i, Amount::new(a)))
                .collect(),
        )
    }

    /// Bisects on the shared price target; returns amounts summing to at
    /// most `total`.
    fn equalize(&self, snapshot: &PoolSnapshot, legs: &[Leg<'_>], total: U256, swap_type: SwapType) -> Vec<U256> {
        let tolerance = total.saturating_mul(U256::from(self.config.relative_tolerance)) / ONE;
        let absorbed = |price: U256| -> Vec<U256> {
            legs.iter()
                .map(|leg| self.amount_at_price(snapshot, leg, price, swap_type))
                .collect()
        };
        let sum = |amounts: &[U256]| amounts.iter().fold(U256::ZERO, |acc, a| acc.saturating_add(*a));

        let lowest_spot = legs.iter().map(|l| l.spot).min().unwrap_or(U256::ZERO);
        let mut low = lowest_spot.saturating_sub(U256::from(1u64));
        let mut high = legs
            .iter()
            .filter_map(|l| l.path.spot_price_after_swap(snapshot, Amount::new(l.limit), swap_type).ok())
            .max()
            .unwrap_or(lowest_spot)
            .max(lowest_spot);
        let mut doublings = 0;
        while sum(&absorbed(high)) < total && doublings < self.config.price_iterations && high < U256::MAX {
            high = high.saturating_mul(U256::from(2u64)).max(U256::from(1u64));
            doublings += 1;
        }

        let mut best_low = vec![U256::ZERO; legs.len()];
        for iteration in 0..self.config.price_iterations {
            if high - low <= U256::from(1u64) {
                break;
            }
            let mid = low + (high - low) / U256::from(2u64);
            let amounts = absorbed(mid);
            let placed = sum(&amounts);
            if placed <= total {
                low = mid;
                best_low = amounts;
                if total - placed <= tolerance {
                    trace!(iteration, %mid, "price target converged");
                    break;
                }
            } else {
                high = mid;
            }
        }
        best_low
    }

    /// Largest amount in `[0, limit]` whose price after swap does not
    /// exceed `target`.
    fn amount_at_price(&self, snapshot: &PoolSnapshot, leg: &Leg<'_>, target: U256, swap_type: SwapType) -> U256 {
        if leg.spot > target {
            return U256::ZERO;
        }
        if price_at(snapshot, leg.path, leg.limit, swap_type) <= target {
            return leg.limit;
        }
        let tolerance = leg.limit.saturating_mul(U256::from(self.config.relative_tolerance)) / ONE;
        let (mut lo, mut hi) = (U256::ZERO, leg.limit);
        let (mut x, mut px) = (U256::ZERO, leg.spot);
        let mut last_raised_low: Option<bool> = None;
        let mut force_bisection = false;
        for _ in 0..self.config.amount_iterations {
            if hi - lo <= tolerance.max(U256::from(1u64)) {
                break;
            }
            let newton = if force_bisection {
                None
            } else {
                newton_step(snapshot, leg, x, px, target, swap_type)
            };
            let candidate = newton
                .filter(|c| *c > lo && *c < hi)
                .unwrap_or_else(|| lo + (hi - lo) / U256::from(2u64));
            let price = price_at(snapshot, leg.path, candidate, swap_type);
            let raised_low = price <= target;
            if raised_low {
                lo = candidate;
            } else {
                hi = candidate;
            }
            // Two moves of the same bracket end in a row: the Newton
            // iterate is approaching from one side, so halve instead.
            force_bisection = last_raised_low == Some(raised_low);
            last_raised_low = Some(raised_low);
            (x, px) = (candidate, price);
        }
        lo
    }
}

/// `anchor` followed by the ranked paths that share no pool with any path
/// before them.
fn disjoint_ranking(paths: &[Path], anchor: usize) -> Vec<usize> {
    let mut chosen: Vec<usize> = Vec::with_capacity(paths.len());
    for index in std::iter::once(anchor).chain((0..paths.len()).filter(|&i| i != anchor)) {
        let Some(path) = paths.get(index) else {
            continue;
        };
        let overlaps = chosen
            .iter()
            .filter_map(|&c| paths.get(c))
            .any(|c| c.shares_pool_with(path));
        if overlaps {
            trace!(path = path.id(), "shares a pool with a better path");
            continue;
        }
        chosen.push(index);
    }
    chosen
}

/// Path price after `amount`, with a failed evaluation read as unbounded.
fn price_at(snapshot: &PoolSnapshot, path: &Path, amount: U256, swap_type: SwapType) -> U256 {
    path.spot_price_after_swap(snapshot, Amount::new(amount), swap_type)
        .unwrap_or(U256::MAX)
}

/// One Newton step from `x` toward `target`, in raw units.
fn newton_step(snapshot: &PoolSnapshot, leg: &Leg<'_>, x: U256, px: U256, target: U256, swap_type: SwapType) -> Option<U256> {
    if px == U256::MAX {
        return None;
    }
    let slope = leg
        .path
        .derivative_spot_price_after_swap(snapshot, Amount::new(x), swap_type)
        .ok()
        .filter(|d| !d.is_zero())?;
    // Derivatives are per whole token; the quotient is an 18-decimal
    // amount, rescaled to the fixed token's raw units.
    let step = fixed_point::div_down(px.abs_diff(target), slope).ok()? / leg.scale;
    if px <= target {
        Some(x.saturating_add(step))
    } else {
        x.checked_sub(step)
    }
}
