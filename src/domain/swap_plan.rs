//! The router's output: a chosen set of paths with their allocations.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::{Amount, PoolId, SwapType, TokenAddress};

/// One pool traversal inside an allocated route, with the amounts the pool
/// math computed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HopAmount {
    /// Pool traversed.
    pub pool_id: PoolId,
    /// Token sent into the pool.
    pub token_in: TokenAddress,
    /// Token received from the pool.
    pub token_out: TokenAddress,
    /// Raw amount sent into the pool.
    pub amount_in: Amount,
    /// Raw amount received from the pool.
    pub amount_out: Amount,
}

/// The share of the trade routed through one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteAllocation {
    /// Hops in trade order (token-in side first).
    pub hops: Vec<HopAmount>,
    /// Allocated amount in the request's fixed unit (input for exact-in,
    /// output for exact-out).
    pub amount: Amount,
    /// The path's result in the opposite unit.
    pub return_amount: Amount,
}

impl RouteAllocation {
    /// Number of pools traversed.
    #[must_use]
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }
}

/// Outcome classification of a routing request.
///
/// A plan is only usable when it is [`PlanStatus::Routed`] or
/// [`PlanStatus::ZeroAmount`]; the other statuses carry no routes and make
/// "excluded" distinguishable from "computed zero".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanStatus {
    /// At least one path carries the trade.
    Routed,
    /// The request amount was zero; nothing to route.
    ZeroAmount,
    /// No path connects the two tokens.
    NoRoute,
    /// Paths exist but none can carry the requested amount.
    Infeasible,
}

/// A complete routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapPlan {
    /// Trade direction.
    pub swap_type: SwapType,
    /// Token sold.
    pub token_in: TokenAddress,
    /// Token bought.
    pub token_out: TokenAddress,
    /// Requested amount (input for exact-in, output for exact-out), raw.
    pub swap_amount: Amount,
    /// Total output (exact-in) or total input (exact-out), raw.
    pub return_amount: Amount,
    /// `return_amount` net of the per-pool cost, expressed in the return
    /// token: reduced for exact-in, increased for exact-out.
    pub return_amount_considering_fees: Amount,
    /// Spot price of the chosen routes before the trade (1e18 scale,
    /// token-in per token-out).
    pub market_sp: U256,
    /// Allocated routes; empty unless the plan is routed.
    pub routes: Vec<RouteAllocation>,
    /// Outcome classification.
    pub status: PlanStatus,
}

impl SwapPlan {
    /// Builds a plan that routes nothing.
    #[must_use]
    pub fn empty(
        swap_type: SwapType,
        token_in: TokenAddress,
        token_out: TokenAddress,
        swap_amount: Amount,
        status: PlanStatus,
    ) -> Self {
        Self {
            swap_type,
            token_in,
            token_out,
            swap_amount,
            return_amount: Amount::ZERO,
            return_amount_considering_fees: Amount::ZERO,
            market_sp: U256::ZERO,
            routes: Vec::new(),
            status,
        }
    }

    /// Returns `true` when the plan carries at least one route.
    #[must_use]
    pub fn is_routed(&self) -> bool {
        self.status == PlanStatus::Routed && !self.routes.is_empty()
    }

    /// Total number of pools traversed across all routes.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.routes.iter().map(RouteAllocation::hop_count).sum()
    }

    /// Flattens the plan into a vault batch swap: a deduplicated asset list
    /// and ordered steps referencing assets by index.
    ///
    /// For exact-in, each route's steps run in trade order and every hop
    /// after the first carries amount zero (it consumes the previous hop's
    /// full output).  For exact-out, steps run from the last hop backwards,
    /// the first listed step carries the route's output amount and the rest
    /// carry zero.
    #[must_use]
    pub fn to_batch_swap(&self) -> BatchSwap {
        let mut assets: Vec<TokenAddress> = Vec::new();

        let mut swaps = Vec::with_capacity(self.pool_count());
        for route in &self.routes {
            let ordered: Vec<&HopAmount> = match self.swap_type {
                SwapType::ExactIn => route.hops.iter().collect(),
                SwapType::ExactOut => route.hops.iter().rev().collect(),
            };
            for (i, hop) in ordered.into_iter().enumerate() {
                let asset_in_index = asset_index(&mut assets, hop.token_in);
                let asset_out_index = asset_index(&mut assets, hop.token_out);
                let amount = if i == 0 { route.amount } else { Amount::ZERO };
                swaps.push(BatchSwapStep {
                    pool_id: hop.pool_id.clone(),
                    asset_in_index,
                    asset_out_index,
                    amount,
                });
            }
        }
        BatchSwap {
            swap_type: self.swap_type,
            assets,
            swaps,
        }
    }
}

fn asset_index(assets: &mut Vec<TokenAddress>, token: TokenAddress) -> usize {
    if let Some(i) = assets.iter().position(|a| *a == token) {
        return i;
    }
    assets.push(token);
    assets.len() - 1
}

/// One step of a vault batch swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSwapStep {
    /// Pool to swap in.
    pub pool_id: PoolId,
    /// Index into [`BatchSwap::assets`] of the token sent.
    pub asset_in_index: usize,
    /// Index into [`BatchSwap::assets`] of the token received.
    pub asset_out_index: usize,
    /// Given amount; zero means "use the previous step's result".
    pub amount: Amount,
}

/// A plan flattened into the vault's batch-swap layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSwap {
    /// Trade direction.
    pub swap_type: SwapType,
    /// Every token touched, in first-seen order.
    pub assets: Vec<TokenAddress>,
    /// Steps in execution order.
    pub swaps: Vec<BatchSwapStep>,
}
