//! Integration tests exercising the full system from a JSON pool list to a
//! swap plan.
//!
//! These tests verify end-to-end flows through the public API: snapshot
//! loading and filtering, direct and multi-hop routing, split routing and
//! cost policies, boundary handling of concentrated pools, and the
//! batch-swap layout.
//!
//! These tests require all pool features to be enabled.

#![cfg(all(
    feature = "weighted",
    feature = "stable",
    feature = "linear",
    feature = "gyro",
    feature = "fx",
))]
#![allow(clippy::panic)]

use hydra_sor::config::{CostPolicy, OptimizerConfig, RouterConfig, SolverConfig};
use hydra_sor::domain::{Amount, PlanStatus, PoolId, SwapPlan, SwapType, TokenAddress};
use hydra_sor::error::AmmError;
use hydra_sor::pools::PoolSnapshot;
use hydra_sor::router::{route, RouteOptions, RouteProposer, SwapRequest};
use hydra_sor::traits::SwapPool;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
const DAI: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";
const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
const USDT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";
const XSGD: &str = "0x70e8de73ce538da2beed35d14187f6959a8eca96";
const LONER_A: &str = "0x1111111111111111111111111111111111111111";
const LONER_B: &str = "0x2222222222222222222222222222222222222222";

fn address(hex: &str) -> TokenAddress {
    let Ok(a) = hex.parse() else {
        panic!("valid address {hex}");
    };
    a
}

fn e18(units: u64) -> u128 {
    u128::from(units) * 10u128.pow(18)
}

fn weighted_pool(id: &str, dai: &str, weth: &str) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "address": "0x0000000000000000000000000000000000000a01",
            "poolType": "Weighted",
            "swapFee": "0.003",
            "tokens": [
                {{"address": "{DAI}", "balance": "{dai}", "decimals": 18, "weight": "0.5"}},
                {{"address": "{WETH}", "balance": "{weth}", "decimals": 18, "weight": "0.5"}}
            ]
        }}"#
    )
}

fn stable_pool() -> String {
    format!(
        r#"{{
            "id": "0xstable",
            "address": "0x0000000000000000000000000000000000000a02",
            "poolType": "Stable",
            "swapFee": "0.0004",
            "amp": "200",
            "tokens": [
                {{"address": "{DAI}", "balance": "1000", "decimals": 18}},
                {{"address": "{USDC}", "balance": "1000", "decimals": 6}},
                {{"address": "{USDT}", "balance": "1000", "decimals": 6}}
            ]
        }}"#
    )
}

fn loner_pool() -> String {
    format!(
        r#"{{
            "id": "0xloner",
            "address": "0x0000000000000000000000000000000000000a03",
            "poolType": "Weighted",
            "swapFee": "0.003",
            "tokens": [
                {{"address": "{LONER_A}", "balance": "500", "decimals": 18, "weight": "0.8"}},
                {{"address": "{LONER_B}", "balance": "500", "decimals": 18, "weight": "0.2"}}
            ]
        }}"#
    )
}

fn gyro_e_pool() -> String {
    format!(
        r#"{{
            "id": "0xgyroe",
            "address": "0x0000000000000000000000000000000000000a04",
            "poolType": "GyroE",
            "swapFee": "0.0002",
            "alpha": "0.98",
            "beta": "1.020408163265306122",
            "c": "0.707106781186547524",
            "s": "0.707106781186547524",
            "lambda": "100",
            "tokens": [
                {{"address": "{USDC}", "balance": "1000", "decimals": 6}},
                {{"address": "{USDT}", "balance": "1000", "decimals": 6}}
            ]
        }}"#
    )
}

fn fx_pool() -> String {
    format!(
        r#"{{
            "id": "0xfx",
            "address": "0x0000000000000000000000000000000000000a05",
            "poolType": "FX",
            "swapFee": "0",
            "alpha": "0.8",
            "beta": "0.48",
            "delta": "0.175",
            "epsilon": "0.0005",
            "lambda": "1",
            "tokens": [
                {{"address": "{XSGD}", "balance": "1000000", "decimals": 6, "token": {{"latestFXPrice": "0.75"}}}},
                {{"address": "{USDC}", "balance": "750000", "decimals": 6, "token": {{"latestFXPrice": "1"}}}}
            ]
        }}"#
    )
}

fn snapshot(pools: &[String]) -> PoolSnapshot {
    let json = format!("[{}]", pools.join(","));
    let Ok(s) = PoolSnapshot::from_json(&json, &SolverConfig::default()) else {
        panic!("valid snapshot");
    };
    s
}

/// Pool A (weighted DAI/WETH 1000/1) and pool B (stable DAI/USDC/USDT).
fn two_pool_snapshot() -> PoolSnapshot {
    snapshot(&[weighted_pool("0xpoolA", "1000", "1"), stable_pool()])
}

fn request(token_in: &str, token_out: &str, swap_type: SwapType, amount: u128) -> SwapRequest {
    SwapRequest {
        token_in: address(token_in),
        token_out: address(token_out),
        swap_type,
        amount: Amount::from_u128(amount),
        cost_per_pool: Amount::ZERO,
    }
}

fn routed(snapshot: &PoolSnapshot, req: &SwapRequest, config: &RouterConfig) -> SwapPlan {
    let Ok(plan) = route(snapshot, req, config) else {
        panic!("request must be valid");
    };
    plan
}

fn allocated(plan: &SwapPlan) -> u128 {
    plan.routes
        .iter()
        .map(|r| u128::try_from(r.amount.get()).unwrap_or(u128::MAX))
        .sum()
}

// ===========================================================================
// Suite 1: Snapshot Loading
// ===========================================================================

#[test]
fn snapshot_filters_unusable_records() {
    let broken = r#"{
        "id": "0xunknown",
        "address": "0x0000000000000000000000000000000000000a09",
        "poolType": "Element",
        "swapFee": "0.001",
        "tokens": []
    }"#;
    let s = snapshot(&[
        weighted_pool("0xpoolA", "1000", "1"),
        weighted_pool("0xdrained", "0", "1"),
        broken.to_string(),
        stable_pool(),
    ]);
    assert_eq!(s.len(), 2);
    assert!(s.get(&PoolId::new("0xdrained")).is_none());
    assert!(s.get(&PoolId::new("0xstable")).is_some());
}

#[test]
fn snapshot_rejects_negative_balance() {
    let json = format!("[{}]", weighted_pool("0xbad", "-1000", "1"));
    assert!(matches!(
        PoolSnapshot::from_json(&json, &SolverConfig::default()),
        Err(AmmError::CorruptSnapshot(_))
    ));
}

// ===========================================================================
// Suite 2: Direct and Multi-Hop Routing
// ===========================================================================

#[test]
fn weth_to_dai_uses_the_only_connecting_pool() {
    let s = two_pool_snapshot();
    let tenth = e18(1) / 10;
    let req = request(WETH, DAI, SwapType::ExactIn, tenth);

    let paths = RouteProposer::propose_routes(&s, req.token_in, req.token_out, req.swap_type, &RouteOptions::default());
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].id(), "0xpoola");

    let plan = routed(&s, &req, &RouterConfig::default());
    assert_eq!(plan.status, PlanStatus::Routed);
    assert_eq!(plan.routes.len(), 1);
    assert_eq!(plan.swap_amount, Amount::from_u128(tenth));
    assert!(!plan.return_amount.is_zero());
    // 0.1 WETH into 1000/1 sells for roughly 90 DAI.
    assert!(plan.return_amount > Amount::from_u128(e18(85)));
    assert!(plan.return_amount < Amount::from_u128(e18(95)));
}

#[test]
fn weth_to_usdc_hops_through_dai() {
    let s = two_pool_snapshot();
    let plan = routed(&s, &request(WETH, USDC, SwapType::ExactIn, e18(1) / 10), &RouterConfig::default());
    assert!(plan.is_routed());
    assert_eq!(plan.routes.len(), 1);
    let hops = &plan.routes[0].hops;
    assert_eq!(hops.len(), 2);
    assert_eq!(hops[0].token_out, address(DAI));
    assert_eq!(hops[1].amount_in, hops[0].amount_out);
    // About 90 USDC, in 6-decimal units.
    assert!(plan.return_amount > Amount::from_u128(85_000_000));
    assert!(plan.return_amount < Amount::from_u128(95_000_000));
}

#[test]
fn exact_out_reports_required_input() {
    let s = two_pool_snapshot();
    let plan = routed(&s, &request(WETH, DAI, SwapType::ExactOut, e18(50)), &RouterConfig::default());
    assert!(plan.is_routed());
    assert_eq!(plan.routes[0].hops[0].amount_out, Amount::from_u128(e18(50)));
    // 50 DAI at ~0.001 WETH each, plus fee and impact.
    assert!(plan.return_amount > Amount::from_u128(e18(5) / 100));
    assert!(plan.return_amount < Amount::from_u128(e18(6) / 100));
}

// ===========================================================================
// Suite 3: Unroutable Requests
// ===========================================================================

#[test]
fn disconnected_tokens_yield_no_route() {
    let s = snapshot(&[weighted_pool("0xpoolA", "1000", "1"), loner_pool()]);
    let plan = routed(&s, &request(WETH, LONER_A, SwapType::ExactIn, e18(1)), &RouterConfig::default());
    assert_eq!(plan.status, PlanStatus::NoRoute);
    assert!(plan.routes.is_empty());
    assert!(plan.return_amount.is_zero());
}

#[test]
fn amount_beyond_capacity_is_infeasible() {
    let s = two_pool_snapshot();
    // The weighted pool accepts at most 30% of its 1 WETH.
    let plan = routed(&s, &request(WETH, DAI, SwapType::ExactIn, e18(10)), &RouterConfig::default());
    assert_eq!(plan.status, PlanStatus::Infeasible);
    assert!(!plan.is_routed());
}

#[test]
fn zero_amount_is_an_empty_success() {
    let s = two_pool_snapshot();
    let plan = routed(&s, &request(WETH, DAI, SwapType::ExactIn, 0), &RouterConfig::default());
    assert_eq!(plan.status, PlanStatus::ZeroAmount);
    assert!(plan.return_amount.is_zero());
    assert!(plan.routes.is_empty());
}

#[test]
fn identical_tokens_are_rejected() {
    let s = two_pool_snapshot();
    assert!(matches!(
        route(&s, &request(DAI, DAI, SwapType::ExactIn, 1), &RouterConfig::default()),
        Err(AmmError::InvalidToken(_))
    ));
}

// ===========================================================================
// Suite 4: Concentrated and Oracle Pools
// ===========================================================================

#[test]
fn gyro_e_past_boundary_is_unusable() {
    let s = snapshot(&[gyro_e_pool()]);
    let Some(pool) = s.get(&PoolId::new("0xgyroe")) else {
        panic!("pool loaded");
    };
    // Draining more than the whole balance leaves the ellipse.
    assert!(pool
        .in_given_exact_out(address(USDC), address(USDT), Amount::from_u128(1_001_000_000))
        .is_err());

    let drain = routed(&s, &request(USDC, USDT, SwapType::ExactOut, 1_000_000_000), &RouterConfig::default());
    assert_eq!(drain.status, PlanStatus::Infeasible);

    let small = routed(&s, &request(USDC, USDT, SwapType::ExactIn, 10_000_000), &RouterConfig::default());
    assert!(small.is_routed());
    // Near the peg a 10 USDC trade loses almost nothing.
    assert!(small.return_amount > Amount::from_u128(9_990_000));
}

#[test]
fn fx_pool_trades_at_oracle_rate() {
    let s = snapshot(&[fx_pool()]);
    let plan = routed(&s, &request(XSGD, USDC, SwapType::ExactIn, 1_000_000_000), &RouterConfig::default());
    assert!(plan.is_routed());
    // 1000 XSGD = 750 USD, less the 0.05% base fee.
    assert_eq!(plan.return_amount, Amount::from_u128(749_625_000));
}

// ===========================================================================
// Suite 5: Splitting and Cost Policies
// ===========================================================================

fn twin_weighted_snapshot() -> PoolSnapshot {
    snapshot(&[weighted_pool("0xsmall", "1000", "1"), weighted_pool("0xlarge", "2000", "2")])
}

#[test]
fn split_never_loses_to_a_single_pool() {
    let s = twin_weighted_snapshot();
    let amount = e18(1) / 4;
    let plan = routed(&s, &request(WETH, DAI, SwapType::ExactIn, amount), &RouterConfig::default());
    assert!(plan.is_routed());
    assert_eq!(allocated(&plan), amount);
    for id in ["0xsmall", "0xlarge"] {
        let Some(pool) = s.get(&PoolId::new(id)) else {
            panic!("pool loaded");
        };
        let Ok(single) = pool.out_given_exact_in(address(WETH), address(DAI), Amount::from_u128(amount)) else {
            panic!("single pool quote");
        };
        assert!(plan.return_amount >= single, "{id}: {} < {single}", plan.return_amount);
    }
}

#[test]
fn gas_adjusted_policy_avoids_costly_splits() {
    let s = twin_weighted_snapshot();
    let mut req = request(WETH, DAI, SwapType::ExactIn, e18(1) / 4);
    req.cost_per_pool = Amount::from_u128(e18(50));

    let plan = routed(&s, &req, &RouterConfig::default());
    assert_eq!(plan.routes.len(), 1);
    assert_eq!(plan.routes[0].hops[0].pool_id, PoolId::new("0xlarge"));
    assert_eq!(
        plan.return_amount_considering_fees.get(),
        plan.return_amount.get() - req.cost_per_pool.get()
    );
}

#[test]
fn tie_break_policy_splits_for_raw_output() {
    let s = twin_weighted_snapshot();
    let mut req = request(WETH, DAI, SwapType::ExactIn, e18(1) / 4);
    req.cost_per_pool = Amount::from_u128(e18(50));
    let config = RouterConfig {
        optimizer: OptimizerConfig {
            cost_policy: CostPolicy::TieBreakOnly,
            ..OptimizerConfig::default()
        },
        ..RouterConfig::default()
    };

    let plan = routed(&s, &req, &config);
    assert_eq!(plan.routes.len(), 2);
    assert_eq!(allocated(&plan), e18(1) / 4);
    // Larger pool takes the larger share.
    let Some(large) = plan.routes.iter().find(|r| r.hops[0].pool_id == PoolId::new("0xlarge")) else {
        panic!("large pool used");
    };
    assert!(large.amount > Amount::from_u128(e18(1) / 8));
}

#[test]
fn max_pools_of_one_disables_splitting() {
    let s = twin_weighted_snapshot();
    let config = RouterConfig {
        optimizer: OptimizerConfig {
            max_pools: 1,
            ..OptimizerConfig::default()
        },
        ..RouterConfig::default()
    };
    let plan = routed(&s, &request(WETH, DAI, SwapType::ExactIn, e18(1) / 4), &config);
    assert_eq!(plan.routes.len(), 1);
}

// ===========================================================================
// Suite 6: Output Layout
// ===========================================================================

#[test]
fn multi_hop_batch_swap_chains_steps() {
    let s = two_pool_snapshot();
    let tenth = e18(1) / 10;
    let plan = routed(&s, &request(WETH, USDC, SwapType::ExactIn, tenth), &RouterConfig::default());
    let batch = plan.to_batch_swap();
    assert_eq!(batch.assets, vec![address(WETH), address(DAI), address(USDC)]);
    assert_eq!(batch.swaps.len(), 2);
    assert_eq!(batch.swaps[0].amount, Amount::from_u128(tenth));
    assert_eq!(batch.swaps[1].amount, Amount::ZERO);
    assert_eq!(batch.swaps[1].asset_in_index, 1);
    assert_eq!(batch.swaps[1].asset_out_index, 2);
}

#[test]
fn plan_serializes_camel_case() {
    let s = two_pool_snapshot();
    let plan = routed(&s, &request(WETH, DAI, SwapType::ExactIn, e18(1) / 10), &RouterConfig::default());
    let Ok(json) = serde_json::to_string(&plan) else {
        panic!("serialize");
    };
    assert!(json.contains("\"status\":\"routed\""));
    assert!(json.contains("\"swapAmount\":\"100000000000000000\""));
    let Ok(back) = serde_json::from_str::<SwapPlan>(&json) else {
        panic!("deserialize");
    };
    assert_eq!(back, plan);
}

#[test]
fn routing_is_deterministic() {
    let s = two_pool_snapshot();
    let req = request(WETH, USDC, SwapType::ExactIn, e18(1) / 10);
    let first = routed(&s, &req, &RouterConfig::default());
    let second = routed(&s, &req, &RouterConfig::default());
    assert_eq!(first, second);
}
