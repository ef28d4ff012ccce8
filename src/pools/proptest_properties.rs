//! Property-based tests for pool quotes and the optimizer.
//!
//! Properties covered:
//!
//! 1. **Quote consistency**: buying back the output of an exact-in quote
//!    never costs less than the original input, beyond rounding.
//! 2. **Output monotonicity**: a larger input never yields less output.
//! 3. **Price direction**: the marginal price after a swap never falls as
//!    the swap grows.
//! 4. **Capacity**: a weighted pool quotes its own exact-in limit.
//! 5. **Splitting never hurts**: a routed plan returns at least as much as
//!    the best single pool, and its allocations sum to the request.
//! 6. **Every family**: properties 1 and 2 for the linear, composable
//!    stable, Gyro and FX pools, each behind its own feature.
//!
//! Round trips allow the rounding the solvers actually incur: one raw unit
//! of a 6-decimal token, a few wei of Gyro invariant error, and the FX
//! curve's `1e-7` convergence unit.

use alloy_primitives::U256;
use proptest::prelude::*;

use crate::config::{OptimizerConfig, PoolTokens, SolverConfig, StableConfig, WeightedConfig, AMP_PRECISION};
use crate::domain::{Amount, PoolId, SwapFee, SwapType, Token, TokenAddress};
use crate::math::fixed_point::ONE;
use crate::pools::{PoolBox, PoolSnapshot, StablePool, WeightedPool};
use crate::router::{RouteOptions, RouteProposer, SwapOptimizer, SwapRequest};
use crate::test_support::{addr, token};
use crate::traits::{FromConfig, SwapPool};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn tok_a() -> Token {
    token(1, 18)
}

fn tok_b() -> Token {
    token(2, 6)
}

fn raw(token: Token, whole: u64) -> Amount {
    Amount::new(U256::from(whole) * ONE / token.scaling_factor())
}

fn fee_30bp() -> SwapFee {
    let Ok(fee) = SwapFee::from_decimal_str("0.003") else {
        panic!("valid fee");
    };
    fee
}

fn pair_tokens(ra: u64, rb: u64) -> PoolTokens {
    let Ok(tokens) = PoolTokens::with_unit_rates(vec![tok_a(), tok_b()], vec![raw(tok_a(), ra), raw(tok_b(), rb)]) else {
        panic!("valid tokens");
    };
    tokens
}

// ---------------------------------------------------------------------------
// Pool factory helpers (each creates a fresh pool from random balances)
// ---------------------------------------------------------------------------

fn make_weighted(id: &str, ra: u64, rb: u64, weight_a_pct: u64) -> WeightedPool {
    let wa = ONE * U256::from(weight_a_pct) / U256::from(100u64);
    let Ok(cfg) = WeightedConfig::new(PoolId::new(id), pair_tokens(ra, rb), vec![wa, ONE - wa], fee_30bp()) else {
        panic!("valid Weighted config");
    };
    let Ok(pool) = WeightedPool::from_config(&cfg, &SolverConfig::default()) else {
        panic!("valid Weighted pool");
    };
    pool
}

fn make_stable(amp: u64, ra: u64, rb: u64) -> StablePool {
    let Ok(cfg) = StableConfig::new(
        PoolId::new("0xstable"),
        pair_tokens(ra, rb),
        U256::from(amp * AMP_PRECISION),
        fee_30bp(),
        false,
    ) else {
        panic!("valid Stable config");
    };
    let Ok(pool) = StablePool::from_config(&cfg, &SolverConfig::default()) else {
        panic!("valid Stable pool");
    };
    pool
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Balances in whole tokens, in [10_000, 10_000_000].
fn balance_strategy() -> impl Strategy<Value = u64> {
    10_000u64..=10_000_000u64
}

/// Amplification before precision, in [1, 2_000].
fn amplification_strategy() -> impl Strategy<Value = u64> {
    1u64..=2_000u64
}

/// Weight of the first token in percent.
fn weight_strategy() -> impl Strategy<Value = u64> {
    2u64..=98u64
}

/// Trade size in basis points of the input balance, kept under the
/// weighted 30% cap.
fn trade_bps_strategy() -> impl Strategy<Value = u64> {
    1u64..=2_500u64
}

fn fraction(balance: Amount, bps: u64) -> Amount {
    Amount::new((balance.get() * U256::from(bps) / U256::from(10_000u64)).max(U256::from(1u64)))
}

fn round_trip_holds<P: SwapPool>(pool: &P, amount_in: Amount) -> Result<(), TestCaseError> {
    let slack = amount_in.get() / U256::from(1_000_000_000_000u64) + U256::from(100u64);
    round_trip_within(pool, addr(1), addr(2), amount_in, slack)
}

/// Buying back the output of `amount_in` costs at most `amount_in + slack`.
fn round_trip_within<P: SwapPool>(
    pool: &P,
    token_in: TokenAddress,
    token_out: TokenAddress,
    amount_in: Amount,
    slack: U256,
) -> Result<(), TestCaseError> {
    let Ok(out) = pool.out_given_exact_in(token_in, token_out, amount_in) else {
        return Ok(());
    };
    if out.is_zero() {
        return Ok(());
    }
    let Ok(back) = pool.in_given_exact_out(token_in, token_out, out) else {
        return Ok(());
    };
    prop_assert!(
        back.get() <= amount_in.get() + slack,
        "buying {} back cost {} > {}",
        out,
        back,
        amount_in
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Property 1: Quote Consistency
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_quote_consistency_weighted(
        ra in balance_strategy(),
        rb in balance_strategy(),
        w in weight_strategy(),
        bps in trade_bps_strategy(),
    ) {
        let pool = make_weighted("0xw", ra, rb, w);
        round_trip_holds(&pool, fraction(raw(tok_a(), ra), bps))?;
    }

    #[test]
    fn prop_quote_consistency_stable(
        amp in amplification_strategy(),
        ra in balance_strategy(),
        rb in balance_strategy(),
        bps in trade_bps_strategy(),
    ) {
        let pool = make_stable(amp, ra, rb);
        round_trip_holds(&pool, fraction(raw(tok_a(), ra), bps))?;
    }
}

// ---------------------------------------------------------------------------
// Property 2: Output Monotonicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_output_monotonic_weighted(
        ra in balance_strategy(),
        rb in balance_strategy(),
        w in weight_strategy(),
        bps in 1u64..=1_200u64,
    ) {
        let pool = make_weighted("0xw", ra, rb, w);
        let small = fraction(raw(tok_a(), ra), bps);
        let large = Amount::new(small.get() * U256::from(2u64));
        let (Ok(a), Ok(b)) = (
            pool.out_given_exact_in(addr(1), addr(2), small),
            pool.out_given_exact_in(addr(1), addr(2), large),
        ) else {
            return Ok(());
        };
        prop_assert!(a <= b, "out({}) = {} > out({}) = {}", small, a, large, b);
    }

    #[test]
    fn prop_output_monotonic_stable(
        amp in amplification_strategy(),
        ra in balance_strategy(),
        rb in balance_strategy(),
        bps in 1u64..=1_200u64,
    ) {
        let pool = make_stable(amp, ra, rb);
        let small = fraction(raw(tok_a(), ra), bps);
        let large = Amount::new(small.get() * U256::from(2u64));
        let (Ok(a), Ok(b)) = (
            pool.out_given_exact_in(addr(1), addr(2), small),
            pool.out_given_exact_in(addr(1), addr(2), large),
        ) else {
            return Ok(());
        };
        prop_assert!(a <= b, "out({}) = {} > out({}) = {}", small, a, large, b);
    }
}

// ---------------------------------------------------------------------------
// Property 3: Price Direction
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_price_rises_with_trade_weighted(
        ra in balance_strategy(),
        rb in balance_strategy(),
        w in weight_strategy(),
        bps in 1u64..=1_200u64,
        exact_in in any::<bool>(),
    ) {
        let pool = make_weighted("0xw", ra, rb, w);
        let (swap_type, balance) = if exact_in {
            (SwapType::ExactIn, raw(tok_a(), ra))
        } else {
            (SwapType::ExactOut, raw(tok_b(), rb))
        };
        let small = fraction(balance, bps);
        let large = Amount::new(small.get() * U256::from(2u64));
        let (Ok(p0), Ok(p1), Ok(p2)) = (
            pool.spot_price(addr(1), addr(2)),
            pool.spot_price_after_swap(addr(1), addr(2), small, swap_type),
            pool.spot_price_after_swap(addr(1), addr(2), large, swap_type),
        ) else {
            return Ok(());
        };
        prop_assert!(p0 <= p1 && p1 <= p2, "prices {} {} {}", p0, p1, p2);
    }

    #[test]
    fn prop_price_rises_with_trade_stable(
        amp in amplification_strategy(),
        ra in balance_strategy(),
        rb in balance_strategy(),
        bps in 10u64..=1_200u64,
    ) {
        let pool = make_stable(amp, ra, rb);
        let small = fraction(raw(tok_a(), ra), bps);
        let large = Amount::new(small.get() * U256::from(2u64));
        let (Ok(p1), Ok(p2)) = (
            pool.spot_price_after_swap(addr(1), addr(2), small, SwapType::ExactIn),
            pool.spot_price_after_swap(addr(1), addr(2), large, SwapType::ExactIn),
        ) else {
            return Ok(());
        };
        prop_assert!(p1 <= p2, "price fell from {} to {}", p1, p2);
    }
}

// ---------------------------------------------------------------------------
// Property 4: Capacity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_weighted_limit_is_quotable(
        ra in balance_strategy(),
        rb in balance_strategy(),
        w in 20u64..=80u64,
    ) {
        let pool = make_weighted("0xw", ra, rb, w);
        let Ok(limit) = pool.limit_amount(addr(1), addr(2), SwapType::ExactIn) else {
            return Err(TestCaseError::fail("limit must be defined"));
        };
        prop_assert!(!limit.is_zero());
        prop_assert!(pool.out_given_exact_in(addr(1), addr(2), limit).is_ok());
    }
}

// ---------------------------------------------------------------------------
// Property 5: Splitting Never Hurts
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_split_beats_best_single_pool(
        ra in balance_strategy(),
        rb in balance_strategy(),
        sa in balance_strategy(),
        sb in balance_strategy(),
        bps in 1u64..=2_500u64,
    ) {
        let first = make_weighted("0xfirst", ra, rb, 50);
        let second = make_weighted("0xsecond", sa, sb, 50);
        let smaller = ra.min(sa);
        let total = fraction(raw(tok_a(), smaller), bps);
        let singles = [
            first.out_given_exact_in(addr(1), addr(2), total),
            second.out_given_exact_in(addr(1), addr(2), total),
        ];
        let snapshot = PoolSnapshot::from_pools(
            1,
            vec![PoolBox::Weighted(Box::new(first)), PoolBox::Weighted(Box::new(second))],
        );
        let request = SwapRequest {
            token_in: addr(1),
            token_out: addr(2),
            swap_type: SwapType::ExactIn,
            amount: total,
            cost_per_pool: Amount::ZERO,
        };
        let paths = RouteProposer::propose_routes(&snapshot, addr(1), addr(2), SwapType::ExactIn, &RouteOptions::default());
        let plan = SwapOptimizer::new(OptimizerConfig::default()).optimize(&snapshot, &paths, &request);
        prop_assert!(plan.is_routed());

        let allocated = plan.routes.iter().fold(U256::ZERO, |acc, r| acc + r.amount.get());
        prop_assert_eq!(allocated, total.get());
        for single in singles.into_iter().flatten() {
            prop_assert!(plan.return_amount >= single, "plan {} < single {}", plan.return_amount, single);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: Every Family
// ---------------------------------------------------------------------------

/// Doubling an exact-in amount never yields less output.
fn monotonic_between<P: SwapPool>(
    pool: &P,
    token_in: TokenAddress,
    token_out: TokenAddress,
    small: Amount,
) -> Result<(), TestCaseError> {
    let large = Amount::new(small.get() * U256::from(2u64));
    let (Ok(a), Ok(b)) = (
        pool.out_given_exact_in(token_in, token_out, small),
        pool.out_given_exact_in(token_in, token_out, large),
    ) else {
        return Ok(());
    };
    prop_assert!(a <= b, "out({}) = {} > out({}) = {}", small, a, large, b);
    Ok(())
}

/// Relative `1e-9` plus `units` raw units.
fn loose_slack(amount: Amount, units: u64) -> U256 {
    amount.get() / U256::from(1_000_000_000u64) + U256::from(units)
}

fn whole(n: u64) -> U256 {
    U256::from(n) * ONE
}

#[cfg(feature = "linear")]
mod linear {
    use super::*;
    use crate::config::LinearConfig;
    use crate::pools::LinearPool;

    // main USDC(2, 6 dec), wrapped aUSDC(3, 6 dec) at rate 1.1, BPT(9).
    fn make_linear(main: u64, wrapped: u64) -> LinearPool {
        let Ok(tokens) = PoolTokens::new(
            vec![token(2, 6), token(3, 6), token(9, 18)],
            vec![
                Amount::from_u128(u128::from(main) * 1_000_000),
                Amount::from_u128(u128::from(wrapped) * 1_000_000),
                Amount::new(whole(1_000_000)),
            ],
            vec![ONE, ONE + ONE / U256::from(10u64), ONE],
        ) else {
            panic!("valid tokens");
        };
        let Ok(fee) = SwapFee::from_decimal_str("0.01") else {
            panic!("valid fee");
        };
        let supply = whole(main) + whole(wrapped) * U256::from(11u64) / U256::from(10u64);
        let Ok(cfg) = LinearConfig::new(
            PoolId::new("0xlinear"),
            tokens,
            0,
            1,
            whole(1_000),
            whole(2_000),
            fee,
            Amount::new(supply),
        ) else {
            panic!("valid Linear config");
        };
        let Ok(pool) = LinearPool::from_config(&cfg, &SolverConfig::default()) else {
            panic!("valid Linear pool");
        };
        pool
    }

    fn pair(direction: u8) -> (TokenAddress, TokenAddress) {
        match direction % 3 {
            0 => (addr(2), addr(3)),
            1 => (addr(2), addr(9)),
            _ => (addr(3), addr(2)),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_quote_consistency_linear(
            main in 500u64..=2_500u64,
            wrapped in 500u64..=2_000u64,
            usd in 1u64..=400u64,
            direction in 0u8..3u8,
        ) {
            let pool = make_linear(main, wrapped);
            let (token_in, token_out) = pair(direction);
            let amount = Amount::from_u128(u128::from(usd) * 1_000_000);
            round_trip_within(&pool, token_in, token_out, amount, loose_slack(amount, 2))?;
        }

        #[test]
        fn prop_output_monotonic_linear(
            main in 500u64..=2_500u64,
            wrapped in 500u64..=2_000u64,
            usd in 1u64..=200u64,
            direction in 0u8..3u8,
        ) {
            let pool = make_linear(main, wrapped);
            let (token_in, token_out) = pair(direction);
            monotonic_between(&pool, token_in, token_out, Amount::from_u128(u128::from(usd) * 1_000_000))?;
        }
    }
}

#[cfg(feature = "stable")]
mod composable_stable {
    use super::*;
    use crate::config::ComposableStableConfig;
    use crate::pools::ComposableStablePool;

    // BPT(9) + DAI(1, 18 dec) + USDC(2, 6 dec).
    fn make_composable(amp: u64, dai: u64, usdc: u64) -> ComposableStablePool {
        let Ok(tokens) = PoolTokens::new(
            vec![token(9, 18), token(1, 18), token(2, 6)],
            vec![
                Amount::new(whole(10_000_000)),
                Amount::new(whole(dai)),
                Amount::from_u128(u128::from(usdc) * 1_000_000),
            ],
            vec![ONE, ONE, ONE],
        ) else {
            panic!("valid tokens");
        };
        let Ok(cfg) = ComposableStableConfig::new(
            PoolId::new("0xcomposable"),
            addr(9),
            tokens,
            U256::from(amp * AMP_PRECISION),
            fee_30bp(),
            Amount::new(whole(dai + usdc)),
        ) else {
            panic!("valid ComposableStable config");
        };
        let Ok(pool) = ComposableStablePool::from_config(&cfg, &SolverConfig::default()) else {
            panic!("valid ComposableStable pool");
        };
        pool
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_quote_consistency_composable(
            amp in amplification_strategy(),
            dai in 10_000u64..=1_000_000u64,
            usdc in 10_000u64..=1_000_000u64,
            bps in trade_bps_strategy(),
        ) {
            let pool = make_composable(amp, dai, usdc);
            let amount = fraction(Amount::new(whole(dai)), bps);
            round_trip_within(&pool, addr(1), addr(2), amount, loose_slack(amount, 100))?;
        }

        #[test]
        fn prop_output_monotonic_composable(
            amp in amplification_strategy(),
            dai in 10_000u64..=1_000_000u64,
            usdc in 10_000u64..=1_000_000u64,
            bps in 1u64..=1_200u64,
        ) {
            let pool = make_composable(amp, dai, usdc);
            monotonic_between(&pool, addr(1), addr(2), fraction(Amount::new(whole(dai)), bps))?;
        }
    }
}

#[cfg(feature = "gyro")]
mod gyro {
    use super::*;
    use crate::config::{Gyro2Config, Gyro3Config, GyroEConfig, GyroEParams};
    use crate::pools::{Gyro2Pool, Gyro3Pool, GyroEPool};

    fn gyro_fee() -> SwapFee {
        let Ok(fee) = SwapFee::from_decimal_str("0.001") else {
            panic!("valid fee");
        };
        fee
    }

    fn tokens_18(balances: &[u64]) -> PoolTokens {
        let tokens = (1..=balances.len()).filter_map(|i| u8::try_from(i).ok()).map(|b| token(b, 18)).collect();
        let Ok(list) = PoolTokens::with_unit_rates(tokens, balances.iter().map(|b| Amount::new(whole(*b))).collect()) else {
            panic!("valid tokens");
        };
        list
    }

    // Price range [0.9025, 1.108].
    fn make_gyro2(x: u64, y: u64) -> Gyro2Pool {
        let Ok(cfg) = Gyro2Config::new(
            PoolId::new("0xgyro2"),
            tokens_18(&[x, y]),
            U256::from(950_000_000_000_000_000u128),
            U256::from(1_052_631_578_947_368_421u128),
            gyro_fee(),
        ) else {
            panic!("valid Gyro2 config");
        };
        let Ok(pool) = Gyro2Pool::from_config(&cfg, &SolverConfig::default()) else {
            panic!("valid Gyro2 pool");
        };
        pool
    }

    fn make_gyro3(balances: [u64; 3]) -> Gyro3Pool {
        let Ok(cfg) = Gyro3Config::new(
            PoolId::new("0xgyro3"),
            tokens_18(&balances),
            U256::from(990_000_000_000_000_000u128),
            gyro_fee(),
        ) else {
            panic!("valid Gyro3 config");
        };
        let Ok(pool) = Gyro3Pool::from_config(&cfg, &SolverConfig::default()) else {
            panic!("valid Gyro3 pool");
        };
        pool
    }

    // 45° rotation, λ = 100, range [0.98, 1/0.98].
    fn make_gyro_e(x: u64, y: u64) -> GyroEPool {
        let params = GyroEParams {
            alpha: U256::from(980_000_000_000_000_000u128),
            beta: U256::from(1_020_408_163_265_306_122u128),
            c: U256::from(707_106_781_186_547_524u128),
            s: U256::from(707_106_781_186_547_524u128),
            lambda: whole(100),
        };
        let Ok(cfg) = GyroEConfig::new(PoolId::new("0xgyroe"), tokens_18(&[x, y]), params, gyro_fee()) else {
            panic!("valid GyroE config");
        };
        let Ok(pool) = GyroEPool::from_config(&cfg, &SolverConfig::default()) else {
            panic!("valid GyroE pool");
        };
        pool
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_quote_consistency_gyro2(
            x in 500u64..=2_000u64,
            y in 500u64..=2_000u64,
            bps in trade_bps_strategy(),
        ) {
            let pool = make_gyro2(x, y);
            let amount = fraction(Amount::new(whole(x)), bps);
            round_trip_within(&pool, addr(1), addr(2), amount, loose_slack(amount, 10))?;
        }

        #[test]
        fn prop_output_monotonic_gyro2(
            x in 500u64..=2_000u64,
            y in 500u64..=2_000u64,
            bps in 1u64..=1_200u64,
        ) {
            let pool = make_gyro2(x, y);
            monotonic_between(&pool, addr(1), addr(2), fraction(Amount::new(whole(x)), bps))?;
        }

        #[test]
        fn prop_quote_consistency_gyro3(
            a in 800u64..=1_300u64,
            b in 800u64..=1_300u64,
            c in 800u64..=1_300u64,
            bps in 1u64..=1_000u64,
        ) {
            let pool = make_gyro3([a, b, c]);
            let amount = fraction(Amount::new(whole(a)), bps);
            round_trip_within(&pool, addr(1), addr(3), amount, loose_slack(amount, 10))?;
        }

        #[test]
        fn prop_output_monotonic_gyro3(
            a in 800u64..=1_300u64,
            b in 800u64..=1_300u64,
            c in 800u64..=1_300u64,
            bps in 1u64..=1_000u64,
        ) {
            let pool = make_gyro3([a, b, c]);
            monotonic_between(&pool, addr(1), addr(3), fraction(Amount::new(whole(a)), bps))?;
        }

        #[test]
        fn prop_quote_consistency_gyro_e(
            x in 900u64..=1_100u64,
            y in 900u64..=1_100u64,
            bps in 1u64..=2_000u64,
        ) {
            let pool = make_gyro_e(x, y);
            let amount = fraction(Amount::new(whole(x)), bps);
            round_trip_within(&pool, addr(1), addr(2), amount, loose_slack(amount, 10))?;
        }

        #[test]
        fn prop_output_monotonic_gyro_e(
            x in 900u64..=1_100u64,
            y in 900u64..=1_100u64,
            bps in 1u64..=2_000u64,
        ) {
            let pool = make_gyro_e(x, y);
            monotonic_between(&pool, addr(1), addr(2), fraction(Amount::new(whole(x)), bps))?;
        }
    }
}

#[cfg(feature = "fx")]
mod fx {
    use super::*;
    use crate::config::{FxConfig, FxParams};
    use crate::pools::FxPool;

    fn per_million(n: u64) -> U256 {
        U256::from(n) * ONE / U256::from(1_000_000u64)
    }

    // XSGD(1, 6 dec) at 0.75 USD against USDC(2, 6 dec) at 1 USD.
    fn make_fx(xsgd: u64, usdc: u64) -> FxPool {
        let Ok(tokens) = PoolTokens::with_unit_rates(
            vec![token(1, 6), token(2, 6)],
            vec![
                Amount::from_u128(u128::from(xsgd) * 1_000_000),
                Amount::from_u128(u128::from(usdc) * 1_000_000),
            ],
        ) else {
            panic!("valid tokens");
        };
        let params = FxParams {
            alpha: per_million(800_000),
            beta: per_million(480_000),
            delta: per_million(175_000),
            epsilon: per_million(500),
            lambda: ONE,
        };
        let Ok(cfg) = FxConfig::new(PoolId::new("0xfx"), tokens, params, [per_million(750_000), ONE]) else {
            panic!("valid FX config");
        };
        let Ok(pool) = FxPool::from_config(&cfg, &SolverConfig::default()) else {
            panic!("valid FX pool");
        };
        pool
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_quote_consistency_fx(
            xsgd in 800_000u64..=1_200_000u64,
            usdc in 600_000u64..=900_000u64,
            sold in 1u64..=700_000u64,
        ) {
            let pool = make_fx(xsgd, usdc);
            let amount = Amount::from_u128(u128::from(sold) * 1_000_000);
            round_trip_within(&pool, addr(1), addr(2), amount, loose_slack(amount, 2))?;
        }

        #[test]
        fn prop_output_monotonic_fx(
            xsgd in 800_000u64..=1_200_000u64,
            usdc in 600_000u64..=900_000u64,
            sold in 1u64..=400_000u64,
        ) {
            let pool = make_fx(xsgd, usdc);
            monotonic_between(&pool, addr(1), addr(2), Amount::from_u128(u128::from(sold) * 1_000_000))?;
        }
    }
}
