//! Candidate path enumeration.

use std::collections::HashSet;

use alloy_primitives::U256;
use tracing::{debug, trace};

use super::path::{Hop, Path};
use crate::config::RouterConfig;
use crate::domain::{SwapType, TokenAddress};
use crate::pools::PoolSnapshot;
use crate::traits::SwapPool;

/// Bounds on path enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOptions {
    /// Longest path, in pools.
    pub max_hops: usize,
    /// Pools kept per token pair, most liquid first.
    pub max_pools_per_pair: usize,
    /// Paths returned.
    pub max_paths: usize,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self::from(&RouterConfig::default())
    }
}

impl From<&RouterConfig> for RouteOptions {
    fn from(config: &RouterConfig) -> Self {
        Self {
            max_hops: config.max_hops,
            max_pools_per_pair: config.max_pools_per_pair,
            max_paths: config.max_paths,
        }
    }
}

/// Enumerates and ranks the paths between two tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteProposer;

impl RouteProposer {
    /// Candidate paths from `token_in` to `token_out`, best first.
    ///
    /// Token walks never revisit a token.  Each step of a walk keeps the
    /// `max_pools_per_pair` pools with the highest normalized liquidity;
    /// pool sequences that repeat a pool or duplicate an earlier sequence
    /// are dropped, and so is any path whose capacity cannot be computed
    /// or is zero.  Paths are ordered by capacity (descending), then hop
    /// count, then id.
    #[must_use]
    pub fn propose_routes(
        snapshot: &PoolSnapshot,
        token_in: TokenAddress,
        token_out: TokenAddress,
        swap_type: SwapType,
        options: &RouteOptions,
    ) -> Vec<Path> {
        if token_in == token_out || options.max_hops == 0 {
            return Vec::new();
        }
        let graph = snapshot.graph();
        if !graph.contains_token(token_in) || !graph.contains_token(token_out) {
            debug!(%token_in, %token_out, "token not in snapshot");
            return Vec::new();
        }

        let mut walks = Vec::new();
        let mut walk = vec![token_in];
        collect_walks(snapshot, token_out, options.max_hops, &mut walk, &mut walks);

        let mut seen = HashSet::new();
        let mut paths = Vec::new();
        for walk in &walks {
            for path in expand_walk(snapshot, walk, options.max_pools_per_pair) {
                if path.repeats_pool() || !seen.insert(path.pool_sequence()) {
                    continue;
                }
                match path.compute_limit(snapshot, swap_type) {
                    Ok(limit) if !limit.is_zero() => paths.push(path.with_limit(limit)),
                    Ok(_) => trace!(path = path.id(), "zero capacity path dropped"),
                    Err(err) => trace!(path = path.id(), %err, "path dropped"),
                }
            }
        }

        paths.sort_by(|a, b| {
            b.limit()
                .cmp(&a.limit())
                .then(a.hop_count().cmp(&b.hop_count()))
                .then_with(|| a.id().cmp(b.id()))
        });
        paths.truncate(options.max_paths);
        debug!(walks = walks.len(), paths = paths.len(), "routes proposed");
        paths
    }
}

/// Depth-first token walks from the last token of `walk` to `target`.
fn collect_walks(
    snapshot: &PoolSnapshot,
    target: TokenAddress,
    hops_left: usize,
    walk: &mut Vec<TokenAddress>,
    out: &mut Vec<Vec<TokenAddress>>,
) {
    let Some(&current) = walk.last() else {
        return;
    };
    if hops_left == 0 {
        return;
    }
    for next in snapshot.graph().neighbours(current) {
        if walk.contains(&next) {
            continue;
        }
        walk.push(next);
        if next == target {
            out.push(walk.clone());
        } else {
            collect_walks(snapshot, target, hops_left - 1, walk, out);
        }
        walk.pop();
    }
}

/// The most liquid pools for one step of a walk, best first.
fn best_pools(snapshot: &PoolSnapshot, token_in: TokenAddress, token_out: TokenAddress, keep: usize) -> Vec<Hop> {
    let mut ranked: Vec<(U256, Hop)> = snapshot
        .graph()
        .pools_between(token_in, token_out)
        .iter()
        .filter_map(|&index| {
            let pool = snapshot.pool(index)?;
            let liquidity = pool.normalized_liquidity(token_in, token_out).ok()?;
            Some((
                liquidity,
                Hop {
                    pool: index,
                    pool_id: pool.id().clone(),
                    token_in,
                    token_out,
                },
            ))
        })
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.pool_id.cmp(&b.1.pool_id)));
    ranked.into_iter().take(keep).map(|(_, hop)| hop).collect()
}

/// Every pool sequence along a token walk.
fn expand_walk(snapshot: &PoolSnapshot, walk: &[TokenAddress], keep: usize) -> Vec<Path> {
    let mut sequences: Vec<Vec<Hop>> = vec![Vec::new()];
    for pair in walk.windows(2) {
        let [token_in, token_out] = pair else {
            continue;
        };
        let choices = best_pools(snapshot, *token_in, *token_out, keep);
        let mut next = Vec::with_capacity(sequences.len() * choices.len());
        for sequence in &sequences {
            for hop in &choices {
                let mut extended = sequence.clone();
                extended.push(hop.clone());
                next.push(extended);
            }
        }
        sequences = next;
    }
    sequences.into_iter().filter(|s| !s.is_empty()).map(Path::new).collect()
}

#[cfg(all(test, feature = "weighted"))]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::{PoolTokens, SolverConfig, WeightedConfig};
    use crate::domain::{Amount, PoolId, SwapFee};
    use crate::math::fixed_point::ONE;
    use crate::pools::{PoolBox, WeightedPool};
    use crate::test_support::{addr, token};
    use crate::traits::FromConfig;

    fn e18(units: u64) -> U256 {
        U256::from(units) * ONE
    }

    fn weighted(id: &str, a: u8, b: u8, balances: [u64; 2]) -> PoolBox {
        let Ok(t) = PoolTokens::with_unit_rates(
            vec![token(a, 18), token(b, 18)],
            vec![Amount::new(e18(balances[0])), Amount::new(e18(balances[1]))],
        ) else {
            panic!("valid tokens");
        };
        let Ok(fee) = SwapFee::from_decimal_str("0.003") else {
            panic!("valid fee");
        };
        let Ok(cfg) = WeightedConfig::new(PoolId::new(id), t, vec![e18(1) / U256::from(2u64); 2], fee) else {
            panic!("valid config");
        };
        let Ok(pool) = WeightedPool::from_config(&cfg, &SolverConfig::default()) else {
            panic!("valid pool");
        };
        PoolBox::Weighted(Box::new(pool))
    }

    // 1 -> 3 direct (small), 1 -> 2 -> 3 (large), and a second 1/2 pool.
    fn snapshot() -> PoolSnapshot {
        PoolSnapshot::from_pools(
            1,
            vec![
                weighted("0xdirect", 1, 3, [100, 100]),
                weighted("0xab", 1, 2, [10_000, 10_000]),
                weighted("0xbc", 2, 3, [10_000, 10_000]),
                weighted("0xab2", 1, 2, [50, 50]),
            ],
        )
    }

    #[test]
    fn finds_direct_and_multi_hop_paths() {
        let paths = RouteProposer::propose_routes(&snapshot(), addr(1), addr(3), SwapType::ExactIn, &RouteOptions::default());
        let ids: Vec<&str> = paths.iter().map(Path::id).collect();
        assert_eq!(ids, vec!["0xab/0xbc", "0xdirect", "0xab2/0xbc"]);
        assert!(paths.windows(2).all(|w| w[0].limit() >= w[1].limit()));
    }

    #[test]
    fn max_hops_bounds_walks() {
        let options = RouteOptions {
            max_hops: 1,
            ..RouteOptions::default()
        };
        let paths = RouteProposer::propose_routes(&snapshot(), addr(1), addr(3), SwapType::ExactIn, &options);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].id(), "0xdirect");
    }

    #[test]
    fn pools_per_pair_keeps_most_liquid() {
        let options = RouteOptions {
            max_pools_per_pair: 1,
            ..RouteOptions::default()
        };
        let paths = RouteProposer::propose_routes(&snapshot(), addr(1), addr(3), SwapType::ExactOut, &options);
        assert!(paths.iter().all(|p| p.id() != "0xab2/0xbc"));
    }

    #[test]
    fn duplicates_are_keyed_on_pools_not_ids() {
        // A direct pool whose id reads like the two-hop sequence.
        let snap = PoolSnapshot::from_pools(
            1,
            vec![
                weighted("0xa/0xb", 1, 3, [1_000, 1_000]),
                weighted("0xa", 1, 2, [1_000, 1_000]),
                weighted("0xb", 2, 3, [1_000, 1_000]),
            ],
        );
        let paths = RouteProposer::propose_routes(&snap, addr(1), addr(3), SwapType::ExactIn, &RouteOptions::default());
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.id() == "0xa/0xb"));
        assert_ne!(paths[0].pool_sequence(), paths[1].pool_sequence());
    }

    #[test]
    fn max_paths_truncates() {
        let options = RouteOptions {
            max_paths: 2,
            ..RouteOptions::default()
        };
        assert_eq!(
            RouteProposer::propose_routes(&snapshot(), addr(1), addr(3), SwapType::ExactIn, &options).len(),
            2
        );
    }

    #[test]
    fn unknown_or_identical_tokens_yield_nothing() {
        let snap = snapshot();
        let options = RouteOptions::default();
        assert!(RouteProposer::propose_routes(&snap, addr(1), addr(9), SwapType::ExactIn, &options).is_empty());
        assert!(RouteProposer::propose_routes(&snap, addr(1), addr(1), SwapType::ExactIn, &options).is_empty());
    }
}
