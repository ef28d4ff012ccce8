//! Token/pool adjacency over a snapshot.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::domain::TokenAddress;
use crate::pools::PoolBox;
use crate::traits::SwapPool;

/// Undirected token graph: two tokens are adjacent when some pool holds
/// both.  Pools are referenced by their index in the snapshot.
///
/// Ordered maps keep neighbour and pool iteration deterministic, so the
/// same snapshot always yields the same candidate paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolGraph {
    neighbours: BTreeMap<TokenAddress, BTreeSet<TokenAddress>>,
    pairs: BTreeMap<(TokenAddress, TokenAddress), Vec<usize>>,
}

impl PoolGraph {
    /// Builds the graph; every ordered pair of distinct tokens inside a
    /// pool is an edge.
    #[must_use]
    pub fn build(pools: &[PoolBox]) -> Self {
        let mut graph = Self::default();
        for (index, pool) in pools.iter().enumerate() {
            let tokens = pool.tokens();
            for a in tokens {
                for b in tokens {
                    if a.address() == b.address() {
                        continue;
                    }
                    graph.neighbours.entry(a.address()).or_default().insert(b.address());
                    graph.pairs.entry((a.address(), b.address())).or_default().push(index);
                }
            }
        }
        debug!(tokens = graph.neighbours.len(), edges = graph.pairs.len(), "pool graph built");
        graph
    }

    /// Tokens sharing at least one pool with `token`, in address order.
    pub fn neighbours(&self, token: TokenAddress) -> impl Iterator<Item = TokenAddress> + '_ {
        self.neighbours.get(&token).into_iter().flatten().copied()
    }

    /// Snapshot indices of the pools trading `token_in` for `token_out`.
    #[must_use]
    pub fn pools_between(&self, token_in: TokenAddress, token_out: TokenAddress) -> &[usize] {
        self.pairs.get(&(token_in, token_out)).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains_token(&self, token: TokenAddress) -> bool {
        self.neighbours.contains_key(&token)
    }

    #[must_use]
    pub fn token_count(&self) -> usize {
        self.neighbours.len()
    }

    /// Number of directed token pairs with at least one pool.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.pairs.len()
    }
}
