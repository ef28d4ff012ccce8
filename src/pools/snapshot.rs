//! Immutable, versioned pool snapshots.
//!
//! A [`PoolSnapshot`] is the only input the router reads pool state from.
//! It is built once from configuration (or a JSON record list), never
//! mutated, and may be shared by any number of concurrent quotes.  Hosts
//! refreshing pool state build a new snapshot with a higher version and
//! swap it in; the router never sees a partially refreshed state.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::{debug, warn};

use super::PoolBox;
use crate::config::{PoolConfig, PoolRecord, SolverConfig};
use crate::domain::{PoolId, Token, TokenAddress};
use crate::error::AmmError;
use crate::factory::DefaultPoolFactory;
use crate::router::PoolGraph;
use crate::traits::SwapPool;

/// An immutable set of pools plus an id index and a lazily built graph.
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    version: u64,
    pools: Vec<PoolBox>,
    index: HashMap<PoolId, usize>,
    graph: OnceLock<PoolGraph>,
}

impl PoolSnapshot {
    /// Wraps already constructed pools.  A pool whose id repeats an
    /// earlier one is dropped.
    #[must_use]
    pub fn from_pools(version: u64, pools: Vec<PoolBox>) -> Self {
        let mut kept = Vec::with_capacity(pools.len());
        let mut index = HashMap::with_capacity(pools.len());
        for pool in pools {
            if index.contains_key(pool.id()) {
                warn!(pool = %pool.id(), "duplicate pool id skipped");
                continue;
            }
            index.insert(pool.id().clone(), kept.len());
            kept.push(pool);
        }
        Self {
            version,
            pools: kept,
            index,
            graph: OnceLock::new(),
        }
    }

    /// Builds every pool through [`DefaultPoolFactory`].
    ///
    /// Pools that fail construction (zero balances, degenerate parameters,
    /// disabled families) are skipped with a `warn!` event.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error (see [`AmmError::is_fatal`]).
    pub fn new(version: u64, configs: &[PoolConfig], solver: &SolverConfig) -> Result<Self, AmmError> {
        let mut pools = Vec::with_capacity(configs.len());
        for config in configs {
            if let Some(pool) = admit(config.id(), DefaultPoolFactory::create(config, solver))? {
                pools.push(pool);
            }
        }
        debug!(version, requested = configs.len(), built = pools.len(), "snapshot built");
        Ok(Self::from_pools(version, pools))
    }

    /// Converts wire records and builds the snapshot.
    ///
    /// # Errors
    ///
    /// - [`AmmError::CorruptSnapshot`] if a record carries a negative
    ///   balance.
    /// - Any other fatal error; recoverable record errors skip the pool.
    pub fn from_records(version: u64, records: &[PoolRecord], solver: &SolverConfig) -> Result<Self, AmmError> {
        let mut configs = Vec::with_capacity(records.len());
        for record in records {
            match record.to_config() {
                Ok(config) => configs.push(config),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => warn!(pool = %record.id, %err, "pool record skipped"),
            }
        }
        Self::new(version, &configs, solver)
    }

    /// Parses a JSON array of pool records into a version-0 snapshot.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Serialization`] for malformed JSON.
    /// - See [`PoolSnapshot::from_records`].
    pub fn from_json(json: &str, solver: &SolverConfig) -> Result<Self, AmmError> {
        let records: Vec<PoolRecord> =
            serde_json::from_str(json).map_err(|e| AmmError::Serialization(e.to_string()))?;
        Self::from_records(0, &records, solver)
    }

    /// Returns a copy of the snapshot tagged with `version`.
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn pools(&self) -> &[PoolBox] {
        &self.pools
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Pool at `index` in snapshot order.
    #[must_use]
    pub fn pool(&self, index: usize) -> Option<&PoolBox> {
        self.pools.get(index)
    }

    /// Pool with the given id.
    #[must_use]
    pub fn get(&self, id: &PoolId) -> Option<&PoolBox> {
        self.index.get(id).and_then(|&i| self.pools.get(i))
    }

    /// Snapshot index of the pool with the given id.
    #[must_use]
    pub fn index_of(&self, id: &PoolId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// The first token record with this address across all pools.
    #[must_use]
    pub fn token(&self, address: TokenAddress) -> Option<Token> {
        self.pools
            .iter()
            .flat_map(|p| p.tokens().iter())
            .find(|t| t.address() == address)
            .copied()
    }

    /// Token/pool graph, built on first use.
    pub fn graph(&self) -> &PoolGraph {
        self.graph.get_or_init(|| PoolGraph::build(&self.pools))
    }
}

/// Keeps a built pool, skips a recoverable failure, aborts on a fatal one.
fn admit(id: &PoolId, built: Result<PoolBox, AmmError>) -> Result<Option<PoolBox>, AmmError> {
    match built {
        Ok(pool) => Ok(Some(pool)),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            warn!(pool = %id, %err, "pool skipped");
            Ok(None)
        }
    }
}
