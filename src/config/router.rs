//! Route proposal and optimizer settings.

use serde::{Deserialize, Serialize};

use super::SolverConfig;
use crate::error::AmmError;

/// How the per-pool cost enters the comparison between candidate plans.
///
/// The cost of a plan is `cost_per_pool * pools used`, expressed in units
/// of the token whose amount is being optimized (output for exact-in,
/// input for exact-out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CostPolicy {
    /// Compare `return - cost` (exact-in) or `return + cost` (exact-out).
    #[default]
    GasAdjusted,
    /// Compare raw returns; cost only breaks exact ties.
    TieBreakOnly,
}

/// Settings for the swap optimizer.
///
/// - `max_pools`: the largest number of paths a plan may split across.
/// - `price_iterations`: cap on the outer bisection over the shared
///   marginal price.
/// - `amount_iterations`: cap on the per-path amount search.
/// - `relative_tolerance`: `1e18`-scaled relative gap between allocated
///   and requested totals at which the price search stops.
/// - `cost_policy`: see [`CostPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizerConfig {
    pub max_pools: usize,
    pub price_iterations: u32,
    pub amount_iterations: u32,
    pub relative_tolerance: u64,
    pub cost_policy: CostPolicy,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_pools: 4,
            price_iterations: 64,
            amount_iterations: 64,
            // 1e-9
            relative_tolerance: 1_000_000_000,
            cost_policy: CostPolicy::GasAdjusted,
        }
    }
}

impl OptimizerConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `max_pools` or an
    /// iteration cap is zero.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.max_pools == 0 {
            return Err(AmmError::InvalidConfiguration("max_pools must be positive"));
        }
        if self.price_iterations == 0 || self.amount_iterations == 0 {
            return Err(AmmError::InvalidConfiguration(
                "optimizer iteration caps must be positive",
            ));
        }
        Ok(())
    }
}

/// Settings for one routing request: proposal bounds plus the optimizer
/// and solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterConfig {
    pub max_hops: usize,
    pub max_pools_per_pair: usize,
    pub max_paths: usize,
    pub optimizer: OptimizerConfig,
    pub solver: SolverConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_hops: 3,
            max_pools_per_pair: 4,
            max_paths: 16,
            optimizer: OptimizerConfig::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] for a zero bound, or the
    /// nested optimizer/solver error.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.max_hops == 0 || self.max_pools_per_pair == 0 || self.max_paths == 0 {
            return Err(AmmError::InvalidConfiguration(
                "route bounds must be positive",
            ));
        }
        self.optimizer.validate()?;
        self.solver.validate()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = RouterConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.optimizer.cost_policy, CostPolicy::GasAdjusted);
    }

    #[test]
    fn zero_hops_rejected() {
        let cfg = RouterConfig {
            max_hops: 0,
            ..RouterConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(AmmError::InvalidConfiguration(_))));
    }

    #[test]
    fn nested_json() {
        let json = r#"{"maxHops": 2, "optimizer": {"costPolicy": "tieBreakOnly", "maxPools": 2}}"#;
        let Ok(cfg) = serde_json::from_str::<RouterConfig>(json) else {
            panic!("expected Ok");
        };
        assert_eq!(cfg.max_hops, 2);
        assert_eq!(cfg.optimizer.max_pools, 2);
        assert_eq!(cfg.optimizer.cost_policy, CostPolicy::TieBreakOnly);
        assert_eq!(cfg.solver, SolverConfig::default());
    }
}
