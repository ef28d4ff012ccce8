//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use hydra_sor::prelude::*;
//! ```
//!
//! Brings the request and plan types, the snapshot, the router entry
//! points and the pool traits into scope in one import.

pub use crate::domain::{
    Amount, Decimals, PlanStatus, PoolId, PoolType, Rounding, SwapFee, SwapPlan, SwapType, Token,
    TokenAddress,
};

pub use crate::traits::{FromConfig, SwapPool};

pub use crate::config::{CostPolicy, OptimizerConfig, PoolConfig, RouterConfig, SolverConfig};

pub use crate::error::{AmmError, Result};

pub use crate::factory::DefaultPoolFactory;

pub use crate::pools::{PoolBox, PoolSnapshot};

pub use crate::router::{route, RouteProposer, SwapOptimizer, SwapRequest};
