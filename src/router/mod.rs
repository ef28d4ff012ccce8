//! Route proposal and swap optimisation over a [`PoolSnapshot`].
//!
//! Routing runs in two stages:
//!
//! 1. [`RouteProposer`] walks the snapshot's [`PoolGraph`] and returns
//!    ranked candidate [`Path`]s with their capacities.
//! 2. [`SwapOptimizer`] splits the requested amount across the best of
//!    them and produces a [`SwapPlan`].
//!
//! [`route`] runs both for one [`SwapRequest`].
//!
//! # Example
//!
//! ```
//! use hydra_sor::config::{RouterConfig, SolverConfig};
//! use hydra_sor::domain::{Amount, PlanStatus, SwapType, TokenAddress};
//! use hydra_sor::pools::PoolSnapshot;
//! use hydra_sor::router::{route, SwapRequest};
//!
//! let json = r#"[{
//!     "id": "0xpool",
//!     "address": "0x0000000000000000000000000000000000000a01",
//!     "poolType": "Weighted",
//!     "swapFee": "0.003",
//!     "tokens": [
//!         {"address": "0x0101010101010101010101010101010101010101", "balance": "1000", "decimals": 18, "weight": "0.5"},
//!         {"address": "0x0202020202020202020202020202020202020202", "balance": "1000", "decimals": 18, "weight": "0.5"}
//!     ]
//! }]"#;
//! let snapshot = PoolSnapshot::from_json(json, &SolverConfig::default()).expect("valid snapshot");
//! let request = SwapRequest {
//!     token_in: TokenAddress::from_bytes([1; 20]),
//!     token_out: TokenAddress::from_bytes([2; 20]),
//!     swap_type: SwapType::ExactIn,
//!     amount: Amount::from_u128(1_000_000_000_000_000_000),
//!     cost_per_pool: Amount::ZERO,
//! };
//! let plan = route(&snapshot, &request, &RouterConfig::default()).expect("valid request");
//! assert_eq!(plan.status, PlanStatus::Routed);
//! assert!(!plan.return_amount.is_zero());
//! ```

mod graph;
mod optimizer;
mod path;
mod proposer;

pub use graph::PoolGraph;
pub use optimizer::SwapOptimizer;
pub use path::{Hop, Path};
pub use proposer::{RouteOptions, RouteProposer};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RouterConfig;
use crate::domain::{Amount, PlanStatus, SwapPlan, SwapType, TokenAddress};
use crate::error::AmmError;
use crate::pools::PoolSnapshot;

/// One quote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub token_in: TokenAddress,
    pub token_out: TokenAddress,
    pub swap_type: SwapType,
    /// Input amount for exact-in, output amount for exact-out, raw.
    pub amount: Amount,
    /// Cost of traversing one pool, in raw units of the return token
    /// (output for exact-in, input for exact-out).
    #[serde(default)]
    pub cost_per_pool: Amount,
}

/// Proposes paths for `request` and optimises the split across them.
///
/// # Errors
///
/// - [`AmmError::InvalidConfiguration`] if `config` fails validation.
/// - [`AmmError::InvalidToken`] if both tokens are the same.
///
/// Unroutable requests are not errors; they come back as a plan with
/// [`PlanStatus::NoRoute`] or [`PlanStatus::Infeasible`].
pub fn route(snapshot: &PoolSnapshot, request: &SwapRequest, config: &RouterConfig) -> Result<SwapPlan, AmmError> {
    config.validate()?;
    if request.token_in == request.token_out {
        return Err(AmmError::InvalidToken("token_in and token_out must differ"));
    }
    if request.amount.is_zero() {
        return Ok(SwapPlan::empty(
            request.swap_type,
            request.token_in,
            request.token_out,
            request.amount,
            PlanStatus::ZeroAmount,
        ));
    }
    let paths = RouteProposer::propose_routes(
        snapshot,
        request.token_in,
        request.token_out,
        request.swap_type,
        &RouteOptions::from(config),
    );
    let plan = SwapOptimizer::new(config.optimizer).optimize(snapshot, &paths, request);
    debug!(
        version = snapshot.version(),
        candidates = paths.len(),
        status = ?plan.status,
        return_amount = %plan.return_amount,
        "request routed"
    );
    Ok(plan)
}
