//! # Hydra SOR
//!
//! Smart order router core for Balancer-family pools: exact fixed-point
//! pool math, route proposal over a pool graph, and multi-path swap
//! optimisation by marginal-price equalisation.
//!
//! The crate is a pure library.  It takes an immutable [`PoolSnapshot`]
//! (built from configuration or a JSON pool list) and a [`SwapRequest`],
//! and returns a [`SwapPlan`]: which paths to use, how much to send down
//! each, and what comes out.  Fetching pool state, refreshing it and
//! submitting transactions are left to the host.
//!
//! # Pool Families
//!
//! - **Weighted** (Weighted, LBP, Investment): `weighted` feature
//! - **Stable** (Stable, MetaStable, PhantomStable, ComposableStable):
//!   `stable` feature
//! - **Linear** (Aave/ERC4626-style wrapped-token pools): `linear` feature
//! - **Gyro** (2-CLP, 3-CLP, E-CLP): `gyro` feature
//! - **FX** (oracle-rate micro-fee curve): `fx` feature
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `all-pools` | yes | Enables every pool family |
//! | `weighted`, `stable`, `linear`, `gyro`, `fx` | via `all-pools` | One family each |
//!
//! A snapshot record for a family whose feature is disabled is skipped at
//! snapshot construction, like any other unusable pool.
//!
//! # Quick Start
//!
//! ```rust
//! use hydra_sor::config::{RouterConfig, SolverConfig};
//! use hydra_sor::domain::{Amount, SwapType, TokenAddress};
//! use hydra_sor::pools::PoolSnapshot;
//! use hydra_sor::router::{route, SwapRequest};
//!
//! // 1. Load pool state
//! let json = r#"[{
//!     "id": "0xdai-weth",
//!     "address": "0x0000000000000000000000000000000000000b01",
//!     "poolType": "Weighted",
//!     "swapFee": "0.0025",
//!     "tokens": [
//!         {"address": "0x6b175474e89094c44da98b954eedeac495271d0f", "balance": "1000000", "decimals": 18, "weight": "0.5"},
//!         {"address": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", "balance": "500", "decimals": 18, "weight": "0.5"}
//!     ]
//! }]"#;
//! let snapshot = PoolSnapshot::from_json(json, &SolverConfig::default()).expect("valid snapshot");
//!
//! // 2. Sell 1 WETH for DAI
//! let weth: TokenAddress = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".parse().expect("hex");
//! let dai: TokenAddress = "0x6b175474e89094c44da98b954eedeac495271d0f".parse().expect("hex");
//! let request = SwapRequest {
//!     token_in: weth,
//!     token_out: dai,
//!     swap_type: SwapType::ExactIn,
//!     amount: Amount::from_u128(1_000_000_000_000_000_000),
//!     cost_per_pool: Amount::ZERO,
//! };
//! let plan = route(&snapshot, &request, &RouterConfig::default()).expect("valid request");
//!
//! // 3. Roughly 2000 DAI, minus fee and price impact
//! assert!(plan.is_routed());
//! assert!(plan.return_amount.get() > Amount::from_u128(1_980 * 10u128.pow(18)).get());
//! let batch = plan.to_batch_swap();
//! assert_eq!(batch.swaps.len(), 1);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ PoolRecord / │  JSON pool list or typed PoolConfig values
//! │  PoolConfig  │
//! └──────┬───────┘
//!        │ DefaultPoolFactory::create
//!        ▼
//! ┌──────────────┐
//! │ PoolSnapshot │  immutable Vec<PoolBox> + id index + lazy PoolGraph
//! └──────┬───────┘
//!        │ RouteProposer::propose_routes
//!        ▼
//! ┌──────────────┐
//! │    Paths     │  ranked hop sequences with capacities
//! └──────┬───────┘
//!        │ SwapOptimizer::optimize
//!        ▼
//! ┌──────────────┐
//! │   SwapPlan   │  per-path allocations, batch-swap layout
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`Token`](domain::Token), [`SwapFee`](domain::SwapFee), [`SwapPlan`](domain::SwapPlan), etc. |
//! | [`traits`] | [`SwapPool`](traits::SwapPool), the capability set every pool exposes, and [`FromConfig`](traits::FromConfig) |
//! | [`config`] | [`PoolConfig`](config::PoolConfig), [`PoolRecord`](config::PoolRecord), solver and router settings |
//! | [`pools`]  | Pool families, [`PoolBox`](pools::PoolBox) dispatch and [`PoolSnapshot`](pools::PoolSnapshot) |
//! | [`factory`] | [`DefaultPoolFactory`](factory::DefaultPoolFactory) for config-driven pool construction |
//! | [`router`] | Pool graph, path math, route proposer, swap optimizer |
//! | [`math`]   | 18-decimal fixed-point kernel, `ln`/`exp`, signed helpers |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (`warn!` for pools skipped while
//! building a snapshot, `debug!` for routing decisions, `trace!` for
//! solver iterations) and never installs a subscriber.
//!
//! [`PoolSnapshot`]: pools::PoolSnapshot
//! [`SwapRequest`]: router::SwapRequest
//! [`SwapPlan`]: domain::SwapPlan

pub mod config;
pub mod domain;
pub mod error;
pub mod factory;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod router;
pub mod traits;

#[cfg(test)]
#[allow(clippy::panic)]
mod test_support;
