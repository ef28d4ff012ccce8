//! Fundamental domain value types used throughout the router.
//!
//! This module contains the core value types of a routing request: tokens,
//! raw amounts, fees, pool identity, trade direction and the resulting
//! swap plan.  All types use newtypes with validated constructors to
//! enforce invariants.

mod amount;
mod decimals;
mod pool_id;
mod pool_type;
mod rounding;
mod swap_fee;
mod swap_plan;
mod swap_type;
mod token;
mod token_address;

pub use amount::Amount;
pub use decimals::Decimals;
pub use pool_id::PoolId;
pub use pool_type::PoolType;
pub use rounding::Rounding;
pub use swap_fee::SwapFee;
pub use swap_plan::{BatchSwap, BatchSwapStep, HopAmount, PlanStatus, RouteAllocation, SwapPlan};
pub use swap_type::SwapType;
pub use token::Token;
pub use token_address::TokenAddress;
