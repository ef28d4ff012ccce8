//! Core trait abstractions for pool operations.
//!
//! [`SwapPool`] is the uniform capability set every pool family exposes to
//! the router; [`FromConfig`] is configuration-driven construction.

mod from_config;
mod swap_pool;

pub use from_config::FromConfig;
pub use swap_pool::SwapPool;
