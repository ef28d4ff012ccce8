//! Arithmetic utilities for pool math.
//!
//! - [`fixed_point`]: the 18-decimal unsigned kernel every pool rounds
//!   through (`mul_down`/`mul_up`/`div_down`/`div_up`/`pow_*`).
//! - [`log_exp`]: `exp`/`ln`/`pow` used by fractional powers.
//! - [`signed_fixed_point`]: signed 18/38-decimal helpers for the elliptic
//!   pools.
//! - [`div_round`] for plain integer quantities.

pub mod fixed_point;
pub mod log_exp;
mod rounding;
pub mod signed_fixed_point;

pub use rounding::div_round;
