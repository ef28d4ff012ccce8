//! Unified error types for the Hydra SOR library.
//!
//! All fallible operations across the crate return `AmmError` as their
//! error type, ensuring a consistent error handling experience for consumers.
//!
//! # Recoverability
//!
//! Almost every variant describes a pool that cannot serve a particular
//! trade: numeric domain errors, solver non-convergence, exhausted asset
//! bounds or degenerate parameters.  The router recovers from those by
//! excluding the pool (or path) from consideration.  Only snapshot-level
//! failures ([`AmmError::CorruptSnapshot`], [`AmmError::Serialization`])
//! are fatal; see [`AmmError::is_fatal`].

use thiserror::Error;

/// Unified error enum for every fallible operation in the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// Arithmetic overflow in a checked operation.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow in a checked subtraction.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A pool or router configuration violates a structural invariant.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A token is not part of the pool, or the token pair is invalid.
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// The swap fee is outside `[0, 1)`.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// Pool weights are zero or do not sum to one.
    #[error("invalid weight: {0}")]
    InvalidWeight(&'static str),

    /// An amount is outside the range a computation accepts.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// A price or rate is zero or malformed.
    #[error("invalid price: {0}")]
    InvalidPrice(&'static str),

    /// Token decimals exceed the supported range.
    #[error("invalid precision: {0}")]
    InvalidPrecision(&'static str),

    /// A pool balance required by the computation is zero.
    #[error("zero reserve")]
    ZeroReserve,

    /// The trade exceeds the pool's safe capacity.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// An iterative solver hit its iteration cap before converging.
    #[error("solver did not converge: {0}")]
    NewtonRaphsonNonConvergence(&'static str),

    /// The trade would push a balance outside the curve's supported region.
    #[error("asset bounds exceeded")]
    AssetBoundsExceeded,

    /// Pool parameters sit in a numerically degenerate region.
    #[error("degenerate pool parameters: {0}")]
    DegenerateParameters(&'static str),

    /// A `log_exp` operand is outside the supported exponent range.
    #[error("exponent out of bounds: {0}")]
    ExponentOutOfBounds(&'static str),

    /// The pool family does not provide the requested quantity.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// The snapshot itself is inconsistent (e.g. negative balances).
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(&'static str),

    /// A snapshot or configuration document failed to parse.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AmmError {
    /// Returns `true` when the error must be surfaced to the caller instead
    /// of being handled by excluding the offending pool or path.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::CorruptSnapshot(_) | Self::Serialization(_))
    }
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_snapshot_errors_are_fatal() {
        assert!(AmmError::CorruptSnapshot("negative balance").is_fatal());
        assert!(AmmError::Serialization("bad json".to_string()).is_fatal());
        assert!(!AmmError::NewtonRaphsonNonConvergence("stable").is_fatal());
        assert!(!AmmError::AssetBoundsExceeded.is_fatal());
        assert!(!AmmError::Overflow("mul").is_fatal());
    }

    #[test]
    fn display_includes_context() {
        let msg = format!("{}", AmmError::Overflow("mul_down"));
        assert!(msg.contains("mul_down"));
        assert_eq!(format!("{}", AmmError::DivisionByZero), "division by zero");
    }
}
