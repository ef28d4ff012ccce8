//! Iteration caps and tolerances for the pool solvers.

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// Numeric solver settings shared by every iterative pool family.
///
/// - `max_iterations` bounds the stable invariant and balance solvers and
///   the Gyro3 cubic.
/// - `convergence_tolerance` is the absolute difference (in `1e18` units)
///   between successive iterates that counts as converged.
/// - `fx_max_iterations` bounds the FX trade solver, which converges on a
///   coarser criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverConfig {
    pub max_iterations: u32,
    pub convergence_tolerance: u64,
    pub fx_max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 255,
            convergence_tolerance: 1,
            fx_max_iterations: 32,
        }
    }
}

impl SolverConfig {
    /// Creates a validated solver configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if an iteration cap is
    /// zero.
    pub fn new(
        max_iterations: u32,
        convergence_tolerance: u64,
        fx_max_iterations: u32,
    ) -> Result<Self, AmmError> {
        let config = Self {
            max_iterations,
            convergence_tolerance,
            fx_max_iterations,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// See [`SolverConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.max_iterations == 0 || self.fx_max_iterations == 0 {
            return Err(AmmError::InvalidConfiguration(
                "solver iteration caps must be positive",
            ));
        }
        Ok(())
    }
}
