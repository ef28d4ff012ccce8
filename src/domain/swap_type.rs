//! Trade direction.

use serde::{Deserialize, Serialize};

/// Which side of a trade is fixed.
///
/// # Examples
///
/// ```
/// use hydra_sor::domain::SwapType;
///
/// assert!(SwapType::ExactIn.is_exact_in());
/// assert_eq!(SwapType::default(), SwapType::ExactIn);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapType {
    /// The input amount is given; the output is maximised.
    #[default]
    ExactIn,
    /// The output amount is given; the input is minimised.
    ExactOut,
}

impl SwapType {
    /// Returns `true` for [`SwapType::ExactIn`].
    #[must_use]
    pub const fn is_exact_in(&self) -> bool {
        matches!(self, Self::ExactIn)
    }

    /// Returns `true` for [`SwapType::ExactOut`].
    #[must_use]
    pub const fn is_exact_out(&self) -> bool {
        matches!(self, Self::ExactOut)
    }
}
