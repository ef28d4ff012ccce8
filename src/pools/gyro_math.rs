//! Constant-product math on virtual reserves, shared by the 2-CLP and
//! 3-CLP pools.
//!
//! Both pools trade a pair as `x' · y' = const` where `x' = x + offset_x`
//! and `y' = y + offset_y`; the offsets derive from the invariant and the
//! price range.  Real balances may never go negative, so an output above
//! the real balance is [`AmmError::AssetBoundsExceeded`].

use alloy_primitives::U256;

use crate::domain::{SwapFee, SwapType};
use crate::error::AmmError;
use crate::math::fixed_point::{self, TWO};

/// One trading direction on the virtual curve, in the scaled domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VirtualPair {
    pub(crate) balance_in: U256,
    pub(crate) balance_out: U256,
    pub(crate) offset_in: U256,
    pub(crate) offset_out: U256,
}

impl VirtualPair {
    fn virtual_in(&self) -> Result<U256, AmmError> {
        fixed_point::add(self.balance_in, self.offset_in)
    }

    fn virtual_out(&self) -> Result<U256, AmmError> {
        fixed_point::add(self.balance_out, self.offset_out)
    }

    /// `y' · a / (x' + a)`, rounded down.
    pub(crate) fn out_given_in(&self, amount_in: U256) -> Result<U256, AmmError> {
        let x = self.virtual_in()?;
        let y = self.virtual_out()?;
        let out = fixed_point::div_down(fixed_point::mul_down(y, amount_in)?, fixed_point::add(x, amount_in)?)?;
        if out > self.balance_out {
            return Err(AmmError::AssetBoundsExceeded);
        }
        Ok(out)
    }

    /// `x' · b / (y' - b)`, rounded up.
    pub(crate) fn in_given_out(&self, amount_out: U256) -> Result<U256, AmmError> {
        if amount_out > self.balance_out {
            return Err(AmmError::AssetBoundsExceeded);
        }
        let x = self.virtual_in()?;
        let y = self.virtual_out()?;
        fixed_point::div_up(fixed_point::mul_up(x, amount_out)?, fixed_point::sub(y, amount_out)?)
    }

    /// Virtual reserves after a swap of `amount` (gross of fee).
    fn after(&self, fee: SwapFee, amount: U256, swap_type: SwapType) -> Result<(U256, U256), AmmError> {
        let x = self.virtual_in()?;
        let y = self.virtual_out()?;
        if amount.is_zero() {
            return Ok((x, y));
        }
        match swap_type {
            SwapType::ExactIn => {
                let net = fee.subtract_from(amount)?;
                let out = self.out_given_in(net)?;
                Ok((fixed_point::add(x, net)?, fixed_point::sub(y, out)?))
            }
            SwapType::ExactOut => {
                let needed = self.in_given_out(amount)?;
                Ok((fixed_point::add(x, needed)?, fixed_point::sub(y, amount)?))
            }
        }
    }

    /// `x' / (y' · (1 - f))` after the swap.
    pub(crate) fn price_after(&self, fee: SwapFee, amount: U256, swap_type: SwapType) -> Result<U256, AmmError> {
        let (x, y) = self.after(fee, amount, swap_type)?;
        fixed_point::div_down(x, fixed_point::mul_down(y, fee.complement())?)
    }

    /// Exact-in: `2 / y'`.  Exact-out: `2 x' / (y'² (1 - f))`.
    pub(crate) fn derivative_after(&self, fee: SwapFee, amount: U256, swap_type: SwapType) -> Result<U256, AmmError> {
        let (x, y) = self.after(fee, amount, swap_type)?;
        match swap_type {
            SwapType::ExactIn => fixed_point::div_down(TWO, y),
            SwapType::ExactOut => {
                let denominator = fixed_point::mul_down(fixed_point::mul_down(y, y)?, fee.complement())?;
                fixed_point::div_down(fixed_point::mul_down(TWO, x)?, denominator)
            }
        }
    }
}
