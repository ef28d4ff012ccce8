//! Scaling between raw token amounts and the `1e18` pool-math domain.

use alloy_primitives::{uint, U256};

use crate::config::PoolTokens;
use crate::domain::{Amount, Rounding, SwapType, Token, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point::{self, ONE};

/// 99% of a balance, the largest exact-out trade offered.
pub(crate) const MAX_OUT_RATIO: U256 = uint!(990_000_000_000_000_000_U256);

/// A pool's tokens with their balances lifted into the `1e18` domain.
///
/// The scaling factor of token `i` is `10^(18 - decimals) * rate`, held as
/// a `1e18` fixed-point value; a raw amount is upscaled with `mul_down`
/// and results are downscaled with `div_down` (outputs) or `div_up`
/// (required inputs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScaledBalances {
    tokens: Vec<Token>,
    raw: Vec<Amount>,
    rates: Vec<U256>,
    factors: Vec<U256>,
    balances: Vec<U256>,
}

impl ScaledBalances {
    /// Builds the scaled view; with `use_rates == false` every rate is one.
    pub(crate) fn new(tokens: &PoolTokens, use_rates: bool) -> Result<Self, AmmError> {
        let rates: Vec<U256> = if use_rates {
            tokens.rates().to_vec()
        } else {
            vec![ONE; tokens.len()]
        };
        let mut factors = Vec::with_capacity(tokens.len());
        let mut balances = Vec::with_capacity(tokens.len());
        for ((token, raw), rate) in tokens.tokens().iter().zip(tokens.balances()).zip(&rates) {
            let decimals_factor = token
                .scaling_factor()
                .checked_mul(ONE)
                .ok_or(AmmError::Overflow("scaling factor"))?;
            let factor = fixed_point::mul_down(decimals_factor, *rate)?;
            if factor.is_zero() {
                return Err(AmmError::InvalidPrice("scaling factor rounds to zero"));
            }
            balances.push(fixed_point::mul_down(raw.get(), factor)?);
            factors.push(factor);
        }
        Ok(Self {
            tokens: tokens.tokens().to_vec(),
            raw: tokens.balances().to_vec(),
            rates,
            factors,
            balances,
        })
    }

    pub(crate) fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    pub(crate) fn index_of(&self, token: TokenAddress) -> Option<usize> {
        self.tokens.iter().position(|t| t.address() == token)
    }

    /// Positions of a trading pair.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidToken`] if either token is missing or both are
    /// the same.
    pub(crate) fn indices(
        &self,
        token_in: TokenAddress,
        token_out: TokenAddress,
    ) -> Result<(usize, usize), AmmError> {
        if token_in == token_out {
            return Err(AmmError::InvalidToken("token_in equals token_out"));
        }
        let i = self
            .index_of(token_in)
            .ok_or(AmmError::InvalidToken("token_in is not part of the pool"))?;
        let o = self
            .index_of(token_out)
            .ok_or(AmmError::InvalidToken("token_out is not part of the pool"))?;
        Ok((i, o))
    }

    /// Upscaled balances.
    pub(crate) fn balances(&self) -> &[U256] {
        &self.balances
    }

    pub(crate) fn balance(&self, index: usize) -> U256 {
        self.balances.get(index).copied().unwrap_or_default()
    }

    pub(crate) fn raw_balance(&self, index: usize) -> Amount {
        self.raw.get(index).copied().unwrap_or(Amount::ZERO)
    }

    pub(crate) fn rate(&self, index: usize) -> U256 {
        self.rates.get(index).copied().unwrap_or(ONE)
    }

    pub(crate) fn has_zero_balance(&self) -> bool {
        self.balances.iter().any(U256::is_zero)
    }

    fn factor(&self, index: usize) -> Result<U256, AmmError> {
        self.factors
            .get(index)
            .copied()
            .ok_or(AmmError::InvalidToken("token index out of range"))
    }

    pub(crate) fn upscale(&self, index: usize, amount: Amount) -> Result<U256, AmmError> {
        fixed_point::mul_down(amount.get(), self.factor(index)?)
    }

    pub(crate) fn downscale(&self, index: usize, amount: U256, rounding: Rounding) -> Result<Amount, AmmError> {
        fixed_point::div(amount, self.factor(index)?, rounding).map(Amount::new)
    }

    /// Re-expresses a price of scaled units into decimal-normalised token
    /// units.
    pub(crate) fn price_to_human(&self, price: U256, i: usize, o: usize) -> Result<U256, AmmError> {
        fixed_point::mul_div(price, self.rate(o), self.rate(i), Rounding::Down)
    }

    /// Re-expresses a price derivative taken against a scaled amount.
    pub(crate) fn derivative_to_human(
        &self,
        derivative: U256,
        i: usize,
        o: usize,
        swap_type: SwapType,
    ) -> Result<U256, AmmError> {
        let rate_out = self.rate(o);
        match swap_type {
            SwapType::ExactIn => fixed_point::mul_down(derivative, rate_out),
            SwapType::ExactOut => {
                let ratio = fixed_point::mul_div(derivative, rate_out, self.rate(i), Rounding::Down)?;
                fixed_point::mul_down(ratio, rate_out)
            }
        }
    }
}
