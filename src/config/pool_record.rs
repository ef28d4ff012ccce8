//! Wire format of a pool snapshot.
//!
//! Snapshots arrive as JSON lists of subgraph-style records: camelCase
//! keys, balances and parameters as human-readable decimal strings.  A
//! [`PoolRecord`] is converted into the typed [`PoolConfig`] the factory
//! consumes; the conversion is where raw-unit scaling happens and where
//! corrupt data (negative balances) is detected.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::{
    ComposableStableConfig, FxConfig, FxParams, Gyro2Config, Gyro3Config, GyroEConfig,
    GyroEParams, LinearConfig, PoolConfig, PoolTokens, StableConfig, WeightedConfig,
};
use crate::domain::{Amount, Decimals, PoolId, PoolType, SwapFee, Token, TokenAddress};
use crate::error::AmmError;
use crate::math::fixed_point::ONE;

/// Nested token metadata carried by FX pools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfoRecord {
    /// Oracle USD rate of the token.
    #[serde(rename = "latestFXPrice", default, skip_serializing_if = "Option::is_none")]
    pub latest_fx_price: Option<String>,
}

/// One token entry of a [`PoolRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub address: String,
    /// Human-readable balance (`"1000.5"`).
    pub balance: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenInfoRecord>,
}

/// One pool of a snapshot as it appears on the wire.
///
/// Family parameters are optional at this level; the conversion reports
/// [`AmmError::InvalidConfiguration`] when a parameter the family needs is
/// missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolRecord {
    pub id: String,
    pub address: String,
    pub pool_type: String,
    pub swap_fee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_shares: Option<String>,
    pub tokens: Vec<TokenRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqrt_alpha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqrt_beta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root3_alpha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lambda: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<String>,
}

impl Default for TokenRecord {
    fn default() -> Self {
        Self {
            address: String::new(),
            balance: String::from("0"),
            decimals: 18,
            price_rate: None,
            weight: None,
            token: None,
        }
    }
}

impl PoolRecord {
    /// Parses the family tag.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Unsupported`] for a family this crate does not
    /// model.
    pub fn family(&self) -> Result<PoolType, AmmError> {
        serde_json::from_value(serde_json::Value::String(self.pool_type.clone()))
            .map_err(|_| AmmError::Unsupported("unknown pool type"))
    }

    /// Converts the record into a typed, validated [`PoolConfig`].
    ///
    /// # Errors
    ///
    /// - [`AmmError::CorruptSnapshot`] for a negative balance.
    /// - [`AmmError::Unsupported`] for an unknown family.
    /// - Any structural error of the family's configuration.
    pub fn to_config(&self) -> Result<PoolConfig, AmmError> {
        let family = self.family()?;
        let id = PoolId::new(&self.id);
        let swap_fee = SwapFee::from_decimal_str(&self.swap_fee)?;

        match family {
            PoolType::Weighted => {
                let raw = self
                    .tokens
                    .iter()
                    .map(|t| fixed(t.weight.as_deref(), "weighted pool token without weight"))
                    .collect::<Result<Vec<_>, _>>()?;
                let weights = WeightedConfig::normalize_weights(&raw)?;
                let cfg = WeightedConfig::new(id, self.pool_tokens(false)?, weights, swap_fee)?;
                Ok(PoolConfig::Weighted(cfg))
            }
            PoolType::Stable | PoolType::MetaStable => {
                let meta = family == PoolType::MetaStable;
                let cfg = StableConfig::new(
                    id,
                    self.pool_tokens(meta)?,
                    self.amplification()?,
                    swap_fee,
                    meta,
                )?;
                Ok(PoolConfig::Stable(cfg))
            }
            PoolType::PhantomStable | PoolType::ComposableStable => {
                let cfg = ComposableStableConfig::new(
                    id,
                    self.pool_address()?,
                    self.pool_tokens(true)?,
                    self.amplification()?,
                    swap_fee,
                    self.total_shares()?,
                )?;
                let cfg = if family == PoolType::PhantomStable {
                    cfg.phantom()
                } else {
                    cfg
                };
                Ok(PoolConfig::ComposableStable(cfg))
            }
            PoolType::Linear => {
                let main = self
                    .main_index
                    .ok_or(AmmError::InvalidConfiguration("linear pool without mainIndex"))?;
                let wrapped = self
                    .wrapped_index
                    .ok_or(AmmError::InvalidConfiguration("linear pool without wrappedIndex"))?;
                let cfg = LinearConfig::new(
                    id,
                    self.pool_tokens(true)?,
                    main,
                    wrapped,
                    fixed(self.lower_target.as_deref(), "linear pool without lowerTarget")?,
                    fixed(self.upper_target.as_deref(), "linear pool without upperTarget")?,
                    swap_fee,
                    self.total_shares()?,
                )?;
                Ok(PoolConfig::Linear(cfg))
            }
            PoolType::Gyro2 => {
                let cfg = Gyro2Config::new(
                    id,
                    self.pool_tokens(false)?,
                    fixed(self.sqrt_alpha.as_deref(), "2-CLP without sqrtAlpha")?,
                    fixed(self.sqrt_beta.as_deref(), "2-CLP without sqrtBeta")?,
                    swap_fee,
                )?;
                Ok(PoolConfig::Gyro2(cfg))
            }
            PoolType::Gyro3 => {
                let cfg = Gyro3Config::new(
                    id,
                    self.pool_tokens(false)?,
                    fixed(self.root3_alpha.as_deref(), "3-CLP without root3Alpha")?,
                    swap_fee,
                )?;
                Ok(PoolConfig::Gyro3(cfg))
            }
            PoolType::GyroE => {
                let params = GyroEParams {
                    alpha: fixed(self.alpha.as_deref(), "E-CLP without alpha")?,
                    beta: fixed(self.beta.as_deref(), "E-CLP without beta")?,
                    c: fixed(self.c.as_deref(), "E-CLP without c")?,
                    s: fixed(self.s.as_deref(), "E-CLP without s")?,
                    lambda: fixed(self.lambda.as_deref(), "E-CLP without lambda")?,
                };
                let cfg = GyroEConfig::new(id, self.pool_tokens(true)?, params, swap_fee)?;
                Ok(PoolConfig::GyroE(cfg))
            }
            PoolType::Fx => {
                let params = FxParams {
                    alpha: fixed(self.alpha.as_deref(), "FX pool without alpha")?,
                    beta: fixed(self.beta.as_deref(), "FX pool without beta")?,
                    delta: fixed(self.delta.as_deref(), "FX pool without delta")?,
                    epsilon: fixed(self.epsilon.as_deref(), "FX pool without epsilon")?,
                    lambda: fixed(self.lambda.as_deref(), "FX pool without lambda")?,
                };
                let mut rates = [ONE; 2];
                for (slot, token) in rates.iter_mut().zip(&self.tokens) {
                    let price = token.token.as_ref().and_then(|t| t.latest_fx_price.as_deref());
                    *slot = fixed(price, "FX pool token without latestFXPrice")?;
                }
                let cfg = FxConfig::new(id, self.pool_tokens(false)?, params, rates)?;
                Ok(PoolConfig::Fx(cfg))
            }
        }
    }

    fn pool_tokens(&self, with_rates: bool) -> Result<PoolTokens, AmmError> {
        let mut tokens = Vec::with_capacity(self.tokens.len());
        let mut balances = Vec::with_capacity(self.tokens.len());
        let mut rates = Vec::with_capacity(self.tokens.len());
        for record in &self.tokens {
            let address: TokenAddress = record.address.parse()?;
            let token = Token::new(address, Decimals::new(record.decimals)?);
            balances.push(token.parse_amount(&record.balance)?);
            let rate = match (with_rates, record.price_rate.as_deref()) {
                (true, Some(rate)) => fixed(Some(rate), "")?,
                _ => ONE,
            };
            rates.push(rate);
            tokens.push(token);
        }
        PoolTokens::new(tokens, balances, rates)
    }

    fn pool_address(&self) -> Result<TokenAddress, AmmError> {
        if self.address.is_empty() {
            // The first 20 bytes of a vault pool id are the pool address.
            let hex = self.id.get(..42).ok_or(AmmError::InvalidToken("pool has no address"))?;
            return hex.parse();
        }
        self.address.parse()
    }

    fn amplification(&self) -> Result<U256, AmmError> {
        let amp = self
            .amp
            .as_deref()
            .ok_or(AmmError::InvalidConfiguration("stable pool without amp"))?;
        // Three decimal places is exactly the amplification precision.
        Decimals::new(3)?.parse_units(amp)
    }

    fn total_shares(&self) -> Result<Amount, AmmError> {
        let shares = fixed(self.total_shares.as_deref(), "pool without totalShares")?;
        Ok(Amount::new(shares))
    }
}

/// Parses an 18-decimal human string into its `1e18`-scaled value.
fn fixed(value: Option<&str>, missing: &'static str) -> Result<U256, AmmError> {
    let value = value.ok_or(AmmError::InvalidConfiguration(missing))?;
    Decimals::MAX.parse_units(value)
}
