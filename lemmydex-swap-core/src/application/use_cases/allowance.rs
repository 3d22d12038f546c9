//! Allowance Checker
//!
//! Precision is read from the chain and never defaulted here: a wrong
//! precision would make the sufficiency answer meaningless.

use crate::domain::entities::AllowanceState;
use crate::domain::repositories::ChainReader;
use crate::shared::config::SwapConfig;
use crate::shared::error::SwapError;
use crate::shared::utils::{checksum, deserialize_amount, parse_address, require, to_base_units};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllowanceQuery {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub owner: String,
    /// Human-readable amount of `token`.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: String,
    #[serde(default)]
    pub spender: Option<String>,
}

pub struct AllowanceChecker {
    chain: Arc<dyn ChainReader>,
    config: Arc<SwapConfig>,
}

impl AllowanceChecker {
    pub fn new(chain: Arc<dyn ChainReader>, config: Arc<SwapConfig>) -> Self {
        Self { chain, config }
    }

    pub async fn check(&self, query: &AllowanceQuery) -> Result<AllowanceState, SwapError> {
        require(&query.token, "token")?;
        require(&query.owner, "owner")?;
        require(&query.amount, "amount")?;
        let token = parse_address(&query.token, "token")?;
        let owner = parse_address(&query.owner, "owner")?;
        let spender = match query.spender.as_deref().map(str::trim) {
            Some(spender) if !spender.is_empty() => parse_address(spender, "spender")?,
            _ => self.config.default_spender,
        };

        let decimals = self.chain.token_decimals(token).await?;
        let required = to_base_units(&query.amount, decimals)?;
        let current = self.chain.allowance(token, owner, spender).await?;

        Ok(AllowanceState::new(
            checksum(&token),
            checksum(&owner),
            checksum(&spender),
            decimals,
            current,
            required,
        ))
    }
}
