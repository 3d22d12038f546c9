//! Balance Reader
//!
//! Reads the native balance and any number of ERC-20 balances for one owner.
//! Per-token reads run concurrently; a failing token becomes an error row
//! instead of failing the whole sheet.

use crate::domain::entities::{Balance, BalanceEntry, BalanceSheet, TokenRef};
use crate::domain::repositories::ChainReader;
use crate::shared::config::SwapConfig;
use crate::shared::constants::{INVALID_TOKEN_MESSAGE, NATIVE_DECIMALS};
use crate::shared::error::SwapError;
use crate::shared::utils::{format_units, parse_address};
use ethers::types::{Address, U256};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceQuery {
    #[serde(default)]
    pub wallet: String,
    #[serde(default)]
    pub tokens: Option<Vec<String>>,
}

pub struct BalanceReader {
    chain: Arc<dyn ChainReader>,
    config: Arc<SwapConfig>,
}

impl BalanceReader {
    pub fn new(chain: Arc<dyn ChainReader>, config: Arc<SwapConfig>) -> Self {
        Self { chain, config }
    }

    pub async fn read(&self, query: &BalanceQuery) -> Result<BalanceSheet, SwapError> {
        let owner = parse_address(&query.wallet, "wallet")?;
        let tokens = match &query.tokens {
            Some(tokens) if !tokens.is_empty() => tokens.clone(),
            _ => self.config.default_balance_tokens.clone(),
        };

        let rows = join_all(tokens.iter().map(|token| self.read_one(token, owner))).await;

        let mut sheet = BalanceSheet::new();
        for (key, entry) in rows {
            sheet.insert(key, entry);
        }
        log::debug!("read {} balance rows for {:?}", sheet.len(), owner);
        Ok(sheet)
    }

    async fn read_one(&self, token: &str, owner: Address) -> (String, BalanceEntry) {
        match TokenRef::parse(token) {
            None => (token.to_string(), BalanceEntry::error(INVALID_TOKEN_MESSAGE)),
            Some(TokenRef::Native) => match self.native_row(owner).await {
                Ok(balance) => (balance.symbol.clone(), BalanceEntry::Balance(balance)),
                Err(e) => (token.to_string(), BalanceEntry::error(e.to_string())),
            },
            Some(TokenRef::Erc20(address)) => match self.token_row(token, address, owner).await {
                Ok(balance) => (balance.symbol.clone(), BalanceEntry::Balance(balance)),
                Err(e) => {
                    log::warn!("balance read failed for {}: {}", token, e);
                    (token.to_string(), BalanceEntry::error(e.to_string()))
                }
            },
        }
    }

    async fn native_row(&self, owner: Address) -> Result<Balance, SwapError> {
        let raw = self.chain.native_balance(owner).await?;
        balance_row(&self.config.native_symbol, None, raw, NATIVE_DECIMALS)
    }

    async fn token_row(&self, requested: &str, token: Address, owner: Address) -> Result<Balance, SwapError> {
        let (symbol, decimals, raw) = futures::join!(
            self.chain.token_symbol(token),
            self.chain.token_decimals(token),
            self.chain.token_balance(token, owner),
        );
        balance_row(&symbol?, Some(requested.trim().to_string()), raw?, decimals?)
    }
}

fn balance_row(symbol: &str, address: Option<String>, raw: U256, decimals: u8) -> Result<Balance, SwapError> {
    Ok(Balance {
        symbol: symbol.to_string(),
        address,
        formatted: format_units(raw, decimals)?,
        raw: raw.to_string(),
        decimals,
    })
}
