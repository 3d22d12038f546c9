//! Deployment configuration
//!
//! One record built at start-up and handed to every component constructor.

use crate::shared::constants::*;
use crate::shared::error::SwapError;
use crate::shared::utils::parse_address;
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_url: String,
    pub trade_api_url: String,
    #[serde(skip_serializing)]
    pub trade_api_key: Option<String>,
    pub wrapped_native: Address,
    /// Spender granted allowances when the caller names none.
    pub default_spender: Address,
    pub native_symbol: String,
    pub default_balance_tokens: Vec<String>,
    pub token_list_url: Option<String>,
}

impl SwapConfig {
    /// Polygon mainnet with the public RPC and no Trade API key.
    pub fn polygon() -> Self {
        Self {
            chain_id: POLYGON_CHAIN_ID,
            chain_name: POLYGON_CHAIN_NAME.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            trade_api_url: TRADE_API_URL.to_string(),
            trade_api_key: None,
            wrapped_native: WRAPPED_NATIVE_ADDRESS.parse().unwrap_or_default(),
            default_spender: PERMIT2_ADDRESS.parse().unwrap_or_default(),
            native_symbol: NATIVE_SYMBOL.to_string(),
            default_balance_tokens: DEFAULT_BALANCE_TOKENS.iter().map(|t| t.to_string()).collect(),
            token_list_url: None,
        }
    }

    /// Polygon defaults overridden by `.env` / process environment.
    ///
    /// Only binaries call this; library components receive the record.
    pub fn from_env() -> Result<Self, SwapError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Polygon defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SwapError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::polygon();

        if let Some(rpc_url) = var("RPC_URL_POLYGON") {
            config = config.with_rpc_url(rpc_url);
        }
        if let Some(url) = var("TRADE_API_URL") {
            config.trade_api_url = url.trim_end_matches('/').to_string();
        }
        config.trade_api_key = var("UNISWAP_API_KEY");
        config.token_list_url = var("TOKEN_LIST_URL");
        if let Some(chain_id) = var("CHAIN_ID") {
            config.chain_id = chain_id
                .parse()
                .map_err(|e| SwapError::config(format!("CHAIN_ID {}: {}", chain_id, e)))?;
        }
        if let Some(spender) = var("DEFAULT_SPENDER") {
            config.default_spender = parse_address(&spender, "DEFAULT_SPENDER")
                .map_err(|e| SwapError::config(e.to_string()))?;
        }
        Ok(config)
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    pub fn with_trade_api(mut self, url: impl Into<String>, api_key: Option<String>) -> Self {
        self.trade_api_url = url.into();
        self.trade_api_key = api_key;
        self
    }

    /// Fail with a configuration error when no Trade API key is set.
    pub fn require_api_key(&self) -> Result<&str, SwapError> {
        self.trade_api_key
            .as_deref()
            .ok_or_else(|| SwapError::config("UNISWAP_API_KEY is not set"))
    }

    /// Whether `chain` names this deployment's chain (by name or id).
    pub fn supports_chain(&self, chain: &str) -> bool {
        let chain = chain.trim();
        chain.eq_ignore_ascii_case(&self.chain_name) || chain == self.chain_id.to_string()
    }
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self::polygon()
    }
}
