use anyhow::{anyhow, Result};
use lemmydex_swap_core::SwapConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub const DEFAULT_SAFE_TX_SERVICE_URL: &str = "https://safe-transaction-polygon.safe.global";

/// Safe proposal settings. Both `safe_address` and `relayer_pk` must be set
/// for `/api/safe-send` to be enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeConfig {
    pub safe_address: Option<String>,
    #[serde(skip_serializing)]
    pub relayer_pk: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub tx_service_url: String,
}

impl Default for SafeConfig {
    fn default() -> Self {
        Self {
            safe_address: None,
            relayer_pk: None,
            api_key: None,
            tx_service_url: DEFAULT_SAFE_TX_SERVICE_URL.to_string(),
        }
    }
}

impl SafeConfig {
    pub fn is_enabled(&self) -> bool {
        self.safe_address.is_some() && self.relayer_pk.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub swap: SwapConfig,
    pub safe: SafeConfig,
    pub version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 4000,
            log_level: "info".to_string(),
            log_dir: None,
            swap: SwapConfig::polygon(),
            safe: SafeConfig::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Config {
    /// Load `.env`, then build the configuration from the process environment.
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, fallback: &str| Self::value_or(&lookup, key, fallback);
        let optional = |key: &str| {
            let value = Self::value_or(&lookup, key, "");
            (!value.is_empty()).then_some(value)
        };

        let swap = SwapConfig::from_lookup(&lookup).map_err(|e| anyhow!("{}", e))?;
        Ok(Self {
            environment: get("RUST_ENV", "development"),
            port: u16::from_str(&get("PORT", "4000")).map_err(|e| anyhow!("Invalid PORT: {}", e))?,
            log_level: get("LOG_LEVEL", "info"),
            log_dir: optional("LOG_DIR"),
            swap,
            safe: SafeConfig {
                safe_address: optional("SAFE_ADDRESS"),
                relayer_pk: optional("RELAYER_PK"),
                api_key: optional("SAFE_API_KEY"),
                tx_service_url: get("SAFE_TX_SERVICE_URL", DEFAULT_SAFE_TX_SERVICE_URL)
                    .trim_end_matches('/')
                    .to_string(),
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Trimmed value of `key`, or `fallback` when unset or empty.
    fn value_or<F>(lookup: &F, key: &str, fallback: &str) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Validates if a string is a valid hex address (0x followed by 40 hex characters)
    pub fn is_valid_hex_address(address: &str) -> bool {
        if !address.starts_with("0x") {
            return false;
        }

        let hex_part = &address[2..];
        if hex_part.len() != 40 {
            return false;
        }

        hex_part.chars().all(|c| c.is_ascii_hexdigit())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Every problem found, empty when the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.swap.rpc_url.is_empty() {
            errors.push("RPC_URL_POLYGON is required and cannot be empty".to_string());
        }
        if self.swap.chain_id == 0 {
            errors.push("CHAIN_ID must be non-zero".to_string());
        }
        if let Some(safe) = &self.safe.safe_address {
            if !Self::is_valid_hex_address(safe) {
                errors.push(format!(
                    "Invalid SAFE_ADDRESS format: '{}'. Expected: 0x followed by 40 hex characters",
                    safe
                ));
            }
        }
        if self.is_production() && self.swap.trade_api_key.is_none() {
            errors.push("UNISWAP_API_KEY is required in production environment".to_string());
        }

        errors
    }

    /// Which settings are loaded, never their secret values.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "environment": self.environment,
            "version": self.version,
            "chainId": self.swap.chain_id,
            "rpcUrl": self.swap.rpc_url,
            "tradeApiUrl": self.swap.trade_api_url,
            "hasUniswapKey": self.swap.trade_api_key.is_some(),
            "tokenListUrl": self.swap.token_list_url,
            "safe": {
                "enabled": self.safe.is_enabled(),
                "safeAddress": self.safe.safe_address,
                "hasRelayerKey": self.safe.relayer_pk.is_some(),
                "hasApiKey": self.safe.api_key.is_some(),
                "txServiceUrl": self.safe.tx_service_url,
            },
        })
    }
}
