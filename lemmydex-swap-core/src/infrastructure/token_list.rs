//! Remote token list
//!
//! Fetches a Uniswap-format token list and keeps the entries for one chain.
//! The catalog falls back to its built-in list when this fails.

use crate::application::use_cases::TokenCatalog;
use crate::domain::entities::Token;
use crate::shared::config::SwapConfig;
use crate::shared::error::SwapError;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenList {
    #[serde(default)]
    tokens: Vec<ListedToken>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedToken {
    chain_id: u64,
    address: String,
    name: String,
    symbol: String,
    decimals: u8,
    #[serde(default, rename = "logoURI")]
    logo_uri: Option<String>,
}

/// Entries of a token-list document that belong to `chain_id`.
pub fn parse_token_list(body: &str, chain_id: u64) -> Result<Vec<Token>, SwapError> {
    let list: TokenList = serde_json::from_str(body)?;
    Ok(list
        .tokens
        .into_iter()
        .filter(|t| t.chain_id == chain_id)
        .map(|t| Token::new(&t.name, &t.symbol, &t.address, t.logo_uri.as_deref(), t.decimals))
        .collect())
}

pub async fn fetch_token_list(client: &Client, url: &str, chain_id: u64) -> Result<Vec<Token>, SwapError> {
    let body = client.get(url).send().await?.error_for_status()?.text().await?;
    parse_token_list(&body, chain_id)
}

/// The remote list when configured and non-empty, the built-in list otherwise.
pub async fn load_catalog(client: &Client, config: &SwapConfig) -> TokenCatalog {
    let Some(url) = config.token_list_url.as_deref() else {
        return TokenCatalog::builtin();
    };
    match fetch_token_list(client, url, config.chain_id).await {
        Ok(tokens) if !tokens.is_empty() => {
            log::info!("loaded {} tokens from {}", tokens.len(), url);
            TokenCatalog::new(tokens)
        }
        Ok(_) => {
            log::warn!("token list {} has no entries for chain {}, using built-in list", url, config.chain_id);
            TokenCatalog::builtin()
        }
        Err(e) => {
            log::warn!("token list {} unavailable ({}), using built-in list", url, e);
            TokenCatalog::builtin()
        }
    }
}
