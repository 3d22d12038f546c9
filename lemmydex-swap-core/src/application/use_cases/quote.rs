//! Quote Fetcher
//!
//! Converts the sell amount with the sell token's own precision, asks the
//! Trade API for an exact-input quote and derives a display amount for the
//! output side.

use crate::domain::entities::{Quote, QuoteOutcome, TokenRef};
use crate::domain::repositories::{ChainReader, QuoteRequest, TradeApi};
use crate::shared::config::SwapConfig;
use crate::shared::constants::*;
use crate::shared::error::SwapError;
use crate::shared::utils::{
    address_to_string, deserialize_amount, format_units, is_decimal_amount, parse_address, parse_base_units, require,
    to_base_units,
};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteParams {
    #[serde(default)]
    pub sell_token: String,
    #[serde(default)]
    pub buy_token: String,
    /// Human-readable amount of the sell token.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: String,
    #[serde(default)]
    pub swapper: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
}

impl QuoteParams {
    pub fn new(sell_token: &str, buy_token: &str, amount: &str, swapper: &str) -> Self {
        Self {
            sell_token: sell_token.to_string(),
            buy_token: buy_token.to_string(),
            amount: amount.to_string(),
            swapper: swapper.to_string(),
            chain: None,
        }
    }
}

pub struct QuoteFetcher {
    chain: Arc<dyn ChainReader>,
    trade: Arc<dyn TradeApi>,
    config: Arc<SwapConfig>,
}

impl QuoteFetcher {
    pub fn new(chain: Arc<dyn ChainReader>, trade: Arc<dyn TradeApi>, config: Arc<SwapConfig>) -> Self {
        Self { chain, trade, config }
    }

    pub async fn fetch(&self, params: &QuoteParams) -> Result<QuoteOutcome, SwapError> {
        require(&params.sell_token, "sellToken")?;
        require(&params.buy_token, "buyToken")?;
        require(&params.amount, "amount")?;
        require(&params.swapper, "swapper")?;
        if let Some(chain) = params.chain.as_deref().filter(|c| !c.trim().is_empty()) {
            if !self.config.supports_chain(chain) {
                return Err(SwapError::invalid_parameters(format!("unsupported chain: {}", chain)));
            }
        }
        if !is_decimal_amount(params.amount.trim()) {
            return Err(SwapError::invalid_parameters(format!("invalid amount: {}", params.amount)));
        }
        let sell = TokenRef::parse(&params.sell_token)
            .ok_or_else(|| SwapError::invalid_parameters(format!("invalid sellToken: {}", params.sell_token)))?;
        let buy = TokenRef::parse(&params.buy_token)
            .ok_or_else(|| SwapError::invalid_parameters(format!("invalid buyToken: {}", params.buy_token)))?;
        let swapper = parse_address(&params.swapper, "swapper")?;

        let token_in = sell.quotable_address(self.config.wrapped_native);
        let token_out = match buy {
            TokenRef::Native => parse_address(NATIVE_TOKEN_ADDRESS, "buyToken")?,
            TokenRef::Erc20(address) => address,
        };

        let decimals = match self.chain.token_decimals(token_in).await {
            Ok(decimals) => decimals,
            Err(e) => {
                log::warn!("decimals() failed for {:?} ({}), assuming {}", token_in, e, FALLBACK_SELL_DECIMALS);
                FALLBACK_SELL_DECIMALS
            }
        };
        let amount = to_base_units(&params.amount, decimals)?;

        let request = QuoteRequest {
            kind: QUOTE_TYPE_EXACT_INPUT.to_string(),
            token_in: address_to_string(&token_in),
            token_in_chain_id: self.config.chain_id,
            token_out: address_to_string(&token_out),
            token_out_chain_id: self.config.chain_id,
            amount: amount.to_string(),
            swapper: address_to_string(&swapper),
            routing_preference: ROUTING_PREFERENCE.to_string(),
            enable_universal_router: true,
            include_gas: true,
        };
        log::info!(
            "quote {} {:?} -> {:?} ({} base units)",
            params.amount,
            token_in,
            token_out,
            request.amount
        );

        let body = self.trade.quote(&request).await?;
        let quote = Quote::from_json(body.get("quote").cloned().unwrap_or(Value::Null))
            .ok_or_else(|| SwapError::upstream("/quote", "response has no quote"))?;
        let formatted_amount_out = self.display_amount_out(&quote, token_out).await;
        log::info!(
            "quote {:?} out {} (method parameters: {})",
            quote.id(),
            formatted_amount_out,
            quote.has_method_parameters()
        );

        Ok(QuoteOutcome {
            quote,
            formatted_amount_out,
        })
    }

    /// Formatting never fails a quote; it degrades to `"0"`.
    async fn display_amount_out(&self, quote: &Quote, token_out: Address) -> String {
        if let Some(formatted) = quote.buy_amount_decimal() {
            return formatted;
        }
        let Some(raw) = quote.output_amount() else {
            return "0".to_string();
        };
        let decimals = match quote.output_decimals() {
            Some(decimals) => decimals,
            None => self.chain.token_decimals(token_out).await.unwrap_or_else(|e| {
                log::warn!("output decimals unknown ({}), assuming {}", e, FALLBACK_OUTPUT_DECIMALS);
                FALLBACK_OUTPUT_DECIMALS
            }),
        };
        parse_base_units(&raw)
            .and_then(|raw| format_units(raw, decimals))
            .unwrap_or_else(|e| {
                log::warn!("cannot format output amount {}: {}", raw, e);
                "0".to_string()
            })
    }
}
