//! Swap Submitter
//!
//! Hands a quote back to the Trade API and normalizes whichever transaction
//! shape comes back. Nothing reaches the signing layer without a destination.

use crate::domain::entities::{PendingTransaction, Quote};
use crate::domain::repositories::{SwapRequest, TradeApi};
use crate::shared::config::SwapConfig;
use crate::shared::error::SwapError;
use crate::shared::utils::{address_to_string, parse_address};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Where `/swap` may put the executable transaction, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionShape {
    Swap,
    Tx,
    FirstOfTransactions,
    FirstOfTxs,
    PermitTransaction,
}

impl TransactionShape {
    pub const PRIORITY: [TransactionShape; 5] = [
        TransactionShape::Swap,
        TransactionShape::Tx,
        TransactionShape::FirstOfTransactions,
        TransactionShape::FirstOfTxs,
        TransactionShape::PermitTransaction,
    ];

    fn locate<'a>(&self, body: &'a Value) -> Option<&'a Value> {
        match self {
            TransactionShape::Swap => body.get("swap"),
            TransactionShape::Tx => body.get("tx"),
            TransactionShape::FirstOfTransactions => body.get("transactions").and_then(|list| list.get(0)),
            TransactionShape::FirstOfTxs => body.get("txs").and_then(|list| list.get(0)),
            TransactionShape::PermitTransaction => body.get("permitTransaction"),
        }
    }

    /// The normalized transaction at this shape's location, if it has a destination.
    pub fn extract(&self, body: &Value, default_chain_id: u64) -> Option<PendingTransaction> {
        self.locate(body)
            .and_then(|candidate| PendingTransaction::from_json(candidate, default_chain_id))
    }
}

/// First shape in priority order that yields a transaction.
pub fn normalize_swap_response(body: &Value, default_chain_id: u64) -> Result<PendingTransaction, SwapError> {
    TransactionShape::PRIORITY
        .iter()
        .find_map(|shape| shape.extract(body, default_chain_id))
        .ok_or(SwapError::NoExecutableTransaction)
}

/// `/api/swap` request body.
#[derive(Debug, Default, Deserialize)]
pub struct SwapParams {
    #[serde(default)]
    pub quote: Value,
    #[serde(default)]
    pub swapper: String,
    #[serde(default)]
    pub recipient: Option<String>,
}

pub struct SwapSubmitter {
    trade: Arc<dyn TradeApi>,
    config: Arc<SwapConfig>,
}

impl SwapSubmitter {
    pub fn new(trade: Arc<dyn TradeApi>, config: Arc<SwapConfig>) -> Self {
        Self { trade, config }
    }

    /// Exchange the quote for an executable transaction. The quote is consumed.
    pub async fn prepare(
        &self,
        quote: Quote,
        swapper: &str,
        recipient: Option<&str>,
    ) -> Result<PendingTransaction, SwapError> {
        if swapper.trim().is_empty() {
            return Err(SwapError::MissingSwapper);
        }
        let swapper = parse_address(swapper, "swapper")?;
        let recipient = match recipient.map(str::trim) {
            Some(recipient) if !recipient.is_empty() => parse_address(recipient, "recipient")?,
            _ => swapper,
        };
        let quote_id = quote.id().map(str::to_string);

        let body = self
            .trade
            .swap(SwapRequest {
                quote,
                swapper: address_to_string(&swapper),
                recipient: address_to_string(&recipient),
                simulate: false,
            })
            .await?;

        let tx = normalize_swap_response(&body, self.config.chain_id).map_err(|e| {
            log::error!("swap response for quote {:?} has no executable transaction", quote_id);
            e
        })?;
        log::info!("swap for quote {:?} targets {}", quote_id, tx.to);
        Ok(tx)
    }

    /// Entry point for raw request bodies.
    pub async fn submit(&self, params: SwapParams) -> Result<PendingTransaction, SwapError> {
        let quote = Quote::from_json(params.quote).ok_or(SwapError::MissingQuote)?;
        self.prepare(quote, &params.swapper, params.recipient.as_deref()).await
    }
}
