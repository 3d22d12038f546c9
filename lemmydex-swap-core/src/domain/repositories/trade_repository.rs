//! Trade API repository
//!
//! The pricing (`/quote`), execution-preparation (`/swap`) and approval
//! (`/check_approval`) endpoints. Implementations return the decoded 2xx body
//! and map anything else to `SwapError::Upstream`.

use crate::domain::entities::Quote;
use crate::shared::error::SwapError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /quote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub token_in: String,
    pub token_in_chain_id: u64,
    pub token_out: String,
    pub token_out_chain_id: u64,
    /// Base units of the sell token.
    pub amount: String,
    pub swapper: String,
    pub routing_preference: String,
    pub enable_universal_router: bool,
    pub include_gas: bool,
}

/// Body of `POST /swap`. Owning the quote here is what consumes it.
#[derive(Debug, PartialEq, Serialize)]
pub struct SwapRequest {
    pub quote: Quote,
    pub swapper: String,
    pub recipient: String,
    pub simulate: bool,
}

/// Body of `POST /check_approval`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalCheckRequest {
    pub wallet_address: String,
    pub token: String,
    /// Base units.
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeApi: Send + Sync {
    async fn quote(&self, request: &QuoteRequest) -> Result<Value, SwapError>;

    async fn swap(&self, request: SwapRequest) -> Result<Value, SwapError>;

    async fn check_approval(&self, request: &ApprovalCheckRequest) -> Result<Value, SwapError>;
}
