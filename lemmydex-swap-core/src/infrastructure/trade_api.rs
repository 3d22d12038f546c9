//! Uniswap Trade API client
//!
//! Thin JSON client for `/quote`, `/swap` and `/check_approval`. Non-2xx
//! answers become `Upstream` errors carrying the service's own message.

use crate::domain::repositories::{ApprovalCheckRequest, QuoteRequest, SwapRequest, TradeApi};
use crate::shared::config::SwapConfig;
use crate::shared::constants::TRADE_API_KEY_HEADER;
use crate::shared::error::SwapError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub struct TradeApiClient {
    client: Client,
    config: Arc<SwapConfig>,
}

impl TradeApiClient {
    pub fn new(config: Arc<SwapConfig>) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: Arc<SwapConfig>) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.trade_api_url.trim_end_matches('/'), path)
    }

    async fn post<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<Value, SwapError> {
        let api_key = self.config.require_api_key()?;
        let response = self
            .client
            .post(self.endpoint(path))
            .header(TRADE_API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| SwapError::upstream(path, e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SwapError::upstream(path, e.to_string()))?;
        if !status.is_success() {
            log::warn!("{} returned {}: {}", path, status, text);
            return Err(SwapError::upstream(path, error_detail(status, &text)));
        }
        serde_json::from_str(&text).map_err(|e| SwapError::upstream(path, format!("invalid JSON: {}", e)))
    }
}

/// Best human message from an error body: `detail`, then `errorCode`, then the status.
pub fn error_detail(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["detail", "errorCode", "error", "message"]
                .iter()
                .find_map(|key| v.get(key).and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[async_trait]
impl TradeApi for TradeApiClient {
    async fn quote(&self, request: &QuoteRequest) -> Result<Value, SwapError> {
        self.post("/quote", request).await
    }

    async fn swap(&self, request: SwapRequest) -> Result<Value, SwapError> {
        self.post("/swap", &request).await
    }

    async fn check_approval(&self, request: &ApprovalCheckRequest) -> Result<Value, SwapError> {
        self.post("/check_approval", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_priority() {
        let body = r#"{"errorCode":"QUOTE_ERROR","detail":"No quotes available"}"#;
        assert_eq!(error_detail(StatusCode::NOT_FOUND, body), "No quotes available");

        let body = r#"{"errorCode":"VALIDATION_ERROR"}"#;
        assert_eq!(error_detail(StatusCode::BAD_REQUEST, body), "VALIDATION_ERROR");

        assert_eq!(error_detail(StatusCode::BAD_GATEWAY, "<html>"), "HTTP 502");
    }

    #[test]
    fn test_endpoint_joins_path() {
        let config = SwapConfig::polygon().with_trade_api("https://trade.example/v1/", Some("k".into()));
        let client = TradeApiClient::new(Arc::new(config));
        assert_eq!(client.endpoint("/quote"), "https://trade.example/v1/quote");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = TradeApiClient::new(Arc::new(SwapConfig::polygon()));
        let request = ApprovalCheckRequest {
            wallet_address: "0x1111111111111111111111111111111111111111".to_string(),
            token: "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174".to_string(),
            amount: "1".to_string(),
            chain_id: Some(137),
        };
        let err = client.check_approval(&request).await.unwrap_err();
        assert_eq!(err, SwapError::config("UNISWAP_API_KEY is not set"));
    }
}
