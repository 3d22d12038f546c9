//! Relay client
//!
//! `SwapBackend` over the relay's `/api` routes. Every route answers with
//! `{ok: true, ...}` or `{ok: false, error}`; this client unwraps that
//! envelope and maps failures back onto `SwapError`.

use crate::application::ports::SwapBackend;
use crate::application::use_cases::QuoteParams;
use crate::domain::entities::{ApprovalDecision, BalanceSheet, PendingTransaction, Quote, QuoteOutcome, Token};
use crate::shared::error::SwapError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub struct RelayClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct TokensBody {
    tokens: Vec<Token>,
}

#[derive(Deserialize)]
struct BalancesBody {
    balances: BalanceSheet,
}

#[derive(Deserialize)]
struct SwapBody {
    swap: PendingTransaction,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, SwapError> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status();
        unwrap_envelope(path, status, response.json().await?)
    }

    async fn post<B: Serialize + ?Sized + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, SwapError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let status = response.status();
        unwrap_envelope(path, status, response.json().await?)
    }
}

/// Payload of a successful envelope, or the error it carries.
pub fn unwrap_envelope<T: DeserializeOwned>(path: &str, status: StatusCode, body: Value) -> Result<T, SwapError> {
    let ok = body.get("ok").and_then(Value::as_bool).unwrap_or(false);
    if ok && status.is_success() {
        return serde_json::from_value(body).map_err(|e| SwapError::upstream(path, format!("invalid response: {}", e)));
    }
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    Err(match status {
        StatusCode::BAD_REQUEST => SwapError::InvalidParameters(message),
        StatusCode::UNPROCESSABLE_ENTITY => SwapError::NoExecutableTransaction,
        StatusCode::SERVICE_UNAVAILABLE => SwapError::Config(message),
        _ => relayed_upstream(path, message),
    })
}

/// The relay already renders upstream failures as `<service> failed: <detail>`;
/// keep that service and detail instead of nesting them under `path`.
fn relayed_upstream(path: &str, message: String) -> SwapError {
    match message.split_once(" failed: ") {
        Some((service, detail)) if service.starts_with('/') => SwapError::upstream(service, detail),
        _ => SwapError::upstream(path, message),
    }
}

#[async_trait]
impl SwapBackend for RelayClient {
    async fn tokens(&self) -> Result<Vec<Token>, SwapError> {
        let body: TokensBody = self.get("/tokens").await?;
        Ok(body.tokens)
    }

    async fn balances(&self, wallet: &str, tokens: Option<Vec<String>>) -> Result<BalanceSheet, SwapError> {
        let body: BalancesBody = self.post("/balances", &json!({ "wallet": wallet, "tokens": tokens })).await?;
        Ok(body.balances)
    }

    async fn quote(&self, params: &QuoteParams) -> Result<QuoteOutcome, SwapError> {
        self.post("/quote", params).await
    }

    async fn check_or_approve(&self, wallet: &str, token: &str, amount: &str) -> Result<ApprovalDecision, SwapError> {
        let body = json!({ "walletAddress": wallet, "token": token, "amount": amount });
        self.post("/check-or-approve", &body).await
    }

    async fn prepare_swap(&self, quote: Quote, swapper: &str, recipient: Option<String>) -> Result<PendingTransaction, SwapError> {
        let body = json!({ "quote": quote.into_json(), "swapper": swapper, "recipient": recipient });
        let body: SwapBody = self.post("/swap", &body).await?;
        Ok(body.swap)
    }
}
