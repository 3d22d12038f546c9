//! Application ports
//!
//! `WalletHost` is the host runtime's wallet capability. `SwapBackend` is
//! everything the orchestrator needs from the proxy surface, served either
//! in-process by `SwapService` or over HTTP by `RelayClient`.

use crate::application::use_cases::QuoteParams;
use crate::domain::entities::{ApprovalDecision, BalanceSheet, PendingTransaction, Quote, QuoteOutcome, Token};
use crate::shared::error::SwapError;
use async_trait::async_trait;

/// Tri-state result of a host prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostResult<T> {
    Success(T),
    Failed(String),
    Cancelled,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletHost: Send + Sync {
    /// Bind a wallet; success carries its address.
    async fn authenticate(&self) -> HostResult<String>;

    /// Sign and submit; success carries the transaction hash once confirmed.
    async fn send_transaction(&self, tx: &PendingTransaction) -> HostResult<String>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapBackend: Send + Sync {
    async fn tokens(&self) -> Result<Vec<Token>, SwapError>;

    async fn balances(&self, wallet: &str, tokens: Option<Vec<String>>) -> Result<BalanceSheet, SwapError>;

    async fn quote(&self, params: &QuoteParams) -> Result<QuoteOutcome, SwapError>;

    /// `amount` is in base units of `token`.
    async fn check_or_approve(&self, wallet: &str, token: &str, amount: &str) -> Result<ApprovalDecision, SwapError>;

    /// Consumes the quote.
    async fn prepare_swap(&self, quote: Quote, swapper: &str, recipient: Option<String>) -> Result<PendingTransaction, SwapError>;
}
