//! Swap Service
//!
//! Wires every use case over one chain reader and one Trade API client. The
//! relay holds one of these for its handlers; in-process hosts can drive the
//! orchestrator with it directly.

use super::allowance::{AllowanceChecker, AllowanceQuery};
use super::approval::{ApprovalBuilder, ApprovalCheck, CheckOrApprove, CheckOrApproveRequest};
use super::balances::{BalanceQuery, BalanceReader};
use super::catalog::TokenCatalog;
use super::quote::{QuoteFetcher, QuoteParams};
use super::swap::{SwapParams, SwapSubmitter};
use crate::application::ports::SwapBackend;
use crate::domain::entities::{
    AllowanceState, ApprovalDecision, ApprovalTransaction, BalanceSheet, PendingTransaction, Quote, QuoteOutcome,
    Token,
};
use crate::domain::repositories::{ApprovalCheckRequest, ChainReader, TradeApi};
use crate::shared::config::SwapConfig;
use crate::shared::error::SwapError;
use async_trait::async_trait;
use std::sync::Arc;

pub struct SwapService {
    config: Arc<SwapConfig>,
    catalog: TokenCatalog,
    balances: BalanceReader,
    allowance: AllowanceChecker,
    approvals: ApprovalBuilder,
    check_or_approve: CheckOrApprove,
    quotes: QuoteFetcher,
    swaps: SwapSubmitter,
}

impl SwapService {
    pub fn new(
        config: Arc<SwapConfig>,
        chain: Arc<dyn ChainReader>,
        trade: Arc<dyn TradeApi>,
        catalog: TokenCatalog,
    ) -> Self {
        let approvals = ApprovalBuilder::new(Arc::clone(&config));
        Self {
            catalog,
            balances: BalanceReader::new(Arc::clone(&chain), Arc::clone(&config)),
            allowance: AllowanceChecker::new(Arc::clone(&chain), Arc::clone(&config)),
            check_or_approve: CheckOrApprove::new(Arc::clone(&trade), approvals.clone(), Arc::clone(&config)),
            approvals,
            quotes: QuoteFetcher::new(chain, Arc::clone(&trade), Arc::clone(&config)),
            swaps: SwapSubmitter::new(trade, Arc::clone(&config)),
            config,
        }
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TokenCatalog {
        &self.catalog
    }

    pub async fn read_balances(&self, query: &BalanceQuery) -> Result<BalanceSheet, SwapError> {
        self.balances.read(query).await
    }

    pub async fn check_allowance(&self, query: &AllowanceQuery) -> Result<AllowanceState, SwapError> {
        self.allowance.check(query).await
    }

    pub fn build_approval(&self, token: &str, spender: Option<&str>) -> Result<ApprovalTransaction, SwapError> {
        self.approvals.build(token, spender)
    }

    pub async fn inspect_approval(&self, request: &ApprovalCheckRequest) -> Result<ApprovalCheck, SwapError> {
        self.check_or_approve.inspect(request).await
    }

    pub async fn run_check_or_approve(&self, request: &CheckOrApproveRequest) -> Result<ApprovalDecision, SwapError> {
        self.check_or_approve.run(request).await
    }

    pub async fn fetch_quote(&self, params: &QuoteParams) -> Result<QuoteOutcome, SwapError> {
        self.quotes.fetch(params).await
    }

    pub async fn submit_swap(&self, params: SwapParams) -> Result<PendingTransaction, SwapError> {
        self.swaps.submit(params).await
    }
}

#[async_trait]
impl SwapBackend for SwapService {
    async fn tokens(&self) -> Result<Vec<Token>, SwapError> {
        Ok(self.catalog.tokens().to_vec())
    }

    async fn balances(&self, wallet: &str, tokens: Option<Vec<String>>) -> Result<BalanceSheet, SwapError> {
        self.read_balances(&BalanceQuery { wallet: wallet.to_string(), tokens }).await
    }

    async fn quote(&self, params: &QuoteParams) -> Result<QuoteOutcome, SwapError> {
        self.fetch_quote(params).await
    }

    async fn check_or_approve(&self, wallet: &str, token: &str, amount: &str) -> Result<ApprovalDecision, SwapError> {
        self.run_check_or_approve(&CheckOrApproveRequest {
            wallet_address: wallet.to_string(),
            token: token.to_string(),
            amount: amount.to_string(),
        })
        .await
    }

    async fn prepare_swap(&self, quote: Quote, swapper: &str, recipient: Option<String>) -> Result<PendingTransaction, SwapError> {
        self.swaps.prepare(quote, swapper, recipient.as_deref()).await
    }
}
