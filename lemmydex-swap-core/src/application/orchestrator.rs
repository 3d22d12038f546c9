//! Swap Orchestrator
//!
//! Explicit state machine for one user session:
//!
//! ```text
//! Idle -> Authenticating -> Ready -> QuotePending -> Quoted
//!      -> ApprovalPending -> Approved -> SwapPending -> SwapComplete
//! ```
//!
//! Any step may land in `Errored`, which keeps the state to resume from so a
//! retry never needs a fresh authentication. Each action checks the current
//! state first and refuses illegal transitions with `InvalidTransition`.
//! Nothing is retried automatically.

use crate::application::ports::{HostResult, SwapBackend, WalletHost};
use crate::application::use_cases::QuoteParams;
use crate::domain::entities::{BalanceSheet, Quote, Token};
use crate::shared::config::SwapConfig;
use crate::shared::error::SwapError;
use crate::shared::utils::{checksum, to_base_units};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Authenticate,
    Quote,
    Approve,
    Swap,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Authenticate => "authenticate",
            Step::Quote => "quote",
            Step::Approve => "approve",
            Step::Swap => "swap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapFailure {
    pub step: Step,
    pub kind: FailureKind,
    pub message: String,
}

/// A live quote with the inputs it was requested for.
#[derive(Debug)]
pub struct QuotedSwap {
    pub sell: Token,
    pub buy: Token,
    pub amount: String,
    pub quote: Quote,
    pub formatted_amount_out: String,
}

#[derive(Debug)]
pub enum SwapState {
    Idle,
    Authenticating,
    Ready { wallet: String },
    QuotePending { wallet: String },
    Quoted { wallet: String, swap: QuotedSwap },
    ApprovalPending { wallet: String },
    Approved { wallet: String, swap: QuotedSwap },
    SwapPending { wallet: String },
    SwapComplete { wallet: String, tx_hash: String },
    Errored { failure: SwapFailure, resume: Box<SwapState> },
}

impl SwapState {
    pub fn name(&self) -> &'static str {
        match self {
            SwapState::Idle => "idle",
            SwapState::Authenticating => "authenticating",
            SwapState::Ready { .. } => "ready",
            SwapState::QuotePending { .. } => "quote_pending",
            SwapState::Quoted { .. } => "quoted",
            SwapState::ApprovalPending { .. } => "approval_pending",
            SwapState::Approved { .. } => "approved",
            SwapState::SwapPending { .. } => "swap_pending",
            SwapState::SwapComplete { .. } => "swap_complete",
            SwapState::Errored { .. } => "errored",
        }
    }

    pub fn wallet(&self) -> Option<&str> {
        match self {
            SwapState::Idle | SwapState::Authenticating => None,
            SwapState::Ready { wallet }
            | SwapState::QuotePending { wallet }
            | SwapState::Quoted { wallet, .. }
            | SwapState::ApprovalPending { wallet }
            | SwapState::Approved { wallet, .. }
            | SwapState::SwapPending { wallet }
            | SwapState::SwapComplete { wallet, .. } => Some(wallet),
            SwapState::Errored { resume, .. } => resume.wallet(),
        }
    }

    pub fn quoted(&self) -> Option<&QuotedSwap> {
        match self {
            SwapState::Quoted { swap, .. } | SwapState::Approved { swap, .. } => Some(swap),
            SwapState::Errored { resume, .. } => resume.quoted(),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&SwapFailure> {
        match self {
            SwapState::Errored { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// The state an action starts from: the resume point when errored.
    fn effective(&self) -> &SwapState {
        match self {
            SwapState::Errored { resume, .. } => resume,
            other => other,
        }
    }

    fn into_effective(self) -> SwapState {
        match self {
            SwapState::Errored { resume, .. } => *resume,
            other => other,
        }
    }
}

pub struct SwapOrchestrator<B: SwapBackend, W: WalletHost> {
    backend: B,
    host: W,
    config: Arc<SwapConfig>,
    state: SwapState,
    balances: Option<BalanceSheet>,
    last_tx_hash: Option<String>,
    stage: watch::Sender<&'static str>,
}

impl<B: SwapBackend, W: WalletHost> SwapOrchestrator<B, W> {
    pub fn new(backend: B, host: W, config: Arc<SwapConfig>) -> Self {
        let (stage, _) = watch::channel(SwapState::Idle.name());
        Self {
            backend,
            host,
            config,
            state: SwapState::Idle,
            balances: None,
            last_tx_hash: None,
            stage,
        }
    }

    pub fn state(&self) -> &SwapState {
        &self.state
    }

    /// Observe state names as they change, including the pending ones.
    pub fn subscribe(&self) -> watch::Receiver<&'static str> {
        self.stage.subscribe()
    }

    pub fn balances(&self) -> Option<&BalanceSheet> {
        self.balances.as_ref()
    }

    pub fn last_tx_hash(&self) -> Option<&str> {
        self.last_tx_hash.as_deref()
    }

    fn set(&mut self, state: SwapState) {
        log::debug!("swap state {} -> {}", self.state.name(), state.name());
        self.stage.send_replace(state.name());
        self.state = state;
    }

    fn take(&mut self) -> SwapState {
        let state = std::mem::replace(&mut self.state, SwapState::Idle);
        state.into_effective()
    }

    fn guard(&self, step: Step, allowed: fn(&SwapState) -> bool) -> Result<(), SwapError> {
        if allowed(self.state.effective()) {
            Ok(())
        } else {
            Err(SwapError::InvalidTransition {
                state: self.state.name(),
                action: step.as_str(),
            })
        }
    }

    fn refuse(&mut self, state: SwapState, step: Step) -> SwapError {
        let error = SwapError::InvalidTransition { state: state.name(), action: step.as_str() };
        self.state = state;
        error
    }

    fn fail(&mut self, step: Step, kind: FailureKind, error: SwapError, resume: SwapState) -> SwapError {
        let message = match &error {
            SwapError::Wallet(message) => message.clone(),
            other => other.to_string(),
        };
        log::warn!("{} {:?}: {}", step.as_str(), kind, message);
        self.set(SwapState::Errored {
            failure: SwapFailure { step, kind, message },
            resume: Box::new(resume),
        });
        error
    }

    /// Bind a wallet through the host. No-op when one is already bound.
    pub async fn authenticate(&mut self) -> Result<(), SwapError> {
        if self.state.wallet().is_some() {
            return Ok(());
        }
        self.guard(Step::Authenticate, |s| matches!(s, SwapState::Idle))?;
        self.take();
        self.set(SwapState::Authenticating);

        match settle(self.host.authenticate().await, Step::Authenticate) {
            Ok(wallet) => {
                log::info!("wallet bound: {}", wallet);
                self.set(SwapState::Ready { wallet });
                self.refresh_balances().await;
                Ok(())
            }
            Err((kind, e)) => Err(self.fail(Step::Authenticate, kind, e, SwapState::Idle)),
        }
    }

    /// Quote `amount` of `sell` for `buy`. Any earlier approval is discarded.
    pub async fn request_quote(&mut self, sell: &Token, buy: &Token, amount: &str) -> Result<(), SwapError> {
        self.guard(Step::Quote, |s| {
            matches!(
                s,
                SwapState::Ready { .. }
                    | SwapState::Quoted { .. }
                    | SwapState::Approved { .. }
                    | SwapState::SwapComplete { .. }
            )
        })?;
        let previous = self.take();
        let Some(wallet) = previous.wallet().map(str::to_string) else {
            return Err(self.fail(Step::Quote, FailureKind::Failed, SwapError::MissingSwapper, previous));
        };
        self.set(SwapState::QuotePending { wallet: wallet.clone() });

        let params = QuoteParams::new(&sell.address, &buy.address, amount, &wallet);
        match self.backend.quote(&params).await {
            Ok(outcome) => {
                self.set(SwapState::Quoted {
                    wallet,
                    swap: QuotedSwap {
                        sell: sell.clone(),
                        buy: buy.clone(),
                        amount: amount.to_string(),
                        quote: outcome.quote,
                        formatted_amount_out: outcome.formatted_amount_out,
                    },
                });
                Ok(())
            }
            Err(e) => Err(self.fail(Step::Quote, FailureKind::Failed, e, previous)),
        }
    }

    /// Ensure the router may spend the sell amount, executing an approval if needed.
    pub async fn approve(&mut self) -> Result<(), SwapError> {
        self.guard(Step::Approve, |s| matches!(s, SwapState::Quoted { .. }))?;
        let (wallet, swap) = match self.take() {
            SwapState::Quoted { wallet, swap } => (wallet, swap),
            other => return Err(self.refuse(other, Step::Approve)),
        };

        let token = if swap.sell.is_native() {
            checksum(&self.config.wrapped_native)
        } else {
            swap.sell.address.clone()
        };
        let amount = match to_base_units(&swap.amount, swap.sell.decimals) {
            Ok(amount) => amount.to_string(),
            Err(e) => return Err(self.fail(Step::Approve, FailureKind::Failed, e, SwapState::Quoted { wallet, swap })),
        };
        self.set(SwapState::ApprovalPending { wallet: wallet.clone() });

        let decision = match self.backend.check_or_approve(&wallet, &token, &amount).await {
            Ok(decision) => decision,
            Err(e) => return Err(self.fail(Step::Approve, FailureKind::Failed, e, SwapState::Quoted { wallet, swap })),
        };

        if let (false, Some(tx)) = (decision.approved, decision.tx) {
            log::info!("sending approval of {} for {}", token, decision.spender);
            match settle(self.host.send_transaction(&tx).await, Step::Approve) {
                Ok(hash) => {
                    log::info!("approval confirmed: {}", hash);
                    self.last_tx_hash = Some(hash);
                }
                Err((kind, e)) => {
                    return Err(self.fail(Step::Approve, kind, e, SwapState::Quoted { wallet, swap }));
                }
            }
        }
        self.set(SwapState::Approved { wallet, swap });
        Ok(())
    }

    /// Prepare and execute the swap for the approved quote. The quote is used up
    /// either way; a failure resumes at `Ready`.
    pub async fn swap(&mut self) -> Result<(), SwapError> {
        self.guard(Step::Swap, |s| matches!(s, SwapState::Approved { .. }))?;
        let (wallet, swap) = match self.take() {
            SwapState::Approved { wallet, swap } => (wallet, swap),
            other => return Err(self.refuse(other, Step::Swap)),
        };
        self.set(SwapState::SwapPending { wallet: wallet.clone() });

        let tx = match self.backend.prepare_swap(swap.quote, &wallet, None).await {
            Ok(tx) => tx,
            Err(e) => return Err(self.fail(Step::Swap, FailureKind::Failed, e, SwapState::Ready { wallet })),
        };

        match settle(self.host.send_transaction(&tx).await, Step::Swap) {
            Ok(tx_hash) => {
                log::info!("swap confirmed: {}", tx_hash);
                self.last_tx_hash = Some(tx_hash.clone());
                self.set(SwapState::SwapComplete { wallet, tx_hash });
                self.refresh_balances().await;
                Ok(())
            }
            Err((kind, e)) => Err(self.fail(Step::Swap, kind, e, SwapState::Ready { wallet })),
        }
    }

    /// Leave `Errored` for the state it was resuming.
    pub fn dismiss_error(&mut self) -> Result<(), SwapError> {
        if !matches!(self.state, SwapState::Errored { .. }) {
            return Err(SwapError::InvalidTransition { state: self.state.name(), action: "dismiss" });
        }
        let resume = self.take();
        self.set(resume);
        Ok(())
    }

    /// Reload balances for the bound wallet. Failures only log.
    pub async fn refresh_balances(&mut self) {
        let Some(wallet) = self.state.wallet().map(str::to_string) else {
            return;
        };
        match self.backend.balances(&wallet, None).await {
            Ok(sheet) => self.balances = Some(sheet),
            Err(e) => log::warn!("balance refresh for {} failed: {}", wallet, e),
        }
    }
}

/// Split a host prompt result into its value or a classified failure.
fn settle(result: HostResult<String>, step: Step) -> Result<String, (FailureKind, SwapError)> {
    match result {
        HostResult::Success(value) => Ok(value),
        HostResult::Failed(message) => Err((FailureKind::Failed, SwapError::wallet(message))),
        HostResult::Cancelled => Err((
            FailureKind::Cancelled,
            SwapError::wallet(format!("{} cancelled", step.as_str())),
        )),
    }
}
