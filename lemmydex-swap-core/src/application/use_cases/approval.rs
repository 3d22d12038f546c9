//! Approval Builder and Check-or-Approve
//!
//! Every locally built approval is `approve(spender, MAX)`. Check-or-approve
//! asks the Trade API first and only falls back to local encoding when the
//! service fails or returns nothing executable.

use crate::domain::entities::{ApprovalDecision, ApprovalTransaction, PendingTransaction};
use crate::domain::repositories::{ApprovalCheckRequest, TradeApi};
use crate::shared::abi::encode_approve;
use crate::shared::config::SwapConfig;
use crate::shared::error::SwapError;
use crate::shared::utils::{checksum, deserialize_amount, parse_address, parse_base_units, require};
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApprovalBuilder {
    config: Arc<SwapConfig>,
}

impl ApprovalBuilder {
    pub fn new(config: Arc<SwapConfig>) -> Self {
        Self { config }
    }

    /// Encode a maximal approval of `token` for `spender` (default spender when `None`).
    pub fn build(&self, token: &str, spender: Option<&str>) -> Result<ApprovalTransaction, SwapError> {
        let token = parse_address(token, "token")?;
        let spender = match spender.map(str::trim) {
            Some(spender) if !spender.is_empty() => parse_address(spender, "spender")?,
            _ => self.config.default_spender,
        };
        let data = encode_approve(spender, U256::MAX)?;

        Ok(ApprovalTransaction {
            tx: PendingTransaction::new(checksum(&token), format!("0x{}", hex::encode(&data)), self.config.chain_id),
            spender: checksum(&spender),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOrApproveRequest {
    #[serde(default)]
    pub wallet_address: String,
    #[serde(default)]
    pub token: String,
    /// Base units of `token`.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: String,
}

/// Raw `/check_approval` answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalCheck {
    pub approval: Value,
    pub cancel: Value,
}

pub struct CheckOrApprove {
    trade: Arc<dyn TradeApi>,
    builder: ApprovalBuilder,
    config: Arc<SwapConfig>,
}

impl CheckOrApprove {
    pub fn new(trade: Arc<dyn TradeApi>, builder: ApprovalBuilder, config: Arc<SwapConfig>) -> Self {
        Self { trade, builder, config }
    }

    pub async fn run(&self, request: &CheckOrApproveRequest) -> Result<ApprovalDecision, SwapError> {
        require(&request.wallet_address, "walletAddress")?;
        require(&request.token, "token")?;
        require(&request.amount, "amount")?;
        let wallet = parse_address(&request.wallet_address, "walletAddress")?;
        let token = parse_address(&request.token, "token")?;
        parse_base_units(&request.amount)?;

        let spender = checksum(&self.config.default_spender);
        let check = ApprovalCheckRequest {
            wallet_address: checksum(&wallet),
            token: checksum(&token),
            amount: request.amount.trim().to_string(),
            chain_id: Some(self.config.chain_id),
        };

        match self.trade.check_approval(&check).await {
            Ok(body) => match body.get("approval") {
                Some(Value::Null) => return Ok(ApprovalDecision::approved(spender)),
                Some(approval) => match approval_transaction(approval, self.config.chain_id) {
                    Some(tx) => return Ok(ApprovalDecision::needs(tx, spender)),
                    None => log::warn!("check_approval returned no executable approval, encoding locally"),
                },
                None => log::warn!("check_approval response has no approval field, encoding locally"),
            },
            Err(e) => log::warn!("check_approval failed ({}), encoding locally", e),
        }

        let fallback = self.builder.build(&request.token, None)?;
        Ok(ApprovalDecision::needs(fallback.tx, fallback.spender))
    }

    /// Pass a check straight through to the Trade API.
    pub async fn inspect(&self, request: &ApprovalCheckRequest) -> Result<ApprovalCheck, SwapError> {
        require(&request.wallet_address, "walletAddress")?;
        require(&request.token, "token")?;
        require(&request.amount, "amount")?;
        let body = self.trade.check_approval(request).await?;
        Ok(ApprovalCheck {
            approval: body.get("approval").cloned().unwrap_or(Value::Null),
            cancel: body.get("cancel").cloned().unwrap_or(Value::Null),
        })
    }
}

/// The approval transaction is either nested under `approve` or is the object itself.
fn approval_transaction(approval: &Value, chain_id: u64) -> Option<PendingTransaction> {
    approval
        .get("approve")
        .and_then(|nested| PendingTransaction::from_json(nested, chain_id))
        .or_else(|| PendingTransaction::from_json(approval, chain_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockTradeApi;
    use crate::shared::constants::{PERMIT2_ADDRESS, USDC_ADDRESS};
    use serde_json::json;

    const WALLET: &str = "0x1111111111111111111111111111111111111111";
    const APPROVE_SELECTOR: &str = "0x095ea7b3";

    fn config() -> Arc<SwapConfig> {
        Arc::new(SwapConfig::polygon())
    }

    fn flow(trade: MockTradeApi) -> CheckOrApprove {
        CheckOrApprove::new(Arc::new(trade), ApprovalBuilder::new(config()), config())
    }

    fn request() -> CheckOrApproveRequest {
        CheckOrApproveRequest {
            wallet_address: WALLET.to_string(),
            token: USDC_ADDRESS.to_string(),
            amount: "100000".to_string(),
        }
    }

    #[test]
    fn test_builder_defaults_to_permit2() {
        let approval = ApprovalBuilder::new(config()).build(USDC_ADDRESS, None).unwrap();
        assert_eq!(approval.spender, PERMIT2_ADDRESS);
        assert_eq!(approval.tx.to, USDC_ADDRESS);
        assert_eq!(approval.tx.value, "0x0");
        assert_eq!(approval.tx.chain_id, 137);
        assert!(approval.tx.data.starts_with(APPROVE_SELECTOR));
        assert!(approval.tx.data.ends_with(&"f".repeat(64)));
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        let builder = ApprovalBuilder::new(config());
        assert!(matches!(builder.build("", None), Err(SwapError::InvalidParameters(_))));
        assert!(matches!(builder.build(USDC_ADDRESS, Some("0x12")), Err(SwapError::InvalidParameters(_))));
    }

    #[tokio::test]
    async fn test_null_approval_means_approved() {
        let mut trade = MockTradeApi::new();
        trade
            .expect_check_approval()
            .withf(|req| req.amount == "100000" && req.chain_id == Some(137))
            .times(1)
            .returning(|_| Ok(json!({"requestId": "r", "approval": null, "cancel": null})));

        let decision = flow(trade).run(&request()).await.unwrap();
        assert_eq!(decision, ApprovalDecision::approved(PERMIT2_ADDRESS));
    }

    #[tokio::test]
    async fn test_service_transaction_is_returned() {
        let mut trade = MockTradeApi::new();
        trade.expect_check_approval().returning(|_| {
            Ok(json!({"approval": {"to": USDC_ADDRESS, "from": WALLET, "data": "0xdeadbeef", "value": "0x00", "chainId": 137}}))
        });

        let decision = flow(trade).run(&request()).await.unwrap();
        assert!(!decision.approved);
        let tx = decision.tx.unwrap();
        assert_eq!(tx.data, "0xdeadbeef");
        assert_eq!(tx.value, "0x00");
    }

    #[tokio::test]
    async fn test_nested_approve_transaction() {
        let mut trade = MockTradeApi::new();
        trade
            .expect_check_approval()
            .returning(|_| Ok(json!({"approval": {"approve": {"to": USDC_ADDRESS, "data": "0xabcd"}}})));

        let decision = flow(trade).run(&request()).await.unwrap();
        assert_eq!(decision.tx.unwrap().data, "0xabcd");
    }

    #[tokio::test]
    async fn test_service_failure_falls_back_to_local_max_approval() {
        let mut trade = MockTradeApi::new();
        trade
            .expect_check_approval()
            .returning(|_| Err(SwapError::upstream("/check_approval", "HTTP 500")));

        let decision = flow(trade).run(&request()).await.unwrap();
        assert!(!decision.approved);
        assert_eq!(decision.spender, PERMIT2_ADDRESS);
        let tx = decision.tx.unwrap();
        assert_eq!(tx.to, USDC_ADDRESS);
        assert!(tx.data.starts_with(APPROVE_SELECTOR));
    }

    #[tokio::test]
    async fn test_unusable_approval_falls_back() {
        let mut trade = MockTradeApi::new();
        trade
            .expect_check_approval()
            .returning(|_| Ok(json!({"approval": {"gasLimit": "50000"}})));

        let decision = flow(trade).run(&request()).await.unwrap();
        assert!(decision.tx.unwrap().data.starts_with(APPROVE_SELECTOR));
    }

    #[tokio::test]
    async fn test_missing_wallet_rejected_before_service_call() {
        let err = flow(MockTradeApi::new())
            .run(&CheckOrApproveRequest { wallet_address: String::new(), ..request() })
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::InvalidParameters(_)));
    }

    #[tokio::test]
    async fn test_inspect_passes_through() {
        let mut trade = MockTradeApi::new();
        trade
            .expect_check_approval()
            .returning(|_| Ok(json!({"approval": {"to": USDC_ADDRESS}, "cancel": null})));

        let check = flow(trade)
            .inspect(&ApprovalCheckRequest {
                wallet_address: WALLET.to_string(),
                token: USDC_ADDRESS.to_string(),
                amount: "1".to_string(),
                chain_id: None,
            })
            .await
            .unwrap();
        assert_eq!(check.approval["to"], USDC_ADDRESS);
        assert_eq!(check.cancel, Value::Null);
    }
}
