//! Allowance and approval results

use crate::domain::entities::transaction::PendingTransaction;
use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// Derived on every check, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowanceState {
    pub token: String,
    pub owner: String,
    pub spender: String,
    pub decimals: u8,
    pub current: U256,
    pub required: U256,
    pub sufficient: bool,
}

impl AllowanceState {
    pub fn new(token: String, owner: String, spender: String, decimals: u8, current: U256, required: U256) -> Self {
        Self {
            token,
            owner,
            spender,
            decimals,
            current,
            required,
            sufficient: current >= required,
        }
    }
}

/// Outcome of check-or-approve: already approved, or a transaction to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    pub approved: bool,
    pub tx: Option<PendingTransaction>,
    pub spender: String,
}

impl ApprovalDecision {
    pub fn approved(spender: impl Into<String>) -> Self {
        Self {
            approved: true,
            tx: None,
            spender: spender.into(),
        }
    }

    pub fn needs(tx: PendingTransaction, spender: impl Into<String>) -> Self {
        Self {
            approved: false,
            tx: Some(tx),
            spender: spender.into(),
        }
    }
}

/// An unsigned `approve(spender, max)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalTransaction {
    pub tx: PendingTransaction,
    pub spender: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(current: u64, required: u64) -> AllowanceState {
        AllowanceState::new(
            "0xtoken".to_string(),
            "0xowner".to_string(),
            "0xspender".to_string(),
            6,
            U256::from(current),
            U256::from(required),
        )
    }

    #[test]
    fn test_sufficiency_boundary() {
        assert!(state(100_000, 100_000).sufficient);
        assert!(!state(99_999, 100_000).sufficient);
        assert!(state(100_001, 100_000).sufficient);
    }

    #[test]
    fn test_decision_wire_shape() {
        let decision = ApprovalDecision::approved("0xspender");
        assert_eq!(
            serde_json::to_value(&decision).unwrap(),
            serde_json::json!({"approved": true, "tx": null, "spender": "0xspender"})
        );
    }
}
