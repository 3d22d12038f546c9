//! Pending transaction entity
//!
//! The unsigned `{to, data, value, chainId}` record handed to a wallet host.

use crate::shared::constants::ZERO_TX_VALUE;
use crate::shared::utils::json_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransaction {
    pub to: String,
    pub data: String,
    pub value: String,
    pub chain_id: u64,
}

impl PendingTransaction {
    pub fn new(to: impl Into<String>, data: impl Into<String>, chain_id: u64) -> Self {
        Self {
            to: to.into(),
            data: data.into(),
            value: ZERO_TX_VALUE.to_string(),
            chain_id,
        }
    }

    /// Normalize a transaction-shaped JSON object.
    ///
    /// Returns `None` unless the object carries a non-empty `to`. Call data
    /// is read from `data` or `calldata`; `value` defaults to `0x0` and
    /// `chainId` to `default_chain_id`.
    pub fn from_json(object: &Value, default_chain_id: u64) -> Option<Self> {
        let to = object.get("to").and_then(Value::as_str).map(str::trim)?;
        if to.is_empty() {
            return None;
        }
        let data = ["data", "calldata"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str).filter(|d| !d.is_empty()))
            .unwrap_or("0x");
        let value = object
            .get("value")
            .and_then(json_string)
            .unwrap_or_else(|| ZERO_TX_VALUE.to_string());
        let chain_id = object
            .get("chainId")
            .and_then(|c| c.as_u64().or_else(|| c.as_str().and_then(|s| s.parse().ok())))
            .unwrap_or(default_chain_id);

        Some(Self {
            to: to.to_string(),
            data: data.to_string(),
            value,
            chain_id,
        })
    }
}
