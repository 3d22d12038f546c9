//! Balance entity for the swap core

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One balance row. Recomputed on every fetch, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub formatted: String,
    pub raw: String,
    pub decimals: u8,
}

/// A row of the balance sheet: a balance, or the reason it could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BalanceEntry {
    Balance(Balance),
    Error { error: String },
}

impl BalanceEntry {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { error: message.into() }
    }

    pub fn as_balance(&self) -> Option<&Balance> {
        match self {
            Self::Balance(balance) => Some(balance),
            Self::Error { .. } => None,
        }
    }
}

/// Balances keyed by resolved symbol; failed rows keyed by the requested token.
pub type BalanceSheet = BTreeMap<String, BalanceEntry>;
