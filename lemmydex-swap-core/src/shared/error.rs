//! Error handling for the swap core
//!
//! This module defines the error types used throughout the swap core.

use thiserror::Error;

/// Swap error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Missing quote")]
    MissingQuote,

    #[error("Missing swapper")]
    MissingSwapper,

    /// Non-2xx or malformed response from the pricing, approval or execution service.
    #[error("{service} failed: {detail}")]
    Upstream { service: String, detail: String },

    #[error("Chain read error: {0}")]
    ChainRead(String),

    #[error("No executable transaction in swap response")]
    NoExecutableTransaction,

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SwapError {
    /// Create an invalid parameters error
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters(message.into())
    }

    /// Create an upstream service error
    pub fn upstream(service: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            detail: detail.into(),
        }
    }

    /// Create a chain read error
    pub fn chain_read(message: impl Into<String>) -> Self {
        Self::ChainRead(message.into())
    }

    /// Create a wallet error
    pub fn wallet(message: impl Into<String>) -> Self {
        Self::Wallet(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameters(_) | Self::MissingQuote | Self::MissingSwapper
        )
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        Self::upstream("decode", format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for SwapError {
    fn from(err: reqwest::Error) -> Self {
        let service = err
            .url()
            .map(|url| url.path().to_string())
            .unwrap_or_else(|| "http".to_string());
        Self::upstream(service, err.to_string())
    }
}
