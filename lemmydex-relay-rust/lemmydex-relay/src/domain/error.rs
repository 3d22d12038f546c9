use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use lemmydex_swap_core::SwapError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error type for the LemmyDEX relay. Every variant renders as
/// `{ "ok": false, "error": "<message>" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RelayError {
    // Caller must fix the request
    InvalidInput(String),

    // Pricing, approval, execution or Safe service failures
    Upstream(String),

    // Chain-data provider failures
    Chain(String),

    // The swap response held nothing signable
    NoExecutableTransaction(String),

    // Optional feature without its settings
    NotConfigured(String),

    // Generic errors
    Generic(String),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::InvalidInput(msg)
            | RelayError::Upstream(msg)
            | RelayError::Chain(msg)
            | RelayError::NoExecutableTransaction(msg)
            | RelayError::NotConfigured(msg)
            | RelayError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for RelayError {}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) | RelayError::Chain(_) => StatusCode::BAD_GATEWAY,
            RelayError::NoExecutableTransaction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RelayError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            RelayError::Generic(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_http_response(&self) -> (StatusCode, serde_json::Value) {
        (
            self.status(),
            serde_json::json!({
                "ok": false,
                "error": self.to_string(),
            }),
        )
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, body) = self.to_http_response();
        if status_code.is_server_error() {
            tracing::error!(status = status_code.as_u16(), "{}", self);
        } else {
            tracing::warn!(status = status_code.as_u16(), "{}", self);
        }
        HttpResponse::build(status_code).json(body)
    }
}

impl From<SwapError> for RelayError {
    fn from(err: SwapError) -> Self {
        let message = err.to_string();
        match err {
            SwapError::InvalidParameters(detail) => RelayError::InvalidInput(detail),
            SwapError::MissingQuote => RelayError::InvalidInput("quote is required".to_string()),
            SwapError::MissingSwapper => RelayError::InvalidInput("swapper is required".to_string()),
            SwapError::Upstream { .. } => RelayError::Upstream(message),
            SwapError::ChainRead(detail) => RelayError::Chain(detail),
            SwapError::NoExecutableTransaction => RelayError::NoExecutableTransaction(message),
            SwapError::Config(detail) => RelayError::NotConfigured(detail),
            SwapError::InvalidTransition { .. } | SwapError::Wallet(_) => RelayError::Generic(message),
        }
    }
}

impl From<anyhow::Error> for RelayError {
    fn from(err: anyhow::Error) -> Self {
        RelayError::Generic(err.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::InvalidInput(format!("Invalid JSON: {err}"))
    }
}
