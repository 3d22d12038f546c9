//! Quote entity
//!
//! A quote is the pricing service's own object. It is kept opaque and must be
//! handed back unmodified to the swap step, so it is neither `Clone` nor
//! mutable: whoever owns it can present it exactly once.

use crate::shared::utils::{json_decimals, json_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quote(Value);

impl Quote {
    /// Wrap a quote object; `None` for JSON null or a non-object.
    pub fn from_json(value: Value) -> Option<Self> {
        if value.is_object() {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("quoteId").and_then(Value::as_str)
    }

    /// The service's own pre-formatted output amount.
    pub fn buy_amount_decimal(&self) -> Option<String> {
        self.0.get("buyAmountDecimal").and_then(json_string)
    }

    /// Output amount in base units.
    pub fn output_amount(&self) -> Option<String> {
        self.0.pointer("/output/amount").and_then(json_string)
    }

    /// Output token precision as reported inside the payload. The last hop
    /// of the first route path is the fallback when `output.token` is silent.
    pub fn output_decimals(&self) -> Option<u8> {
        self.0
            .pointer("/output/token/decimals")
            .and_then(json_decimals)
            .or_else(|| {
                self.0
                    .pointer("/route/0")
                    .and_then(Value::as_array)
                    .and_then(|path| path.last())
                    .and_then(|hop| hop.pointer("/tokenOut/decimals"))
                    .and_then(json_decimals)
            })
    }

    pub fn has_method_parameters(&self) -> bool {
        self.0.get("methodParameters").map_or(false, |p| !p.is_null())
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }
}

/// A fetched quote plus its display amount.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteOutcome {
    pub quote: Quote,
    pub formatted_amount_out: String,
}
