//! Utility functions for the swap core
//!
//! Amount conversion, address parsing and small JSON helpers shared by the
//! use cases and adapters.

use crate::shared::error::SwapError;
use ethers::types::{Address, U256};
use ethers::utils::{format_units as ethers_format_units, parse_units, to_checksum};
use serde::de::{self, Deserialize, Deserializer};
use serde_json::Value;

/// Convert a human-readable amount into base units at `decimals` precision.
///
/// Rejects negative or non-numeric input and fractions finer than the token
/// can represent, so a wrong precision can never be rounded away silently.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256, SwapError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(SwapError::invalid_parameters("amount is required"));
    }
    let (integer, fraction) = match amount.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (amount, ""),
    };
    if !is_decimal_amount(amount) {
        return Err(SwapError::invalid_parameters(format!("invalid amount: {}", amount)));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(SwapError::invalid_parameters(format!(
            "amount {} has more than {} decimal places",
            amount, decimals
        )));
    }
    let integer = if integer.is_empty() { "0" } else { integer };
    let normalized = if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{}.{}", integer, fraction)
    };

    parse_units(normalized, u32::from(decimals))
        .map(U256::from)
        .map_err(|e| SwapError::invalid_parameters(format!("invalid amount {}: {}", amount, e)))
}

/// Plain non-negative decimal: digits with at most one `.`, no sign or exponent.
pub fn is_decimal_amount(amount: &str) -> bool {
    let (integer, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    is_digits(integer) && is_digits(fraction) && !(integer.is_empty() && fraction.is_empty())
}

/// Render base units as a decimal string, trailing zeros trimmed (`1.0`, `0.05`).
pub fn format_units(raw: U256, decimals: u8) -> Result<String, SwapError> {
    let formatted = ethers_format_units(raw, u32::from(decimals))
        .map_err(|e| SwapError::invalid_parameters(format!("cannot format {}: {}", raw, e)))?;
    Ok(trim_fraction(&formatted))
}

fn trim_fraction(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((integer, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", integer)
            } else {
                format!("{}.{}", integer, fraction)
            }
        }
        None => format!("{}.0", formatted),
    }
}

/// Parse a base-unit integer string such as the Trade API's `amount` fields.
pub fn parse_base_units(raw: &str) -> Result<U256, SwapError> {
    U256::from_dec_str(raw.trim())
        .map_err(|e| SwapError::invalid_parameters(format!("invalid base-unit amount {}: {}", raw, e)))
}

pub fn is_valid_hex_address(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Parse a required address field, naming the field in the error.
pub fn parse_address(value: &str, field: &str) -> Result<Address, SwapError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SwapError::invalid_parameters(format!("{} is required", field)));
    }
    if !is_valid_hex_address(value) {
        return Err(SwapError::invalid_parameters(format!("{} is not a valid address: {}", field, value)));
    }
    value
        .parse::<Address>()
        .map_err(|e| SwapError::invalid_parameters(format!("{} is not a valid address: {}", field, e)))
}

/// Lowercase `0x`-prefixed hex, the form the Trade API echoes back.
pub fn address_to_string(address: &Address) -> String {
    format!("{:?}", address)
}

/// EIP-55 checksummed form, used wherever an address is shown back to a caller.
pub fn checksum(address: &Address) -> String {
    to_checksum(address, None)
}

/// Read a string or integer JSON field as a string.
pub fn json_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a decimals field that may arrive as a number or a numeric string.
pub fn json_decimals(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|d| u8::try_from(d).ok()),
        Value::String(s) => s.parse::<u8>().ok(),
        _ => None,
    }
}

/// Deserialize an amount sent either as a JSON string or a JSON number.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(de::Error::custom(format!("amount must be a string or number, got {}", other))),
    }
}

/// Require a non-blank string field.
pub fn require(value: &str, field: &str) -> Result<(), SwapError> {
    if value.trim().is_empty() {
        return Err(SwapError::invalid_parameters(format!("{} is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units("0.1", 6).unwrap(), U256::from(100_000u64));
        assert_eq!(to_base_units("1", 18).unwrap(), U256::exp10(18));
        assert_eq!(to_base_units(".5", 2).unwrap(), U256::from(50u64));
        assert_eq!(to_base_units("2.50", 1).unwrap(), U256::from(25u64));
        assert_eq!(to_base_units("7", 0).unwrap(), U256::from(7u64));
    }

    #[test]
    fn test_to_base_units_rejects_bad_input() {
        for bad in ["", "  ", "-1", "abc", "1.2.3", "1e18", ".", "0x10"] {
            let err = to_base_units(bad, 18).unwrap_err();
            assert!(matches!(err, SwapError::InvalidParameters(_)), "accepted {:?}", bad);
        }
        assert!(to_base_units("0.1234567", 6).is_err());
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(100_000u64), 6).unwrap(), "0.1");
        assert_eq!(format_units(U256::exp10(18), 18).unwrap(), "1.0");
        assert_eq!(format_units(U256::from(50_000u64), 6).unwrap(), "0.05");
        assert_eq!(format_units(U256::zero(), 6).unwrap(), "0.0");
        assert_eq!(format_units(U256::from(42u64), 0).unwrap(), "42.0");
    }

    #[test]
    fn test_hex_address_validation() {
        assert!(is_valid_hex_address(PERMIT2_FIXTURE));
        assert!(!is_valid_hex_address("0x000000000022D473030F116dDEE9F6B43aC78BA")); // Too short
        assert!(!is_valid_hex_address("000000000022D473030F116dDEE9F6B43aC78BA3")); // No 0x prefix
        assert!(!is_valid_hex_address("0x000000000022D473030F116dDEE9F6B43aC78BAG"));
        assert!(!is_valid_hex_address(""));
    }

    const PERMIT2_FIXTURE: &str = "0x000000000022D473030F116dDEE9F6B43aC78BA3";

    #[test]
    fn test_parse_address_names_field() {
        let err = parse_address("", "owner").unwrap_err();
        assert_eq!(err, SwapError::invalid_parameters("owner is required"));
        assert!(parse_address(PERMIT2_FIXTURE, "spender").is_ok());
    }

    #[test]
    fn test_checksum() {
        let permit2: Address = PERMIT2_FIXTURE.to_lowercase().parse().unwrap();
        assert_eq!(checksum(&permit2), PERMIT2_FIXTURE);
    }

    #[derive(serde::Deserialize)]
    struct AmountBody {
        #[serde(default, deserialize_with = "deserialize_amount")]
        amount: String,
    }

    #[test]
    fn test_deserialize_amount() {
        let body: AmountBody = serde_json::from_str(r#"{"amount": "0.1"}"#).unwrap();
        assert_eq!(body.amount, "0.1");
        let body: AmountBody = serde_json::from_str(r#"{"amount": 0.5}"#).unwrap();
        assert_eq!(body.amount, "0.5");
        let body: AmountBody = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(body.amount, "");
        assert!(serde_json::from_str::<AmountBody>(r#"{"amount": [1]}"#).is_err());
    }

    #[test]
    fn test_json_helpers() {
        assert_eq!(json_string(&serde_json::json!("100")), Some("100".to_string()));
        assert_eq!(json_string(&serde_json::json!(100)), Some("100".to_string()));
        assert_eq!(json_string(&serde_json::json!("")), None);
        assert_eq!(json_decimals(&serde_json::json!(6)), Some(6));
        assert_eq!(json_decimals(&serde_json::json!("18")), Some(18));
        assert_eq!(json_decimals(&serde_json::json!(300)), None);
    }

    proptest! {
        #[test]
        fn base_units_round_trip(
            integer in 0u64..1_000_000_000,
            decimals in 0u8..=30,
            fraction_seed in 0u64..u64::MAX,
        ) {
            let digits = (decimals as usize).min(19);
            let fraction = if digits == 0 {
                String::new()
            } else {
                format!("{:0>width$}", fraction_seed % 10u64.pow(digits as u32), width = digits)
            };
            let human = if fraction.is_empty() {
                integer.to_string()
            } else {
                format!("{}.{}", integer, fraction)
            };

            let raw = to_base_units(&human, decimals).unwrap();
            let fraction_value = if fraction.is_empty() {
                U256::zero()
            } else {
                U256::from_dec_str(&fraction).unwrap() * U256::exp10(decimals as usize - digits)
            };
            prop_assert_eq!(raw, U256::from(integer) * U256::exp10(decimals as usize) + fraction_value);

            let back = to_base_units(&format_units(raw, decimals).unwrap(), decimals).unwrap();
            prop_assert_eq!(back, raw);
        }
    }
}
