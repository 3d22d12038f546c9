//! Token entity for the swap core

use crate::shared::constants::{NATIVE_DECIMALS, NATIVE_NAME, NATIVE_SENTINELS, NATIVE_SYMBOL, NATIVE_TOKEN_ADDRESS};
use crate::shared::utils::is_valid_hex_address;
use ethers::types::Address;
use serde::{Deserialize, Serialize};

/// Swappable token metadata. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub name: String,
    pub symbol: String,
    pub address: String,
    pub logo: Option<String>,
    pub decimals: u8,
}

impl Token {
    pub fn new(name: &str, symbol: &str, address: &str, logo: Option<&str>, decimals: u8) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            address: address.to_string(),
            logo: logo.map(str::to_string),
            decimals,
        }
    }

    /// The chain's base asset under its canonical symbol.
    pub fn native(logo: Option<&str>) -> Self {
        Self::new(NATIVE_NAME, NATIVE_SYMBOL, NATIVE_TOKEN_ADDRESS, logo, NATIVE_DECIMALS)
    }

    pub fn is_native(&self) -> bool {
        is_native_sentinel(&self.address)
    }

    /// Match by address (case-insensitive); any native spelling matches the native token.
    pub fn matches(&self, key: &str) -> bool {
        if is_native_sentinel(key) {
            return self.is_native();
        }
        self.address.eq_ignore_ascii_case(key.trim())
    }
}

/// True for every accepted spelling of the native asset.
pub fn is_native_sentinel(value: &str) -> bool {
    let value = value.trim();
    NATIVE_SENTINELS.iter().any(|s| s.eq_ignore_ascii_case(value))
}

/// A token reference as it arrives in a request: the native asset or an ERC-20 contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRef {
    Native,
    Erc20(Address),
}

impl TokenRef {
    /// `None` when the value is neither a native spelling nor a hex address.
    pub fn parse(value: &str) -> Option<Self> {
        if is_native_sentinel(value) {
            return Some(Self::Native);
        }
        let value = value.trim();
        if !is_valid_hex_address(value) {
            return None;
        }
        value.parse::<Address>().ok().map(Self::Erc20)
    }

    /// The ERC-20 address quoting services expect, with native mapped to `wrapped_native`.
    pub fn quotable_address(&self, wrapped_native: Address) -> Address {
        match self {
            Self::Native => wrapped_native,
            Self::Erc20(address) => *address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_sentinel_spellings() {
        for spelling in [
            "native",
            "NATIVE",
            "pol",
            "POL",
            "matic",
            "Matic",
            "0x0000000000000000000000000000000000001010",
            " 0x0000000000000000000000000000000000001010 ",
        ] {
            assert!(is_native_sentinel(spelling), "{}", spelling);
            assert_eq!(TokenRef::parse(spelling), Some(TokenRef::Native));
        }
        assert!(!is_native_sentinel("0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270"));
    }

    #[test]
    fn test_token_ref_parse() {
        let wmatic = "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270";
        assert_eq!(
            TokenRef::parse(wmatic),
            Some(TokenRef::Erc20(wmatic.parse().unwrap()))
        );
        assert_eq!(TokenRef::parse("USDC"), None);
        assert_eq!(TokenRef::parse(""), None);
    }

    #[test]
    fn test_quotable_address_wraps_native() {
        let wrapped: Address = "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270".parse().unwrap();
        assert_eq!(TokenRef::Native.quotable_address(wrapped), wrapped);

        let usdc: Address = "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359".parse().unwrap();
        assert_eq!(TokenRef::Erc20(usdc).quotable_address(wrapped), usdc);
    }

    #[test]
    fn test_token_matches() {
        let native = Token::native(None);
        assert_eq!(native.symbol, "POL");
        assert!(native.matches("matic"));
        assert!(native.matches("native"));

        let weth = Token::new("Wrapped Ether", "WETH", "0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619", None, 18);
        assert!(weth.matches("0x7ceb23fd6bc0add59e62ac25578270cff1b9f619"));
        assert!(!weth.matches("native"));
    }
}
