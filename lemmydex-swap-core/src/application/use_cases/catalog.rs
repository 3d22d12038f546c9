//! Token Catalog
//!
//! The built-in Polygon list, or a remote Uniswap-format list when one is
//! configured. Native entries are always stored under the canonical symbol
//! so they line up with balance-sheet keys.

use crate::domain::entities::{is_native_sentinel, Token};
use crate::shared::constants::NATIVE_SYMBOL;

const COINGECKO: &str = "https://assets.coingecko.com/coins/images";

/// Swappable tokens shipped with the app.
pub fn polygon_tokens() -> Vec<Token> {
    let logo = |path: &str| format!("{}/{}", COINGECKO, path);
    vec![
        Token::new("USD Coin (Bridged)", "USDC.e", "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174", Some(&logo("6319/large/USD_Coin_icon.png")), 6),
        Token::new("Wrapped Ether", "WETH", "0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619", Some(&logo("279/large/ethereum.png")), 18),
        Token::new("Wrapped Matic", "WMATIC", "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270", Some(&logo("4713/large/matic-token-icon.png")), 18),
        Token::native(Some(&logo("4713/large/matic-token-icon.png"))),
        Token::new("Aave", "AAVE", "0xd6df932a45c0f255f85145f286ea0b292b21c90b", Some(&logo("12645/large/AAVE.png")), 18),
        Token::new("Chainlink", "LINK", "0x53E0bca35eC356BD5ddDFebbD1Fc0fD03FaBad39", Some(&logo("877/large/chainlink-new-logo.png")), 18),
        Token::new("Uniswap", "UNI", "0xb33EaAd8d922B1083446DC23f610c2567fB5180f", Some(&logo("12504/large/uniswap-uni.png")), 18),
        Token::new("Tether USD", "USDT", "0xc2132D05D31c914a87C6611C10748AEb04B58e8F", Some(&logo("325/large/Tether-logo.png")), 6),
        Token::new("Dai Stablecoin", "DAI", "0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063", Some(&logo("9956/large/4943.png")), 18),
    ]
}

#[derive(Debug, Clone)]
pub struct TokenCatalog {
    tokens: Vec<Token>,
}

impl TokenCatalog {
    pub fn new(tokens: Vec<Token>) -> Self {
        let tokens = tokens
            .into_iter()
            .map(|mut token| {
                if is_native_sentinel(&token.address) {
                    token.symbol = NATIVE_SYMBOL.to_string();
                }
                token
            })
            .collect();
        Self { tokens }
    }

    pub fn builtin() -> Self {
        Self::new(polygon_tokens())
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Look up by address (case-insensitive) or any native spelling.
    pub fn find(&self, key: &str) -> Option<&Token> {
        self.tokens.iter().find(|token| token.matches(key))
    }

    pub fn symbol_for(&self, key: &str) -> Option<&str> {
        self.find(key).map(|token| token.symbol.as_str())
    }
}

impl Default for TokenCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_list() {
        let catalog = TokenCatalog::builtin();
        assert_eq!(catalog.tokens().len(), 9);
        assert_eq!(catalog.symbol_for("0x2791bca1f2de4661ed88a30c99a7a9449aa84174"), Some("USDC.e"));
        assert_eq!(catalog.find("0xc2132D05D31c914a87C6611C10748AEb04B58e8F").unwrap().decimals, 6);
        assert!(catalog.find("0x0000000000000000000000000000000000000001").is_none());
    }

    #[test]
    fn test_native_spellings_resolve_to_canonical_symbol() {
        let catalog = TokenCatalog::builtin();
        for spelling in ["native", "POL", "matic", "0x0000000000000000000000000000000000001010"] {
            assert_eq!(catalog.symbol_for(spelling), Some("POL"), "{}", spelling);
        }
    }

    #[test]
    fn test_remote_native_entry_is_canonicalized() {
        let catalog = TokenCatalog::new(vec![Token::new(
            "Matic Token",
            "MATIC",
            "0x0000000000000000000000000000000000001010",
            None,
            18,
        )]);
        assert_eq!(catalog.tokens()[0].symbol, "POL");
    }
}
