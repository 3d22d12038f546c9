//! Constants for the swap core
//!
//! Polygon mainnet is the only deployment target.

// Chain
pub const POLYGON_CHAIN_ID: u64 = 137;
pub const POLYGON_CHAIN_NAME: &str = "polygon";
pub const DEFAULT_RPC_URL: &str = "https://polygon-rpc.com";

// Native asset
pub const NATIVE_SYMBOL: &str = "POL";
pub const NATIVE_NAME: &str = "Polygon Ecosystem Token";
pub const NATIVE_DECIMALS: u8 = 18;
pub const NATIVE_TOKEN_ADDRESS: &str = "0x0000000000000000000000000000000000001010";
/// Accepted spellings of the native asset, compared case-insensitively.
pub const NATIVE_SENTINELS: &[&str] = &["native", "pol", "matic", NATIVE_TOKEN_ADDRESS];

// Well-known contracts
pub const WRAPPED_NATIVE_ADDRESS: &str = "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270";
pub const PERMIT2_ADDRESS: &str = "0x000000000022D473030F116dDEE9F6B43aC78BA3";
pub const USDC_ADDRESS: &str = "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359";
pub const WETH_ADDRESS: &str = "0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619";

// Trade API
pub const TRADE_API_URL: &str = "https://trade-api.gateway.uniswap.org/v1";
pub const TRADE_API_KEY_HEADER: &str = "x-api-key";
pub const QUOTE_TYPE_EXACT_INPUT: &str = "EXACT_INPUT";
pub const ROUTING_PREFERENCE: &str = "BEST_PRICE";

// Degraded-mode precisions
pub const FALLBACK_SELL_DECIMALS: u8 = 18;
pub const FALLBACK_OUTPUT_DECIMALS: u8 = 6;

/// Tokens read by the balance reader when the caller names none.
pub const DEFAULT_BALANCE_TOKENS: &[&str] = &["native", USDC_ADDRESS, WETH_ADDRESS];

pub const INVALID_TOKEN_MESSAGE: &str = "invalid token";
pub const ZERO_TX_VALUE: &str = "0x0";
