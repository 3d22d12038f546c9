//! LemmyDEX Swap Core
//!
//! Quote, approval and swap orchestration for the LemmyDEX mini-app on
//! Polygon, on top of the Uniswap Trade API.
//!
//! ## Architecture
//!
//! - **Shared**: configuration record, constants, unit conversion, ABI, errors
//! - **Domain**: tokens, balances, quotes, pending transactions and the
//!   chain / Trade API ports
//! - **Application**: one use case per proxy operation, the `SwapService`
//!   that wires them, and the `SwapOrchestrator` state machine
//! - **Infrastructure**: ethers chain reader, Trade API client, token list,
//!   relay client and a local-key wallet host
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lemmydex_swap_core::{init_swap_service, QuoteParams};
//!
//! # async fn run() -> Result<(), lemmydex_swap_core::SwapError> {
//! let service = init_swap_service().await?;
//! let outcome = service
//!     .fetch_quote(&QuoteParams::new(
//!         "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359",
//!         "native",
//!         "25",
//!         "0x1111111111111111111111111111111111111111",
//!     ))
//!     .await?;
//! println!("you receive {}", outcome.formatted_amount_out);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::*;
pub use domain::entities::*;
pub use domain::repositories::*;
pub use infrastructure::*;
pub use shared::config::SwapConfig;
pub use shared::error::SwapError;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build a `SwapService` from `.env` / process environment.
pub async fn init_swap_service() -> Result<SwapService, SwapError> {
    let config = Arc::new(SwapConfig::from_env()?);
    build_swap_service(config).await
}

/// Build a `SwapService` over the live chain and Trade API for `config`.
pub async fn build_swap_service(config: Arc<SwapConfig>) -> Result<SwapService, SwapError> {
    let chain = Arc::new(EthersChainReader::new(&config)?);
    let trade = Arc::new(TradeApiClient::new(Arc::clone(&config)));
    let catalog = load_catalog(&reqwest::Client::new(), &config).await;
    Ok(SwapService::new(config, chain, trade, catalog))
}
