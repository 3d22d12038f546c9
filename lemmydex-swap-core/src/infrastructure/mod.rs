//! Infrastructure layer
//!
//! Adapters behind the core ports: the ethers chain reader, the Trade API
//! client, the remote token list, the relay client and a local-key wallet host.

pub mod chain;
pub mod relay_client;
pub mod signer_wallet;
pub mod token_list;
pub mod trade_api;

pub use chain::*;
pub use relay_client::*;
pub use signer_wallet::*;
pub use token_list::*;
pub use trade_api::*;
