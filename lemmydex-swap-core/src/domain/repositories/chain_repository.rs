//! Chain-data repository
//!
//! Read-only access to the native balance and the ERC-20 views the swap flow
//! needs. State-changing calls never go through here.

use crate::shared::error::SwapError;
use async_trait::async_trait;
use ethers::types::{Address, U256};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Native-asset balance of `owner`
    async fn native_balance(&self, owner: Address) -> Result<U256, SwapError>;

    /// ERC-20 `decimals()`
    async fn token_decimals(&self, token: Address) -> Result<u8, SwapError>;

    /// ERC-20 `symbol()`
    async fn token_symbol(&self, token: Address) -> Result<String, SwapError>;

    /// ERC-20 `balanceOf(owner)`
    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, SwapError>;

    /// ERC-20 `allowance(owner, spender)`
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256, SwapError>;
}
