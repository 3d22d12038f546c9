//! Chain reader over an ethers HTTP provider

use crate::domain::repositories::ChainReader;
use crate::shared::abi::erc20_abi;
use crate::shared::config::SwapConfig;
use crate::shared::error::SwapError;
use async_trait::async_trait;
use ethers::abi::{Abi, Detokenize, Tokenize};
use ethers::contract::Contract;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, U256};
use std::sync::Arc;

pub struct EthersChainReader {
    provider: Arc<Provider<Http>>,
    abi: Abi,
}

impl EthersChainReader {
    pub fn new(config: &SwapConfig) -> Result<Self, SwapError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| SwapError::config(format!("Failed to create HTTP provider for {}: {}", config.rpc_url, e)))?;
        Ok(Self {
            provider: Arc::new(provider),
            abi: erc20_abi()?,
        })
    }

    async fn view<A, T>(&self, token: Address, name: &str, args: A) -> Result<T, SwapError>
    where
        A: Tokenize,
        T: Detokenize,
    {
        let contract = Contract::new(token, self.abi.clone(), Arc::clone(&self.provider));
        contract
            .method::<A, T>(name, args)
            .map_err(|e| SwapError::chain_read(format!("{}: {}", name, e)))?
            .call()
            .await
            .map_err(|e| SwapError::chain_read(format!("{}() on {:?}: {}", name, token, e)))
    }
}

#[async_trait]
impl ChainReader for EthersChainReader {
    async fn native_balance(&self, owner: Address) -> Result<U256, SwapError> {
        self.provider
            .get_balance(owner, None)
            .await
            .map_err(|e| SwapError::chain_read(format!("getBalance({:?}): {}", owner, e)))
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, SwapError> {
        self.view(token, "decimals", ()).await
    }

    async fn token_symbol(&self, token: Address) -> Result<String, SwapError> {
        self.view(token, "symbol", ()).await
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, SwapError> {
        self.view(token, "balanceOf", owner).await
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256, SwapError> {
        self.view(token, "allowance", (owner, spender)).await
    }
}
