//! Local-key wallet host
//!
//! Stands in for the mini-app's wallet capability in CLIs and tests against a
//! real chain: authentication yields the key's address, execution signs,
//! sends and waits for the receipt.

use crate::application::ports::{HostResult, WalletHost};
use crate::domain::entities::PendingTransaction;
use crate::shared::config::SwapConfig;
use crate::shared::error::SwapError;
use crate::shared::utils::{checksum, parse_address};
use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Bytes, TransactionRequest, U256, U64};

pub struct LocalSignerWallet {
    client: SignerMiddleware<Provider<Http>, LocalWallet>,
}

impl LocalSignerWallet {
    pub fn new(private_key: &str, config: &SwapConfig) -> Result<Self, SwapError> {
        let wallet = private_key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| SwapError::wallet(format!("invalid private key: {}", e)))?
            .with_chain_id(config.chain_id);
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| SwapError::config(format!("Failed to create HTTP provider for {}: {}", config.rpc_url, e)))?;
        Ok(Self {
            client: SignerMiddleware::new(provider, wallet),
        })
    }

    pub fn address(&self) -> String {
        checksum(&self.client.signer().address())
    }

    async fn execute(&self, tx: &PendingTransaction) -> Result<String, String> {
        let request = to_request(tx).map_err(|e| e.to_string())?;
        let pending = self
            .client
            .send_transaction(request, None)
            .await
            .map_err(|e| format!("send failed: {}", e))?;
        let hash = pending.tx_hash();
        log::info!("submitted {:?}, waiting for receipt", hash);
        let receipt = pending
            .await
            .map_err(|e| format!("receipt for {:?} unavailable: {}", hash, e))?
            .ok_or_else(|| format!("transaction {:?} dropped", hash))?;
        if receipt.status == Some(U64::zero()) {
            return Err(format!("transaction {:?} reverted", hash));
        }
        Ok(format!("{:?}", receipt.transaction_hash))
    }
}

/// Ethers request for a normalized transaction.
pub fn to_request(tx: &PendingTransaction) -> Result<TransactionRequest, SwapError> {
    let to = parse_address(&tx.to, "to")?;
    let data: Bytes = if tx.data.trim().is_empty() || tx.data == "0x" {
        Bytes::default()
    } else {
        tx.data
            .parse()
            .map_err(|e| SwapError::invalid_parameters(format!("invalid data: {}", e)))?
    };
    Ok(TransactionRequest::new()
        .to(to)
        .data(data)
        .value(parse_value(&tx.value)?)
        .chain_id(tx.chain_id))
}

/// Hex (`0x`-prefixed) or decimal wei.
pub fn parse_value(value: &str) -> Result<U256, SwapError> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some("") => Ok(U256::zero()),
        Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| e.to_string()),
        None if value.is_empty() => Ok(U256::zero()),
        None => U256::from_dec_str(value).map_err(|e| e.to_string()),
    };
    parsed.map_err(|e| SwapError::invalid_parameters(format!("invalid value {}: {}", value, e)))
}

#[async_trait]
impl WalletHost for LocalSignerWallet {
    async fn authenticate(&self) -> HostResult<String> {
        HostResult::Success(self.address())
    }

    async fn send_transaction(&self, tx: &PendingTransaction) -> HostResult<String> {
        match self.execute(tx).await {
            Ok(hash) => HostResult::Success(hash),
            Err(message) => {
                log::error!("{}", message);
                HostResult::Failed(message)
            }
        }
    }
}
