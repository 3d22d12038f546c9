//! Safe multisig proposals
//!
//! Builds a CALL SafeTx with zero gas fields, signs its EIP-712 hash with the
//! relayer key and proposes it to the Safe Transaction Service. Executing the
//! transaction is left to the Safe owners.

use crate::infrastructure::config::SafeConfig;
use anyhow::{anyhow, Context, Result};
use ethers::{
    abi::{encode, parse_abi, Token},
    contract::Contract,
    core::types::{Address, Bytes, Signature, H256, U256},
    providers::{Http, Provider},
    signers::{LocalWallet, Signer},
    utils::{keccak256, to_checksum},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SAFE_APP_TX_URL: &str = "https://app.safe.global/transactions";

const DOMAIN_TYPE: &str = "EIP712Domain(uint256 chainId,address verifyingContract)";
const SAFE_TX_TYPE: &str = "SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)";

/// Body of `POST /api/safe-send`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SafeSendRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeCall {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl SafeCall {
    pub fn from_request(request: &SafeSendRequest) -> Result<Self> {
        if request.to.trim().is_empty() || request.data.trim().is_empty() {
            return Err(anyhow!("Missing parameters"));
        }
        let to = request
            .to
            .trim()
            .parse::<Address>()
            .map_err(|_| anyhow!("to is not a valid address"))?;
        let data = hex::decode(request.data.trim().trim_start_matches("0x")).context("data is not valid hex")?;
        let value = match request.value.as_deref().map(str::trim) {
            None | Some("") => U256::zero(),
            Some(raw) if raw.starts_with("0x") => U256::from_str_radix(&raw[2..], 16).context("invalid hex value")?,
            Some(raw) => U256::from_dec_str(raw).context("invalid decimal value")?,
        };
        Ok(Self {
            to,
            value,
            data: Bytes::from(data),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeProposal {
    pub safe_tx_hash: String,
    pub sender: String,
    pub link: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProposeBody {
    to: String,
    value: String,
    data: String,
    operation: u8,
    safe_tx_gas: String,
    base_gas: String,
    gas_price: String,
    gas_token: String,
    refund_receiver: String,
    nonce: String,
    contract_transaction_hash: String,
    sender: String,
    signature: String,
    origin: String,
}

/// EIP-712 hash of a CALL SafeTx with every gas field zeroed.
pub fn safe_tx_hash(chain_id: u64, safe: Address, call: &SafeCall, nonce: U256) -> H256 {
    let domain_separator = keccak256(encode(&[
        Token::FixedBytes(keccak256(DOMAIN_TYPE).to_vec()),
        Token::Uint(U256::from(chain_id)),
        Token::Address(safe),
    ]));

    let struct_hash = keccak256(encode(&[
        Token::FixedBytes(keccak256(SAFE_TX_TYPE).to_vec()),
        Token::Address(call.to),
        Token::Uint(call.value),
        Token::FixedBytes(keccak256(&call.data).to_vec()),
        Token::Uint(U256::zero()),
        Token::Uint(U256::zero()),
        Token::Uint(U256::zero()),
        Token::Uint(U256::zero()),
        Token::Address(Address::zero()),
        Token::Address(Address::zero()),
        Token::Uint(nonce),
    ]));

    let mut digest = Vec::with_capacity(66);
    digest.extend_from_slice(&[0x19, 0x01]);
    digest.extend_from_slice(&domain_separator);
    digest.extend_from_slice(&struct_hash);
    H256::from(keccak256(digest))
}

pub fn signature_hex(signature: &Signature) -> String {
    format!("0x{}", hex::encode(signature.to_vec()))
}

pub fn proposal_link(hash: &H256) -> String {
    format!("{}/{:?}", SAFE_APP_TX_URL, hash)
}

pub struct SafeProposer {
    safe: Address,
    chain_id: u64,
    wallet: LocalWallet,
    provider: Arc<Provider<Http>>,
    client: reqwest::Client,
    tx_service_url: String,
    api_key: Option<String>,
}

impl SafeProposer {
    pub fn new(safe: &SafeConfig, rpc_url: &str, chain_id: u64) -> Result<Self> {
        let safe_address = safe
            .safe_address
            .as_deref()
            .ok_or_else(|| anyhow!("SAFE_ADDRESS is not set"))?
            .parse::<Address>()
            .map_err(|e| anyhow!("Invalid SAFE_ADDRESS: {}", e))?;
        let key = safe.relayer_pk.as_deref().ok_or_else(|| anyhow!("RELAYER_PK is not set"))?;
        let wallet = key
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| anyhow!("Invalid RELAYER_PK: {}", e))?
            .with_chain_id(chain_id);
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| anyhow!("Failed to create HTTP provider for {}: {}", rpc_url, e))?;

        Ok(Self {
            safe: safe_address,
            chain_id,
            wallet,
            provider: Arc::new(provider),
            client: reqwest::Client::new(),
            tx_service_url: safe.tx_service_url.trim_end_matches('/').to_string(),
            api_key: safe.api_key.clone(),
        })
    }

    pub fn sender(&self) -> String {
        to_checksum(&self.wallet.address(), None)
    }

    async fn nonce(&self) -> Result<U256> {
        let abi = parse_abi(&["function nonce() view returns (uint256)"])?;
        let contract = Contract::new(self.safe, abi, Arc::clone(&self.provider));
        let nonce: U256 = contract
            .method("nonce", ())?
            .call()
            .await
            .map_err(|e| anyhow!("Failed to read Safe nonce: {}", e))?;
        Ok(nonce)
    }

    pub async fn propose(&self, call: SafeCall) -> Result<SafeProposal> {
        let nonce = self.nonce().await?;
        let hash = safe_tx_hash(self.chain_id, self.safe, &call, nonce);
        let signature = self
            .wallet
            .sign_hash(hash)
            .map_err(|e| anyhow!("Failed to sign SafeTx hash: {}", e))?;
        let sender = self.sender();

        tracing::info!(safe = ?self.safe, nonce = %nonce, hash = ?hash, "proposing Safe transaction");

        let body = ProposeBody {
            to: to_checksum(&call.to, None),
            value: call.value.to_string(),
            data: format!("0x{}", hex::encode(&call.data)),
            operation: 0,
            safe_tx_gas: "0".to_string(),
            base_gas: "0".to_string(),
            gas_price: "0".to_string(),
            gas_token: to_checksum(&Address::zero(), None),
            refund_receiver: to_checksum(&Address::zero(), None),
            nonce: nonce.to_string(),
            contract_transaction_hash: format!("{:?}", hash),
            sender: sender.clone(),
            signature: signature_hex(&signature),
            origin: "lemmydex-relay".to_string(),
        };

        let url = format!(
            "{}/api/v1/safes/{}/multisig-transactions/",
            self.tx_service_url,
            to_checksum(&self.safe, None)
        );
        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.context("Safe Transaction Service unreachable")?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Safe Transaction Service returned {}: {}", status.as_u16(), text));
        }

        Ok(SafeProposal {
            safe_tx_hash: format!("{:?}", hash),
            sender,
            link: proposal_link(&hash),
        })
    }
}
