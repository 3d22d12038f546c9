//! ERC-20 ABI fragments
//!
//! Human-readable signatures for the views the chain reader calls and the
//! `approve` call the approval builder encodes.

use crate::shared::error::SwapError;
use ethers::abi::{parse_abi, Abi};
use ethers::contract::BaseContract;
use ethers::types::{Address, Bytes, U256};

pub const ERC20_ABI: &[&str] = &[
    "function decimals() view returns (uint8)",
    "function symbol() view returns (string)",
    "function balanceOf(address owner) view returns (uint256)",
    "function allowance(address owner, address spender) view returns (uint256)",
    "function approve(address spender, uint256 amount) returns (bool)",
];

pub fn erc20_abi() -> Result<Abi, SwapError> {
    parse_abi(ERC20_ABI).map_err(|e| SwapError::config(format!("ERC-20 ABI: {}", e)))
}

/// Calldata for `approve(spender, amount)`.
pub fn encode_approve(spender: Address, amount: U256) -> Result<Bytes, SwapError> {
    let contract = BaseContract::from(erc20_abi()?);
    contract
        .encode("approve", (spender, amount))
        .map_err(|e| SwapError::config(format!("cannot encode approve: {}", e)))
}
