pub mod approval;
pub mod health;
pub mod safe;
pub mod swap;
pub mod wallet;

use lemmydex_swap_core::SwapService;
use std::sync::Arc;

pub type ServiceData = actix_web::web::Data<Arc<SwapService>>;

#[cfg(test)]
pub(crate) mod test_support {
    //! Hand-written fakes of the chain and Trade API ports.

    use async_trait::async_trait;
    use ethers::types::{Address, U256};
    use lemmydex_swap_core::{
        ApprovalCheckRequest, ChainReader, QuoteRequest, SwapConfig, SwapError, SwapRequest, SwapService,
        TokenCatalog, TradeApi,
    };
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    pub const WALLET: &str = "0x1111111111111111111111111111111111111111";
    pub const USDC: &str = "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359";
    pub const WETH: &str = "0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619";

    pub struct FakeChain {
        pub decimals: Result<u8, SwapError>,
        pub allowance: U256,
        pub balance: U256,
    }

    impl Default for FakeChain {
        fn default() -> Self {
            Self {
                decimals: Ok(6),
                allowance: U256::zero(),
                balance: U256::zero(),
            }
        }
    }

    #[async_trait]
    impl ChainReader for FakeChain {
        async fn native_balance(&self, _owner: Address) -> Result<U256, SwapError> {
            Ok(self.balance)
        }

        async fn token_decimals(&self, _token: Address) -> Result<u8, SwapError> {
            self.decimals.clone()
        }

        async fn token_symbol(&self, token: Address) -> Result<String, SwapError> {
            if token == USDC.parse::<Address>().unwrap_or_default() {
                Ok("USDC".to_string())
            } else {
                Ok("WETH".to_string())
            }
        }

        async fn token_balance(&self, _token: Address, _owner: Address) -> Result<U256, SwapError> {
            Ok(self.balance)
        }

        async fn allowance(&self, _token: Address, _owner: Address, _spender: Address) -> Result<U256, SwapError> {
            Ok(self.allowance)
        }
    }

    /// Canned Trade API answers; records the last quote request it saw.
    pub struct FakeTrade {
        pub quote: Result<Value, SwapError>,
        pub swap: Result<Value, SwapError>,
        pub check_approval: Result<Value, SwapError>,
        pub last_quote: Mutex<Option<QuoteRequest>>,
    }

    impl Default for FakeTrade {
        fn default() -> Self {
            let unused = || Err(SwapError::upstream("/fake", "not scripted"));
            Self {
                quote: unused(),
                swap: unused(),
                check_approval: unused(),
                last_quote: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TradeApi for FakeTrade {
        async fn quote(&self, request: &QuoteRequest) -> Result<Value, SwapError> {
            if let Ok(mut last) = self.last_quote.lock() {
                *last = Some(request.clone());
            }
            self.quote.clone()
        }

        async fn swap(&self, _request: SwapRequest) -> Result<Value, SwapError> {
            self.swap.clone()
        }

        async fn check_approval(&self, _request: &ApprovalCheckRequest) -> Result<Value, SwapError> {
            self.check_approval.clone()
        }
    }

    pub fn service(chain: FakeChain, trade: Arc<FakeTrade>) -> Arc<SwapService> {
        Arc::new(SwapService::new(
            Arc::new(SwapConfig::polygon()),
            Arc::new(chain),
            trade,
            TokenCatalog::builtin(),
        ))
    }
}
