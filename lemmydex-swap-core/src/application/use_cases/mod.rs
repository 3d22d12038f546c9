//! Application use cases
//!
//! One module per proxy operation, plus `SwapService` which wires them
//! together over the chain and Trade API ports.

pub mod allowance;
pub mod approval;
pub mod balances;
pub mod catalog;
pub mod quote;
pub mod service;
pub mod swap;

pub use allowance::*;
pub use approval::*;
pub use balances::*;
pub use catalog::*;
pub use quote::*;
pub use service::*;
pub use swap::*;
