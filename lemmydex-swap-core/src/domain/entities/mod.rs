//! Domain entities and value objects
//!
//! Tokens, balances, quotes, pending transactions and allowance results.

pub mod allowance;
pub mod balance;
pub mod quote;
pub mod token;
pub mod transaction;

// Re-export entities
pub use allowance::*;
pub use balance::*;
pub use quote::*;
pub use token::*;
pub use transaction::*;
