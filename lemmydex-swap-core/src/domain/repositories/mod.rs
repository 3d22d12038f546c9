//! Domain repositories
//!
//! Port traits for the chain-data provider and the Trade API, implemented in
//! `infrastructure` and mocked in tests.

pub mod chain_repository;
pub mod trade_repository;

// Re-export repositories
pub use chain_repository::*;
pub use trade_repository::*;
