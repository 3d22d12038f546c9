//! Shared configuration, constants, errors and utilities
//!
//! Everything here is free of I/O apart from `SwapConfig::from_env`.

pub mod abi;
pub mod config;
pub mod constants;
pub mod error;
pub mod utils;

// Re-export shared components
pub use abi::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use utils::*;
