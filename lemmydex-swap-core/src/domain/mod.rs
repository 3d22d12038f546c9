//! Domain layer - entities and repositories
//!
//! Entities describe what flows through a swap; repositories are the ports
//! to the chain and to the Trade API.

pub mod entities;
pub mod repositories;

// Re-export domain components
pub use entities::*;
pub use repositories::*;
