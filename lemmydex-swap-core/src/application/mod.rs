//! Application layer
//!
//! Use cases behind the proxy routes, the ports the swap flow depends on and
//! the orchestrator state machine.

pub mod orchestrator;
pub mod ports;
pub mod use_cases;

pub use orchestrator::*;
pub use ports::*;
pub use use_cases::*;
