pub mod error_handling;

pub use error_handling::{json_config, ErrorHandlingMiddleware};
