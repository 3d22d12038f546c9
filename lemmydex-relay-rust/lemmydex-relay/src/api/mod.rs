pub mod handlers;

use actix_web::{web, Scope};
use handlers::{approval, safe, swap, wallet};

pub use handlers::health::health;

/// Every proxy route, mounted under `/api`.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(handlers::health::debug)
        .service(wallet::balances)
        .service(wallet::tokens)
        .service(approval::allowance)
        .service(approval::approve)
        .service(approval::approval)
        .service(approval::check_or_approve)
        .service(swap::quote)
        .service(swap::swap)
        .service(safe::safe_send)
}
