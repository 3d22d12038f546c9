use crate::infrastructure::config::Config;
use actix_web::{get, web::Data, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "ok": true,
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Which settings were loaded. Secrets are reported as present or absent only.
#[get("/debug")]
pub async fn debug(config: Data<Arc<Config>>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "ok": true,
        "config": config.summary(),
    }))
}
