use actix_web::{web, App, HttpServer};
use lemmydex_relay::api::{api_scope, health};
use lemmydex_relay::infrastructure::config::Config;
use lemmydex_relay::infrastructure::logger::{LogConfig, Logger};
use lemmydex_relay::infrastructure::safe::SafeProposer;
use lemmydex_relay::middleware::{json_config, ErrorHandlingMiddleware};
use lemmydex_swap_core::build_swap_service;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

fn startup_error(context: &str, detail: impl std::fmt::Display) -> Error {
    log::error!("❌ {}: {}", context, detail);
    Error::new(ErrorKind::Other, format!("{}: {}", context, detail))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::new().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        Error::new(ErrorKind::Other, e.to_string())
    })?;

    let _log_guard = Logger::init(LogConfig {
        level: config.log_level.clone(),
        log_directory: config.log_dir.clone(),
        ..LogConfig::default()
    });

    log::info!("🚀 Starting LemmyDEX Relay Server...");

    log::info!("🔍 Validating configuration...");
    let validation_errors = config.validate();
    if !validation_errors.is_empty() {
        return Err(startup_error("Configuration validation failed", validation_errors.join(", ")));
    }
    log::info!("✅ Configuration validation passed");

    let swap_config = Arc::new(config.swap.clone());
    let service = build_swap_service(Arc::clone(&swap_config))
        .await
        .map_err(|e| startup_error("Swap service initialization failed", e))?;
    log::info!("✅ Swap service ready ({} tokens in catalog)", service.catalog().tokens().len());
    if swap_config.trade_api_key.is_none() {
        log::warn!("⚠️ UNISWAP_API_KEY is not set; quote, swap and approval checks will fail");
    }

    let safe = if config.safe.is_enabled() {
        let proposer = SafeProposer::new(&config.safe, &swap_config.rpc_url, swap_config.chain_id)
            .map_err(|e| startup_error("Safe proposer initialization failed", e))?;
        log::info!("✅ Safe proposals enabled, relayer {}", proposer.sender());
        Some(Arc::new(proposer))
    } else {
        log::info!("Safe proposals disabled");
        None
    };

    let port = config.port;
    log::info!("🌐 Starting LemmyDEX Relay Server on port {}", port);
    log::info!("📊 Environment: {}", config.environment);
    log::info!("🔗 Chain: {} ({})", swap_config.chain_name, swap_config.chain_id);

    let service = Arc::new(service);
    let config = Arc::new(config);

    HttpServer::new(move || {
        let mut app = App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(actix_cors::Cors::permissive())
            .app_data(json_config())
            .app_data(web::Data::new(Arc::clone(&service)))
            .app_data(web::Data::new(Arc::clone(&config)));
        if let Some(proposer) = &safe {
            app = app.app_data(web::Data::new(Arc::clone(proposer)));
        }
        app.service(health)
            .service(api_scope().wrap(ErrorHandlingMiddleware::new()))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
