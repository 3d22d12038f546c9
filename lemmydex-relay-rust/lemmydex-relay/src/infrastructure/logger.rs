use std::sync::Once;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    /// Daily-rotated log files go here when set.
    pub log_directory: Option<String>,
    pub enable_colors: bool,
    pub enable_thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_directory: None,
            enable_colors: true,
            enable_thread_ids: false,
        }
    }
}

pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// `RUST_LOG` when set, otherwise both crates at `level`.
pub fn default_directives(level: &str) -> String {
    let level = parse_level(level);
    std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("lemmydex_relay={level},lemmydex_swap_core={level},actix_web={level}"))
}

pub struct Logger;

impl Logger {
    /// Install the global subscriber once per process. Keep the returned guard
    /// alive for as long as file logging should flush.
    pub fn init(config: LogConfig) -> Option<WorkerGuard> {
        let mut guard = None;
        INIT.call_once(|| {
            let env_filter = EnvFilter::new(default_directives(&config.level));
            let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

            let console_layer = fmt::layer()
                .with_timer(UtcTime::rfc_3339())
                .with_thread_ids(config.enable_thread_ids)
                .with_target(true)
                .with_ansi(config.enable_colors)
                .with_writer(std::io::stdout);
            layers.push(Box::new(console_layer));

            if let Some(dir) = &config.log_directory {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    eprintln!("Failed to create log directory {dir}: {e}");
                } else {
                    let file_appender = rolling::daily(dir, "lemmydex_relay.log");
                    let (writer, file_guard) = non_blocking(file_appender);
                    let file_layer = fmt::layer()
                        .with_timer(UtcTime::rfc_3339())
                        .with_thread_ids(config.enable_thread_ids)
                        .with_ansi(false)
                        .with_writer(writer);
                    layers.push(Box::new(file_layer));
                    guard = Some(file_guard);
                }
            }

            let subscriber = Registry::default().with(layers).with(env_filter);
            if let Err(e) = subscriber.try_init() {
                eprintln!("Logger already initialised: {e}");
            }
        });
        guard
    }

    pub fn quote_requested(sell: &str, buy: &str, amount: &str) {
        tracing::info!(sell, buy, amount, "quote requested");
    }

    pub fn swap_prepared(to: &str, chain_id: u64) {
        tracing::info!(to, chain_id, "swap transaction prepared");
    }

    pub fn upstream_failed(service: &str, detail: &str) {
        tracing::warn!(service, detail, "upstream call failed");
    }
}
