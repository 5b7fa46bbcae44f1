//! Environment-sourced startup configuration.
//!
//! Loaded once at process start, following the teacher's `config.rs`
//! load-at-boot style (there: `TradingConfig::from_file`; here: plain env
//! vars, since the spec names no config file).

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Default chunk size for `BatchPipeline`, clamped into `[1, 1000]`.
    pub batch_size: u32,
    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3002);

        let batch_size = env::var("BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(100)
            .clamp(1, 1000);

        let log_json = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self { host, port, batch_size, log_json }
    }
}
