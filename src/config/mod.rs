// Configuration module entry point
// Layered configuration (defaults, file, environment) and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, HealthConfig};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the default `config.*` file
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest priority first: built-in defaults, the optional file,
    /// `ANALYZER_*` environment variables (`__` separates sections), `PORT`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("ANALYZER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.path", "page_analyzer.db")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "page-analyzer")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("pagination.page_size", 10)?
            .set_default(
                "checker.user_agent",
                concat!("page-analyzer/", env!("CARGO_PKG_VERSION")),
            )?
            .set_override_option("server.port", port_override(std::env::var("PORT").ok()))?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// `PORT` value to apply over `server.port`, if set and numeric
fn port_override(raw: Option<String>) -> Option<i64> {
    raw.and_then(|p| p.trim().parse::<u16>().ok()).map(i64::from)
}
