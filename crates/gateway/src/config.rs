//! Gateway configuration.

use std::env;

use common::pagination::DEFAULT_PAGE_SIZE;
use common::{env_flag, env_parse, DatabaseConfig};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Shared database pool
    pub database: DatabaseConfig,
    /// Wrap the user list in the pagination envelope
    pub paginate_users: bool,
    /// Page size when the client sends no `page_size`
    pub page_size: u64,
    /// Largest `page_size` a client may ask for; unset means uncapped
    pub max_page_size: Option<u64>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut config = Self {
            host: env::var("SERVER_HOST").unwrap_or(defaults.host),
            port: env_parse("SERVER_PORT", defaults.port),
            database: DatabaseConfig::from_env(),
            paginate_users: env_flag("PAGINATE_USERS", defaults.paginate_users),
            page_size: env_parse("PAGE_SIZE", defaults.page_size),
            max_page_size: env::var("MAX_PAGE_SIZE")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .filter(|&max| max > 0),
        };
        config.page_size = config.page_size.max(1);
        if let Some(max) = config.max_page_size {
            config.page_size = config.page_size.min(max);
        }
        config
    }

    /// Socket address string, `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            database: DatabaseConfig::default(),
            paginate_users: false,
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: None,
        }
    }
}
