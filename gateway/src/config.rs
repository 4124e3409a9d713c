//! Gateway configuration

use std::net::SocketAddr;

use db::DbConfig;
use error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default HTTP listen address
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8000";

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP server address
    pub http_addr: SocketAddr,

    /// Database connection settings
    pub db: DbConfig,

    /// Service version
    pub version: String,
}

impl GatewayConfig {
    /// Create configuration from environment variables, reading `.env` first if present
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = raw_addr.trim().parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Invalid {
                var: "HTTP_ADDR".to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            http_addr,
            db: DbConfig::from_lookup(&lookup)?,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(key: &str) -> Option<String> {
        match key {
            "DB_HOST" => Some("localhost".to_string()),
            "DB_PORT" => Some("3306".to_string()),
            "DB_USER" => Some("root".to_string()),
            "DB_PASSWORD" => Some("secret".to_string()),
            "DB_NAME" => Some("envios".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_default_http_addr() {
        let config = GatewayConfig::from_lookup(lookup).unwrap();
        assert_eq!(config.http_addr.to_string(), DEFAULT_HTTP_ADDR);
        assert_eq!(config.db.database, "envios");
    }

    #[test]
    fn test_http_addr_override() {
        let config = GatewayConfig::from_lookup(|key| match key {
            "HTTP_ADDR" => Some("0.0.0.0:9000".to_string()),
            other => lookup(other),
        })
        .unwrap();
        assert_eq!(config.http_addr.port(), 9000);
    }

    #[test]
    fn test_invalid_http_addr() {
        let result = GatewayConfig::from_lookup(|key| match key {
            "HTTP_ADDR" => Some("localhost".to_string()),
            other => lookup(other),
        });
        assert!(matches!(result, Err(ConfigError::Invalid { ref var, .. }) if var == "HTTP_ADDR"));
    }

    #[test]
    fn test_missing_database_settings() {
        let result = GatewayConfig::from_lookup(|_| None);
        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }
}
