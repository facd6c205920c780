//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/evswap/config.toml`).
//! Every section and field has a default, so a partial or missing file
//! still produces a runnable configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::infrastructure::database::DEFAULT_DATABASE_URL;

/// Path of the configuration file used when none is given explicitly.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("evswap")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub booking: BookingConfig,
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load the configuration from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(content).map_err(|e| format!("Invalid config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.api_port == 0 {
            return Err("server.api_port must be non-zero".to_string());
        }
        if self.database.url.trim().is_empty() {
            return Err("database.url must not be empty".to_string());
        }
        if self.security.jwt_expiration_hours <= 0 {
            return Err("security.jwt_expiration_hours must be positive".to_string());
        }
        if self.booking.max_days_ahead <= 0 {
            return Err("booking.max_days_ahead must be positive".to_string());
        }
        if self.booking.grace_minutes < 0 {
            return Err("booking.grace_minutes must not be negative".to_string());
        }
        if self.booking.expiry_check_interval_secs == 0 {
            return Err("booking.expiry_check_interval_secs must be non-zero".to_string());
        }
        url::Url::parse(&self.payment.gateway_url)
            .map_err(|e| format!("payment.gateway_url is not a valid URL: {}", e))?;
        Ok(())
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for tasks to stop after a shutdown signal.
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `plain` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Empty means a random secret is generated at startup.
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expiration_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@evswap.local".to_string(),
            password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub max_days_ahead: i64,
    /// Minutes after `scheduled_at` before an unattended booking expires.
    pub grace_minutes: i64,
    pub expiry_check_interval_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_days_ahead: 7,
            grace_minutes: 30,
            expiry_check_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub gateway_url: String,
    pub merchant_code: String,
    pub secret: String,
    pub return_url: String,
    pub currency: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            gateway_url: "https://sandbox.payment-gateway.local/pay".to_string(),
            merchant_code: "EVSWAP".to_string(),
            secret: "change-me".to_string(),
            return_url: "http://localhost:8080/payment/result".to_string(),
            currency: "VND".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            api_port = 9090

            [booking]
            grace_minutes = 15
            "#,
        )
        .unwrap();

        assert_eq!(config.server.api_port, 9090);
        assert_eq!(config.server.api_host, "0.0.0.0");
        assert_eq!(config.booking.grace_minutes, 15);
        assert_eq!(config.booking.max_days_ahead, 7);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.payment.currency, "VND");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AppConfig::from_toml("[server]\napi_port = 0").is_err());
        assert!(AppConfig::from_toml("[payment]\ngateway_url = \"not a url\"").is_err());
        assert!(AppConfig::from_toml("[booking]\nexpiry_check_interval_secs = 0").is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("evswap-missing-config-test.toml");
        let _ = std::fs::remove_file(&path);
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.api_port, 8080);
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("evswap-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        config.admin.username = "root".to_string();
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.admin.username, "root");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        let path = default_config_path();
        assert!(path.ends_with("evswap/config.toml"));
    }
}
