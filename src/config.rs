//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/cottage-rental/config.toml`,
//! or the path in `COTTAGE_CONFIG`). Every section and field is optional.
//! `DATABASE_URL` and `JWT_SECRET` override the file.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::StayPolicy;
use crate::infrastructure::{DatabaseConfig, JwtConfig};
use crate::shared::InfraError;

pub const CONFIG_PATH_ENV: &str = "COTTAGE_CONFIG";

/// Longest accepted cancellation window, one year
pub const MAX_CANCELLATION_WINDOW_HOURS: i64 = 24 * 365;

/// `~/.config/cottage-rental/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cottage-rental")
        .join("config.toml")
}

/// `COTTAGE_CONFIG` if set, otherwise [`default_config_path`].
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub booking: BookingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Time allowed for in-flight requests after a shutdown signal
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let defaults = DatabaseConfig::default();
        Self {
            url: defaults.url,
            max_connections: defaults.max_connections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HMAC secret shared with the token issuer
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        let defaults = JwtConfig::default();
        Self {
            jwt_secret: defaults.secret,
            jwt_issuer: defaults.issuer,
            jwt_expiration_hours: defaults.expiration_hours,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Hour of day (UTC) a stay begins
    pub check_in_hour: u32,
    /// Hour of day (UTC) a stay ends
    pub check_out_hour: u32,
    /// Cancellation closes this many hours before check-in
    pub cancellation_window_hours: i64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        let defaults = StayPolicy::default();
        Self {
            check_in_hour: defaults.check_in_hour,
            check_out_hour: defaults.check_out_hour,
            cancellation_window_hours: defaults.cancellation_window.num_hours(),
        }
    }
}

impl BookingConfig {
    pub fn policy(&self) -> StayPolicy {
        StayPolicy {
            check_in_hour: self.check_in_hour,
            check_out_hour: self.check_out_hour,
            cancellation_window: Duration::try_hours(self.cancellation_window_hours)
                .unwrap_or(Duration::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
    /// One JSON object per line instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Read and validate `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), InfraError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let text = toml::to_string_pretty(self)
            .map_err(|e| InfraError::Config(format!("cannot serialize config: {}", e)))?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Apply `DATABASE_URL` and `JWT_SECRET` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET").filter(|v| !v.is_empty()) {
            self.security.jwt_secret = secret;
        }
        self
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        let booking = &self.booking;
        for (name, hour) in [
            ("check_in_hour", booking.check_in_hour),
            ("check_out_hour", booking.check_out_hour),
        ] {
            if hour > 23 {
                return Err(InfraError::Config(format!(
                    "booking.{} must be between 0 and 23, got {}",
                    name, hour
                )));
            }
        }
        // Stays sharing a changeover date must not overlap.
        if booking.check_in_hour < booking.check_out_hour {
            return Err(InfraError::Config(format!(
                "booking.check_in_hour ({}) must not be earlier than booking.check_out_hour ({})",
                booking.check_in_hour, booking.check_out_hour
            )));
        }
        if !(0..=MAX_CANCELLATION_WINDOW_HOURS).contains(&booking.cancellation_window_hours) {
            return Err(InfraError::Config(format!(
                "booking.cancellation_window_hours must be between 0 and {}, got {}",
                MAX_CANCELLATION_WINDOW_HOURS, booking.cancellation_window_hours
            )));
        }
        if self.database.max_connections == 0 {
            return Err(InfraError::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            expiration_hours: self.security.jwt_expiration_hours,
            issuer: self.security.jwt_issuer.clone(),
        }
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.api_address(), "0.0.0.0:8080");
        assert_eq!(cfg.server.shutdown_timeout_secs, 30);
        assert_eq!(cfg.security.jwt_issuer, "cottage-rental");
        assert_eq!(cfg.booking.policy(), StayPolicy::default());
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            api_port = 9090

            [booking]
            cancellation_window_hours = 48
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.api_port, 9090);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert_eq!(cfg.booking.policy().cancellation_window, Duration::hours(48));
        assert_eq!(cfg.booking.check_in_hour, 14);
    }

    #[test]
    fn out_of_range_hours_are_rejected() {
        let mut cfg = AppConfig::default();
        cfg.booking.check_out_hour = 24;
        assert!(matches!(cfg.validate(), Err(InfraError::Config(_))));

        let mut cfg = AppConfig::default();
        cfg.booking.cancellation_window_hours = -1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn check_in_before_check_out_is_rejected() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [booking]
            check_in_hour = 9
            check_out_hour = 11
            "#,
        )
        .unwrap();
        assert!(matches!(cfg.validate(), Err(InfraError::Config(_))));

        let mut same_hour = AppConfig::default();
        same_hour.booking.check_in_hour = 12;
        same_hour.booking.check_out_hour = 12;
        assert!(same_hour.validate().is_ok());
        let policy = same_hour.booking.policy();
        let first = policy
            .normalize("2025-09-01".parse().unwrap(), "2025-09-05".parse().unwrap())
            .unwrap();
        let second = policy
            .normalize("2025-09-05".parse().unwrap(), "2025-09-10".parse().unwrap())
            .unwrap();
        assert!(!first.overlaps(&second));
    }

    #[test]
    fn oversized_cancellation_window_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.booking.cancellation_window_hours = MAX_CANCELLATION_WINDOW_HOURS;
        assert!(cfg.validate().is_ok());

        cfg.booking.cancellation_window_hours = 3_000_000_000;
        assert!(matches!(cfg.validate(), Err(InfraError::Config(_))));
        // Unvalidated values still produce a usable policy.
        cfg.booking.cancellation_window_hours = i64::MAX;
        assert_eq!(cfg.booking.policy().cancellation_window, Duration::MAX);
    }

    #[test]
    fn environment_overrides_file_values() {
        let cfg = AppConfig::default().with_overrides(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "JWT_SECRET" => Some("from-env".to_string()),
            _ => None,
        });
        assert_eq!(cfg.database_config().url, "sqlite::memory:");
        assert_eq!(cfg.jwt_config().secret, "from-env");
        assert!(!cfg.jwt_config().uses_default_secret());
        assert!(AppConfig::default().jwt_config().uses_default_secret());

        let untouched = AppConfig::default().with_overrides(|_| Some(String::new()));
        assert_eq!(untouched, AppConfig::default());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("cottage-rental-{}", uuid::Uuid::new_v4()))
            .join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.logging.json = true;
        cfg.booking.check_in_hour = 15;

        cfg.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), cfg);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("cottage-rental-does-not-exist.toml");
        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());
    }
}
