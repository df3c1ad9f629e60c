//! Application configuration
//!
//! Settings are read from environment variables (optionally seeded from a
//! `.env` file) through the `config` crate, with defaults for local
//! development.

use anyhow::{Result, bail};
use config::{Config, Environment};
use serde::Deserialize;

/// Radius above which no proximity query is ever accepted, in metres
pub const RADIUS_CEILING_METERS: f64 = 5000.0;

/// Default operational radius cap, in metres
pub const DEFAULT_MAX_RADIUS_METERS: f64 = 2000.0;

/// Longest session token lifetime accepted, one year in minutes
pub const MAX_JWT_EXPIRY_MINUTES: i64 = 525_600;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Symmetric secret used to sign session tokens
    pub jwt_secret: String,
    /// Session token lifetime in minutes
    pub jwt_expiry_minutes: i64,
    /// Largest radius accepted by proximity search, in metres
    pub max_radius_meters: f64,
    /// Deadline for a whole request, in seconds
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiry_minutes: 60,
            max_radius_meters: DEFAULT_MAX_RADIUS_METERS,
            request_timeout_seconds: 30,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HOST`: Interface to bind (default: "0.0.0.0")
    /// - `PORT`: Port to listen on (default: 8000)
    /// - `JWT_SECRET`: Token signing secret
    /// - `JWT_EXPIRY_MINUTES`: Token lifetime (default: 60, at most one year)
    /// - `MAX_RADIUS_METERS`: Proximity search cap (default: 2000, at most 5000)
    /// - `REQUEST_TIMEOUT_SECONDS`: Per-request deadline (default: 30)
    pub fn from_env() -> Result<Self> {
        let defaults = AppConfig::default();

        let config: AppConfig = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("jwt_expiry_minutes", defaults.jwt_expiry_minutes)?
            .set_default("max_radius_meters", defaults.max_radius_meters)?
            .set_default(
                "request_timeout_seconds",
                defaults.request_timeout_seconds as i64,
            )?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the services cannot honour
    pub fn validate(&self) -> Result<()> {
        if !(self.max_radius_meters > 0.0 && self.max_radius_meters <= RADIUS_CEILING_METERS) {
            bail!(
                "MAX_RADIUS_METERS must be in (0, {}], got {}",
                RADIUS_CEILING_METERS,
                self.max_radius_meters
            );
        }

        if !(1..=MAX_JWT_EXPIRY_MINUTES).contains(&self.jwt_expiry_minutes) {
            bail!(
                "JWT_EXPIRY_MINUTES must be in [1, {}], got {}",
                MAX_JWT_EXPIRY_MINUTES,
                self.jwt_expiry_minutes
            );
        }

        if self.jwt_secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 6] = [
        "HOST",
        "PORT",
        "JWT_SECRET",
        "JWT_EXPIRY_MINUTES",
        "MAX_RADIUS_METERS",
        "REQUEST_TIMEOUT_SECONDS",
    ];

    fn clear_env() {
        for key in KEYS {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_app_config_defaults() {
        clear_env();

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.jwt_expiry_minutes, 60);
        assert_eq!(config.max_radius_meters, 2000.0);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    #[serial]
    fn test_app_config_from_env_with_custom_values() {
        clear_env();
        unsafe {
            std::env::set_var("PORT", "9090");
            std::env::set_var("JWT_SECRET", "s3cret");
            std::env::set_var("JWT_EXPIRY_MINUTES", "5");
            std::env::set_var("MAX_RADIUS_METERS", "4500");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.jwt_expiry_minutes, 5);
        assert_eq!(config.max_radius_meters, 4500.0);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_radius_cap_above_ceiling_is_rejected() {
        clear_env();
        unsafe {
            std::env::set_var("MAX_RADIUS_METERS", "5001");
        }

        assert!(AppConfig::from_env().is_err());

        clear_env();
    }

    #[test]
    fn test_validate_rejects_zero_expiry() {
        let config = AppConfig {
            jwt_expiry_minutes: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_caps_expiry_at_one_year() {
        let at_cap = AppConfig {
            jwt_expiry_minutes: MAX_JWT_EXPIRY_MINUTES,
            ..AppConfig::default()
        };
        assert!(at_cap.validate().is_ok());

        let huge = AppConfig {
            jwt_expiry_minutes: i64::MAX / 60,
            ..AppConfig::default()
        };
        assert!(huge.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_expiry_above_ceiling_is_rejected_at_startup() {
        clear_env();
        unsafe {
            std::env::set_var("JWT_EXPIRY_MINUTES", "525601");
        }

        assert!(AppConfig::from_env().is_err());

        clear_env();
    }
}
