//! API server configuration.
//!
//! Configuration is loaded from environment variables (a `.env` file is read
//! first when present) with fallback to defaults.

use std::env;
use std::path::PathBuf;

use teslo_core::TaxRate;

const DEV_JWT_SECRET: &str = "teslo-dev-secret-change-in-production";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind host
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Secret for signing session tokens
    pub jwt_secret: String,

    /// Session token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Must match the storefront's rate
    pub tax_rate: TaxRate,

    pub environment: Environment,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let environment = match var("TESLO_ENV", "development").to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "production" | "prod" => Environment::Production,
            _ => return Err(ConfigError::InvalidValue("TESLO_ENV".to_string())),
        };

        let jwt_secret = match lookup("TESLO_JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ if environment == Environment::Production => {
                return Err(ConfigError::MissingRequired("TESLO_JWT_SECRET".to_string()))
            }
            _ => DEV_JWT_SECRET.to_string(),
        };

        let config = ApiConfig {
            host: var("TESLO_HOST", "0.0.0.0"),

            port: var("TESLO_PORT", "3000")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TESLO_PORT".to_string()))?,

            database_path: PathBuf::from(var("TESLO_DATABASE_PATH", "teslo.db")),

            jwt_secret,

            jwt_lifetime_secs: var("TESLO_JWT_LIFETIME_SECS", "2592000") // 30 days
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TESLO_JWT_LIFETIME_SECS".to_string()))?,

            tax_rate: TaxRate::parse_fraction(&var("TESLO_TAX_RATE", "0.15"))
                .map_err(|_| ConfigError::InvalidValue("TESLO_TAX_RATE".to_string()))?,

            environment,
        };

        if config.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("TESLO_JWT_LIFETIME_SECS".to_string()));
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.database_path, PathBuf::from("teslo.db"));
        assert_eq!(config.jwt_lifetime_secs, 2_592_000);
        assert_eq!(config.tax_rate, TaxRate::from_bps(1500));
        assert!(!config.is_production());
    }

    #[test]
    fn test_production_requires_secret() {
        assert!(matches!(
            load(&[("TESLO_ENV", "production")]),
            Err(ConfigError::MissingRequired(_))
        ));

        let config = load(&[("TESLO_ENV", "production"), ("TESLO_JWT_SECRET", "s3cret")]).unwrap();
        assert!(config.is_production());
        assert_eq!(config.jwt_secret, "s3cret");
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("TESLO_PORT", "http")]).is_err());
        assert!(load(&[("TESLO_TAX_RATE", "15%")]).is_err());
        assert!(load(&[("TESLO_JWT_LIFETIME_SECS", "0")]).is_err());
        assert!(load(&[("TESLO_ENV", "staging")]).is_err());
    }

    #[test]
    fn test_tax_rate_override() {
        let config = load(&[("TESLO_TAX_RATE", "0.21")]).unwrap();
        assert_eq!(config.tax_rate.bps(), 2100);
    }
}
