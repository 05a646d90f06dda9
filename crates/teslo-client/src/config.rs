//! # Client Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TESLO_API_URL=https://shop.example.com                             │
//! │     TESLO_TAX_RATE=0.15                                                │
//! │     TESLO_STORAGE_PATH=/var/lib/teslo/storage.json                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/shop/client.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.teslo.shop/client.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tax rate must equal the server's, otherwise every order is refused
//! with `TOTAL_MISMATCH`.
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! url = "http://localhost:3000"
//!
//! [cart]
//! tax_rate = "0.15"
//!
//! [storage]
//! path = "/home/ana/.local/share/shop/storage.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use teslo_core::TaxRate;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the API server.
    #[serde(default = "default_api_url")]
    pub url: String,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            url: default_api_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSettings {
    /// Tax as a decimal fraction ("0.15" = 15%).
    #[serde(default = "default_tax_rate")]
    pub tax_rate: String,
}

fn default_tax_rate() -> String {
    "0.15".to_string()
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            tax_rate: default_tax_rate(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Storage file; the platform data directory when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    pub fn validate(&self) -> ClientResult<()> {
        let url = &self.api.url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got: {}",
                url
            )));
        }

        self.tax_rate()?;
        Ok(())
    }

    /// Applies `TESLO_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("TESLO_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.url = url;
        }

        if let Some(rate) = lookup("TESLO_TAX_RATE") {
            debug!(tax_rate = %rate, "Overriding tax rate from environment");
            self.cart.tax_rate = rate;
        }

        if let Some(path) = lookup("TESLO_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(path));
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "teslo", "shop")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn api_url(&self) -> &str {
        &self.api.url
    }

    /// Parsed tax rate.
    pub fn tax_rate(&self) -> ClientResult<TaxRate> {
        TaxRate::parse_fraction(&self.cart.tax_rate)
            .map_err(|e| ClientError::InvalidConfig(format!("tax_rate: {}", e)))
    }

    pub fn storage_path(&self) -> Option<&PathBuf> {
        self.storage.path.as_ref()
    }
}
