//! Server configuration module.
//!
//! Configuration is layered, later sources winning:
//!
//! ```text
//! built-in defaults ──► vanledger.toml (optional) ──► VANLEDGER__* env vars
//! ```
//!
//! Environment keys use the field names, e.g. `VANLEDGER__JWT_SECRET`,
//! `VANLEDGER__STOCK_POLICY=reject`.

use chrono::FixedOffset;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vanledger_core::{OverpaymentPolicy, Policies, StockPolicy};
use vanledger_db::DbConfig;

/// Development-only signing secret. Deployments must override it.
const DEV_JWT_SECRET: &str = "vanledger-dev-secret-change-in-production";

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub max_connections: u32,

    /// HS256 secret for session tokens
    pub jwt_secret: String,

    /// Session token lifetime in seconds (default: 30 days)
    pub jwt_lifetime_secs: i64,

    /// Offset of the business timezone from UTC, in minutes (default: IST)
    pub business_utc_offset_minutes: i32,

    pub stock_policy: StockPolicy,

    pub overpayment_policy: OverpaymentPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: "0.0.0.0:8080".to_string(),
            database_path: "./vanledger.db".to_string(),
            max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_lifetime_secs: 30 * 24 * 60 * 60,
            business_utc_offset_minutes: 330,
            stock_policy: StockPolicy::default(),
            overpayment_policy: OverpaymentPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `vanledger.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config: ServerConfig = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(File::with_name("vanledger").required(false))
            .add_source(
                Environment::with_prefix("VANLEDGER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "jwt_secret",
                reason: "must not be empty".to_string(),
            });
        }

        if self.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "jwt_lifetime_secs",
                reason: "must be positive".to_string(),
            });
        }

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_connections",
                reason: "must be at least 1".to_string(),
            });
        }

        self.business_offset()?;
        Ok(())
    }

    /// The business timezone as a fixed offset.
    ///
    /// Real-world offsets run from UTC−12:00 to UTC+14:00.
    pub fn business_offset(&self) -> Result<FixedOffset, ConfigError> {
        let minutes = self.business_utc_offset_minutes;
        if !(-720..=840).contains(&minutes) {
            return Err(ConfigError::InvalidValue {
                key: "business_utc_offset_minutes",
                reason: format!("{minutes} is outside -720..=840"),
            });
        }

        FixedOffset::east_opt(minutes * 60).ok_or_else(|| ConfigError::InvalidValue {
            key: "business_utc_offset_minutes",
            reason: format!("{minutes} is not a valid offset"),
        })
    }

    pub fn policies(&self) -> Policies {
        Policies {
            stock: self.stock_policy,
            overpayment: self.overpayment_policy,
        }
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_secs(5))
            .policies(self.policies())
    }

    /// True while the built-in development secret is in use.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}
