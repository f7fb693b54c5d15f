//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `STRIPE_SAAS` prefix
//! and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use stripe_saas::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod features;
mod server;
mod subscriptions;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use server::{Environment, ServerConfig};
pub use subscriptions::SubscriptionsConfig;

use serde::Deserialize;

const ENV_PREFIX: &str = "STRIPE_SAAS";

/// Root application configuration
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection; in-memory storage when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// OIDC issuer; anonymous-only when absent
    #[serde(default)]
    pub auth: Option<AuthConfig>,

    /// Owner kind, paths and notices
    #[serde(default)]
    pub subscriptions: SubscriptionsConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `STRIPE_SAAS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `STRIPE_SAAS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `STRIPE_SAAS__SUBSCRIPTIONS__OWNER_KIND=account`
    /// - `STRIPE_SAAS__FEATURES__SLUG_LOOKUP=true`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Production additionally requires an auth section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        match &self.auth {
            Some(auth) => auth.validate(&self.server.environment)?,
            None if self.is_production() => {
                return Err(ValidationError::MissingRequired("AUTH__ISSUER"))
            }
            None => {}
        }
        self.subscriptions.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
