//! Application configuration module
//!
//! Type-safe configuration loading using the `config` and `dotenvy` crates.
//! Values come from an optional TOML file and from environment variables
//! with the `ACADEMY` prefix; nested values use `__` as the separator.
//! Every section has defaults, so an empty environment is a valid setup.
//!
//! # Example
//!
//! ```no_run
//! use academy_core::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//! println!("Level cost: {}", config.progression.level_cost);
//! # Ok::<(), academy_core::config::ConfigError>(())
//! ```

mod achievements;
mod auth;
mod error;
mod logging;
mod progression;

pub use achievements::AchievementsConfig;
pub use auth::{AuthConfig, MAX_PASSWORD_LENGTH};
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use progression::ProgressionConfig;

use serde::Deserialize;
use std::path::Path;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "ACADEMY";

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Session manager settings
    #[serde(default)]
    pub auth: AuthConfig,

    /// Level curve and XP table
    #[serde(default)]
    pub progression: ProgressionConfig,

    /// Achievement catalog
    #[serde(default)]
    pub achievements: AchievementsConfig,

    /// Tracing subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `ACADEMY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `ACADEMY__AUTH__MIN_PASSWORD_LENGTH=8` -> `auth.min_password_length = 8`
    /// - `ACADEMY__PROGRESSION__XP__QUIZ=200` -> `progression.xp.quiz = 200`
    /// - `ACADEMY__LOGGING__FORMAT=json` -> `logging.format = json`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from a TOML file, with environment variables layered on top.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).format(config::FileFormat::Toml))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.auth.validate()?;
        self.progression.validate()?;
        self.achievements.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
