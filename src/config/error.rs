//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Minimum password length must be between 1 and {max}, got {actual}")]
    InvalidPasswordLength { max: usize, actual: usize },

    #[error("Level cost must be greater than zero")]
    InvalidLevelCost,

    #[error("XP reward for {0} must be greater than zero")]
    InvalidXpReward(String),

    #[error("Achievement '{0}' is defined more than once")]
    DuplicateAchievement(String),

    #[error("Achievement '{0}' has a rule threshold of zero")]
    InvalidAchievementRule(String),

    #[error("Log filter must not be empty")]
    EmptyLogFilter,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
