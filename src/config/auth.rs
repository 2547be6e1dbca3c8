//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Upper bound accepted for `min_password_length`.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Session manager settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    /// Signup rejects shorter passwords locally, before calling the provider.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_password_length == 0 || self.min_password_length > MAX_PASSWORD_LENGTH {
            return Err(ValidationError::InvalidPasswordLength {
                max: MAX_PASSWORD_LENGTH,
                actual: self.min_password_length,
            });
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
        }
    }
}

fn default_min_password_length() -> usize {
    6
}
