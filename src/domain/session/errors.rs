//! Authentication error taxonomy.
//!
//! Identity providers report failures with string codes. Those codes are
//! classified once, here, into the closed `AuthError` enum so that callers
//! never match on provider strings.
//!
//! | Provider code | AuthError |
//! |---------------|-----------|
//! | `email-already-in-use` | `AlreadyRegistered` |
//! | `invalid-email` | `InvalidEmail` |
//! | `operation-not-allowed` | `ProviderDisabled` |
//! | `weak-password` | `WeakPassword` |
//! | `user-disabled` | `AccountDisabled` |
//! | `user-not-found`, `wrong-password` | `InvalidCredentials` |
//! | anything else | `Unknown` |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ValidationError};

/// Raw failure reported by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("identity provider error {code}: {message}")]
pub struct ProviderError {
    /// Provider-specific code, e.g. `auth/wrong-password`.
    pub code: String,
    /// Human readable message from the provider.
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Code with any `auth/` namespace prefix removed.
    pub fn bare_code(&self) -> &str {
        self.code.strip_prefix("auth/").unwrap_or(&self.code)
    }
}

/// Classified authentication failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Malformed input rejected before contacting the provider.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Password is too weak")]
    WeakPassword,

    #[error("This email is already registered")]
    AlreadyRegistered,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Email/password accounts are not enabled")]
    ProviderDisabled,

    #[error("This account has been disabled")]
    AccountDisabled,

    /// Unknown account and wrong password are deliberately merged.
    #[error("Email or password is incorrect")]
    InvalidCredentials,

    /// Another login or signup is already in flight for this session.
    #[error("Another authentication request is already in progress")]
    SessionBusy,

    /// The session was reset while the provider call was pending; its result was discarded.
    #[error("Session was signed out while authentication was pending")]
    Superseded,

    #[error("Authentication failed ({code}): {message}")]
    Unknown { code: String, message: String },
}

impl AuthError {
    /// Classifies a raw provider failure.
    pub fn from_provider(err: ProviderError) -> Self {
        match err.bare_code() {
            "email-already-in-use" => AuthError::AlreadyRegistered,
            "invalid-email" => AuthError::InvalidEmail,
            "operation-not-allowed" => AuthError::ProviderDisabled,
            "weak-password" => AuthError::WeakPassword,
            "user-disabled" => AuthError::AccountDisabled,
            "user-not-found" | "wrong-password" => AuthError::InvalidCredentials,
            _ => AuthError::Unknown {
                code: err.code,
                message: err.message,
            },
        }
    }

    pub fn empty_field(field: &str) -> Self {
        AuthError::Validation(ValidationError::empty_field(field))
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AuthError::Validation(_) => ErrorCode::ValidationFailed,
            AuthError::WeakPassword => ErrorCode::WeakPassword,
            AuthError::AlreadyRegistered => ErrorCode::AlreadyRegistered,
            AuthError::InvalidEmail => ErrorCode::InvalidEmail,
            AuthError::ProviderDisabled => ErrorCode::ProviderDisabled,
            AuthError::AccountDisabled => ErrorCode::AccountDisabled,
            AuthError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AuthError::SessionBusy => ErrorCode::SessionBusy,
            AuthError::Superseded => ErrorCode::SessionSuperseded,
            AuthError::Unknown { .. } => ErrorCode::UnknownAuthError,
        }
    }
}

impl From<ProviderError> for AuthError {
    fn from(err: ProviderError) -> Self {
        AuthError::from_provider(err)
    }
}
