//! Identity types for the domain layer.
//!
//! `Identity` is the record an external identity provider issues once a
//! learner's credentials are verified. It has **no provider dependencies**;
//! any provider adapter can populate it via the `IdentityProvider` port.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Externally issued, uniquely identifying record for an authenticated learner.
///
/// Owned by the identity provider. The session only ever holds a shared
/// read-only handle to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable unique identifier from the provider.
    pub id: UserId,

    /// Email-like handle used to sign in.
    pub email: String,

    /// Display name if the provider has one.
    pub display_name: Option<String>,

    /// Whether the provider has verified the email address.
    pub email_verified: bool,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        email_verified: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            email_verified,
        }
    }

    /// Returns the display name, falling back to the local part of the email.
    pub fn greeting_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) => name,
            None => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}
