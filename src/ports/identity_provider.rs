//! Identity provider port - external credential verification and account creation.
//!
//! The provider owns credentials; the core only ever sees the `Identity`
//! it issues and the raw error codes it reports. Classification of those
//! codes into `AuthError` happens in the session domain.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::domain::foundation::Identity;
use crate::domain::session::ProviderError;

/// Out-of-band identity change pushed by the provider.
///
/// Covers token expiry, sign-out in another tab and server-side revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentityChange {
    SignedIn { identity: Identity },
    SignedOut,
}

/// Port for the external identity provider.
///
/// Implementations must:
/// - Report failures with the provider's own error code (an `auth/` prefix is allowed)
/// - Never log or persist the plaintext password
/// - Push `IdentityChange` values for state changes the client did not initiate
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials for an existing account.
    async fn authenticate(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, ProviderError>;

    /// Create a new account and sign it in.
    async fn register(&self, email: &str, password: &SecretString)
        -> Result<Identity, ProviderError>;

    /// End the provider-side session.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Stream of provider-initiated identity changes.
    fn identity_changes(&self) -> broadcast::Receiver<IdentityChange>;
}
