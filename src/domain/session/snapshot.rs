//! Session snapshot and change notifications.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::foundation::{Identity, SessionStatus};

/// The client's current authentication state.
///
/// Constructed only through the state-specific constructors, which keep
/// the invariant that an identity is present exactly when the status is
/// `Authenticated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    status: SessionStatus,
    identity: Option<Arc<Identity>>,
}

impl Session {
    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            identity: None,
        }
    }

    pub fn authenticating() -> Self {
        Self {
            status: SessionStatus::Authenticating,
            identity: None,
        }
    }

    pub fn authenticated(identity: Arc<Identity>) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            identity: Some(identity),
        }
    }

    pub fn failed() -> Self {
        Self {
            status: SessionStatus::AuthFailed,
            identity: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_deref()
    }

    /// Shared handle to the identity, for collaborators that keep it around.
    pub fn identity_handle(&self) -> Option<Arc<Identity>> {
        self.identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status.is_authenticated()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::unauthenticated()
    }
}

/// Why the session was reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    /// The client called `logout`.
    Logout,
    /// The provider pushed an out-of-band sign-out (expiry, other tab, revocation).
    ProviderSignOut,
}

/// Notification delivered to session observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionChange {
    /// Ordinary state transition.
    Updated { session: Session },
    /// Full client reset; observers must discard any per-session cached data.
    Reset { session: Session, reason: ResetReason },
}

impl SessionChange {
    pub fn session(&self) -> &Session {
        match self {
            SessionChange::Updated { session } | SessionChange::Reset { session, .. } => session,
        }
    }

    pub fn is_reset(&self) -> bool {
        matches!(self, SessionChange::Reset { .. })
    }
}
