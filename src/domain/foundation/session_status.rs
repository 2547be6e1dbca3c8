//! SessionStatus enum for tracking the client's authentication lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Authentication status of the client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
    AuthFailed,
}

impl SessionStatus {
    /// Returns true if a credential call is pending.
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionStatus::Authenticating)
    }

    /// Returns true if the session carries an identity.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionStatus::Authenticated)
    }
}

impl StateMachine for SessionStatus {
    /// Valid transitions:
    /// - any -> Unauthenticated (reset)
    /// - Unauthenticated | Authenticated | AuthFailed -> Authenticating
    /// - Authenticating -> Authenticated | AuthFailed
    /// - any but Authenticating -> Authenticated (provider push)
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        match target {
            Unauthenticated => true,
            Authenticating => !matches!(self, Authenticating),
            Authenticated => true,
            AuthFailed => matches!(self, Authenticating),
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        [Unauthenticated, Authenticating, Authenticated, AuthFailed]
            .into_iter()
            .filter(|target| self.can_transition_to(target))
            .collect()
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Unauthenticated => "Unauthenticated",
            SessionStatus::Authenticating => "Authenticating",
            SessionStatus::Authenticated => "Authenticated",
            SessionStatus::AuthFailed => "AuthFailed",
        };
        write!(f, "{}", s)
    }
}
