//! Session observer port - synchronous session change notification.

use crate::domain::session::SessionChange;

/// Receives every session change.
///
/// Called synchronously while the session lock is held, so an observer
/// always sees changes in order and never sees a half-applied state.
/// Implementations must return quickly and must not call back into the
/// session manager.
pub trait SessionObserver: Send + Sync {
    fn on_change(&self, change: &SessionChange);
}

impl<F> SessionObserver for F
where
    F: Fn(&SessionChange) + Send + Sync,
{
    fn on_change(&self, change: &SessionChange) {
        self(change)
    }
}
