//! SessionManager - the client's authentication state machine.
//!
//! Wraps the identity provider's raw credential calls in a single
//! `Session` with four states, classified errors and synchronous
//! observer notification.
//!
//! Concurrency rules:
//! - One credential call (`login`/`signup`) at a time; a second one gets `SessionBusy`.
//! - `logout` is never busy. Every reset bumps the session epoch, and a pending
//!   credential call whose epoch changed discards its result with `Superseded`.
//! - State changes are queued under the state lock and delivered to
//!   observers after it is released, one drain at a time, so observers see
//!   changes in order and may call back into the manager.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::domain::foundation::{Identity, SessionStatus, StateMachine};
use crate::domain::session::{AuthError, ResetReason, Session, SessionChange};
use crate::ports::{IdentityChange, IdentityProvider, SessionObserver};

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct SessionState {
    session: Session,
    /// Bumped on every reset.
    epoch: u64,
    /// A credential call is awaiting the provider.
    in_flight: bool,
    observers: Vec<(SubscriptionId, Arc<dyn SessionObserver>)>,
    next_subscription: u64,
    /// Applied changes not yet delivered to observers.
    pending: VecDeque<SessionChange>,
    /// A `notify` drain is running.
    delivering: bool,
}

impl SessionState {
    /// Stores the new session and queues the change for `notify`.
    fn apply(&mut self, change: SessionChange) {
        let from = self.session.status();
        let to = change.session().status();
        if !from.can_transition_to(&to) {
            // Every call site only requests legal transitions.
            warn!(%from, %to, "unexpected session transition");
        }
        self.session = change.session().clone();
        self.pending.push_back(change);
    }

    fn reset(&mut self, reason: ResetReason) {
        self.epoch = self.epoch.wrapping_add(1);
        self.apply(SessionChange::Reset {
            session: Session::unauthenticated(),
            reason,
        });
    }
}

/// Owns the process's authentication session.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    config: AuthConfig,
    state: Mutex<SessionState>,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn IdentityProvider>, config: AuthConfig) -> Self {
        Self {
            provider,
            config,
            state: Mutex::new(SessionState {
                session: Session::unauthenticated(),
                epoch: 0,
                in_flight: false,
                observers: Vec::new(),
                next_subscription: 0,
                pending: VecDeque::new(),
                delivering: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current session snapshot.
    pub fn session(&self) -> Session {
        self.lock().session.clone()
    }

    /// Registers an observer for every subsequent session change.
    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) -> SubscriptionId {
        let mut state = self.lock();
        let id = SubscriptionId(state.next_subscription);
        state.next_subscription += 1;
        state.observers.push((id, observer));
        id
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.lock();
        let before = state.observers.len();
        state.observers.retain(|(sub, _)| *sub != id);
        state.observers.len() != before
    }

    /// Signs in with existing credentials.
    ///
    /// Resolves to `Authenticated` or `AuthFailed`; the session is never
    /// left `Authenticating` once this returns.
    pub async fn login(&self, email: &str, password: SecretString) -> Result<Session, AuthError> {
        let email = require_credentials(email, &password)?;
        let call = self.begin()?;
        debug!("login started");

        let result = self.provider.authenticate(email, &password).await;
        call.finish(result.map_err(AuthError::from_provider))
    }

    /// Creates an account and signs it in.
    ///
    /// Passwords shorter than the configured minimum are rejected with
    /// `WeakPassword` without contacting the provider.
    pub async fn signup(&self, email: &str, password: SecretString) -> Result<Session, AuthError> {
        let email = require_credentials(email, &password)?;
        if password.expose_secret().chars().count() < self.config.min_password_length {
            debug!(
                min_length = self.config.min_password_length,
                "signup rejected locally: weak password"
            );
            return Err(AuthError::WeakPassword);
        }
        let call = self.begin()?;
        debug!("signup started");

        let result = self.provider.register(email, &password).await;
        call.finish(result.map_err(AuthError::from_provider))
    }

    /// Resets the session and signs out at the provider.
    ///
    /// The local reset and the `Reset` notification happen first and
    /// unconditionally; a provider sign-out failure is returned afterwards.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.lock().reset(ResetReason::Logout);
        info!("session reset by logout");
        self.notify();

        self.provider.sign_out().await.map_err(|err| {
            warn!(code = %err.code, "provider sign-out failed after local reset");
            AuthError::from_provider(err)
        })
    }

    /// Applies an identity change pushed by the provider.
    pub fn handle_identity_change(&self, change: IdentityChange) {
        self.adopt_identity_change(change);
        self.notify();
    }

    fn adopt_identity_change(&self, change: IdentityChange) {
        let mut state = self.lock();
        match change {
            IdentityChange::SignedOut => {
                let idle = state.session.status() == SessionStatus::Unauthenticated
                    && !state.in_flight;
                if idle {
                    return;
                }
                state.reset(ResetReason::ProviderSignOut);
                info!("session reset by provider sign-out");
            }
            IdentityChange::SignedIn { identity } => {
                if state.in_flight {
                    debug!("ignoring pushed sign-in while a credential call is pending");
                    return;
                }
                let already_held = state
                    .session
                    .identity()
                    .is_some_and(|current| current.id == identity.id);
                if already_held {
                    return;
                }
                info!(user_id = %identity.id, "adopting identity pushed by provider");
                state.apply(SessionChange::Updated {
                    session: Session::authenticated(Arc::new(identity)),
                });
            }
        }
    }

    /// Spawns a task that feeds provider pushes into `handle_identity_change`.
    ///
    /// The task holds a weak reference and ends once the manager is dropped
    /// or the provider closes its channel.
    pub fn spawn_identity_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.provider.identity_changes();
        let manager: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => match manager.upgrade() {
                        Some(manager) => manager.handle_identity_change(change),
                        None => break,
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "identity change listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("identity change listener stopped");
        })
    }

    fn begin(&self) -> Result<InFlight<'_>, AuthError> {
        let epoch = {
            let mut state = self.lock();
            if state.in_flight {
                debug!("credential call rejected: session busy");
                return Err(AuthError::SessionBusy);
            }
            state.in_flight = true;
            state.apply(SessionChange::Updated {
                session: Session::authenticating(),
            });
            state.epoch
        };
        let call = InFlight {
            manager: self,
            epoch,
            settled: false,
        };
        self.notify();
        Ok(call)
    }

    /// Delivers queued changes to observers without holding the state lock.
    ///
    /// Only one caller drains at a time. A change queued while a drain runs,
    /// including one caused by an observer calling back into the manager,
    /// is delivered by that drain after the change in hand.
    fn notify(&self) {
        {
            let mut state = self.lock();
            if state.delivering || state.pending.is_empty() {
                return;
            }
            state.delivering = true;
        }
        let mut drain = Drain {
            manager: self,
            finished: false,
        };

        loop {
            let (change, observers) = {
                let mut state = self.lock();
                match state.pending.pop_front() {
                    Some(change) => {
                        let observers: Vec<Arc<dyn SessionObserver>> =
                            state.observers.iter().map(|(_, o)| o.clone()).collect();
                        (change, observers)
                    }
                    None => {
                        state.delivering = false;
                        drain.finished = true;
                        return;
                    }
                }
            };
            for observer in &observers {
                observer.on_change(&change);
            }
        }
    }
}

/// Releases the drain flag if an observer panics mid-delivery.
/// Undelivered changes stay queued for the next `notify`.
struct Drain<'a> {
    manager: &'a SessionManager,
    finished: bool,
}

impl Drop for Drain<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.manager.lock().delivering = false;
        }
    }
}

/// Tracks one pending credential call.
///
/// Dropping it without `finish` (the caller's future was cancelled)
/// releases the busy flag and returns a still-`Authenticating` session
/// to `Unauthenticated`.
struct InFlight<'a> {
    manager: &'a SessionManager,
    epoch: u64,
    settled: bool,
}

impl InFlight<'_> {
    fn finish(mut self, result: Result<Identity, AuthError>) -> Result<Session, AuthError> {
        self.settled = true;
        let outcome = self.settle(result);
        self.manager.notify();
        outcome
    }

    fn settle(&self, result: Result<Identity, AuthError>) -> Result<Session, AuthError> {
        let mut state = self.manager.lock();
        state.in_flight = false;

        if state.epoch != self.epoch {
            info!("discarding credential result: session was reset while pending");
            return Err(AuthError::Superseded);
        }

        match result {
            Ok(identity) => {
                info!(user_id = %identity.id, "session authenticated");
                let session = Session::authenticated(Arc::new(identity));
                state.apply(SessionChange::Updated {
                    session: session.clone(),
                });
                Ok(session)
            }
            Err(err) => {
                warn!(code = %err.code(), error = %err, "authentication failed");
                state.apply(SessionChange::Updated {
                    session: Session::failed(),
                });
                Err(err)
            }
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        {
            let mut state = self.manager.lock();
            state.in_flight = false;
            if state.epoch == self.epoch && state.session.status().is_pending() {
                debug!("credential call cancelled");
                state.apply(SessionChange::Updated {
                    session: Session::unauthenticated(),
                });
            }
        }
        self.manager.notify();
    }
}

/// Rejects blank email or empty password before any provider call.
fn require_credentials<'a>(email: &'a str, password: &SecretString) -> Result<&'a str, AuthError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthError::empty_field("email"));
    }
    if password.expose_secret().is_empty() {
        return Err(AuthError::empty_field("password"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::identity::MockIdentityProvider;
    use crate::domain::foundation::UserId;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string())
    }

    fn provider() -> Arc<MockIdentityProvider> {
        Arc::new(MockIdentityProvider::new().with_account("ada@example.com", "hunter22", Some("Ada")))
    }

    fn manager(provider: &Arc<MockIdentityProvider>) -> SessionManager {
        SessionManager::new(provider.clone(), AuthConfig::default())
    }

    fn recorder(manager: &SessionManager) -> Arc<Mutex<Vec<SessionChange>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        manager.subscribe(Arc::new(move |change: &SessionChange| {
            sink.lock().unwrap().push(change.clone());
        }));
        seen
    }

    #[tokio::test]
    async fn login_success_authenticates_and_notifies() {
        let provider = provider();
        let manager = manager(&provider);
        let seen = recorder(&manager);

        let session = manager.login("ada@example.com", secret("hunter22")).await.unwrap();

        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert_eq!(session.identity().unwrap().email, "ada@example.com");
        assert_eq!(manager.session(), session);

        let statuses: Vec<_> = seen.lock().unwrap().iter().map(|c| c.session().status()).collect();
        assert_eq!(
            statuses,
            vec![SessionStatus::Authenticating, SessionStatus::Authenticated]
        );
    }

    #[tokio::test]
    async fn login_failure_ends_in_auth_failed() {
        let provider = provider();
        let manager = manager(&provider);

        let err = manager.login("ada@example.com", secret("wrong")).await.unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        let session = manager.session();
        assert_eq!(session.status(), SessionStatus::AuthFailed);
        assert!(session.identity().is_none());
    }

    #[tokio::test]
    async fn unknown_provider_code_is_preserved() {
        let provider = Arc::new(MockIdentityProvider::new().with_error("auth/network-request-failed"));
        let manager = manager(&provider);

        let err = manager.login("ada@example.com", secret("hunter22")).await.unwrap_err();

        assert!(matches!(
            err,
            AuthError::Unknown { ref code, .. } if code == "auth/network-request-failed"
        ));
    }

    #[tokio::test]
    async fn empty_fields_never_reach_provider() {
        let provider = provider();
        let manager = manager(&provider);

        let err = manager.login("   ", secret("hunter22")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        let err = manager.login("ada@example.com", secret("")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        let err = manager.signup("", secret("hunter22")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        assert_eq!(provider.authenticate_calls(), 0);
        assert_eq!(provider.register_calls(), 0);
        assert_eq!(manager.session().status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn weak_password_signup_never_calls_provider() {
        let provider = provider();
        let manager = manager(&provider);

        let err = manager.signup("new@example.com", secret("12345")).await.unwrap_err();

        assert_eq!(err, AuthError::WeakPassword);
        assert_eq!(provider.register_calls(), 0);
        assert_eq!(manager.session().status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn signup_uses_configured_minimum() {
        let provider = provider();
        let manager = SessionManager::new(
            provider.clone(),
            AuthConfig {
                min_password_length: 10,
            },
        );

        let err = manager.signup("new@example.com", secret("hunter22")).await.unwrap_err();
        assert_eq!(err, AuthError::WeakPassword);

        let session = manager
            .signup("new@example.com", secret("correct horse"))
            .await
            .unwrap();
        assert!(session.is_authenticated());
        assert_eq!(provider.register_calls(), 1);
    }

    #[tokio::test]
    async fn duplicate_signup_is_already_registered() {
        let provider = provider();
        let manager = manager(&provider);

        let err = manager.signup("ada@example.com", secret("hunter22")).await.unwrap_err();

        assert_eq!(err, AuthError::AlreadyRegistered);
        assert_eq!(manager.session().status(), SessionStatus::AuthFailed);
    }

    #[tokio::test]
    async fn logout_resets_and_signs_out() {
        let provider = provider();
        let manager = manager(&provider);
        manager.login("ada@example.com", secret("hunter22")).await.unwrap();
        let seen = recorder(&manager);

        manager.logout().await.unwrap();

        assert_eq!(manager.session(), Session::unauthenticated());
        assert_eq!(provider.sign_out_calls(), 1);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(matches!(
            seen[0],
            SessionChange::Reset {
                reason: ResetReason::Logout,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn logout_reports_provider_failure_after_local_reset() {
        let provider = provider();
        let manager = manager(&provider);
        manager.login("ada@example.com", secret("hunter22")).await.unwrap();
        provider.set_sign_out_error("auth/network-request-failed");

        let err = manager.logout().await.unwrap_err();

        assert!(matches!(err, AuthError::Unknown { .. }));
        assert_eq!(manager.session().status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn second_credential_call_is_busy() {
        let provider = Arc::new(
            MockIdentityProvider::new()
                .with_account("ada@example.com", "hunter22", None)
                .with_gate(),
        );
        let manager = Arc::new(manager(&provider));

        let first = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.login("ada@example.com", secret("hunter22")).await })
        };
        while provider.authenticate_calls() == 0 {
            tokio::task::yield_now().await;
        }

        let err = manager.login("ada@example.com", secret("hunter22")).await.unwrap_err();
        assert_eq!(err, AuthError::SessionBusy);
        let err = manager.signup("bob@example.com", secret("hunter22")).await.unwrap_err();
        assert_eq!(err, AuthError::SessionBusy);
        assert_eq!(manager.session().status(), SessionStatus::Authenticating);

        provider.release(1);
        assert!(first.await.unwrap().is_ok());
        assert_eq!(provider.authenticate_calls(), 1);
    }

    #[tokio::test]
    async fn logout_during_pending_login_supersedes_it() {
        let provider = Arc::new(
            MockIdentityProvider::new()
                .with_account("ada@example.com", "hunter22", None)
                .with_gate(),
        );
        let manager = Arc::new(manager(&provider));

        let pending = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.login("ada@example.com", secret("hunter22")).await })
        };
        while provider.authenticate_calls() == 0 {
            tokio::task::yield_now().await;
        }

        manager.logout().await.unwrap();
        provider.release(1);

        assert_eq!(pending.await.unwrap().unwrap_err(), AuthError::Superseded);
        assert_eq!(manager.session(), Session::unauthenticated());

        // The busy flag is released once the stale call resolves.
        assert!(manager.login("ada@example.com", secret("hunter22")).await.is_ok());
    }

    #[tokio::test]
    async fn cancelled_login_releases_session() {
        let provider = Arc::new(
            MockIdentityProvider::new()
                .with_account("ada@example.com", "hunter22", None)
                .with_gate(),
        );
        let manager = Arc::new(manager(&provider));

        let pending = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.login("ada@example.com", secret("hunter22")).await })
        };
        while provider.authenticate_calls() == 0 {
            tokio::task::yield_now().await;
        }
        pending.abort();
        let _ = pending.await;

        assert_eq!(manager.session().status(), SessionStatus::Unauthenticated);
        provider.release(1);
        assert!(manager.login("ada@example.com", secret("hunter22")).await.is_ok());
    }

    #[tokio::test]
    async fn pushed_sign_out_resets_authenticated_session() {
        let provider = provider();
        let manager = manager(&provider);
        manager.login("ada@example.com", secret("hunter22")).await.unwrap();
        let seen = recorder(&manager);

        manager.handle_identity_change(IdentityChange::SignedOut);

        assert_eq!(manager.session(), Session::unauthenticated());
        assert!(matches!(
            seen.lock().unwrap()[0],
            SessionChange::Reset {
                reason: ResetReason::ProviderSignOut,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn pushed_sign_out_when_idle_is_silent() {
        let provider = provider();
        let manager = manager(&provider);
        let seen = recorder(&manager);

        manager.handle_identity_change(IdentityChange::SignedOut);

        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn pushed_sign_in_is_adopted_once() {
        let provider = provider();
        let manager = manager(&provider);
        let seen = recorder(&manager);
        let identity = Identity::new(UserId::new("u-9").unwrap(), "eve@example.com", None, true);

        manager.handle_identity_change(IdentityChange::SignedIn {
            identity: identity.clone(),
        });
        manager.handle_identity_change(IdentityChange::SignedIn { identity });

        assert!(manager.session().is_authenticated());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn listener_applies_provider_pushes() {
        let provider = provider();
        let manager = Arc::new(manager(&provider));
        manager.login("ada@example.com", secret("hunter22")).await.unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        manager.subscribe(Arc::new(move |change: &SessionChange| {
            let _ = tx.send(change.clone());
        }));
        let listener = manager.spawn_identity_listener();

        provider.push(IdentityChange::SignedOut);

        let change = rx.recv().await.unwrap();
        assert!(change.is_reset());
        assert_eq!(manager.session().status(), SessionStatus::Unauthenticated);
        listener.abort();
    }

    #[tokio::test]
    async fn observer_reads_populated_identity_through_manager() {
        let provider = provider();
        let manager = Arc::new(manager(&provider));
        let reads = Arc::new(Mutex::new(Vec::new()));
        let sink = reads.clone();
        let weak = Arc::downgrade(&manager);
        manager.subscribe(Arc::new(move |change: &SessionChange| {
            if let Some(manager) = weak.upgrade() {
                sink.lock()
                    .unwrap()
                    .push((change.session().status(), manager.session()));
            }
        }));

        manager.login("ada@example.com", secret("hunter22")).await.unwrap();

        let reads = reads.lock().unwrap();
        assert_eq!(reads.len(), 2);
        let (status, current) = &reads[1];
        assert_eq!(*status, SessionStatus::Authenticated);
        assert_eq!(current.status(), SessionStatus::Authenticated);
        assert_eq!(current.identity().unwrap().email, "ada@example.com");
        assert_eq!(current.identity().unwrap().greeting_name(), "Ada");
    }

    #[tokio::test]
    async fn observer_triggered_reset_is_delivered_in_order() {
        let provider = provider();
        let manager = Arc::new(manager(&provider));
        let weak = Arc::downgrade(&manager);
        manager.subscribe(Arc::new(move |change: &SessionChange| {
            if change.session().status() == SessionStatus::AuthFailed {
                if let Some(manager) = weak.upgrade() {
                    manager.handle_identity_change(IdentityChange::SignedOut);
                    manager.subscribe(Arc::new(|_: &SessionChange| {}));
                }
            }
        }));
        let seen = recorder(&manager);

        let err = manager.login("ada@example.com", secret("wrong")).await.unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        let statuses: Vec<_> = seen.lock().unwrap().iter().map(|c| c.session().status()).collect();
        assert_eq!(
            statuses,
            vec![
                SessionStatus::Authenticating,
                SessionStatus::AuthFailed,
                SessionStatus::Unauthenticated,
            ]
        );
        assert!(seen.lock().unwrap()[2].is_reset());
        assert_eq!(manager.session(), Session::unauthenticated());
    }

    #[tokio::test]
    async fn panicking_observer_does_not_block_later_changes() {
        let provider = provider();
        let manager = Arc::new(manager(&provider));
        let id = manager.subscribe(Arc::new(|change: &SessionChange| {
            if change.session().is_authenticated() {
                panic!("observer bug");
            }
        }));
        let seen = recorder(&manager);

        let login = {
            let manager = manager.clone();
            tokio::spawn(async move {
                let _ = manager.login("ada@example.com", secret("hunter22")).await;
            })
        };
        assert!(login.await.is_err());
        manager.unsubscribe(id);

        manager.logout().await.unwrap();

        assert!(seen.lock().unwrap().last().unwrap().is_reset());
        assert_eq!(manager.session(), Session::unauthenticated());
    }

    #[tokio::test]
    async fn unsubscribe_stops_notifications() {
        let provider = provider();
        let manager = manager(&provider);
        let seen = Arc::new(Mutex::new(0usize));
        let sink = seen.clone();
        let id = manager.subscribe(Arc::new(move |_: &SessionChange| {
            *sink.lock().unwrap() += 1;
        }));

        assert!(manager.unsubscribe(id));
        assert!(!manager.unsubscribe(id));
        manager.login("ada@example.com", secret("hunter22")).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), 0);
    }
}
