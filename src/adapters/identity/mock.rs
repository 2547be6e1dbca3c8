//! In-memory identity provider.
//!
//! Stands in for a hosted identity service in tests and in the demo
//! binary. It keeps accounts in a map, reports failures with the same
//! `auth/...` codes a hosted provider would, counts calls, and can hold
//! requests at a gate so tests can observe a session mid-login.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockIdentityProvider::new()
//!     .with_account("ada@example.com", "hunter22", Some("Ada"));
//!
//! let identity = provider.authenticate("ada@example.com", &secret("hunter22")).await?;
//! assert_eq!(provider.authenticate_calls(), 1);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{broadcast, Semaphore};

use crate::domain::foundation::{Identity, UserId};
use crate::domain::session::ProviderError;
use crate::ports::{IdentityChange, IdentityProvider};

const CHANGE_CAPACITY: usize = 16;
const PROVIDER_MIN_PASSWORD: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    identity: Identity,
    disabled: bool,
}

/// Mock identity provider.
#[derive(Debug)]
pub struct MockIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    /// Returned from every credential call while set.
    force_error: RwLock<Option<ProviderError>>,
    sign_out_error: RwLock<Option<ProviderError>>,
    /// When set, credential calls wait for a permit before answering.
    gate: RwLock<Option<Arc<Semaphore>>>,
    authenticate_calls: AtomicUsize,
    register_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
    changes: broadcast::Sender<IdentityChange>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            accounts: RwLock::new(HashMap::new()),
            force_error: RwLock::new(None),
            sign_out_error: RwLock::new(None),
            gate: RwLock::new(None),
            authenticate_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
            changes,
        }
    }

    /// Adds an existing account.
    pub fn with_account(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        display_name: Option<&str>,
    ) -> Self {
        self.add_account(email, password, display_name);
        self
    }

    /// Makes every credential call fail with the given provider code.
    pub fn with_error(self, code: &str) -> Self {
        self.set_error(code);
        self
    }

    /// Holds credential calls until `release` is called.
    pub fn with_gate(self) -> Self {
        *self.gate.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Adds an account at runtime and returns its identity.
    pub fn add_account(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        display_name: Option<&str>,
    ) -> Identity {
        let email = email.into();
        let identity = Identity::new(
            UserId::generate(),
            email.clone(),
            display_name.map(str::to_string),
            true,
        );
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                email.to_lowercase(),
                Account {
                    password: password.into(),
                    identity: identity.clone(),
                    disabled: false,
                },
            );
        identity
    }

    /// Marks an account as disabled; later logins fail with `user-disabled`.
    pub fn disable_account(&self, email: &str) {
        if let Some(account) = self
            .accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&email.to_lowercase())
        {
            account.disabled = true;
        }
    }

    pub fn set_error(&self, code: &str) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) =
            Some(ProviderError::new(code, "forced failure"));
    }

    pub fn clear_error(&self) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Makes `sign_out` fail with the given provider code.
    pub fn set_sign_out_error(&self, code: &str) {
        *self.sign_out_error.write().unwrap_or_else(PoisonError::into_inner) =
            Some(ProviderError::new(code, "forced sign-out failure"));
    }

    /// Lets `count` gated credential calls proceed.
    pub fn release(&self, count: usize) {
        if let Some(gate) = self.gate.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            gate.add_permits(count);
        }
    }

    /// Pushes an out-of-band identity change to subscribers.
    pub fn push(&self, change: IdentityChange) {
        // No receivers is fine; nobody is listening yet.
        let _ = self.changes.send(change);
    }

    pub fn authenticate_calls(&self) -> usize {
        self.authenticate_calls.load(Ordering::SeqCst)
    }

    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    async fn pass_gate(&self) {
        let gate = self.gate.read().unwrap_or_else(PoisonError::into_inner).clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }

    fn forced_error(&self) -> Option<ProviderError> {
        self.force_error.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn authenticate(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, ProviderError> {
        self.authenticate_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;

        if let Some(err) = self.forced_error() {
            return Err(err);
        }

        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        let account = accounts
            .get(&email.to_lowercase())
            .ok_or_else(|| ProviderError::new("auth/user-not-found", "no account for this email"))?;

        if account.disabled {
            return Err(ProviderError::new("auth/user-disabled", "account disabled"));
        }
        if account.password != *password.expose_secret() {
            return Err(ProviderError::new("auth/wrong-password", "password mismatch"));
        }
        Ok(account.identity.clone())
    }

    async fn register(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, ProviderError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;

        if let Some(err) = self.forced_error() {
            return Err(err);
        }
        if !email.contains('@') {
            return Err(ProviderError::new("auth/invalid-email", "malformed email"));
        }
        if password.expose_secret().chars().count() < PROVIDER_MIN_PASSWORD {
            return Err(ProviderError::new("auth/weak-password", "password too short"));
        }
        if self
            .accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&email.to_lowercase())
        {
            return Err(ProviderError::new(
                "auth/email-already-in-use",
                "email already registered",
            ));
        }

        Ok(self.add_account(email, password.expose_secret().clone(), None))
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        match self.sign_out_error.read().unwrap_or_else(PoisonError::into_inner).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn identity_changes(&self) -> broadcast::Receiver<IdentityChange> {
        self.changes.subscribe()
    }
}
