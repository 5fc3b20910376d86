//! Session lifecycle controller.
//!
//! The only writer of the credential store and of the session state. Every
//! transition takes `write_guard` so the store and the published state move
//! together; the guard is never held across an await.
//!
//! ```text
//! Anonymous ──login ok──▶ Authenticated(id) ──logout / 401──▶ Anonymous
//!     │                        │
//!     └─login err─▶ Anonymous  └─login ok (other user)──▶ Authenticated(id')
//! ```
//!
//! ## Optimistic rehydration
//! `rehydrate()` trusts the stored identity without asking the backend, so the
//! client can render immediately. A stale token therefore looks logged in
//! until the first authenticated call (or `verify()`) comes back 401 and the
//! gateway tears the session down.

use super::backend::AuthBackend;
use super::identity::Identity;
use super::state::{session_channel, SessionObserver, SessionState, SessionWriter};
use super::store::CredentialStore;
use crate::error::{PortalError, Result};
use crate::gateway::RejectionHandler;
use crate::routes::{landing_for, Navigator, LOGIN_PATH};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct SessionController {
    store: Arc<dyn CredentialStore>,
    backend: Arc<dyn AuthBackend>,
    navigator: Arc<dyn Navigator>,
    session: SessionWriter,
    write_guard: Mutex<()>,
}

impl SessionController {
    /// New controller in the `Anonymous` state. Call [`rehydrate`](Self::rehydrate)
    /// once at startup to pick up a stored session.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        backend: Arc<dyn AuthBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (session, _initial) = session_channel();
        Self {
            store,
            backend,
            navigator,
            session,
            write_guard: Mutex::new(()),
        }
    }

    /// Read-only handle for everything that is not the controller.
    pub fn observer(&self) -> SessionObserver {
        self.session.observer()
    }

    pub fn state(&self) -> SessionState {
        self.session.current()
    }

    pub fn store(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.store)
    }

    /// Restore the session saved by a previous run, without a network call.
    pub fn rehydrate(&self) -> SessionState {
        let _guard = self.write_guard.lock();
        let next = match self.store.load() {
            Ok(Some(stored)) => {
                tracing::info!(
                    email = %stored.identity.email,
                    role = %stored.identity.role,
                    "Session restored from credential store (unverified)"
                );
                SessionState::Authenticated(stored.identity)
            }
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                tracing::warn!("Discarding unreadable stored session: {e}");
                if let Err(e) = self.store.clear() {
                    tracing::warn!("Failed to clear credential store: {e}");
                }
                SessionState::Anonymous
            }
        };
        self.session.set(next.clone());
        next
    }

    /// Log in and persist the session. On failure the previous state is kept.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity> {
        let email = email.trim();
        let prior = {
            let _guard = self.write_guard.lock();
            let prior = self.session.current();
            if prior == SessionState::Anonymous {
                self.session.set(SessionState::Authenticating);
            }
            prior
        };

        let outcome = self.backend.login(email, password).await;

        let _guard = self.write_guard.lock();
        let resp = match outcome {
            Ok(resp) => resp,
            Err(e) => {
                self.restore_after_failed_login(prior);
                tracing::warn!(email, "Login failed: {e}");
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&resp.token, &resp.identity) {
            self.restore_after_failed_login(prior);
            tracing::warn!(email, "Login succeeded but session could not be stored: {e}");
            return Err(e);
        }

        let identity = resp.identity;
        self.session.set(SessionState::Authenticated(identity.clone()));
        tracing::info!(email, role = %identity.role, "Login succeeded");

        self.navigator.redirect(landing_for(identity.role));
        Ok(identity)
    }

    fn restore_after_failed_login(&self, prior: SessionState) {
        if self.session.current() == SessionState::Authenticating {
            self.session.set(prior);
        }
    }

    /// Create an account. Does not log in; the caller must call `login` next.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<()> {
        if password != confirm_password {
            return Err(PortalError::PasswordMismatch);
        }

        let email = email.trim();
        match self.backend.register(name.trim(), email, password).await {
            Ok(_) => {
                tracing::info!(email, "Account registered");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(email, "Registration failed: {e}");
                Err(e)
            }
        }
    }

    /// User-initiated logout. Never fails.
    pub fn logout(&self) {
        let _guard = self.write_guard.lock();
        self.clear_locked();
        tracing::info!("Logged out");
    }

    /// Tear the session down after the backend rejected it, then send the
    /// client to the login page. Safe to call any number of times.
    pub fn force_teardown(&self) {
        {
            let _guard = self.write_guard.lock();
            self.teardown_locked();
        }
        self.navigator.redirect(LOGIN_PATH);
    }

    fn teardown_locked(&self) {
        let was_authenticated = self.session.current().is_authenticated();
        self.clear_locked();
        if was_authenticated {
            tracing::info!("Session rejected by backend, credentials cleared");
        }
    }

    fn clear_locked(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear credential store: {e}");
        }
        self.session.set(SessionState::Anonymous);
    }

    /// Confirm the stored token with the backend.
    ///
    /// `Ok(false)` when there is no session to verify. A rejected token is
    /// torn down and reported as `SessionExpired`; a network failure keeps
    /// the session.
    pub async fn verify(&self) -> Result<bool> {
        let Some(token) = self.store.token() else {
            return Ok(false);
        };

        match self.backend.verify_token(&token).await {
            Ok(()) => Ok(true),
            Err(PortalError::SessionExpired) => {
                self.session_rejected(Some(&token));
                Err(PortalError::SessionExpired)
            }
            Err(e) => Err(e),
        }
    }
}

impl RejectionHandler for SessionController {
    fn session_rejected(&self, token_used: Option<&str>) {
        {
            // Compare and clear under one guard: a login committed in
            // between must survive.
            let _guard = self.write_guard.lock();
            if let Some(current) = self.store.token() {
                if token_used != Some(current.as_str()) {
                    tracing::debug!("Ignoring 401 for a superseded token");
                    return;
                }
            }
            self.teardown_locked();
        }
        self.navigator.redirect(LOGIN_PATH);
    }
}
