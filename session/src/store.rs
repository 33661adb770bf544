//! Auth session state and its transitions.
//!
//! DESIGN
//! ======
//! [`SessionStore`] is the single owner of the [`Session`] value. UI code
//! reads snapshots or subscribes to a `watch` channel; every mutation goes
//! through `initialize`, `login`, `register`, `fetch_current_user` or
//! `logout` (plus `clear_error`).
//!
//! The bearer token lives inside [`AuthStatus`], so "authenticated" and "has a
//! token" cannot disagree. A restored token without a user is its own variant
//! ([`AuthStatus::PendingUser`]) rather than an inferred `user == None`.
//!
//! CONCURRENCY
//! ===========
//! No locks beyond the channel. Overlapping calls are last-response-wins,
//! except that responses started before a logout (or an invalid-token reset)
//! are discarded: every reset bumps an epoch, and a response only lands if
//! the epoch it started in is still current.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::error::SessionError;
use crate::token::TokenStore;
use crate::transport::AuthApi;
use crate::types::{AuthPayload, LoginCredentials, RegisterCredentials, User};
use crate::validation::validate_registration;

/// Durable authentication axis of the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Anonymous,
    /// A token was restored from storage; the user has not been fetched yet.
    PendingUser { token: String },
    Authenticated { token: String, user: User },
}

/// Data-free view of [`AuthStatus`] for matching in guards and views.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Unauthenticated,
    AuthenticatedPendingUser,
    Authenticated,
}

/// Snapshot of the client's authentication state.
///
/// `is_loading` and `error` are transient annotations layered over `auth`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub auth: AuthStatus,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Session {
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match &self.auth {
            AuthStatus::Anonymous => None,
            AuthStatus::PendingUser { token } | AuthStatus::Authenticated { token, .. } => Some(token),
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match &self.auth {
            AuthStatus::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.auth {
            AuthStatus::Anonymous => SessionPhase::Unauthenticated,
            AuthStatus::PendingUser { .. } => SessionPhase::AuthenticatedPendingUser,
            AuthStatus::Authenticated { .. } => SessionPhase::Authenticated,
        }
    }
}

/// Owner of the session state, the token store, and the auth transport.
pub struct SessionStore<A, S> {
    api: A,
    tokens: S,
    state: watch::Sender<Session>,
    epoch: AtomicU64,
}

impl<A: AuthApi, S: TokenStore> SessionStore<A, S> {
    /// Create an uninitialized (anonymous) store. Call [`Self::initialize`] on mount.
    pub fn new(api: A, tokens: S) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self { api, tokens, state, epoch: AtomicU64::new(0) }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that observes every committed transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    /// Sync the session with the token store.
    ///
    /// A stored token marks the session authenticated (pending its user)
    /// without touching the network. Calling this again with the same token
    /// keeps the current state, including an already-fetched user.
    pub fn initialize(&self) -> Session {
        match self.tokens.get() {
            Some(stored) => {
                if self.snapshot().token() != Some(stored.as_str()) {
                    self.state.send_modify(|s| s.auth = AuthStatus::PendingUser { token: stored });
                }
            }
            None => {
                if self.snapshot().is_authenticated() {
                    tracing::info!("stored token disappeared; resetting session");
                    self.reset(None);
                }
            }
        }
        self.snapshot()
    }

    /// Log in with email and password.
    ///
    /// On success the token is persisted and the user populated. On failure
    /// `error` is set and authentication is left as it was.
    ///
    /// # Errors
    ///
    /// Returns the transport error, which is also recorded in `error`.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, SessionError> {
        let epoch = self.begin();
        let result = self.api.login(credentials).await;
        self.finish_auth(epoch, "login", result)
    }

    /// Register a new account, validating the form locally first.
    ///
    /// # Errors
    ///
    /// Returns a validation error without any network call, or the transport
    /// error. Either is recorded in `error`.
    pub async fn register(&self, credentials: &RegisterCredentials) -> Result<User, SessionError> {
        if let Err(err) = validate_registration(credentials) {
            self.state.send_modify(|s| s.error = Some(err.to_string()));
            return Err(err);
        }
        let epoch = self.begin();
        let result = self.api.register(&credentials.to_payload()).await;
        self.finish_auth(epoch, "register", result)
    }

    /// Fetch the user behind the current token.
    ///
    /// A 401/403/404 means the token is no longer usable: it is cleared and
    /// the session reset, with the server message kept in `error`. Other
    /// failures keep the token and only record `error`.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] without a token, otherwise the
    /// transport error.
    pub async fn fetch_current_user(&self) -> Result<User, SessionError> {
        if !self.snapshot().is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }
        let epoch = self.begin();
        let result = self.api.current_user().await;
        if !self.is_current(epoch) {
            tracing::debug!("discarding current-user response from a previous session");
            return result.map(|payload| payload.user);
        }
        match result {
            Ok(AuthPayload { user, .. }) => {
                let fetched = user.clone();
                self.state.send_modify(move |s| {
                    s.auth = match std::mem::take(&mut s.auth) {
                        AuthStatus::PendingUser { token } | AuthStatus::Authenticated { token, .. } => {
                            AuthStatus::Authenticated { token, user: fetched }
                        }
                        AuthStatus::Anonymous => AuthStatus::Anonymous,
                    };
                    s.is_loading = false;
                    s.error = None;
                });
                Ok(user)
            }
            Err(err) if err.is_invalid_token() => {
                tracing::warn!(error = %err, "stored token rejected; logging out");
                self.reset(Some(err.to_string()));
                Err(err)
            }
            Err(err) => {
                tracing::warn!(error = %err, "current user fetch failed");
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Best-effort server logout, then unconditionally clear token and session.
    pub async fn logout(&self) {
        self.bump_epoch();
        self.state.send_modify(|s| s.is_loading = true);
        if let Err(err) = self.api.logout().await {
            tracing::warn!(error = %err, "logout request failed; clearing session anyway");
        }
        self.reset(None);
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    fn begin(&self) -> u64 {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
        self.epoch.load(Ordering::SeqCst)
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }

    fn bump_epoch(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    fn finish_auth(
        &self,
        epoch: u64,
        op: &'static str,
        result: Result<AuthPayload, SessionError>,
    ) -> Result<User, SessionError> {
        if !self.is_current(epoch) {
            tracing::debug!(op, "discarding response from a previous session");
            return result.map(|payload| payload.user);
        }
        match result {
            Ok(AuthPayload { user, token }) => {
                self.tokens.set(&token);
                tracing::info!(op, user_id = %user.id, "authenticated");
                let authed = user.clone();
                self.state.send_replace(Session {
                    auth: AuthStatus::Authenticated { token, user: authed },
                    is_loading: false,
                    error: None,
                });
                Ok(user)
            }
            Err(err) => {
                tracing::warn!(op, error = %err, "authentication failed");
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn fail(&self, err: &SessionError) {
        let message = err.to_string();
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.error = Some(message);
        });
    }

    fn reset(&self, error: Option<String>) {
        self.bump_epoch();
        self.tokens.clear();
        self.state.send_replace(Session { auth: AuthStatus::Anonymous, is_loading: false, error });
    }
}
