//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login
//! redirects and identity-dependent rendering. Components read the `session`
//! signal; actions go through `store()`, whose transitions flow back into the
//! signal via the `watch` mirror.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use leptos::prelude::*;
use session::{Session, SessionStore};

use crate::net::api::{ClientApi, client_api};
use crate::util::token_storage::BrowserTokenStore;

pub type ClientSessionStore = SessionStore<ClientApi, BrowserTokenStore>;

/// Context handle: the session store plus its reactive mirror.
#[derive(Clone)]
pub struct AuthState {
    store: Arc<ClientSessionStore>,
    session: RwSignal<Session>,
}

impl AuthState {
    /// Browser store wired to `localStorage` and the compiled API URL.
    pub fn new() -> Self {
        let store = Arc::new(SessionStore::new(client_api(), BrowserTokenStore));
        let session = RwSignal::new(store.snapshot());
        super::mirror_into(store.subscribe(), session);
        Self { store, session }
    }

    pub fn store(&self) -> &ClientSessionStore {
        &self.store
    }

    pub fn session(&self) -> RwSignal<Session> {
        self.session
    }

    /// Push the store's current value into the signal immediately.
    pub fn sync(&self) {
        self.session.set(self.store.snapshot());
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Header label for the signed-in user.
pub fn display_name(session: &Session) -> Option<String> {
    match session.user() {
        Some(user) => Some(user.full_name()),
        None if session.is_authenticated() => Some("Signed in".to_owned()),
        None => None,
    }
}

/// `"role • status"` badge text, once the user is known.
pub fn account_badge(session: &Session) -> Option<String> {
    let user = session.user()?;
    let role = serde_json::to_value(user.role).ok()?;
    let status = serde_json::to_value(user.status).ok()?;
    Some(format!("{} • {}", role.as_str()?, status.as_str()?))
}
