//! Route guard decisions for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected page (browser) or command (CLI) runs the same decision
//! table so both front ends agree on when to block, redirect, fetch the
//! current user, or render. Public pages stay reachable whatever the session
//! state; only `require_auth` redirects.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::store::{Session, SessionPhase, SessionStore};
use crate::token::TokenStore;
use crate::transport::AuthApi;

/// Where unauthenticated viewers of a protected page are sent.
pub const DEFAULT_REDIRECT: &str = "/auth";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardOptions {
    pub require_auth: bool,
    pub redirect_to: String,
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self { require_auth: true, redirect_to: DEFAULT_REDIRECT.to_owned() }
    }
}

impl GuardOptions {
    /// Options for a page that renders for everyone.
    #[must_use]
    pub fn public() -> Self {
        Self { require_auth: false, ..Self::default() }
    }
}

/// What a guarded view should do for the current session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show a blocking loading indicator; render no children.
    Loading,
    /// Navigate to the path and render nothing.
    Redirect(String),
    /// Trigger `fetch_current_user` (once per mount) and keep waiting.
    FetchUser,
    Render,
}

/// Pure decision table.
#[must_use]
pub fn evaluate(session: &Session, options: &GuardOptions, fetch_attempted: bool) -> GuardDecision {
    if session.is_loading {
        return GuardDecision::Loading;
    }
    if options.require_auth && !session.is_authenticated() {
        return GuardDecision::Redirect(options.redirect_to.clone());
    }
    if session.phase() == SessionPhase::AuthenticatedPendingUser && !fetch_attempted {
        return GuardDecision::FetchUser;
    }
    GuardDecision::Render
}

/// Per-mount guard state: the options plus the "already fetched once" bit.
#[derive(Clone, Debug, Default)]
pub struct RouteGuard {
    options: GuardOptions,
    fetch_attempted: bool,
}

impl RouteGuard {
    #[must_use]
    pub fn new(options: GuardOptions) -> Self {
        Self { options, fetch_attempted: false }
    }

    #[must_use]
    pub fn options(&self) -> &GuardOptions {
        &self.options
    }

    /// Start a mount: sync the session with storage and decide.
    pub fn mount<A: AuthApi, S: TokenStore>(&mut self, store: &SessionStore<A, S>) -> GuardDecision {
        self.fetch_attempted = false;
        let session = store.initialize();
        self.decide(&session)
    }

    #[must_use]
    pub fn decide(&self, session: &Session) -> GuardDecision {
        evaluate(session, &self.options, self.fetch_attempted)
    }

    /// Claim the single current-user fetch for this mount.
    ///
    /// Returns `false` if it was already claimed.
    pub fn claim_fetch(&mut self) -> bool {
        !std::mem::replace(&mut self.fetch_attempted, true)
    }

    /// Mount, run the one current-user fetch if needed, and return the settled decision.
    pub async fn settle<A: AuthApi, S: TokenStore>(&mut self, store: &SessionStore<A, S>) -> GuardDecision {
        let decision = self.mount(store);
        if decision != GuardDecision::FetchUser || !self.claim_fetch() {
            return decision;
        }
        if let Err(err) = store.fetch_current_user().await {
            tracing::debug!(error = %err, "guard current-user fetch failed");
        }
        self.decide(&store.snapshot())
    }
}
