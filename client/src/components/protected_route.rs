//! Route wrapper that gates its children on the auth session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounting runs `initialize()` so a token saved in another tab (or removed
//! there) is picked up, then the shared `RouteGuard` decision table chooses
//! between a loading screen, a redirect, a one-time current-user fetch, or
//! the children.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use session::{GuardDecision, GuardOptions, RouteGuard};

use crate::state::auth::AuthState;
use crate::util::auth::install_guard_redirect;

#[component]
pub fn ProtectedRoute(
    children: ChildrenFn,
    /// Render for anonymous viewers too.
    #[prop(optional)]
    public: bool,
    #[prop(optional, into)] redirect_to: Option<String>,
) -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let navigate = use_navigate();

    let mut options = if public { GuardOptions::public() } else { GuardOptions::default() };
    if let Some(path) = redirect_to {
        options.redirect_to = path;
    }

    let guard = RwSignal::new(RouteGuard::new(options));
    guard.update(|g| {
        g.mount(auth.store());
    });
    auth.sync();

    let session = auth.session();
    let decision = Memo::new(move |_| guard.with(|g| g.decide(&session.get())));

    let fetch_auth = auth.clone();
    Effect::new(move || {
        if decision.get() != GuardDecision::FetchUser {
            return;
        }
        if !guard.try_update(RouteGuard::claim_fetch).unwrap_or(false) {
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            let auth = fetch_auth.clone();
            leptos::task::spawn_local(async move {
                if let Err(err) = auth.store().fetch_current_user().await {
                    log::warn!("current user fetch failed: {err}");
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = &fetch_auth;
    });

    install_guard_redirect(decision, navigate);

    move || match decision.get() {
        GuardDecision::Render => children().into_any(),
        GuardDecision::Redirect(_) => ().into_any(),
        GuardDecision::Loading | GuardDecision::FetchUser => view! {
            <div class="auth-loading">
                <div class="auth-loading__spinner"></div>
                <p>"Loading..."</p>
            </div>
        }
        .into_any(),
    }
}
