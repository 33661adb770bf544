//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical guard redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use session::GuardDecision;

/// Path to navigate to for a decision, if any.
pub fn redirect_target(decision: &GuardDecision) -> Option<&str> {
    match decision {
        GuardDecision::Redirect(path) => Some(path),
        _ => None,
    }
}

/// Navigate whenever the guard decides to redirect.
///
/// Redirects replace the history entry so "back" does not bounce the user
/// into the guard again.
pub fn install_guard_redirect<F>(decision: Memo<GuardDecision>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let decision = decision.get();
        if let Some(path) = redirect_target(&decision) {
            navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
