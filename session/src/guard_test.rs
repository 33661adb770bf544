use super::*;
use crate::store::AuthStatus;
use crate::test_support::{ScriptedHttp, auth_ok, error_body, rest_api, user_json};
use crate::token::MemoryTokenStore;
use crate::transport::Endpoint;
use futures::executor::block_on;

fn pending() -> Session {
    Session { auth: AuthStatus::PendingUser { token: "t".to_owned() }, ..Session::default() }
}

fn authenticated() -> Session {
    let user = serde_json::from_value(user_json("u1")).unwrap();
    Session { auth: AuthStatus::Authenticated { token: "t".to_owned(), user }, ..Session::default() }
}

// =============================================================
// evaluate
// =============================================================

#[test]
fn loading_blocks_everything() {
    let session = Session { is_loading: true, ..Session::default() };
    assert_eq!(evaluate(&session, &GuardOptions::default(), false), GuardDecision::Loading);
    assert_eq!(evaluate(&session, &GuardOptions::public(), false), GuardDecision::Loading);
}

#[test]
fn unauthenticated_protected_page_redirects_to_auth() {
    assert_eq!(
        evaluate(&Session::default(), &GuardOptions::default(), false),
        GuardDecision::Redirect("/auth".to_owned())
    );
}

#[test]
fn custom_redirect_target_is_used() {
    let options = GuardOptions { require_auth: true, redirect_to: "/login".to_owned() };
    assert_eq!(evaluate(&Session::default(), &options, false), GuardDecision::Redirect("/login".to_owned()));
}

#[test]
fn public_page_renders_for_anonymous_viewer() {
    assert_eq!(evaluate(&Session::default(), &GuardOptions::public(), false), GuardDecision::Render);
}

#[test]
fn pending_user_triggers_fetch_once() {
    assert_eq!(evaluate(&pending(), &GuardOptions::default(), false), GuardDecision::FetchUser);
    assert_eq!(evaluate(&pending(), &GuardOptions::default(), true), GuardDecision::Render);
}

#[test]
fn public_page_still_fetches_pending_user() {
    assert_eq!(evaluate(&pending(), &GuardOptions::public(), false), GuardDecision::FetchUser);
}

#[test]
fn authenticated_user_renders() {
    assert_eq!(evaluate(&authenticated(), &GuardOptions::default(), false), GuardDecision::Render);
}

#[test]
fn claim_fetch_succeeds_once() {
    let mut guard = RouteGuard::default();
    assert!(guard.claim_fetch());
    assert!(!guard.claim_fetch());
}

// =============================================================
// settle
// =============================================================

#[test]
fn settle_without_token_redirects() {
    let tokens = MemoryTokenStore::new();
    let http = ScriptedHttp::default();
    let store = SessionStore::new(rest_api(&http, &tokens), tokens.clone());
    let mut guard = RouteGuard::new(GuardOptions::default());

    assert_eq!(block_on(guard.settle(&store)), GuardDecision::Redirect("/auth".to_owned()));
    assert!(http.requests().is_empty());
}

#[test]
fn settle_with_token_fetches_user_then_renders() {
    let tokens = MemoryTokenStore::with_token("stored");
    let http = ScriptedHttp::default();
    http.reply(Endpoint::CurrentUser, 200, auth_ok("u1", "stored"));
    let store = SessionStore::new(rest_api(&http, &tokens), tokens.clone());
    let mut guard = RouteGuard::new(GuardOptions::default());

    assert_eq!(block_on(guard.settle(&store)), GuardDecision::Render);
    assert!(store.snapshot().user().is_some());
}

#[test]
fn repeated_mounts_fetch_current_user_only_once() {
    let tokens = MemoryTokenStore::with_token("stored");
    let http = ScriptedHttp::default();
    http.reply(Endpoint::CurrentUser, 200, auth_ok("u1", "stored"));
    let store = SessionStore::new(rest_api(&http, &tokens), tokens.clone());
    let mut guard = RouteGuard::new(GuardOptions::default());

    store.initialize();
    store.initialize();
    block_on(guard.settle(&store));
    block_on(guard.settle(&store));

    assert_eq!(http.requests_to(Endpoint::CurrentUser).len(), 1);
    assert!(store.snapshot().is_authenticated());
}

#[test]
fn settle_with_rejected_token_redirects() {
    let tokens = MemoryTokenStore::with_token("expired");
    let http = ScriptedHttp::default();
    http.reply(Endpoint::CurrentUser, 401, error_body("jwt expired"));
    let store = SessionStore::new(rest_api(&http, &tokens), tokens.clone());
    let mut guard = RouteGuard::new(GuardOptions::default());

    assert_eq!(block_on(guard.settle(&store)), GuardDecision::Redirect("/auth".to_owned()));
    assert_eq!(tokens.get(), None);
}

#[test]
fn settle_after_network_failure_renders_pending_session() {
    let tokens = MemoryTokenStore::with_token("stored");
    let http = ScriptedHttp::default();
    http.fail(Endpoint::CurrentUser);
    let store = SessionStore::new(rest_api(&http, &tokens), tokens.clone());
    let mut guard = RouteGuard::new(GuardOptions::default());

    assert_eq!(block_on(guard.settle(&store)), GuardDecision::Render);
    assert_eq!(store.snapshot().phase(), SessionPhase::AuthenticatedPendingUser);
}
