use super::*;
use session::store::AuthStatus;
use session::types::{AccountStatus, Role, User};

fn user() -> User {
    User {
        id: "u1".to_owned(),
        firstname: "Ana".to_owned(),
        lastname: "Lopez".to_owned(),
        email: "ana@example.com".to_owned(),
        role: Role::Admin,
        status: AccountStatus::Success,
        is_active: true,
        last_login: None,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

#[test]
fn anonymous_session_has_no_display_name() {
    assert_eq!(display_name(&Session::default()), None);
}

#[test]
fn pending_session_shows_placeholder_name() {
    let session = Session { auth: AuthStatus::PendingUser { token: "t".to_owned() }, ..Session::default() };
    assert_eq!(display_name(&session).as_deref(), Some("Signed in"));
    assert_eq!(account_badge(&session), None);
}

#[test]
fn authenticated_session_shows_full_name_and_badge() {
    let session = Session { auth: AuthStatus::Authenticated { token: "t".to_owned(), user: user() }, ..Session::default() };
    assert_eq!(display_name(&session).as_deref(), Some("Ana Lopez"));
    assert_eq!(account_badge(&session).as_deref(), Some("admin • success"));
}
