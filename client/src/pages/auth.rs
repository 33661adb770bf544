//! Login / register page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Public route. Both forms run the session store's local validation before
//! any request; server and validation messages surface through the session
//! `error`. A successful login or register navigates on to `/profile`; an
//! already-authenticated visitor can still open this page directly.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::SessionError;
use session::types::{LoginCredentials, RegisterCredentials, User};

use crate::state::auth::AuthState;

pub const FIELDS_REQUIRED: &str = "Please fill in all fields";
const AFTER_LOGIN: &str = "/profile";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthTab {
    #[default]
    Login,
    Register,
}

/// Trim the email and require both inputs.
///
/// # Errors
///
/// Returns [`FIELDS_REQUIRED`] when either input is blank.
pub fn login_credentials(email: &str, password: &str) -> Result<LoginCredentials, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(FIELDS_REQUIRED);
    }
    Ok(LoginCredentials { email: email.to_owned(), password: password.to_owned() })
}

/// Collect the register form. Name and password rules run in the store.
///
/// # Errors
///
/// Returns [`FIELDS_REQUIRED`] when the email or a password input is blank.
pub fn register_credentials(
    firstname: &str,
    lastname: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<RegisterCredentials, &'static str> {
    if email.trim().is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(FIELDS_REQUIRED);
    }
    Ok(RegisterCredentials {
        firstname: firstname.to_owned(),
        lastname: lastname.to_owned(),
        email: email.trim().to_owned(),
        password: password.to_owned(),
        confirm_password: confirm_password.to_owned(),
        role: None,
    })
}

/// Where to go after a login or register attempt settles.
pub fn after_submit_target(result: &Result<User, SessionError>) -> Option<&'static str> {
    result.as_ref().ok().map(|_| AFTER_LOGIN)
}

#[component]
pub fn AuthPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let session = auth.session();
    let navigate = use_navigate();

    let tab = RwSignal::new(AuthTab::Login);
    let firstname = RwSignal::new(String::new());
    let lastname = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let show_password = RwSignal::new(false);
    let notice = RwSignal::new(None::<&'static str>);

    auth.store().initialize();
    auth.sync();

    let switch_auth = auth.clone();
    let switch_tab = move |next: AuthTab| {
        tab.set(next);
        notice.set(None);
        switch_auth.store().clear_error();
    };
    let to_login = switch_tab.clone();
    let to_register = switch_tab;

    let login_auth = auth.clone();
    let login_navigate = navigate.clone();
    let on_login = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if session.get_untracked().is_loading {
            return;
        }
        let creds = match login_credentials(&email.get_untracked(), &password.get_untracked()) {
            Ok(creds) => creds,
            Err(message) => {
                notice.set(Some(message));
                return;
            }
        };
        notice.set(None);

        #[cfg(feature = "hydrate")]
        {
            let auth = login_auth.clone();
            let navigate = login_navigate.clone();
            leptos::task::spawn_local(async move {
                let result = auth.store().login(&creds).await;
                if let Err(err) = &result {
                    log::warn!("login failed: {err}");
                }
                if let Some(path) = after_submit_target(&result) {
                    navigate(path, NavigateOptions::default());
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&login_auth, &login_navigate, creds);
    };

    let register_auth = auth.clone();
    let register_navigate = navigate;
    let on_register = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if session.get_untracked().is_loading {
            return;
        }
        let creds = match register_credentials(
            &firstname.get_untracked(),
            &lastname.get_untracked(),
            &email.get_untracked(),
            &password.get_untracked(),
            &confirm.get_untracked(),
        ) {
            Ok(creds) => creds,
            Err(message) => {
                notice.set(Some(message));
                return;
            }
        };
        notice.set(None);

        #[cfg(feature = "hydrate")]
        {
            let auth = register_auth.clone();
            let navigate = register_navigate.clone();
            leptos::task::spawn_local(async move {
                let result = auth.store().register(&creds).await;
                if let Err(err) = &result {
                    log::warn!("registration failed: {err}");
                }
                if let Some(path) = after_submit_target(&result) {
                    navigate(path, NavigateOptions::default());
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&register_auth, &register_navigate, creds);
    };

    let message = move || notice.get().map(str::to_owned).or_else(|| session.get().error);
    let busy = move || session.get().is_loading;
    let password_type = move || if show_password.get() { "text" } else { "password" };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Welcome back"</h1>
                <div class="auth-tabs">
                    <button
                        type="button"
                        class="auth-tab"
                        class:auth-tab--active=move || tab.get() == AuthTab::Login
                        on:click=move |_| to_login(AuthTab::Login)
                    >
                        "Login"
                    </button>
                    <button
                        type="button"
                        class="auth-tab"
                        class:auth-tab--active=move || tab.get() == AuthTab::Register
                        on:click=move |_| to_register(AuthTab::Register)
                    >
                        "Register"
                    </button>
                </div>

                <Show
                    when=move || tab.get() == AuthTab::Register
                    fallback=move || view! {
                        <form class="auth-form" on:submit=on_login.clone()>
                            <input
                                class="auth-input"
                                type="email"
                                placeholder="Enter your Email"
                                prop:value=move || email.get()
                                on:input=move |ev| email.set(event_target_value(&ev))
                            />
                            <input
                                class="auth-input"
                                type=password_type
                                placeholder="Enter your Password"
                                prop:value=move || password.get()
                                on:input=move |ev| password.set(event_target_value(&ev))
                            />
                            <button class="auth-button" type="submit" disabled=busy>
                                {move || if busy() { "Signing in..." } else { "Login" }}
                            </button>
                        </form>
                    }
                >
                    <form class="auth-form" on:submit=on_register.clone()>
                        <input
                            class="auth-input"
                            type="text"
                            placeholder="First name"
                            prop:value=move || firstname.get()
                            on:input=move |ev| firstname.set(event_target_value(&ev))
                        />
                        <input
                            class="auth-input"
                            type="text"
                            placeholder="Last name"
                            prop:value=move || lastname.get()
                            on:input=move |ev| lastname.set(event_target_value(&ev))
                        />
                        <input
                            class="auth-input"
                            type="email"
                            placeholder="Enter your Email"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                        <input
                            class="auth-input"
                            type=password_type
                            placeholder="Enter your Password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                        <input
                            class="auth-input"
                            type=password_type
                            placeholder="Confirm your Password"
                            prop:value=move || confirm.get()
                            on:input=move |ev| confirm.set(event_target_value(&ev))
                        />
                        <button class="auth-button" type="submit" disabled=busy>
                            {move || if busy() { "Creating account..." } else { "Register" }}
                        </button>
                    </form>
                </Show>

                <label class="auth-toggle">
                    <input
                        type="checkbox"
                        prop:checked=move || show_password.get()
                        on:change=move |_| show_password.update(|v| *v = !*v)
                    />
                    "Show password"
                </label>

                {move || message().map(|text| view! { <p class="auth-message">{text}</p> })}
            </div>
        </div>
    }
}
