//! Profile editor page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered inside `ProtectedRoute`, so the session holds a token by the time
//! this mounts. The page loads the profile once, prefills the form from it
//! (or from the session user's names when none exists yet), and saves through
//! the profile store, which validates before any request.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use session::profile::{add_guardian, form_for_user, form_from_profile, initials, is_minor, remove_guardian};
use session::types::{Gender, LegalGuardian, ProfileForm, Relationship};
use session::validation::{age_on, parse_birthday};
use time::Date;

use crate::components::guardian_card::{GuardianCard, relationship_label};
use crate::state::auth::{AuthState, account_badge, display_name};
use crate::state::profile::{ProfileState, avatar_url, editor_title};
use crate::util::clock::today;

pub const GENDERS: [Gender; 4] = [Gender::Male, Gender::Female, Gender::Other, Gender::PreferNotToSay];
pub const RELATIONSHIPS: [Relationship; 7] = [
    Relationship::Parent,
    Relationship::LegalGuardian,
    Relationship::Grandparent,
    Relationship::Uncle,
    Relationship::Aunt,
    Relationship::Sibling,
    Relationship::Other,
];

/// Wire name of a unit enum variant, e.g. `prefer_not_to_say`.
pub fn wire_value<T: Serialize>(value: T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(ToOwned::to_owned))
        .unwrap_or_default()
}

/// Parse a `<select>` value back into its enum, falling back to the default.
pub fn parse_wire_value<T: DeserializeOwned + Default>(raw: &str) -> T {
    serde_json::from_value(serde_json::Value::String(raw.to_owned())).unwrap_or_default()
}

pub fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "Male",
        Gender::Female => "Female",
        Gender::Other => "Other",
        Gender::PreferNotToSay => "Prefer not to say",
    }
}

/// `"Age: 16 (minor)"`, or `None` while the birthday is incomplete.
pub fn age_label(birthday: &str, today: Date) -> Option<String> {
    let age = age_on(parse_birthday(birthday)?, today);
    let suffix = if is_minor_age(age) { " (minor)" } else { "" };
    Some(format!("Age: {age}{suffix}"))
}

fn is_minor_age(age: i32) -> bool {
    age < session::validation::ADULT_AGE
}

/// Blank input clears the handle rather than sending `""`.
pub fn optional_text(raw: String) -> Option<String> {
    if raw.trim().is_empty() { None } else { Some(raw) }
}

#[cfg(feature = "hydrate")]
async fn read_photo(file: web_sys::File) -> Result<session::types::PhotoUpload, session::SessionError> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|_| session::SessionError::validation("Could not read the selected file"))?;
    Ok(session::types::PhotoUpload {
        file_name: file.name(),
        content_type: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

#[component]
#[allow(clippy::too_many_lines)]
pub fn ProfilePage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let profile_state = expect_context::<ProfileState>();
    let session = auth.session();
    let snapshot = profile_state.snapshot();
    let navigate = use_navigate();

    let form = RwSignal::new(form_for_user(session.get_untracked().user()));
    let guardian_draft = RwSignal::new(LegalGuardian::default());
    let show_add_guardian = RwSignal::new(false);
    let notice = RwSignal::new(None::<String>);

    #[cfg(feature = "hydrate")]
    {
        let profiles = profile_state.clone();
        leptos::task::spawn_local(async move {
            if let Err(err) = profiles.store().load().await {
                log::info!("no profile loaded: {err}");
            }
        });
    }

    // Prefill from the stored profile, or from the user's names until one exists.
    Effect::new(move || {
        let state = snapshot.get();
        let session = session.get();
        match state.profile.as_ref() {
            Some(profile) => form.set(form_from_profile(profile, session.user())),
            None => {
                if let Some(user) = session.user() {
                    form.update(|f| {
                        if f.firstname.is_empty() {
                            f.firstname.clone_from(&user.firstname);
                        }
                        if f.lastname.is_empty() {
                            f.lastname.clone_from(&user.lastname);
                        }
                    });
                }
            }
        }
    });

    let clear_profiles = profile_state.clone();
    on_cleanup(move || clear_profiles.store().clear_error());

    let save_profiles = profile_state.clone();
    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if snapshot.get_untracked().is_loading {
            return;
        }
        notice.set(None);
        let current: ProfileForm = form.get_untracked();
        #[cfg(feature = "hydrate")]
        {
            let profiles = save_profiles.clone();
            leptos::task::spawn_local(async move {
                if profiles.store().save(&current, today()).await.is_ok() {
                    notice.set(Some("Profile saved".to_owned()));
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&save_profiles, current);
    };

    let on_add_guardian = move |_| {
        let draft = guardian_draft.get_untracked();
        let mut result = Ok(());
        form.update(|f| result = add_guardian(f, draft));
        match result {
            Ok(()) => {
                guardian_draft.set(LegalGuardian::default());
                show_add_guardian.set(false);
                notice.set(None);
            }
            Err(err) => notice.set(Some(err.to_string())),
        }
    };

    let upload_profiles = profile_state.clone();
    let on_photo = move |ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            let input: web_sys::HtmlInputElement = event_target(&ev);
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let profiles = upload_profiles.clone();
            leptos::task::spawn_local(async move {
                match read_photo(file).await {
                    Ok(photo) => {
                        if let Ok(url) = profiles.store().upload_photo(&photo).await {
                            form.update(|f| f.photo = Some(url));
                        }
                    }
                    Err(err) => notice.set(Some(err.to_string())),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&upload_profiles, ev);
    };

    let delete_profiles = profile_state.clone();
    let on_delete = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let profiles = delete_profiles.clone();
            leptos::task::spawn_local(async move {
                if profiles.store().delete().await.is_ok() {
                    form.set(form_for_user(session.get_untracked().user()));
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = &delete_profiles;
    };

    let logout_auth = auth.clone();
    let logout_profiles = profile_state.clone();
    let on_logout = move |_| {
        let auth = logout_auth.clone();
        let profiles = logout_profiles.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            auth.store().logout().await;
            profiles.store().clear();
            navigate("/auth", NavigateOptions::default());
        });
    };

    let text_input = move |label: &'static str, read: fn(&ProfileForm) -> String, write: fn(&mut ProfileForm, String)| {
        view! {
            <label class="profile-field">
                <span>{label}</span>
                <input
                    class="profile-input"
                    type="text"
                    prop:value=move || read(&form.get())
                    on:input=move |ev| form.update(|f| write(f, event_target_value(&ev)))
                />
            </label>
        }
    };

    let guardian_input = move |label: &'static str, read: fn(&LegalGuardian) -> String, write: fn(&mut LegalGuardian, String)| {
        view! {
            <label class="profile-field">
                <span>{label}</span>
                <input
                    class="profile-input"
                    type="text"
                    prop:value=move || read(&guardian_draft.get())
                    on:input=move |ev| guardian_draft.update(|g| write(g, event_target_value(&ev)))
                />
            </label>
        }
    };

    let busy = move || snapshot.get().is_loading;
    let message = move || notice.get().or_else(|| snapshot.get().error);

    view! {
        <div class="profile-page">
            <header class="profile-header">
                <div class="profile-avatar">
                    {move || {
                        let current = form.get();
                        match avatar_url(snapshot.get().profile.as_ref()) {
                            Some(url) => view! { <img src=url alt="Profile photo"/> }.into_any(),
                            None => view! { <span>{initials(&current.firstname, &current.lastname)}</span> }.into_any(),
                        }
                    }}
                    <label class="profile-avatar__upload">
                        "Change photo"
                        <input type="file" accept="image/*" on:change=on_photo/>
                    </label>
                </div>
                <div>
                    <h1>{move || editor_title(snapshot.get().profile.as_ref())}</h1>
                    <p>{move || display_name(&session.get()).unwrap_or_default()}</p>
                    <p class="profile-badge">{move || account_badge(&session.get()).unwrap_or_default()}</p>
                </div>
                <button class="profile-button profile-button--ghost" type="button" on:click=on_logout disabled=move || session.get().is_loading>
                    "Logout"
                </button>
            </header>

            <form class="profile-form" on:submit=on_save>
                {text_input("First name", |f| f.firstname.clone(), |f, v| f.firstname = v)}
                {text_input("Last name", |f| f.lastname.clone(), |f, v| f.lastname = v)}
                {text_input("ID number", |f| f.id_number.clone(), |f, v| f.id_number = v)}

                <label class="profile-field">
                    <span>"Gender"</span>
                    <select
                        class="profile-input"
                        prop:value=move || wire_value(form.get().gender)
                        on:change=move |ev| form.update(|f| f.gender = parse_wire_value(&event_target_value(&ev)))
                    >
                        {GENDERS
                            .into_iter()
                            .map(|g| view! { <option value=wire_value(g)>{gender_label(g)}</option> })
                            .collect_view()}
                    </select>
                </label>

                <label class="profile-field">
                    <span>"Birthday"</span>
                    <input
                        class="profile-input"
                        type="date"
                        prop:value=move || form.get().birthday
                        on:input=move |ev| form.update(|f| f.birthday = event_target_value(&ev))
                    />
                    <small>{move || age_label(&form.get().birthday, today()).unwrap_or_default()}</small>
                </label>

                <fieldset class="profile-social">
                    <legend>"Social media"</legend>
                    {text_input("Facebook", |f| f.social_media.facebook.clone().unwrap_or_default(), |f, v| f.social_media.facebook = optional_text(v))}
                    {text_input("Twitter", |f| f.social_media.twitter.clone().unwrap_or_default(), |f, v| f.social_media.twitter = optional_text(v))}
                    {text_input("TikTok", |f| f.social_media.tiktok.clone().unwrap_or_default(), |f, v| f.social_media.tiktok = optional_text(v))}
                </fieldset>

                <section class="profile-guardians">
                    <h2>"Legal guardians"</h2>
                    <Show when=move || is_minor(&form.get(), today()) == Some(true)>
                        <p class="profile-hint">"A legal guardian is required for users under 18."</p>
                    </Show>
                    {move || {
                        form.get()
                            .legal_guardian
                            .into_iter()
                            .enumerate()
                            .map(|(index, guardian)| {
                                let on_remove = Callback::new(move |()| {
                                    form.update(|f| {
                                        remove_guardian(f, index);
                                    });
                                });
                                view! { <GuardianCard guardian=guardian on_remove=on_remove/> }
                            })
                            .collect_view()
                    }}
                    <Show
                        when=move || show_add_guardian.get()
                        fallback=move || view! {
                            <button class="profile-button" type="button" on:click=move |_| show_add_guardian.set(true)>
                                "Add guardian"
                            </button>
                        }
                    >
                        <div class="guardian-form">
                            {guardian_input("First name", |g| g.firstname.clone(), |g, v| g.firstname = v)}
                            {guardian_input("Last name", |g| g.lastname.clone(), |g, v| g.lastname = v)}
                            {guardian_input("ID number", |g| g.id_number.clone(), |g, v| g.id_number = v)}
                            {guardian_input("Email", |g| g.email.clone(), |g, v| g.email = v)}
                            {guardian_input("Phone", |g| g.phone.clone(), |g, v| g.phone = v)}
                            {guardian_input("Address", |g| g.address.clone(), |g, v| g.address = v)}
                            {guardian_input("Country", |g| g.country.clone(), |g, v| g.country = v)}
                            <label class="profile-field">
                                <span>"Relationship"</span>
                                <select
                                    class="profile-input"
                                    prop:value=move || wire_value(guardian_draft.get().relationship)
                                    on:change=move |ev| guardian_draft.update(|g| g.relationship = parse_wire_value(&event_target_value(&ev)))
                                >
                                    {RELATIONSHIPS
                                        .into_iter()
                                        .map(|r| view! { <option value=wire_value(r)>{relationship_label(r)}</option> })
                                        .collect_view()}
                                </select>
                            </label>
                            <button class="profile-button" type="button" on:click=on_add_guardian>
                                "Save guardian"
                            </button>
                            <button class="profile-button profile-button--ghost" type="button" on:click=move |_| show_add_guardian.set(false)>
                                "Cancel"
                            </button>
                        </div>
                    </Show>
                </section>

                {move || message().map(|text| view! { <p class="profile-message">{text}</p> })}

                <div class="profile-actions">
                    <button class="profile-button" type="submit" disabled=busy>
                        {move || if busy() { "Saving..." } else { "Save profile" }}
                    </button>
                    <Show when=move || snapshot.get().profile.is_some()>
                        <button class="profile-button profile-button--danger" type="button" on:click=on_delete.clone() disabled=busy>
                            "Delete profile"
                        </button>
                    </Show>
                </div>
            </form>
        </div>
    }
}
