use super::*;
use crate::test_support::{ScriptedHttp, error_body, profile_json, profile_ok, rest_api, user_json};
use crate::token::MemoryTokenStore;
use crate::transport::{Endpoint, Method, RestApi};
use crate::validation::{GUARDIAN_FIELDS_REQUIRED, GUARDIAN_REQUIRED_FOR_MINOR, PROFILE_FIELDS_REQUIRED};
use futures::executor::block_on;
use serde_json::json;
use time::Month;

type TestStore = ProfileStore<RestApi<ScriptedHttp, MemoryTokenStore>>;

fn today() -> Date {
    Date::from_calendar_date(2025, Month::June, 15).unwrap()
}

fn store(http: &ScriptedHttp) -> TestStore {
    ProfileStore::new(rest_api(http, &MemoryTokenStore::with_token("tok")))
}

fn guardian() -> LegalGuardian {
    LegalGuardian {
        firstname: "Maria".to_owned(),
        lastname: "Lopez".to_owned(),
        email: "maria@example.com".to_owned(),
        phone: "+1 555 0100".to_owned(),
        ..LegalGuardian::default()
    }
}

fn adult_form() -> ProfileForm {
    ProfileForm {
        firstname: "Ana".to_owned(),
        lastname: "Lopez".to_owned(),
        id_number: "X123".to_owned(),
        birthday: "1990-04-02".to_owned(),
        ..ProfileForm::default()
    }
}

fn stored_profile(birthday: &str) -> Profile {
    serde_json::from_value(profile_json("p1", birthday)).unwrap()
}

// =============================================================
// load / create / update
// =============================================================

#[test]
fn load_stores_profile() {
    let http = ScriptedHttp::default();
    http.reply(Endpoint::GetProfile, 200, profile_ok("p1", "1990-04-02T00:00:00.000Z"));
    let store = store(&http);

    let profile = block_on(store.load()).unwrap();

    assert_eq!(profile.id, "p1");
    let state = store.snapshot();
    assert_eq!(state.profile.map(|p| p.id), Some("p1".to_owned()));
    assert!(!state.is_loading);
    assert_eq!(http.requests()[0].authorization.as_deref(), Some("Bearer tok"));
}

#[test]
fn load_failure_without_message_uses_fallback() {
    let http = ScriptedHttp::default();
    http.reply_raw(Endpoint::GetProfile, 404, "");
    let store = store(&http);

    assert!(block_on(store.load()).is_err());
    assert_eq!(store.snapshot().error.as_deref(), Some("Failed to get profile"));
}

#[test]
fn create_failure_prefers_server_message() {
    let http = ScriptedHttp::default();
    http.reply(Endpoint::CreateProfile, 400, error_body("Profile already exists"));
    let store = store(&http);

    assert!(block_on(store.create(&adult_form())).is_err());
    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("Profile already exists"));
    assert!(!state.is_loading);
}

#[test]
fn update_replaces_profile() {
    let http = ScriptedHttp::default();
    http.reply(Endpoint::UpdateProfile, 200, profile_ok("p2", "1990-04-02"));
    let store = store(&http);

    block_on(store.update(&adult_form())).unwrap();
    assert_eq!(store.snapshot().profile.map(|p| p.id), Some("p2".to_owned()));
}

// =============================================================
// save
// =============================================================

#[test]
fn save_without_loaded_profile_creates() {
    let http = ScriptedHttp::default();
    http.reply(Endpoint::CreateProfile, 201, profile_ok("p1", "1990-04-02"));
    let store = store(&http);

    block_on(store.save(&adult_form(), today())).unwrap();

    assert_eq!(http.requests()[0].method, Method::Post);
}

#[test]
fn save_with_loaded_profile_updates() {
    let http = ScriptedHttp::default();
    http.reply(Endpoint::GetProfile, 200, profile_ok("p1", "1990-04-02"));
    http.reply(Endpoint::UpdateProfile, 200, profile_ok("p1", "1990-04-02"));
    let store = store(&http);

    block_on(store.load()).unwrap();
    block_on(store.save(&adult_form(), today())).unwrap();

    assert_eq!(http.requests_to(Endpoint::UpdateProfile).len(), 1);
    assert!(http.requests_to(Endpoint::CreateProfile).is_empty());
}

#[test]
fn save_rejects_missing_required_fields_locally() {
    let http = ScriptedHttp::default();
    let store = store(&http);
    let form = ProfileForm { id_number: String::new(), ..adult_form() };

    let err = block_on(store.save(&form, today())).unwrap_err();

    assert_eq!(err.to_string(), PROFILE_FIELDS_REQUIRED);
    assert_eq!(store.snapshot().error.as_deref(), Some(PROFILE_FIELDS_REQUIRED));
    assert!(http.requests().is_empty());
}

#[test]
fn save_requires_guardian_for_minor() {
    let http = ScriptedHttp::default();
    let store = store(&http);
    let form = ProfileForm { birthday: "2010-01-01".to_owned(), ..adult_form() };

    let err = block_on(store.save(&form, today())).unwrap_err();

    assert_eq!(err.to_string(), GUARDIAN_REQUIRED_FOR_MINOR);
    assert!(http.requests().is_empty());
}

#[test]
fn save_accepts_minor_with_guardian() {
    let http = ScriptedHttp::default();
    http.reply(Endpoint::CreateProfile, 201, profile_ok("p1", "2010-01-01"));
    let store = store(&http);
    let form = ProfileForm { birthday: "2010-01-01".to_owned(), legal_guardian: vec![guardian()], ..adult_form() };

    block_on(store.save(&form, today())).unwrap();

    let sent = http.requests_to(Endpoint::CreateProfile);
    let crate::transport::RequestBody::Json(body) = &sent[0].body else { panic!("expected JSON body") };
    assert_eq!(body["legalGuardian"][0]["firstname"], "Maria");
    assert_eq!(body["idNumber"], "X123");
}

// =============================================================
// upload_photo / delete / clear
// =============================================================

#[test]
fn upload_photo_patches_loaded_profile() {
    let http = ScriptedHttp::default();
    http.reply(Endpoint::GetProfile, 200, profile_ok("p1", "1990-04-02"));
    http.reply(Endpoint::UploadPhoto, 200, json!({ "success": true, "data": { "photoUrl": "https://cdn/p.png" } }));
    let store = store(&http);
    let photo = PhotoUpload { file_name: "p.png".to_owned(), content_type: "image/png".to_owned(), bytes: vec![0] };

    block_on(store.load()).unwrap();
    block_on(store.upload_photo(&photo)).unwrap();

    assert_eq!(store.snapshot().profile.and_then(|p| p.photo).as_deref(), Some("https://cdn/p.png"));
}

#[test]
fn upload_photo_without_profile_only_returns_url() {
    let http = ScriptedHttp::default();
    http.reply(Endpoint::UploadPhoto, 200, json!({ "success": true, "data": { "photoUrl": "https://cdn/p.png" } }));
    let store = store(&http);
    let photo = PhotoUpload { file_name: "p.png".to_owned(), content_type: "image/png".to_owned(), bytes: vec![0] };

    assert_eq!(block_on(store.upload_photo(&photo)).unwrap(), "https://cdn/p.png");
    assert_eq!(store.snapshot().profile, None);
}

#[test]
fn upload_photo_failure_uses_fallback() {
    let http = ScriptedHttp::default();
    http.reply_raw(Endpoint::UploadPhoto, 500, "");
    let store = store(&http);
    let photo = PhotoUpload { file_name: "p.png".to_owned(), content_type: "image/png".to_owned(), bytes: vec![0] };

    assert!(block_on(store.upload_photo(&photo)).is_err());
    assert_eq!(store.snapshot().error.as_deref(), Some("Failed to upload photo"));
}

#[test]
fn delete_forgets_profile() {
    let http = ScriptedHttp::default();
    http.reply(Endpoint::GetProfile, 200, profile_ok("p1", "1990-04-02"));
    http.reply(Endpoint::DeleteProfile, 200, json!({ "success": true, "message": "deleted" }));
    let store = store(&http);

    block_on(store.load()).unwrap();
    block_on(store.delete()).unwrap();

    assert_eq!(store.snapshot(), ProfileState::default());
}

#[test]
fn delete_failure_keeps_profile() {
    let http = ScriptedHttp::default();
    http.reply(Endpoint::GetProfile, 200, profile_ok("p1", "1990-04-02"));
    http.fail(Endpoint::DeleteProfile);
    let store = store(&http);

    block_on(store.load()).unwrap();
    assert!(block_on(store.delete()).is_err());

    let state = store.snapshot();
    assert!(state.profile.is_some());
    assert_eq!(state.error.as_deref(), Some("Network error occurred"));
}

#[test]
fn clear_drops_profile_and_error() {
    let http = ScriptedHttp::default();
    http.reply(Endpoint::GetProfile, 200, profile_ok("p1", "1990-04-02"));
    let store = store(&http);
    block_on(store.load()).unwrap();

    store.clear();

    assert_eq!(store.snapshot(), ProfileState::default());
}

#[test]
fn clear_error_keeps_profile() {
    let http = ScriptedHttp::default();
    let store = store(&http);
    assert!(block_on(store.load()).is_err());

    store.clear_error();

    assert_eq!(store.snapshot().error, None);
}

// =============================================================
// Form helpers
// =============================================================

#[test]
fn form_from_profile_truncates_birthday() {
    let form = form_from_profile(&stored_profile("1990-04-02T00:00:00.000Z"), None);
    assert_eq!(form.birthday, "1990-04-02");
    assert_eq!(form.id_number, "X123");
    assert_eq!(form.social_media.twitter.as_deref(), Some("@ana"));
}

#[test]
fn form_from_profile_falls_back_to_user_names() {
    let mut profile = stored_profile("1990-04-02");
    profile.firstname.clear();
    let user: User = serde_json::from_value(user_json("u1")).unwrap();

    let form = form_from_profile(&profile, Some(&user));

    assert_eq!(form.firstname, "Ana");
}

#[test]
fn form_for_user_prefills_names_only() {
    let user: User = serde_json::from_value(user_json("u1")).unwrap();
    let form = form_for_user(Some(&user));
    assert_eq!((form.firstname.as_str(), form.lastname.as_str()), ("Ana", "Lopez"));
    assert!(form.birthday.is_empty());
    assert_eq!(form_for_user(None), ProfileForm::default());
}

#[test]
fn add_guardian_requires_contact_fields() {
    let mut form = adult_form();
    let incomplete = LegalGuardian { phone: String::new(), ..guardian() };

    let err = add_guardian(&mut form, incomplete).unwrap_err();

    assert_eq!(err.to_string(), GUARDIAN_FIELDS_REQUIRED);
    assert!(form.legal_guardian.is_empty());
}

#[test]
fn add_then_remove_guardian() {
    let mut form = adult_form();
    add_guardian(&mut form, guardian()).unwrap();
    add_guardian(&mut form, LegalGuardian { firstname: "Jose".to_owned(), ..guardian() }).unwrap();

    let removed = remove_guardian(&mut form, 0).unwrap();

    assert_eq!(removed.firstname, "Maria");
    assert_eq!(form.legal_guardian.len(), 1);
    assert_eq!(remove_guardian(&mut form, 5), None);
}

#[test]
fn is_minor_tracks_birthday() {
    assert_eq!(is_minor(&adult_form(), today()), Some(false));
    let minor = ProfileForm { birthday: "2008-06-16".to_owned(), ..adult_form() };
    assert_eq!(is_minor(&minor, today()), Some(true));
    let blank = ProfileForm { birthday: String::new(), ..adult_form() };
    assert_eq!(is_minor(&blank, today()), None);
}

#[test]
fn initials_skip_blank_names() {
    assert_eq!(initials("ana", "lopez"), "AL");
    assert_eq!(initials("Ana", "  "), "A");
    assert_eq!(initials("", ""), "");
}
