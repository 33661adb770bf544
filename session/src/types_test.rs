use super::*;
use serde_json::json;

fn user_json() -> serde_json::Value {
    json!({
        "_id": "64f0c0ffee",
        "firstname": "Ana",
        "lastname": "Lopez",
        "email": "ana@example.com",
        "role": "moderator",
        "status": "success",
        "isActive": true,
        "lastLogin": "2024-05-01T10:00:00.000Z",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-05-01T10:00:00.000Z"
    })
}

// =============================================================
// User
// =============================================================

#[test]
fn user_reads_server_field_names() {
    let user: User = serde_json::from_value(user_json()).unwrap();
    assert_eq!(user.id, "64f0c0ffee");
    assert_eq!(user.role, Role::Moderator);
    assert_eq!(user.status, AccountStatus::Success);
    assert!(user.is_active);
    assert_eq!(user.last_login.as_deref(), Some("2024-05-01T10:00:00.000Z"));
}

#[test]
fn user_missing_optional_fields_default() {
    let user: User = serde_json::from_value(json!({
        "_id": "u1",
        "firstname": "Li",
        "lastname": "Wei",
        "email": "li@example.com"
    }))
    .unwrap();
    assert_eq!(user.role, Role::User);
    assert_eq!(user.status, AccountStatus::Review);
    assert!(!user.is_active);
    assert!(user.last_login.is_none());
}

#[test]
fn user_full_name_joins_names() {
    let user: User = serde_json::from_value(user_json()).unwrap();
    assert_eq!(user.full_name(), "Ana Lopez");
}

// =============================================================
// Credentials
// =============================================================

#[test]
fn register_payload_strips_confirmation() {
    let creds = RegisterCredentials {
        firstname: " Ana ".to_owned(),
        lastname: "Lopez".to_owned(),
        email: "ana@example.com ".to_owned(),
        password: "Secret1".to_owned(),
        confirm_password: "Secret1".to_owned(),
        role: None,
    };
    let body = serde_json::to_value(creds.to_payload()).unwrap();
    assert_eq!(
        body,
        json!({
            "firstname": "Ana",
            "lastname": "Lopez",
            "email": "ana@example.com",
            "password": "Secret1"
        })
    );
    assert!(body.get("confirmPassword").is_none());
}

#[test]
fn register_payload_forwards_role_when_set() {
    let creds = RegisterCredentials { role: Some(Role::Admin), ..RegisterCredentials::default() };
    let body = serde_json::to_value(creds.to_payload()).unwrap();
    assert_eq!(body["role"], "admin");
}

// =============================================================
// Envelopes
// =============================================================

#[test]
fn auth_envelope_parses() {
    let env: Envelope<AuthPayload> = serde_json::from_value(json!({
        "success": true,
        "message": "Login successful",
        "data": { "user": user_json(), "token": "tok" }
    }))
    .unwrap();
    assert!(env.success);
    assert_eq!(env.data.token, "tok");
    assert_eq!(env.data.user.email, "ana@example.com");
}

#[test]
fn error_body_tolerates_missing_message() {
    let body: ApiErrorBody = serde_json::from_value(json!({
        "success": false,
        "errors": [{ "msg": "Email is invalid", "param": "email", "location": "body" }]
    }))
    .unwrap();
    assert!(body.message.is_none());
    assert_eq!(body.errors[0].msg, "Email is invalid");
}

// =============================================================
// Profiles
// =============================================================

#[test]
fn profile_form_serializes_camel_case() {
    let form = ProfileForm {
        firstname: "Ana".to_owned(),
        lastname: "Lopez".to_owned(),
        id_number: "X123".to_owned(),
        gender: Gender::PreferNotToSay,
        birthday: "2010-02-03".to_owned(),
        photo: None,
        social_media: SocialMedia { facebook: Some("ana.fb".to_owned()), ..SocialMedia::default() },
        legal_guardian: vec![LegalGuardian {
            firstname: "Rosa".to_owned(),
            lastname: "Lopez".to_owned(),
            relationship: Relationship::LegalGuardian,
            phone: "555".to_owned(),
            email: "rosa@example.com".to_owned(),
            ..LegalGuardian::default()
        }],
    };
    let body = serde_json::to_value(&form).unwrap();
    assert_eq!(body["idNumber"], "X123");
    assert_eq!(body["gender"], "prefer_not_to_say");
    assert_eq!(body["socialMedia"], json!({ "facebook": "ana.fb" }));
    assert_eq!(body["legalGuardian"][0]["relationship"], "legal_guardian");
    assert!(body["legalGuardian"][0].get("_id").is_none());
    assert!(body.get("photo").is_none());
}

#[test]
fn profile_parses_virtual_fields() {
    let profile: Profile = serde_json::from_value(json!({
        "_id": "p1",
        "user": "u1",
        "firstname": "Ana",
        "lastname": "Lopez",
        "idNumber": "X123",
        "gender": "female",
        "birthday": "2010-02-03T00:00:00.000Z",
        "status": "active",
        "legalGuardian": [],
        "socialMedia": {},
        "createdAt": "2024-01-01",
        "updatedAt": "2024-01-02",
        "age": 14,
        "isMinor": true,
        "fullName": "Ana Lopez"
    }))
    .unwrap();
    assert_eq!(profile.gender, Gender::Female);
    assert_eq!(profile.status, ProfileStatus::Active);
    assert_eq!(profile.age, Some(14));
    assert_eq!(profile.is_minor, Some(true));
    assert!(profile.photo.is_none());
}

#[test]
fn photo_payload_reads_photo_url() {
    let env: Envelope<PhotoPayload> = serde_json::from_value(json!({
        "success": true,
        "data": { "photoUrl": "https://cdn.example.com/p.png" }
    }))
    .unwrap();
    assert_eq!(env.data.photo_url, "https://cdn.example.com/p.png");
    assert_eq!(env.message, "");
}
