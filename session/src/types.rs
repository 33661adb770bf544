//! Wire DTOs for the auth and profile REST endpoints.
//!
//! DESIGN
//! ======
//! Field names follow the server's JSON (`_id`, camelCase) via serde
//! attributes so Rust code keeps snake_case while round-trips stay lossless.
//! Timestamps stay as the server's ISO strings; nothing on the client does
//! arithmetic on them except the profile birthday (see `profile`).

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// USERS
// =============================================================================

/// Account role assigned by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Moderator,
}

/// Account review status assigned by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Review,
    Failed,
    Success,
}

/// An authenticated user as returned by `/auth/login`, `/auth/register` and `/auth/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-side identifier.
    #[serde(rename = "_id")]
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub is_active: bool,
    /// ISO timestamp of the previous login, absent for fresh accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl User {
    /// `"First Last"` for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname).trim().to_owned()
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Registration form input. Never sent as-is; see [`RegisterCredentials::to_payload`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterCredentials {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<Role>,
}

impl RegisterCredentials {
    /// Wire body for `POST /auth/register`, with the confirmation stripped.
    #[must_use]
    pub fn to_payload(&self) -> RegisterPayload {
        RegisterPayload {
            firstname: self.firstname.trim().to_owned(),
            lastname: self.lastname.trim().to_owned(),
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
            role: self.role,
        }
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

// =============================================================================
// RESPONSE ENVELOPES
// =============================================================================

/// `{ success, message, data }` wrapper used by every endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

/// `data` of login/register/me responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

/// `{ success, message }` body returned by logout and delete.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// One field-level validation failure reported by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub msg: String,
    #[serde(default)]
    pub param: String,
    #[serde(default)]
    pub location: String,
}

/// Body of a non-2xx response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

// =============================================================================
// PROFILES
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    PreferNotToSay,
}

/// How a legal guardian relates to the profile owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    #[default]
    Parent,
    LegalGuardian,
    Grandparent,
    Uncle,
    Aunt,
    Sibling,
    Other,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    Active,
    Inactive,
    #[default]
    Pending,
    Suspended,
}

/// Social handles attached to a profile. Empty strings are sent as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
}

/// A guardian record nested in a profile. Mandatory when the owner is a minor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalGuardian {
    /// Server-side identifier, absent until the profile is saved.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub relationship: Relationship,
    pub phone: String,
    #[serde(default)]
    pub gender: Gender,
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub country: String,
}

/// A stored profile as returned by `/profile`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    /// Owning user's identifier.
    #[serde(default)]
    pub user: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub gender: Gender,
    /// ISO date or datetime string.
    #[serde(default)]
    pub birthday: String,
    #[serde(default)]
    pub status: ProfileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub legal_guardian: Vec<LegalGuardian>,
    #[serde(default)]
    pub social_media: SocialMedia,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// Server-computed virtuals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_minor: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Editable profile fields; the body of `POST`/`PUT /profile`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub firstname: String,
    pub lastname: String,
    pub id_number: String,
    #[serde(default)]
    pub gender: Gender,
    /// `YYYY-MM-DD`.
    pub birthday: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub social_media: SocialMedia,
    #[serde(default)]
    pub legal_guardian: Vec<LegalGuardian>,
}

/// `data` of profile get/create/update responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub profile: Profile,
}

/// `data` of the photo upload response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPayload {
    pub photo_url: String,
}

/// A photo file staged for multipart upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
