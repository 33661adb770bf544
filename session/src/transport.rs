//! REST transport for the auth and profile endpoints.
//!
//! ARCHITECTURE
//! ============
//! Front ends implement only [`HttpClient`] (one request in, status + body
//! out). [`RestApi`] layers the endpoint table, bearer header, JSON encoding
//! and response decoding on top, and implements the [`AuthApi`] and
//! [`ProfileApi`] contracts the stores depend on.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`SessionError::Rejected`] with the server's
//! `message` (or first field error, or a per-endpoint fallback). A missing
//! response is [`SessionError::Network`]. No retries, no timeouts beyond the
//! underlying HTTP stack's defaults.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{GENERIC_ERROR_MESSAGE, SessionError};
use crate::token::TokenStore;
use crate::types::{
    Acknowledgement, ApiErrorBody, AuthPayload, Envelope, LoginCredentials, PhotoPayload, PhotoUpload, Profile,
    ProfileForm, ProfilePayload, RegisterPayload,
};

/// Multipart field name the server expects the photo under.
pub const PHOTO_FIELD: &str = "photo";

// =============================================================================
// CONTRACTS
// =============================================================================

/// The four auth operations. Futures are `?Send` so browser fetch can back them.
#[async_trait(?Send)]
pub trait AuthApi {
    /// `POST /auth/login`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthPayload, SessionError>;
    /// `POST /auth/register`.
    async fn register(&self, payload: &RegisterPayload) -> Result<AuthPayload, SessionError>;
    /// `GET /auth/me` with the stored bearer token.
    async fn current_user(&self) -> Result<AuthPayload, SessionError>;
    /// `POST /auth/logout` with the stored bearer token.
    async fn logout(&self) -> Result<(), SessionError>;
}

/// Profile CRUD plus photo upload, all bearer-authenticated.
#[async_trait(?Send)]
pub trait ProfileApi {
    async fn get_profile(&self) -> Result<Profile, SessionError>;
    async fn create_profile(&self, form: &ProfileForm) -> Result<Profile, SessionError>;
    async fn update_profile(&self, form: &ProfileForm) -> Result<Profile, SessionError>;
    async fn delete_profile(&self) -> Result<(), SessionError>;
    /// Returns the URL of the stored photo.
    async fn upload_photo(&self, photo: &PhotoUpload) -> Result<String, SessionError>;
}

// =============================================================================
// HTTP SEAM
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Multipart form with the file under [`PHOTO_FIELD`].
    Photo(PhotoUpload),
}

/// A fully-resolved request handed to the [`HttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// Complete `Authorization` header value, e.g. `Bearer abc`.
    pub authorization: Option<String>,
    pub body: RequestBody,
}

/// Raw status and body text of a received response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request. Implementations map "no response" to [`SessionError::Network`]
/// and return every received response, whatever its status.
#[async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, SessionError>;
}

// =============================================================================
// ENDPOINTS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    CurrentUser,
    Logout,
    GetProfile,
    CreateProfile,
    UpdateProfile,
    DeleteProfile,
    UploadPhoto,
}

impl Endpoint {
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::CurrentUser | Self::GetProfile => Method::Get,
            Self::Login | Self::Register | Self::Logout | Self::CreateProfile | Self::UploadPhoto => Method::Post,
            Self::UpdateProfile => Method::Put,
            Self::DeleteProfile => Method::Delete,
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::Register => "/auth/register",
            Self::CurrentUser => "/auth/me",
            Self::Logout => "/auth/logout",
            Self::GetProfile | Self::CreateProfile | Self::UpdateProfile | Self::DeleteProfile => "/profile",
            Self::UploadPhoto => "/profile/upload-photo",
        }
    }

    /// Message used when a rejection carries none of its own.
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Login | Self::Register | Self::CurrentUser | Self::Logout => GENERIC_ERROR_MESSAGE,
            Self::GetProfile => "Failed to get profile",
            Self::CreateProfile => "Failed to create profile",
            Self::UpdateProfile => "Failed to update profile",
            Self::DeleteProfile => "Failed to delete profile",
            Self::UploadPhoto => "Failed to upload photo",
        }
    }
}

/// `Authorization` header value for `token`.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Decode a received response for `endpoint`.
///
/// # Errors
///
/// [`SessionError::Rejected`] for non-2xx statuses, [`SessionError::Decode`]
/// when a 2xx body does not match `T`.
pub fn decode_response<T: DeserializeOwned>(endpoint: Endpoint, status: u16, body: &str) -> Result<T, SessionError> {
    if !(200..300).contains(&status) {
        return Err(SessionError::Rejected { status, message: rejection_message(endpoint, body) });
    }
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|e| SessionError::Decode(e.to_string()))
}

fn rejection_message(endpoint: Endpoint, body: &str) -> String {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .message
        .filter(|m| !m.trim().is_empty())
        .or_else(|| parsed.errors.into_iter().map(|e| e.msg).find(|m| !m.trim().is_empty()))
        .unwrap_or_else(|| endpoint.fallback_message().to_owned())
}

// =============================================================================
// REST API
// =============================================================================

/// [`AuthApi`] + [`ProfileApi`] over any [`HttpClient`], reading the bearer
/// token from a shared [`TokenStore`] on every call.
#[derive(Clone, Debug)]
pub struct RestApi<C, S> {
    config: ApiConfig,
    http: C,
    tokens: S,
}

impl<C: HttpClient, S: TokenStore> RestApi<C, S> {
    pub fn new(config: ApiConfig, http: C, tokens: S) -> Self {
        Self { config, http, tokens }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Build the request for `endpoint`, attaching the bearer token when one is stored.
    #[must_use]
    pub fn request(&self, endpoint: Endpoint, body: RequestBody) -> ApiRequest {
        ApiRequest {
            method: endpoint.method(),
            url: self.config.url(endpoint.path()),
            authorization: self.tokens.get().map(|t| bearer(&t)),
            body,
        }
    }

    async fn call<T: DeserializeOwned>(&self, endpoint: Endpoint, body: RequestBody) -> Result<T, SessionError> {
        let response = self.http.send(self.request(endpoint, body)).await?;
        tracing::debug!(path = endpoint.path(), status = response.status, "api response");
        decode_response(endpoint, response.status, &response.body)
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        payload: &impl Serialize,
    ) -> Result<T, SessionError> {
        let value = serde_json::to_value(payload).map_err(|e| SessionError::Decode(e.to_string()))?;
        self.call(endpoint, RequestBody::Json(value)).await
    }
}

#[async_trait(?Send)]
impl<C: HttpClient, S: TokenStore> AuthApi for RestApi<C, S> {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthPayload, SessionError> {
        let env: Envelope<AuthPayload> = self.call_json(Endpoint::Login, credentials).await?;
        Ok(env.data)
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<AuthPayload, SessionError> {
        let env: Envelope<AuthPayload> = self.call_json(Endpoint::Register, payload).await?;
        Ok(env.data)
    }

    async fn current_user(&self) -> Result<AuthPayload, SessionError> {
        let env: Envelope<AuthPayload> = self.call(Endpoint::CurrentUser, RequestBody::Empty).await?;
        Ok(env.data)
    }

    async fn logout(&self) -> Result<(), SessionError> {
        let _: Acknowledgement = self.call(Endpoint::Logout, RequestBody::Empty).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl<C: HttpClient, S: TokenStore> ProfileApi for RestApi<C, S> {
    async fn get_profile(&self) -> Result<Profile, SessionError> {
        let env: Envelope<ProfilePayload> = self.call(Endpoint::GetProfile, RequestBody::Empty).await?;
        Ok(env.data.profile)
    }

    async fn create_profile(&self, form: &ProfileForm) -> Result<Profile, SessionError> {
        let env: Envelope<ProfilePayload> = self.call_json(Endpoint::CreateProfile, form).await?;
        Ok(env.data.profile)
    }

    async fn update_profile(&self, form: &ProfileForm) -> Result<Profile, SessionError> {
        let env: Envelope<ProfilePayload> = self.call_json(Endpoint::UpdateProfile, form).await?;
        Ok(env.data.profile)
    }

    async fn delete_profile(&self) -> Result<(), SessionError> {
        let _: Acknowledgement = self.call(Endpoint::DeleteProfile, RequestBody::Empty).await?;
        Ok(())
    }

    async fn upload_photo(&self, photo: &PhotoUpload) -> Result<String, SessionError> {
        let env: Envelope<PhotoPayload> = self.call(Endpoint::UploadPhoto, RequestBody::Photo(photo.clone())).await?;
        Ok(env.data.photo_url)
    }
}
