//! `reqwest` implementation of the session crate's `HttpClient`.
//!
//! ERROR HANDLING
//! ==============
//! Connection, TLS and body-read failures become `SessionError::Network`.
//! Every HTTP status is passed through untouched; the session crate owns
//! status interpretation and error-message resolution.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use session::SessionError;
use session::transport::{ApiRequest, ApiResponse, HttpClient, Method, PHOTO_FIELD, RequestBody};
use session::types::PhotoUpload;

#[derive(Clone, Debug)]
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    /// # Errors
    ///
    /// Returns a network error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, SessionError> {
        let client = reqwest::Client::builder().build().map_err(network_error)?;
        Ok(Self { client })
    }

    /// Translate an `ApiRequest` into a ready-to-execute `reqwest::Request`.
    ///
    /// # Errors
    ///
    /// Returns a network error for an unparseable URL or MIME type.
    pub fn build(&self, request: ApiRequest) -> Result<reqwest::Request, SessionError> {
        let mut builder = self.client.request(reqwest_method(request.method), &request.url);
        if let Some(auth) = request.authorization {
            builder = builder.header(AUTHORIZATION, auth);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Photo(photo) => builder.multipart(photo_form(photo)?),
        };
        builder.build().map_err(network_error)
    }
}

#[async_trait(?Send)]
impl HttpClient for ReqwestHttp {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, SessionError> {
        let url = request.url.clone();
        let req = self.build(request)?;
        let resp = self.client.execute(req).await.map_err(network_error)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(network_error)?;
        tracing::debug!(%url, status, "api response");
        Ok(ApiResponse { status, body })
    }
}

pub fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn photo_form(photo: PhotoUpload) -> Result<Form, SessionError> {
    let part = Part::bytes(photo.bytes)
        .file_name(photo.file_name)
        .mime_str(&photo.content_type)
        .map_err(network_error)?;
    Ok(Form::new().part(PHOTO_FIELD, part))
}

fn network_error(err: reqwest::Error) -> SessionError {
    SessionError::Network(err.to_string())
}

/// Guess an image MIME type from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Read a photo from disk into an upload.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read.
pub fn load_photo(path: &Path) -> std::io::Result<PhotoUpload> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "photo".to_owned(), |n| n.to_string_lossy().into_owned());
    Ok(PhotoUpload { file_name, content_type: content_type_for(path).to_owned(), bytes })
}
