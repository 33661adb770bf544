//! REST transport for the browser.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): every request fails with `SessionError::Unavailable`
//! since the API is only meaningful in the browser, where the token lives.
//!
//! ERROR HANDLING
//! ==============
//! Fetch-level failures (CORS, offline, aborted) map to
//! `SessionError::Network`; any HTTP status, including 4xx/5xx, is returned
//! as an `ApiResponse` for the session crate to decode.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use session::transport::{ApiRequest, ApiResponse, HttpClient, RestApi};
use session::{ApiConfig, SessionError};

use crate::util::token_storage::BrowserTokenStore;

/// Concrete auth + profile API used by the browser client.
pub type ClientApi = RestApi<GlooHttp, BrowserTokenStore>;

/// Build the API against the base URL baked in at compile time.
pub fn client_api() -> ClientApi {
    RestApi::new(ApiConfig::compiled(), GlooHttp, BrowserTokenStore)
}

/// `HttpClient` over the browser `fetch` API.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooHttp;

#[cfg(any(test, feature = "hydrate"))]
fn network_error(detail: impl std::fmt::Display) -> SessionError {
    SessionError::Network(detail.to_string())
}

#[cfg(feature = "hydrate")]
fn builder(method: session::transport::Method, url: &str) -> gloo_net::http::RequestBuilder {
    use gloo_net::http::Request;
    use session::transport::Method;

    match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
        Method::Put => Request::put(url),
        Method::Delete => Request::delete(url),
    }
}

#[cfg(feature = "hydrate")]
fn photo_form(photo: &session::types::PhotoUpload) -> Result<web_sys::FormData, SessionError> {
    let bytes = js_sys::Uint8Array::from(photo.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(&photo.content_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| network_error(format!("{e:?}")))?;
    let form = web_sys::FormData::new().map_err(|e| network_error(format!("{e:?}")))?;
    form.append_with_blob_and_filename(session::transport::PHOTO_FIELD, &blob, &photo.file_name)
        .map_err(|e| network_error(format!("{e:?}")))?;
    Ok(form)
}

#[async_trait(?Send)]
impl HttpClient for GlooHttp {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, SessionError> {
        #[cfg(feature = "hydrate")]
        {
            use session::transport::RequestBody;

            let mut req = builder(request.method, &request.url);
            if let Some(auth) = request.authorization.as_deref() {
                req = req.header("Authorization", auth);
            }
            let req = match &request.body {
                RequestBody::Empty => req.build(),
                RequestBody::Json(value) => req.json(value),
                RequestBody::Photo(photo) => req.body(photo_form(photo)?),
            }
            .map_err(network_error)?;

            let resp = req.send().await.map_err(network_error)?;
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Ok(ApiResponse { status, body })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(SessionError::Unavailable)
        }
    }
}
