//! Bearer token persistence contract.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store holds at most one opaque token under a single key. Browser and
//! CLI front ends implement [`TokenStore`] over `localStorage` and a file;
//! tests and SSR use [`MemoryTokenStore`]. No validation or expiry checks
//! happen here; [`inspect_token`] is a read-only diagnostic.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use std::sync::{Arc, Mutex};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;

/// Key the token lives under in client-local storage.
pub const TOKEN_STORAGE_KEY: &str = "auth_token";

const PREVIEW_LEN: usize = 20;

/// Synchronous get/set/clear over one persisted bearer token.
///
/// Implementations use interior mutability so a single store can be shared by
/// the session store and the transport that attaches the header.
pub trait TokenStore {
    /// Last stored token, or `None` if absent or storage is unreachable.
    fn get(&self) -> Option<String>;
    /// Persist `token`, replacing any previous one.
    fn set(&self, token: &str);
    /// Remove the stored token.
    fn clear(&self);
}

/// Process-local token store. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`, as if a previous run had logged in.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn set(&self, token: &str) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(token.to_owned());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn get(&self) -> Option<String> {
        (**self).get()
    }

    fn set(&self, token: &str) {
        (**self).set(token);
    }

    fn clear(&self) {
        (**self).clear();
    }
}

/// Best-effort look inside a stored token, for debugging only.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TokenDiagnostics {
    /// First 20 characters followed by `...`.
    pub preview: String,
    /// Decoded JWT payload, when the token is a decodable JWT.
    pub claims: Option<serde_json::Value>,
    /// `exp` claim in Unix seconds.
    pub expires_at: Option<i64>,
    /// Whether `exp` is at or before `now`.
    pub expired: Option<bool>,
}

/// Decode the payload segment of a JWT without verifying it.
///
/// Never fails: non-JWT tokens simply report no claims.
#[must_use]
pub fn inspect_token(token: &str, now_unix_secs: i64) -> TokenDiagnostics {
    let preview = format!("{}...", token.chars().take(PREVIEW_LEN).collect::<String>());
    let claims = decode_claims(token);
    let expires_at = claims.as_ref().and_then(|c| c.get("exp")).and_then(serde_json::Value::as_i64);
    let expired = expires_at.map(|exp| exp <= now_unix_secs);
    TokenDiagnostics { preview, claims, expires_at, expired }
}

fn decode_claims(token: &str) -> Option<serde_json::Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    value.is_object().then_some(value)
}
