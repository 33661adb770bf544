//! Browser `localStorage` token store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session crate persists exactly one bearer token through a
//! `TokenStore`. In the browser that is a single `localStorage` entry; during
//! SSR (or when storage is blocked) reads yield `None` and writes are no-ops,
//! so a server render always looks anonymous.

#[cfg(test)]
#[path = "token_storage_test.rs"]
mod token_storage_test;

use session::TokenStore;
#[cfg(feature = "hydrate")]
use session::token::TOKEN_STORAGE_KEY;

/// Token store backed by `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTokenStore;

#[cfg(feature = "hydrate")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl TokenStore for BrowserTokenStore {
    fn get(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            storage()?
                .get_item(TOKEN_STORAGE_KEY)
                .ok()
                .flatten()
                .filter(|token| !token.is_empty())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn set(&self, token: &str) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = storage() else {
                log::warn!("localStorage unavailable; token not persisted");
                return;
            };
            let _ = storage.set_item(TOKEN_STORAGE_KEY, token);
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = storage() {
                let _ = storage.remove_item(TOKEN_STORAGE_KEY);
            }
        }
    }
}
