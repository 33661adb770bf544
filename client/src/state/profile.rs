//! Profile state for the signed-in user.
//!
//! Requests reuse the token the auth store persisted, so this module only
//! owns the profile store and its signal mirror.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use std::sync::Arc;

use leptos::prelude::*;
use session::ProfileStore;
use session::profile::ProfileState as ProfileSnapshot;
use session::types::Profile;

use crate::net::api::{ClientApi, client_api};

pub type ClientProfileStore = ProfileStore<ClientApi>;

#[derive(Clone)]
pub struct ProfileState {
    store: Arc<ClientProfileStore>,
    snapshot: RwSignal<ProfileSnapshot>,
}

impl ProfileState {
    pub fn new() -> Self {
        let store = Arc::new(ProfileStore::new(client_api()));
        let snapshot = RwSignal::new(store.snapshot());
        super::mirror_into(store.subscribe(), snapshot);
        Self { store, snapshot }
    }

    pub fn store(&self) -> &ClientProfileStore {
        &self.store
    }

    pub fn snapshot(&self) -> RwSignal<ProfileSnapshot> {
        self.snapshot
    }
}

impl Default for ProfileState {
    fn default() -> Self {
        Self::new()
    }
}

/// Photo URL to show in the avatar, if the profile has a non-empty one.
pub fn avatar_url(profile: Option<&Profile>) -> Option<String> {
    profile.and_then(|p| p.photo.clone()).filter(|url| !url.trim().is_empty())
}

/// Title for the editor header.
pub fn editor_title(profile: Option<&Profile>) -> &'static str {
    if profile.is_some() { "Edit Profile" } else { "Create Profile" }
}
