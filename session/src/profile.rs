//! Profile state and the editor-form helpers around it.
//!
//! DESIGN
//! ======
//! Same shape as the auth store: one `watch` channel owns [`ProfileState`],
//! every operation flips `is_loading`, clears `error`, awaits the transport,
//! and commits either the new profile or the error message. Requests ride on
//! the bearer token the auth session already stored; this store never reads
//! or writes the token itself.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use time::Date;
use tokio::sync::watch;

use crate::error::SessionError;
use crate::transport::ProfileApi;
use crate::types::{Gender, LegalGuardian, PhotoUpload, Profile, ProfileForm, User};
use crate::validation::{ADULT_AGE, age_on, parse_birthday, validate_guardian, validate_profile_form};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct ProfileStore<P> {
    api: P,
    state: watch::Sender<ProfileState>,
}

impl<P: ProfileApi> ProfileStore<P> {
    pub fn new(api: P) -> Self {
        let (state, _) = watch::channel(ProfileState::default());
        Self { api, state }
    }

    #[must_use]
    pub fn snapshot(&self) -> ProfileState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    /// Fetch the caller's profile.
    ///
    /// # Errors
    ///
    /// Returns the transport error, also recorded in `error`.
    pub async fn load(&self) -> Result<Profile, SessionError> {
        self.begin();
        let result = self.api.get_profile().await;
        self.commit("load", result)
    }

    /// # Errors
    ///
    /// Returns the transport error, also recorded in `error`.
    pub async fn create(&self, form: &ProfileForm) -> Result<Profile, SessionError> {
        self.begin();
        let result = self.api.create_profile(form).await;
        self.commit("create", result)
    }

    /// # Errors
    ///
    /// Returns the transport error, also recorded in `error`.
    pub async fn update(&self, form: &ProfileForm) -> Result<Profile, SessionError> {
        self.begin();
        let result = self.api.update_profile(form).await;
        self.commit("update", result)
    }

    /// Validate the form, then update the loaded profile or create one.
    ///
    /// # Errors
    ///
    /// A validation error (no network call) or the transport error. Either
    /// is recorded in `error`.
    pub async fn save(&self, form: &ProfileForm, today: Date) -> Result<Profile, SessionError> {
        if let Err(err) = validate_profile_form(form, today) {
            self.state.send_modify(|s| s.error = Some(err.to_string()));
            return Err(err);
        }
        let exists = self.state.borrow().profile.is_some();
        if exists {
            self.update(form).await
        } else {
            self.create(form).await
        }
    }

    /// Upload a photo and point the loaded profile at the returned URL.
    ///
    /// # Errors
    ///
    /// Returns the transport error, also recorded in `error`.
    pub async fn upload_photo(&self, photo: &PhotoUpload) -> Result<String, SessionError> {
        self.begin();
        match self.api.upload_photo(photo).await {
            Ok(url) => {
                tracing::info!(file = %photo.file_name, "profile photo uploaded");
                let stored = url.clone();
                self.state.send_modify(move |s| {
                    if let Some(profile) = s.profile.as_mut() {
                        profile.photo = Some(stored);
                    }
                    s.is_loading = false;
                });
                Ok(url)
            }
            Err(err) => Err(self.fail("upload_photo", err)),
        }
    }

    /// # Errors
    ///
    /// Returns the transport error, also recorded in `error`. The loaded
    /// profile is kept on failure.
    pub async fn delete(&self) -> Result<(), SessionError> {
        self.begin();
        match self.api.delete_profile().await {
            Ok(()) => {
                tracing::info!("profile deleted");
                self.state.send_replace(ProfileState::default());
                Ok(())
            }
            Err(err) => Err(self.fail("delete", err)),
        }
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Forget the loaded profile, e.g. after logout.
    pub fn clear(&self) {
        self.state.send_modify(|s| {
            s.profile = None;
            s.error = None;
        });
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn commit(&self, op: &'static str, result: Result<Profile, SessionError>) -> Result<Profile, SessionError> {
        match result {
            Ok(profile) => {
                tracing::debug!(op, profile_id = %profile.id, "profile stored");
                let stored = profile.clone();
                self.state.send_replace(ProfileState { profile: Some(stored), is_loading: false, error: None });
                Ok(profile)
            }
            Err(err) => Err(self.fail(op, err)),
        }
    }

    fn fail(&self, op: &'static str, err: SessionError) -> SessionError {
        tracing::warn!(op, error = %err, "profile request failed");
        let message = err.to_string();
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.error = Some(message);
        });
        err
    }
}

// =============================================================================
// FORM HELPERS
// =============================================================================

/// Prefill the editor from a stored profile, falling back to the user's names.
#[must_use]
pub fn form_from_profile(profile: &Profile, user: Option<&User>) -> ProfileForm {
    let pick = |own: &str, fallback: Option<&str>| {
        if own.is_empty() { fallback.unwrap_or_default().to_owned() } else { own.to_owned() }
    };
    ProfileForm {
        firstname: pick(&profile.firstname, user.map(|u| u.firstname.as_str())),
        lastname: pick(&profile.lastname, user.map(|u| u.lastname.as_str())),
        id_number: profile.id_number.clone(),
        gender: profile.gender,
        birthday: profile.birthday.split('T').next().unwrap_or_default().to_owned(),
        photo: profile.photo.clone(),
        social_media: profile.social_media.clone(),
        legal_guardian: profile.legal_guardian.clone(),
    }
}

/// Blank editor form carrying the session user's names.
#[must_use]
pub fn form_for_user(user: Option<&User>) -> ProfileForm {
    ProfileForm {
        firstname: user.map(|u| u.firstname.clone()).unwrap_or_default(),
        lastname: user.map(|u| u.lastname.clone()).unwrap_or_default(),
        gender: Gender::PreferNotToSay,
        ..ProfileForm::default()
    }
}

/// Append a guardian once its required fields are filled.
///
/// # Errors
///
/// Returns the guardian validation error and leaves the form untouched.
pub fn add_guardian(form: &mut ProfileForm, guardian: LegalGuardian) -> Result<(), SessionError> {
    validate_guardian(&guardian)?;
    form.legal_guardian.push(guardian);
    Ok(())
}

/// Remove the guardian at `index`, if there is one.
pub fn remove_guardian(form: &mut ProfileForm, index: usize) -> Option<LegalGuardian> {
    (index < form.legal_guardian.len()).then(|| form.legal_guardian.remove(index))
}

/// Whether the form's birthday makes its owner a minor on `today`.
///
/// `None` while the birthday is blank or unparseable.
#[must_use]
pub fn is_minor(form: &ProfileForm, today: Date) -> Option<bool> {
    parse_birthday(&form.birthday).map(|birthday| age_on(birthday, today) < ADULT_AGE)
}

/// Avatar fallback letters, e.g. `"AL"`.
#[must_use]
pub fn initials(firstname: &str, lastname: &str) -> String {
    [firstname, lastname]
        .iter()
        .filter_map(|name| name.trim().chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
