//! Local form validation run before any network call.
//!
//! Every check returns a [`SessionError::Validation`] carrying the message the
//! UI shows verbatim. Registration and profile saves short-circuit on the
//! first failure; the transport is never reached.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::error::SessionError;
use crate::types::{LegalGuardian, ProfileForm, RegisterCredentials};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 50;
/// Profiles whose owner is younger than this need at least one guardian.
pub const ADULT_AGE: i32 = 18;

pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long";
pub const PASSWORD_TOO_WEAK: &str =
    "Password must contain at least one lowercase letter, one uppercase letter, and one number";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const PROFILE_FIELDS_REQUIRED: &str = "Please fill in all required fields";
pub const GUARDIAN_FIELDS_REQUIRED: &str = "Please fill in all required guardian fields";
pub const GUARDIAN_REQUIRED_FOR_MINOR: &str = "Legal guardian information is required for users under 18";
pub const INVALID_BIRTHDAY: &str = "Birthday must be a valid date (YYYY-MM-DD)";

const BIRTHDAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Check password strength: length, then character classes.
///
/// # Errors
///
/// Returns a validation error naming the first rule the password breaks.
pub fn validate_password(password: &str) -> Result<(), SessionError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SessionError::validation(PASSWORD_TOO_SHORT));
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(SessionError::validation(PASSWORD_TOO_WEAK));
    }
    Ok(())
}

/// Check a person name: 2-50 characters of ASCII letters, whitespace, `'` or `-`.
///
/// `label` names the field in the message (e.g. `"First name"`).
///
/// # Errors
///
/// Returns a validation error for a bad length or a disallowed character.
pub fn validate_name(label: &str, name: &str) -> Result<(), SessionError> {
    let name = name.trim();
    let len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(SessionError::validation(format!(
            "{label} must be between {MIN_NAME_LEN} and {MAX_NAME_LEN} characters"
        )));
    }
    if !name.chars().all(is_name_char) {
        return Err(SessionError::validation(format!(
            "{label} can only contain letters, spaces, hyphens, and apostrophes"
        )));
    }
    Ok(())
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c.is_whitespace() || c == '\'' || c == '-'
}

/// Full registration pre-flight: names, password strength, confirmation.
///
/// # Errors
///
/// Returns the first validation failure.
pub fn validate_registration(creds: &RegisterCredentials) -> Result<(), SessionError> {
    validate_name("First name", &creds.firstname)?;
    validate_name("Last name", &creds.lastname)?;
    validate_password(&creds.password)?;
    if creds.password != creds.confirm_password {
        return Err(SessionError::validation(PASSWORDS_DO_NOT_MATCH));
    }
    Ok(())
}

/// A guardian needs at least names, email and phone before it is added.
///
/// # Errors
///
/// Returns [`GUARDIAN_FIELDS_REQUIRED`] when any of them is blank.
pub fn validate_guardian(guardian: &LegalGuardian) -> Result<(), SessionError> {
    let required = [&guardian.firstname, &guardian.lastname, &guardian.email, &guardian.phone];
    if required.iter().any(|v| v.trim().is_empty()) {
        return Err(SessionError::validation(GUARDIAN_FIELDS_REQUIRED));
    }
    Ok(())
}

/// Check a profile form before create/update.
///
/// Minors (age on `today` below [`ADULT_AGE`]) must list at least one guardian.
///
/// # Errors
///
/// Returns the first validation failure.
pub fn validate_profile_form(form: &ProfileForm, today: Date) -> Result<(), SessionError> {
    let required = [&form.firstname, &form.lastname, &form.id_number, &form.birthday];
    if required.iter().any(|v| v.trim().is_empty()) {
        return Err(SessionError::validation(PROFILE_FIELDS_REQUIRED));
    }
    let birthday = parse_birthday(&form.birthday).ok_or_else(|| SessionError::validation(INVALID_BIRTHDAY))?;
    if age_on(birthday, today) < ADULT_AGE && form.legal_guardian.is_empty() {
        return Err(SessionError::validation(GUARDIAN_REQUIRED_FOR_MINOR));
    }
    Ok(())
}

/// Parse a zero-padded `YYYY-MM-DD`, ignoring any `T...` time suffix.
#[must_use]
pub fn parse_birthday(raw: &str) -> Option<Date> {
    let date_part = raw.trim().split('T').next()?;
    if !date_part.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Date::parse(date_part, BIRTHDAY_FORMAT).ok()
}

/// Whole years between `birthday` and `today`.
#[must_use]
pub fn age_on(birthday: Date, today: Date) -> i32 {
    let mut age = today.year() - birthday.year();
    let today_md = (u8::from(today.month()), today.day());
    let birth_md = (u8::from(birthday.month()), birthday.day());
    if today_md < birth_md {
        age -= 1;
    }
    age
}
