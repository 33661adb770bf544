//! Calendar date of "now" for age checks.
//!
//! The browser's local date decides whether a profile owner is a minor, the
//! same date the user sees on their device.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

use time::{Date, Month};

/// Build a date from JS-style parts (`month0` is zero-based).
pub fn date_from_js_parts(year: f64, month0: f64, day: f64) -> Option<Date> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (year, month, day) = (year as i32, (month0 as u8).checked_add(1)?, day as u8);
    Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()
}

/// Today's local date; UTC when no browser clock is available.
pub fn today() -> Date {
    #[cfg(feature = "hydrate")]
    {
        let now = js_sys::Date::new_0();
        if let Some(date) = date_from_js_parts(now.get_full_year().into(), now.get_month().into(), now.get_date().into()) {
            return date;
        }
    }
    time::OffsetDateTime::now_utc().date()
}
