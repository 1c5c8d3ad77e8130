//! Ordering and compact rendering of occurrence instants.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::rfc::ical::core::{DateTime as IcalDateTime, DateTimeForm};

/// Sorts occurrences ascending in place.
pub fn sort_ascending(dates: &mut [DateTime<Utc>]) {
    dates.sort_unstable();
}

/// ## Summary
/// Renders an instant as a compact DATE-TIME token, as used in `UNTIL`,
/// `RDATE` and `EXDATE` values.
///
/// Without a zone the token is UTC (`19970902T090000Z`). With a zone it is
/// the local wall-clock time in that zone, without the `Z` suffix, to be
/// paired with a `TZID` parameter.
#[must_use]
pub fn until_string(instant: &DateTime<Utc>, zone: Option<Tz>) -> String {
    let (naive, form) = match zone {
        None => (instant.naive_utc(), DateTimeForm::Utc),
        Some(tz) => (instant.with_timezone(&tz).naive_local(), DateTimeForm::Floating),
    };

    match IcalDateTime::from_naive(&naive, form) {
        Some(value) => value.to_string(),
        None if zone.is_none() => naive.format("%Y%m%dT%H%M%SZ").to_string(),
        None => naive.format("%Y%m%dT%H%M%S").to_string(),
    }
}
