//! Date utilities and timezone resolution used by recurrence sets.

mod dateutil;
mod timezone;

pub use dateutil::{sort_ascending, until_string};
pub use timezone::{ConversionError, TimeZoneResolver, convert_to_utc};
