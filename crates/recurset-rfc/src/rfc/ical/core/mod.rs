//! iCalendar core models (RFC 5545).
//!
//! Only the DATE-TIME value is modelled here; occurrences themselves are
//! plain `chrono::DateTime<Utc>` instants.

mod datetime;

pub use datetime::{DateTime, DateTimeForm};
