//! iCalendar recurrence support (RFC 5545).
//!
//! - `core`: DATE-TIME value model
//! - `expand`: date utilities and timezone resolution
//! - `build`: property line rendering
//! - `recur`: single-rule handles and the recurrence set combinator

pub mod build;
pub mod core;
pub mod expand;
pub mod recur;
