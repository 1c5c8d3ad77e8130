//! `RDATE`/`EXDATE`/`EXRULE` content lines.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::rfc::ical::expand::until_string;

/// ## Summary
/// Returns the `NAME:` or `NAME;TZID=<tzid>:` prefix of a content line.
#[must_use]
pub fn property_header(name: &str, tzid: Option<&str>) -> String {
    match tzid {
        Some(tzid) if !tzid.is_empty() => format!("{name};TZID={tzid}:"),
        _ => format!("{name}:"),
    }
}

/// ## Summary
/// Renders a comma-separated date list property.
///
/// With a zone the values are local wall-clock times in that zone and the
/// header carries its TZID; otherwise they are UTC values.
#[must_use]
pub fn date_list_line(name: &str, dates: &[DateTime<Utc>], zone: Option<Tz>) -> String {
    let values = dates
        .iter()
        .map(|date| until_string(date, zone))
        .collect::<Vec<_>>()
        .join(",");
    format!("{}{values}", property_header(name, zone.map(Tz::name)))
}

/// ## Summary
/// Rewrites the `RRULE` lines of a rule's canonical text as `EXRULE` lines.
///
/// `DTSTART` and any other lines are dropped; an exclusion rule is anchored
/// by the component it belongs to.
#[must_use]
pub fn exclusion_rule_lines(canonical_text: &str) -> Vec<String> {
    canonical_text
        .lines()
        .filter_map(|line| line.strip_prefix("RRULE:"))
        .map(|body| format!("EXRULE:{body}"))
        .collect()
}
