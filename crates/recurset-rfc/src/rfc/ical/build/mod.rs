//! Calendar property line rendering for recurrence sets.

mod property;

pub use property::{date_list_line, exclusion_rule_lines, property_header};
