//! The recurrence set: inclusion rules and dates minus exclusion rules and
//! dates, merged into one sorted, deduplicated sequence.

use std::fmt;

use chrono::{DateTime, Utc};

use super::cache::QueryCache;
use super::exclusion::ExclusionFilter;
use super::iteration::{Filter, Iteration, Query};
use super::occurrence::IntoOccurrence;
use super::rule::{IntoRule, Recur, Rule};
use crate::error::RfcResult;
use crate::rfc::ical::build::{date_list_line, exclusion_rule_lines};

/// ## Summary
/// A mutable collection of RRULE, RDATE, EXRULE and EXDATE members.
///
/// Rules keep insertion order and are unique by canonical text. Dates are
/// unique by instant and kept ascending at all times.
#[derive(Debug, Clone, Default)]
pub struct RecurrenceSet {
    rules: Vec<Rule>,
    dates: Vec<DateTime<Utc>>,
    exclusion_rules: Vec<Rule>,
    exclusion_dates: Vec<DateTime<Utc>>,
    cache: QueryCache,
}

impl RecurrenceSet {
    /// Creates an empty set, memoising query results if `caching` is set.
    #[must_use]
    pub fn new(caching: bool) -> Self {
        Self {
            cache: QueryCache::new(caching),
            ..Self::default()
        }
    }

    /// ## Summary
    /// Adds an inclusion rule. A rule whose canonical text is already present
    /// is ignored and `Ok(false)` is returned.
    ///
    /// ## Errors
    /// Returns `RfcError::TypeKind` if `rule` is not a usable rule handle.
    pub fn add_rule(&mut self, rule: impl IntoRule) -> RfcResult<bool> {
        let added = insert_rule(&mut self.rules, rule.into_rule()?, "RRULE");
        self.invalidate(added);
        Ok(added)
    }

    /// ## Summary
    /// Adds an inclusion date. An instant already present is ignored and
    /// `Ok(false)` is returned.
    ///
    /// ## Errors
    /// Returns `RfcError::TypeKind` if `date` does not name an instant.
    pub fn add_date(&mut self, date: impl IntoOccurrence) -> RfcResult<bool> {
        let added = insert_date(&mut self.dates, date.into_occurrence()?, "RDATE");
        self.invalidate(added);
        Ok(added)
    }

    /// ## Summary
    /// Adds an exclusion rule, ignoring duplicates by canonical text.
    ///
    /// ## Errors
    /// Returns `RfcError::TypeKind` if `rule` is not a usable rule handle.
    pub fn add_exclusion_rule(&mut self, rule: impl IntoRule) -> RfcResult<bool> {
        let added = insert_rule(&mut self.exclusion_rules, rule.into_rule()?, "EXRULE");
        self.invalidate(added);
        Ok(added)
    }

    /// ## Summary
    /// Adds an exclusion date, ignoring duplicates by instant.
    ///
    /// ## Errors
    /// Returns `RfcError::TypeKind` if `date` does not name an instant.
    pub fn add_exclusion_date(&mut self, date: impl IntoOccurrence) -> RfcResult<bool> {
        let added = insert_date(&mut self.exclusion_dates, date.into_occurrence()?, "EXDATE");
        self.invalidate(added);
        Ok(added)
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    #[must_use]
    pub fn exclusion_rules(&self) -> &[Rule] {
        &self.exclusion_rules
    }

    #[must_use]
    pub fn exclusion_dates(&self) -> &[DateTime<Utc>] {
        &self.exclusion_dates
    }

    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache.is_enabled()
    }

    /// Returns whether the set has nothing to include.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.dates.is_empty()
    }

    /// ## Summary
    /// TZID of the first inclusion rule, in insertion order, that declares one.
    #[must_use]
    pub fn timezone_id(&self) -> Option<&str> {
        self.declared_timezone_id()
    }

    /// ## Summary
    /// Renders the set as calendar content lines: the inclusion rules' own
    /// lines, one `RDATE` line, one `EXRULE` line per exclusion rule, one
    /// `EXDATE` line. Empty date lists produce no line.
    #[must_use]
    pub fn to_canonical_lines(&self) -> Vec<String> {
        let zone = self.declared_zone();

        let mut lines = Vec::new();
        for rule in &self.rules {
            lines.extend(rule.canonical_text().lines().map(String::from));
        }
        if !self.dates.is_empty() {
            lines.push(date_list_line("RDATE", &self.dates, zone));
        }
        for rule in &self.exclusion_rules {
            lines.extend(exclusion_rule_lines(&rule.canonical_text()));
        }
        if !self.exclusion_dates.is_empty() {
            lines.push(date_list_line("EXDATE", &self.exclusion_dates, zone));
        }
        lines
    }

    /// ## Summary
    /// Encodes the canonical lines as a single JSON array string.
    ///
    /// ## Errors
    /// Returns an error if JSON encoding fails.
    pub fn to_text(&self) -> RfcResult<String> {
        Ok(serde_json::to_string(&self.to_canonical_lines())?)
    }

    fn invalidate(&mut self, changed: bool) {
        if changed {
            self.cache.clear();
        }
    }
}

fn insert_rule(rules: &mut Vec<Rule>, rule: Rule, property: &str) -> bool {
    let text = rule.canonical_text();
    if rules.iter().any(|existing| existing.canonical_text() == text) {
        tracing::debug!(property, rule = %text, "Ignoring duplicate rule");
        return false;
    }
    rules.push(rule);
    true
}

fn insert_date(dates: &mut Vec<DateTime<Utc>>, date: DateTime<Utc>, property: &str) -> bool {
    match dates.binary_search(&date) {
        Ok(_) => {
            tracing::debug!(property, %date, "Ignoring duplicate date");
            false
        }
        Err(index) => {
            dates.insert(index, date);
            true
        }
    }
}

impl Recur for RecurrenceSet {
    fn iterate(&self, filter: &mut dyn Filter) {
        if self.is_empty() {
            return;
        }

        let mut excluding = ExclusionFilter::new(filter, &self.exclusion_rules, &self.exclusion_dates);

        for date in &self.dates {
            if !excluding.decide(*date).should_continue() {
                break;
            }
        }

        // A stop ends only the generator that received it
        for rule in &self.rules {
            rule.iterate(&mut excluding);
        }
    }

    fn canonical_text(&self) -> String {
        self.to_string()
    }

    fn declared_zone(&self) -> Option<chrono_tz::Tz> {
        self.rules.iter().find_map(Rule::declared_zone)
    }

    fn evaluate(&self, query: Query) -> Vec<DateTime<Utc>> {
        self.cache.get_or_compute(query, || {
            let mut iteration = Iteration::new(query);
            self.iterate(&mut iteration);
            let results = iteration.finish();
            tracing::debug!(?query, count = results.len(), "Evaluated recurrence set");
            results
        })
    }
}

impl fmt::Display for RecurrenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_lines().join("\n"))
    }
}
