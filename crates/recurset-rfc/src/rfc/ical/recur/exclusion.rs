//! Just-in-time exclusion of EXRULE/EXDATE instants.
//!
//! Exclusion rules may be infinite, so they are never expanded over their
//! whole domain. A bounded (`between`) query evaluates them once over the
//! query window; every other query asks them, candidate by candidate, about
//! a one-second window straddling that candidate only.

use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};

use super::iteration::{Decision, Filter, Query};
use super::rule::{Recur, Rule};

/// How exclusion rules are consulted for the lifetime of one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionMode {
    /// Exclusion rules were expanded over the whole query window up front.
    Eager,
    /// Exclusion rules are expanded around each candidate on arrival.
    Lazy,
}

/// ## Summary
/// Instants known to be unavailable to the current query.
///
/// Holds both excluded instants and instants already handed downstream, so
/// that an occurrence produced by two generators is only counted once.
#[derive(Debug, Clone, Default)]
pub struct ExclusionTable {
    marked: HashSet<DateTime<Utc>>,
}

impl ExclusionTable {
    /// Creates a table seeded with explicit exclusion dates.
    #[must_use]
    pub fn seeded(dates: &[DateTime<Utc>]) -> Self {
        Self {
            marked: dates.iter().copied().collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.marked.contains(instant)
    }

    /// Marks an instant; returns `false` if it was already marked.
    pub fn mark(&mut self, instant: DateTime<Utc>) -> bool {
        self.marked.insert(instant)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.marked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    /// ## Summary
    /// Marks every instant any of `rules` produces inside `lo..=hi`.
    pub fn evaluate(&mut self, rules: &[Rule], lo: DateTime<Utc>, hi: DateTime<Utc>) {
        for rule in rules {
            let excluded = rule.between(lo, hi, true);
            tracing::trace!(%lo, %hi, count = excluded.len(), "Evaluated exclusion window");
            self.marked.extend(excluded);
        }
    }
}

/// Half-width of the window an exclusion rule is asked about per candidate.
fn lazy_window() -> TimeDelta {
    TimeDelta::seconds(1)
}

/// ## Summary
/// Accept stage that drops excluded and already-seen candidates before
/// handing the rest to the wrapped stage.
pub struct ExclusionFilter<'a> {
    inner: &'a mut dyn Filter,
    rules: &'a [Rule],
    table: ExclusionTable,
    mode: ExclusionMode,
}

impl<'a> ExclusionFilter<'a> {
    /// ## Summary
    /// Wraps `inner`, seeding the table with `dates`.
    ///
    /// For a `between` query the exclusion rules are evaluated over the whole
    /// query window here, once.
    pub fn new(inner: &'a mut dyn Filter, rules: &'a [Rule], dates: &[DateTime<Utc>]) -> Self {
        let mut table = ExclusionTable::seeded(dates);
        let mode = match *inner.query() {
            Query::Between { after, before, .. } => {
                table.evaluate(rules, after, before);
                ExclusionMode::Eager
            }
            Query::All | Query::After { .. } | Query::Before { .. } => ExclusionMode::Lazy,
        };

        Self {
            inner,
            rules,
            table,
            mode,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ExclusionMode {
        self.mode
    }

    #[must_use]
    pub const fn table(&self) -> &ExclusionTable {
        &self.table
    }

    fn is_excluded(&mut self, candidate: DateTime<Utc>) -> bool {
        if self.table.contains(&candidate) {
            return true;
        }
        if self.mode == ExclusionMode::Lazy && !self.rules.is_empty() {
            let lo = candidate
                .checked_sub_signed(lazy_window())
                .unwrap_or(candidate);
            let hi = candidate
                .checked_add_signed(lazy_window())
                .unwrap_or(candidate);
            self.table.evaluate(self.rules, lo, hi);
            return self.table.contains(&candidate);
        }
        false
    }
}

impl Filter for ExclusionFilter<'_> {
    fn query(&self) -> &Query {
        self.inner.query()
    }

    fn decide(&mut self, candidate: DateTime<Utc>) -> Decision {
        if self.is_excluded(candidate) {
            return Decision::Reject;
        }
        self.table.mark(candidate);
        self.inner.decide(candidate)
    }
}
