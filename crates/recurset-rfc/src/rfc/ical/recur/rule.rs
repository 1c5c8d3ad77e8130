//! Rule handles: the capability every generator exposes, and the `rrule`
//! backed single-rule implementation.

use std::collections::BinaryHeap;

use chrono::{DateTime, Utc};
use rrule::{RRule, RRuleSet, Tz, Unvalidated};

use super::cache::QueryCache;
use super::iteration::{Filter, Iteration, Query};
use super::set::RecurrenceSet;
use crate::error::{RfcError, RfcResult};

/// ## Summary
/// Capability shared by everything that generates occurrences.
///
/// Implementors provide [`Recur::iterate`]; the query helpers drive it with a
/// fresh [`Iteration`] and reduce the sorted result.
pub trait Recur {
    /// Feeds candidates to `filter` until exhausted or told to stop.
    fn iterate(&self, filter: &mut dyn Filter);

    /// Line-oriented calendar text identifying this generator.
    fn canonical_text(&self) -> String;

    /// Zone the generator's start is anchored in, if any.
    fn declared_zone(&self) -> Option<chrono_tz::Tz>;

    /// TZID of [`Recur::declared_zone`].
    fn declared_timezone_id(&self) -> Option<&str> {
        self.declared_zone().map(chrono_tz::Tz::name)
    }

    /// Runs `query` and returns its occurrences in ascending order.
    fn evaluate(&self, query: Query) -> Vec<DateTime<Utc>> {
        let mut iteration = Iteration::new(query);
        self.iterate(&mut iteration);
        iteration.finish()
    }

    /// Every occurrence. Does not terminate for an unbounded generator.
    fn all(&self) -> Vec<DateTime<Utc>> {
        self.evaluate(Query::All)
    }

    /// ## Summary
    /// Every occurrence `visitor` agrees to keep.
    ///
    /// `visitor` receives each candidate and the number kept so far;
    /// returning `false` drops the candidate and stops the generator that
    /// produced it. Generators are visited one after another, so candidates
    /// do not arrive in global order.
    fn all_with<F>(&self, mut visitor: F) -> Vec<DateTime<Utc>>
    where
        F: FnMut(&DateTime<Utc>, usize) -> bool,
        Self: Sized,
    {
        let mut iteration = Iteration::with_visitor(Query::All, &mut visitor);
        self.iterate(&mut iteration);
        iteration.finish()
    }

    /// ## Summary
    /// The first `limit` occurrences of the merged sequence.
    ///
    /// Keeps the `limit` smallest candidates seen so far. A candidate no
    /// smaller than all of them is dropped and stops its generator, which
    /// cannot produce anything earlier afterwards. Terminates for unbounded
    /// generators.
    fn earliest(&self, limit: usize) -> Vec<DateTime<Utc>>
    where
        Self: Sized,
    {
        if limit == 0 {
            return Vec::new();
        }

        let mut kept = BinaryHeap::with_capacity(limit);
        let mut occurrences = self.all_with(|candidate, _| {
            if kept.len() < limit {
                kept.push(*candidate);
                return true;
            }
            match kept.peek() {
                Some(latest) if candidate < latest => {
                    kept.pop();
                    kept.push(*candidate);
                    true
                }
                _ => false,
            }
        });
        occurrences.truncate(limit);
        occurrences
    }

    /// Occurrences between `after` and `before`.
    fn between(
        &self,
        after: DateTime<Utc>,
        before: DateTime<Utc>,
        inclusive: bool,
    ) -> Vec<DateTime<Utc>> {
        self.evaluate(Query::Between {
            after,
            before,
            inclusive,
        })
    }

    /// The first occurrence after `after`.
    fn after(&self, after: DateTime<Utc>, inclusive: bool) -> Option<DateTime<Utc>> {
        self.evaluate(Query::After { after, inclusive })
            .first()
            .copied()
    }

    /// The last occurrence before `before`.
    fn before(&self, before: DateTime<Utc>, inclusive: bool) -> Option<DateTime<Utc>> {
        self.evaluate(Query::Before { before, inclusive })
            .last()
            .copied()
    }
}

/// ## Summary
/// A single RRULE anchored at its DTSTART.
///
/// Wraps a validated `rrule::RRuleSet` holding exactly one RRULE and nothing
/// else; expansion is entirely the `rrule` crate's.
#[derive(Debug, Clone)]
pub struct Recurrence {
    rule_set: RRuleSet,
    zone: Option<chrono_tz::Tz>,
    cache: QueryCache,
}

impl Recurrence {
    /// ## Summary
    /// Anchors `rule` at `dtstart` in UTC.
    ///
    /// ## Errors
    /// Returns an error if the `rrule` crate rejects the rule.
    pub fn new(rule: RRule<Unvalidated>, dtstart: DateTime<Utc>) -> RfcResult<Self> {
        let rule_set = rule.build(dtstart.with_timezone(&Tz::UTC))?;
        Ok(Self {
            rule_set,
            zone: None,
            cache: QueryCache::default(),
        })
    }

    /// ## Summary
    /// Anchors `rule` at `dtstart` expressed in `zone`, so that it expands in
    /// that zone's wall-clock time and declares its TZID.
    ///
    /// ## Errors
    /// Returns an error if the `rrule` crate rejects the rule.
    pub fn zoned(
        rule: RRule<Unvalidated>,
        dtstart: DateTime<Utc>,
        zone: chrono_tz::Tz,
    ) -> RfcResult<Self> {
        let rule_set = rule.build(dtstart.with_timezone(&Tz::Tz(zone)))?;
        Ok(Self {
            zone: anchor_zone(&rule_set),
            rule_set,
            cache: QueryCache::default(),
        })
    }

    /// Enables or disables result memoisation.
    #[must_use]
    pub fn cached(mut self, enabled: bool) -> Self {
        self.cache = QueryCache::new(enabled);
        self
    }

    #[must_use]
    pub const fn rule_set(&self) -> &RRuleSet {
        &self.rule_set
    }

    #[must_use]
    pub const fn zone(&self) -> Option<chrono_tz::Tz> {
        self.zone
    }

    /// DTSTART as an instant.
    #[must_use]
    pub fn dtstart(&self) -> DateTime<Utc> {
        self.rule_set.get_dt_start().with_timezone(&Utc)
    }
}

fn anchor_zone(rule_set: &RRuleSet) -> Option<chrono_tz::Tz> {
    match rule_set.get_dt_start().timezone() {
        Tz::Tz(zone) if zone != chrono_tz::UTC => Some(zone),
        _ => None,
    }
}

impl TryFrom<RRuleSet> for Recurrence {
    type Error = RfcError;

    /// Accepts only a set that is a bare single-rule handle.
    fn try_from(rule_set: RRuleSet) -> RfcResult<Self> {
        if rule_set.get_rrule().len() != 1 {
            return Err(RfcError::TypeKind(format!(
                "expected exactly one RRULE, found {}",
                rule_set.get_rrule().len()
            )));
        }
        if !rule_set.get_rdate().is_empty()
            || !rule_set.get_exrule().is_empty()
            || !rule_set.get_exdate().is_empty()
        {
            return Err(RfcError::TypeKind(
                "a rule handle must not carry RDATE, EXRULE or EXDATE".to_string(),
            ));
        }

        Ok(Self {
            zone: anchor_zone(&rule_set),
            rule_set,
            cache: QueryCache::default(),
        })
    }
}

impl Recur for Recurrence {
    fn iterate(&self, filter: &mut dyn Filter) {
        for date in &self.rule_set {
            if !filter.decide(date.with_timezone(&Utc)).should_continue() {
                break;
            }
        }
    }

    fn canonical_text(&self) -> String {
        self.rule_set.to_string()
    }

    fn declared_zone(&self) -> Option<chrono_tz::Tz> {
        self.zone
    }

    fn evaluate(&self, query: Query) -> Vec<DateTime<Utc>> {
        self.cache.get_or_compute(query, || {
            let mut iteration = Iteration::new(query);
            self.iterate(&mut iteration);
            iteration.finish()
        })
    }
}

/// A generator a set can hold: one rule, or a nested set.
#[derive(Debug, Clone)]
pub enum Rule {
    Single(Recurrence),
    Set(Box<RecurrenceSet>),
}

impl Recur for Rule {
    fn iterate(&self, filter: &mut dyn Filter) {
        match self {
            Self::Single(rule) => rule.iterate(filter),
            Self::Set(set) => set.iterate(filter),
        }
    }

    fn canonical_text(&self) -> String {
        match self {
            Self::Single(rule) => rule.canonical_text(),
            Self::Set(set) => set.canonical_text(),
        }
    }

    fn declared_zone(&self) -> Option<chrono_tz::Tz> {
        match self {
            Self::Single(rule) => rule.declared_zone(),
            Self::Set(set) => set.declared_zone(),
        }
    }

    fn evaluate(&self, query: Query) -> Vec<DateTime<Utc>> {
        match self {
            Self::Single(rule) => rule.evaluate(query),
            Self::Set(set) => set.evaluate(query),
        }
    }
}

/// Conversion into a [`Rule`], checked at the mutator call site.
pub trait IntoRule {
    /// ## Errors
    /// Returns `RfcError::TypeKind` if the value is not a usable rule handle.
    fn into_rule(self) -> RfcResult<Rule>;
}

impl IntoRule for Rule {
    fn into_rule(self) -> RfcResult<Rule> {
        Ok(self)
    }
}

impl IntoRule for Recurrence {
    fn into_rule(self) -> RfcResult<Rule> {
        Ok(Rule::Single(self))
    }
}

impl IntoRule for RecurrenceSet {
    fn into_rule(self) -> RfcResult<Rule> {
        Ok(Rule::Set(Box::new(self)))
    }
}

impl IntoRule for RRuleSet {
    fn into_rule(self) -> RfcResult<Rule> {
        Recurrence::try_from(self).map(Rule::Single)
    }
}
