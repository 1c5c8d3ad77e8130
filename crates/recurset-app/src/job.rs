//! JSON job files: a recurrence set description plus one query.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use recurset_core::error::{CoreError, CoreResult};
use recurset_rfc::error::RfcResult;
use recurset_rfc::rfc::ical::expand::TimeZoneResolver;
use recurset_rfc::rfc::ical::recur::{Recur, Recurrence, RecurrenceSet};
use rrule::{RRule, Unvalidated};
use serde::Deserialize;

/// One RRULE anchored at a start instant.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub dtstart: DateTime<Utc>,
    /// RRULE value, e.g. `FREQ=WEEKLY;COUNT=4;BYDAY=MO`.
    pub rrule: String,
    #[serde(default)]
    pub tzid: Option<String>,
}

impl RuleEntry {
    fn to_recurrence(&self, resolver: &mut TimeZoneResolver) -> RfcResult<Recurrence> {
        let pattern = self.rrule.parse::<RRule<Unvalidated>>()?;
        match &self.tzid {
            Some(tzid) => Recurrence::zoned(pattern, self.dtstart, resolver.resolve(tzid)?),
            None => Recurrence::new(pattern, self.dtstart),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum JobQuery {
    #[default]
    All,
    Between {
        after: DateTime<Utc>,
        before: DateTime<Utc>,
        #[serde(default)]
        inclusive: bool,
    },
    After {
        after: DateTime<Utc>,
        #[serde(default)]
        inclusive: bool,
    },
    Before {
        before: DateTime<Utc>,
        #[serde(default)]
        inclusive: bool,
    },
}

impl JobQuery {
    /// ## Summary
    /// Runs the query against `set`. An `all` query returns the earliest
    /// `limit` occurrences so that unbounded rules terminate.
    #[must_use]
    pub fn run(&self, set: &RecurrenceSet, limit: usize) -> Vec<DateTime<Utc>> {
        match *self {
            Self::All => {
                let occurrences = set.earliest(limit);
                if occurrences.len() >= limit {
                    tracing::warn!(limit, "Occurrence limit reached, output truncated");
                }
                occurrences
            }
            Self::Between {
                after,
                before,
                inclusive,
            } => set.between(after, before, inclusive),
            Self::After { after, inclusive } => set.after(after, inclusive).into_iter().collect(),
            Self::Before { before, inclusive } => {
                set.before(before, inclusive).into_iter().collect()
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Job {
    pub rules: Vec<RuleEntry>,
    pub dates: Vec<DateTime<Utc>>,
    pub exclusion_rules: Vec<RuleEntry>,
    pub exclusion_dates: Vec<DateTime<Utc>>,
    pub query: JobQuery,
}

impl Job {
    /// ## Summary
    /// Reads and validates a job file.
    ///
    /// ## Errors
    /// Returns an error if the file cannot be read, is not a valid job, or
    /// fails validation.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading job file {}", path.display()))?;
        let job: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing job file {}", path.display()))?;
        job.validate()?;
        Ok(job)
    }

    /// ## Summary
    /// Rejects jobs whose query window is inverted.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` for a `between` query with `after`
    /// later than `before`.
    pub fn validate(&self) -> CoreResult<()> {
        if let JobQuery::Between { after, before, .. } = self.query
            && after > before
        {
            return Err(CoreError::InvalidInput(format!(
                "between query starts at {after} but ends at {before}"
            )));
        }
        Ok(())
    }

    /// ## Summary
    /// Builds the recurrence set the job describes.
    ///
    /// ## Errors
    /// Returns an error if an RRULE is rejected by the rule engine or a TZID
    /// does not resolve.
    pub fn build(&self, caching: bool) -> RfcResult<RecurrenceSet> {
        let mut resolver = TimeZoneResolver::new();
        let mut set = RecurrenceSet::new(caching);

        for entry in &self.rules {
            set.add_rule(entry.to_recurrence(&mut resolver)?)?;
        }
        for date in &self.dates {
            set.add_date(*date)?;
        }
        for entry in &self.exclusion_rules {
            set.add_exclusion_rule(entry.to_recurrence(&mut resolver)?)?;
        }
        for date in &self.exclusion_dates {
            set.add_exclusion_date(*date)?;
        }

        tracing::debug!(
            rules = set.rules().len(),
            dates = set.dates().len(),
            exclusion_rules = set.exclusion_rules().len(),
            exclusion_dates = set.exclusion_dates().len(),
            "Built recurrence set"
        );
        Ok(set)
    }
}
