//! The iteration protocol shared by single rules and sets.

use chrono::{DateTime, Utc};

use crate::rfc::ical::expand::sort_ascending;

/// What a caller asks a generator for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    /// Every occurrence.
    All,
    /// Occurrences inside `after..before`.
    Between {
        after: DateTime<Utc>,
        before: DateTime<Utc>,
        inclusive: bool,
    },
    /// The first occurrence following `after`.
    After { after: DateTime<Utc>, inclusive: bool },
    /// The last occurrence preceding `before`.
    Before {
        before: DateTime<Utc>,
        inclusive: bool,
    },
}

/// Verdict of a filter on one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The candidate was recorded; keep going.
    Accept,
    /// The candidate was dropped; keep going.
    Reject,
    /// The generator must stop. The candidate may or may not have been recorded.
    Stop,
}

impl Decision {
    #[must_use]
    pub const fn should_continue(self) -> bool {
        !matches!(self, Self::Stop)
    }
}

/// A stage in the accept chain a generator feeds its candidates into.
pub trait Filter {
    /// The query being answered.
    fn query(&self) -> &Query;

    /// Judges one candidate.
    fn decide(&mut self, candidate: DateTime<Utc>) -> Decision;
}

type Visitor<'v> = dyn FnMut(&DateTime<Utc>, usize) -> bool + 'v;

/// ## Summary
/// The base stage of every accept chain.
///
/// Applies the query's bounds and owns the result accumulator. Candidates
/// are recorded in arrival order; [`Iteration::finish`] sorts them.
pub struct Iteration<'v> {
    query: Query,
    results: Vec<DateTime<Utc>>,
    visitor: Option<&'v mut Visitor<'v>>,
}

impl<'v> Iteration<'v> {
    #[must_use]
    pub fn new(query: Query) -> Self {
        Self {
            query,
            results: Vec::new(),
            visitor: None,
        }
    }

    /// ## Summary
    /// Creates an iteration whose recording step is gated by `visitor`.
    ///
    /// The visitor sees each in-bounds candidate together with the number of
    /// occurrences recorded so far. Returning `false` drops the candidate and
    /// stops the current generator.
    #[must_use]
    pub fn with_visitor(query: Query, visitor: &'v mut Visitor<'v>) -> Self {
        Self {
            query,
            results: Vec::new(),
            visitor: Some(visitor),
        }
    }

    /// Occurrences recorded so far, in arrival order.
    #[must_use]
    pub fn results(&self) -> &[DateTime<Utc>] {
        &self.results
    }

    /// Consumes the iteration and returns its occurrences in ascending order.
    #[must_use]
    pub fn finish(self) -> Vec<DateTime<Utc>> {
        let mut results = self.results;
        sort_ascending(&mut results);
        results
    }

    fn record(&mut self, candidate: DateTime<Utc>) -> Decision {
        if let Some(visitor) = self.visitor.as_mut()
            && !visitor(&candidate, self.results.len())
        {
            return Decision::Stop;
        }
        self.results.push(candidate);
        Decision::Accept
    }
}

fn too_early(candidate: DateTime<Utc>, after: DateTime<Utc>, inclusive: bool) -> bool {
    if inclusive {
        candidate < after
    } else {
        candidate <= after
    }
}

fn too_late(candidate: DateTime<Utc>, before: DateTime<Utc>, inclusive: bool) -> bool {
    if inclusive {
        candidate > before
    } else {
        candidate >= before
    }
}

impl Filter for Iteration<'_> {
    fn query(&self) -> &Query {
        &self.query
    }

    fn decide(&mut self, candidate: DateTime<Utc>) -> Decision {
        match self.query {
            Query::All => self.record(candidate),
            Query::Between {
                after,
                before,
                inclusive,
            } => {
                if too_early(candidate, after, inclusive) {
                    Decision::Reject
                } else if too_late(candidate, before, inclusive) {
                    Decision::Stop
                } else {
                    self.record(candidate)
                }
            }
            Query::Before { before, inclusive } => {
                if too_late(candidate, before, inclusive) {
                    Decision::Stop
                } else {
                    self.record(candidate)
                }
            }
            Query::After { after, inclusive } => {
                if too_early(candidate, after, inclusive) {
                    Decision::Reject
                } else {
                    // First qualifying candidate of an ascending generator
                    self.record(candidate);
                    Decision::Stop
                }
            }
        }
    }
}
