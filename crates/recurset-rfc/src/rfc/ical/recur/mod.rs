//! Recurrence rules and the recurrence set combinator.
//!
//! Every generator (a single RRULE handle or a whole set) speaks the same
//! protocol: it walks its candidates in its own order and hands each one to
//! a [`Filter`], stopping when the filter answers [`Decision::Stop`]. The
//! base filter is an [`Iteration`], which owns the query and the result
//! accumulator; a set wraps it in an [`ExclusionFilter`] before feeding its
//! dates and delegating to its rules.

mod cache;
mod exclusion;
mod iteration;
mod occurrence;
mod rule;
mod set;

pub use cache::QueryCache;
pub use exclusion::{ExclusionFilter, ExclusionMode, ExclusionTable};
pub use iteration::{Decision, Filter, Iteration, Query};
pub use occurrence::IntoOccurrence;
pub use rule::{IntoRule, Recur, Recurrence, Rule};
pub use set::RecurrenceSet;
