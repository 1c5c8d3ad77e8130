//! Per-generator memoisation of query results.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::iteration::Query;

/// ## Summary
/// Query results remembered by a generator while caching is enabled.
///
/// Cloning yields an empty cache with the same setting, so a cloned
/// generator never sees results computed for the original.
#[derive(Debug, Default)]
pub struct QueryCache {
    enabled: bool,
    entries: Mutex<HashMap<Query, Vec<DateTime<Utc>>>>,
}

impl QueryCache {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// ## Summary
    /// Returns the remembered result for `query`, computing and storing it on
    /// a miss. With caching disabled this is just `compute()`.
    pub fn get_or_compute<F>(&self, query: Query, compute: F) -> Vec<DateTime<Utc>>
    where
        F: FnOnce() -> Vec<DateTime<Utc>>,
    {
        if !self.enabled {
            return compute();
        }

        if let Ok(entries) = self.entries.lock()
            && let Some(hit) = entries.get(&query)
        {
            tracing::trace!(?query, "Query cache hit");
            return hit.clone();
        }

        // Unlocked while computing
        let computed = compute();
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(query, computed.clone());
        }
        computed
    }

    /// Forgets every remembered result.
    pub fn clear(&mut self) {
        match self.entries.get_mut() {
            Ok(entries) => entries.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for QueryCache {
    fn clone(&self) -> Self {
        Self::new(self.enabled)
    }
}
