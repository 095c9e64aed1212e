use std::collections::HashMap;

use serde::Serialize;

use crate::core::callerset::CallerSetKey;

/// Occurrence counts for one caller set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SetCount {
    /// Variants whose `set=` label resolved to this key
    pub occurrences: u64,
    /// Subset of `occurrences` with a non-missing ID column
    pub annotated: u64,
}

impl SetCount {
    /// Percentage of this set's variants that carry an ID
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn annotated_pct(&self) -> f64 {
        if self.occurrences == 0 {
            0.0
        } else {
            self.annotated as f64 * 100.0 / self.occurrences as f64
        }
    }
}

/// Counts per canonical caller set
///
/// Entries are created on first observation or zero-initialized by
/// inference. Every mutation keeps `annotated <= occurrences`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallerSetTally {
    counts: HashMap<CallerSetKey, SetCount>,
}

impl CallerSetTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one variant for `key`
    pub fn record(&mut self, key: CallerSetKey, annotated: bool) {
        let count = self.counts.entry(key).or_default();
        count.occurrences += 1;
        if annotated {
            count.annotated += 1;
        }
    }

    /// Insert `key` with zero counts if absent. Returns true if it was inserted.
    pub fn ensure(&mut self, key: CallerSetKey) -> bool {
        if self.counts.contains_key(&key) {
            return false;
        }
        self.counts.insert(key, SetCount::default());
        true
    }

    /// Move the counts of `from` onto `to`, removing `from`
    ///
    /// Returns the moved counts, or `None` if `from` was absent.
    pub(crate) fn fold_into(&mut self, from: &CallerSetKey, to: CallerSetKey) -> Option<SetCount> {
        let moved = self.counts.remove(from)?;
        let target = self.counts.entry(to).or_default();
        target.occurrences += moved.occurrences;
        target.annotated += moved.annotated;
        Some(moved)
    }

    pub fn get(&self, key: &CallerSetKey) -> Option<&SetCount> {
        self.counts.get(key)
    }

    pub fn contains(&self, key: &CallerSetKey) -> bool {
        self.counts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CallerSetKey, &SetCount)> {
        self.counts.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &CallerSetKey> {
        self.counts.keys()
    }

    /// Sum of occurrence counts over all keys
    pub fn total_occurrences(&self) -> u64 {
        self.counts.values().map(|c| c.occurrences).sum()
    }

    /// Sum of annotated counts over all keys
    pub fn total_annotated(&self) -> u64 {
        self.counts.values().map(|c| c.annotated).sum()
    }
}
