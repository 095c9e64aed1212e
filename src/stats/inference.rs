//! Inference of unobserved caller combinations.
//!
//! Given the callers that were seen on their own ("single callers"), every
//! non-empty subset of them is a caller set that could have occurred. Sets
//! that never occurred are added to the tally with zero counts so the report
//! lists the whole universe.
//!
//! For n single callers the universe has 2^n - 1 members. The n-of-n member
//! is always represented by [`CallerSetKey::FullIntersection`]: an explicit
//! key naming all n callers is folded into it.
//!
//! Known limitation: with no single-caller records (e.g. every variant
//! required at least two callers) there is nothing to anchor the universe on
//! and inference is skipped.

use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::callerset::{CallerSetKey, INTERSECTION_LABEL};
use crate::stats::tally::{CallerSetTally, SetCount};

/// Largest number of single callers for which the power set is enumerated
pub const MAX_INFERRED_CALLERS: usize = 20;

/// Why inference did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No caller set with exactly one caller was observed
    NoSingleCallers,
    /// Too many single callers to enumerate every combination
    TooManyCallers { callers: usize },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSingleCallers => write!(f, "no single-caller sets were observed"),
            Self::TooManyCallers { callers } => write!(
                f,
                "{callers} single callers exceeds the maximum of {MAX_INFERRED_CALLERS}"
            ),
        }
    }
}

/// Diagnostics of a completed inference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferenceSummary {
    /// Sorted single-caller names the universe was built from
    pub single_callers: Vec<String>,
    /// Size of the universe, 2^n - 1
    pub expected: usize,
    /// Universe members absent from the tally before inference
    pub missing: usize,
    /// Counts moved from the explicit n-of-n key onto the full intersection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folded: Option<SetCount>,
}

/// Outcome of [`infer`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Inference {
    Skipped { reason: SkipReason },
    Completed(InferenceSummary),
}

/// Sorted names of every explicit single-caller key in the tally
///
/// The reserved `Intersection` literal is never a caller name.
pub fn single_callers(tally: &CallerSetTally) -> Vec<String> {
    tally
        .keys()
        .filter_map(CallerSetKey::single_caller)
        .filter(|name| *name != INTERSECTION_LABEL)
        .map(str::to_string)
        .sorted()
        .collect()
}

/// Fill the tally with every combination of the observed single callers.
///
/// Combinations are visited by size, then in lexicographic order of the
/// sorted single callers. Running this twice leaves the tally unchanged the
/// second time.
pub fn infer(tally: &mut CallerSetTally) -> Inference {
    let singles = single_callers(tally);
    let n = singles.len();

    if n == 0 {
        let reason = SkipReason::NoSingleCallers;
        warn!("Cannot infer caller combinations: {reason}");
        return Inference::Skipped { reason };
    }
    if n > MAX_INFERRED_CALLERS {
        let reason = SkipReason::TooManyCallers { callers: n };
        warn!("Cannot infer caller combinations: {reason}");
        return Inference::Skipped { reason };
    }

    let expected = (1usize << n) - 1;
    info!(
        "Inferring caller combinations from {n} single callers ({}): {expected} combinations expected",
        singles.join(", ")
    );

    let mut missing = 0;
    let mut folded = None;
    for size in 1..=n {
        for combination in singles.iter().combinations(size) {
            let key = CallerSetKey::from_names(combination);
            if size == n && n > 1 {
                if let Some(moved) = tally.fold_into(&key, CallerSetKey::FullIntersection) {
                    debug!(
                        "Folded {} variants of {key} into {}",
                        moved.occurrences,
                        CallerSetKey::FullIntersection
                    );
                    folded = Some(moved);
                } else if tally.ensure(CallerSetKey::FullIntersection) {
                    missing += 1;
                }
            } else if tally.ensure(key) {
                missing += 1;
            }
        }
    }

    info!("{missing} of {expected} caller combinations were not observed and were added with zero counts");

    Inference::Completed(InferenceSummary {
        single_callers: singles,
        expected,
        missing,
        folded,
    })
}
