//! Single-pass tally of caller sets.
//!
//! Each data record is classified in order:
//!
//! 1. QUAL prefilter (only when `min_qual > 0`)
//! 2. SnpEff severity prefilter (only when a severity is configured)
//! 3. considered: the `set=` label is canonicalized and counted
//!
//! Header lines are skipped without being counted. The first fatal error
//! aborts the pass and no partial result is returned.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::callerset::CallerSetKey;
use crate::core::effect::{has_effect, Severity};
use crate::core::info::parse_f64;
use crate::core::record::{Record, MISSING};
use crate::parsing::vcf::{Line, ParseError};
use crate::stats::tally::CallerSetTally;

/// INFO key holding the caller-set label
pub const SET_KEY: &str = "set";

#[derive(Error, Debug)]
pub enum StatsError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Could not extract set from line {line}:\n{record}")]
    MissingSetAnnotation { line: usize, record: String },

    #[error("Line {line}: could not convert QUAL '{value}' to a number")]
    InvalidQuality { line: usize, value: String },
}

/// Prefilter settings for an aggregation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateConfig {
    /// Minimum QUAL; `0` disables the filter
    pub min_qual: f64,
    /// Only consider variants with at least one effect of this severity
    pub effect: Option<Severity>,
    /// Skip records with an unparsable QUAL instead of failing
    pub lenient: bool,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            min_qual: 0.0,
            effect: None,
            lenient: false,
        }
    }
}

/// Record counts for one aggregation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    /// Data records seen (headers excluded)
    pub variants: u64,
    pub dropped_quality: u64,
    pub dropped_effect: u64,
    /// Records skipped for a malformed QUAL in lenient mode
    pub skipped_malformed: u64,
    /// Records that passed all prefilters and were tallied
    pub considered: u64,
    /// Considered records with a non-missing ID
    pub annotated: u64,
}

/// Result of an aggregation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetStats {
    pub tally: CallerSetTally,
    pub counters: Counters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Considered,
    DroppedQuality,
    DroppedEffect,
    Malformed,
}

/// Tallies caller sets over a stream of VCF lines
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregateConfig,
}

impl Aggregator {
    #[must_use]
    pub fn new(config: AggregateConfig) -> Self {
        Self { config }
    }

    /// Consume `lines` and tally every considered record.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Parse` for unreadable or structurally invalid
    /// lines, `StatsError::MissingSetAnnotation` if a considered record has
    /// no `set=` key, and `StatsError::InvalidQuality` for an unparsable QUAL
    /// unless the configuration is lenient.
    pub fn aggregate<I>(&self, lines: I) -> Result<SetStats, StatsError>
    where
        I: IntoIterator<Item = Result<Line, ParseError>>,
    {
        let mut stats = SetStats::default();
        self.aggregate_into(&mut stats, lines)?;
        Ok(stats)
    }

    /// Add the records of `lines` to an existing result, so several inputs
    /// can be aggregated one at a time.
    ///
    /// # Errors
    ///
    /// Same as [`Aggregator::aggregate`]. Records tallied before the error
    /// stay in `stats`.
    pub fn aggregate_into<I>(&self, stats: &mut SetStats, lines: I) -> Result<(), StatsError>
    where
        I: IntoIterator<Item = Result<Line, ParseError>>,
    {
        let SetStats { tally, counters } = stats;

        for line in lines {
            let record = match line? {
                Line::Header(_) => continue,
                Line::Record(record) => record,
            };
            counters.variants += 1;

            match self.classify(&record)? {
                Disposition::DroppedQuality => counters.dropped_quality += 1,
                Disposition::DroppedEffect => counters.dropped_effect += 1,
                Disposition::Malformed => counters.skipped_malformed += 1,
                Disposition::Considered => {
                    counters.considered += 1;
                    let key = caller_set(&record)?;
                    let annotated = record.has_id();
                    if annotated {
                        counters.annotated += 1;
                    }
                    tally.record(key, annotated);
                }
            }
        }

        debug!(
            "Tallied {} variants into {} caller sets",
            counters.considered,
            tally.len()
        );

        Ok(())
    }

    fn classify(&self, record: &Record) -> Result<Disposition, StatsError> {
        if self.config.min_qual > 0.0 {
            let qual = record.qual();
            if qual == MISSING {
                return Ok(Disposition::DroppedQuality);
            }
            match parse_f64("QUAL", qual) {
                Ok(value) if value < self.config.min_qual => {
                    return Ok(Disposition::DroppedQuality)
                }
                Ok(_) => {}
                Err(_) if self.config.lenient => {
                    warn!(
                        "Line {}: could not convert QUAL '{}' to a number, skipping variant",
                        record.line_number(),
                        qual
                    );
                    return Ok(Disposition::Malformed);
                }
                Err(_) => {
                    return Err(StatsError::InvalidQuality {
                        line: record.line_number(),
                        value: qual.to_string(),
                    })
                }
            }
        }

        if let Some(severity) = self.config.effect {
            if !has_effect(record.info(), severity) {
                return Ok(Disposition::DroppedEffect);
            }
        }

        Ok(Disposition::Considered)
    }
}

/// Canonical caller set of a record from its `set=` INFO value
///
/// # Errors
///
/// Returns `StatsError::MissingSetAnnotation` if the record has no `set=` key.
pub fn caller_set(record: &Record) -> Result<CallerSetKey, StatsError> {
    record
        .info_field()
        .get(SET_KEY)
        .map(CallerSetKey::canonicalize)
        .ok_or_else(|| StatsError::MissingSetAnnotation {
            line: record.line_number(),
            record: record.to_line(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::vcf::VcfLines;
    use crate::stats::tally::SetCount;
    use std::io::Cursor;

    fn run(text: &str, config: AggregateConfig) -> Result<SetStats, StatsError> {
        Aggregator::new(config).aggregate(VcfLines::new(Cursor::new(text.to_string())))
    }

    fn row(id: &str, qual: &str, info: &str) -> String {
        format!("chr1\t100\t{id}\tA\tT\t{qual}\tPASS\t{info}\n")
    }

    #[test]
    fn test_single_record_scenario() {
        let text = "##fileformat=VCFv4.2\nchr1\t100\t.\tA\tT\t50\t.\tset=gatk-varscan;QD=5.0\n";
        let stats = run(text, AggregateConfig::default()).unwrap();

        let key = CallerSetKey::from_names(["gatk", "varscan"]);
        let count = stats.tally.get(&key).unwrap();
        assert_eq!(count.occurrences, 1);
        assert_eq!(count.annotated, 0);
        assert_eq!(stats.tally.len(), 1);
        assert_eq!(stats.counters.variants, 1);
        assert_eq!(stats.counters.considered, 1);
        assert_eq!(stats.counters.annotated, 0);
    }

    #[test]
    fn test_quality_filter_drops_missing_qual() {
        let text = row(".", ".", "set=gatk");
        let config = AggregateConfig {
            min_qual: 30.0,
            ..AggregateConfig::default()
        };
        let stats = run(&text, config).unwrap();

        assert_eq!(stats.counters.variants, 1);
        assert_eq!(stats.counters.dropped_quality, 1);
        assert_eq!(stats.counters.considered, 0);
        assert!(stats.tally.is_empty());
    }

    #[test]
    fn test_quality_filter_threshold() {
        let text = [
            row(".", "29.9", "set=gatk"),
            row(".", "30", "set=gatk"),
            row(".", "100", "set=varscan"),
        ]
        .concat();
        let config = AggregateConfig {
            min_qual: 30.0,
            ..AggregateConfig::default()
        };
        let stats = run(&text, config).unwrap();

        assert_eq!(stats.counters.dropped_quality, 1);
        assert_eq!(stats.counters.considered, 2);
    }

    #[test]
    fn test_no_quality_filter_keeps_missing_and_unparsable_qual() {
        let text = [row(".", ".", "set=gatk"), row(".", "high", "set=gatk")].concat();
        let stats = run(&text, AggregateConfig::default()).unwrap();
        assert_eq!(stats.counters.considered, 2);
    }

    #[test]
    fn test_malformed_quality_is_fatal() {
        let text = row(".", "high", "set=gatk");
        let config = AggregateConfig {
            min_qual: 10.0,
            ..AggregateConfig::default()
        };
        let err = run(&text, config).unwrap_err();
        assert!(matches!(err, StatsError::InvalidQuality { line: 1, .. }));
    }

    #[test]
    fn test_malformed_quality_lenient() {
        let text = [row(".", "high", "set=gatk"), row(".", "40", "set=gatk")].concat();
        let config = AggregateConfig {
            min_qual: 10.0,
            lenient: true,
            ..AggregateConfig::default()
        };
        let stats = run(&text, config).unwrap();
        assert_eq!(stats.counters.skipped_malformed, 1);
        assert_eq!(stats.counters.considered, 1);
    }

    #[test]
    fn test_effect_filter() {
        let text = [
            row(".", "50", "set=gatk;ANN=T|missense_variant|MODERATE|BRCA2|x"),
            row(".", "50", "set=gatk;ANN=T|stop_gained|HIGH|TP53|x"),
            row(".", "50", "set=varscan"),
        ]
        .concat();
        let config = AggregateConfig {
            effect: Some(Severity::High),
            ..AggregateConfig::default()
        };
        let stats = run(&text, config).unwrap();

        assert_eq!(stats.counters.dropped_effect, 2);
        assert_eq!(stats.counters.considered, 1);
        assert_eq!(
            stats
                .tally
                .get(&CallerSetKey::canonicalize("gatk"))
                .unwrap()
                .occurrences,
            1
        );
    }

    #[test]
    fn test_missing_set_is_fatal() {
        let text = [row(".", "50", "set=gatk"), row(".", "50", "QD=2.0")].concat();
        let err = run(&text, AggregateConfig::default()).unwrap_err();
        match err {
            StatsError::MissingSetAnnotation { line, record } => {
                assert_eq!(line, 2);
                assert!(record.ends_with("QD=2.0"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_set_on_dropped_record_is_not_checked() {
        let text = [row(".", ".", "QD=2.0"), row(".", "50", "set=gatk")].concat();
        let config = AggregateConfig {
            min_qual: 1.0,
            ..AggregateConfig::default()
        };
        let stats = run(&text, config).unwrap();
        assert_eq!(stats.counters.dropped_quality, 1);
        assert_eq!(stats.counters.considered, 1);
    }

    #[test]
    fn test_structural_error_propagates() {
        let text = "chr1\t100\t.\tA\n";
        let err = run(text, AggregateConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            StatsError::Parse(ParseError::TooFewFields { line: 1, found: 4 })
        ));
    }

    #[test]
    fn test_aggregate_into_accumulates_inputs() {
        let aggregator = Aggregator::default();
        let first = row("rs1", "50", "set=gatk");
        let second = row(".", "50", "set=gatk") + &row(".", "50", "set=varscan");

        let mut stats = SetStats::default();
        aggregator
            .aggregate_into(&mut stats, VcfLines::new(Cursor::new(first)))
            .unwrap();
        aggregator
            .aggregate_into(&mut stats, VcfLines::new(Cursor::new(second)))
            .unwrap();

        assert_eq!(stats.counters.variants, 3);
        assert_eq!(stats.counters.considered, 3);
        assert_eq!(
            stats.tally.get(&CallerSetKey::canonicalize("gatk")),
            Some(&SetCount {
                occurrences: 2,
                annotated: 1
            })
        );
    }

    #[test]
    fn test_counts_are_consistent() {
        let labels = [
            ("rs1", "gatk"),
            (".", "varscan"),
            ("rs2", "varscan-gatk"),
            (".", "gatk-varscan"),
            ("rs3", "Intersection"),
            (".", "freebayes-gatk"),
            ("rs4", "gatk"),
        ];
        let text: String = labels
            .iter()
            .map(|(id, set)| row(id, "50", &format!("set={set}")))
            .collect();
        let stats = run(&text, AggregateConfig::default()).unwrap();

        assert_eq!(stats.tally.total_occurrences(), stats.counters.considered);
        assert_eq!(stats.tally.total_annotated(), stats.counters.annotated);
        assert_eq!(stats.counters.annotated, 4);
        for (_, count) in stats.tally.iter() {
            assert!(count.annotated <= count.occurrences);
        }
        assert_eq!(stats.tally.len(), 5);
        assert_eq!(
            stats
                .tally
                .get(&CallerSetKey::FullIntersection)
                .unwrap()
                .annotated,
            1
        );
    }
}
