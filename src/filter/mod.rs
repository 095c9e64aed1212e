//! Hard filtering of variants on numeric INFO annotations.
//!
//! Each [`Threshold`] names an INFO key and a bound. A record passes when
//! every annotation lies strictly on the passing side of its bound. The
//! defaults are GATK's recommended hard filters for SNPs:
//!
//! | Key | Passes when |
//! |-----|-------------|
//! | QD  | > 2.0 |
//! | DP  | > 10.0 |
//! | FS  | < 30.0 |
//! | MQ  | > 40.0 |
//! | ReadPosRankSum | > -8.0 |
//! | MQRankSum | > -12.5 |
//!
//! Thresholds are evaluated in order and the first failing one ends the
//! evaluation. A missing or non-numeric annotation is an error unless the
//! engine is lenient, in which case the record fails with a warning.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::core::info::InfoError;
use crate::core::record::Record;
use crate::parsing::vcf::{Line, ParseError};

#[derive(Error, Debug)]
pub enum FilterError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not find \"{key}\" value on line {line}:\n{record}")]
    MissingAnnotation {
        key: String,
        line: usize,
        record: String,
    },

    #[error("Line {line}: {source}")]
    NotNumeric {
        line: usize,
        #[source]
        source: InfoError,
    },
}

/// Side of the bound on which a value passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Passes iff value > bound
    Above,
    /// Passes iff value < bound
    Below,
}

/// One annotation bound
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Threshold {
    pub key: String,
    pub bound: f64,
    pub direction: Direction,
}

impl Threshold {
    pub fn above(key: impl Into<String>, bound: f64) -> Self {
        Self {
            key: key.into(),
            bound,
            direction: Direction::Above,
        }
    }

    pub fn below(key: impl Into<String>, bound: f64) -> Self {
        Self {
            key: key.into(),
            bound,
            direction: Direction::Below,
        }
    }

    #[must_use]
    pub fn passes(&self, value: f64) -> bool {
        match self.direction {
            Direction::Above => value > self.bound,
            Direction::Below => value < self.bound,
        }
    }
}

/// GATK hard-filter bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HardFilters {
    pub qd: f64,
    pub dp: f64,
    pub fs: f64,
    pub mq: f64,
    pub read_pos_rank_sum: f64,
    pub mq_rank_sum: f64,
}

impl Default for HardFilters {
    fn default() -> Self {
        Self {
            qd: 2.0,
            dp: 10.0,
            fs: 30.0,
            mq: 40.0,
            read_pos_rank_sum: -8.0,
            mq_rank_sum: -12.5,
        }
    }
}

impl HardFilters {
    /// Thresholds in evaluation order
    #[must_use]
    pub fn thresholds(&self) -> Vec<Threshold> {
        vec![
            Threshold::above("QD", self.qd),
            Threshold::above("DP", self.dp),
            Threshold::below("FS", self.fs),
            Threshold::above("MQ", self.mq),
            Threshold::above("ReadPosRankSum", self.read_pos_rank_sum),
            Threshold::above("MQRankSum", self.mq_rank_sum),
        ]
    }
}

/// Outcome of evaluating one record
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    /// A value fell on the wrong side of a bound
    Fail { key: String, value: f64 },
    /// Lenient mode only: annotations that were absent or non-numeric
    Unusable { keys: Vec<String> },
}

impl Verdict {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Counts for one filtering run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub variants: u64,
    pub passed: u64,
    pub failed: u64,
    /// Failed records for which at least one annotation could not be used
    pub unusable: u64,
}

/// Evaluates records against an ordered list of thresholds
#[derive(Debug, Clone)]
pub struct FilterEngine {
    thresholds: Vec<Threshold>,
    lenient: bool,
}

impl FilterEngine {
    #[must_use]
    pub fn new(thresholds: Vec<Threshold>, lenient: bool) -> Self {
        Self {
            thresholds,
            lenient,
        }
    }

    /// Evaluate one record
    ///
    /// # Errors
    ///
    /// Returns `FilterError::MissingAnnotation` or `FilterError::NotNumeric`
    /// when an annotation is unusable and the engine is not lenient.
    pub fn evaluate(&self, record: &Record) -> Result<Verdict, FilterError> {
        let info = record.info_field();
        let mut unusable = Vec::new();

        for threshold in &self.thresholds {
            let value = match info.get_f64(&threshold.key) {
                Ok(Some(value)) => value,
                Ok(None) => {
                    if !self.lenient {
                        return Err(FilterError::MissingAnnotation {
                            key: threshold.key.clone(),
                            line: record.line_number(),
                            record: record.to_line(),
                        });
                    }
                    warn!(
                        "Could not find \"{}\" value on line {}. Removed variant.",
                        threshold.key,
                        record.line_number()
                    );
                    unusable.push(threshold.key.clone());
                    continue;
                }
                Err(source) => {
                    if !self.lenient {
                        return Err(FilterError::NotNumeric {
                            line: record.line_number(),
                            source,
                        });
                    }
                    warn!("Line {}: {source}. Removed variant.", record.line_number());
                    unusable.push(threshold.key.clone());
                    continue;
                }
            };

            if !threshold.passes(value) {
                return Ok(Verdict::Fail {
                    key: threshold.key.clone(),
                    value,
                });
            }
        }

        if unusable.is_empty() {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::Unusable { keys: unusable })
        }
    }

    /// Stream `lines`, writing headers and passing records to `passed`, and
    /// headers and failing records to `failed` when given.
    ///
    /// # Errors
    ///
    /// Returns the first parse, evaluation or write error.
    pub fn run<I, W>(
        &self,
        lines: I,
        passed: &mut W,
        mut failed: Option<&mut dyn Write>,
    ) -> Result<FilterSummary, FilterError>
    where
        I: IntoIterator<Item = Result<Line, ParseError>>,
        W: Write + ?Sized,
    {
        let mut summary = FilterSummary::default();

        for line in lines {
            match line? {
                Line::Header(header) => {
                    writeln!(passed, "{header}")?;
                    if let Some(out) = failed.as_mut() {
                        writeln!(out, "{header}")?;
                    }
                }
                Line::Record(record) => {
                    summary.variants += 1;
                    let verdict = self.evaluate(&record)?;
                    if verdict.is_pass() {
                        summary.passed += 1;
                        writeln!(passed, "{}", record.to_line())?;
                    } else {
                        summary.failed += 1;
                        if matches!(verdict, Verdict::Unusable { .. }) {
                            summary.unusable += 1;
                        }
                        if let Some(out) = failed.as_mut() {
                            writeln!(out, "{}", record.to_line())?;
                        }
                    }
                }
            }
        }

        passed.flush()?;
        if let Some(out) = failed.as_mut() {
            out.flush()?;
        }
        Ok(summary)
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(HardFilters::default().thresholds(), false)
    }
}
