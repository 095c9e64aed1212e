//! Caller-set statistics.
//!
//! Variants produced by GATK `CombineVariants` carry a `set=` INFO key naming
//! the callers that reported them. This module counts how many variants each
//! combination of callers produced:
//!
//! - [`aggregate`]: single-pass tally with QUAL and SnpEff severity prefilters
//! - [`inference`]: adds zero-count entries for unobserved caller combinations
//! - [`report`]: TSV, text and JSON rendering
//! - [`tally`]: the per-set counts
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vcf_callset::parsing::read_vcf;
//! use vcf_callset::stats::aggregate::{AggregateConfig, Aggregator};
//! use vcf_callset::stats::inference::infer;
//! use vcf_callset::stats::report::{build_rows, write_tsv, SortBy};
//!
//! let lines = read_vcf(Path::new("combined.vcf.gz")).unwrap();
//! let mut stats = Aggregator::new(AggregateConfig::default())
//!     .aggregate(lines)
//!     .unwrap();
//! infer(&mut stats.tally);
//!
//! let rows = build_rows(&stats, SortBy::Count);
//! write_tsv(&mut std::io::stdout(), &rows).unwrap();
//! ```

pub mod aggregate;
pub mod inference;
pub mod report;
pub mod tally;
