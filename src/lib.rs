//! # vcf-callset
//!
//! A library for summarizing and filtering VCF files produced by one or more
//! variant callers.
//!
//! When several callers are merged with GATK `CombineVariants`, every record
//! carries a `set=` INFO annotation naming the callers that reported it (for
//! example `set=gatk-varscan`, or `set=Intersection` when all of them did).
//! `vcf-callset` counts how many variants each caller combination produced,
//! optionally restricted by QUAL or SnpEff impact, and can fill in the
//! combinations that were never observed.
//!
//! ## Features
//!
//! - **Caller-set statistics**: Variant and ID-annotated counts per caller combination
//! - **Inference**: Zero-count rows for every unobserved subset of the single callers
//! - **Hard filtering**: GATK-style thresholds on QD, FS, DP, MQ and rank sums
//! - **Compilation**: One table of unique variants with per-file QD or QUAL
//! - **Compressed input**: gzip, bzip2 and zip are detected from the file name
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vcf_callset::{infer, read_vcf, AggregateConfig, Aggregator, Severity};
//!
//! let config = AggregateConfig {
//!     min_qual: 30.0,
//!     effect: Some(Severity::High),
//!     ..AggregateConfig::default()
//! };
//! let lines = read_vcf(Path::new("combined.vcf.gz")).unwrap();
//! let mut stats = Aggregator::new(config).aggregate(lines).unwrap();
//! infer(&mut stats.tally);
//!
//! for (key, count) in stats.tally.iter() {
//!     println!("{key}\t{}", count.occurrences);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Records, INFO fields, SnpEff effects and caller-set keys
//! - [`parsing`]: Plain and compressed VCF input
//! - [`stats`]: Caller-set aggregation, inference and reporting
//! - [`filter`]: Threshold filtering on INFO values
//! - [`compile`]: Cross-file variant table
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod compile;
pub mod core;
pub mod filter;
pub mod parsing;
pub mod stats;

// Re-export commonly used types for convenience
pub use core::callerset::CallerSetKey;
pub use core::effect::Severity;
pub use core::record::Record;
pub use parsing::read_vcf;
pub use stats::aggregate::{AggregateConfig, Aggregator, SetStats};
pub use stats::inference::{infer, Inference};
pub use stats::tally::{CallerSetTally, SetCount};
