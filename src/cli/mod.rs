//! Command-line interface for vcf-callset.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **set-stats**: Tabulate the caller sets of GATK `CombineVariants` output
//! - **filter**: Hard-filter variants on QD/FS/DP/MQ/rank-sum annotations
//! - **compile**: Table of unique variants across files with per-file QD or QUAL
//!
//! ## Usage
//!
//! ```text
//! # Caller-set statistics, filling in unobserved combinations
//! vcf-callset set-stats combined.vcf.gz --infer
//!
//! # Only high-impact variants with QUAL >= 30
//! vcf-callset set-stats combined.vcf.gz --qual 30 --snpeff-type HIGH
//!
//! # GATK hard filters, failing records kept aside
//! vcf-callset filter calls.vcf.gz --failed failed.vcf.gz > passed.vcf
//!
//! # QD per caller for every variant
//! vcf-callset compile gatk.vcf.gz varscan.vcf.gz --snpeff
//! ```

use std::path::Path;

use clap::{Parser, Subcommand};

pub mod compile;
pub mod filter;
pub mod setstats;

#[derive(Parser)]
#[command(name = "vcf-callset")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Filter VCF files and tabulate caller-set intersections")]
#[command(
    long_about = "vcf-callset works on VCF files produced by variant callers.\n\nIt can:\n- Count which combination of callers reported each variant (GATK CombineVariants set= annotation)\n- Apply hard filters on INFO annotations such as QD, FS, DP and MQ\n- Compile a table of unique variants across several files\n\nStatus messages and summaries go to standard error; tables and VCF output go to standard out."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only report warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile statistics of caller intersections
    SetStats(setstats::SetStatsArgs),

    /// Filter variants on INFO annotation values
    Filter(filter::FilterArgs),

    /// Compile a table of unique variants across files
    Compile(compile::CompileArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Display name of an input: its file name, or `stdin`
pub fn input_name(path: &Path) -> String {
    if crate::parsing::input::is_stdin(path) {
        return "stdin".to_string();
    }
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().to_string(),
    )
}
