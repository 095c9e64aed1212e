//! Set-stats command - caller-set intersection statistics.
//!
//! Reads VCF files produced by GATK `CombineVariants` and counts how many
//! variants each combination of callers reported. Several files are
//! aggregated into one table.

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::cli::OutputFormat;
use crate::core::effect::Severity;
use crate::parsing::read_vcf;
use crate::stats::aggregate::{AggregateConfig, Aggregator, Counters, SetStats};
use crate::stats::inference::infer;
use crate::stats::report::{build_rows, write_json, write_text, write_tsv, SortBy};

#[derive(Args)]
pub struct SetStatsArgs {
    /// VCF file(s); plain, .gz, .bz2 or .zip. Use '-' for stdin
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Only consider variants with a QUAL value equal or greater than this value
    #[arg(long, value_name = "NUMBER", default_value = "0")]
    pub qual: f64,

    /// Only consider variants with this SnpEff effect annotation
    #[arg(long, value_name = "TYPE", value_enum, ignore_case = true)]
    pub snpeff_type: Option<Severity>,

    /// Add zero-count rows for every combination of the observed single callers
    #[arg(long)]
    pub infer: bool,

    /// Sort rows by caller set instead of by number of variants
    #[arg(long)]
    pub sort_by_name: bool,

    /// Skip variants with an unparsable QUAL instead of stopping
    #[arg(long)]
    pub lenient: bool,

    /// Output format
    #[arg(short, long, default_value = "tsv")]
    pub format: OutputFormat,
}

/// Execute the set-stats command
///
/// # Errors
///
/// Returns an error if an input cannot be opened, a record is malformed, or
/// a considered variant has no `set=` annotation.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SetStatsArgs) -> anyhow::Result<()> {
    let config = AggregateConfig {
        min_qual: args.qual,
        effect: args.snpeff_type,
        lenient: args.lenient,
    };

    let aggregator = Aggregator::new(config);
    let mut stats = SetStats::default();
    for path in &args.files {
        let lines = read_vcf(path)
            .with_context(|| format!("Could not load file \"{}\"", path.display()))?;
        aggregator
            .aggregate_into(&mut stats, lines)
            .with_context(|| format!("Failed to read \"{}\"", path.display()))?;
    }
    log_counters(&stats.counters);

    let inference = args.infer.then(|| infer(&mut stats.tally));

    let sort_by = if args.sort_by_name {
        SortBy::Name
    } else {
        SortBy::Count
    };
    let rows = build_rows(&stats, sort_by);

    let mut out = BufWriter::new(io::stdout().lock());
    match args.format {
        OutputFormat::Tsv => write_tsv(&mut out, &rows)?,
        OutputFormat::Text => write_text(&mut out, &stats.counters, inference.as_ref(), &rows)?,
        OutputFormat::Json => write_json(&mut out, &stats.counters, inference.as_ref(), &rows)?,
    }

    Ok(())
}

fn log_counters(counters: &Counters) {
    info!("Variants in file: {}", counters.variants);
    info!(
        "Number of variants dropped due to QUAL: {}",
        counters.dropped_quality
    );
    info!(
        "Number of variants dropped due to EFF: {}",
        counters.dropped_effect
    );
    if counters.skipped_malformed > 0 {
        warn!(
            "Number of variants skipped due to malformed QUAL: {}",
            counters.skipped_malformed
        );
    }
    info!(
        "Variants considered: {} ({} with an ID)",
        counters.considered, counters.annotated
    );
}
