//! Filter command - GATK-style hard filters.
//!
//! Headers and passing records go to standard out. With `--failed`, headers
//! and failing records are written to a second file whose compression is
//! chosen from its extension.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::filter::{FilterEngine, HardFilters};
use crate::parsing::input::{create_output, OutputWriter};
use crate::parsing::read_vcf;

#[derive(Args)]
pub struct FilterArgs {
    /// VCF file; plain, .gz, .bz2 or .zip. Use '-' for stdin
    pub input: PathBuf,

    /// Minimum QD (exclusive)
    #[arg(long = "QD", value_name = "NUMBER", default_value = "2")]
    pub qd: f64,

    /// Maximum FS (exclusive)
    #[arg(long = "FS", value_name = "NUMBER", default_value = "30")]
    pub fs: f64,

    /// Minimum DP (exclusive)
    #[arg(long = "DP", value_name = "NUMBER", default_value = "10")]
    pub dp: f64,

    /// Minimum MQ (exclusive)
    #[arg(long = "MQ", value_name = "NUMBER", default_value = "40")]
    pub mq: f64,

    /// Minimum MQRankSum (exclusive)
    #[arg(
        long = "MQRankSum",
        value_name = "NUMBER",
        default_value = "-12.5",
        allow_negative_numbers = true
    )]
    pub mq_rank_sum: f64,

    /// Minimum ReadPosRankSum (exclusive)
    #[arg(
        long = "ReadPosRankSum",
        value_name = "NUMBER",
        default_value = "-8",
        allow_negative_numbers = true
    )]
    pub read_pos_rank_sum: f64,

    /// Warn instead of stopping when an annotation is missing or not numeric;
    /// such variants fail
    #[arg(long)]
    pub warn: bool,

    /// Write failing variants to this file (.gz and .bz2 are compressed)
    #[arg(long, value_name = "PATH")]
    pub failed: Option<PathBuf>,
}

impl FilterArgs {
    fn hard_filters(&self) -> HardFilters {
        HardFilters {
            qd: self.qd,
            dp: self.dp,
            fs: self.fs,
            mq: self.mq,
            read_pos_rank_sum: self.read_pos_rank_sum,
            mq_rank_sum: self.mq_rank_sum,
        }
    }
}

/// Execute the filter command
///
/// # Errors
///
/// Returns an error if the input or failed output cannot be opened, or if a
/// variant lacks a filtered annotation and `--warn` is not set.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FilterArgs) -> anyhow::Result<()> {
    let engine = FilterEngine::new(args.hard_filters().thresholds(), args.warn);

    let lines = read_vcf(&args.input)
        .with_context(|| format!("Could not load file \"{}\"", args.input.display()))?;

    let mut failed: Option<OutputWriter> = match &args.failed {
        Some(path) => Some(
            create_output(path)
                .with_context(|| format!("Could not create \"{}\"", path.display()))?,
        ),
        None => None,
    };

    let mut passed = BufWriter::new(io::stdout().lock());
    let summary = engine.run(
        lines,
        &mut passed,
        failed.as_mut().map(|out| out as &mut dyn Write),
    )?;
    if let (Some(out), Some(path)) = (failed, &args.failed) {
        out.finish()
            .with_context(|| format!("Could not finish \"{}\"", path.display()))?;
    }

    info!("Variants in file: {}", summary.variants);
    info!("Variants passed all filters: {}", summary.passed);
    info!("Variants failed at least one filter: {}", summary.failed);
    if summary.unusable > 0 {
        info!(
            "  Of those, at least one filter value could not be read for: {}",
            summary.unusable
        );
    }

    Ok(())
}
