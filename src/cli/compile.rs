//! Compile command - table of unique variants across files.

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{input_name, OutputFormat};
use crate::compile::{CompileConfig, CompileError, Compiler, ValueSource, MIN_FILES};
use crate::parsing::read_vcf;

#[derive(Args)]
pub struct CompileArgs {
    /// VCF files (at least two); plain, .gz, .bz2 or .zip
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Add a GENES column from SnpEff annotations (GENE:SEVERITY)
    #[arg(long)]
    pub snpeff: bool,

    /// Report QUAL instead of QD
    #[arg(long)]
    pub qual: bool,

    /// Output format (text is the same table as tsv)
    #[arg(short, long, default_value = "tsv")]
    pub format: OutputFormat,
}

/// Execute the compile command
///
/// # Errors
///
/// Returns an error if fewer than two files are given, an input cannot be
/// opened, or a record lacks the requested value.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CompileArgs) -> anyhow::Result<()> {
    if args.files.len() < MIN_FILES {
        return Err(CompileError::TooFewFiles(args.files.len()).into());
    }

    let config = CompileConfig {
        value: if args.qual {
            ValueSource::Qual
        } else {
            ValueSource::Qd
        },
        snpeff: args.snpeff,
    };
    let mut compiler = Compiler::new(config);

    for path in &args.files {
        let name = input_name(path);
        let lines = read_vcf(path)
            .with_context(|| format!("Could not load file \"{}\"", path.display()))?;
        let count = compiler
            .add_file(&name, lines)
            .with_context(|| format!("Failed to read \"{}\"", path.display()))?;
        info!("{name}: {count} variants");
    }

    let table = compiler.finish();
    let mut out = BufWriter::new(io::stdout().lock());
    match args.format {
        OutputFormat::Json => table.write_json(&mut out)?,
        OutputFormat::Tsv | OutputFormat::Text => table.write_tsv(&mut out)?,
    }

    Ok(())
}
