use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vcf_callset::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flags
    let filter = if cli.verbose {
        EnvFilter::new("vcf_callset=debug,info")
    } else if cli.quiet {
        EnvFilter::new("vcf_callset=warn")
    } else {
        EnvFilter::new("vcf_callset=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        cli::Commands::SetStats(args) => cli::setstats::run(args),
        cli::Commands::Filter(args) => cli::filter::run(args),
        cli::Commands::Compile(args) => cli::compile::run(args),
    };

    // A closed downstream pipe (e.g. `| head`) is not an error
    match result {
        Err(e) if is_broken_pipe(&e) => Ok(()),
        other => other,
    }
}

fn is_broken_pipe(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    })
}
