use std::panic;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use mplx_qc::cli;
use mplx_qc::ErrorCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = match cli.verbose {
        0 => EnvFilter::new("mplx_qc=warn"),
        1 => EnvFilter::new("mplx_qc=info,warn"),
        _ => EnvFilter::new("mplx_qc=debug,info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let result = panic::catch_unwind(|| match cli.command {
        cli::Commands::Check(args) => cli::check::run(args),
        cli::Commands::DumpRgs(args) => cli::dump_rgs::run(args),
        cli::Commands::DumpMerge(args) => cli::dump_merge::run(args),
    });

    let code = match result {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            error!("{e:#}");
            ErrorCode::Internal
        }
        // The panic message has already been printed by the default hook
        Err(_) => ErrorCode::Internal,
    };
    code.into()
}
