use std::io;
use std::path::PathBuf;

use clap::Args;
use tracing::error;

use crate::batch::{run_batch, BatchError, HeaderReaderKind, QcConfig};
use crate::core::types::ErrorCode;
use crate::parsing::sam::DEFAULT_SAMTOOLS;

#[derive(Args)]
pub struct CheckArgs {
    /// Worklist (.tsv or .xlsx) with columns sample_id_nwd_id, merge_id,
    /// json_path and cram_path
    #[arg(required = true)]
    pub worklist: PathBuf,

    /// Program used to dump alignment headers
    #[arg(long, env = "MPLX_QC_SAMTOOLS", default_value = DEFAULT_SAMTOOLS)]
    pub samtools: PathBuf,

    /// How alignment headers are read
    #[arg(long, value_enum, default_value = "samtools")]
    pub header_reader: HeaderReaderKind,

    /// Append a column describing each fault, such as the duplicated
    /// barcodes (duplicates=AAAA); without it they are only logged
    #[arg(long)]
    pub details: bool,
}

impl From<CheckArgs> for QcConfig {
    fn from(args: CheckArgs) -> Self {
        Self {
            header_reader: args.header_reader,
            samtools: args.samtools,
            details: args.details,
        }
    }
}

/// Execute check subcommand
///
/// A worklist that cannot be loaded is classified rather than returned as an
/// error.
///
/// # Errors
///
/// Returns an error if the report cannot be written.
pub fn run(args: CheckArgs) -> anyhow::Result<ErrorCode> {
    let worklist = args.worklist.clone();
    let config = QcConfig::from(args);

    match run_batch(&worklist, &config, io::stdout().lock()) {
        Ok(code) => Ok(code),
        Err(e @ (BatchError::Output(_) | BatchError::Io(_))) => Err(e.into()),
        Err(e) => {
            error!("{e}");
            Ok(e.code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_check_defaults() {
        let cli = Cli::try_parse_from(["mplx-qc", "check", "w.tsv"]).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.header_reader, HeaderReaderKind::Samtools);
        assert!(!args.details);

        let config = QcConfig::from(args);
        assert_eq!(config.header_reader, HeaderReaderKind::Samtools);
    }

    #[test]
    fn test_check_options() {
        let cli = Cli::try_parse_from([
            "mplx-qc",
            "check",
            "w.xlsx",
            "--header-reader",
            "native",
            "--samtools",
            "/opt/bin/samtools",
            "--details",
        ])
        .unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        let config = QcConfig::from(args);
        assert_eq!(config.header_reader, HeaderReaderKind::Native);
        assert_eq!(config.samtools, PathBuf::from("/opt/bin/samtools"));
        assert!(config.details);
    }
}
