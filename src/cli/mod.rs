//! Command-line interface for mplx-qc.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **check**: Reconcile every alignment of a worklist against its merge definition
//! - **dump-rgs**: Print the barcode and sample of every `@RG` header line
//! - **dump-merge**: Print the sequencing events of a list of merge definitions
//!
//! ## Usage
//!
//! ```text
//! # Check a worklist; one line per faulting row, exit code is the worst fault
//! mplx-qc check worklist.tsv
//!
//! # Read headers in-process instead of through samtools
//! mplx-qc check worklist.xlsx --header-reader native
//!
//! # Show what each fault is about
//! mplx-qc -v check worklist.tsv --details
//!
//! # Barcodes and samples of an alignment header
//! samtools view -H sample.cram | mplx-qc dump-rgs
//!
//! # Barcodes of many merges, with their references
//! find . -name event.json | mplx-qc dump-merge -r
//! ```

use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

pub mod check;
pub mod dump_merge;
pub mod dump_rgs;

#[derive(Parser)]
#[command(name = "mplx-qc")]
#[command(version)]
#[command(about = "Check read-groups of merged alignments against their merge definitions")]
#[command(
    long_about = "mplx-qc checks that each merged alignment of a worklist carries exactly the read-groups its merge definition JSON describes.\n\nEach faulting row is printed as:\n  <code>\\t<merge_id>\\t<alignment_path>\\t<json_path>\n\nThe exit code is the highest code seen:\n  0 ok, 2 barcode mismatch, 3 duplicate barcode in merge,\n  4 duplicate barcode in alignment, 5 alignment/merge sample mismatch,\n  6 wrong sample, 7 inconsistent samples,\n  9 missing PU, 10 missing SM, 12 bad JSON, 13 unreadable alignment,\n  14 missing JSON, 15 missing alignment, 17-20 bad worklist,\n  21 JSON missing a required key, 1 internal error\n\nThe four columns never name the offending values. Duplicate barcodes (3, 4) and other differences are named in the error log, and in an extra column with `check --details` (e.g. duplicates=AAAA)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check every row of a worklist
    ///
    /// Each faulting row prints code, merge id, alignment and JSON path. The
    /// barcodes behind a duplicate (3, 4) or a mismatch (2) are only logged,
    /// unless --details appends them as a fifth column, e.g. duplicates=AAAA.
    Check(check::CheckArgs),

    /// Print barcode and sample of each @RG header line
    DumpRgs(dump_rgs::DumpRgsArgs),

    /// Print the sequencing events of merge definition files
    DumpMerge(dump_merge::DumpMergeArgs),
}

/// Open a file, or stdin for `-`, as a buffered reader.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn open_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    if is_stdin(path) {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(std::fs::File::open(path)?)))
    }
}

/// Read all of stdin as text.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or is not UTF-8.
pub fn read_stdin() -> io::Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Row format of the dump commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Tab-delimited columns
    #[default]
    Tsv,
    /// One JSON object per line
    Json,
}

#[must_use]
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["mplx-qc", "-vv", "check", "w.tsv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = Cli::try_parse_from(["mplx-qc", "dump-rgs"]).unwrap();
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_check_help_explains_details() {
        let mut cli = Cli::command();
        let help = cli
            .find_subcommand_mut("check")
            .unwrap()
            .render_long_help()
            .to_string();
        assert!(help.contains("--details"));
        assert!(help.contains("duplicates=AAAA"));
        assert!(help.contains("only logged"));
    }

    #[test]
    fn test_is_stdin() {
        assert!(is_stdin(Path::new("-")));
        assert!(!is_stdin(Path::new("./-x")));
    }
}
