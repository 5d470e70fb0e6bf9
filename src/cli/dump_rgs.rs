use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use tracing::error;

use crate::cli::{is_stdin, read_stdin, OutputFormat};
use crate::core::types::ErrorCode;
use crate::parsing::read_group::parse_read_group_lines;
use crate::parsing::sam::{read_group_lines_from_text, HeaderReader, NativeHeaderReader};

#[derive(Args)]
pub struct DumpRgsArgs {
    /// SAM header text, or a SAM/BAM/CRAM file; '-' reads header text from stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Row format
    #[arg(long, value_enum, default_value = "tsv")]
    pub format: OutputFormat,
}

/// Execute dump-rgs subcommand
///
/// Read-groups that cannot be extracted are logged and skipped; the result
/// is the worst of their codes.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the output written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DumpRgsArgs) -> anyhow::Result<ErrorCode> {
    let lines = if is_stdin(&args.input) {
        read_group_lines_from_text(&read_stdin()?)
    } else {
        match NativeHeaderReader.read_group_lines(&args.input) {
            Ok(lines) => lines,
            Err(e) => {
                error!("{}: {e}", args.input.display());
                return Ok(e.code());
            }
        }
    };

    let code = dump_read_groups(&lines, args.format, io::stdout().lock())?;
    Ok(code)
}

/// Write `barcode<TAB>sample`, or the whole record as JSON, for each
/// read-group line.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn dump_read_groups<W: Write>(
    lines: &[String],
    format: OutputFormat,
    mut out: W,
) -> io::Result<ErrorCode> {
    let mut worst = ErrorCode::Ok;
    for result in parse_read_group_lines(lines.iter().map(String::as_str)) {
        match result {
            Ok(rg) => match format {
                OutputFormat::Tsv => writeln!(out, "{}\t{}", rg.barcode, rg.sample)?,
                OutputFormat::Json => {
                    serde_json::to_writer(&mut out, &rg)?;
                    writeln!(out)?;
                }
            },
            Err(errors) => {
                for e in errors {
                    error!("{e}");
                    worst = worst.max(e.code());
                }
            }
        }
    }
    out.flush()?;
    Ok(worst)
}
