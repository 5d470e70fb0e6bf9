use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use itertools::Itertools;
use serde::Serialize;
use tracing::{error, warn};

use crate::cli::{open_input, OutputFormat};
use crate::core::merge::MergeDefinition;
use crate::core::types::ErrorCode;
use crate::parsing::merge_json::parse_merge_file;

#[derive(Args)]
pub struct DumpMergeArgs {
    /// File listing merge definition JSON paths, one per line; '-' for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Append the merge reference to each row
    #[arg(short = 'r', long)]
    pub add_references: bool,

    /// Append the JSON path to each row
    #[arg(short = 'j', long)]
    pub add_json_path: bool,

    /// Row format; `json` writes one whole merge definition per line
    #[arg(long, value_enum, default_value = "tsv")]
    pub format: OutputFormat,
}

/// A merge definition as written by `--format json`
#[derive(Serialize)]
struct MergeLine<'a> {
    json_path: &'a str,
    #[serde(flatten)]
    merge: &'a MergeDefinition,
}

/// Execute dump-merge subcommand
///
/// Prints `barcode<TAB>sample<TAB>merge_id` per sequencing event. Merge
/// definitions that fail to parse are logged and skipped; the result is the
/// worst of their codes.
///
/// # Errors
///
/// Returns an error if the path list cannot be read or the output written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DumpMergeArgs) -> anyhow::Result<ErrorCode> {
    let input = open_input(&args.input)?;
    let summary = dump_merges(input, &args, io::stdout().lock())?;

    if summary.references.len() > 1 && !args.add_references {
        warn!(
            "Multiple references: {}",
            summary.references.iter().join(" ")
        );
    }
    Ok(summary.code)
}

/// What a dump saw besides the rows it wrote
#[derive(Debug, Default)]
pub struct DumpSummary {
    pub code: ErrorCode,
    pub references: BTreeSet<String>,
}

/// Write one row per sequencing event of every listed merge definition.
///
/// # Errors
///
/// Returns an error if the path list cannot be read or the output written.
pub fn dump_merges<R: BufRead, W: Write>(
    input: R,
    args: &DumpMergeArgs,
    mut out: W,
) -> io::Result<DumpSummary> {
    let mut summary = DumpSummary::default();
    for line in input.lines() {
        let line = line?;
        let path = line.trim_end_matches('\r');
        if path.trim().is_empty() {
            continue;
        }

        let merge = match parse_merge_file(Path::new(path)) {
            Ok(merge) => merge,
            Err(e) => {
                error!("{path}: {e}");
                summary.code = summary.code.max(e.code());
                continue;
            }
        };
        match args.format {
            OutputFormat::Tsv => write_events(&mut out, &merge, path, args)?,
            OutputFormat::Json => {
                let line = MergeLine {
                    json_path: path,
                    merge: &merge,
                };
                serde_json::to_writer(&mut out, &line)?;
                writeln!(out)?;
            }
        }
        summary.references.insert(merge.reference);
    }
    out.flush()?;
    Ok(summary)
}

fn write_events<W: Write>(
    out: &mut W,
    merge: &MergeDefinition,
    json_path: &str,
    args: &DumpMergeArgs,
) -> io::Result<()> {
    for event in &merge.sequencing_events {
        write!(out, "{}\t{}\t{}", event.barcode, event.sample_name, merge.merge_id)?;
        if args.add_references {
            write!(out, "\t{}", merge.reference)?;
        }
        if args.add_json_path {
            write!(out, "\t{json_path}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn args(add_references: bool, add_json_path: bool) -> DumpMergeArgs {
        DumpMergeArgs {
            input: PathBuf::from("-"),
            add_references,
            add_json_path,
            format: OutputFormat::Tsv,
        }
    }

    fn write_legacy(dir: &Path, name: &str, reference: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(
            &path,
            format!(
                r#"{{"eventId": "L1", "libName": "lib", "seNum": 2, "seqEvents": {{
                    "AAAA": {{"eventId": "AAAA", "sampleName": "NWD1", "reference": "{reference}"}},
                    "CCCC": {{"eventId": "CCCC", "sampleName": "NWD1", "reference": "{reference}"}}
                }}}}"#
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_dump_rows() {
        let dir = TempDir::new().unwrap();
        let json = write_legacy(dir.path(), "L1.json", "hg38");
        let input = format!("{}\n\n", json.display());

        let mut out = Vec::new();
        let summary = dump_merges(input.as_bytes(), &args(false, false), &mut out).unwrap();
        assert_eq!(summary.code, ErrorCode::Ok);
        assert_eq!(String::from_utf8(out).unwrap(), "AAAA\tNWD1\tL1\nCCCC\tNWD1\tL1\n");
    }

    #[test]
    fn test_dump_optional_columns() {
        let dir = TempDir::new().unwrap();
        let json = write_legacy(dir.path(), "L1.json", "hg38");
        let input = format!("{}\n", json.display());

        let mut out = Vec::new();
        dump_merges(input.as_bytes(), &args(true, true), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let first = text.lines().next().unwrap();
        assert_eq!(first, format!("AAAA\tNWD1\tL1\thg38\t{}", json.display()));
    }

    #[test]
    fn test_dump_collects_references_and_skips_bad_files() {
        let dir = TempDir::new().unwrap();
        let a = write_legacy(dir.path(), "a.json", "hg19");
        let b = write_legacy(dir.path(), "b.json", "hg38");
        let missing = dir.path().join("missing.json");
        let input = format!("{}\n{}\n{}\n", a.display(), missing.display(), b.display());

        let mut out = Vec::new();
        let summary = dump_merges(input.as_bytes(), &args(false, false), &mut out).unwrap();
        assert_eq!(summary.code, ErrorCode::MergeJsonMissing);
        assert_eq!(
            summary.references.into_iter().collect::<Vec<_>>(),
            vec!["hg19".to_string(), "hg38".to_string()]
        );
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 4);
    }

    #[test]
    fn test_dump_json_lines() {
        let dir = TempDir::new().unwrap();
        let json = write_legacy(dir.path(), "L1.json", "hg38");
        let input = format!("{}\n", json.display());
        let dump_args = DumpMergeArgs {
            format: OutputFormat::Json,
            ..args(false, false)
        };

        let mut out = Vec::new();
        dump_merges(input.as_bytes(), &dump_args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["merge_id"], "L1");
        assert_eq!(value["generation"], "legacy");
        assert_eq!(value["reference"], "hg38");
        assert_eq!(value["json_path"], json.display().to_string());
        assert_eq!(value["sequencing_events"][1]["barcode"], "CCCC");
    }
}
