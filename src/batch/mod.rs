//! Batch driver: check every row of a worklist.
//!
//! Rows are processed strictly in worklist order. For each row:
//!
//! 1. the alignment (15) and merge JSON (14) must both exist; if either is
//!    missing nothing is read
//! 2. the merge JSON is parsed (12, 14, 21) and the alignment header dumped
//!    (13); a failure of either ends the row
//! 3. every `@RG` line is extracted (9, 10, 13); all faults are logged
//! 4. read-groups and merge are reconciled (2 to 7)
//!
//! A faulting row writes one line, see [`report::Report`]. The batch result
//! is the maximum code over all rows. Worklist faults (17 to 20) and a
//! header-dump program that cannot be started abort the batch before or
//! during processing.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mplx_qc::batch::{run_batch, QcConfig};
//! use std::path::Path;
//!
//! let config = QcConfig::default();
//! let code = run_batch(Path::new("worklist.tsv"), &config, std::io::stdout().lock()).unwrap();
//! std::process::exit(i32::from(code.as_u8()));
//! ```

pub mod report;

use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::core::merge::MergeDefinition;
use crate::core::read_group::ReadGroupRecord;
use crate::core::types::ErrorCode;
use crate::core::worklist::WorklistRow;
use crate::matching::engine::{reconcile, ReconciliationInput};
use crate::parsing::merge_json::parse_merge_file;
use crate::parsing::read_group::parse_read_group_lines;
use crate::parsing::sam::{
    HeaderError, HeaderReader, NativeHeaderReader, SamtoolsHeaderReader, DEFAULT_SAMTOOLS,
};
use crate::parsing::worklist::{read_worklist, WorklistError};
use crate::utils::validation::is_existing_file;

use report::{Report, RowOutcome};

#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Worklist(#[from] WorklistError),

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("failed to write report: {0}")]
    Output(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BatchError {
    /// Classification of the aborted batch
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Worklist(e) => e.code(),
            Self::Header(e) => e.code(),
            Self::Output(_) | Self::Io(_) => ErrorCode::Internal,
        }
    }
}

/// How alignment headers are obtained
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum HeaderReaderKind {
    /// Run `samtools view -H`
    #[default]
    Samtools,
    /// Read SAM/BAM/CRAM headers in-process
    Native,
}

/// Settings for one batch run
#[derive(Debug, Clone)]
pub struct QcConfig {
    pub header_reader: HeaderReaderKind,
    /// Header-dump program used by [`HeaderReaderKind::Samtools`]
    pub samtools: PathBuf,
    /// Append the diagnostic summary to each output line
    pub details: bool,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            header_reader: HeaderReaderKind::default(),
            samtools: PathBuf::from(DEFAULT_SAMTOOLS),
            details: false,
        }
    }
}

impl QcConfig {
    #[must_use]
    pub fn build_header_reader(&self) -> Box<dyn HeaderReader> {
        match self.header_reader {
            HeaderReaderKind::Samtools => Box::new(SamtoolsHeaderReader::new(&self.samtools)),
            HeaderReaderKind::Native => Box::new(NativeHeaderReader),
        }
    }
}

/// Check every row of a worklist, writing one line per faulting row.
///
/// # Errors
///
/// Returns `BatchError::Worklist` if the worklist cannot be loaded; no row
/// is processed in that case. Returns `BatchError::Header` if the header
/// reader cannot run at all, and `BatchError::Output`/`Io` if the report
/// cannot be written.
pub fn run_batch<W: Write>(
    worklist: &Path,
    config: &QcConfig,
    output: W,
) -> Result<ErrorCode, BatchError> {
    let rows = read_worklist(worklist)?;
    if rows.is_empty() {
        warn!(worklist = %worklist.display(), "Worklist has no rows");
    }
    info!(rows = rows.len(), worklist = %worklist.display(), "Loaded worklist");

    let reader = config.build_header_reader();
    let mut report = Report::new(output, config.details);
    for row in &rows {
        let outcome = check_row(row, reader.as_ref())?;
        report.record(row, &outcome)?;
    }

    info!(
        rows = report.rows(),
        faults = report.faults(),
        result = %report.max_code(),
        "Finished worklist"
    );
    Ok(report.finish()?)
}

/// Classify a single worklist row.
///
/// # Errors
///
/// Only a fatal header-reader error is returned; every other fault becomes
/// part of the outcome.
pub fn check_row(row: &WorklistRow, reader: &dyn HeaderReader) -> Result<RowOutcome, BatchError> {
    debug!(line = row.line, merge_id = %row.merge_id, "Checking row");

    if let Some((outcome, message)) = missing_inputs(row) {
        error!(
            merge_id = %row.merge_id,
            code = %outcome.code,
            "{message}"
        );
        return Ok(outcome);
    }

    let merge = parse_merge_file(&row.json_path);
    let header = match reader.read_group_lines(&row.alignment_path) {
        Err(e) if e.is_fatal() => return Err(e.into()),
        other => other,
    };

    let (merge, lines) = match (merge, header) {
        (Ok(merge), Ok(lines)) => (merge, lines),
        (merge, header) => {
            let mut faults = Vec::new();
            if let Err(e) = merge {
                error!(merge_id = %row.merge_id, "JSON is bad: {}: {e}", row.json_path.display());
                faults.push(RowOutcome::fault(e.code(), Some(e.to_string())));
            }
            if let Err(e) = header {
                error!(
                    merge_id = %row.merge_id,
                    "Alignment is bad: {}: {e}",
                    row.alignment_path.display()
                );
                faults.push(RowOutcome::fault(e.code(), Some(e.to_string())));
            }
            return Ok(RowOutcome::worst(faults));
        }
    };

    let read_groups = match extract_read_groups(row, &lines) {
        Ok(read_groups) => read_groups,
        Err(outcome) => return Ok(outcome),
    };

    Ok(reconcile_row(row, &read_groups, &merge))
}

/// The outcome and log message of a row whose alignment or merge JSON does
/// not exist; a single message names every missing path.
fn missing_inputs(row: &WorklistRow) -> Option<(RowOutcome, String)> {
    let alignment_missing = !is_existing_file(&row.alignment_path);
    let json_missing = !is_existing_file(&row.json_path);
    let (code, message) = match (alignment_missing, json_missing) {
        (false, false) => return None,
        (true, false) => (
            ErrorCode::AlignmentMissing,
            format!("Alignment is missing: {}", row.alignment_path.display()),
        ),
        (false, true) => (
            ErrorCode::MergeJsonMissing,
            format!("JSON is missing: {}", row.json_path.display()),
        ),
        (true, true) => (
            ErrorCode::AlignmentMissing.max(ErrorCode::MergeJsonMissing),
            format!(
                "Alignment and JSON are missing: {}, {}",
                row.alignment_path.display(),
                row.json_path.display()
            ),
        ),
    };
    Some((RowOutcome::fault(code, None), message))
}

fn extract_read_groups(row: &WorklistRow, lines: &[String]) -> Result<Vec<ReadGroupRecord>, RowOutcome> {
    let mut read_groups = Vec::with_capacity(lines.len());
    let mut faults = Vec::new();
    for result in parse_read_group_lines(lines.iter().map(String::as_str)) {
        match result {
            Ok(rg) => read_groups.push(rg),
            Err(errors) => {
                for e in errors {
                    error!(
                        merge_id = %row.merge_id,
                        code = %e.code(),
                        "{}: {e}",
                        row.alignment_path.display()
                    );
                    faults.push(RowOutcome::fault(e.code(), Some(e.to_string())));
                }
            }
        }
    }
    if faults.is_empty() {
        debug!(read_groups = read_groups.len(), "Extracted read-groups");
        Ok(read_groups)
    } else {
        Err(RowOutcome::worst(faults))
    }
}

fn reconcile_row(
    row: &WorklistRow,
    read_groups: &[ReadGroupRecord],
    merge: &MergeDefinition,
) -> RowOutcome {
    let input = ReconciliationInput::new(read_groups, merge, &row.sample_id);
    let result = reconcile(&input);
    let Some(diagnosis) = result.diagnosis else {
        return RowOutcome::fault(result.code, None);
    };

    let summary = diagnosis.summary();
    error!(
        merge_id = %row.merge_id,
        sample = %row.sample_id,
        code = %result.code,
        alignment = %row.alignment_path.display(),
        json = %row.json_path.display(),
        "{}: {summary}",
        result.code.description()
    );
    RowOutcome::fault(result.code, Some(summary))
}
