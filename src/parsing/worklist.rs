use calamine::{open_workbook_auto, Data, Reader};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::types::ErrorCode;
use crate::core::worklist::{
    WorklistRow, ALIGNMENT_PATH_COLUMN, JSON_PATH_COLUMN, MERGE_ID_COLUMN, REQUIRED_COLUMNS,
    SAMPLE_COLUMN,
};
use crate::utils::validation::{lowercase_extension, path_state, PathState};

/// Sheet that holds the worklist in a workbook with several sheets
pub const WORKLIST_SHEET: &str = "smpls";

#[derive(Error, Debug)]
pub enum WorklistError {
    #[error("Input file is missing: {0}")]
    Missing(PathBuf),

    #[error("Input is not a file: {0}")]
    NotAFile(PathBuf),

    #[error("Input file has bad extension: {0}")]
    BadExtension(PathBuf),

    #[error("Input file has bad contents: {path}: {reason}")]
    BadContents { path: PathBuf, reason: String },
}

impl WorklistError {
    /// Classification of this fault
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Missing(_) => ErrorCode::WorklistMissing,
            Self::NotAFile(_) => ErrorCode::WorklistNotAFile,
            Self::BadExtension(_) => ErrorCode::WorklistBadExtension,
            Self::BadContents { .. } => ErrorCode::WorklistBadContents,
        }
    }

    fn bad_contents(path: &Path, reason: impl Into<String>) -> Self {
        Self::BadContents {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Supported worklist containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorklistFormat {
    /// Tab-delimited text
    Tsv,
    /// Excel workbook
    Xlsx,
}

impl WorklistFormat {
    /// Recognize a worklist format from the file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match lowercase_extension(path).as_deref() {
            Some("tsv") => Some(Self::Tsv),
            Some("xlsx") => Some(Self::Xlsx),
            _ => None,
        }
    }
}

/// Positions of the required columns in a header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    sample: usize,
    merge_id: usize,
    json_path: usize,
    alignment_path: usize,
}

impl ColumnIndex {
    fn from_header<S: AsRef<str>>(path: &Path, header: &[S]) -> Result<Self, WorklistError> {
        let find = |name: &str| header.iter().position(|h| h.as_ref().trim() == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| find(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(WorklistError::bad_contents(
                path,
                format!("missing required columns: {}", missing.join(", ")),
            ));
        }

        // All present, checked above
        let index = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            sample: index(SAMPLE_COLUMN),
            merge_id: index(MERGE_ID_COLUMN),
            json_path: index(JSON_PATH_COLUMN),
            alignment_path: index(ALIGNMENT_PATH_COLUMN),
        })
    }

    fn row(&self, line: usize, fields: &[String]) -> Option<WorklistRow> {
        let field = |i: usize| fields.get(i).map(|f| f.trim().to_string());
        Some(WorklistRow {
            line,
            sample_id: field(self.sample)?,
            merge_id: field(self.merge_id)?,
            json_path: PathBuf::from(field(self.json_path)?),
            alignment_path: PathBuf::from(field(self.alignment_path)?),
        })
    }
}

enum RowSource {
    Tsv(csv::StringRecordsIntoIter<File>),
    Sheet(std::vec::IntoIter<(usize, Vec<String>)>),
}

/// Single-pass sequence of worklist rows.
///
/// Rows that are entirely blank are skipped; a row too short to hold every
/// required column is an error.
pub struct WorklistRows {
    path: PathBuf,
    columns: ColumnIndex,
    source: RowSource,
}

impl Iterator for WorklistRows {
    type Item = Result<WorklistRow, WorklistError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (line, fields) = match &mut self.source {
                RowSource::Tsv(records) => match records.next()? {
                    Ok(record) => {
                        let line = record
                            .position()
                            .and_then(|p| usize::try_from(p.line()).ok())
                            .unwrap_or_default();
                        (line, record.iter().map(str::to_string).collect::<Vec<_>>())
                    }
                    Err(e) => return Some(Err(WorklistError::bad_contents(&self.path, e.to_string()))),
                },
                RowSource::Sheet(rows) => rows.next()?,
            };

            if fields.iter().all(|f| f.trim().is_empty()) {
                continue;
            }

            return Some(self.columns.row(line, &fields).ok_or_else(|| {
                WorklistError::bad_contents(
                    &self.path,
                    format!("row {line} has too few columns"),
                )
            }));
        }
    }
}

/// Check a worklist path and open it, locating the required columns.
///
/// Checks run in order: existence, regular file, extension, then contents.
///
/// # Errors
///
/// Returns `WorklistError::Missing`, `NotAFile` or `BadExtension` for path
/// problems, and `WorklistError::BadContents` if the file cannot be read or
/// lacks a required column.
pub fn open_worklist(path: &Path) -> Result<WorklistRows, WorklistError> {
    match path_state(path) {
        PathState::Missing => return Err(WorklistError::Missing(path.to_path_buf())),
        PathState::NotAFile => return Err(WorklistError::NotAFile(path.to_path_buf())),
        PathState::File => {}
    }

    let format =
        WorklistFormat::from_path(path).ok_or_else(|| WorklistError::BadExtension(path.to_path_buf()))?;
    debug!(path = %path.display(), ?format, "Opening worklist");

    match format {
        WorklistFormat::Tsv => open_tsv(path),
        WorklistFormat::Xlsx => open_xlsx(path),
    }
}

/// Load every row of a worklist before any is processed.
///
/// # Errors
///
/// Returns the first error from [`open_worklist`] or from any row.
pub fn read_worklist(path: &Path) -> Result<Vec<WorklistRow>, WorklistError> {
    open_worklist(path)?.collect()
}

fn open_tsv(path: &Path) -> Result<WorklistRows, WorklistError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .map_err(|e| WorklistError::bad_contents(path, e.to_string()))?;

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| WorklistError::bad_contents(path, e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    debug!(columns = ?header, "Worklist columns");
    let columns = ColumnIndex::from_header(path, &header)?;

    Ok(WorklistRows {
        path: path.to_path_buf(),
        columns,
        source: RowSource::Tsv(reader.into_records()),
    })
}

fn open_xlsx(path: &Path) -> Result<WorklistRows, WorklistError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| WorklistError::bad_contents(path, e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    let sheet = sheet_names
        .iter()
        .find(|name| name.as_str() == WORKLIST_SHEET)
        .or_else(|| sheet_names.first())
        .cloned()
        .ok_or_else(|| WorklistError::bad_contents(path, "workbook has no sheets"))?;
    debug!(sheet = %sheet, "Reading worksheet");

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| WorklistError::bad_contents(path, e.to_string()))?;
    let first_row = range
        .start()
        .and_then(|(row, _)| usize::try_from(row).ok())
        .unwrap_or_default();

    let mut rows = range
        .rows()
        .enumerate()
        .map(|(i, cells)| (first_row + i + 1, cells.iter().map(cell_text).collect::<Vec<_>>()));

    let (_, header) = rows
        .next()
        .ok_or_else(|| WorklistError::bad_contents(path, "worksheet is empty"))?;
    debug!(columns = ?header, "Worklist columns");
    let columns = ColumnIndex::from_header(path, &header)?;

    Ok(WorklistRows {
        path: path.to_path_buf(),
        columns,
        source: RowSource::Sheet(rows.collect::<Vec<_>>().into_iter()),
    })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        #[allow(clippy::cast_possible_truncation)]
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        other => other.to_string(),
    }
}
