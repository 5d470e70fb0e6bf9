use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

use crate::core::types::ErrorCode;
use crate::parsing::read_group::is_read_group_line;
use crate::utils::validation::{is_existing_file, lowercase_extension};

/// Default header-dump program
pub const DEFAULT_SAMTOOLS: &str = "samtools";

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("alignment is missing or not a file: {0}")]
    Missing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("header is not valid UTF-8")]
    InvalidUtf8,

    #[error("{program} exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("failed to run {program}: {source}")]
    ToolUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl HeaderError {
    /// Classification of this fault
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Missing(_) => ErrorCode::AlignmentMissing,
            Self::Io(_) | Self::Noodles(_) | Self::InvalidUtf8 | Self::ToolFailed { .. } => {
                ErrorCode::AlignmentUnreadable
            }
            Self::ToolUnavailable { .. } => ErrorCode::Internal,
        }
    }

    /// True if the fault says nothing about the row and would recur for every
    /// row, so the batch cannot continue.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ToolUnavailable { .. })
    }
}

/// Source of raw `@RG` header lines for an alignment file
pub trait HeaderReader {
    /// Return the `@RG` lines of the alignment header, verbatim and in order.
    ///
    /// # Errors
    ///
    /// Returns `HeaderError::Missing` if the path is not an existing file,
    /// checked before any read is attempted, or another variant if the
    /// header cannot be read.
    fn read_group_lines(&self, path: &Path) -> Result<Vec<String>, HeaderError>;
}

/// Dumps headers with `samtools view -H`
#[derive(Debug, Clone)]
pub struct SamtoolsHeaderReader {
    program: PathBuf,
}

impl SamtoolsHeaderReader {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SamtoolsHeaderReader {
    fn default() -> Self {
        Self::new(DEFAULT_SAMTOOLS)
    }
}

impl HeaderReader for SamtoolsHeaderReader {
    fn read_group_lines(&self, path: &Path) -> Result<Vec<String>, HeaderError> {
        if !is_existing_file(path) {
            return Err(HeaderError::Missing(path.to_path_buf()));
        }

        let program = self.program.display().to_string();
        debug!("{program} view -H {}", path.display());

        let output = Command::new(&self.program)
            .arg("view")
            .arg("-H")
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| HeaderError::ToolUnavailable {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(HeaderError::ToolFailed {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout).map_err(|_| HeaderError::InvalidUtf8)?;
        Ok(read_group_lines_from_text(&text))
    }
}

/// Reads headers in-process: BAM and CRAM through noodles, anything else as
/// SAM text
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeHeaderReader;

impl HeaderReader for NativeHeaderReader {
    fn read_group_lines(&self, path: &Path) -> Result<Vec<String>, HeaderError> {
        if !is_existing_file(path) {
            return Err(HeaderError::Missing(path.to_path_buf()));
        }

        debug!(path = %path.display(), "Reading alignment header");
        let text = match lowercase_extension(path).as_deref() {
            Some("bam") => header_to_text(&read_bam_header(path)?)?,
            Some("cram") => header_to_text(&read_cram_header(path)?)?,
            _ => read_sam_header_text(path)?,
        };
        Ok(read_group_lines_from_text(&text))
    }
}

/// Keep only the `@RG` lines of header text, verbatim.
#[must_use]
pub fn read_group_lines_from_text(text: &str) -> Vec<String> {
    text.lines()
        .filter(|l| is_read_group_line(l))
        .map(str::to_string)
        .collect()
}

/// Read the leading `@` lines of a SAM file without interpreting them, so
/// that corrupt records such as repeated tags survive to the extractor.
fn read_sam_header_text(path: &Path) -> Result<String, HeaderError> {
    let reader = BufReader::new(File::open(path)?);
    let mut text = String::new();
    for line in reader.lines() {
        let line = line?;
        if !line.starts_with('@') {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

fn read_bam_header(path: &Path) -> Result<noodles::sam::Header, HeaderError> {
    use noodles::bam;

    let mut reader = File::open(path).map(bam::io::Reader::new)?;

    reader
        .read_header()
        .map_err(|e| HeaderError::Noodles(e.to_string()))
}

fn read_cram_header(path: &Path) -> Result<noodles::sam::Header, HeaderError> {
    use noodles::cram;

    let mut reader = File::open(path).map(cram::io::Reader::new)?;

    reader
        .read_file_definition()
        .map_err(|e| HeaderError::Noodles(e.to_string()))?;

    reader
        .read_file_header()
        .map_err(|e| HeaderError::Noodles(e.to_string()))
}

fn header_to_text(header: &noodles::sam::Header) -> Result<String, HeaderError> {
    let mut buf = Vec::new();
    noodles::sam::io::Writer::new(&mut buf).write_header(header)?;
    String::from_utf8(buf).map_err(|_| HeaderError::InvalidUtf8)
}
