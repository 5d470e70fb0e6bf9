use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::core::read_group::{ReadGroupRecord, TagValue};
use crate::core::types::ErrorCode;

/// Header record tag of a read-group line
pub const READ_GROUP_PREFIX: &str = "@RG";

lazy_static! {
    /// Accepts a plain barcode or a composite `PREFIX_..._BARCODE` platform
    /// unit; the capture is the final underscore-free segment.
    static ref BARCODE_PATTERN: Regex =
        Regex::new(r"^(?:[\w-]*_)?([A-Za-z0-9-]+)$").expect("valid barcode regex");
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("not a read-group line: {0}")]
    NotReadGroup(String),

    #[error("read-group is missing its PU: {0}")]
    MissingPlatformUnit(String),

    #[error("read-group is missing its SM: {0}")]
    MissingSample(String),

    #[error("PU '{0}' matches no known barcode encoding")]
    UnrecognizedBarcode(String),
}

impl ExtractError {
    /// Classification of this fault
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingPlatformUnit(_) => ErrorCode::MissingPlatformUnit,
            Self::MissingSample(_) => ErrorCode::MissingSample,
            Self::NotReadGroup(_) | Self::UnrecognizedBarcode(_) => {
                ErrorCode::AlignmentUnreadable
            }
        }
    }
}

/// Derive the barcode from a platform unit value.
///
/// # Errors
///
/// Returns `ExtractError::UnrecognizedBarcode` if the value is neither a
/// plain barcode nor an underscore-delimited composite ending in one.
///
/// # Examples
///
/// ```
/// use mplx_qc::parsing::read_group::barcode_from_platform_unit;
///
/// assert_eq!(barcode_from_platform_unit("BARCODE123").unwrap(), "BARCODE123");
/// assert_eq!(barcode_from_platform_unit("PREFIX_SUFFIX_BARCODE123").unwrap(), "BARCODE123");
/// assert!(barcode_from_platform_unit("not a barcode").is_err());
/// ```
pub fn barcode_from_platform_unit(platform_unit: &str) -> Result<String, ExtractError> {
    BARCODE_PATTERN
        .captures(platform_unit)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ExtractError::UnrecognizedBarcode(platform_unit.to_string()))
}

/// Parse one raw `@RG` header line into its barcode and sample.
///
/// Fields are tab-delimited `TAG:value` pairs split on the first colon only.
/// A tag seen twice yields [`TagValue::Multiple`] rather than either value.
///
/// # Errors
///
/// Returns every fault of the line, so a read-group lacking both PU and SM
/// reports both: `ExtractError::MissingPlatformUnit` or
/// `ExtractError::UnrecognizedBarcode` for the PU, then
/// `ExtractError::MissingSample`. A line that is not an `@RG` record yields
/// only `ExtractError::NotReadGroup`.
pub fn parse_read_group_line(line: &str) -> Result<ReadGroupRecord, Vec<ExtractError>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.split('\t');
    if fields.next() != Some(READ_GROUP_PREFIX) {
        return Err(vec![ExtractError::NotReadGroup(line.to_string())]);
    }

    let mut id = None;
    let mut platform_unit = TagValue::Absent;
    let mut sample = TagValue::Absent;

    for field in fields {
        let Some((tag, value)) = field.split_once(':') else {
            debug!(field = %field, "Ignoring read-group field without a tag");
            continue;
        };
        match tag {
            "ID" => id = Some(value.to_string()),
            "PU" => platform_unit = platform_unit.push(value),
            "SM" => sample = sample.push(value),
            _ => {}
        }
    }

    let mut faults = Vec::new();
    let barcode = match platform_unit {
        TagValue::Absent => {
            faults.push(ExtractError::MissingPlatformUnit(line.to_string()));
            TagValue::Absent
        }
        TagValue::Multiple => TagValue::Multiple,
        TagValue::Single(pu) => match barcode_from_platform_unit(&pu) {
            Ok(barcode) => TagValue::Single(barcode),
            Err(e) => {
                faults.push(e);
                TagValue::Absent
            }
        },
    };
    if sample.is_absent() {
        faults.push(ExtractError::MissingSample(line.to_string()));
    }
    if !faults.is_empty() {
        return Err(faults);
    }

    Ok(ReadGroupRecord {
        id,
        barcode,
        sample,
    })
}

/// Parse every `@RG` line, keeping each line's outcome so that faults are
/// reported per read-group.
pub fn parse_read_group_lines<'a, I>(
    lines: I,
) -> impl Iterator<Item = Result<ReadGroupRecord, Vec<ExtractError>>> + 'a
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: 'a,
{
    lines
        .into_iter()
        .filter(|l| is_read_group_line(l))
        .map(parse_read_group_line)
}

/// True if a header line is an `@RG` record.
#[must_use]
pub fn is_read_group_line(line: &str) -> bool {
    line.strip_prefix(READ_GROUP_PREFIX)
        .is_some_and(|rest| rest.starts_with('\t'))
}
