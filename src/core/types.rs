use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Classification of a QC outcome.
///
/// The numeric values are an external contract: they are printed in the
/// first column of each output line and used as the process exit code.
/// Severity follows numeric order, so the batch result is the maximum code
/// seen across all rows. Codes 8, 11 and 16 are unused and kept free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ErrorCode {
    /// No fault
    #[default]
    Ok = 0,
    /// Unclassified internal failure
    Internal = 1,
    /// Alignment and merge barcode sets differ
    BarcodeMismatch = 2,
    /// Same barcode listed twice in the merge definition
    DuplicateMergeBarcode = 3,
    /// Same barcode used by two read-groups of one alignment
    DuplicateAlignmentBarcode = 4,
    /// Alignment and merge disagree on the sample
    SampleMismatch = 5,
    /// Alignment sample is not the one the worklist expects
    WrongSample = 6,
    /// Alignment read-groups disagree on the sample
    InconsistentSample = 7,
    /// A read-group has no PU field
    MissingPlatformUnit = 9,
    /// A read-group has no SM field
    MissingSample = 10,
    /// Merge JSON cannot be parsed
    MergeJsonUnparseable = 12,
    /// Alignment file cannot be read
    AlignmentUnreadable = 13,
    /// Merge JSON does not exist
    MergeJsonMissing = 14,
    /// Alignment file does not exist
    AlignmentMissing = 15,
    /// Worklist is missing required columns or is otherwise unreadable
    WorklistBadContents = 17,
    /// Worklist extension is not recognized
    WorklistBadExtension = 18,
    /// Worklist path is not a regular file
    WorklistNotAFile = 19,
    /// Worklist path does not exist
    WorklistMissing = 20,
    /// Merge JSON is structurally invalid (a required key is missing)
    MergeJsonMissingKey = 21,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Short human-readable description of the classification
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "no error",
            Self::Internal => "internal error",
            Self::BarcodeMismatch => "barcode sets mismatch",
            Self::DuplicateMergeBarcode => "duplicate barcode in merge",
            Self::DuplicateAlignmentBarcode => "duplicate barcode in alignment",
            Self::SampleMismatch => "alignment and merge disagree on sample",
            Self::WrongSample => "alignment sample is wrong",
            Self::InconsistentSample => "alignment has multiple samples",
            Self::MissingPlatformUnit => "read-group missing PU",
            Self::MissingSample => "read-group missing SM",
            Self::MergeJsonUnparseable => "merge JSON is not parseable",
            Self::AlignmentUnreadable => "alignment is unreadable",
            Self::MergeJsonMissing => "merge JSON is missing",
            Self::AlignmentMissing => "alignment is missing",
            Self::WorklistBadContents => "worklist has bad contents",
            Self::WorklistBadExtension => "worklist has bad extension",
            Self::WorklistNotAFile => "worklist is not a file",
            Self::WorklistMissing => "worklist is missing",
            Self::MergeJsonMissingKey => "merge JSON is missing a required key",
        }
    }
}

impl PartialOrd for ErrorCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ErrorCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_u8().cmp(&other.as_u8())
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl From<ErrorCode> for std::process::ExitCode {
    fn from(code: ErrorCode) -> Self {
        Self::from(code.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_values_are_stable() {
        assert_eq!(ErrorCode::Ok.as_u8(), 0);
        assert_eq!(ErrorCode::Internal.as_u8(), 1);
        assert_eq!(ErrorCode::BarcodeMismatch.as_u8(), 2);
        assert_eq!(ErrorCode::DuplicateMergeBarcode.as_u8(), 3);
        assert_eq!(ErrorCode::DuplicateAlignmentBarcode.as_u8(), 4);
        assert_eq!(ErrorCode::SampleMismatch.as_u8(), 5);
        assert_eq!(ErrorCode::WrongSample.as_u8(), 6);
        assert_eq!(ErrorCode::InconsistentSample.as_u8(), 7);
        assert_eq!(ErrorCode::MissingPlatformUnit.as_u8(), 9);
        assert_eq!(ErrorCode::MissingSample.as_u8(), 10);
        assert_eq!(ErrorCode::MergeJsonUnparseable.as_u8(), 12);
        assert_eq!(ErrorCode::AlignmentUnreadable.as_u8(), 13);
        assert_eq!(ErrorCode::MergeJsonMissing.as_u8(), 14);
        assert_eq!(ErrorCode::AlignmentMissing.as_u8(), 15);
        assert_eq!(ErrorCode::WorklistBadContents.as_u8(), 17);
        assert_eq!(ErrorCode::WorklistBadExtension.as_u8(), 18);
        assert_eq!(ErrorCode::WorklistNotAFile.as_u8(), 19);
        assert_eq!(ErrorCode::WorklistMissing.as_u8(), 20);
        assert_eq!(ErrorCode::MergeJsonMissingKey.as_u8(), 21);
    }

    #[test]
    fn test_max_follows_numeric_order() {
        let codes = [
            ErrorCode::MergeJsonMissingKey,
            ErrorCode::BarcodeMismatch,
            ErrorCode::AlignmentMissing,
        ];
        assert_eq!(codes.iter().max(), Some(&ErrorCode::MergeJsonMissingKey));
        assert!(ErrorCode::WrongSample > ErrorCode::SampleMismatch);
        assert!(ErrorCode::Ok < ErrorCode::Internal);
    }

    #[test]
    fn test_display_is_numeric() {
        assert_eq!(ErrorCode::DuplicateAlignmentBarcode.to_string(), "4");
        assert_eq!(ErrorCode::Ok.to_string(), "0");
    }
}
