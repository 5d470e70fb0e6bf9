use crate::core::types::ErrorCode;

/// Which side of the comparison a barcode list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeSource {
    Alignment,
    Merge,
}

impl std::fmt::Display for BarcodeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alignment => write!(f, "alignment"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// Values behind a reconciliation fault, for reporting only
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnosis {
    /// Distinct sample values found across the alignment read-groups
    InconsistentSamples { samples: Vec<String> },

    /// The alignment's sample and the one the worklist expects
    WrongSample { found: String, expected: String },

    /// Distinct samples on each side
    SampleMismatch {
        alignment: Vec<String>,
        merge: Vec<String>,
    },

    /// Barcodes used more than once on one side
    DuplicateBarcodes {
        source: BarcodeSource,
        barcodes: Vec<String>,
    },

    /// Barcodes present on only one side; ambiguous alignment barcodes
    /// (repeated PU tags) are counted separately since they match nothing
    BarcodeMismatch {
        alignment_only: Vec<String>,
        merge_only: Vec<String>,
        ambiguous: usize,
    },
}

impl Diagnosis {
    /// Compact single-field summary, safe to place in a TSV column
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::InconsistentSamples { samples } => format!("samples={}", samples.join(",")),
            Self::WrongSample { found, expected } => format!("found={found};expected={expected}"),
            Self::SampleMismatch { alignment, merge } => format!(
                "alignment_samples={};merge_samples={}",
                alignment.join(","),
                merge.join(",")
            ),
            Self::DuplicateBarcodes { barcodes, .. } => format!("duplicates={}", barcodes.join(",")),
            Self::BarcodeMismatch {
                alignment_only,
                merge_only,
                ambiguous,
            } => {
                let mut summary = format!(
                    "alignment_only={};merge_only={}",
                    alignment_only.join(","),
                    merge_only.join(",")
                );
                if *ambiguous > 0 {
                    summary.push_str(&format!(";ambiguous={ambiguous}"));
                }
                summary
            }
        }
    }
}

/// Outcome of reconciling one alignment against one merge definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub code: ErrorCode,
    pub diagnosis: Option<Diagnosis>,
}

impl ReconciliationResult {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            code: ErrorCode::Ok,
            diagnosis: None,
        }
    }

    #[must_use]
    pub fn fault(code: ErrorCode, diagnosis: Diagnosis) -> Self {
        Self {
            code,
            diagnosis: Some(diagnosis),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_duplicates() {
        let d = Diagnosis::DuplicateBarcodes {
            source: BarcodeSource::Alignment,
            barcodes: vec!["A".to_string()],
        };
        assert_eq!(d.summary(), "duplicates=A");
    }

    #[test]
    fn test_summary_barcode_mismatch() {
        let d = Diagnosis::BarcodeMismatch {
            alignment_only: vec!["C".to_string()],
            merge_only: vec!["D".to_string(), "E".to_string()],
            ambiguous: 0,
        };
        assert_eq!(d.summary(), "alignment_only=C;merge_only=D,E");

        let d = Diagnosis::BarcodeMismatch {
            alignment_only: vec![],
            merge_only: vec!["D".to_string()],
            ambiguous: 1,
        };
        assert_eq!(d.summary(), "alignment_only=;merge_only=D;ambiguous=1");
    }

    #[test]
    fn test_result_constructors() {
        assert!(ReconciliationResult::ok().is_ok());
        let r = ReconciliationResult::fault(
            ErrorCode::WrongSample,
            Diagnosis::WrongSample {
                found: "S2".to_string(),
                expected: "S1".to_string(),
            },
        );
        assert!(!r.is_ok());
        assert_eq!(r.diagnosis.unwrap().summary(), "found=S2;expected=S1");
    }
}
