use itertools::Itertools;
use std::collections::BTreeSet;
use tracing::debug;

use crate::core::merge::MergeDefinition;
use crate::core::read_group::{ReadGroupRecord, TagValue};
use crate::core::types::ErrorCode;
use crate::matching::diagnosis::{BarcodeSource, Diagnosis, ReconciliationResult};
use crate::utils::validation::find_duplicates;

/// Both sides of one reconciliation, plus the sample the worklist expects
#[derive(Debug, Clone)]
pub struct ReconciliationInput<'a> {
    pub alignment_barcodes: Vec<TagValue>,
    pub alignment_samples: Vec<TagValue>,
    pub merge_barcodes: Vec<String>,
    pub merge_samples: Vec<String>,
    pub expected_sample: &'a str,
}

impl<'a> ReconciliationInput<'a> {
    #[must_use]
    pub fn new(
        read_groups: &[ReadGroupRecord],
        merge: &MergeDefinition,
        expected_sample: &'a str,
    ) -> Self {
        Self {
            alignment_barcodes: read_groups.iter().map(|rg| rg.barcode.clone()).collect(),
            alignment_samples: read_groups.iter().map(|rg| rg.sample.clone()).collect(),
            merge_barcodes: merge.barcodes(),
            merge_samples: merge.samples(),
            expected_sample,
        }
    }
}

/// Classify how an alignment's read-groups relate to a merge definition.
///
/// Checks run from most to least specific and the first failing one wins:
///
/// 1. alignment read-groups carry exactly one sample (7)
/// 2. that sample is the expected one (6)
/// 3. the merge carries the same single sample (5)
/// 4. no barcode repeats within the alignment (4)
/// 5. no barcode repeats within the merge (3)
/// 6. both sides carry the same set of barcodes (2)
///
/// An ambiguous tag value (repeated tag in one read-group) equals nothing,
/// so it counts as its own distinct sample and never matches a barcode.
#[must_use]
pub fn reconcile(input: &ReconciliationInput<'_>) -> ReconciliationResult {
    let alignment_samples = distinct_values(&input.alignment_samples);
    debug!(
        read_groups = input.alignment_barcodes.len(),
        merge_events = input.merge_barcodes.len(),
        "Reconciling read-groups"
    );

    let [alignment_sample] = alignment_samples.as_slice() else {
        return ReconciliationResult::fault(
            ErrorCode::InconsistentSample,
            Diagnosis::InconsistentSamples {
                samples: alignment_samples.iter().map(ToString::to_string).collect(),
            },
        );
    };

    if **alignment_sample != *input.expected_sample {
        return ReconciliationResult::fault(
            ErrorCode::WrongSample,
            Diagnosis::WrongSample {
                found: alignment_sample.to_string(),
                expected: input.expected_sample.to_string(),
            },
        );
    }

    let merge_samples: Vec<&str> = input
        .merge_samples
        .iter()
        .map(String::as_str)
        .unique()
        .collect();
    if merge_samples.as_slice() != [input.expected_sample] {
        return ReconciliationResult::fault(
            ErrorCode::SampleMismatch,
            Diagnosis::SampleMismatch {
                alignment: vec![alignment_sample.to_string()],
                merge: merge_samples.into_iter().map(str::to_string).collect(),
            },
        );
    }

    let alignment_barcodes: Vec<&str> = input
        .alignment_barcodes
        .iter()
        .filter_map(TagValue::as_single)
        .collect();
    let duplicates = find_duplicates(&alignment_barcodes);
    if !duplicates.is_empty() {
        return ReconciliationResult::fault(
            ErrorCode::DuplicateAlignmentBarcode,
            Diagnosis::DuplicateBarcodes {
                source: BarcodeSource::Alignment,
                barcodes: duplicates.into_iter().map(str::to_string).collect(),
            },
        );
    }

    let duplicates = find_duplicates(&input.merge_barcodes);
    if !duplicates.is_empty() {
        return ReconciliationResult::fault(
            ErrorCode::DuplicateMergeBarcode,
            Diagnosis::DuplicateBarcodes {
                source: BarcodeSource::Merge,
                barcodes: duplicates,
            },
        );
    }

    let ambiguous = input.alignment_barcodes.len() - alignment_barcodes.len();
    let alignment_set: BTreeSet<&str> = alignment_barcodes.into_iter().collect();
    let merge_set: BTreeSet<&str> = input.merge_barcodes.iter().map(String::as_str).collect();
    if ambiguous > 0 || alignment_set != merge_set {
        return ReconciliationResult::fault(
            ErrorCode::BarcodeMismatch,
            Diagnosis::BarcodeMismatch {
                alignment_only: alignment_set
                    .difference(&merge_set)
                    .map(|s| (*s).to_string())
                    .collect(),
                merge_only: merge_set
                    .difference(&alignment_set)
                    .map(|s| (*s).to_string())
                    .collect(),
                ambiguous,
            },
        );
    }

    ReconciliationResult::ok()
}

/// Distinct values in order of first appearance; every non-single value is
/// kept, as it equals nothing.
fn distinct_values(values: &[TagValue]) -> Vec<&TagValue> {
    let mut distinct: Vec<&TagValue> = Vec::new();
    for value in values {
        if !distinct.iter().any(|seen| *seen == value) {
            distinct.push(value);
        }
    }
    distinct
}
