use itertools::Itertools;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::merge::{MergeDefinition, SchemaGeneration, SequencingEvent};
use crate::core::types::ErrorCode;
use crate::utils::validation::is_existing_file;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("merge JSON is missing or not a file: {0}")]
    Missing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("top level of merge JSON is not an object")]
    NotAnObject,

    #[error("key '{key}' in {context} is missing")]
    MissingKey { key: &'static str, context: String },

    #[error("key '{key}' in {context} is not {expected}")]
    WrongType {
        key: &'static str,
        context: String,
        expected: &'static str,
    },

    #[error("'seNum' declares {declared} sequencing events but {actual} are present")]
    EventCountMismatch { declared: u64, actual: usize },

    #[error("merge has no sequencing events")]
    NoEvents,

    #[error("sequencing events disagree on {field}: {values:?}")]
    Inconsistent {
        field: &'static str,
        values: Vec<String>,
    },
}

impl MergeError {
    /// Classification of this fault
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Missing(_) => ErrorCode::MergeJsonMissing,
            Self::Io(_) | Self::InvalidJson(_) | Self::NotAnObject => {
                ErrorCode::MergeJsonUnparseable
            }
            Self::MissingKey { .. }
            | Self::WrongType { .. }
            | Self::EventCountMismatch { .. }
            | Self::NoEvents
            | Self::Inconsistent { .. } => ErrorCode::MergeJsonMissingKey,
        }
    }
}

/// Load a merge definition from a JSON file of either schema generation.
///
/// # Errors
///
/// Returns `MergeError::Missing` if the path is not an existing file,
/// `MergeError::Io` or `MergeError::InvalidJson` if it cannot be read or
/// parsed, and a structural variant if the document is parseable but
/// invalid (see [`parse_merge_text`]).
pub fn parse_merge_file(path: &Path) -> Result<MergeDefinition, MergeError> {
    if !is_existing_file(path) {
        return Err(MergeError::Missing(path.to_path_buf()));
    }
    debug!(path = %path.display(), "Parsing merge definition");
    let content = std::fs::read_to_string(path)?;
    parse_merge_text(&content, path)
}

/// Parse merge definition JSON text.
///
/// `path` is only used to detect the schema generation; it need not exist.
///
/// # Errors
///
/// Returns `MergeError::InvalidJson` or `MergeError::NotAnObject` for
/// unparseable input, `MergeError::MissingKey`/`WrongType` naming the
/// offending key, `MergeError::EventCountMismatch` when a legacy `seNum`
/// disagrees with the events present, `MergeError::NoEvents` for an empty
/// event map, and `MergeError::Inconsistent` when events disagree on sample
/// name or reference.
pub fn parse_merge_text(text: &str, path: &Path) -> Result<MergeDefinition, MergeError> {
    let Value::Object(document) = serde_json::from_str::<Value>(text)? else {
        return Err(MergeError::NotAnObject);
    };

    let generation = SchemaGeneration::detect(path, &document);
    debug!(path = %path.display(), ?generation, "Detected schema generation");

    let merge_id = require_str(&document, generation.merge_id_key(), "merge")?;

    let library_name = match optional_str(&document, generation.library_name_key(), "merge")? {
        Some(name) => Some(name),
        None => {
            warn!(
                path = %path.display(),
                key = generation.library_name_key(),
                "Merge has no library name"
            );
            None
        }
    };

    let events_key = generation.events_key();
    let events = match document.get(events_key) {
        None => {
            return Err(MergeError::MissingKey {
                key: events_key,
                context: "merge".to_string(),
            })
        }
        Some(Value::Object(events)) => events,
        Some(_) => {
            return Err(MergeError::WrongType {
                key: events_key,
                context: "merge".to_string(),
                expected: "an object",
            })
        }
    };

    let mut sequencing_events = Vec::with_capacity(events.len());
    for (key, value) in events {
        let event = parse_event(key, value, generation)?;
        if event.barcode != *key {
            warn!(
                path = %path.display(),
                key = %key,
                barcode = %event.barcode,
                "Sequencing event barcode differs from its key"
            );
        }
        sequencing_events.push(event);
    }

    if let Some(count_key) = generation.event_count_key() {
        let declared = match document.get(count_key) {
            None => {
                return Err(MergeError::MissingKey {
                    key: count_key,
                    context: "merge".to_string(),
                })
            }
            Some(value) => value.as_u64().ok_or_else(|| MergeError::WrongType {
                key: count_key,
                context: "merge".to_string(),
                expected: "a non-negative integer",
            })?,
        };
        if usize::try_from(declared).ok() != Some(sequencing_events.len()) {
            return Err(MergeError::EventCountMismatch {
                declared,
                actual: sequencing_events.len(),
            });
        }
    }

    if sequencing_events.is_empty() {
        return Err(MergeError::NoEvents);
    }

    let sample_name = single_value(
        "sample_name",
        sequencing_events.iter().map(|e| e.sample_name.as_str()),
    )?;
    let reference = single_value(
        "reference",
        sequencing_events.iter().map(|e| e.reference.as_str()),
    )?;

    Ok(MergeDefinition {
        merge_id,
        library_name,
        generation,
        sequencing_events,
        sample_name,
        reference,
    })
}

fn parse_event(
    key: &str,
    value: &Value,
    generation: SchemaGeneration,
) -> Result<SequencingEvent, MergeError> {
    let context = format!("sequencing event '{key}'");
    let Value::Object(event) = value else {
        return Err(MergeError::WrongType {
            key: generation.events_key(),
            context,
            expected: "an object of objects",
        });
    };

    Ok(SequencingEvent {
        barcode: require_str(event, generation.barcode_key(), &context)?,
        sample_name: require_str(event, generation.sample_name_key(), &context)?,
        reference: require_str(event, generation.reference_key(), &context)?,
    })
}

fn optional_str(
    map: &Map<String, Value>,
    key: &'static str,
    context: &str,
) -> Result<Option<String>, MergeError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(MergeError::WrongType {
            key,
            context: context.to_string(),
            expected: "a string",
        }),
    }
}

fn require_str(
    map: &Map<String, Value>,
    key: &'static str,
    context: &str,
) -> Result<String, MergeError> {
    optional_str(map, key, context)?.ok_or_else(|| MergeError::MissingKey {
        key,
        context: context.to_string(),
    })
}

/// The one value shared by every item, or `Inconsistent` listing them all.
fn single_value<'a>(
    field: &'static str,
    values: impl Iterator<Item = &'a str>,
) -> Result<String, MergeError> {
    let distinct: Vec<&str> = values.unique().collect();
    match distinct.as_slice() {
        [only] => Ok((*only).to_string()),
        _ => Err(MergeError::Inconsistent {
            field,
            values: distinct.into_iter().map(str::to_string).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current_doc(events: &[(&str, &str, &str)]) -> String {
        let mut map = Map::new();
        for (barcode, sample, reference) in events {
            map.insert(
                (*barcode).to_string(),
                json!({"event_id": barcode, "sample_name": sample, "reference": reference}),
            );
        }
        json!({"event_id": "M1", "library_name": "LIB1", "sequencing_events": map}).to_string()
    }

    fn legacy_doc(events: &[(&str, &str, &str)], se_num: usize) -> String {
        let mut map = Map::new();
        for (barcode, sample, reference) in events {
            map.insert(
                (*barcode).to_string(),
                json!({"eventId": barcode, "sampleName": sample, "reference": reference}),
            );
        }
        json!({"eventId": "M1", "libName": "LIB1", "seNum": se_num, "seqEvents": map}).to_string()
    }

    #[test]
    fn test_parse_current_generation() {
        let text = current_doc(&[("B2", "S1", "hg38"), ("A1", "S1", "hg38")]);
        let merge = parse_merge_text(&text, Path::new("event.json")).unwrap();

        assert_eq!(merge.generation, SchemaGeneration::Current);
        assert_eq!(merge.merge_id, "M1");
        assert_eq!(merge.library_name.as_deref(), Some("LIB1"));
        assert_eq!(merge.sample_name, "S1");
        assert_eq!(merge.reference, "hg38");
        // Document order is kept
        assert_eq!(merge.barcodes(), vec!["B2", "A1"]);
        assert_eq!(merge.samples(), vec!["S1", "S1"]);
    }

    #[test]
    fn test_parse_legacy_generation() {
        let text = legacy_doc(&[("A1", "S1", "hs37d5"), ("A2", "S1", "hs37d5")], 2);
        let merge = parse_merge_text(&text, Path::new("M1.MergeDefn.json")).unwrap();

        assert_eq!(merge.generation, SchemaGeneration::Legacy);
        assert_eq!(merge.sequencing_events.len(), 2);
        assert_eq!(merge.sample_name, "S1");
        assert_eq!(merge.reference, "hs37d5");
    }

    #[test]
    fn test_legacy_count_mismatch() {
        let text = legacy_doc(&[("A1", "S1", "hs37d5"), ("A2", "S1", "hs37d5")], 3);
        let err = parse_merge_text(&text, Path::new("M1.MergeDefn.json")).unwrap_err();
        assert!(matches!(
            err,
            MergeError::EventCountMismatch {
                declared: 3,
                actual: 2
            }
        ));
        assert_eq!(err.code(), ErrorCode::MergeJsonMissingKey);
    }

    #[test]
    fn test_legacy_missing_count() {
        let text = json!({"eventId": "M1", "seqEvents": {
            "A1": {"eventId": "A1", "sampleName": "S1", "reference": "r"}
        }})
        .to_string();
        let err = parse_merge_text(&text, Path::new("x.json")).unwrap_err();
        assert!(matches!(err, MergeError::MissingKey { key: "seNum", .. }));
    }

    #[test]
    fn test_missing_merge_id() {
        let text = json!({"library_name": "L", "sequencing_events": {}}).to_string();
        let err = parse_merge_text(&text, Path::new("event.json")).unwrap_err();
        assert!(matches!(err, MergeError::MissingKey { key: "event_id", .. }));
        assert_eq!(err.code(), ErrorCode::MergeJsonMissingKey);
        assert!(err.to_string().contains("event_id"));
    }

    #[test]
    fn test_missing_event_sample_names_key() {
        let text = json!({"event_id": "M1", "sequencing_events": {
            "A1": {"event_id": "A1", "reference": "r"}
        }})
        .to_string();
        let err = parse_merge_text(&text, Path::new("event.json")).unwrap_err();
        match err {
            MergeError::MissingKey { key, context } => {
                assert_eq!(key, "sample_name");
                assert!(context.contains("A1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_library_name_is_not_fatal() {
        let text = json!({"event_id": "M1", "sequencing_events": {
            "A1": {"event_id": "A1", "sample_name": "S1", "reference": "r"}
        }})
        .to_string();
        let merge = parse_merge_text(&text, Path::new("event.json")).unwrap();
        assert!(merge.library_name.is_none());
    }

    #[test]
    fn test_wrong_type() {
        let text = json!({"event_id": 7, "sequencing_events": {}}).to_string();
        let err = parse_merge_text(&text, Path::new("event.json")).unwrap_err();
        assert!(matches!(err, MergeError::WrongType { key: "event_id", .. }));

        let text = json!({"event_id": "M1", "sequencing_events": []}).to_string();
        let err = parse_merge_text(&text, Path::new("event.json")).unwrap_err();
        assert!(matches!(
            err,
            MergeError::WrongType {
                key: "sequencing_events",
                ..
            }
        ));
    }

    #[test]
    fn test_inconsistent_samples() {
        let text = current_doc(&[("A1", "S1", "hg38"), ("A2", "S2", "hg38")]);
        let err = parse_merge_text(&text, Path::new("event.json")).unwrap_err();
        match err {
            MergeError::Inconsistent { field, values } => {
                assert_eq!(field, "sample_name");
                assert_eq!(values, vec!["S1", "S2"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_inconsistent_references() {
        let text = current_doc(&[("A1", "S1", "hg38"), ("A2", "S1", "hg19")]);
        let err = parse_merge_text(&text, Path::new("event.json")).unwrap_err();
        assert!(matches!(
            err,
            MergeError::Inconsistent {
                field: "reference",
                ..
            }
        ));
    }

    #[test]
    fn test_no_events() {
        let text = current_doc(&[]);
        let err = parse_merge_text(&text, Path::new("event.json")).unwrap_err();
        assert!(matches!(err, MergeError::NoEvents));
    }

    #[test]
    fn test_unparseable() {
        let err = parse_merge_text("{not json", Path::new("event.json")).unwrap_err();
        assert!(matches!(err, MergeError::InvalidJson(_)));
        assert_eq!(err.code(), ErrorCode::MergeJsonUnparseable);

        let err = parse_merge_text("[1, 2]", Path::new("event.json")).unwrap_err();
        assert!(matches!(err, MergeError::NotAnObject));
        assert_eq!(err.code(), ErrorCode::MergeJsonUnparseable);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = parse_merge_file(&dir.path().join("event.json")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MergeJsonMissing);

        // A directory is not a merge definition either
        let err = parse_merge_file(dir.path()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MergeJsonMissing);
    }

    #[test]
    fn test_parse_file_current_by_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, current_doc(&[("A1", "S1", "hg38")])).unwrap();
        let merge = parse_merge_file(&path).unwrap();
        assert_eq!(merge.generation, SchemaGeneration::Current);
        assert_eq!(merge.barcodes(), vec!["A1"]);
    }
}
