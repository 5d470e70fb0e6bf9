use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name that marks a current-generation merge definition
pub const CURRENT_GENERATION_FILE_NAME: &str = "event.json";

/// Schema generation of a merge definition document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaGeneration {
    /// `eventId`/`libName`/`seqEvents` plus a redundant `seNum` event count
    Legacy,
    /// `event_id`/`library_name`/`sequencing_events`
    Current,
}

impl SchemaGeneration {
    /// Top-level key holding the merge identifier
    #[must_use]
    pub const fn merge_id_key(self) -> &'static str {
        match self {
            Self::Legacy => "eventId",
            Self::Current => "event_id",
        }
    }

    #[must_use]
    pub const fn library_name_key(self) -> &'static str {
        match self {
            Self::Legacy => "libName",
            Self::Current => "library_name",
        }
    }

    #[must_use]
    pub const fn events_key(self) -> &'static str {
        match self {
            Self::Legacy => "seqEvents",
            Self::Current => "sequencing_events",
        }
    }

    /// Key of the declared event count, only present in the legacy generation
    #[must_use]
    pub const fn event_count_key(self) -> Option<&'static str> {
        match self {
            Self::Legacy => Some("seNum"),
            Self::Current => None,
        }
    }

    /// Per-event key holding the barcode
    #[must_use]
    pub const fn barcode_key(self) -> &'static str {
        self.merge_id_key()
    }

    #[must_use]
    pub const fn sample_name_key(self) -> &'static str {
        match self {
            Self::Legacy => "sampleName",
            Self::Current => "sample_name",
        }
    }

    #[must_use]
    pub const fn reference_key(self) -> &'static str {
        "reference"
    }

    /// Decide the generation of a document from its file name and keys.
    ///
    /// A file named `event.json` is always current. Otherwise a document is
    /// current only if it carries current-generation keys and no legacy ones.
    #[must_use]
    pub fn detect(path: &Path, document: &serde_json::Map<String, serde_json::Value>) -> Self {
        if path.file_name().and_then(|n| n.to_str()) == Some(CURRENT_GENERATION_FILE_NAME) {
            return Self::Current;
        }

        let has_legacy = ["eventId", "seqEvents", "seNum"]
            .iter()
            .any(|k| document.contains_key(*k));
        let has_current = ["event_id", "sequencing_events"]
            .iter()
            .any(|k| document.contains_key(*k));

        if has_current && !has_legacy {
            Self::Current
        } else {
            Self::Legacy
        }
    }
}

/// One barcode's worth of sequencing within a merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencingEvent {
    pub barcode: String,
    pub sample_name: String,
    pub reference: String,
}

impl SequencingEvent {
    pub fn new(
        barcode: impl Into<String>,
        sample_name: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            barcode: barcode.into(),
            sample_name: sample_name.into(),
            reference: reference.into(),
        }
    }
}

/// A sequencing merge and its constituent events.
///
/// Only built by the merge-definition parser once every event has been
/// checked to share one sample name and one reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeDefinition {
    pub merge_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_name: Option<String>,

    pub generation: SchemaGeneration,

    /// Events in document order
    pub sequencing_events: Vec<SequencingEvent>,

    /// The sample name shared by all events
    pub sample_name: String,

    /// The reference shared by all events
    pub reference: String,
}

impl MergeDefinition {
    /// Barcodes of all events, in document order
    #[must_use]
    pub fn barcodes(&self) -> Vec<String> {
        self.sequencing_events
            .iter()
            .map(|e| e.barcode.clone())
            .collect()
    }

    /// Sample names of all events, in document order
    #[must_use]
    pub fn samples(&self) -> Vec<String> {
        self.sequencing_events
            .iter()
            .map(|e| e.sample_name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_detect_by_file_name() {
        let doc = as_map(json!({"eventId": "M1", "seqEvents": {}}));
        assert_eq!(
            SchemaGeneration::detect(Path::new("/data/M1/event.json"), &doc),
            SchemaGeneration::Current
        );
    }

    #[test]
    fn test_detect_by_keys() {
        let current = as_map(json!({"event_id": "M1", "sequencing_events": {}}));
        let legacy = as_map(json!({"eventId": "M1", "seqEvents": {}, "seNum": 0}));
        assert_eq!(
            SchemaGeneration::detect(Path::new("M1.MergeDefn.json"), &current),
            SchemaGeneration::Current
        );
        assert_eq!(
            SchemaGeneration::detect(Path::new("M1.MergeDefn.json"), &legacy),
            SchemaGeneration::Legacy
        );
    }

    #[test]
    fn test_detect_defaults_to_legacy() {
        let empty = as_map(json!({}));
        assert_eq!(
            SchemaGeneration::detect(Path::new("x.json"), &empty),
            SchemaGeneration::Legacy
        );
    }

    #[test]
    fn test_generation_keys() {
        assert_eq!(SchemaGeneration::Legacy.barcode_key(), "eventId");
        assert_eq!(SchemaGeneration::Current.sample_name_key(), "sample_name");
        assert_eq!(SchemaGeneration::Legacy.event_count_key(), Some("seNum"));
        assert_eq!(SchemaGeneration::Current.event_count_key(), None);
    }
}
