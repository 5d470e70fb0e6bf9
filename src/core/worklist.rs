use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Worklist column holding the expected sample identifier
pub const SAMPLE_COLUMN: &str = "sample_id_nwd_id";
/// Worklist column holding the merge (row) identifier
pub const MERGE_ID_COLUMN: &str = "merge_id";
/// Worklist column holding the merge definition JSON path
pub const JSON_PATH_COLUMN: &str = "json_path";
/// Worklist column holding the alignment path
pub const ALIGNMENT_PATH_COLUMN: &str = "cram_path";

/// Columns every worklist must provide; any others are ignored
pub const REQUIRED_COLUMNS: [&str; 4] = [
    SAMPLE_COLUMN,
    MERGE_ID_COLUMN,
    JSON_PATH_COLUMN,
    ALIGNMENT_PATH_COLUMN,
];

/// One row of a worklist: a merged alignment and its merge definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorklistRow {
    /// 1-based line (TSV) or row (XLSX) number, header included
    pub line: usize,
    pub sample_id: String,
    pub merge_id: String,
    pub json_path: PathBuf,
    pub alignment_path: PathBuf,
}
