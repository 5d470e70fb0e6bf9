//! # mplx-qc
//!
//! A library for checking merged alignments against their merge definitions.
//!
//! A merged alignment (BAM/CRAM) is built from several sequencing events of
//! one sample, each identified by a barcode. The merge definition JSON says
//! which events belong to the merge; the `@RG` lines of the alignment header
//! say which events were actually merged. `mplx-qc` reconciles the two for
//! every row of a worklist and classifies each row with a stable numeric
//! [`ErrorCode`].
//!
//! ## Features
//!
//! - **Both merge JSON generations**: current (`event.json`) and legacy keys
//! - **Composite platform units**: `PREFIX_..._BARCODE` and plain barcodes
//! - **Ambiguity detection**: repeated `PU`/`SM` tags never match anything
//! - **Ordered classification**: the most specific fault of a row wins
//! - **TSV and XLSX worklists**
//!
//! ## Report
//!
//! Each faulting worklist row is one tab-delimited line: code, merge id,
//! alignment path and JSON path. Those columns never name the values behind
//! a fault. The duplicated barcodes of codes 3 and 4, like the differing
//! barcodes of code 2, are written to the error log, and only reach stdout
//! when [`QcConfig::details`] (`check --details`) appends a fifth column
//! such as `duplicates=AAAA`.
//!
//! ## Example
//!
//! ```rust
//! use mplx_qc::matching::engine::{reconcile, ReconciliationInput};
//! use mplx_qc::parsing::read_group::parse_read_group_line;
//! use mplx_qc::parsing::merge_json::parse_merge_text;
//! use mplx_qc::ErrorCode;
//! use std::path::Path;
//!
//! let merge = parse_merge_text(
//!     r#"{"event_id": "M1", "library_name": "L1", "sequencing_events": {
//!         "AAAA": {"event_id": "AAAA", "sample_name": "NWD1", "reference": "hg38"}
//!     }}"#,
//!     Path::new("event.json"),
//! )
//! .unwrap();
//! let read_group = parse_read_group_line("@RG\tID:1\tPU:FC1_1_AAAA\tSM:NWD1").unwrap();
//!
//! let result = reconcile(&ReconciliationInput::new(&[read_group], &merge, "NWD1"));
//! assert_eq!(result.code, ErrorCode::Ok);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for merges, read-groups and worklist rows
//! - [`parsing`]: Parsers for merge JSON, alignment headers and worklists
//! - [`matching`]: Reconciliation engine and fault diagnostics
//! - [`batch`]: Worklist batch driver and report
//! - [`cli`]: Command-line interface implementation

pub mod batch;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use batch::{run_batch, QcConfig};
pub use core::merge::{MergeDefinition, SequencingEvent};
pub use core::read_group::{ReadGroupRecord, TagValue};
pub use core::types::*;
pub use matching::engine::reconcile;
