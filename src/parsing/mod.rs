//! Parsers for the inputs of a QC run.
//!
//! This module provides parsers for:
//!
//! - **Merge definition JSON**: Both schema generations into a [`MergeDefinition`](crate::core::merge::MergeDefinition)
//! - **SAM/BAM/CRAM headers**: Raw `@RG` lines via `samtools view -H` or in-process
//! - **Read-groups**: Barcode and sample of each `@RG` line
//! - **Worklists**: TSV files and XLSX workbooks
//!
//! ## Example
//!
//! ```rust,no_run
//! use mplx_qc::parsing::merge_json::parse_merge_file;
//! use mplx_qc::parsing::read_group::parse_read_group_lines;
//! use mplx_qc::parsing::sam::{HeaderReader, SamtoolsHeaderReader};
//! use std::path::Path;
//!
//! let merge = parse_merge_file(Path::new("M1/event.json")).unwrap();
//! let lines = SamtoolsHeaderReader::default()
//!     .read_group_lines(Path::new("NWD1.cram"))
//!     .unwrap();
//! for rg in parse_read_group_lines(lines.iter().map(String::as_str)) {
//!     println!("{:?}", rg);
//! }
//! ```
//!
//! ## Merge JSON keys
//!
//! | Field | Current (`event.json`) | Legacy |
//! |-------|------------------------|--------|
//! | Merge id | `event_id` | `eventId` |
//! | Library | `library_name` | `libName` |
//! | Events | `sequencing_events` | `seqEvents` |
//! | Event count | - | `seNum` |
//! | Event barcode | `event_id` | `eventId` |
//! | Event sample | `sample_name` | `sampleName` |
//! | Event reference | `reference` | `reference` |
//!
//! ## Read-group tags
//!
//! | Tag | Description | Required |
//! |-----|-------------|----------|
//! | PU  | Platform unit; the barcode is its last `_` segment | Yes |
//! | SM  | Sample | Yes |
//! | ID  | Read-group id | No |

pub mod merge_json;
pub mod read_group;
pub mod sam;
pub mod worklist;
