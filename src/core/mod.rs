//! Core data types for read-group reconciliation.
//!
//! - [`MergeDefinition`], [`SequencingEvent`]: a merge described by JSON
//! - [`ReadGroupRecord`], [`TagValue`]: barcode and sample of an `@RG` line
//! - [`WorklistRow`]: one row of the driving worklist
//! - [`ErrorCode`]: the stable classification space
//!
//! All of these are plain values, built fresh per worklist row and never
//! shared between rows.
//!
//! [`MergeDefinition`]: merge::MergeDefinition
//! [`SequencingEvent`]: merge::SequencingEvent
//! [`ReadGroupRecord`]: read_group::ReadGroupRecord
//! [`TagValue`]: read_group::TagValue
//! [`WorklistRow`]: worklist::WorklistRow
//! [`ErrorCode`]: types::ErrorCode

pub mod merge;
pub mod read_group;
pub mod types;
pub mod worklist;
