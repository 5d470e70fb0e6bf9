//! Reconciliation of alignment read-groups against a merge definition.
//!
//! - [`engine::reconcile`]: ordered classification of one alignment/merge pair
//! - [`diagnosis::Diagnosis`]: the values behind a fault, for reporting
//!
//! ## Classification order
//!
//! The first failing check wins, so a row is reported with its most
//! specific fault only:
//!
//! | Check | Code |
//! |-------|------|
//! | Read-groups carry exactly one sample | 7 |
//! | That sample is the expected one | 6 |
//! | Merge carries the same sample | 5 |
//! | No barcode repeats in the alignment | 4 |
//! | No barcode repeats in the merge | 3 |
//! | Barcode sets are equal | 2 |

pub mod diagnosis;
pub mod engine;

pub use diagnosis::{Diagnosis, ReconciliationResult};
