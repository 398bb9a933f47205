//! # keyfill-merge
//!
//! Key-based row merge between two sheets of one workbook.
//!
//! Each row of the target sheet is matched on column I against column A of the
//! source sheet. For a match, source columns D..J are copied into target
//! columns Q..W. The result is a new workbook holding the updated target and
//! the untouched source.
//!
//! ```no_run
//! use keyfill_merge::{merge_workbook, MergeStatus, SheetSelection};
//!
//! let input = std::fs::read("upload.xlsx").unwrap();
//! let outcome = merge_workbook(&input, &SheetSelection::default()).unwrap();
//! if outcome.status == MergeStatus::NoMatches {
//!     eprintln!("{}", outcome.message());
//! }
//! std::fs::write("processed_file.xlsx", &outcome.bytes).unwrap();
//! ```

/// Fixed column positions.
pub mod columns;
/// The end-to-end pipeline.
pub mod engine;
/// Error types and result aliases.
pub mod error;
/// Key normalization.
pub mod key;
/// Reference map and row-wise copy.
pub mod matcher;
/// Target/source sheet selection.
pub mod resolver;
/// Output workbook writer.
pub mod serializer;

pub use engine::{inspect_workbook, merge_workbook, MergeOutcome, MergeStatus, WorkbookInfo};
pub use error::{MergeError, MergeResult, SheetRole};
pub use matcher::{merge_sheets, MergeStats, ReferenceMap};
pub use resolver::{ResolvedSheets, SheetSelection};
