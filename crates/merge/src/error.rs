//! Error types for the merge engine.

use keyfill_sheet::SheetError;
use std::fmt;
use thiserror::Error;

/// Result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Which side of the merge a sheet plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetRole {
    Target,
    Source,
}

impl fmt::Display for SheetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetRole::Target => write!(f, "target"),
            SheetRole::Source => write!(f, "source"),
        }
    }
}

/// Errors that abort a merge. No output is produced when one is returned.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The workbook has fewer sheets than the merge needs.
    #[error("Workbook has {found} sheet(s); at least {required} are required")]
    InsufficientSheets { found: usize, required: usize },

    /// A requested sheet name is not in the workbook.
    #[error("Sheet not found in workbook: '{name}'")]
    UnknownSheet { name: String },

    /// Target and source resolve to the same sheet.
    #[error("Target and source must be different sheets (both are '{name}')")]
    SameSheet { name: String },

    /// A sheet is too narrow to hold its key column.
    /// `position` is 1-based, as shown in spreadsheet applications.
    #[error("{role} sheet '{sheet}' is too narrow: column {position} does not exist")]
    ColumnBounds {
        sheet: String,
        role: SheetRole,
        position: usize,
    },

    /// The uploaded document is not a well-formed spreadsheet.
    #[error("Could not read spreadsheet: {0}")]
    Parse(String),

    /// Any other failure, with the full diagnostic chain.
    #[error("Unexpected error: {0}")]
    Unclassified(String),
}

impl MergeError {
    /// Stable machine-readable tag for the error class.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            MergeError::InsufficientSheets { .. } => "insufficient_sheets",
            MergeError::UnknownSheet { .. } => "unknown_sheet",
            MergeError::SameSheet { .. } => "same_sheet",
            MergeError::ColumnBounds { .. } => "column_bounds",
            MergeError::Parse(_) => "parse",
            MergeError::Unclassified(_) => "unclassified",
        }
    }

    /// Whether the error is a precondition failure the user can fix by
    /// choosing other sheets or fixing the layout.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            MergeError::InsufficientSheets { .. }
                | MergeError::UnknownSheet { .. }
                | MergeError::SameSheet { .. }
                | MergeError::ColumnBounds { .. }
        )
    }
}

impl From<SheetError> for MergeError {
    fn from(err: SheetError) -> Self {
        match err {
            SheetError::Parse(message) => MergeError::Parse(message),
            SheetError::SheetNotFound { name } => MergeError::UnknownSheet { name },
            other => MergeError::Unclassified(format!("{other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_bounds_message() {
        let err = MergeError::ColumnBounds {
            sheet: "Sheet1".to_string(),
            role: SheetRole::Target,
            position: 9,
        };
        assert_eq!(
            err.to_string(),
            "target sheet 'Sheet1' is too narrow: column 9 does not exist"
        );
        assert_eq!(err.kind(), "column_bounds");
        assert!(err.is_precondition());
    }

    #[test]
    fn test_sheet_error_mapping() {
        let parse: MergeError = SheetError::Parse("bad zip".to_string()).into();
        assert!(matches!(parse, MergeError::Parse(ref m) if m == "bad zip"));
        assert!(!parse.is_precondition());

        let other: MergeError = SheetError::Serialize("too long".to_string()).into();
        assert!(matches!(other, MergeError::Unclassified(ref m) if m.contains("too long")));
        assert_eq!(other.kind(), "unclassified");
    }
}
