//! The merge pipeline: resolve sheets, match and copy, serialize.

use crate::columns::{column_letter, SOURCE_KEY_COLUMN, TARGET_KEY_COLUMN};
use crate::error::MergeResult;
use crate::matcher::{merge_sheets, MergeStats};
use crate::resolver::{default_indices, resolve, ResolvedSheets, SheetSelection};
use crate::serializer::write_output;
use keyfill_sheet::Book;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Whether a successful merge found anything to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStatus {
    Matched,
    NoMatches,
}

impl MergeStatus {
    #[must_use]
    pub fn from_matched_rows(matched_rows: usize) -> Self {
        if matched_rows == 0 {
            MergeStatus::NoMatches
        } else {
            MergeStatus::Matched
        }
    }

    /// Stable tag, as used in the `X-Merge-Status` header.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStatus::Matched => "matched",
            MergeStatus::NoMatches => "no_matches",
        }
    }
}

/// Result of a successful merge.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The output xlsx document.
    pub bytes: Vec<u8>,
    pub sheets: ResolvedSheets,
    pub stats: MergeStats,
    pub status: MergeStatus,
}

impl MergeOutcome {
    #[must_use]
    pub fn matched_rows(&self) -> usize {
        self.stats.matched_rows
    }

    /// User-facing summary of the run.
    #[must_use]
    pub fn message(&self) -> String {
        match self.status {
            MergeStatus::Matched => format!(
                "Done: {} of {} row(s) in '{}' filled from '{}'.",
                self.stats.matched_rows,
                self.stats.target_rows,
                self.sheets.target,
                self.sheets.source
            ),
            MergeStatus::NoMatches => format!(
                "No rows matched. Check that column {} of '{}' and column {} of '{}' \
                 hold the same keys.",
                column_letter(TARGET_KEY_COLUMN),
                self.sheets.target,
                column_letter(SOURCE_KEY_COLUMN),
                self.sheets.source
            ),
        }
    }
}

/// Sheet names of an uploaded workbook plus the default selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbookInfo {
    pub sheets: Vec<String>,
    pub default_target: Option<String>,
    pub default_source: Option<String>,
}

/// List the sheets of an xlsx document and the default target/source.
pub fn inspect_workbook(bytes: &[u8]) -> MergeResult<WorkbookInfo> {
    let sheets = Book::xlsx_sheet_names_from_bytes(bytes)?;
    let (target, source) = default_indices(&sheets);
    Ok(WorkbookInfo {
        default_target: sheets.get(target).cloned(),
        default_source: sheets.get(source).cloned(),
        sheets,
    })
}

/// Run the whole merge on an xlsx document.
///
/// Either the complete output document is returned or an error; there is no
/// partial output. Zero matches is a success with [`MergeStatus::NoMatches`].
pub fn merge_workbook(bytes: &[u8], selection: &SheetSelection) -> MergeResult<MergeOutcome> {
    let mut book = Book::from_xlsx_bytes(bytes)?;
    let names: Vec<String> = book.sheet_names().into_iter().map(String::from).collect();
    let sheets = resolve(&names, selection)?;

    let mut target = book.take_sheet(&sheets.target)?;
    let source = book.take_sheet(&sheets.source)?;

    let stats = merge_sheets(&mut target, &source)?;
    let status = MergeStatus::from_matched_rows(stats.matched_rows);
    let bytes = write_output(target, source)?;

    info!(
        target = %sheets.target,
        source = %sheets.source,
        matched_rows = stats.matched_rows,
        target_rows = stats.target_rows,
        source_rows = stats.source_rows,
        status = status.as_str(),
        "merge complete"
    );

    Ok(MergeOutcome {
        bytes,
        sheets,
        stats,
        status,
    })
}
