//! Match key normalization.

use keyfill_sheet::CellValue;

/// Normalized matching key for a key-column cell.
///
/// The key is the cell's canonical text with surrounding whitespace removed,
/// so the number `123` and the text `" 123 "` produce the same key. Text is
/// compared case-sensitively. Blank cells have no key and never match.
///
/// Booleans key as `True`/`False`, the spelling of the text cells they are
/// expected to line up with.
#[must_use]
pub fn match_key(cell: &CellValue) -> Option<String> {
    let text = match cell {
        CellValue::Bool(true) => "True".to_string(),
        CellValue::Bool(false) => "False".to_string(),
        other => other.as_str(),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}

/// Key of the cell at `col` in `row`, if the row has such a cell.
#[must_use]
pub fn row_key(row: &[CellValue], col: usize) -> Option<String> {
    row.get(col).and_then(match_key)
}
