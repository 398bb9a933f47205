//! Output workbook construction.

use crate::error::MergeResult;
use keyfill_sheet::{Book, Sheet};

/// Serialize the merged target and the source into a two-sheet xlsx document.
///
/// Sheets keep their original names and are written target first, each with
/// its header as the first row.
pub fn write_output(target: Sheet, source: Sheet) -> MergeResult<Vec<u8>> {
    let mut book = Book::new();
    let target_name = target.name().to_string();
    let source_name = source.name().to_string();
    book.add_sheet(&target_name, target)?;
    book.add_sheet(&source_name, source)?;
    Ok(book.to_xlsx_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MergeError;

    #[test]
    fn test_output_has_two_sheets_in_order() {
        let target = Sheet::from_grid("Zeta", vec![vec!["t"], vec!["1"]]);
        let source = Sheet::from_grid("Alpha", vec![vec!["s"], vec!["2"], vec!["3"]]);

        let bytes = write_output(target, source).unwrap();
        let book = Book::from_xlsx_bytes(&bytes).unwrap();

        assert_eq!(book.sheet_names(), vec!["Zeta", "Alpha"]);
        assert_eq!(book.get_sheet("Zeta").unwrap().row_count(), 1);
        assert_eq!(book.get_sheet("Alpha").unwrap().row_count(), 2);
    }

    #[test]
    fn test_same_name_is_unclassified() {
        let err = write_output(Sheet::with_name("A"), Sheet::with_name("A")).unwrap_err();
        assert!(matches!(err, MergeError::Unclassified(_)));
    }
}
