use crate::book::Book;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx, XlsxError};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// Number format applied to date-time cells on write
const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(e.to_string()),
    }
}

fn parse_err(e: XlsxError) -> SheetError {
    SheetError::Parse(e.to_string())
}

fn serialize_err(e: rust_xlsxwriter::XlsxError) -> SheetError {
    SheetError::Serialize(e.to_string())
}

/// Turn a used range into a sheet anchored at cell A1.
///
/// calamine ranges start at the first used cell; leading blank rows and
/// columns are restored so column positions stay absolute.
fn range_to_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let lead_cols = start_col as usize;

    let mut grid: Vec<Vec<CellValue>> = Vec::with_capacity(start_row as usize + range.height());
    for _ in 0..start_row {
        grid.push(Vec::new());
    }
    for row in range.rows() {
        let mut cells = vec![CellValue::Null; lead_cols];
        cells.extend(row.iter().map(data_to_cell_value));
        grid.push(cells);
    }

    Sheet::from_grid(name, grid)
}

fn read_book<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> Result<Book> {
    let sheet_names: Vec<String> = workbook.sheet_names().iter().map(|s| s.to_string()).collect();
    let mut book = Book::new();

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(parse_err)?;
        book.add_sheet(&sheet_name, range_to_sheet(&sheet_name, &range))?;
    }

    Ok(book)
}

/// Write a sheet (header first, no index column) into a worksheet
fn write_to_worksheet(sheet: &Sheet, worksheet: &mut Worksheet, datetime: &Format) -> Result<()> {
    worksheet.set_name(sheet.name()).map_err(serialize_err)?;

    let header = std::iter::once(sheet.header());
    for (row_idx, row) in header.chain(sheet.rows().map(Vec::as_slice)).enumerate() {
        let row_num = u32::try_from(row_idx)
            .map_err(|_| SheetError::Serialize("Row index overflow".to_string()))?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = u16::try_from(col_idx)
                .map_err(|_| SheetError::Serialize("Column index overflow".to_string()))?;

            match cell {
                CellValue::Null => {} // Leave empty
                CellValue::Bool(b) => {
                    worksheet
                        .write_boolean(row_num, col_num, *b)
                        .map_err(serialize_err)?;
                }
                CellValue::Int(i) => {
                    // Note: Excel stores all numbers as f64, so integers > 2^53
                    // may lose precision
                    worksheet
                        .write_number(row_num, col_num, *i as f64)
                        .map_err(serialize_err)?;
                }
                CellValue::Float(f) => {
                    worksheet
                        .write_number(row_num, col_num, *f)
                        .map_err(serialize_err)?;
                }
                CellValue::DateTime(serial) => {
                    worksheet
                        .write_number_with_format(row_num, col_num, *serial, datetime)
                        .map_err(serialize_err)?;
                }
                CellValue::String(s) => {
                    worksheet
                        .write_string(row_num, col_num, s)
                        .map_err(serialize_err)?;
                }
            }
        }
    }

    Ok(())
}

impl Book {
    /// Load a book from an in-memory Excel document (all sheets)
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Parse`] if the bytes are not a readable xlsx document.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook: Xlsx<Cursor<&[u8]>> =
            open_workbook_from_rs(Cursor::new(bytes)).map_err(parse_err)?;
        read_book(&mut workbook)
    }

    /// Load a book from an Excel file (all sheets)
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or read.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut workbook: Xlsx<BufReader<File>> =
            open_workbook_from_rs(BufReader::new(file)).map_err(parse_err)?;
        read_book(&mut workbook)
    }

    /// Get sheet names from an in-memory Excel document without loading data
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Parse`] if the bytes are not a readable xlsx document.
    pub fn xlsx_sheet_names_from_bytes(bytes: &[u8]) -> Result<Vec<String>> {
        let workbook: Xlsx<Cursor<&[u8]>> =
            open_workbook_from_rs(Cursor::new(bytes)).map_err(parse_err)?;
        Ok(workbook.sheet_names().iter().map(|s| s.to_string()).collect())
    }

    fn to_workbook(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let datetime = Format::new().set_num_format(DATETIME_NUM_FORMAT);

        for (_, sheet) in self.sheets() {
            let worksheet = workbook.add_worksheet();
            write_to_worksheet(sheet, worksheet, &datetime)?;
        }

        Ok(workbook)
    }

    /// Serialize the book to an in-memory Excel document
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Serialize`] if a sheet cannot be written.
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        self.to_workbook()?.save_to_buffer().map_err(serialize_err)
    }

    /// Save the book to an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_xlsx_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_book() -> Book {
        let mut book = Book::new();
        book.add_sheet(
            "Numbers",
            Sheet::from_grid("Numbers", vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]),
        )
        .unwrap();
        book.add_sheet(
            "Letters",
            Sheet::from_grid("Letters", vec![vec!["x"], vec!["y"], vec!["z"]]),
        )
        .unwrap();
        book
    }

    #[test]
    fn test_bytes_roundtrip_keeps_sheet_order() {
        let bytes = sample_book().to_xlsx_bytes().unwrap();
        let loaded = Book::from_xlsx_bytes(&bytes).unwrap();

        assert_eq!(loaded.sheet_names(), vec!["Numbers", "Letters"]);
        let numbers = loaded.get_sheet("Numbers").unwrap();
        assert_eq!(numbers.columns(), ["a", "b", "c"]);
        assert_eq!(numbers.row_count(), 1);
        assert_eq!(loaded.get_sheet("Letters").unwrap().row_count(), 2);
    }

    #[test]
    fn test_xlsx_types() {
        let sheet = Sheet::from_header_and_rows(
            "Types",
            vec![
                CellValue::from("text"),
                CellValue::from("int"),
                CellValue::from("float"),
                CellValue::from("bool"),
                CellValue::from("date"),
            ],
            vec![vec![
                CellValue::from("hello"),
                CellValue::Int(42),
                CellValue::Float(3.5),
                CellValue::Bool(true),
                CellValue::DateTime(45292.0),
            ]],
        );
        let mut book = Book::new();
        book.add_sheet("Types", sheet).unwrap();

        let loaded = Book::from_xlsx_bytes(&book.to_xlsx_bytes().unwrap()).unwrap();
        let sheet = loaded.get_sheet("Types").unwrap();

        assert_eq!(sheet.get(0, 0).unwrap(), &CellValue::from("hello"));
        // Int becomes a number in Excel
        assert_eq!(sheet.get(0, 1).unwrap().as_str(), "42");
        assert_eq!(sheet.get(0, 2).unwrap(), &CellValue::Float(3.5));
        assert_eq!(sheet.get(0, 3).unwrap(), &CellValue::Bool(true));
        assert_eq!(sheet.get(0, 4).unwrap().as_str(), "2024-01-01 00:00:00");
    }

    #[test]
    fn test_leading_blank_column_keeps_positions() {
        let sheet = Sheet::from_header_and_rows(
            "Offset",
            vec![CellValue::Null, CellValue::from("b")],
            vec![vec![CellValue::Null, CellValue::from("v")]],
        );
        let mut book = Book::new();
        book.add_sheet("Offset", sheet).unwrap();

        let loaded = Book::from_xlsx_bytes(&book.to_xlsx_bytes().unwrap()).unwrap();
        let sheet = loaded.get_sheet("Offset").unwrap();

        assert_eq!(sheet.col_count(), 2);
        assert_eq!(sheet.columns(), ["Unnamed: 0", "b"]);
        assert_eq!(sheet.get(0, 1).unwrap(), &CellValue::from("v"));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xlsx");

        sample_book().save_as_xlsx(&path).unwrap();
        let loaded = Book::from_xlsx(&path).unwrap();

        assert_eq!(loaded.sheet_count(), 2);
        assert!(loaded.has_sheet("Numbers"));
        assert!(loaded.has_sheet("Letters"));
    }

    #[test]
    fn test_sheet_names_from_bytes() {
        let bytes = sample_book().to_xlsx_bytes().unwrap();
        let names = Book::xlsx_sheet_names_from_bytes(&bytes).unwrap();
        assert_eq!(names, vec!["Numbers".to_string(), "Letters".to_string()]);
    }

    #[test]
    fn test_garbage_bytes_are_parse_errors() {
        let result = Book::from_xlsx_bytes(b"definitely not a zip archive");
        assert!(matches!(result, Err(SheetError::Parse(_))));
    }
}
