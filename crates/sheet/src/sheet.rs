use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use std::collections::HashSet;

/// Prefix used for columns appended by [`Sheet::ensure_columns`].
pub const APPENDED_COLUMN_PREFIX: &str = "NewCol_";

/// A sheet with a header row and row-major data.
///
/// The header keeps the cells exactly as they were read so they can be written
/// back unchanged; `columns` holds the unique names derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    header: Vec<CellValue>,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            header: Vec::new(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Create a sheet from a header row and data rows.
    ///
    /// Short rows are padded with nulls. A row wider than the header widens the
    /// header with blank cells so every row has the same width.
    #[must_use]
    pub fn from_header_and_rows(
        name: &str,
        header: Vec<CellValue>,
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let mut header = header;
        header.resize(width, CellValue::Null);

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();

        let columns = column_names_from_header(&header);

        Sheet {
            name: name.to_string(),
            header,
            columns,
            rows,
        }
    }

    /// Create a sheet from a grid whose first row is the header
    #[must_use]
    pub fn from_grid<T: Into<CellValue>>(name: &str, grid: Vec<Vec<T>>) -> Self {
        let mut converted = grid
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect::<Vec<CellValue>>());
        let header = converted.next().unwrap_or_default();
        Self::from_header_and_rows(name, header, converted.collect())
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the number of data rows (the header is not counted)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the sheet has neither columns nor rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Header cells as read
    #[must_use]
    pub fn header(&self) -> &[CellValue] {
        &self.header
    }

    /// Unique column names, left to right
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    // ===== Cell Access =====

    /// Get a cell value by row and column index (0-based, header excluded)
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows: self.row_count(),
                cols: self.col_count(),
            })
    }

    /// Set a cell value by row and column index (0-based, header excluded)
    pub fn set<T: Into<CellValue>>(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let rows = self.row_count();
        let cols = self.col_count();
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            })?;
        *cell = value.into();
        Ok(())
    }

    /// Get an entire row by index (0-based)
    pub fn row(&self, index: usize) -> Result<&Vec<CellValue>> {
        self.rows.get(index).ok_or(SheetError::RowIndexOutOfBounds {
            index,
            count: self.row_count(),
        })
    }

    /// Iterate over data rows
    pub fn rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        self.rows.iter()
    }

    /// Iterate over data rows mutably.
    ///
    /// Callers must not change row lengths.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Vec<CellValue>> {
        self.rows.iter_mut()
    }

    // ===== Column Operations =====

    /// Ensure the sheet has at least `min` columns.
    ///
    /// Appends null-filled columns named `NewCol_{position}` (suffixed when the
    /// name is already taken). Existing columns keep their names and positions.
    /// Returns the number of appended columns.
    pub fn ensure_columns(&mut self, min: usize) -> usize {
        let mut appended = 0;
        while self.col_count() < min {
            let name = self.unique_column_name(&format!(
                "{APPENDED_COLUMN_PREFIX}{}",
                self.col_count()
            ));
            self.header.push(CellValue::String(name.clone()));
            self.columns.push(name);
            for row in &mut self.rows {
                row.push(CellValue::Null);
            }
            appended += 1;
        }
        appended
    }

    fn unique_column_name(&self, base: &str) -> String {
        if !self.columns.iter().any(|c| c == base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.columns.iter().any(|c| c == candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

/// Derive unique column names from header cells.
///
/// Blank headers become `Unnamed: {position}`; repeats of a name get a `.{n}`
/// suffix while the first occurrence keeps the bare name.
fn column_names_from_header(header: &[CellValue]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(header.len());
    let mut names = Vec::with_capacity(header.len());

    for (i, cell) in header.iter().enumerate() {
        let base = if cell.is_blank() {
            format!("Unnamed: {i}")
        } else {
            cell.as_str()
        };

        let mut name = base.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_grid_splits_header() {
        let sheet = Sheet::from_grid("S", vec![vec!["a", "b"], vec!["1", "2"], vec!["3", "4"]]);
        assert_eq!(sheet.columns(), ["a", "b"]);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.get(1, 1).unwrap(), &CellValue::from("4"));
    }

    #[test]
    fn test_blank_and_duplicate_headers() {
        let sheet = Sheet::from_header_and_rows(
            "S",
            vec![
                CellValue::from("id"),
                CellValue::Null,
                CellValue::from("id"),
                CellValue::from("id"),
                CellValue::Int(5),
            ],
            vec![],
        );
        assert_eq!(sheet.columns(), ["id", "Unnamed: 1", "id.1", "id.2", "5"]);
    }

    #[test]
    fn test_rows_are_padded_to_common_width() {
        let sheet = Sheet::from_header_and_rows(
            "S",
            vec![CellValue::from("a")],
            vec![vec![CellValue::Int(1), CellValue::Int(2)], vec![]],
        );
        assert_eq!(sheet.col_count(), 2);
        assert_eq!(sheet.header()[1], CellValue::Null);
        assert_eq!(sheet.row(1).unwrap().len(), 2);
    }

    #[test]
    fn test_ensure_columns_appends_named_columns() {
        let mut sheet = Sheet::from_grid("S", vec![vec!["a", "b"], vec!["x", "y"]]);
        let appended = sheet.ensure_columns(4);

        assert_eq!(appended, 2);
        assert_eq!(sheet.columns(), ["a", "b", "NewCol_2", "NewCol_3"]);
        assert_eq!(sheet.get(0, 0).unwrap(), &CellValue::from("x"));
        assert_eq!(sheet.get(0, 3).unwrap(), &CellValue::Null);
    }

    #[test]
    fn test_ensure_columns_is_noop_when_wide_enough() {
        let mut sheet = Sheet::from_grid("S", vec![vec!["a", "b", "c"]]);
        let before = sheet.clone();

        assert_eq!(sheet.ensure_columns(2), 0);
        assert_eq!(sheet.ensure_columns(3), 0);
        assert_eq!(sheet, before);
    }

    #[test]
    fn test_ensure_columns_avoids_name_collisions() {
        let mut sheet = Sheet::from_grid("S", vec![vec!["NewCol_1"]]);
        sheet.ensure_columns(2);
        assert_eq!(sheet.columns(), ["NewCol_1", "NewCol_1_1"]);
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut sheet = Sheet::from_grid("S", vec![vec!["a"], vec!["x"]]);
        assert!(sheet.set(0, 0, 9).is_ok());
        assert!(matches!(
            sheet.set(0, 1, 9),
            Err(SheetError::IndexOutOfBounds { .. })
        ));
    }
}
