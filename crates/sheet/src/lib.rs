//! Sheet/Book module for keyfill
//!
//! Provides the tabular model the merge engine works on: a [`Book`] of named
//! [`Sheet`]s, each a header row plus data rows of [`CellValue`]s, with xlsx
//! reading (calamine) and writing (rust_xlsxwriter) in memory or on disk.
//!
//! # Examples
//!
//! ```
//! use keyfill_sheet::{Book, CellValue, Sheet};
//!
//! let sheet = Sheet::from_grid("Orders", vec![
//!     vec!["Id", "Qty"],
//!     vec!["A1", "3"],
//! ]);
//! assert_eq!(sheet.columns(), ["Id", "Qty"]);
//! assert_eq!(sheet.get(0, 1).unwrap(), &CellValue::from("3"));
//!
//! let mut book = Book::new();
//! book.add_sheet("Orders", sheet).unwrap();
//! let bytes = book.to_xlsx_bytes().unwrap();
//! let loaded = Book::from_xlsx_bytes(&bytes).unwrap();
//! assert_eq!(loaded.sheet_names(), vec!["Orders"]);
//! ```

mod book;
mod cell;
mod error;
mod sheet;
mod xlsx;

/// Re-export book type.
pub use book::Book;
/// Re-export cell value type and serial date conversion.
pub use cell::{excel_serial_to_datetime, CellValue};
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::{Sheet, APPENDED_COLUMN_PREFIX};
