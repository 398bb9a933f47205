//! Fixed column positions of the merge (0-based).
//!
//! Target rows are matched on column I against source column A, and source
//! columns D..J are copied into target columns Q..W position by position.

use std::ops::RangeInclusive;

/// Target key column (column I).
pub const TARGET_KEY_COLUMN: usize = 8;

/// Source key column (column A).
pub const SOURCE_KEY_COLUMN: usize = 0;

/// Source columns copied from a matched row (columns D..J).
pub const SOURCE_COPY_COLUMNS: RangeInclusive<usize> = 3..=9;

/// Target columns receiving the copied values (columns Q..W).
pub const TARGET_PASTE_COLUMNS: RangeInclusive<usize> = 16..=22;

/// Width the target sheet is widened to so every paste column exists.
pub const TARGET_MIN_WIDTH: usize = *TARGET_PASTE_COLUMNS.end() + 1;

/// `(source, target)` position pairs in copy order.
pub fn copy_pairs() -> impl Iterator<Item = (usize, usize)> {
    SOURCE_COPY_COLUMNS.zip(TARGET_PASTE_COLUMNS)
}

/// Spreadsheet column letter for a 0-based position (0 -> "A", 26 -> "AA").
#[must_use]
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_pairs_are_index_to_index() {
        let pairs: Vec<_> = copy_pairs().collect();
        assert_eq!(pairs.len(), 7);
        assert_eq!(pairs.first(), Some(&(3, 16)));
        assert_eq!(pairs.last(), Some(&(9, 22)));
        assert!(pairs.iter().all(|(s, t)| t - s == 13));
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(TARGET_KEY_COLUMN), "I");
        assert_eq!(column_letter(SOURCE_KEY_COLUMN), "A");
        assert_eq!(column_letter(*SOURCE_COPY_COLUMNS.start()), "D");
        assert_eq!(column_letter(*SOURCE_COPY_COLUMNS.end()), "J");
        assert_eq!(column_letter(*TARGET_PASTE_COLUMNS.start()), "Q");
        assert_eq!(column_letter(*TARGET_PASTE_COLUMNS.end()), "W");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
    }

    #[test]
    fn test_min_width_covers_paste_columns() {
        assert_eq!(TARGET_MIN_WIDTH, 23);
    }
}
