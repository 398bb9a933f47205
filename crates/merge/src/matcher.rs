//! Reference map construction and the row-wise copy pass.

use crate::columns::{copy_pairs, SOURCE_KEY_COLUMN, TARGET_KEY_COLUMN, TARGET_MIN_WIDTH};
use crate::error::{MergeError, MergeResult, SheetRole};
use crate::key::row_key;
use indexmap::map::Entry;
use indexmap::IndexMap;
use keyfill_sheet::Sheet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Index from normalized source key to the first source row carrying it.
#[derive(Debug, Clone, Default)]
pub struct ReferenceMap {
    rows: IndexMap<String, usize>,
    duplicates: usize,
}

impl ReferenceMap {
    /// Build the map from the source sheet's key column.
    ///
    /// Later rows repeating a key are counted but never replace the first one.
    #[must_use]
    pub fn build(source: &Sheet) -> Self {
        let mut map = ReferenceMap::default();
        for (idx, row) in source.rows().enumerate() {
            let Some(key) = row_key(row, SOURCE_KEY_COLUMN) else {
                continue;
            };
            match map.rows.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
                Entry::Occupied(_) => map.duplicates += 1,
            }
        }
        map
    }

    /// Source row index for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<usize> {
        self.rows.get(key).copied()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Source rows skipped because their key was already present.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Counters describing one merge run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Target rows whose key matched a source row.
    pub matched_rows: usize,
    pub target_rows: usize,
    pub source_rows: usize,
    /// Source rows ignored for lookup because an earlier row had the same key.
    pub duplicate_source_keys: usize,
    /// Columns appended to the target sheet to reach the paste range.
    pub appended_columns: usize,
}

/// Check that both sheets contain their key column.
pub fn check_bounds(target: &Sheet, source: &Sheet) -> MergeResult<()> {
    if target.col_count() <= TARGET_KEY_COLUMN {
        return Err(MergeError::ColumnBounds {
            sheet: target.name().to_string(),
            role: SheetRole::Target,
            position: TARGET_KEY_COLUMN + 1,
        });
    }
    if source.col_count() <= SOURCE_KEY_COLUMN {
        return Err(MergeError::ColumnBounds {
            sheet: source.name().to_string(),
            role: SheetRole::Source,
            position: SOURCE_KEY_COLUMN + 1,
        });
    }
    Ok(())
}

/// Copy source columns D..J into target columns Q..W for every target row
/// whose column I key matches a source column A key.
///
/// Prior values in the paste columns are overwritten. Row count, row order and
/// every other column of the target are left as they were.
///
/// A matched row needs every copy position of the source sheet; a source
/// narrower than column J fails on the first match with
/// [`MergeError::ColumnBounds`]. With no matches a narrow source is fine.
pub fn merge_sheets(target: &mut Sheet, source: &Sheet) -> MergeResult<MergeStats> {
    check_bounds(target, source)?;

    let reference = ReferenceMap::build(source);
    if reference.duplicates() > 0 {
        warn!(
            sheet = source.name(),
            duplicates = reference.duplicates(),
            "duplicate source keys; first occurrence wins"
        );
    }

    let appended_columns = target.ensure_columns(TARGET_MIN_WIDTH);
    if appended_columns > 0 {
        debug!(sheet = target.name(), appended_columns, "widened target sheet");
    }

    let mut matched_rows = 0;
    for row in target.rows_mut() {
        let key = row_key(row.as_slice(), TARGET_KEY_COLUMN);
        let Some(source_idx) = key.and_then(|k| reference.get(&k)) else {
            continue;
        };
        let source_row = source.row(source_idx)?;

        for (from, to) in copy_pairs() {
            let value = source_row.get(from).ok_or_else(|| MergeError::ColumnBounds {
                sheet: source.name().to_string(),
                role: SheetRole::Source,
                position: from + 1,
            })?;
            // Always present once the target has been widened
            if let Some(cell) = row.get_mut(to) {
                *cell = value.clone();
            }
        }
        matched_rows += 1;
    }

    Ok(MergeStats {
        matched_rows,
        target_rows: target.row_count(),
        source_rows: source.row_count(),
        duplicate_source_keys: reference.duplicates(),
        appended_columns,
    })
}
