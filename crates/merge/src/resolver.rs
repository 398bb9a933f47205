//! Target/source sheet selection.

use crate::error::{MergeError, MergeResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of sheets a workbook needs when no sheet is chosen explicitly.
pub const MIN_SHEETS: usize = 2;

const TARGET_MARKERS: [&str; 2] = ["1", "一"];
const SOURCE_MARKERS: [&str; 2] = ["2", "二"];

/// Caller overrides for the sheet selection. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSelection {
    pub target: Option<String>,
    pub source: Option<String>,
}

impl SheetSelection {
    /// Select both sheets explicitly.
    pub fn new(target: impl Into<String>, source: impl Into<String>) -> Self {
        SheetSelection {
            target: Some(target.into()),
            source: Some(source.into()),
        }
    }

    /// Whether neither side is overridden.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.target.is_none() && self.source.is_none()
    }
}

/// The sheets a merge will run on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSheets {
    pub target: String,
    pub source: String,
}

fn first_marked(names: &[String], markers: &[&str]) -> Option<usize> {
    names
        .iter()
        .position(|name| markers.iter().any(|m| name.contains(m)))
}

/// Default `(target, source)` indices for a list of sheet names.
///
/// The first name containing `1`/`一` is the target and the first containing
/// `2`/`二` the source, falling back to positions 0 and 1. When both land on
/// the same sheet the source moves to the next sheet, wrapping around.
/// With a single sheet the fallback positions are returned unchanged.
#[must_use]
pub fn default_indices(names: &[String]) -> (usize, usize) {
    if names.len() <= 1 {
        return (0, 1);
    }

    let target = first_marked(names, &TARGET_MARKERS).unwrap_or(0);
    let mut source = first_marked(names, &SOURCE_MARKERS).unwrap_or(1);

    if target == source {
        source = (target + 1) % names.len();
    }

    (target, source)
}

/// Resolve the target and source sheet names.
///
/// The two-sheet minimum only applies when the caller supplied no override.
pub fn resolve(names: &[String], selection: &SheetSelection) -> MergeResult<ResolvedSheets> {
    if selection.is_default() && names.len() < MIN_SHEETS {
        return Err(MergeError::InsufficientSheets {
            found: names.len(),
            required: MIN_SHEETS,
        });
    }

    let (default_target, default_source) = default_indices(names);
    let target = pick(names, selection.target.as_deref(), default_target)?;
    let source = pick(names, selection.source.as_deref(), default_source)?;

    if target == source {
        return Err(MergeError::SameSheet { name: target });
    }

    debug!(%target, %source, "resolved sheets");
    Ok(ResolvedSheets { target, source })
}

fn pick(names: &[String], requested: Option<&str>, default: usize) -> MergeResult<String> {
    match requested {
        Some(name) if names.iter().any(|n| n == name) => Ok(name.to_string()),
        Some(name) => Err(MergeError::UnknownSheet {
            name: name.to_string(),
        }),
        None => names
            .get(default)
            .cloned()
            .ok_or(MergeError::InsufficientSheets {
                found: names.len(),
                required: MIN_SHEETS,
            }),
    }
}
