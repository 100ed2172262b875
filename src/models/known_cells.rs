//! Versioned list of known topology cells.

use serde::{Deserialize, Serialize};

/// The versioned cell list handed out to clients.
///
/// If `version` hasn't changed between two reads, `cells` is the same.
/// Field names are PascalCase on the wire (`Version`, `Cells`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct KnownCells {
    /// Version of this object, bumped on every content change
    pub version: u64,

    /// Known cells in the order the topology service reported them
    pub cells: Vec<String>,
}

impl KnownCells {
    /// Replace the cell list if it differs from the current one.
    ///
    /// Comparison is element-wise, so a reordering counts as a change.
    /// Returns `true` when the version was bumped.
    pub fn apply(&mut self, cells: Vec<String>) -> bool {
        if self.cells == cells {
            return false;
        }
        self.cells = cells;
        self.version += 1;
        true
    }

    /// Drop the cell list but keep the version, so the next `apply` of any
    /// non-empty list is seen as a change.
    pub fn reset_cells(&mut self) {
        self.cells.clear();
    }

    /// Encode as pretty-printed JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }
}
