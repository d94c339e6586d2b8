//! Table model for detected tabular content.

use serde::{Deserialize, Serialize};

/// A table detected on one page: a rectangular grid of cell strings.
///
/// The grid is mapping-free: the first row is ordinary data, never an
/// inferred header. Cell strings may be empty where the grid had gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTable {
    /// Page the table was found on (1-based).
    pub page: u32,
    /// Index of the table within its page (1-based).
    pub index: u32,
    /// Rows of cell values, outer Vec is rows, inner Vec is columns.
    pub rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    /// Create a table from raw rows.
    pub fn new(page: u32, index: u32, rows: Vec<Vec<String>>) -> Self {
        Self { page, index, rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (width of the widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sheet name used when the table is written to the spreadsheet.
    ///
    /// Encodes page number and per-page index, which keeps sheet names
    /// unique within a document.
    pub fn sheet_name(&self) -> String {
        format!("第{}页_表{}", self.page, self.index)
    }
}
