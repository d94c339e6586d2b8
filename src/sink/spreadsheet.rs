//! Spreadsheet output, one sheet per extracted table.

use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::model::ExtractedTable;

/// Write tables to one workbook at `path`, one sheet per table.
///
/// Sheet names embed the page number and per-page table index, which keeps
/// them unique within the document. The first row of each sheet is the first
/// extracted row, written as ordinary data. With no tables, no file is
/// created.
pub fn write_spreadsheet<'a, T>(path: &Path, tables: T) -> Result<()>
where
    T: IntoIterator<Item = &'a ExtractedTable>,
{
    let tables: Vec<&ExtractedTable> = tables.into_iter().collect();
    if tables.is_empty() {
        return Ok(());
    }

    let mut workbook = Workbook::new();
    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(table.sheet_name())?;
        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                worksheet.write_string(row_idx as u32, col_idx as u16, cell.as_str())?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
