//! Serialization of extraction results to the per-document output tree.
//!
//! Each document gets one directory under the output root containing the
//! combined text file, a table workbook when any tables were found, and an
//! image subdirectory.

mod images;
mod markdown;
mod spreadsheet;

pub use images::write_images;
pub use markdown::render_markdown;
pub use spreadsheet::write_spreadsheet;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::extract::{DocumentImages, DocumentText};

/// File name of the combined text output within a document's directory.
pub const TEXT_FILE_NAME: &str = "text_content.md";

/// File name of the table workbook within a document's directory.
pub const SPREADSHEET_FILE_NAME: &str = "tables.xlsx";

/// Name of the image subdirectory within a document's directory.
pub const IMAGES_DIR_NAME: &str = "images";

/// Paths produced by writing one document's results.
#[derive(Debug, Clone)]
pub struct WrittenBundle {
    /// Combined text file.
    pub markdown_path: PathBuf,
    /// Table workbook, present only when at least one table was found.
    pub spreadsheet_path: Option<PathBuf>,
    /// Image directory, created even when empty.
    pub images_dir: PathBuf,
}

/// Write one document's extraction results under `output_dir`.
///
/// Creates the directory tree, writes the markdown text file, the table
/// workbook when any tables were found, and one file per image.
pub fn write_bundle(
    output_dir: &Path,
    source: &Path,
    text: &DocumentText,
    images: &DocumentImages,
) -> Result<WrittenBundle> {
    fs::create_dir_all(output_dir).map_err(|e| Error::write(output_dir, e))?;

    let source_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());

    let markdown_path = output_dir.join(TEXT_FILE_NAME);
    let content = render_markdown(&source_name, &text.pages);
    fs::write(&markdown_path, content).map_err(|e| Error::write(&markdown_path, e))?;

    let spreadsheet_path = if text.table_count() > 0 {
        let path = output_dir.join(SPREADSHEET_FILE_NAME);
        write_spreadsheet(&path, text.pages.iter().flat_map(|p| &p.tables))?;
        Some(path)
    } else {
        None
    };

    let images_dir = output_dir.join(IMAGES_DIR_NAME);
    write_images(&images_dir, &images.images)?;

    Ok(WrittenBundle {
        markdown_path,
        spreadsheet_path,
        images_dir,
    })
}
