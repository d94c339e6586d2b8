//! Batch processing across an input directory.
//!
//! Documents are processed strictly one after another. A failure in one
//! document is recorded in the batch report and the loop moves on to the
//! next document.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ExtractionConfig;
use crate::discover;
use crate::error::{Error, Result};
use crate::extract::{DocumentImageSource, DocumentTextTableSource};
use crate::model::Metadata;
use crate::sink;

/// Outcome of one successfully processed document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    /// Input document path.
    pub source: PathBuf,
    /// Directory the results were written to.
    pub output_dir: PathBuf,
    /// Document information read during extraction.
    pub metadata: Metadata,
    /// Number of pages.
    pub pages: usize,
    /// Number of tables across all pages.
    pub tables: usize,
    /// Number of images written.
    pub images: usize,
    /// Number of images that failed to decode and were skipped.
    pub images_failed: u32,
    /// Combined text file.
    pub markdown_path: PathBuf,
    /// Table workbook, present only when at least one table was found.
    pub spreadsheet_path: Option<PathBuf>,
    /// Image directory.
    pub images_dir: PathBuf,
}

/// A document that could not be processed.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDocument {
    /// Input document path.
    pub source: PathBuf,
    /// Why processing was aborted.
    pub error: String,
}

/// Aggregated outcome of one batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Documents processed to completion, in processing order.
    pub succeeded: Vec<DocumentReport>,
    /// Documents that were skipped after a failure, in processing order.
    pub failed: Vec<FailedDocument>,
}

impl BatchReport {
    /// Number of documents the batch attempted.
    pub fn total_documents(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Total tables written across all successful documents.
    pub fn total_tables(&self) -> usize {
        self.succeeded.iter().map(|d| d.tables).sum()
    }

    /// Total images written across all successful documents.
    pub fn total_images(&self) -> usize {
        self.succeeded.iter().map(|d| d.images).sum()
    }

    /// Whether any document failed.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Process one document: both extraction passes, then serialization.
pub fn process_document(
    config: &ExtractionConfig,
    text_source: &dyn DocumentTextTableSource,
    image_source: &dyn DocumentImageSource,
    path: &Path,
) -> Result<DocumentReport> {
    log::info!("Processing {}", path.display());
    let output_dir = config.document_output_dir(path);

    let text = text_source.extract(path)?;
    let images = image_source.extract(path)?;
    let bundle = sink::write_bundle(&output_dir, path, &text, &images)?;

    Ok(DocumentReport {
        source: path.to_path_buf(),
        output_dir,
        pages: text.page_count(),
        tables: text.table_count(),
        metadata: text.metadata,
        images: images.count(),
        images_failed: images.failed,
        markdown_path: bundle.markdown_path,
        spreadsheet_path: bundle.spreadsheet_path,
        images_dir: bundle.images_dir,
    })
}

/// Run the whole batch: discovery, per-document extraction, serialization.
///
/// Individual document failures are logged, recorded in the report, and the
/// loop continues with the next document. The error return is reserved for
/// conditions that prevent the batch from running at all: an unreadable
/// input directory, or no matching files in it.
pub fn run_batch(
    config: &ExtractionConfig,
    text_source: &dyn DocumentTextTableSource,
    image_source: &dyn DocumentImageSource,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for path in discover::documents_in(&config.input_dir, &config.extension)? {
        match process_document(config, text_source, image_source, &path) {
            Ok(doc) => report.succeeded.push(doc),
            Err(e) => {
                log::error!("Failed to process {}: {}", path.display(), e);
                report.failed.push(FailedDocument {
                    source: path,
                    error: e.to_string(),
                });
            }
        }
    }

    if report.total_documents() == 0 {
        return Err(Error::NoDocuments {
            dir: config.input_dir.clone(),
            extension: config.extension.clone(),
        });
    }

    Ok(report)
}
