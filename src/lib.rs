//! # pdfsift
//!
//! Batch extraction of text, tables, and embedded images from academic PDF
//! documents.
//!
//! For every PDF in an input directory, pdfsift writes one output directory
//! containing page-marked Markdown text, an xlsx workbook with one sheet per
//! detected table, and the document's embedded images as standalone files.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsift::{ExtractionConfig, Extractor};
//!
//! fn main() -> pdfsift::Result<()> {
//!     let config = ExtractionConfig::new()
//!         .with_input_dir("./docs")
//!         .with_output_root("./extracted_content");
//!
//!     let report = Extractor::new().with_config(config).run()?;
//!     println!("Processed {} document(s)", report.total_documents());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Page-marked text**: one Markdown file per document, one header per page
//! - **Table detection**: aligned text spans grouped into rectangular grids,
//!   one xlsx sheet per table
//! - **Image extraction**: embedded images written in their native encoding,
//!   no re-encoding
//! - **Batch reports**: per-document success or failure, aggregated across
//!   the run

pub mod batch;
pub mod config;
pub mod discover;
pub mod error;
pub mod extract;
pub mod model;
pub mod sink;

// Re-export commonly used types
pub use batch::{BatchReport, DocumentReport, FailedDocument};
pub use config::ExtractionConfig;
pub use error::{Error, Result};
pub use extract::{
    DocumentImageSource, DocumentImages, DocumentText, DocumentTextTableSource, PdfImageSource,
    PdfTextTableSource, TableDetector, TableDetectorConfig, TextSpan,
};
pub use model::{ExtractedImage, ExtractedTable, Metadata, PageContent};

use std::path::Path;

/// Extract one document with the default PDF sources, writing its results
/// under the default output root.
///
/// # Example
///
/// ```no_run
/// let report = pdfsift::extract_file("docs/paper1.pdf").unwrap();
/// println!("{} table(s), {} image(s)", report.tables, report.images);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<DocumentReport> {
    Extractor::new().extract_file(path)
}

/// Run a batch over the configured input directory with the default PDF
/// sources.
///
/// # Example
///
/// ```no_run
/// use pdfsift::ExtractionConfig;
///
/// let config = ExtractionConfig::new().with_input_dir("./docs");
/// let report = pdfsift::run(config).unwrap();
/// println!("{} succeeded, {} failed", report.succeeded.len(), report.failed.len());
/// ```
pub fn run(config: ExtractionConfig) -> Result<BatchReport> {
    Extractor::new().with_config(config).run()
}

/// Builder wiring extraction sources to the batch pipeline.
///
/// The defaults use the PDF-backed sources; either capability can be
/// swapped for another implementation without touching the pipeline.
///
/// # Example
///
/// ```no_run
/// use pdfsift::{ExtractionConfig, Extractor};
///
/// let report = Extractor::new()
///     .with_config(ExtractionConfig::new().with_input_dir("./papers"))
///     .run()?;
/// # Ok::<(), pdfsift::Error>(())
/// ```
pub struct Extractor {
    config: ExtractionConfig,
    text_source: Box<dyn DocumentTextTableSource>,
    image_source: Box<dyn DocumentImageSource>,
}

impl Extractor {
    /// Create an extractor with the default configuration and PDF sources.
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
            text_source: Box::new(PdfTextTableSource::new()),
            image_source: Box::new(PdfImageSource::new()),
        }
    }

    /// Set the extraction configuration.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the text and table source.
    pub fn with_text_source(mut self, source: Box<dyn DocumentTextTableSource>) -> Self {
        self.text_source = source;
        self
    }

    /// Replace the image source.
    pub fn with_image_source(mut self, source: Box<dyn DocumentImageSource>) -> Self {
        self.image_source = source;
        self
    }

    /// Process a single document and write its output bundle.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentReport> {
        batch::process_document(
            &self.config,
            self.text_source.as_ref(),
            self.image_source.as_ref(),
            path.as_ref(),
        )
    }

    /// Process every matching document in the configured input directory.
    pub fn run(&self) -> Result<BatchReport> {
        batch::run_batch(
            &self.config,
            self.text_source.as_ref(),
            self.image_source.as_ref(),
        )
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubTextSource;

    impl DocumentTextTableSource for StubTextSource {
        fn name(&self) -> &str {
            "stub"
        }

        fn extract(&self, _path: &Path) -> Result<DocumentText> {
            Ok(DocumentText {
                metadata: Metadata::default(),
                pages: vec![PageContent::new(1, "stub text")],
            })
        }
    }

    struct StubImageSource;

    impl DocumentImageSource for StubImageSource {
        fn name(&self) -> &str {
            "stub"
        }

        fn extract(&self, _path: &Path) -> Result<DocumentImages> {
            Ok(DocumentImages::default())
        }
    }

    #[test]
    fn test_extractor_defaults_to_pdf_sources() {
        let extractor = Extractor::new();
        assert_eq!(extractor.text_source.name(), "pdf");
        assert_eq!(extractor.image_source.name(), "pdf");
    }

    #[test]
    fn test_extractor_sources_are_swappable() {
        let extractor = Extractor::new()
            .with_text_source(Box::new(StubTextSource))
            .with_image_source(Box::new(StubImageSource));
        assert_eq!(extractor.text_source.name(), "stub");
        assert_eq!(extractor.image_source.name(), "stub");
    }

    #[test]
    fn test_extract_file_writes_bundle() {
        let output = tempfile::tempdir().unwrap();
        let config = ExtractionConfig::new().with_output_root(output.path());

        let extractor = Extractor::new()
            .with_config(config)
            .with_text_source(Box::new(StubTextSource))
            .with_image_source(Box::new(StubImageSource));

        let report = extractor.extract_file("docs/sample.pdf").unwrap();
        assert_eq!(report.pages, 1);
        assert_eq!(report.output_dir, output.path().join("sample"));
        assert!(report.markdown_path.exists());
        assert!(report.spreadsheet_path.is_none());
    }
}
