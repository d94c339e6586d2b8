//! Extraction capability traits and the PDF implementations behind them.
//!
//! The pipeline only sees two capabilities: something that produces ordered
//! page texts and tables for a document, and something that produces ordered
//! page images. The shipped implementations delegate to PDF libraries, but
//! the pipeline does not care which ones.

mod images;
mod spans;
mod tables;
mod text;

pub use images::PdfImageSource;
pub use spans::TextSpan;
pub use tables::{TableDetector, TableDetectorConfig};
pub use text::PdfTextTableSource;

use std::path::Path;

use crate::error::Result;
use crate::model::{ExtractedImage, Metadata, PageContent};

/// Per-page text and tables for one document, with its metadata.
#[derive(Debug, Clone)]
pub struct DocumentText {
    /// Document information.
    pub metadata: Metadata,
    /// Pages in increasing page-number order, one entry per page.
    pub pages: Vec<PageContent>,
}

impl DocumentText {
    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of tables across all pages.
    pub fn table_count(&self) -> usize {
        self.pages.iter().map(|p| p.tables.len()).sum()
    }
}

/// Embedded images for one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentImages {
    /// Images in page order, then within-page discovery order.
    pub images: Vec<ExtractedImage>,
    /// Images that failed to decode and were skipped.
    pub failed: u32,
}

impl DocumentImages {
    /// Number of successfully extracted images.
    pub fn count(&self) -> usize {
        self.images.len()
    }
}

/// Capability: produce ordered page texts and tables for a document.
pub trait DocumentTextTableSource {
    /// Implementation name, for logs and reports.
    fn name(&self) -> &str;

    /// Extract text, tables, and metadata from the document at `path`.
    fn extract(&self, path: &Path) -> Result<DocumentText>;
}

/// Capability: produce ordered page images for a document.
pub trait DocumentImageSource {
    /// Implementation name, for logs and reports.
    fn name(&self) -> &str;

    /// Extract every embedded image from the document at `path`.
    fn extract(&self, path: &Path) -> Result<DocumentImages>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExtractedTable;

    #[test]
    fn test_document_text_counts() {
        let mut page1 = PageContent::new(1, "hello");
        page1.tables.push(ExtractedTable::new(1, 1, vec![vec!["a".into()]]));
        let page2 = PageContent::new(2, "");
        let doc = DocumentText {
            metadata: Metadata::with_page_count(2),
            pages: vec![page1, page2],
        };
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.table_count(), 1);
    }

    #[test]
    fn test_document_images_default() {
        let images = DocumentImages::default();
        assert_eq!(images.count(), 0);
        assert_eq!(images.failed, 0);
    }
}
