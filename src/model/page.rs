//! Page-level content.

use super::ExtractedTable;
use serde::{Deserialize, Serialize};

/// Text and tables extracted from a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-based).
    pub number: u32,
    /// Plain text in reading order. May be empty for image-only pages.
    pub text: String,
    /// Tables found on the page, ordered by position, indices 1..k.
    pub tables: Vec<ExtractedTable>,
}

impl PageContent {
    /// Create page content.
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            tables: Vec::new(),
        }
    }

    /// Attach tables to the page.
    pub fn with_tables(mut self, tables: Vec<ExtractedTable>) -> Self {
        self.tables = tables;
        self
    }

    /// Whether the page has neither text nor tables.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.tables.is_empty()
    }
}
