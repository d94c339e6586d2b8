//! Configuration for batch extraction.

use std::path::{Path, PathBuf};

/// Configuration passed explicitly to discovery and extraction.
///
/// Defaults read `./docs`, write `./extracted_content`, and match the
/// `pdf` extension.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Directory scanned for input documents (non-recursive).
    pub input_dir: PathBuf,
    /// Root directory receiving one subdirectory per document.
    pub output_root: PathBuf,
    /// File extension to match, without the leading dot.
    pub extension: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./docs"),
            output_root: PathBuf::from("./extracted_content"),
            extension: "pdf".to_string(),
        }
    }
}

impl ExtractionConfig {
    /// Create a configuration with default paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input directory.
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Set the output root directory.
    pub fn with_output_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_root = dir.into();
        self
    }

    /// Set the extension filter. A leading dot is stripped and the
    /// extension is lowercased, so `".PDF"` and `"pdf"` are equivalent.
    pub fn with_extension(mut self, extension: impl AsRef<str>) -> Self {
        self.extension = extension
            .as_ref()
            .trim_start_matches('.')
            .to_lowercase();
        self
    }

    /// Output directory for one document, named after its base filename.
    pub fn document_output_dir(&self, document: &Path) -> PathBuf {
        let stem = document
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());
        self.output_root.join(stem)
    }
}
