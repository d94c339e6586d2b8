//! Error types for the pdfsift library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Discovery found no documents to process.
    #[error("No .{} files found in {}", extension, dir.display())]
    NoDocuments { dir: PathBuf, extension: String },

    /// The document cannot be opened or parsed.
    #[error("Document parsing error: {0}")]
    DocumentParse(String),

    /// The document is encrypted and cannot be processed.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error extracting an embedded image.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Error writing the spreadsheet file.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// I/O error carrying the path that failed.
    #[error("Failed to write {}: {}", path.display(), source)]
    Write { path: PathBuf, source: io::Error },
}

impl Error {
    /// Wrap an I/O error together with the offending path.
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::DocumentParse(err.to_string()),
        }
    }
}

impl From<pdf_extract::OutputError> for Error {
    fn from(err: pdf_extract::OutputError) -> Self {
        Error::TextExtract(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Spreadsheet(err.to_string())
    }
}
