//! Embedded image model.

use serde::{Deserialize, Serialize};

/// An embedded raster image pulled out of a document page.
///
/// The payload is the image's native encoding as stored in the document;
/// nothing is re-encoded, so writing `data` to a file with `extension`
/// reproduces the embedded bytes exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedImage {
    /// Page the image belongs to (1-based).
    pub page: u32,
    /// Index of the image within its page (1-based, discovery order).
    pub index: u32,
    /// Raw encoded bytes.
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,
    /// File extension matching the native encoding (e.g. "jpg").
    pub extension: String,
    /// Width in pixels, when the document declares it.
    pub width: Option<u32>,
    /// Height in pixels, when the document declares it.
    pub height: Option<u32>,
}

impl ExtractedImage {
    /// Create an image record.
    pub fn new(page: u32, index: u32, data: Vec<u8>, extension: impl Into<String>) -> Self {
        Self {
            page,
            index,
            data,
            extension: extension.into(),
            width: None,
            height: None,
        }
    }

    /// Set pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Filename the image is written under, unique within a document
    /// because page number and per-page index are both embedded.
    pub fn file_name(&self) -> String {
        format!("page_{}_img_{}.{}", self.page, self.index, self.extension)
    }

    /// Detect a file extension from data magic bytes.
    pub fn detect_extension(data: &[u8]) -> Option<&'static str> {
        if data.len() < 8 {
            return None;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some("jpg");
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("png");
        }

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some("gif");
        }

        // TIFF: 49 49 2A 00 (little-endian) or 4D 4D 00 2A (big-endian)
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some("tiff");
        }

        // BMP: BM
        if data.starts_with(b"BM") {
            return Some("bmp");
        }

        // WEBP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some("webp");
        }

        // JPEG 2000: 00 00 00 0C 6A 50 20 20
        if data.starts_with(&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20]) {
            return Some("jp2");
        }

        None
    }
}
