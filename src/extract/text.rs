//! Text, table, and metadata extraction from PDF documents.

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use lopdf::{Document as LopdfDocument, Object};

use crate::error::{Error, Result};
use crate::model::{ExtractedTable, Metadata, PageContent};

use super::spans::{self, decode_text_simple};
use super::tables::{TableDetector, TableDetectorConfig};
use super::{DocumentText, DocumentTextTableSource};

/// PDF implementation of the text/table capability.
///
/// Page text is extracted twice, with `pdf-extract` and with `lopdf`'s
/// built-in extractor, and the result with more printable content wins;
/// a document one library rejects is still readable through the other.
/// Tables are detected from positioned spans in each page's content
/// stream.
pub struct PdfTextTableSource {
    table_config: TableDetectorConfig,
}

impl PdfTextTableSource {
    /// Create a source with default table detection settings.
    pub fn new() -> Self {
        Self {
            table_config: TableDetectorConfig::default(),
        }
    }

    /// Override the table detection settings.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.table_config = config;
        self
    }

    /// Tables for one page, indexed 1..k after empty grids are dropped.
    fn page_tables(
        &self,
        doc: &LopdfDocument,
        page_num: u32,
        page_id: lopdf::ObjectId,
    ) -> Vec<ExtractedTable> {
        let spans = match spans::page_spans(doc, page_id) {
            Ok(spans) => spans,
            Err(e) => {
                log::warn!("Skipping table detection on page {}: {}", page_num, e);
                return Vec::new();
            }
        };

        let detector = TableDetector::with_config(self.table_config.clone());
        let mut tables = Vec::new();
        for detected in detector.detect(&spans) {
            let grid = detected.to_grid();
            let has_content = grid.iter().any(|row| row.iter().any(|c| !c.is_empty()));
            if grid.is_empty() || !has_content {
                continue;
            }
            let index = tables.len() as u32 + 1;
            tables.push(ExtractedTable::new(page_num, index, grid));
        }
        tables
    }
}

impl Default for PdfTextTableSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTextTableSource for PdfTextTableSource {
    fn name(&self) -> &str {
        "pdf"
    }

    fn extract(&self, path: &Path) -> Result<DocumentText> {
        let bytes = fs::read(path)?;
        let doc = LopdfDocument::load_mem(&bytes)?;

        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        let pages = doc.get_pages();
        let page_count = pages.len() as u32;
        let metadata = read_metadata(&doc, page_count);

        let page_texts = extract_page_texts(&doc, &bytes, &pages);

        let mut contents = Vec::with_capacity(pages.len());
        for (&page_num, &page_id) in pages.iter() {
            log::info!("Processing page {}/{}", page_num, page_count);

            let text = page_texts
                .get(page_num as usize - 1)
                .cloned()
                .unwrap_or_default();
            let tables = self.page_tables(&doc, page_num, page_id);
            if !tables.is_empty() {
                log::debug!("Found {} table(s) on page {}", tables.len(), page_num);
            }

            contents.push(PageContent::new(page_num, text).with_tables(tables));
        }

        Ok(DocumentText {
            metadata,
            pages: contents,
        })
    }
}

/// Per-page text from both extractors, keeping the richer result.
fn extract_page_texts(
    doc: &LopdfDocument,
    bytes: &[u8],
    pages: &std::collections::BTreeMap<u32, lopdf::ObjectId>,
) -> Vec<String> {
    let lopdf_texts: Vec<String> = pages
        .keys()
        .map(|&n| doc.extract_text(&[n]).unwrap_or_default())
        .collect();

    let pdf_extract_texts = match pdf_extract::extract_text_from_mem_by_pages(bytes) {
        Ok(texts) => texts,
        Err(e) => {
            log::debug!("pdf-extract failed, using lopdf text only: {}", e);
            return lopdf_texts;
        }
    };

    let lopdf_chars = printable_chars(&lopdf_texts);
    let pdf_extract_chars = printable_chars(&pdf_extract_texts);
    log::debug!(
        "Text extraction: pdf-extract={} chars, lopdf={} chars",
        pdf_extract_chars,
        lopdf_chars
    );

    if pdf_extract_chars >= lopdf_chars {
        pdf_extract_texts
    } else {
        lopdf_texts
    }
}

/// Count printable characters across page texts.
fn printable_chars(pages: &[String]) -> usize {
    pages
        .iter()
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric() || c.is_ascii_punctuation())
                .count()
        })
        .sum()
}

/// Read the document information dictionary.
fn read_metadata(doc: &LopdfDocument, page_count: u32) -> Metadata {
    let mut metadata = Metadata::with_page_count(page_count);
    metadata.pdf_version = doc.version.clone();
    metadata.encrypted = doc.is_encrypted();

    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| obj.as_reference().ok())
        .and_then(|id| doc.get_dictionary(id).ok());

    if let Some(info) = info {
        metadata.title = info_string(info, b"Title");
        metadata.author = info_string(info, b"Author");
        metadata.subject = info_string(info, b"Subject");
        metadata.keywords = info_string(info, b"Keywords");
        metadata.creator = info_string(info, b"Creator");
        metadata.producer = info_string(info, b"Producer");
        metadata.created = info_string(info, b"CreationDate").and_then(|s| parse_pdf_date(&s));
        metadata.modified = info_string(info, b"ModDate").and_then(|s| parse_pdf_date(&s));
    }

    metadata
}

/// Read one string entry from the Info dictionary.
fn info_string(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key) {
        Ok(Object::String(bytes, _)) => {
            let s = decode_text_simple(bytes);
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        _ => None,
    }
}

/// Parse a PDF date string like `D:20240115103000+09'00'` to UTC.
fn parse_pdf_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.strip_prefix("D:").unwrap_or(raw);

    let digit_len = s.chars().take_while(|c| c.is_ascii_digit()).count();
    let digits = &s[..digit_len];
    if digits.len() < 4 {
        return None;
    }

    let field = |range: std::ops::Range<usize>, default: u32| -> u32 {
        digits
            .get(range)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };

    let year: i32 = digits.get(0..4)?.parse().ok()?;
    let month = field(4..6, 1).clamp(1, 12);
    let day = field(6..8, 1).clamp(1, 31);
    let hour = field(8..10, 0).min(23);
    let minute = field(10..12, 0).min(59);
    let second = field(12..14, 0).min(59);

    let naive = chrono::NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(hour, minute, second)?;

    // Timezone suffix: Z, or +HH'mm' / -HH'mm'
    let rest = &s[digit_len..];
    let offset_seconds: i64 = match rest.chars().next() {
        Some('+') | Some('-') => {
            let sign: i64 = if rest.starts_with('-') { -1 } else { 1 };
            let tz_digits: Vec<u32> = rest[1..]
                .chars()
                .filter(|c| c.is_ascii_digit())
                .filter_map(|c| c.to_digit(10))
                .collect();
            let tz_hour = tz_digits
                .get(0..2)
                .map(|d| (d[0] * 10 + d[1]) as i64)
                .unwrap_or(0);
            let tz_min = tz_digits
                .get(2..4)
                .map(|d| (d[0] * 10 + d[1]) as i64)
                .unwrap_or(0);
            sign * (tz_hour * 3600 + tz_min * 60)
        }
        _ => 0,
    };

    let utc_naive = naive - chrono::Duration::seconds(offset_seconds);
    Some(Utc.from_utc_datetime(&utc_naive))
}
