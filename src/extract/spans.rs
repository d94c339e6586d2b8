//! Positioned text spans parsed from page content streams.
//!
//! Table detection needs to know where text sits on the page, which the
//! plain-text extractors discard. This module walks a page's content
//! stream, tracking the text matrix, and yields text runs with x/y
//! coordinates and font size.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// A text run with position and size information.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the run
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a span. Width is estimated from glyph count and font size,
    /// good enough for column clustering.
    pub fn new(text: String, x: f32, y: f32, font_size: f32) -> Self {
        let width = text.chars().count() as f32 * font_size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }
}

/// Extract positioned spans from one page.
pub fn page_spans(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<TextSpan>> {
    let fonts = match doc.get_page_fonts(page_id) {
        Ok(fonts) => fonts,
        Err(e) => {
            log::debug!("No usable font table for page {:?}: {}", page_id, e);
            BTreeMap::new()
        }
    };

    let content = page_content(doc, page_id)?;
    parse_content(doc, &content, &fonts)
}

/// Concatenated, decompressed content stream bytes for a page.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc.get_dictionary(page_id)?;

    let contents = match page_dict.get(b"Contents") {
        Ok(contents) => contents,
        // A page without a content stream is legal and simply blank.
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(r) => {
            if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                return s.decompressed_content().map_err(Error::from);
            }
            Err(Error::DocumentParse("Invalid content stream".to_string()))
        }
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        if let Ok(data) = s.decompressed_content() {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
            }
            Ok(content)
        }
        _ => Err(Error::DocumentParse("Invalid content stream".to_string())),
    }
}

/// Walk the content operations and collect text spans.
fn parse_content(
    doc: &LopdfDocument,
    content: &[u8],
    fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
) -> Result<Vec<TextSpan>> {
    let content = lopdf::content::Content::decode(content)
        .map_err(|e| Error::DocumentParse(e.to_string()))?;

    let mut spans = Vec::new();
    let mut current_font_name: Vec<u8> = Vec::new();
    let mut current_font_size: f32 = 12.0;
    let mut text_matrix = TextMatrix::default();
    let mut in_text_block = false;

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                text_matrix = TextMatrix::default();
            }
            "ET" => {
                in_text_block = false;
            }
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(font_name) = &op.operands[0] {
                        current_font_name = font_name.clone();
                    }
                    current_font_size = operand_number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = operand_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = operand_number(&op.operands[1]).unwrap_or(0.0);
                    text_matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    text_matrix.set(
                        operand_number(&op.operands[0]).unwrap_or(1.0),
                        operand_number(&op.operands[1]).unwrap_or(0.0),
                        operand_number(&op.operands[2]).unwrap_or(0.0),
                        operand_number(&op.operands[3]).unwrap_or(1.0),
                        operand_number(&op.operands[4]).unwrap_or(0.0),
                        operand_number(&op.operands[5]).unwrap_or(0.0),
                    );
                }
            }
            "T*" => {
                text_matrix.next_line();
            }
            "Tj" | "TJ" => {
                if in_text_block {
                    let encoding = fonts
                        .get(&current_font_name)
                        .and_then(|f| f.get_font_encoding(doc).ok());

                    let text = if op.operator == "TJ" {
                        // TJ: array of strings and kerning adjustments in
                        // 1/1000 text-space units. Large negative values
                        // usually stand in for word spaces.
                        if let Some(Object::Array(arr)) = op.operands.first() {
                            let mut combined = String::new();
                            let space_threshold = 200.0;

                            for item in arr {
                                match item {
                                    Object::String(bytes, _) => {
                                        if let Some(ref enc) = encoding {
                                            if let Ok(decoded) =
                                                LopdfDocument::decode_text(enc, bytes)
                                            {
                                                combined.push_str(&decoded);
                                            }
                                        } else {
                                            combined.push_str(&decode_text_simple(bytes));
                                        }
                                    }
                                    Object::Integer(n) => {
                                        let adjustment = -(*n as f32);
                                        if adjustment > space_threshold {
                                            push_word_space(&mut combined);
                                        }
                                    }
                                    Object::Real(n) => {
                                        let adjustment = -n;
                                        if adjustment > space_threshold {
                                            push_word_space(&mut combined);
                                        }
                                    }
                                    _ => {}
                                }
                            }
                            combined
                        } else {
                            String::new()
                        }
                    } else {
                        // Tj: single string
                        if let Some(Object::String(bytes, _)) = op.operands.first() {
                            if let Some(ref enc) = encoding {
                                LopdfDocument::decode_text(enc, bytes).unwrap_or_default()
                            } else {
                                decode_text_simple(bytes)
                            }
                        } else {
                            String::new()
                        }
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = text_matrix.position();
                        let effective_size = current_font_size * text_matrix.scale();
                        spans.push(TextSpan::new(text, x, y, effective_size));
                    }
                }
            }
            "'" | "\"" => {
                text_matrix.next_line();
                if in_text_block {
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let encoding = fonts
                            .get(&current_font_name)
                            .and_then(|f| f.get_font_encoding(doc).ok());

                        let text = if let Some(ref enc) = encoding {
                            LopdfDocument::decode_text(enc, bytes).unwrap_or_default()
                        } else {
                            decode_text_simple(bytes)
                        };

                        if !text.trim().is_empty() {
                            let (x, y) = text_matrix.position();
                            let effective_size = current_font_size * text_matrix.scale();
                            spans.push(TextSpan::new(text, x, y, effective_size));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Append a word space unless the text already ends with one, or ends in
/// a script that does not separate words with spaces.
fn push_word_space(combined: &mut String) {
    if combined.is_empty() || combined.ends_with(' ') || combined.ends_with('\u{00A0}') {
        return;
    }
    if let Some(c) = combined.chars().last() {
        if !is_spaceless_script_char(c) {
            combined.push(' ');
        }
    }
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; TL is rare enough in practice to ignore here.
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Extract a number from a PDF object operand.
fn operand_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if a character is from a script that does not use word spaces
/// (Chinese and Japanese; Korean uses spaces).
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2A6DF).contains(&code)
        // Hiragana and Katakana
        || (0x3040..=0x309F).contains(&code)
        || (0x30A0..=0x30FF).contains(&code)
        // CJK symbols and punctuation
        || (0x3000..=0x303F).contains(&code)
}

/// Fallback decoding when the font declares no usable encoding.
/// Also used for document information strings, which follow the same
/// UTF-16BE-with-BOM-or-byte-string convention.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    // UTF-8
    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_matrix_translate() {
        let mut m = TextMatrix::default();
        m.translate(72.0, 700.0);
        assert_eq!(m.position(), (72.0, 700.0));
        m.translate(0.0, -14.0);
        assert_eq!(m.position(), (72.0, 686.0));
    }

    #[test]
    fn test_text_matrix_scale() {
        let mut m = TextMatrix::default();
        m.set(2.0, 0.0, 0.0, 2.0, 10.0, 20.0);
        assert!((m.scale() - 2.0).abs() < 1e-6);
        assert_eq!(m.position(), (10.0, 20.0));
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = [0xFE, 0xFF, 0x00, b'H', 0x00, b'i'];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        let bytes = [0xE9];
        assert_eq!(decode_text_simple(&bytes), "é");
    }

    #[test]
    fn test_spaceless_scripts() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('の'));
        assert!(!is_spaceless_script_char('a'));
        assert!(!is_spaceless_script_char('한'));
    }

    #[test]
    fn test_parse_content_simple_stream() {
        let doc = LopdfDocument::with_version("1.5");
        let content = b"BT /F1 12 Tf 72 700 Td (Hello) Tj 0 -14 Td (World) Tj ET";
        let fonts = BTreeMap::new();
        let spans = parse_content(&doc, content, &fonts).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Hello");
        assert_eq!(spans[0].x, 72.0);
        assert_eq!(spans[0].y, 700.0);
        assert_eq!(spans[1].text, "World");
        assert_eq!(spans[1].y, 686.0);
    }

    #[test]
    fn test_parse_content_tj_array_spacing() {
        let doc = LopdfDocument::with_version("1.5");
        let content = b"BT /F1 10 Tf 50 600 Td [(Hel) -80 (lo) -320 (world)] TJ ET";
        let fonts = BTreeMap::new();
        let spans = parse_content(&doc, content, &fonts).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Hello world");
    }
}
