//! Embedded image extraction from PDF documents.

use std::collections::HashSet;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::ExtractedImage;

use super::{DocumentImageSource, DocumentImages};

/// PDF implementation of the image capability.
///
/// Walks each page's resource dictionaries for image XObjects, including
/// images reachable through nested form XObjects. Payloads are taken in
/// their native encoding: JPEG and JPEG 2000 streams are copied as-is,
/// anything Flate-wrapped is decompressed and sniffed by magic bytes.
pub struct PdfImageSource;

impl PdfImageSource {
    /// Create an image source.
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentImageSource for PdfImageSource {
    fn name(&self) -> &str {
        "pdf"
    }

    fn extract(&self, path: &Path) -> Result<DocumentImages> {
        let doc = LopdfDocument::load(path)?;

        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        let mut result = DocumentImages::default();

        for (&page_num, &page_id) in doc.get_pages().iter() {
            log::debug!("Scanning page {} for images", page_num);
            let mut page_index = 0u32;
            let mut visited: HashSet<ObjectId> = HashSet::new();

            let page_dict = match doc.get_dictionary(page_id) {
                Ok(dict) => dict,
                Err(e) => {
                    log::warn!("Skipping images on page {}: {}", page_num, e);
                    continue;
                }
            };

            if let Ok(resources) = page_dict.get(b"Resources") {
                collect_from_resources(
                    &doc,
                    resources,
                    page_num,
                    &mut page_index,
                    &mut visited,
                    &mut result,
                );
            }
        }

        log::debug!(
            "Extracted {} image(s), {} failed",
            result.images.len(),
            result.failed
        );
        Ok(result)
    }
}

/// Walk one resources entry (dictionary or reference to one) and collect
/// every image XObject reachable from it, recursing into form XObjects.
fn collect_from_resources(
    doc: &LopdfDocument,
    resources: &Object,
    page_num: u32,
    page_index: &mut u32,
    visited: &mut HashSet<ObjectId>,
    out: &mut DocumentImages,
) {
    let resources = match resources {
        Object::Reference(r) => match doc.get_dictionary(*r) {
            Ok(dict) => dict,
            Err(_) => return,
        },
        Object::Dictionary(dict) => dict,
        _ => return,
    };

    let xobjects = match resources.get(b"XObject") {
        Ok(Object::Reference(r)) => match doc.get_dictionary(*r) {
            Ok(dict) => dict,
            Err(_) => return,
        },
        Ok(Object::Dictionary(dict)) => dict,
        _ => return,
    };

    for (name, value) in xobjects.iter() {
        let id = match value.as_reference() {
            Ok(id) => id,
            Err(_) => continue,
        };
        if !visited.insert(id) {
            continue;
        }

        let stream = match doc.get_object(id) {
            Ok(Object::Stream(stream)) => stream,
            _ => continue,
        };

        let subtype = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name_str().ok())
            .unwrap_or("");

        match subtype {
            "Image" => match decode_image(stream, page_num, *page_index + 1) {
                Ok(image) => {
                    *page_index += 1;
                    log::debug!(
                        "Image {} on page {}: {} bytes ({})",
                        page_index,
                        page_num,
                        image.size(),
                        image.extension
                    );
                    out.images.push(image);
                }
                Err(e) => {
                    out.failed += 1;
                    log::warn!(
                        "Skipping image '{}' on page {}: {}",
                        String::from_utf8_lossy(name),
                        page_num,
                        e
                    );
                }
            },
            "Form" => {
                if let Ok(inner) = stream.dict.get(b"Resources") {
                    collect_from_resources(doc, inner, page_num, page_index, visited, out);
                }
            }
            _ => {}
        }
    }
}

/// Resolve one image XObject stream to its payload and extension.
fn decode_image(stream: &lopdf::Stream, page: u32, index: u32) -> Result<ExtractedImage> {
    // A filter array with one entry is equivalent to a plain name; a real
    // cascade would need every stage applied, which none of the supported
    // formats call for.
    let filter = match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => String::from_utf8_lossy(name).to_string(),
        Ok(Object::Array(arr)) => {
            let names: Vec<&str> = arr.iter().filter_map(|o| o.as_name_str().ok()).collect();
            names.join("+")
        }
        _ => String::new(),
    };

    let (data, extension) = match filter.as_str() {
        // JPEG stream, usable as a file directly
        "DCTDecode" => (stream.content.clone(), "jpg".to_string()),
        // JPEG 2000 stream
        "JPXDecode" => (stream.content.clone(), "jp2".to_string()),
        // Raw or deflate-wrapped samples
        "FlateDecode" | "LZWDecode" | "" => {
            let data = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            let ext = ExtractedImage::detect_extension(&data).unwrap_or("raw");
            (data, ext.to_string())
        }
        other => {
            return Err(Error::ImageExtract(format!(
                "Unsupported image filter: {}",
                other
            )))
        }
    };

    if data.is_empty() {
        return Err(Error::ImageExtract("Empty image stream".to_string()));
    }

    let width = dict_u32(&stream.dict, b"Width");
    let height = dict_u32(&stream.dict, b"Height");

    let mut image = ExtractedImage::new(page, index, data, extension);
    if let (Some(w), Some(h)) = (width, height) {
        image = image.with_dimensions(w, h);
    }
    Ok(image)
}

fn dict_u32(dict: &lopdf::Dictionary, key: &[u8]) -> Option<u32> {
    dict.get(key)
        .ok()
        .and_then(|o| o.as_i64().ok())
        .and_then(|v| u32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    fn image_stream(filter: &str, content: Vec<u8>) -> Stream {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 4,
            "Height" => 2,
            "BitsPerComponent" => 8,
        };
        if !filter.is_empty() {
            dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
        }
        Stream::new(dict, content)
    }

    #[test]
    fn test_decode_jpeg_passthrough() {
        let payload = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x01, 0x02, 0x03];
        let stream = image_stream("DCTDecode", payload.clone());
        let image = decode_image(&stream, 3, 1).unwrap();
        assert_eq!(image.extension, "jpg");
        assert_eq!(image.data, payload);
        assert_eq!(image.file_name(), "page_3_img_1.jpg");
        assert_eq!(image.width, Some(4));
        assert_eq!(image.height, Some(2));
    }

    #[test]
    fn test_decode_jp2_passthrough() {
        let payload = vec![0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20];
        let stream = image_stream("JPXDecode", payload.clone());
        let image = decode_image(&stream, 1, 2).unwrap();
        assert_eq!(image.extension, "jp2");
        assert_eq!(image.data, payload);
    }

    #[test]
    fn test_decode_unsupported_filter_is_error() {
        let stream = image_stream("CCITTFaxDecode", vec![1, 2, 3]);
        let err = decode_image(&stream, 1, 1).unwrap_err();
        assert!(matches!(err, Error::ImageExtract(_)));
    }

    #[test]
    fn test_single_entry_filter_array_decodes() {
        let payload = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x01, 0x02, 0x03];
        let mut stream = image_stream("", payload.clone());
        stream
            .dict
            .set("Filter", vec![Object::Name(b"DCTDecode".to_vec())]);
        let image = decode_image(&stream, 1, 1).unwrap();
        assert_eq!(image.extension, "jpg");
        assert_eq!(image.data, payload);
    }

    #[test]
    fn test_filter_cascade_is_unsupported() {
        let mut stream = image_stream("", vec![1, 2, 3]);
        stream.dict.set(
            "Filter",
            vec![
                Object::Name(b"FlateDecode".to_vec()),
                Object::Name(b"DCTDecode".to_vec()),
            ],
        );
        let err = decode_image(&stream, 1, 1).unwrap_err();
        assert!(err.to_string().contains("FlateDecode+DCTDecode"));
    }

    #[test]
    fn test_decode_empty_stream_is_error() {
        let stream = image_stream("DCTDecode", vec![]);
        assert!(decode_image(&stream, 1, 1).is_err());
    }

    #[test]
    fn test_raw_samples_get_raw_extension() {
        // Not a recognizable container, stays raw sample data
        let stream = image_stream("", vec![9u8; 16]);
        let image = decode_image(&stream, 2, 1).unwrap();
        assert_eq!(image.extension, "raw");
    }
}
