//! Image file output.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::ExtractedImage;

/// Write each image as its own file under `dir`.
///
/// The directory (including parents) is created before any write, and is
/// created even when there are no images. Image bytes are written exactly
/// as extracted.
pub fn write_images(dir: &Path, images: &[ExtractedImage]) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::write(dir, e))?;

    for image in images {
        let path = dir.join(image.file_name());
        fs::write(&path, &image.data).map_err(|e| Error::write(&path, e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_images_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let images_dir = dir.path().join("images");
        let payload = vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3];
        let images = vec![
            ExtractedImage::new(1, 1, payload.clone(), "jpg"),
            ExtractedImage::new(2, 1, vec![9, 9], "png"),
        ];

        write_images(&images_dir, &images).unwrap();

        let written = fs::read(images_dir.join("page_1_img_1.jpg")).unwrap();
        assert_eq!(written, payload);
        assert!(images_dir.join("page_2_img_1.png").exists());
    }

    #[test]
    fn test_no_images_creates_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let images_dir = dir.path().join("images");

        write_images(&images_dir, &[]).unwrap();

        assert!(images_dir.is_dir());
        assert_eq!(fs::read_dir(&images_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_write_to_unwritable_path_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("not_a_dir");
        fs::write(&file_path, b"x").unwrap();

        // Creating a directory where a file already sits fails
        let err = write_images(&file_path.join("images"), &[]).unwrap_err();
        assert!(err.to_string().contains("images"));
    }
}
