//! Image processing operations.
//!
//! Bitmaps are held decoded (RGBA8) in memory and re-encoded losslessly as PNG
//! whenever they are persisted or written out.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tracing::{debug, trace};

use crate::error::{Result, SnipError};

/// Load an image file from disk and convert it to RGBA8.
///
/// # Errors
///
/// Returns an error if the file is missing or cannot be decoded.
pub fn load_bitmap(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        return Err(SnipError::InputNotFound {
            path: path.display().to_string(),
        });
    }

    let img = image::open(path).map_err(|e| SnipError::ImageProcessing(e.to_string()))?;
    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "Loaded bitmap"
    );
    Ok(img.to_rgba8())
}

/// Encode a bitmap as PNG bytes.
pub fn encode_png(bitmap: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    bitmap
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| SnipError::ImageProcessing(e.to_string()))?;
    trace!(bytes = buf.len(), "Encoded PNG");
    Ok(buf)
}

/// Decode PNG bytes back into an RGBA8 bitmap.
///
/// Anything that is not a valid PNG is reported as a malformed record since
/// these bytes always come from a persisted snippet.
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| SnipError::malformed(format!("invalid PNG image data: {e}")))?;
    Ok(img.to_rgba8())
}

/// Write a bitmap to disk as PNG.
pub fn save_png(bitmap: &RgbaImage, path: &Path) -> Result<()> {
    bitmap
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| SnipError::ImageProcessing(e.to_string()))?;
    debug!(path = %path.display(), "Wrote PNG");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    fn checker(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 128])
            }
        })
    }

    #[test]
    fn test_png_is_lossless() {
        let img = checker(7, 3);
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(decode_png(&png).unwrap(), img);
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let err = decode_png(b"not a png").unwrap_err();
        assert!(matches!(err, SnipError::MalformedRecord { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_bitmap(Path::new("/nonexistent/picture.png")).unwrap_err();
        assert!(matches!(err, SnipError::InputNotFound { .. }));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.png");
        let img = checker(4, 4);
        save_png(&img, &path).unwrap();
        assert_eq!(load_bitmap(&path).unwrap(), img);
    }
}
