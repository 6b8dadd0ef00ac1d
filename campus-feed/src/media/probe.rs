//! Image dimension probing
//!
//! Only the image header is read. Any failure means "dimensions unknown";
//! it never fails the upload.

use image::ImageReader;
use std::io::Cursor;

/// Reads `(width, height)` from an image's header
///
/// Returns `None` for non-image MIME types and for content the `image` crate
/// cannot recognize.
#[must_use]
pub fn probe_dimensions(mime_type: &str, data: &[u8]) -> Option<(u32, u32)> {
    let declared: mime::Mime = mime_type.parse().ok()?;
    if declared.type_() != mime::IMAGE {
        return None;
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?;

    match reader.into_dimensions() {
        Ok(dimensions) => Some(dimensions),
        Err(e) => {
            tracing::debug!(mime_type, error = %e, "could not read image dimensions");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_probe_png() {
        assert_eq!(probe_dimensions("image/png", &png(3, 2)), Some((3, 2)));
    }

    #[test]
    fn test_probe_ignores_declared_subtype() {
        // The header decides the format, not the declared subtype
        assert_eq!(probe_dimensions("image/jpeg", &png(5, 4)), Some((5, 4)));
    }

    #[test]
    fn test_garbage_image_has_unknown_dimensions() {
        assert_eq!(probe_dimensions("image/png", &[7u8; 37]), None);
    }

    #[test]
    fn test_unparseable_mime_is_not_probed() {
        assert_eq!(probe_dimensions("not a mime", &png(3, 2)), None);
    }

    #[test]
    fn test_non_images_are_not_probed() {
        assert_eq!(probe_dimensions("application/octet-stream", &png(3, 2)), None);
    }
}
