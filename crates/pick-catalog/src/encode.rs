//! Menu photo re-encoding
//!
//! Uploaded photos arrive as PNG/JPEG/GIF/WebP and are stored as WebP.

use crate::error::EncodeError;
use crate::storage::WEBP_CONTENT_TYPE;
use image::{DynamicImage, ImageFormat};
use pick_key::MENU_EXTENSION;
use std::io::Cursor;

/// Converts uploaded image bytes into the stored format
pub trait ImageEncoder: Send + Sync {
    /// Re-encode `bytes`
    ///
    /// # Errors
    /// Returns error if the bytes are not an image or cannot be converted
    fn encode(&self, bytes: &[u8]) -> Result<Vec<u8>, EncodeError>;

    /// Content type of the encoded output
    fn content_type(&self) -> &'static str;

    /// File extension of the encoded output
    fn extension(&self) -> &'static str;
}

/// Lossless WebP via the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpEncoder;

impl ImageEncoder for WebpEncoder {
    fn encode(&self, bytes: &[u8]) -> Result<Vec<u8>, EncodeError> {
        let format =
            image::guess_format(bytes).map_err(|e| EncodeError::NotAnImage(e.to_string()))?;
        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| EncodeError::Decode(e.to_string()))?;

        // WebP output takes 8-bit RGB(A) only
        let rgba = DynamicImage::ImageRgba8(decoded.to_rgba8());
        let mut out = Cursor::new(Vec::new());
        rgba.write_to(&mut out, ImageFormat::WebP)
            .map_err(|e| EncodeError::Encode(e.to_string()))?;
        Ok(out.into_inner())
    }

    fn content_type(&self) -> &'static str {
        WEBP_CONTENT_TYPE
    }

    fn extension(&self) -> &'static str {
        MENU_EXTENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn png_bytes() -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(4, 3, |x, y| Rgb([x as u8 * 60, y as u8 * 80, 200]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn png_becomes_webp() {
        let webp = WebpEncoder.encode(&png_bytes()).unwrap();
        assert_eq!(&webp[..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
        let back = image::load_from_memory_with_format(&webp, ImageFormat::WebP).unwrap();
        assert_eq!((back.width(), back.height()), (4, 3));
    }

    #[test]
    fn text_is_not_an_image() {
        let err = WebpEncoder.encode(b"id,brand_id\n").unwrap_err();
        assert!(matches!(err, EncodeError::NotAnImage(_)));
    }

    #[test]
    fn truncated_png_fails_decode() {
        let bytes = png_bytes();
        let err = WebpEncoder.encode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, EncodeError::Decode(_)));
    }
}
