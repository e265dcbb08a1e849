//! Opaque image references for logos, stamps and signatures
//!
//! Images picked from disk or captured on the signature pad are kept as owned
//! byte buffers tagged with their format. They are only decoded when something
//! needs pixels (textures, the signature canvas) and only base64-encoded when a
//! document is exported.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::RgbaImage;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported image format")]
    UnsupportedFormat,
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("image task was interrupted")]
    Interrupted,
}

/// Image container formats accepted by the file pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Extensions offered in the file picker filter.
    pub const EXTENSIONS: [&'static str; 6] = ["png", "jpg", "jpeg", "webp", "gif", "bmp"];

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "gif" => Some(ImageFormat::Gif),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(ImageFormat::Gif);
        }
        if data.starts_with(b"BM") {
            return Some(ImageFormat::Bmp);
        }
        None
    }

    fn to_image_crate(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Owned, cheaply clonable image bytes with their format.
#[derive(Debug, Clone)]
pub struct ImageRef {
    bytes: Arc<[u8]>,
    format: ImageFormat,
    file_name: Option<String>,
}

impl PartialEq for ImageRef {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format && self.bytes == other.bytes
    }
}

impl ImageRef {
    /// Wrap raw bytes, detecting the format from content first and the file
    /// name extension second.
    pub fn from_bytes(bytes: Vec<u8>, file_name: Option<String>) -> Result<Self, ImageError> {
        let format = ImageFormat::from_magic_bytes(&bytes)
            .or_else(|| {
                file_name
                    .as_deref()
                    .and_then(|n| Path::new(n).extension())
                    .and_then(|e| e.to_str())
                    .and_then(ImageFormat::from_extension)
            })
            .ok_or(ImageError::UnsupportedFormat)?;
        Ok(Self {
            bytes: bytes.into(),
            format,
            file_name,
        })
    }

    /// Encode pixels as a PNG reference (used for signatures).
    pub fn png_from_rgba(image: &RgbaImage) -> Result<Self, ImageError> {
        let mut buf = Cursor::new(Vec::new());
        image
            .write_to(&mut buf, image::ImageFormat::Png)
            .map_err(ImageError::Encode)?;
        Ok(Self {
            bytes: buf.into_inner().into(),
            format: ImageFormat::Png,
            file_name: None,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Short label for the form ("logo.png", or "PNG image" when unnamed).
    pub fn display_name(&self) -> String {
        match self.file_name() {
            Some(name) => name.to_string(),
            None => format!("{} image", self.format.mime_type().trim_start_matches("image/").to_uppercase()),
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), STANDARD.encode(&self.bytes))
    }

    pub fn decode_rgba(&self) -> Result<RgbaImage, ImageError> {
        image::load_from_memory_with_format(&self.bytes, self.format.to_image_crate())
            .map(|img| img.to_rgba8())
            .map_err(ImageError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        ImageRef::png_from_rgba(&img).unwrap().bytes().to_vec()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("tiff"), None);
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(b"nope"), None);
    }

    #[test]
    fn test_from_bytes_prefers_content_over_name() {
        let img = ImageRef::from_bytes(tiny_png(), Some("seal.jpg".into())).unwrap();
        assert_eq!(img.format(), ImageFormat::Png);
        assert_eq!(img.display_name(), "seal.jpg");
    }

    #[test]
    fn test_from_bytes_rejects_unknown() {
        let err = ImageRef::from_bytes(vec![1, 2, 3, 4], Some("notes.txt".into()));
        assert!(matches!(err, Err(ImageError::UnsupportedFormat)));
    }

    #[test]
    fn test_decode_rgba() {
        let img = ImageRef::from_bytes(tiny_png(), None).unwrap();
        let rgba = img.decode_rgba().unwrap();
        assert_eq!(rgba.dimensions(), (3, 2));
        assert_eq!(rgba.get_pixel(1, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47];
        bytes.extend_from_slice(&[0; 16]);
        let img = ImageRef::from_bytes(bytes, None).unwrap();
        assert!(matches!(img.decode_rgba(), Err(ImageError::Decode(_))));
    }

    #[test]
    fn test_data_uri() {
        let img = ImageRef::from_bytes(tiny_png(), None).unwrap();
        let uri = img.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(img.display_name(), "PNG image");
    }
}
