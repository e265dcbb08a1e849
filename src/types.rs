//! Common types and data structures

use crate::image_ref::{ImageError, ImageRef};
use crate::letter::StampSlot;
use image::RgbaImage;
use std::path::PathBuf;

/// What the main window is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Editing,
    Previewing,
}

/// Field a loaded image is destined for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Logo,
    Stamp(StampSlot),
    /// Picked from disk; replaces the drawn signature.
    SignatureUpload,
    /// Existing signature repainted onto a fresh pad.
    SignatureReload,
}

/// Where the bytes of a pending image load come from
#[derive(Debug, Clone)]
pub enum ImageSource {
    File(PathBuf),
    Memory(ImageRef),
}

impl ImageSource {
    pub fn describe(&self) -> String {
        match self {
            ImageSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            ImageSource::Memory(image) => image.display_name(),
        }
    }
}

/// A decoded image ready to be applied to the draft
pub struct LoadedImage {
    pub image: ImageRef,
    pub pixels: RgbaImage,
}

/// Outcome of a background image load
pub struct LoadResult {
    pub target: ImageTarget,
    pub source_name: String,
    /// Signature pad generation when the load was requested.
    pub pad_generation: u64,
    pub outcome: Result<LoadedImage, ImageError>,
}
