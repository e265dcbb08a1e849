//! Freehand signature surface
//!
//! A fixed-size white raster that accumulates pen strokes. Strokes are painted
//! as soon as the pointer moves; the whole canvas is encoded to PNG only when
//! a gesture ends, so the owner sees at most one image per gesture.

use crate::constants::{SIGNATURE_HEIGHT, SIGNATURE_STROKE_WIDTH, SIGNATURE_WIDTH};
use crate::image_ref::{ImageError, ImageRef};
use crate::utils::premul_to_straight;
use image::RgbaImage;
use resvg::tiny_skia::{
    Color, ColorU8, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Point, Stroke,
    Transform,
};
use tracing::{debug, warn};

/// Pen state of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PenState {
    Idle,
    /// Pen is down; `last` is where the previous segment ended.
    Drawing { last: Point },
}

/// What the surface reports to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum SignatureEvent {
    /// A gesture finished; the full canvas as PNG.
    Captured(ImageRef),
    /// The canvas was wiped; there is no signature any more.
    Cleared,
}

pub struct SignaturePad {
    pixmap: Pixmap,
    state: PenState,
    revision: u64,
    generation: u64,
}

impl SignaturePad {
    pub fn new() -> Self {
        Self::with_size(SIGNATURE_WIDTH, SIGNATURE_HEIGHT).expect("signature canvas size is valid")
    }

    /// Returns None for zero-sized canvases.
    pub fn with_size(width: u32, height: u32) -> Option<Self> {
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(Color::WHITE);
        Some(Self {
            pixmap,
            state: PenState::Idle,
            revision: 0,
            generation: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, PenState::Drawing { .. })
    }

    /// Bumped whenever pixels change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Bumped when the user starts a stroke or wipes the canvas. Content
    /// painted for an older generation is stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width() as f32 && y < self.height() as f32
    }

    /// Start a stroke at a canvas-local position. Presses outside the canvas are ignored.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if !self.contains(x, y) {
            return;
        }
        self.generation += 1;
        self.state = PenState::Drawing {
            last: Point::from_xy(x, y),
        };
    }

    /// Extend the current stroke. No-op while idle.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let PenState::Drawing { last } = self.state else {
            return;
        };
        let to = Point::from_xy(x, y);
        self.stroke_segment(last, to);
        self.state = PenState::Drawing { last: to };
    }

    /// Finish the gesture and emit the canvas.
    pub fn pointer_up(&mut self) -> Option<SignatureEvent> {
        self.finish_gesture()
    }

    /// The pointer left the canvas; ends the gesture like a release.
    pub fn pointer_leave(&mut self) -> Option<SignatureEvent> {
        self.finish_gesture()
    }

    fn finish_gesture(&mut self) -> Option<SignatureEvent> {
        if !self.is_drawing() {
            return None;
        }
        self.state = PenState::Idle;
        match self.snapshot() {
            Ok(image) => {
                debug!(bytes = image.bytes().len(), "Signature captured");
                Some(SignatureEvent::Captured(image))
            }
            Err(e) => {
                warn!(error = %e, "Failed to encode signature");
                None
            }
        }
    }

    /// Wipe to white and report that there is no signature.
    pub fn clear(&mut self) -> SignatureEvent {
        self.pixmap.fill(Color::WHITE);
        self.state = PenState::Idle;
        self.revision += 1;
        self.generation += 1;
        SignatureEvent::Cleared
    }

    /// Paint an existing image at the origin without scaling. Larger images
    /// are clipped to the canvas.
    pub fn load_image(&mut self, image: &RgbaImage) {
        let Some(mut source) = Pixmap::new(image.width(), image.height()) else {
            return;
        };
        for (dst, px) in source.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = px.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        self.pixmap.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        self.revision += 1;
    }

    fn stroke_segment(&mut self, from: Point, to: Point) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        // Zero-length segments produce no path
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: SIGNATURE_STROKE_WIDTH,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        self.revision += 1;
    }

    /// Straight-alpha RGBA pixels, row-major.
    pub fn rgba(&self) -> Vec<u8> {
        premul_to_straight(&self.pixmap)
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width(), self.height(), self.rgba())
            .unwrap_or_else(|| RgbaImage::new(self.width(), self.height()))
    }

    /// Encode the whole canvas as PNG.
    pub fn snapshot(&self) -> Result<ImageRef, ImageError> {
        ImageRef::png_from_rgba(&self.to_rgba_image())
    }
}

impl Default for SignaturePad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn captured(event: Option<SignatureEvent>) -> RgbaImage {
        match event {
            Some(SignatureEvent::Captured(img)) => img.decode_rgba().unwrap(),
            other => panic!("expected a captured image, got {:?}", other),
        }
    }

    fn is_blank(img: &RgbaImage) -> bool {
        img.pixels().all(|p| p.0 == WHITE)
    }

    fn dark_at(img: &RgbaImage, x: u32, y: u32) -> bool {
        img.get_pixel(x, y).0[0] < 128
    }

    #[test]
    fn test_starts_idle_and_white() {
        let pad = SignaturePad::new();
        assert_eq!(pad.state, PenState::Idle);
        assert_eq!((pad.width(), pad.height()), (SIGNATURE_WIDTH, SIGNATURE_HEIGHT));
        assert!(is_blank(&pad.to_rgba_image()));
    }

    #[test]
    fn test_press_release_without_movement_emits_blank_canvas() {
        let mut pad = SignaturePad::new();
        pad.pointer_down(10.0, 10.0);
        assert!(pad.is_drawing());
        let img = captured(pad.pointer_up());
        assert_eq!(pad.state, PenState::Idle);
        assert_eq!(img.dimensions(), (SIGNATURE_WIDTH, SIGNATURE_HEIGHT));
        assert!(is_blank(&img));
    }

    #[test]
    fn test_stroke_draws_black_line() {
        let mut pad = SignaturePad::new();
        pad.pointer_down(20.0, 50.0);
        pad.pointer_move(120.0, 50.0);
        let img = captured(pad.pointer_up());
        assert!(dark_at(&img, 70, 50));
        assert!(!dark_at(&img, 70, 100));
    }

    #[test]
    fn test_move_while_idle_is_noop() {
        let mut pad = SignaturePad::new();
        let before = pad.revision();
        pad.pointer_move(50.0, 50.0);
        pad.pointer_move(100.0, 60.0);
        assert_eq!(pad.revision(), before);
        assert_eq!(pad.pointer_up(), None);
        assert!(is_blank(&pad.to_rgba_image()));
    }

    #[test]
    fn test_press_outside_is_ignored() {
        let mut pad = SignaturePad::new();
        pad.pointer_down(-5.0, 10.0);
        assert_eq!(pad.state, PenState::Idle);
        pad.pointer_down(SIGNATURE_WIDTH as f32, 10.0);
        assert_eq!(pad.state, PenState::Idle);
    }

    #[test]
    fn test_one_image_per_gesture() {
        let mut pad = SignaturePad::new();
        pad.pointer_down(10.0, 10.0);
        for x in 11..60 {
            pad.pointer_move(x as f32, 20.0);
        }
        assert!(pad.pointer_up().is_some());
        assert!(pad.pointer_up().is_none());
        assert!(pad.pointer_leave().is_none());
    }

    #[test]
    fn test_leaving_canvas_ends_gesture() {
        let mut pad = SignaturePad::new();
        pad.pointer_down(10.0, 10.0);
        pad.pointer_move(40.0, 40.0);
        assert!(matches!(pad.pointer_leave(), Some(SignatureEvent::Captured(_))));
        assert_eq!(pad.state, PenState::Idle);
    }

    #[test]
    fn test_strokes_accumulate() {
        let mut pad = SignaturePad::new();
        pad.pointer_down(20.0, 30.0);
        pad.pointer_move(120.0, 30.0);
        pad.pointer_up();
        pad.pointer_down(20.0, 100.0);
        pad.pointer_move(120.0, 100.0);
        let img = captured(pad.pointer_up());
        assert!(dark_at(&img, 70, 30));
        assert!(dark_at(&img, 70, 100));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut pad = SignaturePad::new();
        pad.pointer_down(20.0, 30.0);
        pad.pointer_move(120.0, 80.0);
        assert_eq!(pad.clear(), SignatureEvent::Cleared);
        assert_eq!(pad.state, PenState::Idle);
        assert!(is_blank(&pad.to_rgba_image()));
        assert_eq!(pad.clear(), SignatureEvent::Cleared);
    }

    #[test]
    fn test_generation_follows_user_actions() {
        let mut pad = SignaturePad::new();
        assert_eq!(pad.generation(), 0);
        pad.pointer_down(-5.0, 10.0);
        pad.pointer_move(20.0, 20.0);
        assert_eq!(pad.generation(), 0);
        pad.pointer_down(10.0, 10.0);
        assert_eq!(pad.generation(), 1);
        pad.pointer_up();
        pad.load_image(&RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255])));
        assert_eq!(pad.generation(), 1);
        pad.clear();
        assert_eq!(pad.generation(), 2);
    }

    #[test]
    fn test_load_image_at_origin_without_scaling() {
        let mut pad = SignaturePad::new();
        let small = RgbaImage::from_pixel(10, 5, image::Rgba([0, 0, 0, 255]));
        pad.load_image(&small);
        let img = pad.to_rgba_image();
        assert!(dark_at(&img, 0, 0));
        assert!(dark_at(&img, 9, 4));
        assert!(!dark_at(&img, 10, 0));
        assert!(!dark_at(&img, 0, 5));
    }

    #[test]
    fn test_load_oversized_image_is_clipped() {
        let mut pad = SignaturePad::with_size(20, 10).unwrap();
        let big = RgbaImage::from_pixel(50, 50, image::Rgba([0, 0, 0, 255]));
        pad.load_image(&big);
        assert_eq!(pad.to_rgba_image().dimensions(), (20, 10));
        assert!(pad.to_rgba_image().pixels().all(|p| p.0[0] < 128));
    }

    #[test]
    fn test_snapshot_round_trips_through_load() {
        let mut pad = SignaturePad::new();
        pad.pointer_down(20.0, 50.0);
        pad.pointer_move(120.0, 50.0);
        let Some(SignatureEvent::Captured(png)) = pad.pointer_up() else {
            panic!("no capture");
        };
        let mut reloaded = SignaturePad::new();
        reloaded.load_image(&png.decode_rgba().unwrap());
        assert_eq!(reloaded.rgba(), pad.rgba());
    }
}
