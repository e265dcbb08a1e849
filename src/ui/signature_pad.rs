//! Signature pad widget
//!
//! Feeds raw pointer events to a [`SignaturePad`] so every intermediate pointer
//! position becomes a segment, not just the last position of the frame.

use crate::signature::{SignatureEvent, SignaturePad};
use crate::theme;
use eframe::egui;

/// Cached texture of the pad with the pad revision it was uploaded at.
pub type PadTexture = Option<(u64, egui::TextureHandle)>;

fn sync_texture(ctx: &egui::Context, pad: &SignaturePad, texture: &mut PadTexture) -> egui::TextureId {
    let size = [pad.width() as usize, pad.height() as usize];
    match texture {
        Some((rev, handle)) if *rev == pad.revision() => handle.id(),
        Some((rev, handle)) => {
            let image = egui::ColorImage::from_rgba_unmultiplied(size, &pad.rgba());
            handle.set(image, egui::TextureOptions::LINEAR);
            *rev = pad.revision();
            handle.id()
        }
        None => {
            let image = egui::ColorImage::from_rgba_unmultiplied(size, &pad.rgba());
            let handle = ctx.load_texture("signature_pad", image, egui::TextureOptions::LINEAR);
            let id = handle.id();
            *texture = Some((pad.revision(), handle));
            id
        }
    }
}

/// No popup or window sits above the panel at `pos`.
fn uncovered(ui: &egui::Ui, pos: egui::Pos2) -> bool {
    ui.ctx().layer_id_at(pos).map_or(true, |layer| layer == ui.layer_id())
}

/// Draw the pad and apply this frame's pointer events. Returns the event the
/// pad emitted, if a gesture ended.
pub fn signature_pad(
    ui: &mut egui::Ui,
    pad: &mut SignaturePad,
    texture: &mut PadTexture,
) -> Option<SignatureEvent> {
    let size = egui::vec2(pad.width() as f32, pad.height() as f32);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::drag());
    response.on_hover_cursor(egui::CursorIcon::Crosshair);

    let mut emitted = None;
    let events = ui.input(|i| i.events.clone());
    for event in &events {
        match event {
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed: true,
                ..
            } if rect.contains(*pos) && uncovered(ui, *pos) => {
                let local = *pos - rect.min;
                pad.pointer_down(local.x, local.y);
            }
            egui::Event::PointerMoved(pos) if pad.is_drawing() => {
                if rect.contains(*pos) {
                    let local = *pos - rect.min;
                    pad.pointer_move(local.x, local.y);
                } else {
                    emitted = pad.pointer_leave().or(emitted);
                }
            }
            egui::Event::PointerButton {
                button: egui::PointerButton::Primary,
                pressed: false,
                ..
            } => {
                emitted = pad.pointer_up().or(emitted);
            }
            egui::Event::PointerGone => {
                emitted = pad.pointer_leave().or(emitted);
            }
            _ => {}
        }
    }

    let texture_id = sync_texture(ui.ctx(), pad, texture);
    let painter = ui.painter();
    painter.image(
        texture_id,
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
    let border = if pad.is_drawing() { theme::ACCENT } else { theme::BORDER_DEFAULT };
    painter.rect_stroke(
        rect,
        theme::RADIUS_DEFAULT,
        egui::Stroke::new(theme::STROKE_DEFAULT, border),
        egui::StrokeKind::Outside,
    );

    emitted
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives the widget through real egui frames.
    struct Harness {
        ctx: egui::Context,
        pad: SignaturePad,
        texture: PadTexture,
        origin: egui::Pos2,
    }

    impl Harness {
        fn new() -> Self {
            let mut harness = Self {
                ctx: egui::Context::default(),
                pad: SignaturePad::new(),
                texture: None,
                origin: egui::Pos2::ZERO,
            };
            harness.frame(Vec::new());
            harness
        }

        /// Screen position of a pad-local point.
        fn at(&self, x: f32, y: f32) -> egui::Pos2 {
            self.origin + egui::vec2(x, y)
        }

        fn frame(&mut self, events: Vec<egui::Event>) -> Vec<SignatureEvent> {
            let input = egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0))),
                events,
                ..Default::default()
            };
            let mut emitted = Vec::new();
            let ctx = self.ctx.clone();
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default()
                    .frame(egui::Frame::new())
                    .show(ctx, |ui| {
                        self.origin = ui.next_widget_position();
                        emitted.extend(signature_pad(ui, &mut self.pad, &mut self.texture));
                    });
            });
            emitted
        }
    }

    fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::default(),
        }
    }

    fn captured(events: &[SignatureEvent]) -> image::RgbaImage {
        match events {
            [SignatureEvent::Captured(img)] => img.decode_rgba().unwrap(),
            other => panic!("expected one captured image, got {:?}", other),
        }
    }

    #[test]
    fn test_press_move_release_draws_stroke() {
        let mut h = Harness::new();
        let events = vec![
            button(h.at(20.0, 50.0), true),
            egui::Event::PointerMoved(h.at(120.0, 50.0)),
        ];
        assert!(h.frame(events).is_empty());
        assert!(h.pad.is_drawing());

        let img = captured(&h.frame(vec![button(h.at(120.0, 50.0), false)]));
        assert!(!h.pad.is_drawing());
        assert!(img.get_pixel(70, 50).0[0] < 128);
    }

    #[test]
    fn test_every_move_in_a_frame_becomes_a_segment() {
        let mut h = Harness::new();
        let events = vec![
            button(h.at(20.0, 30.0), true),
            egui::Event::PointerMoved(h.at(120.0, 30.0)),
            egui::Event::PointerMoved(h.at(120.0, 130.0)),
            button(h.at(120.0, 130.0), false),
        ];
        let img = captured(&h.frame(events));
        assert!(img.get_pixel(70, 30).0[0] < 128);
        assert!(img.get_pixel(120, 80).0[0] < 128);
        assert!(img.get_pixel(70, 80).0[0] > 128);
    }

    #[test]
    fn test_moving_off_the_pad_ends_gesture() {
        let mut h = Harness::new();
        let events = vec![
            button(h.at(20.0, 50.0), true),
            egui::Event::PointerMoved(h.at(60.0, 50.0)),
            egui::Event::PointerMoved(h.at(60.0, 300.0)),
        ];
        let emitted = h.frame(events);
        assert!(matches!(emitted.as_slice(), [SignatureEvent::Captured(_)]));
        assert!(!h.pad.is_drawing());

        // Coming back without a new press does not draw
        let revision = h.pad.revision();
        let events = vec![
            egui::Event::PointerMoved(h.at(60.0, 50.0)),
            egui::Event::PointerMoved(h.at(100.0, 50.0)),
            button(h.at(100.0, 50.0), false),
        ];
        assert!(h.frame(events).is_empty());
        assert_eq!(h.pad.revision(), revision);
    }

    #[test]
    fn test_pointer_gone_ends_gesture() {
        let mut h = Harness::new();
        let events = vec![
            button(h.at(20.0, 50.0), true),
            egui::Event::PointerMoved(h.at(80.0, 60.0)),
            egui::Event::PointerGone,
        ];
        let img = captured(&h.frame(events));
        assert!(!h.pad.is_drawing());
        assert!(img.get_pixel(50, 55).0[0] < 128);
    }

    #[test]
    fn test_press_outside_pad_is_ignored() {
        let mut h = Harness::new();
        let events = vec![
            button(h.at(500.0, 50.0), true),
            egui::Event::PointerMoved(h.at(60.0, 50.0)),
            button(h.at(60.0, 50.0), false),
        ];
        assert!(h.frame(events).is_empty());
        assert!(!h.pad.is_drawing());
        assert_eq!(h.pad.generation(), 0);
    }

    #[test]
    fn test_texture_follows_pad_revision() {
        let mut h = Harness::new();
        assert_eq!(h.texture.as_ref().map(|(rev, _)| *rev), Some(h.pad.revision()));
        h.frame(vec![
            button(h.at(20.0, 50.0), true),
            egui::Event::PointerMoved(h.at(120.0, 50.0)),
        ]);
        assert_eq!(h.texture.as_ref().map(|(rev, _)| *rev), Some(h.pad.revision()));
    }
}
