//! Reusable UI components
//!
//! This module contains standalone UI components that can be used
//! throughout the application.

use crate::image_ref::ImageRef;
use crate::theme;
use crate::utils::format_bytes;
use eframe::egui;

/// Field label with a leading icon. Missing required fields get a red marker.
pub fn field_label(ui: &mut egui::Ui, icon: &str, text: &str, missing: bool) {
    ui.horizontal(|ui| {
        let color = if missing { theme::STATUS_ERROR } else { theme::TEXT_SECONDARY };
        ui.add(
            egui::Label::new(
                egui::RichText::new(format!("{}  {}", icon, text))
                    .size(theme::FONT_LABEL)
                    .color(color),
            )
            .selectable(false),
        );
        if missing {
            ui.add(
                egui::Label::new(
                    egui::RichText::new("required")
                        .size(theme::FONT_CAPTION)
                        .color(theme::STATUS_ERROR),
                )
                .selectable(false),
            );
        }
    });
}

/// Frame around a text input; red outline when the field is missing.
pub fn input_frame(missing: bool) -> egui::Frame {
    let stroke = if missing { theme::STATUS_ERROR } else { theme::BORDER_DEFAULT };
    egui::Frame::new()
        .fill(theme::BG_INPUT)
        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, stroke))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::symmetric(6, 4))
}

/// Chip showing an attached image. Returns true if the remove button was clicked.
pub fn image_chip(ui: &mut egui::Ui, image: &ImageRef) -> bool {
    let mut removed = false;
    egui::Frame::new()
        .fill(theme::BG_SURFACE)
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::symmetric(8, 3))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{}  {} ({})",
                        egui_phosphor::regular::IMAGE,
                        image.display_name(),
                        format_bytes(image.bytes().len() as u64)
                    ))
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_SECONDARY),
                )
                .on_hover_text(image.format().mime_type());
                let resp = ui.add(
                    egui::Button::new(egui::RichText::new(egui_phosphor::regular::X).size(theme::FONT_SMALL))
                        .frame(false),
                );
                if resp.on_hover_text("Remove image").clicked() {
                    removed = true;
                }
            });
        });
    removed
}

/// Custom checkbox widget with consistent styling
pub fn styled_checkbox(ui: &mut egui::Ui, selected: bool, size: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::click());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let rounding = 3.0;

        if selected {
            painter.rect_filled(rect, rounding, theme::ACCENT);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::regular::CHECK,
                egui::FontId::proportional(size * 0.7),
                egui::Color32::WHITE,
            );
        } else {
            painter.rect_stroke(
                rect,
                rounding,
                egui::Stroke::new(1.5, theme::BORDER_DEFAULT),
                egui::StrokeKind::Inside,
            );
        }
    }

    response
}
