//! On-screen letter page

use super::App;
use crate::constants::VALEDICTION;
use crate::preview::{PreviewDocument, StampMark};
use crate::theme;
use eframe::egui;
use std::collections::HashMap;

// A4 at 96 dpi
const PAGE_WIDTH: f32 = 794.0;
const PAGE_HEIGHT: f32 = 1123.0;
const PAGE_MARGIN: i8 = 48;

const LOGO_SIZE: egui::Vec2 = egui::vec2(96.0, 96.0);
const SIGNATURE_SIZE: egui::Vec2 = egui::vec2(200.0, 75.0);
const TOP_STAMP_SIZE: f32 = 96.0;
const BOTTOM_STAMP_SIZE: f32 = 80.0;

type Textures = HashMap<&'static str, egui::TextureHandle>;

fn page_text(text: &str, size: f32) -> egui::RichText {
    egui::RichText::new(text).size(size).color(theme::PAGE_INK)
}

/// Draw `texture` fitted inside `max` keeping its aspect ratio.
fn fitted_image(ui: &mut egui::Ui, texture: &egui::TextureHandle, max: egui::Vec2) {
    let size = texture.size_vec2();
    let scale = (max.x / size.x).min(max.y / size.y).min(1.0);
    ui.add(egui::Image::new((texture.id(), size * scale)));
}

/// Round badge with the label slightly rotated, like an ink stamp.
fn paint_badge(painter: &egui::Painter, rect: egui::Rect, label: &str) {
    let center = rect.center();
    let radius = rect.width().min(rect.height()) / 2.0 - 2.0;
    painter.circle(
        center,
        radius,
        theme::STAMP_FILL,
        egui::Stroke::new(4.0, theme::STAMP_RED),
    );

    let angle = -12f32.to_radians();
    let galley = painter.layout(
        label.to_string(),
        egui::FontId::proportional(12.0),
        theme::STAMP_RED,
        radius * 1.6,
    );
    let rot = egui::emath::Rot2::from_angle(angle);
    let pos = center - rot * (galley.size() / 2.0);
    painter.add(egui::epaint::TextShape::new(pos, galley, theme::STAMP_RED).with_angle(angle));
}

/// Paint a stamp mark into `rect`. Nothing is drawn for an empty mark.
fn paint_stamp(ui: &egui::Ui, rect: egui::Rect, mark: &StampMark, texture: Option<&egui::TextureHandle>) {
    match (mark, texture) {
        (StampMark::Image(_), Some(texture)) => {
            let size = texture.size_vec2();
            let scale = (rect.width() / size.x).min(rect.height() / size.y);
            let image_rect = egui::Rect::from_center_size(rect.center(), size * scale);
            ui.painter().image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        (StampMark::Badge(label), _) => paint_badge(ui.painter(), rect, label),
        _ => {}
    }
}

/// Allocate space for a stamp in the layout and paint it.
fn stamp_slot(ui: &mut egui::Ui, mark: &StampMark, texture: Option<&egui::TextureHandle>, size: f32) {
    if mark.is_empty() {
        return;
    }
    let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    paint_stamp(ui, rect, mark, texture);
}

fn render_header(ui: &mut egui::Ui, doc: &PreviewDocument, textures: &Textures) {
    ui.columns(2, |cols| {
        cols[0].horizontal_top(|ui| {
            if let Some(logo) = textures.get("logo") {
                fitted_image(ui, logo, LOGO_SIZE);
                ui.add_space(theme::SPACING_LG);
            }
            ui.vertical(|ui| {
                for line in &doc.letterhead {
                    ui.label(page_text(line, 20.0).color(theme::PAGE_HEADING).strong());
                }
                for line in &doc.subhead {
                    ui.label(page_text(line, 12.0).color(theme::PAGE_MUTED));
                }
            });
        });
        cols[1].with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
            for line in &doc.contact_lines {
                ui.add(egui::Label::new(page_text(line, 10.0).color(theme::PAGE_MUTED)).wrap());
            }
        });
    });
    ui.add_space(theme::SPACING_MD);
    let (rule, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 2.0), egui::Sense::hover());
    ui.painter().rect_filled(rule, 0.0, theme::PAGE_HEADING);
}

fn render_closing(ui: &mut egui::Ui, doc: &PreviewDocument, textures: &Textures) {
    ui.columns(2, |cols| {
        let ui = &mut cols[0];
        ui.label(page_text(VALEDICTION, 12.0).strong());
        ui.add_space(theme::SPACING_MD);
        match textures.get("signature") {
            Some(signature) => fitted_image(ui, signature, SIGNATURE_SIZE),
            None => {
                ui.allocate_exact_size(SIGNATURE_SIZE, egui::Sense::hover());
            }
        }
        let (rule, _) = ui.allocate_exact_size(egui::vec2(SIGNATURE_SIZE.x, 1.0), egui::Sense::hover());
        ui.painter().rect_filled(rule, 0.0, theme::PAGE_INK);
        ui.label(page_text(&doc.name, 12.0).strong());
        ui.label(page_text(&doc.position, 11.0).color(theme::PAGE_MUTED));

        cols[1].with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
            stamp_slot(ui, &doc.seal, textures.get("seal"), BOTTOM_STAMP_SIZE);
            ui.add_space(theme::SPACING_MD);
            stamp_slot(ui, &doc.bottom_stamp, textures.get("bottom_stamp"), BOTTOM_STAMP_SIZE);
        });
    });
}

impl App {
    pub fn render_preview(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let doc = PreviewDocument::from_record(&self.record);
        let textures = self.preview_texture_set(ctx, &doc);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(theme::SPACING_XL);
                ui.vertical_centered(|ui| {
                    let page = egui::Frame::new()
                        .fill(theme::PAGE_BG)
                        .corner_radius(theme::RADIUS_SMALL)
                        .inner_margin(egui::Margin::same(PAGE_MARGIN))
                        .shadow(egui::epaint::Shadow {
                            offset: [0, 4],
                            blur: 16,
                            spread: 0,
                            color: egui::Color32::from_black_alpha(120),
                        })
                        .show(ui, |ui| {
                            let inner = PAGE_WIDTH - 2.0 * PAGE_MARGIN as f32;
                            ui.set_width(inner);
                            ui.set_min_height(PAGE_HEIGHT - 2.0 * PAGE_MARGIN as f32);
                            ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                                render_header(ui, &doc, &textures);
                                ui.add_space(theme::SPACING_XL);

                                // Recipient and date
                                ui.horizontal(|ui| {
                                    ui.label(page_text("ATTENTION TO:", 12.0).strong());
                                    ui.label(page_text(&doc.attention_to, 12.0));
                                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                        ui.label(page_text(&doc.date, 12.0));
                                        ui.label(page_text("Date:", 12.0).strong());
                                    });
                                });
                                ui.add_space(TOP_STAMP_SIZE * 0.5);

                                if !doc.subject.trim().is_empty() {
                                    ui.vertical_centered(|ui| {
                                        ui.label(page_text(&doc.subject, 13.0).strong().underline());
                                    });
                                    ui.add_space(theme::SPACING_LG);
                                }

                                for line in &doc.body {
                                    if line.trim().is_empty() {
                                        ui.add_space(theme::SPACING_MD);
                                    } else {
                                        ui.add(egui::Label::new(page_text(line, 12.0)).wrap());
                                    }
                                }
                                ui.add_space(theme::SPACING_XL * 2.0);

                                render_closing(ui, &doc, &textures);
                            });
                        });

                    // Top stamp overlaps the date row, in the top-right corner of the page
                    let page_rect = page.response.rect;
                    let stamp_rect = egui::Rect::from_min_size(
                        egui::pos2(
                            page_rect.right() - PAGE_MARGIN as f32 - TOP_STAMP_SIZE,
                            page_rect.top() + 128.0,
                        ),
                        egui::vec2(TOP_STAMP_SIZE, TOP_STAMP_SIZE),
                    );
                    paint_stamp(ui, stamp_rect, &doc.top_stamp, textures.get("top_stamp"));
                });
                ui.add_space(theme::SPACING_XL);
            });
    }
}
