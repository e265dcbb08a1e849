//! Letter form rendering

use super::App;
use crate::form::{FieldChange, LetterForm};
use crate::image_ref::{ImageFormat, ImageRef};
use crate::letter::{ContactKind, RequiredField, StampSlot};
use crate::settings::Settings;
use crate::theme;
use crate::types::{ImageSource, ImageTarget};
use crate::ui::components::{field_label, image_chip, input_frame};
use crate::ui::signature_pad::signature_pad;
use eframe::egui;
use egui_phosphor::regular as icons;
use std::path::PathBuf;
use tracing::debug;

const FORM_WIDTH: f32 = 720.0;

/// Text input bound to a draft field. Returns the new text if it was edited.
fn text_input(ui: &mut egui::Ui, value: &str, hint: &str, rows: usize, missing: bool) -> Option<String> {
    let mut text = value.to_string();
    let changed = input_frame(missing)
        .show(ui, |ui| {
            let edit = if rows > 1 {
                egui::TextEdit::multiline(&mut text).desired_rows(rows)
            } else {
                egui::TextEdit::singleline(&mut text)
            };
            ui.add(edit.hint_text(hint).frame(false).desired_width(f32::INFINITY))
                .changed()
        })
        .inner;
    changed.then_some(text)
}

/// Native image picker starting in the last used folder.
fn pick_image(settings: &mut Settings, title: &str) -> Option<PathBuf> {
    let path = rfd::FileDialog::new()
        .set_title(title)
        .set_directory(settings.image_dir_or_default())
        .add_filter("Images", &ImageFormat::EXTENSIONS)
        .pick_file()?;
    if let Some(parent) = path.parent() {
        settings.image_dir = Some(parent.to_string_lossy().to_string());
    }
    Some(path)
}

fn section_title(ui: &mut egui::Ui, icon: &str, title: &str) {
    ui.label(
        egui::RichText::new(format!("{}  {}", icon, title))
            .size(theme::FONT_HEADING)
            .color(theme::TEXT_PRIMARY)
            .strong(),
    );
    ui.add_space(theme::SPACING_SM);
}

/// Upload button plus the chip of the current image. `remove` is applied when
/// the chip's remove button is clicked.
fn image_picker_row(
    ui: &mut egui::Ui,
    form: &mut LetterForm,
    settings: &mut Settings,
    target: ImageTarget,
    current: Option<&ImageRef>,
    remove: FieldChange,
) {
    let ctx = ui.ctx().clone();
    let mut removed = false;
    ui.horizontal(|ui| {
        if ui
            .add(theme::button(format!("{}  Upload image", icons::UPLOAD_SIMPLE)))
            .clicked()
        {
            if let Some(path) = pick_image(settings, "Choose Image") {
                form.request_image(target, ImageSource::File(path), &ctx);
            }
        }
        if let Some(image) = current {
            removed = image_chip(ui, image);
        }
    });
    if removed {
        debug!(dest = ?target, "Image removed");
        form.edit(remove);
    }
}

impl App {
    pub fn render_form(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let settings = &mut self.settings;
        let signature_texture = &mut self.signature_texture;
        let mut submitted = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(FORM_WIDTH);
                    ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                        ui.add_space(theme::SPACING_XL);
                        let missing = form.highlighted_missing();
                        let is_missing = |field: RequiredField| missing.contains(&field);

                        // Load failures
                        if let Some(message) = form.load_error().map(str::to_string) {
                            egui::Frame::new()
                                .fill(egui::Color32::from_rgba_unmultiplied(0xf8, 0x71, 0x71, 20))
                                .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::STATUS_ERROR))
                                .corner_radius(theme::RADIUS_DEFAULT)
                                .inner_margin(egui::Margin::symmetric(12, 8))
                                .show(ui, |ui| {
                                    ui.horizontal(|ui| {
                                        ui.label(
                                            egui::RichText::new(format!("{}  {}", icons::WARNING, message))
                                                .color(theme::STATUS_ERROR),
                                        );
                                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                            if ui.add(egui::Button::new(icons::X).frame(false)).clicked() {
                                                form.dismiss_load_error();
                                            }
                                        });
                                    });
                                });
                            ui.add_space(theme::SPACING_MD);
                        }

                        // Recipient
                        theme::card_frame().show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            section_title(ui, icons::FILE_TEXT, "Letter Details");

                            field_label(ui, icons::CALENDAR, "Date", is_missing(RequiredField::Date));
                            let date = form.draft().date;
                            ui.horizontal(|ui| match date {
                                Some(mut date) => {
                                    let resp = ui.add(
                                        egui_extras::DatePickerButton::new(&mut date)
                                            .id_salt("letter_date")
                                            .format("%B %-d, %Y"),
                                    );
                                    if resp.changed() {
                                        form.edit(FieldChange::Date(Some(date)));
                                    }
                                    if ui.add(egui::Button::new(icons::X).frame(false)).clicked() {
                                        form.edit(FieldChange::Date(None));
                                    }
                                }
                                None => {
                                    if ui
                                        .add(theme::button(format!("{}  Pick date", icons::CALENDAR)))
                                        .clicked()
                                    {
                                        let today = chrono::Local::now().date_naive();
                                        form.edit(FieldChange::Date(Some(today)));
                                    }
                                }
                            });
                            ui.add_space(theme::SPACING_MD);

                            field_label(ui, icons::USER, "Attention To", is_missing(RequiredField::AttentionTo));
                            if let Some(text) = text_input(
                                ui,
                                &form.draft().attention_to,
                                "Recipient name",
                                1,
                                is_missing(RequiredField::AttentionTo),
                            ) {
                                form.edit(FieldChange::AttentionTo(text));
                            }
                        });
                        ui.add_space(theme::SPACING_MD);

                        // Company
                        theme::card_frame().show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            section_title(ui, icons::BUILDINGS, "Company");

                            field_label(ui, icons::TEXT_AA, "Letterhead", is_missing(RequiredField::Letterhead));
                            if let Some(text) = text_input(
                                ui,
                                &form.draft().letterhead,
                                "Company name (one line per row)",
                                2,
                                is_missing(RequiredField::Letterhead),
                            ) {
                                form.edit(FieldChange::Letterhead(text));
                            }
                            ui.add_space(theme::SPACING_MD);

                            field_label(ui, icons::TEXT_AA, "Subhead", is_missing(RequiredField::Subhead));
                            if let Some(text) = text_input(
                                ui,
                                &form.draft().subhead,
                                "Business line",
                                2,
                                is_missing(RequiredField::Subhead),
                            ) {
                                form.edit(FieldChange::Subhead(text));
                            }
                            ui.add_space(theme::SPACING_MD);

                            field_label(ui, icons::IMAGE, "Logo", false);
                            let logo = form.draft().logo.clone();
                            image_picker_row(
                                ui,
                                form,
                                settings,
                                ImageTarget::Logo,
                                logo.as_ref(),
                                FieldChange::Logo(None),
                            );
                            ui.add_space(theme::SPACING_MD);

                            field_label(
                                ui,
                                icons::ADDRESS_BOOK,
                                "Contact Info",
                                is_missing(RequiredField::ContactInfo),
                            );
                            if let Some(text) = text_input(
                                ui,
                                form.contact_text(),
                                "Phone: +1 555 0100\nEmail: office@example.com",
                                4,
                                is_missing(RequiredField::ContactInfo),
                            ) {
                                form.set_contact_text(text);
                            }
                            let kinds: Vec<&str> = ContactKind::ALL.iter().map(|k| k.label()).collect();
                            ui.label(
                                egui::RichText::new(format!("One entry per line, starting with {} and a colon", kinds.join(" / ")))
                                    .size(theme::FONT_SMALL)
                                    .color(theme::TEXT_DIM),
                            );
                        });
                        ui.add_space(theme::SPACING_MD);

                        // Content
                        theme::card_frame().show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            section_title(ui, icons::NOTE_PENCIL, "Content");

                            field_label(ui, icons::TEXT_T, "Subject", false);
                            if let Some(text) =
                                text_input(ui, &form.draft().subject, "RE: ...", 1, false)
                            {
                                form.edit(FieldChange::Subject(text));
                            }
                            ui.add_space(theme::SPACING_MD);

                            field_label(ui, icons::ARTICLE, "Letter Body", is_missing(RequiredField::LetterBody));
                            if let Some(text) = text_input(
                                ui,
                                &form.draft().letter_body,
                                "Write the letter here",
                                12,
                                is_missing(RequiredField::LetterBody),
                            ) {
                                form.edit(FieldChange::LetterBody(text));
                            }
                        });
                        ui.add_space(theme::SPACING_MD);

                        // Signature
                        theme::card_frame().show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            section_title(ui, icons::PEN_NIB, "Signature");

                            if let Some(event) = signature_pad(ui, form.pad_mut(), signature_texture) {
                                form.on_signature_event(event);
                            }
                            ui.add_space(theme::SPACING_SM);
                            ui.horizontal(|ui| {
                                if ui.add(theme::button(format!("{}  Clear", icons::TRASH))).clicked() {
                                    form.clear_signature();
                                }
                                if ui
                                    .add(theme::button(format!("{}  Upload signature", icons::UPLOAD_SIMPLE)))
                                    .clicked()
                                {
                                    if let Some(path) = pick_image(settings, "Choose Signature") {
                                        form.request_image(
                                            ImageTarget::SignatureUpload,
                                            ImageSource::File(path),
                                            ctx,
                                        );
                                    }
                                }
                                if form.is_loading() {
                                    ui.spinner();
                                }
                            });
                            ui.add_space(theme::SPACING_MD);

                            field_label(ui, icons::USER, "Name", is_missing(RequiredField::Name));
                            if let Some(text) = text_input(
                                ui,
                                &form.draft().name,
                                "Signatory name",
                                1,
                                is_missing(RequiredField::Name),
                            ) {
                                form.edit(FieldChange::Name(text));
                            }
                            ui.add_space(theme::SPACING_MD);

                            field_label(ui, icons::IDENTIFICATION_BADGE, "Position", is_missing(RequiredField::Position));
                            if let Some(text) = text_input(
                                ui,
                                &form.draft().position,
                                "Job title",
                                1,
                                is_missing(RequiredField::Position),
                            ) {
                                form.edit(FieldChange::Position(text));
                            }
                        });
                        ui.add_space(theme::SPACING_MD);

                        // Stamps
                        theme::card_frame().show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            section_title(ui, icons::STAMP, "Stamps");

                            for slot in StampSlot::ALL {
                                field_label(ui, icons::SEAL_CHECK, slot.title(), false);
                                let (label, image) = form.draft().stamp(slot);
                                let label = label.to_string();
                                let image = image.cloned();
                                if let Some(text) = text_input(ui, &label, slot.placeholder(), 1, false) {
                                    form.edit(FieldChange::StampLabel(slot, text));
                                }
                                image_picker_row(
                                    ui,
                                    form,
                                    settings,
                                    ImageTarget::Stamp(slot),
                                    image.as_ref(),
                                    FieldChange::StampImage(slot, None),
                                );
                                ui.add_space(theme::SPACING_MD);
                            }
                        });
                        ui.add_space(theme::SPACING_LG);

                        // Submit
                        if !missing.is_empty() {
                            let names: Vec<&str> = missing.iter().map(|f| f.label()).collect();
                            ui.label(
                                egui::RichText::new(format!(
                                    "{}  Please fill in: {}",
                                    icons::WARNING,
                                    names.join(", ")
                                ))
                                .color(theme::STATUS_ERROR),
                            );
                            ui.add_space(theme::SPACING_SM);
                        }
                        let generate = ui.add_sized(
                            [ui.available_width(), theme::BUTTON_HEIGHT_LARGE],
                            theme::button_accent(format!("{}  Generate Letter", icons::FILE_TEXT)),
                        );
                        if generate.clicked() {
                            form.submit(|record| submitted = Some(record));
                        }
                        ui.add_space(theme::SPACING_XL);
                    });
                });
            });

        if let Some(record) = submitted {
            self.finish_editing(record);
        }
    }
}
