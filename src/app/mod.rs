//! App module - contains the main application state and logic

mod form_view;
mod preview_view;
mod print;
mod textures;

use crate::form::LetterForm;
use crate::image_ref::ImageRef;
use crate::letter::LetterRecord;
use crate::settings::Settings;
use crate::theme;
use crate::types::DisplayMode;
use crate::ui::signature_pad::PadTexture;
use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    /// The finished letter; only replaced by a form submission.
    pub(crate) record: LetterRecord,
    pub(crate) mode: DisplayMode,
    /// Present only while editing. Dropping it cancels its pending loads.
    pub(crate) form: Option<LetterForm>,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) settings: Settings,
    pub(crate) data_dir: PathBuf,
    // Textures
    pub(crate) signature_texture: PadTexture,
    pub(crate) preview_textures: HashMap<&'static str, (ImageRef, Option<egui::TextureHandle>)>,
    // Central panel rect for toast positioning
    pub(crate) central_panel_rect: Option<egui::Rect>,
    // Toast notification
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    // Window geometry
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> std::io::Result<Self> {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let runtime = tokio::runtime::Runtime::new()?;
        let record = LetterRecord::sample();
        let form = LetterForm::new(&record, runtime.handle().clone(), &cc.egui_ctx);

        Ok(Self {
            record,
            mode: DisplayMode::Editing,
            form: Some(form),
            runtime,
            settings,
            data_dir,
            signature_texture: None,
            preview_textures: HashMap::new(),
            central_panel_rect: None,
            toast_message: None,
            toast_start: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
        })
    }

    /// Previewing -> Editing. The record is left as is; the form starts from a copy.
    pub fn start_editing(&mut self, ctx: &egui::Context) {
        info!("Editing letter");
        self.form = Some(LetterForm::new(&self.record, self.runtime.handle().clone(), ctx));
        self.signature_texture = None;
        self.mode = DisplayMode::Editing;
    }

    /// Editing -> Previewing with the submitted record.
    pub fn finish_editing(&mut self, record: LetterRecord) {
        info!(letterhead = %record.letterhead, "Letter submitted");
        self.record = record;
        self.form = None;
        self.signature_texture = None;
        self.mode = DisplayMode::Previewing;
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_start = Some(std::time::Instant::now());
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        debug!("Saving settings");
        self.settings.save(&self.data_dir);
    }
}
