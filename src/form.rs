//! Letter form state
//!
//! The form works on a private draft. Every edit goes through [`apply_change`],
//! which returns a new record with exactly one field replaced. Image files are
//! read and decoded on the tokio runtime; results come back over a channel and
//! are applied in arrival order when the UI polls.

use crate::image_ref::{ImageError, ImageRef};
use crate::letter::{decode_contacts, encode_contacts, ContactEntry, LetterRecord, RequiredField, StampSlot};
use crate::signature::{SignatureEvent, SignaturePad};
use crate::types::{ImageSource, ImageTarget, LoadResult, LoadedImage};
use chrono::NaiveDate;
use eframe::egui;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A single field edit.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Date(Option<NaiveDate>),
    AttentionTo(String),
    Letterhead(String),
    Subhead(String),
    Logo(Option<ImageRef>),
    ContactInfo(Vec<ContactEntry>),
    Subject(String),
    LetterBody(String),
    Signature(Option<ImageRef>),
    Name(String),
    Position(String),
    StampLabel(StampSlot, String),
    StampImage(StampSlot, Option<ImageRef>),
}

/// Return a copy of `draft` with the one field named by `change` replaced.
pub fn apply_change(draft: &LetterRecord, change: FieldChange) -> LetterRecord {
    let mut next = draft.clone();
    match change {
        FieldChange::Date(v) => next.date = v,
        FieldChange::AttentionTo(v) => next.attention_to = v,
        FieldChange::Letterhead(v) => next.letterhead = v,
        FieldChange::Subhead(v) => next.subhead = v,
        FieldChange::Logo(v) => next.logo = v,
        FieldChange::ContactInfo(v) => next.contact_info = v,
        FieldChange::Subject(v) => next.subject = v,
        FieldChange::LetterBody(v) => next.letter_body = v,
        FieldChange::Signature(v) => next.signature_image = v,
        FieldChange::Name(v) => next.name = v,
        FieldChange::Position(v) => next.position = v,
        FieldChange::StampLabel(slot, v) => match slot {
            StampSlot::TopApproval => next.approval_stamp = v,
            StampSlot::CompanySeal => next.stamp = v,
            StampSlot::BottomApproval => next.bottom_approval_stamp = v,
        },
        FieldChange::StampImage(slot, v) => match slot {
            StampSlot::TopApproval => next.approval_stamp_file = v,
            StampSlot::CompanySeal => next.stamp_file = v,
            StampSlot::BottomApproval => next.bottom_approval_stamp_file = v,
        },
    }
    next
}

/// Read, validate and decode an image off the UI thread.
async fn load_image(source: ImageSource, target: ImageTarget) -> Result<LoadedImage, ImageError> {
    let image = match source {
        ImageSource::File(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| ImageError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
            let name = path.file_name().map(|n| n.to_string_lossy().to_string());
            ImageRef::from_bytes(bytes, name)?
        }
        ImageSource::Memory(image) => image,
    };

    tokio::task::spawn_blocking(move || -> Result<LoadedImage, ImageError> {
        let pixels = image.decode_rgba()?;
        // Uploaded signatures take the same PNG form the pad produces
        let image = if target == ImageTarget::SignatureUpload {
            ImageRef::png_from_rgba(&pixels)?
        } else {
            image
        };
        Ok(LoadedImage { image, pixels })
    })
    .await
    .map_err(|_| ImageError::Interrupted)?
}

pub struct LetterForm {
    draft: LetterRecord,
    /// Raw contact text as typed; the draft holds the parsed entries.
    contact_text: String,
    pad: SignaturePad,
    show_missing: bool,
    load_error: Option<String>,
    pending_loads: usize,
    runtime: tokio::runtime::Handle,
    cancel_token: CancellationToken,
    load_tx: mpsc::UnboundedSender<LoadResult>,
    load_rx: mpsc::UnboundedReceiver<LoadResult>,
}

impl LetterForm {
    /// Build a form over a copy of `initial`. An existing signature is
    /// repainted onto the pad once it has been decoded.
    pub fn new(initial: &LetterRecord, runtime: tokio::runtime::Handle, ctx: &egui::Context) -> Self {
        let (load_tx, load_rx) = mpsc::unbounded_channel();
        let mut form = Self {
            draft: initial.clone(),
            contact_text: encode_contacts(&initial.contact_info),
            pad: SignaturePad::new(),
            show_missing: false,
            load_error: None,
            pending_loads: 0,
            runtime,
            cancel_token: CancellationToken::new(),
            load_tx,
            load_rx,
        };
        if let Some(signature) = initial.signature_image.clone() {
            form.request_image(ImageTarget::SignatureReload, ImageSource::Memory(signature), ctx);
        }
        form
    }

    pub fn draft(&self) -> &LetterRecord {
        &self.draft
    }

    pub fn contact_text(&self) -> &str {
        &self.contact_text
    }

    #[cfg(test)]
    pub fn pad(&self) -> &SignaturePad {
        &self.pad
    }

    pub fn pad_mut(&mut self) -> &mut SignaturePad {
        &mut self.pad
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn dismiss_load_error(&mut self) {
        self.load_error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.pending_loads > 0
    }

    /// Required fields to highlight; empty until a submit has been refused.
    pub fn highlighted_missing(&self) -> Vec<RequiredField> {
        if self.show_missing {
            self.draft.missing_required()
        } else {
            Vec::new()
        }
    }

    pub fn edit(&mut self, change: FieldChange) {
        self.draft = apply_change(&self.draft, change);
    }

    /// Replace the contact text and re-parse it into the draft.
    pub fn set_contact_text(&mut self, text: String) {
        let entries = decode_contacts(&text);
        self.contact_text = text;
        self.edit(FieldChange::ContactInfo(entries));
    }

    /// Route a signature pad event into the draft.
    pub fn on_signature_event(&mut self, event: SignatureEvent) {
        match event {
            SignatureEvent::Captured(image) => self.edit(FieldChange::Signature(Some(image))),
            SignatureEvent::Cleared => self.edit(FieldChange::Signature(None)),
        }
    }

    pub fn clear_signature(&mut self) {
        let event = self.pad.clear();
        self.on_signature_event(event);
    }

    /// Hand the draft to `on_complete` when every required field is filled.
    /// Returns whether it was called.
    pub fn submit(&mut self, on_complete: impl FnOnce(LetterRecord)) -> bool {
        let missing = self.draft.missing_required();
        if !missing.is_empty() {
            self.show_missing = true;
            debug!(missing = ?missing, "Submit refused");
            return false;
        }
        self.show_missing = false;
        on_complete(self.draft.clone());
        true
    }

    /// Start loading an image for `target` in the background.
    pub fn request_image(&mut self, target: ImageTarget, source: ImageSource, ctx: &egui::Context) {
        let tx = self.load_tx.clone();
        let token = self.cancel_token.clone();
        let ctx = ctx.clone();
        let source_name = source.describe();
        let pad_generation = self.pad.generation();
        self.pending_loads += 1;
        debug!(dest = ?target, source = %source_name, "Image load requested");

        self.runtime.spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                outcome = load_image(source, target) => outcome,
            };
            if token.is_cancelled() {
                return;
            }
            let _ = tx.send(LoadResult {
                target,
                source_name,
                pad_generation,
                outcome,
            });
            ctx.request_repaint();
        });
    }

    /// Apply finished loads in arrival order. Returns how many were applied.
    pub fn poll_loads(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(result) = self.load_rx.try_recv() {
            self.pending_loads = self.pending_loads.saturating_sub(1);
            self.apply_load(result);
            applied += 1;
        }
        applied
    }

    fn apply_load(&mut self, result: LoadResult) {
        let LoadResult {
            target,
            source_name,
            pad_generation,
            outcome,
        } = result;
        // The user drew or cleared since this reload was requested
        if target == ImageTarget::SignatureReload && pad_generation != self.pad.generation() {
            debug!(source = %source_name, "Stale signature reload dropped");
            return;
        }
        let loaded = match outcome {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, dest = ?target, source = %source_name, "Image load failed");
                self.load_error = Some(format!("Could not load {}: {}", source_name, e));
                return;
            }
        };
        info!(
            dest = ?target,
            source = %source_name,
            width = loaded.pixels.width(),
            height = loaded.pixels.height(),
            "Image loaded"
        );
        match target {
            ImageTarget::Logo => self.edit(FieldChange::Logo(Some(loaded.image))),
            ImageTarget::Stamp(slot) => self.edit(FieldChange::StampImage(slot, Some(loaded.image))),
            ImageTarget::SignatureUpload => {
                self.pad.clear();
                self.pad.load_image(&loaded.pixels);
                self.edit(FieldChange::Signature(Some(loaded.image)));
            }
            ImageTarget::SignatureReload => self.pad.load_image(&loaded.pixels),
        }
    }
}

impl Drop for LetterForm {
    fn drop(&mut self) {
        // Loads still in flight belong to a draft nobody is looking at
        self.cancel_token.cancel();
    }
}
