//! Texture loading for the letter preview

use super::App;
use crate::image_ref::ImageRef;
use crate::preview::PreviewDocument;
use eframe::egui;
use std::collections::HashMap;
use tracing::warn;

impl App {
    /// Texture for one preview image, decoded on first use and cached under `key`
    /// until the image behind that key changes.
    pub fn load_preview_texture(
        &mut self,
        ctx: &egui::Context,
        key: &'static str,
        image: &ImageRef,
    ) -> Option<egui::TextureHandle> {
        if let Some((cached_image, texture)) = self.preview_textures.get(key) {
            if cached_image == image {
                return texture.clone();
            }
        }

        let texture = match image.decode_rgba() {
            Ok(rgba) => {
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = rgba.into_raw();
                Some(ctx.load_texture(
                    format!("preview_{}", key),
                    egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                    egui::TextureOptions::LINEAR,
                ))
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to decode preview image");
                None
            }
        };
        self.preview_textures.insert(key, (image.clone(), texture.clone()));
        texture
    }

    /// Textures for every image in the document, keyed like [`PreviewDocument::images`].
    pub fn preview_texture_set(
        &mut self,
        ctx: &egui::Context,
        doc: &PreviewDocument,
    ) -> HashMap<&'static str, egui::TextureHandle> {
        let images = doc.images();
        let mut set = HashMap::new();
        for &(key, image) in &images {
            if let Some(texture) = self.load_preview_texture(ctx, key, image) {
                set.insert(key, texture);
            }
        }
        // Drop textures whose image was removed from the letter
        self.preview_textures.retain(|key, _| images.iter().any(|(k, _)| k == key));
        set
    }
}
