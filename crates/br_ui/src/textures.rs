//! Lazily uploads resource images into egui textures.

use std::collections::HashMap;

use br_core::resources::{ResourceCatalog, ResourceKind};

#[derive(Default)]
pub struct TextureCache {
    handles: HashMap<String, Option<egui::TextureHandle>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the texture for an image resource, loading it on first use.
    /// Failures are logged once and remembered.
    pub fn get_or_load(
        &mut self,
        ctx: &egui::Context,
        catalog: &ResourceCatalog,
        key: &str,
    ) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.handles.get(key) {
            return cached.clone();
        }
        let loaded = match load_color_image(catalog, key) {
            Ok(image) => Some(ctx.load_texture(key, image, egui::TextureOptions::LINEAR)),
            Err(err) => {
                log::warn!("Texture '{key}' unavailable: {err}");
                None
            }
        };
        self.handles.insert(key.to_string(), loaded.clone());
        loaded
    }

    pub fn len(&self) -> usize {
        self.handles.values().filter(|h| h.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn load_color_image(catalog: &ResourceCatalog, key: &str) -> Result<egui::ColorImage, String> {
    let record = catalog
        .get(key)
        .ok_or_else(|| "not in the resource catalog".to_string())?;
    if record.kind != ResourceKind::Image {
        return Err(format!("resource is {:?}, not an image", record.kind));
    }
    let rgba = image::open(&record.path)
        .map_err(|e| format!("Failed to decode {}: {e}", record.path.display()))?
        .to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
