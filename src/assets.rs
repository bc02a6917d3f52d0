use crate::error::{StudioError, StudioResult};
use egui::TextureHandle;
use image::RgbaImage;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Decoded images for the open session, keyed by source path.
///
/// Each file is decoded once and held in two forms: a GPU texture for the
/// preview and the raw bitmap for the export worker. Paths that failed to
/// load are remembered so a broken reference logs once instead of every
/// frame.
#[derive(Default)]
pub struct AssetCache {
    textures: HashMap<PathBuf, TextureHandle>,
    bitmaps: HashMap<PathBuf, Arc<RgbaImage>>,
    failed: HashSet<PathBuf>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `path` (if not already cached) and upload a preview texture.
    pub fn ensure(&mut self, ctx: &egui::Context, path: &Path) {
        if self.textures.contains_key(path) || self.failed.contains(path) {
            return;
        }
        match Self::decode(path) {
            Ok(bitmap) => {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [bitmap.width() as usize, bitmap.height() as usize],
                    bitmap.as_raw(),
                );
                let texture = ctx.load_texture(
                    path.display().to_string(),
                    color_image,
                    egui::TextureOptions::LINEAR,
                );
                self.textures.insert(path.to_owned(), texture);
                self.bitmaps.insert(path.to_owned(), Arc::new(bitmap));
            }
            Err(err) => {
                log::error!("Failed to load {}: {err}", path.display());
                self.failed.insert(path.to_owned());
            }
        }
    }

    /// The preview texture for an already-ensured path.
    pub fn texture(&self, path: &Path) -> Option<&TextureHandle> {
        self.textures.get(path)
    }

    /// The decoded bitmap for an already-ensured path, shareable with the
    /// export worker.
    pub fn bitmap(&self, path: &Path) -> Option<Arc<RgbaImage>> {
        self.bitmaps.get(path).cloned()
    }

    /// Forget a path entirely (e.g. the file changed on disk).
    pub fn invalidate(&mut self, path: &Path) {
        self.textures.remove(path);
        self.bitmaps.remove(path);
        self.failed.remove(path);
    }

    fn decode(path: &Path) -> StudioResult<RgbaImage> {
        let bytes = std::fs::read(path).map_err(|source| StudioError::Read {
            path: path.to_owned(),
            source,
        })?;
        let image = image::load_from_memory(&bytes)?;
        log::debug!(
            "Decoded {}: {}x{}",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(image.to_rgba8())
    }
}
