pub mod store;

use crate::error::StudioResult;
use crate::render::raster::{FontBook, RasterSurface};
use crate::render::surface::Rect;
use crate::render::{BlockVisual, Scene, draw_scene};
use crate::state::DesignState;
use crate::wire::WireAction;
use egui::Color32;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use serde::Serialize;
use std::collections::BTreeMap;
use store::FileStore;

/// Variant widths the messaging platform fetches for imagemaps.
pub const EXPORT_WIDTHS: [u32; 5] = [240, 300, 460, 700, 1040];

/// Encoder quality for published variants.
pub const JPEG_QUALITY: u8 = 92;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaseSize {
    pub width: u32,
    pub height: u32,
}

/// The result of one publish: uploaded variant URLs plus the canonical
/// base dimensions every pixel-space computation downstream uses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagemapPublish {
    pub base_url: String,
    pub base_size: BaseSize,
    pub urls: BTreeMap<u32, String>,
    pub actions: Vec<WireAction>,
}

/// Decode the publish source exactly once; the resize loop works from this
/// bitmap, never from the encoded bytes.
pub fn decode_source(bytes: &[u8]) -> StudioResult<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Resize, encode, and upload one variant per target width.
///
/// Heights preserve the source aspect ratio. The first failing encode or
/// upload aborts the whole publish; variants already uploaded stay behind
/// (a re-publish to the same directory overwrites them).
pub fn publish_variants(
    store: &dyn FileStore,
    base_dir: &str,
    source: &RgbaImage,
    widths: &[u32],
    actions: Vec<WireAction>,
) -> StudioResult<ImagemapPublish> {
    let (src_w, src_h) = source.dimensions();
    let base_dir = base_dir.trim_end_matches('/');

    let mut urls = BTreeMap::new();
    let mut base = BaseSize { width: 0, height: 0 };

    for &width in widths {
        let height = if src_w == 0 {
            1
        } else {
            ((width as f64 * src_h as f64 / src_w as f64).round() as u32).max(1)
        };
        let resized = image::imageops::resize(source, width.max(1), height, FilterType::Lanczos3);
        let encoded = encode_jpeg(&resized)?;
        let url = store.put(&format!("{base_dir}/{width}"), &encoded, "image/jpeg")?;
        log::info!("Published variant {width}x{height} ({} bytes)", encoded.len());

        urls.insert(width, url);
        if width >= base.width {
            base = BaseSize { width, height };
        }
    }

    Ok(ImagemapPublish {
        base_url: store.url_for(base_dir),
        base_size: base,
        urls,
        actions,
    })
}

/// Render the design onto a full-resolution raster.
///
/// This runs the same `draw_scene` as the live preview; only the scale
/// factor (`width / preview_width`) and the surface differ, so the export
/// cannot drift from what the user saw. Decorations are off.
pub fn compose_design(
    state: &DesignState,
    background: Option<&RgbaImage>,
    visuals: Vec<BlockVisual<'_, RgbaImage>>,
    width: u32,
    height: u32,
    preview_width: f32,
) -> StudioResult<RgbaImage> {
    let fonts = FontBook::system_default()?;
    let mut surface = RasterSurface::new(width, height, Color32::WHITE, fonts);
    let scale = if preview_width > 0.0 {
        width as f32 / preview_width
    } else {
        1.0
    };

    let scene = Scene {
        canvas: Rect::new(0.0, 0.0, width as f32, height as f32),
        background,
        areas: &state.areas,
        blocks: visuals,
        selected: None,
        scale,
        decorations: false,
    };
    draw_scene(&mut surface, &scene);
    Ok(surface.into_image())
}

fn encode_jpeg(image: &RgbaImage) -> StudioResult<Vec<u8>> {
    // JPEG has no alpha channel; flatten first.
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode_image(&rgb)?;
    Ok(out)
}
