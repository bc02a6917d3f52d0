pub mod painter;
pub mod raster;
pub mod surface;

use crate::area::Area;
use crate::block::{
    BlockConfig, HAlign, ImageFit, MIN_FONT_SIZE, Sticker, StickerAnchor, StickerPlacement,
    TEXT_FIT_RATIO, TextPlacement, VAlign,
};
use crate::geometry::{self, AreaRect};
use egui::Color32;
use surface::{Rect, Surface, TextStyle};

/// Reference width that preview-scale lengths (padding, font size, shadow)
/// are expressed against. A surface rendering at width `w` passes
/// `scale = w / PREVIEW_BASE_WIDTH`.
pub const PREVIEW_BASE_WIDTH: f32 = 1040.0;

const SELECTION_COLOR: Color32 = Color32::from_rgb(30, 144, 255);
const AREA_OUTLINE_COLOR: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 120);
const BADGE_BG: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 160);
const BADGE_TEXT_SIZE: f32 = 12.0;

/// One styled cell ready to draw: its config plus the surface-specific
/// handles for its image and sticker, resolved by the caller.
pub struct BlockVisual<'a, I> {
    pub config: &'a BlockConfig,
    pub image: Option<&'a I>,
    pub sticker: Option<&'a I>,
}

/// Everything the pipeline needs for one pass over the design.
///
/// `scale` multiplies every length quantity (padding, font size, shadow);
/// the preview passes `1.0`, the export pass passes
/// `export_width / preview_width`. Both run this exact code.
pub struct Scene<'a, I> {
    /// Pixel rect of the drawing area on the target surface.
    pub canvas: Rect,
    pub background: Option<&'a I>,
    pub areas: &'a [Area],
    pub blocks: Vec<BlockVisual<'a, I>>,
    pub selected: Option<usize>,
    pub scale: f32,
    /// Selection outlines and index badges; off for the export pass.
    pub decorations: bool,
}

/// Draw the whole design: background, then each area's block in order.
pub fn draw_scene<S: Surface>(surface: &mut S, scene: &Scene<'_, S::Image>) {
    if let Some(background) = scene.background {
        surface.draw_image(background, scene.canvas);
    }

    for (index, area) in scene.areas.iter().enumerate() {
        let cell = cell_rect(area.rect, scene.canvas);
        if let Some(block) = scene.blocks.get(index) {
            draw_block(surface, cell, block, scene.scale);
        }
        if scene.decorations {
            draw_decorations(surface, cell, index, scene.selected == Some(index));
        }
    }
}

/// Map a percent rect into the canvas' pixel space.
fn cell_rect(rect: AreaRect, canvas: Rect) -> Rect {
    let px = geometry::to_pixel_rect(rect, canvas.w, canvas.h);
    Rect::new(
        canvas.x + px.x as f32,
        canvas.y + px.y as f32,
        px.w as f32,
        px.h as f32,
    )
}

/// Draw one cell: fill, image, sticker, then text. Order matters — text
/// always reads over imagery.
pub fn draw_block<S: Surface>(surface: &mut S, cell: Rect, block: &BlockVisual<'_, S::Image>, scale: f32) {
    let config = block.config;

    if config.fill.a() > 0 {
        surface.fill_rect(cell, config.fill);
    }

    if let (Some(image), Some(settings)) = (block.image, config.image.as_ref()) {
        let dest = fit_rect(surface.image_size(image), cell, settings.fit);
        surface.push_clip(cell);
        surface.draw_image(image, dest);
        surface.pop_clip();
    }

    if let (Some(image), Some(settings)) = (block.sticker, config.sticker.as_ref()) {
        let dest = sticker_rect(cell, settings, surface.image_size(image), config.padding * scale);
        surface.push_clip(cell);
        surface.draw_image(image, dest);
        surface.pop_clip();
    }

    if !config.text.is_empty() {
        draw_block_text(surface, cell, config, scale);
    }
}

/// Scale-and-center an image into `dest` per the fit mode.
pub fn fit_rect(src: (u32, u32), dest: Rect, fit: ImageFit) -> Rect {
    let (sw, sh) = (src.0 as f32, src.1 as f32);
    if sw <= 0.0 || sh <= 0.0 || dest.w <= 0.0 || dest.h <= 0.0 {
        return dest;
    }
    let k = match fit {
        ImageFit::Contain => (dest.w / sw).min(dest.h / sh),
        ImageFit::Cover => (dest.w / sw).max(dest.h / sh),
    };
    let w = sw * k;
    let h = sh * k;
    Rect::new(dest.x + (dest.w - w) / 2.0, dest.y + (dest.h - h) / 2.0, w, h)
}

/// Where a sticker lands in its cell: sized from the smaller cell edge,
/// anchored to a corner/center or placed at a free percent position.
fn sticker_rect(cell: Rect, sticker: &Sticker, src: (u32, u32), pad: f32) -> Rect {
    let side = cell.w.min(cell.h) * sticker.scale.max(0.0);
    let (sw, sh) = (src.0 as f32, src.1 as f32);
    let k = if sw > 0.0 && sh > 0.0 {
        (side / sw).min(side / sh)
    } else {
        0.0
    };
    let w = sw * k;
    let h = sh * k;

    let (cx, cy) = match sticker.placement {
        StickerPlacement::Anchor(anchor) => match anchor {
            StickerAnchor::Center => cell.center(),
            StickerAnchor::TopLeft => (cell.x + pad + w / 2.0, cell.y + pad + h / 2.0),
            StickerAnchor::TopRight => (cell.right() - pad - w / 2.0, cell.y + pad + h / 2.0),
            StickerAnchor::BottomLeft => (cell.x + pad + w / 2.0, cell.bottom() - pad - h / 2.0),
            StickerAnchor::BottomRight => {
                (cell.right() - pad - w / 2.0, cell.bottom() - pad - h / 2.0)
            }
        },
        StickerPlacement::Free { x, y } => (
            cell.x + x / 100.0 * cell.w,
            cell.y + y / 100.0 * cell.h,
        ),
    };

    Rect::new(cx - w / 2.0, cy - h / 2.0, w, h)
}

/// Widest line and total height of multi-line text at `style`.
pub fn measure_block_text<S: Surface + ?Sized>(surface: &S, text: &str, style: &TextStyle) -> (f32, f32) {
    let mut max_w: f32 = 0.0;
    let mut line_h: f32 = 0.0;
    let mut lines = 0usize;
    for line in text.split('\n') {
        let (w, h) = surface.measure_text(line, style);
        max_w = max_w.max(w);
        line_h = line_h.max(h);
        lines += 1;
    }
    (max_w, line_h * lines as f32)
}

/// Shrink the font in 1 px steps until the text block fits the available
/// box, stopping at [`MIN_FONT_SIZE`]. Terminates even when the text can
/// never fit.
pub fn auto_fit_font_size<S: Surface + ?Sized>(
    surface: &S,
    text: &str,
    family: &str,
    bold: bool,
    base_size: f32,
    avail_w: f32,
    avail_h: f32,
) -> f32 {
    let mut size = base_size.max(MIN_FONT_SIZE);
    loop {
        let style = TextStyle {
            family: family.to_owned(),
            size,
            bold,
            color: Color32::WHITE,
        };
        let (w, h) = measure_block_text(surface, text, &style);
        if (w <= avail_w && h <= avail_h) || size <= MIN_FONT_SIZE {
            return size;
        }
        size = (size - 1.0).max(MIN_FONT_SIZE);
    }
}

fn draw_block_text<S: Surface>(surface: &mut S, cell: Rect, config: &BlockConfig, scale: f32) {
    let pad = config.padding * scale;
    let avail_w = (cell.w - 2.0 * pad).max(0.0) * TEXT_FIT_RATIO;
    let avail_h = (cell.h - 2.0 * pad).max(0.0) * TEXT_FIT_RATIO;

    // Fit in unscaled units so preview and export agree on the chosen size.
    let fitted = auto_fit_font_size(
        surface,
        &config.text,
        &config.font_family,
        config.bold,
        config.font_size,
        avail_w / scale,
        avail_h / scale,
    );
    let style = TextStyle {
        family: config.font_family.clone(),
        size: fitted * scale,
        bold: config.bold,
        color: config.text_color,
    };

    let lines: Vec<&str> = config.text.split('\n').collect();
    let metrics: Vec<(f32, f32)> = lines.iter().map(|l| surface.measure_text(l, &style)).collect();
    let line_h = metrics.iter().map(|m| m.1).fold(0.0, f32::max);
    let block_h = line_h * lines.len() as f32;

    let top = match config.placement {
        TextPlacement::Grid { v_align, .. } => match v_align {
            VAlign::Top => cell.y + pad,
            VAlign::Center => cell.y + (cell.h - block_h) / 2.0,
            VAlign::Bottom => cell.bottom() - pad - block_h,
        },
        TextPlacement::Free { y, .. } => cell.y + y / 100.0 * cell.h - block_h / 2.0,
    };

    for (i, line) in lines.iter().enumerate() {
        let line_w = metrics[i].0;
        let x = match config.placement {
            TextPlacement::Grid { align, .. } => match align {
                HAlign::Left => cell.x + pad,
                HAlign::Center => cell.x + (cell.w - line_w) / 2.0,
                HAlign::Right => cell.right() - pad - line_w,
            },
            TextPlacement::Free { x, .. } => cell.x + x / 100.0 * cell.w - line_w / 2.0,
        };
        let y = top + i as f32 * line_h;

        if let Some(shadow) = config.shadow {
            let mut shadow_style = style.clone();
            let blur = shadow.blur * scale;
            let sx = x + shadow.dx * scale;
            let sy = y + shadow.dy * scale;
            if blur <= 0.5 {
                shadow_style.color = shadow.color;
                surface.draw_text(line, (sx, sy), &shadow_style);
            } else {
                // No gaussian available on either backend; approximate with
                // ring passes sharing the shadow's alpha.
                const RING: [(f32, f32); 4] = [(-1.0, 0.0), (1.0, 0.0), (0.0, -1.0), (0.0, 1.0)];
                shadow_style.color = Color32::from_rgba_unmultiplied(
                    shadow.color.r(),
                    shadow.color.g(),
                    shadow.color.b(),
                    (shadow.color.a() / 4).max(1),
                );
                for (ox, oy) in RING {
                    surface.draw_text(line, (sx + ox * blur / 2.0, sy + oy * blur / 2.0), &shadow_style);
                }
            }
        }

        surface.draw_text(line, (x, y), &style);
    }
}

fn draw_decorations<S: Surface>(surface: &mut S, cell: Rect, index: usize, selected: bool) {
    if selected {
        surface.stroke_rect(cell, SELECTION_COLOR, 2.0);
    } else {
        surface.stroke_rect(cell, AREA_OUTLINE_COLOR, 1.0);
    }

    let badge = Rect::new(cell.x + 4.0, cell.y + 4.0, 20.0, 16.0);
    surface.fill_rect(badge, BADGE_BG);
    surface.draw_text(
        &(index + 1).to_string(),
        (badge.x + 6.0, badge.y + 1.0),
        &TextStyle {
            family: String::new(),
            size: BADGE_TEXT_SIZE,
            bold: false,
            color: Color32::WHITE,
        },
    );
}
