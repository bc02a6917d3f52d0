use super::surface::{Rect, Surface, TextStyle};
use crate::error::{StudioError, StudioResult};
use ab_glyph::{Font, FontArc, GlyphId, ScaleFont, point};
use egui::Color32;
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use std::cell::RefCell;
use std::collections::HashMap;

/// Loads and caches system fonts by family and weight.
///
/// Lookups fall back to the default sans-serif face, so a missing family
/// degrades the export's typography instead of failing it.
pub struct FontBook {
    default: FontArc,
    loaded: RefCell<HashMap<(String, bool), FontArc>>,
}

impl FontBook {
    /// Resolve the platform's default sans-serif face.
    pub fn system_default() -> StudioResult<Self> {
        let default = load_font("", false)
            .ok_or_else(|| StudioError::Font("no sans-serif face available".into()))?;
        Ok(Self {
            default,
            loaded: RefCell::new(HashMap::new()),
        })
    }

    /// Build a font book around an already-loaded face (used by tests).
    pub fn with_default(default: FontArc) -> Self {
        Self {
            default,
            loaded: RefCell::new(HashMap::new()),
        }
    }

    fn get(&self, family: &str, bold: bool) -> FontArc {
        if family.is_empty() && !bold {
            return self.default.clone();
        }
        let key = (family.to_owned(), bold);
        if let Some(font) = self.loaded.borrow().get(&key) {
            return font.clone();
        }
        let font = match load_font(family, bold) {
            Some(font) => font,
            None => {
                log::warn!("Font family {family:?} (bold={bold}) not found, using default");
                self.default.clone()
            }
        };
        self.loaded.borrow_mut().insert(key, font.clone());
        font
    }
}

/// Look up a face through the system font source.
fn load_font(family: &str, bold: bool) -> Option<FontArc> {
    use font_kit::family_name::FamilyName;
    use font_kit::properties::{Properties, Weight};
    use font_kit::source::SystemSource;

    let mut properties = Properties::new();
    if bold {
        properties.weight = Weight::BOLD;
    }
    let name = if family.is_empty() {
        FamilyName::SansSerif
    } else {
        FamilyName::Title(family.to_owned())
    };

    let handle = SystemSource::new()
        .select_best_match(&[name, FamilyName::SansSerif], &properties)
        .ok()?;
    let font_data = handle.load().ok()?.copy_font_data()?;
    FontArc::try_from_vec((*font_data).clone()).ok()
}

/// A CPU surface drawing into an RGBA buffer; this is what the export pass
/// renders on. Text goes through `ab_glyph` coverage rasterization.
pub struct RasterSurface {
    buffer: RgbaImage,
    fonts: FontBook,
    clip: Vec<Rect>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, background: Color32, fonts: FontBook) -> Self {
        let pixel = Rgba([background.r(), background.g(), background.b(), 255]);
        Self {
            buffer: RgbaImage::from_pixel(width.max(1), height.max(1), pixel),
            fonts,
            clip: Vec::new(),
        }
    }

    /// Consume the surface, yielding the composed bitmap.
    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Current clip intersected with the buffer bounds.
    fn clip_rect(&self) -> Rect {
        let mut rect = Rect::new(0.0, 0.0, self.buffer.width() as f32, self.buffer.height() as f32);
        for clip in &self.clip {
            rect = rect.intersect(*clip);
        }
        rect
    }

    /// Integer pixel range of `rect` under the current clip.
    fn pixel_bounds(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let clipped = rect.intersect(self.clip_rect());
        if clipped.w < 0.5 || clipped.h < 0.5 {
            return None;
        }
        let x0 = clipped.x.round().max(0.0) as u32;
        let y0 = clipped.y.round().max(0.0) as u32;
        let x1 = (clipped.right().round() as u32).min(self.buffer.width());
        let y1 = (clipped.bottom().round() as u32).min(self.buffer.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Source-over blend of a premultiplied color scaled by `coverage`.
    fn blend(&mut self, x: u32, y: u32, color: Color32, coverage: f32) {
        if coverage <= 0.0 {
            return;
        }
        let coverage = coverage.min(1.0);
        let dst = self.buffer.get_pixel_mut(x, y);
        let src_a = color.a() as f32 * coverage;
        let keep = 1.0 - src_a / 255.0;
        // The buffer stays opaque (it starts from an opaque background), so
        // premultiplied-over reduces to a lerp per channel.
        dst.0[0] = (color.r() as f32 * coverage + dst.0[0] as f32 * keep).round() as u8;
        dst.0[1] = (color.g() as f32 * coverage + dst.0[1] as f32 * keep).round() as u8;
        dst.0[2] = (color.b() as f32 * coverage + dst.0[2] as f32 * keep).round() as u8;
        dst.0[3] = 255;
    }
}

impl Surface for RasterSurface {
    type Image = RgbaImage;

    fn image_size(&self, image: &Self::Image) -> (u32, u32) {
        (image.width(), image.height())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color32, width: f32) {
        let w = width.max(1.0);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, w), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - w, rect.w, w), color);
        self.fill_rect(Rect::new(rect.x, rect.y + w, w, rect.h - 2.0 * w), color);
        self.fill_rect(Rect::new(rect.right() - w, rect.y + w, w, rect.h - 2.0 * w), color);
    }

    fn draw_image(&mut self, image: &Self::Image, dest: Rect) {
        let w = dest.w.round() as i64;
        let h = dest.h.round() as i64;
        if w < 1 || h < 1 {
            return;
        }
        let resized = image::imageops::resize(image, w as u32, h as u32, FilterType::Triangle);
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(dest) else {
            return;
        };
        let ox = dest.x.round() as i64;
        let oy = dest.y.round() as i64;
        for y in y0..y1 {
            for x in x0..x1 {
                let sx = x as i64 - ox;
                let sy = y as i64 - oy;
                if sx < 0 || sy < 0 || sx >= w || sy >= h {
                    continue;
                }
                let px = resized.get_pixel(sx as u32, sy as u32);
                let a = px.0[3] as f32 / 255.0;
                let color = Color32::from_rgba_unmultiplied(px.0[0], px.0[1], px.0[2], px.0[3]);
                if a > 0.0 {
                    self.blend(x, y, color, 1.0);
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, pos: (f32, f32), style: &TextStyle) {
        let font = self.fonts.get(&style.family, style.bold);
        let scaled = font.as_scaled(style.size);
        let baseline = pos.1 + scaled.ascent();
        let clip = self.clip_rect();

        let mut cursor = pos.0;
        let mut last: Option<GlyphId> = None;
        let mut pending: Vec<(u32, u32, f32)> = Vec::new();

        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = last {
                cursor += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(style.size, point(cursor, baseline));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                pending.clear();
                outlined.draw(|gx, gy, coverage| {
                    let x = bounds.min.x + gx as f32;
                    let y = bounds.min.y + gy as f32;
                    if x >= clip.x && x < clip.right() && y >= clip.y && y < clip.bottom() {
                        let px = x as i64;
                        let py = y as i64;
                        if px >= 0 && py >= 0 {
                            pending.push((px as u32, py as u32, coverage));
                        }
                    }
                });
                for &(x, y, coverage) in &pending {
                    if x < self.buffer.width() && y < self.buffer.height() {
                        self.blend(x, y, style.color, coverage);
                    }
                }
            }
            cursor += scaled.h_advance(id);
            last = Some(id);
        }
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> (f32, f32) {
        let font = self.fonts.get(&style.family, style.bold);
        let scaled = font.as_scaled(style.size);
        let mut width = 0.0f32;
        let mut last: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = last {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            last = Some(id);
        }
        (width, scaled.height())
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip.push(rect);
    }

    fn pop_clip(&mut self) {
        self.clip.pop();
    }
}
