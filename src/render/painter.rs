use super::surface::{Rect, Surface, TextStyle};
use egui::{Align2, Color32, FontId, Stroke, TextureHandle, pos2, vec2};

/// The live-preview surface: forwards pipeline calls to an `egui::Painter`.
///
/// The preview always renders with egui's embedded proportional face; the
/// configured family/weight only affects the export raster, which carries
/// the authoritative typography.
pub struct PainterSurface {
    painter: egui::Painter,
    saved: Vec<egui::Painter>,
}

impl PainterSurface {
    pub fn new(painter: egui::Painter) -> Self {
        Self {
            painter,
            saved: Vec::new(),
        }
    }

    fn egui_rect(rect: Rect) -> egui::Rect {
        egui::Rect::from_min_size(pos2(rect.x, rect.y), vec2(rect.w, rect.h))
    }

    fn font_id(style: &TextStyle) -> FontId {
        FontId::proportional(style.size)
    }
}

impl Surface for PainterSurface {
    type Image = TextureHandle;

    fn image_size(&self, image: &Self::Image) -> (u32, u32) {
        let [w, h] = image.size();
        (w as u32, h as u32)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.painter.rect_filled(Self::egui_rect(rect), 0.0, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color32, width: f32) {
        self.painter
            .rect_stroke(Self::egui_rect(rect), 0.0, Stroke::new(width, color));
    }

    fn draw_image(&mut self, image: &Self::Image, dest: Rect) {
        self.painter.image(
            image.id(),
            Self::egui_rect(dest),
            egui::Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );
    }

    fn draw_text(&mut self, text: &str, pos: (f32, f32), style: &TextStyle) {
        self.painter.text(
            pos2(pos.0, pos.1),
            Align2::LEFT_TOP,
            text,
            Self::font_id(style),
            style.color,
        );
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> (f32, f32) {
        let galley = self
            .painter
            .layout_no_wrap(text.to_owned(), Self::font_id(style), style.color);
        (galley.size().x, galley.size().y.max(style.size))
    }

    fn push_clip(&mut self, rect: Rect) {
        let clipped = Self::egui_rect(rect).intersect(self.painter.clip_rect());
        self.saved.push(self.painter.clone());
        self.painter = self.painter.with_clip_rect(clipped);
    }

    fn pop_clip(&mut self) {
        if let Some(previous) = self.saved.pop() {
            self.painter = previous;
        }
    }
}
