use egui::Color32;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_FONT_SIZE: f32 = 24.0;
/// Auto-fit never shrinks text below this.
pub const MIN_FONT_SIZE: f32 = 10.0;
pub const DEFAULT_PADDING: f32 = 8.0;
/// Fraction of the padded cell interior the fitted text may occupy.
pub const TEXT_FIT_RATIO: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Where a block's text sits: snapped to the alignment grid, or at a free
/// percent position within the cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TextPlacement {
    Grid { align: HAlign, v_align: VAlign },
    Free { x: f32, y: f32 },
}

/// Drop shadow behind block text. Lengths are preview-scale pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextShadow {
    pub color: Color32,
    pub blur: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Default for TextShadow {
    fn default() -> Self {
        Self {
            color: Color32::from_black_alpha(160),
            blur: 2.0,
            dx: 1.0,
            dy: 1.0,
        }
    }
}

/// How a block's background image maps onto the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFit {
    /// Letterboxed: the whole image stays visible.
    Contain,
    /// Fills the cell; overflow is clipped.
    Cover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockImage {
    pub path: PathBuf,
    pub fit: ImageFit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StickerAnchor {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StickerPlacement {
    Anchor(StickerAnchor),
    /// Percent position of the sticker center within the cell.
    Free { x: f32, y: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    pub path: PathBuf,
    /// Multiplier on `min(cell_w, cell_h)`.
    pub scale: f32,
    pub placement: StickerPlacement,
}

/// Per-area visual styling. One of these exists per area, keyed by index,
/// and the whole list is replaced when the area layout template changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    pub text: String,
    /// System font family name; empty means the platform default.
    pub font_family: String,
    /// Font size in preview-scale pixels.
    pub font_size: f32,
    pub bold: bool,
    pub text_color: Color32,
    pub shadow: Option<TextShadow>,
    pub placement: TextPlacement,
    /// Inner padding in preview-scale pixels.
    pub padding: f32,
    pub fill: Color32,
    pub image: Option<BlockImage>,
    pub sticker: Option<Sticker>,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            bold: false,
            text_color: Color32::WHITE,
            shadow: None,
            placement: TextPlacement::Grid {
                align: HAlign::Center,
                v_align: VAlign::Center,
            },
            padding: DEFAULT_PADDING,
            fill: Color32::TRANSPARENT,
            image: None,
            sticker: None,
        }
    }
}

/// Fresh default styling for `count` areas.
pub fn default_blocks(count: usize) -> Vec<BlockConfig> {
    vec![BlockConfig::default(); count]
}
