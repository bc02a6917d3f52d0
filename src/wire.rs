use crate::area::{Area, AreaAction};
use crate::geometry::AreaRect;
use serde::Serialize;

/// An integer pixel rectangle at the canonical base resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One tap action in the messaging platform's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireAction {
    Uri {
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(rename = "linkUri")]
        link_uri: String,
        area: WireArea,
    },
    Message {
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        text: String,
        area: WireArea,
    },
}

impl WireAction {
    pub fn area(&self) -> WireArea {
        match self {
            WireAction::Uri { area, .. } | WireAction::Message { area, .. } => *area,
        }
    }
}

/// Convert areas into wire actions at the canonical base resolution.
///
/// Declaration order is preserved — downstream consumers address actions
/// positionally in some flows.
pub fn to_wire_actions(areas: &[Area], base_width: u32, base_height: u32) -> Vec<WireAction> {
    areas
        .iter()
        .map(|area| {
            let rect = normalize(area.rect);
            let pixel = WireArea {
                x: (rect.x / 100.0 * base_width as f32).round() as i32,
                y: (rect.y / 100.0 * base_height as f32).round() as i32,
                width: (rect.w / 100.0 * base_width as f32).round() as i32,
                height: (rect.h / 100.0 * base_height as f32).round() as i32,
            };
            match &area.action {
                AreaAction::Uri { url } => WireAction::Uri {
                    label: area.label.clone(),
                    link_uri: url.clone(),
                    area: pixel,
                },
                AreaAction::Message { text } => WireAction::Message {
                    label: area.label.clone(),
                    text: text.clone(),
                    area: pixel,
                },
            }
        })
        .collect()
}

/// Accept both percent rects and pre-normalized 0–1 fractions.
///
/// A rect whose components are all ≤ 1 can only be a fraction form: as a
/// percentage it would be far below the minimum area size.
fn normalize(rect: AreaRect) -> AreaRect {
    if rect.x <= 1.0 && rect.y <= 1.0 && rect.w <= 1.0 && rect.h <= 1.0 {
        AreaRect::new(rect.x * 100.0, rect.y * 100.0, rect.w * 100.0, rect.h * 100.0)
    } else {
        rect
    }
}
