use crate::geometry::AreaRect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest label the messaging platform accepts on a menu action.
pub const MAX_LABEL_LEN: usize = 20;

/// What tapping an area does.
///
/// The two variants carry their own payload so the rest of the code can
/// match exhaustively instead of branching on a type string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AreaAction {
    Uri { url: String },
    Message { text: String },
}

impl AreaAction {
    pub fn kind(&self) -> &'static str {
        match self {
            AreaAction::Uri { .. } => "uri",
            AreaAction::Message { .. } => "message",
        }
    }
}

impl Default for AreaAction {
    fn default() -> Self {
        AreaAction::Message { text: String::new() }
    }
}

/// A tap/action region over the background image.
///
/// Serializes to the flat repository shape
/// `{id, label, type, url|text, x, y, w, h}` with percent coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub action: AreaAction,
    #[serde(flatten)]
    pub rect: AreaRect,
}

impl Area {
    pub fn new(rect: AreaRect, action: AreaAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: None,
            action,
            rect,
        }
    }

    /// Set the display label, truncated to the platform limit.
    pub fn set_label(&mut self, label: impl Into<String>) {
        let mut label = label.into();
        if label.chars().count() > MAX_LABEL_LEN {
            label = label.chars().take(MAX_LABEL_LEN).collect();
        }
        self.label = if label.is_empty() { None } else { Some(label) };
    }
}
