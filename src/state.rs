use crate::area::{Area, AreaAction};
use crate::block::{BlockConfig, default_blocks};
use crate::geometry::{AreaRect, MIN_AREA_PCT, constrain_rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Preset grid layouts offered by the designer: label, columns, rows.
pub const TEMPLATES: &[(&str, u32, u32)] = &[
    ("1 x 1", 1, 1),
    ("2 x 1", 2, 1),
    ("3 x 1", 3, 1),
    ("2 x 2", 2, 2),
    ("3 x 2", 3, 2),
];

/// The full editable state of one open design: areas plus their styling.
///
/// This is what history snapshots capture and what drafts persist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignState {
    pub areas: Vec<Area>,
    pub blocks: Vec<BlockConfig>,
}

impl DesignState {
    /// Add an area with default placement, staggered so consecutive adds
    /// don't stack exactly on top of each other. Returns the new id.
    pub fn add_area(&mut self) -> Uuid {
        let step = (self.areas.len() % 5) as f32 * 5.0;
        let rect = constrain_rect(
            AreaRect::new(10.0 + step, 10.0 + step, 30.0, 30.0),
            MIN_AREA_PCT,
            MIN_AREA_PCT,
        );
        let area = Area::new(rect, AreaAction::default());
        let id = area.id;
        self.areas.push(area);
        self.blocks.push(BlockConfig::default());
        id
    }

    pub fn remove_area(&mut self, id: Uuid) -> bool {
        match self.area_index(id) {
            Some(index) => {
                self.areas.remove(index);
                self.blocks.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn area_index(&self, id: Uuid) -> Option<usize> {
        self.areas.iter().position(|a| a.id == id)
    }

    pub fn area(&self, id: Uuid) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    /// Replace the layout with a `cols x rows` grid of equal cells.
    ///
    /// Styling is reset wholesale: block configs do not survive a template
    /// change because the cell count and shapes no longer correspond.
    pub fn apply_template(&mut self, cols: u32, rows: u32) {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let cell_w = 100.0 / cols as f32;
        let cell_h = 100.0 / rows as f32;

        self.areas = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (c, r)))
            .map(|(c, r)| {
                Area::new(
                    AreaRect::new(c as f32 * cell_w, r as f32 * cell_h, cell_w, cell_h),
                    AreaAction::default(),
                )
            })
            .collect();
        self.blocks = default_blocks(self.areas.len());
    }

    /// Keep the styling list in lockstep with the area list.
    pub fn sync_blocks(&mut self) {
        self.blocks.resize_with(self.areas.len(), BlockConfig::default);
    }
}
