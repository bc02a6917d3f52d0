use serde::{Deserialize, Serialize};

/// Smallest width/height an area may have, in percent of the container.
pub const MIN_AREA_PCT: f32 = 4.0;

/// Upper bound of the percent coordinate space.
pub const PERCENT_MAX: f32 = 100.0;

/// Clamp a coordinate to `[0, 100]` and round to 2 decimal places.
///
/// All persisted geometry goes through this so repeated drags cannot
/// accumulate float drift.
pub fn clamp_percent(value: f32) -> f32 {
    let clamped = value.clamp(0.0, PERCENT_MAX);
    (clamped * 100.0).round() / 100.0
}

/// A tap-area rectangle in percent of its container (`0..=100` on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl AreaRect {
    /// Build a rect with every component clamped and rounded.
    ///
    /// This does not enforce `x + w <= 100`; use [`constrain_rect`] for that.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x: clamp_percent(x),
            y: clamp_percent(y),
            w: clamp_percent(w),
            h: clamp_percent(h),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Whether a percent-space point falls inside this rect (edges inclusive).
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }
}

/// An integer pixel rectangle at some concrete container resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Convert a percent rect to an integer pixel rect at the given container size.
pub fn to_pixel_rect(rect: AreaRect, container_w: f32, container_h: f32) -> PixelRect {
    PixelRect {
        x: (rect.x / PERCENT_MAX * container_w).round() as i32,
        y: (rect.y / PERCENT_MAX * container_h).round() as i32,
        w: (rect.w / PERCENT_MAX * container_w).round() as i32,
        h: (rect.h / PERCENT_MAX * container_h).round() as i32,
    }
}

/// Convert a pixel rect back to percent space.
///
/// Returns `None` when the container has no measurable size, so callers
/// never divide by zero during the first frames before layout.
pub fn to_percent_rect(rect: PixelRect, container_w: f32, container_h: f32) -> Option<AreaRect> {
    if container_w <= 0.0 || container_h <= 0.0 {
        return None;
    }
    Some(AreaRect::new(
        rect.x as f32 / container_w * PERCENT_MAX,
        rect.y as f32 / container_h * PERCENT_MAX,
        rect.w as f32 / container_w * PERCENT_MAX,
        rect.h as f32 / container_h * PERCENT_MAX,
    ))
}

/// Enforce minimum size and full containment in `[0,100]²`.
///
/// Size is clamped to `[min, 100]` first, then the position is pulled back
/// inside the container. A rect that fits is moved, never shrunk.
pub fn constrain_rect(rect: AreaRect, min_w: f32, min_h: f32) -> AreaRect {
    let w = rect.w.clamp(min_w, PERCENT_MAX);
    let h = rect.h.clamp(min_h, PERCENT_MAX);
    let x = rect.x.clamp(0.0, PERCENT_MAX - w);
    let y = rect.y.clamp(0.0, PERCENT_MAX - h);
    AreaRect::new(x, y, w, h)
}

/// The eight compass resize handles. Corner handles combine two edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::NorthWest,
        Handle::North,
        Handle::NorthEast,
        Handle::East,
        Handle::SouthEast,
        Handle::South,
        Handle::SouthWest,
        Handle::West,
    ];

    pub fn moves_left_edge(self) -> bool {
        matches!(self, Handle::West | Handle::NorthWest | Handle::SouthWest)
    }

    pub fn moves_right_edge(self) -> bool {
        matches!(self, Handle::East | Handle::NorthEast | Handle::SouthEast)
    }

    pub fn moves_top_edge(self) -> bool {
        matches!(self, Handle::North | Handle::NorthEast | Handle::NorthWest)
    }

    pub fn moves_bottom_edge(self) -> bool {
        matches!(self, Handle::South | Handle::SouthEast | Handle::SouthWest)
    }

    /// The handle's anchor point on a rect, in percent space.
    pub fn anchor(self, rect: AreaRect) -> (f32, f32) {
        let cx = rect.x + rect.w / 2.0;
        let cy = rect.y + rect.h / 2.0;
        match self {
            Handle::North => (cx, rect.y),
            Handle::South => (cx, rect.bottom()),
            Handle::East => (rect.right(), cy),
            Handle::West => (rect.x, cy),
            Handle::NorthEast => (rect.right(), rect.y),
            Handle::NorthWest => (rect.x, rect.y),
            Handle::SouthEast => (rect.right(), rect.bottom()),
            Handle::SouthWest => (rect.x, rect.bottom()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handle::North => "n",
            Handle::South => "s",
            Handle::East => "e",
            Handle::West => "w",
            Handle::NorthEast => "ne",
            Handle::NorthWest => "nw",
            Handle::SouthEast => "se",
            Handle::SouthWest => "sw",
        }
    }
}

/// Translate `start` by a percent-space delta, keeping it inside the container.
pub fn move_rect(start: AreaRect, dx: f32, dy: f32, min_w: f32, min_h: f32) -> AreaRect {
    constrain_rect(
        AreaRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w,
            h: start.h,
        },
        min_w,
        min_h,
    )
}

/// Apply a percent-space drag delta to the edges selected by `handle`.
///
/// The opposite edge stays pinned; the moving edge can neither cross it
/// (minimum size) nor leave the container. A south-east drag past the
/// container boundary clamps width to exactly `100 - x`.
pub fn resize_rect(
    start: AreaRect,
    handle: Handle,
    dx: f32,
    dy: f32,
    min_w: f32,
    min_h: f32,
) -> AreaRect {
    let mut x = start.x;
    let mut y = start.y;
    let mut w = start.w;
    let mut h = start.h;

    if handle.moves_right_edge() {
        w = (start.w + dx).clamp(min_w, PERCENT_MAX - start.x);
    }
    if handle.moves_left_edge() {
        let new_x = (start.x + dx).clamp(0.0, start.right() - min_w);
        w = start.right() - new_x;
        x = new_x;
    }
    if handle.moves_bottom_edge() {
        h = (start.h + dy).clamp(min_h, PERCENT_MAX - start.y);
    }
    if handle.moves_top_edge() {
        let new_y = (start.y + dy).clamp(0.0, start.bottom() - min_h);
        h = start.bottom() - new_y;
        y = new_y;
    }

    AreaRect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_percent_bounds_and_precision() {
        assert_eq!(clamp_percent(-3.0), 0.0);
        assert_eq!(clamp_percent(120.0), 100.0);
        assert_eq!(clamp_percent(33.3333), 33.33);
        assert_eq!(clamp_percent(66.666), 66.67);
    }

    #[test]
    fn test_pixel_roundtrip_within_tolerance() {
        let rect = AreaRect::new(10.25, 20.5, 30.75, 40.0);
        let px = to_pixel_rect(rect, 800.0, 600.0);
        let back = to_percent_rect(px, 800.0, 600.0).unwrap();

        assert!((back.x - rect.x).abs() <= 0.2);
        assert!((back.y - rect.y).abs() <= 0.2);
        assert!((back.w - rect.w).abs() <= 0.2);
        assert!((back.h - rect.h).abs() <= 0.2);
    }

    #[test]
    fn test_percent_rect_degenerate_container() {
        let px = PixelRect { x: 0, y: 0, w: 10, h: 10 };
        assert!(to_percent_rect(px, 0.0, 600.0).is_none());
        assert!(to_percent_rect(px, 800.0, 0.0).is_none());
    }

    #[test]
    fn test_constrain_moves_before_shrinking() {
        // Fits, but hangs over the right edge: should slide back, same size.
        let rect = AreaRect::new(90.0, 10.0, 20.0, 20.0);
        let out = constrain_rect(rect, MIN_AREA_PCT, MIN_AREA_PCT);
        assert_eq!(out.w, 20.0);
        assert_eq!(out.x, 80.0);

        // Too small: grows to the minimum.
        let rect = AreaRect::new(10.0, 10.0, 1.0, 1.0);
        let out = constrain_rect(rect, MIN_AREA_PCT, MIN_AREA_PCT);
        assert_eq!(out.w, MIN_AREA_PCT);
        assert_eq!(out.h, MIN_AREA_PCT);
    }

    #[test]
    fn test_resize_pins_opposite_edge() {
        let start = AreaRect::new(10.0, 10.0, 30.0, 20.0);

        // Dragging the west edge keeps the right edge fixed.
        let out = resize_rect(start, Handle::West, 5.0, 0.0, MIN_AREA_PCT, MIN_AREA_PCT);
        assert_eq!(out.right(), start.right());
        assert_eq!(out.x, 15.0);

        // Shrinking past the opposite edge stops at the minimum.
        let out = resize_rect(start, Handle::West, 50.0, 0.0, MIN_AREA_PCT, MIN_AREA_PCT);
        assert_eq!(out.w, MIN_AREA_PCT);
        assert_eq!(out.right(), start.right());
    }

    #[test]
    fn test_resize_clamps_to_container() {
        let start = AreaRect::new(60.0, 10.0, 20.0, 20.0);
        let out = resize_rect(start, Handle::SouthEast, 90.0, 0.0, MIN_AREA_PCT, MIN_AREA_PCT);
        assert_eq!(out.w, 40.0); // exactly 100 - x
        assert_eq!(out.right(), 100.0);
    }
}
