use crate::area::Area;
use crate::geometry::{self, AreaRect, Handle, MIN_AREA_PCT, PERCENT_MAX};
use uuid::Uuid;

/// Pointer distance (px) within which a resize handle responds.
pub const RESIZE_HANDLE_RADIUS: f32 = 12.0;

/// A pointer position in container-local pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The active pointer gesture, carried as an explicit value rather than
/// closure-captured mutable state.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    Moving {
        area: Uuid,
        start: AreaRect,
        origin: Point,
    },
    Resizing {
        area: Uuid,
        handle: Handle,
        start: AreaRect,
        origin: Point,
    },
}

/// Translates pointer events on the canvas into selection changes and
/// constrained geometry updates.
///
/// The container size is re-measured by the caller on every event, so the
/// pixel→percent mapping stays correct across window resizes and zoom.
/// Events arriving before the canvas has a measured size are ignored.
pub struct InteractionController {
    gesture: Gesture,
    selected: Option<Uuid>,
    /// Set once any pointer-move in the current gesture changed geometry.
    moved: bool,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            gesture: Gesture::Idle,
            selected: None,
            moved: false,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn select(&mut self, id: Option<Uuid>) {
        self.selected = id;
    }

    /// Hit-test and begin a gesture.
    ///
    /// The selected area's handles win over area bodies; otherwise areas are
    /// tested in insertion order and the first one containing the point is
    /// selected and starts moving.
    pub fn pointer_down(&mut self, point: Point, container: (f32, f32), areas: &[Area]) {
        let (cw, ch) = container;
        if cw <= 0.0 || ch <= 0.0 {
            // Not laid out yet; percentages would be NaN.
            return;
        }

        self.moved = false;

        if let Some(selected) = self.selected_area(areas) {
            if let Some(handle) = hit_handle(point, selected.rect, cw, ch) {
                log::debug!("Resize gesture on area {} via {}", selected.id, handle.as_str());
                self.gesture = Gesture::Resizing {
                    area: selected.id,
                    handle,
                    start: selected.rect,
                    origin: point,
                };
                return;
            }
        }

        let px = point.x / cw * PERCENT_MAX;
        let py = point.y / ch * PERCENT_MAX;
        match areas.iter().find(|a| a.rect.contains(px, py)) {
            Some(area) => {
                self.selected = Some(area.id);
                self.gesture = Gesture::Moving {
                    area: area.id,
                    start: area.rect,
                    origin: point,
                };
            }
            None => {
                self.selected = None;
                self.gesture = Gesture::Idle;
            }
        }
    }

    /// Advance the active gesture, writing the constrained rect back to the
    /// matching area. Returns true when geometry changed this event.
    pub fn pointer_move(&mut self, point: Point, container: (f32, f32), areas: &mut [Area]) -> bool {
        let (cw, ch) = container;
        if cw <= 0.0 || ch <= 0.0 {
            return false;
        }

        let (id, new_rect) = match &self.gesture {
            Gesture::Idle => return false,
            Gesture::Moving { area, start, origin } => {
                let dx = (point.x - origin.x) / cw * PERCENT_MAX;
                let dy = (point.y - origin.y) / ch * PERCENT_MAX;
                (*area, geometry::move_rect(*start, dx, dy, MIN_AREA_PCT, MIN_AREA_PCT))
            }
            Gesture::Resizing { area, handle, start, origin } => {
                let dx = (point.x - origin.x) / cw * PERCENT_MAX;
                let dy = (point.y - origin.y) / ch * PERCENT_MAX;
                (
                    *area,
                    geometry::resize_rect(*start, *handle, dx, dy, MIN_AREA_PCT, MIN_AREA_PCT),
                )
            }
        };

        let Some(area) = areas.iter_mut().find(|a| a.id == id) else {
            // The area vanished mid-gesture (e.g. deleted); drop the gesture.
            self.gesture = Gesture::Idle;
            return false;
        };
        if area.rect == new_rect {
            return false;
        }
        area.rect = new_rect;
        self.moved = true;
        true
    }

    /// Finish the gesture. Returns true when it committed a geometry change,
    /// in which case the caller pushes exactly one history entry.
    pub fn pointer_up(&mut self) -> bool {
        let committed = self.moved && !self.is_idle();
        self.gesture = Gesture::Idle;
        self.moved = false;
        committed
    }

    /// The handle under `point` for the currently selected area, if any.
    /// Used by the canvas to pick hover cursors.
    pub fn hover_handle(&self, point: Point, container: (f32, f32), areas: &[Area]) -> Option<Handle> {
        let (cw, ch) = container;
        if cw <= 0.0 || ch <= 0.0 {
            return None;
        }
        let selected = self.selected_area(areas)?;
        hit_handle(point, selected.rect, cw, ch)
    }

    fn selected_area<'a>(&self, areas: &'a [Area]) -> Option<&'a Area> {
        let id = self.selected?;
        areas.iter().find(|a| a.id == id)
    }
}

/// The handle of `rect` whose anchor lies within the grab radius of `point`.
fn hit_handle(point: Point, rect: AreaRect, cw: f32, ch: f32) -> Option<Handle> {
    for handle in Handle::ALL {
        let (ax, ay) = handle.anchor(rect);
        let hx = ax / PERCENT_MAX * cw;
        let hy = ay / PERCENT_MAX * ch;
        let dist = ((point.x - hx).powi(2) + (point.y - hy).powi(2)).sqrt();
        if dist <= RESIZE_HANDLE_RADIUS {
            return Some(handle);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::AreaAction;

    const CONTAINER: (f32, f32) = (800.0, 600.0);

    fn area_at(x: f32, y: f32, w: f32, h: f32) -> Area {
        Area::new(AreaRect::new(x, y, w, h), AreaAction::default())
    }

    #[test]
    fn test_pointer_down_selects_first_hit_in_insertion_order() {
        // Two overlapping areas: the first one wins.
        let areas = vec![area_at(10.0, 10.0, 40.0, 40.0), area_at(20.0, 20.0, 40.0, 40.0)];
        let mut ctl = InteractionController::new();

        // 30%,30% is inside both.
        ctl.pointer_down(Point::new(240.0, 180.0), CONTAINER, &areas);
        assert_eq!(ctl.selected(), Some(areas[0].id));
        assert!(matches!(ctl.gesture(), Gesture::Moving { .. }));
    }

    #[test]
    fn test_zero_size_container_ignores_gestures() {
        let mut areas = vec![area_at(10.0, 10.0, 40.0, 40.0)];
        let mut ctl = InteractionController::new();

        ctl.pointer_down(Point::new(100.0, 100.0), (0.0, 0.0), &areas);
        assert!(ctl.is_idle());
        assert!(!ctl.pointer_move(Point::new(120.0, 100.0), (0.0, 0.0), &mut areas));
        assert!(!ctl.pointer_up());
    }

    #[test]
    fn test_move_commits_once_per_gesture() {
        let mut areas = vec![area_at(10.0, 10.0, 20.0, 20.0)];
        let mut ctl = InteractionController::new();

        ctl.pointer_down(Point::new(120.0, 90.0), CONTAINER, &areas);
        assert!(ctl.pointer_move(Point::new(200.0, 90.0), CONTAINER, &mut areas));
        assert!(ctl.pointer_move(Point::new(280.0, 90.0), CONTAINER, &mut areas));
        assert!(ctl.pointer_up());
        // Second up without a gesture commits nothing.
        assert!(!ctl.pointer_up());
        assert_eq!(areas[0].rect.x, 30.0);
    }

    #[test]
    fn test_drag_clamps_at_container_edge() {
        let mut areas = vec![area_at(70.0, 70.0, 20.0, 20.0)];
        let mut ctl = InteractionController::new();

        ctl.pointer_down(Point::new(640.0, 480.0), CONTAINER, &areas);
        ctl.pointer_move(Point::new(3000.0, 3000.0), CONTAINER, &mut areas);

        let rect = areas[0].rect;
        assert_eq!(rect.right(), 100.0);
        assert_eq!(rect.bottom(), 100.0);
        assert_eq!(rect.w, 20.0);
    }
}
