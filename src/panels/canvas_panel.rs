use crate::assets::AssetCache;
use crate::error::{StudioError, StudioResult};
use crate::geometry::{Handle, PERCENT_MAX};
use crate::interaction::{InteractionController, Point};
use crate::render::painter::PainterSurface;
use crate::render::surface::Rect as SurfaceRect;
use crate::render::{BlockVisual, PREVIEW_BASE_WIDTH, Scene, draw_scene};
use crate::state::DesignState;
use egui::{Color32, CursorIcon, Pos2, Sense, Stroke, TextureHandle, Vec2};

/// Canvas aspect before a background image is chosen (full rich menu).
const DEFAULT_ASPECT: f32 = 2500.0 / 1686.0;
const CANVAS_BG: Color32 = Color32::from_gray(28);
const HANDLE_SIZE: f32 = 8.0;
const HANDLE_COLOR: Color32 = Color32::from_rgb(30, 144, 255);

/// Draw the editor canvas and route pointer input through the gesture
/// controller. Returns true when a gesture committed a change, in which
/// case the caller records one history entry.
pub fn canvas_panel(
    ui: &mut egui::Ui,
    state: &mut DesignState,
    interaction: &mut InteractionController,
    background: Option<&TextureHandle>,
    assets: &AssetCache,
) -> StudioResult<bool> {
    let available = ui.available_size();
    let (response, painter) = ui.allocate_painter(available, Sense::click_and_drag());
    let panel_rect = response.rect;
    if !panel_rect.is_finite() {
        return Err(StudioError::Surface(format!(
            "canvas rect is not finite: {panel_rect:?}"
        )));
    }

    painter.rect_filled(panel_rect, 0.0, CANVAS_BG);

    // Fit the design surface into the panel, preserving the background's
    // aspect ratio and centering it.
    let aspect = background
        .map(|texture| {
            let [w, h] = texture.size();
            w as f32 / h.max(1) as f32
        })
        .unwrap_or(DEFAULT_ASPECT);
    let canvas_w = (panel_rect.width().min(panel_rect.height() * aspect)).max(0.0);
    let canvas_h = if aspect > 0.0 { canvas_w / aspect } else { 0.0 };
    let canvas_rect = egui::Rect::from_center_size(
        panel_rect.center(),
        Vec2::new(canvas_w, canvas_h),
    );
    let container = (canvas_w, canvas_h);
    let local = |pos: Pos2| Point::new(pos.x - canvas_rect.min.x, pos.y - canvas_rect.min.y);

    // Pointer routing. The container size is re-measured every frame, so
    // drags stay correct across window resizes.
    let mut committed = false;
    let pressed = ui.input(|i| i.pointer.primary_pressed());
    let released = ui.input(|i| i.pointer.primary_released());

    if pressed && response.hovered() {
        if let Some(pos) = response.interact_pointer_pos() {
            interaction.pointer_down(local(pos), container, &state.areas);
        }
    }
    if !interaction.is_idle() {
        if let Some(pos) = response.interact_pointer_pos() {
            interaction.pointer_move(local(pos), container, &mut state.areas);
        }
    }
    if released && interaction.pointer_up() {
        committed = true;
    }

    if let Some(hover) = response.hover_pos() {
        if let Some(handle) = interaction.hover_handle(local(hover), container, &state.areas) {
            ui.ctx().set_cursor_icon(cursor_for(handle));
        }
    }

    // A plain page under the design while no background is loaded.
    if background.is_none() && canvas_w > 0.0 {
        painter.rect_filled(canvas_rect, 0.0, Color32::WHITE);
    }

    // The design itself goes through the shared pipeline — the same code
    // the export pass runs, at this canvas' scale.
    let selected_index = interaction.selected().and_then(|id| state.area_index(id));
    let visuals: Vec<BlockVisual<'_, TextureHandle>> = state
        .blocks
        .iter()
        .map(|config| BlockVisual {
            config,
            image: config.image.as_ref().and_then(|i| assets.texture(&i.path)),
            sticker: config.sticker.as_ref().and_then(|s| assets.texture(&s.path)),
        })
        .collect();
    let scene = Scene {
        canvas: SurfaceRect::new(canvas_rect.min.x, canvas_rect.min.y, canvas_w, canvas_h),
        background,
        areas: &state.areas,
        blocks: visuals,
        selected: selected_index,
        scale: if canvas_w > 0.0 { canvas_w / PREVIEW_BASE_WIDTH } else { 1.0 },
        decorations: true,
    };
    let mut surface = PainterSurface::new(painter.with_clip_rect(canvas_rect));
    draw_scene(&mut surface, &scene);

    // Resize handles on top of the selected area.
    if let Some(index) = selected_index {
        let rect = state.areas[index].rect;
        for handle in Handle::ALL {
            let (ax, ay) = handle.anchor(rect);
            let center = Pos2::new(
                canvas_rect.min.x + ax / PERCENT_MAX * canvas_w,
                canvas_rect.min.y + ay / PERCENT_MAX * canvas_h,
            );
            let handle_rect = egui::Rect::from_center_size(center, Vec2::splat(HANDLE_SIZE));
            painter.rect_filled(handle_rect, 2.0, HANDLE_COLOR);
            painter.rect_stroke(handle_rect, 2.0, Stroke::new(1.0, Color32::WHITE));
        }
    }

    Ok(committed)
}

fn cursor_for(handle: Handle) -> CursorIcon {
    match handle {
        Handle::North | Handle::South => CursorIcon::ResizeVertical,
        Handle::East | Handle::West => CursorIcon::ResizeHorizontal,
        Handle::NorthEast | Handle::SouthWest => CursorIcon::ResizeNeSw,
        Handle::NorthWest | Handle::SouthEast => CursorIcon::ResizeNwSe,
    }
}
