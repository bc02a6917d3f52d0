use crate::area::AreaAction;
use crate::block::{
    BlockConfig, BlockImage, HAlign, ImageFit, Sticker, StickerAnchor, StickerPlacement,
    TextPlacement, TextShadow, VAlign,
};
use crate::geometry::{AreaRect, MIN_AREA_PCT, constrain_rect};
use crate::interaction::InteractionController;
use crate::state::DesignState;
use egui::color_picker::{Alpha, color_edit_button_srgba};
use std::path::PathBuf;

/// The right-hand inspector: action form and block styling for the selected
/// area. Returns true when anything changed, so the caller records history.
pub fn inspector_panel(
    ui: &mut egui::Ui,
    state: &mut DesignState,
    interaction: &InteractionController,
) -> bool {
    let Some(index) = interaction.selected().and_then(|id| state.area_index(id)) else {
        ui.heading("Inspector");
        ui.separator();
        ui.weak("Select an area on the canvas, or add one from the toolbar.");
        return false;
    };

    let mut changed = false;
    ui.heading(format!("Area {}", index + 1));
    ui.separator();

    changed |= action_section(ui, state, index);
    ui.separator();
    changed |= geometry_section(ui, state, index);
    ui.separator();
    changed |= style_section(ui, state, index);

    changed
}

fn action_section(ui: &mut egui::Ui, state: &mut DesignState, index: usize) -> bool {
    let mut changed = false;
    let area = &mut state.areas[index];

    ui.label("Tap action");

    let mut label = area.label.clone().unwrap_or_default();
    ui.horizontal(|ui| {
        ui.label("Label:");
        if ui.text_edit_singleline(&mut label).changed() {
            area.set_label(label.clone());
            changed = true;
        }
    });

    let is_uri = matches!(area.action, AreaAction::Uri { .. });
    ui.horizontal(|ui| {
        if ui.radio(is_uri, "Open URL").clicked() && !is_uri {
            area.action = AreaAction::Uri { url: String::new() };
            changed = true;
        }
        if ui.radio(!is_uri, "Send message").clicked() && is_uri {
            area.action = AreaAction::Message { text: String::new() };
            changed = true;
        }
    });

    match &mut area.action {
        AreaAction::Uri { url } => {
            ui.horizontal(|ui| {
                ui.label("URL:");
                changed |= ui.text_edit_singleline(url).changed();
            });
        }
        AreaAction::Message { text } => {
            ui.horizontal(|ui| {
                ui.label("Text:");
                changed |= ui.text_edit_singleline(text).changed();
            });
        }
    }

    changed
}

fn geometry_section(ui: &mut egui::Ui, state: &mut DesignState, index: usize) -> bool {
    let mut changed = false;
    let area = &mut state.areas[index];
    let mut rect = area.rect;

    ui.label("Geometry (%)");
    ui.horizontal(|ui| {
        changed |= drag_pct(ui, "x", &mut rect.x);
        changed |= drag_pct(ui, "y", &mut rect.y);
        changed |= drag_pct(ui, "w", &mut rect.w);
        changed |= drag_pct(ui, "h", &mut rect.h);
    });

    if changed {
        area.rect = constrain_rect(
            AreaRect::new(rect.x, rect.y, rect.w, rect.h),
            MIN_AREA_PCT,
            MIN_AREA_PCT,
        );
    }
    changed
}

fn drag_pct(ui: &mut egui::Ui, label: &str, value: &mut f32) -> bool {
    ui.label(label);
    ui.add(egui::DragValue::new(value).speed(0.5).range(0.0..=100.0))
        .changed()
}

fn style_section(ui: &mut egui::Ui, state: &mut DesignState, index: usize) -> bool {
    let mut changed = false;
    let block = &mut state.blocks[index];

    ui.label("Block style");

    ui.horizontal(|ui| {
        ui.label("Fill:");
        changed |= color_edit_button_srgba(ui, &mut block.fill, Alpha::OnlyBlend).changed();
    });

    ui.collapsing("Text", |ui| {
        changed |= ui.text_edit_multiline(&mut block.text).changed();
        ui.horizontal(|ui| {
            ui.label("Font:");
            changed |= ui.text_edit_singleline(&mut block.font_family).changed();
            changed |= ui.checkbox(&mut block.bold, "Bold").changed();
        });
        changed |= ui
            .add(egui::Slider::new(&mut block.font_size, 10.0..=120.0).text("Size"))
            .changed();
        ui.horizontal(|ui| {
            ui.label("Color:");
            changed |= color_edit_button_srgba(ui, &mut block.text_color, Alpha::OnlyBlend).changed();
        });
        changed |= ui
            .add(egui::Slider::new(&mut block.padding, 0.0..=40.0).text("Padding"))
            .changed();

        changed |= placement_controls(ui, block);
        changed |= shadow_controls(ui, block);
    });

    ui.collapsing("Image", |ui| {
        changed |= image_controls(ui, &mut block.image);
    });

    ui.collapsing("Sticker", |ui| {
        changed |= sticker_controls(ui, &mut block.sticker);
    });

    changed
}

fn placement_controls(ui: &mut egui::Ui, block: &mut BlockConfig) -> bool {
    let mut changed = false;
    let is_grid = matches!(block.placement, TextPlacement::Grid { .. });

    ui.horizontal(|ui| {
        if ui.radio(is_grid, "Aligned").clicked() && !is_grid {
            block.placement = TextPlacement::Grid {
                align: HAlign::Center,
                v_align: VAlign::Center,
            };
            changed = true;
        }
        if ui.radio(!is_grid, "Free position").clicked() && is_grid {
            block.placement = TextPlacement::Free { x: 50.0, y: 50.0 };
            changed = true;
        }
    });

    match &mut block.placement {
        TextPlacement::Grid { align, v_align } => {
            ui.horizontal(|ui| {
                for (value, label) in [
                    (HAlign::Left, "Left"),
                    (HAlign::Center, "Center"),
                    (HAlign::Right, "Right"),
                ] {
                    changed |= ui.selectable_value(align, value, label).changed();
                }
            });
            ui.horizontal(|ui| {
                for (value, label) in [
                    (VAlign::Top, "Top"),
                    (VAlign::Center, "Middle"),
                    (VAlign::Bottom, "Bottom"),
                ] {
                    changed |= ui.selectable_value(v_align, value, label).changed();
                }
            });
        }
        TextPlacement::Free { x, y } => {
            changed |= ui.add(egui::Slider::new(x, 0.0..=100.0).text("x %")).changed();
            changed |= ui.add(egui::Slider::new(y, 0.0..=100.0).text("y %")).changed();
        }
    }
    changed
}

fn shadow_controls(ui: &mut egui::Ui, block: &mut BlockConfig) -> bool {
    let mut changed = false;
    let mut enabled = block.shadow.is_some();

    if ui.checkbox(&mut enabled, "Drop shadow").changed() {
        block.shadow = enabled.then(TextShadow::default);
        changed = true;
    }
    if let Some(shadow) = &mut block.shadow {
        ui.horizontal(|ui| {
            ui.label("Color:");
            changed |= color_edit_button_srgba(ui, &mut shadow.color, Alpha::OnlyBlend).changed();
        });
        changed |= ui
            .add(egui::Slider::new(&mut shadow.blur, 0.0..=20.0).text("Blur"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut shadow.dx, -20.0..=20.0).text("Offset x"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut shadow.dy, -20.0..=20.0).text("Offset y"))
            .changed();
    }
    changed
}

fn image_controls(ui: &mut egui::Ui, image: &mut Option<BlockImage>) -> bool {
    let mut changed = false;

    match image {
        Some(settings) => {
            changed |= path_edit(ui, &mut settings.path);
            ui.horizontal(|ui| {
                changed |= ui
                    .selectable_value(&mut settings.fit, ImageFit::Contain, "Contain")
                    .changed();
                changed |= ui
                    .selectable_value(&mut settings.fit, ImageFit::Cover, "Cover")
                    .changed();
            });
            if ui.button("Remove image").clicked() {
                *image = None;
                changed = true;
            }
        }
        None => {
            if ui.button("Add image").clicked() {
                *image = Some(BlockImage {
                    path: PathBuf::new(),
                    fit: ImageFit::Cover,
                });
                changed = true;
            }
        }
    }
    changed
}

fn sticker_controls(ui: &mut egui::Ui, sticker: &mut Option<Sticker>) -> bool {
    let mut changed = false;

    match sticker {
        Some(settings) => {
            changed |= path_edit(ui, &mut settings.path);
            changed |= ui
                .add(egui::Slider::new(&mut settings.scale, 0.1..=1.0).text("Scale"))
                .changed();

            let is_anchor = matches!(settings.placement, StickerPlacement::Anchor(_));
            ui.horizontal(|ui| {
                if ui.radio(is_anchor, "Anchored").clicked() && !is_anchor {
                    settings.placement = StickerPlacement::Anchor(StickerAnchor::Center);
                    changed = true;
                }
                if ui.radio(!is_anchor, "Free").clicked() && is_anchor {
                    settings.placement = StickerPlacement::Free { x: 50.0, y: 50.0 };
                    changed = true;
                }
            });
            match &mut settings.placement {
                StickerPlacement::Anchor(anchor) => {
                    egui::ComboBox::from_id_salt("sticker_anchor")
                        .selected_text(anchor_label(*anchor))
                        .show_ui(ui, |ui| {
                            for value in [
                                StickerAnchor::Center,
                                StickerAnchor::TopLeft,
                                StickerAnchor::TopRight,
                                StickerAnchor::BottomLeft,
                                StickerAnchor::BottomRight,
                            ] {
                                changed |= ui
                                    .selectable_value(anchor, value, anchor_label(value))
                                    .changed();
                            }
                        });
                }
                StickerPlacement::Free { x, y } => {
                    changed |= ui.add(egui::Slider::new(x, 0.0..=100.0).text("x %")).changed();
                    changed |= ui.add(egui::Slider::new(y, 0.0..=100.0).text("y %")).changed();
                }
            }
            if ui.button("Remove sticker").clicked() {
                *sticker = None;
                changed = true;
            }
        }
        None => {
            if ui.button("Add sticker").clicked() {
                *sticker = Some(Sticker {
                    path: PathBuf::new(),
                    scale: 0.5,
                    placement: StickerPlacement::Anchor(StickerAnchor::Center),
                });
                changed = true;
            }
        }
    }
    changed
}

fn anchor_label(anchor: StickerAnchor) -> &'static str {
    match anchor {
        StickerAnchor::Center => "Center",
        StickerAnchor::TopLeft => "Top left",
        StickerAnchor::TopRight => "Top right",
        StickerAnchor::BottomLeft => "Bottom left",
        StickerAnchor::BottomRight => "Bottom right",
    }
}

fn path_edit(ui: &mut egui::Ui, path: &mut PathBuf) -> bool {
    let mut text = path.display().to_string();
    ui.label("File path:");
    let changed = ui.text_edit_singleline(&mut text).changed();
    if changed {
        *path = PathBuf::from(text);
    }
    changed
}
