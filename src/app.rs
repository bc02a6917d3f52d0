use crate::assets::AssetCache;
use crate::error::StudioResult;
use crate::export::store::{DirectoryStore, FileStore};
use crate::export::{EXPORT_WIDTHS, ImagemapPublish, compose_design, publish_variants};
use crate::history::HistoryStack;
use crate::interaction::InteractionController;
use crate::jobs::JobRunner;
use crate::panels;
use crate::render::{BlockVisual, PREVIEW_BASE_WIDTH};
use crate::repository::{Draft, DraftRepository, JsonDraftRepository};
use crate::state::{DesignState, TEMPLATES};
use crate::wire::to_wire_actions;
use egui::Key;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Published asset directories are grouped under this prefix, one
/// subdirectory per draft.
const PUBLISH_BASE_DIR: &str = "imagemaps";

/// The designer application: one open draft, its gesture controller and
/// history, and the injected persistence/upload collaborators.
pub struct StudioApp {
    state: DesignState,
    history: HistoryStack<DesignState>,
    interaction: InteractionController,

    repository: JsonDraftRepository,
    store: Arc<DirectoryStore>,
    assets: AssetCache,

    draft_id: Uuid,
    draft_name: String,
    base_image: Option<PathBuf>,
    known_drafts: Vec<(Uuid, String)>,

    publish: JobRunner<StudioResult<(ImagemapPublish, RgbaImage)>>,
    last_publish: Option<ImagemapPublish>,
    publish_preview: Option<egui::TextureHandle>,
    show_preview: bool,

    error: Option<String>,
    /// Set when the canvas surface is unusable; the app renders a fallback
    /// view instead of crashing.
    fatal: Option<String>,
}

impl StudioApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let data_dir =
            PathBuf::from(std::env::var("STUDIO_DATA_DIR").unwrap_or_else(|_| "studio-data".into()));
        let published = data_dir.join("published");
        let base_url = format!("file://{}", published.display());

        let repository = JsonDraftRepository::new(data_dir.join("drafts"));
        let known_drafts = match repository.list() {
            Ok(drafts) => drafts.iter().map(|d| (d.id, d.name.clone())).collect(),
            Err(err) => {
                log::warn!("Could not list drafts: {err}");
                Vec::new()
            }
        };

        let state = DesignState::default();
        let mut history = HistoryStack::new();
        history.push(&state);

        Self {
            state,
            history,
            interaction: InteractionController::new(),
            repository,
            store: Arc::new(DirectoryStore::new(published, base_url)),
            assets: AssetCache::new(),
            draft_id: Uuid::new_v4(),
            draft_name: "Untitled".into(),
            base_image: None,
            known_drafts,
            publish: JobRunner::new(),
            last_publish: None,
            publish_preview: None,
            show_preview: false,
            error: None,
            fatal: None,
        }
    }

    /// Record the current state as one history entry.
    fn commit(&mut self) {
        self.history.push(&self.state);
    }

    fn undo(&mut self) {
        if let Some(previous) = self.history.undo() {
            self.state = previous;
            self.after_state_swap();
        }
    }

    fn redo(&mut self) {
        if let Some(next) = self.history.redo() {
            self.state = next;
            self.after_state_swap();
        }
    }

    /// Re-validate transient editor state after history replaced the design.
    fn after_state_swap(&mut self) {
        self.state.sync_blocks();
        if let Some(id) = self.interaction.selected() {
            if self.state.area_index(id).is_none() {
                self.interaction.select(None);
            }
        }
    }

    fn delete_selected(&mut self) {
        if let Some(id) = self.interaction.selected() {
            if self.state.remove_area(id) {
                self.interaction.select(None);
                self.commit();
            }
        }
    }

    fn new_draft(&mut self) {
        self.state = DesignState::default();
        self.draft_id = Uuid::new_v4();
        self.draft_name = "Untitled".into();
        self.base_image = None;
        self.clear_publish_state();
        self.interaction.select(None);
        self.history.clear();
        self.commit();
    }

    fn clear_publish_state(&mut self) {
        self.last_publish = None;
        self.publish_preview = None;
        self.show_preview = false;
    }

    fn save_draft(&mut self) {
        let draft = Draft {
            id: self.draft_id,
            name: self.draft_name.clone(),
            base_image: self.base_image.clone(),
            state: self.state.clone(),
        };
        match self.repository.save(&draft) {
            Ok(()) => self.refresh_draft_list(),
            Err(err) => self.error = Some(format!("Save failed: {err}")),
        }
    }

    fn open_draft(&mut self, id: Uuid) {
        match self.repository.get(id) {
            Ok(draft) => {
                self.state = draft.state;
                self.state.sync_blocks();
                self.draft_id = draft.id;
                self.draft_name = draft.name;
                self.base_image = draft.base_image;
                self.clear_publish_state();
                self.interaction.select(None);
                self.history.clear();
                self.commit();
            }
            Err(err) => self.error = Some(format!("Open failed: {err}")),
        }
    }

    fn delete_draft(&mut self, id: Uuid) {
        if let Err(err) = self.repository.delete(id) {
            self.error = Some(format!("Delete failed: {err}"));
        }
        self.refresh_draft_list();
    }

    fn refresh_draft_list(&mut self) {
        match self.repository.list() {
            Ok(drafts) => {
                self.known_drafts = drafts.iter().map(|d| (d.id, d.name.clone())).collect();
            }
            Err(err) => log::warn!("Could not list drafts: {err}"),
        }
    }

    /// Kick off a publish on a worker thread. The run id machinery in
    /// [`JobRunner`] drops this run's result if the user starts a newer one.
    fn start_publish(&mut self) {
        let Some(bg_path) = self.base_image.clone() else {
            self.error = Some("Choose a background image before publishing".into());
            return;
        };
        let Some(background) = self.assets.bitmap(&bg_path) else {
            self.error = Some("Background image is not loaded yet".into());
            return;
        };

        let state = self.state.clone();
        let bitmaps: Vec<(Option<Arc<RgbaImage>>, Option<Arc<RgbaImage>>)> = state
            .blocks
            .iter()
            .map(|block| {
                (
                    block.image.as_ref().and_then(|i| self.assets.bitmap(&i.path)),
                    block.sticker.as_ref().and_then(|s| self.assets.bitmap(&s.path)),
                )
            })
            .collect();
        let store = Arc::clone(&self.store);
        let dir = format!("{PUBLISH_BASE_DIR}/{}", self.draft_id);
        log::info!("Publishing {} areas to {dir}", state.areas.len());

        self.publish.spawn(move || {
            let base_w = EXPORT_WIDTHS[EXPORT_WIDTHS.len() - 1];
            let base_h = ((base_w as f64 * background.height() as f64
                / background.width().max(1) as f64)
                .round() as u32)
                .max(1);

            let visuals = state
                .blocks
                .iter()
                .enumerate()
                .map(|(i, config)| BlockVisual {
                    config,
                    image: bitmaps[i].0.as_deref(),
                    sticker: bitmaps[i].1.as_deref(),
                })
                .collect();
            let composed = compose_design(
                &state,
                Some(background.as_ref()),
                visuals,
                base_w,
                base_h,
                PREVIEW_BASE_WIDTH,
            )?;

            let actions = to_wire_actions(&state.areas, base_w, base_h);
            let publish = publish_variants(store.as_ref(), &dir, &composed, &EXPORT_WIDTHS, actions)?;

            let json = serde_json::to_vec_pretty(&publish)?;
            store.put(&format!("{dir}/imagemap.json"), &json, "application/json")?;
            Ok((publish, composed))
        });
    }

    fn poll_publish(&mut self, ctx: &egui::Context) {
        if let Some(result) = self.publish.poll() {
            match result {
                Ok((publish, composed)) => {
                    log::info!(
                        "Publish complete: base {}x{}, {} variants",
                        publish.base_size.width,
                        publish.base_size.height,
                        publish.urls.len()
                    );
                    self.error = None;
                    // Keep the composed raster around so the user can check
                    // exactly what was uploaded.
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [composed.width() as usize, composed.height() as usize],
                        composed.as_raw(),
                    );
                    self.publish_preview = Some(ctx.load_texture(
                        "publish-preview",
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                    self.last_publish = Some(publish);
                }
                Err(err) => {
                    log::error!("Publish failed: {err}");
                    self.error = Some(format!("Publish failed: {err}"));
                }
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo, delete) = ctx.input(|i| {
            (
                i.modifiers.command && !i.modifiers.shift && i.key_pressed(Key::Z),
                i.modifiers.command
                    && (i.key_pressed(Key::Y) || (i.modifiers.shift && i.key_pressed(Key::Z))),
                i.key_pressed(Key::Delete),
            )
        });
        if undo {
            self.undo();
        }
        if redo {
            self.redo();
        }
        // Delete only acts on the canvas selection, never while a text
        // field has focus.
        if delete && !ctx.wants_keyboard_input() {
            self.delete_selected();
        }
    }

    /// Dropping an image file anywhere on the window sets it as the design's
    /// background.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<egui::DroppedFile> = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let Some(path) = file.path else {
                log::warn!("Dropped file has no accessible path: {}", file.name);
                continue;
            };
            if !is_image_path(&path) {
                log::warn!("Dropped file is not a supported image: {}", path.display());
                continue;
            }
            self.assets.invalidate(&path);
            self.base_image = Some(path);
            self.clear_publish_state();
            break;
        }
    }

    /// Decode every image the open design references.
    fn ensure_assets(&mut self, ctx: &egui::Context) {
        if let Some(path) = self.base_image.clone() {
            self.assets.ensure(ctx, &path);
        }
        let mut paths = Vec::new();
        for block in &self.state.blocks {
            if let Some(image) = &block.image {
                paths.push(image.path.clone());
            }
            if let Some(sticker) = &block.sticker {
                paths.push(sticker.path.clone());
            }
        }
        for path in paths {
            if path.as_os_str().is_empty() {
                continue;
            }
            self.assets.ensure(ctx, &path);
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Draft:");
            ui.add(egui::TextEdit::singleline(&mut self.draft_name).desired_width(140.0));
            if ui.button("Save").clicked() {
                self.save_draft();
            }

            let mut open_request = None;
            let mut delete_request = None;
            ui.menu_button("Open", |ui| {
                if self.known_drafts.is_empty() {
                    ui.weak("No saved drafts");
                }
                for (id, name) in &self.known_drafts {
                    ui.horizontal(|ui| {
                        if ui.button(name).clicked() {
                            open_request = Some(*id);
                            ui.close_menu();
                        }
                        if ui.small_button("x").on_hover_text("Delete draft").clicked() {
                            delete_request = Some(*id);
                            ui.close_menu();
                        }
                    });
                }
            });
            if let Some(id) = open_request {
                self.open_draft(id);
            }
            if let Some(id) = delete_request {
                self.delete_draft(id);
            }
            if ui.button("New").clicked() {
                self.new_draft();
            }

            ui.separator();

            let mut template = None;
            ui.menu_button("Template", |ui| {
                for (label, cols, rows) in TEMPLATES {
                    if ui.button(*label).clicked() {
                        template = Some((*cols, *rows));
                        ui.close_menu();
                    }
                }
            });
            if let Some((cols, rows)) = template {
                self.state.apply_template(cols, rows);
                self.interaction.select(None);
                self.commit();
            }

            if ui.button("Add area").clicked() {
                let id = self.state.add_area();
                self.interaction.select(Some(id));
                self.commit();
            }
            let has_selection = self.interaction.selected().is_some();
            if ui
                .add_enabled(has_selection, egui::Button::new("Delete area"))
                .clicked()
            {
                self.delete_selected();
            }

            ui.separator();

            if ui
                .add_enabled(self.history.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                self.undo();
            }
            if ui
                .add_enabled(self.history.can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                self.redo();
            }

            ui.separator();

            if self.publish.in_flight() {
                ui.spinner();
                ui.label("Publishing…");
            } else if ui.button("Publish").clicked() {
                self.start_publish();
            }
        });
    }

    fn status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(error) = self.error.clone() {
                ui.colored_label(egui::Color32::LIGHT_RED, error);
                if ui.small_button("Dismiss").clicked() {
                    self.error = None;
                }
            } else if let Some(publish) = &self.last_publish {
                ui.label(format!(
                    "Published {} variants, base {}x{} — {}",
                    publish.urls.len(),
                    publish.base_size.width,
                    publish.base_size.height,
                    publish.base_url
                ));
                if self.publish_preview.is_some() && ui.small_button("Preview").clicked() {
                    self.show_preview = !self.show_preview;
                }
            } else if self.base_image.is_none() {
                ui.weak("Drop an image onto the window to set the background.");
            } else {
                ui.weak("Ready.");
            }
        });
    }

    /// Fallback view for an unusable canvas surface.
    fn fallback_view(&mut self, ctx: &egui::Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.heading("The editor view is unavailable");
                ui.label(message);
                ui.add_space(12.0);
                if ui.button("Reload editor").clicked() {
                    self.fatal = None;
                    self.assets = AssetCache::new();
                    self.interaction = InteractionController::new();
                }
            });
        });
    }
}

impl eframe::App for StudioApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_publish(ctx);
        if self.publish.in_flight() {
            // Keep polling while the worker runs.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        if let Some(message) = self.fatal.clone() {
            self.fallback_view(ctx, &message);
            return;
        }

        self.handle_dropped_files(ctx);
        self.handle_shortcuts(ctx);
        self.ensure_assets(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));

        let mut inspector_changed = false;
        egui::SidePanel::right("inspector")
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    inspector_changed =
                        panels::inspector_panel(ui, &mut self.state, &self.interaction);
                });
            });
        if inspector_changed {
            self.commit();
        }

        let mut canvas_result = Ok(false);
        egui::CentralPanel::default().show(ctx, |ui| {
            let background = self
                .base_image
                .as_deref()
                .and_then(|path| self.assets.texture(path));
            canvas_result = panels::canvas_panel(
                ui,
                &mut self.state,
                &mut self.interaction,
                background,
                &self.assets,
            );
        });
        match canvas_result {
            Ok(true) => self.commit(),
            Ok(false) => {}
            Err(err) => {
                log::error!("Canvas surface failed: {err}");
                self.fatal = Some(err.to_string());
            }
        }

        if self.show_preview {
            if let Some(texture) = &self.publish_preview {
                let mut open = self.show_preview;
                egui::Window::new("Published image")
                    .open(&mut open)
                    .default_width(520.0)
                    .show(ctx, |ui| {
                        let [w, h] = texture.size();
                        let aspect = h as f32 / w.max(1) as f32;
                        let width = ui.available_width();
                        let sized = egui::load::SizedTexture::from_handle(texture);
                        ui.add(
                            egui::Image::from_texture(sized)
                                .fit_to_exact_size(egui::vec2(width, width * aspect)),
                        );
                    });
                self.show_preview = open;
            }
        }
    }
}

fn is_image_path(path: &std::path::Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"))
}
