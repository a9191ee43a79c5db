use egui::Vec2;

use crate::command::History;
use crate::config::{EditorConfig, ImportConfig};
use crate::export::{ExportConfig, ExportError, ExportFormat, PlanExporter, Surface};
use crate::file_handler::{FileHandler, PickedImage};
use crate::geometry::hit_test;
use crate::import::{ImportJob, ImportRequest, parse_width};
use crate::input::{CanvasEvent, Shortcut, collect_shortcuts};
use crate::panels;
use crate::plan::{FloorPlan, Unit};
use crate::renderer::Renderer;
use crate::state::EditorState;
use crate::tools::{DragAction, Edit, EditorMode, Tool, ToolContext};
use crate::viewport::Viewport;

/// Fields of the "New Project" import form.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ImportForm {
    /// Never written to storage
    #[serde(skip)]
    pub api_key: String,
    /// Real width of the photographed plan, as typed
    pub width: String,
    pub unit: Unit,
}

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
/// Only the import form survives a restart; the plan always starts fresh.
#[derive(serde::Deserialize, serde::Serialize, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct FloorplanApp {
    import_form: ImportForm,

    #[serde(skip)]
    history: History<FloorPlan>,
    #[serde(skip)]
    editor: EditorState,
    #[serde(skip)]
    viewport: Viewport,
    #[serde(skip)]
    renderer: Renderer,
    #[serde(skip)]
    config: EditorConfig,
    #[serde(skip)]
    import_config: ImportConfig,
    #[serde(skip)]
    exporter: PlanExporter,
    #[serde(skip)]
    file_handler: FileHandler,
    #[serde(skip)]
    import_job: Option<ImportJob>,
    #[serde(skip)]
    import_error: Option<String>,
    /// Modal message after an export or share attempt
    #[serde(skip)]
    notice: Option<String>,
    #[serde(skip)]
    drag_action: Option<DragAction>,
    /// Whether the drag in progress has its own history entry yet
    #[serde(skip)]
    drag_recorded: bool,
    #[serde(skip)]
    canvas_size: Vec2,
}

impl FloorplanApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        app.import_config = ImportConfig::from_env();
        app.exporter = PlanExporter::new(ExportConfig::from_env());
        if let Some(api_key) = &app.import_config.api_key {
            app.import_form.api_key = api_key.clone();
        }
        app
    }

    /// An editor showing `plan`, with default settings and no history.
    pub fn with_plan(plan: FloorPlan) -> Self {
        Self {
            history: History::new(plan),
            ..Self::default()
        }
    }

    pub fn plan(&self) -> &FloorPlan {
        self.history.current()
    }

    pub fn history(&self) -> &History<FloorPlan> {
        &self.history
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> EditorMode {
        self.editor.mode()
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.drag_action = None;
        self.editor.set_mode(mode);
    }

    pub fn undo(&mut self) {
        if self.history.can_undo() {
            self.history.undo();
            log::info!("Undo ({}/{})", self.history.cursor() + 1, self.history.len());
        }
    }

    pub fn redo(&mut self) {
        if self.history.can_redo() {
            self.history.redo();
            log::info!("Redo ({}/{})", self.history.cursor() + 1, self.history.len());
        }
    }

    pub fn apply_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::Undo => self.undo(),
            Shortcut::Redo => self.redo(),
            Shortcut::Escape => {
                self.drag_action = None;
                self.editor.escape();
            }
        }
    }

    /// Replace the plan, forgetting all history. Used after an import.
    pub fn load_plan(&mut self, plan: FloorPlan) {
        log::info!("Loaded plan {} ({})", plan.name, plan.id);
        self.history.reset(plan);
        self.editor.escape();
        self.drag_action = None;
        self.viewport = Viewport::default();
    }

    /// Apply `edit` to the current plan. Returns whether history changed.
    fn apply_edit(&mut self, edit: Edit) -> bool {
        let next = edit.command.apply(self.history.current());
        if &next == self.history.current() {
            return false;
        }
        log::debug!("{} ({})", edit.command.name(), if edit.amends_previous { "amend" } else { "new entry" });
        if edit.amends_previous {
            self.history.amend(next);
        } else {
            self.history.set(next);
        }
        true
    }

    /// Route one pointer event from the canvas to the active tool or the view.
    pub fn handle_canvas_event(&mut self, event: CanvasEvent) {
        match event {
            CanvasEvent::Click { pos } => {
                let point = self.viewport.screen_to_plan(pos);
                let target = hit_test(self.history.current(), point);
                let ctx = ToolContext {
                    plan: self.history.current(),
                    config: &self.config,
                    zoom: self.viewport.scale,
                };
                if let Some(edit) = self.editor.active_tool_mut().on_click(point, &target, &ctx) {
                    self.apply_edit(edit);
                }
            }
            CanvasEvent::DragStart { pos } => {
                let point = self.viewport.screen_to_plan(pos);
                let target = hit_test(self.history.current(), point);
                let ctx = ToolContext {
                    plan: self.history.current(),
                    config: &self.config,
                    zoom: self.viewport.scale,
                };
                let action = self.editor.active_tool_mut().on_drag_start(point, &target, &ctx);
                self.drag_action = Some(action);
                self.drag_recorded = false;
            }
            CanvasEvent::Drag { pos, delta } => match self.drag_action {
                Some(DragAction::Edit) => {
                    let point = self.viewport.screen_to_plan(pos);
                    let ctx = ToolContext {
                        plan: self.history.current(),
                        config: &self.config,
                        zoom: self.viewport.scale,
                    };
                    if let Some(mut edit) = self.editor.active_tool_mut().on_drag(point, &ctx) {
                        // Amending before this drag has an entry would rewrite an older edit.
                        edit.amends_previous &= self.drag_recorded;
                        if self.apply_edit(edit) {
                            self.drag_recorded = true;
                        }
                    }
                }
                Some(DragAction::Pan) => self.viewport.pan(delta),
                Some(DragAction::Ignore) | None => {}
            },
            CanvasEvent::DragEnd => {
                if self.drag_action.take().is_some() {
                    self.editor.active_tool_mut().on_drag_end();
                }
            }
            CanvasEvent::Hover { pos } => {
                let point = self.viewport.screen_to_plan(pos);
                self.editor.active_tool_mut().on_hover(point);
            }
            CanvasEvent::Wheel { pos, scroll_y } => self.viewport.wheel(pos, scroll_y, &self.config),
            CanvasEvent::Pinch { center, zoom } => self.viewport.zoom_around(center, zoom, &self.config),
        }
    }

    pub fn render(&self, painter: &egui::Painter, rect: egui::Rect) {
        self.renderer
            .render(painter, rect, self.history.current(), &self.viewport, self.editor.active_tool());
    }

    pub fn set_canvas_size(&mut self, size: Vec2) {
        self.canvas_size = size;
    }

    /// Snapshot of what the canvas currently shows.
    pub fn surface(&self) -> Surface {
        let size = if self.canvas_size.x > 0.0 && self.canvas_size.y > 0.0 {
            self.canvas_size
        } else {
            Vec2::new(800.0, 600.0)
        };
        Surface {
            plan: self.history.current().clone(),
            viewport: self.viewport,
            width: size.x,
            height: size.y,
        }
    }

    pub fn export(&mut self, format: ExportFormat) {
        let message = match self.exporter.save(&self.surface(), format) {
            Ok(path) => format!("Saved {}", path.display()),
            Err(err) => {
                log::error!("{} export failed: {err}", format.extension());
                err.to_string()
            }
        };
        self.notice = Some(message);
    }

    pub fn share(&mut self) {
        if let Err(err) = self.exporter.share(&self.surface()) {
            if !matches!(err, ExportError::ShareUnsupported) {
                log::error!("Share failed: {err}");
            }
            self.notice = Some(err.to_string());
        }
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn import_form_mut(&mut self) -> &mut ImportForm {
        &mut self.import_form
    }

    pub fn import_error(&self) -> Option<&str> {
        self.import_error.as_deref()
    }

    pub fn clear_import_error(&mut self) {
        self.import_error = None;
    }

    pub fn is_importing(&self) -> bool {
        self.import_job.is_some()
    }

    pub fn file_handler_mut(&mut self) -> &mut FileHandler {
        &mut self.file_handler
    }

    /// Validate the form and start importing `image` in the background.
    pub fn start_import(&mut self, image: PickedImage, ctx: &egui::Context) {
        if self.is_importing() {
            log::warn!("Ignoring {}: an import is already running", image.name);
            return;
        }
        if self.import_form.api_key.trim().is_empty() {
            self.import_error = Some(crate::import::ImportError::MissingApiKey.to_string());
            return;
        }
        let real_width = match parse_width(&self.import_form.width) {
            Ok(width) => width,
            Err(err) => {
                self.import_error = Some(err.to_string());
                return;
            }
        };

        let request = ImportRequest {
            image: image.bytes,
            file_name: image.name,
            real_width,
            unit: self.import_form.unit,
            api_key: self.import_form.api_key.trim().to_owned(),
        };
        self.import_error = None;
        self.import_job = Some(ImportJob::spawn(request, self.import_config.clone(), ctx.clone()));
    }

    /// Pick up a finished import, if any.
    pub fn poll_import(&mut self) {
        let Some(result) = self.import_job.as_mut().and_then(ImportJob::poll) else {
            return;
        };
        self.import_job = None;
        match result {
            Ok(plan) => self.load_plan(plan),
            Err(err) => self.import_error = Some(err.to_string()),
        }
    }
}

impl eframe::App for FloorplanApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_import();

        for shortcut in collect_shortcuts(ctx) {
            self.apply_shortcut(shortcut);
        }

        if let Some(image) = self.file_handler.take_dropped_image(ctx) {
            self.start_import(image, ctx);
        }
        if let Some(image) = self.file_handler.take_picked_image() {
            self.start_import(image, ctx);
        }

        panels::toolbar(self, ctx);
        panels::import_panel(self, ctx);
        panels::central_panel(self, ctx);
        panels::notice_modal(self, ctx);

        self.file_handler.preview_files_being_dropped(ctx);
    }
}
