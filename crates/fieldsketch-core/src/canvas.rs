//! Editing context.
//!
//! [`Canvas`] holds one project together with its history, selection, view
//! and tools. Every edit goes through it so that the frame scheduler and the
//! autosave task hear about each mutation. It has no global state; tests build
//! as many as they like.

use crate::frame::FrameScheduler;
use crate::grid::Grid;
use crate::history::{Command, CommandError, History, HistoryConfig};
use crate::input::InputEvent;
use crate::project::{Layer, Project, ProjectError, ProjectRecord, SkippedObject};
use crate::selection::Selection;
use crate::shapes::{Property, PropertyValue, Shape, ShapeError, ShapeId};
use crate::storage::{AutoSave, AutoSaveConfig, Storage, StorageResult};
use crate::surface::{ImageHandle, TextMeasurer};
use crate::tools::{ToolContext, ToolKind, ToolManager, ToolResponse, ToolSettings};
use crate::viewport::Viewport;
use kurbo::{Point, Size};
use thiserror::Error;
use web_time::Instant;

/// Padding around content for [`Canvas::fit_to_content`], in screen pixels.
const FIT_PADDING: f64 = 50.0;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Construction settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    pub size: Size,
    pub device_pixel_ratio: f64,
    pub history: HistoryConfig,
    pub autosave: AutoSaveConfig,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size: Size::new(800.0, 600.0),
            device_pixel_ratio: 1.0,
            history: HistoryConfig::default(),
            autosave: AutoSaveConfig::default(),
        }
    }
}

/// Runtime editing state around one [`Project`].
#[derive(Debug)]
pub struct Canvas {
    project: Project,
    history: History,
    selection: Selection,
    viewport: Viewport,
    grid: Grid,
    tools: ToolManager,
    frame: FrameScheduler,
    autosave: AutoSave,
    /// A frame callback must be registered by the host.
    frame_requested: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Canvas {
    /// Canvas with a fresh untitled project.
    pub fn new(config: CanvasConfig) -> Self {
        Self::with_project(Project::default(), config)
    }

    pub fn with_project(project: Project, config: CanvasConfig) -> Self {
        let grid = Grid::with_size(project.grid_size);
        let mut canvas = Self {
            project,
            history: History::new(config.history),
            selection: Selection::new(),
            viewport: Viewport::new(config.size, config.device_pixel_ratio),
            grid,
            tools: ToolManager::new(),
            frame: FrameScheduler::new(),
            autosave: AutoSave::new(config.autosave),
            frame_requested: false,
        };
        canvas.invalidate();
        canvas
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn tool_settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.tools.settings
    }

    pub fn frame(&self) -> &FrameScheduler {
        &self.frame
    }

    pub fn autosave(&self) -> &AutoSave {
        &self.autosave
    }

    pub fn autosave_mut(&mut self) -> &mut AutoSave {
        &mut self.autosave
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selection.shape(&self.project)
    }

    /// Outline of the tool interaction in progress.
    pub fn tool_preview(&self) -> Option<Shape> {
        self.tools.preview_shape(&self.project)
    }

    // --- Frames ---

    /// Whether the host must register a frame callback. Reset by reading.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    /// Start of the host's frame callback. Returns whether to paint.
    pub fn begin_frame(&mut self) -> bool {
        self.frame.begin_frame()
    }

    /// Request a repaint without marking the project changed.
    pub fn invalidate(&mut self) {
        self.frame_requested |= self.frame.request_frame();
    }

    /// The project changed: refresh the selection, repaint and autosave.
    fn mark_modified(&mut self) {
        self.project.touch();
        self.selection.revalidate(&self.project);
        self.invalidate();
        self.autosave.schedule(Instant::now());
    }

    fn respond(&mut self, response: ToolResponse) {
        if response.modified {
            self.mark_modified();
        } else if response.repaint {
            self.invalidate();
        }
    }

    fn split_tools(&mut self) -> (&mut ToolManager, ToolContext<'_>) {
        let ctx = ToolContext {
            project: &mut self.project,
            history: &mut self.history,
            selection: &mut self.selection,
            zoom: self.viewport.zoom,
        };
        (&mut self.tools, ctx)
    }

    // --- Input ---

    /// Dispatch one input event.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<(), CanvasError> {
        let response = match event {
            InputEvent::Pan { dx, dy } => {
                self.viewport.pan(dx, dy);
                ToolResponse::repaint()
            }
            InputEvent::Zoom { factor, anchor } => {
                self.viewport.zoom_at(factor, anchor);
                ToolResponse::repaint()
            }
            InputEvent::DrawStart(sample) => {
                let point = self.tool_point(sample.point);
                let (tools, mut ctx) = self.split_tools();
                tools.pointer_down(point, &mut ctx)?
            }
            InputEvent::DrawMove(sample) => {
                let point = self.tool_point(sample.point);
                let (tools, mut ctx) = self.split_tools();
                tools.pointer_move(point, &mut ctx)?
            }
            InputEvent::DrawEnd(sample) => {
                let point = self.tool_point(sample.point);
                let (tools, mut ctx) = self.split_tools();
                tools.pointer_up(point, &mut ctx)?
            }
            InputEvent::Commit { close } => {
                let (tools, mut ctx) = self.split_tools();
                tools.finish(close, &mut ctx)?
            }
            InputEvent::Cancel => {
                let (tools, mut ctx) = self.split_tools();
                tools.cancel(&mut ctx)
            }
        };
        self.respond(response);
        Ok(())
    }

    /// Snap through the grid, except for tools that pick existing shapes.
    fn tool_point(&self, point: Point) -> Point {
        if self.tools.current().uses_raw_points() {
            point
        } else {
            self.grid.snap_if_enabled(point)
        }
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        let (tools, mut ctx) = self.split_tools();
        let response = tools.set_tool(tool, &mut ctx);
        self.respond(response);
    }

    // --- Edits ---

    /// Run a command through the history.
    pub fn execute(&mut self, command: Command) -> Result<(), CanvasError> {
        self.history.execute(command, &mut self.project)?;
        self.mark_modified();
        Ok(())
    }

    /// Change a property of the selected shape. Returns `false` with nothing
    /// selected.
    pub fn set_selected_property(
        &mut self,
        property: Property,
        value: PropertyValue,
    ) -> Result<bool, CanvasError> {
        let Some(shape) = self.selection.shape(&self.project) else {
            return Ok(false);
        };
        let command = Command::modify_property(shape, property, value)?;
        self.execute(command)?;
        Ok(true)
    }

    /// Remove the selected shape. Returns `false` with nothing selected.
    pub fn delete_selected(&mut self) -> Result<bool, CanvasError> {
        let Some(target) = self.selection.selected().cloned() else {
            return Ok(false);
        };
        self.selection.deselect();
        self.execute(Command::remove_object(target))?;
        Ok(true)
    }

    /// Undo the last command. In-progress tool interactions are abandoned first.
    pub fn undo(&mut self) -> Result<bool, CanvasError> {
        self.cancel_tool();
        let undone = self.history.undo(&mut self.project)?;
        if undone {
            self.mark_modified();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, CanvasError> {
        self.cancel_tool();
        let redone = self.history.redo(&mut self.project)?;
        if redone {
            self.mark_modified();
        }
        Ok(redone)
    }

    fn cancel_tool(&mut self) {
        let (tools, mut ctx) = self.split_tools();
        let response = tools.cancel(&mut ctx);
        self.respond(response);
    }

    // --- Project lifecycle ---

    pub fn new_project(&mut self, name: impl Into<String>) {
        self.load_project(Project::new(name));
    }

    /// Replace the project. History and selection start empty.
    pub fn load_project(&mut self, project: Project) {
        log::info!("Opening project {} ({})", project.name, project.id);
        self.tools.reset();
        self.history.clear();
        self.selection.deselect();
        self.autosave.cancel();
        self.grid.size = project.grid_size;
        self.project = project;
        self.viewport.reset_view();
        self.invalidate();
    }

    /// Load a persisted record, returning the objects that were skipped.
    pub fn load_record(&mut self, record: ProjectRecord) -> Vec<SkippedObject> {
        let (project, skipped) = Project::from_record(record);
        self.load_project(project);
        skipped
    }

    // --- Layers ---
    //
    // Layer edits are not commands.

    /// Add a layer on top and make it active. Returns its index.
    pub fn add_layer(&mut self, name: impl Into<String>) -> usize {
        self.project.add_layer(name);
        self.mark_modified();
        self.project.active_layer_index()
    }

    /// Remove a layer. The history is cleared since commands may refer to it.
    pub fn remove_layer(&mut self, index: usize) -> Result<Layer, CanvasError> {
        let layer = self.project.remove_layer(index)?;
        log::debug!("Removed layer {}, clearing history", layer.name);
        self.tools.reset();
        self.history.clear();
        self.mark_modified();
        Ok(layer)
    }

    pub fn set_active_layer(&mut self, index: usize) -> Result<(), CanvasError> {
        self.project.set_active_layer(index)?;
        self.mark_modified();
        Ok(())
    }

    pub fn move_layer(&mut self, from: usize, to: usize) -> Result<(), CanvasError> {
        self.project.move_layer(from, to)?;
        self.mark_modified();
        Ok(())
    }

    /// Show or hide a layer. Hiding the selected shape's layer deselects it.
    pub fn set_layer_visible(&mut self, index: usize, visible: bool) -> Result<(), CanvasError> {
        self.layer_at(index)?.visible = visible;
        self.drop_unpickable_selection();
        self.mark_modified();
        Ok(())
    }

    pub fn set_layer_locked(&mut self, index: usize, locked: bool) -> Result<(), CanvasError> {
        self.layer_at(index)?.locked = locked;
        self.drop_unpickable_selection();
        self.mark_modified();
        Ok(())
    }

    fn layer_at(&mut self, index: usize) -> Result<&mut Layer, ProjectError> {
        let count = self.project.layers().len();
        self.project
            .layers_mut()
            .get_mut(index)
            .ok_or(ProjectError::LayerIndex { index, count })
    }

    fn drop_unpickable_selection(&mut self) {
        let pickable = self
            .selection
            .selected()
            .and_then(|target| self.project.layer(&target.layer))
            .is_some_and(Layer::is_pickable);
        if !pickable {
            self.selection.deselect();
        }
    }

    // --- View ---

    pub fn resize(&mut self, size: Size, device_pixel_ratio: f64) {
        self.viewport.resize(size, device_pixel_ratio);
        self.invalidate();
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
        self.invalidate();
    }

    /// Zoom and pan so every visible shape fits. No-op on an empty project.
    pub fn fit_to_content(&mut self) {
        if let Some(bounds) = self.project.bounds() {
            self.viewport.fit_to_bounds(bounds, FIT_PADDING);
            self.invalidate();
        }
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.grid.visible = !self.grid.visible;
        self.invalidate();
        self.grid.visible
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.grid.toggle_snap()
    }

    /// Change the grid spacing; the spacing is saved with the project.
    pub fn set_grid_size(&mut self, size: f64) {
        if !(size.is_finite() && size > 0.0) {
            return;
        }
        self.grid.size = size;
        self.project.grid_size = size;
        self.mark_modified();
    }

    /// Set the measurement scale used by new dimensions.
    pub fn set_scale(&mut self, value: f64, unit: impl Into<String>) {
        if !(value.is_finite() && value > 0.0) {
            return;
        }
        self.project.scale_value = value;
        self.project.scale_unit = unit.into();
        self.mark_modified();
    }

    // --- Host callbacks ---

    /// Refresh cached text extents with real font metrics.
    pub fn measure(&mut self, measurer: &dyn TextMeasurer) {
        for layer in self.project.layers_mut() {
            for shape in &mut layer.shapes {
                shape.measure(measurer);
            }
        }
        self.selection.update_handles(&self.project);
        self.invalidate();
    }

    /// An image finished decoding. Returns `false` if the shape is gone.
    pub fn image_decoded(&mut self, id: &ShapeId, handle: ImageHandle, natural: Size) -> bool {
        let Some(image) = self.project.shape_mut(id).and_then(Shape::as_image_mut) else {
            return false;
        };
        image.mark_decoded(handle, natural);
        self.selection.update_handles(&self.project);
        self.invalidate();
        true
    }

    pub fn image_failed(&mut self, id: &ShapeId) -> bool {
        let Some(image) = self.project.shape_mut(id).and_then(Shape::as_image_mut) else {
            return false;
        };
        log::warn!("Image {id} failed to decode");
        image.mark_failed();
        self.invalidate();
        true
    }

    // --- Persistence ---

    /// Run the pending autosave if it is due. Returns whether a save ran.
    pub async fn autosave_if_due<S: Storage + ?Sized>(&mut self, storage: &S) -> StorageResult<bool> {
        self.autosave.run_due(Instant::now(), storage, &self.project).await
    }

    /// Save immediately, superseding any pending autosave.
    pub async fn save<S: Storage + ?Sized>(&mut self, storage: &S) -> StorageResult<()> {
        self.autosave.cancel();
        self.autosave.save(storage, &self.project).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Image, Rectangle};
    use crate::storage::MemoryStorage;
    use kurbo::Rect;
    use pollster::block_on;
    use web_time::Duration;

    fn drag(canvas: &mut Canvas, from: (f64, f64), to: (f64, f64)) {
        canvas.handle_event(InputEvent::draw_start(from.into())).unwrap();
        canvas.handle_event(InputEvent::draw_move(to.into())).unwrap();
        canvas.handle_event(InputEvent::draw_end(to.into())).unwrap();
    }

    fn click(canvas: &mut Canvas, at: (f64, f64)) {
        drag(canvas, at, at);
    }

    fn draw_rect(canvas: &mut Canvas) -> ShapeId {
        canvas.set_tool(ToolKind::Rect);
        drag(canvas, (0.0, 0.0), (50.0, 50.0));
        canvas.project().active_layer().shapes.last().unwrap().id().clone()
    }

    #[test]
    fn test_new_canvas_requests_first_frame() {
        let mut canvas = Canvas::default();
        assert!(canvas.take_frame_request());
        assert!(!canvas.take_frame_request());
        assert!(canvas.begin_frame());
        assert_eq!(canvas.project().layers().len(), 2);
        assert_eq!(canvas.project().active_layer().name, "Drawing");
    }

    #[test]
    fn test_drawing_marks_dirty_and_schedules_autosave() {
        let mut canvas = Canvas::default();
        canvas.take_frame_request();
        canvas.begin_frame();
        assert!(canvas.autosave().pending().is_none());

        draw_rect(&mut canvas);
        assert_eq!(canvas.project().shape_count(), 1);
        assert!(canvas.history().can_undo());
        assert!(canvas.autosave().pending().is_some());
        assert!(canvas.take_frame_request());
        assert!(canvas.begin_frame());
    }

    #[test]
    fn test_pan_and_zoom_repaint_without_autosave() {
        let mut canvas = Canvas::default();
        canvas.take_frame_request();
        canvas.begin_frame();

        canvas.handle_event(InputEvent::Pan { dx: 10.0, dy: 5.0 }).unwrap();
        canvas
            .handle_event(InputEvent::Zoom {
                factor: 2.0,
                anchor: Point::new(100.0, 100.0),
            })
            .unwrap();
        assert!(canvas.take_frame_request());
        assert!(canvas.autosave().pending().is_none());
        assert!((canvas.viewport().zoom - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapping_applies_to_drawing_tools() {
        let mut canvas = Canvas::default();
        canvas.toggle_snap();
        canvas.set_tool(ToolKind::Rect);
        drag(&mut canvas, (3.0, 4.0), (58.0, 41.0));

        match &canvas.project().active_layer().shapes[0] {
            Shape::Rectangle(rect) => {
                assert!(rect.x.abs() < 1e-9);
                assert!(rect.y.abs() < 1e-9);
                assert!((rect.w - 60.0).abs() < 1e-9);
                assert!((rect.h - 40.0).abs() < 1e-9);
            }
            other => panic!("expected rect, got {other:?}"),
        }
    }

    #[test]
    fn test_select_uses_raw_points() {
        let mut canvas = Canvas::default();
        let id = draw_rect(&mut canvas);
        canvas.toggle_snap();
        canvas.set_tool(ToolKind::Select);
        // Snapped, (49, 25) would land inside the unfilled rect at (40, 20).
        click(&mut canvas, (49.0, 25.0));
        assert!(canvas.selection().is_selected(&id));
    }

    #[test]
    fn test_undo_revalidates_selection() {
        let mut canvas = Canvas::default();
        let id = draw_rect(&mut canvas);
        canvas.set_tool(ToolKind::Select);
        click(&mut canvas, (0.0, 25.0));
        assert!(canvas.selection().is_selected(&id));

        assert!(canvas.undo().unwrap());
        assert!(canvas.selection().is_empty());
        assert!(canvas.project().shape(&id).is_none());

        assert!(canvas.redo().unwrap());
        assert!(canvas.project().shape(&id).is_some());
        assert!(!canvas.redo().unwrap());
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut canvas = Canvas::default();
        assert!(!canvas.undo().unwrap());
        assert!(!canvas.redo().unwrap());
        assert!(canvas.autosave().pending().is_none());
    }

    #[test]
    fn test_delete_selected_and_undo() {
        let mut canvas = Canvas::default();
        let id = draw_rect(&mut canvas);
        assert!(!canvas.delete_selected().unwrap());

        canvas.set_tool(ToolKind::Select);
        click(&mut canvas, (50.0, 25.0));
        assert!(canvas.delete_selected().unwrap());
        assert!(canvas.project().shape(&id).is_none());
        assert!(canvas.selection().is_empty());

        canvas.undo().unwrap();
        assert_eq!(canvas.project().locate(&id).map(|(_, i)| i), Some(0));
    }

    #[test]
    fn test_set_selected_property() {
        let mut canvas = Canvas::default();
        draw_rect(&mut canvas);
        assert!(!canvas.set_selected_property(Property::StrokeWidth, 4.0.into()).unwrap());

        canvas.set_tool(ToolKind::Select);
        click(&mut canvas, (0.0, 25.0));
        assert!(canvas.set_selected_property(Property::StrokeWidth, 4.0.into()).unwrap());
        assert!((canvas.selected_shape().unwrap().style().stroke_width - 4.0).abs() < 1e-9);

        canvas.undo().unwrap();
        assert!((canvas.selected_shape().unwrap().style().stroke_width - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_project_clears_history_and_selection() {
        let mut canvas = Canvas::default();
        draw_rect(&mut canvas);
        canvas.set_tool(ToolKind::Select);
        click(&mut canvas, (0.0, 25.0));

        let mut other = Project::new("Other");
        other.grid_size = 25.0;
        canvas.load_project(other);
        assert!(!canvas.history().can_undo());
        assert!(canvas.selection().is_empty());
        assert!(canvas.autosave().pending().is_none());
        assert_eq!(canvas.project().name, "Other");
        assert!((canvas.grid().size - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_record_reports_skipped() {
        let mut canvas = Canvas::default();
        let mut record = Project::new("Site").to_record();
        record.layers[1].objects.push(serde_json::json!({ "type": "hologram" }));
        record.layers[1]
            .objects
            .push(Shape::Rectangle(Rectangle::new(Point::ZERO, 5.0, 5.0)).to_record());

        let skipped = canvas.load_record(record);
        assert_eq!(skipped.len(), 1);
        assert_eq!(canvas.project().shape_count(), 1);
    }

    #[test]
    fn test_layer_edits() {
        let mut canvas = Canvas::default();
        assert_eq!(canvas.add_layer("Notes"), 2);
        canvas.set_active_layer(0).unwrap();
        assert_eq!(canvas.project().active_layer().name, "Background");

        canvas.remove_layer(2).unwrap();
        canvas.remove_layer(1).unwrap();
        assert!(matches!(
            canvas.remove_layer(0),
            Err(CanvasError::Project(ProjectError::LastLayer))
        ));
        assert!(canvas.set_layer_visible(3, false).is_err());
    }

    #[test]
    fn test_hiding_layer_drops_selection() {
        let mut canvas = Canvas::default();
        draw_rect(&mut canvas);
        canvas.set_tool(ToolKind::Select);
        click(&mut canvas, (0.0, 25.0));
        let index = canvas.project().active_layer_index();

        canvas.set_layer_visible(index, false).unwrap();
        assert!(canvas.selection().is_empty());
    }

    #[test]
    fn test_cancel_event_abandons_polyline() {
        let mut canvas = Canvas::default();
        canvas.set_tool(ToolKind::Polyline);
        click(&mut canvas, (0.0, 0.0));
        click(&mut canvas, (30.0, 0.0));
        assert!(canvas.tool_preview().is_some());

        canvas.handle_event(InputEvent::Cancel).unwrap();
        assert!(canvas.tool_preview().is_none());

        click(&mut canvas, (0.0, 0.0));
        click(&mut canvas, (30.0, 0.0));
        canvas.handle_event(InputEvent::Commit { close: false }).unwrap();
        assert_eq!(canvas.project().shape_count(), 1);
    }

    #[test]
    fn test_image_decoded_adopts_natural_size() {
        let mut canvas = Canvas::default();
        let image = Shape::Image(Image::new(Rect::new(10.0, 10.0, 10.0, 10.0), "data:image/png;base64,"));
        let id = image.id().clone();
        let layer = canvas.project().active_layer().id.clone();
        canvas.execute(Command::add_object(layer, image)).unwrap();

        assert!(canvas.image_decoded(&id, ImageHandle(7), Size::new(64.0, 32.0)));
        let bounds = canvas.project().shape(&id).unwrap().bounds().unwrap();
        assert!((bounds.width() - 64.0).abs() < 1e-9);
        assert!(!canvas.image_decoded(&ShapeId::new(), ImageHandle(8), Size::new(1.0, 1.0)));
    }

    #[test]
    fn test_autosave_runs_when_due() {
        let _ = env_logger::builder().is_test(true).try_init();
        let storage = MemoryStorage::new();
        let mut canvas = Canvas::new(CanvasConfig {
            autosave: AutoSaveConfig {
                delay: Duration::ZERO,
                enabled: true,
            },
            ..CanvasConfig::default()
        });
        assert!(!block_on(canvas.autosave_if_due(&storage)).unwrap());

        draw_rect(&mut canvas);
        assert!(block_on(canvas.autosave_if_due(&storage)).unwrap());
        let saved = block_on(storage.load(&canvas.project().id)).unwrap().unwrap();
        assert_eq!(saved.layers[1].objects.len(), 1);
    }

    #[test]
    fn test_explicit_save_cancels_pending() {
        let storage = MemoryStorage::new();
        let mut canvas = Canvas::default();
        draw_rect(&mut canvas);
        assert!(canvas.autosave().pending().is_some());

        block_on(canvas.save(&storage)).unwrap();
        assert!(canvas.autosave().pending().is_none());
        assert_eq!(block_on(storage.list()).unwrap().len(), 1);
    }

    #[test]
    fn test_canvases_are_independent() {
        let mut a = Canvas::default();
        let b = Canvas::default();
        draw_rect(&mut a);
        assert_eq!(a.project().shape_count(), 1);
        assert_eq!(b.project().shape_count(), 0);
        assert_ne!(a.project().id, b.project().id);
    }
}
