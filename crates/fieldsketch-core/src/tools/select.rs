//! Select tool: pick, move and handle-resize.
//!
//! Drags mutate the shape directly so the canvas shows the result live. On
//! release the live change is taken back and replayed through the history as
//! one command, so undo sees exactly one step per drag.

use super::{ToolContext, ToolManager, ToolResponse, ToolState};
use crate::history::{Command, CommandError};
use crate::selection::{DragState, pick_object, resize_shape};
use crate::shapes::ShapeId;
use kurbo::{Point, Vec2};

/// Drags shorter than this on both axes are not recorded.
const MOVE_THRESHOLD: f64 = 0.5;

impl ToolManager {
    pub(super) fn select_down(&mut self, point: Point, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let grabbed = ctx
            .selection
            .pick_handle(point, ctx.zoom)
            .zip(ctx.selection.shape(ctx.project));
        if let Some((handle, shape)) = grabbed {
            self.state = ToolState::Selecting(DragState::Resize {
                handle: handle.kind,
                before: shape.clone(),
            });
            return ToolResponse::repaint();
        }

        match pick_object(ctx.project, point) {
            Some(target) => {
                ctx.selection.select(target, ctx.project);
                self.state = ToolState::Selecting(DragState::Move {
                    origin: point,
                    last: point,
                });
                ToolResponse::repaint()
            }
            None => {
                let had_selection = !ctx.selection.is_empty();
                ctx.selection.deselect();
                self.state = ToolState::Idle;
                ToolResponse {
                    repaint: had_selection,
                    modified: false,
                }
            }
        }
    }

    pub(super) fn select_move(&mut self, point: Point, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let Some(id) = selected_id(ctx) else {
            return ToolResponse::NONE;
        };
        let Some(shape) = ctx.project.shape_mut(&id) else {
            return ToolResponse::NONE;
        };
        match &mut self.state {
            ToolState::Selecting(DragState::Move { last, .. }) => {
                shape.translate(point - *last);
                *last = point;
            }
            ToolState::Selecting(DragState::Resize { handle, .. }) => {
                if !resize_shape(shape, *handle, point) {
                    return ToolResponse::NONE;
                }
            }
            _ => return ToolResponse::NONE,
        }
        ctx.selection.update_handles(ctx.project);
        ToolResponse::repaint()
    }

    pub(super) fn select_up(
        &mut self,
        point: Point,
        ctx: &mut ToolContext<'_>,
    ) -> Result<ToolResponse, CommandError> {
        let settled = self.select_move(point, ctx);
        let ToolState::Selecting(drag) = std::mem::take(&mut self.state) else {
            return Ok(settled);
        };
        let Some(id) = selected_id(ctx) else {
            return Ok(settled);
        };

        let command = match drag {
            DragState::Move { origin, last } => {
                let total = last - origin;
                if total == Vec2::ZERO {
                    return Ok(settled);
                }
                // The command re-applies the translation.
                if let Some(shape) = ctx.project.shape_mut(&id) {
                    shape.translate(-total);
                }
                if total.x.abs() <= MOVE_THRESHOLD && total.y.abs() <= MOVE_THRESHOLD {
                    ctx.selection.update_handles(ctx.project);
                    return Ok(ToolResponse::repaint());
                }
                Command::move_object(id, total)
            }
            DragState::Resize { before, .. } => {
                let Some(after) = ctx.project.shape(&id).cloned() else {
                    return Ok(settled);
                };
                if after == before {
                    return Ok(settled);
                }
                Command::reshape(before, after)
            }
        };

        ctx.history.execute(command, ctx.project)?;
        ctx.selection.update_handles(ctx.project);
        Ok(ToolResponse::modified())
    }

    /// Undo a live drag without recording anything.
    pub(super) fn select_cancel(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let ToolState::Selecting(drag) = std::mem::take(&mut self.state) else {
            return ToolResponse::NONE;
        };
        let Some(shape) = selected_id(ctx).and_then(|id| ctx.project.shape_mut(&id)) else {
            return ToolResponse::NONE;
        };
        match drag {
            DragState::Move { origin, last } => shape.translate(origin - last),
            DragState::Resize { before, .. } => *shape = before,
        }
        ctx.selection.update_handles(ctx.project);
        ToolResponse::repaint()
    }
}

fn selected_id(ctx: &ToolContext<'_>) -> Option<ShapeId> {
    ctx.selection.selected().map(|target| target.shape.clone())
}

#[cfg(test)]
mod tests {
    use crate::history::{History, HistoryConfig};
    use crate::project::Project;
    use crate::selection::Selection;
    use crate::shapes::{Arc, Rectangle, Shape};
    use crate::tools::{ToolContext, ToolKind, ToolManager};
    use kurbo::Point;

    struct Scene {
        project: Project,
        history: History,
        selection: Selection,
        tools: ToolManager,
    }

    impl Scene {
        fn with(shape: Shape) -> Self {
            let mut project = Project::new("select");
            project.active_layer_mut().shapes.push(shape);
            Self {
                project,
                history: History::new(HistoryConfig::default()),
                selection: Selection::new(),
                tools: ToolManager::new(),
            }
        }

        fn step(&mut self, phase: u8, x: f64, y: f64) {
            let mut ctx = ToolContext {
                project: &mut self.project,
                history: &mut self.history,
                selection: &mut self.selection,
                zoom: 1.0,
            };
            let point = Point::new(x, y);
            let result = match phase {
                0 => self.tools.pointer_down(point, &mut ctx),
                1 => self.tools.pointer_move(point, &mut ctx),
                _ => self.tools.pointer_up(point, &mut ctx),
            };
            result.unwrap();
        }

        fn cancel(&mut self) {
            let mut ctx = ToolContext {
                project: &mut self.project,
                history: &mut self.history,
                selection: &mut self.selection,
                zoom: 1.0,
            };
            self.tools.cancel(&mut ctx);
        }

        fn rect(&self) -> &Rectangle {
            match &self.project.active_layer().shapes[0] {
                Shape::Rectangle(rect) => rect,
                other => panic!("expected rect, got {other:?}"),
            }
        }
    }

    fn filled_rect() -> Shape {
        let mut rect = Rectangle::new(Point::ZERO, 50.0, 50.0);
        rect.style.fill_color = Some(crate::shapes::SerializableColor::white());
        Shape::Rectangle(rect)
    }

    #[test]
    fn test_drag_records_one_move() {
        let mut scene = Scene::with(filled_rect());
        assert_eq!(scene.tools.current(), ToolKind::Select);
        scene.step(0, 10.0, 10.0);
        scene.step(1, 20.0, 15.0);
        assert!((scene.rect().x - 10.0).abs() < 1e-9);
        scene.step(1, 25.0, 20.0);
        scene.step(2, 30.0, 30.0);

        assert!((scene.rect().x - 20.0).abs() < 1e-9);
        assert!((scene.rect().y - 20.0).abs() < 1e-9);
        assert_eq!(scene.history.undo_len(), 1);
        assert_eq!(scene.history.undo_name(), Some("Move"));

        scene.history.undo(&mut scene.project).unwrap();
        assert!(scene.rect().x.abs() < 1e-9);
        assert!(scene.rect().y.abs() < 1e-9);
    }

    #[test]
    fn test_tiny_drag_is_not_recorded() {
        let mut scene = Scene::with(filled_rect());
        scene.step(0, 10.0, 10.0);
        scene.step(2, 10.3, 10.4);
        assert!(scene.rect().x.abs() < 1e-9);
        assert!(!scene.history.can_undo());
        assert!(!scene.selection.is_empty());
    }

    #[test]
    fn test_click_empty_space_deselects() {
        let mut scene = Scene::with(filled_rect());
        scene.step(0, 10.0, 10.0);
        scene.step(2, 10.0, 10.0);
        assert!(!scene.selection.is_empty());

        scene.step(0, 500.0, 500.0);
        scene.step(2, 500.0, 500.0);
        assert!(scene.selection.is_empty());
    }

    #[test]
    fn test_handle_resize_records_reshape() {
        let mut scene = Scene::with(filled_rect());
        scene.step(0, 10.0, 10.0);
        scene.step(2, 10.0, 10.0);

        scene.step(0, 51.0, 51.0);
        scene.step(1, 70.0, 60.0);
        scene.step(2, 80.0, 70.0);

        assert!((scene.rect().w - 80.0).abs() < 1e-9);
        assert!((scene.rect().h - 70.0).abs() < 1e-9);
        assert_eq!(scene.history.undo_name(), Some("Resize"));
        let handles = scene.selection.handles();
        assert!(handles.iter().any(|h| (h.position.x - 80.0).abs() < 1e-9));

        scene.history.undo(&mut scene.project).unwrap();
        assert!((scene.rect().w - 50.0).abs() < 1e-9);
        scene.history.redo(&mut scene.project).unwrap();
        assert!((scene.rect().w - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_unsupported_shape_is_noop() {
        let arc = Arc::new(Point::ZERO, 20.0, 0.0, std::f64::consts::PI);
        let mut scene = Scene::with(Shape::Arc(arc));
        scene.step(0, 20.0, 0.0);
        scene.step(2, 20.0, 0.0);
        assert!(!scene.selection.handles().is_empty());

        let before = scene.project.active_layer().shapes[0].clone();
        let corner = scene.selection.handles()[0].position;
        scene.step(0, corner.x, corner.y);
        scene.step(1, corner.x - 30.0, corner.y - 30.0);
        scene.step(2, corner.x - 30.0, corner.y - 30.0);
        assert_eq!(scene.project.active_layer().shapes[0], before);
        assert!(!scene.history.can_undo());
    }

    #[test]
    fn test_cancel_reverts_live_move() {
        let mut scene = Scene::with(filled_rect());
        scene.step(0, 10.0, 10.0);
        scene.step(1, 40.0, 40.0);
        assert!((scene.rect().x - 30.0).abs() < 1e-9);
        scene.cancel();
        assert!(scene.rect().x.abs() < 1e-9);
        assert!(!scene.history.can_undo());
    }
}
