//! Selection, picking and resize handles.

use crate::project::{LayerId, Project};
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect, Vec2};

/// Handle square size in screen pixels.
pub const HANDLE_SIZE: f64 = 8.0;
/// Handle hit radius in screen pixels.
pub const HANDLE_HIT_RADIUS: f64 = 12.0;

/// Bounding-box handle positions, clockwise from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl HandleKind {
    pub const ALL: [HandleKind; 8] = [
        HandleKind::NorthWest,
        HandleKind::North,
        HandleKind::NorthEast,
        HandleKind::East,
        HandleKind::SouthEast,
        HandleKind::South,
        HandleKind::SouthWest,
        HandleKind::West,
    ];

    pub fn is_north(self) -> bool {
        matches!(self, HandleKind::NorthWest | HandleKind::North | HandleKind::NorthEast)
    }

    pub fn is_south(self) -> bool {
        matches!(self, HandleKind::SouthWest | HandleKind::South | HandleKind::SouthEast)
    }

    pub fn is_east(self) -> bool {
        matches!(self, HandleKind::NorthEast | HandleKind::East | HandleKind::SouthEast)
    }

    pub fn is_west(self) -> bool {
        matches!(self, HandleKind::NorthWest | HandleKind::West | HandleKind::SouthWest)
    }

    pub fn is_corner(self) -> bool {
        (self.is_north() || self.is_south()) && (self.is_east() || self.is_west())
    }

    /// CSS cursor name for hover feedback.
    pub fn cursor(self) -> &'static str {
        match self {
            HandleKind::NorthWest => "nw-resize",
            HandleKind::North => "n-resize",
            HandleKind::NorthEast => "ne-resize",
            HandleKind::East => "e-resize",
            HandleKind::SouthEast => "se-resize",
            HandleKind::South => "s-resize",
            HandleKind::SouthWest => "sw-resize",
            HandleKind::West => "w-resize",
        }
    }

    fn anchor(self, bounds: Rect) -> Point {
        let cx = (bounds.x0 + bounds.x1) / 2.0;
        let cy = (bounds.y0 + bounds.y1) / 2.0;
        match self {
            HandleKind::NorthWest => Point::new(bounds.x0, bounds.y0),
            HandleKind::North => Point::new(cx, bounds.y0),
            HandleKind::NorthEast => Point::new(bounds.x1, bounds.y0),
            HandleKind::East => Point::new(bounds.x1, cy),
            HandleKind::SouthEast => Point::new(bounds.x1, bounds.y1),
            HandleKind::South => Point::new(cx, bounds.y1),
            HandleKind::SouthWest => Point::new(bounds.x0, bounds.y1),
            HandleKind::West => Point::new(bounds.x0, cy),
        }
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in world coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        (point - self.position).hypot2() <= radius * radius
    }
}

/// The eight handles around `bounds`.
pub fn handles_for_bounds(bounds: Rect) -> Vec<Handle> {
    HandleKind::ALL
        .into_iter()
        .map(|kind| Handle {
            position: kind.anchor(bounds),
            kind,
        })
        .collect()
}

/// A shape and the layer that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub layer: LayerId,
    pub shape: ShapeId,
}

/// Topmost pickable shape under `point`.
///
/// Layers are searched top to bottom and shapes last to first, so what is
/// painted on top wins. Hidden or locked layers and locked shapes are skipped.
pub fn pick_object(project: &Project, point: Point) -> Option<ObjectRef> {
    project
        .layers()
        .iter()
        .rev()
        .filter(|layer| layer.is_pickable())
        .find_map(|layer| {
            layer
                .shapes
                .iter()
                .rev()
                .find(|shape| !shape.is_locked() && shape.hit_test(point))
                .map(|shape| ObjectRef {
                    layer: layer.id.clone(),
                    shape: shape.id().clone(),
                })
        })
}

/// Drag `handle` to `point`.
///
/// Only rectangles, ellipses, lines and arrows resize; other shapes are left
/// unchanged and `false` is returned.
pub fn resize_shape(shape: &mut Shape, handle: HandleKind, point: Point) -> bool {
    match shape {
        Shape::Rectangle(rect) => {
            let right = rect.x + rect.w;
            let bottom = rect.y + rect.h;
            if handle.is_west() {
                rect.x = point.x;
                rect.w = right - point.x;
            } else if handle.is_east() {
                rect.w = point.x - rect.x;
            }
            if handle.is_north() {
                rect.y = point.y;
                rect.h = bottom - point.y;
            } else if handle.is_south() {
                rect.h = point.y - rect.y;
            }
            true
        }
        Shape::Ellipse(ellipse) => {
            let dx = (point.x - ellipse.cx).abs();
            let dy = (point.y - ellipse.cy).abs();
            if handle.is_corner() {
                ellipse.rx = dx;
                ellipse.ry = dy;
            } else if handle.is_east() || handle.is_west() {
                ellipse.rx = dx;
            } else {
                ellipse.ry = dy;
            }
            true
        }
        Shape::Line(line) => {
            if handle.is_west() {
                line.set_start(point);
            } else {
                line.set_end(point);
            }
            true
        }
        Shape::Arrow(arrow) => {
            if handle.is_west() {
                arrow.set_start(point);
            } else {
                arrow.set_end(point);
            }
            true
        }
        _ => false,
    }
}

/// In-progress pointer drag on the selection.
#[derive(Debug, Clone)]
pub enum DragState {
    /// Moving the whole shape. The shape is translated live; `origin` is
    /// where the drag began and `last` the previous pointer position.
    Move { origin: Point, last: Point },
    /// Resizing through a handle, with the shape as it was before the drag.
    Resize { handle: HandleKind, before: Shape },
}

impl DragState {
    /// Total displacement of a move drag.
    pub fn total_delta(&self) -> Option<Vec2> {
        match self {
            DragState::Move { origin, last } => Some(*last - *origin),
            DragState::Resize { .. } => None,
        }
    }
}

/// At most one selected shape, referenced by id, plus its handles.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: Option<ObjectRef>,
    handles: Vec<Handle>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&ObjectRef> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &ShapeId) -> bool {
        self.selected.as_ref().is_some_and(|r| &r.shape == id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    pub fn select(&mut self, target: ObjectRef, project: &Project) {
        self.selected = Some(target);
        self.update_handles(project);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.handles.clear();
    }

    /// The selected shape, if it still exists.
    pub fn shape<'a>(&self, project: &'a Project) -> Option<&'a Shape> {
        let target = self.selected.as_ref()?;
        project.layer(&target.layer)?.shape(&target.shape)
    }

    /// Recompute handles from the selected shape's bounds.
    pub fn update_handles(&mut self, project: &Project) {
        self.handles = self
            .shape(project)
            .and_then(Shape::bounds)
            .map(handles_for_bounds)
            .unwrap_or_default();
    }

    /// Drop the selection if its shape is gone, otherwise refresh handles.
    /// Returns whether something is still selected.
    pub fn revalidate(&mut self, project: &Project) -> bool {
        if self.selected.is_some() && self.shape(project).is_none() {
            self.deselect();
            return false;
        }
        self.update_handles(project);
        self.selected.is_some()
    }

    /// Handle under `point`, using a screen-constant radius at `zoom`.
    pub fn pick_handle(&self, point: Point, zoom: f64) -> Option<Handle> {
        let radius = HANDLE_HIT_RADIUS / zoom;
        self.handles
            .iter()
            .find(|handle| handle.hit_test(point, radius))
            .copied()
    }
}
