//! Drawing tools.
//!
//! A [`ToolManager`] owns the active tool and its in-progress interaction.
//! Tools build shapes from pointer input and submit them to the history as
//! commands; the select tool is the one exception, translating the selected
//! shape live while dragging and recording a single command on release.

mod select;

use crate::geometry::{angle, distance};
use crate::history::{Command, CommandError, History};
use crate::project::Project;
use crate::selection::{DragState, Selection, pick_object};
use crate::shapes::{
    Arc, Arrow, Callout, Dimension, Ellipse, Freehand, Line, Polyline, Rectangle, Shape,
    ShapeStyle, Symbol, TextLabel,
};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Smallest extent a dragged shape may have.
const MIN_EXTENT: f64 = 2.0;
const MIN_ARROW_LENGTH: f64 = 3.0;
/// Clicking this close to the first polyline point closes it.
const CLOSE_DISTANCE: f64 = 10.0;
/// Clicking this close to the last polyline point finishes it.
const FINISH_DISTANCE: f64 = 3.0;
const DIMENSION_OFFSET: f64 = 25.0;
const SYMBOL_SIZE: f64 = 30.0;
const MIN_TEXT_SIZE: f64 = 14.0;
/// Initial callout box position relative to the leader point.
const CALLOUT_BOX_OFFSET: Vec2 = Vec2::new(60.0, -40.0);

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Line,
    Rect,
    Circle,
    Arc,
    Polyline,
    Freehand,
    Eraser,
    Dimension,
    Text,
    Callout,
    Arrow,
    Symbol,
}

impl ToolKind {
    pub const ALL: [ToolKind; 13] = [
        ToolKind::Select,
        ToolKind::Line,
        ToolKind::Rect,
        ToolKind::Circle,
        ToolKind::Arc,
        ToolKind::Polyline,
        ToolKind::Freehand,
        ToolKind::Eraser,
        ToolKind::Dimension,
        ToolKind::Text,
        ToolKind::Callout,
        ToolKind::Arrow,
        ToolKind::Symbol,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Line => "line",
            ToolKind::Rect => "rect",
            ToolKind::Circle => "circle",
            ToolKind::Arc => "arc",
            ToolKind::Polyline => "polyline",
            ToolKind::Freehand => "freehand",
            ToolKind::Eraser => "eraser",
            ToolKind::Dimension => "dimension",
            ToolKind::Text => "text",
            ToolKind::Callout => "callout",
            ToolKind::Arrow => "arrow",
            ToolKind::Symbol => "symbol",
        }
    }

    /// Tools that pick existing shapes work on unsnapped points.
    pub fn uses_raw_points(self) -> bool {
        matches!(self, ToolKind::Select | ToolKind::Eraser)
    }
}

/// Settings applied to newly created shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub style: ShapeStyle,
    /// Catalog key stamped by the symbol tool.
    pub symbol_type: String,
    /// Content of new text labels. Empty disables placement.
    pub text: String,
    /// Content of new callouts. Empty disables placement.
    pub callout_text: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            style: ShapeStyle::default(),
            symbol_type: "defect".to_string(),
            text: "Text".to_string(),
            callout_text: "Note".to_string(),
        }
    }
}

/// In-progress tool interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    #[default]
    Idle,
    /// Press, drag, release: line, rect, circle and arrow.
    Dragging { start: Point, current: Point },
    /// Freehand points collected so far.
    Stroke { points: Vec<Point> },
    Polyline { points: Vec<Point>, cursor: Point },
    /// Arc center placed, waiting for the radius click.
    ArcRadius { center: Point, cursor: Point },
    /// Radius and start angle set, waiting for the end click.
    ArcSweep {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    /// First dimension point placed.
    Measuring { start: Point, current: Point },
    /// Callout leader placed, box follows the pointer.
    CalloutBox { leader: Point, box_origin: Point },
    Selecting(DragState),
    Erasing,
}

/// What a tool needs from the canvas for one event.
pub struct ToolContext<'a> {
    pub project: &'a mut Project,
    pub history: &'a mut History,
    pub selection: &'a mut Selection,
    /// Current zoom, for screen-constant handle hit radius.
    pub zoom: f64,
}

/// Effect of one tool event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolResponse {
    /// Something visible changed.
    pub repaint: bool,
    /// The project changed through the history.
    pub modified: bool,
}

impl ToolResponse {
    pub const NONE: ToolResponse = ToolResponse {
        repaint: false,
        modified: false,
    };

    pub fn repaint() -> Self {
        Self {
            repaint: true,
            modified: false,
        }
    }

    pub fn modified() -> Self {
        Self {
            repaint: true,
            modified: true,
        }
    }
}

/// Manages the current tool and its state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    current: ToolKind,
    state: ToolState,
    /// Last pointer position, for hover previews.
    hover: Option<Point>,
    pub settings: ToolSettings,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ToolKind {
        self.current
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    /// Switch tools, abandoning any interaction in progress.
    pub fn set_tool(&mut self, tool: ToolKind, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let mut response = self.cancel(ctx);
        if tool != self.current {
            log::debug!("Tool {} -> {}", self.current.name(), tool.name());
            self.current = tool;
            self.hover = None;
            response.repaint = true;
        }
        response
    }

    pub fn pointer_down(
        &mut self,
        point: Point,
        ctx: &mut ToolContext<'_>,
    ) -> Result<ToolResponse, CommandError> {
        self.hover = Some(point);
        match self.current {
            ToolKind::Select => Ok(self.select_down(point, ctx)),
            ToolKind::Eraser => {
                self.state = ToolState::Erasing;
                self.erase_at(point, ctx)
            }
            ToolKind::Line | ToolKind::Rect | ToolKind::Circle | ToolKind::Arrow => {
                self.state = ToolState::Dragging {
                    start: point,
                    current: point,
                };
                Ok(ToolResponse::repaint())
            }
            ToolKind::Freehand => {
                self.state = ToolState::Stroke {
                    points: vec![point],
                };
                Ok(ToolResponse::repaint())
            }
            ToolKind::Polyline => self.polyline_click(point, ctx),
            ToolKind::Arc => self.arc_click(point, ctx),
            ToolKind::Dimension => self.dimension_click(point, ctx),
            ToolKind::Callout => self.callout_click(point, ctx),
            ToolKind::Text => self.place_text(point, ctx),
            ToolKind::Symbol => {
                let symbol = self.symbol_at(point);
                self.commit(symbol, ctx)
            }
        }
    }

    pub fn pointer_move(
        &mut self,
        point: Point,
        ctx: &mut ToolContext<'_>,
    ) -> Result<ToolResponse, CommandError> {
        self.hover = Some(point);
        match &mut self.state {
            ToolState::Idle => {
                return Ok(ToolResponse {
                    repaint: self.current == ToolKind::Symbol,
                    modified: false,
                });
            }
            ToolState::Selecting(_) => return Ok(self.select_move(point, ctx)),
            ToolState::Erasing => return self.erase_at(point, ctx),
            ToolState::Dragging { current, .. } | ToolState::Measuring { current, .. } => {
                *current = point;
            }
            ToolState::Stroke { points } => points.push(point),
            ToolState::Polyline { cursor, .. } | ToolState::ArcRadius { cursor, .. } => {
                *cursor = point;
            }
            ToolState::ArcSweep {
                center, end_angle, ..
            } => *end_angle = angle(*center, point),
            ToolState::CalloutBox { box_origin, .. } => *box_origin = point,
        }
        Ok(ToolResponse::repaint())
    }

    pub fn pointer_up(
        &mut self,
        point: Point,
        ctx: &mut ToolContext<'_>,
    ) -> Result<ToolResponse, CommandError> {
        match std::mem::take(&mut self.state) {
            ToolState::Dragging { start, .. } => {
                if !self.meets_minimum(start, point) {
                    log::debug!("Discarding undersized {}", self.current.name());
                    return Ok(ToolResponse::repaint());
                }
                match self.drag_shape(start, point) {
                    Some(shape) => self.commit(shape, ctx),
                    None => Ok(ToolResponse::repaint()),
                }
            }
            ToolState::Stroke { points } => {
                if points.len() < 2 {
                    return Ok(ToolResponse::repaint());
                }
                let mut freehand = Freehand::new(points);
                freehand.simplify(Freehand::SIMPLIFY_TOLERANCE);
                let shape = self.styled(Shape::Freehand(freehand));
                self.commit(shape, ctx)
            }
            ToolState::Selecting(drag) => {
                self.state = ToolState::Selecting(drag);
                self.select_up(point, ctx)
            }
            ToolState::Erasing => Ok(ToolResponse::NONE),
            // Click-driven tools advance on press only.
            other => {
                self.state = other;
                Ok(ToolResponse::NONE)
            }
        }
    }

    /// Finish a polyline, optionally closing it into a polygon.
    pub fn finish(
        &mut self,
        close: bool,
        ctx: &mut ToolContext<'_>,
    ) -> Result<ToolResponse, CommandError> {
        if self.current != ToolKind::Polyline {
            return Ok(ToolResponse::NONE);
        }
        self.finish_polyline(close, ctx)
    }

    /// Abandon the interaction in progress. Live select drags are undone.
    pub fn cancel(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if matches!(self.state, ToolState::Selecting(_)) {
            return self.select_cancel(ctx);
        }
        let was_active = self.is_active();
        self.state = ToolState::Idle;
        ToolResponse {
            repaint: was_active,
            modified: false,
        }
    }

    /// Drop the interaction without touching any project, e.g. when the
    /// project is replaced.
    pub fn reset(&mut self) {
        self.state = ToolState::Idle;
        self.hover = None;
    }

    /// Shape outline to draw for the interaction in progress.
    pub fn preview_shape(&self, project: &Project) -> Option<Shape> {
        match &self.state {
            ToolState::Idle => match (self.current, self.hover) {
                (ToolKind::Symbol, Some(point)) => Some(self.symbol_at(point)),
                _ => None,
            },
            ToolState::Dragging { start, current } => self.drag_shape(*start, *current),
            ToolState::Stroke { points } if points.len() >= 2 => {
                Some(self.styled(Shape::Freehand(Freehand::new(points.clone()))))
            }
            ToolState::Polyline { points, cursor } => {
                let mut points = points.clone();
                points.push(*cursor);
                Some(self.styled(Shape::Polyline(Polyline::new(points, false))))
            }
            ToolState::ArcRadius { center, cursor } => {
                let radius = distance(*center, *cursor);
                if radius <= 0.0 {
                    return None;
                }
                let start = angle(*center, *cursor);
                Some(self.styled(Shape::Arc(Arc::new(*center, radius, start, start + FRAC_PI_2))))
            }
            ToolState::ArcSweep {
                center,
                radius,
                start_angle,
                end_angle,
            } => Some(self.styled(Shape::Arc(Arc::new(
                *center,
                *radius,
                *start_angle,
                *end_angle,
            )))),
            ToolState::Measuring { start, current } => {
                Some(dimension_between(*start, *current, project))
            }
            ToolState::CalloutBox { leader, box_origin } => Some(self.styled(Shape::Callout(
                Callout::new(*leader, *box_origin, self.settings.callout_text.clone()),
            ))),
            _ => None,
        }
    }

    /// Vertex and center dots drawn with the preview.
    pub fn preview_markers(&self) -> Vec<Point> {
        match &self.state {
            ToolState::Polyline { points, .. } => points.clone(),
            ToolState::ArcRadius { center, .. } | ToolState::ArcSweep { center, .. } => {
                vec![*center]
            }
            ToolState::CalloutBox { leader, .. } => vec![*leader],
            _ => Vec::new(),
        }
    }

    fn commit(&self, shape: Shape, ctx: &mut ToolContext<'_>) -> Result<ToolResponse, CommandError> {
        let layer = ctx.project.active_layer().id.clone();
        log::debug!("{} tool created {}", self.current.name(), shape.id());
        ctx.history.execute(Command::add_object(layer, shape), ctx.project)?;
        Ok(ToolResponse::modified())
    }

    fn styled(&self, mut shape: Shape) -> Shape {
        *shape.style_mut() = self.settings.style.clone();
        shape
    }

    fn meets_minimum(&self, start: Point, end: Point) -> bool {
        let d = end - start;
        match self.current {
            ToolKind::Rect | ToolKind::Circle => d.x.abs() >= MIN_EXTENT || d.y.abs() >= MIN_EXTENT,
            ToolKind::Arrow => d.hypot() >= MIN_ARROW_LENGTH,
            _ => d.hypot() >= MIN_EXTENT,
        }
    }

    fn drag_shape(&self, start: Point, end: Point) -> Option<Shape> {
        let shape = match self.current {
            ToolKind::Line => Shape::Line(Line::new(start, end)),
            ToolKind::Rect => Shape::Rectangle(Rectangle::from_corners(start, end)),
            ToolKind::Circle => Shape::Ellipse(Ellipse::new(
                start,
                (end.x - start.x).abs(),
                (end.y - start.y).abs(),
            )),
            ToolKind::Arrow => Shape::Arrow(Arrow::new(start, end)),
            _ => return None,
        };
        Some(self.styled(shape))
    }

    fn symbol_at(&self, point: Point) -> Shape {
        let mut symbol = Symbol::new(point, self.settings.symbol_type.clone());
        symbol.size = SYMBOL_SIZE;
        symbol.style.stroke_color = self.settings.style.stroke_color;
        symbol.style.stroke_width = self.settings.style.stroke_width;
        Shape::Symbol(symbol)
    }

    fn place_text(&mut self, point: Point, ctx: &mut ToolContext<'_>) -> Result<ToolResponse, CommandError> {
        if self.settings.text.is_empty() {
            return Ok(ToolResponse::NONE);
        }
        let mut label = TextLabel::new(point, self.settings.text.clone());
        label.font_size = (self.settings.style.stroke_width * 6.0).max(MIN_TEXT_SIZE);
        label.style.stroke_color = self.settings.style.stroke_color;
        self.commit(Shape::Text(label), ctx)
    }

    fn polyline_click(&mut self, point: Point, ctx: &mut ToolContext<'_>) -> Result<ToolResponse, CommandError> {
        let finish = match &self.state {
            ToolState::Polyline { points, .. } => {
                if points.len() >= 3 && distance(point, points[0]) < CLOSE_DISTANCE {
                    Some(true)
                } else if points.len() >= 2
                    && points.last().is_some_and(|last| distance(point, *last) < FINISH_DISTANCE)
                {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        };
        if let Some(close) = finish {
            return self.finish_polyline(close, ctx);
        }

        match &mut self.state {
            ToolState::Polyline { points, cursor } => {
                points.push(point);
                *cursor = point;
            }
            state => {
                *state = ToolState::Polyline {
                    points: vec![point],
                    cursor: point,
                }
            }
        }
        Ok(ToolResponse::repaint())
    }

    fn finish_polyline(&mut self, close: bool, ctx: &mut ToolContext<'_>) -> Result<ToolResponse, CommandError> {
        let ToolState::Polyline { points, .. } = std::mem::take(&mut self.state) else {
            return Ok(ToolResponse::NONE);
        };
        if points.len() < 2 {
            return Ok(ToolResponse::repaint());
        }
        let shape = self.styled(Shape::Polyline(Polyline::new(points, close)));
        self.commit(shape, ctx)
    }

    fn arc_click(&mut self, point: Point, ctx: &mut ToolContext<'_>) -> Result<ToolResponse, CommandError> {
        match self.state {
            ToolState::ArcRadius { center, .. } => {
                let start_angle = angle(center, point);
                self.state = ToolState::ArcSweep {
                    center,
                    radius: distance(center, point),
                    start_angle,
                    end_angle: start_angle,
                };
                Ok(ToolResponse::repaint())
            }
            ToolState::ArcSweep {
                center,
                radius,
                start_angle,
                ..
            } => {
                self.state = ToolState::Idle;
                if radius < MIN_EXTENT {
                    return Ok(ToolResponse::repaint());
                }
                let arc = Arc::new(center, radius, start_angle, angle(center, point));
                let shape = self.styled(Shape::Arc(arc));
                self.commit(shape, ctx)
            }
            _ => {
                self.state = ToolState::ArcRadius {
                    center: point,
                    cursor: point,
                };
                Ok(ToolResponse::repaint())
            }
        }
    }

    fn dimension_click(&mut self, point: Point, ctx: &mut ToolContext<'_>) -> Result<ToolResponse, CommandError> {
        match self.state {
            ToolState::Measuring { start, .. } => {
                self.state = ToolState::Idle;
                if distance(start, point) < MIN_EXTENT {
                    return Ok(ToolResponse::repaint());
                }
                let shape = dimension_between(start, point, ctx.project);
                self.commit(shape, ctx)
            }
            _ => {
                self.state = ToolState::Measuring {
                    start: point,
                    current: point,
                };
                Ok(ToolResponse::repaint())
            }
        }
    }

    fn callout_click(&mut self, point: Point, ctx: &mut ToolContext<'_>) -> Result<ToolResponse, CommandError> {
        match self.state {
            ToolState::CalloutBox { leader, .. } => {
                self.state = ToolState::Idle;
                if self.settings.callout_text.is_empty() {
                    return Ok(ToolResponse::repaint());
                }
                let callout = Callout::new(leader, point, self.settings.callout_text.clone());
                let shape = self.styled(Shape::Callout(callout));
                self.commit(shape, ctx)
            }
            _ => {
                self.state = ToolState::CalloutBox {
                    leader: point,
                    box_origin: point + CALLOUT_BOX_OFFSET,
                };
                Ok(ToolResponse::repaint())
            }
        }
    }

    fn erase_at(&mut self, point: Point, ctx: &mut ToolContext<'_>) -> Result<ToolResponse, CommandError> {
        let Some(target) = pick_object(ctx.project, point) else {
            return Ok(ToolResponse::NONE);
        };
        if ctx.selection.is_selected(&target.shape) {
            ctx.selection.deselect();
        }
        ctx.history.execute(Command::remove_object(target), ctx.project)?;
        Ok(ToolResponse::modified())
    }
}

/// Dimension between two points in the project's measurement scale.
fn dimension_between(start: Point, end: Point, project: &Project) -> Shape {
    let mut dimension =
        Dimension::new(start, end).with_scale(project.scale_value, project.scale_unit.clone());
    dimension.offset = DIMENSION_OFFSET;
    Shape::Dimension(dimension)
}
