//! Arrow shape.

use super::line::segment_bounds;
use super::{Drawable, ShapeId, ShapeStyle, arrow_head, segment_path};
use crate::geometry::{angle, point_to_segment_dist};
use crate::surface::Surface;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_6, PI};

/// A straight arrow from `(x1, y1)` to the head at `(x2, y2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Arrow {
    pub(crate) id: ShapeId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Length of each head stroke.
    pub head_size: f64,
    /// Draw a head at the start point too.
    pub double_head: bool,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Default for Arrow {
    fn default() -> Self {
        Self {
            id: ShapeId::new(),
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
            head_size: 12.0,
            double_head: false,
            style: ShapeStyle::default(),
        }
    }
}

impl Arrow {
    /// Create a new arrow.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
            ..Self::default()
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn set_start(&mut self, point: Point) {
        self.x1 = point.x;
        self.y1 = point.y;
    }

    pub fn set_end(&mut self, point: Point) {
        self.x2 = point.x;
        self.y2 = point.y;
    }

    /// Head strokes for both ends as one path.
    pub fn heads_path(&self) -> BezPath {
        let direction = angle(self.start(), self.end());
        let mut heads = BezPath::new();
        arrow_head(&mut heads, self.end(), direction, self.head_size, FRAC_PI_6);
        if self.double_head {
            arrow_head(&mut heads, self.start(), direction + PI, self.head_size, FRAC_PI_6);
        }
        heads
    }
}

impl Drawable for Arrow {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(segment_bounds(self.start(), self.end()))
    }

    /// Only the shaft is pickable.
    fn hit_test(&self, point: Point) -> bool {
        point_to_segment_dist(point, self.start(), self.end()) <= self.style.hit_tolerance()
    }

    fn translate(&mut self, delta: Vec2) {
        self.x1 += delta.x;
        self.y1 += delta.y;
        self.x2 += delta.x;
        self.y2 += delta.y;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.style.apply(surface);
        surface.stroke(&segment_path(self.start(), self.end()));
        surface.stroke(&self.heads_path());
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
