//! Rectangle shape.

use super::{Drawable, ShapeId, ShapeStyle};
use crate::geometry::{point_in_rect, point_to_segment_dist};
use crate::surface::Surface;
use kurbo::{Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle. Width and height may be negative while dragging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Anchor corner.
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, w: f64, h: f64) -> Self {
        Self {
            id: ShapeId::new(),
            x: position.x,
            y: position.y,
            w,
            h,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let rect = Rect::from_points(p1, p2);
        Self::new(rect.origin(), rect.width(), rect.height())
    }

    /// Normalized rectangle.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h).abs()
    }

    fn corners(&self) -> [Point; 4] {
        let (x2, y2) = (self.x + self.w, self.y + self.h);
        [
            Point::new(self.x, self.y),
            Point::new(x2, self.y),
            Point::new(x2, y2),
            Point::new(self.x, y2),
        ]
    }
}

impl Drawable for Rectangle {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.as_rect())
    }

    fn hit_test(&self, point: Point) -> bool {
        let tolerance = self.style.hit_tolerance();
        if self.style.is_filled() {
            // Filled: hit anywhere inside
            return point_in_rect(point, self.as_rect().inflate(tolerance, tolerance));
        }
        // Outline only: hit on the border
        let c = self.corners();
        (0..4).any(|i| point_to_segment_dist(point, c[i], c[(i + 1) % 4]) <= tolerance)
    }

    fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.style.apply(surface);
        let path = self.as_rect().to_path(0.1);
        if self.style.is_filled() {
            surface.fill(&path);
        }
        surface.stroke(&path);
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
