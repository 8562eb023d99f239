//! Straight line segment.

use super::{Drawable, ShapeId, ShapeStyle, segment_path};
use crate::geometry::{distance, point_to_segment_dist};
use crate::surface::Surface;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A line between two points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Line {
    pub(crate) id: ShapeId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: ShapeId::new(),
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
            style: ShapeStyle::default(),
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

    pub fn length(&self) -> f64 {
        distance(self.start(), self.end())
    }
}

/// Bounds of a segment, at least one unit wide and tall so axis-aligned lines stay pickable.
pub(crate) fn segment_bounds(a: Point, b: Point) -> Rect {
    let x = a.x.min(b.x);
    let y = a.y.min(b.y);
    let w = (b.x - a.x).abs().max(1.0);
    let h = (b.y - a.y).abs().max(1.0);
    Rect::new(x, y, x + w, y + h)
}

impl Drawable for Line {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(segment_bounds(self.start(), self.end()))
    }

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
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_creation() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((line.length() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_uses_stroke_tolerance() {
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(line.hit_test(Point::new(50.0, 5.9)));
        assert!(!line.hit_test(Point::new(50.0, 6.5)));

        line.style.stroke_width = 10.0;
        assert!(line.hit_test(Point::new(50.0, 8.5)));
    }

    #[test]
    fn test_bounds_have_minimum_extent() {
        let line = Line::new(Point::new(10.0, 5.0), Point::new(50.0, 5.0));
        let bounds = line.bounds().unwrap();
        assert!((bounds.width() - 40.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_translate_roundtrip() {
        let mut line = Line::new(Point::new(1.0, 2.0), Point::new(3.0, 4.0));
        let original = line.clone();
        line.translate(Vec2::new(7.5, -2.25));
        assert!((line.x1 - 8.5).abs() < f64::EPSILON);
        line.translate(Vec2::new(-7.5, 2.25));
        assert_eq!(line, original);
    }
}
