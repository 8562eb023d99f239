//! Freehand stroke.

use super::{Drawable, ShapeId, ShapeStyle, polyline_path};
use crate::geometry::{bounding_box, point_to_polyline_dist, simplify_path};
use crate::surface::{LineCap, Surface};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A freehand stroke as a raw point sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Freehand {
    pub(crate) id: ShapeId,
    pub points: Vec<Point>,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Freehand {
    /// Tolerance applied when a stroke is committed.
    pub const SIMPLIFY_TOLERANCE: f64 = 1.5;

    pub fn new(points: Vec<Point>) -> Self {
        Self {
            id: ShapeId::new(),
            points,
            style: ShapeStyle::default(),
        }
    }

    /// Drop points that lie within `tolerance` of the simplified path.
    pub fn simplify(&mut self, tolerance: f64) {
        self.points = simplify_path(&self.points, tolerance);
    }
}

impl Drawable for Freehand {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        bounding_box(&self.points)
    }

    fn hit_test(&self, point: Point) -> bool {
        self.points.len() >= 2
            && point_to_polyline_dist(point, &self.points) <= self.style.hit_tolerance()
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if self.points.len() < 2 {
            return;
        }
        self.style.apply(surface);
        surface.set_line_cap(LineCap::Round);
        surface.stroke(&polyline_path(&self.points, false));
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
    fn test_simplify_collapses_near_straight_stroke() {
        let mut stroke = Freehand::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.01),
            Point::new(2.0, 0.0),
            Point::new(10.0, 0.0),
        ]);
        stroke.simplify(1.0);
        assert_eq!(stroke.points, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    }

    #[test]
    fn test_empty_stroke_has_no_bounds() {
        let stroke = Freehand::new(Vec::new());
        assert!(stroke.bounds().is_none());
    }

    #[test]
    fn test_hit_test() {
        let stroke = Freehand::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 0.0),
        ]);
        assert!(stroke.hit_test(Point::new(5.0, 5.0)));
        assert!(stroke.hit_test(Point::new(15.0, 8.0)));
        assert!(!stroke.hit_test(Point::new(10.0, -10.0)));
    }

    #[test]
    fn test_single_point_is_not_hit() {
        let stroke = Freehand::new(vec![Point::new(3.0, 3.0)]);
        assert!(!stroke.hit_test(Point::new(3.0, 3.0)));
        assert!(stroke.bounds().is_some());
    }
}
