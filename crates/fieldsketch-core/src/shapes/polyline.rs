//! Open polyline or closed polygon.

use super::{Drawable, ShapeId, ShapeStyle, polyline_path};
use crate::geometry::{bounding_box, point_in_polygon, point_to_segment_dist};
use crate::surface::Surface;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A sequence of connected segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Polyline {
    pub(crate) id: ShapeId,
    pub points: Vec<Point>,
    /// Closed polylines connect the last point back to the first.
    pub closed: bool,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Polyline {
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        Self {
            id: ShapeId::new(),
            points,
            closed,
            style: ShapeStyle::default(),
        }
    }

    /// Segments in drawing order, including the closing edge when closed.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        let count = match (self.closed, n) {
            (_, 0 | 1) => 0,
            (true, _) => n,
            (false, _) => n - 1,
        };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

impl Drawable for Polyline {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        bounding_box(&self.points)
    }

    fn hit_test(&self, point: Point) -> bool {
        let tolerance = self.style.hit_tolerance();
        if self
            .segments()
            .any(|(a, b)| point_to_segment_dist(point, a, b) <= tolerance)
        {
            return true;
        }
        self.closed && self.style.is_filled() && point_in_polygon(point, &self.points)
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
        let path = polyline_path(&self.points, self.closed);
        if self.closed && self.style.is_filled() {
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
