//! Ellipse shape (stored under the `circle` type key).

use super::{Drawable, ShapeId, ShapeStyle};
use crate::surface::Surface;
use kurbo::{Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned ellipse given by center and radii.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(center: Point, rx: f64, ry: f64) -> Self {
        Self {
            id: ShapeId::new(),
            cx: center.x,
            cy: center.y,
            rx,
            ry,
            style: ShapeStyle::default(),
        }
    }

    /// Create a circle.
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new(center, radius, radius)
    }

    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    pub fn radii(&self) -> Vec2 {
        Vec2::new(self.rx.abs(), self.ry.abs())
    }
}

impl Drawable for Ellipse {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        let r = self.radii();
        Some(Rect::new(self.cx - r.x, self.cy - r.y, self.cx + r.x, self.cy + r.y))
    }

    fn hit_test(&self, point: Point) -> bool {
        let r = self.radii();
        if r.x == 0.0 || r.y == 0.0 {
            return false;
        }
        // Distance in the ellipse's unit-circle space; the band is scaled by the smaller radius.
        let dx = (point.x - self.cx) / r.x;
        let dy = (point.y - self.cy) / r.y;
        let d = dx.hypot(dy);
        let band = self.style.hit_tolerance() / r.x.min(r.y);

        if self.style.is_filled() {
            d <= 1.0 + band
        } else {
            (d - 1.0).abs() <= band
        }
    }

    fn translate(&mut self, delta: Vec2) {
        self.cx += delta.x;
        self.cy += delta.y;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.style.apply(surface);
        let path = kurbo::Ellipse::new(self.center(), self.radii(), 0.0).to_path(0.1);
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
