//! Circular arc.

use super::{Drawable, ShapeId, ShapeStyle};
use crate::geometry::{angle, distance};
use crate::surface::Surface;
use kurbo::{Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

/// An arc of a circle swept clockwise (screen space) from `start_angle` to `end_angle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Arc {
    pub(crate) id: ShapeId,
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    /// Radians.
    pub start_angle: f64,
    /// Radians.
    pub end_angle: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Default for Arc {
    fn default() -> Self {
        Self {
            id: ShapeId::new(),
            cx: 0.0,
            cy: 0.0,
            radius: 0.0,
            start_angle: 0.0,
            end_angle: FRAC_PI_2,
            style: ShapeStyle::default(),
        }
    }
}

impl Arc {
    pub fn new(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            cx: center.x,
            cy: center.y,
            radius,
            start_angle,
            end_angle,
            ..Self::default()
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    /// End angle lifted by whole turns so that it is not below the start angle.
    fn normalized_end(&self) -> f64 {
        if self.end_angle < self.start_angle {
            self.start_angle + (self.end_angle - self.start_angle).rem_euclid(TAU)
        } else {
            self.end_angle
        }
    }

    /// Sweep in radians, at most one full turn.
    pub fn sweep(&self) -> f64 {
        (self.normalized_end() - self.start_angle).min(TAU)
    }

    /// Whether a direction (radians) falls inside the swept range.
    pub fn contains_angle(&self, theta: f64) -> bool {
        if !(self.start_angle.is_finite() && self.end_angle.is_finite() && theta.is_finite()) {
            return false;
        }
        let lifted = self.start_angle + (theta - self.start_angle).rem_euclid(TAU);
        lifted <= self.normalized_end()
    }
}

impl Drawable for Arc {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    /// Bounds of the full circle.
    fn bounds(&self) -> Option<Rect> {
        let r = self.radius;
        Some(Rect::new(self.cx - r, self.cy - r, self.cx + r, self.cy + r))
    }

    fn hit_test(&self, point: Point) -> bool {
        let center = self.center();
        if (distance(point, center) - self.radius).abs() > self.style.hit_tolerance() {
            return false;
        }
        self.contains_angle(angle(center, point))
    }

    fn translate(&mut self, delta: Vec2) {
        self.cx += delta.x;
        self.cy += delta.y;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if self.radius <= 0.0 {
            return;
        }
        self.style.apply(surface);
        let arc = kurbo::Arc {
            center: self.center(),
            radii: Vec2::new(self.radius, self.radius),
            start_angle: self.start_angle,
            sweep_angle: self.sweep(),
            x_rotation: 0.0,
        };
        surface.stroke(&arc.to_path(0.1));
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
