//! Measured dimension with extension lines and a distance label.

use super::{Drawable, LABEL_BACKGROUND, SerializableColor, ShapeId, ShapeStyle, arrow_head};
use crate::geometry::{angle, bounding_box, distance, format_number, point_to_segment_dist};
use crate::surface::{Font, Surface, TextAlign, TextBaseline};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI};

const EXTENSION_OVERSHOOT: f64 = 5.0;
const ARROW_LENGTH: f64 = 8.0;
const HIT_TOLERANCE: f64 = 8.0;

/// Distance annotation between two points, drawn `offset` units to the side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dimension {
    pub(crate) id: ShapeId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Perpendicular distance of the dimension line from the measured segment.
    pub offset: f64,
    pub font_size: f64,
    pub unit: String,
    /// Real-world units per world unit.
    pub scale: f64,
    /// Replaces the computed label when set.
    pub text_override: Option<String>,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Default for Dimension {
    fn default() -> Self {
        Self {
            id: ShapeId::new(),
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
            offset: 20.0,
            font_size: 12.0,
            unit: String::new(),
            scale: 1.0,
            text_override: None,
            style: ShapeStyle {
                stroke_color: SerializableColor::rgb(0x00, 0x66, 0xcc),
                stroke_width: 1.0,
                ..ShapeStyle::default()
            },
        }
    }
}

/// Dimension line endpoints and the unit normal they were offset along.
struct OffsetLine {
    o1: Point,
    o2: Point,
    normal: Vec2,
}

impl Dimension {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
            ..Self::default()
        }
    }

    /// Apply the project measurement scale.
    pub fn with_scale(mut self, scale: f64, unit: impl Into<String>) -> Self {
        self.scale = scale;
        self.unit = unit.into();
        self
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Measured length in real-world units.
    pub fn measurement(&self) -> f64 {
        distance(self.start(), self.end()) * self.scale
    }

    /// Label text: the override if present, else the scaled distance and unit.
    pub fn label(&self) -> String {
        if let Some(text) = self.text_override.as_deref().filter(|t| !t.is_empty()) {
            return text.to_string();
        }
        let value = format_number(self.measurement(), 2);
        if self.unit.is_empty() {
            value
        } else {
            format!("{value} {}", self.unit)
        }
    }

    /// `None` when the measured segment is shorter than one unit.
    fn offset_line(&self) -> Option<OffsetLine> {
        let d = self.end() - self.start();
        let len = d.hypot();
        if len < 1.0 {
            return None;
        }
        let normal = Vec2::new(-d.y / len, d.x / len);
        Some(OffsetLine {
            o1: self.start() + normal * self.offset,
            o2: self.end() + normal * self.offset,
            normal,
        })
    }
}

impl Drawable for Dimension {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        match self.offset_line() {
            Some(line) => bounding_box(&[self.start(), self.end(), line.o1, line.o2]),
            None => Some(Rect::new(self.x1, self.y1, self.x1 + 1.0, self.y1 + 1.0)),
        }
    }

    fn hit_test(&self, point: Point) -> bool {
        let Some(OffsetLine { o1, o2, .. }) = self.offset_line() else {
            return false;
        };
        point_to_segment_dist(point, o1, o2) <= HIT_TOLERANCE
            || point_to_segment_dist(point, self.start(), o1) <= HIT_TOLERANCE
            || point_to_segment_dist(point, self.end(), o2) <= HIT_TOLERANCE
    }

    fn translate(&mut self, delta: Vec2) {
        self.x1 += delta.x;
        self.y1 += delta.y;
        self.x2 += delta.x;
        self.y2 += delta.y;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let Some(OffsetLine { o1, o2, normal }) = self.offset_line() else {
            return;
        };
        self.style.apply(surface);

        // Extension lines overshoot both ends on the side of the offset.
        let dir = if self.offset > 0.0 { 1.0 } else { -1.0 };
        let ext = normal * EXTENSION_OVERSHOOT * dir;
        let mut lines = BezPath::new();
        lines.move_to(self.start() - ext);
        lines.line_to(o1 + ext);
        lines.move_to(self.end() - ext);
        lines.line_to(o2 + ext);
        lines.move_to(o1);
        lines.line_to(o2);
        surface.stroke(&lines);

        let line_angle = angle(o1, o2);
        let mut heads = BezPath::new();
        arrow_head(&mut heads, o1, line_angle + PI, ARROW_LENGTH, FRAC_PI_6);
        arrow_head(&mut heads, o2, line_angle, ARROW_LENGTH, FRAC_PI_6);
        surface.stroke(&heads);

        // Keep the label upright.
        let mut rotation = line_angle;
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&rotation) {
            rotation += PI;
        }
        let text = self.label();
        let font = Font::sans(self.font_size);

        surface.save();
        surface.transform(Affine::translate(o1.midpoint(o2).to_vec2()) * Affine::rotate(rotation));
        surface.set_font(&font);
        let width = surface.text_width(&text, &font);
        surface.set_fill(LABEL_BACKGROUND.into());
        surface.fill_rect(Rect::new(
            -width / 2.0 - 3.0,
            -self.font_size - 2.0,
            width / 2.0 + 3.0,
            2.0,
        ));
        surface.set_fill(self.style.stroke());
        surface.fill_text(&text, Point::new(0.0, -2.0), TextAlign::Center, TextBaseline::Bottom);
        surface.restore();
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
    use crate::surface::{DrawOp, RecordingSurface};

    #[test]
    fn test_label_scaled_with_unit() {
        let dim = Dimension::new(Point::new(0.0, 0.0), Point::new(30.0, 40.0)).with_scale(0.5, "ft");
        assert_eq!(dim.label(), "25 ft");

        let dim = Dimension::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).with_scale(0.333, "");
        assert_eq!(dim.label(), "3.33");
    }

    #[test]
    fn test_label_override() {
        let mut dim = Dimension::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        dim.text_override = Some("approx. 3m".to_string());
        assert_eq!(dim.label(), "approx. 3m");
        dim.text_override = Some(String::new());
        assert_eq!(dim.label(), "10");
    }

    #[test]
    fn test_default_style() {
        let dim = Dimension::new(Point::ZERO, Point::new(10.0, 0.0));
        assert_eq!(dim.style.stroke_color.to_hex(), "#0066cc");
        assert!((dim.style.stroke_width - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_on_offset_line() {
        // Horizontal segment; normal points down (+y) so the dimension line sits at y = 20.
        let dim = Dimension::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(dim.hit_test(Point::new(50.0, 20.0)));
        assert!(dim.hit_test(Point::new(0.0, 10.0)));
        assert!(!dim.hit_test(Point::new(50.0, 0.0)));
    }

    #[test]
    fn test_degenerate_dimension() {
        let dim = Dimension::new(Point::new(5.0, 5.0), Point::new(5.2, 5.0));
        assert!(!dim.hit_test(Point::new(5.0, 5.0)));
        assert_eq!(dim.bounds(), Some(Rect::new(5.0, 5.0, 6.0, 6.0)));
        let mut surface = RecordingSurface::new();
        dim.draw(&mut surface);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_bounds_include_offset_line() {
        let dim = Dimension::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert_eq!(dim.bounds(), Some(Rect::new(0.0, 0.0, 100.0, 20.0)));
    }

    #[test]
    fn test_label_flipped_upright() {
        // Right-to-left segment has angle π; the label is rotated back by π.
        let dim = Dimension::new(Point::new(100.0, 0.0), Point::new(0.0, 0.0));
        let mut surface = RecordingSurface::new();
        dim.draw(&mut surface);
        let rotation = surface.ops().iter().find_map(|op| match op {
            DrawOp::Transform(affine) => Some(*affine),
            _ => None,
        });
        let coeffs = rotation.unwrap().as_coeffs();
        // cos(2π) == 1 on the diagonal means an upright label.
        assert!((coeffs[0] - 1.0).abs() < 1e-9);
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["100"]);
    }
}
