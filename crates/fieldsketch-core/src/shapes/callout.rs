//! Callout: a note box with a leader line to the annotated point.

use super::text::{LINE_HEIGHT, line_count, max_line_width};
use super::{Drawable, LABEL_BACKGROUND, ShapeId, ShapeStyle, dot_path, segment_path};
use crate::geometry::{point_in_rect, point_to_segment_dist};
use crate::surface::{EstimatedMetrics, Font, Surface, TextAlign, TextBaseline, TextMeasurer};
use kurbo::{Point, Rect, Shape as KurboShape, Size, Vec2};
use serde::{Deserialize, Serialize};

const MIN_TEXT_WIDTH: f64 = 40.0;
const LEADER_TOLERANCE: f64 = 6.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Callout {
    pub(crate) id: ShapeId,
    pub leader_x: f64,
    pub leader_y: f64,
    /// Top-left corner of the note box.
    pub box_x: f64,
    pub box_y: f64,
    pub text: String,
    pub font_size: f64,
    pub padding: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
    /// Box size from the last measure pass.
    #[serde(skip)]
    measured: Option<Size>,
}

impl Default for Callout {
    fn default() -> Self {
        Self {
            id: ShapeId::new(),
            leader_x: 0.0,
            leader_y: 0.0,
            box_x: 0.0,
            box_y: 0.0,
            text: "Note".to_string(),
            font_size: 12.0,
            padding: 8.0,
            style: ShapeStyle::default(),
            measured: None,
        }
    }
}

impl PartialEq for Callout {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.leader_x == other.leader_x
            && self.leader_y == other.leader_y
            && self.box_x == other.box_x
            && self.box_y == other.box_y
            && self.text == other.text
            && self.font_size == other.font_size
            && self.padding == other.padding
            && self.style == other.style
    }
}

impl Callout {
    pub fn new(leader: Point, box_origin: Point, text: impl Into<String>) -> Self {
        Self {
            leader_x: leader.x,
            leader_y: leader.y,
            box_x: box_origin.x,
            box_y: box_origin.y,
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn leader(&self) -> Point {
        Point::new(self.leader_x, self.leader_y)
    }

    pub fn font(&self) -> Font {
        Font::sans(self.font_size)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.invalidate_measure();
    }

    pub fn invalidate_measure(&mut self) {
        self.measured = None;
    }

    fn box_size(&self, measurer: &dyn TextMeasurer) -> Size {
        let text_width = max_line_width(&self.text, &self.font(), measurer).max(MIN_TEXT_WIDTH);
        let text_height = line_count(&self.text) as f64 * self.font_size * LINE_HEIGHT;
        Size::new(
            text_width + self.padding * 2.0,
            text_height + self.padding * 2.0,
        )
    }

    /// Note box, measured or estimated.
    pub fn text_box(&self) -> Rect {
        let size = self
            .measured
            .unwrap_or_else(|| self.box_size(&EstimatedMetrics));
        Rect::from_origin_size(Point::new(self.box_x, self.box_y), size)
    }
}

impl Drawable for Callout {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.text_box().union_pt(self.leader()))
    }

    fn hit_test(&self, point: Point) -> bool {
        let text_box = self.text_box();
        point_in_rect(point, text_box.inflate(4.0, 4.0))
            || point_to_segment_dist(point, self.leader(), text_box.center()) <= LEADER_TOLERANCE
    }

    fn translate(&mut self, delta: Vec2) {
        self.leader_x += delta.x;
        self.leader_y += delta.y;
        self.box_x += delta.x;
        self.box_y += delta.y;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let text_box = self.text_box();
        let opacity = self.style.opacity.clamp(0.0, 1.0);
        self.style.apply(surface);

        surface.stroke(&segment_path(self.leader(), text_box.center()));
        surface.set_fill(self.style.stroke());
        surface.fill(&dot_path(self.leader(), 3.0));

        surface.set_fill(LABEL_BACKGROUND.into());
        surface.set_alpha(0.9 * opacity);
        surface.fill_rect(text_box);
        surface.set_alpha(opacity);
        surface.stroke(&text_box.to_path(0.1));

        surface.set_font(&self.font());
        surface.set_fill(self.style.stroke());
        let line_height = self.font_size * LINE_HEIGHT;
        for (i, line) in self.text.split('\n').enumerate() {
            let origin = Point::new(
                self.box_x + self.padding,
                self.box_y + self.padding + i as f64 * line_height,
            );
            surface.fill_text(line, origin, TextAlign::Left, TextBaseline::Top);
        }
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn measure(&mut self, measurer: &dyn TextMeasurer) {
        self.measured = Some(self.box_size(measurer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedWidth(f64);

    impl TextMeasurer for FixedWidth {
        fn text_width(&self, text: &str, _font: &Font) -> f64 {
            text.chars().count() as f64 * self.0
        }
    }

    #[test]
    fn test_box_has_minimum_width() {
        let mut callout = Callout::new(Point::ZERO, Point::new(50.0, 50.0), "ok");
        callout.measure(&FixedWidth(5.0));
        let text_box = callout.text_box();
        assert!((text_box.width() - (40.0 + 16.0)).abs() < 1e-9);
        assert!((text_box.height() - (12.0 * 1.3 + 16.0)).abs() < 1e-9);
    }

    #[test]
    fn test_box_grows_with_text() {
        let mut callout = Callout::new(Point::ZERO, Point::new(50.0, 50.0), "line one\nsecond line!");
        callout.measure(&FixedWidth(10.0));
        let text_box = callout.text_box();
        assert!((text_box.width() - 136.0).abs() < 1e-9);
        assert!((text_box.height() - (2.0 * 12.0 * 1.3 + 16.0)).abs() < 1e-9);
    }

    #[test]
    fn test_hit_box_and_leader() {
        let mut callout = Callout::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), "ok");
        callout.measure(&FixedWidth(5.0));
        // Inside the box.
        assert!(callout.hit_test(Point::new(120.0, 10.0)));
        // On the leader, halfway to the box center.
        let center = callout.text_box().center();
        assert!(callout.hit_test(Point::new(center.x / 2.0, center.y / 2.0)));
        assert!(!callout.hit_test(Point::new(50.0, 60.0)));
    }

    #[test]
    fn test_bounds_include_leader() {
        let callout = Callout::new(Point::new(-20.0, -30.0), Point::new(10.0, 10.0), "Note");
        let bounds = callout.bounds().unwrap();
        assert!((bounds.x0 + 20.0).abs() < f64::EPSILON);
        assert!((bounds.y0 + 30.0).abs() < f64::EPSILON);
        assert!(bounds.x1 > 10.0);
    }

    #[test]
    fn test_translate_keeps_measured_size() {
        let mut callout = Callout::new(Point::ZERO, Point::new(10.0, 10.0), "ok");
        callout.measure(&FixedWidth(5.0));
        let before = callout.text_box();
        callout.translate(Vec2::new(3.0, 4.0));
        let after = callout.text_box();
        assert!((after.x0 - before.x0 - 3.0).abs() < 1e-9);
        assert!((after.width() - before.width()).abs() < 1e-9);
    }

    #[test]
    fn test_measured_callout_equals_its_record() {
        let mut callout = Callout::new(Point::ZERO, Point::new(60.0, -40.0), "Crack");
        callout.measure(&FixedWidth(9.0));

        let shape = crate::shapes::Shape::Callout(callout);
        let back = crate::shapes::Shape::from_record(shape.to_record()).unwrap();
        assert_eq!(back, shape);
    }
}
