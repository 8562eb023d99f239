//! Text label.

use super::{Drawable, ShapeId, ShapeStyle};
use crate::geometry::point_in_rect;
use crate::surface::{EstimatedMetrics, Font, Surface, TextAlign, TextBaseline, TextMeasurer};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Line advance as a multiple of the font size.
pub(crate) const LINE_HEIGHT: f64 = 1.3;

/// Widest line of `text` according to `measurer`.
pub(crate) fn max_line_width(text: &str, font: &Font, measurer: &dyn TextMeasurer) -> f64 {
    text.split('\n')
        .map(|line| measurer.text_width(line, font))
        .fold(0.0, f64::max)
}

pub(crate) fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Multi-line text anchored at its top edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextLabel {
    pub(crate) id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: String,
    pub text_align: TextAlign,
    #[serde(flatten)]
    pub style: ShapeStyle,
    /// Text box from the last measure pass.
    #[serde(skip)]
    measured: Option<Rect>,
}

impl Default for TextLabel {
    fn default() -> Self {
        Self {
            id: ShapeId::new(),
            x: 0.0,
            y: 0.0,
            text: "Text".to_string(),
            font_size: 14.0,
            font_family: "sans-serif".to_string(),
            font_weight: "normal".to_string(),
            text_align: TextAlign::Left,
            style: ShapeStyle::default(),
            measured: None,
        }
    }
}

// The measured box is a cache and does not take part in equality.
impl PartialEq for TextLabel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.x == other.x
            && self.y == other.y
            && self.text == other.text
            && self.font_size == other.font_size
            && self.font_family == other.font_family
            && self.font_weight == other.font_weight
            && self.text_align == other.text_align
            && self.style == other.style
    }
}

impl TextLabel {
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            x: position.x,
            y: position.y,
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn font(&self) -> Font {
        Font::new(self.font_size, self.font_family.clone(), self.font_weight.clone())
    }

    pub fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.invalidate_measure();
    }

    /// Drop the cached box after a text or font change.
    pub fn invalidate_measure(&mut self) {
        self.measured = None;
    }

    pub fn measured_box(&self) -> Option<Rect> {
        self.measured
    }

    fn layout_box(&self, measurer: &dyn TextMeasurer) -> Rect {
        let width = max_line_width(&self.text, &self.font(), measurer);
        let height = line_count(&self.text) as f64 * self.line_height();
        let left = match self.text_align {
            TextAlign::Left => self.x,
            TextAlign::Center => self.x - width / 2.0,
            TextAlign::Right => self.x - width,
        };
        Rect::new(left, self.y, left + width, self.y + height)
    }

    /// Measured box, or an estimate when no measure pass has run.
    pub fn text_box(&self) -> Rect {
        self.measured
            .unwrap_or_else(|| self.layout_box(&EstimatedMetrics))
    }
}

impl Drawable for TextLabel {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.text_box())
    }

    fn hit_test(&self, point: Point) -> bool {
        point_in_rect(point, self.text_box().inflate(4.0, 4.0))
    }

    fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
        self.measured = self.measured.map(|r| r + delta);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.set_font(&self.font());
        surface.set_fill(self.style.stroke());
        surface.set_alpha(self.style.opacity.clamp(0.0, 1.0));
        let line_height = self.line_height();
        for (i, line) in self.text.split('\n').enumerate() {
            let origin = Point::new(self.x, self.y + i as f64 * line_height);
            surface.fill_text(line, origin, self.text_align, TextBaseline::Top);
        }
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn measure(&mut self, measurer: &dyn TextMeasurer) {
        self.measured = Some(self.layout_box(measurer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    struct FixedWidth(f64);

    impl TextMeasurer for FixedWidth {
        fn text_width(&self, text: &str, _font: &Font) -> f64 {
            text.chars().count() as f64 * self.0
        }
    }

    #[test]
    fn test_hit_test_without_measure() {
        let label = TextLabel::new(Point::new(0.0, 0.0), "Crack");
        // Estimated width: 5 chars * 14 * 0.6 = 42.
        assert!(label.hit_test(Point::new(20.0, 5.0)));
        assert!(label.hit_test(Point::new(45.0, 5.0)));
        assert!(!label.hit_test(Point::new(60.0, 5.0)));
    }

    #[test]
    fn test_measure_replaces_estimate() {
        let mut label = TextLabel::new(Point::new(0.0, 0.0), "ab\nabcd");
        label.measure(&FixedWidth(10.0));
        let bounds = label.bounds().unwrap();
        assert!((bounds.width() - 40.0).abs() < 1e-9);
        assert!((bounds.height() - 2.0 * 14.0 * 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_alignment_shifts_box() {
        let mut label = TextLabel::new(Point::new(100.0, 0.0), "abcd");
        label.text_align = TextAlign::Right;
        label.measure(&FixedWidth(10.0));
        assert!((label.text_box().x0 - 60.0).abs() < 1e-9);

        label.text_align = TextAlign::Center;
        label.measure(&FixedWidth(10.0));
        assert!((label.text_box().x0 - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_translate_moves_cached_box() {
        let mut label = TextLabel::new(Point::new(0.0, 0.0), "abcd");
        label.measure(&FixedWidth(10.0));
        label.translate(Vec2::new(5.0, 5.0));
        let bounds = label.measured_box().unwrap();
        assert!((bounds.x0 - 5.0).abs() < 1e-9);
        assert!((bounds.x1 - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_text_invalidates_measure() {
        let mut label = TextLabel::new(Point::new(0.0, 0.0), "abcd");
        label.measure(&FixedWidth(10.0));
        label.set_text("a");
        assert!(label.measured_box().is_none());
    }

    #[test]
    fn test_draws_one_call_per_line() {
        let label = TextLabel::new(Point::new(0.0, 0.0), "one\ntwo\nthree");
        let mut surface = RecordingSurface::new();
        label.draw(&mut surface);
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_measured_box_is_not_serialized() {
        let mut label = TextLabel::new(Point::new(0.0, 0.0), "abcd");
        label.measure(&FixedWidth(10.0));
        let json = serde_json::to_value(&label).unwrap();
        assert!(json.get("measured").is_none());
        let back: TextLabel = serde_json::from_value(json).unwrap();
        assert!(back.measured_box().is_none());
        assert_eq!(back.text, "abcd");
    }

    #[test]
    fn test_measured_label_equals_its_record() {
        let mut label = TextLabel::new(Point::new(2.0, 3.0), "two\nlines");
        label.measure(&EstimatedMetrics);
        assert!(label.measured_box().is_some());

        let shape = crate::shapes::Shape::Text(label);
        let back = crate::shapes::Shape::from_record(shape.to_record()).unwrap();
        assert_eq!(back, shape);
    }
}
