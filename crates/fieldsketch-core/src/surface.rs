//! Abstract 2D immediate-mode drawing surface.
//!
//! Shapes paint through [`Surface`]; the host provides an implementation backed by
//! whatever canvas it owns. [`RecordingSurface`] keeps a display list and is used for
//! headless rendering and tests.

use kurbo::{Affine, BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Horizontal text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Line end decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

/// Font description used for measuring and filling text.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub size: f64,
    pub family: String,
    pub weight: String,
}

impl Font {
    pub fn new(size: f64, family: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
            weight: weight.into(),
        }
    }

    /// Plain sans-serif at the given size.
    pub fn sans(size: f64) -> Self {
        Self::new(size, "sans-serif", "normal")
    }

    /// CSS shorthand, e.g. `bold 14px sans-serif`.
    pub fn css(&self) -> String {
        format!("{} {}px {}", self.weight, self.size, self.family)
    }
}

/// Opaque handle to a decoded image owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

/// Text width measurement.
pub trait TextMeasurer {
    /// Advance width of a single line of text.
    fn text_width(&self, text: &str, font: &Font) -> f64;
}

/// Deterministic metrics used when no real font backend is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMetrics;

impl EstimatedMetrics {
    /// Average glyph advance as a fraction of the font size.
    pub const EM_RATIO: f64 = 0.6;
}

impl TextMeasurer for EstimatedMetrics {
    fn text_width(&self, text: &str, font: &Font) -> f64 {
        text.chars().count() as f64 * font.size * Self::EM_RATIO
    }
}

/// Drawing primitives the core paints with.
///
/// State setters (`set_*`, `transform`) affect subsequent primitives until the
/// matching [`Surface::restore`].
pub trait Surface: TextMeasurer {
    fn save(&mut self);
    fn restore(&mut self);

    /// Post-multiply the current transform.
    fn transform(&mut self, affine: Affine);
    /// Replace the current transform.
    fn set_transform(&mut self, affine: Affine);

    fn set_stroke(&mut self, color: Color, width: f64);
    fn set_fill(&mut self, color: Color);
    fn set_alpha(&mut self, alpha: f64);
    /// Empty pattern means solid.
    fn set_dash(&mut self, pattern: &[f64]);
    fn set_line_cap(&mut self, cap: LineCap);

    fn stroke(&mut self, path: &BezPath);
    fn fill(&mut self, path: &BezPath);
    fn fill_rect(&mut self, rect: Rect);
    fn clear(&mut self, color: Color);

    fn set_font(&mut self, font: &Font);
    fn fill_text(&mut self, text: &str, origin: Point, align: TextAlign, baseline: TextBaseline);

    fn draw_image(&mut self, image: ImageHandle, dest: Rect);

    /// Paint a catalog glyph centered on the origin. Returns `false` when the
    /// surface has no glyph for `name`, in which case the caller draws a placeholder.
    fn draw_symbol(&mut self, name: &str, size: f64) -> bool {
        let _ = (name, size);
        false
    }
}

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Transform(Affine),
    SetTransform(Affine),
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
        alpha: f64,
        dash: Vec<f64>,
    },
    Fill {
        path: BezPath,
        color: Color,
        alpha: f64,
    },
    FillRect {
        rect: Rect,
        color: Color,
        alpha: f64,
    },
    Clear(Color),
    Text {
        text: String,
        origin: Point,
        font: Font,
        align: TextAlign,
        baseline: TextBaseline,
    },
    Image {
        image: ImageHandle,
        dest: Rect,
        alpha: f64,
    },
    Symbol {
        name: String,
        size: f64,
    },
}

#[derive(Debug, Clone)]
struct GraphicsState {
    transform: Affine,
    stroke: Color,
    width: f64,
    fill: Color,
    alpha: f64,
    dash: Vec<f64>,
    cap: LineCap,
    font: Font,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            stroke: Color::BLACK,
            width: 1.0,
            fill: Color::BLACK,
            alpha: 1.0,
            dash: Vec::new(),
            cap: LineCap::Butt,
            font: Font::sans(10.0),
        }
    }
}

/// Surface that records every primitive into a display list.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    glyphs: Vec<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recording surface that claims to know the given catalog glyphs.
    pub fn with_glyphs<I, S>(glyphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            glyphs: glyphs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Current alpha, for checking that painters restore state.
    pub fn alpha(&self) -> f64 {
        self.state.alpha
    }

    /// Current dash pattern.
    pub fn dash(&self) -> &[f64] {
        &self.state.dash
    }

    pub fn current_transform(&self) -> Affine {
        self.state.transform
    }

    pub fn line_cap(&self) -> LineCap {
        self.state.cap
    }

    pub fn strokes(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Stroke { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl TextMeasurer for RecordingSurface {
    fn text_width(&self, text: &str, font: &Font) -> f64 {
        EstimatedMetrics.text_width(text, font)
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        self.ops.push(DrawOp::Restore);
    }

    fn transform(&mut self, affine: Affine) {
        self.state.transform *= affine;
        self.ops.push(DrawOp::Transform(affine));
    }

    fn set_transform(&mut self, affine: Affine) {
        self.state.transform = affine;
        self.ops.push(DrawOp::SetTransform(affine));
    }

    fn set_stroke(&mut self, color: Color, width: f64) {
        self.state.stroke = color;
        self.state.width = width;
    }

    fn set_fill(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha;
    }

    fn set_dash(&mut self, pattern: &[f64]) {
        self.state.dash = pattern.to_vec();
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.cap = cap;
    }

    fn stroke(&mut self, path: &BezPath) {
        self.ops.push(DrawOp::Stroke {
            path: path.clone(),
            color: self.state.stroke,
            width: self.state.width,
            alpha: self.state.alpha,
            dash: self.state.dash.clone(),
        });
    }

    fn fill(&mut self, path: &BezPath) {
        self.ops.push(DrawOp::Fill {
            path: path.clone(),
            color: self.state.fill,
            alpha: self.state.alpha,
        });
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::FillRect {
            rect,
            color: self.state.fill,
            alpha: self.state.alpha,
        });
    }

    fn clear(&mut self, color: Color) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn set_font(&mut self, font: &Font) {
        self.state.font = font.clone();
    }

    fn fill_text(&mut self, text: &str, origin: Point, align: TextAlign, baseline: TextBaseline) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            origin,
            font: self.state.font.clone(),
            align,
            baseline,
        });
    }

    fn draw_image(&mut self, image: ImageHandle, dest: Rect) {
        self.ops.push(DrawOp::Image {
            image,
            dest,
            alpha: self.state.alpha,
        });
    }

    fn draw_symbol(&mut self, name: &str, size: f64) -> bool {
        if !self.glyphs.iter().any(|g| g == name) {
            return false;
        }
        self.ops.push(DrawOp::Symbol {
            name: name.to_string(),
            size,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_css() {
        let font = Font::new(14.0, "sans-serif", "bold");
        assert_eq!(font.css(), "bold 14px sans-serif");
    }

    #[test]
    fn test_estimated_metrics() {
        let width = EstimatedMetrics.text_width("abcd", &Font::sans(10.0));
        assert!((width - 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_save_restore_state() {
        let mut surface = RecordingSurface::new();
        surface.save();
        surface.set_alpha(0.5);
        surface.set_dash(&[4.0, 2.0]);
        assert_eq!(surface.depth(), 1);
        surface.restore();
        assert_eq!(surface.depth(), 0);
        assert!((surface.alpha() - 1.0).abs() < f64::EPSILON);
        assert!(surface.dash().is_empty());
    }

    #[test]
    fn test_stroke_records_state() {
        let mut surface = RecordingSurface::new();
        surface.set_stroke(Color::from_rgba8(255, 0, 0, 255), 3.0);
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        surface.stroke(&path);
        match &surface.ops()[0] {
            DrawOp::Stroke { width, .. } => assert!((width - 3.0).abs() < f64::EPSILON),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_symbol_glyph_lookup() {
        let mut surface = RecordingSurface::with_glyphs(["valve"]);
        assert!(surface.draw_symbol("valve", 30.0));
        assert!(!surface.draw_symbol("drain", 30.0));
        assert_eq!(surface.ops().len(), 1);
    }
}
