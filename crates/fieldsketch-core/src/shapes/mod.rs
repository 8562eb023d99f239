//! Drawable shapes.
//!
//! Each variant owns its geometry and style and implements [`Drawable`]. The
//! [`Shape`] enum is the serialized form: records are tagged by a `type` key
//! and resolved through [`ShapeKind`].

mod arc;
mod arrow;
mod callout;
mod dimension;
mod ellipse;
mod freehand;
mod image;
mod line;
mod polyline;
mod property;
mod rectangle;
mod symbol;
mod text;

pub use arc::Arc;
pub use arrow::Arrow;
pub use callout::Callout;
pub use dimension::Dimension;
pub use ellipse::Ellipse;
pub use freehand::Freehand;
pub use image::{Image, ImageFormat, ImageLoad};
pub use line::Line;
pub use polyline::Polyline;
pub use property::{Property, PropertyValue};
pub use rectangle::Rectangle;
pub use symbol::{SYMBOL_CATALOG, Symbol, SymbolCategory, SymbolDef};
pub use text::TextLabel;

use crate::surface::{LineCap, Surface, TextMeasurer};
use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Smallest hit band around stroked geometry, in world units.
pub const MIN_HIT_TOLERANCE: f64 = 6.0;

/// Background painted behind dimension and callout labels.
pub const LABEL_BACKGROUND: SerializableColor = SerializableColor::new(0x1a, 0x1a, 0x2e, 0xff);

/// Hit band for a stroke of the given width.
pub fn hit_tolerance(stroke_width: f64) -> f64 {
    (stroke_width / 2.0 + 4.0).max(MIN_HIT_TOLERANCE)
}

/// Errors raised while decoding or editing shapes.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("shape record has no type")]
    MissingType,

    #[error("unknown shape type: {0}")]
    UnknownType(String),

    #[error("malformed {kind} record: {source}")]
    Malformed {
        kind: ShapeKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} has no property {property}")]
    UnsupportedProperty { kind: ShapeKind, property: Property },

    #[error("wrong value type for {property}")]
    PropertyType { property: Property },
}

/// Serializable color representation (RGBA8), stored as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::rgb(digits.next()??, digits.next()??, digits.next()??))
            }
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl Serialize for SerializableColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SerializableColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {raw}")))
    }
}

/// Stroke dash style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Cycle to the next stroke style.
    pub fn next(self) -> Self {
        match self {
            StrokeStyle::Solid => StrokeStyle::Dashed,
            StrokeStyle::Dashed => StrokeStyle::Dotted,
            StrokeStyle::Dotted => StrokeStyle::Solid,
        }
    }

    /// Dash pattern scaled by stroke width; empty for solid.
    pub fn dash_pattern(self, width: f64) -> Vec<f64> {
        match self {
            StrokeStyle::Solid => Vec::new(),
            StrokeStyle::Dashed => vec![width * 4.0, width * 3.0],
            StrokeStyle::Dotted => vec![width, width * 2.0],
        }
    }
}

/// Style properties shared by every shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    #[serde(default = "SerializableColor::black")]
    pub stroke_color: SerializableColor,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
    /// Fill color (None = no fill).
    #[serde(default)]
    pub fill_color: Option<SerializableColor>,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Locked shapes cannot be picked.
    #[serde(default)]
    pub locked: bool,
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: default_stroke_width(),
            stroke_style: StrokeStyle::Solid,
            fill_color: None,
            opacity: default_opacity(),
            locked: false,
        }
    }
}

impl ShapeStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(Into::into)
    }

    pub fn is_filled(&self) -> bool {
        self.fill_color.is_some()
    }

    pub fn hit_tolerance(&self) -> f64 {
        hit_tolerance(self.stroke_width)
    }

    /// Load stroke, fill, alpha, dash and round caps onto the surface.
    pub fn apply(&self, surface: &mut dyn Surface) {
        surface.set_stroke(self.stroke(), self.stroke_width);
        surface.set_alpha(self.opacity.clamp(0.0, 1.0));
        surface.set_line_cap(LineCap::Round);
        surface.set_dash(&self.stroke_style.dash_pattern(self.stroke_width));
        if let Some(fill) = self.fill() {
            surface.set_fill(fill);
        }
    }
}

/// Unique identifier for shapes.
///
/// Ids are opaque strings so records written by older builds keep their ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capabilities every shape variant provides.
pub trait Drawable {
    /// Get the unique identifier.
    fn id(&self) -> &ShapeId;

    /// Axis-aligned bounds in world space, `None` for empty geometry.
    fn bounds(&self) -> Option<Rect>;

    /// Check if a world point lies on (or, when filled, inside) the shape.
    fn hit_test(&self, point: Point) -> bool;

    /// Shift all geometry by `delta`.
    fn translate(&mut self, delta: Vec2);

    /// Paint onto the surface. Surface state is restored by [`Shape::draw`].
    fn draw(&self, surface: &mut dyn Surface);

    fn style(&self) -> &ShapeStyle;

    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Recompute cached text metrics. Shapes without text ignore this.
    fn measure(&mut self, _measurer: &dyn TextMeasurer) {}
}

/// Record type keys, one per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    #[serde(rename = "rect")]
    Rectangle,
    #[serde(rename = "circle")]
    Ellipse,
    Arc,
    Polyline,
    Freehand,
    Text,
    Dimension,
    Callout,
    Arrow,
    Symbol,
    Image,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 12] = [
        ShapeKind::Line,
        ShapeKind::Rectangle,
        ShapeKind::Ellipse,
        ShapeKind::Arc,
        ShapeKind::Polyline,
        ShapeKind::Freehand,
        ShapeKind::Text,
        ShapeKind::Dimension,
        ShapeKind::Callout,
        ShapeKind::Arrow,
        ShapeKind::Symbol,
        ShapeKind::Image,
    ];

    /// Value of the `type` key in serialized records.
    pub fn type_name(self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Rectangle => "rect",
            ShapeKind::Ellipse => "circle",
            ShapeKind::Arc => "arc",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Freehand => "freehand",
            ShapeKind::Text => "text",
            ShapeKind::Dimension => "dimension",
            ShapeKind::Callout => "callout",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Symbol => "symbol",
            ShapeKind::Image => "image",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Enum wrapper for all shape types (for serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Line(Line),
    #[serde(rename = "rect")]
    Rectangle(Rectangle),
    #[serde(rename = "circle")]
    Ellipse(Ellipse),
    Arc(Arc),
    Polyline(Polyline),
    Freehand(Freehand),
    Text(TextLabel),
    Dimension(Dimension),
    Callout(Callout),
    Arrow(Arrow),
    Symbol(Symbol),
    Image(Image),
}

impl Shape {
    /// Decode one object record.
    ///
    /// Unknown `type` keys are reported separately from malformed records of a
    /// known type so loaders can skip the former quietly.
    pub fn from_record(record: serde_json::Value) -> Result<Shape, ShapeError> {
        let kind = {
            let type_name = record
                .get("type")
                .and_then(serde_json::Value::as_str)
                .ok_or(ShapeError::MissingType)?;
            ShapeKind::from_type_name(type_name)
                .ok_or_else(|| ShapeError::UnknownType(type_name.to_string()))?
        };
        serde_json::from_value(record).map_err(|source| ShapeError::Malformed { kind, source })
    }

    /// Encode into a plain record.
    pub fn to_record(&self) -> serde_json::Value {
        // Every field is a string, number, bool, null or array of points.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Line(_) => ShapeKind::Line,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Arc(_) => ShapeKind::Arc,
            Shape::Polyline(_) => ShapeKind::Polyline,
            Shape::Freehand(_) => ShapeKind::Freehand,
            Shape::Text(_) => ShapeKind::Text,
            Shape::Dimension(_) => ShapeKind::Dimension,
            Shape::Callout(_) => ShapeKind::Callout,
            Shape::Arrow(_) => ShapeKind::Arrow,
            Shape::Symbol(_) => ShapeKind::Symbol,
            Shape::Image(_) => ShapeKind::Image,
        }
    }

    fn as_drawable(&self) -> &dyn Drawable {
        match self {
            Shape::Line(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Arc(s) => s,
            Shape::Polyline(s) => s,
            Shape::Freehand(s) => s,
            Shape::Text(s) => s,
            Shape::Dimension(s) => s,
            Shape::Callout(s) => s,
            Shape::Arrow(s) => s,
            Shape::Symbol(s) => s,
            Shape::Image(s) => s,
        }
    }

    fn as_drawable_mut(&mut self) -> &mut dyn Drawable {
        match self {
            Shape::Line(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Arc(s) => s,
            Shape::Polyline(s) => s,
            Shape::Freehand(s) => s,
            Shape::Text(s) => s,
            Shape::Dimension(s) => s,
            Shape::Callout(s) => s,
            Shape::Arrow(s) => s,
            Shape::Symbol(s) => s,
            Shape::Image(s) => s,
        }
    }

    pub fn id(&self) -> &ShapeId {
        self.as_drawable().id()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.as_drawable().bounds()
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.as_drawable().hit_test(point)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.as_drawable_mut().translate(delta);
    }

    /// Paint inside a save/restore pair so no style leaks to the next shape.
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.save();
        self.as_drawable().draw(surface);
        surface.restore();
    }

    pub fn measure(&mut self, measurer: &dyn TextMeasurer) {
        self.as_drawable_mut().measure(measurer);
    }

    pub fn style(&self) -> &ShapeStyle {
        self.as_drawable().style()
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.as_drawable_mut().style_mut()
    }

    pub fn is_locked(&self) -> bool {
        self.style().locked
    }

    /// Copy with a fresh id, for duplicate and paste.
    pub fn duplicate(&self) -> Shape {
        let mut copy = self.clone();
        copy.regenerate_id();
        copy
    }

    /// Regenerate the shape's ID with a new unique identifier.
    pub fn regenerate_id(&mut self) {
        let new_id = ShapeId::new();
        match self {
            Shape::Line(s) => s.id = new_id,
            Shape::Rectangle(s) => s.id = new_id,
            Shape::Ellipse(s) => s.id = new_id,
            Shape::Arc(s) => s.id = new_id,
            Shape::Polyline(s) => s.id = new_id,
            Shape::Freehand(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
            Shape::Dimension(s) => s.id = new_id,
            Shape::Callout(s) => s.id = new_id,
            Shape::Arrow(s) => s.id = new_id,
            Shape::Symbol(s) => s.id = new_id,
            Shape::Image(s) => s.id = new_id,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Shape::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut Image> {
        match self {
            Shape::Image(img) => Some(img),
            _ => None,
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Shape {
                fn from(shape: $ty) -> Self {
                    Shape::$variant(shape)
                }
            }
        )*
    };
}

impl_from_variant!(
    Line(Line),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Arc(Arc),
    Polyline(Polyline),
    Freehand(Freehand),
    Text(TextLabel),
    Dimension(Dimension),
    Callout(Callout),
    Arrow(Arrow),
    Symbol(Symbol),
    Image(Image),
);

/// Open path through `points`, optionally closed.
pub(crate) fn polyline_path(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        if closed {
            path.close_path();
        }
    }
    path
}

/// Two-point segment path.
pub(crate) fn segment_path(a: Point, b: Point) -> BezPath {
    polyline_path(&[a, b], false)
}

/// Filled dot used to mark anchor points.
pub(crate) fn dot_path(center: Point, radius: f64) -> BezPath {
    use kurbo::Shape as _;
    kurbo::Circle::new(center, radius).to_path(0.1)
}

/// Two head strokes meeting at `tip`, pointing along `angle`.
pub(crate) fn arrow_head(path: &mut BezPath, tip: Point, angle: f64, length: f64, spread: f64) {
    for side in [angle - spread, angle + spread] {
        path.move_to(tip);
        path.line_to(Point::new(
            tip.x - length * side.cos(),
            tip.y - length * side.sin(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use serde_json::json;

    #[test]
    fn test_color_hex_roundtrip() {
        let color = SerializableColor::from_hex("#0066cc").unwrap();
        assert_eq!(color, SerializableColor::rgb(0x00, 0x66, 0xcc));
        assert_eq!(color.to_hex(), "#0066cc");

        let short = SerializableColor::from_hex("#fff").unwrap();
        assert_eq!(short, SerializableColor::white());

        let translucent = SerializableColor::from_hex("#ff000080").unwrap();
        assert_eq!(translucent.a, 0x80);
        assert_eq!(translucent.to_hex(), "#ff000080");

        assert!(SerializableColor::from_hex("red").is_none());
        assert!(SerializableColor::from_hex("#12345").is_none());
    }

    #[test]
    fn test_hit_tolerance_floor() {
        assert!((hit_tolerance(2.0) - 6.0).abs() < f64::EPSILON);
        assert!((hit_tolerance(10.0) - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dash_patterns() {
        assert!(StrokeStyle::Solid.dash_pattern(2.0).is_empty());
        assert_eq!(StrokeStyle::Dashed.dash_pattern(2.0), vec![8.0, 6.0]);
        assert_eq!(StrokeStyle::Dotted.dash_pattern(2.0), vec![2.0, 4.0]);
    }

    #[test]
    fn test_kind_lookup() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(ShapeKind::from_type_name("hexagon"), None);
    }

    #[test]
    fn test_record_uses_type_key() {
        let shape = Shape::from(Rectangle::new(Point::new(1.0, 2.0), 3.0, 4.0));
        let record = shape.to_record();
        assert_eq!(record["type"], "rect");
        assert_eq!(record["strokeColor"], "#000000");
        assert_eq!(record["w"], 3.0);
    }

    #[test]
    fn test_from_record_unknown_type() {
        let err = Shape::from_record(json!({"type": "hexagon", "x": 1})).unwrap_err();
        assert!(matches!(err, ShapeError::UnknownType(ref t) if t == "hexagon"));

        let err = Shape::from_record(json!({"x": 1})).unwrap_err();
        assert!(matches!(err, ShapeError::MissingType));
    }

    #[test]
    fn test_from_record_malformed() {
        let err = Shape::from_record(json!({"type": "line", "x1": "left"})).unwrap_err();
        assert!(matches!(err, ShapeError::Malformed { kind: ShapeKind::Line, .. }));
    }

    #[test]
    fn test_from_record_defaults_missing_fields() {
        let shape = Shape::from_record(json!({"type": "circle", "cx": 5})).unwrap();
        let Shape::Ellipse(ellipse) = &shape else {
            panic!("expected ellipse");
        };
        assert!((ellipse.cx - 5.0).abs() < f64::EPSILON);
        assert!(ellipse.rx.abs() < f64::EPSILON);
        assert_eq!(ellipse.style, ShapeStyle::default());
        assert!(!shape.id().as_str().is_empty());
    }

    #[test]
    fn test_legacy_id_is_kept() {
        let shape = Shape::from_record(json!({"type": "line", "id": "obj_1700000000000_3"})).unwrap();
        assert_eq!(shape.id().as_str(), "obj_1700000000000_3");
    }

    #[test]
    fn test_draw_restores_surface_state() {
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        line.style.stroke_style = StrokeStyle::Dashed;
        line.style.opacity = 0.3;
        let shape = Shape::from(line);

        let mut surface = RecordingSurface::new();
        shape.draw(&mut surface);
        assert_eq!(surface.depth(), 0);
        assert!((surface.alpha() - 1.0).abs() < f64::EPSILON);
        assert!(surface.dash().is_empty());
        assert_eq!(surface.strokes().count(), 1);
    }

    #[test]
    fn test_duplicate_gets_new_id() {
        let shape = Shape::from(Line::new(Point::ZERO, Point::new(5.0, 5.0)));
        let copy = shape.duplicate();
        assert_ne!(shape.id(), copy.id());
        assert_eq!(shape.bounds(), copy.bounds());
    }
}
