//! Typed property access for undoable edits.

use super::{SerializableColor, Shape, ShapeError, StrokeStyle};
use crate::surface::TextAlign;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Editable property keys, named as in serialized records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    StrokeColor,
    StrokeWidth,
    StrokeStyle,
    FillColor,
    Opacity,
    Locked,
    Text,
    FontSize,
    FontFamily,
    FontWeight,
    TextAlign,
    Closed,
    Radius,
    StartAngle,
    EndAngle,
    Offset,
    Unit,
    Scale,
    TextOverride,
    Padding,
    HeadSize,
    DoubleHead,
    SymbolType,
    Size,
    Label,
}

impl Property {
    pub fn name(self) -> &'static str {
        match self {
            Property::StrokeColor => "strokeColor",
            Property::StrokeWidth => "strokeWidth",
            Property::StrokeStyle => "strokeStyle",
            Property::FillColor => "fillColor",
            Property::Opacity => "opacity",
            Property::Locked => "locked",
            Property::Text => "text",
            Property::FontSize => "fontSize",
            Property::FontFamily => "fontFamily",
            Property::FontWeight => "fontWeight",
            Property::TextAlign => "textAlign",
            Property::Closed => "closed",
            Property::Radius => "radius",
            Property::StartAngle => "startAngle",
            Property::EndAngle => "endAngle",
            Property::Offset => "offset",
            Property::Unit => "unit",
            Property::Scale => "scale",
            Property::TextOverride => "textOverride",
            Property::Padding => "padding",
            Property::HeadSize => "headSize",
            Property::DoubleHead => "doubleHead",
            Property::SymbolType => "symbolType",
            Property::Size => "size",
            Property::Label => "label",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Number(f64),
    Bool(bool),
    Text(String),
    /// Optional text; `None` clears it.
    OptionalText(Option<String>),
    /// Optional color; only fill accepts `None`.
    Color(Option<SerializableColor>),
    StrokeStyle(StrokeStyle),
    Align(TextAlign),
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<SerializableColor> for PropertyValue {
    fn from(value: SerializableColor) -> Self {
        PropertyValue::Color(Some(value))
    }
}

impl From<StrokeStyle> for PropertyValue {
    fn from(value: StrokeStyle) -> Self {
        PropertyValue::StrokeStyle(value)
    }
}

fn number(property: Property, value: PropertyValue) -> Result<f64, ShapeError> {
    match value {
        PropertyValue::Number(n) => Ok(n),
        _ => Err(ShapeError::PropertyType { property }),
    }
}

fn boolean(property: Property, value: PropertyValue) -> Result<bool, ShapeError> {
    match value {
        PropertyValue::Bool(b) => Ok(b),
        _ => Err(ShapeError::PropertyType { property }),
    }
}

fn text(property: Property, value: PropertyValue) -> Result<String, ShapeError> {
    match value {
        PropertyValue::Text(s) => Ok(s),
        _ => Err(ShapeError::PropertyType { property }),
    }
}

impl Shape {
    /// Current value, or `None` when this shape has no such property.
    pub fn property(&self, property: Property) -> Option<PropertyValue> {
        use PropertyValue as V;
        let style = self.style();
        let value = match (self, property) {
            (_, Property::StrokeColor) => V::Color(Some(style.stroke_color)),
            (_, Property::StrokeWidth) => V::Number(style.stroke_width),
            (_, Property::StrokeStyle) => V::StrokeStyle(style.stroke_style),
            (_, Property::FillColor) => V::Color(style.fill_color),
            (_, Property::Opacity) => V::Number(style.opacity),
            (_, Property::Locked) => V::Bool(style.locked),

            (Shape::Text(t), Property::Text) => V::Text(t.text.clone()),
            (Shape::Text(t), Property::FontSize) => V::Number(t.font_size),
            (Shape::Text(t), Property::FontFamily) => V::Text(t.font_family.clone()),
            (Shape::Text(t), Property::FontWeight) => V::Text(t.font_weight.clone()),
            (Shape::Text(t), Property::TextAlign) => V::Align(t.text_align),

            (Shape::Callout(c), Property::Text) => V::Text(c.text.clone()),
            (Shape::Callout(c), Property::FontSize) => V::Number(c.font_size),
            (Shape::Callout(c), Property::Padding) => V::Number(c.padding),

            (Shape::Polyline(p), Property::Closed) => V::Bool(p.closed),

            (Shape::Arc(a), Property::Radius) => V::Number(a.radius),
            (Shape::Arc(a), Property::StartAngle) => V::Number(a.start_angle),
            (Shape::Arc(a), Property::EndAngle) => V::Number(a.end_angle),

            (Shape::Dimension(d), Property::Offset) => V::Number(d.offset),
            (Shape::Dimension(d), Property::FontSize) => V::Number(d.font_size),
            (Shape::Dimension(d), Property::Unit) => V::Text(d.unit.clone()),
            (Shape::Dimension(d), Property::Scale) => V::Number(d.scale),
            (Shape::Dimension(d), Property::TextOverride) => V::OptionalText(d.text_override.clone()),

            (Shape::Arrow(a), Property::HeadSize) => V::Number(a.head_size),
            (Shape::Arrow(a), Property::DoubleHead) => V::Bool(a.double_head),

            (Shape::Symbol(s), Property::SymbolType) => V::Text(s.symbol_type.clone()),
            (Shape::Symbol(s), Property::Size) => V::Number(s.size),
            (Shape::Symbol(s), Property::Label) => V::Text(s.label.clone()),

            _ => return None,
        };
        Some(value)
    }

    /// Set a property, rejecting keys this shape lacks and mistyped values.
    pub fn set_property(&mut self, property: Property, value: PropertyValue) -> Result<(), ShapeError> {
        let p = property;
        match property {
            Property::StrokeColor => match value {
                PropertyValue::Color(Some(color)) => self.style_mut().stroke_color = color,
                _ => return Err(ShapeError::PropertyType { property }),
            },
            Property::FillColor => match value {
                PropertyValue::Color(color) => self.style_mut().fill_color = color,
                _ => return Err(ShapeError::PropertyType { property }),
            },
            Property::StrokeStyle => match value {
                PropertyValue::StrokeStyle(style) => self.style_mut().stroke_style = style,
                _ => return Err(ShapeError::PropertyType { property }),
            },
            Property::StrokeWidth => self.style_mut().stroke_width = number(p, value)?,
            Property::Opacity => self.style_mut().opacity = number(p, value)?.clamp(0.0, 1.0),
            Property::Locked => self.style_mut().locked = boolean(p, value)?,
            _ => return self.set_variant_property(property, value),
        }
        Ok(())
    }

    fn set_variant_property(&mut self, p: Property, value: PropertyValue) -> Result<(), ShapeError> {
        let kind = self.kind();
        match (self, p) {
            (Shape::Text(t), Property::Text) => t.set_text(text(p, value)?),
            (Shape::Text(t), Property::FontSize) => {
                t.font_size = number(p, value)?;
                t.invalidate_measure();
            }
            (Shape::Text(t), Property::FontFamily) => {
                t.font_family = text(p, value)?;
                t.invalidate_measure();
            }
            (Shape::Text(t), Property::FontWeight) => {
                t.font_weight = text(p, value)?;
                t.invalidate_measure();
            }
            (Shape::Text(t), Property::TextAlign) => match value {
                PropertyValue::Align(align) => {
                    t.text_align = align;
                    t.invalidate_measure();
                }
                _ => return Err(ShapeError::PropertyType { property: p }),
            },

            (Shape::Callout(c), Property::Text) => c.set_text(text(p, value)?),
            (Shape::Callout(c), Property::FontSize) => {
                c.font_size = number(p, value)?;
                c.invalidate_measure();
            }
            (Shape::Callout(c), Property::Padding) => {
                c.padding = number(p, value)?;
                c.invalidate_measure();
            }

            (Shape::Polyline(poly), Property::Closed) => poly.closed = boolean(p, value)?,

            (Shape::Arc(a), Property::Radius) => a.radius = number(p, value)?,
            (Shape::Arc(a), Property::StartAngle) => a.start_angle = number(p, value)?,
            (Shape::Arc(a), Property::EndAngle) => a.end_angle = number(p, value)?,

            (Shape::Dimension(d), Property::Offset) => d.offset = number(p, value)?,
            (Shape::Dimension(d), Property::FontSize) => d.font_size = number(p, value)?,
            (Shape::Dimension(d), Property::Unit) => d.unit = text(p, value)?,
            (Shape::Dimension(d), Property::Scale) => d.scale = number(p, value)?,
            (Shape::Dimension(d), Property::TextOverride) => match value {
                PropertyValue::OptionalText(t) => d.text_override = t,
                PropertyValue::Text(t) => d.text_override = Some(t),
                _ => return Err(ShapeError::PropertyType { property: p }),
            },

            (Shape::Arrow(a), Property::HeadSize) => a.head_size = number(p, value)?,
            (Shape::Arrow(a), Property::DoubleHead) => a.double_head = boolean(p, value)?,

            (Shape::Symbol(s), Property::SymbolType) => s.symbol_type = text(p, value)?,
            (Shape::Symbol(s), Property::Size) => s.size = number(p, value)?,
            (Shape::Symbol(s), Property::Label) => s.label = text(p, value)?,

            _ => return Err(ShapeError::UnsupportedProperty { kind, property: p }),
        }
        Ok(())
    }
}
