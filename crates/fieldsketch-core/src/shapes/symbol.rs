//! Symbol stamps from the field catalog.

use super::{Drawable, ShapeId, ShapeStyle};
use crate::geometry::point_in_rect;
use crate::surface::{Font, Surface, TextAlign, TextBaseline};
use kurbo::{Affine, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolCategory {
    Electrical,
    Plumbing,
    Structural,
}

/// Catalog entry. Glyphs themselves are supplied by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolDef {
    pub key: &'static str,
    pub label: &'static str,
    pub category: SymbolCategory,
}

const fn def(key: &'static str, label: &'static str, category: SymbolCategory) -> SymbolDef {
    SymbolDef {
        key,
        label,
        category,
    }
}

pub const SYMBOL_CATALOG: [SymbolDef; 16] = [
    def("outlet", "Outlet", SymbolCategory::Electrical),
    def("switch", "Switch", SymbolCategory::Electrical),
    def("light", "Light", SymbolCategory::Electrical),
    def("panel", "Panel", SymbolCategory::Electrical),
    def("valve", "Valve", SymbolCategory::Plumbing),
    def("drain", "Drain", SymbolCategory::Plumbing),
    def("faucet", "Faucet", SymbolCategory::Plumbing),
    def("cleanout", "Cleanout", SymbolCategory::Plumbing),
    def("defect", "Defect", SymbolCategory::Structural),
    def("ok", "OK", SymbolCategory::Structural),
    def("crack", "Crack", SymbolCategory::Structural),
    def("moisture", "Moisture", SymbolCategory::Structural),
    def("photo", "Photo Pt", SymbolCategory::Structural),
    def("note", "Note", SymbolCategory::Structural),
    def("north", "North", SymbolCategory::Structural),
    def("elevation", "Elevation", SymbolCategory::Structural),
];

impl SymbolDef {
    pub fn lookup(key: &str) -> Option<&'static SymbolDef> {
        SYMBOL_CATALOG.iter().find(|d| d.key == key)
    }

    pub fn in_category(category: SymbolCategory) -> impl Iterator<Item = &'static SymbolDef> {
        SYMBOL_CATALOG.iter().filter(move |d| d.category == category)
    }
}

/// A catalog symbol stamped at a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Symbol {
    pub(crate) id: ShapeId,
    /// Center.
    pub x: f64,
    pub y: f64,
    /// Catalog key.
    pub symbol_type: String,
    /// Side length of the stamp.
    pub size: f64,
    /// Caption drawn under the stamp.
    pub label: String,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Default for Symbol {
    fn default() -> Self {
        Self {
            id: ShapeId::new(),
            x: 0.0,
            y: 0.0,
            symbol_type: "defect".to_string(),
            size: 30.0,
            label: String::new(),
            style: ShapeStyle::default(),
        }
    }
}

impl Symbol {
    pub fn new(center: Point, symbol_type: impl Into<String>) -> Self {
        Self {
            x: center.x,
            y: center.y,
            symbol_type: symbol_type.into(),
            ..Self::default()
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn def(&self) -> Option<&'static SymbolDef> {
        SymbolDef::lookup(&self.symbol_type)
    }

    fn stamp_rect(&self, half: f64) -> Rect {
        Rect::from_center_size(self.center(), (half * 2.0, half * 2.0))
    }

    /// Boxed initial for symbols the surface cannot draw.
    fn draw_placeholder(&self, surface: &mut dyn Surface) {
        let half = self.size / 2.0;
        surface.stroke(&Rect::new(-half, -half, half, half).to_path(0.1));
        let initial: String = self
            .def()
            .map(|d| d.label)
            .unwrap_or(self.symbol_type.as_str())
            .chars()
            .take(1)
            .collect();
        surface.set_font(&Font::sans(self.size * 0.5));
        surface.fill_text(&initial, Point::ZERO, TextAlign::Center, TextBaseline::Middle);
    }
}

impl Drawable for Symbol {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.stamp_rect(self.size / 2.0))
    }

    fn hit_test(&self, point: Point) -> bool {
        point_in_rect(point, self.stamp_rect(self.size / 2.0 + 4.0))
    }

    fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.style.apply(surface);
        surface.transform(Affine::translate(self.center().to_vec2()));
        surface.set_fill(self.style.stroke());
        if !surface.draw_symbol(&self.symbol_type, self.size) {
            self.draw_placeholder(surface);
        }
        if !self.label.is_empty() {
            surface.set_font(&Font::sans(self.size * 0.35));
            surface.fill_text(
                &self.label,
                Point::new(0.0, self.size * 0.5 + 4.0),
                TextAlign::Center,
                TextBaseline::Top,
            );
        }
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
    fn test_catalog_lookup() {
        assert_eq!(SymbolDef::lookup("photo").map(|d| d.label), Some("Photo Pt"));
        assert!(SymbolDef::lookup("unicorn").is_none());
        assert_eq!(SymbolDef::in_category(SymbolCategory::Plumbing).count(), 4);
        assert_eq!(SymbolDef::in_category(SymbolCategory::Structural).count(), 8);
    }

    #[test]
    fn test_hit_square() {
        let symbol = Symbol::new(Point::new(100.0, 100.0), "valve");
        assert!(symbol.hit_test(Point::new(118.0, 82.0)));
        assert!(!symbol.hit_test(Point::new(120.0, 100.0)));
    }

    #[test]
    fn test_bounds_centered() {
        let symbol = Symbol::new(Point::new(100.0, 100.0), "valve");
        assert_eq!(symbol.bounds(), Some(Rect::new(85.0, 85.0, 115.0, 115.0)));
    }

    #[test]
    fn test_surface_glyph_preferred() {
        let symbol = Symbol::new(Point::ZERO, "valve");
        let mut surface = RecordingSurface::with_glyphs(["valve"]);
        symbol.draw(&mut surface);
        assert!(surface.ops().iter().any(|op| matches!(op, DrawOp::Symbol { .. })));
        assert_eq!(surface.strokes().count(), 0);
    }

    #[test]
    fn test_placeholder_and_label() {
        let mut symbol = Symbol::new(Point::ZERO, "moisture");
        symbol.label = "Wet wall".to_string();
        let mut surface = RecordingSurface::new();
        symbol.draw(&mut surface);
        assert_eq!(surface.strokes().count(), 1);
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["M", "Wet wall"]);
    }
}
