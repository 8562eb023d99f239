//! Viewport: pan/zoom transform between screen pixels and world units.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Default zoom bounds.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 20.0;

/// Screen-space pan and zoom for the canvas.
///
/// `pan` is in CSS pixels; the device pixel ratio only enters the surface
/// transform, never the screen/world mapping. Transient, rebuilt on resize.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// World origin position on screen.
    pub pan: Vec2,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub device_pixel_ratio: f64,
    /// Viewport size in CSS pixels.
    pub size: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            device_pixel_ratio: 1.0,
            size: Size::ZERO,
        }
    }
}

impl Viewport {
    /// Viewport of the given size with the world origin centered.
    pub fn new(size: Size, device_pixel_ratio: f64) -> Self {
        let mut viewport = Self {
            size,
            device_pixel_ratio,
            ..Self::default()
        };
        viewport.reset_view();
        viewport
    }

    /// World to screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// World to device pixels, for the rendering surface.
    pub fn surface_transform(&self) -> Affine {
        Affine::scale(self.device_pixel_ratio) * self.transform()
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.pan.x,
            world.y * self.zoom + self.pan.y,
        )
    }

    /// Screen distance expressed in world units at the current zoom.
    pub fn screen_to_world_distance(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.pan += Vec2::new(dx, dy);
    }

    /// Scale zoom by `factor`, keeping the world point under `anchor` fixed.
    ///
    /// Out-of-range results are clamped; non-positive or non-finite factors
    /// are ignored.
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        let actual = new_zoom / self.zoom;
        let anchor = anchor.to_vec2();
        self.pan = anchor - (anchor - self.pan) * actual;
        self.zoom = new_zoom;
    }

    /// Set an absolute zoom level around the viewport center.
    pub fn set_zoom(&mut self, zoom: f64) {
        let center = Point::new(self.size.width / 2.0, self.size.height / 2.0);
        self.zoom_at(zoom / self.zoom, center);
    }

    /// Center the world origin at zoom 1.
    pub fn reset_view(&mut self) {
        self.pan = Vec2::new(self.size.width / 2.0, self.size.height / 2.0);
        self.zoom = 1.0;
    }

    /// Track a new screen size, keeping the view centered on the same world point.
    pub fn resize(&mut self, size: Size, device_pixel_ratio: f64) {
        let delta = Vec2::new(
            (size.width - self.size.width) / 2.0,
            (size.height - self.size.height) / 2.0,
        );
        self.pan += delta;
        self.size = size;
        self.device_pixel_ratio = device_pixel_ratio;
    }

    /// World-space rectangle currently on screen.
    pub fn visible_world_rect(&self) -> Rect {
        Rect::from_points(
            self.screen_to_world(Point::ZERO),
            self.screen_to_world(Point::new(self.size.width, self.size.height)),
        )
    }

    /// Zoom and pan so `bounds` fills the viewport minus `padding` pixels.
    pub fn fit_to_bounds(&mut self, bounds: Rect, padding: f64) {
        if bounds.width() <= 0.0 && bounds.height() <= 0.0 {
            self.reset_view();
            return;
        }

        let available = Size::new(
            (self.size.width - padding * 2.0).max(1.0),
            (self.size.height - padding * 2.0).max(1.0),
        );
        let scale_x = available.width / bounds.width().max(f64::EPSILON);
        let scale_y = available.height / bounds.height().max(f64::EPSILON);
        self.zoom = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);

        let center = bounds.center();
        self.pan = Vec2::new(
            self.size.width / 2.0 - center.x * self.zoom,
            self.size.height / 2.0 - center.y * self.zoom,
        );
    }
}
