//! Paint pass over a [`Surface`].

use fieldsketch_core::canvas::Canvas;
use fieldsketch_core::grid::GridLines;
use fieldsketch_core::selection::HANDLE_SIZE;
use fieldsketch_core::surface::Surface;
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape as KurboShape};
use peniko::Color;

/// Radius of tool vertex markers, in world units.
const MARKER_RADIUS: f64 = 3.0;

/// Grid line colors and widths, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub minor_color: Color,
    pub minor_width: f64,
    pub major_color: Color,
    pub major_width: f64,
    pub origin_color: Color,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            minor_color: Color::from_rgba8(100, 120, 160, 38),
            minor_width: 0.5,
            major_color: Color::from_rgba8(100, 120, 160, 77),
            major_width: 1.0,
            origin_color: Color::from_rgba8(233, 69, 96, 77),
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Cleared behind everything.
    pub background_color: Color,
    pub grid_style: GridStyle,
    /// Selection box and handle outline color.
    pub selection_color: Color,
    /// Opacity multiplier for the tool preview.
    pub preview_alpha: f64,
}

impl<'a> RenderContext<'a> {
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            background_color: Color::from_rgba8(0x1a, 0x1a, 0x2e, 255),
            grid_style: GridStyle::default(),
            selection_color: Color::from_rgba8(0xe9, 0x45, 0x60, 255),
            preview_alpha: 0.6,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    pub fn with_preview_alpha(mut self, alpha: f64) -> Self {
        self.preview_alpha = alpha.clamp(0.0, 1.0);
        self
    }
}

/// Paints a canvas: background, grid, visible layers, selection handles and
/// the tool preview, in that order.
#[derive(Debug, Default)]
pub struct Renderer {
    frames: u64,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paint passes run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frame callback: paint only if something changed since the last frame.
    pub fn frame(&mut self, canvas: &mut Canvas, surface: &mut dyn Surface) -> bool {
        if !canvas.begin_frame() {
            return false;
        }
        self.paint(&RenderContext::new(canvas), surface);
        true
    }

    /// Unconditional paint pass.
    pub fn paint(&mut self, ctx: &RenderContext<'_>, surface: &mut dyn Surface) {
        self.frames += 1;
        log::trace!("Painting frame {}", self.frames);
        let viewport = ctx.canvas.viewport();
        let screen = Affine::scale(viewport.device_pixel_ratio);

        surface.set_transform(screen);
        surface.clear(ctx.background_color);

        self.paint_grid(ctx, surface, screen);
        self.paint_layers(ctx, surface);
        self.paint_selection(ctx, surface, screen);
        self.paint_preview(ctx, surface);

        surface.set_transform(Affine::IDENTITY);
    }

    fn paint_grid(&self, ctx: &RenderContext<'_>, surface: &mut dyn Surface, screen: Affine) {
        let viewport = ctx.canvas.viewport();
        let grid = ctx.canvas.grid();
        if !grid.is_drawable(viewport.zoom) {
            return;
        }
        let GridLines {
            minor_x,
            minor_y,
            major_x,
            major_y,
        } = grid.lines(viewport.visible_world_rect(), viewport.zoom);
        let size = viewport.size;
        let style = &ctx.grid_style;

        // Grid lines are stroked in screen space so widths stay constant.
        let to_screen_x = |x: &f64| x * viewport.zoom + viewport.pan.x;
        let to_screen_y = |y: &f64| y * viewport.zoom + viewport.pan.y;

        surface.save();
        surface.set_transform(screen);
        surface.set_dash(&[]);

        surface.set_stroke(style.minor_color, style.minor_width);
        surface.stroke(&axis_lines(
            minor_x.iter().map(to_screen_x),
            minor_y.iter().map(to_screen_y),
            size.width,
            size.height,
        ));

        surface.set_stroke(style.major_color, style.major_width);
        surface.stroke(&axis_lines(
            major_x.iter().map(to_screen_x),
            major_y.iter().map(to_screen_y),
            size.width,
            size.height,
        ));

        surface.set_stroke(style.origin_color, 1.0);
        surface.stroke(&axis_lines(
            std::iter::once(viewport.pan.x),
            std::iter::once(viewport.pan.y),
            size.width,
            size.height,
        ));
        surface.restore();
    }

    fn paint_layers(&self, ctx: &RenderContext<'_>, surface: &mut dyn Surface) {
        surface.save();
        surface.set_transform(ctx.canvas.viewport().surface_transform());
        for layer in ctx.canvas.project().layers().iter().filter(|l| l.visible) {
            for shape in &layer.shapes {
                shape.draw(surface);
            }
        }
        surface.restore();
    }

    fn paint_selection(&self, ctx: &RenderContext<'_>, surface: &mut dyn Surface, screen: Affine) {
        let Some(bounds) = ctx.canvas.selected_shape().and_then(|shape| shape.bounds()) else {
            return;
        };
        let viewport = ctx.canvas.viewport();

        surface.save();
        surface.set_transform(screen);

        let outline = Rect::from_points(
            viewport.world_to_screen(Point::new(bounds.x0, bounds.y0)),
            viewport.world_to_screen(Point::new(bounds.x1, bounds.y1)),
        );
        surface.set_stroke(ctx.selection_color, 1.0);
        surface.set_dash(&[4.0, 4.0]);
        surface.stroke(&outline.to_path(0.1));
        surface.set_dash(&[]);

        surface.set_fill(Color::WHITE);
        surface.set_stroke(ctx.selection_color, 1.5);
        for handle in ctx.canvas.selection().handles() {
            let center = viewport.world_to_screen(handle.position);
            let square = Rect::from_center_size(center, (HANDLE_SIZE, HANDLE_SIZE)).to_path(0.1);
            surface.fill(&square);
            surface.stroke(&square);
        }
        surface.restore();
    }

    fn paint_preview(&self, ctx: &RenderContext<'_>, surface: &mut dyn Surface) {
        let preview = ctx.canvas.tool_preview();
        let markers = ctx.canvas.tools().preview_markers();
        if preview.is_none() && markers.is_empty() {
            return;
        }

        surface.save();
        surface.set_transform(ctx.canvas.viewport().surface_transform());
        if let Some(mut shape) = preview {
            shape.style_mut().opacity *= ctx.preview_alpha;
            shape.draw(surface);
        }
        if !markers.is_empty() {
            let color: Color = ctx.canvas.tools().settings.style.stroke_color.into();
            surface.set_alpha(ctx.preview_alpha);
            surface.set_dash(&[]);
            surface.set_fill(color);
            for point in markers {
                surface.fill(&Circle::new(point, MARKER_RADIUS).to_path(0.1));
            }
        }
        surface.restore();
    }
}

/// Full-height vertical lines at `xs` and full-width horizontal lines at `ys`.
fn axis_lines(
    xs: impl Iterator<Item = f64>,
    ys: impl Iterator<Item = f64>,
    width: f64,
    height: f64,
) -> BezPath {
    let mut path = BezPath::new();
    for x in xs {
        path.move_to((x, 0.0));
        path.line_to((x, height));
    }
    for y in ys {
        path.move_to((0.0, y));
        path.line_to((width, y));
    }
    path
}
