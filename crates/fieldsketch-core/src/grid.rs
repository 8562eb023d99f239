//! World-space grid and point snapping.

use kurbo::{Point, Rect};

/// Default grid spacing in world units.
pub const GRID_SIZE: f64 = 20.0;

/// Every n-th line is drawn as a major line.
pub const MAJOR_EVERY: u32 = 5;

/// Lines closer than this on screen are not drawn.
pub const MIN_SCREEN_SPACING: f64 = 4.0;

/// Grid settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub size: f64,
    pub major_every: u32,
    pub visible: bool,
    pub snap_enabled: bool,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            size: GRID_SIZE,
            major_every: MAJOR_EVERY,
            visible: true,
            snap_enabled: false,
        }
    }
}

/// Grid line positions covering a world rectangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLines {
    /// x positions of vertical minor lines.
    pub minor_x: Vec<f64>,
    pub minor_y: Vec<f64>,
    pub major_x: Vec<f64>,
    pub major_y: Vec<f64>,
}

impl GridLines {
    pub fn is_empty(&self) -> bool {
        self.minor_x.is_empty()
            && self.minor_y.is_empty()
            && self.major_x.is_empty()
            && self.major_y.is_empty()
    }
}

impl Grid {
    pub fn with_size(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Nearest grid intersection.
    pub fn snap(&self, point: Point) -> Point {
        if self.size <= 0.0 {
            return point;
        }
        Point::new(
            (point.x / self.size).round() * self.size,
            (point.y / self.size).round() * self.size,
        )
    }

    /// Snap only when snapping is on.
    pub fn snap_if_enabled(&self, point: Point) -> Point {
        if self.snap_enabled {
            self.snap(point)
        } else {
            point
        }
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.snap_enabled = !self.snap_enabled;
        self.snap_enabled
    }

    /// Whether lines are far enough apart on screen to draw at `zoom`.
    pub fn is_drawable(&self, zoom: f64) -> bool {
        self.visible && self.size > 0.0 && self.size * zoom >= MIN_SCREEN_SPACING
    }

    /// Lines inside `visible` (world space), split into minor and major.
    pub fn lines(&self, visible: Rect, zoom: f64) -> GridLines {
        if !self.is_drawable(zoom) {
            return GridLines::default();
        }
        let (minor_x, major_x) = self.axis(visible.x0, visible.x1);
        let (minor_y, major_y) = self.axis(visible.y0, visible.y1);
        GridLines {
            minor_x,
            minor_y,
            major_x,
            major_y,
        }
    }

    fn axis(&self, from: f64, to: f64) -> (Vec<f64>, Vec<f64>) {
        let mut minor = Vec::new();
        let mut major = Vec::new();
        let first = (from / self.size).floor() as i64;
        let last = (to / self.size).ceil() as i64;
        let every = i64::from(self.major_every.max(1));
        for i in first..=last {
            let pos = i as f64 * self.size;
            if i.rem_euclid(every) == 0 {
                major.push(pos);
            } else {
                minor.push(pos);
            }
        }
        (minor, major)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let grid = Grid::default();
        let snapped = grid.snap(Point::new(15.0, 25.0));
        assert!((snapped.x - 20.0).abs() < f64::EPSILON);
        assert!((snapped.y - 20.0).abs() < f64::EPSILON);

        let snapped = grid.snap(Point::new(-31.0, 9.0));
        assert!((snapped.x + 40.0).abs() < f64::EPSILON);
        assert!(snapped.y.abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_if_enabled() {
        let mut grid = Grid::default();
        let p = Point::new(13.0, 7.0);
        assert_eq!(grid.snap_if_enabled(p), p);
        assert!(grid.toggle_snap());
        assert_eq!(grid.snap_if_enabled(p), Point::new(20.0, 0.0));
    }

    #[test]
    fn test_visibility_threshold() {
        let grid = Grid::default();
        assert!(grid.is_drawable(0.2));
        assert!(!grid.is_drawable(0.19));

        let hidden = Grid {
            visible: false,
            ..Grid::default()
        };
        assert!(!hidden.is_drawable(1.0));
    }

    #[test]
    fn test_lines_split_major_minor() {
        let grid = Grid::default();
        let lines = grid.lines(Rect::new(-10.0, 0.0, 110.0, 40.0), 1.0);
        assert_eq!(lines.major_x, vec![0.0, 100.0]);
        assert_eq!(lines.minor_x, vec![-20.0, 20.0, 40.0, 60.0, 80.0, 120.0]);
        assert_eq!(lines.major_y, vec![0.0]);
        assert_eq!(lines.minor_y, vec![20.0, 40.0]);
    }

    #[test]
    fn test_no_lines_when_too_dense() {
        let grid = Grid::default();
        assert!(grid.lines(Rect::new(0.0, 0.0, 1000.0, 1000.0), 0.1).is_empty());
    }
}
