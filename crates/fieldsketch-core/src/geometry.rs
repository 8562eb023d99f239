//! Geometry helpers shared by shapes, selection and tools.
//!
//! Everything here is a pure function over `kurbo` primitives.

use kurbo::{Point, Rect, Vec2};

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Angle of the vector `from -> to` in radians, as returned by `atan2`.
pub fn angle(from: Point, to: Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Midpoint of a segment.
pub fn midpoint(a: Point, b: Point) -> Point {
    a.midpoint(b)
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq == 0.0 {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
///
/// A single point degenerates to plain point distance; an empty slice is infinitely far.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => distance(point, *only),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Inclusive point-in-rectangle test.
///
/// Unlike `Rect::contains`, points on the right and bottom edges count as inside.
pub fn point_in_rect(point: Point, rect: Rect) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Even-odd ray casting containment test.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Axis-aligned bounding box of a point set, `None` when empty.
pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p)),
    )
}

/// Union of optional bounds; `None` entries are ignored.
pub fn union_bounds<I>(bounds: I) -> Option<Rect>
where
    I: IntoIterator<Item = Option<Rect>>,
{
    bounds
        .into_iter()
        .flatten()
        .reduce(|acc, rect| acc.union(rect))
}

/// Rectangle spanned by two corners, normalized to non-negative size.
pub fn normalize_rect(a: Point, b: Point) -> Rect {
    Rect::from_points(a, b)
}

/// Rotate `point` around `center` by `radians`.
pub fn rotate_point(point: Point, center: Point, radians: f64) -> Point {
    let (sin, cos) = radians.sin_cos();
    let d = point - center;
    center + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Ramer-Douglas-Peucker simplification.
///
/// Interior points whose distance to the chord between the kept endpoints
/// is at most `tolerance` are dropped. Endpoints are always preserved.
pub fn simplify_path(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_index = 0;
    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = point_to_segment_dist(*point, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }

    if max_dist > tolerance {
        let mut left = simplify_path(&points[..=max_index], tolerance);
        let right = simplify_path(&points[max_index..], tolerance);
        // Junction point is shared by both halves.
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Format a measurement with at most `decimals` fractional digits, trailing zeros trimmed.
///
/// `format_number(12.5, 2) == "12.5"`, `format_number(3.0, 2) == "3"`.
pub fn format_number(value: f64, decimals: usize) -> String {
    let fixed = format!("{value:.decimals$}");
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_distance_and_angle() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((distance(a, b) - 5.0).abs() < f64::EPSILON);
        assert!((angle(a, Point::new(0.0, 10.0)) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        // Past the end of the segment, distance is to the endpoint.
        assert!((point_to_segment_dist(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        // Degenerate segment.
        assert!((point_to_segment_dist(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_in_rect_is_inclusive() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(point_in_rect(Point::new(10.0, 10.0), rect));
        assert!(point_in_rect(Point::new(0.0, 5.0), rect));
        assert!(!point_in_rect(Point::new(10.1, 5.0), rect));
    }

    #[test]
    fn test_point_in_polygon_even_odd() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Point::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Point::new(5.0, 5.0), &square[..2]));
    }

    #[test]
    fn test_bounding_box() {
        assert!(bounding_box(&[]).is_none());
        let bbox = bounding_box(&[Point::new(3.0, -1.0), Point::new(-2.0, 4.0)]).unwrap();
        assert_eq!(bbox, Rect::new(-2.0, -1.0, 3.0, 4.0));
    }

    #[test]
    fn test_union_bounds_skips_missing() {
        let union = union_bounds([
            Some(Rect::new(0.0, 0.0, 1.0, 1.0)),
            None,
            Some(Rect::new(5.0, 5.0, 6.0, 7.0)),
        ])
        .unwrap();
        assert_eq!(union, Rect::new(0.0, 0.0, 6.0, 7.0));
        assert!(union_bounds([None, None]).is_none());
    }

    #[test]
    fn test_simplify_drops_points_near_chord() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.01),
            Point::new(2.0, 0.0),
            Point::new(10.0, 0.0),
        ];
        let simplified = simplify_path(&points, 1.0);
        assert_eq!(simplified, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    }

    #[test]
    fn test_simplify_keeps_corners() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.1),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        let simplified = simplify_path(&points, 1.0);
        assert_eq!(
            simplified,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)]
        );
    }

    #[test]
    fn test_rotate_point() {
        let p = rotate_point(Point::new(1.0, 0.0), Point::ZERO, PI);
        assert!((p.x + 1.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(12.5, 2), "12.5");
        assert_eq!(format_number(3.0, 2), "3");
        assert_eq!(format_number(1.23456, 2), "1.23");
        assert_eq!(format_number(100.0, 2), "100");
        assert_eq!(format_number(-0.001, 2), "0");
    }
}
