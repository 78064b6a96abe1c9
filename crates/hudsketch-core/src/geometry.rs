//! Stateless proximity and containment predicates.
//!
//! Every tolerance taken here is in world units. Callers convert their
//! screen-pixel tolerance by dividing it by the current zoom first, so that a
//! grab feels the same at every zoom level.

use crate::shapes::{Geometry, Shape};
use kurbo::{CubicBez, ParamCurve, Point, QuadBez, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Segments shorter than this are treated as a single point.
const DEGENERATE_LENGTH: f64 = 0.001;
/// Parameter steps used to sample a quadratic Bézier.
pub const QUADRATIC_SAMPLES: usize = 20;
/// Parameter steps used to sample a cubic Bézier.
pub const CUBIC_SAMPLES: usize = 30;
/// Half-width of the parameter band around 0.5 that counts as "the middle".
const MIDDLE_BAND: f64 = 0.3;

/// Which end of a straight segment was grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Start,
    End,
}

/// Direction of a mirror operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlipDirection {
    /// Mirror x coordinates about a vertical axis line.
    Horizontal,
    /// Mirror y coordinates about a horizontal axis line.
    Vertical,
}

/// A reflection about an axis line: `new = 2 * axis - old` on one coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    pub direction: FlipDirection,
    pub axis: f64,
}

impl Reflection {
    pub fn new(direction: FlipDirection, axis: f64) -> Self {
        Self { direction, axis }
    }

    /// Reflect a single coordinate value about the axis.
    pub fn reflect_value(&self, value: f64) -> f64 {
        2.0 * self.axis - value
    }

    /// Reflect a point, leaving the coordinate parallel to the axis untouched.
    pub fn reflect_point(&self, point: Point) -> Point {
        match self.direction {
            FlipDirection::Horizontal => Point::new(self.reflect_value(point.x), point.y),
            FlipDirection::Vertical => Point::new(point.x, self.reflect_value(point.y)),
        }
    }
}

/// Projection parameter of `point` onto segment `a`→`b`, clamped to [0, 1].
///
/// Returns `None` for a degenerate segment.
fn projection_parameter(point: Point, a: Point, b: Point) -> Option<f64> {
    let seg = b - a;
    let len = seg.hypot();
    if len < DEGENERATE_LENGTH {
        return None;
    }
    let t = (point - a).dot(seg) / (len * len);
    Some(t.clamp(0.0, 1.0))
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    match projection_parameter(point, a, b) {
        Some(t) => point.distance(a.lerp(b, t)),
        None => point.distance(a),
    }
}

/// True if `point` lies within `tolerance` of segment `a`→`b`.
pub fn point_near_segment(point: Point, a: Point, b: Point, tolerance: f64) -> bool {
    point_to_segment_dist(point, a, b) < tolerance
}

/// True if `point` lies within `tolerance` of the sampled quadratic Bézier.
pub fn point_near_quadratic_bezier(
    point: Point,
    p0: Point,
    control: Point,
    p2: Point,
    tolerance: f64,
) -> bool {
    let curve = QuadBez::new(p0, control, p2);
    min_sampled_distance(point, QUADRATIC_SAMPLES, |t| curve.eval(t)) < tolerance
}

/// True if `point` lies within `tolerance` of the sampled cubic Bézier.
pub fn point_near_cubic_bezier(
    point: Point,
    p0: Point,
    control1: Point,
    control2: Point,
    p3: Point,
    tolerance: f64,
) -> bool {
    let curve = CubicBez::new(p0, control1, control2, p3);
    min_sampled_distance(point, CUBIC_SAMPLES, |t| curve.eval(t)) < tolerance
}

fn min_sampled_distance(point: Point, steps: usize, eval: impl Fn(f64) -> Point) -> f64 {
    (0..=steps)
        .map(|i| point.distance(eval(i as f64 / steps as f64)))
        .fold(f64::INFINITY, f64::min)
}

/// Detect a grab near the middle of a segment (the "bend into a curve" gesture).
///
/// Returns the projection parameter when the point is within `2 * tolerance`
/// of the midpoint, within `tolerance` of the segment, and its parameter lies
/// within 0.3 of 0.5.
pub fn point_near_line_middle(point: Point, a: Point, b: Point, tolerance: f64) -> Option<f64> {
    if point.distance(a.midpoint(b)) > tolerance * 2.0 {
        return None;
    }
    let t = projection_parameter(point, a, b)?;
    let dist = point.distance(a.lerp(b, t));
    (dist < tolerance && (t - 0.5).abs() < MIDDLE_BAND).then_some(t)
}

/// Detect a grab on one of the segment's endpoints. The start wins ties.
pub fn point_near_endpoint(point: Point, a: Point, b: Point, tolerance: f64) -> Option<Endpoint> {
    if point.distance(a) < tolerance {
        Some(Endpoint::Start)
    } else if point.distance(b) < tolerance {
        Some(Endpoint::End)
    } else {
        None
    }
}

/// Combined bounding box of the shapes at `indices`.
///
/// Out-of-range indices and polygons without vertices are skipped; returns
/// `None` when nothing contributed.
pub fn bounding_box(shapes: &[Shape], indices: impl IntoIterator<Item = usize>) -> Option<Rect> {
    indices
        .into_iter()
        .filter_map(|idx| shapes.get(idx))
        .filter(|shape| !matches!(&shape.geometry, Geometry::Polygon(p) if p.points.is_empty()))
        .map(Shape::bounds)
        .reduce(|acc, bounds| acc.union(bounds))
}

/// Smallest rectangle containing all the given points.
pub fn points_bounds(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    points
        .into_iter()
        .map(|p| Rect::from_points(p, p))
        .reduce(|acc, r| acc.union(r))
}

/// Closed-interval containment (kurbo's `Rect::contains` excludes the far edges).
pub fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Point a third of the way along a segment.
pub fn lerp_third(a: Point, b: Point, thirds: f64) -> Point {
    a + (b - a) * (thirds / 3.0)
}

/// Translate a list of points in place.
pub fn shift_points(points: &mut [Point], delta: Vec2) {
    for p in points {
        *p += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_midpoint_is_near() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!(point_near_segment(Point::new(50.0, 0.0), a, b, 0.5));
    }

    #[test]
    fn test_segment_far_point() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!(!point_near_segment(Point::new(50.0, 20.0), a, b, 10.0));
        assert!(point_near_segment(Point::new(50.0, 9.0), a, b, 10.0));
    }

    #[test]
    fn test_segment_projection_is_clamped() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!(!point_near_segment(Point::new(110.0, 0.0), a, b, 5.0));
        assert!(point_near_segment(Point::new(103.0, 0.0), a, b, 5.0));
    }

    #[test]
    fn test_degenerate_segment_uses_point_distance() {
        let a = Point::new(10.0, 10.0);
        assert!(point_near_segment(Point::new(12.0, 10.0), a, a, 3.0));
        assert!(!point_near_segment(Point::new(20.0, 10.0), a, a, 3.0));
    }

    #[test]
    fn test_quadratic_bezier_passes_through_halfway() {
        let p0 = Point::new(0.0, 0.0);
        let ctrl = Point::new(50.0, 100.0);
        let p2 = Point::new(100.0, 0.0);
        // B(0.5) = 0.25*p0 + 0.5*ctrl + 0.25*p2
        assert!(point_near_quadratic_bezier(Point::new(50.0, 50.0), p0, ctrl, p2, 1.0));
        assert!(!point_near_quadratic_bezier(Point::new(50.0, 0.0), p0, ctrl, p2, 10.0));
    }

    #[test]
    fn test_cubic_bezier_endpoints() {
        let p0 = Point::new(0.0, 0.0);
        let c1 = Point::new(0.0, 100.0);
        let c2 = Point::new(100.0, 100.0);
        let p3 = Point::new(100.0, 0.0);
        assert!(point_near_cubic_bezier(p0, p0, c1, c2, p3, 0.5));
        assert!(point_near_cubic_bezier(p3, p0, c1, c2, p3, 0.5));
        // B(0.5) = (50, 75)
        assert!(point_near_cubic_bezier(Point::new(50.0, 75.0), p0, c1, c2, p3, 1.0));
        assert!(!point_near_cubic_bezier(Point::new(50.0, 0.0), p0, c1, c2, p3, 10.0));
    }

    #[test]
    fn test_line_middle_band() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        let t = point_near_line_middle(Point::new(50.0, 0.0), a, b, 15.0).unwrap();
        assert!((t - 0.5).abs() < f64::EPSILON);
        assert!(point_near_line_middle(Point::new(60.0, 5.0), a, b, 15.0).is_some());
        // Too far from the midpoint.
        assert!(point_near_line_middle(Point::new(85.0, 0.0), a, b, 15.0).is_none());
        // Too far from the segment.
        assert!(point_near_line_middle(Point::new(50.0, 20.0), a, b, 15.0).is_none());
    }

    #[test]
    fn test_line_middle_rejects_outside_parameter_band() {
        // Short segment: the whole line is within 2*tol of the midpoint,
        // but the ends fall outside |t - 0.5| < 0.3.
        let a = Point::new(0.0, 0.0);
        let b = Point::new(20.0, 0.0);
        assert!(point_near_line_middle(Point::new(1.0, 0.0), a, b, 15.0).is_none());
        assert!(point_near_line_middle(Point::new(10.0, 0.0), a, b, 15.0).is_some());
    }

    #[test]
    fn test_endpoint_detection() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert_eq!(point_near_endpoint(Point::new(2.0, 1.0), a, b, 5.0), Some(Endpoint::Start));
        assert_eq!(point_near_endpoint(Point::new(98.0, 0.0), a, b, 5.0), Some(Endpoint::End));
        assert_eq!(point_near_endpoint(Point::new(50.0, 0.0), a, b, 5.0), None);
    }

    #[test]
    fn test_reflection_is_self_inverse() {
        let r = Reflection::new(FlipDirection::Horizontal, 120.0);
        let p = Point::new(37.5, -4.0);
        let twice = r.reflect_point(r.reflect_point(p));
        assert_eq!(twice, p);
        assert_eq!(r.reflect_point(p), Point::new(202.5, -4.0));
    }

    #[test]
    fn test_inclusive_containment() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_contains_inclusive(rect, Point::new(10.0, 10.0)));
        assert!(!rect_contains_inclusive(rect, Point::new(10.1, 5.0)));
    }

    #[test]
    fn test_bounding_box_skips_empty_polygon() {
        use crate::shapes::ShapeStyle;
        let shapes = vec![
            Shape::point(Point::new(-30.0, -40.0), ShapeStyle::default()),
            Shape::polygon(Vec::new(), ShapeStyle::default()),
            Shape::point(Point::new(-10.0, -20.0), ShapeStyle::default()),
        ];
        assert_eq!(
            bounding_box(&shapes, [0, 1, 2]),
            Some(Rect::new(-30.0, -40.0, -10.0, -20.0))
        );
        assert_eq!(bounding_box(&shapes, [1]), None);
    }

    #[test]
    fn test_lerp_third() {
        let p = lerp_third(Point::new(0.0, 0.0), Point::new(90.0, 30.0), 2.0);
        assert!((p.x - 60.0).abs() < 1e-9);
        assert!((p.y - 20.0).abs() < 1e-9);
    }
}
