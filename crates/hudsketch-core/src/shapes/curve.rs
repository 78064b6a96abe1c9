//! Bézier curve shape.
//!
//! Curves come in two permanent sub-kinds: a quadratic with one control point
//! (made by bending a straight segment from its middle) and a cubic with two
//! (made by grabbing a segment endpoint). A curve never mixes the two.

use super::ShapeTrait;
use crate::geometry::{
    Reflection, lerp_third, point_near_cubic_bezier, point_near_quadratic_bezier, points_bounds,
};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Identifies one control point of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlHandle {
    /// The single control point of a quadratic curve.
    Control,
    /// First control point of a cubic curve.
    Control1,
    /// Second control point of a cubic curve.
    Control2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    Quadratic {
        start: Point,
        end: Point,
        control: Point,
    },
    Cubic {
        start: Point,
        end: Point,
        control1: Point,
        control2: Point,
    },
}

impl Curve {
    pub fn quadratic(start: Point, end: Point, control: Point) -> Self {
        Curve::Quadratic { start, end, control }
    }

    pub fn cubic(start: Point, end: Point, control1: Point, control2: Point) -> Self {
        Curve::Cubic {
            start,
            end,
            control1,
            control2,
        }
    }

    /// Cubic whose control points sit at 1/3 and 2/3 along `start`→`end`.
    pub fn cubic_from_segment(start: Point, end: Point) -> Self {
        Self::cubic(start, end, lerp_third(start, end, 1.0), lerp_third(start, end, 2.0))
    }

    pub fn is_cubic(&self) -> bool {
        matches!(self, Curve::Cubic { .. })
    }

    pub fn start(&self) -> Point {
        match *self {
            Curve::Quadratic { start, .. } | Curve::Cubic { start, .. } => start,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            Curve::Quadratic { end, .. } | Curve::Cubic { end, .. } => end,
        }
    }

    /// Handles valid for this sub-kind, in grab priority order.
    pub fn handles(&self) -> &'static [ControlHandle] {
        match self {
            Curve::Quadratic { .. } => &[ControlHandle::Control],
            Curve::Cubic { .. } => &[ControlHandle::Control1, ControlHandle::Control2],
        }
    }

    pub fn control_point(&self, handle: ControlHandle) -> Option<Point> {
        match (*self, handle) {
            (Curve::Quadratic { control, .. }, ControlHandle::Control) => Some(control),
            (Curve::Cubic { control1, .. }, ControlHandle::Control1) => Some(control1),
            (Curve::Cubic { control2, .. }, ControlHandle::Control2) => Some(control2),
            _ => None,
        }
    }

    /// Move one control point. Returns `false` if the handle does not exist
    /// on this sub-kind.
    pub fn set_control_point(&mut self, handle: ControlHandle, point: Point) -> bool {
        let slot = match (self, handle) {
            (Curve::Quadratic { control, .. }, ControlHandle::Control) => control,
            (Curve::Cubic { control1, .. }, ControlHandle::Control1) => control1,
            (Curve::Cubic { control2, .. }, ControlHandle::Control2) => control2,
            _ => return false,
        };
        *slot = point;
        true
    }

    /// Nearest control point within `tolerance`. On an exact tie `Control1`
    /// wins over `Control2`.
    pub fn handle_at(&self, point: Point, tolerance: f64) -> Option<ControlHandle> {
        let mut best: Option<(ControlHandle, f64)> = None;
        for &handle in self.handles() {
            let Some(cp) = self.control_point(handle) else {
                continue;
            };
            let dist = point.distance(cp);
            if dist < tolerance && best.is_none_or(|(_, d)| dist < d) {
                best = Some((handle, dist));
            }
        }
        best.map(|(handle, _)| handle)
    }

    fn points_mut(&mut self) -> Vec<&mut Point> {
        match self {
            Curve::Quadratic {
                start,
                end,
                control,
            } => vec![start, end, control],
            Curve::Cubic {
                start,
                end,
                control1,
                control2,
            } => vec![start, end, control1, control2],
        }
    }

    fn all_points(&self) -> Vec<Point> {
        match *self {
            Curve::Quadratic {
                start,
                end,
                control,
            } => vec![start, end, control],
            Curve::Cubic {
                start,
                end,
                control1,
                control2,
            } => vec![start, end, control1, control2],
        }
    }
}

impl ShapeTrait for Curve {
    fn bounds(&self) -> Rect {
        points_bounds(self.all_points()).unwrap_or(Rect::ZERO)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match *self {
            Curve::Quadratic {
                start,
                end,
                control,
            } => point_near_quadratic_bezier(point, start, control, end, tolerance),
            Curve::Cubic {
                start,
                end,
                control1,
                control2,
            } => point_near_cubic_bezier(point, start, control1, control2, end, tolerance),
        }
    }

    fn marquee_points(&self) -> Vec<Point> {
        vec![self.start(), self.end()]
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        match *self {
            Curve::Quadratic { end, control, .. } => path.quad_to(control, end),
            Curve::Cubic {
                end,
                control1,
                control2,
                ..
            } => path.curve_to(control1, control2, end),
        }
        path
    }

    fn translate(&mut self, delta: Vec2) {
        for p in self.points_mut() {
            *p += delta;
        }
    }

    fn reflect(&mut self, reflection: &Reflection) {
        for p in self.points_mut() {
            *p = reflection.reflect_point(*p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bent() -> Curve {
        Curve::quadratic(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(50.0, 100.0))
    }

    #[test]
    fn test_bounds_include_control_point() {
        let bounds = bent().bounds();
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quadratic_hit_test() {
        let curve = bent();
        assert!(curve.hit_test(Point::new(50.0, 50.0), 2.0));
        // The control point itself is off the curve.
        assert!(!curve.hit_test(Point::new(50.0, 100.0), 10.0));
    }

    #[test]
    fn test_handles_by_sub_kind() {
        let mut quad = bent();
        assert!(!quad.set_control_point(ControlHandle::Control1, Point::ZERO));
        assert!(quad.set_control_point(ControlHandle::Control, Point::new(1.0, 2.0)));
        assert_eq!(quad.control_point(ControlHandle::Control), Some(Point::new(1.0, 2.0)));
        assert_eq!(quad.start(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_handle_at_picks_nearest_control() {
        let cubic = Curve::cubic(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(40.0, 50.0),
            Point::new(48.0, 50.0),
        );
        // Both are within tolerance; the second one is closer.
        assert_eq!(cubic.handle_at(Point::new(47.0, 50.0), 10.0), Some(ControlHandle::Control2));
        assert_eq!(cubic.handle_at(Point::new(41.0, 50.0), 10.0), Some(ControlHandle::Control1));
        // Equidistant: the first control point wins.
        assert_eq!(cubic.handle_at(Point::new(44.0, 50.0), 10.0), Some(ControlHandle::Control1));
        assert_eq!(cubic.handle_at(Point::new(44.0, 90.0), 10.0), None);
    }

    #[test]
    fn test_cubic_from_segment() {
        let curve = Curve::cubic_from_segment(Point::new(0.0, 0.0), Point::new(30.0, 60.0));
        let Curve::Cubic { control1, control2, .. } = curve else {
            panic!("expected cubic");
        };
        assert!((control1.y - 20.0).abs() < 1e-9);
        assert!((control2.x - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_translate_moves_controls() {
        let mut curve = bent();
        curve.translate(Vec2::new(10.0, 10.0));
        assert_eq!(curve.control_point(ControlHandle::Control), Some(Point::new(60.0, 110.0)));
        assert_eq!(curve.end(), Point::new(110.0, 10.0));
    }
}
