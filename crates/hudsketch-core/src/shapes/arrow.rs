//! Arrow shape.

use super::ShapeTrait;
use crate::geometry::{Reflection, point_near_segment};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Arrowhead length as a fraction of the shaft length.
pub const TIP_LENGTH: f64 = 0.3;
/// Half-angle between the shaft and each arrowhead stroke.
const TIP_ANGLE: f64 = std::f64::consts::FRAC_PI_6;

/// A line segment with an arrowhead at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    /// Start point.
    pub start: Point,
    /// End point (where the arrowhead points).
    pub end: Point,
}

impl Arrow {
    /// Create a new arrow.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Get the direction vector (normalized).
    pub fn direction(&self) -> Vec2 {
        let d = self.end - self.start;
        let len = d.hypot();
        if len < f64::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            d / len
        }
    }

    /// Get the length of the arrow shaft.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// The two outer points of the arrowhead strokes.
    pub fn head_points(&self) -> (Point, Point) {
        let back = -self.direction() * (self.length() * TIP_LENGTH);
        let rotate = |v: Vec2, angle: f64| {
            let (sin, cos) = angle.sin_cos();
            Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
        };
        (
            self.end + rotate(back, TIP_ANGLE),
            self.end + rotate(back, -TIP_ANGLE),
        )
    }
}

impl ShapeTrait for Arrow {
    fn bounds(&self) -> Rect {
        // The arrowhead is decoration; selection bounds follow the shaft.
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_near_segment(point, self.start, self.end, tolerance)
    }

    fn marquee_points(&self) -> Vec<Point> {
        vec![self.start, self.end]
    }

    fn to_path(&self) -> BezPath {
        let (left, right) = self.head_points();
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path.move_to(left);
        path.line_to(self.end);
        path.line_to(right);
        path
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    fn reflect(&mut self, reflection: &Reflection) {
        self.start = reflection.reflect_point(self.start);
        self.end = reflection.reflect_point(self.end);
    }
}
