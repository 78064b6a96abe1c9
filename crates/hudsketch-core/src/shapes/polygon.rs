//! Polygon shape.

use super::ShapeTrait;
use crate::geometry::{Reflection, point_near_segment, points_bounds, shift_points};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A closed polygon. Fewer than three vertices never hit-tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Vertices in drawing order.
    pub points: Vec<Point>,
}

impl Polygon {
    pub const MIN_POINTS: usize = 3;

    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() >= Self::MIN_POINTS
    }

    /// Edges including the closing edge from the last vertex back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

impl ShapeTrait for Polygon {
    fn bounds(&self) -> Rect {
        points_bounds(self.points.iter().copied()).unwrap_or(Rect::ZERO)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.is_closed()
            && self
                .edges()
                .any(|(a, b)| point_near_segment(point, a, b, tolerance))
    }

    fn marquee_points(&self) -> Vec<Point> {
        self.points.clone()
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = self.points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
            if self.is_closed() {
                path.close_path();
            }
        }
        path
    }

    fn translate(&mut self, delta: Vec2) {
        shift_points(&mut self.points, delta);
    }

    fn reflect(&mut self, reflection: &Reflection) {
        for p in &mut self.points {
            *p = reflection.reflect_point(*p);
        }
    }
}
