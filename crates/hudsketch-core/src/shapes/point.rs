//! Point marker shape.

use super::ShapeTrait;
use crate::geometry::Reflection;
use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// A single marked position, rendered as a small dot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Point,
}

impl Marker {
    /// Radius of the rendered dot.
    pub const DOT_RADIUS: f64 = 3.0;

    pub fn new(position: Point) -> Self {
        Self { position }
    }
}

impl ShapeTrait for Marker {
    fn bounds(&self) -> Rect {
        Rect::from_points(self.position, self.position)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point.distance(self.position) < tolerance
    }

    fn marquee_points(&self) -> Vec<Point> {
        vec![self.position]
    }

    fn to_path(&self) -> BezPath {
        Circle::new(self.position, Self::DOT_RADIUS).to_path(0.1)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn reflect(&mut self, reflection: &Reflection) {
        self.position = reflection.reflect_point(self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_hit() {
        let marker = Marker::new(Point::new(10.0, 10.0));
        assert!(marker.hit_test(Point::new(13.0, 14.0), 6.0));
        assert!(!marker.hit_test(Point::new(13.0, 14.0), 5.0));
    }
}
