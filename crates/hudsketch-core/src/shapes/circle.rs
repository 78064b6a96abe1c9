//! Circle shape.

use super::ShapeTrait;
use crate::geometry::Reflection;
use kurbo::{BezPath, Circle as KurboCircle, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// A circle outline, optionally filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    /// Radius, always positive.
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(self.center, self.radius)
    }
}

impl ShapeTrait for Circle {
    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (self.radius * 2.0, self.radius * 2.0))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        // Outline hit only, even for filled circles.
        (point.distance(self.center) - self.radius).abs() < tolerance
    }

    fn marquee_points(&self) -> Vec<Point> {
        vec![self.center]
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn reflect(&mut self, reflection: &Reflection) {
        self.center = reflection.reflect_point(self.center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_hit() {
        let circle = Circle::new(Point::new(100.0, 100.0), 50.0);
        assert!(circle.hit_test(Point::new(150.0, 100.0), 2.0));
        assert!(circle.hit_test(Point::new(100.0, 53.0), 5.0));
        assert!(!circle.hit_test(Point::new(100.0, 100.0), 5.0));
    }

    #[test]
    fn test_bounds() {
        let circle = Circle::new(Point::new(10.0, 20.0), 5.0);
        assert_eq!(circle.bounds(), Rect::new(5.0, 15.0, 15.0, 25.0));
    }
}
