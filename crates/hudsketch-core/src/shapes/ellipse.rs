//! Ellipse shape.

use super::ShapeTrait;
use crate::geometry::Reflection;
use kurbo::{Affine, BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    /// Center point.
    pub center: Point,
    /// Horizontal radius.
    pub radius_x: f64,
    /// Vertical radius.
    pub radius_y: f64,
    /// Rotation in degrees. Stored and exported but ignored by hit testing;
    /// always 0 for drawn ellipses.
    #[serde(default)]
    pub angle: f64,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
            angle: 0.0,
        }
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Convert to kurbo Ellipse.
    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center, (self.radius_x, self.radius_y), 0.0)
    }
}

impl ShapeTrait for Ellipse {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius_x,
            self.center.y - self.radius_y,
            self.center.x + self.radius_x,
            self.center.y + self.radius_y,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.radius_x <= 0.0 || self.radius_y <= 0.0 {
            return false;
        }
        let d = point - self.center;
        let normalized = (d.x / self.radius_x).hypot(d.y / self.radius_y);
        (normalized - 1.0).abs() < tolerance / self.radius_x.max(self.radius_y)
    }

    fn marquee_points(&self) -> Vec<Point> {
        vec![self.center]
    }

    fn to_path(&self) -> BezPath {
        let path = self.as_kurbo().to_path(0.1);
        if self.angle == 0.0 {
            return path;
        }
        let rotation = Affine::translate(self.center.to_vec2())
            * Affine::rotate(self.angle.to_radians())
            * Affine::translate(-self.center.to_vec2());
        rotation * path
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
    fn test_ellipse_creation() {
        let ellipse = Ellipse::new(Point::new(100.0, 100.0), 50.0, 30.0);
        assert!((ellipse.radius_x - 50.0).abs() < f64::EPSILON);
        assert!(ellipse.angle.abs() < f64::EPSILON);
    }

    #[test]
    fn test_outline_hit() {
        let ellipse = Ellipse::new(Point::new(100.0, 100.0), 50.0, 30.0);
        assert!(ellipse.hit_test(Point::new(150.0, 100.0), 5.0));
        assert!(ellipse.hit_test(Point::new(100.0, 131.0), 5.0));
        assert!(!ellipse.hit_test(Point::new(100.0, 100.0), 5.0));
        assert!(!ellipse.hit_test(Point::new(170.0, 100.0), 5.0));
    }

    #[test]
    fn test_bounds() {
        let ellipse = Ellipse::new(Point::new(0.0, 0.0), 20.0, 10.0);
        assert_eq!(ellipse.bounds(), Rect::new(-20.0, -10.0, 20.0, 10.0));
    }
}
