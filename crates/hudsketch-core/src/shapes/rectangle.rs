//! Rectangle shape.

use super::ShapeTrait;
use crate::geometry::Reflection;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by two opposite corners.
///
/// The corners are stored as drawn, in any order. They are only normalized
/// when the rectangle is measured, hit-tested or turned into a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub corner_a: Point,
    pub corner_b: Point,
}

impl Rectangle {
    pub fn new(corner_a: Point, corner_b: Point) -> Self {
        Self { corner_a, corner_b }
    }

    /// Normalized kurbo rectangle.
    pub fn as_rect(&self) -> Rect {
        Rect::from_points(self.corner_a, self.corner_b)
    }

    pub fn center(&self) -> Point {
        self.corner_a.midpoint(self.corner_b)
    }

    pub fn width(&self) -> f64 {
        (self.corner_b.x - self.corner_a.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.corner_b.y - self.corner_a.y).abs()
    }
}

impl ShapeTrait for Rectangle {
    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let r = self.as_rect();
        let within_y = point.y >= r.y0 && point.y <= r.y1;
        let within_x = point.x >= r.x0 && point.x <= r.x1;
        let near_vertical =
            (point.x - r.x0).abs() < tolerance || (point.x - r.x1).abs() < tolerance;
        let near_horizontal =
            (point.y - r.y0).abs() < tolerance || (point.y - r.y1).abs() < tolerance;
        (near_vertical && within_y) || (near_horizontal && within_x)
    }

    fn marquee_points(&self) -> Vec<Point> {
        vec![self.center()]
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn translate(&mut self, delta: Vec2) {
        self.corner_a += delta;
        self.corner_b += delta;
    }

    fn reflect(&mut self, reflection: &Reflection) {
        self.corner_a = reflection.reflect_point(self.corner_a);
        self.corner_b = reflection.reflect_point(self.corner_b);
    }
}
