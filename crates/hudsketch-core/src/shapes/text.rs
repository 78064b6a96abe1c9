//! Text shape.

use super::ShapeTrait;
use crate::geometry::Reflection;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// Estimated advance of one character at scale 1.0.
pub const CHAR_WIDTH: f64 = 10.0;
/// Estimated line height at scale 1.0.
pub const LINE_HEIGHT: f64 = 20.0;

/// A single line of text anchored at its baseline-left corner.
///
/// Extents use a fixed monospace estimate rather than real glyph metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Baseline-left anchor.
    pub position: Point,
    pub content: String,
    /// Font scale, always positive.
    pub font_scale: f64,
}

impl Text {
    pub const DEFAULT_FONT_SCALE: f64 = 1.0;

    pub fn new(position: Point, content: impl Into<String>, font_scale: f64) -> Self {
        Self {
            position,
            content: content.into(),
            font_scale,
        }
    }

    pub fn estimated_width(&self) -> f64 {
        self.content.chars().count() as f64 * CHAR_WIDTH * self.font_scale
    }

    pub fn estimated_height(&self) -> f64 {
        LINE_HEIGHT * self.font_scale
    }
}

impl ShapeTrait for Text {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y - self.estimated_height(),
            self.position.x + self.estimated_width(),
            self.position.y,
        )
    }

    fn hit_test(&self, point: Point, _tolerance: f64) -> bool {
        crate::geometry::rect_contains_inclusive(self.bounds(), point)
    }

    fn marquee_points(&self) -> Vec<Point> {
        vec![self.position]
    }

    fn to_path(&self) -> BezPath {
        // Renderers lay out the glyphs themselves; the path is the text box.
        self.bounds().to_path(0.1)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn reflect(&mut self, reflection: &Reflection) {
        self.position = reflection.reflect_point(self.position);
    }
}
