//! View transform between screen pixels and world (drawing) coordinates.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom change applied per wheel notch.
pub const ZOOM_STEP: f64 = 0.1;

/// Direction of a single zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Wheel convention: a positive delta zooms in, anything else zooms out.
    pub fn from_wheel_delta(delta: f64) -> Self {
        if delta > 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        }
    }
}

/// Camera manages the view transform for the canvas.
///
/// `screen = world * zoom + offset`. The offset is a screen-space pan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom level
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
    /// Additive zoom change per step
    pub zoom_step: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.offset.x) / self.zoom,
            (screen_point.y - self.offset.y) / self.zoom,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.zoom + self.offset.x,
            world_point.y * self.zoom + self.offset.y,
        )
    }

    /// Convert a screen-pixel distance into world units at the current zoom.
    pub fn screen_to_world_distance(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set the zoom level, keeping `world_anchor` at the same screen position.
    ///
    /// The requested zoom is clamped to the camera limits. Returns `true` if
    /// the zoom changed.
    pub fn set_zoom_at(&mut self, zoom: f64, world_anchor: Point) -> bool {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let screen_anchor = self.world_to_screen(world_anchor);
        self.zoom = new_zoom;
        self.offset = Vec2::new(
            screen_anchor.x - world_anchor.x * new_zoom,
            screen_anchor.y - world_anchor.y * new_zoom,
        );
        true
    }

    /// Zoom one step in or out around a world-space anchor (the cursor).
    pub fn zoom_at(&mut self, direction: ZoomDirection, world_anchor: Point) -> bool {
        let target = match direction {
            ZoomDirection::In => self.zoom + self.zoom_step,
            ZoomDirection::Out => self.zoom - self.zoom_step,
        };
        self.set_zoom_at(target, world_anchor)
    }

    /// Zoom percentage for status displays.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_offset() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(50.0, 100.0);
        let world = camera.screen_to_world(Point::new(100.0, 200.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_zoom() {
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        let world = camera.screen_to_world(Point::new(100.0, 200.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_affine_matches_point_mapping() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.zoom = 1.5;
        let world = Point::new(123.0, 456.0);
        let a = camera.transform() * world;
        let b = camera.world_to_screen(world);
        assert!((a - b).hypot() < 1e-10);
        let back = camera.inverse_transform() * b;
        assert!((back - world).hypot() < 1e-10);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        camera.offset = Vec2::new(50.0, 50.0);
        let anchor = Point::new(50.0, 50.0);
        assert_eq!(camera.world_to_screen(anchor), Point::new(150.0, 150.0));

        assert!(camera.zoom_at(ZoomDirection::In, anchor));
        assert!((camera.zoom - 2.1).abs() < 1e-9);
        let after = camera.world_to_screen(anchor);
        assert!((after.x - 150.0).abs() < 1e-9);
        assert!((after.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom = 0.15;
        assert!(camera.zoom_at(ZoomDirection::Out, Point::ZERO));
        assert!((camera.zoom - camera.min_zoom).abs() < f64::EPSILON);
        // Already at the limit: no change.
        assert!(!camera.zoom_at(ZoomDirection::Out, Point::ZERO));

        camera.zoom = 9.95;
        camera.zoom_at(ZoomDirection::In, Point::ZERO);
        assert!((camera.zoom - camera.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wheel_direction() {
        assert_eq!(ZoomDirection::from_wheel_delta(120.0), ZoomDirection::In);
        assert_eq!(ZoomDirection::from_wheel_delta(0.0), ZoomDirection::Out);
        assert_eq!(ZoomDirection::from_wheel_delta(-120.0), ZoomDirection::Out);
    }

    #[test]
    fn test_pan_and_reset() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        camera.zoom = 3.0;
        assert!((camera.offset.x - 10.0).abs() < f64::EPSILON);
        camera.reset();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert_eq!(camera.zoom_percent(), 100);
    }
}
