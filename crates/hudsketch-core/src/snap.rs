//! Grid snapping and axis constraint for drawing tools.

use kurbo::Point;

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if grid_size <= 0.0 {
        return SnapResult::none(point);
    }
    let snapped = Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    );
    SnapResult {
        point: snapped,
        snapped_x: snapped.x != point.x,
        snapped_y: snapped.y != point.y,
    }
}

/// Snap only when enabled.
pub fn snap_if(enabled: bool, point: Point, grid_size: f64) -> Point {
    if enabled {
        snap_to_grid(point, grid_size).point
    } else {
        point
    }
}

/// Constrain `point` to the horizontal or vertical line through `anchor`,
/// whichever axis the movement is dominant along. Ties go vertical.
pub fn constrain_to_axis(anchor: Point, point: Point) -> Point {
    let dx = (point.x - anchor.x).abs();
    let dy = (point.y - anchor.y).abs();
    if dx > dy {
        Point::new(point.x, anchor.y)
    } else {
        Point::new(anchor.x, point.y)
    }
}

/// Round both coordinates to whole pixels.
pub fn round_point(point: Point) -> Point {
    Point::new(point.x.round(), point.y.round())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let result = snap_to_grid(Point::new(23.0, 47.0), GRID_SIZE);
        assert_eq!(result.point, Point::new(20.0, 40.0));
        assert!(result.is_snapped());
    }

    #[test]
    fn test_snap_on_grid_point() {
        let result = snap_to_grid(Point::new(40.0, -20.0), GRID_SIZE);
        assert_eq!(result.point, Point::new(40.0, -20.0));
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_snap_if_disabled() {
        let p = Point::new(23.0, 47.0);
        assert_eq!(snap_if(false, p, GRID_SIZE), p);
        assert_eq!(snap_if(true, p, GRID_SIZE), Point::new(20.0, 40.0));
    }

    #[test]
    fn test_constrain_to_axis() {
        let anchor = Point::new(10.0, 10.0);
        assert_eq!(constrain_to_axis(anchor, Point::new(60.0, 25.0)), Point::new(60.0, 10.0));
        assert_eq!(constrain_to_axis(anchor, Point::new(15.0, 80.0)), Point::new(10.0, 80.0));
        assert_eq!(constrain_to_axis(anchor, Point::new(20.0, 20.0)), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_round_point() {
        assert_eq!(round_point(Point::new(1.4, -2.6)), Point::new(1.0, -3.0));
    }
}
