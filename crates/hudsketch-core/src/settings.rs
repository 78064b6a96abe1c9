//! Editor configuration.

use crate::snap::GRID_SIZE;
use crate::store::{FLIP_GAP, PASTE_OFFSET};
use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};

/// Tunable editor behaviour.
///
/// Tolerances are in screen pixels and are divided by the current zoom
/// before any hit test, so grabs feel the same at every zoom level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Grid spacing in world units.
    pub grid_size: f64,
    /// Snap drawing tools to the grid. Never applies in select mode.
    pub snap_to_grid: bool,
    /// Shape body hit tolerance.
    pub hit_tolerance: f64,
    /// Tolerance of the "bend from the middle" grab on lines and arrows.
    pub midpoint_tolerance: f64,
    /// Tolerance of the "grab an endpoint to make a cubic" gesture.
    pub endpoint_tolerance: f64,
    /// Tolerance for grabbing a curve control point.
    pub control_point_tolerance: f64,
    /// Offset applied to pasted shapes.
    pub paste_offset: Vec2,
    /// Distance between the selection and its flipped duplicates.
    pub flip_gap: f64,
    /// Minimum marquee drag, in world units, before it selects anything.
    pub marquee_threshold: f64,
    /// Minimum drag, in world units, before a drag tool creates a shape.
    pub min_draw_distance: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            snap_to_grid: false,
            hit_tolerance: 10.0,
            midpoint_tolerance: 15.0,
            endpoint_tolerance: 12.0,
            control_point_tolerance: 10.0,
            paste_offset: Vec2::new(PASTE_OFFSET, PASTE_OFFSET),
            flip_gap: FLIP_GAP,
            marquee_threshold: 3.0,
            min_draw_distance: 2.0,
        }
    }
}

/// Optional output frame the exported overlay is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasLimits {
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
}

impl CanvasLimits {
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

impl Default for CanvasLimits {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 1280,
            height: 720,
        }
    }
}
