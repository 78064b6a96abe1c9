//! Property tests for the coordinate, reflection and index bookkeeping laws.

use hudsketch_core::geometry::point_near_segment;
use hudsketch_core::{
    Camera, Canvas, FlipDirection, Reflection, SelectionState, Shape, ShapeStyle, ZoomDirection,
};
use kurbo::{Point, Vec2};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn coord() -> impl Strategy<Value = f64> {
    -5000.0..5000.0f64
}

fn point() -> impl Strategy<Value = Point> {
    (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
}

fn camera() -> impl Strategy<Value = Camera> {
    (0.1..10.0f64, coord(), coord()).prop_map(|(zoom, ox, oy)| {
        let mut camera = Camera::new();
        camera.zoom = zoom;
        camera.offset = Vec2::new(ox, oy);
        camera
    })
}

fn close(a: Point, b: Point) -> bool {
    let scale = 1.0 + a.x.abs().max(a.y.abs());
    (a.x - b.x).abs() <= 1e-9 * scale && (a.y - b.y).abs() <= 1e-9 * scale
}

proptest! {
    #[test]
    fn test_screen_world_round_trip(camera in camera(), p in point()) {
        let world = camera.screen_to_world(camera.world_to_screen(p));
        prop_assert!(close(world, p), "{world:?} != {p:?}");
        let screen = camera.world_to_screen(camera.screen_to_world(p));
        prop_assert!(close(screen, p), "{screen:?} != {p:?}");
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed(camera in camera(), anchor in point(), zoom_in in any::<bool>()) {
        let mut camera = camera;
        let before = camera.world_to_screen(anchor);
        let direction = if zoom_in { ZoomDirection::In } else { ZoomDirection::Out };
        camera.zoom_at(direction, anchor);
        prop_assert!(camera.zoom >= camera.min_zoom && camera.zoom <= camera.max_zoom);
        let after = camera.world_to_screen(anchor);
        prop_assert!(close(after, before), "{after:?} != {before:?}");
    }

    #[test]
    fn test_reflection_is_self_inverse(p in point(), axis in coord(), vertical in any::<bool>()) {
        let direction = if vertical { FlipDirection::Vertical } else { FlipDirection::Horizontal };
        let reflection = Reflection::new(direction, axis);
        let twice = reflection.reflect_point(reflection.reflect_point(p));
        prop_assert!(close(twice, p));
    }

    #[test]
    fn test_undo_removes_last_shape(points in prop::collection::vec(point(), 0..12)) {
        let mut canvas = Canvas::new();
        for &p in &points {
            canvas.add_shape(Shape::point(p, ShapeStyle::default()));
        }
        canvas.select_all();

        let removed = canvas.undo();
        prop_assert_eq!(removed, !points.is_empty());
        prop_assert_eq!(canvas.shapes().len(), points.len().saturating_sub(1));
        for (shape, &p) in canvas.shapes().iter().zip(&points) {
            prop_assert_eq!(shape, &Shape::point(p, ShapeStyle::default()));
        }
        // The removed index left the selection; nothing else did.
        let expected: BTreeSet<usize> = (0..canvas.shapes().len()).collect();
        prop_assert_eq!(canvas.selection().indices(), &expected);
    }

    #[test]
    fn test_descending_deletion_keeps_survivors(
        selected in prop::collection::btree_set(0usize..20, 0..20),
        deleted in prop::collection::btree_set(0usize..20, 0..20),
    ) {
        let mut selection = SelectionState::new();
        selection.set(selected.iter().copied());
        for &index in deleted.iter().rev() {
            selection.reconcile_deletion(index);
        }

        // Survivors keep their order, shifted down by the deletions below them.
        let expected: BTreeSet<usize> = selected
            .difference(&deleted)
            .map(|&idx| idx - deleted.range(..idx).count())
            .collect();
        prop_assert_eq!(selection.indices(), &expected);
    }

    #[test]
    fn test_segment_midpoint_is_near(a in point(), b in point(), tolerance in 1.0..50.0f64) {
        prop_assert!(point_near_segment(a.midpoint(b), a, b, tolerance));
    }

    #[test]
    fn test_point_far_off_segment_is_not_near(
        a in point(),
        dir in (-1.0..1.0f64, -1.0..1.0f64),
        len in 1.0..500.0f64,
        tolerance in 1.0..50.0f64,
    ) {
        let v = Vec2::new(dir.0, dir.1);
        prop_assume!(v.hypot() > 0.1);
        let unit = v / v.hypot();
        let b = a + unit * len;
        let normal = Vec2::new(-unit.y, unit.x);
        let off_segment = a.midpoint(b) + normal * (2.0 * tolerance);
        prop_assert!(!point_near_segment(off_segment, a, b, tolerance));
    }
}
