//! Selection set and the drag / curve-editing state machine.
//!
//! At most one manipulation is active at a time:
//!
//! ```text
//! Idle ──body press──▶ Dragging ──release──▶ Idle
//! Idle ──segment middle──▶ PromotionPending ──first move──▶ ControlDragging
//! Idle ──segment endpoint (cubic promotion)──▶ ControlDragging
//! Idle ──control point of a curve──▶ ControlDragging ──release──▶ Idle
//! ```

use crate::geometry::Endpoint;
use crate::shapes::{ControlHandle, Geometry, ShapeTrait};
use crate::store::ShapeStore;
use kurbo::{Point, Vec2};
use std::collections::{BTreeSet, HashMap};

/// Snapshot-based move of every selected shape.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMoveState {
    /// Starting point of the drag (world coordinates).
    pub start_point: Point,
    /// Current point of the drag.
    pub current_point: Point,
    /// Geometry of each moved shape when the drag began.
    pub original_geometry: HashMap<usize, Geometry>,
}

impl MultiMoveState {
    pub fn new(start_point: Point, original_geometry: HashMap<usize, Geometry>) -> Self {
        Self {
            start_point,
            current_point: start_point,
            original_geometry,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }
}

/// The active pointer manipulation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Manipulation {
    #[default]
    Idle,
    /// Moving the selected shapes.
    Dragging(MultiMoveState),
    /// The middle of a line or arrow was grabbed. The first move bends it
    /// into a quadratic curve.
    PromotionPending { index: usize },
    /// Moving one control point of a curve.
    ControlDragging { index: usize, handle: ControlHandle },
}

impl Manipulation {
    pub fn is_idle(&self) -> bool {
        matches!(self, Manipulation::Idle)
    }

    /// Shape the manipulation is anchored on, for single-shape states.
    pub fn target(&self) -> Option<usize> {
        match self {
            Manipulation::PromotionPending { index } | Manipulation::ControlDragging { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}

/// Selected shape indices plus the active manipulation.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: BTreeSet<usize>,
    manipulation: Manipulation,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Make `index` the only selected shape.
    pub fn select(&mut self, index: usize) {
        self.selected.clear();
        self.selected.insert(index);
    }

    /// Add a shape to the selection.
    pub fn add(&mut self, index: usize) {
        self.selected.insert(index);
    }

    /// Flip membership of `index`. Returns whether it is now selected.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.selected.remove(&index) {
            false
        } else {
            self.selected.insert(index);
            true
        }
    }

    pub fn deselect(&mut self, index: usize) -> bool {
        self.selected.remove(&index)
    }

    /// Replace the selection with `indices`.
    pub fn set(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.selected = indices.into_iter().collect();
    }

    /// Add every index in `indices` to the selection.
    pub fn extend(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.selected.extend(indices);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn manipulation(&self) -> &Manipulation {
        &self.manipulation
    }

    /// True while a drag, pending promotion or control-point drag is active.
    pub fn is_manipulating(&self) -> bool {
        !self.manipulation.is_idle()
    }

    /// Start moving the selected shapes from `start`, snapshotting their geometry.
    pub fn begin_drag(&mut self, store: &ShapeStore, start: Point) {
        let original_geometry = self
            .selected
            .iter()
            .filter_map(|&idx| store.get(idx).map(|shape| (idx, shape.geometry.clone())))
            .collect();
        self.manipulation = Manipulation::Dragging(MultiMoveState::new(start, original_geometry));
    }

    /// Arm the quadratic promotion of the line or arrow at `index`.
    pub fn begin_promotion(&mut self, index: usize) {
        self.manipulation = Manipulation::PromotionPending { index };
    }

    /// Start moving one control point of the curve at `index`.
    pub fn begin_control_drag(&mut self, index: usize, handle: ControlHandle) {
        self.manipulation = Manipulation::ControlDragging { index, handle };
    }

    /// Turn the line or arrow at `index` into a cubic curve right away and
    /// start dragging the control point on the grabbed side.
    ///
    /// Returns `false` (and changes nothing) if the slot is not a straight segment.
    pub fn promote_cubic(&mut self, store: &mut ShapeStore, index: usize, grabbed: Endpoint) -> bool {
        let Some((curve, handle)) = store
            .get(index)
            .and_then(|shape| shape.geometry.promote_cubic(grabbed))
        else {
            return false;
        };
        store.replace_geometry(index, curve);
        log::debug!("promoted shape {index} to a cubic curve ({handle:?})");
        self.select(index);
        self.begin_control_drag(index, handle);
        true
    }

    /// Apply a pointer move in world coordinates. Returns `true` if any
    /// shape changed.
    pub fn update(&mut self, store: &mut ShapeStore, world: Point) -> bool {
        match &mut self.manipulation {
            Manipulation::Idle => false,
            Manipulation::Dragging(state) => {
                state.current_point = world;
                let delta = state.delta();
                let mut changed = false;
                for (&idx, original) in &state.original_geometry {
                    let Some(shape) = store.get_mut(idx) else {
                        continue;
                    };
                    let mut moved = original.clone();
                    moved.translate(delta);
                    shape.geometry = moved;
                    changed = true;
                }
                changed
            }
            Manipulation::PromotionPending { index } => {
                let index = *index;
                let Some(curve) = store
                    .get(index)
                    .and_then(|shape| shape.geometry.promote_quadratic(world))
                else {
                    self.manipulation = Manipulation::Idle;
                    return false;
                };
                store.replace_geometry(index, curve);
                log::debug!("promoted shape {index} to a quadratic curve");
                self.select(index);
                self.manipulation = Manipulation::ControlDragging {
                    index,
                    handle: ControlHandle::Control,
                };
                true
            }
            Manipulation::ControlDragging { index, handle } => store
                .get_mut(*index)
                .and_then(|shape| shape.geometry.as_curve_mut())
                .is_some_and(|curve| curve.set_control_point(*handle, world)),
        }
    }

    /// End any manipulation and drop its snapshots.
    pub fn release(&mut self) {
        self.manipulation = Manipulation::Idle;
    }

    /// Topmost control point of a *selected* curve within `tolerance`.
    pub fn control_handle_at(
        &self,
        store: &ShapeStore,
        point: Point,
        tolerance: f64,
    ) -> Option<(usize, ControlHandle)> {
        self.selected.iter().rev().find_map(|&idx| {
            let curve = store.get(idx)?.geometry.as_curve()?;
            curve.handle_at(point, tolerance).map(|handle| (idx, handle))
        })
    }

    /// Fix up indices after the shape at `deleted` was removed from the store.
    ///
    /// The deleted index leaves the selection and every higher index moves
    /// down by one. A manipulation anchored on the deleted shape is dropped.
    pub fn reconcile_deletion(&mut self, deleted: usize) {
        self.selected = shift_indices_after_removal(&self.selected, deleted);

        let manipulation = std::mem::take(&mut self.manipulation);
        self.manipulation = match manipulation {
            Manipulation::Idle => Manipulation::Idle,
            Manipulation::Dragging(mut state) => {
                state.original_geometry = state
                    .original_geometry
                    .into_iter()
                    .filter_map(|(idx, geometry)| shift_index(idx, deleted).map(|idx| (idx, geometry)))
                    .collect();
                Manipulation::Dragging(state)
            }
            Manipulation::PromotionPending { index } => match shift_index(index, deleted) {
                Some(index) => Manipulation::PromotionPending { index },
                None => Manipulation::Idle,
            },
            Manipulation::ControlDragging { index, handle } => match shift_index(index, deleted) {
                Some(index) => Manipulation::ControlDragging { index, handle },
                None => Manipulation::Idle,
            },
        };
    }

    /// Drop selection and manipulation, as after a load or clear.
    pub fn reset(&mut self) {
        self.selected.clear();
        self.manipulation = Manipulation::Idle;
    }
}

/// New position of `index` after `deleted` was removed, or `None` if it was
/// the removed shape.
pub fn shift_index(index: usize, deleted: usize) -> Option<usize> {
    match index.cmp(&deleted) {
        std::cmp::Ordering::Less => Some(index),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(index - 1),
    }
}

/// Apply [`shift_index`] to a whole set.
pub fn shift_indices_after_removal(indices: &BTreeSet<usize>, deleted: usize) -> BTreeSet<usize> {
    indices
        .iter()
        .filter_map(|&idx| shift_index(idx, deleted))
        .collect()
}
