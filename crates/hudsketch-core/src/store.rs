//! Ordered shape collection.
//!
//! The store owns every shape. Selection and groups refer to shapes by their
//! position in this list, so removing a shape shifts the positions of all
//! shapes after it. The store itself does not fix up those references; the
//! [`Canvas`](crate::canvas::Canvas) does that in the same call.
//!
//! Out-of-range indices are ignored everywhere: operations return `None`,
//! `false` or an empty list instead of panicking.

use crate::geometry::{FlipDirection, Reflection, bounding_box};
use crate::shapes::{Geometry, Shape, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use std::collections::BTreeSet;

/// Default paste offset, in world units, on both axes.
pub const PASTE_OFFSET: f64 = 30.0;
/// Default gap between the original selection and its flipped duplicates.
pub const FLIP_GAP: f64 = 20.0;

#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
    clipboard: Vec<Shape>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an already-decoded shape list.
    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        Self {
            shapes,
            clipboard: Vec::new(),
        }
    }

    /// Append a shape and return its index.
    pub fn add(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    /// Remove the shape at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<Shape> {
        (index < self.shapes.len()).then(|| self.shapes.remove(index))
    }

    /// Remove the most recently added shape.
    pub fn undo(&mut self) -> Option<Shape> {
        self.shapes.pop()
    }

    /// Remove every shape. The clipboard survives.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Replace the whole list, keeping the clipboard.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index)
    }

    /// Shapes in drawing order (back to front).
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Swap in a new geometry payload, keeping the slot and its style.
    /// Returns the previous geometry.
    pub fn replace_geometry(&mut self, index: usize, geometry: Geometry) -> Option<Geometry> {
        let shape = self.shapes.get_mut(index)?;
        Some(std::mem::replace(&mut shape.geometry, geometry))
    }

    /// Topmost shape whose body is within `tolerance` of `point`.
    pub fn shape_at_point(&self, point: Point, tolerance: f64) -> Option<usize> {
        self.shapes
            .iter()
            .rposition(|shape| shape.hit_test(point, tolerance))
    }

    /// Indices of shapes whose defining points all lie inside `rect`.
    pub fn shapes_in_rect(&self, rect: Rect) -> Vec<usize> {
        self.shapes
            .iter()
            .enumerate()
            .filter(|(_, shape)| shape.inside_rect(rect))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Combined bounds of the given shapes.
    pub fn bounds_of(&self, indices: impl IntoIterator<Item = usize>) -> Option<Rect> {
        bounding_box(&self.shapes, indices)
    }

    /// Snapshot the given shapes, in index order, into the clipboard.
    ///
    /// Invalid indices are skipped. An empty selection empties the clipboard.
    pub fn copy(&mut self, indices: impl IntoIterator<Item = usize>) -> usize {
        let sorted: BTreeSet<usize> = indices.into_iter().collect();
        self.clipboard = sorted
            .into_iter()
            .filter_map(|idx| self.shapes.get(idx).cloned())
            .collect();
        self.clipboard.len()
    }

    pub fn clipboard(&self) -> &[Shape] {
        &self.clipboard
    }

    /// Append clipboard clones shifted by `offset` and return their indices.
    ///
    /// The clipboard itself is never shifted, so pasting twice puts both
    /// copies at the same place.
    pub fn paste(&mut self, offset: Vec2) -> Vec<usize> {
        let clones: Vec<Shape> = self
            .clipboard
            .iter()
            .map(|shape| shape.translated(offset))
            .collect();
        self.append_all(clones)
    }

    /// Append mirrored clones placed beside the selection (see [`Self::flip`]).
    pub fn flip_horizontal(&mut self, indices: &BTreeSet<usize>, gap: f64) -> Vec<usize> {
        self.flip(indices, FlipDirection::Horizontal, gap)
    }

    pub fn flip_vertical(&mut self, indices: &BTreeSet<usize>, gap: f64) -> Vec<usize> {
        self.flip(indices, FlipDirection::Vertical, gap)
    }

    /// Append a mirrored clone of every shape in `indices`.
    ///
    /// The mirror axis lies `gap` past the far edge of the combined bounding
    /// box, so the duplicates land beside the originals without overlapping.
    pub fn flip(&mut self, indices: &BTreeSet<usize>, direction: FlipDirection, gap: f64) -> Vec<usize> {
        let Some(bounds) = self.bounds_of(indices.iter().copied()) else {
            return Vec::new();
        };
        let axis = match direction {
            FlipDirection::Horizontal => bounds.x1 + gap,
            FlipDirection::Vertical => bounds.y1 + gap,
        };
        let reflection = Reflection::new(direction, axis);
        let clones: Vec<Shape> = indices
            .iter()
            .filter_map(|&idx| self.shapes.get(idx))
            .map(|shape| shape.reflected(&reflection))
            .collect();
        self.append_all(clones)
    }

    /// Mirror the given shapes in place about `axis`. Returns how many changed.
    pub fn mirror_across_center(
        &mut self,
        indices: &BTreeSet<usize>,
        direction: FlipDirection,
        axis: f64,
    ) -> usize {
        let reflection = Reflection::new(direction, axis);
        let mut count = 0;
        for &idx in indices {
            if let Some(shape) = self.shapes.get_mut(idx) {
                shape.geometry.reflect(&reflection);
                count += 1;
            }
        }
        count
    }

    fn append_all(&mut self, shapes: Vec<Shape>) -> Vec<usize> {
        shapes.into_iter().map(|shape| self.add(shape)).collect()
    }
}
