//! The editing session.
//!
//! [`Canvas`] owns the shape store, selection, groups, camera and tools, and
//! is the only place shapes are removed. Every removal fixes up selection and
//! group indices in the same call, so index references never go stale.

use crate::camera::Camera;
use crate::document::{DocumentResult, ProjectDocument};
use crate::geometry::FlipDirection;
use crate::groups::{GroupRegistry, ShapeGroup};
use crate::input::{InputEvent, Key};
use crate::router::{EditorParts, EventResponse, InputRouter, TextPrompt};
use crate::selection::SelectionState;
use crate::settings::{CanvasLimits, EditorSettings};
use crate::shapes::{BgrColor, LineStyle, Shape, StyleTag};
use crate::storage::{Storage, StorageResult};
use crate::store::ShapeStore;
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Rect};
use std::collections::BTreeSet;

/// Style fields to change on the selected shapes. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    pub color: Option<BgrColor>,
    pub thickness: Option<u32>,
    pub tag: Option<StyleTag>,
    pub line_style: Option<LineStyle>,
    pub dash_length: Option<u32>,
    pub dot_length: Option<u32>,
    /// Only applied to fillable kinds.
    pub filled: Option<bool>,
    /// Only applied to text.
    pub font_scale: Option<f64>,
}

impl StylePatch {
    /// Apply the patch to one shape.
    pub fn apply(&self, shape: &mut Shape) {
        let fillable = shape.is_fillable();
        let style = &mut shape.style;
        if let Some(color) = self.color {
            style.color = color;
        }
        if let Some(thickness) = self.thickness {
            style.thickness = thickness.max(1);
        }
        if let Some(tag) = self.tag {
            style.tag = tag;
        }
        if let Some(line_style) = self.line_style {
            style.line_style = line_style;
        }
        if let Some(dash) = self.dash_length {
            style.dash_length = dash.max(1);
        }
        if let Some(dot) = self.dot_length {
            style.dot_length = dot.max(1);
        }
        if let Some(filled) = self.filled.filter(|_| fillable) {
            style.filled = filled;
        }
        if let (Some(scale), Some(text)) = (self.font_scale, shape.as_text_mut()) {
            if scale > 0.0 {
                text.font_scale = scale;
            }
        }
    }
}

/// Editing session state.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    store: ShapeStore,
    selection: SelectionState,
    groups: GroupRegistry,
    router: InputRouter,
    /// Camera for view transform.
    pub camera: Camera,
    /// Tool manager.
    pub tools: ToolManager,
    pub settings: EditorSettings,
    /// Output frame for exported overlays.
    pub canvas_limits: CanvasLimits,
}

impl Canvas {
    /// Create a new canvas with an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    /// Shapes in drawing order.
    pub fn shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    // --- input ---

    /// Dispatch one input event.
    pub fn handle_event(&mut self, event: InputEvent, prompt: &mut dyn TextPrompt) -> EventResponse {
        match event {
            InputEvent::Pointer(pointer) => {
                let (router, parts) = self.split_router();
                router.handle_pointer(parts, pointer, prompt)
            }
            InputEvent::KeyPressed(Key::Escape) => {
                let (router, parts) = self.split_router();
                router.cancel(parts)
            }
            InputEvent::KeyPressed(Key::Delete) => {
                let removed = self.delete_selected();
                EventResponse {
                    redraw: removed > 0,
                    shapes_changed: removed > 0,
                    ..EventResponse::default()
                }
            }
        }
    }

    fn split_router(&mut self) -> (&mut InputRouter, EditorParts<'_>) {
        let parts = EditorParts {
            store: &mut self.store,
            selection: &mut self.selection,
            camera: &mut self.camera,
            tools: &mut self.tools,
            settings: &self.settings,
        };
        (&mut self.router, parts)
    }

    /// Switch tools, dropping every in-progress gesture.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
        self.router.clear_transient();
        self.selection.release();
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Shape the active drawing gesture would create.
    pub fn preview_shape(&self) -> Option<Shape> {
        self.tools.preview_shape()
    }

    pub fn marquee_rect(&self) -> Option<Rect> {
        self.router.marquee_rect()
    }

    /// Vertices of the polygon being drawn.
    pub fn polygon_points(&self) -> &[Point] {
        self.tools.polygon_points()
    }

    pub fn status_text(&self) -> Option<String> {
        self.tools.status_text()
    }

    // --- shape list ---

    /// Append a shape and return its index.
    pub fn add_shape(&mut self, shape: Shape) -> usize {
        self.store.add(shape)
    }

    /// Remove one shape and shift every index reference past it.
    pub fn remove_shape(&mut self, index: usize) -> Option<Shape> {
        let removed = self.store.remove_at(index)?;
        self.selection.reconcile_deletion(index);
        self.groups.reconcile_deletion(index);
        Some(removed)
    }

    /// Delete the selected shapes. Returns how many were removed.
    ///
    /// Refused while a drag or curve edit is in progress.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_manipulating() {
            log::debug!("delete ignored during an active manipulation");
            return 0;
        }
        let doomed: Vec<usize> = self.selection.indices().iter().rev().copied().collect();
        doomed
            .into_iter()
            .filter_map(|idx| self.remove_shape(idx))
            .count()
    }

    /// Remove the most recently added shape.
    pub fn undo(&mut self) -> bool {
        let Some(last) = self.store.len().checked_sub(1) else {
            return false;
        };
        self.remove_shape(last).is_some()
    }

    /// Remove every shape, the selection and all groups.
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.selection.reset();
        self.groups.clear();
        self.tools.cancel();
        self.router.clear_transient();
    }

    // --- clipboard and mirroring ---

    /// Copy the selection to the clipboard. Returns the number of shapes copied.
    pub fn copy_selected(&mut self) -> usize {
        self.store.copy(self.selection.indices().iter().copied())
    }

    /// Paste the clipboard at the configured offset and select the result.
    pub fn paste(&mut self) -> Vec<usize> {
        let pasted = self.store.paste(self.settings.paste_offset);
        if !pasted.is_empty() {
            self.selection.set(pasted.iter().copied());
        }
        pasted
    }

    /// Add mirrored copies of the selection to its right and select them.
    pub fn flip_horizontal(&mut self) -> Vec<usize> {
        self.flip(FlipDirection::Horizontal)
    }

    /// Add mirrored copies of the selection below it and select them.
    pub fn flip_vertical(&mut self) -> Vec<usize> {
        self.flip(FlipDirection::Vertical)
    }

    fn flip(&mut self, direction: FlipDirection) -> Vec<usize> {
        let created = self
            .store
            .flip(self.selection.indices(), direction, self.settings.flip_gap);
        if !created.is_empty() {
            self.selection.set(created.iter().copied());
        }
        created
    }

    /// Mirror the selection in place about the center of its bounding box.
    pub fn mirror_selected(&mut self, direction: FlipDirection) -> usize {
        let Some(bounds) = self.selection_bounds() else {
            return 0;
        };
        let axis = match direction {
            FlipDirection::Horizontal => bounds.center().x,
            FlipDirection::Vertical => bounds.center().y,
        };
        self.store
            .mirror_across_center(self.selection.indices(), direction, axis)
    }

    /// Mirror the given shapes about an explicit axis, such as the canvas center.
    pub fn mirror_across(&mut self, indices: &BTreeSet<usize>, direction: FlipDirection, axis: f64) -> usize {
        self.store.mirror_across_center(indices, direction, axis)
    }

    pub fn selection_bounds(&self) -> Option<Rect> {
        self.store.bounds_of(self.selection.indices().iter().copied())
    }

    /// Change style fields on every selected shape. Returns how many changed.
    pub fn apply_style(&mut self, patch: &StylePatch) -> usize {
        let mut count = 0;
        for &idx in self.selection.indices() {
            if let Some(shape) = self.store.get_mut(idx) {
                patch.apply(shape);
                count += 1;
            }
        }
        count
    }

    // --- selection ---

    pub fn select_all(&mut self) {
        self.selection.set(0..self.store.len());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Replace the selection, ignoring indices past the end of the list.
    pub fn select(&mut self, indices: impl IntoIterator<Item = usize>) {
        let len = self.store.len();
        self.selection.set(indices.into_iter().filter(|&idx| idx < len));
    }

    /// Select the members of a group. Returns false for an unknown name.
    pub fn select_group(&mut self, name: &str) -> bool {
        let Some(group) = self.groups.get(name) else {
            return false;
        };
        let members: Vec<usize> = group.indices.iter().copied().collect();
        self.select(members);
        true
    }

    // --- groups ---

    /// Group the current selection. Returns the final (possibly suffixed)
    /// name, or `None` when nothing is selected.
    pub fn create_group(&mut self, name: &str) -> Option<String> {
        if self.selection.is_empty() {
            return None;
        }
        let members: Vec<usize> = self.selection.indices().iter().copied().collect();
        Some(self.groups.create(name, members))
    }

    pub fn rename_group(&mut self, old: &str, new: &str) -> bool {
        self.groups.rename(old, new)
    }

    /// Delete a group. Its shapes stay.
    pub fn delete_group(&mut self, name: &str) -> bool {
        self.groups.delete(name)
    }

    pub fn add_selection_to_group(&mut self, name: &str) -> bool {
        let members: Vec<usize> = self.selection.indices().iter().copied().collect();
        self.groups.add_to_group(name, members)
    }

    pub fn remove_selection_from_group(&mut self, name: &str) -> bool {
        let members: Vec<usize> = self.selection.indices().iter().copied().collect();
        self.groups.remove_from_group(name, members)
    }

    pub fn set_group_color(&mut self, name: &str, color: [u8; 3]) -> bool {
        match self.groups.get_mut(name) {
            Some(group) => {
                group.color = color;
                true
            }
            None => false,
        }
    }

    /// Names of the groups the shape at `index` belongs to.
    pub fn groups_for_shape(&self, index: usize) -> Vec<&str> {
        self.groups
            .groups_for_shape(index)
            .map(|g| g.name.as_str())
            .collect()
    }

    /// Shapes that belong to no group.
    pub fn ungrouped(&self) -> BTreeSet<usize> {
        self.groups.ungrouped(self.store.len())
    }

    // --- persistence ---

    /// Consistent copy of everything a project file stores.
    pub fn snapshot(&self) -> ProjectDocument {
        ProjectDocument {
            shapes: self.store.shapes().to_vec(),
            groups: self.groups.iter().cloned().collect::<Vec<ShapeGroup>>(),
            canvas_limits: Some(self.canvas_limits),
        }
    }

    pub fn to_json(&self) -> DocumentResult<String> {
        self.snapshot().to_json()
    }

    /// Replace the shapes and groups with a decoded document.
    ///
    /// Selection and in-progress gestures are dropped. The clipboard survives.
    pub fn load_document(&mut self, document: ProjectDocument) {
        let ProjectDocument {
            shapes,
            groups,
            canvas_limits,
        } = document;
        log::info!("loaded {} shapes and {} groups", shapes.len(), groups.len());
        self.store.replace_all(shapes);
        self.groups = GroupRegistry::from_groups(groups);
        if let Some(limits) = canvas_limits {
            self.canvas_limits = limits;
        }
        self.selection.reset();
        self.tools.cancel();
        self.router.clear_transient();
    }

    /// Decode `json` and load it. On error nothing changes.
    pub fn load_json(&mut self, json: &str) -> DocumentResult<()> {
        let document = ProjectDocument::from_json(json).inspect_err(|e| {
            log::warn!("project load failed: {e}");
        })?;
        self.load_document(document);
        Ok(())
    }

    /// Save the session under `id`.
    pub fn save_to<S: Storage + ?Sized>(&self, storage: &S, id: &str) -> StorageResult<()> {
        storage.save(id, &self.snapshot())?;
        log::info!("saved project {id:?}");
        Ok(())
    }

    /// Load the project stored under `id`.
    pub fn load_from<S: Storage + ?Sized>(&mut self, storage: &S, id: &str) -> StorageResult<()> {
        let document = storage.load(id)?;
        self.load_document(document);
        Ok(())
    }

    /// Reset pan and zoom.
    pub fn reset_view(&mut self) {
        self.camera.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Modifiers, MouseButton, PointerEvent};
    use crate::router::NoPrompt;
    use crate::selection::Manipulation;
    use crate::shapes::ShapeStyle;
    use crate::storage::MemoryStorage;

    fn point(x: f64, y: f64) -> Shape {
        Shape::point(Point::new(x, y), ShapeStyle::default())
    }

    fn canvas_with_points(n: usize) -> Canvas {
        let mut canvas = Canvas::new();
        for i in 0..n {
            canvas.add_shape(point(i as f64 * 100.0, 0.0));
        }
        canvas
    }

    #[test]
    fn test_delete_selected_reconciles_groups() {
        let mut canvas = canvas_with_points(5);
        canvas.select([1, 2, 3, 4]);
        canvas.create_group("tail").unwrap();
        canvas.select([0, 4]);
        canvas.create_group("ends").unwrap();

        canvas.select([1, 3]);
        assert_eq!(canvas.delete_selected(), 2);
        assert_eq!(canvas.shapes().len(), 3);
        assert!(canvas.selection().is_empty());

        let tail: Vec<usize> = canvas.groups().get("tail").unwrap().indices.iter().copied().collect();
        assert_eq!(tail, vec![1, 2]);
        let ends: Vec<usize> = canvas.groups().get("ends").unwrap().indices.iter().copied().collect();
        assert_eq!(ends, vec![0, 2]);
    }

    #[test]
    fn test_delete_refused_while_dragging() {
        let mut canvas = canvas_with_points(2);
        canvas.set_tool(ToolKind::Select);
        let mut prompt = NoPrompt;
        canvas.handle_event(
            PointerEvent::Down {
                position: Point::new(0.0, 0.0),
                button: MouseButton::Left,
                modifiers: Modifiers::NONE,
            }
            .into(),
            &mut prompt,
        );
        assert!(matches!(canvas.selection().manipulation(), Manipulation::Dragging(_)));

        let response = canvas.handle_event(InputEvent::KeyPressed(Key::Delete), &mut prompt);
        assert!(!response.shapes_changed);
        assert_eq!(canvas.shapes().len(), 2);
    }

    #[test]
    fn test_undo_reconciles_last_index() {
        let mut canvas = canvas_with_points(3);
        canvas.select([0, 2]);
        canvas.create_group("g").unwrap();

        assert!(canvas.undo());
        assert_eq!(canvas.shapes().len(), 2);
        assert_eq!(canvas.selection().indices().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert!(!canvas.groups().get("g").unwrap().contains(2));

        assert!(canvas.undo());
        assert!(canvas.undo());
        assert!(!canvas.undo());
    }

    #[test]
    fn test_clear_all() {
        let mut canvas = canvas_with_points(3);
        canvas.select_all();
        canvas.create_group("all").unwrap();
        canvas.clear_all();
        assert!(canvas.shapes().is_empty());
        assert!(canvas.selection().is_empty());
        assert!(canvas.groups().is_empty());
    }

    #[test]
    fn test_paste_selects_pasted() {
        let mut canvas = canvas_with_points(2);
        canvas.select_all();
        assert_eq!(canvas.copy_selected(), 2);
        assert_eq!(canvas.paste(), vec![2, 3]);
        assert_eq!(canvas.selection().indices().iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(canvas.shapes()[2].bounds().origin(), Point::new(30.0, 30.0));
    }

    #[test]
    fn test_flip_selects_clones() {
        let mut canvas = Canvas::new();
        canvas.add_shape(Shape::line(Point::new(0.0, 0.0), Point::new(100.0, 50.0), ShapeStyle::default()));
        canvas.select_all();

        let created = canvas.flip_horizontal();
        assert_eq!(created, vec![1]);
        assert!(canvas.selection().is_selected(1));
        // Axis at x = 100 + 20.
        assert_eq!(
            canvas.shapes()[1].geometry.straight_segment(),
            Some((Point::new(240.0, 0.0), Point::new(140.0, 50.0)))
        );
    }

    #[test]
    fn test_mirror_selected_in_place() {
        let mut canvas = Canvas::new();
        canvas.add_shape(Shape::line(Point::new(0.0, 0.0), Point::new(100.0, 50.0), ShapeStyle::default()));
        canvas.select_all();

        assert_eq!(canvas.mirror_selected(FlipDirection::Vertical), 1);
        assert_eq!(canvas.shapes().len(), 1);
        assert_eq!(
            canvas.shapes()[0].geometry.straight_segment(),
            Some((Point::new(0.0, 50.0), Point::new(100.0, 0.0)))
        );
    }

    #[test]
    fn test_apply_style_respects_kind() {
        let mut canvas = Canvas::new();
        let style = ShapeStyle::default();
        canvas.add_shape(Shape::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0), style.clone()));
        canvas.add_shape(Shape::circle(Point::new(0.0, 0.0), 10.0, style.clone()));
        canvas.add_shape(Shape::text(Point::new(0.0, 0.0), "hi", 1.0, style));
        canvas.select_all();

        let patch = StylePatch {
            color: Some(BgrColor::RED),
            thickness: Some(0),
            filled: Some(true),
            font_scale: Some(2.0),
            ..StylePatch::default()
        };
        assert_eq!(canvas.apply_style(&patch), 3);

        let shapes = canvas.shapes();
        assert!(shapes.iter().all(|s| s.style.color == BgrColor::RED));
        assert!(shapes.iter().all(|s| s.style.thickness == 1));
        assert!(!shapes[0].style.filled);
        assert!(shapes[1].style.filled);
        assert!(!shapes[2].style.filled);
        assert!((shapes[2].as_text().unwrap().font_scale - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_select_group_and_membership() {
        let mut canvas = canvas_with_points(4);
        canvas.select([1, 2]);
        assert_eq!(canvas.create_group("pair").as_deref(), Some("pair"));
        canvas.select([3]);
        assert_eq!(canvas.create_group("pair").as_deref(), Some("pair_1"));
        assert!(canvas.add_selection_to_group("pair"));

        canvas.clear_selection();
        assert!(canvas.select_group("pair"));
        assert_eq!(canvas.selection().len(), 3);
        assert!(!canvas.select_group("missing"));

        assert_eq!(canvas.groups_for_shape(3), vec!["pair", "pair_1"]);
        assert_eq!(canvas.ungrouped().into_iter().collect::<Vec<_>>(), vec![0]);

        canvas.clear_selection();
        assert!(canvas.create_group("empty").is_none());
    }

    #[test]
    fn test_load_replaces_and_clears_selection() {
        let mut source = canvas_with_points(2);
        source.select_all();
        source.create_group("both").unwrap();
        let json = source.to_json().unwrap();

        let mut canvas = canvas_with_points(5);
        canvas.select([0, 1]);
        canvas.create_group("old").unwrap();
        canvas.load_json(&json).unwrap();

        assert_eq!(canvas.shapes().len(), 2);
        assert!(canvas.selection().is_empty());
        assert!(canvas.groups().get("old").is_none());
        assert!(canvas.groups().get("both").is_some());
    }

    #[test]
    fn test_load_renames_duplicate_groups() {
        let json = r#"{
            "version": "2.3",
            "shapes": [
                {"kind": "point", "color": [0, 0, 255], "thickness": 2, "coords": {"x": 1, "y": 1}},
                {"kind": "point", "color": [0, 0, 255], "thickness": 2, "coords": {"x": 9, "y": 9}}
            ],
            "groups": {"groups": [
                {"name": "hud", "indices": [0]},
                {"name": "hud", "indices": [1]}
            ]}
        }"#;
        let mut canvas = Canvas::new();
        canvas.load_json(json).unwrap();
        assert_eq!(canvas.groups().names(), vec!["hud", "hud_1"]);

        assert!(canvas.rename_group("hud", "left"));
        assert_eq!(canvas.groups().names(), vec!["left", "hud_1"]);
        assert!(canvas.delete_group("hud_1"));
        assert_eq!(canvas.groups().names(), vec!["left"]);
    }

    #[test]
    fn test_failed_load_changes_nothing() {
        let mut canvas = canvas_with_points(3);
        canvas.select([1]);
        let bad = r#"{"version":"2.3","shapes":[{"kind":"hexagon","coords":{}}]}"#;
        assert!(canvas.load_json(bad).is_err());
        assert_eq!(canvas.shapes().len(), 3);
        assert!(canvas.selection().is_selected(1));
    }

    #[test]
    fn test_storage_round_trip() {
        let storage = MemoryStorage::new();
        let mut canvas = canvas_with_points(3);
        canvas.canvas_limits = CanvasLimits {
            enabled: true,
            width: 640,
            height: 480,
        };
        canvas.save_to(&storage, "session").unwrap();

        let mut restored = Canvas::new();
        restored.load_from(&storage, "session").unwrap();
        assert_eq!(restored.shapes(), canvas.shapes());
        assert_eq!(restored.canvas_limits, canvas.canvas_limits);
    }

    #[test]
    fn test_escape_returns_to_pan() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Polygon);
        let mut prompt = NoPrompt;
        canvas.handle_event(
            PointerEvent::Down {
                position: Point::new(10.0, 10.0),
                button: MouseButton::Left,
                modifiers: Modifiers::NONE,
            }
            .into(),
            &mut prompt,
        );
        assert_eq!(canvas.polygon_points().len(), 1);

        let response = canvas.handle_event(InputEvent::KeyPressed(Key::Escape), &mut prompt);
        assert!(response.tool_changed);
        assert_eq!(canvas.current_tool(), ToolKind::Pan);
        assert!(canvas.polygon_points().is_empty());
    }
}
