//! Pointer dispatch.
//!
//! [`InputRouter`] turns screen-space pointer events into edits. It converts
//! to world space through the [`Camera`], scales every screen-pixel tolerance
//! by the current zoom and then decides, per tool, what the gesture means.
//! It keeps only transient gesture state (pan, marquee); the document parts it
//! edits are lent to it for each event through [`EditorParts`].

use crate::camera::{Camera, ZoomDirection};
use crate::geometry::{point_near_endpoint, point_near_line_middle};
use crate::input::{InputState, Modifiers, MouseButton, PointerEvent};
use crate::selection::SelectionState;
use crate::settings::EditorSettings;
use crate::snap::snap_if;
use crate::store::ShapeStore;
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Rect};

/// Source of text for new text shapes (typically a modal input dialog).
pub trait TextPrompt {
    /// Ask the user for text. `None` means the prompt was cancelled.
    fn prompt_text(&mut self, title: &str) -> Option<String>;
}

impl<F> TextPrompt for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn prompt_text(&mut self, title: &str) -> Option<String> {
        self(title)
    }
}

/// Prompt that always cancels. Text clicks create nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl TextPrompt for NoPrompt {
    fn prompt_text(&mut self, _title: &str) -> Option<String> {
        None
    }
}

/// What an event changed, so the host knows what to refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    pub redraw: bool,
    pub tool_changed: bool,
    pub zoom_changed: bool,
    pub shapes_changed: bool,
}

impl EventResponse {
    pub fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    fn shapes_changed(changed: bool) -> Self {
        Self {
            redraw: true,
            shapes_changed: changed,
            ..Self::default()
        }
    }

    fn tool_changed() -> Self {
        Self {
            redraw: true,
            tool_changed: true,
            ..Self::default()
        }
    }

    /// Combine two responses.
    pub fn merge(self, other: Self) -> Self {
        Self {
            redraw: self.redraw || other.redraw,
            tool_changed: self.tool_changed || other.tool_changed,
            zoom_changed: self.zoom_changed || other.zoom_changed,
            shapes_changed: self.shapes_changed || other.shapes_changed,
        }
    }
}

/// The parts of the editor a pointer event may touch.
pub struct EditorParts<'a> {
    pub store: &'a mut ShapeStore,
    pub selection: &'a mut SelectionState,
    pub camera: &'a mut Camera,
    pub tools: &'a mut ToolManager,
    pub settings: &'a EditorSettings,
}

/// Rubber-band rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Marquee {
    anchor: Point,
    current: Point,
}

impl Marquee {
    fn rect(&self) -> Rect {
        Rect::from_points(self.anchor, self.current)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    input: InputState,
    panning: bool,
    marquee: Option<Marquee>,
    /// Last pointer position in world coordinates.
    cursor_world: Option<Point>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// The marquee being dragged, normalized.
    pub fn marquee_rect(&self) -> Option<Rect> {
        self.marquee.map(|m| m.rect())
    }

    /// Pointer position in world coordinates, for cursor readouts.
    pub fn cursor_world(&self) -> Option<Point> {
        self.cursor_world
    }

    /// Drop pan and marquee state.
    pub fn clear_transient(&mut self) {
        self.panning = false;
        self.marquee = None;
    }

    /// Handle one pointer event.
    pub fn handle_pointer(
        &mut self,
        parts: EditorParts<'_>,
        event: PointerEvent,
        prompt: &mut dyn TextPrompt,
    ) -> EventResponse {
        self.input.handle_pointer_event(&event);
        let world = parts.camera.screen_to_world(event.position());
        self.cursor_world = Some(world);

        match event {
            PointerEvent::Down {
                button, modifiers, ..
            } => self.on_press(parts, world, button, modifiers, prompt),
            PointerEvent::Move { modifiers, .. } => self.on_move(parts, world, modifiers),
            PointerEvent::Up {
                button, modifiers, ..
            } => self.on_release(parts, world, button, modifiers),
            PointerEvent::Wheel { delta, .. } => {
                if delta == 0.0 {
                    return EventResponse::default();
                }
                let zoomed = parts
                    .camera
                    .zoom_at(ZoomDirection::from_wheel_delta(delta), world);
                EventResponse {
                    redraw: zoomed,
                    zoom_changed: zoomed,
                    ..EventResponse::default()
                }
            }
        }
    }

    /// Abandon every gesture and return to the pan tool.
    pub fn cancel(&mut self, parts: EditorParts<'_>) -> EventResponse {
        self.clear_transient();
        self.input.reset_buttons();
        parts.selection.release();
        let changed = parts.tools.current_tool != ToolKind::Pan;
        parts.tools.set_tool(ToolKind::Pan);
        EventResponse {
            redraw: true,
            tool_changed: changed,
            ..EventResponse::default()
        }
    }

    fn on_press(
        &mut self,
        parts: EditorParts<'_>,
        world: Point,
        button: MouseButton,
        modifiers: Modifiers,
        prompt: &mut dyn TextPrompt,
    ) -> EventResponse {
        match button {
            MouseButton::Middle => {
                self.panning = true;
                EventResponse::redraw()
            }
            MouseButton::Right => self.on_right_press(parts),
            MouseButton::Left => self.on_left_press(parts, world, modifiers, prompt),
        }
    }

    fn on_left_press(
        &mut self,
        parts: EditorParts<'_>,
        world: Point,
        modifiers: Modifiers,
        prompt: &mut dyn TextPrompt,
    ) -> EventResponse {
        let tool = parts.tools.current_tool;
        let point = Self::drawing_point(parts.settings, tool, world);
        match tool {
            ToolKind::Pan => {
                self.panning = true;
                EventResponse::redraw()
            }
            ToolKind::Select => self.on_select_press(parts, world, modifiers),
            ToolKind::Text => {
                let shape = prompt
                    .prompt_text("Enter text:")
                    .and_then(|content| parts.tools.text_shape(point, &content));
                let created = shape.map(|shape| parts.store.add(shape)).is_some();
                EventResponse::shapes_changed(created)
            }
            ToolKind::Point => {
                parts.store.add(parts.tools.point_shape(point));
                EventResponse::shapes_changed(true)
            }
            ToolKind::Polygon => {
                parts.tools.add_polygon_point(point);
                EventResponse::redraw()
            }
            ToolKind::Line | ToolKind::Arrow | ToolKind::Circle | ToolKind::Ellipse | ToolKind::Rectangle => {
                EventResponse {
                    redraw: parts.tools.begin(point),
                    ..EventResponse::default()
                }
            }
        }
    }

    fn on_select_press(&mut self, parts: EditorParts<'_>, world: Point, modifiers: Modifiers) -> EventResponse {
        let EditorParts {
            store,
            selection,
            camera,
            settings,
            ..
        } = parts;
        let tolerance = |pixels: f64| camera.screen_to_world_distance(pixels);

        // Control points can sit off the curve, so they are checked before bodies.
        if let Some((index, handle)) =
            selection.control_handle_at(store, world, tolerance(settings.control_point_tolerance))
        {
            selection.begin_control_drag(index, handle);
            return EventResponse::redraw();
        }

        let Some(index) = store.shape_at_point(world, tolerance(settings.hit_tolerance)) else {
            self.marquee = Some(Marquee {
                anchor: world,
                current: world,
            });
            return EventResponse::redraw();
        };

        let geometry = store.get(index).map(|shape| shape.geometry.clone());
        if let Some((a, b)) = geometry.as_ref().and_then(|g| g.straight_segment()) {
            if let Some(end) = point_near_endpoint(world, a, b, tolerance(settings.endpoint_tolerance)) {
                let promoted = selection.promote_cubic(store, index, end);
                return EventResponse::shapes_changed(promoted);
            }
            if point_near_line_middle(world, a, b, tolerance(settings.midpoint_tolerance)).is_some() {
                selection.begin_promotion(index);
                return EventResponse::redraw();
            }
        }
        if let Some(handle) = geometry
            .as_ref()
            .and_then(|g| g.as_curve())
            .and_then(|curve| curve.handle_at(world, tolerance(settings.control_point_tolerance)))
        {
            selection.begin_control_drag(index, handle);
            return EventResponse::redraw();
        }

        if modifiers.ctrl {
            selection.toggle(index);
        } else if !selection.is_selected(index) {
            selection.select(index);
        }
        if selection.is_selected(index) {
            selection.begin_drag(store, world);
        }
        EventResponse::redraw()
    }

    fn on_right_press(&mut self, parts: EditorParts<'_>) -> EventResponse {
        let tools = parts.tools;
        if tools.current_tool == ToolKind::Polygon {
            if let Some(polygon) = tools.finish_polygon() {
                parts.store.add(polygon);
                return EventResponse::shapes_changed(true);
            }
        }
        self.clear_transient();
        parts.selection.release();
        if tools.current_tool != ToolKind::Pan {
            tools.set_tool(ToolKind::Pan);
            return EventResponse::tool_changed();
        }
        tools.cancel();
        EventResponse::redraw()
    }

    fn on_move(&mut self, parts: EditorParts<'_>, world: Point, modifiers: Modifiers) -> EventResponse {
        if self.panning {
            parts.camera.pan(self.input.pointer_delta());
            return EventResponse::redraw();
        }
        if parts.selection.is_manipulating() {
            let changed = parts.selection.update(parts.store, world);
            return EventResponse::shapes_changed(changed);
        }
        if let Some(marquee) = &mut self.marquee {
            marquee.current = world;
            return EventResponse::redraw();
        }
        if parts.tools.is_active() {
            let point = Self::drag_point(parts.settings, parts.tools, world, modifiers);
            parts.tools.update(point);
            return EventResponse::redraw();
        }
        EventResponse::default()
    }

    fn on_release(
        &mut self,
        parts: EditorParts<'_>,
        world: Point,
        button: MouseButton,
        modifiers: Modifiers,
    ) -> EventResponse {
        match button {
            MouseButton::Middle => {
                self.panning = false;
                EventResponse::redraw()
            }
            MouseButton::Right => EventResponse::default(),
            MouseButton::Left => {
                if self.panning {
                    self.panning = false;
                    return EventResponse::redraw();
                }
                if parts.selection.is_manipulating() {
                    parts.selection.release();
                    return EventResponse::redraw();
                }
                if parts.tools.is_active() {
                    let point = Self::drag_point(parts.settings, parts.tools, world, modifiers);
                    let created = parts
                        .tools
                        .end(point, parts.settings.min_draw_distance)
                        .map(|shape| parts.store.add(shape))
                        .is_some();
                    return EventResponse::shapes_changed(created);
                }
                if let Some(marquee) = self.marquee.take() {
                    self.finish_marquee(parts, marquee, world, modifiers);
                    return EventResponse::redraw();
                }
                EventResponse::default()
            }
        }
    }

    fn finish_marquee(&mut self, parts: EditorParts<'_>, marquee: Marquee, world: Point, modifiers: Modifiers) {
        let threshold = parts.settings.marquee_threshold;
        let moved = (world.x - marquee.anchor.x).abs() > threshold
            || (world.y - marquee.anchor.y).abs() > threshold;
        if !moved {
            // Plain click on empty canvas.
            if !modifiers.ctrl {
                parts.selection.clear();
            }
            return;
        }
        let hits = parts.store.shapes_in_rect(Rect::from_points(marquee.anchor, world));
        if !modifiers.ctrl {
            parts.selection.clear();
        }
        parts.selection.extend(hits);
    }

    /// World point adjusted by grid snapping. Select and pan never snap.
    fn drawing_point(settings: &EditorSettings, tool: ToolKind, world: Point) -> Point {
        snap_if(
            settings.snap_to_grid && tool.is_drawing_tool(),
            world,
            settings.grid_size,
        )
    }

    fn drag_point(settings: &EditorSettings, tools: &ToolManager, world: Point, modifiers: Modifiers) -> Point {
        let point = Self::drawing_point(settings, tools.current_tool, world);
        if modifiers.shift {
            tools.constrain(point)
        } else {
            point
        }
    }
}
