//! Tool modes and shape construction from pointer gestures.

use crate::shapes::{Geometry, Polygon, Shape, ShapeKind, ShapeStyle, Text};
use crate::snap::{constrain_to_axis, round_point};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pan,
    Select,
    Line,
    Arrow,
    Circle,
    Ellipse,
    Rectangle,
    Polygon,
    Point,
    Text,
}

impl ToolKind {
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Pan,
            ToolKind::Select,
            ToolKind::Line,
            ToolKind::Arrow,
            ToolKind::Circle,
            ToolKind::Ellipse,
            ToolKind::Rectangle,
            ToolKind::Polygon,
            ToolKind::Point,
            ToolKind::Text,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Pan => "pan",
            ToolKind::Select => "select",
            ToolKind::Line => "line",
            ToolKind::Arrow => "arrow",
            ToolKind::Circle => "circle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Polygon => "polygon",
            ToolKind::Point => "point",
            ToolKind::Text => "text",
        }
    }

    /// Tools that create a shape from a press-drag-release gesture.
    pub fn is_drag_tool(&self) -> bool {
        matches!(
            self,
            ToolKind::Line | ToolKind::Arrow | ToolKind::Circle | ToolKind::Ellipse | ToolKind::Rectangle
        )
    }

    /// Tools that add shapes (and therefore honour grid snapping).
    pub fn is_drawing_tool(&self) -> bool {
        !matches!(self, ToolKind::Pan | ToolKind::Select)
    }

    /// Tools whose second point Shift locks to the dominant axis.
    pub fn constrains_axis(&self) -> bool {
        matches!(self, ToolKind::Line | ToolKind::Arrow)
    }

    /// Shape kind this tool produces.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            ToolKind::Pan | ToolKind::Select => None,
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Arrow => Some(ShapeKind::Arrow),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Polygon => Some(ShapeKind::Polygon),
            ToolKind::Point => Some(ShapeKind::Point),
            ToolKind::Text => Some(ShapeKind::Text),
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolState {
    /// Waiting for a press.
    #[default]
    Idle,
    /// Press registered; tracking the pointer.
    Active {
        /// Anchor of the gesture (world coordinates).
        start: Point,
        /// Latest pointer position.
        current: Point,
    },
}

/// Current tool, its in-progress gesture and the style applied to new shapes.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Drag gesture state.
    pub state: ToolState,
    /// Vertices placed so far by the polygon tool.
    polygon_points: Vec<Point>,
    /// Style copied into every new shape.
    pub current_style: ShapeStyle,
    /// Font scale for new text shapes.
    pub font_scale: f64,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            state: ToolState::default(),
            polygon_points: Vec::new(),
            current_style: ShapeStyle::default(),
            font_scale: Text::DEFAULT_FONT_SCALE,
        }
    }
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, dropping any in-progress gesture.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.cancel();
    }

    /// Begin a drag gesture at `point`. Returns `false` if the current tool
    /// does not draw by dragging.
    pub fn begin(&mut self, point: Point) -> bool {
        if !self.current_tool.is_drag_tool() {
            return false;
        }
        self.state = ToolState::Active {
            start: point,
            current: point,
        };
        true
    }

    /// Track the pointer during a gesture.
    pub fn update(&mut self, point: Point) {
        if let ToolState::Active { current, .. } = &mut self.state {
            *current = point;
        }
    }

    /// Anchor of the active gesture.
    pub fn anchor(&self) -> Option<Point> {
        match self.state {
            ToolState::Active { start, .. } => Some(start),
            ToolState::Idle => None,
        }
    }

    /// Check if a drag gesture is active.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// Lock `point` to the dominant axis through the gesture anchor when the
    /// tool supports it.
    pub fn constrain(&self, point: Point) -> Point {
        match self.anchor() {
            Some(anchor) if self.current_tool.constrains_axis() => constrain_to_axis(anchor, point),
            _ => point,
        }
    }

    /// Finish the drag gesture at `point` and build the shape.
    ///
    /// Nothing is built unless the pointer moved more than `min_distance` on
    /// either axis; circles and ellipses additionally need radii above it.
    pub fn end(&mut self, point: Point, min_distance: f64) -> Option<Shape> {
        let ToolState::Active { start, .. } = std::mem::take(&mut self.state) else {
            return None;
        };
        let (start, end) = (round_point(start), round_point(point));
        if (end.x - start.x).abs() <= min_distance && (end.y - start.y).abs() <= min_distance {
            return None;
        }
        let shape = self.drag_shape(start, end)?;
        let large_enough = match &shape.geometry {
            Geometry::Circle(circle) => circle.radius > min_distance,
            Geometry::Ellipse(ellipse) => ellipse.radius_x > min_distance && ellipse.radius_y > min_distance,
            _ => true,
        };
        if !large_enough {
            log::debug!("{} too small, not created", self.current_tool);
            return None;
        }
        Some(shape)
    }

    /// Cancel the drag gesture and any pending polygon.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
        self.polygon_points.clear();
    }

    /// Shape the active gesture would create if released now.
    pub fn preview_shape(&self) -> Option<Shape> {
        match self.state {
            ToolState::Active { start, current } => self.drag_shape(round_point(start), round_point(current)),
            ToolState::Idle => None,
        }
    }

    /// Live measurement of the active gesture for the status bar.
    pub fn status_text(&self) -> Option<String> {
        let ToolState::Active { start, current } = self.state else {
            if self.polygon_points.is_empty() {
                return None;
            }
            return Some(format!("Polygon: {} points", self.polygon_points.len()));
        };
        let dx = current.x - start.x;
        let dy = current.y - start.y;
        match self.current_tool {
            ToolKind::Line | ToolKind::Arrow => Some(format!("Length: {} px", dx.hypot(dy).round())),
            ToolKind::Circle => Some(format!("Radius: {} px", dx.hypot(dy).round())),
            ToolKind::Ellipse => Some(format!("Ellipse: {}x{} px", dx.abs().trunc(), dy.abs().trunc())),
            ToolKind::Rectangle => Some(format!("Rectangle: {}x{} px", dx.abs().trunc(), dy.abs().trunc())),
            _ => None,
        }
    }

    /// Append a polygon vertex. Returns the vertex count.
    pub fn add_polygon_point(&mut self, point: Point) -> usize {
        self.polygon_points.push(round_point(point));
        self.polygon_points.len()
    }

    pub fn polygon_points(&self) -> &[Point] {
        &self.polygon_points
    }

    /// Close the pending polygon. Fewer than three vertices keeps them pending.
    pub fn finish_polygon(&mut self) -> Option<Shape> {
        if self.polygon_points.len() < Polygon::MIN_POINTS {
            return None;
        }
        let points = std::mem::take(&mut self.polygon_points);
        Some(Shape::polygon(points, self.style_for(ShapeKind::Polygon)))
    }

    /// Point marker at `position`.
    pub fn point_shape(&self, position: Point) -> Shape {
        Shape::point(round_point(position), self.style_for(ShapeKind::Point))
    }

    /// Text label at `position`. Empty content builds nothing.
    pub fn text_shape(&self, position: Point, content: &str) -> Option<Shape> {
        if content.is_empty() {
            return None;
        }
        Some(Shape::text(
            round_point(position),
            content,
            self.font_scale,
            self.style_for(ShapeKind::Text),
        ))
    }

    /// Current style, with `filled` cleared for kinds that cannot be filled.
    pub fn style_for(&self, kind: ShapeKind) -> ShapeStyle {
        let mut style = self.current_style.clone();
        style.filled &= kind.is_fillable();
        style
    }

    fn drag_shape(&self, start: Point, end: Point) -> Option<Shape> {
        let kind = self.current_tool.shape_kind()?;
        let style = self.style_for(kind);
        let shape = match self.current_tool {
            ToolKind::Line => Shape::line(start, end, style),
            ToolKind::Arrow => Shape::arrow(start, end, style),
            ToolKind::Circle => {
                let radius = (end.x - start.x).hypot(end.y - start.y).round();
                Shape::circle(start, radius, style)
            }
            ToolKind::Ellipse => {
                Shape::ellipse(start, (end.x - start.x).abs(), (end.y - start.y).abs(), style)
            }
            ToolKind::Rectangle => Shape::rectangle(start, end, style),
            _ => return None,
        };
        Some(shape)
    }
}
