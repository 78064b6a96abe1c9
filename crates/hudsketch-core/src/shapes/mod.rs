//! Shape definitions for the overlay editor.
//!
//! A [`Shape`] is a [`Geometry`] payload (one variant per drawable kind) plus
//! the [`ShapeStyle`] every kind carries. Geometry is a closed sum type, so the
//! set of coordinate fields is always fully determined by the variant.

mod arrow;
mod circle;
mod curve;
mod ellipse;
mod line;
mod point;
mod polygon;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use circle::Circle;
pub use curve::{ControlHandle, Curve};
pub use ellipse::Ellipse;
pub use line::Line;
pub use point::Marker;
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use text::Text;

use crate::geometry::{Endpoint, Reflection};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Three-channel color in the blue-green-red order the overlay library uses.
///
/// Serialized as a `[b, g, r]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct BgrColor {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl BgrColor {
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const RED: Self = Self::new(0, 0, 255);
    pub const BLUE: Self = Self::new(255, 0, 0);
    pub const CYAN: Self = Self::new(255, 255, 0);
    pub const YELLOW: Self = Self::new(0, 255, 255);
    pub const MAGENTA: Self = Self::new(255, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const ORANGE: Self = Self::new(0, 165, 255);
    pub const PURPLE: Self = Self::new(128, 0, 128);

    pub const fn new(b: u8, g: u8, r: u8) -> Self {
        Self { b, g, r }
    }

    /// Named presets, in palette order.
    pub fn presets() -> &'static [(&'static str, BgrColor)] {
        &[
            ("green", Self::GREEN),
            ("red", Self::RED),
            ("blue", Self::BLUE),
            ("cyan", Self::CYAN),
            ("yellow", Self::YELLOW),
            ("magenta", Self::MAGENTA),
            ("white", Self::WHITE),
            ("black", Self::BLACK),
            ("orange", Self::ORANGE),
            ("purple", Self::PURPLE),
        ]
    }

    /// Preset name for this color, if it is one of the palette entries.
    /// Code generators use it to name color constants.
    pub fn preset_name(&self) -> Option<&'static str> {
        Self::presets()
            .iter()
            .find(|(_, color)| color == self)
            .map(|(name, _)| *name)
    }
}

impl Default for BgrColor {
    fn default() -> Self {
        Self::GREEN
    }
}

impl From<[u8; 3]> for BgrColor {
    fn from([b, g, r]: [u8; 3]) -> Self {
        Self { b, g, r }
    }
}

impl From<BgrColor> for [u8; 3] {
    fn from(color: BgrColor) -> Self {
        [color.b, color.g, color.r]
    }
}

/// Semantic tag consumed by code generation for naming and comments.
/// It has no geometric or rendering effect in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTag {
    #[default]
    Default,
    Horizontal,
    Vertical,
    Accent,
}

impl StyleTag {
    pub fn all() -> &'static [StyleTag] {
        &[
            StyleTag::Default,
            StyleTag::Horizontal,
            StyleTag::Vertical,
            StyleTag::Accent,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleTag::Default => "default",
            StyleTag::Horizontal => "horizontal",
            StyleTag::Vertical => "vertical",
            StyleTag::Accent => "accent",
        }
    }
}

/// Stroke pattern for outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Cycle to the next line style.
    pub fn next(self) -> Self {
        match self {
            LineStyle::Solid => LineStyle::Dashed,
            LineStyle::Dashed => LineStyle::Dotted,
            LineStyle::Dotted => LineStyle::Solid,
        }
    }
}

/// Style attributes shared by every shape kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke (and fill) color.
    pub color: BgrColor,
    /// Stroke thickness in pixels at zoom 1.
    pub thickness: u32,
    /// Export naming tag.
    pub tag: StyleTag,
    /// Solid, dashed or dotted outline.
    pub line_style: LineStyle,
    /// Dash spacing for dashed outlines.
    pub dash_length: u32,
    /// Dot spacing for dotted outlines.
    pub dot_length: u32,
    /// Fill the interior. Only honoured by fillable kinds.
    pub filled: bool,
}

impl ShapeStyle {
    pub const DEFAULT_THICKNESS: u32 = 2;
    pub const DEFAULT_DASH_LENGTH: u32 = 10;
    pub const DEFAULT_DOT_LENGTH: u32 = 5;
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: BgrColor::default(),
            thickness: Self::DEFAULT_THICKNESS,
            tag: StyleTag::default(),
            line_style: LineStyle::default(),
            dash_length: Self::DEFAULT_DASH_LENGTH,
            dot_length: Self::DEFAULT_DOT_LENGTH,
            filled: false,
        }
    }
}

/// Kind tag of a shape, as written to project documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Arrow,
    Curve,
    Circle,
    Ellipse,
    Rectangle,
    Polygon,
    Point,
    Text,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Curve => "curve",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Point => "point",
            ShapeKind::Text => "text",
        }
    }

    /// Kinds for which `filled` is meaningful.
    pub fn is_fillable(&self) -> bool {
        matches!(
            self,
            ShapeKind::Circle | ShapeKind::Ellipse | ShapeKind::Rectangle | ShapeKind::Polygon
        )
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common behaviour of every geometry payload.
pub trait ShapeTrait {
    /// Bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in world coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Points that must lie inside a marquee for the shape to be selected.
    fn marquee_points(&self) -> Vec<Point>;

    /// Path representation for renderers and exporters.
    fn to_path(&self) -> BezPath;

    /// Move every position field by `delta`. Size fields are untouched.
    fn translate(&mut self, delta: Vec2);

    /// Mirror every position field. Size fields are untouched.
    fn reflect(&mut self, reflection: &Reflection);
}

/// Per-kind geometry payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Line(Line),
    Arrow(Arrow),
    Curve(Curve),
    Circle(Circle),
    Ellipse(Ellipse),
    Rectangle(Rectangle),
    Polygon(Polygon),
    Point(Marker),
    Text(Text),
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Line(_) => ShapeKind::Line,
            Geometry::Arrow(_) => ShapeKind::Arrow,
            Geometry::Curve(_) => ShapeKind::Curve,
            Geometry::Circle(_) => ShapeKind::Circle,
            Geometry::Ellipse(_) => ShapeKind::Ellipse,
            Geometry::Rectangle(_) => ShapeKind::Rectangle,
            Geometry::Polygon(_) => ShapeKind::Polygon,
            Geometry::Point(_) => ShapeKind::Point,
            Geometry::Text(_) => ShapeKind::Text,
        }
    }

    fn as_trait(&self) -> &dyn ShapeTrait {
        match self {
            Geometry::Line(g) => g,
            Geometry::Arrow(g) => g,
            Geometry::Curve(g) => g,
            Geometry::Circle(g) => g,
            Geometry::Ellipse(g) => g,
            Geometry::Rectangle(g) => g,
            Geometry::Polygon(g) => g,
            Geometry::Point(g) => g,
            Geometry::Text(g) => g,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Geometry::Line(g) => g,
            Geometry::Arrow(g) => g,
            Geometry::Curve(g) => g,
            Geometry::Circle(g) => g,
            Geometry::Ellipse(g) => g,
            Geometry::Rectangle(g) => g,
            Geometry::Polygon(g) => g,
            Geometry::Point(g) => g,
            Geometry::Text(g) => g,
        }
    }

    /// Endpoints of a straight line or arrow.
    pub fn straight_segment(&self) -> Option<(Point, Point)> {
        match self {
            Geometry::Line(l) => Some((l.start, l.end)),
            Geometry::Arrow(a) => Some((a.start, a.end)),
            _ => None,
        }
    }

    pub fn as_curve(&self) -> Option<&Curve> {
        match self {
            Geometry::Curve(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_curve_mut(&mut self) -> Option<&mut Curve> {
        match self {
            Geometry::Curve(c) => Some(c),
            _ => None,
        }
    }

    /// Bend a straight segment into a quadratic curve through `control`.
    /// Returns `None` for anything but a line or arrow.
    pub fn promote_quadratic(&self, control: Point) -> Option<Geometry> {
        let (start, end) = self.straight_segment()?;
        Some(Geometry::Curve(Curve::quadratic(start, end, control)))
    }

    /// Turn a straight segment into a cubic curve with controls at 1/3 and 2/3.
    /// Returns the new geometry and the handle belonging to the grabbed end.
    pub fn promote_cubic(&self, grabbed: Endpoint) -> Option<(Geometry, ControlHandle)> {
        let (start, end) = self.straight_segment()?;
        let handle = match grabbed {
            Endpoint::Start => ControlHandle::Control1,
            Endpoint::End => ControlHandle::Control2,
        };
        Some((Geometry::Curve(Curve::cubic_from_segment(start, end)), handle))
    }
}

impl ShapeTrait for Geometry {
    fn bounds(&self) -> Rect {
        self.as_trait().bounds()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_trait().hit_test(point, tolerance)
    }

    fn marquee_points(&self) -> Vec<Point> {
        self.as_trait().marquee_points()
    }

    fn to_path(&self) -> BezPath {
        self.as_trait().to_path()
    }

    fn translate(&mut self, delta: Vec2) {
        self.as_trait_mut().translate(delta)
    }

    fn reflect(&mut self, reflection: &Reflection) {
        self.as_trait_mut().reflect(reflection)
    }
}

/// A drawable shape: geometry plus style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub geometry: Geometry,
    pub style: ShapeStyle,
}

impl Shape {
    pub fn new(geometry: Geometry, style: ShapeStyle) -> Self {
        Self { geometry, style }
    }

    pub fn line(start: Point, end: Point, style: ShapeStyle) -> Self {
        Self::new(Geometry::Line(Line::new(start, end)), style)
    }

    pub fn arrow(start: Point, end: Point, style: ShapeStyle) -> Self {
        Self::new(Geometry::Arrow(Arrow::new(start, end)), style)
    }

    pub fn circle(center: Point, radius: f64, style: ShapeStyle) -> Self {
        Self::new(Geometry::Circle(Circle::new(center, radius)), style)
    }

    pub fn ellipse(center: Point, radius_x: f64, radius_y: f64, style: ShapeStyle) -> Self {
        Self::new(Geometry::Ellipse(Ellipse::new(center, radius_x, radius_y)), style)
    }

    pub fn rectangle(corner_a: Point, corner_b: Point, style: ShapeStyle) -> Self {
        Self::new(Geometry::Rectangle(Rectangle::new(corner_a, corner_b)), style)
    }

    pub fn polygon(points: Vec<Point>, style: ShapeStyle) -> Self {
        Self::new(Geometry::Polygon(Polygon::new(points)), style)
    }

    pub fn point(position: Point, style: ShapeStyle) -> Self {
        Self::new(Geometry::Point(Marker::new(position)), style)
    }

    pub fn text(position: Point, content: impl Into<String>, font_scale: f64, style: ShapeStyle) -> Self {
        Self::new(Geometry::Text(Text::new(position, content, font_scale)), style)
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn is_fillable(&self) -> bool {
        self.kind().is_fillable()
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.geometry.hit_test(point, tolerance)
    }

    /// True if every defining point of the shape lies inside `rect` (edges included).
    pub fn inside_rect(&self, rect: Rect) -> bool {
        let points = self.geometry.marquee_points();
        !points.is_empty()
            && points
                .into_iter()
                .all(|p| crate::geometry::rect_contains_inclusive(rect, p))
    }

    pub fn to_path(&self) -> BezPath {
        self.geometry.to_path()
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.geometry.translate(delta);
    }

    /// Clone with every position field shifted by `delta`.
    pub fn translated(&self, delta: Vec2) -> Shape {
        let mut shape = self.clone();
        shape.translate(delta);
        shape
    }

    /// Clone with every position field mirrored by `reflection`.
    pub fn reflected(&self, reflection: &Reflection) -> Shape {
        let mut shape = self.clone();
        shape.geometry.reflect(reflection);
        shape
    }

    pub fn as_text(&self) -> Option<&Text> {
        match &self.geometry {
            Geometry::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match &mut self.geometry {
            Geometry::Text(t) => Some(t),
            _ => None,
        }
    }
}
