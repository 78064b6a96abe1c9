//! Versioned JSON project format.
//!
//! ```json
//! {
//!   "version": "2.3",
//!   "shapes": [{ "kind": "line", "color": [0, 255, 0], "thickness": 2,
//!                "style": "default", "lineStyle": "solid", "filled": false,
//!                "dashLength": 10, "dotLength": 5,
//!                "coords": { "x1": 0, "y1": 0, "x2": 100, "y2": 0 } }],
//!   "groups": { "groups": [{ "name": "hud", "indices": [0], "color": [100, 150, 255] }] },
//!   "canvasLimits": { "enabled": false, "width": 1280, "height": 720 }
//! }
//! ```
//!
//! Optional fields fall back to their defaults, and the snake_case names of
//! older files are accepted on load. Decoding is all-or-nothing: any bad
//! shape fails the whole document.

use crate::groups::{DEFAULT_GROUP_COLOR, ShapeGroup};
use crate::settings::CanvasLimits;
use crate::shapes::{
    Arrow, BgrColor, Circle, Curve, Ellipse, Geometry, Line, LineStyle, Marker, Polygon, Rectangle,
    Shape, ShapeKind, ShapeStyle, StyleTag, Text,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;
use thiserror::Error;

/// Version written into every saved document.
pub const FORMAT_VERSION: &str = "2.3";

/// Errors raised while decoding a project document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown shape kind: {0:?}")]
    UnknownKind(String),
    #[error("{kind} shape is missing coordinate {field:?}")]
    MissingField { kind: ShapeKind, field: String },
    #[error("Invalid value for {field:?}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("Polygon needs at least {min} points, found {found}")]
    TooFewPoints { found: usize, min: usize },
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Everything a project file stores.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectDocument {
    pub shapes: Vec<Shape>,
    pub groups: Vec<ShapeGroup>,
    pub canvas_limits: Option<CanvasLimits>,
}

impl ProjectDocument {
    /// Serialize the document to pretty-printed JSON.
    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let record: DocumentRecord = serde_json::from_str(json)?;
        Self::from_record(record)
    }

    fn to_record(&self) -> DocumentRecord {
        DocumentRecord {
            version: FORMAT_VERSION.to_string(),
            shapes: self.shapes.iter().map(encode_shape).collect(),
            groups: Some(GroupsRecord {
                groups: self
                    .groups
                    .iter()
                    .map(|g| GroupRecord {
                        name: g.name.clone(),
                        indices: g.indices.iter().copied().collect(),
                        color: g.color,
                    })
                    .collect(),
            }),
            canvas_limits: self.canvas_limits,
        }
    }

    fn from_record(record: DocumentRecord) -> DocumentResult<Self> {
        if record.version != FORMAT_VERSION {
            log::debug!("loading document version {} as {FORMAT_VERSION}", record.version);
        }
        let shapes = record
            .shapes
            .into_iter()
            .enumerate()
            .map(|(idx, rec)| {
                decode_shape(rec).inspect_err(|e| log::warn!("shape {idx} rejected: {e}"))
            })
            .collect::<DocumentResult<Vec<_>>>()?;

        let total = shapes.len();
        let groups = record
            .groups
            .map(|g| g.groups)
            .unwrap_or_default()
            .into_iter()
            .map(|g| {
                let indices: BTreeSet<usize> = g.indices.iter().copied().filter(|&i| i < total).collect();
                if indices.len() != g.indices.len() {
                    log::warn!("group {:?} refers to missing shapes; dropping them", g.name);
                }
                ShapeGroup::new(g.name, indices).with_color(g.color)
            })
            .collect();

        Ok(Self {
            shapes,
            groups,
            canvas_limits: record.canvas_limits,
        })
    }
}

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

fn default_dash_length() -> u32 {
    ShapeStyle::DEFAULT_DASH_LENGTH
}

fn default_dot_length() -> u32 {
    ShapeStyle::DEFAULT_DOT_LENGTH
}

fn default_group_color() -> [u8; 3] {
    DEFAULT_GROUP_COLOR
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentRecord {
    #[serde(default = "default_version")]
    version: String,
    shapes: Vec<ShapeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    groups: Option<GroupsRecord>,
    #[serde(default, alias = "canvas_limits", skip_serializing_if = "Option::is_none")]
    canvas_limits: Option<CanvasLimits>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroupsRecord {
    #[serde(default)]
    groups: Vec<GroupRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroupRecord {
    name: String,
    #[serde(default, alias = "shape_indices")]
    indices: Vec<usize>,
    #[serde(default = "default_group_color")]
    color: [u8; 3],
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShapeRecord {
    kind: String,
    #[serde(alias = "color_bgr")]
    color: BgrColor,
    thickness: u32,
    #[serde(default, alias = "strokeStyle")]
    style: StyleTag,
    #[serde(default, alias = "line_style")]
    line_style: LineStyle,
    #[serde(default)]
    filled: bool,
    #[serde(default = "default_dash_length", alias = "dash_length")]
    dash_length: u32,
    #[serde(default = "default_dot_length", alias = "dot_length")]
    dot_length: u32,
    coords: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, alias = "font_scale", skip_serializing_if = "Option::is_none")]
    font_scale: Option<f64>,
}

fn parse_kind(kind: &str) -> DocumentResult<ShapeKind> {
    Ok(match kind {
        "line" => ShapeKind::Line,
        "arrow" => ShapeKind::Arrow,
        "curve" => ShapeKind::Curve,
        "circle" => ShapeKind::Circle,
        "ellipse" => ShapeKind::Ellipse,
        "rectangle" => ShapeKind::Rectangle,
        "polygon" => ShapeKind::Polygon,
        "point" => ShapeKind::Point,
        "text" => ShapeKind::Text,
        other => return Err(DocumentError::UnknownKind(other.to_string())),
    })
}

/// Pixel spacing fields must be positive; old files sometimes hold 0.
fn at_least_one(field: &str, value: u32) -> u32 {
    if value == 0 {
        log::warn!("{field} of 0 clamped to 1");
        1
    } else {
        value
    }
}

fn encode_shape(shape: &Shape) -> ShapeRecord {
    let style = &shape.style;
    let (text, font_scale) = match &shape.geometry {
        Geometry::Text(t) => (Some(t.content.clone()), Some(t.font_scale)),
        _ => (None, None),
    };
    ShapeRecord {
        kind: shape.kind().as_str().to_string(),
        color: style.color,
        thickness: style.thickness,
        style: style.tag,
        line_style: style.line_style,
        filled: style.filled,
        dash_length: style.dash_length,
        dot_length: style.dot_length,
        coords: encode_coords(&shape.geometry),
        text,
        font_scale,
    }
}

fn encode_coords(geometry: &Geometry) -> Map<String, Value> {
    let value = match geometry {
        Geometry::Line(Line { start, end }) | Geometry::Arrow(Arrow { start, end }) => {
            json!({ "x1": start.x, "y1": start.y, "x2": end.x, "y2": end.y })
        }
        Geometry::Rectangle(Rectangle { corner_a, corner_b }) => {
            json!({ "x1": corner_a.x, "y1": corner_a.y, "x2": corner_b.x, "y2": corner_b.y })
        }
        Geometry::Curve(Curve::Quadratic {
            start,
            end,
            control,
        }) => json!({
            "x1": start.x, "y1": start.y, "x2": end.x, "y2": end.y,
            "cx": control.x, "cy": control.y
        }),
        Geometry::Curve(Curve::Cubic {
            start,
            end,
            control1,
            control2,
        }) => json!({
            "x1": start.x, "y1": start.y, "x2": end.x, "y2": end.y,
            "cx1": control1.x, "cy1": control1.y, "cx2": control2.x, "cy2": control2.y
        }),
        Geometry::Circle(c) => json!({ "cx": c.center.x, "cy": c.center.y, "r": c.radius }),
        Geometry::Ellipse(e) => json!({
            "cx": e.center.x, "cy": e.center.y,
            "rx": e.radius_x, "ry": e.radius_y, "angle": e.angle
        }),
        Geometry::Polygon(p) => {
            let points: Vec<[f64; 2]> = p.points.iter().map(|pt| [pt.x, pt.y]).collect();
            json!({ "points": points })
        }
        Geometry::Point(m) => json!({ "x": m.position.x, "y": m.position.y }),
        Geometry::Text(t) => json!({ "x": t.position.x, "y": t.position.y }),
    };
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Typed access to a shape's coordinate map.
struct Coords<'a> {
    kind: ShapeKind,
    map: &'a Map<String, Value>,
}

impl Coords<'_> {
    fn has(&self, field: &str) -> bool {
        self.map.contains_key(field)
    }

    fn number(&self, field: &str) -> DocumentResult<f64> {
        let value = self.map.get(field).ok_or_else(|| DocumentError::MissingField {
            kind: self.kind,
            field: field.to_string(),
        })?;
        value.as_f64().ok_or_else(|| DocumentError::InvalidField {
            field: field.to_string(),
            reason: format!("expected a number, found {value}"),
        })
    }

    fn positive(&self, field: &str) -> DocumentResult<f64> {
        let value = self.number(field)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(DocumentError::InvalidField {
                field: field.to_string(),
                reason: format!("must be positive, found {value}"),
            })
        }
    }

    fn point(&self, x: &str, y: &str) -> DocumentResult<Point> {
        Ok(Point::new(self.number(x)?, self.number(y)?))
    }

    fn points(&self) -> DocumentResult<Vec<Point>> {
        let list = self
            .map
            .get("points")
            .ok_or_else(|| DocumentError::MissingField {
                kind: self.kind,
                field: "points".to_string(),
            })?
            .as_array()
            .ok_or_else(|| DocumentError::InvalidField {
                field: "points".to_string(),
                reason: "expected a list of [x, y] pairs".to_string(),
            })?;
        list.iter()
            .map(|item| match item.as_array().map(Vec::as_slice) {
                Some([x, y]) => x
                    .as_f64()
                    .zip(y.as_f64())
                    .map(|(x, y)| Point::new(x, y))
                    .ok_or_else(|| invalid_point(item)),
                _ => Err(invalid_point(item)),
            })
            .collect()
    }
}

fn invalid_point(item: &Value) -> DocumentError {
    DocumentError::InvalidField {
        field: "points".to_string(),
        reason: format!("expected [x, y], found {item}"),
    }
}

fn decode_shape(record: ShapeRecord) -> DocumentResult<Shape> {
    let kind = parse_kind(&record.kind)?;
    let c = Coords {
        kind,
        map: &record.coords,
    };
    let geometry = match kind {
        ShapeKind::Line => Geometry::Line(Line::new(c.point("x1", "y1")?, c.point("x2", "y2")?)),
        ShapeKind::Arrow => Geometry::Arrow(Arrow::new(c.point("x1", "y1")?, c.point("x2", "y2")?)),
        ShapeKind::Rectangle => {
            Geometry::Rectangle(Rectangle::new(c.point("x1", "y1")?, c.point("x2", "y2")?))
        }
        ShapeKind::Curve => {
            let start = c.point("x1", "y1")?;
            let end = c.point("x2", "y2")?;
            let cubic = ["cx1", "cy1", "cx2", "cy2"].iter().all(|f| c.has(f));
            if cubic {
                Geometry::Curve(Curve::cubic(start, end, c.point("cx1", "cy1")?, c.point("cx2", "cy2")?))
            } else {
                Geometry::Curve(Curve::quadratic(start, end, c.point("cx", "cy")?))
            }
        }
        ShapeKind::Circle => Geometry::Circle(Circle::new(c.point("cx", "cy")?, c.positive("r")?)),
        ShapeKind::Ellipse => {
            let angle = if c.has("angle") { c.number("angle")? } else { 0.0 };
            Geometry::Ellipse(
                Ellipse::new(c.point("cx", "cy")?, c.positive("rx")?, c.positive("ry")?)
                    .with_angle(angle),
            )
        }
        ShapeKind::Polygon => {
            let points = c.points()?;
            if points.len() < Polygon::MIN_POINTS {
                return Err(DocumentError::TooFewPoints {
                    found: points.len(),
                    min: Polygon::MIN_POINTS,
                });
            }
            Geometry::Polygon(Polygon::new(points))
        }
        ShapeKind::Point => Geometry::Point(Marker::new(c.point("x", "y")?)),
        ShapeKind::Text => {
            let font_scale = record.font_scale.unwrap_or(Text::DEFAULT_FONT_SCALE);
            if font_scale <= 0.0 {
                return Err(DocumentError::InvalidField {
                    field: "fontScale".to_string(),
                    reason: format!("must be positive, found {font_scale}"),
                });
            }
            Geometry::Text(Text::new(
                c.point("x", "y")?,
                record.text.clone().unwrap_or_default(),
                font_scale,
            ))
        }
    };

    let style = ShapeStyle {
        color: record.color,
        thickness: at_least_one("thickness", record.thickness),
        tag: record.style,
        line_style: record.line_style,
        dash_length: at_least_one("dashLength", record.dash_length),
        dot_length: at_least_one("dotLength", record.dot_length),
        filled: record.filled,
    };
    Ok(Shape::new(geometry, style))
}
