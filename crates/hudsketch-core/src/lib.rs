//! HudSketch Core Library
//!
//! Scene-editing engine for the HudSketch overlay editor: shapes, hit
//! testing, selection and curve editing, groups, the view transform and the
//! project file format. Rendering and code generation live in the host.

pub mod camera;
pub mod canvas;
pub mod document;
pub mod geometry;
pub mod groups;
pub mod input;
pub mod router;
pub mod selection;
pub mod settings;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod store;
pub mod tools;

pub use camera::{Camera, ZoomDirection};
pub use canvas::{Canvas, StylePatch};
pub use document::{DocumentError, DocumentResult, FORMAT_VERSION, ProjectDocument};
pub use geometry::{Endpoint, FlipDirection, Reflection};
pub use groups::{GroupRegistry, ShapeGroup};
pub use input::{InputEvent, InputState, Key, Modifiers, MouseButton, PointerEvent};
pub use router::{EventResponse, InputRouter, NoPrompt, TextPrompt};
pub use selection::{Manipulation, MultiMoveState, SelectionState};
pub use settings::{CanvasLimits, EditorSettings};
pub use shapes::{BgrColor, Geometry, LineStyle, Shape, ShapeKind, ShapeStyle, StyleTag};
pub use snap::{GRID_SIZE, SnapResult, snap_to_grid};
pub use store::ShapeStore;
pub use tools::{ToolKind, ToolManager};
