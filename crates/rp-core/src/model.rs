//! Shape data model.
//!
//! A diagram is a flat set of shapes. Each shape is either a **room** (a
//! labeled space) or an **aperture** (a door or window joining up to two
//! rooms). Kind-specific state lives in the `ShapeKind` variant; everything
//! else a user wants to record goes into the free-form `attributes` blob,
//! which the editor treats as opaque JSON apart from the conventional
//! `label` key on rooms.

use crate::id::ShapeId;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use smallvec::SmallVec;
use std::fmt;

/// Upper bound on the rooms an aperture may join.
pub const MAX_CONNECTED_ROOMS: usize = 2;

/// Ordered room ids joined by an aperture.
pub type ConnectedRooms = SmallVec<[ShapeId; 2]>;

// ─── Shape type tag ──────────────────────────────────────────────────────

/// The kind tag of a shape, without kind-specific state.
///
/// Serialized as `"room"` / `"aperture"` in layout documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Room,
    Aperture,
}

impl ShapeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Room => "room",
            ShapeType::Aperture => "aperture",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Shape kind ──────────────────────────────────────────────────────────

/// Kind-specific shape state. Fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// A space on the plan. `label` is the text shown on the canvas.
    Room { label: String },

    /// A door or window. `connected_rooms` holds at most
    /// [`MAX_CONNECTED_ROOMS`] ids.
    Aperture { connected_rooms: ConnectedRooms },
}

impl ShapeKind {
    pub fn room(label: impl Into<String>) -> Self {
        ShapeKind::Room {
            label: label.into(),
        }
    }

    pub fn aperture() -> Self {
        ShapeKind::Aperture {
            connected_rooms: ConnectedRooms::new(),
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            ShapeKind::Room { .. } => ShapeType::Room,
            ShapeKind::Aperture { .. } => ShapeType::Aperture,
        }
    }

    pub fn is_room(&self) -> bool {
        matches!(self, ShapeKind::Room { .. })
    }

    pub fn is_aperture(&self) -> bool {
        matches!(self, ShapeKind::Aperture { .. })
    }

    /// The displayed label. Always `None` for apertures.
    pub fn label(&self) -> Option<&str> {
        match self {
            ShapeKind::Room { label } => Some(label),
            ShapeKind::Aperture { .. } => None,
        }
    }

    /// Rooms joined by this shape. Always empty for rooms.
    pub fn connected_rooms(&self) -> &[ShapeId] {
        match self {
            ShapeKind::Room { .. } => &[],
            ShapeKind::Aperture { connected_rooms } => connected_rooms.as_slice(),
        }
    }
}

// ─── Shape ───────────────────────────────────────────────────────────────

/// A single shape in the registry. Geometry lives in `GeometryModel`.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    /// Free-form structured data edited through the metadata editor.
    pub attributes: Value,
}

impl Shape {
    pub fn new(id: ShapeId, kind: ShapeKind, attributes: Value) -> Self {
        Self {
            id,
            kind,
            attributes,
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        self.kind.shape_type()
    }

    /// The `label` entry of the attributes blob, if it is a string.
    pub fn attribute_label(&self) -> Option<&str> {
        self.attributes.get("label").and_then(Value::as_str)
    }
}

// ─── Default blobs ───────────────────────────────────────────────────────

/// Blob shown by the metadata editor for a shape with nothing stored.
pub fn default_metadata() -> Value {
    json!({
        "type": "unknown",
        "customData": {}
    })
}

/// Attributes given to a freshly added shape.
pub fn default_attributes(label: &str, custom_data: &Value) -> Value {
    json!({
        "label": label,
        "customData": custom_data.clone()
    })
}
