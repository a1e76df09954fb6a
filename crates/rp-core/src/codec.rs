//! Persistence codec: registry + geometry ⇄ layout document.
//!
//! A layout document is a JSON array with one record per shape:
//!
//! ```json
//! [
//!   { "id": "k3j9x0q1z", "type": "room",
//!     "position": { "left": 50, "top": 50 },
//!     "size": { "width": 80, "height": 80 },
//!     "data": { "label": "Room 1", "customData": {} } },
//!   { "id": "p0d8e2m4w", "type": "aperture",
//!     "position": { "left": 150, "top": 60 },
//!     "size": { "width": 40, "height": 40 },
//!     "data": { "label": "Aperture", "customData": {} },
//!     "connectedRooms": ["k3j9x0q1z"] }
//! ]
//! ```
//!
//! Loading rebuilds state from scratch, keeping every id as written.
//! Aperture links are restored verbatim; a link to a room that is not in
//! the document survives the load and is simply not drawn.

use crate::config::EditorConfig;
use crate::error::LayoutError;
use crate::geometry::{Bounds, GeometryModel};
use crate::id::ShapeId;
use crate::model::*;
use crate::registry::ShapeRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-left corner of a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

/// Extent of a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// One shape in a layout document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub shape_type: ShapeType,
    pub position: Position,
    pub size: Size,
    /// Attributes blob. Records without one get `default_metadata()`.
    #[serde(default = "crate::model::default_metadata")]
    pub data: Value,
    /// Apertures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_rooms: Option<Vec<ShapeId>>,
}

impl ShapeRecord {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.position.left,
            self.position.top,
            self.size.width,
            self.size.height,
        )
    }
}

/// A whole diagram, in paint order.
pub type LayoutDocument = Vec<ShapeRecord>;

// ─── Registry → document ─────────────────────────────────────────────────

/// Capture every shape, in creation order.
pub fn serialize(registry: &ShapeRegistry, geometry: &GeometryModel) -> LayoutDocument {
    registry
        .iter()
        .map(|shape| {
            let b = geometry.get(shape.id).unwrap_or_else(|| {
                log::warn!("serialize: {} has no geometry, writing an empty rect", shape.id);
                Bounds::default()
            });
            let connected_rooms = match &shape.kind {
                ShapeKind::Room { .. } => None,
                ShapeKind::Aperture { connected_rooms } => Some(connected_rooms.to_vec()),
            };
            ShapeRecord {
                id: shape.id,
                shape_type: shape.shape_type(),
                position: Position {
                    left: b.left,
                    top: b.top,
                },
                size: Size {
                    width: b.width,
                    height: b.height,
                },
                data: shape.attributes.clone(),
                connected_rooms,
            }
        })
        .collect()
}

// ─── Document → registry ─────────────────────────────────────────────────

/// Rebuild registry and geometry from a document using default config.
///
/// # Errors
/// See [`deserialize_with`].
pub fn deserialize(document: &[ShapeRecord]) -> Result<(ShapeRegistry, GeometryModel), LayoutError> {
    deserialize_with(document, &EditorConfig::default())
}

/// Rebuild registry and geometry from a document.
///
/// Ids are kept as written. Geometry is restored verbatim (the resize
/// floor does not apply). Room labels come from `data.label`, or an empty
/// label if the blob has none.
///
/// # Errors
/// Fails on duplicate ids, apertures with more than two connected rooms,
/// and rooms that carry `connectedRooms`. Nothing is returned on failure,
/// so callers can keep their current state.
pub fn deserialize_with(
    document: &[ShapeRecord],
    config: &EditorConfig,
) -> Result<(ShapeRegistry, GeometryModel), LayoutError> {
    let mut registry = ShapeRegistry::with_config(config);
    let mut geometry = GeometryModel::with_min_size(config.min_size);

    for record in document {
        let kind = match record.shape_type {
            ShapeType::Room => {
                if record.connected_rooms.as_ref().is_some_and(|r| !r.is_empty()) {
                    return Err(LayoutError::LinksOnRoom(record.id));
                }
                let label = record
                    .data
                    .get("label")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                ShapeKind::room(label)
            }
            ShapeType::Aperture => {
                let rooms = record.connected_rooms.as_deref().unwrap_or_default();
                if rooms.len() > MAX_CONNECTED_ROOMS {
                    return Err(LayoutError::TooManyRooms {
                        id: record.id,
                        count: rooms.len(),
                    });
                }
                ShapeKind::Aperture {
                    connected_rooms: rooms.iter().copied().collect(),
                }
            }
        };
        registry.insert(Shape::new(record.id, kind, record.data.clone()))?;
        geometry.insert(record.id, record.bounds());
    }

    log::debug!("deserialized {} shapes", registry.len());
    Ok((registry, geometry))
}

// ─── Encodings ───────────────────────────────────────────────────────────

/// JSON writes NaN and infinities as `null`, which no loader accepts back.
fn ensure_finite(document: &[ShapeRecord]) -> Result<(), LayoutError> {
    let bad = document.iter().find(|r| {
        let b = r.bounds();
        ![b.left, b.top, b.width, b.height].iter().all(|v| v.is_finite())
    });
    match bad {
        Some(record) => Err(LayoutError::NonFiniteGeometry(record.id)),
        None => Ok(()),
    }
}

/// Pretty JSON with two-space indentation (the downloadable artifact).
///
/// # Errors
/// [`LayoutError::NonFiniteGeometry`] if any position or size is NaN or
/// infinite.
pub fn to_json(document: &[ShapeRecord]) -> Result<String, LayoutError> {
    ensure_finite(document)?;
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse a JSON layout document.
///
/// # Errors
/// Malformed JSON or records that do not match the schema.
pub fn from_json(text: &str) -> Result<LayoutDocument, LayoutError> {
    Ok(serde_json::from_str(text)?)
}

/// Compact MessagePack snapshot. Records are written as maps so optional
/// fields can be omitted.
///
/// # Errors
/// Non-finite geometry, or encoder failures.
pub fn to_msgpack(document: &[ShapeRecord]) -> Result<Vec<u8>, LayoutError> {
    ensure_finite(document)?;
    Ok(rmp_serde::to_vec_named(document)?)
}

/// Decode a MessagePack snapshot written by [`to_msgpack`].
///
/// # Errors
/// Truncated or malformed input.
pub fn from_msgpack(bytes: &[u8]) -> Result<LayoutDocument, LayoutError> {
    Ok(rmp_serde::from_slice(bytes)?)
}
