//! Error types for layout documents.

use crate::id::ShapeId;
use thiserror::Error;

/// Reasons a layout document cannot be encoded or loaded.
///
/// Every variant is detected before any editor state is replaced.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The document is not valid JSON or does not match the record schema.
    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The binary snapshot could not be decoded.
    #[error("invalid layout snapshot: {0}")]
    MsgpackDecode(#[from] rmp_serde::decode::Error),

    /// The binary snapshot could not be encoded.
    #[error("layout snapshot encoding failed: {0}")]
    MsgpackEncode(#[from] rmp_serde::encode::Error),

    /// Two records share an id.
    #[error("duplicate shape id `{0}`")]
    DuplicateId(ShapeId),

    /// An aperture lists more rooms than it can join.
    #[error("aperture `{id}` lists {count} connected rooms (at most 2 allowed)")]
    TooManyRooms { id: ShapeId, count: usize },

    /// A record's position or size is NaN or infinite.
    #[error("shape `{0}` has non-finite geometry")]
    NonFiniteGeometry(ShapeId),

    /// A room record carries `connectedRooms`.
    #[error("room `{0}` cannot carry connectedRooms")]
    LinksOnRoom(ShapeId),
}
