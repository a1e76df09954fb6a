pub mod codec;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod registry;

pub use codec::{LayoutDocument, ShapeRecord, deserialize, serialize};
pub use config::EditorConfig;
pub use connectivity::{RoomGraph, RoomNode};
pub use error::LayoutError;
pub use geometry::{Bounds, GeometryModel, MIN_SHAPE_SIZE};
pub use id::ShapeId;
pub use model::*;
pub use registry::ShapeRegistry;

// Re-export so downstream crates don't need a direct dependency
pub use serde_json::Value;
