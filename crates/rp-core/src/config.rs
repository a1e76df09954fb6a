//! Editor configuration.

use crate::geometry::{Bounds, MIN_SHAPE_SIZE};
use crate::model::ShapeType;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Tunables for a diagram editing session.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to change. `Default` reproduces the stock editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Smallest width/height a resize gesture may produce. Default: **30**.
    /// Values below 30 are raised to 30.
    pub min_size: f64,

    /// Where new shapes appear. Default: **(50, 50)**.
    pub spawn_left: f64,
    pub spawn_top: f64,

    /// Initial room size. Default: **100 × 100**.
    pub room_width: f64,
    pub room_height: f64,

    /// Initial aperture size. Default: **40 × 40**.
    pub aperture_width: f64,
    pub aperture_height: f64,

    /// Side of the square resize handle at each shape's bottom-right corner.
    pub handle_size: f64,

    /// `customData` object seeded into every new shape's attributes.
    pub default_custom_data: Value,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_SHAPE_SIZE,
            spawn_left: 50.0,
            spawn_top: 50.0,
            room_width: 100.0,
            room_height: 100.0,
            aperture_width: 40.0,
            aperture_height: 40.0,
            handle_size: 10.0,
            default_custom_data: json!({ "volume_in_m3": null }),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config, filling unspecified keys with defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The rectangle a newly added shape of `shape_type` starts with.
    pub fn spawn_bounds(&self, shape_type: ShapeType) -> Bounds {
        let (width, height) = match shape_type {
            ShapeType::Room => (self.room_width, self.room_height),
            ShapeType::Aperture => (self.aperture_width, self.aperture_height),
        };
        Bounds::new(self.spawn_left, self.spawn_top, width, height)
    }
}
