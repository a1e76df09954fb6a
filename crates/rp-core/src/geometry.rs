//! Geometry model: one mutable rectangle per shape.
//!
//! Pure data. No collision detection, snapping, or overlap prevention;
//! shapes may overlap freely or sit outside the visible canvas.

use crate::id::ShapeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Smallest width or height a resize can produce.
pub const MIN_SHAPE_SIZE: f64 = 30.0;

/// A shape's rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.left && px <= self.right() && py >= self.top && py <= self.bottom()
    }
}

/// Per-shape rectangles, keyed by shape id.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryModel {
    rects: HashMap<ShapeId, Bounds>,
    min_size: f64,
}

impl Default for GeometryModel {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryModel {
    pub fn new() -> Self {
        Self::with_min_size(MIN_SHAPE_SIZE)
    }

    /// A model whose `set_size` floors each dimension at `min_size`.
    /// The floor never drops below [`MIN_SHAPE_SIZE`].
    pub fn with_min_size(min_size: f64) -> Self {
        Self {
            rects: HashMap::new(),
            min_size: min_size.max(MIN_SHAPE_SIZE),
        }
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Insert or replace a rectangle verbatim (no size floor).
    pub fn insert(&mut self, id: ShapeId, bounds: Bounds) {
        self.rects.insert(id, bounds);
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Bounds> {
        self.rects.remove(&id)
    }

    pub fn get(&self, id: ShapeId) -> Option<Bounds> {
        self.rects.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Move a shape's top-left corner. Unknown ids are ignored.
    pub fn set_position(&mut self, id: ShapeId, left: f64, top: f64) {
        if let Some(b) = self.rects.get_mut(&id) {
            b.left = left;
            b.top = top;
        }
    }

    /// Resize a shape, flooring each dimension at the model's minimum.
    /// Unknown ids are ignored.
    pub fn set_size(&mut self, id: ShapeId, width: f64, height: f64) {
        let min = self.min_size;
        if let Some(b) = self.rects.get_mut(&id) {
            // f64::max returns the other operand for NaN, so NaN floors too
            b.width = width.max(min);
            b.height = height.max(min);
        }
    }

    /// Geometric center of a shape's rectangle.
    pub fn center(&self, id: ShapeId) -> Option<(f64, f64)> {
        self.rects.get(&id).map(Bounds::center)
    }
}
