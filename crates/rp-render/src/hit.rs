//! Hit testing: point → shape lookup.
//!
//! Walks shapes back to front (last created = topmost) and reports which
//! part of the shape was hit, so a press on the bottom-right corner can
//! start a resize instead of a drag.

use kurbo::Rect;
use rp_core::{Bounds, GeometryModel, ShapeId, ShapeRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: ShapeId,
    pub part: HitPart,
}

/// The square resize handle anchored at a shape's bottom-right corner.
/// Clamped so it never extends past the shape's top-left.
pub fn handle_rect(bounds: &Bounds, handle_size: f64) -> Rect {
    let x1 = bounds.right();
    let y1 = bounds.bottom();
    Rect::new(
        (x1 - handle_size).max(bounds.left),
        (y1 - handle_size).max(bounds.top),
        x1,
        y1,
    )
}

/// Find the topmost shape at (px, py).
/// Returns `None` on background.
pub fn hit_test(
    registry: &ShapeRegistry,
    geometry: &GeometryModel,
    px: f64,
    py: f64,
    handle_size: f64,
) -> Option<Hit> {
    for shape in registry.iter().rev() {
        let Some(b) = geometry.get(shape.id) else {
            continue;
        };
        if !b.contains(px, py) {
            continue;
        }
        // Inclusive on the far edges, matching `Bounds::contains`.
        let h = handle_rect(&b, handle_size);
        let part = if px >= h.x0 && py >= h.y0 {
            HitPart::ResizeHandle
        } else {
            HitPart::Body
        };
        return Some(Hit { id: shape.id, part });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_core::ShapeType;

    fn two_overlapping() -> (ShapeRegistry, GeometryModel, ShapeId, ShapeId) {
        let mut reg = ShapeRegistry::new();
        let mut geo = GeometryModel::new();
        let under = reg.add_shape(ShapeType::Room);
        let over = reg.add_shape(ShapeType::Aperture);
        geo.insert(under, Bounds::new(0.0, 0.0, 100.0, 100.0));
        geo.insert(over, Bounds::new(80.0, 80.0, 40.0, 40.0));
        (reg, geo, under, over)
    }

    #[test]
    fn body_hit() {
        let (reg, geo, under, _) = two_overlapping();
        let hit = hit_test(&reg, &geo, 10.0, 10.0, 10.0);
        assert_eq!(hit, Some(Hit { id: under, part: HitPart::Body }));
    }

    #[test]
    fn background_misses() {
        let (reg, geo, ..) = two_overlapping();
        assert_eq!(hit_test(&reg, &geo, 500.0, 500.0, 10.0), None);
    }

    #[test]
    fn later_shape_wins_overlap() {
        let (reg, geo, _, over) = two_overlapping();
        let hit = hit_test(&reg, &geo, 85.0, 85.0, 10.0).unwrap();
        assert_eq!(hit.id, over);
        assert_eq!(hit.part, HitPart::Body);
    }

    #[test]
    fn bottom_right_corner_is_the_handle() {
        let (reg, geo, under, over) = two_overlapping();
        let hit = hit_test(&reg, &geo, 115.0, 115.0, 10.0).unwrap();
        assert_eq!(hit, Hit { id: over, part: HitPart::ResizeHandle });

        // The room's own handle is covered by the aperture at (95, 95);
        // its bottom-left stretch is still reachable.
        let hit = hit_test(&reg, &geo, 95.0, 75.0, 10.0);
        assert_eq!(hit, Some(Hit { id: under, part: HitPart::Body }));
    }

    #[test]
    fn handle_clamps_to_small_shapes() {
        let r = handle_rect(&Bounds::new(10.0, 10.0, 5.0, 5.0), 10.0);
        assert_eq!(r, Rect::new(10.0, 10.0, 15.0, 15.0));
    }
}
