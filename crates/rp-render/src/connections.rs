//! Connection lines: aperture center → connected room center.
//!
//! A pure derived view over the registry and geometry. It is recomputed
//! wholesale after any geometry or link change (and on viewport resize);
//! diagrams are small enough that incremental updates buy nothing.

use kurbo::{Line, Point};
use rp_core::{GeometryModel, ShapeId, ShapeRegistry};

/// One drawn segment between an aperture and one of its rooms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionLine {
    pub aperture: ShapeId,
    pub room: ShapeId,
    /// From the aperture's center to the room's center.
    pub line: Line,
}

impl ConnectionLine {
    /// Whether this line should highlight when `id` is hovered.
    pub fn touches(&self, id: ShapeId) -> bool {
        self.aperture == id || self.room == id
    }
}

fn center_point(geometry: &GeometryModel, id: ShapeId) -> Option<Point> {
    geometry.center(id).map(|(x, y)| Point::new(x, y))
}

/// Derive every connection line from current state.
///
/// A link naming a room that is gone (or has no geometry) is skipped
/// without complaint.
pub fn compute_connections(registry: &ShapeRegistry, geometry: &GeometryModel) -> Vec<ConnectionLine> {
    let mut lines = Vec::new();
    for aperture in registry.apertures() {
        let rooms = aperture.kind.connected_rooms();
        if rooms.is_empty() {
            continue;
        }
        let Some(from) = center_point(geometry, aperture.id) else {
            continue;
        };
        for &room in rooms {
            if !registry.is_room(room) {
                log::trace!("skip stale link {} -> {room}", aperture.id);
                continue;
            }
            if let Some(to) = center_point(geometry, room) {
                lines.push(ConnectionLine {
                    aperture: aperture.id,
                    room,
                    line: Line::new(from, to),
                });
            }
        }
    }
    lines
}

/// Cached connection lines, owned by whoever drives recomputes.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSet {
    lines: Vec<ConnectionLine>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recompute(&mut self, registry: &ShapeRegistry, geometry: &GeometryModel) {
        self.lines = compute_connections(registry, geometry);
    }

    pub fn lines(&self) -> &[ConnectionLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines whose aperture or room is `id`, for hover highlighting.
    /// Uses the cached geometry; nothing is recomputed.
    pub fn touching(&self, id: ShapeId) -> impl Iterator<Item = &ConnectionLine> + '_ {
        self.lines.iter().filter(move |l| l.touches(id))
    }
}
