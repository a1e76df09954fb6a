//! Shape registry: owns every shape and keeps room/aperture references
//! consistent.
//!
//! The registry is the single source of truth for shape identity, kind,
//! and attributes. Geometry is tracked separately in `GeometryModel` so the
//! two can be mutated independently (drag/resize never touch attributes and
//! metadata edits never touch geometry).
//!
//! Referential integrity is enforced by cascade: removing a room strips its
//! id from every aperture. Nothing else validates aperture links, so a
//! loaded document may still carry ids of rooms that do not exist; those
//! are tolerated and reported by [`ShapeRegistry::dangling_links`].

use crate::config::EditorConfig;
use crate::error::LayoutError;
use crate::id::ShapeId;
use crate::model::*;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    shapes: HashMap<ShapeId, Shape>,

    /// Creation order. Doubles as z-order: later shapes paint on top.
    order: Vec<ShapeId>,

    /// Every id this registry has ever held, including removed ones.
    /// Generated ids skip these so ids are never reused.
    issued: HashSet<ShapeId>,

    /// Number of rooms added through `add_shape`; feeds the "Room N" label.
    room_counter: u32,

    /// `customData` seeded into new shapes.
    default_custom_data: Value,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        Self {
            shapes: HashMap::new(),
            order: Vec::new(),
            issued: HashSet::new(),
            room_counter: 0,
            default_custom_data: config.default_custom_data.clone(),
        }
    }

    /// Carry id history and the room label counter over from a registry
    /// this one replaces, so a reload does not restart "Room 1" or hand
    /// out an id the session has already used.
    pub fn adopt_history(&mut self, previous: &ShapeRegistry) {
        self.issued.extend(previous.issued.iter().copied());
        self.room_counter = self.room_counter.max(previous.room_counter);
        self.default_custom_data = previous.default_custom_data.clone();
    }

    // ─── Creation / removal ──────────────────────────────────────────────

    /// Add a shape with default attributes and return its fresh id.
    ///
    /// Rooms get an auto-incrementing `Room N` label; apertures start with
    /// no connected rooms.
    pub fn add_shape(&mut self, shape_type: ShapeType) -> ShapeId {
        let id = self.fresh_id(shape_type);
        let (kind, label) = match shape_type {
            ShapeType::Room => {
                self.room_counter += 1;
                let label = format!("Room {}", self.room_counter);
                (ShapeKind::room(label.clone()), label)
            }
            ShapeType::Aperture => (ShapeKind::aperture(), "Aperture".to_string()),
        };
        let attributes = default_attributes(&label, &self.default_custom_data);
        self.push(Shape::new(id, kind, attributes));
        log::debug!("add {shape_type} {id}");
        id
    }

    /// Insert a fully-formed shape, keeping its id.
    ///
    /// # Errors
    /// Returns `LayoutError::DuplicateId` if a live shape already has the id.
    pub fn insert(&mut self, shape: Shape) -> Result<(), LayoutError> {
        if self.shapes.contains_key(&shape.id) {
            return Err(LayoutError::DuplicateId(shape.id));
        }
        self.push(shape);
        Ok(())
    }

    /// Remove a shape. Removing a room also strips its id from every
    /// aperture's connected rooms. Unknown ids are a no-op.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let removed = self.shapes.remove(&id)?;
        self.order.retain(|other| *other != id);

        if removed.kind.is_room() {
            for shape in self.shapes.values_mut() {
                if let ShapeKind::Aperture { connected_rooms } = &mut shape.kind {
                    connected_rooms.retain(|room| *room != id);
                }
            }
        }
        log::debug!("remove {} {id}", removed.shape_type());
        Some(removed)
    }

    fn push(&mut self, shape: Shape) {
        self.issued.insert(shape.id);
        self.order.push(shape.id);
        self.shapes.insert(shape.id, shape);
    }

    fn fresh_id(&self, shape_type: ShapeType) -> ShapeId {
        loop {
            let id = ShapeId::generate(shape_type.as_str());
            if !self.issued.contains(&id) {
                return id;
            }
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn is_room(&self, id: ShapeId) -> bool {
        self.get(id).is_some_and(|s| s.kind.is_room())
    }

    pub fn is_aperture(&self, id: ShapeId) -> bool {
        self.get(id).is_some_and(|s| s.kind.is_aperture())
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shape ids in creation (paint) order.
    pub fn ids(&self) -> &[ShapeId] {
        &self.order
    }

    /// Shapes in creation (paint) order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> + '_ {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.iter().filter(|s| s.kind.is_room())
    }

    pub fn apertures(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.iter().filter(|s| s.kind.is_aperture())
    }

    // ─── Attributes ──────────────────────────────────────────────────────

    pub fn attributes(&self, id: ShapeId) -> Option<&Value> {
        self.get(id).map(|s| &s.attributes)
    }

    /// Replace a shape's attributes blob. Any well-formed value is accepted.
    /// Returns `false` for unknown ids.
    pub fn set_attributes(&mut self, id: ShapeId, blob: Value) -> bool {
        match self.shapes.get_mut(&id) {
            Some(shape) => {
                shape.attributes = blob;
                true
            }
            None => {
                log::debug!("set_attributes: unknown shape {id}");
                false
            }
        }
    }

    /// Label edit on a room: updates the displayed label and writes the
    /// `label` key of the attributes blob. Returns `false` if `id` is not a
    /// room.
    pub fn set_label(&mut self, id: ShapeId, label: &str) -> bool {
        let Some(shape) = self.shapes.get_mut(&id) else {
            return false;
        };
        let ShapeKind::Room { label: shown } = &mut shape.kind else {
            return false;
        };
        *shown = label.to_string();

        if shape.attributes.is_null() {
            shape.attributes = serde_json::json!({ "label": label });
        } else if let Some(map) = shape.attributes.as_object_mut() {
            map.insert("label".to_string(), Value::String(label.to_string()));
        } else {
            log::debug!("set_label: attributes of {id} are not an object; blob left as is");
        }
        true
    }

    /// Update only the label shown on the canvas, leaving attributes alone.
    /// Returns `true` if the displayed label changed.
    pub fn set_display_label(&mut self, id: ShapeId, label: &str) -> bool {
        match self.shapes.get_mut(&id).map(|s| &mut s.kind) {
            Some(ShapeKind::Room { label: shown }) if shown.as_str() != label => {
                *shown = label.to_string();
                true
            }
            _ => false,
        }
    }

    // ─── Links ───────────────────────────────────────────────────────────

    /// Set an aperture's connected rooms. Idempotent.
    ///
    /// The caller enforces the two-room cap; anything past it is dropped
    /// here. Returns `false` if `aperture` is unknown or not an aperture.
    pub fn link_aperture(&mut self, aperture: ShapeId, rooms: &[ShapeId]) -> bool {
        let Some(ShapeKind::Aperture { connected_rooms }) =
            self.shapes.get_mut(&aperture).map(|s| &mut s.kind)
        else {
            log::debug!("link_aperture: {aperture} is not a live aperture");
            return false;
        };
        if rooms.len() > MAX_CONNECTED_ROOMS {
            log::warn!(
                "link_aperture: {aperture} given {} rooms, keeping the first {MAX_CONNECTED_ROOMS}",
                rooms.len()
            );
        }
        *connected_rooms = rooms.iter().take(MAX_CONNECTED_ROOMS).copied().collect();
        true
    }

    /// `(aperture, room)` pairs whose room id no longer names a live room.
    pub fn dangling_links(&self) -> Vec<(ShapeId, ShapeId)> {
        let mut dangling = Vec::new();
        for aperture in self.apertures() {
            for &room in aperture.kind.connected_rooms() {
                if !self.is_room(room) {
                    dangling.push((aperture.id, room));
                }
            }
        }
        dangling
    }

    /// Remove every dangling room reference. Returns how many were removed.
    ///
    /// Never called implicitly; dangling links are otherwise tolerated.
    pub fn prune_dangling_links(&mut self) -> usize {
        let live_rooms: HashSet<ShapeId> = self.rooms().map(|s| s.id).collect();
        let mut pruned = 0;
        for shape in self.shapes.values_mut() {
            if let ShapeKind::Aperture { connected_rooms } = &mut shape.kind {
                let before = connected_rooms.len();
                connected_rooms.retain(|room| live_rooms.contains(room));
                pruned += before - connected_rooms.len();
            }
        }
        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn rooms_get_incrementing_labels() {
        let mut reg = ShapeRegistry::new();
        let r1 = reg.add_shape(ShapeType::Room);
        let _a = reg.add_shape(ShapeType::Aperture);
        let r2 = reg.add_shape(ShapeType::Room);

        assert_eq!(reg.get(r1).unwrap().kind.label(), Some("Room 1"));
        assert_eq!(reg.get(r2).unwrap().kind.label(), Some("Room 2"));
        assert_eq!(reg.get(r2).unwrap().attribute_label(), Some("Room 2"));
    }

    #[test]
    fn new_aperture_has_no_links_and_default_blob() {
        let mut reg = ShapeRegistry::new();
        let a = reg.add_shape(ShapeType::Aperture);
        let shape = reg.get(a).unwrap();
        assert!(shape.kind.connected_rooms().is_empty());
        assert_eq!(
            shape.attributes,
            json!({ "label": "Aperture", "customData": { "volume_in_m3": null } })
        );
    }

    #[test]
    fn removing_room_cascades_to_apertures() {
        let mut reg = ShapeRegistry::new();
        let r1 = reg.add_shape(ShapeType::Room);
        let r2 = reg.add_shape(ShapeType::Room);
        let a = reg.add_shape(ShapeType::Aperture);
        assert!(reg.link_aperture(a, &[r1, r2]));

        reg.remove_shape(r1);
        assert_eq!(reg.get(a).unwrap().kind.connected_rooms(), &[r2]);
        assert_eq!(reg.ids(), &[r2, a]);
    }

    #[test]
    fn removing_aperture_erases_entry() {
        let mut reg = ShapeRegistry::new();
        let r = reg.add_shape(ShapeType::Room);
        let a = reg.add_shape(ShapeType::Aperture);
        reg.link_aperture(a, &[r]);
        assert!(reg.remove_shape(a).is_some());
        assert!(!reg.contains(a));
        assert_eq!(reg.apertures().count(), 0);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut reg = ShapeRegistry::new();
        reg.add_shape(ShapeType::Room);
        assert!(reg.remove_shape(ShapeId::intern("nope")).is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn link_is_idempotent_and_capped() {
        let mut reg = ShapeRegistry::new();
        let r1 = reg.add_shape(ShapeType::Room);
        let r2 = reg.add_shape(ShapeType::Room);
        let r3 = reg.add_shape(ShapeType::Room);
        let a = reg.add_shape(ShapeType::Aperture);

        reg.link_aperture(a, &[r1, r2]);
        reg.link_aperture(a, &[r1, r2]);
        assert_eq!(reg.get(a).unwrap().kind.connected_rooms(), &[r1, r2]);

        reg.link_aperture(a, &[r3, r2, r1]);
        assert_eq!(reg.get(a).unwrap().kind.connected_rooms(), &[r3, r2]);

        assert!(!reg.link_aperture(r1, &[r2]), "rooms cannot be linked");
    }

    #[test]
    fn set_attributes_accepts_any_value() {
        let mut reg = ShapeRegistry::new();
        let r = reg.add_shape(ShapeType::Room);
        assert!(reg.set_attributes(r, json!([1, 2, 3])));
        assert_eq!(reg.attributes(r), Some(&json!([1, 2, 3])));
        assert!(!reg.set_attributes(ShapeId::intern("missing"), json!({})));
    }

    #[test]
    fn set_label_updates_display_and_blob() {
        let mut reg = ShapeRegistry::new();
        let r = reg.add_shape(ShapeType::Room);
        assert!(reg.set_label(r, "Kitchen"));
        let shape = reg.get(r).unwrap();
        assert_eq!(shape.kind.label(), Some("Kitchen"));
        assert_eq!(shape.attribute_label(), Some("Kitchen"));

        let a = reg.add_shape(ShapeType::Aperture);
        assert!(!reg.set_label(a, "Door"));
    }

    #[test]
    fn display_label_reports_change() {
        let mut reg = ShapeRegistry::new();
        let r = reg.add_shape(ShapeType::Room);
        assert!(!reg.set_display_label(r, "Room 1"));
        assert!(reg.set_display_label(r, "Hall"));
        assert_eq!(reg.get(r).unwrap().attribute_label(), Some("Room 1"));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut reg = ShapeRegistry::new();
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let id = reg.add_shape(ShapeType::Room);
            assert!(seen.insert(id));
            reg.remove_shape(id);
        }
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut reg = ShapeRegistry::new();
        let id = ShapeId::intern("dup");
        let shape = Shape::new(id, ShapeKind::room("A"), json!({}));
        reg.insert(shape.clone()).unwrap();
        assert!(matches!(
            reg.insert(shape),
            Err(LayoutError::DuplicateId(d)) if d == id
        ));
    }

    #[test]
    fn dangling_links_are_reported_and_pruned_on_request() {
        let mut reg = ShapeRegistry::new();
        let r = reg.add_shape(ShapeType::Room);
        let ghost = ShapeId::intern("ghost_room");
        let a = ShapeId::intern("door");
        let mut connected_rooms = ConnectedRooms::new();
        connected_rooms.push(r);
        connected_rooms.push(ghost);
        reg.insert(Shape::new(a, ShapeKind::Aperture { connected_rooms }, json!({})))
            .unwrap();

        assert_eq!(reg.dangling_links(), vec![(a, ghost)]);
        assert_eq!(reg.prune_dangling_links(), 1);
        assert_eq!(reg.get(a).unwrap().kind.connected_rooms(), &[r]);
        assert!(reg.dangling_links().is_empty());
    }

    #[test]
    fn adopt_history_continues_room_numbering() {
        let mut old = ShapeRegistry::new();
        old.add_shape(ShapeType::Room);
        old.add_shape(ShapeType::Room);

        let mut fresh = ShapeRegistry::new();
        fresh.adopt_history(&old);
        let r = fresh.add_shape(ShapeType::Room);
        assert_eq!(fresh.get(r).unwrap().kind.label(), Some("Room 3"));
    }
}
