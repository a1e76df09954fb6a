//! Editing session: owns every piece of diagram state and applies
//! mutations to it.
//!
//! Input flows `InputEvent` → `InteractionController` → `DiagramMutation`
//! → `EditorSession::apply_mutation`, after which connection lines are
//! recomputed and the metadata editor is rebound to the current selection.
//! Hosts (the WASM bridge, tests) drive everything through this type.

use crate::input::InputEvent;
use crate::interaction::{InteractionController, Mode, Target};
use crate::metadata::{EditOutcome, MetadataEditor};
use rp_core::codec::{self, LayoutDocument};
use rp_core::{
    ConnectedRooms, EditorConfig, GeometryModel, LayoutError, RoomGraph, Shape, ShapeId,
    ShapeRegistry, ShapeType,
};
use rp_render::{ConnectionLine, ConnectionSet, SvgTheme, hit_test, render_svg};

/// Canvas dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// A change to the diagram produced by interaction (or by the host).
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramMutation {
    AddShape {
        shape_type: ShapeType,
    },
    MoveShape {
        id: ShapeId,
        left: f64,
        top: f64,
    },
    /// Each dimension is floored at the configured minimum when applied.
    ResizeShape {
        id: ShapeId,
        width: f64,
        height: f64,
    },
    LinkAperture {
        aperture: ShapeId,
        rooms: ConnectedRooms,
    },
    RemoveShape {
        id: ShapeId,
    },
    /// Canvas label edit on a room.
    SetLabel {
        id: ShapeId,
        label: String,
    },
}

pub struct EditorSession {
    pub registry: ShapeRegistry,
    pub geometry: GeometryModel,
    pub config: EditorConfig,
    controller: InteractionController,
    metadata: MetadataEditor,
    connections: ConnectionSet,
    hovered: Option<ShapeId>,
    viewport: Viewport,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default(), Viewport::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig, viewport: Viewport) -> Self {
        Self {
            registry: ShapeRegistry::with_config(&config),
            geometry: GeometryModel::with_min_size(config.min_size),
            config,
            controller: InteractionController::new(),
            metadata: MetadataEditor::new(),
            connections: ConnectionSet::new(),
            hovered: None,
            viewport,
        }
    }

    // ─── State accessors ─────────────────────────────────────────────────

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn metadata(&self) -> &MetadataEditor {
        &self.metadata
    }

    pub fn selected(&self) -> Option<ShapeId> {
        self.controller.selected()
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn pending_rooms(&self) -> &[ShapeId] {
        self.controller.pending_rooms()
    }

    pub fn hovered(&self) -> Option<ShapeId> {
        self.hovered
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn connections(&self) -> &[ConnectionLine] {
        self.connections.lines()
    }

    /// Lines whose aperture or room is `id`.
    pub fn lines_touching(&self, id: ShapeId) -> Vec<ConnectionLine> {
        self.connections.touching(id).copied().collect()
    }

    /// Lines to highlight for the shape under the pointer.
    pub fn highlighted_lines(&self) -> Vec<ConnectionLine> {
        self.hovered
            .map(|id| self.lines_touching(id))
            .unwrap_or_default()
    }

    pub fn room_graph(&self) -> RoomGraph {
        RoomGraph::build(&self.registry)
    }

    // ─── Host actions ────────────────────────────────────────────────────

    /// Add a shape at the configured spawn rectangle and select it.
    pub fn add_shape(&mut self, shape_type: ShapeType) -> ShapeId {
        let id = self.registry.add_shape(shape_type);
        self.geometry.insert(id, self.config.spawn_bounds(shape_type));
        self.select(Some(id));
        self.recompute();
        id
    }

    pub fn add_room(&mut self) -> ShapeId {
        self.add_shape(ShapeType::Room)
    }

    pub fn add_aperture(&mut self) -> ShapeId {
        self.add_shape(ShapeType::Aperture)
    }

    /// Make `id` the single selection (or clear it) and rebind the
    /// metadata editor. Unknown ids clear the selection.
    pub fn select(&mut self, id: Option<ShapeId>) {
        let id = id.filter(|id| self.registry.contains(*id));
        self.controller.select(id);
        self.sync_metadata();
    }

    pub fn enter_link_mode(&mut self) {
        self.controller.enter_link_mode();
    }

    pub fn cancel_link_mode(&mut self) -> bool {
        self.controller.cancel_link_mode()
    }

    /// Click on a shape by id, as a host with its own hit testing would
    /// report it. Unknown ids are ignored.
    pub fn click_shape(&mut self, id: ShapeId) -> bool {
        let Some(shape_type) = self.registry.get(id).map(Shape::shape_type) else {
            log::debug!("click on unknown shape {id}");
            return false;
        };
        if self.controller.is_link_mode() {
            let mutations = self.controller.link_click(id, shape_type);
            for m in mutations {
                self.apply_mutation(m);
            }
        } else {
            self.select(Some(id));
        }
        true
    }

    /// Edit the selected shape's metadata text.
    pub fn edit_metadata(&mut self, text: &str) -> EditOutcome {
        self.metadata.edit(text, &mut self.registry)
    }

    /// Delete the selected shape. Returns it if there was one.
    pub fn delete_selected(&mut self) -> Option<Shape> {
        let id = self.controller.selected()?;
        self.delete_shape(id)
    }

    pub fn delete_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let removed = self.registry.remove_shape(id)?;
        self.geometry.remove(id);
        self.controller.forget(id);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        self.sync_metadata();
        self.recompute();
        Some(removed)
    }

    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport { width, height };
        self.recompute();
    }

    // ─── Events ──────────────────────────────────────────────────────────

    /// Feed one input event through the controller and apply the result.
    /// Returns `true` if anything visible changed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        let target = event.position().and_then(|(x, y)| self.target_at(x, y));
        let before = self.ui_state();

        if matches!(event, InputEvent::PointerMove { .. }) {
            self.hovered = target.map(|t| t.id);
        }

        let mutations = self.controller.handle(event, target);
        let mut changed = false;
        for m in mutations {
            changed |= self.apply_mutation(m);
        }
        self.sync_metadata();

        changed || self.ui_state() != before
    }

    /// Apply one mutation. Returns `true` if state changed.
    pub fn apply_mutation(&mut self, mutation: DiagramMutation) -> bool {
        match mutation {
            DiagramMutation::AddShape { shape_type } => {
                self.add_shape(shape_type);
                true
            }
            DiagramMutation::MoveShape { id, left, top } => {
                if self.geometry.get(id).is_none() {
                    return false;
                }
                if !left.is_finite() || !top.is_finite() {
                    log::debug!("move {id} ignored: non-finite ({left}, {top})");
                    return false;
                }
                log::trace!("move {id} to ({left}, {top})");
                self.geometry.set_position(id, left, top);
                self.recompute();
                true
            }
            DiagramMutation::ResizeShape { id, width, height } => {
                if self.geometry.get(id).is_none() {
                    return false;
                }
                if !width.is_finite() || !height.is_finite() {
                    log::debug!("resize {id} ignored: non-finite {width} x {height}");
                    return false;
                }
                log::trace!("resize {id} to {width} x {height}");
                self.geometry.set_size(id, width, height);
                self.recompute();
                true
            }
            DiagramMutation::LinkAperture { aperture, rooms } => {
                let linked = self.registry.link_aperture(aperture, &rooms);
                if linked {
                    self.recompute();
                }
                linked
            }
            DiagramMutation::RemoveShape { id } => self.delete_shape(id).is_some(),
            DiagramMutation::SetLabel { id, label } => {
                let set = self.registry.set_label(id, &label);
                if set && self.metadata.bound() == Some(id) {
                    self.metadata.reload(&self.registry);
                }
                set
            }
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn document(&self) -> LayoutDocument {
        codec::serialize(&self.registry, &self.geometry)
    }

    /// The downloadable JSON layout.
    ///
    /// # Errors
    /// [`LayoutError::NonFiniteGeometry`] if geometry was set to NaN or an
    /// infinity directly through `geometry`.
    pub fn save_layout(&self) -> Result<String, LayoutError> {
        codec::to_json(&self.document())
    }

    /// Replace the whole diagram with a JSON layout.
    ///
    /// # Errors
    /// Any parse or validation failure; the session is left untouched.
    pub fn load_layout(&mut self, text: &str) -> Result<(), LayoutError> {
        let document = codec::from_json(text).inspect_err(|e| log::warn!("load rejected: {e}"))?;
        self.load_document(&document)
    }

    /// # Errors
    /// See [`codec::deserialize_with`].
    pub fn load_document(&mut self, document: &[codec::ShapeRecord]) -> Result<(), LayoutError> {
        let (mut registry, geometry) = codec::deserialize_with(document, &self.config)
            .inspect_err(|e| log::warn!("load rejected: {e}"))?;
        registry.adopt_history(&self.registry);

        self.registry = registry;
        self.geometry = geometry;
        self.controller = InteractionController::new();
        self.metadata.hide();
        self.hovered = None;
        self.recompute();
        log::debug!("loaded {} shapes", self.registry.len());
        Ok(())
    }

    /// # Errors
    /// Propagates MessagePack encoder failures.
    pub fn snapshot(&self) -> Result<Vec<u8>, LayoutError> {
        codec::to_msgpack(&self.document())
    }

    /// # Errors
    /// Malformed bytes or an invalid document; the session is left untouched.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<(), LayoutError> {
        let document = codec::from_msgpack(bytes)?;
        self.load_document(&document)
    }

    pub fn export_svg(&self) -> String {
        render_svg(
            &self.registry,
            &self.geometry,
            self.connections.lines(),
            &SvgTheme::default(),
        )
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn target_at(&self, x: f64, y: f64) -> Option<Target> {
        let hit = hit_test(&self.registry, &self.geometry, x, y, self.config.handle_size)?;
        let shape = self.registry.get(hit.id)?;
        let bounds = self.geometry.get(hit.id)?;
        Some(Target {
            id: hit.id,
            part: hit.part,
            shape_type: shape.shape_type(),
            bounds,
        })
    }

    fn ui_state(&self) -> (Option<ShapeId>, Mode, ConnectedRooms, Option<ShapeId>) {
        (
            self.controller.selected(),
            self.controller.mode(),
            ConnectedRooms::from_slice(self.controller.pending_rooms()),
            self.hovered,
        )
    }

    /// Keep the metadata editor bound to whatever is selected.
    fn sync_metadata(&mut self) {
        let selected = self.controller.selected();
        if selected == self.metadata.bound() {
            return;
        }
        match selected {
            Some(id) => self.metadata.bind(id, &self.registry),
            None => self.metadata.hide(),
        }
    }

    fn recompute(&mut self) {
        self.connections.recompute(&self.registry, &self.geometry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn add_shape_spawns_and_selects() {
        let mut s = EditorSession::default();
        let id = s.add_room();
        assert_eq!(s.selected(), Some(id));
        assert_eq!(s.metadata().bound(), Some(id));
        assert_eq!(s.geometry.get(id), Some(s.config.spawn_bounds(ShapeType::Room)));
    }

    #[test]
    fn drag_moves_shape_and_its_lines() {
        let mut s = EditorSession::default();
        let room = s.add_room();
        let door = s.add_aperture();
        s.geometry.set_position(door, 300.0, 300.0);
        s.registry.link_aperture(door, &[room]);
        s.resize_viewport(1024.0, 768.0);

        // Press inside the room (50..150), away from its handle.
        s.handle_event(&InputEvent::pointer_down(60.0, 60.0));
        s.handle_event(&InputEvent::pointer_move(110.0, 80.0));
        s.handle_event(&InputEvent::pointer_up(110.0, 80.0));

        let b = s.geometry.get(room).unwrap();
        assert_eq!((b.left, b.top), (100.0, 70.0));
        assert_eq!(s.connections()[0].line.p1.x, 150.0);
        assert_eq!(s.selected(), Some(room));
    }

    #[test]
    fn resize_respects_floor() {
        let mut s = EditorSession::default();
        let room = s.add_room();
        s.handle_event(&InputEvent::pointer_down(148.0, 148.0));
        s.handle_event(&InputEvent::pointer_move(55.0, 260.0));
        s.handle_event(&InputEvent::pointer_up(55.0, 260.0));

        let b = s.geometry.get(room).unwrap();
        assert_eq!((b.width, b.height), (30.0, 210.0));
    }

    #[test]
    fn configured_floor_below_minimum_still_floors_at_30() {
        let config = EditorConfig::from_json(r#"{"minSize": 0}"#).unwrap();
        let mut s = EditorSession::new(config, Viewport::default());
        let room = s.add_room();
        s.handle_event(&InputEvent::pointer_down(148.0, 148.0));
        s.handle_event(&InputEvent::pointer_move(55.0, 55.0));
        s.handle_event(&InputEvent::pointer_up(55.0, 55.0));

        let b = s.geometry.get(room).unwrap();
        assert_eq!((b.width, b.height), (30.0, 30.0));
    }

    #[test]
    fn non_finite_pointer_leaves_geometry_saveable() {
        let mut s = EditorSession::default();
        let room = s.add_room();
        s.handle_event(&InputEvent::pointer_down(60.0, 60.0));
        s.handle_event(&InputEvent::pointer_move(f64::NAN, 60.0));
        s.handle_event(&InputEvent::pointer_up(60.0, 60.0));
        assert_eq!(s.geometry.get(room), Some(s.config.spawn_bounds(ShapeType::Room)));

        s.handle_event(&InputEvent::pointer_down(148.0, 148.0));
        s.handle_event(&InputEvent::pointer_move(f64::INFINITY, 200.0));
        s.handle_event(&InputEvent::pointer_up(148.0, 148.0));
        assert_eq!(s.geometry.get(room).unwrap().width, 100.0);

        let saved = s.save_layout().unwrap();
        let mut fresh = EditorSession::default();
        fresh.load_layout(&saved).unwrap();
        assert_eq!(fresh.geometry.get(room), s.geometry.get(room));
    }

    #[test]
    fn direct_nan_geometry_fails_save() {
        let mut s = EditorSession::default();
        let room = s.add_room();
        s.geometry.set_position(room, f64::NAN, 0.0);
        assert!(matches!(s.save_layout(), Err(LayoutError::NonFiniteGeometry(id)) if id == room));
        assert!(s.snapshot().is_err());
    }

    #[test]
    fn hover_exposes_touching_lines() {
        let mut s = EditorSession::default();
        let room = s.add_room();
        let door = s.add_aperture();
        s.geometry.set_position(door, 400.0, 400.0);
        s.apply_mutation(DiagramMutation::LinkAperture {
            aperture: door,
            rooms: ConnectedRooms::from_slice(&[room]),
        });

        assert!(s.handle_event(&InputEvent::pointer_move(410.0, 410.0)));
        assert_eq!(s.hovered(), Some(door));
        assert_eq!(s.highlighted_lines().len(), 1);

        s.handle_event(&InputEvent::pointer_move(900.0, 900.0));
        assert!(s.highlighted_lines().is_empty());
    }

    #[test]
    fn canvas_label_edit_refreshes_metadata() {
        let mut s = EditorSession::default();
        let room = s.add_room();
        s.apply_mutation(DiagramMutation::SetLabel {
            id: room,
            label: "Hall".into(),
        });
        assert!(s.metadata().text().contains("\"label\": \"Hall\""));
        assert_eq!(s.registry.get(room).unwrap().kind.label(), Some("Hall"));
    }

    #[test]
    fn click_unknown_shape_is_noop() {
        let mut s = EditorSession::default();
        s.enter_link_mode();
        assert!(!s.click_shape(ShapeId::intern("no_such_aperture")));
        assert_eq!(s.mode(), Mode::LinkSelectingRooms);
    }

    #[test]
    fn failed_load_keeps_state() {
        let mut s = EditorSession::default();
        let room = s.add_room();
        assert!(s.load_layout("[{\"id\": 1}]").is_err());
        assert!(s.load_layout("not json").is_err());
        assert!(s.registry.contains(room));
        assert_eq!(s.selected(), Some(room));
    }

    #[test]
    fn load_resets_interaction_state() {
        let mut s = EditorSession::default();
        s.add_room();
        s.enter_link_mode();
        let saved = s.save_layout().unwrap();

        s.load_layout(&saved).unwrap();
        assert_eq!(s.mode(), Mode::Idle);
        assert_eq!(s.selected(), None);
        assert!(!s.metadata().is_visible());
    }

    #[test]
    fn room_counter_survives_reload() {
        let mut s = EditorSession::default();
        s.add_room();
        let saved = s.save_layout().unwrap();
        s.load_layout(&saved).unwrap();
        let next = s.add_room();
        assert_eq!(s.registry.get(next).unwrap().kind.label(), Some("Room 2"));
    }

    #[test]
    fn snapshot_restores() {
        let mut s = EditorSession::default();
        let room = s.add_room();
        s.geometry.set_position(room, 12.5, 40.0);
        let bytes = s.snapshot().unwrap();

        let mut other = EditorSession::default();
        other.restore(&bytes).unwrap();
        assert_eq!(other.document(), s.document());
    }
}
