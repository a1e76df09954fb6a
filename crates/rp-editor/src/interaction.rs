//! Interaction controller: the modal state machine behind the canvas.
//!
//! Translates input events into `DiagramMutation`s that the session
//! applies. The controller owns selection, the link-mode flag, the pending
//! room picks, and the active drag/resize gesture; it never touches the
//! registry or geometry directly.
//!
//! | Mode | Press on shape | Click on room | Click on aperture | Click on background |
//! |------|----------------|---------------|-------------------|---------------------|
//! | **Idle** | select + drag/resize | select | select | deselect |
//! | **LinkSelectingRooms** | drag/resize only | toggle pending | assign pending, back to Idle | — |

use crate::input::InputEvent;
use crate::session::DiagramMutation;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use rp_core::{Bounds, ConnectedRooms, MAX_CONNECTED_ROOMS, ShapeId, ShapeType};
use rp_render::HitPart;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// Clicks on rooms collect up to two pending picks; a click on an
    /// aperture commits them.
    LinkSelectingRooms,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    None,
    /// `offset` is pointer minus the shape's top-left at press time.
    Dragging {
        id: ShapeId,
        offset_x: f64,
        offset_y: f64,
    },
    /// The top-left is fixed for the whole resize.
    Resizing { id: ShapeId, left: f64, top: f64 },
}

/// What is under the pointer, as resolved by the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: ShapeId,
    pub part: HitPart,
    pub shape_type: ShapeType,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    mode: Mode,
    gesture: Gesture,
    selected: Option<ShapeId>,
    pending: ConnectedRooms,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_link_mode(&self) -> bool {
        self.mode == Mode::LinkSelectingRooms
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn selected(&self) -> Option<ShapeId> {
        self.selected
    }

    /// Rooms picked so far in link mode, in pick order.
    pub fn pending_rooms(&self) -> &[ShapeId] {
        &self.pending
    }

    pub fn select(&mut self, id: Option<ShapeId>) {
        self.selected = id;
    }

    // ─── Link mode ───────────────────────────────────────────────────────

    /// Enter link mode. Always starts from an empty pending set, even when
    /// already in link mode.
    pub fn enter_link_mode(&mut self) {
        self.pending.clear();
        self.mode = Mode::LinkSelectingRooms;
        log::debug!("link mode: on");
    }

    /// Leave link mode without linking anything.
    /// Returns `false` if link mode was not active.
    pub fn cancel_link_mode(&mut self) -> bool {
        if !self.is_link_mode() {
            return false;
        }
        self.pending.clear();
        self.mode = Mode::Idle;
        log::debug!("link mode: cancelled");
        true
    }

    /// A link-mode click on a known shape.
    ///
    /// Rooms toggle in and out of the pending set (capped at two, extra
    /// picks ignored). An aperture takes the pending set as its connected
    /// rooms and ends link mode. Outside link mode this does nothing.
    pub fn link_click(&mut self, id: ShapeId, shape_type: ShapeType) -> Vec<DiagramMutation> {
        if !self.is_link_mode() {
            return vec![];
        }
        match shape_type {
            ShapeType::Room => {
                if let Some(pos) = self.pending.iter().position(|r| *r == id) {
                    self.pending.remove(pos);
                } else if self.pending.len() < MAX_CONNECTED_ROOMS {
                    self.pending.push(id);
                } else {
                    log::debug!("link mode: {id} ignored, two rooms already picked");
                }
                vec![]
            }
            ShapeType::Aperture => {
                let rooms = std::mem::take(&mut self.pending);
                self.mode = Mode::Idle;
                log::debug!("link mode: {id} -> {rooms:?}");
                vec![DiagramMutation::LinkAperture { aperture: id, rooms }]
            }
        }
    }

    /// Drop every reference to a shape that no longer exists.
    pub fn forget(&mut self, id: ShapeId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.pending.retain(|r| *r != id);
        match self.gesture {
            Gesture::Dragging { id: g, .. } | Gesture::Resizing { id: g, .. } if g == id => {
                self.gesture = Gesture::None;
            }
            _ => {}
        }
    }

    // ─── Events ──────────────────────────────────────────────────────────

    /// Handle an input event, returning zero or more mutations.
    ///
    /// `target` is the shape under the pointer for pointer events, `None`
    /// on background and for key events.
    pub fn handle(&mut self, event: &InputEvent, target: Option<Target>) -> Vec<DiagramMutation> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                let Some(t) = target else {
                    return vec![];
                };
                if self.mode == Mode::Idle {
                    self.selected = Some(t.id);
                }
                self.gesture = match t.part {
                    HitPart::ResizeHandle => Gesture::Resizing {
                        id: t.id,
                        left: t.bounds.left,
                        top: t.bounds.top,
                    },
                    HitPart::Body => Gesture::Dragging {
                        id: t.id,
                        offset_x: x - t.bounds.left,
                        offset_y: y - t.bounds.top,
                    },
                };
                vec![]
            }
            InputEvent::PointerMove { x, y, .. } => match self.gesture {
                Gesture::Dragging {
                    id,
                    offset_x,
                    offset_y,
                } => vec![DiagramMutation::MoveShape {
                    id,
                    left: x - offset_x,
                    top: y - offset_y,
                }],
                Gesture::Resizing { id, left, top } => vec![DiagramMutation::ResizeShape {
                    id,
                    width: x - left,
                    height: y - top,
                }],
                Gesture::None => vec![],
            },
            InputEvent::PointerUp { .. } => {
                self.gesture = Gesture::None;
                vec![]
            }
            InputEvent::Click { .. } => match (self.mode, target) {
                (Mode::Idle, Some(t)) => {
                    self.selected = Some(t.id);
                    vec![]
                }
                (Mode::Idle, None) => {
                    self.selected = None;
                    vec![]
                }
                (Mode::LinkSelectingRooms, Some(t)) => self.link_click(t.id, t.shape_type),
                (Mode::LinkSelectingRooms, None) => vec![],
            },
            InputEvent::Key { key, modifiers } => match ShortcutMap::resolve(key, *modifiers) {
                Some(ShortcutAction::Delete) => match self.selected.take() {
                    Some(id) => {
                        self.forget(id);
                        vec![DiagramMutation::RemoveShape { id }]
                    }
                    None => vec![],
                },
                Some(ShortcutAction::Cancel) => {
                    if !self.cancel_link_mode() {
                        self.selected = None;
                    }
                    vec![]
                }
                Some(ShortcutAction::EnterLinkMode) => {
                    self.enter_link_mode();
                    vec![]
                }
                Some(ShortcutAction::AddRoom) => vec![DiagramMutation::AddShape {
                    shape_type: ShapeType::Room,
                }],
                Some(ShortcutAction::AddAperture) => vec![DiagramMutation::AddShape {
                    shape_type: ShapeType::Aperture,
                }],
                None => vec![],
            },
        }
    }
}
