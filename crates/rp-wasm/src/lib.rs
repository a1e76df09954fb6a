//! WASM bridge for RoomPlan: exposes the editing session to the browser
//! page.
//!
//! Compiled via `wasm-pack build --target web`. The page forwards canvas
//! pointer/keyboard events here and renders through `render`; the JSON
//! editor panel and the label field talk to the metadata methods.

mod render2d;

use rp_core::{EditorConfig, ShapeId};
use rp_editor::{EditOutcome, EditorSession, InputEvent, Modifiers, Mode, Viewport};
use rp_render::ConnectionLine;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// One connection line as handed to JavaScript.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LineJson<'a> {
    aperture_id: &'a str,
    room_id: &'a str,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    highlighted: bool,
}

fn lines_to_json(lines: &[ConnectionLine], highlighted: &[ConnectionLine]) -> String {
    let rows: Vec<LineJson<'_>> = lines
        .iter()
        .map(|l| LineJson {
            aperture_id: l.aperture.as_str(),
            room_id: l.room.as_str(),
            x1: l.line.p0.x,
            y1: l.line.p0.y,
            x2: l.line.p1.x,
            y2: l.line.p1.y,
            highlighted: highlighted.contains(l),
        })
        .collect();
    serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
}

fn ids_to_json(ids: &[ShapeId]) -> String {
    let ids: Vec<&str> = ids.iter().map(ShapeId::as_str).collect();
    serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
}

/// The main WASM-facing canvas controller. All interaction from the page
/// goes through this struct.
#[wasm_bindgen]
pub struct RoomCanvas {
    session: EditorSession,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl RoomCanvas {
    /// Create a canvas controller. `config_json` overrides any subset of
    /// the editor defaults; a malformed config falls back to defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config_json: Option<String>) -> Self {
        console_error_panic_hook_setup();

        let config = match config_json.as_deref() {
            Some(text) => EditorConfig::from_json(text).unwrap_or_else(|e| {
                log::warn!("bad config, using defaults: {e}");
                web_sys::console::warn_1(&format!("RoomPlan: bad config, using defaults: {e}").into());
                EditorConfig::default()
            }),
            None => EditorConfig::default(),
        };

        Self {
            session: EditorSession::new(config, Viewport { width, height }),
            width,
            height,
        }
    }

    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        render2d::render_session(
            ctx,
            &self.session,
            self.width,
            self.height,
            &render2d::CanvasTheme::light(),
        );
    }

    /// Resize the canvas; connection lines are recomputed.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.session.resize_viewport(width, height);
    }

    // ─── Shapes ──────────────────────────────────────────────────────────

    /// Add a room at the spawn point. Returns its id.
    pub fn add_room(&mut self) -> String {
        self.session.add_room().as_str().to_string()
    }

    /// Add an aperture at the spawn point. Returns its id.
    pub fn add_aperture(&mut self) -> String {
        self.session.add_aperture().as_str().to_string()
    }

    /// Delete the selected shape. Returns true if one was deleted.
    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected().is_some()
    }

    /// Label edit from the canvas (rooms only).
    pub fn set_label(&mut self, id: &str, label: &str) -> bool {
        self.session
            .apply_mutation(rp_editor::DiagramMutation::SetLabel {
                id: ShapeId::intern(id),
                label: label.to_string(),
            })
    }

    // ─── Link mode ───────────────────────────────────────────────────────

    pub fn enter_link_mode(&mut self) {
        self.session.enter_link_mode();
    }

    pub fn cancel_link_mode(&mut self) -> bool {
        self.session.cancel_link_mode()
    }

    pub fn is_link_mode(&self) -> bool {
        self.session.mode() == Mode::LinkSelectingRooms
    }

    /// Rooms picked so far in link mode, as a JSON array of ids.
    pub fn pending_rooms_json(&self) -> String {
        ids_to_json(self.session.pending_rooms())
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Handle pointer down. Returns true if a re-render is needed.
    pub fn handle_pointer_down(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers { shift, ctrl, alt, meta };
        self.session
            .handle_event(&InputEvent::PointerDown { x, y, modifiers })
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers { shift, ctrl, alt, meta };
        self.session
            .handle_event(&InputEvent::PointerMove { x, y, modifiers })
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers { shift, ctrl, alt, meta };
        self.session
            .handle_event(&InputEvent::PointerUp { x, y, modifiers })
    }

    /// A completed click on the canvas. Clicks inside the metadata panel
    /// must not be forwarded.
    pub fn handle_click(&mut self, x: f64, y: f64) -> bool {
        self.session.handle_event(&InputEvent::Click { x, y })
    }

    /// Click on a shape the page resolved itself (e.g. via a DOM overlay).
    pub fn click_shape(&mut self, id: &str) -> bool {
        self.session.click_shape(ShapeId::intern(id))
    }

    /// Handle a keyboard event. Returns true if a re-render is needed.
    ///
    /// Bare keys (`Backspace`, `r`, `a`, `l`) are editor shortcuts, so keys
    /// typed into the metadata panel or any other text field must not be
    /// forwarded.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers { shift, ctrl, alt, meta };
        self.session.handle_event(&InputEvent::Key {
            key: key.to_string(),
            modifiers,
        })
    }

    // ─── Selection & metadata ────────────────────────────────────────────

    /// Selected shape id, or empty.
    pub fn selected_id(&self) -> String {
        self.session
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn hovered_id(&self) -> String {
        self.session
            .hovered()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn metadata_visible(&self) -> bool {
        self.session.metadata().is_visible()
    }

    pub fn metadata_text(&self) -> String {
        self.session.metadata().text().to_string()
    }

    /// Apply edited metadata text. Returns true if it parsed and was stored.
    pub fn set_metadata_text(&mut self, text: &str) -> bool {
        matches!(self.session.edit_metadata(text), EditOutcome::Applied { .. })
    }

    /// The current metadata parse error, or empty.
    pub fn metadata_error(&self) -> String {
        self.session
            .metadata()
            .error()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    // ─── Lines ───────────────────────────────────────────────────────────

    /// Every connection line as JSON, with hover highlighting flagged.
    pub fn lines_json(&self) -> String {
        lines_to_json(self.session.connections(), &self.session.highlighted_lines())
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// The layout as pretty JSON, for download as `canvas-layout.json`.
    pub fn save_layout(&self) -> String {
        self.session.save_layout().unwrap_or_else(|e| {
            log::error!("save failed: {e}");
            web_sys::console::error_1(&format!("RoomPlan: save failed: {e}").into());
            String::new()
        })
    }

    /// Replace the diagram with a JSON layout. Returns an empty string on
    /// success, otherwise the error message (and nothing changes).
    pub fn load_layout(&mut self, text: &str) -> String {
        match self.session.load_layout(text) {
            Ok(()) => String::new(),
            Err(e) => e.to_string(),
        }
    }

    /// Compact binary snapshot for local storage.
    pub fn snapshot(&self) -> Vec<u8> {
        self.session.snapshot().unwrap_or_else(|e| {
            log::error!("snapshot failed: {e}");
            Vec::new()
        })
    }

    /// Restore a snapshot. Returns an empty string on success.
    pub fn restore_snapshot(&mut self, bytes: &js_sys::Uint8Array) -> String {
        match self.session.restore(&bytes.to_vec()) {
            Ok(()) => String::new(),
            Err(e) => e.to_string(),
        }
    }

    pub fn export_svg(&self) -> String {
        self.session.export_svg()
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("RoomPlan WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no canvas needed) ────────────────────────────

/// Validate a layout document. Returns JSON: `{"ok":true,"shapes":N}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_layout(text: &str) -> String {
    let result = rp_core::codec::from_json(text).and_then(|doc| rp_core::deserialize(&doc));
    let value = match result {
        Ok((registry, _)) => serde_json::json!({ "ok": true, "shapes": registry.len() }),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }),
    };
    value.to_string()
}
