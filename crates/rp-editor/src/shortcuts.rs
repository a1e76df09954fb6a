//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Lives in Rust
//! so the WASM bridge and tests resolve keys identically.

use crate::input::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Delete the selected shape (cascades for rooms).
    Delete,
    /// Leave link mode, or clear the selection when idle.
    Cancel,
    EnterLinkMode,
    AddRoom,
    AddAperture,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value. Anything held with ⌘/Ctrl or
    /// Alt is left to the host so browser shortcuts keep working.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if modifiers.command() || modifiers.alt {
            return None;
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Cancel),
            "l" | "L" => Some(ShortcutAction::EnterLinkMode),
            "r" | "R" => Some(ShortcutAction::AddRoom),
            "a" | "A" => Some(ShortcutAction::AddAperture),
            _ => None,
        }
    }
}
