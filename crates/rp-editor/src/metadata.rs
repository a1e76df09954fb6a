//! Metadata editor: JSON text bound to the selected shape's attributes.
//!
//! Every edit is parsed immediately. A good parse replaces the stored blob;
//! a bad one only raises the error indicator, leaving the stored blob as
//! it was.

use rp_core::{ShapeId, ShapeRegistry, Value, default_metadata};
use thiserror::Error;

/// A metadata edit that did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid JSON at line {line}, column {column}: {message}")]
pub struct MetadataError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<serde_json::Error> for MetadataError {
    fn from(e: serde_json::Error) -> Self {
        Self {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Parsed and stored. `label_changed` is set when a room's displayed
    /// label followed the blob's `label`.
    Applied { label_changed: bool },
    /// Did not parse; the error indicator is set.
    Invalid,
    /// The editor is hidden or its shape is gone.
    Unbound,
}

#[derive(Debug, Clone, Default)]
pub struct MetadataEditor {
    bound: Option<ShapeId>,
    text: String,
    error: Option<MetadataError>,
}

/// Two-space pretty JSON.
fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        log::debug!("metadata: cannot pretty-print blob: {e}");
        value.to_string()
    })
}

impl MetadataEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.bound.is_some()
    }

    pub fn bound(&self) -> Option<ShapeId> {
        self.bound
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> Option<&MetadataError> {
        self.error.as_ref()
    }

    /// Show the editor for `id`, loading its stored attributes (or the
    /// default blob when it has none) and clearing any error.
    pub fn bind(&mut self, id: ShapeId, registry: &ShapeRegistry) {
        self.bound = Some(id);
        self.error = None;
        self.reload(registry);
    }

    pub fn hide(&mut self) {
        self.bound = None;
        self.text.clear();
        self.error = None;
    }

    /// Re-read the bound shape's attributes, e.g. after a canvas label edit.
    /// Discards unsaved invalid text.
    pub fn reload(&mut self, registry: &ShapeRegistry) {
        let Some(id) = self.bound else {
            return;
        };
        self.text = match registry.attributes(id) {
            Some(v) if !v.is_null() => pretty(v),
            _ => pretty(&default_metadata()),
        };
        self.error = None;
    }

    /// Apply edited text to the bound shape.
    pub fn edit(&mut self, text: &str, registry: &mut ShapeRegistry) -> EditOutcome {
        self.text = text.to_string();
        let Some(id) = self.bound else {
            return EditOutcome::Unbound;
        };
        if !registry.contains(id) {
            log::debug!("metadata: bound shape {id} is gone");
            self.hide();
            return EditOutcome::Unbound;
        }

        match serde_json::from_str::<Value>(text) {
            Ok(blob) => {
                let label = blob
                    .get("label")
                    .and_then(Value::as_str)
                    .filter(|l| !l.is_empty())
                    .map(str::to_owned);
                registry.set_attributes(id, blob);
                self.error = None;
                let label_changed = label.is_some_and(|l| registry.set_display_label(id, &l));
                EditOutcome::Applied { label_changed }
            }
            Err(e) => {
                log::debug!("metadata: {id} edit rejected: {e}");
                self.error = Some(e.into());
                EditOutcome::Invalid
            }
        }
    }
}
