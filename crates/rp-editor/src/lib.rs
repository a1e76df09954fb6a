pub mod input;
pub mod interaction;
pub mod metadata;
pub mod session;
pub mod shortcuts;

pub use input::{InputEvent, Modifiers};
pub use interaction::{Gesture, InteractionController, Mode, Target};
pub use metadata::{EditOutcome, MetadataEditor, MetadataError};
pub use session::{DiagramMutation, EditorSession, Viewport};
pub use shortcuts::{ShortcutAction, ShortcutMap};
