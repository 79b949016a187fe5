//! Maps raw surface events to history actions.
//!
//! | Event            | Active tool              | Action                     |
//! |------------------|--------------------------|----------------------------|
//! | stroke-completed | any                      | save, short window         |
//! | erase-completed  | any                      | save, long window          |
//! | object-modified  | eraser                   | save, long window          |
//! | object-removed   | eraser                   | save, long window          |
//! | pointer-down     | eraser                   | mark gesture in progress   |
//! | pointer-up       | eraser, gesture started  | force save                 |
//! | object-added     | any                      | mark object erasable       |
//!
//! Everything else is ignored.

use crate::history::SaveWindow;
use crate::surface::{ObjectId, SurfaceEvent};
use crate::tools::ToolKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    Ignore,
    RequestSave(SaveWindow),
    BeginGesture,
    ForceSave,
    MarkErasable(ObjectId),
}

/// Tracks whether an erase gesture is in progress between pointer events.
#[derive(Debug, Default)]
pub struct TriggerAdapter {
    gesture_in_progress: bool,
}

impl TriggerAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn gesture_in_progress(&self) -> bool {
        self.gesture_in_progress
    }

    pub fn classify(&mut self, event: SurfaceEvent, tool: ToolKind) -> TriggerAction {
        let erasing = tool == ToolKind::Eraser;
        match event {
            SurfaceEvent::StrokeCompleted => TriggerAction::RequestSave(SaveWindow::Stroke),
            SurfaceEvent::EraseCompleted => TriggerAction::RequestSave(SaveWindow::Erase),
            SurfaceEvent::ObjectModified(_) | SurfaceEvent::ObjectRemoved(_) if erasing => {
                TriggerAction::RequestSave(SaveWindow::Erase)
            }
            SurfaceEvent::PointerDown if erasing => {
                self.gesture_in_progress = true;
                TriggerAction::BeginGesture
            }
            SurfaceEvent::PointerUp if erasing && self.gesture_in_progress => {
                self.gesture_in_progress = false;
                TriggerAction::ForceSave
            }
            SurfaceEvent::ObjectAdded(id) => TriggerAction::MarkErasable(id),
            _ => TriggerAction::Ignore,
        }
    }

    /// Forget a half-finished gesture, e.g. when the tool changes.
    pub fn reset(&mut self) {
        self.gesture_in_progress = false;
    }
}

#[cfg(test)]
#[path = "triggers_test.rs"]
mod tests;
