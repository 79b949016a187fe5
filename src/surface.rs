//! Document surface boundary: the drawing engine the history drives.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::SurfaceError;
use crate::tools::Brush;

/// Unique identifier for an object on the surface.
pub type ObjectId = Uuid;

/// Handle returned by [`DocumentSurface::subscribe`].
pub type ListenerId = u64;

/// Event callback. Invoked synchronously, in emission order, and never while
/// the surface holds its own locks.
pub type EventListener = Arc<dyn Fn(SurfaceEvent) + Send + Sync>;

/// Raw events emitted by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    StrokeCompleted,
    EraseCompleted,
    ObjectAdded(ObjectId),
    ObjectModified(ObjectId),
    ObjectRemoved(ObjectId),
    PointerDown,
    PointerUp,
}

impl SurfaceEvent {
    /// Subscription key for this event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::StrokeCompleted => "stroke-completed",
            Self::EraseCompleted => "erase-completed",
            Self::ObjectAdded(_) => "object-added",
            Self::ObjectModified(_) => "object-modified",
            Self::ObjectRemoved(_) => "object-removed",
            Self::PointerDown => "pointer-down",
            Self::PointerUp => "pointer-up",
        }
    }
}

impl fmt::Display for SurfaceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operations the history and session layers need from the drawing engine.
pub trait DocumentSurface: Send + Sync {
    /// Remove every object from the document.
    fn clear(&self);

    /// Redraw the document.
    fn render(&self);

    fn set_drawing_mode(&self, enabled: bool);

    fn drawing_mode(&self) -> bool;

    fn set_brush(&self, brush: &Brush);

    /// Allow or forbid the eraser from affecting `id`.
    fn set_erasable(&self, id: ObjectId, erasable: bool);

    /// Register `listener` for every event the surface emits.
    fn subscribe(&self, listener: EventListener) -> ListenerId;

    /// Remove a listener. Returns whether it was registered.
    fn unsubscribe(&self, id: ListenerId) -> bool;

    /// Release engine resources.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Teardown`] if the engine fails to dispose.
    fn dispose(&self) -> Result<(), SurfaceError>;
}
