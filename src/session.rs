//! Drawing session: wires a document surface to its history.
//!
//! DESIGN
//! ======
//! A session owns the surface, the [`History`], the toolbox, and the trigger
//! adapter. It subscribes one listener to the surface at open time and
//! removes it at teardown. The listener holds a `Weak` reference, so events
//! delivered after teardown fall on the floor.
//!
//! ERROR HANDLING
//! ==============
//! A surface that fails to construct leaves the session inert: every
//! operation is a logged no-op and the view reports nothing to undo or
//! redo. Teardown failures are logged and swallowed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::codec::SnapshotCodec;
use crate::config::HistoryConfig;
use crate::error::{ErrorCode, SurfaceError};
use crate::history::{History, HistoryView, RestoreOutcome};
use crate::keys::{KeyCombo, Shortcut, match_shortcut};
use crate::surface::{DocumentSurface, ListenerId, SurfaceEvent};
use crate::tools::{Brush, ToolKind, Toolbox};
use crate::triggers::{TriggerAction, TriggerAdapter};

/// What the key handler did with a key press.
#[derive(Debug)]
pub enum KeyDisposition {
    /// Not an undo/redo combination; the platform default applies.
    Ignored,
    /// An undo/redo combination. The restore runs on a spawned task;
    /// `restore` is `None` when the session is inert.
    Handled { shortcut: Shortcut, restore: Option<JoinHandle<RestoreOutcome>> },
}

impl KeyDisposition {
    #[must_use]
    pub fn prevent_default(&self) -> bool {
        matches!(self, Self::Handled { .. })
    }
}

struct LiveSession {
    surface: Arc<dyn DocumentSurface>,
    history: History,
    toolbox: Mutex<Toolbox>,
    adapter: Mutex<TriggerAdapter>,
    listener: Mutex<Option<ListenerId>>,
}

impl LiveSession {
    fn toolbox(&self) -> MutexGuard<'_, Toolbox> {
        self.toolbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn adapter(&self) -> MutexGuard<'_, TriggerAdapter> {
        self.adapter.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle_event(&self, event: SurfaceEvent) {
        let tool = self.toolbox().active_kind();
        let action = self.adapter().classify(event, tool);
        match action {
            TriggerAction::Ignore | TriggerAction::BeginGesture => {
                trace!(%event, ?tool, ?action, "surface event");
            }
            TriggerAction::RequestSave(window) => {
                let decision = self.history.request_save(window);
                trace!(%event, ?decision, "save requested");
            }
            TriggerAction::ForceSave => {
                let decision = self.history.force_save("pointer-up");
                debug!(%event, ?decision, "erase gesture committed");
            }
            TriggerAction::MarkErasable(id) => self.surface.set_erasable(id, true),
        }
    }

    fn apply_brush(&self, update: impl FnOnce(&mut Toolbox) -> Brush) {
        let (before, brush) = {
            let mut toolbox = self.toolbox();
            let before = toolbox.active_kind();
            (before, update(&mut toolbox))
        };
        if before != brush.kind {
            self.adapter().reset();
        }
        self.surface.set_brush(&brush);
        debug!(tool = ?brush.kind, color = %brush.color, width = brush.width, "brush changed");
    }
}

/// A document surface plus its undo/redo history.
pub struct DrawingSession {
    live: Option<Arc<LiveSession>>,
}

impl DrawingSession {
    /// Build the surface with `factory`, seed the history, and subscribe to
    /// surface events. A failing factory yields an inert session.
    ///
    /// Surface events must be delivered from within a Tokio runtime.
    pub fn open<D, F>(factory: F, config: HistoryConfig) -> Self
    where
        D: DocumentSurface + SnapshotCodec + 'static,
        F: FnOnce() -> Result<Arc<D>, SurfaceError>,
    {
        let document = match factory() {
            Ok(document) => document,
            Err(e) => {
                error!(error = %e, error_code = e.error_code(), "drawing surface failed to initialize; history disabled");
                return Self::inert();
            }
        };
        let surface: Arc<dyn DocumentSurface> = document.clone();
        let codec: Arc<dyn SnapshotCodec> = document;

        let toolbox = Toolbox::new();
        surface.set_brush(&toolbox.brush());
        surface.set_drawing_mode(true);

        let history = History::new(codec, Arc::clone(&surface), config);
        let live = Arc::new(LiveSession {
            surface: Arc::clone(&surface),
            history,
            toolbox: Mutex::new(toolbox),
            adapter: Mutex::new(TriggerAdapter::new()),
            listener: Mutex::new(None),
        });

        let weak = Arc::downgrade(&live);
        let id = surface.subscribe(Arc::new(move |event: SurfaceEvent| {
            if let Some(live) = weak.upgrade() {
                live.handle_event(event);
            }
        }));
        *live.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(id);

        info!("drawing session opened");
        Self { live: Some(live) }
    }

    /// Session with no surface. Every operation is a no-op.
    #[must_use]
    pub fn inert() -> Self {
        Self { live: None }
    }

    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.live.is_none()
    }

    #[must_use]
    pub fn history(&self) -> Option<&History> {
        self.live.as_ref().map(|live| &live.history)
    }

    #[must_use]
    pub fn view(&self) -> HistoryView {
        self.history().map_or_else(HistoryView::inert, History::view)
    }

    /// Receiver for the undo/redo control state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HistoryView> {
        match self.history() {
            Some(history) => history.subscribe(),
            None => watch::channel(HistoryView::inert()).1,
        }
    }

    #[must_use]
    pub fn active_tool(&self) -> Option<ToolKind> {
        self.live.as_ref().map(|live| live.toolbox().active_kind())
    }

    pub async fn undo(&self) -> RestoreOutcome {
        match self.history() {
            Some(history) => history.undo().await,
            None => RestoreOutcome::Closed,
        }
    }

    pub async fn redo(&self) -> RestoreOutcome {
        match self.history() {
            Some(history) => history.redo().await,
            None => RestoreOutcome::Closed,
        }
    }

    /// Map a key press to undo/redo and start the restore.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn handle_key(&self, combo: &KeyCombo) -> KeyDisposition {
        let Some(shortcut) = match_shortcut(combo) else {
            return KeyDisposition::Ignored;
        };
        let restore = self.history().cloned().map(|history| {
            tokio::spawn(async move {
                match shortcut {
                    Shortcut::Undo => history.undo().await,
                    Shortcut::Redo => history.redo().await,
                }
            })
        });
        KeyDisposition::Handled { shortcut, restore }
    }

    pub fn select_color(&self, color: &str) {
        self.with_live("select_color", |live| live.apply_brush(|t| t.set_color(color)));
    }

    pub fn select_width(&self, width: f64) {
        self.with_live("select_width", |live| live.apply_brush(|t| t.set_width(width)));
    }

    pub fn select_pen(&self) {
        self.with_live("select_pen", |live| live.apply_brush(Toolbox::select_pen));
    }

    pub fn select_eraser(&self) {
        self.with_live("select_eraser", |live| live.apply_brush(Toolbox::select_eraser));
    }

    fn with_live(&self, op: &'static str, f: impl FnOnce(&LiveSession)) {
        match &self.live {
            Some(live) => f(live.as_ref()),
            None => debug!(op, "ignored on inert session"),
        }
    }

    /// Close the history, unsubscribe, and dispose the surface. Idempotent.
    pub fn teardown(&mut self) {
        let Some(live) = self.live.take() else {
            return;
        };
        live.history.close();
        if let Some(id) = live
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            live.surface.unsubscribe(id);
        }
        match live.surface.dispose() {
            Ok(()) => info!("drawing session closed"),
            Err(e) => warn!(error = %e, error_code = e.error_code(), "surface teardown failed; ignoring"),
        }
    }
}

impl Drop for DrawingSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
