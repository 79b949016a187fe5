//! Recording test double for the codec and surface boundaries.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use super::History;
use crate::codec::{SnapshotCodec, Token};
use crate::config::HistoryConfig;
use crate::error::{CodecError, SurfaceError};
use crate::surface::{DocumentSurface, EventListener, ListenerId, ObjectId, SurfaceEvent};
use crate::tools::Brush;

/// Document whose whole state is a string. Counts every boundary call.
#[derive(Default)]
pub struct RecordingDocument {
    state: Mutex<String>,
    captures: AtomicUsize,
    restores: AtomicUsize,
    clears: AtomicUsize,
    renders: AtomicUsize,
    drawing_mode: AtomicBool,
    fail_captures: AtomicBool,
    fail_restores: AtomicBool,
    gate: Mutex<Option<Arc<Notify>>>,
    listeners: Mutex<Vec<(ListenerId, EventListener)>>,
    next_listener: AtomicU64,
    erasable: Mutex<Vec<ObjectId>>,
}

impl RecordingDocument {
    pub fn new(initial: &str) -> Arc<Self> {
        let doc = Self::default();
        *doc.state.lock().unwrap() = initial.to_owned();
        doc.drawing_mode.store(true, Ordering::SeqCst);
        Arc::new(doc)
    }

    pub fn set_state(&self, state: &str) {
        *self.state.lock().unwrap() = state.to_owned();
    }

    pub fn state(&self) -> String {
        self.state.lock().unwrap().clone()
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn restores(&self) -> usize {
        self.restores.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    pub fn fail_captures(&self, fail: bool) {
        self.fail_captures.store(fail, Ordering::SeqCst);
    }

    pub fn fail_restores(&self, fail: bool) {
        self.fail_restores.store(fail, Ordering::SeqCst);
    }

    /// Make restores wait until the returned `Notify` is signalled.
    pub fn hold_restores(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn erasable(&self) -> Vec<ObjectId> {
        self.erasable.lock().unwrap().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    pub fn emit(&self, event: SurfaceEvent) {
        let listeners: Vec<EventListener> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

#[async_trait::async_trait]
impl SnapshotCodec for RecordingDocument {
    fn capture(&self) -> Result<Token, CodecError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if self.fail_captures.load(Ordering::SeqCst) {
            return Err(CodecError::Encode("capture disabled".into()));
        }
        Ok(Token::from(self.state()))
    }

    async fn restore(&self, token: &Token) -> Result<(), CodecError> {
        self.restores.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_restores.load(Ordering::SeqCst) {
            return Err(CodecError::Rejected("restore disabled".into()));
        }
        self.set_state(token.as_str());
        Ok(())
    }
}

impl DocumentSurface for RecordingDocument {
    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.set_state("");
    }

    fn render(&self) {
        self.renders.fetch_add(1, Ordering::SeqCst);
    }

    fn set_drawing_mode(&self, enabled: bool) {
        self.drawing_mode.store(enabled, Ordering::SeqCst);
    }

    fn drawing_mode(&self) -> bool {
        self.drawing_mode.load(Ordering::SeqCst)
    }

    fn set_brush(&self, _brush: &Brush) {}

    fn set_erasable(&self, id: ObjectId, erasable: bool) {
        let mut ids = self.erasable.lock().unwrap();
        ids.retain(|existing| *existing != id);
        if erasable {
            ids.push(id);
        }
    }

    fn subscribe(&self, listener: EventListener) -> ListenerId {
        let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().unwrap().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn dispose(&self) -> Result<(), SurfaceError> {
        Ok(())
    }
}

/// History over `doc` with the given max size and default windows.
pub fn history_for(doc: &Arc<RecordingDocument>, max_size: usize) -> History {
    History::new(
        Arc::clone(doc) as Arc<dyn SnapshotCodec>,
        Arc::clone(doc) as Arc<dyn DocumentSurface>,
        HistoryConfig::default().with_max_size(max_size),
    )
}
